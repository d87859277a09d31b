//! Data structures for the bracket engine: players, participations, matches, tournaments.

mod game;
mod player;
mod tournament;

pub use game::{BracketType, Match, MatchId, MatchState};
pub use player::{ParticipantStatus, Player, PlayerId, TournamentPlayer};
pub use tournament::{MatchFormat, Tournament, TournamentError, TournamentId, TournamentStatus};
