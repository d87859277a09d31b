//! Double-elimination tournament organizer: bracket engine, transactional store and web API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    build_bracket, create_tournament, plan_progression, register_player, report_result, BracketLayout,
    BracketStore, BracketTopology, LoserFate, MatchReport, NewTournament, Progression, Slot, StatsSink,
};
pub use models::{
    BracketType, Match, MatchFormat, MatchId, MatchState, ParticipantStatus, Player, PlayerId, Tournament,
    TournamentError, TournamentId, TournamentPlayer, TournamentStatus,
};
pub use store::{Store, Transaction};
