//! Storage seams the bracket engine talks through.
//!
//! The builder and the progression engine never touch a concrete store: they
//! read and write matches through [`BracketStore`] and push every aggregate
//! update through [`StatsSink`]. `store::Transaction` implements both.

use crate::models::{Match, MatchId, ParticipantStatus, PlayerId, Tournament, TournamentError, TournamentId};

/// Match and tournament rows keyed by id.
pub trait BracketStore {
    fn find_match(&self, id: MatchId) -> Option<Match>;

    /// Insert or replace a match.
    fn save_match(&mut self, m: Match);

    fn find_tournament(&self, id: TournamentId) -> Option<Tournament>;

    /// Insert or replace a tournament.
    fn save_tournament(&mut self, tournament: Tournament);
}

/// Aggregate updates produced by a completed match.
pub trait StatsSink {
    /// Bump lifetime and tournament-scoped win/loss counters.
    fn record_result(
        &mut self,
        tournament_id: TournamentId,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<(), TournamentError>;

    /// Set a participant's standing in the tournament.
    fn set_standing(
        &mut self,
        tournament_id: TournamentId,
        player_id: PlayerId,
        status: ParticipantStatus,
        placement: Option<u32>,
    ) -> Result<(), TournamentError>;

    /// Mark the tournament finished with `winner` as champion.
    fn finish_tournament(&mut self, tournament_id: TournamentId, winner: PlayerId) -> Result<(), TournamentError>;
}
