//! Player (lifetime record) and TournamentPlayer (participation in one tournament).

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// A registered player. `wins`/`losses` count every tournament match ever played.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    /// Unique handle (case-insensitive).
    pub tag: String,
    pub clan: Option<String>,
    pub wins: u32,
    pub losses: u32,
}

impl Player {
    /// Create a new player. Counters start at zero.
    pub fn new(nickname: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            nickname: nickname.into(),
            tag: tag.into(),
            clan: None,
            wins: 0,
            losses: 0,
        }
    }

    /// Record a win for this player.
    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    /// Record a loss for this player.
    pub fn add_loss(&mut self) {
        self.losses += 1;
    }
}

/// Standing of a participant within one tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Active,
    Eliminated,
    Winner,
}

/// One row per (tournament, player): seed, standing and tournament-scoped stats.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentPlayer {
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    /// Draw position, 1..N.
    pub seed: u32,
    pub status: ParticipantStatus,
    /// 1 = champion, 2 = grand-final runner-up; shared by everyone knocked out in the same lower round.
    pub final_placement: Option<u32>,
    pub wins: u32,
    pub losses: u32,
}

impl TournamentPlayer {
    pub fn new(tournament_id: TournamentId, player_id: PlayerId, seed: u32) -> Self {
        Self {
            tournament_id,
            player_id,
            seed,
            status: ParticipantStatus::Active,
            final_placement: None,
            wins: 0,
            losses: 0,
        }
    }

    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    pub fn add_loss(&mut self) {
        self.losses += 1;
    }

    /// Set status and placement in one step.
    pub fn settle(&mut self, status: ParticipantStatus, placement: Option<u32>) {
        self.status = status;
        self.final_placement = placement;
    }
}
