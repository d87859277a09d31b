//! Match, BracketType and the per-match lifecycle.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side of the double-elimination bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    Upper,
    Lower,
    GrandFinal,
}

/// Derived lifecycle state of a match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// At least one slot still waits for a seeded or forwarded player.
    Unscheduled,
    /// Both slots filled, no result yet.
    Ready,
    /// Result recorded. Terminal.
    Completed,
}

/// A single series (best of 3/5/7) between two players inside a bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub bracket_type: BracketType,
    pub round: u32,
    /// 1-based order within the round.
    pub position: u32,
    pub player_1: Option<PlayerId>,
    pub player_2: Option<PlayerId>,
    pub player_1_score: u32,
    pub player_2_score: u32,
    pub winner: Option<PlayerId>,
    pub loser: Option<PlayerId>,
    /// Where the winner goes. None only on the grand final.
    pub next_match: Option<MatchId>,
    /// Where the loser goes. Set on upper-bracket matches.
    pub loser_next_match: Option<MatchId>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Match {
    /// Create an empty match at the given bracket position.
    pub fn new(tournament_id: TournamentId, bracket_type: BracketType, round: u32, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            bracket_type,
            round,
            position,
            player_1: None,
            player_2: None,
            player_1_score: 0,
            player_2_score: 0,
            winner: None,
            loser: None,
            next_match: None,
            loser_next_match: None,
            scheduled_at: None,
            completed_at: None,
        }
    }

    pub fn state(&self) -> MatchState {
        if self.completed_at.is_some() {
            MatchState::Completed
        } else if self.player_1.is_some() && self.player_2.is_some() {
            MatchState::Ready
        } else {
            MatchState::Unscheduled
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Both participants, if both slots are filled.
    pub fn participants(&self) -> Option<(PlayerId, PlayerId)> {
        Some((self.player_1?, self.player_2?))
    }

    /// Put `player` into the first empty slot (player 1 first).
    /// Returns false when both slots are already taken.
    pub fn seat(&mut self, player: PlayerId) -> bool {
        if self.player_1.is_none() {
            self.player_1 = Some(player);
            true
        } else if self.player_2.is_none() {
            self.player_2 = Some(player);
            true
        } else {
            false
        }
    }

    /// Record the outcome. Winner, loser and completion time are written together.
    pub fn complete(
        &mut self,
        player_1_score: u32,
        player_2_score: u32,
        winner: PlayerId,
        loser: PlayerId,
        at: DateTime<Utc>,
    ) {
        self.player_1_score = player_1_score;
        self.player_2_score = player_2_score;
        self.winner = Some(winner);
        self.loser = Some(loser);
        self.completed_at = Some(at);
    }
}
