//! Tournament, MatchFormat and the error type shared by the bracket engine.

use crate::models::game::MatchId;
use crate::models::player::PlayerId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur while building or progressing a bracket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Field size is below 4 or not a power of two.
    InvalidFieldCount { count: usize },
    /// The same competitor appears twice in the draw.
    DuplicateCompetitor(PlayerId),
    MatchNotFound(MatchId),
    TournamentNotFound(Uuid),
    PlayerNotFound(PlayerId),
    /// No participation row for a player that appears in a match.
    ParticipantNotFound { tournament_id: TournamentId, player_id: PlayerId },
    /// A result was already recorded for this match.
    AlreadyCompleted(MatchId),
    /// The match still has an empty slot.
    IncompleteMatch(MatchId),
    /// Declared winner is not one of the two participants.
    InvalidWinner { match_id: MatchId, winner: PlayerId },
    /// Scores don't describe a finished series in this format.
    InvalidScore {
        format: MatchFormat,
        winner_score: u32,
        loser_score: u32,
    },
    /// A player with this tag already exists (tags are unique, case-insensitive).
    DuplicatePlayerTag(String),
    /// A request field is missing or malformed.
    InvalidInput(String),
    /// A forwarding target had no free slot. Internal invariant breach.
    TopologyViolation { match_id: MatchId, detail: String },
    /// The backing store failed.
    Storage(String),
}

impl TournamentError {
    /// True for invariant breaches and store failures, as opposed to bad caller input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TournamentError::TopologyViolation { .. }
                | TournamentError::ParticipantNotFound { .. }
                | TournamentError::Storage(_)
        )
    }

    /// Stable machine-readable tag for API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            TournamentError::InvalidFieldCount { .. } => "invalid_field_count",
            TournamentError::DuplicateCompetitor(_) => "duplicate_competitor",
            TournamentError::MatchNotFound(_) => "match_not_found",
            TournamentError::TournamentNotFound(_) => "tournament_not_found",
            TournamentError::PlayerNotFound(_) => "player_not_found",
            TournamentError::ParticipantNotFound { .. } => "participant_not_found",
            TournamentError::AlreadyCompleted(_) => "already_completed",
            TournamentError::IncompleteMatch(_) => "incomplete_match",
            TournamentError::InvalidWinner { .. } => "invalid_winner",
            TournamentError::InvalidScore { .. } => "invalid_score",
            TournamentError::DuplicatePlayerTag(_) => "duplicate_player_tag",
            TournamentError::InvalidInput(_) => "invalid_input",
            TournamentError::TopologyViolation { .. } => "topology_violation",
            TournamentError::Storage(_) => "storage",
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidFieldCount { count } => write!(
                f,
                "Need a power of two of at least 4 players (got {})",
                count
            ),
            TournamentError::DuplicateCompetitor(id) => write!(f, "Player {} appears more than once", id),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            TournamentError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            TournamentError::ParticipantNotFound { tournament_id, player_id } => write!(
                f,
                "Player {} is not registered in tournament {}",
                player_id, tournament_id
            ),
            TournamentError::AlreadyCompleted(id) => write!(f, "Match {} is already finished", id),
            TournamentError::IncompleteMatch(id) => write!(f, "Match {} does not have both players yet", id),
            TournamentError::InvalidWinner { match_id, winner } => write!(
                f,
                "Winner {} is not a player of match {}",
                winner, match_id
            ),
            TournamentError::InvalidScore {
                format,
                winner_score,
                loser_score,
            } => write!(
                f,
                "Score {}-{} is not a finished {} series (winner needs exactly {} wins)",
                winner_score,
                loser_score,
                format,
                format.wins_required()
            ),
            TournamentError::DuplicatePlayerTag(tag) => write!(f, "A player with tag {} already exists", tag),
            TournamentError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TournamentError::TopologyViolation { match_id, detail } => {
                write!(f, "Bracket topology violated at match {}: {}", match_id, detail)
            }
            TournamentError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Series length: best of 3, 5 or 7.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchFormat {
    #[default]
    Md3,
    Md5,
    Md7,
}

impl MatchFormat {
    /// Games a player must win to take the series.
    pub fn wins_required(self) -> u32 {
        match self {
            MatchFormat::Md3 => 2,
            MatchFormat::Md5 => 3,
            MatchFormat::Md7 => 4,
        }
    }
}

impl std::fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchFormat::Md3 => write!(f, "MD3"),
            MatchFormat::Md5 => write!(f, "MD5"),
            MatchFormat::Md7 => write!(f, "MD7"),
        }
    }
}

impl std::str::FromStr for MatchFormat {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MD3" => Ok(MatchFormat::Md3),
            "MD5" => Ok(MatchFormat::Md5),
            "MD7" => Ok(MatchFormat::Md7),
            other => Err(TournamentError::InvalidInput(format!("unknown match format {}", other))),
        }
    }
}

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Upcoming,
    /// Bracket generated, results being reported.
    Active,
    /// Grand final reported; `winner` is set.
    Finished,
}

/// A double-elimination tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    /// Fixed at creation.
    pub match_format: MatchFormat,
    pub status: TournamentStatus,
    /// Field size the bracket was built for.
    pub player_count: u32,
    /// Champion, set when the grand final is reported.
    pub winner: Option<PlayerId>,
}

impl Tournament {
    /// Create a new tournament in Upcoming state.
    pub fn new(name: impl Into<String>, start_date: NaiveDate, match_format: MatchFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            start_date,
            match_format,
            status: TournamentStatus::Upcoming,
            player_count: 0,
            winner: None,
        }
    }

    /// Mark the tournament finished with the given champion.
    pub fn finish(&mut self, winner: PlayerId) {
        self.status = TournamentStatus::Finished;
        self.winner = Some(winner);
    }
}
