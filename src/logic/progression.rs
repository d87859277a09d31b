//! Result reporting: validate a finished series and push winner and loser along the bracket.

use crate::logic::repository::{BracketStore, StatsSink};
use crate::logic::topology::BracketTopology;
use crate::models::{
    BracketType, Match, MatchFormat, MatchId, MatchState, ParticipantStatus, PlayerId, TournamentError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reported series result.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub player_1_score: u32,
    pub player_2_score: u32,
    pub winner: PlayerId,
}

/// What happens to the loser once the match is recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoserFate {
    /// Drops to the lower bracket or simply waits; no standing change.
    Continues,
    /// Second loss: out of the tournament at this placement.
    Eliminated { placement: u32 },
    /// Lost the grand final; the winner is champion.
    RunnerUp,
}

/// Every effect of one reported result, decided before anything is written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Progression {
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub advance_to: Option<MatchId>,
    pub drop_to: Option<MatchId>,
    pub loser_fate: LoserFate,
}

/// Check `report` against the match and decide where both players go.
///
/// Validation order: already completed, empty slot, foreign winner, score.
/// A finished series has the winner on exactly `wins_required` and the loser below it.
pub fn plan_progression(
    m: &Match,
    report: &MatchReport,
    format: MatchFormat,
    topology: &BracketTopology,
) -> Result<Progression, TournamentError> {
    if m.is_completed() {
        return Err(TournamentError::AlreadyCompleted(m.id));
    }
    let (player_1, player_2) = m.participants().ok_or(TournamentError::IncompleteMatch(m.id))?;

    let (winner_score, loser_score, loser) = if report.winner == player_1 {
        (report.player_1_score, report.player_2_score, player_2)
    } else if report.winner == player_2 {
        (report.player_2_score, report.player_1_score, player_1)
    } else {
        return Err(TournamentError::InvalidWinner {
            match_id: m.id,
            winner: report.winner,
        });
    };

    let required = format.wins_required();
    if winner_score != required || loser_score >= required {
        return Err(TournamentError::InvalidScore {
            format,
            winner_score,
            loser_score,
        });
    }

    let drop_to = match m.bracket_type {
        BracketType::Upper => m.loser_next_match,
        _ => None,
    };
    let loser_fate = match m.bracket_type {
        BracketType::GrandFinal => LoserFate::RunnerUp,
        BracketType::Lower if m.loser_next_match.is_none() => LoserFate::Eliminated {
            placement: topology.lower_elimination_placement(m.round),
        },
        _ => LoserFate::Continues,
    };

    Ok(Progression {
        winner: report.winner,
        loser,
        advance_to: m.next_match,
        drop_to,
        loser_fate,
    })
}

/// Record a result and apply every downstream effect.
///
/// Writes go through `store`; when it is a store transaction, an error at any
/// step (including a topology violation while forwarding) discards all of them.
/// Completion and empty slots are checked before the owning tournament is loaded.
pub fn report_result<S: BracketStore + StatsSink>(
    store: &mut S,
    match_id: MatchId,
    report: MatchReport,
    now: DateTime<Utc>,
) -> Result<Match, TournamentError> {
    let mut m = store.find_match(match_id).ok_or(TournamentError::MatchNotFound(match_id))?;
    match m.state() {
        MatchState::Completed => return Err(TournamentError::AlreadyCompleted(m.id)),
        MatchState::Unscheduled => return Err(TournamentError::IncompleteMatch(m.id)),
        MatchState::Ready => {}
    }
    let tournament = store
        .find_tournament(m.tournament_id)
        .ok_or(TournamentError::TournamentNotFound(m.tournament_id))?;
    let topology = BracketTopology::new(tournament.player_count as usize).map_err(|e| {
        TournamentError::TopologyViolation {
            match_id,
            detail: e.to_string(),
        }
    })?;

    let plan = plan_progression(&m, &report, tournament.match_format, &topology)?;

    m.complete(report.player_1_score, report.player_2_score, plan.winner, plan.loser, now);
    store.save_match(m.clone());
    store.record_result(m.tournament_id, plan.winner, plan.loser)?;
    log::info!(
        "Match {} ({:?} round {}) won by {} {}-{}",
        m.id,
        m.bracket_type,
        m.round,
        plan.winner,
        m.player_1_score,
        m.player_2_score
    );

    if let Some(next) = plan.advance_to {
        forward(store, m.id, next, plan.winner)?;
    }
    if let Some(next) = plan.drop_to {
        forward(store, m.id, next, plan.loser)?;
    }

    match plan.loser_fate {
        LoserFate::Continues => {}
        LoserFate::Eliminated { placement } => {
            store.set_standing(m.tournament_id, plan.loser, ParticipantStatus::Eliminated, Some(placement))?;
            log::info!("Player {} eliminated (placement {})", plan.loser, placement);
        }
        LoserFate::RunnerUp => {
            store.finish_tournament(m.tournament_id, plan.winner)?;
            store.set_standing(m.tournament_id, plan.winner, ParticipantStatus::Winner, Some(1))?;
            store.set_standing(m.tournament_id, plan.loser, ParticipantStatus::Eliminated, Some(2))?;
            log::info!("Tournament {} finished, champion {}", m.tournament_id, plan.winner);
        }
    }

    Ok(m)
}

/// Seat `player` in the first free slot of `to`.
fn forward<S: BracketStore>(
    store: &mut S,
    from: MatchId,
    to: MatchId,
    player: PlayerId,
) -> Result<(), TournamentError> {
    let mut target = store.find_match(to).ok_or_else(|| TournamentError::TopologyViolation {
        match_id: from,
        detail: format!("destination match {} does not exist", to),
    })?;
    if !target.seat(player) {
        log::error!("Cannot forward player {} from match {}: match {} is full", player, from, to);
        return Err(TournamentError::TopologyViolation {
            match_id: to,
            detail: format!("both slots already filled when forwarding from match {}", from),
        });
    }
    store.save_match(target);
    Ok(())
}
