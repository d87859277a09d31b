//! Bracket construction: turn a draw into the full double-elimination match graph.

use crate::logic::repository::BracketStore;
use crate::logic::topology::{BracketTopology, Slot};
use crate::models::{BracketType, Match, MatchFormat, MatchId, PlayerId, TournamentError, TournamentId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Ids of every match created for a bracket, grouped by bracket and round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketLayout {
    pub tournament_id: TournamentId,
    pub format: MatchFormat,
    pub upper: BTreeMap<u32, Vec<MatchId>>,
    pub lower: BTreeMap<u32, Vec<MatchId>>,
    pub grand_final: MatchId,
}

impl BracketLayout {
    pub fn match_count(&self) -> usize {
        self.upper.values().map(Vec::len).sum::<usize>() + self.lower.values().map(Vec::len).sum::<usize>() + 1
    }
}

/// Build and persist every match of a double-elimination bracket.
///
/// Upper round 1 pairs `competitors[0]` v `competitors[1]`, `competitors[2]` v
/// `competitors[3]` and so on; shuffle before calling if the draw should be random.
/// All rows are written to `store` only after the whole graph is wired, so a
/// failure leaves nothing behind. Run it inside a store transaction to make the
/// write itself atomic. When the tournament row already exists its
/// `player_count` is set to the field size, which result reporting reads back.
pub fn build_bracket<S: BracketStore>(
    store: &mut S,
    tournament_id: TournamentId,
    format: MatchFormat,
    competitors: &[PlayerId],
) -> Result<BracketLayout, TournamentError> {
    let topology = BracketTopology::new(competitors.len())?;
    let mut seen = HashSet::with_capacity(competitors.len());
    for &id in competitors {
        if !seen.insert(id) {
            return Err(TournamentError::DuplicateCompetitor(id));
        }
    }

    let slots = topology.slots();
    let mut arena: Vec<Match> = slots
        .iter()
        .map(|s| Match::new(tournament_id, s.bracket, s.round, s.index as u32 + 1))
        .collect();
    let index_of: HashMap<Slot, usize> = slots.iter().enumerate().map(|(i, s)| (*s, i)).collect();

    for (i, pair) in competitors.chunks_exact(2).enumerate() {
        let m = &mut arena[index_of[&Slot::upper(1, i)]];
        m.player_1 = Some(pair[0]);
        m.player_2 = Some(pair[1]);
    }

    for (i, slot) in slots.iter().enumerate() {
        let next = topology.winner_target(*slot).map(|t| arena[index_of[&t]].id);
        let loser_next = topology.loser_target(*slot).map(|t| arena[index_of[&t]].id);
        arena[i].next_match = next;
        arena[i].loser_next_match = loser_next;
    }

    let mut upper: BTreeMap<u32, Vec<MatchId>> = BTreeMap::new();
    let mut lower: BTreeMap<u32, Vec<MatchId>> = BTreeMap::new();
    let mut grand_final = None;
    for m in &arena {
        match m.bracket_type {
            BracketType::Upper => upper.entry(m.round).or_default().push(m.id),
            BracketType::Lower => lower.entry(m.round).or_default().push(m.id),
            BracketType::GrandFinal => grand_final = Some(m.id),
        }
    }
    let grand_final = grand_final.ok_or_else(|| TournamentError::TopologyViolation {
        match_id: tournament_id,
        detail: "no grand final generated".to_string(),
    })?;

    let count = arena.len();
    for m in arena {
        store.save_match(m);
    }
    if let Some(mut tournament) = store.find_tournament(tournament_id) {
        tournament.player_count = topology.competitors() as u32;
        store.save_tournament(tournament);
    }
    log::info!(
        "Built double-elimination bracket for tournament {}: {} players, {} matches ({})",
        tournament_id,
        topology.competitors(),
        count,
        format
    );

    Ok(BracketLayout {
        tournament_id,
        format,
        upper,
        lower,
        grand_final,
    })
}
