//! Shape of a double-elimination bracket: round sizes and the index mappings
//! that route winners and losers from one round to the next.
//!
//! Everything here is pure arithmetic over the field size; the builder turns it
//! into match rows and the progression engine asks it for elimination placements.

use crate::models::{BracketType, TournamentError};

/// A match slot in the bracket, addressed by bracket, 1-based round and 0-based index.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Slot {
    pub bracket: BracketType,
    pub round: u32,
    pub index: usize,
}

impl Slot {
    pub const GRAND_FINAL: Slot = Slot {
        bracket: BracketType::GrandFinal,
        round: 1,
        index: 0,
    };

    pub fn upper(round: u32, index: usize) -> Self {
        Self {
            bracket: BracketType::Upper,
            round,
            index,
        }
    }

    pub fn lower(round: u32, index: usize) -> Self {
        Self {
            bracket: BracketType::Lower,
            round,
            index,
        }
    }
}

/// Round sizes of both brackets for a field of `competitors` players.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BracketTopology {
    competitors: usize,
    upper: Vec<usize>,
    lower: Vec<usize>,
}

/// True if `count` is a supported field size (power of two, at least 4).
pub fn is_valid_field(count: usize) -> bool {
    count >= 4 && count.is_power_of_two()
}

impl BracketTopology {
    pub fn new(competitors: usize) -> Result<Self, TournamentError> {
        if !is_valid_field(competitors) {
            return Err(TournamentError::InvalidFieldCount { count: competitors });
        }
        let upper_rounds = competitors.trailing_zeros() as usize;
        let upper = (1..=upper_rounds).map(|r| competitors >> r).collect();

        let lower_rounds = (upper_rounds - 1) * 2;
        let mut lower: Vec<usize> = Vec::with_capacity(lower_rounds);
        for round in 1..=lower_rounds {
            let size = if round == lower_rounds {
                1
            } else if round == 1 {
                competitors / 4
            } else if round % 2 == 0 {
                // consolidation round: survivors meet the upper bracket's dropouts
                lower[round - 2]
            } else {
                (lower[round - 2] / 2).max(1)
            };
            lower.push(size);
        }

        Ok(Self {
            competitors,
            upper,
            lower,
        })
    }

    pub fn competitors(&self) -> usize {
        self.competitors
    }

    pub fn upper_rounds(&self) -> u32 {
        self.upper.len() as u32
    }

    pub fn lower_rounds(&self) -> u32 {
        self.lower.len() as u32
    }

    /// Number of matches in `round` (1-based) of `bracket`. Zero for rounds that don't exist.
    pub fn round_size(&self, bracket: BracketType, round: u32) -> usize {
        let sizes = match bracket {
            BracketType::Upper => &self.upper,
            BracketType::Lower => &self.lower,
            BracketType::GrandFinal => return usize::from(round == 1),
        };
        round
            .checked_sub(1)
            .and_then(|i| sizes.get(i as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Total matches across upper, lower and grand final.
    pub fn match_count(&self) -> usize {
        self.upper.iter().sum::<usize>() + self.lower.iter().sum::<usize>() + 1
    }

    /// Every slot in build order: upper rounds, lower rounds, grand final.
    pub fn slots(&self) -> Vec<Slot> {
        let mut slots = Vec::with_capacity(self.match_count());
        for (r, &size) in self.upper.iter().enumerate() {
            slots.extend((0..size).map(|i| Slot::upper(r as u32 + 1, i)));
        }
        for (r, &size) in self.lower.iter().enumerate() {
            slots.extend((0..size).map(|i| Slot::lower(r as u32 + 1, i)));
        }
        slots.push(Slot::GRAND_FINAL);
        slots
    }

    /// Where the winner of `slot` plays next. None for the grand final.
    pub fn winner_target(&self, slot: Slot) -> Option<Slot> {
        match slot.bracket {
            BracketType::Upper if slot.round < self.upper_rounds() => {
                Some(Slot::upper(slot.round + 1, slot.index / 2))
            }
            BracketType::Upper => Some(Slot::GRAND_FINAL),
            BracketType::Lower if slot.round < self.lower_rounds() => {
                let current = self.round_size(BracketType::Lower, slot.round);
                let next = self.round_size(BracketType::Lower, slot.round + 1);
                let index = if next >= current { slot.index } else { slot.index / 2 };
                Some(Slot::lower(slot.round + 1, clamp_index(index, next)))
            }
            BracketType::Lower => Some(Slot::GRAND_FINAL),
            BracketType::GrandFinal => None,
        }
    }

    /// Where the loser of `slot` drops to. Only upper-bracket matches route a loser onward.
    pub fn loser_target(&self, slot: Slot) -> Option<Slot> {
        if slot.bracket != BracketType::Upper {
            return None;
        }
        if slot.round == 1 {
            return Some(Slot::lower(1, slot.index / 2));
        }
        let round = (slot.round - 1) * 2;
        let size = self.round_size(BracketType::Lower, round);
        Some(Slot::lower(round, clamp_index(slot.index, size)))
    }

    /// Placement shared by every player knocked out in lower round `round`.
    /// Each lower match removes exactly one player, so the placement is one
    /// below the number of players still alive after that round.
    pub fn lower_elimination_placement(&self, round: u32) -> u32 {
        let eliminated: usize = self.lower.iter().take(round as usize).sum();
        (self.competitors - eliminated + 1) as u32
    }
}

fn clamp_index(index: usize, size: usize) -> usize {
    if index < size {
        index
    } else {
        0
    }
}
