//! In-process transactional store for players, tournaments, participations and matches.
//!
//! Writes happen inside [`Store::transaction`]: the closure sees a staged overlay
//! on top of the committed tables and the overlay is published only when the
//! closure returns `Ok`. Transactions hold the write lock for their whole run,
//! so two reports against the same match are applied one after the other.

use crate::logic::{BracketStore, StatsSink};
use crate::models::{
    Match, MatchId, ParticipantStatus, Player, PlayerId, Tournament, TournamentError, TournamentId,
    TournamentPlayer,
};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    players: HashMap<PlayerId, Player>,
    tournaments: HashMap<TournamentId, Tournament>,
    participants: HashMap<(TournamentId, PlayerId), TournamentPlayer>,
    matches: HashMap<MatchId, Match>,
}

impl Tables {
    fn apply(&mut self, staged: Tables) {
        self.players.extend(staged.players);
        self.tournaments.extend(staged.tournaments);
        self.participants.extend(staged.participants);
        self.matches.extend(staged.matches);
    }
}

/// Shared store handed to the web layer.
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

fn poisoned() -> TournamentError {
    TournamentError::Storage("store lock poisoned".to_string())
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` atomically. Nothing it writes is visible unless it returns `Ok`.
    pub fn transaction<T, F>(&self, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, TournamentError>,
    {
        let mut guard = self.tables.write().map_err(|_| poisoned())?;
        let (value, staged) = {
            let mut tx = Transaction {
                base: &*guard,
                staged: Tables::default(),
            };
            let value = f(&mut tx)?;
            (value, tx.staged)
        };
        guard.apply(staged);
        Ok(value)
    }

    pub fn player(&self, id: PlayerId) -> Result<Option<Player>, TournamentError> {
        let g = self.tables.read().map_err(|_| poisoned())?;
        Ok(g.players.get(&id).cloned())
    }

    pub fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>, TournamentError> {
        let g = self.tables.read().map_err(|_| poisoned())?;
        Ok(g.tournaments.get(&id).cloned())
    }

    pub fn get_match(&self, id: MatchId) -> Result<Option<Match>, TournamentError> {
        let g = self.tables.read().map_err(|_| poisoned())?;
        Ok(g.matches.get(&id).cloned())
    }

    pub fn participant(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> Result<Option<TournamentPlayer>, TournamentError> {
        let g = self.tables.read().map_err(|_| poisoned())?;
        Ok(g.participants.get(&(tournament_id, player_id)).cloned())
    }

    /// All matches of a tournament ordered by bracket, round, position.
    pub fn tournament_matches(&self, tournament_id: TournamentId) -> Result<Vec<Match>, TournamentError> {
        let g = self.tables.read().map_err(|_| poisoned())?;
        let mut matches: Vec<Match> = g
            .matches
            .values()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| (m.bracket_type, m.round, m.position));
        Ok(matches)
    }

    /// Participations of a tournament ordered by seed.
    pub fn tournament_players(&self, tournament_id: TournamentId) -> Result<Vec<TournamentPlayer>, TournamentError> {
        let g = self.tables.read().map_err(|_| poisoned())?;
        let mut players: Vec<TournamentPlayer> = g
            .participants
            .values()
            .filter(|p| p.tournament_id == tournament_id)
            .cloned()
            .collect();
        players.sort_by_key(|p| p.seed);
        Ok(players)
    }
}

/// Staged view of the store inside [`Store::transaction`].
pub struct Transaction<'a> {
    base: &'a Tables,
    staged: Tables,
}

impl Transaction<'_> {
    pub fn find_player(&self, id: PlayerId) -> Option<Player> {
        self.staged
            .players
            .get(&id)
            .or_else(|| self.base.players.get(&id))
            .cloned()
    }

    /// Lookup by tag, ignoring case (Unicode lowercase, so "Ñandú" matches "ñANDÚ").
    pub fn find_player_by_tag(&self, tag: &str) -> Option<Player> {
        let wanted = tag.to_lowercase();
        self.staged
            .players
            .values()
            .chain(self.base.players.values())
            .find(|p| p.tag.to_lowercase() == wanted)
            .cloned()
    }

    pub fn save_player(&mut self, player: Player) {
        self.staged.players.insert(player.id, player);
    }

    pub fn find_participant(&self, tournament_id: TournamentId, player_id: PlayerId) -> Option<TournamentPlayer> {
        let key = (tournament_id, player_id);
        self.staged
            .participants
            .get(&key)
            .or_else(|| self.base.participants.get(&key))
            .cloned()
    }

    pub fn save_participant(&mut self, participant: TournamentPlayer) {
        self.staged
            .participants
            .insert((participant.tournament_id, participant.player_id), participant);
    }

    fn participant_mut(
        &mut self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> Result<&mut TournamentPlayer, TournamentError> {
        let key = (tournament_id, player_id);
        if !self.staged.participants.contains_key(&key) {
            let row = self
                .base
                .participants
                .get(&key)
                .cloned()
                .ok_or(TournamentError::ParticipantNotFound {
                    tournament_id,
                    player_id,
                })?;
            self.staged.participants.insert(key, row);
        }
        self.staged
            .participants
            .get_mut(&key)
            .ok_or(TournamentError::ParticipantNotFound {
                tournament_id,
                player_id,
            })
    }

    fn player_mut(&mut self, player_id: PlayerId) -> Result<&mut Player, TournamentError> {
        if !self.staged.players.contains_key(&player_id) {
            let row = self
                .base
                .players
                .get(&player_id)
                .cloned()
                .ok_or(TournamentError::PlayerNotFound(player_id))?;
            self.staged.players.insert(player_id, row);
        }
        self.staged
            .players
            .get_mut(&player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))
    }
}

impl BracketStore for Transaction<'_> {
    fn find_match(&self, id: MatchId) -> Option<Match> {
        self.staged
            .matches
            .get(&id)
            .or_else(|| self.base.matches.get(&id))
            .cloned()
    }

    fn save_match(&mut self, m: Match) {
        self.staged.matches.insert(m.id, m);
    }

    fn find_tournament(&self, id: TournamentId) -> Option<Tournament> {
        self.staged
            .tournaments
            .get(&id)
            .or_else(|| self.base.tournaments.get(&id))
            .cloned()
    }

    fn save_tournament(&mut self, tournament: Tournament) {
        self.staged.tournaments.insert(tournament.id, tournament);
    }
}

impl StatsSink for Transaction<'_> {
    fn record_result(
        &mut self,
        tournament_id: TournamentId,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<(), TournamentError> {
        self.player_mut(winner)?.add_win();
        self.player_mut(loser)?.add_loss();
        self.participant_mut(tournament_id, winner)?.add_win();
        self.participant_mut(tournament_id, loser)?.add_loss();
        Ok(())
    }

    fn set_standing(
        &mut self,
        tournament_id: TournamentId,
        player_id: PlayerId,
        status: ParticipantStatus,
        placement: Option<u32>,
    ) -> Result<(), TournamentError> {
        self.participant_mut(tournament_id, player_id)?.settle(status, placement);
        Ok(())
    }

    fn finish_tournament(&mut self, tournament_id: TournamentId, winner: PlayerId) -> Result<(), TournamentError> {
        let mut tournament = self
            .find_tournament(tournament_id)
            .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
        tournament.finish(winner);
        self.save_tournament(tournament);
        Ok(())
    }
}
