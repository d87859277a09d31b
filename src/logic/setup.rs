//! Setup phase: register players and open a tournament with its bracket.

use crate::logic::builder::{build_bracket, BracketLayout};
use crate::logic::repository::BracketStore;
use crate::logic::topology::is_valid_field;
use crate::models::{
    MatchFormat, Player, PlayerId, Tournament, TournamentError, TournamentPlayer, TournamentStatus,
};
use crate::store::Transaction;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

/// Register a player. Tags are unique (case-insensitive); nickname and tag must be non-blank.
pub fn register_player(
    tx: &mut Transaction<'_>,
    nickname: &str,
    tag: &str,
    clan: Option<String>,
) -> Result<Player, TournamentError> {
    let nickname = nickname.trim();
    let tag = tag.trim();
    if nickname.is_empty() {
        return Err(TournamentError::InvalidInput("nickname is required".to_string()));
    }
    if tag.is_empty() {
        return Err(TournamentError::InvalidInput("tag is required".to_string()));
    }
    if tx.find_player_by_tag(tag).is_some() {
        return Err(TournamentError::DuplicatePlayerTag(tag.to_string()));
    }
    let mut player = Player::new(nickname, tag);
    player.clan = clan.filter(|c| !c.trim().is_empty());
    tx.save_player(player.clone());
    Ok(player)
}

/// Everything needed to open a tournament.
#[derive(Clone, Debug)]
pub struct NewTournament {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub match_format: MatchFormat,
    pub player_ids: Vec<PlayerId>,
}

/// Create the tournament, draw seeds and build the bracket.
///
/// 1. Check the field (power of two, at least 4) and that every player exists.
/// 2. Shuffle the players with `rng`; draw order is the seed (1..N).
/// 3. Build the bracket from the shuffled order.
///
/// Run inside one store transaction: any failure leaves no tournament, seeds or matches behind.
pub fn create_tournament<R: Rng + ?Sized>(
    tx: &mut Transaction<'_>,
    new: NewTournament,
    rng: &mut R,
) -> Result<(Tournament, BracketLayout), TournamentError> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(TournamentError::InvalidInput("tournament name is required".to_string()));
    }
    let count = new.player_ids.len();
    if !is_valid_field(count) {
        return Err(TournamentError::InvalidFieldCount { count });
    }
    for &id in &new.player_ids {
        if tx.find_player(id).is_none() {
            return Err(TournamentError::PlayerNotFound(id));
        }
    }

    let mut tournament = Tournament::new(name, new.start_date, new.match_format);
    tournament.description = new.description;
    tournament.status = TournamentStatus::Active;
    tournament.player_count = count as u32;

    let mut draw = new.player_ids;
    draw.shuffle(rng);

    tx.save_tournament(tournament.clone());
    let layout = build_bracket(tx, tournament.id, tournament.match_format, &draw)?;
    for (i, &player_id) in draw.iter().enumerate() {
        tx.save_participant(TournamentPlayer::new(tournament.id, player_id, i as u32 + 1));
    }

    log::info!(
        "Created tournament {} ({}) with {} players",
        tournament.name,
        tournament.id,
        count
    );
    Ok((tournament, layout))
}
