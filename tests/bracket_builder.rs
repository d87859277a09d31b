//! Integration tests for bracket construction: shape, wiring and all-or-nothing writes.

use bracket_arena::{
    build_bracket, create_tournament, register_player, BracketStore, BracketType, Match, MatchFormat,
    MatchId, NewTournament, ParticipantStatus, PlayerId, Store, TournamentError, TournamentStatus,
};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use uuid::Uuid;

fn players(n: usize) -> Vec<PlayerId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

/// Build a bracket for `n` fresh ids and return every created match by id.
fn built(n: usize) -> (Vec<PlayerId>, bracket_arena::BracketLayout, HashMap<MatchId, Match>) {
    let store = Store::new();
    let ids = players(n);
    let tournament_id = Uuid::new_v4();
    let layout = store
        .transaction(|tx| build_bracket(tx, tournament_id, MatchFormat::Md3, &ids))
        .unwrap();
    let matches = store
        .tournament_matches(tournament_id)
        .unwrap()
        .into_iter()
        .map(|m| (m.id, m))
        .collect();
    (ids, layout, matches)
}

#[test]
fn rejects_invalid_field_sizes_without_writing() {
    for n in [0, 2, 3, 6, 12] {
        let store = Store::new();
        let tournament_id = Uuid::new_v4();
        let ids = players(n);
        let result = store.transaction(|tx| build_bracket(tx, tournament_id, MatchFormat::Md3, &ids));
        assert_eq!(result, Err(TournamentError::InvalidFieldCount { count: n }));
        assert!(store.tournament_matches(tournament_id).unwrap().is_empty());
    }
}

#[test]
fn rejects_duplicate_competitors() {
    let store = Store::new();
    let tournament_id = Uuid::new_v4();
    let mut ids = players(4);
    ids[3] = ids[0];
    let result = store.transaction(|tx| build_bracket(tx, tournament_id, MatchFormat::Md3, &ids));
    assert_eq!(result, Err(TournamentError::DuplicateCompetitor(ids[0])));
    assert!(store.tournament_matches(tournament_id).unwrap().is_empty());
}

#[test]
fn upper_bracket_has_halving_rounds() {
    for n in [4usize, 8, 16, 32] {
        let (_, layout, matches) = built(n);
        let rounds = n.trailing_zeros();
        assert_eq!(layout.upper.len() as u32, rounds);
        for (round, ids) in &layout.upper {
            assert_eq!(ids.len(), n >> round, "n={} round={}", n, round);
        }
        let upper_total: usize = layout.upper.values().map(Vec::len).sum();
        assert_eq!(upper_total, n - 1);
        assert_eq!(layout.lower.len() as u32, (rounds - 1) * 2);
        assert_eq!(matches.len(), layout.match_count());
        let grand_finals = matches.values().filter(|m| m.bracket_type == BracketType::GrandFinal).count();
        assert_eq!(grand_finals, 1);
    }
}

#[test]
fn first_round_pairs_competitors_in_order() {
    let (ids, layout, matches) = built(8);
    for (i, id) in layout.upper[&1].iter().enumerate() {
        let m = &matches[id];
        assert_eq!(m.position, i as u32 + 1);
        assert_eq!(m.player_1, Some(ids[2 * i]));
        assert_eq!(m.player_2, Some(ids[2 * i + 1]));
    }
    for m in matches.values() {
        if !(m.bracket_type == BracketType::Upper && m.round == 1) {
            assert_eq!(m.participants(), None);
            assert_eq!((m.player_1, m.player_2), (None, None));
        }
    }
}

#[test]
fn every_winner_path_ends_at_the_grand_final() {
    for n in [4usize, 8, 16, 32] {
        let (_, layout, matches) = built(n);
        for m in matches.values() {
            if m.bracket_type == BracketType::GrandFinal {
                assert_eq!(m.next_match, None);
                continue;
            }
            let mut current = m.id;
            let mut steps = 0;
            while let Some(next) = matches[&current].next_match {
                current = next;
                steps += 1;
                assert!(steps <= matches.len(), "cycle in winner edges");
            }
            assert_eq!(current, layout.grand_final);
        }
    }
}

#[test]
fn loser_edges_leave_upper_matches_only() {
    for n in [4usize, 8, 16] {
        let (_, _, matches) = built(n);
        for m in matches.values() {
            match m.bracket_type {
                BracketType::Upper => {
                    let target = m.loser_next_match.expect("upper match without loser edge");
                    assert_eq!(matches[&target].bracket_type, BracketType::Lower);
                }
                _ => assert_eq!(m.loser_next_match, None),
            }
        }
    }
}

#[test]
fn four_player_wiring() {
    let (_, layout, matches) = built(4);
    let (u1, u2) = (layout.upper[&1][0], layout.upper[&1][1]);
    let upper_final = layout.upper[&2][0];
    let (l1, lower_final) = (layout.lower[&1][0], layout.lower[&2][0]);

    assert_eq!(matches[&u1].next_match, Some(upper_final));
    assert_eq!(matches[&u2].next_match, Some(upper_final));
    assert_eq!(matches[&u1].loser_next_match, Some(l1));
    assert_eq!(matches[&u2].loser_next_match, Some(l1));
    assert_eq!(matches[&upper_final].next_match, Some(layout.grand_final));
    assert_eq!(matches[&upper_final].loser_next_match, Some(lower_final));
    assert_eq!(matches[&l1].next_match, Some(lower_final));
    assert_eq!(matches[&lower_final].next_match, Some(layout.grand_final));
}

#[test]
fn create_tournament_seeds_the_shuffled_draw() {
    let store = Store::new();
    let ids: Vec<PlayerId> = store
        .transaction(|tx| {
            (0..8)
                .map(|i| register_player(tx, &format!("Player {i}"), &format!("#P{i}"), None).map(|p| p.id))
                .collect()
        })
        .unwrap();
    let new = NewTournament {
        name: "Spring Open".to_string(),
        description: None,
        start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        match_format: MatchFormat::Md5,
        player_ids: ids.clone(),
    };
    let mut rng = StdRng::seed_from_u64(7);
    let (tournament, layout) = store
        .transaction(|tx| create_tournament(tx, new, &mut rng))
        .unwrap();

    assert_eq!(tournament.status, TournamentStatus::Active);
    assert_eq!(tournament.player_count, 8);
    assert_eq!(store.tournament(tournament.id).unwrap(), Some(tournament.clone()));

    let participants = store.tournament_players(tournament.id).unwrap();
    let seeds: Vec<u32> = participants.iter().map(|p| p.seed).collect();
    assert_eq!(seeds, (1..=8).collect::<Vec<_>>());
    assert!(participants.iter().all(|p| p.status == ParticipantStatus::Active && p.final_placement.is_none()));
    let mut seen: Vec<PlayerId> = participants.iter().map(|p| p.player_id).collect();
    seen.sort();
    let mut expected = ids;
    expected.sort();
    assert_eq!(seen, expected);

    // seed order is the draw order: seeds 1 and 2 meet in the first upper match
    let first = store.get_match(layout.upper[&1][0]).unwrap().unwrap();
    assert_eq!(first.player_1, Some(participants[0].player_id));
    assert_eq!(first.player_2, Some(participants[1].player_id));
}

#[test]
fn create_tournament_rejects_unknown_player() {
    let store = Store::new();
    let mut ids: Vec<PlayerId> = store
        .transaction(|tx| {
            (0..3)
                .map(|i| register_player(tx, &format!("Player {i}"), &format!("#P{i}"), None).map(|p| p.id))
                .collect()
        })
        .unwrap();
    let stranger = Uuid::new_v4();
    ids.push(stranger);
    let new = NewTournament {
        name: "Ghost Cup".to_string(),
        description: None,
        start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        match_format: MatchFormat::Md3,
        player_ids: ids,
    };
    let result = store.transaction(|tx| create_tournament(tx, new, &mut StdRng::seed_from_u64(1)));
    assert_eq!(result.map(|_| ()), Err(TournamentError::PlayerNotFound(stranger)));
}

#[test]
fn matches_are_visible_inside_the_building_transaction() {
    let store = Store::new();
    let ids = players(4);
    let tournament_id = Uuid::new_v4();
    store
        .transaction(|tx| {
            let layout = build_bracket(tx, tournament_id, MatchFormat::Md7, &ids)?;
            assert!(tx.find_match(layout.grand_final).is_some());
            Ok(())
        })
        .unwrap();
}
