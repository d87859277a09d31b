//! HTTP tests: register players, open a tournament and report results through the REST API.

use actix_web::{http::StatusCode, test, web::Data, App};
use bracket_arena::{api, Config, Match, MatchFormat, Store};
use serde_json::{json, Value};

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(Data::new(Store::new()))
                .app_data(Data::new(Config {
                    default_match_format: MatchFormat::Md5,
                    ..Config::default()
                }))
                .configure(api::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn health_reports_ok() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ok"], json!(true));
}

#[actix_web::test]
async fn duplicate_tag_is_rejected() {
    let app = app!();
    let register = |tag: &str| {
        test::TestRequest::post()
            .uri("/api/players")
            .set_json(json!({ "nickname": "Someone", "tag": tag }))
            .to_request()
    };
    let resp = test::call_service(&app, register("#ABC")).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = test::call_service(&app, register("#abc")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], json!("duplicate_player_tag"));
}

#[actix_web::test]
async fn tournament_flow_over_http() {
    let app = app!();

    let mut player_ids = Vec::new();
    for i in 0..4 {
        let req = test::TestRequest::post()
            .uri("/api/players")
            .set_json(json!({ "nickname": format!("Player {i}"), "tag": format!("#{i}") }))
            .to_request();
        let player: Value = test::call_and_read_body_json(&app, req).await;
        player_ids.push(player["id"].clone());
    }

    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(json!({ "name": "Friday Night", "start_date": "2026-10-23", "player_ids": player_ids }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["tournament"]["match_format"], json!("MD5"));
    assert_eq!(created["tournament"]["status"], json!("active"));
    let tid = created["tournament"]["id"].as_str().unwrap().to_string();
    let first_match = created["bracket"]["upper"]["1"][0].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournaments/{}/matches", tid))
        .to_request();
    let matches: Vec<Match> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(matches.len(), 3 + 2 + 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournaments/{}/players", tid))
        .to_request();
    let players: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(players.len(), 4);
    assert_eq!(players[0]["seed"], json!(1));

    let req = test::TestRequest::get()
        .uri(&format!("/api/matches/{}", first_match))
        .to_request();
    let m: Match = test::call_and_read_body_json(&app, req).await;
    let winner = m.player_1.unwrap();

    let result = |p1: u32, p2: u32| {
        test::TestRequest::put()
            .uri(&format!("/api/matches/{}/result", first_match))
            .set_json(json!({ "player_1_score": p1, "player_2_score": p2, "winner_id": winner }))
            .to_request()
    };

    // MD5 needs three wins
    let resp = test::call_service(&app, result(2, 0)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], json!("invalid_score"));

    let resp = test::call_service(&app, result(3, 1)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let done: Match = test::read_body_json(resp).await;
    assert_eq!(done.winner, Some(winner));
    assert!(done.completed_at.is_some());

    let resp = test::call_service(&app, result(3, 1)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn bad_field_size_and_unknown_ids() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/tournaments")
        .set_json(json!({ "name": "Tiny", "player_ids": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], json!("invalid_field_count"));

    let unknown = uuid::Uuid::new_v4();
    let req = test::TestRequest::put()
        .uri(&format!("/api/matches/{}/result", unknown))
        .set_json(json!({ "player_1_score": 2, "player_2_score": 0, "winner_id": unknown }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], json!("match_not_found"));

    for (uri, kind) in [
        (format!("/api/tournaments/{}", unknown), "tournament_not_found"),
        (format!("/api/tournaments/{}/matches", unknown), "tournament_not_found"),
        (format!("/api/tournaments/{}/players", unknown), "tournament_not_found"),
        (format!("/api/matches/{}", unknown), "match_not_found"),
        (format!("/api/players/{}", unknown), "player_not_found"),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], json!(kind), "{}", uri);
    }
}
