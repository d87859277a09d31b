//! REST API over the bracket engine. `configure` registers every route on an actix `App`.

use crate::config::Config;
use crate::logic::{create_tournament, register_player, report_result, MatchReport, NewTournament};
use crate::models::{MatchFormat, PlayerId, TournamentError, TournamentId};
use crate::store::Store;
use actix_web::{
    get, post, put,
    web::{self, Data, Json, Path},
    HttpResponse, Responder,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RegisterPlayerBody {
    nickname: String,
    tag: String,
    #[serde(default)]
    clan: Option<String>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    description: Option<String>,
    /// Defaults to today.
    #[serde(default)]
    start_date: Option<NaiveDate>,
    /// Defaults to the configured format.
    #[serde(default)]
    match_format: Option<MatchFormat>,
    player_ids: Vec<PlayerId>,
}

#[derive(Deserialize)]
struct ReportResultBody {
    player_1_score: u32,
    player_2_score: u32,
    winner_id: PlayerId,
}

/// Path segment: resource id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct IdPath {
    id: Uuid,
}

/// Map an engine error to a JSON error response.
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string(), "kind": e.kind() });
    match e {
        TournamentError::MatchNotFound(_)
        | TournamentError::TournamentNotFound(_)
        | TournamentError::PlayerNotFound(_) => HttpResponse::NotFound().json(body),
        TournamentError::AlreadyCompleted(_) => HttpResponse::Conflict().json(body),
        _ if e.is_internal() => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-arena",
    })
}

/// Register a player (tag must be unique).
#[post("/api/players")]
async fn api_register_player(store: Data<Store>, body: Json<RegisterPlayerBody>) -> HttpResponse {
    let body = body.into_inner();
    match store.transaction(|tx| register_player(tx, &body.nickname, &body.tag, body.clan)) {
        Ok(player) => HttpResponse::Created().json(player),
        Err(e) => error_response(&e),
    }
}

#[get("/api/players/{id}")]
async fn api_get_player(store: Data<Store>, path: Path<IdPath>) -> HttpResponse {
    match store.player(path.id) {
        Ok(Some(player)) => HttpResponse::Ok().json(player),
        Ok(None) => error_response(&TournamentError::PlayerNotFound(path.id)),
        Err(e) => error_response(&e),
    }
}

/// Create a tournament: shuffle the draw, seed the players and build the bracket in one transaction.
#[post("/api/tournaments")]
async fn api_create_tournament(
    store: Data<Store>,
    config: Data<Config>,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let new = NewTournament {
        name: body.name,
        description: body.description,
        start_date: body.start_date.unwrap_or_else(|| Utc::now().date_naive()),
        match_format: body.match_format.unwrap_or(config.default_match_format),
        player_ids: body.player_ids,
    };
    match store.transaction(|tx| create_tournament(tx, new, &mut rand::thread_rng())) {
        Ok((tournament, bracket)) => {
            HttpResponse::Created().json(serde_json::json!({ "tournament": tournament, "bracket": bracket }))
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(store: Data<Store>, path: Path<IdPath>) -> HttpResponse {
    match store.tournament(path.id) {
        Ok(Some(tournament)) => HttpResponse::Ok().json(tournament),
        Ok(None) => error_response(&TournamentError::TournamentNotFound(path.id)),
        Err(e) => error_response(&e),
    }
}

/// All matches of a tournament, ordered by bracket, round and position.
#[get("/api/tournaments/{id}/matches")]
async fn api_tournament_matches(store: Data<Store>, path: Path<IdPath>) -> HttpResponse {
    let id: TournamentId = path.id;
    match store.tournament(id) {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(&TournamentError::TournamentNotFound(id)),
        Err(e) => return error_response(&e),
    }
    match store.tournament_matches(id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Participations (seed, status, placement, tournament stats) ordered by seed.
#[get("/api/tournaments/{id}/players")]
async fn api_tournament_players(store: Data<Store>, path: Path<IdPath>) -> HttpResponse {
    let id: TournamentId = path.id;
    match store.tournament(id) {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(&TournamentError::TournamentNotFound(id)),
        Err(e) => return error_response(&e),
    }
    match store.tournament_players(id) {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => error_response(&e),
    }
}

#[get("/api/matches/{id}")]
async fn api_get_match(store: Data<Store>, path: Path<IdPath>) -> HttpResponse {
    match store.get_match(path.id) {
        Ok(Some(m)) => HttpResponse::Ok().json(m),
        Ok(None) => error_response(&TournamentError::MatchNotFound(path.id)),
        Err(e) => error_response(&e),
    }
}

/// Report a match result and advance the bracket. Returns the updated match.
#[put("/api/matches/{id}/result")]
async fn api_report_result(store: Data<Store>, path: Path<IdPath>, body: Json<ReportResultBody>) -> HttpResponse {
    let report = MatchReport {
        player_1_score: body.player_1_score,
        player_2_score: body.player_2_score,
        winner: body.winner_id,
    };
    match store.transaction(|tx| report_result(tx, path.id, report, Utc::now())) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Register every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_register_player)
        .service(api_get_player)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_tournament_matches)
        .service(api_tournament_players)
        .service(api_get_match)
        .service(api_report_result);
}
