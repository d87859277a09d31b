//! Single binary web server for the bracket engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DEFAULT_MATCH_FORMAT.

use actix_web::{get, web::Data, App, HttpResponse, HttpServer};
use bracket_arena::{api, Config, Store};

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!(
        "Starting server at http://{}:{} (default format {})",
        bind.0,
        bind.1,
        config.default_match_format
    );

    let store = Data::new(Store::new());
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(config.clone())
            .service(favicon)
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
