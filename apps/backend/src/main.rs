use std::sync::Arc;

use actix::Actor;
use actix_web::{web, App, HttpServer};
use backend::config::{ServerConfig, Timings};
use backend::routes;
use backend::services::history::LogRecorder;
use backend::state::AppState;
use backend::ws::engine::Engine;
use backend::ws::hub::WsHub;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Bisca Backend on http://{}:{}",
        config.host, config.port
    );

    let hub = Arc::new(WsHub::new());
    let recorder = Arc::new(LogRecorder);
    let engine = Engine::new(Arc::clone(&hub), recorder, Timings::default()).start();

    let data = web::Data::new(AppState::new(engine, hub));

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
