mod api;
mod blockchain;
mod checkout;
mod config;
mod error;

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{error, info};

use api::AppState;
use blockchain::{DifficultyController, Ledger, Miner};
use config::Settings;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let settings = Settings::from_env();
    info!("CONFIG - {settings:?}");

    // Genesis is created here, before the server accepts any append.
    let difficulty = Arc::new(DifficultyController::new(
        settings.initial_difficulty,
        settings.difficulty_step_interval,
    ));
    let miner = Miner::new(settings.max_mining_attempts);
    let ledger = Ledger::new(difficulty, miner, settings.append_retries).map_err(|e| {
        error!("failed to create genesis block: {e}");
        io::Error::other(e)
    })?;

    info!(
        "⛓️ Starting library ledger at http://{}:{}",
        settings.host, settings.port
    );

    let state = web::Data::new(AppState::new(ledger));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
