mod config;
mod queue;
mod script;
mod session;
mod store;
mod writes;

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::Config;
use crate::script::ScriptError;
use crate::session::BoardSession;
use crate::store::MemoryStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to load .env");
        }
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}

/// Seed the store, open the board, replay the script, print the final scene.
async fn run() -> Result<(), ScriptError> {
    let config = Config::from_env();
    let board_id = config.board_id.unwrap_or_else(Uuid::new_v4);

    let notes = match &config.snapshot {
        Some(path) => script::load_snapshot(path).await?,
        None => Vec::new(),
    };
    let store = Arc::new(MemoryStore::seeded([], notes));
    store.add_board(board_id).await;

    let mut session = BoardSession::new(store, &config);
    session.open_board(board_id).await?;

    let applied = match std::env::args().nth(1) {
        Some(path) => {
            let file = tokio::fs::File::open(&path).await?;
            script::replay(&mut session, BufReader::new(file)).await?
        }
        None => script::replay(&mut session, BufReader::new(tokio::io::stdin())).await?,
    };
    session.settle().await;

    let scene = serde_json::to_string_pretty(&session.engine().scene()).map_err(ScriptError::Encode)?;
    println!("{scene}");

    tracing::info!(%board_id, events = applied, "noteboard replay finished");
    session.close().await;
    Ok(())
}
