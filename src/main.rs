mod app;
mod config;
mod domain;
mod models;
mod ui;

use anyhow::Context as _;
use gpui::{App, Application};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::domain::GameBoard;
use crate::models::UciEngine;
use crate::ui::FileAssets;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load();

    let board = match &settings.start_fen {
        Some(fen) => GameBoard::from_fen(fen).with_context(|| format!("invalid start_fen {:?}", fen))?,
        None => GameBoard::new(),
    };

    let engine = UciEngine::spawn(&settings.engine)
        .with_context(|| format!("could not start engine {}", settings.engine.path.display()))?;
    info!(move_time_ms = settings.engine.move_time_ms, "starting game");

    Application::new()
        .with_assets(FileAssets::new())
        .run(move |cx: &mut App| app::run(cx, &settings, board, engine));
    Ok(())
}
