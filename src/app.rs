//! Application setup and window creation.

use gpui::{App, Bounds, WindowBounds, WindowOptions, prelude::*, px, size};
use gpui_component::Root;
use tracing::{error, info};

use crate::config::Settings;
use crate::domain::GameBoard;
use crate::models::{GameModel, UciEngine};
use crate::ui::theme::{INITIAL_BOARD_PANEL, STATUS_BAR_HEIGHT};
use crate::ui::views::ChessBoardView;

/// Initialize and run the chess application
pub fn run(cx: &mut App, settings: &Settings, board: GameBoard, engine: UciEngine) {
    gpui_component::init(cx);

    let budget = settings.engine.move_time();
    let model = cx.new(|cx| {
        let mut game = GameModel::new(board, engine, budget);
        // Black to move in the starting position means the engine opens
        game.schedule_engine_turn(cx);
        game
    });

    // closing the window ends the game and the engine with it
    let closing = model.clone();
    cx.on_window_closed(move |cx| {
        info!("window closed");
        closing.update(cx, |game, _| game.quit());
        cx.quit();
    })
    .detach();

    let bounds = Bounds::centered(
        None,
        size(px(INITIAL_BOARD_PANEL), px(INITIAL_BOARD_PANEL + STATUS_BAR_HEIGHT)),
        cx,
    );
    let opened = cx.open_window(
        WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        },
        |window, cx| {
            let view = cx.new(|cx| ChessBoardView::new(model, cx));
            cx.new(|cx| Root::new(view, window, cx))
        },
    );
    if let Err(e) = opened {
        error!("failed to open window: {:#}", e);
        cx.quit();
    }
}
