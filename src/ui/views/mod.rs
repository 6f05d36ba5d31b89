mod board_view;
mod status_bar;

pub use board_view::ChessBoardView;
pub use status_bar::render_status_bar;
