mod engine;
mod game;

pub use engine::UciEngine;
pub use game::{DragView, GameModel, PromotionChoiceView};
