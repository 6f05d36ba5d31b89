mod promotion;
mod square;

pub use promotion::render_promotion_overlay;
pub use square::render_square;
