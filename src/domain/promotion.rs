//! Promotion picker: four clickable choices in the promoting pawn's colour.
//!
//! While a choice is pending only clicks that land inside one of the four
//! regions count; everything else is ignored.

use shakmaty::{Piece, Role};

use crate::domain::input::PointerPos;
use crate::domain::movegen::PROMOTION_ROLES;
use crate::domain::resolver::PendingPromotion;

pub const CHOICE_SIZE: f32 = 60.0;
pub const CHOICE_GAP: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChoiceRegion {
    pub role: Role,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl ChoiceRegion {
    pub fn contains(&self, pos: PointerPos) -> bool {
        pos.x >= self.x && pos.x < self.x + self.size && pos.y >= self.y && pos.y < self.y + self.size
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PromotionPicker {
    pending: PendingPromotion,
}

impl PromotionPicker {
    pub fn new(pending: PendingPromotion) -> Self {
        Self { pending }
    }

    pub fn pending(&self) -> PendingPromotion {
        self.pending
    }

    /// Queen, rook, bishop, knight - in the mover's colour
    pub fn choices(&self) -> [Piece; 4] {
        PROMOTION_ROLES.map(|role| Piece {
            color: self.pending.color,
            role,
        })
    }

    /// A row of four squares centred on `(center_x, center_y)`
    pub fn regions(&self, center_x: f32, center_y: f32) -> [ChoiceRegion; 4] {
        let x0 = center_x - 2.0 * CHOICE_SIZE - 1.5 * CHOICE_GAP;
        let y0 = center_y - CHOICE_SIZE / 2.0;
        let mut i = 0.0;
        PROMOTION_ROLES.map(|role| {
            let region = ChoiceRegion {
                role,
                x: x0 + i * (CHOICE_SIZE + CHOICE_GAP),
                y: y0,
                size: CHOICE_SIZE,
            };
            i += 1.0;
            region
        })
    }

    /// Which choice, if any, a click at `pos` selects
    pub fn hit_test(&self, pos: PointerPos, center_x: f32, center_y: f32) -> Option<Role> {
        self.regions(center_x, center_y)
            .into_iter()
            .find(|r| r.contains(pos))
            .map(|r| r.role)
    }
}
