//! Pixel bounding box types.
//!
//! Boxes here are inclusive on every side, which is the convention used when
//! a box is derived from the nonzero pixels of a mask.

mod common;

pub use rect::*;
pub mod rect;

pub use tlbr::*;
pub mod tlbr;

pub mod prelude {
    pub use crate::rect::{Rect, RectNum};
}
