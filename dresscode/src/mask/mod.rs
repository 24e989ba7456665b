//! Segmentation mask arithmetic for garment inpainting.

mod neck;
mod ops;
mod parse;

pub use neck::*;
pub use ops::*;
pub use parse::*;
