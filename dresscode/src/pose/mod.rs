//! Body keypoints and their rasterizations.

mod arms;
mod keypoints;
mod render;

pub use arms::*;
pub use keypoints::*;
pub use render::*;
