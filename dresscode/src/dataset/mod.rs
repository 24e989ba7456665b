//! The pairing index and per-sample extraction.

mod dataset_;
mod extract;
mod index;
mod sample;

pub use dataset_::*;
pub use index::*;
pub use sample::*;
