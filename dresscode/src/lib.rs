//! Sample loading and feature engineering for the DressCode virtual try-on dataset.
//!
//! The [dataset] module builds the pairing index and extracts per-sample
//! fields. The mask and pose math it relies on lives in [mask] and [pose],
//! and [compose] blends generated images back with ground-truth heads.

mod common;
pub mod caption;
pub mod category;
pub mod compose;
pub mod config;
pub mod dataset;
pub mod error;
pub mod field;
pub mod image_ops;
pub mod mask;
pub mod pose;
pub mod profiling;
#[cfg(feature = "tch")]
pub mod tensor;
pub mod tokenizer;

pub use caption::CaptionTable;
pub use category::{Category, CategoryRule};
pub use config::{DatasetConfig, PairOrder, Phase};
pub use dataset::{
    DressCodeDataset, DressCodeDatasetInit, FieldValue, PairRecord, RandomAccessDataset, Sample,
    SampleIndex,
};
pub use error::DatasetError;
pub use field::{FieldSet, OutputField};
pub use label::{BodyPart, LabelMap};
pub use tokenizer::Tokenizer;
