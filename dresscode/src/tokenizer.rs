//! The text tokenizer interface.

use crate::common::*;

/// A text tokenizer producing fixed-length token id sequences.
///
/// Implementations pad with their padding token and truncate so that every
/// returned sequence has exactly `max_length` ids.
pub trait Tokenizer
where
    Self: Send + Sync,
{
    /// The sequence length the model was trained with.
    fn model_max_length(&self) -> usize;

    fn encode(&self, text: &str, max_length: usize) -> Result<Vec<i64>>;
}

impl<T> Tokenizer for Arc<T>
where
    T: Tokenizer + ?Sized,
{
    fn model_max_length(&self) -> usize {
        (**self).model_max_length()
    }

    fn encode(&self, text: &str, max_length: usize) -> Result<Vec<i64>> {
        (**self).encode(text, max_length)
    }
}

/// Token ids of a caption and of the empty prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub cond: Vec<i64>,
    pub uncond: Vec<i64>,
}

/// Tokenize a caption and a matching empty prompt of the same length.
pub fn tokenize_prompt(tokenizer: &dyn Tokenizer, caption: &str) -> Result<TokenPair> {
    let cond = tokenizer.encode(caption, tokenizer.model_max_length())?;
    let max_length = cond.len();
    let uncond = tokenizer.encode("", max_length)?;

    if uncond.len() != max_length {
        bail!(DatasetError::shape(format!(
            "tokenizer returned {} ids for the empty prompt, expect {}",
            uncond.len(),
            max_length
        )));
    }

    Ok(TokenPair { cond, uncond })
}
