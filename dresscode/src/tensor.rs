//! Conversion of extracted fields to `tch` tensors.

use crate::{common::*, dataset::FieldValue};
use tch::{kind::Element, Tensor};

fn to_tensor<T, D>(array: &ndarray::Array<T, D>) -> Tensor
where
    T: Element + Copy,
    D: ndarray::Dimension,
{
    let values: Vec<T> = array.iter().copied().collect();
    let shape: Vec<i64> = array.shape().iter().map(|&size| size as i64).collect();
    Tensor::of_slice(&values).view(shape.as_slice())
}

impl FieldValue {
    /// Convert an array-valued field to a tensor of the same shape.
    ///
    /// Token ids become a `[2, L]` tensor of the caption and the empty prompt.
    /// Text and category fields have no tensor form.
    pub fn to_tensor(&self) -> Option<Tensor> {
        let tensor = match self {
            Self::Text(_) | Self::Category(_) => return None,
            Self::TokenIds { cond, uncond } => {
                let cond = Tensor::of_slice(cond);
                let uncond = Tensor::of_slice(uncond);
                Tensor::stack(&[cond, uncond], 0)
            }
            Self::Tensor(array) => to_tensor(array),
            Self::Mask(mask) => to_tensor(mask),
            Self::Labels(labels) => to_tensor(labels),
        };
        Some(tensor)
    }
}
