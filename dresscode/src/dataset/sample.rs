use crate::{category::Category, common::*, field::OutputField};

/// The value of one extracted field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Category(Category),
    /// Token ids of the caption and of the empty prompt.
    TokenIds { cond: Vec<i64>, uncond: Vec<i64> },
    /// A `[C, H, W]` float array.
    Tensor(Array3<f32>),
    Mask(Array2<bool>),
    /// Per-pixel label codes.
    Labels(Array2<u8>),
}

impl FieldValue {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<Category> {
        match *self {
            Self::Category(category) => Some(category),
            _ => None,
        }
    }

    pub fn token_ids(&self) -> Option<(&[i64], &[i64])> {
        match self {
            Self::TokenIds { cond, uncond } => Some((cond, uncond)),
            _ => None,
        }
    }

    pub fn tensor(&self) -> Option<&Array3<f32>> {
        match self {
            Self::Tensor(tensor) => Some(tensor),
            _ => None,
        }
    }

    pub fn mask(&self) -> Option<&Array2<bool>> {
        match self {
            Self::Mask(mask) => Some(mask),
            _ => None,
        }
    }

    pub fn labels(&self) -> Option<&Array2<u8>> {
        match self {
            Self::Labels(labels) => Some(labels),
            _ => None,
        }
    }
}

/// The requested fields of one sample, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    fields: IndexMap<OutputField, FieldValue>,
}

impl Sample {
    pub fn get(&self, field: OutputField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn contains(&self, field: OutputField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = OutputField> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OutputField, &FieldValue)> + '_ {
        self.fields.iter().map(|(&field, value)| (field, value))
    }

    pub fn into_inner(self) -> IndexMap<OutputField, FieldValue> {
        self.fields
    }

    pub fn text(&self, field: OutputField) -> Option<&str> {
        self.get(field)?.text()
    }

    pub fn tensor(&self, field: OutputField) -> Option<&Array3<f32>> {
        self.get(field)?.tensor()
    }

    pub fn mask(&self, field: OutputField) -> Option<&Array2<bool>> {
        self.get(field)?.mask()
    }

    pub fn labels(&self, field: OutputField) -> Option<&Array2<u8>> {
        self.get(field)?.labels()
    }
}

impl FromIterator<(OutputField, FieldValue)> for Sample {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (OutputField, FieldValue)>,
    {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
