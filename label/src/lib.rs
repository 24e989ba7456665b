//! Body-part label codes of human parsing maps.
//!
//! A parsing map stores one integer code per pixel. [BodyPart] names the
//! parts and [LabelMap] resolves a part to the code used by a particular
//! annotation set.

use anyhow::{ensure, format_err, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// Semantic body parts in the 18-class human parsing layout.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum BodyPart {
    Background = 0,
    Hat = 1,
    Hair = 2,
    Sunglasses = 3,
    UpperClothes = 4,
    Skirt = 5,
    Pants = 6,
    Dress = 7,
    Belt = 8,
    LeftShoe = 9,
    RightShoe = 10,
    Head = 11,
    LeftLeg = 12,
    RightLeg = 13,
    LeftArm = 14,
    RightArm = 15,
    Bag = 16,
    Scarf = 17,
}

impl BodyPart {
    /// The code of this part in the DressCode parsing maps.
    pub fn default_code(self) -> u8 {
        self as u8
    }
}

/// Read-only lookup from body parts to per-pixel codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    codes: [u8; BodyPart::COUNT],
}

impl LabelMap {
    /// The label table shipped with the DressCode annotations.
    pub fn dresscode() -> Self {
        let mut codes = [0; BodyPart::COUNT];
        BodyPart::iter().for_each(|part| {
            codes[part as usize] = part.default_code();
        });
        Self { codes }
    }

    /// Build a table from explicit `(part, code)` pairs.
    ///
    /// Every body part must be assigned exactly once.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (BodyPart, u8)>) -> Result<Self> {
        let mut assigned: HashMap<BodyPart, u8> = HashMap::new();

        for (part, code) in pairs {
            let prev = assigned.insert(part, code);
            ensure!(prev.is_none(), "body part '{}' is assigned twice", part);
        }

        let missing: Vec<_> = BodyPart::iter()
            .filter(|part| !assigned.contains_key(part))
            .map(|part| part.to_string())
            .collect();
        ensure!(
            missing.is_empty(),
            "these body parts have no label code: {:?}",
            missing
        );

        let mut codes = [0; BodyPart::COUNT];
        assigned.into_iter().for_each(|(part, code)| {
            codes[part as usize] = code;
        });

        Ok(Self { codes })
    }

    /// Build a table from `name -> code` entries, such as a parsed JSON object.
    pub fn from_names<'a>(entries: impl IntoIterator<Item = (&'a str, u8)>) -> Result<Self> {
        let pairs: Vec<_> = entries
            .into_iter()
            .map(|(name, code)| -> Result<_> {
                let part: BodyPart = name
                    .parse()
                    .map_err(|_| format_err!("unknown body part name '{}'", name))?;
                Ok((part, code))
            })
            .collect::<Result<_>>()?;
        Self::from_pairs(pairs)
    }

    pub fn code(&self, part: BodyPart) -> u8 {
        self.codes[part as usize]
    }

    pub fn code_of(&self, name: &str) -> Result<u8> {
        let part: BodyPart = name
            .parse()
            .map_err(|_| format_err!("unknown body part name '{}'", name))?;
        Ok(self.code(part))
    }

    /// Resolve a list of parts to their codes.
    pub fn codes(&self, parts: &[BodyPart]) -> Vec<u8> {
        parts.iter().map(|&part| self.code(part)).collect()
    }
}

impl Default for LabelMap {
    fn default() -> Self {
        Self::dresscode()
    }
}
