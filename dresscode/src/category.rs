//! Garment categories and their mask rules.

use crate::common::*;
use label::BodyPart;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The garment category of a sample, named after its dataset folder.
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
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Dresses,
    UpperBody,
    LowerBody,
}

impl Category {
    /// Parse a category folder name.
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse().map_err(|_| {
            DatasetError::config(format!(
                "unknown category '{}', expect one of dresses, upper_body, lower_body",
                name
            ))
            .into()
        })
    }

    pub fn rule(self) -> CategoryRule {
        match self {
            Self::Dresses => CategoryRule {
                category: self,
                label: 7,
                garment_codes: &[7, 12, 13],
                fixed_parts: &[],
                fold_arms: true,
                cut_neck: true,
            },
            Self::UpperBody => CategoryRule {
                category: self,
                label: 4,
                garment_codes: &[4],
                fixed_parts: &[BodyPart::Skirt, BodyPart::Pants],
                fold_arms: true,
                cut_neck: true,
            },
            Self::LowerBody => CategoryRule {
                category: self,
                label: 6,
                garment_codes: &[6, 12, 13],
                fixed_parts: &[
                    BodyPart::UpperClothes,
                    BodyPart::LeftArm,
                    BodyPart::RightArm,
                ],
                fold_arms: false,
                cut_neck: false,
            },
        }
    }
}

/// Category-specific parameters of the inpainting mask derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    /// The parsing code of the garment itself.
    pub label: u8,
    /// Codes of the region the new garment may occupy.
    pub garment_codes: &'static [u8],
    /// Parts that must be kept in addition to the common fixed parts.
    pub fixed_parts: &'static [BodyPart],
    /// Whether drawn arms join the garment region and hands join the fixed region.
    pub fold_arms: bool,
    /// Whether the neck is removed from the head mask along the shoulder line.
    pub cut_neck: bool,
}
