//! The closed vocabulary of sample fields and the stages that produce them.

use crate::common::*;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A named output of sample extraction.
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
pub enum OutputField {
    /// File name of the in-shop garment.
    #[serde(rename = "c_name")]
    #[strum(serialize = "c_name")]
    CName,
    /// File name of the person image.
    ImName,
    /// In-shop garment image in [-1, 1].
    Cloth,
    /// Person image in [-1, 1].
    Image,
    /// Person image with everything but the worn garment set to white.
    ImCloth,
    /// Blurred body silhouette.
    Shape,
    /// Person image with everything but the head set to black.
    ImHead,
    /// Square keypoint stamps, for visualization.
    ImPose,
    /// Gaussian keypoint heatmaps.
    PoseMap,
    /// The resized human parsing map.
    ParseArray,
    /// DensePose part labels.
    DenseLabels,
    /// Precomputed skeleton rendering.
    Skeleton,
    /// Person image with the inpainting region blanked.
    ImMask,
    /// The region the generator may fill.
    InpaintMask,
    /// Parsing codes restricted to the kept region.
    ParseMaskTotal,
    /// Binarized garment sketch.
    ImSketch,
    /// Tokenized captions and the unconditional prompt.
    Captions,
    /// Joined caption text.
    OriginalCaptions,
    Category,
    Hands,
    #[serde(rename = "parse_head_2")]
    #[strum(serialize = "parse_head_2")]
    ParseHead2,
    StitchLabel,
}

/// A unit of work during extraction. Fields declare the stages they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Caption,
    Tokenize,
    Image,
    Cloth,
    Sketch,
    Parse,
    Stitch,
    Dense,
    Skeleton,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Caption => "caption",
            Self::Tokenize => "tokenize",
            Self::Image => "image",
            Self::Cloth => "cloth",
            Self::Sketch => "sketch",
            Self::Parse => "parse",
            Self::Stitch => "stitch",
            Self::Dense => "dense",
            Self::Skeleton => "skeleton",
        }
    }
}

impl OutputField {
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| DatasetError::config(format!("unknown output field '{}'", name)).into())
    }

    /// The stages this field depends on.
    pub fn stages(self) -> &'static [Stage] {
        use OutputField as F;

        match self {
            F::CName | F::ImName | F::Category => &[],
            F::Cloth => &[Stage::Cloth],
            F::Image => &[Stage::Image],
            F::ImCloth | F::ImHead | F::ImMask => &[Stage::Image, Stage::Parse],
            F::Shape
            | F::ImPose
            | F::PoseMap
            | F::ParseArray
            | F::InpaintMask
            | F::ParseMaskTotal
            | F::Hands
            | F::ParseHead2 => &[Stage::Parse],
            F::DenseLabels => &[Stage::Dense],
            F::Skeleton => &[Stage::Skeleton],
            F::ImSketch => &[Stage::Sketch],
            F::Captions => &[Stage::Caption, Stage::Tokenize],
            F::OriginalCaptions => &[Stage::Caption],
            F::StitchLabel => &[Stage::Stitch],
        }
    }

    /// The fields produced when no field list is configured.
    pub fn defaults() -> Vec<Self> {
        use OutputField as F;

        vec![
            F::CName,
            F::ImName,
            F::Image,
            F::ImCloth,
            F::Shape,
            F::PoseMap,
            F::ParseArray,
            F::ImMask,
            F::InpaintMask,
            F::ParseMaskTotal,
            F::ImSketch,
            F::Captions,
            F::OriginalCaptions,
            F::Category,
            F::StitchLabel,
        ]
    }
}

/// The requested fields together with the stages they require.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    fields: IndexSet<OutputField>,
    stages: BTreeSet<Stage>,
}

impl FieldSet {
    pub fn new(fields: impl IntoIterator<Item = OutputField>) -> Self {
        let fields: IndexSet<_> = fields.into_iter().collect();
        let stages: BTreeSet<_> = fields
            .iter()
            .flat_map(|field| field.stages().iter().cloned())
            .collect();
        Self { fields, stages }
    }

    /// Build a field set from names, rejecting names outside the vocabulary.
    pub fn from_names<S>(names: impl IntoIterator<Item = S>) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let fields: Vec<_> = names
            .into_iter()
            .map(|name| OutputField::from_name(name.as_ref()))
            .collect::<Result<_>>()?;
        Ok(Self::new(fields))
    }

    pub fn contains(&self, field: OutputField) -> bool {
        self.fields.contains(&field)
    }

    pub fn requires(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    /// Fields in request order, without duplicates.
    pub fn fields(&self) -> impl Iterator<Item = OutputField> + '_ {
        self.fields.iter().cloned()
    }

    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.stages.iter().cloned()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::new(OutputField::defaults())
    }
}
