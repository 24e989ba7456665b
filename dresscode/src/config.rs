//! Dataset configuration.

use crate::{category::Category, common::*, field::OutputField};

/// Dataset split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Train,
    Test,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
        }
    }
}

/// Whether test garments are the ones worn in the person image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairOrder {
    Paired,
    Unpaired,
}

impl PairOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paired => "paired",
            Self::Unpaired => "unpaired",
        }
    }
}

/// The dataset options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The directory containing one folder per category.
    pub dataroot: PathBuf,
    /// The directory with captions, sketches and stitch maps.
    pub multimodal_root: PathBuf,
    pub phase: Phase,
    /// If positive, the maximum number of pairs loaded per category.
    #[serde(default)]
    pub num_test_images: usize,
    /// Half size of keypoint squares at 512 pixels of height.
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Caption file with detailed captions, relative to the multimodal root.
    #[serde(default = "default_fine_captions")]
    pub fine_captions: PathBuf,
    /// Caption file merged over the detailed captions.
    #[serde(default = "default_coarse_captions")]
    pub coarse_captions: PathBuf,
    /// Inclusive range of the random sketch binarization threshold.
    #[serde(default = "default_sketch_threshold")]
    pub sketch_threshold: (u8, u8),
    #[serde(default = "default_order")]
    pub order: PairOrder,
    #[serde(default = "OutputField::defaults")]
    pub outputs: Vec<OutputField>,
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_width")]
    pub width: usize,
}

impl DatasetConfig {
    /// Create a configuration with default options.
    pub fn new(dataroot: impl AsRef<Path>, multimodal_root: impl AsRef<Path>, phase: Phase) -> Self {
        Self {
            dataroot: dataroot.as_ref().to_owned(),
            multimodal_root: multimodal_root.as_ref().to_owned(),
            phase,
            num_test_images: 0,
            radius: default_radius(),
            fine_captions: default_fine_captions(),
            coarse_captions: default_coarse_captions(),
            sketch_threshold: default_sketch_threshold(),
            order: default_order(),
            outputs: OutputField::defaults(),
            categories: default_categories(),
            height: default_height(),
            width: default_width(),
        }
    }

    /// Load a JSON5 configuration file.
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = crate::error::read_to_string(path)?;
        let config: Self = json5::from_str(&text).map_err(|err| {
            DatasetError::config(format!("invalid config file '{}': {}", path.display(), err))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            radius,
            sketch_threshold: (min_threshold, max_threshold),
            ref categories,
            height,
            width,
            ..
        } = *self;

        if !(radius >= 0.0 && radius.is_finite()) {
            bail!(DatasetError::config(format!(
                "radius must be non-negative, but get {}",
                radius
            )));
        }
        if min_threshold > max_threshold {
            bail!(DatasetError::config(format!(
                "invalid sketch threshold range {}..={}",
                min_threshold, max_threshold
            )));
        }
        if categories.is_empty() {
            bail!(DatasetError::config("at least one category is required"));
        }
        if height < 16 || width < 16 {
            bail!(DatasetError::config(format!(
                "output size must be at least 16x16, but get {}x{}",
                height, width
            )));
        }

        Ok(())
    }

    /// The pairing file name for the configured phase and order.
    pub fn pairs_file_name(&self) -> String {
        match self.phase {
            Phase::Train => format!("{}_pairs.txt", self.phase.as_str()),
            Phase::Test => format!("{}_pairs_{}.txt", self.phase.as_str(), self.order.as_str()),
        }
    }

    /// The positive per-category sample limit, if any.
    pub fn sample_limit(&self) -> Option<usize> {
        (self.num_test_images > 0).then(|| self.num_test_images)
    }
}

fn default_radius() -> f64 {
    5.0
}

fn default_fine_captions() -> PathBuf {
    "fine_captions.json".into()
}

fn default_coarse_captions() -> PathBuf {
    "coarse_captions.json".into()
}

fn default_sketch_threshold() -> (u8, u8) {
    (20, 127)
}

fn default_order() -> PairOrder {
    PairOrder::Paired
}

fn default_categories() -> Vec<Category> {
    vec![Category::Dresses, Category::UpperBody, Category::LowerBody]
}

fn default_height() -> usize {
    512
}

fn default_width() -> usize {
    384
}
