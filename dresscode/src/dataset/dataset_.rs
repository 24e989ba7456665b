use super::{SampleIndex, Sample, PairRecord};
use crate::{
    caption::CaptionTable,
    common::*,
    config::DatasetConfig,
    field::{FieldSet, Stage},
    tokenizer::Tokenizer,
};
use label::LabelMap;

/// The dataset that can be random accessed.
pub trait RandomAccessDataset
where
    Self: Debug + Send + Sync,
{
    /// Get number of records in the dataset.
    fn num_records(&self) -> usize;

    /// Extract the nth sample in the dataset.
    fn nth(&self, index: usize) -> Result<Sample>;
}

/// The initializer of [DressCodeDataset].
#[derive(Derivative)]
#[derivative(Debug)]
pub struct DressCodeDatasetInit {
    pub config: DatasetConfig,
    /// Required when token ids are requested.
    #[derivative(Debug = "ignore")]
    pub tokenizer: Option<Arc<dyn Tokenizer>>,
    pub label_map: LabelMap,
}

impl DressCodeDatasetInit {
    pub fn build(self) -> Result<DressCodeDataset> {
        let Self {
            config,
            tokenizer,
            label_map,
        } = self;

        config.validate()?;
        let fields = FieldSet::new(config.outputs.iter().copied());

        if fields.requires(Stage::Tokenize) && tokenizer.is_none() {
            bail!(DatasetError::config(
                "a tokenizer is required to produce caption token ids"
            ));
        }

        let captions = CaptionTable::load(
            config.multimodal_root.join(&config.fine_captions),
            config.multimodal_root.join(&config.coarse_captions),
        )?;
        info!("loaded captions of {} garments", captions.len());

        let index = SampleIndex::build(&config, &captions)?;
        if index.is_empty() {
            warn!("the dataset has no samples");
        }

        Ok(DressCodeDataset {
            config,
            fields,
            captions,
            index,
            tokenizer,
            label_map,
        })
    }
}

/// The DressCode dataset with an immutable pairing index.
///
/// Samples are read from disk on every access. Only the stages required by
/// the requested fields are run.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct DressCodeDataset {
    pub(super) config: DatasetConfig,
    pub(super) fields: FieldSet,
    pub(super) captions: CaptionTable,
    pub(super) index: SampleIndex,
    #[derivative(Debug = "ignore")]
    pub(super) tokenizer: Option<Arc<dyn Tokenizer>>,
    pub(super) label_map: LabelMap,
}

impl DressCodeDataset {
    /// Build a dataset with the default DressCode label map.
    pub fn new(config: DatasetConfig, tokenizer: Option<Arc<dyn Tokenizer>>) -> Result<Self> {
        DressCodeDatasetInit {
            config,
            tokenizer,
            label_map: LabelMap::dresscode(),
        }
        .build()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn captions(&self) -> &CaptionTable {
        &self.captions
    }

    pub fn index(&self) -> &SampleIndex {
        &self.index
    }

    pub fn records(&self) -> &[PairRecord] {
        self.index.records()
    }

    /// Extract a sample using the thread-local random source.
    pub fn get(&self, index: usize) -> Result<Sample> {
        self.get_with_rng(index, &mut rand::thread_rng())
    }

    /// Extract a sample drawing caption order and sketch threshold from `rng`.
    pub fn get_with_rng<R>(&self, index: usize, rng: &mut R) -> Result<Sample>
    where
        R: Rng,
    {
        let record = self.index.get(index).ok_or(DatasetError::Index {
            index,
            len: self.len(),
        })?;

        self.extract(record, rng).with_context(|| {
            format!(
                "failed to extract sample {} ({}, {})",
                index, record.im_name, record.c_name
            )
        })
    }
}

impl RandomAccessDataset for DressCodeDataset {
    fn num_records(&self) -> usize {
        self.len()
    }

    fn nth(&self, index: usize) -> Result<Sample> {
        self.get(index)
    }
}
