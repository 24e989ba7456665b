use crate::{
    caption::{self, CaptionTable},
    category::Category,
    common::*,
    config::{DatasetConfig, PairOrder, Phase},
    error,
};

/// A person image paired with a garment image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRecord {
    pub im_name: String,
    pub c_name: String,
    pub category: Category,
    /// The category folder under the data root.
    pub dataroot: PathBuf,
    /// The category folder under the multimodal root.
    pub multimodal_root: PathBuf,
}

impl PairRecord {
    pub fn garment_id(&self) -> &str {
        caption::garment_id(&self.c_name)
    }

    pub fn image_path(&self) -> PathBuf {
        self.dataroot.join("images").join(&self.im_name)
    }

    pub fn cloth_path(&self) -> PathBuf {
        self.dataroot.join("images").join(&self.c_name)
    }

    pub fn label_map_path(&self) -> PathBuf {
        self.dataroot
            .join("label_maps")
            .join(self.im_name.replace("_0.jpg", "_4.png"))
    }

    pub fn keypoints_path(&self) -> PathBuf {
        self.dataroot
            .join("keypoints")
            .join(self.im_name.replace("_0.jpg", "_2.json"))
    }

    pub fn skeleton_path(&self) -> PathBuf {
        self.dataroot
            .join("skeletons")
            .join(self.im_name.replace("_0.jpg", "_5.jpg"))
    }

    pub fn dense_path(&self) -> PathBuf {
        self.dataroot
            .join("dense")
            .join(self.im_name.replace("_0.jpg", "_5.png"))
    }

    /// The garment sketch. Unpaired test samples use sketches keyed by both names.
    pub fn sketch_path(&self, phase: Phase, order: PairOrder) -> PathBuf {
        let sketch_name = self.c_name.replace(".jpg", ".png");

        match (phase, order) {
            (Phase::Test, PairOrder::Unpaired) => self.multimodal_root.join("im_sketch_unpaired").join(
                format!("{}_{}", self.im_name.replace(".jpg", ""), sketch_name),
            ),
            _ => self.multimodal_root.join("im_sketch").join(sketch_name),
        }
    }

    pub fn stitch_map_path(&self) -> PathBuf {
        self.multimodal_root
            .join("test_stitchmap")
            .join(self.im_name.replace(".jpg", ".png"))
    }
}

/// The ordered list of pairs of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleIndex {
    records: Vec<PairRecord>,
}

impl SampleIndex {
    /// Read the pairing files of every configured category.
    ///
    /// Pairs whose garment has no captions are skipped. With a positive
    /// `num_test_images`, at most that many pairs are kept per category.
    pub fn build(config: &DatasetConfig, captions: &CaptionTable) -> Result<Self> {
        let pairs_file_name = config.pairs_file_name();
        let limit = config.sample_limit();
        let mut records = vec![];

        for &category in &config.categories {
            let dataroot = config.dataroot.join(category.to_string());
            let multimodal_root = config.multimodal_root.join(category.to_string());
            let pairs_file = dataroot.join(&pairs_file_name);

            let reader = BufReader::new(error::open_file(&pairs_file)?);
            let mut num_kept = 0;
            let mut num_dropped = 0;

            for (line_no, line) in reader.lines().enumerate() {
                if limit.map_or(false, |limit| num_kept >= limit) {
                    break;
                }

                let line = line
                    .with_context(|| format!("failed to read '{}'", pairs_file.display()))?;
                let (im_name, c_name) = match parse_pair_line(&line) {
                    Ok(Some(pair)) => pair,
                    Ok(None) => continue,
                    Err(reason) => bail!(DatasetError::parse(
                        &pairs_file,
                        format!("line {}: {}", line_no + 1, reason)
                    )),
                };

                if !captions.contains(caption::garment_id(&c_name)) {
                    num_dropped += 1;
                    continue;
                }

                records.push(PairRecord {
                    im_name,
                    c_name,
                    category,
                    dataroot: dataroot.clone(),
                    multimodal_root: multimodal_root.clone(),
                });
                num_kept += 1;
            }

            if num_dropped > 0 {
                debug!(
                    "skipped {} pairs without captions in '{}'",
                    num_dropped,
                    pairs_file.display()
                );
            }
            info!("loaded {} {} pairs", num_kept, category);
        }

        Ok(Self { records })
    }

    pub fn from_records(records: Vec<PairRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PairRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&PairRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn im_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|record| record.im_name.as_str())
    }

    pub fn c_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|record| record.c_name.as_str())
    }

    pub fn dataroots(&self) -> impl Iterator<Item = &Path> + '_ {
        self.records.iter().map(|record| record.dataroot.as_path())
    }

    /// The number of pairs per category, in index order.
    pub fn count_by_category(&self) -> IndexMap<Category, usize> {
        let mut counts = IndexMap::new();
        self.records.iter().for_each(|record| {
            *counts.entry(record.category).or_insert(0) += 1;
        });
        counts
    }
}

/// Split a pairing line into the person and garment image names.
///
/// Blank lines yield `None`.
pub fn parse_pair_line(line: &str) -> Result<Option<(String, String)>, String> {
    let tokens: Vec<_> = line.split_whitespace().collect();

    match *tokens.as_slice() {
        [] => Ok(None),
        [im_name, c_name] => Ok(Some((im_name.to_owned(), c_name.to_owned()))),
        _ => Err(format!(
            "expect a person image name and a garment image name, but get {} tokens",
            tokens.len()
        )),
    }
}
