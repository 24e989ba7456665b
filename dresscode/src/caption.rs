//! Garment captions.

use crate::common::*;

/// Detailed caption lists shorter than this are discarded.
pub const MIN_FINE_CAPTIONS: usize = 3;

/// Caption lists keyed by garment identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionTable {
    captions: HashMap<String, Vec<String>>,
}

impl CaptionTable {
    /// Load the detailed and coarse caption files and merge them.
    pub fn load(fine_file: impl AsRef<Path>, coarse_file: impl AsRef<Path>) -> Result<Self> {
        let fine = load_caption_file(fine_file)?;
        let coarse = load_caption_file(coarse_file)?;
        Ok(Self::merge(fine, coarse))
    }

    /// Merge caption tables.
    ///
    /// Detailed entries with fewer than [MIN_FINE_CAPTIONS] captions are
    /// dropped. Coarse entries then overwrite detailed ones on conflict.
    pub fn merge(
        fine: HashMap<String, Vec<String>>,
        coarse: HashMap<String, Vec<String>>,
    ) -> Self {
        let mut captions: HashMap<_, _> = fine
            .into_iter()
            .filter(|(_, captions)| captions.len() >= MIN_FINE_CAPTIONS)
            .collect();
        captions.extend(coarse);
        Self { captions }
    }

    pub fn get(&self, garment_id: &str) -> Option<&[String]> {
        self.captions.get(garment_id).map(|captions| captions.as_slice())
    }

    pub fn contains(&self, garment_id: &str) -> bool {
        self.captions.contains_key(garment_id)
    }

    /// Look up the captions of a garment file name.
    pub fn for_garment(&self, c_name: &str) -> Option<&[String]> {
        self.get(garment_id(c_name))
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }
}

/// The garment identifier of a garment file name, e.g. `013563` for `013563_1.jpg`.
pub fn garment_id(c_name: &str) -> &str {
    c_name.split_once('_').map_or(c_name, |(id, _)| id)
}

/// Join captions for prompting.
pub fn join_captions(captions: &[String]) -> String {
    captions.join(", ")
}

fn load_caption_file(path: impl AsRef<Path>) -> Result<HashMap<String, Vec<String>>> {
    let path = path.as_ref();
    let text = crate::error::read_to_string(path)?;
    let table = serde_json::from_str(&text).map_err(|err| DatasetError::parse(path, err))?;
    Ok(table)
}
