//! Error kinds raised by dataset construction and sample extraction.
//!
//! Functions in this crate return [anyhow::Result]. Failures that callers may
//! want to tell apart carry a [DatasetError], which can be recovered with
//! `err.downcast_ref::<DatasetError>()`.

use crate::common::*;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Invalid option, category or output field. Raised at construction.
    #[error("configuration error: {0}")]
    Config(String),
    #[error("file not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },
    #[error("failed to parse '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
    #[error("shape error: {0}")]
    Shape(String),
    #[error("sample index {index} is out of range for a dataset of {len} samples")]
    Index { index: usize, len: usize },
    #[error("failed to decode image '{}'", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl DatasetError {
    pub fn config(reason: impl fmt::Display) -> Self {
        Self::Config(reason.to_string())
    }

    pub fn parse(path: impl AsRef<Path>, reason: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.as_ref().to_owned(),
            reason: reason.to_string(),
        }
    }

    pub fn shape(reason: impl fmt::Display) -> Self {
        Self::Shape(reason.to_string())
    }

    /// Find the dataset error in an [anyhow::Error] chain.
    pub fn find(error: &Error) -> Option<&Self> {
        error.chain().find_map(|cause| cause.downcast_ref::<Self>())
    }
}

/// Read a text file, reporting a missing file as [DatasetError::FileNotFound].
pub(crate) fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|err| io_error(path, err))
}

/// Open a file, reporting a missing file as [DatasetError::FileNotFound].
pub(crate) fn open_file(path: impl AsRef<Path>) -> Result<fs::File> {
    let path = path.as_ref();
    fs::File::open(path).map_err(|err| io_error(path, err))
}

fn io_error(path: &Path, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        DatasetError::FileNotFound {
            path: path.to_owned(),
        }
        .into()
    } else {
        Error::new(err).context(format!("failed to read '{}'", path.display()))
    }
}
