pub use crate::error::DatasetError;
pub use derivative::Derivative;
pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use image::{imageops::FilterType, GrayImage, Luma, Rgb, RgbImage};
pub use indexmap::{IndexMap, IndexSet};
pub use log::{debug, info, warn};
pub use ndarray::{s, Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};
pub use rand::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt,
    fmt::Debug,
    fs,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};
