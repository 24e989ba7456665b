pub use anyhow::{ensure, Result};
pub use num_traits::Num;
pub use std::ops::RangeInclusive;
