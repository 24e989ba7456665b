use crate::common::*;

/// Width of the frame keypoint files are annotated in.
pub const REFERENCE_WIDTH: f64 = 384.0;
/// Height of the frame keypoint files are annotated in.
pub const REFERENCE_HEIGHT: f64 = 512.0;

pub const RIGHT_SHOULDER: usize = 2;
pub const RIGHT_ELBOW: usize = 3;
pub const RIGHT_WRIST: usize = 4;
pub const LEFT_SHOULDER: usize = 5;
pub const LEFT_ELBOW: usize = 6;
pub const LEFT_WRIST: usize = 7;

/// The number of keypoints needed to draw both arms.
pub const MIN_ARM_KEYPOINTS: usize = LEFT_WRIST + 1;

/// A body keypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
    pub id: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            confidence: 0.0,
            id: 0.0,
        }
    }

    /// Undetected points are stored near the origin.
    pub fn is_missing(&self) -> bool {
        self.x <= 1.0 && self.y <= 1.0
    }

    /// Whether the point is drawn into heatmaps.
    pub fn is_visible(&self) -> bool {
        self.x > 1.0 && self.y > 1.0
    }

    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// The keypoints of one person, in the reference frame.
#[derive(Debug, Clone, PartialEq)]
pub struct KeypointRecord {
    points: Vec<Keypoint>,
}

#[derive(Debug, Deserialize)]
struct KeypointFile {
    keypoints: KeypointList,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeypointList {
    Nested(Vec<Vec<f64>>),
    Flat(Vec<f64>),
}

impl KeypointRecord {
    pub fn new(points: Vec<Keypoint>) -> Self {
        Self { points }
    }

    /// Load a keypoint file with a `keypoints` list of `[x, y, confidence, id]` entries.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = crate::error::read_to_string(path)?;
        let file: KeypointFile =
            serde_json::from_str(&text).map_err(|err| DatasetError::parse(path, err))?;

        let values: Vec<f64> = match file.keypoints {
            KeypointList::Flat(values) => values,
            KeypointList::Nested(rows) => {
                if let Some(row) = rows.iter().find(|row| row.len() != 4) {
                    bail!(DatasetError::parse(
                        path,
                        format!("expect 4 values per keypoint, but get {}", row.len())
                    ));
                }
                rows.into_iter().flatten().collect()
            }
        };

        Self::from_flat(&values).map_err(|reason| DatasetError::parse(path, reason).into())
    }

    /// Group a flat list of values into keypoints of 4 values each.
    pub fn from_flat(values: &[f64]) -> Result<Self, String> {
        if values.len() % 4 != 0 {
            return Err(format!(
                "the number of keypoint values {} is not a multiple of 4",
                values.len()
            ));
        }

        let points = values
            .chunks_exact(4)
            .map(|chunk| Keypoint {
                x: chunk[0],
                y: chunk[1],
                confidence: chunk[2],
                id: chunk[3],
            })
            .collect();
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Keypoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Map the points from the reference frame to a `height` x `width` image.
    pub fn rescale(&self, height: usize, width: usize) -> Vec<Keypoint> {
        let sx = width as f64 / REFERENCE_WIDTH;
        let sy = height as f64 / REFERENCE_HEIGHT;

        self.points
            .iter()
            .map(|point| Keypoint {
                x: point.x * sx,
                y: point.y * sy,
                ..*point
            })
            .collect()
    }
}
