#![allow(dead_code)]

use anyhow::Result;
use dresscode::{Category, DatasetConfig, Phase, Tokenizer};
use image::{GrayImage, Luma, Rgb, RgbImage};
use serde_json::json;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

pub const HEIGHT: usize = 64;
pub const WIDTH: usize = 48;

/// Maps every word to its length, padding with zeros.
#[derive(Debug)]
pub struct WordLengthTokenizer {
    pub max_length: usize,
}

impl Tokenizer for WordLengthTokenizer {
    fn model_max_length(&self) -> usize {
        self.max_length
    }

    fn encode(&self, text: &str, max_length: usize) -> Result<Vec<i64>> {
        let mut ids: Vec<i64> = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|word| !word.is_empty())
            .map(|word| word.len() as i64)
            .take(max_length)
            .collect();
        ids.resize(max_length, 0);
        Ok(ids)
    }
}

/// A DressCode directory tree in a temporary directory.
#[derive(Debug)]
pub struct SyntheticDataset {
    pub dir: TempDir,
}

impl SyntheticDataset {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let dataset = Self { dir };
        fs::create_dir_all(dataset.dataroot())?;
        fs::create_dir_all(dataset.multimodal_root())?;
        Ok(dataset)
    }

    pub fn dataroot(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn multimodal_root(&self) -> PathBuf {
        self.dir.path().join("multimodal")
    }

    pub fn config(&self, phase: Phase) -> DatasetConfig {
        let mut config = DatasetConfig::new(self.dataroot(), self.multimodal_root(), phase);
        config.height = HEIGHT;
        config.width = WIDTH;
        config
    }

    pub fn write_captions(&self, fine: serde_json::Value, coarse: serde_json::Value) -> Result<()> {
        let root = self.multimodal_root();
        fs::write(root.join("fine_captions.json"), fine.to_string())?;
        fs::write(root.join("coarse_captions.json"), coarse.to_string())?;
        Ok(())
    }

    /// Write a pairing file of a category.
    pub fn write_pairs(&self, category: Category, file_name: &str, pairs: &[(&str, &str)]) -> Result<()> {
        let dir = self.dataroot().join(category.to_string());
        fs::create_dir_all(&dir)?;
        let text: String = pairs
            .iter()
            .map(|(im_name, c_name)| format!("{} {}\n", im_name, c_name))
            .collect();
        fs::write(dir.join(file_name), text)?;
        Ok(())
    }

    /// Write every file a sample of `im_name` and `c_name` refers to.
    ///
    /// The label map holds the category garment in a block at the middle and a
    /// hair block at the top. Both arms are detected beside the garment.
    pub fn write_sample_files(&self, category: Category, im_name: &str, c_name: &str) -> Result<()> {
        let dataroot = self.dataroot().join(category.to_string());
        let multimodal_root = self.multimodal_root().join(category.to_string());
        for dir in [
            dataroot.join("images"),
            dataroot.join("label_maps"),
            dataroot.join("keypoints"),
            dataroot.join("skeletons"),
            dataroot.join("dense"),
            multimodal_root.join("im_sketch"),
            multimodal_root.join("im_sketch_unpaired"),
            multimodal_root.join("test_stitchmap"),
        ] {
            fs::create_dir_all(dir)?;
        }

        let (width, height) = (WIDTH as u32, HEIGHT as u32);
        let person = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 5) as u8, (y * 3) as u8, 128]));
        person.save(dataroot.join("images").join(im_name))?;
        RgbImage::from_pixel(width, height, Rgb([200, 30, 30])).save(dataroot.join("images").join(c_name))?;
        RgbImage::from_pixel(width, height, Rgb([0, 0, 0]))
            .save(dataroot.join("skeletons").join(im_name.replace("_0.jpg", "_5.jpg")))?;

        let garment = category.rule().label;
        let labels = GrayImage::from_fn(width, height, |x, y| {
            let code = if y < 8 && (16..32).contains(&x) {
                2
            } else if (24..44).contains(&y) && (12..36).contains(&x) {
                garment
            } else {
                0
            };
            Luma([code])
        });
        labels.save(dataroot.join("label_maps").join(im_name.replace("_0.jpg", "_4.png")))?;
        labels.save(dataroot.join("dense").join(im_name.replace("_0.jpg", "_5.png")))?;

        // keypoints in the 384x512 reference frame, 8x the output size
        let mut keypoints = vec![[0.0, 0.0, 0.0, 0.0]; 18];
        keypoints[0] = [192.0, 40.0, 0.9, 0.0];
        keypoints[2] = [120.0, 150.0, 0.9, 2.0];
        keypoints[3] = [100.0, 250.0, 0.9, 3.0];
        keypoints[4] = [96.0, 340.0, 0.9, 4.0];
        keypoints[5] = [264.0, 150.0, 0.9, 5.0];
        keypoints[6] = [284.0, 250.0, 0.9, 6.0];
        keypoints[7] = [288.0, 340.0, 0.9, 7.0];
        fs::write(
            dataroot.join("keypoints").join(im_name.replace("_0.jpg", "_2.json")),
            json!({ "keypoints": keypoints }).to_string(),
        )?;

        let sketch = GrayImage::from_fn(width, height, |x, _| Luma([if x < WIDTH as u32 / 2 { 10 } else { 240 }]));
        sketch.save(multimodal_root.join("im_sketch").join(c_name.replace(".jpg", ".png")))?;
        sketch.save(multimodal_root.join("im_sketch_unpaired").join(format!(
            "{}_{}",
            im_name.replace(".jpg", ""),
            c_name.replace(".jpg", ".png")
        )))?;

        let stitch = GrayImage::from_fn(width, height, |_, y| Luma([if y == 30 { 13 } else { 0 }]));
        stitch.save(multimodal_root.join("test_stitchmap").join(im_name.replace(".jpg", ".png")))?;

        Ok(())
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::remove_file(self.dir.path().join(path))?;
        Ok(())
    }
}
