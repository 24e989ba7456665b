use anyhow::{ensure, Result};
use clap::Parser;
use dresscode::{DatasetConfig, DressCodeDataset, FieldValue, OutputField};
use image::{GrayImage, Luma, Rgb, RgbImage};
use log::info;
use ndarray::{ArrayView2, ArrayView3, Axis};
use prettytable::{cell, row, Table};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Parser)]
enum Opts {
    /// Summarize the pairing index of a dataset.
    Info {
        /// configuration file
        config_file: PathBuf,
    },
    /// Write the fields of one sample as images.
    Dump {
        /// configuration file
        config_file: PathBuf,
        /// sample index
        index: usize,
        /// output directory
        output_dir: PathBuf,
        /// random seed for caption order and sketch threshold
        #[clap(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Opts::parse() {
        Opts::Info { config_file } => {
            info(config_file)?;
        }
        Opts::Dump {
            config_file,
            index,
            output_dir,
            seed,
        } => {
            dump(config_file, index, output_dir, seed)?;
        }
    }

    Ok(())
}

/// Open a dataset without a tokenizer, dropping token id outputs.
fn open_dataset(config_file: impl AsRef<Path>) -> Result<DressCodeDataset> {
    let mut config = DatasetConfig::open(config_file)?;
    config
        .outputs
        .retain(|&field| field != OutputField::Captions);
    DressCodeDataset::new(config, None)
}

fn info(config_file: impl AsRef<Path>) -> Result<()> {
    let dataset = open_dataset(config_file)?;
    let config = dataset.config();

    {
        let mut table = Table::new();
        table.add_row(row!["category", "pairs"]);
        dataset
            .index()
            .count_by_category()
            .iter()
            .for_each(|(category, count)| {
                table.add_row(row![category, count]);
            });
        table.add_row(row!["total", dataset.len()]);
        table.printstd();
    }

    {
        let outputs = dataset
            .fields()
            .fields()
            .map(|field| field.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let mut table = Table::new();
        table.add_row(row!["option", "value"]);
        table.add_row(row!["phase", config.phase.as_str()]);
        table.add_row(row!["order", config.order.as_str()]);
        table.add_row(row!["size", format!("{}x{}", config.height, config.width)]);
        table.add_row(row!["captioned garments", dataset.captions().len()]);
        table.add_row(row!["outputs", outputs]);
        table.printstd();
    }

    Ok(())
}

fn dump(
    config_file: impl AsRef<Path>,
    index: usize,
    output_dir: impl AsRef<Path>,
    seed: Option<u64>,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    let dataset = open_dataset(config_file)?;
    ensure!(
        index < dataset.len(),
        "index {} is out of range for {} samples",
        index,
        dataset.len()
    );

    let sample = match seed {
        Some(seed) => dataset.get_with_rng(index, &mut StdRng::seed_from_u64(seed))?,
        None => dataset.get(index)?,
    };
    fs::create_dir_all(output_dir)?;

    for (field, value) in sample.iter() {
        match value {
            FieldValue::Text(text) => println!("{}\t{}", field, text),
            FieldValue::Category(category) => println!("{}\t{}", field, category),
            FieldValue::TokenIds { cond, uncond } => {
                println!("{}\t{:?}\t{:?}", field, cond, uncond)
            }
            FieldValue::Tensor(tensor) => {
                if tensor.len_of(Axis(0)) == 3 {
                    let path = output_dir.join(format!("{}.png", field));
                    tensor_to_rgb(tensor.view()).save(&path)?;
                    info!("wrote '{}'", path.display());
                } else {
                    for (channel_index, channel) in tensor.outer_iter().enumerate() {
                        let path = output_dir.join(format!("{}_{}.png", field, channel_index));
                        channel_to_luma(channel).save(&path)?;
                        info!("wrote '{}'", path.display());
                    }
                }
            }
            FieldValue::Mask(mask) => {
                let path = output_dir.join(format!("{}.png", field));
                let image = GrayImage::from_fn(mask.ncols() as u32, mask.nrows() as u32, |x, y| {
                    Luma([if mask[[y as usize, x as usize]] { 255 } else { 0 }])
                });
                image.save(&path)?;
                info!("wrote '{}'", path.display());
            }
            FieldValue::Labels(labels) => {
                let path = output_dir.join(format!("{}.png", field));
                let image = GrayImage::from_fn(labels.ncols() as u32, labels.nrows() as u32, |x, y| {
                    Luma([labels[[y as usize, x as usize]]])
                });
                image.save(&path)?;
                info!("wrote '{}'", path.display());
            }
        }
    }

    Ok(())
}

/// Map values in `[-1, 1]` to an 8-bit color image.
fn tensor_to_rgb(tensor: ArrayView3<f32>) -> RgbImage {
    let (_, height, width) = tensor.dim();
    let to_u8 = |value: f32| (((value + 1.0) / 2.0).clamp(0.0, 1.0) * 255.0).round() as u8;

    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([
            to_u8(tensor[[0, y, x]]),
            to_u8(tensor[[1, y, x]]),
            to_u8(tensor[[2, y, x]]),
        ])
    })
}

/// Stretch a channel to the full 8-bit range.
fn channel_to_luma(channel: ArrayView2<f32>) -> GrayImage {
    let (height, width) = channel.dim();
    let min = channel.iter().copied().fold(f32::INFINITY, f32::min);
    let max = channel.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = if max > min { max - min } else { 1.0 };

    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let value = (channel[[y as usize, x as usize]] - min) / range;
        Luma([(value * 255.0).round() as u8])
    })
}
