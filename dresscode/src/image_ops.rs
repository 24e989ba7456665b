//! Image decoding, resizing and conversion to arrays.
//!
//! Color images are converted to CHW arrays normalized with mean 0.5 and
//! standard deviation 0.5 per channel, which maps `0..=255` onto `[-1, 1]`.

use crate::{
    common::*,
    error::{self, DatasetError},
};
use image::{imageops, DynamicImage};

/// Per-channel mean and standard deviation for normalization.
pub const NORMALIZE_MEAN: f32 = 0.5;
pub const NORMALIZE_STD: f32 = 0.5;

/// The body silhouette is blurred by resizing to this fraction and back.
pub const SHAPE_DOWNSAMPLE: usize = 16;

pub fn open_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    if !path.is_file() {
        bail!(DatasetError::FileNotFound {
            path: path.to_owned()
        });
    }
    let image = image::open(path).map_err(|err| DatasetError::Decode {
        path: path.to_owned(),
        source: Box::new(err),
    })?;
    Ok(image)
}

/// Load a color image resized to `height` x `width` with bilinear filtering.
pub fn load_rgb(path: impl AsRef<Path>, height: usize, width: usize) -> Result<RgbImage> {
    let image = open_image(path)?.to_rgb8();
    Ok(resize_rgb(&image, height, width))
}

/// Load a grayscale image resized to `height` x `width` with bilinear filtering.
pub fn load_luma(path: impl AsRef<Path>, height: usize, width: usize) -> Result<GrayImage> {
    let image = open_image(path)?.to_luma8();
    Ok(resize_luma(&image, height, width))
}

pub fn resize_rgb(image: &RgbImage, height: usize, width: usize) -> RgbImage {
    if image.dimensions() == (width as u32, height as u32) {
        return image.clone();
    }
    imageops::resize(image, width as u32, height as u32, FilterType::Triangle)
}

pub fn resize_luma(image: &GrayImage, height: usize, width: usize) -> GrayImage {
    if image.dimensions() == (width as u32, height as u32) {
        return image.clone();
    }
    imageops::resize(image, width as u32, height as u32, FilterType::Triangle)
}

/// Convert a color image to a `[3, H, W]` array in `[-1, 1]`.
pub fn rgb_to_normalized(image: &RgbImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn((3, height as usize, width as usize), |(c, y, x)| {
        let value = image.get_pixel(x as u32, y as u32)[c];
        normalize(value)
    })
}

/// Convert a color image to a `[3, H, W]` array in `[0, 1]`.
pub fn rgb_to_unit(image: &RgbImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn((3, height as usize, width as usize), |(c, y, x)| {
        image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    })
}

/// Convert a grayscale image to a `[1, H, W]` array in `[-1, 1]`.
pub fn luma_to_normalized(image: &GrayImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn((1, height as usize, width as usize), |(_, y, x)| {
        normalize(image.get_pixel(x as u32, y as u32)[0])
    })
}

fn normalize(value: u8) -> f32 {
    (value as f32 / 255.0 - NORMALIZE_MEAN) / NORMALIZE_STD
}

/// Nonzero pixels of a grayscale image.
pub fn luma_to_mask(image: &GrayImage) -> Array2<bool> {
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        image.get_pixel(x as u32, y as u32)[0] > 0
    })
}

/// Render a mask as a black and white image.
pub fn mask_to_luma(mask: ArrayView2<bool>) -> GrayImage {
    let (height, width) = mask.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        if mask[[y as usize, x as usize]] {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Binarize an ink-on-white sketch.
///
/// The sketch is inverted so that ink is bright, thresholded with
/// `p > threshold`, scaled to `[0, 1]` and inverted back. The result is a
/// `[1, H, W]` array where ink is `0.0` and paper is `1.0`.
pub fn binarize_sketch(sketch: &GrayImage, threshold: u8) -> Array3<f32> {
    let mut inverted = sketch.clone();
    imageops::invert(&mut inverted);

    let (width, height) = inverted.dimensions();
    Array3::from_shape_fn((1, height as usize, width as usize), |(_, y, x)| {
        let value = inverted.get_pixel(x as u32, y as u32)[0];
        let binary = if value > threshold { 255u8 } else { 0 };
        1.0 - binary as f32 / 255.0
    })
}

/// Blur a body mask into a coarse silhouette in `[-1, 1]` with shape `[1, H, W]`.
pub fn shape_from_mask(mask: ArrayView2<bool>) -> Array3<f32> {
    let (height, width) = mask.dim();
    let image = mask_to_luma(mask);
    let small = imageops::resize(
        &image,
        (width / SHAPE_DOWNSAMPLE) as u32,
        (height / SHAPE_DOWNSAMPLE) as u32,
        FilterType::Triangle,
    );
    let restored = imageops::resize(&small, width as u32, height as u32, FilterType::Triangle);
    luma_to_normalized(&restored)
}

/// Keep `image` where `mask` is set and write `fill` elsewhere.
pub fn masked_image(image: ArrayView3<f32>, mask: ArrayView2<bool>, fill: f32) -> Array3<f32> {
    let mut output = image.to_owned();
    output.outer_iter_mut().for_each(|mut channel| {
        Zip::from(&mut channel).and(&mask).for_each(|value, &keep| {
            if !keep {
                *value = fill;
            }
        });
    });
    output
}

/// Load a single-channel label image keeping the raw per-pixel codes.
///
/// Palette images yield palette indices and multi-channel images yield their
/// first channel.
pub fn load_labels(path: impl AsRef<Path>) -> Result<Array2<u8>> {
    let path = path.as_ref();
    let decode_error = |err: png::DecodingError| DatasetError::Decode {
        path: path.to_owned(),
        source: Box::new(err),
    };

    let file = error::open_file(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let (info, mut reader) = decoder.read_info().map_err(decode_error)?;
    let mut buf = vec![0; info.buffer_size()];
    reader.next_frame(&mut buf).map_err(decode_error)?;

    let height = info.height as usize;
    let width = info.width as usize;
    let samples = info.color_type.samples();
    let bits = info.bit_depth as u8 as usize;
    let line_size = info.line_size;

    let mut labels = Array2::zeros((height, width));
    for ((y, x), label) in labels.indexed_iter_mut() {
        let row = &buf[(y * line_size)..((y + 1) * line_size)];
        *label = match bits {
            8 => row[x * samples],
            16 => {
                let offset = x * samples * 2;
                let value = u16::from_be_bytes([row[offset], row[offset + 1]]);
                u8::try_from(value).map_err(|_| {
                    DatasetError::parse(path, format!("label code {} exceeds 255", value))
                })?
            }
            1 | 2 | 4 => {
                let offset = x * bits;
                let shift = 8 - bits - offset % 8;
                let mask = (1u8 << bits) - 1;
                (row[offset / 8] >> shift) & mask
            }
            _ => bail!(DatasetError::parse(
                path,
                format!("unsupported bit depth {}", bits)
            )),
        };
    }

    Ok(labels)
}

/// Load a label image resized with nearest-neighbor sampling.
pub fn load_labels_resized(
    path: impl AsRef<Path>,
    height: usize,
    width: usize,
) -> Result<Array2<u8>> {
    let labels = load_labels(path)?;
    Ok(resize_nearest(labels.view(), height, width))
}

/// Label code of garment stitches in stitch maps.
pub const STITCH_CODE: u8 = 13;

/// Load the stitch pixels of a stitch map.
pub fn load_stitch_label(path: impl AsRef<Path>, height: usize, width: usize) -> Result<Array2<bool>> {
    let labels = load_labels_resized(path, height, width)?;
    Ok(labels.map(|&code| code == STITCH_CODE))
}

/// Nearest-neighbor resize, sampling the source pixel under each target pixel center.
pub fn resize_nearest(labels: ArrayView2<u8>, height: usize, width: usize) -> Array2<u8> {
    let (src_h, src_w) = labels.dim();
    if (src_h, src_w) == (height, width) {
        return labels.to_owned();
    }

    let image = GrayImage::from_fn(src_w as u32, src_h as u32, |x, y| {
        Luma([labels[[y as usize, x as usize]]])
    });
    let resized = imageops::resize(&image, width as u32, height as u32, FilterType::Nearest);
    Array2::from_shape_fn((height, width), |(y, x)| {
        resized.get_pixel(x as u32, y as u32)[0]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalization_range() {
        let image = RgbImage::from_fn(2, 1, |x, _| Rgb([if x == 0 { 0 } else { 255 }; 3]));
        let array = rgb_to_normalized(&image);
        assert_eq!(array.dim(), (3, 1, 2));
        assert_abs_diff_eq!(array[[0, 0, 0]], -1.0);
        assert_abs_diff_eq!(array[[2, 0, 1]], 1.0);
    }

    #[test]
    fn sketch_threshold_extremes() {
        // gray strokes on gray paper, no pure white
        let sketch = GrayImage::from_fn(4, 4, |x, _| Luma([if x < 2 { 40 } else { 200 }]));

        let all_ink = binarize_sketch(&sketch, 0);
        assert!(all_ink.iter().all(|&value| value == 0.0));

        let no_ink = binarize_sketch(&sketch, 255);
        assert!(no_ink.iter().all(|&value| value == 1.0));

        let split = binarize_sketch(&sketch, 127);
        assert_eq!(split[[0, 0, 0]], 0.0);
        assert_eq!(split[[0, 0, 3]], 1.0);
    }

    #[test]
    fn nearest_resize_keeps_codes() {
        let labels = Array2::from_shape_fn((4, 4), |(y, x)| (y * 4 + x) as u8);
        let down = resize_nearest(labels.view(), 2, 2);
        assert_eq!(down, ndarray::arr2(&[[5, 7], [13, 15]]));

        let up = resize_nearest(labels.view(), 8, 8);
        assert_eq!(up[[0, 0]], 0);
        assert_eq!(up[[1, 1]], 0);
        assert_eq!(up[[2, 3]], 5);
        assert_eq!(up[[7, 7]], 15);

        let odd = resize_nearest(labels.view(), 3, 3);
        assert_eq!(odd, ndarray::arr2(&[[0, 2, 3], [8, 10, 11], [12, 14, 15]]));
        assert!(up.iter().all(|code| labels.iter().any(|orig| orig == code)));
    }

    #[test]
    fn label_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.png");
        let image = GrayImage::from_fn(5, 3, |x, y| Luma([(x + y * 5) as u8]));
        image.save(&path).unwrap();

        let labels = load_labels(&path).unwrap();
        assert_eq!(labels.dim(), (3, 5));
        assert_eq!(labels[[2, 4]], 14);
        assert_eq!(labels[[1, 0]], 5);
    }

    #[test]
    fn missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rgb(dir.path().join("absent.jpg"), 8, 8).unwrap_err();
        assert!(matches!(
            DatasetError::find(&err),
            Some(DatasetError::FileNotFound { .. })
        ));
        let err = load_labels(dir.path().join("absent.png")).unwrap_err();
        assert!(matches!(
            DatasetError::find(&err),
            Some(DatasetError::FileNotFound { .. })
        ));
    }

    #[test]
    fn masked_fill() {
        let image = Array3::from_elem((3, 2, 2), 0.25f32);
        let mask = ndarray::arr2(&[[true, false], [false, true]]);
        let output = masked_image(image.view(), mask.view(), -1.0);
        assert_eq!(output[[1, 0, 0]], 0.25);
        assert_eq!(output[[1, 0, 1]], -1.0);
        assert_eq!(output[[2, 1, 1]], 0.25);
    }

    #[test]
    fn silhouette_of_full_mask() {
        let mask = Array2::from_elem((32, 32), true);
        let shape = shape_from_mask(mask.view());
        assert_eq!(shape.dim(), (1, 32, 32));
        shape
            .iter()
            .for_each(|&value| assert_abs_diff_eq!(value, 1.0, epsilon = 1e-2));
    }
}
