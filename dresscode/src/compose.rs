//! Blend generated images with the ground-truth head.

use crate::{common::*, image_ops};

/// Label codes treated as the head when compositing.
pub const COMPOSE_HEAD_CODES: &[u8] = &[1, 2, 4, 13];

/// Keep the ground truth inside `head` and the generated image outside.
///
/// Both images are `[C, H, W]` arrays and `head` is `[H, W]`.
pub fn compose_with_head_mask(
    ground_truth: ArrayView3<f32>,
    generated: ArrayView3<f32>,
    head: ArrayView2<bool>,
) -> Result<Array3<f32>> {
    let (_, height, width) = ground_truth.dim();
    if ground_truth.dim() != generated.dim() || head.dim() != (height, width) {
        bail!(DatasetError::shape(format!(
            "cannot compose images of shapes {:?} and {:?} with a mask of shape {:?}",
            ground_truth.dim(),
            generated.dim(),
            head.dim()
        )));
    }

    let mut output = generated.to_owned();
    output
        .outer_iter_mut()
        .zip(ground_truth.outer_iter())
        .for_each(|(mut out_channel, gt_channel)| {
            Zip::from(&mut out_channel)
                .and(&gt_channel)
                .and(&head)
                .for_each(|value, &gt, &is_head| {
                    if is_head {
                        *value = gt;
                    }
                });
        });

    Ok(output)
}

/// Composite using the head region of a label map.
///
/// The generated image is an 8-bit color image and is scaled to `[0, 1]`.
pub fn compose_with_labels(
    ground_truth: ArrayView3<f32>,
    generated: &RgbImage,
    labels: ArrayView2<u8>,
) -> Result<Array3<f32>> {
    let head = labels.map(|label| COMPOSE_HEAD_CODES.contains(label));
    let generated = image_ops::rgb_to_unit(generated);
    compose_with_head_mask(ground_truth, generated.view(), head.view())
}
