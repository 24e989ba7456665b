use crate::{common::*, image_ops};
use bbox::TLBR;
use imageproc::{distance_transform::Norm, morphology};

/// Side length of the dilation structuring element.
pub const DILATION_KERNEL: usize = 5;
/// Number of dilation passes applied to the garment region.
pub const DILATION_ITERATIONS: usize = 5;

/// Pixels whose label is one of `codes`.
pub fn codes_mask(labels: ArrayView2<u8>, codes: &[u8]) -> Array2<bool> {
    labels.map(|label| codes.contains(label))
}

/// Morphological dilation with a `kernel` x `kernel` all-ones element.
///
/// Pixels outside the image count as unset.
pub fn dilate(mask: ArrayView2<bool>, kernel: usize, iterations: usize) -> Array2<bool> {
    let radius = (kernel / 2) as u8;
    let mut image = image_ops::mask_to_luma(mask);
    (0..iterations).for_each(|_| {
        image = morphology::dilate(&image, Norm::LInf, radius);
    });
    image_ops::luma_to_mask(&image)
}

/// The inclusive bounding box of the set pixels, or `None` for an empty mask.
pub fn bounding_box(mask: ArrayView2<bool>) -> Option<TLBR<usize>> {
    mask.indexed_iter()
        .filter(|(_, set)| **set)
        .fold(None, |bbox, ((y, x), _)| match bbox {
            None => Some(TLBR::from_point(y, x)),
            Some(mut bbox) => {
                bbox.extend_to(y, x);
                Some(bbox)
            }
        })
}

/// Convert a mask to a `[1, H, W]` array of zeros and ones.
pub fn mask_to_f32(mask: ArrayView2<bool>) -> Array3<f32> {
    mask.map(|&set| if set { 1.0 } else { 0.0 })
        .insert_axis(Axis(0))
}
