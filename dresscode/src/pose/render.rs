use super::{Keypoint, LEFT_SHOULDER, RIGHT_SHOULDER};
use crate::{common::*, image_ops};
use imageproc::{
    drawing::{draw_filled_ellipse_mut, draw_filled_rect_mut},
    rect::Rect,
};

/// Spread of the gaussian keypoint heatmaps in pixels.
pub const HEATMAP_SIGMA: f64 = 9.0;

/// The neck disc radius in multiples of the keypoint square radius.
const NECK_RADIUS_FACTOR: f64 = 4.0;

const WHITE: Luma<u8> = Luma([255]);

/// Square stamps of keypoints.
#[derive(Debug, Clone)]
pub struct PoseRendering {
    /// One map per keypoint, `[N, H, W]`.
    pub point_maps: Array3<bool>,
    /// All stamps in one map.
    pub im_pose: Array2<bool>,
    /// Discs around the shoulders.
    pub neck: Array2<bool>,
}

/// The keypoint square radius at the given output height.
pub fn stamp_radius(radius: f64, height: usize) -> f64 {
    radius * (height as f64 / 512.0)
}

/// Stamp a filled square of half size `r` for every visible keypoint.
///
/// `points` must already be in output coordinates.
pub fn render_pose(points: &[Keypoint], height: usize, width: usize, r: f64) -> PoseRendering {
    let (w, h) = (width as u32, height as u32);
    let mut im_pose = GrayImage::new(w, h);
    let mut neck = GrayImage::new(w, h);
    let mut point_maps = Array3::from_elem((points.len(), height, width), false);

    points.iter().enumerate().for_each(|(index, point)| {
        if !point.is_visible() {
            return;
        }

        let mut one_map = GrayImage::new(w, h);
        let rect = square(point, r);
        draw_filled_rect_mut(&mut one_map, rect, WHITE);
        draw_filled_rect_mut(&mut im_pose, rect, WHITE);

        if index == RIGHT_SHOULDER || index == LEFT_SHOULDER {
            let radius = (r * NECK_RADIUS_FACTOR) as i32;
            let center = (point.x as i32, point.y as i32);
            draw_filled_ellipse_mut(&mut neck, center, radius, radius, WHITE);
        }

        point_maps
            .index_axis_mut(Axis(0), index)
            .assign(&image_ops::luma_to_mask(&one_map));
    });

    PoseRendering {
        point_maps,
        im_pose: image_ops::luma_to_mask(&im_pose),
        neck: image_ops::luma_to_mask(&neck),
    }
}

fn square(point: &Keypoint, r: f64) -> Rect {
    let left = (point.x - r) as i32;
    let top = (point.y - r) as i32;
    let right = (point.x + r) as i32;
    let bottom = (point.y + r) as i32;
    Rect::at(left, top).of_size((right - left + 1) as u32, (bottom - top + 1) as u32)
}

/// Render one gaussian heatmap per keypoint as `[N, H, W]`.
///
/// Invisible keypoints give an all-zero channel.
pub fn gaussian_heatmaps(points: &[Keypoint], height: usize, width: usize, sigma: f64) -> Array3<f32> {
    let mut heatmaps = Array3::zeros((points.len(), height, width));
    let denom = 2.0 * sigma * sigma;

    heatmaps
        .outer_iter_mut()
        .zip(points)
        .filter(|(_, point)| point.is_visible())
        .for_each(|(mut heatmap, point)| {
            heatmap.indexed_iter_mut().for_each(|((y, x), value)| {
                let dx = x as f64 - point.x;
                let dy = y as f64 - point.y;
                *value = (-(dx * dx + dy * dy) / denom).exp() as f32;
            });
        });

    heatmaps
}
