use super::{
    Keypoint, LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST, MIN_ARM_KEYPOINTS, RIGHT_ELBOW,
    RIGHT_SHOULDER, RIGHT_WRIST,
};
use crate::{common::*, image_ops};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_polygon_mut},
    point::Point,
};

/// Stroke width of the arm polyline in pixels.
pub const ARM_LINE_WIDTH: f64 = 45.0;

const WHITE: Luma<u8> = Luma([255]);

/// Select the arm joints to connect, skipping the undetected extremities.
///
/// The chain runs from the left wrist over both shoulders to the right
/// wrist. A missing wrist drops that side's wrist, and a missing wrist
/// together with a missing elbow drops the elbow too. The right side is
/// examined first, so only one side is ever trimmed.
pub fn arm_chain(points: &[Keypoint]) -> Result<Vec<Keypoint>> {
    if points.len() < MIN_ARM_KEYPOINTS {
        bail!(DatasetError::shape(format!(
            "expect at least {} keypoints to draw arms, but get {}",
            MIN_ARM_KEYPOINTS,
            points.len()
        )));
    }

    let pick = |indices: &[usize]| indices.iter().map(|&index| points[index]).collect();

    let chain = if points[RIGHT_WRIST].is_missing() {
        if points[RIGHT_ELBOW].is_missing() {
            pick(&[LEFT_WRIST, LEFT_ELBOW, LEFT_SHOULDER, RIGHT_SHOULDER])
        } else {
            pick(&[
                LEFT_WRIST,
                LEFT_ELBOW,
                LEFT_SHOULDER,
                RIGHT_SHOULDER,
                RIGHT_ELBOW,
            ])
        }
    } else if points[LEFT_WRIST].is_missing() {
        if points[LEFT_ELBOW].is_missing() {
            pick(&[LEFT_SHOULDER, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST])
        } else {
            pick(&[
                LEFT_ELBOW,
                LEFT_SHOULDER,
                RIGHT_SHOULDER,
                RIGHT_ELBOW,
                RIGHT_WRIST,
            ])
        }
    } else {
        pick(&[
            LEFT_WRIST,
            LEFT_ELBOW,
            LEFT_SHOULDER,
            RIGHT_SHOULDER,
            RIGHT_ELBOW,
            RIGHT_WRIST,
        ])
    };

    Ok(chain)
}

/// Draw the arm region of a `height` x `width` image.
///
/// `points` must already be in output coordinates.
pub fn draw_arms(points: &[Keypoint], height: usize, width: usize) -> Result<Array2<bool>> {
    let chain = arm_chain(points)?;
    let vertices: Vec<(f64, f64)> = chain
        .iter()
        .map(|point| (point.x as u16 as f64, point.y as u16 as f64))
        .collect();

    let mut canvas = GrayImage::new(width as u32, height as u32);
    draw_polyline(&mut canvas, &vertices, ARM_LINE_WIDTH);
    Ok(image_ops::luma_to_mask(&canvas))
}

/// Stroke a polyline of the given width with round joins and flat ends.
///
/// Joins are drawn only where the direction changes.
pub fn draw_polyline(canvas: &mut GrayImage, vertices: &[(f64, f64)], line_width: f64) {
    let half = line_width / 2.0;

    vertices.windows(2).for_each(|segment| {
        if let Some(quad) = segment_quad(segment[0], segment[1], half) {
            draw_polygon_mut(canvas, &quad, WHITE);
        }
    });

    vertices.windows(3).for_each(|joint| {
        let (prev, center, next) = (joint[0], joint[1], joint[2]);
        if heading(prev, center) != heading(center, next) {
            let center = (center.0.round() as i32, center.1.round() as i32);
            draw_filled_circle_mut(canvas, center, half as i32, WHITE);
        }
    });
}

/// The corners of a segment thickened by `half` on both sides.
fn segment_quad(from: (f64, f64), to: (f64, f64), half: f64) -> Option<[Point<i32>; 4]> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return None;
    }
    let (nx, ny) = (-dy / length * half, dx / length * half);
    let corner = |(x, y): (f64, f64), sign: f64| {
        Point::new((x + sign * nx).round() as i32, (y + sign * ny).round() as i32)
    };
    let quad = [
        corner(from, 1.0),
        corner(to, 1.0),
        corner(to, -1.0),
        corner(from, -1.0),
    ];
    (quad[0] != quad[3]).then(|| quad)
}

/// Segment direction in degrees, clockwise from up. Zero-length segments point up.
fn heading(from: (f64, f64), to: (f64, f64)) -> f64 {
    (to.0 - from.0)
        .atan2(from.1 - to.1)
        .to_degrees()
        .rem_euclid(360.0)
}
