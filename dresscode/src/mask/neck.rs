use crate::{
    common::*,
    pose::{Keypoint, LEFT_SHOULDER, RIGHT_SHOULDER},
};

/// Rows kept above the shoulder line at a 512 pixel output height.
pub const NECK_MARGIN: f64 = 20.0;

/// The least-squares line `y = m * x + c` through the two shoulders.
///
/// Shoulders sharing a column give the minimum-norm solution.
pub fn shoulder_line(right: &Keypoint, left: &Keypoint) -> (f64, f64) {
    if right.x != left.x {
        let m = (left.y - right.y) / (left.x - right.x);
        let c = right.y - m * right.x;
        (m, c)
    } else {
        let x = right.x;
        let mean_y = (right.y + left.y) / 2.0;
        let norm = x * x + 1.0;
        (mean_y * x / norm, mean_y / norm)
    }
}

/// Clear the head mask below the shoulder line, column by column.
///
/// A negative start row counts from the bottom of the column, so a line above
/// the image clears only the last rows. `points` must already be in output
/// coordinates.
pub fn cut_neck(head: &mut Array2<bool>, points: &[Keypoint]) -> Result<()> {
    let (right, left) = match (points.get(RIGHT_SHOULDER), points.get(LEFT_SHOULDER)) {
        (Some(right), Some(left)) => (right, left),
        _ => bail!(DatasetError::shape(format!(
            "expect shoulder keypoints to cut the neck, but get {} keypoints",
            points.len()
        ))),
    };

    let (height, width) = head.dim();
    let (m, c) = shoulder_line(right, left);
    let margin = NECK_MARGIN * (height as f64 / 512.0);

    (0..width).for_each(|col| {
        let y = col as f64 * m + c;
        if let Some(start) = cut_start((y - margin) as i64, height) {
            head.slice_mut(s![start.., col]).fill(false);
        }
    });

    Ok(())
}

/// The first cleared row of a column, with negative rows counted from the end.
fn cut_start(row: i64, height: usize) -> Option<usize> {
    let height = height as i64;
    let start = if row < 0 { (height + row).max(0) } else { row };
    (start < height).then(|| start as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn shoulders(right: (f64, f64), left: (f64, f64)) -> Vec<Keypoint> {
        let mut points = vec![Keypoint::new(0.0, 0.0); 8];
        points[RIGHT_SHOULDER] = Keypoint::new(right.0, right.1);
        points[LEFT_SHOULDER] = Keypoint::new(left.0, left.1);
        points
    }

    #[test]
    fn line_through_shoulders() {
        let (m, c) = shoulder_line(&Keypoint::new(10.0, 40.0), &Keypoint::new(30.0, 50.0));
        assert_abs_diff_eq!(m, 0.5);
        assert_abs_diff_eq!(c, 35.0);
    }

    #[test]
    fn vertical_shoulders() {
        let (m, c) = shoulder_line(&Keypoint::new(2.0, 10.0), &Keypoint::new(2.0, 20.0));
        assert_abs_diff_eq!(m * 2.0 + c, 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m, 6.0);
        assert_abs_diff_eq!(c, 3.0);
    }

    #[test]
    fn head_is_cut_below_the_line() {
        let mut head = Array2::from_elem((512, 8), true);
        let points = shoulders((0.0, 100.0), (7.0, 100.0));
        cut_neck(&mut head, &points).unwrap();

        assert!(head[[79, 3]]);
        assert!(!head[[80, 3]]);
        assert!(!head[[511, 0]]);
    }

    #[test]
    fn undetected_shoulders_clear_bottom_rows_only() {
        // margin is 2.5 rows at this height, so the cut starts at row -2
        let mut head = Array2::from_elem((64, 4), true);
        let points = shoulders((0.0, 0.0), (0.0, 0.0));
        cut_neck(&mut head, &points).unwrap();

        assert!(head.slice(s![..62, ..]).iter().all(|&set| set));
        assert!(head.slice(s![62.., ..]).iter().all(|&set| !set));
    }

    #[test]
    fn line_far_above_image_clears_column() {
        let mut head = Array2::from_elem((64, 4), true);
        let points = shoulders((0.0, -100.0), (3.0, -100.0));
        cut_neck(&mut head, &points).unwrap();
        assert!(head.iter().all(|&set| !set));
    }

    #[test]
    fn negative_rows_count_from_the_end() {
        assert_eq!(cut_start(5, 64), Some(5));
        assert_eq!(cut_start(64, 64), None);
        assert_eq!(cut_start(-2, 64), Some(62));
        assert_eq!(cut_start(-64, 64), Some(0));
        assert_eq!(cut_start(-500, 64), Some(0));
    }

    #[test]
    fn line_below_image_keeps_column() {
        let mut head = Array2::from_elem((64, 4), true);
        let points = shoulders((0.0, 500.0), (3.0, 500.0));
        cut_neck(&mut head, &points).unwrap();
        assert!(head.iter().all(|&set| set));
    }
}
