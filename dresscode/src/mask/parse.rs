use super::{bounding_box, codes_mask, cut_neck, dilate, DILATION_ITERATIONS, DILATION_KERNEL};
use crate::{category::CategoryRule, common::*, pose};
use bbox::{prelude::*, TLBR};
use label::{BodyPart, LabelMap};

/// Label codes making up the head region.
pub const HEAD_CODES: &[u8] = &[1, 2, 3, 11];
/// Label codes of both arms.
pub const ARM_CODES: &[u8] = &[14, 15];

/// Parts that are never inpainted regardless of the category.
pub const FIXED_PARTS: &[BodyPart] = &[
    BodyPart::Hair,
    BodyPart::LeftShoe,
    BodyPart::RightShoe,
    BodyPart::Hat,
    BodyPart::Sunglasses,
    BodyPart::Scarf,
    BodyPart::Bag,
];

/// The masks derived from a label map, all of the label map's size.
#[derive(Debug, Clone)]
pub struct ParseMasks {
    /// The garment label code of the category.
    pub label: u8,
    /// Every labeled body part.
    pub parse_shape: Array2<bool>,
    pub parse_head: Array2<bool>,
    /// The head with the neck removed.
    pub parse_head_2: Array2<bool>,
    /// Pixels labeled as the garment itself.
    pub parse_cloth: Array2<bool>,
    /// The changeable region left after removing the dilated garment region.
    pub parse_mask: Array2<bool>,
    pub fixed: Array2<bool>,
    pub changeable: Array2<bool>,
    /// The stroked arm polyline.
    pub arms: Array2<bool>,
    /// Labeled arm pixels not covered by the arm polyline.
    pub hands: Array2<bool>,
    /// Pixels to keep from the original image, before the box adjustment.
    pub total: Array2<bool>,
    /// Pixels the generator may fill.
    pub inpaint: Array2<bool>,
    /// The box where `inpaint` was recomputed from the fixed parts.
    pub inpaint_box: Option<TLBR<usize>>,
}

impl ParseMasks {
    /// Derive the inpainting masks of one sample.
    ///
    /// `points` must already be in the label map's coordinates.
    pub fn derive(
        labels: ArrayView2<u8>,
        rule: &CategoryRule,
        label_map: &LabelMap,
        points: &[pose::Keypoint],
    ) -> Result<Self> {
        let (height, width) = labels.dim();

        let parse_shape = labels.map(|&label| label > 0);
        let parse_head = codes_mask(labels, HEAD_CODES);
        let parse_cloth = labels.map(|&label| label == rule.label);
        let arm_labels = codes_mask(labels, ARM_CODES);

        let mut fixed = codes_mask(labels, &label_map.codes(FIXED_PARTS));
        fixed |= &codes_mask(labels, &label_map.codes(rule.fixed_parts));

        let mut changeable = labels.map(|&label| label == label_map.code(BodyPart::Background));
        Zip::from(&mut changeable)
            .and(&labels)
            .and(&fixed)
            .for_each(|changeable, &label, &fixed| {
                *changeable |= label != 0 && !fixed;
            });

        let mut garment = codes_mask(labels, rule.garment_codes);

        let arms = pose::draw_arms(points, height, width)?;
        let hands = &arm_labels & &!&arms;
        if rule.fold_arms {
            garment |= &arms;
            fixed |= &hands;
        }

        let mut parse_head_2 = parse_head.clone();
        if rule.cut_neck {
            cut_neck(&mut parse_head_2, points)?;
        }

        fixed |= &parse_head_2;
        garment |= &(&parse_head & &!&parse_head_2);

        let dilated = dilate(garment.view(), DILATION_KERNEL, DILATION_ITERATIONS);
        let parse_mask = &changeable & &!&dilated;
        let total = &parse_mask | &fixed;
        let mut inpaint = !&total;

        let inpaint_box = bounding_box(inpaint.view());
        if let Some(bbox) = &inpaint_box {
            debug!("inpaint box at {:?} of size {:?}", bbox.tlbr(), bbox.hw());
            let rows = bbox.rows();
            let cols = bbox.cols();
            Zip::from(inpaint.slice_mut(s![rows.clone(), cols.clone()]))
                .and(fixed.slice(s![rows, cols]))
                .for_each(|inpaint, &fixed| *inpaint = !fixed);
        }

        debug!(
            "derived {} masks with {} inpaint pixels",
            rule.category,
            inpaint.iter().filter(|&&set| set).count()
        );

        Ok(Self {
            label: rule.label,
            parse_shape,
            parse_head,
            parse_head_2,
            parse_cloth,
            parse_mask,
            fixed,
            changeable,
            arms,
            hands,
            total,
            inpaint,
            inpaint_box,
        })
    }

    /// Pixels to keep from the original image after the box adjustment.
    pub fn keep(&self) -> Array2<bool> {
        !&self.inpaint
    }

    /// The labels restricted to the kept region.
    pub fn parse_mask_total_labels(&self, labels: ArrayView2<u8>) -> Array2<u8> {
        let mut output = labels.to_owned();
        Zip::from(&mut output)
            .and(&self.total)
            .for_each(|label, &keep| {
                if !keep {
                    *label = 0;
                }
            });
        output
    }
}
