use super::{DressCodeDataset, FieldValue, PairRecord, Sample};
use crate::{
    caption,
    common::*,
    config::Phase,
    field::{OutputField, Stage},
    image_ops,
    mask::{self, ParseMasks},
    pose::{self, KeypointRecord, Keypoint},
    profiling::Timing,
    tokenizer::{self, TokenPair},
};

/// The outputs of the parsing stage.
struct ParseStage {
    labels: Array2<u8>,
    points: Vec<Keypoint>,
    masks: ParseMasks,
}

/// The results of every stage that was run.
#[derive(Default)]
struct Stages {
    caption: Option<String>,
    tokens: Option<TokenPair>,
    image: Option<Array3<f32>>,
    cloth: Option<Array3<f32>>,
    sketch: Option<Array3<f32>>,
    parse: Option<ParseStage>,
    stitch: Option<Array2<bool>>,
    dense: Option<Array2<u8>>,
    skeleton: Option<Array3<f32>>,
}

fn ran<T>(value: &Option<T>, stage: Stage) -> Result<&T> {
    value
        .as_ref()
        .ok_or_else(|| format_err!("the {:?} stage was not run", stage))
}

impl DressCodeDataset {
    pub(super) fn extract<R>(&self, record: &PairRecord, rng: &mut R) -> Result<Sample>
    where
        R: Rng,
    {
        let mut timing = Timing::new("extract_sample");
        let stages = self.run_stages(record, rng, &mut timing)?;

        let sample: Sample = self
            .fields
            .fields()
            .map(|field| Ok((field, self.field_value(field, record, &stages)?)))
            .collect::<Result<_>>()?;
        timing.mark("collect");
        timing.report();

        debug!(
            "extracted {} fields of ({}, {})",
            sample.len(),
            record.im_name,
            record.c_name
        );

        Ok(sample)
    }

    fn run_stages<R>(&self, record: &PairRecord, rng: &mut R, timing: &mut Timing) -> Result<Stages>
    where
        R: Rng,
    {
        let config = &self.config;
        let (height, width) = (config.height, config.width);
        let mut stages = Stages::default();

        for stage in self.fields.stages() {
            match stage {
                Stage::Caption => {
                    let captions = self.captions.for_garment(&record.c_name).ok_or_else(|| {
                        format_err!("no captions for garment '{}'", record.garment_id())
                    })?;
                    let mut captions = captions.to_vec();
                    if config.phase == Phase::Train {
                        captions.shuffle(rng);
                    }
                    stages.caption = Some(caption::join_captions(&captions));
                }
                Stage::Tokenize => {
                    let tokenizer = self.tokenizer.as_deref().ok_or_else(|| {
                        DatasetError::config("a tokenizer is required to produce caption token ids")
                    })?;
                    let caption = ran(&stages.caption, Stage::Caption)?;
                    stages.tokens = Some(tokenizer::tokenize_prompt(tokenizer, caption)?);
                }
                Stage::Image => {
                    let image = image_ops::load_rgb(record.image_path(), height, width)?;
                    stages.image = Some(image_ops::rgb_to_normalized(&image));
                }
                Stage::Cloth => {
                    let cloth = image_ops::load_rgb(record.cloth_path(), height, width)?;
                    stages.cloth = Some(image_ops::rgb_to_normalized(&cloth));
                }
                Stage::Sketch => {
                    let (min_threshold, max_threshold) = config.sketch_threshold;
                    let threshold = rng.gen_range(min_threshold..=max_threshold);
                    let path = record.sketch_path(config.phase, config.order);
                    let sketch = image_ops::load_luma(path, height, width)?;
                    stages.sketch = Some(image_ops::binarize_sketch(&sketch, threshold));
                }
                Stage::Parse => {
                    stages.parse = Some(self.parse_stage(record)?);
                }
                Stage::Stitch => {
                    let path = record.stitch_map_path();
                    stages.stitch = Some(image_ops::load_stitch_label(path, height, width)?);
                }
                Stage::Dense => {
                    let path = record.dense_path();
                    stages.dense = Some(image_ops::load_labels_resized(path, height, width)?);
                }
                Stage::Skeleton => {
                    let skeleton = image_ops::load_rgb(record.skeleton_path(), height, width)?;
                    stages.skeleton = Some(image_ops::rgb_to_normalized(&skeleton));
                }
            }
            timing.mark(stage.name());
        }

        Ok(stages)
    }

    fn parse_stage(&self, record: &PairRecord) -> Result<ParseStage> {
        let (height, width) = (self.config.height, self.config.width);

        let labels = image_ops::load_labels_resized(record.label_map_path(), height, width)?;
        let points = KeypointRecord::load(record.keypoints_path())?.rescale(height, width);
        let masks = ParseMasks::derive(
            labels.view(),
            &record.category.rule(),
            &self.label_map,
            &points,
        )?;

        Ok(ParseStage {
            labels,
            points,
            masks,
        })
    }

    fn field_value(
        &self,
        field: OutputField,
        record: &PairRecord,
        stages: &Stages,
    ) -> Result<FieldValue> {
        use OutputField as F;

        let (height, width) = (self.config.height, self.config.width);
        let image = || ran(&stages.image, Stage::Image);
        let parse = || ran(&stages.parse, Stage::Parse);

        let value = match field {
            F::CName => FieldValue::Text(record.c_name.clone()),
            F::ImName => FieldValue::Text(record.im_name.clone()),
            F::Category => FieldValue::Category(record.category),
            F::Cloth => FieldValue::Tensor(ran(&stages.cloth, Stage::Cloth)?.clone()),
            F::Image => FieldValue::Tensor(image()?.clone()),
            F::ImCloth => {
                let cloth = &parse()?.masks.parse_cloth;
                FieldValue::Tensor(image_ops::masked_image(image()?.view(), cloth.view(), 1.0))
            }
            F::ImHead => {
                let head = &parse()?.masks.parse_head;
                FieldValue::Tensor(image_ops::masked_image(image()?.view(), head.view(), -1.0))
            }
            F::ImMask => {
                let keep = parse()?.masks.keep();
                FieldValue::Tensor(image_ops::masked_image(image()?.view(), keep.view(), 0.0))
            }
            F::Shape => {
                FieldValue::Tensor(image_ops::shape_from_mask(parse()?.masks.parse_shape.view()))
            }
            F::ImPose => {
                let radius = pose::stamp_radius(self.config.radius, height);
                let rendering = pose::render_pose(&parse()?.points, height, width, radius);
                let im_pose = image_ops::mask_to_luma(rendering.im_pose.view());
                FieldValue::Tensor(image_ops::luma_to_normalized(&im_pose))
            }
            F::PoseMap => FieldValue::Tensor(pose::gaussian_heatmaps(
                &parse()?.points,
                height,
                width,
                pose::HEATMAP_SIGMA,
            )),
            F::ParseArray => FieldValue::Labels(parse()?.labels.clone()),
            F::InpaintMask => FieldValue::Tensor(mask::mask_to_f32(parse()?.masks.inpaint.view())),
            F::ParseMaskTotal => {
                let ParseStage { labels, masks, .. } = parse()?;
                FieldValue::Labels(masks.parse_mask_total_labels(labels.view()))
            }
            F::Hands => FieldValue::Mask(parse()?.masks.hands.clone()),
            F::ParseHead2 => FieldValue::Mask(parse()?.masks.parse_head_2.clone()),
            F::DenseLabels => FieldValue::Labels(ran(&stages.dense, Stage::Dense)?.clone()),
            F::Skeleton => FieldValue::Tensor(ran(&stages.skeleton, Stage::Skeleton)?.clone()),
            F::ImSketch => FieldValue::Tensor(ran(&stages.sketch, Stage::Sketch)?.clone()),
            F::Captions => {
                let TokenPair { cond, uncond } = ran(&stages.tokens, Stage::Tokenize)?.clone();
                FieldValue::TokenIds { cond, uncond }
            }
            F::OriginalCaptions => {
                FieldValue::Text(ran(&stages.caption, Stage::Caption)?.clone())
            }
            F::StitchLabel => FieldValue::Mask(ran(&stages.stitch, Stage::Stitch)?.clone()),
        };

        Ok(value)
    }
}
