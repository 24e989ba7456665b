mod common;

use anyhow::Result;
use common::{SyntheticDataset, WordLengthTokenizer, HEIGHT, WIDTH};
use dresscode::{
    Category, DatasetError, DressCodeDataset, FieldValue, OutputField, PairOrder, Phase, Tokenizer,
};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use std::sync::Arc;

const IM_NAME: &str = "048392_0.jpg";
const C_NAME: &str = "048392_1.jpg";

fn single_pair(category: Category, phase: Phase) -> Result<SyntheticDataset> {
    let dataset = SyntheticDataset::new()?;
    dataset.write_captions(
        json!({ "048392": ["red", "cotton", "short sleeves", "round neck"] }),
        json!({}),
    )?;
    let pairs_file = match phase {
        Phase::Train => "train_pairs.txt",
        Phase::Test => "test_pairs_paired.txt",
    };
    dataset.write_pairs(category, pairs_file, &[(IM_NAME, C_NAME)])?;
    Ok(dataset)
}

fn tokenizer() -> Option<Arc<dyn Tokenizer>> {
    Some(Arc::new(WordLengthTokenizer { max_length: 8 }))
}

#[test]
fn names_need_no_sample_files() -> Result<()> {
    let dataset = single_pair(Category::UpperBody, Phase::Train)?;
    let mut config = dataset.config(Phase::Train);
    config.categories = vec![Category::UpperBody];
    config.outputs = vec![OutputField::ImName, OutputField::CName];

    let loaded = DressCodeDataset::new(config, None)?;
    let sample = loaded.get(0)?;

    assert_eq!(
        sample.fields().collect::<Vec<_>>(),
        vec![OutputField::ImName, OutputField::CName]
    );
    assert_eq!(sample.text(OutputField::ImName), Some(IM_NAME));
    assert_eq!(sample.text(OutputField::CName), Some(C_NAME));
    Ok(())
}

#[test]
fn default_fields_of_a_test_sample() -> Result<()> {
    let dataset = single_pair(Category::UpperBody, Phase::Test)?;
    dataset.write_sample_files(Category::UpperBody, IM_NAME, C_NAME)?;

    let mut config = dataset.config(Phase::Test);
    config.categories = vec![Category::UpperBody];
    let loaded = DressCodeDataset::new(config, tokenizer())?;
    let sample = loaded.get(0)?;

    assert_eq!(
        sample.fields().collect::<Vec<_>>(),
        OutputField::defaults()
    );

    let image = sample.tensor(OutputField::Image).unwrap();
    assert_eq!(image.dim(), (3, HEIGHT, WIDTH));
    assert!(image.iter().all(|&value| (-1.0..=1.0).contains(&value)));
    assert_eq!(sample.tensor(OutputField::ImCloth).unwrap().dim(), (3, HEIGHT, WIDTH));
    assert_eq!(sample.tensor(OutputField::Shape).unwrap().dim(), (1, HEIGHT, WIDTH));
    assert_eq!(sample.tensor(OutputField::PoseMap).unwrap().dim(), (18, HEIGHT, WIDTH));
    assert_eq!(sample.labels(OutputField::ParseArray).unwrap().dim(), (HEIGHT, WIDTH));
    assert_eq!(sample.tensor(OutputField::ImSketch).unwrap().dim(), (1, HEIGHT, WIDTH));

    let inpaint = sample.tensor(OutputField::InpaintMask).unwrap();
    assert_eq!(inpaint.dim(), (1, HEIGHT, WIDTH));
    assert!(inpaint.iter().all(|&value| value == 0.0 || value == 1.0));

    // the hair is kept and the garment is inpainted
    assert_eq!(inpaint[[0, 2, 20]], 0.0);
    assert_eq!(inpaint[[0, 34, 24]], 1.0);

    let im_mask = sample.tensor(OutputField::ImMask).unwrap();
    assert_eq!(im_mask[[0, 34, 24]], 0.0);
    assert_eq!(im_mask[[1, 2, 20]], image[[1, 2, 20]]);

    let labels = sample.labels(OutputField::ParseArray).unwrap();
    assert_eq!(labels[[34, 24]], 4);
    assert_eq!(labels[[2, 20]], 2);
    let kept = sample.labels(OutputField::ParseMaskTotal).unwrap();
    assert_eq!(kept[[2, 20]], 2);
    assert_eq!(kept[[34, 24]], 0);

    let stitch = sample.mask(OutputField::StitchLabel).unwrap();
    assert!(stitch[[30, 5]]);
    assert!(!stitch[[31, 5]]);

    assert_eq!(
        sample.get(OutputField::Category),
        Some(&FieldValue::Category(Category::UpperBody))
    );
    assert_eq!(
        sample.text(OutputField::OriginalCaptions),
        Some("red, cotton, short sleeves, round neck")
    );
    let (cond, uncond) = sample.get(OutputField::Captions).unwrap().token_ids().unwrap();
    assert_eq!(cond, &[3, 6, 5, 7, 5, 4, 0, 0]);
    assert_eq!(uncond, &[0; 8]);
    Ok(())
}

#[test]
fn supplemented_fields() -> Result<()> {
    let dataset = single_pair(Category::Dresses, Phase::Test)?;
    dataset.write_sample_files(Category::Dresses, IM_NAME, C_NAME)?;

    let mut config = dataset.config(Phase::Test);
    config.categories = vec![Category::Dresses];
    config.outputs = vec![
        OutputField::Cloth,
        OutputField::ImHead,
        OutputField::ImPose,
        OutputField::Hands,
        OutputField::ParseHead2,
        OutputField::DenseLabels,
        OutputField::Skeleton,
    ];
    let loaded = DressCodeDataset::new(config, None)?;
    let sample = loaded.get(0)?;

    assert_eq!(sample.len(), 7);
    assert_eq!(sample.tensor(OutputField::Cloth).unwrap().dim(), (3, HEIGHT, WIDTH));
    assert_eq!(sample.tensor(OutputField::Skeleton).unwrap().dim(), (3, HEIGHT, WIDTH));

    let im_pose = sample.tensor(OutputField::ImPose).unwrap();
    assert_eq!(im_pose.dim(), (1, HEIGHT, WIDTH));
    assert_eq!(im_pose[[0, 5, 24]], 1.0);
    assert_eq!(im_pose[[0, 60, 2]], -1.0);

    let im_head = sample.tensor(OutputField::ImHead).unwrap();
    assert_eq!(im_head[[0, 34, 24]], -1.0);

    let head = sample.mask(OutputField::ParseHead2).unwrap();
    assert!(head[[2, 20]]);
    assert_eq!(sample.labels(OutputField::DenseLabels).unwrap()[[34, 24]], 7);
    assert!(sample.mask(OutputField::Hands).unwrap().iter().all(|&set| !set));
    Ok(())
}

#[test]
fn seeded_extraction_is_reproducible() -> Result<()> {
    let dataset = single_pair(Category::LowerBody, Phase::Train)?;
    dataset.write_sample_files(Category::LowerBody, IM_NAME, C_NAME)?;

    let mut config = dataset.config(Phase::Train);
    config.categories = vec![Category::LowerBody];
    config.outputs = vec![
        OutputField::OriginalCaptions,
        OutputField::ImSketch,
        OutputField::InpaintMask,
    ];
    let loaded = DressCodeDataset::new(config, None)?;

    let first = loaded.get_with_rng(0, &mut StdRng::seed_from_u64(7))?;
    let second = loaded.get_with_rng(0, &mut StdRng::seed_from_u64(7))?;
    assert_eq!(first, second);

    let caption = first.text(OutputField::OriginalCaptions).unwrap();
    let mut parts: Vec<_> = caption.split(", ").collect();
    parts.sort_unstable();
    assert_eq!(parts, vec!["cotton", "red", "round neck", "short sleeves"]);
    Ok(())
}

#[test]
fn unpaired_test_sketch() -> Result<()> {
    let dataset = single_pair(Category::UpperBody, Phase::Test)?;
    dataset.write_pairs(Category::UpperBody, "test_pairs_unpaired.txt", &[(IM_NAME, C_NAME)])?;
    dataset.write_sample_files(Category::UpperBody, IM_NAME, C_NAME)?;
    dataset.remove("multimodal/upper_body/im_sketch/048392_1.png")?;

    let mut config = dataset.config(Phase::Test);
    config.order = PairOrder::Unpaired;
    config.categories = vec![Category::UpperBody];
    config.outputs = vec![OutputField::ImSketch];
    let loaded = DressCodeDataset::new(config, None)?;

    let sketch = loaded.get(0)?;
    let sketch = sketch.tensor(OutputField::ImSketch).unwrap();
    assert_eq!(sketch[[0, 10, 2]], 0.0);
    assert_eq!(sketch[[0, 10, 40]], 1.0);
    Ok(())
}

#[test]
fn missing_label_map() -> Result<()> {
    let dataset = single_pair(Category::Dresses, Phase::Train)?;
    dataset.write_sample_files(Category::Dresses, IM_NAME, C_NAME)?;
    dataset.remove("data/dresses/label_maps/048392_4.png")?;

    let mut config = dataset.config(Phase::Train);
    config.categories = vec![Category::Dresses];
    config.outputs = vec![OutputField::ImName, OutputField::InpaintMask];
    let loaded = DressCodeDataset::new(config, None)?;

    let err = loaded.get(0).unwrap_err();
    assert!(matches!(
        DatasetError::find(&err),
        Some(DatasetError::FileNotFound { path }) if path.ends_with("048392_4.png")
    ));
    Ok(())
}

#[test]
fn index_out_of_range() -> Result<()> {
    let dataset = single_pair(Category::Dresses, Phase::Train)?;
    let mut config = dataset.config(Phase::Train);
    config.categories = vec![Category::Dresses];
    config.outputs = vec![OutputField::ImName];
    let loaded = DressCodeDataset::new(config, None)?;

    let err = loaded.get(1).unwrap_err();
    assert!(matches!(
        DatasetError::find(&err),
        Some(DatasetError::Index { index: 1, len: 1 })
    ));
    Ok(())
}
