use boxdecode::{DecodeConfig, DecodeContext, Decoder, LabelTable, ScoreMode, CHANNELS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random tensor with either normalized or pixel-magnitude coordinates.
fn random_tensor(rng: &mut StdRng, n: usize, pixel_space: bool) -> Vec<f32> {
    let coord_span = if pixel_space { 800.0 } else { 1.2 };
    let mut data = vec![0.0f32; CHANNELS * n];
    for anchor in 0..n {
        for channel in 0..4 {
            data[channel * n + anchor] = rng.random_range(0.0..coord_span);
        }
        for channel in 4..CHANNELS {
            data[channel * n + anchor] = rng.random_range(0.0..1.0);
        }
    }
    data
}

fn assert_contract(decoder: &Decoder, outcome: &boxdecode::DecodeOutcome) {
    let config = decoder.config();
    assert!(outcome.detections.len() <= config.max_detections);
    assert!(outcome.diagnostics.kept <= outcome.diagnostics.candidates);

    for pair in outcome.detections.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    for det in &outcome.detections {
        let rect = det.rect;
        assert!((0.0..=1.0).contains(&rect.left), "left out of range");
        assert!((0.0..=1.0).contains(&rect.top), "top out of range");
        assert!((0.0..=1.0).contains(&rect.right), "right out of range");
        assert!((0.0..=1.0).contains(&rect.bottom), "bottom out of range");
        assert!(rect.left <= rect.right);
        assert!(rect.top <= rect.bottom);
        assert!(!det.label.is_empty());
    }

    for i in 0..outcome.detections.len() {
        for j in (i + 1)..outcome.detections.len() {
            let a = &outcome.detections[i];
            let b = &outcome.detections[j];
            if a.class_index == b.class_index {
                assert!(
                    a.rect.iou(&b.rect) <= config.iou_threshold + 1e-6,
                    "same-class survivors exceed IoU threshold"
                );
            }
        }
    }
}

#[test]
fn random_tensors_satisfy_output_contract() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let modes = [ScoreMode::Auto, ScoreMode::ClassOnly, ScoreMode::ObjTimesClass];

    for round in 0..24 {
        let n = rng.random_range(1..400);
        let pixel_space = round % 2 == 0;
        let data = random_tensor(&mut rng, n, pixel_space);

        let config = DecodeConfig {
            conf_threshold: rng.random_range(0.0..0.8),
            iou_threshold: rng.random_range(0.1..0.9),
            score_mode: modes[round % modes.len()],
            ..DecodeConfig::default()
        };
        let decoder = Decoder::new(config, LabelTable::coco80()).unwrap();

        let outcome = decoder.decode(&[1, CHANNELS, n], &data);
        assert_contract(&decoder, &outcome);
    }
}

#[test]
fn random_garbage_shapes_never_panic() {
    let mut rng = StdRng::seed_from_u64(42);
    let decoder = Decoder::new(DecodeConfig::default(), LabelTable::coco80()).unwrap();
    let mut ctx = DecodeContext::new();

    for _ in 0..50 {
        let rank = rng.random_range(0..5usize);
        let shape: Vec<usize> = (0..rank).map(|_| rng.random_range(0..200)).collect();
        let len = rng.random_range(0..CHANNELS * 64);
        let data: Vec<f32> = (0..len).map(|_| rng.random_range(-1000.0..1000.0)).collect();

        let outcome = decoder.decode_with_context(&shape, &data, &mut ctx);
        assert!(outcome.detections.len() <= decoder.config().max_detections);
    }
}
