use binmatch::lowlevel::{offset_range, scan_full, weighted_error_at, XorTemplatePlan};
use binmatch::{match_template, BinaryImage, Composite, MatchSettings, Placement};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn random_binary(rng: &mut StdRng, width: usize, height: usize, density: f64) -> BinaryImage {
    let data = (0..width * height)
        .map(|_| u8::from(rng.random_bool(density)))
        .collect();
    BinaryImage::new(data, width, height).unwrap()
}

/// Plants `tpl` into `base` at `(x, y)`, overwriting the window.
fn plant(base: &BinaryImage, tpl: &BinaryImage, x: usize, y: usize) -> BinaryImage {
    let mut data = base.as_slice().to_vec();
    for ty in 0..tpl.height() {
        for tx in 0..tpl.width() {
            data[(y + ty) * base.width() + x + tx] = tpl.get(tx, ty).unwrap();
        }
    }
    BinaryImage::new(data, base.width(), base.height()).unwrap()
}

fn accepted_offsets(
    base: &BinaryImage,
    tpl: &BinaryImage,
    settings: &MatchSettings,
) -> HashSet<(usize, usize)> {
    let plan = XorTemplatePlan::new(tpl, settings);
    scan_full(base.view(), &plan)
        .into_iter()
        .map(|Placement { x, y, .. }| (x, y))
        .collect()
}

#[test]
fn oversized_templates_yield_empty_composites() {
    let mut rng = StdRng::seed_from_u64(7);
    let base = random_binary(&mut rng, 6, 4, 0.5);
    let settings = MatchSettings::with_threshold(1.0).unwrap();
    for (w, h) in [(7, 1), (1, 5), (7, 5)] {
        let tpl = BinaryImage::new(vec![1; w * h], w, h).unwrap();
        let composite = match_template(&base, &tpl, &settings);
        assert_eq!(composite.shape(), (6, 4));
        assert_eq!(composite.mask().count_ones(), 0, "template {w}x{h}");
        assert_eq!(composite.accepted(), 0);
    }
}

#[test]
fn template_equal_to_base_has_exactly_one_offset() {
    let mut rng = StdRng::seed_from_u64(8);
    let base = random_binary(&mut rng, 5, 3, 0.5);
    let plan = XorTemplatePlan::new(&base, &MatchSettings::with_threshold(0.1).unwrap());
    assert_eq!(offset_range(base.view(), &plan), Some((1, 1)));
    let composite = match_template(&base, &base, &MatchSettings::with_threshold(0.1).unwrap());
    assert_eq!(composite.mask(), &base);
    assert_eq!(composite.accepted(), 1);
}

#[test]
fn shuffled_offset_order_gives_same_composite() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10 {
        let base = random_binary(&mut rng, 24, 18, 0.45);
        let tpl = random_binary(&mut rng, 4, 3, 0.5);
        let base = plant(&base, &tpl, 5, 7);
        let settings = MatchSettings::new(0.35, 1, 3).unwrap();
        let expected = match_template(&base, &tpl, &settings);

        let plan = XorTemplatePlan::new(&tpl, &settings);
        let (cols, rows) = offset_range(base.view(), &plan).unwrap();
        let mut offsets: Vec<(usize, usize)> = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| (x, y)))
            .collect();
        offsets.shuffle(&mut rng);

        let mut composite = Composite::empty(base.width(), base.height()).unwrap();
        for (x, y) in offsets {
            if plan.accepts(weighted_error_at(base.view(), &plan, x, y).unwrap()) {
                composite.stamp(&tpl, x, y).unwrap();
            }
        }
        assert_eq!(composite, expected);
        assert!(composite.accepted() >= 1);
    }
}

#[test]
fn raising_threshold_never_shrinks_accepted_set() {
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..8 {
        let base = random_binary(&mut rng, 20, 16, 0.4);
        let tpl = random_binary(&mut rng, 3, 4, 0.6);
        let mut previous = HashSet::new();
        for step in 0..=10 {
            let threshold = step as f64 / 10.0;
            let settings = MatchSettings::new(threshold, 2, 1).unwrap();
            let current = accepted_offsets(&base, &tpl, &settings);
            assert!(previous.is_subset(&current), "threshold {threshold}");
            previous = current;
        }
    }
}

#[test]
fn raising_template_weight_never_lowers_error() {
    let mut rng = StdRng::seed_from_u64(31);
    let base = random_binary(&mut rng, 12, 10, 0.5);
    let tpl = random_binary(&mut rng, 3, 3, 0.5);
    let tpl = if tpl.count_ones() == 0 {
        BinaryImage::new(vec![1; 9], 3, 3).unwrap()
    } else {
        tpl
    };

    let plans: Vec<XorTemplatePlan> = (1..=5)
        .map(|w| XorTemplatePlan::new(&tpl, &MatchSettings::new(0.3, 2, w).unwrap()))
        .collect();
    let (cols, rows) = offset_range(base.view(), &plans[0]).unwrap();
    for y in 0..rows {
        for x in 0..cols {
            let errors: Vec<u64> = plans
                .iter()
                .map(|plan| weighted_error_at(base.view(), plan, x, y).unwrap())
                .collect();
            assert!(errors.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }
}

#[test]
fn foreground_mismatch_costs_template_weight() {
    // One missing ink pixel: the error equals the template weight.
    let base = BinaryImage::from_rows(&[[1u8, 0], [1, 1]]).unwrap();
    let tpl = BinaryImage::from_rows(&[[1u8, 1], [1, 1]]).unwrap();
    for weight in 1..=4 {
        let plan = XorTemplatePlan::new(&tpl, &MatchSettings::new(0.5, 1, weight).unwrap());
        assert_eq!(weighted_error_at(base.view(), &plan, 0, 0), Some(weight as u64));
    }
}

#[test]
fn blank_template_never_marks_pixels() {
    let mut rng = StdRng::seed_from_u64(41);
    let base = random_binary(&mut rng, 10, 10, 0.3);
    let tpl = BinaryImage::zeros(3, 2).unwrap();
    for threshold in [0.0, 0.25, 0.5, 1.0] {
        let settings = MatchSettings::with_threshold(threshold).unwrap();
        let composite = match_template(&base, &tpl, &settings);
        assert_eq!(composite.mask().count_ones(), 0, "threshold {threshold}");
    }
}

#[test]
fn zero_threshold_rejects_even_perfect_matches() {
    let base = BinaryImage::from_rows(&[[0u8, 1, 1], [0, 1, 1]]).unwrap();
    let tpl = BinaryImage::from_rows(&[[1u8, 1], [1, 1]]).unwrap();
    let plan = XorTemplatePlan::new(&tpl, &MatchSettings::with_threshold(0.0).unwrap());
    assert_eq!(weighted_error_at(base.view(), &plan, 1, 0), Some(0));
    assert!(!plan.accepts(0));

    let composite = match_template(&base, &tpl, &MatchSettings::with_threshold(0.0).unwrap());
    assert_eq!(composite.mask().count_ones(), 0);
}

#[test]
fn full_threshold_accepts_all_but_total_disagreement() {
    let base = BinaryImage::from_rows(&[[0u8, 0, 1]]).unwrap();
    let tpl = BinaryImage::from_rows(&[[1u8, 1]]).unwrap();
    // Offset 0 disagrees on every pixel (error 2 == budget 2) and is rejected.
    let accepted = accepted_offsets(&base, &tpl, &MatchSettings::with_threshold(1.0).unwrap());
    assert_eq!(accepted, HashSet::from([(1, 0)]));
}
