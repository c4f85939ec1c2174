use binmatch::{
    detect, match_template, merge_composites, prepare, render_mask, run_all, BinaryImage,
    ImageView, MatchJob, MatchSettings, OrchestratorConfig, PrepareParams,
};

fn square_base() -> BinaryImage {
    BinaryImage::from_rows(&[
        [0u8, 0, 0, 0],
        [0, 1, 1, 0],
        [0, 1, 1, 0],
        [0, 0, 0, 0],
    ])
    .unwrap()
}

#[test]
fn square_is_found_at_single_offset() {
    let base = square_base();
    let tpl = BinaryImage::from_rows(&[[1u8, 1], [1, 1]]).unwrap();
    let settings = MatchSettings::new(0.01, 1, 1).unwrap();

    let composite = match_template(&base, &tpl, &settings);
    assert_eq!(composite.accepted(), 1);
    assert_eq!(composite.mask(), &base);

    let merged = merge_composites(4, 4, vec![composite]).unwrap();
    let output = render_mask(&merged);
    #[rustfmt::skip]
    let expected = [
        255, 255, 255, 255,
        255,   0,   0, 255,
        255,   0,   0, 255,
        255, 255, 255, 255,
    ];
    assert_eq!(output.data(), &expected);
}

#[test]
fn detect_matches_manual_pipeline() {
    let base = square_base();
    let jobs = vec![MatchJob::new(
        BinaryImage::from_rows(&[[1u8, 1], [1, 1]]).unwrap(),
        MatchSettings::with_threshold(0.01).unwrap(),
    )];
    let output = detect(&base, &jobs, &OrchestratorConfig::default()).unwrap();
    assert_eq!(output.data().iter().filter(|&&v| v == 0).count(), 4);
    assert!(output.data().iter().all(|&v| v == 0 || v == 255));
}

#[test]
fn run_all_preserves_job_order() {
    let base = BinaryImage::from_rows(&[
        [1u8, 1, 0, 0, 0, 0],
        [0, 0, 0, 0, 1, 0],
        [0, 0, 0, 0, 1, 0],
        [0, 0, 0, 0, 0, 0],
    ])
    .unwrap();
    let horizontal = BinaryImage::from_rows(&[[1u8, 1]]).unwrap();
    let vertical = BinaryImage::from_rows(&[[1u8], [1]]).unwrap();
    let oversized = BinaryImage::zeros(7, 1).unwrap();
    let settings = MatchSettings::with_threshold(0.25).unwrap();
    let jobs = vec![
        MatchJob::new(horizontal.clone(), settings),
        MatchJob::new(vertical.clone(), settings),
        MatchJob::new(oversized, settings),
    ];

    for parallel in [false, true] {
        let cfg = OrchestratorConfig {
            parallel,
            ..OrchestratorConfig::default()
        };
        let composites = run_all(&base, &jobs, &cfg).unwrap();
        assert_eq!(composites.len(), 3);
        assert_eq!(composites[0], match_template(&base, &horizontal, &settings));
        assert_eq!(composites[1], match_template(&base, &vertical, &settings));
        assert_eq!(composites[0].mask().count_ones(), 2);
        assert_eq!(composites[1].mask().count_ones(), 2);
        assert_eq!(composites[2].mask().count_ones(), 0);

        let merged = merge_composites(6, 4, composites).unwrap();
        assert_eq!(merged, base);
    }
}

#[test]
fn bounded_worker_pool_gives_same_results() {
    let base = square_base();
    let tpl = BinaryImage::from_rows(&[[1u8]]).unwrap();
    let settings = MatchSettings::with_threshold(0.5).unwrap();
    let jobs: Vec<MatchJob> = (0..5).map(|_| MatchJob::new(tpl.clone(), settings)).collect();
    let unbounded = run_all(&base, &jobs, &OrchestratorConfig::default()).unwrap();
    let bounded = run_all(
        &base,
        &jobs,
        &OrchestratorConfig {
            max_workers: Some(2),
            ..OrchestratorConfig::default()
        },
    )
    .unwrap();
    assert_eq!(unbounded, bounded);
}

#[test]
fn merging_a_composite_with_itself_is_idempotent() {
    let base = square_base();
    let tpl = BinaryImage::from_rows(&[[1u8, 1]]).unwrap();
    let composite = match_template(&base, &tpl, &MatchSettings::with_threshold(0.4).unwrap());
    for copies in 1..=4 {
        let merged = merge_composites(4, 4, vec![composite.clone(); copies]).unwrap();
        assert_eq!(&merged, composite.mask());
    }
}

#[test]
fn prepared_scan_finds_drawn_glyph() {
    // Light page with a dark plus sign drawn twice.
    let width = 16;
    let height = 10;
    let mut page = vec![230u8; width * height];
    let glyph = [(1usize, 0usize), (0, 1), (1, 1), (2, 1), (1, 2)];
    for (ox, oy) in [(2usize, 2usize), (10, 5)] {
        for &(gx, gy) in &glyph {
            page[(oy + gy) * width + ox + gx] = 20;
        }
    }
    let mut stamp = vec![230u8; 9];
    for &(gx, gy) in &glyph {
        stamp[gy * 3 + gx] = 20;
    }

    let params = PrepareParams::default();
    let base = prepare(ImageView::from_slice(&page, width, height).unwrap(), &params);
    let tpl = prepare(ImageView::from_slice(&stamp, 3, 3).unwrap(), &params);
    assert_eq!(base.count_ones(), 10);
    assert_eq!(tpl.count_ones(), 5);

    let jobs = vec![MatchJob::new(tpl, MatchSettings::new(0.1, 1, 2).unwrap())];
    let output = detect(&base, &jobs, &OrchestratorConfig::default()).unwrap();
    let ink: Vec<usize> = output
        .data()
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == 0)
        .map(|(idx, _)| idx)
        .collect();
    let mut expected: Vec<usize> = [(2usize, 2usize), (10, 5)]
        .iter()
        .flat_map(|&(ox, oy)| glyph.iter().map(move |&(gx, gy)| (oy + gy) * width + ox + gx))
        .collect();
    expected.sort_unstable();
    assert_eq!(ink, expected);
}
