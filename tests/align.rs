mod common;

use common::synthetic_image::{shifted_pattern, smooth_pattern};
use image_align::{AlignOptions, Aligner, ForwardAdditive, Pyramid, TranslationWarp, Warp};

#[test]
fn recovers_known_translation_coarse_to_fine() {
    let _ = env_logger::builder().is_test(true).try_init();

    let template = smooth_pattern(64, 64);
    let target = shifted_pattern(64, 64, 3.0, 2.0);

    let mut aligner = Aligner::new(ForwardAdditive::default());
    aligner
        .prepare(&template, &target, &TranslationWarp::identity(), 3)
        .expect("images are non-empty");
    assert_eq!(aligner.num_levels(), 3);

    let opts = AlignOptions {
        max_iterations: 30,
        eps: 1e-3,
    };
    let warp = aligner.align(&TranslationWarp::identity(), &opts);

    assert!(
        (warp.tx() - 3.0).abs() < 0.1 && (warp.ty() - 2.0).abs() < 0.1,
        "recovered ({:.3}, {:.3}), expected (3, 2)",
        warp.tx(),
        warp.ty()
    );
    assert!(
        aligner.last_error() < 1e-3,
        "residual should be near zero, got {}",
        aligner.last_error()
    );
}

#[test]
fn trace_records_accepted_steps_in_finest_frame() {
    let template = smooth_pattern(64, 64);
    let target = shifted_pattern(64, 64, 2.0, 1.0);

    let mut aligner = Aligner::new(ForwardAdditive::default());
    aligner
        .prepare(&template, &target, &TranslationWarp::identity(), 3)
        .expect("images are non-empty");

    let opts = AlignOptions {
        max_iterations: 30,
        eps: 1e-3,
    };
    let mut trace = Vec::new();
    let warp = aligner.align_traced(&TranslationWarp::identity(), &opts, &mut trace);

    assert!(!trace.is_empty());
    // Entries are projected into the finest frame, so the last one matches
    // the final estimate.
    let last = trace.last().unwrap();
    assert!((last.tx() - warp.tx()).abs() < 1e-6);
    assert!((last.ty() - warp.ty()).abs() < 1e-6);
}

#[test]
fn shared_target_pyramid_matches_independent_build() {
    let target = smooth_pattern(64, 64);
    let shared = Pyramid::build_f32(&target, 5);

    let opts = AlignOptions {
        max_iterations: 30,
        eps: 1e-3,
    };

    for (dx, dy) in [(2.0f32, 1.0f32), (-1.0, 3.0)] {
        let template = shifted_pattern(64, 64, -dx, -dy);

        let mut with_shared = Aligner::new(ForwardAdditive::default());
        with_shared
            .prepare_with_target_pyramid(&template, &shared, &TranslationWarp::identity(), 3)
            .expect("shared pyramid is non-empty");

        let mut with_own = Aligner::new(ForwardAdditive::default());
        with_own
            .prepare(&template, &target, &TranslationWarp::identity(), 3)
            .expect("images are non-empty");

        assert_eq!(with_shared.num_levels(), with_own.num_levels());

        let a = with_shared.align(&TranslationWarp::identity(), &opts);
        let b = with_own.align(&TranslationWarp::identity(), &opts);

        assert!(
            (a.params() - b.params()).norm() < 1e-6,
            "shared vs own diverged for shift ({dx}, {dy}): {:?} vs {:?}",
            a.params(),
            b.params()
        );
        assert_eq!(with_shared.last_error(), with_own.last_error());
    }
}

#[test]
fn shared_pyramid_depth_bounds_level_count() {
    let target = smooth_pattern(64, 64);
    let template = smooth_pattern(64, 64);
    let shallow = Pyramid::build_f32(&target, 2);

    let mut aligner = Aligner::new(ForwardAdditive::default());
    aligner
        .prepare_with_target_pyramid(&template, &shallow, &TranslationWarp::identity(), 4)
        .expect("shallow pyramid is usable");
    assert_eq!(aligner.num_levels(), 2);
}

#[test]
fn requested_levels_clamp_to_image_size() {
    let template = smooth_pattern(64, 64);
    let target = smooth_pattern(64, 64);

    // 64x64 supports 5 levels before dropping below the minimum size.
    let mut aligner = Aligner::new(ForwardAdditive::default());
    aligner
        .prepare(&template, &target, &TranslationWarp::identity(), 10)
        .expect("images are non-empty");
    assert_eq!(aligner.num_levels(), 5);

    // Zero requested levels still yields one.
    aligner
        .prepare(&template, &target, &TranslationWarp::identity(), 0)
        .expect("images are non-empty");
    assert_eq!(aligner.num_levels(), 1);

    // A small target bounds the pair.
    let small = smooth_pattern(8, 8);
    aligner
        .prepare(&template, &small, &TranslationWarp::identity(), 10)
        .expect("images are non-empty");
    assert_eq!(aligner.num_levels(), 2);
}
