use image_align::image::io::{load_grayscale_image, save_grayscale_f32};
use image_align::image::{sample_bilinear, ImageF32};
use image_align::{AlignOptions, Aligner, ForwardAdditive, TranslationWarp, Warp};
use nalgebra::Vector2;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

const USAGE: &str =
    "usage: align_demo <template-image> <target-image> [levels] [max-iterations] [stabilized-out.png]";

#[derive(Serialize)]
struct AlignReport {
    levels: usize,
    max_iterations: usize,
    eps: f32,
    tx: f32,
    ty: f32,
    last_error: f32,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let template_path = PathBuf::from(args.next().ok_or(USAGE)?);
    let target_path = PathBuf::from(args.next().ok_or(USAGE)?);
    let levels: usize = parse_or(args.next(), 3, "levels")?;
    let max_iterations: usize = parse_or(args.next(), 90, "max-iterations")?;
    let stabilized_out = args.next().map(PathBuf::from);

    let template = ImageF32::from_u8(&load_grayscale_image(&template_path)?.as_view());
    let target = ImageF32::from_u8(&load_grayscale_image(&target_path)?.as_view());

    let mut aligner = Aligner::new(ForwardAdditive::default());
    aligner
        .prepare(&template, &target, &TranslationWarp::identity(), levels)
        .map_err(|e| e.to_string())?;

    let opts = AlignOptions {
        max_iterations,
        eps: 1e-3,
    };
    let warp = aligner.align(&TranslationWarp::identity(), &opts);

    let report = AlignReport {
        levels: aligner.num_levels(),
        max_iterations,
        eps: opts.eps,
        tx: warp.tx(),
        ty: warp.ty(),
        last_error: aligner.last_error(),
    };
    let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{json}");

    if let Some(path) = &stabilized_out {
        let stabilized = stabilize_target(&target, &template, &warp);
        save_grayscale_f32(&stabilized, path)?;
        println!("Stabilized target written to {}", path.display());
    }
    Ok(())
}

/// Resample the target in the template frame under the recovered warp;
/// after convergence this should match the template.
fn stabilize_target(
    target: &ImageF32,
    template: &ImageF32,
    warp: &TranslationWarp,
) -> ImageF32 {
    ImageF32::from_fn(template.w, template.h, |x, y| {
        let q = warp.map(Vector2::new(x as f32 + 0.5, y as f32 + 0.5));
        sample_bilinear(target, q.x - 0.5, q.y - 0.5)
    })
}

fn parse_or(arg: Option<String>, default: usize, what: &str) -> Result<usize, String> {
    match arg {
        Some(s) => s
            .parse()
            .map_err(|e| format!("invalid {what} {s:?}: {e}")),
        None => Ok(default),
    }
}
