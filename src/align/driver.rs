//! The alignment driver and its scheduling loop.
use crate::error::AlignError;
use crate::image::ImageF32;
use crate::pyramid::Pyramid;
use crate::warp::Warp;
use log::debug;
use nalgebra::Vector2;
use serde::Deserialize;

use super::step::StepStrategy;

/// Stopping parameters for one [`Aligner::align`] run.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct AlignOptions {
    /// Total iteration budget, split evenly across pyramid levels.
    pub max_iterations: usize,
    /// Minimum parameter-increment norm to keep iterating on a level
    /// (bypassed on the first iteration of every level).
    pub eps: f32,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            eps: 1e-4,
        }
    }
}

/// Read-only view of the current pyramid level handed to a strategy.
#[derive(Clone, Copy, Debug)]
pub struct LevelContext<'a> {
    /// Template image at the current level.
    pub template: &'a ImageF32,
    /// Target image at the current level.
    pub target: &'a ImageF32,
    /// Current level index, 0 = finest.
    pub level: usize,
    /// Total number of levels in the prepared pyramids.
    pub num_levels: usize,
}

/// Coarse-to-fine alignment driver.
///
/// Owns the template/target pyramids, the level cursor and the last
/// residual. The step strategy `S` is the only polymorphic axis: the driver
/// invokes it through [`StepStrategy`] and never looks inside.
///
/// Residuals are not comparable across resolutions, so the stored error is
/// reset to `f32::MAX` whenever the level changes.
#[derive(Debug)]
pub struct Aligner<S> {
    strategy: S,
    template_pyramid: Pyramid,
    target_pyramid: Pyramid,
    levels: usize,
    level: usize,
    error: f32,
}

impl<S> Aligner<S> {
    /// New driver around a strategy. Call [`Aligner::prepare`] before
    /// aligning.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            template_pyramid: Pyramid::default(),
            target_pyramid: Pyramid::default(),
            levels: 0,
            level: 0,
            error: f32::MAX,
        }
    }

    /// Total number of pyramid levels agreed at prepare time.
    pub fn num_levels(&self) -> usize {
        self.levels
    }

    /// Current level cursor, 0 = finest.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Residual from the last accepted iteration, `f32::MAX` if the level
    /// just changed or nothing was accepted yet.
    pub fn last_error(&self) -> f32 {
        self.error
    }

    /// Move the level cursor, clamped to `[0, levels - 1]`. Resets the
    /// stored residual: errors are never compared across levels.
    pub fn set_level(&mut self, level: usize) {
        self.level = level.min(self.levels.saturating_sub(1));
        self.error = f32::MAX;
    }

    /// Template image at `level`.
    pub fn template_image_at(&self, level: usize) -> &ImageF32 {
        self.template_pyramid.level(level)
    }

    /// Target image at `level`.
    pub fn target_image_at(&self, level: usize) -> &ImageF32 {
        self.target_pyramid.level(level)
    }

    /// Template image at the current cursor level.
    pub fn template_image(&self) -> &ImageF32 {
        self.template_pyramid.level(self.level)
    }

    /// Target image at the current cursor level.
    pub fn target_image(&self) -> &ImageF32 {
        self.target_pyramid.level(self.level)
    }

    /// Consume the driver, returning the strategy.
    pub fn into_strategy(self) -> S {
        self.strategy
    }

    /// Prepare for alignment against a target image.
    ///
    /// Builds both pyramids with an effective level count of
    /// `max(1, min(levels, supported by template, supported by target))`,
    /// resets the cursor to the finest level, and invokes the strategy's
    /// prepare hook so it can precompute per-level caches.
    pub fn prepare<W, const N: usize>(
        &mut self,
        template: &ImageF32,
        target: &ImageF32,
        warp: &W,
        levels: usize,
    ) -> Result<(), AlignError>
    where
        W: Warp<N>,
        S: StepStrategy<W, N>,
    {
        ensure_non_empty(template, "template")?;
        ensure_non_empty(target, "target")?;

        let max_levels = Pyramid::max_levels_for_size(template.w, template.h)
            .min(Pyramid::max_levels_for_size(target.w, target.h));
        self.levels = levels.min(max_levels).max(1);

        self.template_pyramid = Pyramid::build_f32(template, self.levels);
        self.target_pyramid = Pyramid::build_f32(target, self.levels);
        self.set_level(0);

        debug!(
            "Aligner::prepare levels={} template={}x{} target={}x{}",
            self.levels, template.w, template.h, target.w, target.h
        );

        self.strategy
            .prepare(&self.template_pyramid, &self.target_pyramid, warp);
        Ok(())
    }

    /// Prepare for alignment against a pre-built target pyramid.
    ///
    /// Useful when tracking multiple templates on the same target frame:
    /// the target pyramid is built once and shared among aligners. If it
    /// carries more levels than needed it is truncated, not rebuilt.
    pub fn prepare_with_target_pyramid<W, const N: usize>(
        &mut self,
        template: &ImageF32,
        target: &Pyramid,
        warp: &W,
        levels: usize,
    ) -> Result<(), AlignError>
    where
        W: Warp<N>,
        S: StepStrategy<W, N>,
    {
        ensure_non_empty(template, "template")?;
        if target.num_levels() == 0 {
            return Err(AlignError::EmptyPyramid);
        }
        ensure_non_empty(target.finest(), "target")?;

        let max_levels =
            Pyramid::max_levels_for_size(template.w, template.h).min(target.num_levels());
        self.levels = levels.min(max_levels).max(1);

        self.template_pyramid = Pyramid::build_f32(template, self.levels);
        self.target_pyramid = if target.num_levels() > self.levels {
            target.truncate(self.levels)
        } else {
            target.clone()
        };
        self.set_level(0);

        debug!(
            "Aligner::prepare levels={} template={}x{} shared target pyramid ({} levels supplied)",
            self.levels,
            template.w,
            template.h,
            target.num_levels()
        );

        self.strategy
            .prepare(&self.template_pyramid, &self.target_pyramid, warp);
        Ok(())
    }

    /// Refine a warp estimate over all pyramid levels.
    ///
    /// Each level receives `max_iterations / levels` iterations. On every
    /// iteration the strategy proposes a step; it is accepted when it
    /// produced at least one valid constraint, did not increase the mean
    /// residual, and (past the first iteration of a level) moved the
    /// parameters by at least `eps`. A rejected step advances the loop to
    /// the next finer level.
    pub fn align<W, const N: usize>(&mut self, warp: &W, opts: &AlignOptions) -> W
    where
        W: Warp<N>,
        S: StepStrategy<W, N>,
    {
        self.align_impl(warp, opts, None)
    }

    /// Like [`Aligner::align`], but appends every accepted intermediate
    /// warp to `trace`, rescaled into the finest-resolution frame.
    pub fn align_traced<W, const N: usize>(
        &mut self,
        warp: &W,
        opts: &AlignOptions,
        trace: &mut Vec<W>,
    ) -> W
    where
        W: Warp<N>,
        S: StepStrategy<W, N>,
    {
        self.align_impl(warp, opts, Some(trace))
    }

    fn align_impl<W, const N: usize>(
        &mut self,
        warp: &W,
        opts: &AlignOptions,
        mut trace: Option<&mut Vec<W>>,
    ) -> W
    where
        W: Warp<N>,
        S: StepStrategy<W, N>,
    {
        if self.levels == 0 {
            debug!("Aligner::align called before prepare");
            return warp.clone();
        }

        let iterations_per_level = opts.max_iterations / self.levels;

        // Move the estimate into the coarsest coordinate frame; each level
        // scales it back up by one step, so the warp is always expressed in
        // the frame of the level being processed.
        let mut ws = warp.scaled(-(self.levels as i32));

        for lev in (0..self.levels).rev() {
            self.set_level(lev);
            ws = ws.scaled(1);

            for iter in 0..iterations_per_level {
                let step = {
                    let ctx = LevelContext {
                        template: self.template_pyramid.level(lev),
                        target: self.target_pyramid.level(lev),
                        level: lev,
                        num_levels: self.levels,
                    };
                    self.strategy.compute_step(&ctx, &ws)
                };

                if step.num_constraints == 0 {
                    debug!("Aligner::align level={lev} iter={iter} no constraints, next level");
                    break;
                }

                let new_error = step.mean_error();
                let error_change = self.error - new_error;
                // Negated comparison so a NaN residual is rejected too.
                if !(error_change >= 0.0) {
                    debug!(
                        "Aligner::align level={lev} iter={iter} error rose ({:.6} -> {:.6}), next level",
                        self.error, new_error
                    );
                    break;
                }
                // First iteration of a level skips the eps gate: the stored
                // error was just reset, so the only real test is whether the
                // proposal had support at all.
                if iter > 0 && step.delta.norm() < opts.eps {
                    debug!("Aligner::align level={lev} iter={iter} |delta| < eps, next level");
                    break;
                }

                ws = self.strategy.apply_step(&ws, &step);
                self.error = new_error;

                if let Some(tr) = trace.as_deref_mut() {
                    tr.push(ws.scaled(lev as i32));
                }
            }
        }

        ws
    }
}

fn ensure_non_empty(image: &ImageF32, role: &'static str) -> Result<(), AlignError> {
    if image.is_empty() {
        return Err(AlignError::EmptyImage { role });
    }
    Ok(())
}

/// Test if a point lies at least `margin` pixels inside all four image
/// edges, using the pixel-center convention (pixel `i` covers
/// `[i, i + 1)`, so the containing pixel of `p` is `floor(p - 0.5)`).
///
/// Strategies use this to discard correspondences near borders where
/// gradient and interpolation support is unreliable.
#[inline]
pub fn is_in_image(p: Vector2<f32>, width: usize, height: usize, margin: i32) -> bool {
    let x = (p.x - 0.5).floor() as i32;
    let y = (p.y - 0.5).floor() as i32;

    x >= margin && y >= margin && x < width as i32 - margin && y < height as i32 - margin
}
