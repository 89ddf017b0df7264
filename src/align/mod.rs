//! Coarse-to-fine alignment driver.
//!
//! The [`Aligner`] owns the template/target pyramid pair, the level cursor
//! and the last residual, and runs the scheduling loop: each pyramid level
//! gets an equal share of the iteration budget, a step strategy proposes a
//! parameter increment per iteration, and the driver accepts it, keeps
//! iterating, or advances one level finer.
//!
//! The strategy contract is deliberately small ([`StepStrategy`]): the
//! driver handles all cross-level coordinate bookkeeping through
//! [`Warp::scaled`](crate::warp::Warp::scaled), so a strategy only ever
//! reasons about the current level's images and warp.
mod driver;
mod step;

pub use driver::{is_in_image, AlignOptions, Aligner, LevelContext};
pub use step::{StepResult, StepStrategy};
