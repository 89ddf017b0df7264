#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod align;
pub mod error;
pub mod image;
pub mod pyramid;
pub mod warp;

// “Expert” modules – still public, but considered unstable internals.
pub mod gradient;
pub mod strategy;

// --- High-level re-exports -------------------------------------------------

// Main entry points: driver + the strategy contract it consumes.
pub use crate::align::{is_in_image, AlignOptions, Aligner, LevelContext, StepResult, StepStrategy};
pub use crate::error::AlignError;
pub use crate::pyramid::Pyramid;

// Concrete step strategy and warp families.
pub use crate::strategy::{ForwardAdditive, ForwardAdditiveOptions};
pub use crate::warp::{AffineWarp, EuclideanWarp, TranslationWarp, Warp};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::image::{ImageF32, ImageU8};
    pub use crate::{AlignOptions, Aligner, ForwardAdditive, Pyramid, TranslationWarp, Warp};
}
