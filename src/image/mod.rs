//! Single-channel image containers and sampling used throughout the crate.
//!
//! - [`ImageF32`] – owned row-major float image, the working format of the
//!   pyramid and the step strategies.
//! - [`ImageU8`] – borrowed 8-bit grayscale view over caller-owned bytes.
//! - [`sample_bilinear`] – clamped bilinear lookup used when evaluating the
//!   target under a warp at non-integer coordinates.
//! - [`io`] – grayscale load/save helpers for the demo tools.
pub mod f32;
pub mod io;
pub mod sample;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::sample::sample_bilinear;
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::ImageU8;
