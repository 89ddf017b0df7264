//! Concrete step strategies.
//!
//! Strategies implement [`StepStrategy`](crate::align::StepStrategy) and own
//! the algorithm-specific math; the driver stays generic. Currently provided:
//!
//! - [`ForwardAdditive`] – forward-additive Lucas-Kanade over any warp
//!   family exposing a parameter Jacobian.
mod forward_additive;

pub use forward_additive::{ForwardAdditive, ForwardAdditiveOptions};
