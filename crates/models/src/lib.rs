//! Model capability registry, selection policy, and payload shaping.
//!
//! Three small, pure pieces that run before any provider call:
//! - [`ProfileRegistry`] — the static table of capability envelopes.
//! - [`select_profile`] — picks the profile for the first attempt.
//! - [`shape_images`] / [`clamp_budget`] — trims the payload to fit.

pub mod registry;
pub mod selector;
pub mod shaper;

pub use registry::ProfileRegistry;
pub use selector::select_profile;
pub use shaper::{clamp_budget, shape_images};
