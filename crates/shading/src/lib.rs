//! CPU implementation of the glowfield shading pipeline.
//!
//! ```text
//!   hash ─▶ noise ─▶ fbm ─┬─▶ n1 (primary field, drifts +t)
//!                         └─▶ n2 (secondary field, drifts -t·ratio)
//!                                   │
//!   uv ─▶ vignette / side light ────┴─▶ shade() ─▶ RGBA
//! ```
//!
//! Everything here is a pure function of its arguments. The GLSL fragment
//! shader in the `renderer` crate mirrors these functions line for line; the
//! CPU path exists for still exports and to pin the maths down in tests.

mod field;
pub mod math;
mod noise;
mod params;

pub use field::{aspect_uv, shade, shade_fragment, FieldDrift, BLUE, FOG, GAMMA, PURPLE, WHITE};
pub use glam::{Vec2, Vec4};
pub use noise::{fbm, hash, noise};
pub use params::{FieldParams, ParamsError, MAX_OCTAVES};
