use glam::{Vec2, Vec3, Vec4};

use crate::math::{mix3, smoothstep};
use crate::noise::fbm;
use crate::params::FieldParams;

pub const PURPLE: Vec3 = Vec3::new(0.45, 0.25, 0.8);
pub const BLUE: Vec3 = Vec3::new(0.4, 0.6, 1.0);
pub const WHITE: Vec3 = Vec3::ONE;
pub const FOG: Vec3 = Vec3::new(0.02, 0.01, 0.03);
pub const GAMMA: f32 = 0.9;

const GLOW_BIAS: f32 = 0.4;
const GLOW_EDGE: f32 = 0.8;
const VIGNETTE_SQUASH: Vec2 = Vec2::new(1.0, 0.7);
const VIGNETTE_INNER: f32 = 0.5;
const VIGNETTE_OUTER: f32 = 1.0;
const SIDE_LIGHT_STRETCH: f32 = 1.4;
const SIDE_LIGHT_WEIGHT: f32 = 0.9;
const HUE_NOISE_WEIGHT: f32 = 0.2;

/// Domain offsets of the two noise fields at a point in time. The second
/// field runs the opposite way at `secondary_drift_ratio` times the speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDrift {
    pub primary: f32,
    pub secondary: f32,
}

impl FieldDrift {
    pub fn at(time: f32, params: &FieldParams) -> Self {
        let t = time * params.drift_rate;
        Self {
            primary: t,
            secondary: -(t * params.secondary_drift_ratio),
        }
    }
}

/// Normalized, aspect-corrected coordinate of a fragment.
///
/// `frag_coord` uses a bottom-left origin in pixels; `uv.y` spans `[0, 1]`
/// while `uv.x` spans `[0, width / height]`.
pub fn aspect_uv(frag_coord: Vec2, resolution: Vec2) -> Vec2 {
    let mut uv = frag_coord / resolution;
    uv.x *= resolution.x / resolution.y;
    uv
}

/// Colour of a single fragment. Pure: equal inputs give bit-identical output.
pub fn shade_fragment(
    frag_coord: Vec2,
    time: f32,
    resolution: Vec2,
    params: &FieldParams,
) -> Vec4 {
    shade(aspect_uv(frag_coord, resolution), time, params)
}

/// The field itself, evaluated at an aspect-corrected coordinate.
pub fn shade(uv: Vec2, time: f32, params: &FieldParams) -> Vec4 {
    let p = uv - Vec2::splat(0.5);

    let drift = FieldDrift::at(time, params);
    let n1 = fbm(p * params.primary_scale + Vec2::splat(drift.primary), params.octaves);
    let n2 = fbm(p * params.secondary_scale + Vec2::splat(drift.secondary), params.octaves);

    let glow = smoothstep(0.0, GLOW_EDGE, GLOW_BIAS + n1 + n2);
    let vignette =
        1.0 - smoothstep(VIGNETTE_INNER, VIGNETTE_OUTER, (p * VIGNETTE_SQUASH).length());
    let side_light = smoothstep(0.0, 1.0, uv.x * SIDE_LIGHT_STRETCH);

    let mut col = mix3(PURPLE, BLUE, uv.x + n1 * HUE_NOISE_WEIGHT);
    col = mix3(col, WHITE, side_light * SIDE_LIGHT_WEIGHT);
    col *= glow * vignette;
    col += FOG;
    col = col.max(Vec3::ZERO).powf(GAMMA);

    col.extend(1.0)
}
