use glam::Vec2;

use crate::math::{fract, fract2, mix};

const HASH_SCALE: Vec2 = Vec2::new(123.34, 456.21);
const HASH_OFFSET: f32 = 45.32;

/// Pseudo-random scalar in `[0, 1)` for a lattice coordinate.
///
/// Stateless: the same coordinate always hashes to the same value.
pub fn hash(p: Vec2) -> f32 {
    let mut p = fract2(p * HASH_SCALE);
    p += Vec2::splat(p.dot(p + Vec2::splat(HASH_OFFSET)));
    fract(p.x * p.y)
}

/// Value noise: the four surrounding lattice hashes blended with the
/// cubic weight `f²(3 − 2f)`.
pub fn noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;

    let a = hash(i);
    let b = hash(i + Vec2::new(1.0, 0.0));
    let c = hash(i + Vec2::new(0.0, 1.0));
    let d = hash(i + Vec2::new(1.0, 1.0));

    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y
}

/// Fractal sum of `octaves` noise layers, each at twice the frequency and
/// half the amplitude of the previous one. Starting at amplitude 0.5 keeps
/// the sum below 1.
pub fn fbm(p: Vec2, octaves: u32) -> f32 {
    let mut p = p;
    let mut value = 0.0;
    let mut amplitude = 0.5;
    for _ in 0..octaves {
        value += amplitude * noise(p);
        p *= 2.0;
        amplitude *= 0.5;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> impl Iterator<Item = Vec2> {
        (-20..20).flat_map(|x| {
            (-20..20).map(move |y| Vec2::new(x as f32 * 0.37 + 0.11, y as f32 * 0.53 - 0.07))
        })
    }

    #[test]
    fn hash_is_deterministic() {
        for p in sample_points() {
            assert_eq!(hash(p).to_bits(), hash(p).to_bits());
        }
    }

    #[test]
    fn hash_stays_in_unit_interval() {
        for p in sample_points() {
            let h = hash(p);
            assert!((0.0..1.0).contains(&h), "hash({p}) = {h}");
        }
    }

    #[test]
    fn noise_matches_hash_on_lattice_points() {
        for x in -8..8 {
            for y in -8..8 {
                let p = Vec2::new(x as f32, y as f32);
                assert_eq!(noise(p), hash(p), "lattice point {p}");
            }
        }
    }

    #[test]
    fn noise_is_continuous_across_cell_edges() {
        let edge = 3.0_f32;
        let left = noise(Vec2::new(edge - 1e-4, 0.5));
        let right = noise(Vec2::new(edge + 1e-4, 0.5));
        assert!((left - right).abs() < 1e-3);
    }

    #[test]
    fn fbm_is_bounded() {
        for p in sample_points() {
            let value = fbm(p, 5);
            assert!((0.0..=1.0).contains(&value), "fbm({p}) = {value}");
        }
    }

    #[test]
    fn fbm_without_octaves_is_zero() {
        assert_eq!(fbm(Vec2::new(1.3, 2.7), 0), 0.0);
    }

    #[test]
    fn single_octave_fbm_is_half_noise() {
        let p = Vec2::new(0.42, 1.77);
        assert_eq!(fbm(p, 1), 0.5 * noise(p));
    }
}
