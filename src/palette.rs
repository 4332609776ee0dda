//! Seeded colour picking and shuffling.
//!
//! Each call draws from a fresh ChaCha8 stream keyed on the seed byte, so a
//! genome always renders the same colours no matter what the simulation RNG
//! has been doing.

use bevy::color::{Color, Hsla};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Hue constraint for [`random_color`], in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hue {
    /// Anywhere on the wheel.
    Any,
    /// 47°–62°.
    Yellow,
    /// 19°–46°.
    Orange,
    /// Exactly this hue.
    Fixed(f32),
}

/// Lightness band for [`random_color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Luminosity {
    /// Mid-range, readable on the soil tiles.
    Any,
    /// Deep, low-lightness colours.
    Dark,
}

fn stream(seed: u8) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(u64::from(seed))
}

/// Deterministic colour for `seed` within the given hue and lightness bands.
pub fn random_color(seed: u8, hue: Hue, luminosity: Luminosity) -> Color {
    let mut rng = stream(seed);
    let h = match hue {
        Hue::Any => rng.random_range(0.0..360.0),
        Hue::Yellow => rng.random_range(47.0..=62.0),
        Hue::Orange => rng.random_range(19.0..=46.0),
        Hue::Fixed(h) => h.rem_euclid(360.0),
    };
    let (s, l) = match luminosity {
        Luminosity::Any => (rng.random_range(0.55..=1.0), rng.random_range(0.35..=0.75)),
        Luminosity::Dark => (rng.random_range(0.7..=1.0), rng.random_range(0.12..=0.3)),
    };
    Color::hsl(h, s, l)
}

/// Hue of `color` in degrees.
pub fn hue_of(color: Color) -> f32 {
    Hsla::from(color).hue
}

/// Permutes `items` in place; the same seed always yields the same order.
pub fn seeded_shuffle<T>(items: &mut [T], seed: u8) {
    items.shuffle(&mut stream(seed));
}
