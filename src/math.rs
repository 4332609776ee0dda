//! Pure computation helpers for drawing and animating flowers.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / colour inputs, making them straightforward to unit-test.

use bevy::color::{Color, LinearRgba, Mix};

/// Maps a noise value from the standard `[-1, 1]` range into `[min, max]`.
///
/// Used to turn Perlin samples into soil tint strengths.
///
/// # Examples
/// ```
/// # use hex_garden::math::map_noise_to_range;
/// assert_eq!(map_noise_to_range(-1.0, 0.0, 10.0), 0.0);
/// assert_eq!(map_noise_to_range( 1.0, 0.0, 10.0), 10.0);
/// assert_eq!(map_noise_to_range( 0.0, 2.0, 6.0),  4.0);
/// ```
pub fn map_noise_to_range(noise_val: f64, min: f32, max: f32) -> f32 {
    min + ((noise_val as f32 + 1.0) / 2.0) * (max - min)
}

/// Cubic ease-out curve: fast start, gentle deceleration.
///
/// `t` should be in `[0, 1]`. Returns `1 - (1 - t)^3`.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Half-width of one petal; fewer petals get fatter ones.
///
/// `2.5 + 2.5 * 8 / petal_count`, so eight petals are 5 units wide.
pub fn petal_half_width(petal_count: u32) -> f32 {
    2.5 + 2.5 * (8.0 / petal_count.max(1) as f32)
}

/// Rotation of petal `index` around the centre, in radians.
pub fn petal_angle(index: u32, petal_count: u32, spin_degrees: f32) -> f32 {
    (spin_degrees + index as f32 * 360.0 / petal_count.max(1) as f32).to_radians()
}

/// Advances a spin angle by `rpm` over `dt_secs`, wrapped to `[0, 360)`.
pub fn advance_spin(spin_degrees: f32, rpm: f32, dt_secs: f32) -> f32 {
    (spin_degrees + 360.0 * rpm * dt_secs / 60.0).rem_euclid(360.0)
}

/// Scale and spin of a pulsing flower at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseFrame {
    /// Uniform scale multiplier.
    pub scale: f32,
    /// Spin speed in revolutions per minute.
    pub rpm: f32,
}

/// Pulse state `elapsed` seconds in; `None` once `duration` has passed.
///
/// Scale swells and settles along a half sine; spin starts at `peak_rpm`
/// and eases out to zero.
pub fn pulse_frame(elapsed: f32, duration: f32, amplitude: f32, peak_rpm: f32) -> Option<PulseFrame> {
    if duration <= 0.0 || elapsed >= duration {
        return None;
    }
    let t = (elapsed / duration).clamp(0.0, 1.0);
    Some(PulseFrame {
        scale: 1.0 + amplitude * (std::f32::consts::PI * t).sin(),
        rpm: peak_rpm * (1.0 - ease_out_cubic(t)),
    })
}

/// Splits a petal into two bands from its `[0, mid, 100]` gradient stops.
///
/// Returns `(start, end)` fractions of the petal length for each band.
pub fn gradient_bands(stops: [u8; 3]) -> [(f32, f32); 2] {
    let [start, mid, end] = stops.map(|s| f32::from(s.min(100)) / 100.0);
    [(start, mid), (mid, end)]
}

/// Largest span of a radius-`radius` flat-top board, in plane units.
pub fn board_extent(radius: u32, hex_size: f32) -> f32 {
    let width = (3 * radius + 2) as f32 * hex_size;
    let height = (2 * radius + 1) as f32 * 3f32.sqrt() * hex_size;
    width.max(height)
}

/// Camera distance at which `extent` exactly fills a vertical field of view.
pub fn framing_distance(extent: f32, fov_y: f32) -> f32 {
    extent / (2.0 * (fov_y / 2.0).tan())
}

/// Colour halfway between `a` and `b` in linear space.
pub fn blend(a: Color, b: Color) -> Color {
    LinearRgba::from(a).mix(&LinearRgba::from(b), 0.5).into()
}
