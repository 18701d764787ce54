//! Fixed-range colour ramp.
//!
//! Values are clamped to `[0, 1]` and interpolated linearly between a
//! handful of stops running from near-black through purple and orange to
//! pale yellow. Non-finite values get a distinct marker colour so that a
//! diverged run under the propagate policy is visible in the output.

use image::Rgba;

/// Ramp stops, evenly spaced over `[0, 1]`.
const STOPS: [[u8; 3]; 5] = [
    [0, 0, 4],
    [87, 16, 110],
    [188, 55, 84],
    [249, 142, 9],
    [252, 255, 164],
];

/// Colour of NaN and infinite cells.
pub const NON_FINITE: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Colour for `value` on the `[0, 1]` ramp.
pub fn heat(value: f64) -> Rgba<u8> {
    if !value.is_finite() {
        return NON_FINITE;
    }
    let t = value.clamp(0.0, 1.0) * (STOPS.len() - 1) as f64;
    let lo = (t.floor() as usize).min(STOPS.len() - 2);
    let frac = t - lo as f64;
    let (a, b) = (STOPS[lo], STOPS[lo + 1]);
    let mix = |i: usize| {
        let v = f64::from(a[i]) + (f64::from(b[i]) - f64::from(a[i])) * frac;
        v.round() as u8
    };
    Rgba([mix(0), mix(1), mix(2), 255])
}
