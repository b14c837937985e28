//! Rounding helpers
//!
//! Every rounded figure in the crate goes through round-half-away-from-zero,
//! which is what `f64::round` does. Ties such as 10.5 become 11.

/// Round to the nearest integer, ties away from zero
pub fn round_whole(value: f64) -> f64 {
    value.round()
}

/// Round to a fixed number of decimal places, ties away from zero
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
