//! Numeric precision policy.
//!
//! All indicators and coefficients are `f64`. To keep runs bit-identical and
//! comparable across scenarios, values are quantized at two fixed points:
//! - every sector output, when it is merged into a snapshot (1e-9)
//! - every composite index, when it is aggregated (1e-6)
//!
//! Rounding is half away from zero (`f64::round`). Quantizing by
//! multiplying with an integral scale and dividing back keeps values such as
//! `100.0 * 1.01` at exactly `101.0`.

/// Scale applied to sector outputs at merge time.
pub const INDICATOR_SCALE: f64 = 1e9;

/// Scale applied to composite indices.
pub const INDEX_SCALE: f64 = 1e6;

/// Rounds `value` to the grid `1 / scale`. Non-finite values pass through
/// unchanged so the caller can still report them.
pub fn quantize(value: f64, scale: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * scale).round() / scale
}

/// Quantizes a sector output.
pub fn quantize_indicator(value: f64) -> f64 {
    quantize(value, INDICATOR_SCALE)
}

/// Quantizes a composite index.
pub fn quantize_index(value: f64) -> f64 {
    quantize(value, INDEX_SCALE)
}

/// Clamps to the unit interval.
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
