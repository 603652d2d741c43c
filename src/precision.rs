//! Float representability checks for per-epoch stake changes

/// Calculates the "Unit in the Last Place" (`ULP`) for a `u64` value, which is
/// the gap between adjacent `f64` values at that magnitude. `f64` facts:
/// - `f64` has 53 bits of precision (52 fraction bits plus an implicit leading 1).
/// - For integers `x < 2^53`, every integer is exactly representable (`ULP = 1`).
/// - At and above powers of two, spacing doubles:
///   `[2^53, 2^54) ULP = 2`
///   `[2^54, 2^55) ULP = 4`
///   `[2^55, 2^56) ULP = 8`
pub fn ulp_of_u64(magnitude: u64) -> u64 {
    // Avoid the special zero case by forcing at least 1
    let magnitude_f64 = magnitude.max(1) as f64;

    // spacing to the next representable f64
    let spacing = magnitude_f64.next_up() - magnitude_f64;

    // Map back to integer units, clamp so we never return 0
    spacing.max(1.0) as u64
}

/// Whether `value` survives a round trip through `f64` unchanged.
///
/// A value that does not fit the mantissa rounds to a neighbour whose spacing is at least as
/// coarse as its own, so a non-zero remainder against that spacing is proof of loss.
pub fn is_exact_f64(value: u64) -> bool {
    value % ulp_of_u64(value) == 0
}

/// Compute an absolute tolerance for comparing an exact integer stake change to the
/// validator's `f64`-based formula.
///
/// The float path rounds several times before the final truncation, so the two can
/// differ by a small number of `ULPs` even when both are "correct" for their domain.
pub fn max_ulp_tolerance(candidate: u64, oracle: u64) -> u64 {
    // Measure ULP at the larger magnitude of the two results
    let mag = candidate.max(oracle);

    // Three `u64` to `f64` conversions, a division, two multiplications and a truncating cast.
    // These accumulate to >3 ULPs in practice.
    ulp_of_u64(mag).saturating_mul(4)
}
