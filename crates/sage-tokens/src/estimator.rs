//! Cheap text-to-units estimation.
//!
//! Pure and deterministic: no tokenizer, no I/O. One unit per
//! [`CHARS_PER_UNIT`] bytes, rounded up. The divisor is a tuned
//! approximation for the product's language mix, not a match for any
//! specific vendor's tokenizer.

/// Approximate bytes of text per estimated unit.
pub const CHARS_PER_UNIT: u32 = 4;

/// Estimate the unit cost of a piece of text.
///
/// `ceil(len / 4)` over the byte length. Empty text is zero.
#[must_use]
pub fn estimate_units(text: &str) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    {
        text.len().div_ceil(CHARS_PER_UNIT as usize) as u32
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
