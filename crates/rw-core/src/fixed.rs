//! Fixed-point helpers shared by every behavior routine.
//!
//! All division in the engine goes through [`safe_divide`] or
//! [`safe_remainder`]; the raw `/` and `%` operators on runtime values are
//! not used anywhere else.

use crate::error::DivisionFault;

/// Halve a signed product, rounding the way an arithmetic shift with a
/// sign-bit bias does: `(product + sign_bit) >> 1`.
pub fn rounded_half(product: i32) -> i32 {
    let sign_bit = ((product as u32) >> 31) as i32;
    (product + sign_bit) >> 1
}

/// Truncating integer division that refuses zero and overflowing operands.
pub fn safe_divide(numerator: i32, denominator: i32) -> Result<i32, DivisionFault> {
    check_divisor(numerator, denominator)?;
    Ok(numerator / denominator)
}

/// Remainder with the same guards as [`safe_divide`].
pub fn safe_remainder(numerator: i32, denominator: i32) -> Result<i32, DivisionFault> {
    check_divisor(numerator, denominator)?;
    Ok(numerator % denominator)
}

fn check_divisor(numerator: i32, denominator: i32) -> Result<(), DivisionFault> {
    if denominator == 0 {
        return Err(DivisionFault::ByZero { numerator });
    }
    if denominator == -1 && numerator == i32::MIN {
        return Err(DivisionFault::Overflow { numerator });
    }
    Ok(())
}

/// `(a * b) >> shift` on a 64-bit intermediate.
///
/// Negative products get a `(1 << shift) - 1` bias before shifting. The
/// result is truncated back to 32 bits. `shift` must be below 32.
pub fn scaled_multiply_shift(a: i32, b: i32, shift: u32) -> i32 {
    debug_assert!(shift < 32, "shift out of range: {shift}");
    let shift = shift & 31;
    let product = i64::from(a) * i64::from(b);
    let biased = if product < 0 {
        product + ((1_i64 << shift) - 1)
    } else {
        product
    };
    (biased >> shift) as i32
}

/// Clamp `value` into `[-|limit|, |limit|]`.
pub fn clamp_magnitude(value: i32, limit: i32) -> i32 {
    let bound = limit.saturating_abs();
    value.clamp(-bound, bound)
}
