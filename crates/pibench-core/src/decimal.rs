//! Fixed-precision decimal arithmetic on scaled integers.
//!
//! A [`Decimal`] stores `value * 10^digits` as a `BigInt`. All operations go
//! through a [`Precision`] context that is built once per benchmark run and
//! borrowed immutably, so concurrent workers never share mutable state.
//! Multiplication, division, and square roots truncate toward zero.
//!
//! The same context also builds [`Float`] values: binary floating-point
//! numbers whose mantissa is held at a fixed width of
//! [`Precision::float_bits`], so an operation costs the same whatever the
//! magnitude of its operands.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::constants::{FLOAT_GUARD_BITS, GUARD_DIGITS};
use crate::error::ArithmeticError;

/// Working-precision context: digit count plus the cached scale `10^digits`.
#[derive(Debug, Clone)]
pub struct Precision {
    digits: u32,
    scale: BigInt,
    float_bits: u64,
}

impl Precision {
    /// Create a context carrying exactly `digits` fractional digits.
    #[must_use]
    pub fn new(digits: u32) -> Self {
        let scale = BigInt::from(10u32).pow(digits);
        let float_bits = scale.bits() + FLOAT_GUARD_BITS;
        Self {
            digits,
            scale,
            float_bits,
        }
    }

    /// Create a context for a target digit count plus [`GUARD_DIGITS`].
    #[must_use]
    pub fn working(target_digits: u32) -> Self {
        Self::new(target_digits.saturating_add(GUARD_DIGITS))
    }

    /// Number of fractional digits carried.
    #[must_use]
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// The scale factor `10^digits`.
    #[must_use]
    pub fn scale(&self) -> &BigInt {
        &self.scale
    }

    /// The value zero.
    #[must_use]
    pub fn zero(&self) -> Decimal {
        Decimal {
            mantissa: BigInt::zero(),
            digits: self.digits,
        }
    }

    /// Lift an integer into this context.
    #[must_use]
    pub fn from_int(&self, value: impl Into<BigInt>) -> Decimal {
        Decimal {
            mantissa: value.into() * &self.scale,
            digits: self.digits,
        }
    }

    /// `a + b`.
    pub fn add(&self, a: &Decimal, b: &Decimal) -> Result<Decimal, ArithmeticError> {
        self.check(a)?;
        self.check(b)?;
        Ok(self.wrap(&a.mantissa + &b.mantissa))
    }

    /// `a - b`.
    pub fn sub(&self, a: &Decimal, b: &Decimal) -> Result<Decimal, ArithmeticError> {
        self.check(a)?;
        self.check(b)?;
        Ok(self.wrap(&a.mantissa - &b.mantissa))
    }

    /// `a * b`, truncated to the working precision.
    pub fn mul(&self, a: &Decimal, b: &Decimal) -> Result<Decimal, ArithmeticError> {
        self.check(a)?;
        self.check(b)?;
        Ok(self.wrap(&a.mantissa * &b.mantissa / &self.scale))
    }

    /// `a * k` for an exact integer `k`.
    pub fn mul_int(&self, a: &Decimal, k: &BigInt) -> Result<Decimal, ArithmeticError> {
        self.check(a)?;
        Ok(self.wrap(&a.mantissa * k))
    }

    /// `a / b`, truncated to the working precision.
    pub fn div(&self, a: &Decimal, b: &Decimal) -> Result<Decimal, ArithmeticError> {
        self.check(a)?;
        self.check(b)?;
        if b.mantissa.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(self.wrap(&a.mantissa * &self.scale / &b.mantissa))
    }

    /// The fixed-point quotient of two exact integers, `num / den`.
    pub fn ratio(&self, num: &BigInt, den: &BigInt) -> Result<Decimal, ArithmeticError> {
        if den.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(self.wrap(num * &self.scale / den))
    }

    /// `sqrt(a)`, truncated to the working precision.
    pub fn sqrt(&self, a: &Decimal) -> Result<Decimal, ArithmeticError> {
        self.check(a)?;
        if a.mantissa.is_negative() {
            return Err(ArithmeticError::NegativeSqrt);
        }
        // sqrt(m / s) * s == sqrt(m * s)
        Ok(self.wrap((&a.mantissa * &self.scale).sqrt()))
    }

    /// Mantissa width of every [`Float`] built by this context.
    #[must_use]
    pub fn float_bits(&self) -> u64 {
        self.float_bits
    }

    /// `value` as a [`Float`], truncated to [`float_bits`](Self::float_bits).
    #[must_use]
    pub fn float(&self, value: &BigInt) -> Float {
        self.normalize(value.clone(), 0)
    }

    /// `a * b`.
    #[must_use]
    pub fn float_mul(&self, a: &Float, b: &Float) -> Float {
        self.normalize(&a.mantissa * &b.mantissa, a.exponent + b.exponent)
    }

    /// `a / b`.
    pub fn float_div(&self, a: &Float, b: &Float) -> Result<Float, ArithmeticError> {
        if b.mantissa.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        if a.mantissa.is_zero() {
            return Ok(Float::zero());
        }
        // Shift so the quotient carries at least `float_bits` bits.
        let shift = signed(self.float_bits) + signed(b.bits()) - signed(a.bits());
        let quotient = if shift >= 0 {
            shl(&a.mantissa, shift.unsigned_abs()) / &b.mantissa
        } else {
            &a.mantissa / shl(&b.mantissa, shift.unsigned_abs())
        };
        Ok(self.normalize(quotient, a.exponent - b.exponent - shift))
    }

    /// `base^exp` by repeated squaring.
    #[must_use]
    pub fn float_pow(&self, base: &BigInt, mut exp: u64) -> Float {
        let mut result = self.float(&BigInt::one());
        let mut square = self.float(base);
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.float_mul(&result, &square);
            }
            exp >>= 1;
            if exp > 0 {
                square = self.float_mul(&square, &square);
            }
        }
        result
    }

    /// `a * mul / div` for small exact integers `mul` and `div`.
    pub fn float_scale(
        &self,
        a: &Float,
        mul: &BigInt,
        div: &BigInt,
    ) -> Result<Float, ArithmeticError> {
        if div.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let headroom = div.bits();
        let quotient = shl(&(&a.mantissa * mul), headroom) / div;
        Ok(self.normalize(quotient, a.exponent - signed(headroom)))
    }

    /// The decimal whose mantissa is `a * k` truncated toward zero, reading
    /// `a` in units of the last fractional digit.
    #[must_use]
    pub fn from_ulps(&self, a: &Float, k: &BigInt) -> Decimal {
        let value = &a.mantissa * k;
        let mantissa = if a.exponent >= 0 {
            shl(&value, a.exponent.unsigned_abs())
        } else {
            shr_trunc(&value, a.exponent.unsigned_abs())
        };
        self.wrap(mantissa)
    }

    fn normalize(&self, mantissa: BigInt, exponent: i64) -> Float {
        let excess = mantissa.bits().saturating_sub(self.float_bits);
        if excess == 0 {
            Float { mantissa, exponent }
        } else {
            Float {
                mantissa: shr_trunc(&mantissa, excess),
                exponent: exponent + signed(excess),
            }
        }
    }

    fn wrap(&self, mantissa: BigInt) -> Decimal {
        Decimal {
            mantissa,
            digits: self.digits,
        }
    }

    fn check(&self, value: &Decimal) -> Result<(), ArithmeticError> {
        if value.digits == self.digits {
            Ok(())
        } else {
            Err(ArithmeticError::PrecisionMismatch {
                left: self.digits,
                right: value.digits,
            })
        }
    }
}

fn signed(bits: u64) -> i64 {
    i64::try_from(bits).unwrap_or(i64::MAX)
}

fn shl(value: &BigInt, bits: u64) -> BigInt {
    value << usize::try_from(bits).unwrap_or(usize::MAX)
}

/// `value / 2^bits`, truncated toward zero.
fn shr_trunc(value: &BigInt, bits: u64) -> BigInt {
    if bits >= value.bits() {
        return BigInt::zero();
    }
    let bits = usize::try_from(bits).unwrap_or(usize::MAX);
    if value.is_negative() {
        -((-value) >> bits)
    } else {
        value >> bits
    }
}

/// Binary floating-point value `mantissa * 2^exponent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Float {
    mantissa: BigInt,
    exponent: i64,
}

impl Float {
    fn zero() -> Self {
        Self {
            mantissa: BigInt::zero(),
            exponent: 0,
        }
    }

    #[must_use]
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    #[must_use]
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Width of the mantissa in bits.
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.mantissa.bits()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }
}

/// A fixed-point decimal tied to the digit count of the context that built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    mantissa: BigInt,
    digits: u32,
}

impl Decimal {
    /// The scaled integer `value * 10^digits`.
    #[must_use]
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// Number of fractional digits.
    #[must_use]
    pub fn digits(&self) -> u32 {
        self.digits
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.mantissa.is_positive()
    }

    /// Distance to `other` in units of the last place, saturating at
    /// `u64::MAX`; decimals of different digit counts are infinitely apart.
    #[must_use]
    pub fn ulps_from(&self, other: &Decimal) -> u64 {
        if self.digits != other.digits {
            return u64::MAX;
        }
        (&self.mantissa - &other.mantissa)
            .abs()
            .to_u64()
            .unwrap_or(u64::MAX)
    }

    /// Count the leading digits shared with a reference decimal string.
    ///
    /// Sign and decimal point are compared but not counted.
    ///
    /// # Example
    /// ```
    /// use pibench_core::decimal::Precision;
    ///
    /// let ctx = Precision::new(4);
    /// let x = ctx.from_int(22);
    /// let seven = ctx.from_int(7);
    /// let approx = ctx.div(&x, &seven).unwrap(); // 3.1428
    /// assert_eq!(approx.matching_digits("3.14159"), 3);
    /// ```
    #[must_use]
    pub fn matching_digits(&self, reference: &str) -> usize {
        self.to_string()
            .chars()
            .zip(reference.chars())
            .take_while(|(a, b)| a == b)
            .filter(|(a, _)| a.is_ascii_digit())
            .count()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.digits as usize;
        let raw = self.mantissa.abs().to_string();
        let padded = if raw.len() <= digits {
            format!("{}{raw}", "0".repeat(digits + 1 - raw.len()))
        } else {
            raw
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - digits);
        let sign = if self.mantissa.is_negative() { "-" } else { "" };
        if digits == 0 {
            write!(f, "{sign}{int_part}")
        } else {
            write!(f, "{sign}{int_part}.{frac_part}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_adds_guard_digits() {
        let ctx = Precision::working(100);
        assert_eq!(ctx.digits(), 100 + GUARD_DIGITS);
    }

    #[test]
    fn add_and_sub() {
        let ctx = Precision::new(6);
        let a = ctx.from_int(5);
        let b = ctx.from_int(3);
        assert_eq!(ctx.add(&a, &b).unwrap(), ctx.from_int(8));
        assert_eq!(ctx.sub(&b, &a).unwrap(), ctx.from_int(-2));
    }

    #[test]
    fn div_truncates() {
        let ctx = Precision::new(10);
        let third = ctx.div(&ctx.from_int(1), &ctx.from_int(3)).unwrap();
        assert_eq!(third.to_string(), "0.3333333333");
        let neg = ctx.div(&ctx.from_int(-2), &ctx.from_int(3)).unwrap();
        assert_eq!(neg.to_string(), "-0.6666666666");
    }

    #[test]
    fn mul_rescales() {
        let ctx = Precision::new(4);
        let third = ctx.div(&ctx.from_int(1), &ctx.from_int(3)).unwrap();
        let product = ctx.mul(&third, &ctx.from_int(3)).unwrap();
        assert_eq!(product.to_string(), "0.9999");
        let scaled = ctx.mul_int(&third, &BigInt::from(6)).unwrap();
        assert_eq!(scaled.to_string(), "1.9998");
    }

    #[test]
    fn sqrt_of_two() {
        let ctx = Precision::new(20);
        let root = ctx.sqrt(&ctx.from_int(2)).unwrap();
        assert_eq!(root.to_string(), "1.41421356237309504880");
    }

    #[test]
    fn ratio_of_integers() {
        let ctx = Precision::new(3);
        let r = ctx.ratio(&BigInt::from(1), &BigInt::from(8)).unwrap();
        assert_eq!(r.to_string(), "0.125");
    }

    #[test]
    fn division_by_zero_fails() {
        let ctx = Precision::new(5);
        let err = ctx.div(&ctx.from_int(1), &ctx.zero()).unwrap_err();
        assert_eq!(err, ArithmeticError::DivisionByZero);
        let err = ctx.ratio(&BigInt::from(1), &BigInt::zero()).unwrap_err();
        assert_eq!(err, ArithmeticError::DivisionByZero);
    }

    #[test]
    fn negative_sqrt_fails() {
        let ctx = Precision::new(5);
        let err = ctx.sqrt(&ctx.from_int(-4)).unwrap_err();
        assert_eq!(err, ArithmeticError::NegativeSqrt);
    }

    #[test]
    fn mixed_precision_fails() {
        let narrow = Precision::new(5);
        let wide = Precision::new(8);
        let err = wide.add(&wide.from_int(1), &narrow.from_int(1)).unwrap_err();
        assert_eq!(err, ArithmeticError::PrecisionMismatch { left: 8, right: 5 });
    }

    #[test]
    fn operands_are_not_mutated() {
        let ctx = Precision::new(6);
        let a = ctx.from_int(7);
        let b = ctx.from_int(2);
        let _ = ctx.div(&a, &b).unwrap();
        let _ = ctx.mul(&a, &b).unwrap();
        assert_eq!(a, ctx.from_int(7));
        assert_eq!(b, ctx.from_int(2));
    }

    #[test]
    fn display_small_values() {
        let ctx = Precision::new(3);
        assert_eq!(ctx.zero().to_string(), "0.000");
        let tiny = ctx.ratio(&BigInt::from(1), &BigInt::from(1000)).unwrap();
        assert_eq!(tiny.to_string(), "0.001");
        assert_eq!(Precision::new(0).from_int(42).to_string(), "42");
    }

    #[test]
    fn ulps_between_decimals() {
        let ctx = Precision::new(4);
        let a = ctx.ratio(&BigInt::from(1), &BigInt::from(3)).unwrap();
        let b = ctx.ratio(&BigInt::from(1), &BigInt::from(4)).unwrap();
        assert_eq!(a.ulps_from(&b), 833);
        assert_eq!(b.ulps_from(&a), 833);
        assert_eq!(a.ulps_from(&a), 0);
        assert_eq!(a.ulps_from(&Precision::new(5).zero()), u64::MAX);
    }

    #[test]
    fn float_width_follows_scale() {
        let ctx = Precision::new(100);
        assert_eq!(ctx.float_bits(), ctx.scale().bits() + FLOAT_GUARD_BITS);
        let wide = ctx.float(&(BigInt::one() << 1_000usize));
        assert_eq!(wide.bits(), ctx.float_bits());
        assert_eq!(wide.exponent(), 1_001 - i64::try_from(ctx.float_bits()).unwrap());
    }

    #[test]
    fn float_small_integers_are_exact() {
        let ctx = Precision::new(10);
        let six = ctx.float(&BigInt::from(6));
        let product = ctx.float_mul(&six, &ctx.float(&BigInt::from(7)));
        assert_eq!(ctx.from_ulps(&product, &BigInt::one()).mantissa(), &BigInt::from(42));
        let pow = ctx.float_pow(&BigInt::from(-3), 5);
        assert_eq!(ctx.from_ulps(&pow, &BigInt::one()).mantissa(), &BigInt::from(-243));
        assert_eq!(ctx.float_pow(&BigInt::from(9), 0), ctx.float(&BigInt::one()));
    }

    #[test]
    fn float_division_keeps_relative_precision() {
        let ctx = Precision::new(20);
        let third = ctx
            .float_div(&ctx.float(ctx.scale()), &ctx.float(&BigInt::from(3)))
            .unwrap();
        assert_eq!(third.bits(), ctx.float_bits());
        assert_eq!(ctx.from_ulps(&third, &BigInt::one()).to_string(), "0.33333333333333333333");

        // A tiny value keeps its full width; only the exponent moves.
        let huge = ctx.float(&(BigInt::one() << 200usize));
        let tiny = ctx.float_div(&third, &huge).unwrap();
        assert_eq!(tiny.bits(), ctx.float_bits());
        assert!(ctx.from_ulps(&tiny, &BigInt::one()).is_zero());
        let back = ctx.float_mul(&tiny, &huge);
        assert_eq!(ctx.from_ulps(&back, &BigInt::one()).to_string(), "0.33333333333333333333");
    }

    #[test]
    fn float_scale_truncates_toward_zero() {
        let ctx = Precision::new(6);
        let one = ctx.float(ctx.scale());
        let neg = ctx
            .float_scale(&one, &BigInt::from(2), &BigInt::from(-3))
            .unwrap();
        assert_eq!(ctx.from_ulps(&neg, &BigInt::one()).to_string(), "-0.666666");
        let back = ctx
            .float_scale(&neg, &BigInt::from(-3), &BigInt::from(2))
            .unwrap();
        assert!(ctx.from_ulps(&back, &BigInt::one()).ulps_from(&ctx.from_int(1)) <= 1);
    }

    #[test]
    fn float_division_by_zero_fails() {
        let ctx = Precision::new(5);
        let one = ctx.float(&BigInt::one());
        let zero = ctx.float(&BigInt::zero());
        assert_eq!(ctx.float_div(&one, &zero), Err(ArithmeticError::DivisionByZero));
        assert_eq!(
            ctx.float_scale(&one, &BigInt::one(), &BigInt::zero()),
            Err(ArithmeticError::DivisionByZero)
        );
        assert!(ctx.float_div(&zero, &one).unwrap().is_zero());
    }

    #[test]
    fn matching_digits_counts_prefix() {
        let ctx = Precision::new(5);
        let value = ctx.ratio(&BigInt::from(314_160), &BigInt::from(100_000)).unwrap();
        assert_eq!(value.to_string(), "3.14160");
        assert_eq!(value.matching_digits("3.14159"), 5);
        assert_eq!(value.matching_digits("2.7"), 0);
    }
}
