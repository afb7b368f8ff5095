use std::fmt;
use std::ops::{Add, Sub};

use super::error::DomainError;

/// Monetary amount with exact fixed precision
pub trait AmountType:
    Copy + Ord + Add<Output = Self> + Sub<Output = Self> + Default + Send + Sync + fmt::Debug
{
    /// Parse from decimal string (e.g., "100.00", "-12.5", "+3")
    fn from_decimal_str(s: &str) -> Result<Self, DomainError>;

    /// Convert to decimal string at full precision
    fn to_decimal_string(&self) -> String;

    /// Convert to decimal string rounded half away from zero to `places` digits
    fn to_rounded_string(&self, places: u32) -> String;

    /// Checked addition, returns None on overflow
    fn checked_add(&self, other: Self) -> Option<Self>;

    /// Checked subtraction, returns None on underflow
    fn checked_sub(&self, other: Self) -> Option<Self>;

    /// Checked negation, returns None when the value has no positive counterpart
    fn checked_neg(&self) -> Option<Self>;

    /// Absolute difference `|self - other|`, returns None on overflow
    fn abs_diff(&self, other: Self) -> Option<Self> {
        let (hi, lo) = if *self >= other {
            (*self, other)
        } else {
            (other, *self)
        };
        hi.checked_sub(lo)
    }

    /// Zero value
    fn zero() -> Self;
}

/// Fixed-point decimal stored as an i64 scaled by 10,000 (4 decimal places)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct FixedPoint(i64);

impl FixedPoint {
    const PLACES: u32 = 4;
    const SCALE: i64 = 10_i64.pow(Self::PLACES);

    /// Create from raw scaled value
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Get raw scaled value
    pub const fn raw(&self) -> i64 {
        self.0
    }

    fn render(value: i64, places: u32) -> String {
        let scale = 10_i64.pow(places);
        let abs_value = value.unsigned_abs();
        let integer_part = abs_value / scale as u64;
        let fraction_part = abs_value % scale as u64;
        let sign = if value < 0 { "-" } else { "" };

        if places == 0 {
            format!("{sign}{integer_part}")
        } else {
            format!(
                "{sign}{integer_part}.{fraction_part:0width$}",
                width = places as usize
            )
        }
    }
}

impl AmountType for FixedPoint {
    fn from_decimal_str(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();

        let (is_negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (integer_part, fraction_part) = match unsigned.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (unsigned, ""),
        };

        if integer_part.is_empty() && fraction_part.is_empty() {
            return Err(DomainError::InvalidAmount);
        }
        if fraction_part.len() > Self::PLACES as usize {
            return Err(DomainError::InvalidAmount);
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer_part) || !all_digits(fraction_part) {
            return Err(DomainError::InvalidAmount);
        }

        let integer: i64 = if integer_part.is_empty() {
            0
        } else {
            integer_part.parse().map_err(|_| DomainError::Overflow)?
        };
        let fraction: i64 = format!("{fraction_part:0<4}")
            .parse()
            .map_err(|_| DomainError::InvalidAmount)?;

        let scaled = integer
            .checked_mul(Self::SCALE)
            .and_then(|v| v.checked_add(fraction))
            .ok_or(DomainError::Overflow)?;

        Ok(Self(if is_negative { -scaled } else { scaled }))
    }

    fn to_decimal_string(&self) -> String {
        Self::render(self.0, Self::PLACES)
    }

    fn to_rounded_string(&self, places: u32) -> String {
        if places >= Self::PLACES {
            let widened = self.0 as i128 * 10_i128.pow(places - Self::PLACES);
            return match i64::try_from(widened) {
                Ok(v) => Self::render(v, places),
                Err(_) => self.to_decimal_string(),
            };
        }

        let divisor = 10_i64.pow(Self::PLACES - places);
        let half = divisor / 2;
        let magnitude = (self.0.unsigned_abs() + half as u64) / divisor as u64;
        let signed = if self.0 < 0 {
            -(magnitude as i128)
        } else {
            magnitude as i128
        };
        Self::render(signed as i64, places)
    }

    fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    fn checked_sub(&self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    fn checked_neg(&self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }

    fn zero() -> Self {
        Self(0)
    }
}

impl Add for FixedPoint {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for FixedPoint {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}
