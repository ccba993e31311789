use bigdecimal::{BigDecimal, ParseBigDecimalError, ToPrimitive};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
const SCALE: i64 = 10_000;

/// Largest amount a single transaction or budget may carry: one billion.
///
/// At 10^13 units this stays below 2^53, so every accepted amount converts
/// to `f64` and back without losing a digit, and sums of up to ~900 000 such
/// amounts still fit in `i64`.
pub const MAX_AMOUNT: Money = Money(1_000_000_000 * SCALE);

#[derive(Debug, Clone, Copy, Default)]
/// A monetary amount held as an integer count of 1/10 000 units.
///
/// Amounts enter the ledger as raw numbers or text and are rounded to four
/// decimal places once, at the boundary. Every sum, difference and
/// percentage after that is exact integer arithmetic, so `income - expense`
/// always equals the balance to the last unit.
///
/// # Examples
/// ```
/// use finance_tracker::common::money::Money;
///
/// let amount = Money::from_f64(12.5).unwrap();
/// assert_eq!(amount.as_i64(), 125_000);
/// assert_eq!(amount.to_string_2dp(), "12.50");
/// assert_eq!(amount.to_string_4dp(), "12.5000");
/// ```
pub struct Money(i64);

impl Money {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Money(0)
    }

    /// Converts a raw number, rounding to four decimal places.
    ///
    /// Returns `None` for NaN, infinities and values outside the `i64` range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // f64's Display is the shortest string that reads back to the same
        // value, so `0.1` parses as exactly one tenth.
        value.to_string().parse().ok()
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// `self / whole * 100`, rounded half up. Zero when `whole` is not positive.
    pub fn percent_of(&self, whole: Money) -> i64 {
        if whole.0 <= 0 {
            return 0;
        }
        let part = i128::from(self.0);
        let whole = i128::from(whole.0);
        let pct = (part * 200 + whole).div_euclid(whole * 2);
        pct.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    pub fn to_string_2dp(&self) -> String {
        let bd = BigDecimal::from(self.0) / BigDecimal::from(SCALE);
        format!("{:.2}", bd)
    }

    pub fn to_string_4dp(&self) -> String {
        let bd = BigDecimal::from(self.0) / BigDecimal::from(SCALE);
        format!("{:.4}", bd)
    }
}

impl std::str::FromStr for Money {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() {
            return Err(ParseBigDecimalError::Other("empty amount".into()));
        }

        let bd: BigDecimal = t.parse()?;

        let scaled = (bd * BigDecimal::from(SCALE)).round(0);
        let value: i64 = scaled
            .to_i64()
            .ok_or_else(|| ParseBigDecimalError::Other("amount overflow".into()))?;

        Ok(Money(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_2dp())
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Money {}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}
