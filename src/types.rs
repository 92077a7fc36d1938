//! Core value objects and errors for the reconciliation domain

use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, ToPrimitive, Zero};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

use crate::traits::{Clock, SystemClock};

/// Number of decimal places every amount is quantized to
pub const AMOUNT_SCALE: i64 = 2;

/// Monetary value quantized to the cent
///
/// Every constructor and every arithmetic operation rounds half-up to
/// [`AMOUNT_SCALE`] decimal places, so two amounts compare equal exactly when
/// their cent values are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "BigDecimal", into = "BigDecimal")]
pub struct Amount {
    value: BigDecimal,
}

impl Amount {
    fn quantize(value: &BigDecimal) -> BigDecimal {
        value.with_scale_round(AMOUNT_SCALE, RoundingMode::HalfUp)
    }

    /// Create an amount from a raw floating point value
    pub fn try_from_f64(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::InvalidAmount(format!(
                "Amount must be a valid number, got {value}"
            )));
        }

        let decimal = BigDecimal::from_f64(value).ok_or_else(|| {
            DomainError::InvalidAmount(format!("Amount must be a valid number, got {value}"))
        })?;

        Ok(Self::from(decimal))
    }

    /// Create an amount from a number of cents
    pub fn from_cents(cents: i64) -> Self {
        Self {
            value: BigDecimal::new(cents.into(), AMOUNT_SCALE),
        }
    }

    /// The zero amount
    pub fn zero() -> Self {
        Self::from_cents(0)
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Add two amounts
    pub fn add(&self, other: &Amount) -> Amount {
        Self::from(&self.value + &other.value)
    }

    /// Subtract `other` from this amount
    pub fn subtract(&self, other: &Amount) -> Amount {
        Self::from(&self.value - &other.value)
    }

    /// The underlying decimal value, always at cent scale
    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    /// Lossy conversion used when a plain number has to leave the domain
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(f64::NAN)
    }
}

impl From<BigDecimal> for Amount {
    fn from(value: BigDecimal) -> Self {
        Self {
            value: Self::quantize(&value),
        }
    }
}

impl From<Amount> for BigDecimal {
    fn from(amount: Amount) -> Self {
        amount.value
    }
}

impl TryFrom<f64> for Amount {
    type Error = DomainError;

    fn try_from(value: f64) -> DomainResult<Self> {
        Self::try_from_f64(value)
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        BigDecimal::from_str(s.trim())
            .map(Self::from)
            .map_err(|_| DomainError::InvalidAmount(format!("Amount must be a valid number, got '{s}'")))
    }
}

impl Add<&Amount> for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount::add(self, rhs)
    }
}

impl Sub<&Amount> for &Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Amount {
        self.subtract(rhs)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |total, amount| total.add(amount))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A validated point in time attached to an operation or a statement
///
/// Ordering uses the full instant. Day-level checks (`is_same_day`, the
/// future-date rule) only look at the UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CalendarDate(DateTime<Utc>);

impl CalendarDate {
    const NAIVE_FORMATS: [&'static str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

    /// Parse a date against the system clock
    pub fn parse(input: &str) -> DomainResult<Self> {
        Self::parse_with_clock(input, &SystemClock)
    }

    /// Parse a date, rejecting days later than the clock's today
    pub fn parse_with_clock(input: &str, clock: &dyn Clock) -> DomainResult<Self> {
        let instant = Self::parse_instant(input).ok_or_else(|| {
            DomainError::InvalidDate(format!("Invalid operation date '{input}'"))
        })?;
        Self::from_instant(instant, clock)
    }

    /// Build a date at midnight UTC of the given day
    pub fn from_ymd(year: i32, month: u32, day: u32, clock: &dyn Clock) -> DomainResult<Self> {
        let instant = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or_else(|| {
                DomainError::InvalidDate(format!(
                    "Invalid operation date {year:04}-{month:02}-{day:02}"
                ))
            })?;
        Self::from_instant(instant, clock)
    }

    /// Wrap an instant, rejecting days later than the clock's today
    pub fn from_instant(instant: DateTime<Utc>, clock: &dyn Clock) -> DomainResult<Self> {
        if instant.date_naive() > clock.now().date_naive() {
            return Err(DomainError::InvalidDate(
                "Operation date cannot be in the future".to_string(),
            ));
        }
        Ok(Self(instant))
    }

    fn parse_instant(input: &str) -> Option<DateTime<Utc>> {
        let input = input.trim();

        if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
            return Some(instant.with_timezone(&Utc));
        }

        for format in Self::NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Some(naive.and_utc());
            }
        }

        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// The full instant
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// The calendar day (UTC)
    pub fn day(&self) -> NaiveDate {
        self.0.date_naive()
    }

    pub fn is_before(&self, other: &CalendarDate) -> bool {
        self.0 < other.0
    }

    pub fn is_after(&self, other: &CalendarDate) -> bool {
        self.0 > other.0
    }

    pub fn is_before_or_equal(&self, other: &CalendarDate) -> bool {
        self.0 <= other.0
    }

    pub fn is_after_or_equal(&self, other: &CalendarDate) -> bool {
        self.0 >= other.0
    }

    /// Whether both dates fall on the same calendar day, ignoring time of day
    pub fn is_same_day(&self, other: &CalendarDate) -> bool {
        self.day() == other.day()
    }

    /// Whether this date lies between `start` and `end`
    ///
    /// Bounds are excluded unless `inclusive` is set.
    pub fn is_between(&self, start: &CalendarDate, end: &CalendarDate, inclusive: bool) -> bool {
        if inclusive {
            self.0 >= start.0 && self.0 <= end.0
        } else {
            self.0 > start.0 && self.0 < end.0
        }
    }

    /// Sign of the difference between this date and `other`
    pub fn compare(&self, other: &CalendarDate) -> Ordering {
        self.0.cmp(&other.0)
    }

    /// RFC 3339 rendering of the full instant
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Operation wording, canonicalized for comparison
///
/// Accents are stripped, whitespace runs collapse to one space and the text
/// is upper-cased, so `"  Prélèvement   edf "` and `"PRELEVEMENT EDF"` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NormalizedLabel(String);

impl NormalizedLabel {
    pub fn new(value: &str) -> DomainResult<Self> {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidLabel(
                "Label cannot be empty".to_string(),
            ));
        }
        Ok(Self(Self::normalize(value)))
    }

    fn normalize(value: &str) -> String {
        let stripped: String = value
            .nfd()
            .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
            .collect();

        stripped
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    }

    /// Case and accent insensitive substring check
    pub fn includes(&self, needle: &str) -> bool {
        self.0.contains(&Self::normalize(needle))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NormalizedLabel {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::new(&value)
    }
}

impl From<NormalizedLabel> for String {
    fn from(label: NormalizedLabel) -> Self {
        label.0
    }
}

impl fmt::Display for NormalizedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while building domain objects from raw input
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid label: {0}")]
    InvalidLabel(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Invalid checkpoint: {0}")]
    InvalidCheckpoint(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for domain construction
pub type DomainResult<T> = Result<T, DomainError>;
