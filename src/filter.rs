//! Client-side filtering, ordering and limiting of fetched records.
//!
//! Transactions and balances take different paths:
//!
//! * Transactions are filtered on chain, date range, success, type, sender,
//!   recipient and amount, then ordered newest first. Amounts are signed
//!   integers with a 256-bit magnitude, so every uint256 quantity compares
//!   exactly.
//! * Balances are filtered on chain and magnitude only and keep their input
//!   order. Magnitudes are compared as `f64`.
//!
//! Any timestamp or bound that fails to parse aborts the whole call.

use std::cmp::Ordering;

use alloy::primitives::U256;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FilterError;
use crate::records::Record;
use crate::types::{non_empty, DataType, FilterOptions};

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(Infinity|(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?)")
        .expect("float pattern is valid")
});

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Filter, order and limit `records`, all fetched with `data_type`
pub fn apply_filters(
    records: Vec<Record>,
    data_type: DataType,
    filters: &FilterOptions,
) -> Result<Vec<Record>, FilterError> {
    let mut filtered = if data_type.is_transactions() {
        filter_transactions(records, data_type, filters)?
    } else {
        filter_balances(records, filters)
    };

    if let Some(limit) = filters.limit.filter(|limit| *limit > 0) {
        filtered.truncate(limit);
    }

    Ok(filtered)
}

/// Bounds parsed once per call
struct TransactionBounds {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    min_value: Option<Amount>,
    max_value: Option<Amount>,
}

impl TransactionBounds {
    fn parse(filters: &FilterOptions) -> Result<Self, FilterError> {
        Ok(Self {
            start: non_empty(&filters.start_date).map(parse_timestamp).transpose()?,
            end: non_empty(&filters.end_date).map(parse_timestamp).transpose()?,
            min_value: non_empty(&filters.min_value).map(parse_amount).transpose()?,
            max_value: non_empty(&filters.max_value).map(parse_amount).transpose()?,
        })
    }
}

fn filter_transactions(
    records: Vec<Record>,
    data_type: DataType,
    filters: &FilterOptions,
) -> Result<Vec<Record>, FilterError> {
    let bounds = TransactionBounds::parse(filters)?;
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        let timestamp = record
            .timestamp()
            .ok_or(FilterError::UnexpectedRecord {
                expected: data_type,
            })
            .and_then(parse_timestamp)?;

        if retain_transaction(&record, timestamp, &bounds, filters)? {
            kept.push((timestamp, record));
        }
    }

    // stable: equal timestamps keep their relative order
    kept.sort_by(|(a, _), (b, _)| b.cmp(a));

    Ok(kept.into_iter().map(|(_, record)| record).collect())
}

fn retain_transaction(
    record: &Record,
    timestamp: DateTime<Utc>,
    bounds: &TransactionBounds,
    filters: &FilterOptions,
) -> Result<bool, FilterError> {
    if !chain_matches(record, filters) {
        return Ok(false);
    }

    if bounds.start.is_some_and(|start| timestamp < start) {
        return Ok(false);
    }

    if bounds.end.is_some_and(|end| timestamp > end) {
        return Ok(false);
    }

    if filters.success_only && !record.succeeded() {
        return Ok(false);
    }

    if let (Some(expected), Some(actual)) =
        (non_empty(&filters.transaction_type), record.transaction_type())
    {
        if actual != expected {
            return Ok(false);
        }
    }

    if !address_matches(record.sender(), &filters.from)
        || !address_matches(record.recipient(), &filters.to)
    {
        return Ok(false);
    }

    if bounds.min_value.is_none() && bounds.max_value.is_none() {
        return Ok(true);
    }

    let Some(raw_value) = record.value() else {
        return Ok(true);
    };
    let value = parse_amount(raw_value)?;

    if bounds.min_value.is_some_and(|min| value < min) {
        return Ok(false);
    }

    if bounds.max_value.is_some_and(|max| value > max) {
        return Ok(false);
    }

    Ok(true)
}

fn filter_balances(records: Vec<Record>, filters: &FilterOptions) -> Vec<Record> {
    let min_value = non_empty(&filters.min_value).map(parse_float);
    let max_value = non_empty(&filters.max_value).map(parse_float);

    records
        .into_iter()
        .filter(|record| {
            if !chain_matches(record, filters) {
                return false;
            }

            let balance = record.balance().map(parse_float).unwrap_or(f64::NAN);

            // NaN on either side never excludes
            if min_value.is_some_and(|min| balance < min) {
                return false;
            }

            if max_value.is_some_and(|max| balance > max) {
                return false;
            }

            true
        })
        .collect()
}

/// A chain filter only applies to records that carry a `chain` field. A null
/// chain is carried and never matches.
fn chain_matches(record: &Record, filters: &FilterOptions) -> bool {
    match filters.chain() {
        Some(expected) if record.has_field("chain") => record.chain() == Some(expected),
        _ => true,
    }
}

fn address_matches(address: Option<&str>, allowed: &[String]) -> bool {
    match address {
        Some(address) if !allowed.is_empty() => allowed
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(address)),
        _ => true,
    }
}

/// Parse a timestamp or date into UTC.
///
/// Accepts RFC 3339 (seconds optional), bare `YYYY-MM-DD` (midnight), and naive
/// date-times with an optional ` UTC` suffix, which are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, FilterError> {
    let trimmed = raw.trim();

    if let Some(parsed) = DateTime::parse_from_rfc3339(trimmed).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(trimmed, format).ok())
    }) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    let naive = trimmed.strip_suffix(" UTC").unwrap_or(trimmed);
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .map(|parsed| parsed.and_utc())
        .ok_or_else(|| FilterError::InvalidDate(raw.to_string()))
}

/// Integer amount: a sign plus a magnitude up to `U256::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Amount {
    negative: bool,
    magnitude: U256,
}

impl Amount {
    pub const ZERO: Self = Self {
        negative: false,
        magnitude: U256::ZERO,
    };

    pub fn new(negative: bool, magnitude: U256) -> Self {
        // no negative zero
        Self {
            negative: negative && !magnitude.is_zero(),
            magnitude,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> U256 {
        self.magnitude
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self::new(false, U256::from(value))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, false) => self.magnitude.cmp(&other.magnitude),
            (true, true) => other.magnitude.cmp(&self.magnitude),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parse an integer amount. Decimal or `0x` hex with an optional sign; blank
/// reads as zero.
pub fn parse_amount(raw: &str) -> Result<Amount, FilterError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Amount::ZERO);
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    parse_magnitude(unsigned)
        .map(|magnitude| Amount::new(negative, magnitude))
        .ok_or_else(|| FilterError::InvalidValue(raw.to_string()))
}

fn parse_magnitude(digits: &str) -> Option<U256> {
    let (digits, radix) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (digits, 10),
    };

    let well_formed = !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix as u32));
    if !well_formed {
        return None;
    }

    U256::from_str_radix(digits, radix).ok()
}

/// Parse the longest numeric prefix of `raw`, or NaN when there is none
pub fn parse_float(raw: &str) -> f64 {
    FLOAT_PREFIX
        .find(raw.trim_start())
        .and_then(|prefix| prefix.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
