//! Size predicate parsing and matching.

use crate::error::{Result, VolumeError};

use super::compare::{split_comparison, split_range, within, CompareOp};
use super::predicate::NumericPredicate;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;

/// A parsed size predicate, e.g. `>10mb`, `1k..4k` or `empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizePredicate {
    Compare(CompareOp, u64),
    Range { min: Option<u64>, max: Option<u64> },
}

impl SizePredicate {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(query_error("size: requires a value"));
        }

        if let Some((op, value)) = split_comparison(trimmed) {
            if size_keyword(value).is_some() {
                return Err(query_error(
                    "size keywords cannot be used with comparison operators",
                ));
            }
            return Ok(Self::Compare(op, parse_size_literal(value)?));
        }

        if let Some((start, end)) = split_range(trimmed) {
            let min = optional_literal(start)?;
            let max = optional_literal(end)?;
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(query_error(
                        "size range start must be less than or equal to end",
                    ));
                }
            }
            return Ok(Self::Range { min, max });
        }

        if let Some((min, max)) = size_keyword(trimmed) {
            return Ok(Self::Range { min, max });
        }

        Ok(Self::Compare(CompareOp::Eq, parse_size_literal(trimmed)?))
    }

    pub fn matches(&self, size: u64) -> bool {
        match *self {
            Self::Compare(op, right) => op.apply(size, right),
            Self::Range { min, max } => within(size, min, max),
        }
    }
}

impl NumericPredicate for SizePredicate {
    fn eval_numeric(&self, value: u64) -> bool {
        self.matches(value)
    }
}

fn query_error(message: &str) -> VolumeError {
    VolumeError::QueryParse(message.to_string())
}

fn optional_literal(raw: &str) -> Result<Option<u64>> {
    if raw.is_empty() {
        Ok(None)
    } else {
        parse_size_literal(raw).map(Some)
    }
}

fn size_keyword(raw: &str) -> Option<(Option<u64>, Option<u64>)> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "empty" => Some((Some(0), Some(0))),
        "tiny" => Some((Some(0), Some(10 * KB))),
        "small" => Some((Some(10 * KB + 1), Some(100 * KB))),
        "medium" => Some((Some(100 * KB + 1), Some(MB))),
        "large" => Some((Some(MB + 1), Some(16 * MB))),
        "huge" => Some((Some(16 * MB + 1), Some(128 * MB))),
        "gigantic" | "giant" => Some((Some(128 * MB + 1), None)),
        _ => None,
    }
}

/// Parses `12`, `1.5k`, `10 MB` and similar into bytes.
fn parse_size_literal(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    if number.is_empty() {
        return Err(VolumeError::QueryParse(format!(
            "size: expected a numeric value in {raw:?}"
        )));
    }

    let value: f64 = number.parse().map_err(|_| {
        VolumeError::QueryParse(format!("size: failed to parse number in {raw:?}"))
    })?;
    let bytes = (value * size_unit_multiplier(unit)? as f64).round();
    if !bytes.is_finite() {
        return Err(VolumeError::QueryParse(format!(
            "size: value {raw:?} is out of range"
        )));
    }
    // Float-to-int casts saturate.
    Ok(bytes as u64)
}

fn size_unit_multiplier(unit: &str) -> Result<u64> {
    let exponent = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" | "byte" | "bytes" => 0,
        "k" | "kb" | "kib" | "kilobyte" | "kilobytes" => 1,
        "m" | "mb" | "mib" | "megabyte" | "megabytes" => 2,
        "g" | "gb" | "gib" | "gigabyte" | "gigabytes" => 3,
        "t" | "tb" | "tib" | "terabyte" | "terabytes" => 4,
        "p" | "pb" | "pib" | "petabyte" | "petabytes" => 5,
        _ => {
            return Err(VolumeError::QueryParse(format!(
                "unknown size unit: {unit}"
            )))
        }
    };
    Ok(KB.pow(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comparisons_with_units() {
        let predicate = SizePredicate::parse(">1.5k").expect("parse");
        assert_eq!(predicate, SizePredicate::Compare(CompareOp::Gt, 1536));
        assert!(predicate.matches(1537));
        assert!(!predicate.matches(1536));

        let predicate = SizePredicate::parse("<= 2 MB").expect("parse");
        assert!(predicate.matches(2 * MB));
        assert!(!predicate.matches(2 * MB + 1));
    }

    #[test]
    fn bare_number_is_equality() {
        let predicate = SizePredicate::parse("96").expect("parse");
        assert!(predicate.matches(96));
        assert!(!predicate.matches(64));
    }

    #[test]
    fn parses_ranges_and_keywords() {
        let predicate = SizePredicate::parse("1k..4k").expect("parse");
        assert!(predicate.matches(2048));
        assert!(!predicate.matches(5000));

        let predicate = SizePredicate::parse("..10").expect("parse");
        assert!(predicate.matches(0));

        let empty = SizePredicate::parse("empty").expect("parse");
        assert!(empty.matches(0));
        assert!(!empty.matches(1));
        assert!(SizePredicate::parse("gigantic").expect("parse").matches(u64::MAX));
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(SizePredicate::parse("").is_err());
        assert!(SizePredicate::parse(">large").is_err());
        assert!(SizePredicate::parse("4k..1k").is_err());
        assert!(SizePredicate::parse("10 parsecs").is_err());
        assert!(SizePredicate::parse("mb").is_err());
    }

    #[test]
    fn usable_as_numeric_predicate() {
        let predicate: &dyn NumericPredicate = &SizePredicate::parse(">0").expect("parse");
        assert!(predicate.eval_numeric(1));
    }
}
