//! Comparison and range syntax shared by numeric and time predicates.

/// A comparison operator prefix such as `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Ne,
}

impl CompareOp {
    // Two-character operators must be tried first.
    const PREFIXES: [(&'static str, CompareOp); 6] = [
        ("<=", CompareOp::Lte),
        (">=", CompareOp::Gte),
        ("!=", CompareOp::Ne),
        ("<", CompareOp::Lt),
        (">", CompareOp::Gt),
        ("=", CompareOp::Eq),
    ];

    pub fn apply<T: PartialOrd>(self, left: T, right: T) -> bool {
        match self {
            Self::Lt => left < right,
            Self::Lte => left <= right,
            Self::Gt => left > right,
            Self::Gte => left >= right,
            Self::Eq => left == right,
            Self::Ne => left != right,
        }
    }
}

/// Splits a leading comparison operator off `raw`.
///
/// Returns `None` when there is no operator or nothing follows it.
pub fn split_comparison(raw: &str) -> Option<(CompareOp, &str)> {
    CompareOp::PREFIXES.iter().find_map(|(prefix, op)| {
        let value = raw.strip_prefix(prefix)?.trim();
        (!value.is_empty()).then_some((*op, value))
    })
}

/// Splits `start..end` into its bounds; either side may be empty.
pub fn split_range(raw: &str) -> Option<(&str, &str)> {
    let (start, end) = raw.split_once("..")?;
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() && end.is_empty() {
        return None;
    }
    Some((start, end))
}

/// Inclusive bounds check with optional ends.
pub fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |minimum| value >= minimum) && max.map_or(true, |maximum| value <= maximum)
}
