//! Value predicates wrapped by primaries.
//!
//! A value predicate knows how to match one kind of value (a string, a
//! number, a point in time) and nothing about entries. Primaries decide which
//! value of an entry or schema is handed to it.

use std::fmt;

use chrono::{DateTime, Utc};

/// The semantic type a primary operates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Numeric,
    Time,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Numeric => "Numeric",
            Self::Time => "Time",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait StringPredicate: Send + Sync {
    fn eval_string(&self, value: &str) -> bool;
}

pub trait NumericPredicate: Send + Sync {
    fn eval_numeric(&self, value: u64) -> bool;
}

pub trait TimePredicate: Send + Sync {
    fn eval_time(&self, value: DateTime<Utc>) -> bool;
}

impl<F> StringPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn eval_string(&self, value: &str) -> bool {
        self(value)
    }
}

impl<F> NumericPredicate for F
where
    F: Fn(u64) -> bool + Send + Sync,
{
    fn eval_numeric(&self, value: u64) -> bool {
        self(value)
    }
}

impl<F> TimePredicate for F
where
    F: Fn(DateTime<Utc>) -> bool + Send + Sync,
{
    fn eval_time(&self, value: DateTime<Utc>) -> bool {
        self(value)
    }
}
