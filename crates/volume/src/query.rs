//! Typed query primaries for the virtual filesystem.
//!
//! This module provides:
//! - The [`Primary`] contract with its two evaluation phases (schema, entry)
//! - The `kind` primary plus name, path, size and timestamp primaries
//! - Value predicates (strings, sizes, dates) that primaries wrap
//! - The entry and schema types primaries evaluate against

mod compare;
mod date_filter;
mod kind;
mod meta;
mod predicate;
mod primary;
mod schema;
mod size;
mod string_match;

pub use compare::CompareOp;
pub use date_filter::DatePredicate;
pub use kind::Kind;
pub use meta::{Name, Path, Size, TimeField, Timestamp};
pub use predicate::{NumericPredicate, StringPredicate, TimePredicate, ValueType};
pub use primary::{evaluate, prune_schemas, Primary};
pub use schema::{Entry, EntrySchema};
pub use size::SizePredicate;
pub use string_match::{wildcard_matches, StringMatchKind, StringMatcher};
