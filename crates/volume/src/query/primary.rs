//! The primary contract.
//!
//! A primary is a named predicate over one aspect of an entry. Every primary
//! answers two questions:
//!
//! - [`Primary::eval_entry_schema`]: can any entry of this schema match?
//!   Planners call this before listing anything, and skip whole classes of
//!   entries when it says no.
//! - [`Primary::eval_entry`]: does this concrete entry match?
//!
//! The two must agree: when the schema phase returns false for a schema, the
//! entry phase returns false for every entry carrying that schema. A primary
//! that cannot decide anything from a schema returns true there.
//!
//! Evaluation never fails. A primary that does not apply to an entry (no
//! schema, no attributes) reports a non-match.

use super::predicate::ValueType;
use super::schema::{Entry, EntrySchema};

pub trait Primary: Send + Sync {
    /// Stable identifier, e.g. `kind`.
    fn name(&self) -> &'static str;

    fn value_type(&self) -> ValueType;

    fn eval_entry_schema(&self, schema: &EntrySchema) -> bool;

    fn eval_entry(&self, entry: &Entry) -> bool;
}

/// Runs both phases against `entry`, the schema phase first when the entry
/// has a schema.
pub fn evaluate(primary: &dyn Primary, entry: &Entry) -> bool {
    if let Some(schema) = entry.schema() {
        if !primary.eval_entry_schema(schema) {
            return false;
        }
    }
    primary.eval_entry(entry)
}

/// Keeps the schemas whose entries may satisfy `primary`.
pub fn prune_schemas<'a, I>(primary: &dyn Primary, schemas: I) -> Vec<&'a EntrySchema>
where
    I: IntoIterator<Item = &'a EntrySchema>,
{
    schemas
        .into_iter()
        .filter(|schema| primary.eval_entry_schema(schema))
        .collect()
}
