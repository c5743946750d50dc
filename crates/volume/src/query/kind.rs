//! The `kind` primary: matches entries by their schema path.

use super::predicate::{StringPredicate, ValueType};
use super::primary::Primary;
use super::schema::{Entry, EntrySchema};

/// Matches entries by the path of their schema.
///
/// Only entries that carry a schema have a kind; every other entry fails
/// without consulting the wrapped predicate.
#[derive(Debug, Clone)]
pub struct Kind<P> {
    predicate: P,
}

impl<P: StringPredicate> Kind<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }
}

impl<P: StringPredicate> Primary for Kind<P> {
    fn name(&self) -> &'static str {
        "kind"
    }

    fn value_type(&self) -> ValueType {
        ValueType::String
    }

    // TODO: normalize schema paths into kind values (strip plugin-specific
    // segments) once the walker defines that mapping.
    fn eval_entry_schema(&self, schema: &EntrySchema) -> bool {
        self.predicate.eval_string(schema.path())
    }

    fn eval_entry(&self, entry: &Entry) -> bool {
        match entry.schema() {
            Some(schema) => self.eval_entry_schema(schema),
            None => false,
        }
    }
}
