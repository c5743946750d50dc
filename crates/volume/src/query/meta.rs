//! Primaries over entry names, paths and attributes.
//!
//! None of these can be decided from a schema alone, so their schema phase
//! always answers true and pruning is left to primaries such as `kind`.

use chrono::{DateTime, Utc};

use super::predicate::{NumericPredicate, StringPredicate, TimePredicate, ValueType};
use super::primary::Primary;
use super::schema::{Entry, EntrySchema};
use crate::types::EntryAttributes;

/// Matches the entry's own name.
#[derive(Debug, Clone)]
pub struct Name<P> {
    predicate: P,
}

impl<P: StringPredicate> Name<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }
}

impl<P: StringPredicate> Primary for Name<P> {
    fn name(&self) -> &'static str {
        "name"
    }

    fn value_type(&self) -> ValueType {
        ValueType::String
    }

    fn eval_entry_schema(&self, _schema: &EntrySchema) -> bool {
        true
    }

    fn eval_entry(&self, entry: &Entry) -> bool {
        self.predicate.eval_string(&entry.name)
    }
}

/// Matches the entry's full path.
#[derive(Debug, Clone)]
pub struct Path<P> {
    predicate: P,
}

impl<P: StringPredicate> Path<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }
}

impl<P: StringPredicate> Primary for Path<P> {
    fn name(&self) -> &'static str {
        "path"
    }

    fn value_type(&self) -> ValueType {
        ValueType::String
    }

    fn eval_entry_schema(&self, _schema: &EntrySchema) -> bool {
        true
    }

    fn eval_entry(&self, entry: &Entry) -> bool {
        self.predicate.eval_string(&entry.path)
    }
}

/// Matches the size attribute. Entries without attributes never match.
#[derive(Debug, Clone)]
pub struct Size<P> {
    predicate: P,
}

impl<P: NumericPredicate> Size<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }
}

impl<P: NumericPredicate> Primary for Size<P> {
    fn name(&self) -> &'static str {
        "size"
    }

    fn value_type(&self) -> ValueType {
        ValueType::Numeric
    }

    fn eval_entry_schema(&self, _schema: &EntrySchema) -> bool {
        true
    }

    fn eval_entry(&self, entry: &Entry) -> bool {
        entry
            .attributes()
            .is_some_and(|attributes| self.predicate.eval_numeric(attributes.size()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Atime,
    Mtime,
    Ctime,
}

impl TimeField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Atime => "atime",
            Self::Mtime => "mtime",
            Self::Ctime => "ctime",
        }
    }

    fn get(self, attributes: &EntryAttributes) -> DateTime<Utc> {
        match self {
            Self::Atime => attributes.atime(),
            Self::Mtime => attributes.mtime(),
            Self::Ctime => attributes.ctime(),
        }
    }
}

/// Matches one of the entry's timestamps. Entries without attributes never
/// match.
#[derive(Debug, Clone)]
pub struct Timestamp<P> {
    field: TimeField,
    predicate: P,
}

impl<P: TimePredicate> Timestamp<P> {
    pub fn new(field: TimeField, predicate: P) -> Self {
        Self { field, predicate }
    }

    pub fn atime(predicate: P) -> Self {
        Self::new(TimeField::Atime, predicate)
    }

    pub fn mtime(predicate: P) -> Self {
        Self::new(TimeField::Mtime, predicate)
    }

    pub fn ctime(predicate: P) -> Self {
        Self::new(TimeField::Ctime, predicate)
    }

    pub fn field(&self) -> TimeField {
        self.field
    }
}

impl<P: TimePredicate> Primary for Timestamp<P> {
    fn name(&self) -> &'static str {
        self.field.as_str()
    }

    fn value_type(&self) -> ValueType {
        ValueType::Time
    }

    fn eval_entry_schema(&self, _schema: &EntrySchema) -> bool {
        true
    }

    fn eval_entry(&self, entry: &Entry) -> bool {
        entry
            .attributes()
            .is_some_and(|attributes| self.predicate.eval_time(self.field.get(attributes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::date_filter::DatePredicate;
    use crate::query::primary::{evaluate, prune_schemas};
    use crate::query::size::SizePredicate;
    use crate::query::string_match::StringMatcher;
    use crate::query::Kind;
    use crate::tree::DirectoryTree;

    const DUMP: &str = "
96 1550611510 1550611448 1550611448 41ed mnt/path1
0 1550611453 1550611453 1550611453 81a4 mnt/path1/a file
2048 1550611453 1550611453 1550611453 81a4 mnt/path1/b.log
";

    fn entry(path: &str) -> Entry {
        let tree = DirectoryTree::parse(DUMP, "mnt").expect("parse");
        Entry::from_tree(&tree, path).expect("entry")
    }

    #[test]
    fn name_and_path_primaries() {
        let name = Name::new(StringMatcher::glob("*.log"));
        assert_eq!(name.name(), "name");
        assert!(name.eval_entry(&entry("/path1/b.log")));
        assert!(!name.eval_entry(&entry("/path1/a file")));

        let path = Path::new(StringMatcher::prefix("/path1/"));
        assert!(path.eval_entry(&entry("/path1/a file")));
        assert!(!path.eval_entry(&entry("/path1")));
    }

    #[test]
    fn size_primary_reads_attributes() {
        let size = Size::new(SizePredicate::parse(">1k").expect("parse"));
        assert_eq!(size.value_type(), ValueType::Numeric);
        assert!(size.eval_entry(&entry("/path1/b.log")));
        assert!(!size.eval_entry(&entry("/path1/a file")));
        assert!(!size.eval_entry(&Entry::new("bare", "/bare")));
    }

    #[test]
    fn time_primaries_pick_their_field() {
        let mtime = Timestamp::mtime(DatePredicate::parse("2019-02-19").expect("parse"));
        assert_eq!(mtime.name(), "mtime");
        assert!(mtime.eval_entry(&entry("/path1")));

        let atime = Timestamp::atime(|t: DateTime<Utc>| t.timestamp() == 1550611510);
        assert!(atime.eval_entry(&entry("/path1")));
        assert!(!atime.eval_entry(&entry("/path1/a file")));
        assert!(!atime.eval_entry(&Entry::new("bare", "/bare")));
    }

    #[test]
    fn attribute_primaries_never_prune_schemas() {
        let schema = EntrySchema::new("volume/dir", "dir");
        let primaries: Vec<Box<dyn Primary>> = vec![
            Box::new(Name::new(StringMatcher::exact("x"))),
            Box::new(Size::new(|size: u64| size == 0)),
            Box::new(Timestamp::ctime(|_: DateTime<Utc>| false)),
        ];
        for primary in &primaries {
            assert!(primary.eval_entry_schema(&schema), "{}", primary.name());
        }
    }

    #[test]
    fn planner_prunes_with_kind_before_listing() {
        let schemas = [
            EntrySchema::new("docker/containers/container", "container"),
            EntrySchema::new("docker/volumes/volume", "volume"),
        ];
        let kind = Kind::new(StringMatcher::suffix("/volume"));
        let kept = prune_schemas(&kind, &schemas);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].label(), "volume");

        let volume = entry("/path1").with_schema(schemas[1].clone());
        assert!(evaluate(&kind, &volume));
        assert!(evaluate(&Size::new(|size: u64| size == 96), &volume));
    }
}
