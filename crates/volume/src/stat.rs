//! Decoding of `stat` dump records.
//!
//! Each record is one line of `stat -c '%s %X %Y %Z %f %n'` output:
//! size, atime, mtime, ctime, hex mode and path, separated by whitespace.
//! The path is the remainder of the line and may contain whitespace itself.

use chrono::{DateTime, Utc};

use crate::error::{Result, StatField, VolumeError};
use crate::types::{EntryAttributes, EntryMode};

/// Format string handed to `stat -c`.
pub const STAT_FORMAT: &str = "%s %X %Y %Z %f %n";

const STAT_FIELD_COUNT: usize = 6;

/// One decoded stat record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    /// Path relative to the anchor; `""` is the anchor itself.
    pub path: String,
    pub attributes: EntryAttributes,
}

/// Builds the argv of a recursive stat over `mountpoint`.
///
/// The output of this command is what [`parse_stat_line`] and
/// [`crate::DirectoryTree`] consume. Running it is up to the caller.
pub fn stat_command(mountpoint: &str) -> Vec<String> {
    [
        "find",
        mountpoint,
        "-mindepth",
        "1",
        "-exec",
        "stat",
        "-c",
        STAT_FORMAT,
        "{}",
        "+",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Decodes one stat record, stripping `anchor` from the front of its path.
pub fn parse_stat_line(line: &str, anchor: &str) -> Result<StatRecord> {
    let malformed = || VolumeError::MalformedRecord(line.to_string());
    let mut rest = line.trim_end_matches(['\r', '\n']);
    let mut fields = [""; STAT_FIELD_COUNT - 1];
    for field in &mut fields {
        let (token, tail) = rest
            .trim_start()
            .split_once(char::is_whitespace)
            .ok_or_else(malformed)?;
        *field = token;
        rest = tail;
    }
    // Only the separator run is skipped; the path keeps its own whitespace.
    let raw_path = rest.trim_start();
    if raw_path.is_empty() {
        return Err(malformed());
    }

    let size = unsigned_digits(fields[0])
        .parse::<u64>()
        .map_err(|source| field_error(StatField::Size, fields[0], source))?;
    let atime = parse_timestamp(StatField::Atime, fields[1])?;
    let mtime = parse_timestamp(StatField::Mtime, fields[2])?;
    let ctime = parse_timestamp(StatField::Ctime, fields[3])?;
    let mode = u16::from_str_radix(unsigned_digits(fields[4]), 16)
        .map_err(|source| field_error(StatField::Mode, fields[4], source))?;

    Ok(StatRecord {
        path: relative_path(raw_path, anchor),
        attributes: EntryAttributes::new(size, atime, mtime, ctime, EntryMode::from_raw(mode)),
    })
}

/// The std unsigned parsers accept a leading `+`; stat never prints one.
/// A bare sign fails to parse with `InvalidDigit`.
fn unsigned_digits(token: &str) -> &str {
    if token.starts_with('+') {
        "+"
    } else {
        token
    }
}

fn parse_timestamp(field: StatField, token: &str) -> Result<DateTime<Utc>> {
    let seconds = token
        .parse::<i64>()
        .map_err(|source| field_error(field, token, source))?;
    DateTime::<Utc>::from_timestamp(seconds, 0).ok_or(VolumeError::TimestampOutOfRange {
        field,
        value: seconds,
    })
}

fn field_error(field: StatField, token: &str, source: std::num::ParseIntError) -> VolumeError {
    VolumeError::FieldParse {
        field,
        token: token.to_string(),
        source,
    }
}

/// Normalizes separators and removes the anchor prefix.
///
/// The anchor only matches on a whole path component, so an anchor of `mnt`
/// leaves `mntx/a` untouched.
pub fn relative_path(raw: &str, anchor: &str) -> String {
    let path = normalize_separators(raw);
    let anchor = normalize_separators(anchor);
    if anchor.is_empty() {
        return path;
    }
    if path == anchor {
        return String::new();
    }
    match path.strip_prefix(anchor.as_str()) {
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => {
            log::warn!("stat path {path:?} is outside of anchor {anchor:?}");
            path
        }
    }
}

/// Turns `\` into `/`, collapses runs of `/` and drops a trailing `/`.
fn normalize_separators(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(c);
    }
    if normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;
    use crate::types::FileType;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(seconds, 0).expect("timestamp")
    }

    #[test]
    fn parses_directory_record() {
        let record = parse_stat_line("96 1550611510 1550611448 1550611448 41ed mnt/path", "mnt")
            .expect("parse");
        assert_eq!(record.path, "/path");
        assert_eq!(
            record.attributes,
            EntryAttributes::new(
                96,
                at(1550611510),
                at(1550611448),
                at(1550611448),
                EntryMode::directory(0o755),
            )
        );
    }

    #[test]
    fn parses_regular_file_record() {
        let record = parse_stat_line(
            "0 1550611458 1550611458 1550611458 81a4 mnt/path/has/got/some/legs",
            "mnt",
        )
        .expect("parse");
        assert_eq!(record.path, "/path/has/got/some/legs");
        assert_eq!(record.attributes.size(), 0);
        assert_eq!(record.attributes.mode(), EntryMode::regular(0o644));
        assert!(!record.attributes.is_dir());
    }

    #[test]
    fn keeps_whitespace_in_paths() {
        let record = parse_stat_line("0 1 2 3 81a4 mnt/path1/a file", "mnt").expect("parse");
        assert_eq!(record.path, "/path1/a file");
        assert_eq!(record.attributes.atime(), at(1));
        assert_eq!(record.attributes.mtime(), at(2));
        assert_eq!(record.attributes.ctime(), at(3));
    }

    #[test]
    fn anchor_prepended_reproduces_path() {
        for raw in ["mnt/path", "mnt/path1/a file", "mnt/a/b/c"] {
            let line = format!("1 1 1 1 81a4 {raw}");
            let record = parse_stat_line(&line, "mnt").expect("parse");
            assert_eq!(format!("mnt{}", record.path), raw);
        }
    }

    #[test]
    fn anchor_itself_is_root() {
        let record = parse_stat_line("4096 1 1 1 41ed /mnt/", "/mnt").expect("parse");
        assert_eq!(record.path, "");
    }

    #[test]
    fn tolerates_padded_fields() {
        let record = parse_stat_line("96  1 1\t1   41ed \t mnt/a  b", "mnt").expect("parse");
        assert_eq!(record.path, "/a  b");
        assert_eq!(record.attributes.size(), 96);
        assert!(record.attributes.is_dir());

        let record = parse_stat_line("  0 1 1 1 81a4 mnt/f\r\n", "mnt").expect("parse");
        assert_eq!(record.path, "/f");
    }

    #[test]
    fn doubled_separators_collapse() {
        assert_eq!(relative_path("/mnt//a///b/", "/mnt/"), "/a/b");
        assert_eq!(relative_path("//mnt//", "/mnt"), "");
        assert_eq!(relative_path("mnt\\\\a", "mnt"), "/a");
    }

    #[test]
    fn anchor_matches_whole_components_only() {
        assert_eq!(relative_path("mntx/a", "mnt"), "mntx/a");
        assert_eq!(relative_path("mnt\\a\\b", "mnt/"), "/a/b");
        assert_eq!(relative_path("a/b", ""), "a/b");
    }

    #[test]
    fn unknown_type_code_is_not_an_error() {
        let record = parse_stat_line("7 1 1 1 a1ff mnt/link", "mnt").expect("parse");
        assert_eq!(record.attributes.mode().file_type(), FileType::Unknown(0xa));
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = parse_stat_line("stat: failed", "mnt").expect_err("malformed");
        assert!(matches!(err, VolumeError::MalformedRecord(ref line) if line == "stat: failed"));
        assert_eq!(err.to_string(), "stat did not return 6 components: stat: failed");

        let err = parse_stat_line("1 2 3 4 41ed", "mnt").expect_err("malformed");
        assert!(matches!(err, VolumeError::MalformedRecord(_)));
    }

    #[test]
    fn rejects_negative_size() {
        let err = parse_stat_line("-1 1550611510 1550611448 1550611448 41ed mnt/path", "mnt")
            .expect_err("size");
        assert_eq!(err.field(), Some(StatField::Size));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("\"-1\""));
    }

    #[test]
    fn rejects_signed_size() {
        let err = parse_stat_line("+5 1 1 1 81a4 mnt/a", "mnt").expect_err("size");
        assert_eq!(err.field(), Some(StatField::Size));
        assert!(err.to_string().contains("\"+5\""));

        let err = parse_stat_line("5 1 1 1 +81a4 mnt/a", "mnt").expect_err("mode");
        assert_eq!(err.field(), Some(StatField::Mode));
    }

    #[test]
    fn rejects_non_numeric_time() {
        let err = parse_stat_line("0 2019-01-01 2019-01-01 2019-01-01 41ed mnt/path", "mnt")
            .expect_err("atime");
        assert_eq!(err.field(), Some(StatField::Atime));

        let err = parse_stat_line("0 1 soon 1 41ed mnt/path", "mnt").expect_err("mtime");
        assert_eq!(err.field(), Some(StatField::Mtime));
        assert!(err.to_string().contains("\"soon\""));

        let err = parse_stat_line("0 1 1 later 41ed mnt/path", "mnt").expect_err("ctime");
        assert_eq!(err.field(), Some(StatField::Ctime));
    }

    #[test]
    fn rejects_non_hex_mode() {
        let err = parse_stat_line("96 1550611510 1550611448 1550611448 zebra mnt/path", "mnt")
            .expect_err("mode");
        let message = err.to_string();
        assert!(message.contains("parse"));
        assert!(message.contains("mode"));
        assert!(message.contains("zebra"));
    }

    #[test]
    fn rejects_unrepresentable_timestamp() {
        let line = format!("0 {} 1 1 41ed mnt/path", i64::MAX);
        let err = parse_stat_line(&line, "mnt").expect_err("range");
        assert!(matches!(
            err,
            VolumeError::TimestampOutOfRange {
                field: StatField::Atime,
                ..
            }
        ));
    }

    #[test]
    fn stat_command_targets_mountpoint() {
        let argv = stat_command("/mnt");
        assert_eq!(argv[0], "find");
        assert_eq!(argv[1], "/mnt");
        assert!(argv.iter().any(|arg| arg == STAT_FORMAT));
    }
}
