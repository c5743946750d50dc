//! Crate error type and `Result` alias.

use std::fmt;
use std::num::ParseIntError;

/// A numeric field of a stat record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    Size,
    Atime,
    Mtime,
    Ctime,
    Mode,
}

impl StatField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Atime => "atime",
            Self::Mtime => "mtime",
            Self::Ctime => "ctime",
            Self::Mode => "mode",
        }
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VolumeError {
    #[error("stat did not return 6 components: {0}")]
    MalformedRecord(String),

    #[error("failed to parse {field} field {token:?}: {source}")]
    FieldParse {
        field: StatField,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{field} value {value} is not a representable timestamp")]
    TimestampOutOfRange { field: StatField, value: i64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Query parse error: {0}")]
    QueryParse(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl VolumeError {
    /// Returns the stat field a decode failure refers to, if any.
    pub fn field(&self) -> Option<StatField> {
        match self {
            Self::FieldParse { field, .. } | Self::TimestampOutOfRange { field, .. } => {
                Some(*field)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, VolumeError>;
