//! Virtual filesystem core for remote volumes.
//!
//! This crate provides:
//! - Decoding of `stat` dump records into entry attributes
//! - Synthesis of a directory tree from a flat stat dump
//! - Typed query primaries evaluated against entry schemas and entries

pub mod config;
pub mod error;
pub mod query;
pub mod stat;
pub mod tree;
pub mod types;

pub use config::ScanConfig;
pub use error::{Result, StatField, VolumeError};
pub use query::{Entry, EntrySchema, Kind, Primary};
pub use stat::{parse_stat_line, stat_command, StatRecord};
pub use tree::{DirectoryListing, DirectoryTree};
pub use types::{EntryAttributes, EntryMode, FileType, Permissions};
