//! Entry metadata decoded from stat records.
//!
//! The packed mode value follows the POSIX `st_mode` layout: the top four
//! bits carry the file type code and the low twelve bits the permission mask.

use std::fmt;

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type code of a directory (`S_IFDIR >> 12`).
pub const TYPE_CODE_DIRECTORY: u8 = 0x4;
/// Type code of a regular file (`S_IFREG >> 12`).
pub const TYPE_CODE_REGULAR: u8 = 0x8;

/// Entry type decoded from the top four bits of a mode value.
///
/// Only directories and regular files are named. Every other code is kept
/// verbatim in `Unknown` so symlinks, devices, sockets and fifos survive a
/// scan without being misclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Directory,
    Regular,
    Unknown(u8),
}

impl FileType {
    pub fn from_type_code(code: u8) -> Self {
        match code & 0xf {
            TYPE_CODE_DIRECTORY => Self::Directory,
            TYPE_CODE_REGULAR => Self::Regular,
            other => Self::Unknown(other),
        }
    }

    pub fn type_code(self) -> u8 {
        match self {
            Self::Directory => TYPE_CODE_DIRECTORY,
            Self::Regular => TYPE_CODE_REGULAR,
            Self::Unknown(code) => code & 0xf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Regular => "file",
            Self::Unknown(_) => "unknown",
        }
    }
}

bitflags! {
    /// Permission bits of a mode value (the low twelve bits).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Permissions: u16 {
        const SETUID = 0o4000;
        const SETGID = 0o2000;
        const STICKY = 0o1000;
        const OWNER_READ = 0o400;
        const OWNER_WRITE = 0o200;
        const OWNER_EXEC = 0o100;
        const GROUP_READ = 0o040;
        const GROUP_WRITE = 0o020;
        const GROUP_EXEC = 0o010;
        const OTHER_READ = 0o004;
        const OTHER_WRITE = 0o002;
        const OTHER_EXEC = 0o001;
    }
}

impl Permissions {
    /// Mask of the bits a mode value contributes to the permission set.
    pub const MASK: u16 = 0o7777;

    pub fn from_mode_bits(bits: u16) -> Self {
        Self::from_bits_truncate(bits & Self::MASK)
    }
}

/// Entry type plus permission mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryMode {
    file_type: FileType,
    permissions: Permissions,
}

impl EntryMode {
    pub fn new(file_type: FileType, permissions: Permissions) -> Self {
        Self {
            file_type,
            permissions,
        }
    }

    pub fn directory(permission_bits: u16) -> Self {
        Self::new(
            FileType::Directory,
            Permissions::from_mode_bits(permission_bits),
        )
    }

    pub fn regular(permission_bits: u16) -> Self {
        Self::new(FileType::Regular, Permissions::from_mode_bits(permission_bits))
    }

    /// Unpacks a raw 16-bit mode value.
    pub fn from_raw(raw: u16) -> Self {
        Self::new(
            FileType::from_type_code((raw >> 12) as u8),
            Permissions::from_mode_bits(raw),
        )
    }

    /// Packs the mode back into its raw 16-bit form.
    pub fn raw(&self) -> u16 {
        (u16::from(self.file_type.type_code()) << 12) | self.permissions.bits()
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.file_type == FileType::Regular
    }
}

impl fmt::Display for EntryMode {
    /// Renders `ls -l` style, e.g. `drwxr-xr-x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.permissions;
        let type_char = match self.file_type {
            FileType::Directory => 'd',
            FileType::Regular => '-',
            FileType::Unknown(_) => '?',
        };
        let exec = |bit: Permissions, special: Permissions, set: char, unset: char| {
            match (p.contains(bit), p.contains(special)) {
                (true, true) => set,
                (false, true) => unset,
                (true, false) => 'x',
                (false, false) => '-',
            }
        };
        let flag = |bit: Permissions, ch: char| if p.contains(bit) { ch } else { '-' };

        let rendered: String = [
            type_char,
            flag(Permissions::OWNER_READ, 'r'),
            flag(Permissions::OWNER_WRITE, 'w'),
            exec(Permissions::OWNER_EXEC, Permissions::SETUID, 's', 'S'),
            flag(Permissions::GROUP_READ, 'r'),
            flag(Permissions::GROUP_WRITE, 'w'),
            exec(Permissions::GROUP_EXEC, Permissions::SETGID, 's', 'S'),
            flag(Permissions::OTHER_READ, 'r'),
            flag(Permissions::OTHER_WRITE, 'w'),
            exec(Permissions::OTHER_EXEC, Permissions::STICKY, 't', 'T'),
        ]
        .iter()
        .collect();
        f.write_str(&rendered)
    }
}

/// Metadata of one filesystem node.
///
/// Directories carry whatever size the remote stat reported; it is not
/// meaningful for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAttributes {
    size: u64,
    atime: DateTime<Utc>,
    mtime: DateTime<Utc>,
    ctime: DateTime<Utc>,
    mode: EntryMode,
}

impl EntryAttributes {
    pub fn new(
        size: u64,
        atime: DateTime<Utc>,
        mtime: DateTime<Utc>,
        ctime: DateTime<Utc>,
        mode: EntryMode,
    ) -> Self {
        Self {
            size,
            atime,
            mtime,
            ctime,
            mode,
        }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last access time.
    pub fn atime(&self) -> DateTime<Utc> {
        self.atime
    }

    /// Last content modification time.
    pub fn mtime(&self) -> DateTime<Utc> {
        self.mtime
    }

    /// Last status change time.
    pub fn ctime(&self) -> DateTime<Utc> {
        self.ctime
    }

    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }
}
