//! Open modes and the mode-resolution policy
//!
//! A handle is opened with a [`FileMode`] and a set of [`OpenFlags`]. The pair
//! resolves to one [`Disposition`], which is rendered either as an
//! fopen-style mode string (for introspection and logging) or as a
//! [`std::fs::OpenOptions`] (for the actual open call).

use std::fmt;
use std::fs;

/// Access mode requested when opening a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// Read only; the file must already exist
    Read,
    /// Write only; the file is created if absent
    Write,
    /// Read and write; the file is created if absent
    #[default]
    ReadWrite,
}

impl FileMode {
    /// Whether reads are permitted in this mode
    #[must_use]
    pub const fn is_readable(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    /// Whether writes are permitted in this mode
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
            Self::ReadWrite => f.write_str("read-write"),
        }
    }
}

/// Recognised open flags
///
/// `truncate` takes precedence over `append`. Both are ignored in
/// [`FileMode::Read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenFlags {
    /// Create and truncate the file to zero length
    pub truncate: bool,
    /// Create and position every write at the end of the file
    pub append: bool,
    /// Disable newline translation
    ///
    /// Rust never translates newlines, so this only shows up in
    /// [`OpenFlags::mode_string`].
    pub binary: bool,
}

impl OpenFlags {
    /// Flags with every option off
    #[must_use]
    pub const fn new() -> Self {
        Self {
            truncate: false,
            append: false,
            binary: false,
        }
    }

    #[must_use]
    pub const fn with_truncate(mut self, value: bool) -> Self {
        self.truncate = value;
        self
    }

    #[must_use]
    pub const fn with_append(mut self, value: bool) -> Self {
        self.append = value;
        self
    }

    #[must_use]
    pub const fn with_binary(mut self, value: bool) -> Self {
        self.binary = value;
        self
    }

    /// Resolve the disposition these flags produce for `mode`
    #[must_use]
    pub const fn disposition(&self, mode: FileMode) -> Disposition {
        match mode {
            FileMode::Read => Disposition::Existing,
            FileMode::Write | FileMode::ReadWrite => {
                if self.truncate {
                    Disposition::Truncate
                } else if self.append {
                    Disposition::Append
                } else {
                    Disposition::Preserve
                }
            }
        }
    }

    /// Render the resolved mode as an fopen-style string
    ///
    /// ```
    /// use filekit::{FileMode, OpenFlags};
    ///
    /// assert_eq!(OpenFlags::new().mode_string(FileMode::ReadWrite), "c+");
    /// assert_eq!(
    ///     OpenFlags::new().with_truncate(true).with_binary(true).mode_string(FileMode::Write),
    ///     "wb"
    /// );
    /// ```
    #[must_use]
    pub fn mode_string(&self, mode: FileMode) -> String {
        let mut out = String::with_capacity(3);
        out.push(self.disposition(mode).letter());
        if mode == FileMode::ReadWrite {
            out.push('+');
        }
        if self.binary {
            out.push('b');
        }
        out
    }

    /// Build the [`fs::OpenOptions`] that implement this mode
    #[must_use]
    pub fn to_open_options(&self, mode: FileMode) -> fs::OpenOptions {
        let mut options = fs::OpenOptions::new();
        options.read(mode.is_readable());

        match self.disposition(mode) {
            Disposition::Existing => {}
            Disposition::Preserve => {
                options.write(true).create(true);
            }
            Disposition::Truncate => {
                options.write(true).create(true).truncate(true);
            }
            Disposition::Append => {
                options.append(true).create(true);
            }
        }

        options
    }
}

/// How an open call treats the target file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Must exist, read only (`r`)
    Existing,
    /// Create if absent, keep content, start at offset zero (`c`)
    Preserve,
    /// Create if absent, truncate to zero length (`w`)
    Truncate,
    /// Create if absent, every write goes to the end (`a`)
    Append,
}

impl Disposition {
    const fn letter(self) -> char {
        match self {
            Self::Existing => 'r',
            Self::Preserve => 'c',
            Self::Truncate => 'w',
            Self::Append => 'a',
        }
    }
}
