//! In-memory handle
//!
//! [`MemoryHandle`] implements [`FileContract`] over a byte buffer that
//! outlives individual open/close cycles, the way a file outlives its
//! descriptors. The open mode and flags behave as they do for
//! [`FileHandle`](crate::FileHandle): truncate clears the buffer, append
//! sends every write to the end, and each mode only permits its own
//! direction of I/O.

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{HandleError, Result};
use crate::file::{checked_length, DEFAULT_READ_LENGTH};
use crate::mode::{Disposition, FileMode, OpenFlags};
use crate::traits::FileContract;

/// A [`FileContract`] over an in-memory byte buffer
///
/// The path passed to `open` is only a label. An anonymous open starts from
/// an empty buffer, as a fresh temporary file would.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use filekit::{FileContract, FileMode, MemoryHandle, OpenFlags};
///
/// # fn main() -> filekit::Result<()> {
/// let mut handle = MemoryHandle::with_contents("header\n");
/// let flags = OpenFlags::new().with_append(true);
/// assert!(handle.open(Some(Path::new("report")), FileMode::Write, flags));
/// handle.write(b"row\n", None)?;
/// handle.close();
///
/// assert_eq!(handle.contents(), b"header\nrow\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryHandle {
    buffer: Cursor<Vec<u8>>,
    path: Option<PathBuf>,
    mode: FileMode,
    flags: OpenFlags,
    open: bool,
}

impl MemoryHandle {
    /// Create a closed handle over an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a closed handle over `contents`
    #[must_use]
    pub fn with_contents(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: Cursor::new(contents.into()),
            ..Self::default()
        }
    }

    /// The label passed to the last `open` call
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Borrow the whole buffer, regardless of position or open state
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        self.buffer.get_ref()
    }

    /// Consume the handle and return the buffer
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer.into_inner()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(HandleError::NotOpen)
        }
    }

    fn len(&self) -> u64 {
        self.buffer.get_ref().len() as u64
    }
}

impl FileContract for MemoryHandle {
    fn open(&mut self, path: Option<&Path>, mode: FileMode, flags: OpenFlags) -> bool {
        self.close();

        self.path = path.map(Path::to_path_buf);
        self.mode = mode;
        self.flags = flags;

        if path.is_none() {
            // Anonymous handles always start from a fresh scratch buffer
            self.buffer.get_mut().clear();
        } else if flags.disposition(mode) == Disposition::Truncate {
            self.buffer.get_mut().clear();
        }

        self.buffer.set_position(0);
        self.open = true;
        debug!("Opened memory buffer ({}, mode '{}')", mode, flags.mode_string(mode));
        true
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_end_of_file(&mut self) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.buffer.position() >= self.len())
    }

    fn truncate(&mut self, size: u64) -> Result<bool> {
        self.ensure_open()?;
        if !self.mode.is_writable() {
            return Ok(false);
        }

        let Ok(size) = usize::try_from(size) else {
            return Ok(false);
        };
        self.buffer.get_mut().resize(size, 0);
        Ok(true)
    }

    fn read(&mut self, length: Option<usize>) -> Result<Option<Vec<u8>>> {
        let length = checked_length(length)?.unwrap_or(DEFAULT_READ_LENGTH);
        if self.is_end_of_file()? {
            return Ok(None);
        }
        if !self.mode.is_readable() {
            debug!("Read refused on write-only memory buffer");
            return Ok(None);
        }

        let remaining = self.len().saturating_sub(self.buffer.position());
        let capacity = usize::try_from(remaining).map_or(length, |r| r.min(length));
        let mut chunk = Vec::with_capacity(capacity);
        match (&mut self.buffer).take(length as u64).read_to_end(&mut chunk) {
            Ok(_) => Ok(Some(chunk)),
            Err(e) => {
                debug!("Failed to read memory buffer: {}", e);
                Ok(None)
            }
        }
    }

    fn write(&mut self, value: &[u8], length: Option<usize>) -> Result<Option<usize>> {
        self.ensure_open()?;
        if !self.mode.is_writable() {
            debug!("Write refused on read-only memory buffer");
            return Ok(None);
        }

        if self.flags.disposition(self.mode) == Disposition::Append {
            self.buffer.set_position(self.len());
        }

        let data = match length {
            Some(length) => &value[..length.min(value.len())],
            None => value,
        };
        match self.buffer.write_all(data) {
            Ok(()) => Ok(Some(data.len())),
            Err(e) => {
                debug!("Failed to write memory buffer: {}", e);
                Ok(None)
            }
        }
    }
}
