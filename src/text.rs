//! Line-oriented handle
//!
//! [`TextHandle`] layers line reads and writes over a [`FileHandle`]. Lines
//! are returned with their terminator intact; written lines get the
//! configured [`LineEnding`] appended.

use std::ops::{Deref, DerefMut};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::file::{checked_length, FileHandle, Scan};
use crate::mode::{FileMode, OpenFlags};
use crate::traits::FileContract;

/// Terminator appended by [`TextHandle::write_line`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The platform convention: CRLF on Windows, LF elsewhere
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(windows) {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        Self::native()
    }
}

/// A [`FileHandle`] with line reads and writes
///
/// Dereferences to the inner [`FileHandle`] for introspection, positioning
/// and read-length configuration.
///
/// # Examples
///
/// ```rust
/// use filekit::{FileContract, FileMode, LineEnding, OpenFlags, TextHandle};
///
/// # fn main() -> filekit::Result<()> {
/// let mut text = TextHandle::new().with_line_ending(LineEnding::Lf);
/// assert!(text.open(None, FileMode::ReadWrite, OpenFlags::new()));
///
/// text.write_line("first", None)?;
/// text.write_line("second", None)?;
/// text.rewind()?;
///
/// assert_eq!(text.read_line(None)?.as_deref(), Some("first\n"));
/// assert_eq!(text.read_line(None)?.as_deref(), Some("second\n"));
/// assert_eq!(text.read_line(None)?, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TextHandle {
    file: FileHandle,
    line_ending: LineEnding,
}

impl TextHandle {
    /// Create a closed handle using the native line ending
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Read up to and including the next `\n`, or `length` bytes
    ///
    /// `length` defaults to the configured read length, and the line is
    /// unbounded when neither is set. Returns `Ok(None)` at end-of-file or on
    /// a failed read. Bytes that are not valid UTF-8 come back as U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed, or
    /// `Err(HandleError::InvalidReadLength)` for a zero `length`.
    pub fn read_line(&mut self, length: Option<usize>) -> Result<Option<String>> {
        let limit = checked_length(length)?.or(self.file.read_length());

        if self.file.is_end_of_file()? {
            return Ok(None);
        }

        let mut line = Vec::new();
        let scanned = self.file.scan(limit, |byte| {
            line.push(byte);
            if byte == b'\n' {
                Scan::Stop
            } else {
                Scan::Continue
            }
        })?;

        match scanned {
            Some(end) if end.consumed > 0 => {}
            _ => return Ok(None),
        }

        Ok(Some(match String::from_utf8(line) {
            Ok(line) => line,
            Err(e) => {
                debug!("Line is not valid UTF-8, replacing bad bytes: {}", e);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        }))
    }

    /// Write `line` followed by the configured line ending
    ///
    /// `length` limits the total bytes written, terminator included.
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed.
    pub fn write_line(&mut self, line: &str, length: Option<usize>) -> Result<Option<usize>> {
        let terminator = self.line_ending.as_str();
        let mut data = String::with_capacity(line.len() + terminator.len());
        data.push_str(line);
        data.push_str(terminator);
        self.file.write(data.as_bytes(), length)
    }

    /// Consume the wrapper and return the underlying handle
    #[must_use]
    pub fn into_inner(self) -> FileHandle {
        self.file
    }
}

impl From<FileHandle> for TextHandle {
    fn from(file: FileHandle) -> Self {
        Self {
            file,
            line_ending: LineEnding::native(),
        }
    }
}

impl Deref for TextHandle {
    type Target = FileHandle;

    fn deref(&self) -> &FileHandle {
        &self.file
    }
}

impl DerefMut for TextHandle {
    fn deref_mut(&mut self) -> &mut FileHandle {
        &mut self.file
    }
}

impl FileContract for TextHandle {
    fn open(&mut self, path: Option<&Path>, mode: FileMode, flags: OpenFlags) -> bool {
        self.file.open(path, mode, flags)
    }

    fn is_open(&self) -> bool {
        self.file.is_open()
    }

    fn close(&mut self) {
        self.file.close();
    }

    fn is_end_of_file(&mut self) -> Result<bool> {
        self.file.is_end_of_file()
    }

    fn truncate(&mut self, size: u64) -> Result<bool> {
        self.file.truncate(size)
    }

    fn read(&mut self, length: Option<usize>) -> Result<Option<Vec<u8>>> {
        self.file.read(length)
    }

    fn write(&mut self, value: &[u8], length: Option<usize>) -> Result<Option<usize>> {
        self.file.write(value, length)
    }
}
