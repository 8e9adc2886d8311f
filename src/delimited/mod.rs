//! Delimited (CSV-style) record handle
//!
//! [`CsvHandle`] reads and writes one record at a time over a
//! [`FileHandle`], using a configurable [`Dialect`]. Reading consumes exactly
//! the bytes of one record, so raw reads and record reads can be mixed on the
//! same handle.

mod dialect;
mod parser;
mod value;
mod writer;

use std::ops::{Deref, DerefMut};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{HandleError, Result};
use crate::file::{checked_length, FileHandle};
use crate::mode::{FileMode, OpenFlags};
use crate::traits::FileContract;

pub use dialect::Dialect;
pub use value::Value;

use parser::RecordParser;
use writer::encode_record;

/// A [`FileHandle`] that reads and writes delimited records
///
/// # Examples
///
/// ```rust
/// use filekit::{CsvHandle, FileContract, FileMode, OpenFlags, Value};
///
/// # fn main() -> filekit::Result<()> {
/// let mut csv = CsvHandle::new();
/// assert!(csv.open(None, FileMode::ReadWrite, OpenFlags::new()));
///
/// csv.write_row(["name", "note"])?;
/// csv.write_row([Value::from("widget"), Value::from("3\" long, blue")])?;
/// csv.rewind()?;
///
/// assert_eq!(csv.read_row(None)?, Some(vec!["name".to_owned(), "note".to_owned()]));
/// assert_eq!(
///     csv.read_row(None)?,
///     Some(vec!["widget".to_owned(), "3\" long, blue".to_owned()])
/// );
/// assert_eq!(csv.read_row(None)?, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct CsvHandle {
    file: FileHandle,
    dialect: Dialect,
    skip_empty_rows: bool,
}

impl CsvHandle {
    /// Create a closed handle using the default comma-separated dialect
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a closed handle using `dialect`
    #[must_use]
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Whether [`CsvHandle::read_row`] passes over blank lines
    #[must_use]
    pub fn skip_empty_rows(&self) -> bool {
        self.skip_empty_rows
    }

    pub fn set_skip_empty_rows(&mut self, value: bool) -> &mut Self {
        self.skip_empty_rows = value;
        self
    }

    #[must_use]
    pub fn with_skip_empty_rows(mut self, value: bool) -> Self {
        self.skip_empty_rows = value;
        self
    }

    /// Read the next record
    ///
    /// A blank line yields a row with no fields, unless blank rows are being
    /// skipped, in which case every consecutive blank line is passed over.
    /// `length` caps the bytes consumed for one record and defaults to the
    /// configured read length, else unbounded. Returns `Ok(None)` at
    /// end-of-file or on a failed read. Field bytes that are not valid UTF-8
    /// come back as U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed, or
    /// `Err(HandleError::InvalidReadLength)` for a zero `length`.
    pub fn read_row(&mut self, length: Option<usize>) -> Result<Option<Vec<String>>> {
        let limit = checked_length(length)?.or(self.file.read_length());

        loop {
            let row = self.read_record(limit)?;
            match row {
                Some(fields) if fields.is_empty() && self.skip_empty_rows => {
                    debug!("Skipping blank row");
                }
                other => return Ok(other),
            }
        }
    }

    fn read_record(&mut self, limit: Option<usize>) -> Result<Option<Vec<String>>> {
        if self.file.is_end_of_file()? {
            return Ok(None);
        }

        let mut parser = RecordParser::new(&self.dialect);
        if self.file.scan(limit, |byte| parser.push(byte))?.is_none() {
            return Ok(None);
        }

        Ok(parser.finish())
    }

    /// Write one record terminated by `\n`
    ///
    /// Each value is coerced to text (see [`Value`]); fields containing the
    /// delimiter, the quote byte or a line break are quoted. Returns the
    /// number of bytes written, or `Ok(None)` on failure.
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed.
    pub fn write_row<I, V>(&mut self, row: I) -> Result<Option<usize>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if !self.file.is_open() {
            return Err(HandleError::NotOpen);
        }

        let fields: Vec<String> = row.into_iter().map(|v| v.into().into_field()).collect();
        match encode_record(&self.dialect, &fields) {
            Ok(record) => self.file.write(&record, None),
            Err(e) => {
                warn!("Failed to encode record of {} fields: {}", fields.len(), e);
                Ok(None)
            }
        }
    }

    /// Consume the wrapper and return the underlying handle
    #[must_use]
    pub fn into_inner(self) -> FileHandle {
        self.file
    }
}

impl From<FileHandle> for CsvHandle {
    fn from(file: FileHandle) -> Self {
        Self {
            file,
            dialect: Dialect::default(),
            skip_empty_rows: false,
        }
    }
}

impl Deref for CsvHandle {
    type Target = FileHandle;

    fn deref(&self) -> &FileHandle {
        &self.file
    }
}

impl DerefMut for CsvHandle {
    fn deref_mut(&mut self) -> &mut FileHandle {
        &mut self.file
    }
}

impl FileContract for CsvHandle {
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
