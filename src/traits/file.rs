//! FileContract trait for substitutable file handles
//!
//! This trait is the capability set callers program against when they only
//! need a file-like object. [`FileHandle`](crate::FileHandle) implements it
//! over an OS file and [`MemoryHandle`](crate::MemoryHandle) over an
//! in-memory buffer; other backing stores can be plugged in by implementing
//! the same seven operations.

use std::path::Path;

use crate::error::Result;
use crate::mode::{FileMode, OpenFlags};

/// Unified interface for open/close/read/write on a single handle
///
/// # Error channels
///
/// Precondition violations (operating on a closed handle) are returned as
/// `Err`. Operational failures are returned as `false` or `None` and are
/// never retried.
///
/// # Examples
///
/// ```rust
/// use filekit::{FileContract, FileHandle, FileMode, OpenFlags};
///
/// # fn main() -> filekit::Result<()> {
/// let mut handle = FileHandle::new();
/// assert!(handle.open(None, FileMode::ReadWrite, OpenFlags::new()));
///
/// handle.write(b"Hello, World!", None)?;
/// handle.rewind()?;
/// assert_eq!(handle.read(Some(5))?.as_deref(), Some(&b"Hello"[..]));
/// # Ok(())
/// # }
/// ```
pub trait FileContract {
    /// Open `path`, or an anonymous temporary file when `path` is `None`
    ///
    /// Any handle already held is closed first. Returns `true` if a handle
    /// was acquired; on failure the object is left closed.
    fn open(&mut self, path: Option<&Path>, mode: FileMode, flags: OpenFlags) -> bool;

    /// Whether a handle is currently held
    fn is_open(&self) -> bool;

    /// Release the handle if one is held; repeated calls do nothing
    fn close(&mut self);

    /// Whether no bytes remain to be read from the current position
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed.
    fn is_end_of_file(&mut self) -> Result<bool>;

    /// Truncate (or extend) the backing store to `size` bytes
    ///
    /// The current position is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed.
    fn truncate(&mut self, size: u64) -> Result<bool>;

    /// Read the next chunk of at most `length` bytes
    ///
    /// Returns `Ok(None)` at end-of-file or when the read fails.
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed.
    fn read(&mut self, length: Option<usize>) -> Result<Option<Vec<u8>>>;

    /// Write `value`, limited to its first `length` bytes when given
    ///
    /// Returns the number of bytes written, or `Ok(None)` when the write
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed.
    fn write(&mut self, value: &[u8], length: Option<usize>) -> Result<Option<usize>>;

    // =========================================================================
    // Provided methods with default implementations
    // =========================================================================

    /// Read everything from the current position to end-of-file
    ///
    /// Stops early, returning what was gathered so far, if a read fails.
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed.
    fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        while let Some(chunk) = self.read(None)? {
            if chunk.is_empty() {
                break;
            }
            content.extend_from_slice(&chunk);
        }
        Ok(content)
    }
}
