//! OS-backed file handle
//!
//! [`FileHandle`] owns at most one open [`std::fs::File`] at a time. The file
//! is acquired by [`FileContract::open`] and released exactly once, either by
//! [`FileContract::close`], by a subsequent `open`, or when the handle is
//! dropped. Anonymous handles are backed by a named temporary file that is
//! removed on release.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, warn};

use crate::error::{HandleError, Result};
use crate::mode::{FileMode, OpenFlags};
use crate::traits::FileContract;

/// Chunk size used by [`FileContract::read`] when no length is configured
pub const DEFAULT_READ_LENGTH: usize = 4096;

/// Bytes pulled from the OS per step while scanning for a terminator
const SCAN_CHUNK: usize = 512;

/// Verdict of a scanner on the byte it was just shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    /// Keep the byte and continue
    Continue,
    /// Keep the byte and stop
    Stop,
    /// Stop without consuming the byte
    StopBefore,
}

/// Where a scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanEnd {
    /// Bytes consumed from the handle
    pub consumed: usize,
    /// Whether the scanner stopped (as opposed to running out of input)
    pub stopped: bool,
}

/// The open OS resource
///
/// `file` is declared before `temp` so the descriptor closes before the
/// backing path is removed.
#[derive(Debug)]
struct Native {
    file: File,
    temp: Option<TempPath>,
}

impl Native {
    fn anonymous() -> io::Result<Self> {
        let (file, temp) = NamedTempFile::new()?.into_parts();
        Ok(Self {
            file,
            temp: Some(temp),
        })
    }

    fn release(self) {
        let Self { file, temp } = self;
        drop(file);
        if let Some(temp) = temp {
            let path = temp.to_path_buf();
            if let Err(e) = temp.close() {
                warn!("Failed to remove temporary file {}: {}", path.display(), e);
            }
        }
    }
}

/// A file handle with explicit open/close lifecycle
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
/// handle.write(b"1,2,3\n4,5,6\n", None)?;
/// handle.truncate(6)?;
/// handle.rewind()?;
///
/// assert_eq!(handle.read(None)?.as_deref(), Some(&b"1,2,3\n"[..]));
/// assert_eq!(handle.read(None)?, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FileHandle {
    path: Option<PathBuf>,
    mode: FileMode,
    flags: OpenFlags,
    native: Option<Native>,
    read_length: Option<usize>,
    /// A read has hit the end of the stream since the last reposition
    drained: bool,
}

impl FileHandle {
    /// Create a closed handle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the last `open` call
    ///
    /// For anonymous handles this is the resolved temporary file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Mode of the last `open` call
    #[must_use]
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Flags of the last `open` call
    #[must_use]
    pub fn flags(&self) -> OpenFlags {
        self.flags
    }

    /// Borrow the open OS file, if any
    #[must_use]
    pub fn stream(&self) -> Option<&File> {
        self.native.as_ref().map(|native| &native.file)
    }

    /// Default chunk size for reads without an explicit length
    #[must_use]
    pub fn read_length(&self) -> Option<usize> {
        self.read_length
    }

    /// Set the default chunk size for reads without an explicit length
    ///
    /// `None` restores the built-in default of [`DEFAULT_READ_LENGTH`].
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::InvalidReadLength)` for negative or zero
    /// values; the previously configured length is kept.
    pub fn set_read_length(&mut self, value: Option<i64>) -> Result<&mut Self> {
        self.read_length = match value {
            Some(length) => Some(
                usize::try_from(length)
                    .ok()
                    .filter(|&length| length > 0)
                    .ok_or(HandleError::InvalidReadLength(length))?,
            ),
            None => None,
        };
        Ok(self)
    }

    /// Move the position back to the start of the file
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed.
    pub fn rewind(&mut self) -> Result<bool> {
        Ok(self.seek(SeekFrom::Start(0))?.is_some())
    }

    /// Move the position, returning the new offset or `None` on failure
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<Option<u64>> {
        let file = self.file_mut()?;
        let moved = file.seek(pos);
        self.drained = false;
        match moved {
            Ok(offset) => Ok(Some(offset)),
            Err(e) => {
                debug!("Failed to seek to {:?}: {}", pos, e);
                Ok(None)
            }
        }
    }

    /// Current position, or `None` if the OS cannot report it
    ///
    /// # Errors
    ///
    /// Returns `Err(HandleError::NotOpen)` if the handle is closed.
    pub fn position(&mut self) -> Result<Option<u64>> {
        self.seek(SeekFrom::Current(0))
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.native
            .as_mut()
            .map(|native| &mut native.file)
            .ok_or(HandleError::NotOpen)
    }

    /// Feed bytes from the current position to `step` until it stops
    ///
    /// At most `limit` bytes are consumed. Bytes pulled from the OS but not
    /// consumed are given back with a relative seek, so the position always
    /// ends right after the last consumed byte. Returns `Ok(None)` if the OS
    /// reports a failure.
    pub(crate) fn scan<F>(&mut self, limit: Option<usize>, mut step: F) -> Result<Option<ScanEnd>>
    where
        F: FnMut(u8) -> Scan,
    {
        let Some(native) = self.native.as_mut() else {
            return Err(HandleError::NotOpen);
        };
        let file = &mut native.file;
        let mut chunk = [0u8; SCAN_CHUNK];
        let mut consumed = 0usize;

        loop {
            let want = limit.map_or(SCAN_CHUNK, |limit| (limit - consumed).min(SCAN_CHUNK));
            if want == 0 {
                return Ok(Some(ScanEnd {
                    consumed,
                    stopped: false,
                }));
            }

            let filled = match read_retrying(file, &mut chunk[..want]) {
                Ok(0) => {
                    self.drained = true;
                    return Ok(Some(ScanEnd {
                        consumed,
                        stopped: false,
                    }))
                }
                Ok(n) => n,
                Err(e) => {
                    warn!("Failed to read while scanning: {}", e);
                    return Ok(None);
                }
            };

            for (index, &byte) in chunk[..filled].iter().enumerate() {
                let used = match step(byte) {
                    Scan::Continue => continue,
                    Scan::Stop => index + 1,
                    Scan::StopBefore => index,
                };

                let unread = filled - used;
                if unread > 0 {
                    // unread <= SCAN_CHUNK, so the cast is lossless
                    if let Err(e) = file.seek(SeekFrom::Current(-(unread as i64))) {
                        warn!("Failed to rewind {} unread bytes: {}", unread, e);
                        return Ok(None);
                    }
                }

                return Ok(Some(ScanEnd {
                    consumed: consumed + used,
                    stopped: true,
                }));
            }

            consumed += filled;
        }
    }
}

/// Reject an explicit zero length, which could never make progress
pub(crate) fn checked_length(length: Option<usize>) -> Result<Option<usize>> {
    match length {
        Some(0) => Err(HandleError::InvalidReadLength(0)),
        other => Ok(other),
    }
}

fn read_retrying(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match file.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}

impl FileContract for FileHandle {
    fn open(&mut self, path: Option<&Path>, mode: FileMode, flags: OpenFlags) -> bool {
        self.close();

        self.path = path.map(Path::to_path_buf);
        self.mode = mode;
        self.flags = flags;
        self.drained = false;

        let opened = match path {
            None => Native::anonymous(),
            Some(path) => flags
                .to_open_options(mode)
                .open(path)
                .map(|file| Native { file, temp: None }),
        };

        match opened {
            Ok(native) => {
                if let Some(temp) = &native.temp {
                    self.path = Some(temp.to_path_buf());
                }
                debug!(
                    "Opened {} ({}, mode '{}')",
                    self.path.as_deref().unwrap_or(Path::new("")).display(),
                    mode,
                    flags.mode_string(mode)
                );
                self.native = Some(native);
                true
            }
            Err(e) => {
                match path {
                    Some(path) => debug!("Failed to open {}: {}", path.display(), e),
                    None => debug!("Failed to create temporary file: {}", e),
                }
                false
            }
        }
    }

    fn is_open(&self) -> bool {
        self.native.is_some()
    }

    fn close(&mut self) {
        if let Some(native) = self.native.take() {
            if let Some(path) = &self.path {
                debug!("Closing {}", path.display());
            }
            native.release();
        }
    }

    fn is_end_of_file(&mut self) -> Result<bool> {
        let drained = self.drained;
        let file = self.file_mut()?;
        if drained {
            return Ok(true);
        }

        // Streams, devices and pseudo files (procfs reports length 0) only
        // reach end-of-file once a read comes back empty
        let length = match file.metadata() {
            Ok(metadata) if metadata.is_file() && metadata.len() > 0 => metadata.len(),
            Ok(_) => return Ok(false),
            Err(e) => {
                debug!("Failed to read file metadata: {}", e);
                return Ok(false);
            }
        };

        match file.stream_position() {
            Ok(position) => Ok(position >= length),
            Err(e) => {
                debug!("Failed to determine position: {}", e);
                Ok(false)
            }
        }
    }

    fn truncate(&mut self, size: u64) -> Result<bool> {
        let file = self.file_mut()?;
        let resized = file.set_len(size);
        self.drained = false;
        match resized {
            Ok(()) => {
                debug!("Truncated to {} bytes", size);
                Ok(true)
            }
            Err(e) => {
                debug!("Failed to truncate to {} bytes: {}", size, e);
                Ok(false)
            }
        }
    }

    fn read(&mut self, length: Option<usize>) -> Result<Option<Vec<u8>>> {
        let length = checked_length(length)?
            .or(self.read_length)
            .unwrap_or(DEFAULT_READ_LENGTH);

        if self.is_end_of_file()? {
            return Ok(None);
        }

        let file = self.file_mut()?;
        let mut buffer = Vec::with_capacity(length.min(DEFAULT_READ_LENGTH * 16));
        let filled = file.take(length as u64).read_to_end(&mut buffer);
        match filled {
            Ok(n) => {
                // `take` only stops short of `length` when the stream ran dry
                if n < length {
                    self.drained = true;
                }
                Ok((n > 0).then_some(buffer))
            }
            Err(e) => {
                debug!("Failed to read {} bytes: {}", length, e);
                Ok(None)
            }
        }
    }

    fn write(&mut self, value: &[u8], length: Option<usize>) -> Result<Option<usize>> {
        let file = self.file_mut()?;
        let data = match length {
            Some(length) => &value[..length.min(value.len())],
            None => value,
        };

        let written = file.write_all(data);
        self.drained = false;
        match written {
            Ok(()) => Ok(Some(data.len())),
            Err(e) => {
                debug!("Failed to write {} bytes: {}", data.len(), e);
                Ok(None)
            }
        }
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        self.close();
    }
}
