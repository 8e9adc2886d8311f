//! # filekit
//!
//! Interface-driven file handles with an explicit open/close lifecycle:
//! - [`FileHandle`] for raw byte chunks over an OS file or an anonymous
//!   temporary file
//! - [`TextHandle`] for line-oriented text
//! - [`CsvHandle`] for delimited records
//! - [`MemoryHandle`] as an in-memory stand-in
//!
//! All of them implement [`FileContract`], so code written against the
//! trait works with any backing store.
//!
//! Misuse (operating on a closed handle, a negative or zero read length) is
//! reported as `Err(HandleError)`. Operating system failures are reported as
//! `false` or `None` and logged through `tracing`.
//!
//! ## Example
//!
//! ```rust
//! use filekit::{FileContract, FileHandle, FileMode, OpenFlags};
//!
//! # fn main() -> filekit::Result<()> {
//! let mut handle = FileHandle::new();
//! if handle.open(None, FileMode::ReadWrite, OpenFlags::new().with_binary(true)) {
//!     handle.write(b"\0binary\r\n", None)?;
//!     handle.rewind()?;
//!     assert_eq!(handle.read_to_end()?, b"\0binary\r\n");
//! }
//! # Ok(())
//! # }
//! ```

pub mod delimited;
pub mod error;
pub mod file;
pub mod memory;
pub mod mode;
pub mod text;
pub mod traits;

pub use delimited::{CsvHandle, Dialect, Value};
pub use error::{HandleError, Result};
pub use file::{FileHandle, DEFAULT_READ_LENGTH};
pub use memory::MemoryHandle;
pub use mode::{Disposition, FileMode, OpenFlags};
pub use text::{LineEnding, TextHandle};
pub use traits::FileContract;
