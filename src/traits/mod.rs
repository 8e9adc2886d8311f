//! Core traits for handle abstraction
//!
//! This module provides the capability trait that lets alternate backing
//! stores stand in for an OS file without touching call sites.

pub mod file;

pub use file::FileContract;
