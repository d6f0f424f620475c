//! Tubular member CLI library.
//!
//! Helpers behind the `tubular-cli` binary: locating the material table and
//! choosing how reports are printed.

pub mod catalog;
pub mod format;
