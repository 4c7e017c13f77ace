//! Utility modules for file operations and path handling.
//!
//! # Modules
//!
//! - [`files`]: Async file reading, atomic writes, and font file listing
//! - [`paths`]: Path resolution helpers (tilde expansion, marker search)

pub mod files;
pub mod paths;
