//! Font Panel Core: shared types, stylesheet model, and font storage.
//!
//! This crate has no HTTP or CLI dependencies; `fontpanel-api` and
//! `fontpanel-cli` build on it.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: The [`ConfigProvider`] trait and SillyTavern layout constants
//! - [`font`]: Font metadata and input validation
//! - [`css`]: `@font-face` aware model of `user.css`
//! - [`store`]: The filesystem-backed [`FontStore`]
//! - [`state`]: Shared application state
//! - [`util`]: File and path utilities

#![doc = include_str!("../README.md")]

pub mod css;
pub mod error;
pub mod font;
pub mod state;
pub mod store;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use font::{FontEntry, FontStyle, FontWeight, NewFont};
pub use state::AppState;
pub use store::{DeleteReport, FontStore};
pub use traits::ConfigProvider;
