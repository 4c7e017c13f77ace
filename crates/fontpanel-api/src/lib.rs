//! HTTP API for Font Panel.
//!
//! Wraps a [`fontpanel_core::FontStore`] in an axum [`Router`](axum::Router):
//! JSON and multipart endpoints under `/api`, guarded by a bearer API key,
//! plus the login and admin pages.
//!
//! # Modules
//!
//! - [`router`]: Route table and options
//! - [`handlers`]: Endpoint handlers and payload types
//! - [`auth`]: Bearer key middleware
//! - [`error`]: Error-to-response mapping
//! - [`pages`]: Static HTML
//! - [`server`]: Bind and serve with graceful shutdown

#![doc = include_str!("../README.md")]

pub mod auth;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{DEFAULT_MAX_UPLOAD_BYTES, RouterOptions, router};
pub use server::{serve, serve_with_listener};
