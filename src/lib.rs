//! melcookie - MELCloud Home session cookie extractor
//!
//! This crate reads the melcloudhome.com session cookies straight from a
//! local browser's cookie store and turns them into a ready-to-paste
//! `name=value; ...` header string, with clipboard support and a small
//! on-disk cache of the last successful extraction.

pub mod browser;
pub mod cache;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod extract;
pub mod i18n;
pub mod logging;
pub mod output;
pub mod session;
pub mod utils;
pub mod watch;

pub use error::{MelcookieError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
