//! Photo Portfolio Library
//!
//! Turns an ordered list of photos into a paginated PDF portfolio.
//! This library provides functionality to:
//! - Keep an ordered registry of dropped photo files
//! - Lay out photos, captions and summary tables onto Letter pages
//! - Stamp a running footer with logos and "Page n of m" on every page after the first
//! - Read generated portfolios back (page counts, footers, metadata)
//!
//! # Example
//!
//! ```no_run
//! use photo_portfolio::pdf::{generate, AssemblerOptions};
//! use std::path::{Path, PathBuf};
//!
//! let options = AssemblerOptions::new("assets/logo-left.png", "assets/logo-right.png");
//! let photos = vec![PathBuf::from("beach.jpg"), PathBuf::from("forest.jpg")];
//!
//! generate(Path::new("portfolio.pdf"), &photos, &options).expect("Failed to generate portfolio");
//! ```

pub mod config;
pub mod date;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod registry;
pub mod session;

// Re-export commonly used items
pub use error::{Error, Result};
