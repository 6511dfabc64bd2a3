//! Snapline Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the Snapline project.
//!
//! # Overview
//!
//! This crate provides common functionality used across all Snapline
//! workspace members:
//!
//! - **Error Handling**: The [`EtlError`] taxonomy and result type
//! - **Logging**: Centralized tracing setup for binaries
//! - **Secrets**: Archive password derivation from the environment
//!
//! # Example
//!
//! ```no_run
//! use snapline_common::{Result, EtlError};
//! use snapline_common::secret::derive_archive_password;
//!
//! fn open_archive() -> Result<()> {
//!     let password = derive_archive_password()?;
//!     println!("Derived {} password bytes", password.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod secret;

// Re-export commonly used types
pub use error::{EtlError, Result};
