//! Core types for Landing Zone Forge.
//!
//! This module provides the foundation shared by every other module:
//! - [`error`] - the [`ForgeError`] type and user-friendly error display
//! - [`family`] - the [`Family`] registry of entity families
//!
//! # Examples
//!
//! ```rust
//! use lzforge::core::Family;
//!
//! let family: Family = "security_groups".parse().unwrap();
//! assert_eq!(family.as_str(), "security_groups");
//! ```

pub mod error;
pub mod family;

pub use error::{ErrorContext, ForgeError, user_friendly_error};
pub use family::Family;
