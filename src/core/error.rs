//! Error handling for Landing Zone Forge.
//!
//! The error system pairs two types, following the same split used across
//! the codebase for all fallible operations:
//! 1. [`ForgeError`] - strongly typed failure modes for precise handling
//! 2. [`ErrorContext`] - a display wrapper that adds user-facing suggestions
//!
//! Structural errors (a missing entity family, an unreadable document) are
//! programming or integration errors and propagate as `Err`. Validation
//! failures are *not* errors - they are boolean predicate results surfaced by
//! the [`crate::validate`] module and never reach this type.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for lzforge operations.
///
/// Each variant represents a specific failure mode with enough context to
/// produce an actionable message. Variants are intentionally coarse: the
/// compilation pipeline has very few ways to fail hard, because malformed
/// candidate input is rejected by the validation layer before it can mutate
/// the document.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Configuration document file could not be found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Configuration document is not valid JSON or does not match the schema.
    #[error("Failed to parse configuration: {reason}")]
    ConfigParseError {
        /// Parser error detail
        reason: String,
    },

    /// A compiler dereferenced an entity family that is absent from the
    /// document. Family keys must always be present, even when empty.
    #[error("Configuration is missing required section '{family}'")]
    MissingFamily {
        /// The absent family key
        family: String,
    },

    /// A compiler required a named entity that does not exist in the
    /// document. This is a hard failure: the document should have been
    /// healed by the state store before compilation.
    #[error("Unresolved reference: no {family} named '{name}'")]
    UnresolvedReference {
        /// Family searched
        family: String,
        /// Name that could not be resolved
        name: String,
    },

    /// The file assembler was invoked without a document.
    #[error("Cannot assemble files from an undefined configuration")]
    UndefinedConfiguration,

    /// Output directory could not be created or written.
    #[error("Failed to write output: {path}: {reason}")]
    OutputWriteError {
        /// Path that failed
        path: String,
        /// Underlying I/O error text
        reason: String,
    },

    /// I/O error wrapper from [`std::io::Error`].
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error wrapper from [`serde_json::Error`].
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Wrapper adding user-friendly context to an error for CLI display.
///
/// Mirrors the shape of the error output everywhere in the CLI: a red error
/// line, optional details, and an optional suggestion rendered in yellow.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error message
    pub message: String,
    /// Optional extended details
    pub details: Option<String>,
    /// Optional actionable suggestion
    pub suggestion: Option<String>,
}

impl ErrorContext {
    /// Create a context from any error-like message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
            suggestion: None,
        }
    }

    /// Attach extended details shown below the error line.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach an actionable suggestion shown below the error line.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.message);
        if let Some(details) = &self.details {
            eprintln!("  {details}");
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!("  {} {}", "hint:".yellow().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(details) = &self.details {
            write!(f, "\n  {details}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  hint: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error chain into a user-friendly [`ErrorContext`].
///
/// Known [`ForgeError`] variants get tailored suggestions; everything else
/// falls back to the raw message.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(forge_err) = error.downcast_ref::<ForgeError>() {
        match forge_err {
            ForgeError::ConfigNotFound { path } => {
                ErrorContext::new(format!("configuration file not found: {path}"))
                    .with_suggestion("run `lzforge compile <config.json>` with an existing file")
            }
            ForgeError::ConfigParseError { .. } => ErrorContext::new(forge_err.to_string())
                .with_suggestion(
                    "the document must be a JSON object with every entity family present, \
                     even when empty",
                ),
            ForgeError::MissingFamily { family } => ErrorContext::new(forge_err.to_string())
                .with_details(format!("add \"{family}\": [] to the document")),
            _ => ErrorContext::new(forge_err.to_string()),
        }
    } else {
        ErrorContext::new(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_family_message_names_the_family() {
        let err = ForgeError::MissingFamily {
            family: "vpcs".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Configuration is missing required section 'vpcs'"
        );
    }

    #[test]
    fn user_friendly_error_adds_suggestion_for_parse_errors() {
        let err = anyhow::Error::from(ForgeError::ConfigParseError {
            reason: "expected value at line 1".to_string(),
        });
        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.is_some());
        assert!(ctx.message.contains("expected value"));
    }

    #[test]
    fn context_display_includes_details_and_hint() {
        let ctx = ErrorContext::new("boom")
            .with_details("it broke")
            .with_suggestion("fix it");
        let rendered = format!("{ctx}");
        assert!(rendered.contains("boom"));
        assert!(rendered.contains("it broke"));
        assert!(rendered.contains("hint: fix it"));
    }
}
