//! Error handling for pombranch
//!
//! This module provides the error types and user-friendly error reporting for the
//! branch rewriter. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`BranchError`] - Enumerated error types for the failure cases of a rewrite
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! Library operations return [`anyhow::Result`] and attach context with
//! [`anyhow::Context`]; the domain errors stay downcastable so that
//! [`user_friendly_error`] can map them to tailored suggestions.
//!
//! # Fatal lookups versus missing artifacts
//!
//! An artifact that does not exist on the branch is *not* an error: the existence
//! check answers `Ok(false)` and the property is skipped. A lookup that could not be
//! performed at all is reported as [`BranchError::RepositoryUnavailable`] and aborts
//! the run, because treating "could not check" as "does not exist" would silently
//! change which properties get rewritten.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pombranch::core::{BranchError, ErrorContext};
//!
//! let context = ErrorContext::new(BranchError::InheritedProjectVersion {
//!     module: "parent-pom".to_string(),
//! })
//! .with_suggestion("Declare an explicit <version> in the root module");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for pombranch operations
///
/// # Error Categories
///
/// ## Reactor
/// - [`ReactorNotFound`] - The reactor snapshot file does not exist
/// - [`ReactorParseError`] - The snapshot could not be deserialized
/// - [`ReactorValidationError`] - The snapshot is structurally invalid
/// - [`UnsupportedReactorFormat`] - Unknown snapshot file extension
/// - [`InheritedProjectVersion`] - The root module has no version of its own
///
/// ## Repository
/// - [`RepositoryUnavailable`] - An existence lookup could not be performed
///
/// ## Configuration and platform
/// - [`ConfigError`] - Global configuration issues
/// - [`FileSystemError`] - File system operations
///
/// [`ReactorNotFound`]: BranchError::ReactorNotFound
/// [`ReactorParseError`]: BranchError::ReactorParseError
/// [`ReactorValidationError`]: BranchError::ReactorValidationError
/// [`UnsupportedReactorFormat`]: BranchError::UnsupportedReactorFormat
/// [`InheritedProjectVersion`]: BranchError::InheritedProjectVersion
/// [`RepositoryUnavailable`]: BranchError::RepositoryUnavailable
/// [`ConfigError`]: BranchError::ConfigError
/// [`FileSystemError`]: BranchError::FileSystemError
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BranchError {
    /// The root module inherits its version from its parent
    ///
    /// Without an explicit project version there is nothing to branch from, so the
    /// rewrite cannot decide on the new version of the tree.
    #[error(
        "Project version of '{module}' is inherited from parent; there's not enough information to re-write the POM"
    )]
    InheritedProjectVersion {
        /// Module id of the root module
        module: String,
    },

    /// An artifact existence lookup could not be performed
    #[error("Artifact resolution failed for {artifact}")]
    RepositoryUnavailable {
        /// The `group:artifact:version` that was being looked up
        artifact: String,
        /// Underlying reason reported by the repository
        reason: String,
    },

    /// Reactor snapshot not found
    #[error("Reactor snapshot not found: {path}")]
    ReactorNotFound {
        /// Path that was searched
        path: String,
    },

    /// Reactor snapshot could not be parsed
    #[error("Invalid reactor snapshot syntax in {file}")]
    ReactorParseError {
        /// Path to the snapshot
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Reactor snapshot is structurally invalid
    #[error("Reactor validation failed: {reason}")]
    ReactorValidationError {
        /// Reason why validation failed
        reason: String,
    },

    /// The snapshot extension is not one of json, toml, yaml or yml
    #[error("Unsupported reactor snapshot format: {path}")]
    UnsupportedReactorFormat {
        /// Path with the unsupported extension
        path: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// File system error
    #[error("File system error: {operation}")]
    FileSystemError {
        /// The file system operation that failed
        operation: String,
        /// Path where the error occurred
        path: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// Wraps a [`BranchError`] with an optional suggestion (what to do) and optional
/// details (why it happened). [`display`](ErrorContext::display) prints the three
/// parts to stderr in red, yellow and green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: BranchError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`BranchError`]
    #[must_use]
    pub const fn new(error: BranchError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`BranchError`] anywhere in the error chain, [`std::io::Error`] and the
/// snapshot deserializers; anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(branch_error) = error.chain().find_map(|e| e.downcast_ref::<BranchError>()) {
        return create_error_context(branch_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(BranchError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check file ownership and permissions of the reactor snapshot")
                .with_details("pombranch needs read and write access to the snapshot it rewrites");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(BranchError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(BranchError::Other {
        message,
    })
}

fn create_error_context(error: BranchError) -> ErrorContext {
    match &error {
        BranchError::InheritedProjectVersion { .. } => ErrorContext::new(error)
            .with_suggestion("Declare an explicit version in the root module before branching")
            .with_details("The branch tag is inserted into the root project version; an inherited version cannot be rewritten in place"),

        BranchError::RepositoryUnavailable { reason, .. } => {
            let details = format!(
                "The repository lookup failed ({reason}). The rewrite is aborted because an unreachable repository cannot prove that branched artifacts are missing"
            );
            ErrorContext::new(error)
                .with_suggestion("Check the repository URLs in your configuration and your network connection, then re-run")
                .with_details(details)
        }

        BranchError::ReactorNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Pass the reactor snapshot with --reactor <FILE>"),

        BranchError::ReactorParseError { file, reason } => {
            let suggestion = format!(
                "Check the syntax of {file}. Modules are listed under 'modules' with groupId, artifactId and version fields"
            );
            let details = reason.clone();
            ErrorContext::new(error).with_suggestion(suggestion).with_details(details)
        }

        BranchError::ReactorValidationError { .. } => ErrorContext::new(error)
            .with_suggestion("Every module needs a unique, non-empty artifactId"),

        BranchError::UnsupportedReactorFormat { .. } => ErrorContext::new(error)
            .with_suggestion("Use a .json, .toml, .yaml or .yml reactor snapshot"),

        BranchError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check ~/.pombranch/config.toml or the file passed with --config"),

        BranchError::FileSystemError { .. } | BranchError::Other { .. } => ErrorContext::new(error),
    }
}
