//! Core types shared across pombranch
//!
//! Currently this is the error layer: [`BranchError`] for typed failures and
//! [`ErrorContext`] / [`user_friendly_error`] for presenting them on the CLI.

pub mod error;

pub use error::{BranchError, ErrorContext, user_friendly_error};
