//! wrapgen Core
//!
//! Shared types for the wrapper generator: the function [`Signature`] model
//! recovered from C declarations, the workspace error type and configuration.

pub mod config;
pub mod error;
pub mod signature;

pub use config::Config;
pub use error::{Error, Result};
pub use signature::{DeclarationError, Signature};
