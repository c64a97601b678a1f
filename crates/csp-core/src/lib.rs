//! # csp-core
//!
//! Core crate for the CSP license adapter. Contains the unified error
//! system, configuration schemas, and the opt-in logging initializer.
//!
//! This crate has **no** dependency on the AWS SDK.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
