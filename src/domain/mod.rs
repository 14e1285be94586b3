//! # Domain Layer
//!
//! Queries, slope records, and the parsing rules that turn model text into them.
//! This layer is independent of the HTTP client and the terminal UI.

pub mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
