//! # Application Layer
//!
//! Use cases and the per-intent orchestration (debounce, supersession) that
//! sits between user input and the chat client.

pub mod interfaces;
pub mod orchestration;
pub mod prompts;
pub mod use_cases;

pub use interfaces::*;
pub use orchestration::*;
pub use use_cases::*;
