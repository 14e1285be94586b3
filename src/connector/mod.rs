//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Chat completion (Azure OpenAI over HTTP, scripted offline client)
//! - Terminal UI (ratatui front-end for the presentation controller)

pub mod adapter;
pub mod tui;

pub use adapter::*;
