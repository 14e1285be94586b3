//! # Presentation Layer
//!
//! Per-intent state machines, the subscribe policy, and the controller that
//! owns them. Front-ends (CLI, TUI) only read this state and forward input.

mod controller;
mod events;
mod search_state;
pub mod slope_table;
mod suggestion_state;
mod toast;
mod validation;

pub use controller::*;
pub use events::*;
pub use search_state::*;
pub use slope_table::{SlopeRow, EMPTY_PLACEHOLDER, UNKNOWN_PLACEHOLDER};
pub use suggestion_state::*;
pub use toast::*;
pub use validation::*;
