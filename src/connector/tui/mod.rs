//! Interactive terminal front-end.
//!
//! The event loop owns the [`AppController`](crate::presentation::AppController)
//! and multiplexes key presses with background events on one task.

mod app;
mod view;

pub use app::{run, Focus, UiState};
