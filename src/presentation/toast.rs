use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::presentation::ToastExpired;

pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// A single transient message.
///
/// Showing a new message cancels the pending clear of the old one and bumps
/// the generation; an expiry for an older generation is ignored, so a late
/// clear can never wipe a newer message.
pub struct Toast<E> {
    message: Option<String>,
    generation: u64,
    timer: Option<CancellationToken>,
    events: UnboundedSender<E>,
    duration: Duration,
}

impl<E> Toast<E>
where
    E: From<ToastExpired> + Send + 'static,
{
    pub fn new(events: UnboundedSender<E>) -> Self {
        Self {
            message: None,
            generation: 0,
            timer: None,
            events,
            duration: TOAST_DURATION,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Show `message` and clear it after the toast duration.
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        let generation = self.replace(message.into());

        let token = CancellationToken::new();
        self.timer = Some(token.clone());
        let events = self.events.clone();
        let duration = self.duration;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(duration) => {
                    let _ = events.send(ToastExpired { generation }.into());
                }
            }
        });

        generation
    }

    /// Show `message` until something replaces it.
    pub fn show_sticky(&mut self, message: impl Into<String>) -> u64 {
        self.replace(message.into())
    }

    pub fn on_expired(&mut self, expired: ToastExpired) -> bool {
        if expired.generation != self.generation || self.message.is_none() {
            return false;
        }
        self.message = None;
        self.timer = None;
        true
    }

    fn replace(&mut self, message: String) -> u64 {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.generation += 1;
        self.message = Some(message);
        self.generation
    }
}

impl<E> Drop for Toast<E> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}
