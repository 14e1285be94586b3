use crate::application::{SearchEvent, SuggestionEvent};

/// Toast clear scheduled for the message shown with `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastExpired {
    pub generation: u64,
}

/// Everything background tasks report back to the controller.
#[derive(Debug)]
pub enum AppEvent {
    Suggestion(SuggestionEvent),
    Search(SearchEvent),
    ToastExpired(ToastExpired),
}

impl From<SuggestionEvent> for AppEvent {
    fn from(event: SuggestionEvent) -> Self {
        AppEvent::Suggestion(event)
    }
}

impl From<SearchEvent> for AppEvent {
    fn from(event: SearchEvent) -> Self {
        AppEvent::Search(event)
    }
}

impl From<ToastExpired> for AppEvent {
    fn from(event: ToastExpired) -> Self {
        AppEvent::ToastExpired(event)
    }
}
