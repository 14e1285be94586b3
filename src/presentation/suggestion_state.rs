use crate::domain::SuggestionList;

pub const SUGGESTIONS_LOADING_MESSAGE: &str = "Loading city hints…";
pub const SUGGESTIONS_ERROR_MESSAGE: &str = "Could not load city suggestions.";

/// Suggestion dropdown state.
///
/// `Idle → Debouncing → Loading → {Shown | Empty | Errored}`; any edit
/// restarts from `Debouncing` or drops back to `Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SuggestionState {
    #[default]
    Idle,
    Debouncing {
        query_id: u64,
    },
    Loading {
        query_id: u64,
    },
    Shown(SuggestionList),
    Empty,
    Errored(String),
}

impl SuggestionState {
    pub fn suggestions(&self) -> &[String] {
        match self {
            SuggestionState::Shown(list) => list.items(),
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SuggestionState::Loading { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SuggestionState::Errored(message) => Some(message),
            _ => None,
        }
    }

    /// Status line shown under the city field, if any.
    pub fn status_line(&self) -> Option<&str> {
        match self {
            SuggestionState::Loading { .. } => Some(SUGGESTIONS_LOADING_MESSAGE),
            SuggestionState::Errored(message) => Some(message),
            _ => None,
        }
    }
}
