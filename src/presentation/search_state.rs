use tracing::warn;

use crate::domain::{DomainError, ParseFailureKind, Query, SearchRange, SlopeRecord};
use crate::presentation::ValidationError;

pub const SEARCH_TRANSPORT_MESSAGE: &str = "Could not load ski conditions. Please try again.";
pub const SEARCH_PARSE_MESSAGE: &str = "AI returned invalid ski-slope JSON.";
pub const SEARCH_EMPTY_MESSAGE: &str =
    "No ski slope data found near this city. Please try another.";
pub const NO_CONTENT_PAYLOAD: &str = "No content returned from AI.";

/// State of the search intent.
///
/// Each variant carries everything it renders, so moving to `Searching`
/// drops the previous results, error and debug payload in one assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Idle,
    Searching {
        query: Query,
    },
    Succeeded {
        city: String,
        range: SearchRange,
        slopes: Vec<SlopeRecord>,
    },
    EmptyResult {
        city: String,
        range: SearchRange,
    },
    ParseErrored {
        kind: ParseFailureKind,
        raw: String,
    },
    TransportErrored,
    Rejected(ValidationError),
}

impl SearchState {
    /// Fold the outcome of `query` into the next state.
    pub fn resolve(query: &Query, result: Result<Vec<SlopeRecord>, DomainError>) -> Self {
        let city = query.text().to_string();
        let range = query
            .range_km()
            .map(|km| SearchRange::from_km(i64::from(km)))
            .unwrap_or_default();

        match result {
            Ok(slopes) if slopes.is_empty() => SearchState::EmptyResult { city, range },
            Ok(slopes) => SearchState::Succeeded {
                city,
                range,
                slopes,
            },
            Err(DomainError::Parse(failure)) => SearchState::ParseErrored {
                kind: failure.kind,
                raw: failure.raw,
            },
            Err(DomainError::InvalidInput(_)) => {
                SearchState::Rejected(ValidationError::MissingCity)
            }
            Err(e) => {
                if !e.is_transport() {
                    warn!("Search {} failed unexpectedly: {e}", query.summary());
                }
                SearchState::TransportErrored
            }
        }
    }

    pub fn is_searching(&self) -> bool {
        matches!(self, SearchState::Searching { .. })
    }

    /// Slopes to render; empty unless the search succeeded.
    pub fn slopes(&self) -> &[SlopeRecord] {
        match self {
            SearchState::Succeeded { slopes, .. } => slopes,
            _ => &[],
        }
    }

    /// Error or notice line for the user.
    pub fn message(&self) -> Option<String> {
        match self {
            SearchState::EmptyResult { .. } => Some(SEARCH_EMPTY_MESSAGE.to_string()),
            SearchState::ParseErrored { .. } => Some(SEARCH_PARSE_MESSAGE.to_string()),
            SearchState::TransportErrored => Some(SEARCH_TRANSPORT_MESSAGE.to_string()),
            SearchState::Rejected(reason) => Some(reason.to_string()),
            _ => None,
        }
    }

    /// Raw model text for the diagnostics block; only present after a parse failure.
    pub fn debug_payload(&self) -> Option<&str> {
        match self {
            SearchState::ParseErrored { raw, .. } if raw.is_empty() => Some(NO_CONTENT_PAYLOAD),
            SearchState::ParseErrored { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn heading(&self) -> Option<String> {
        match self {
            SearchState::Succeeded { city, range, .. } => {
                Some(format!("Ski slopes within {range} km of {city}"))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseFailure;

    fn query() -> Query {
        Query::conditions(3, "Zakopane", SearchRange::from_km(40))
    }

    #[test]
    fn test_success_has_slopes_and_no_payload() {
        let state = SearchState::resolve(&query(), Ok(vec![SlopeRecord::new("Nosal")]));
        assert_eq!(state.slopes().len(), 1);
        assert_eq!(state.debug_payload(), None);
        assert_eq!(state.message(), None);
        assert_eq!(
            state.heading().as_deref(),
            Some("Ski slopes within 40 km of Zakopane")
        );
    }

    #[test]
    fn test_empty_result_is_a_notice_without_diagnostics() {
        let state = SearchState::resolve(&query(), Ok(vec![]));
        assert_eq!(state.message().as_deref(), Some(SEARCH_EMPTY_MESSAGE));
        assert_eq!(state.debug_payload(), None);
    }

    #[test]
    fn test_parse_failure_exposes_raw_text() {
        let failure = ParseFailure::malformed_json("oops", "expected value");
        let state = SearchState::resolve(&query(), Err(failure.into()));
        assert_eq!(state.message().as_deref(), Some(SEARCH_PARSE_MESSAGE));
        assert_eq!(state.debug_payload(), Some("oops"));
        assert!(state.slopes().is_empty());
    }

    #[test]
    fn test_empty_parse_payload_gets_placeholder() {
        let failure = ParseFailure::malformed_json("", "EOF");
        let state = SearchState::resolve(&query(), Err(failure.into()));
        assert_eq!(state.debug_payload(), Some(NO_CONTENT_PAYLOAD));
    }

    #[test]
    fn test_transport_and_timeout_share_a_state() {
        let state = SearchState::resolve(&query(), Err(DomainError::http_status(500, "x")));
        assert_eq!(state, SearchState::TransportErrored);
        assert_eq!(state.debug_payload(), None);

        let state = SearchState::resolve(&query(), Err(DomainError::Timeout(30)));
        assert_eq!(state.message().as_deref(), Some(SEARCH_TRANSPORT_MESSAGE));
    }
}
