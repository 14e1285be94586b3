use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::application::{
    ChatClient, ConditionsSearcher, InputOutcome, SearchConditionsUseCase, SearchEvent,
    SuggestCitiesUseCase, SuggestionEvent, SuggestionFetcher,
};
use crate::domain::{Query, SearchRange, DEFAULT_RANGE_KM};
use crate::presentation::{
    can_subscribe, validate_subscription, AppEvent, SearchState, SuggestionState, Toast,
    ValidationError, SUGGESTIONS_ERROR_MESSAGE,
};

pub const SUBSCRIBE_ACK_MESSAGE: &str = "Thanks for subscribing!";

/// Owns every piece of user-visible state.
///
/// User actions are plain method calls. Background work (debounce timers,
/// model requests, toast timers) reports back through [`AppEvent`]s, which
/// the owner feeds into [`AppController::handle_event`] one at a time, so all
/// mutation happens on the caller's task. Events from superseded queries
/// are dropped here.
pub struct AppController {
    city: String,
    city_confirmed: bool,
    range_input: String,
    email: String,
    suggestions: SuggestionState,
    search: SearchState,
    fetcher: SuggestionFetcher<AppEvent>,
    searcher: ConditionsSearcher<AppEvent>,
    toast: Toast<AppEvent>,
}

impl AppController {
    pub fn new(chat_client: Arc<dyn ChatClient>, events: UnboundedSender<AppEvent>) -> Self {
        let suggest = Arc::new(SuggestCitiesUseCase::new(chat_client.clone()));
        let search = Arc::new(SearchConditionsUseCase::new(chat_client));

        Self {
            city: String::new(),
            city_confirmed: false,
            range_input: DEFAULT_RANGE_KM.to_string(),
            email: String::new(),
            suggestions: SuggestionState::Idle,
            search: SearchState::Idle,
            fetcher: SuggestionFetcher::new(suggest, events.clone()),
            searcher: ConditionsSearcher::new(search, events.clone()),
            toast: Toast::new(events),
        }
    }

    pub fn with_quiet_interval(mut self, quiet_interval: Duration) -> Self {
        self.fetcher = self.fetcher.with_quiet_interval(quiet_interval);
        self
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn is_city_confirmed(&self) -> bool {
        self.city_confirmed
    }

    pub fn range_input(&self) -> &str {
        &self.range_input
    }

    pub fn effective_range(&self) -> SearchRange {
        SearchRange::parse(&self.range_input)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn suggestion_state(&self) -> &SuggestionState {
        &self.suggestions
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn toast_message(&self) -> Option<&str> {
        self.toast.message()
    }

    pub fn can_subscribe(&self) -> bool {
        can_subscribe(self.city_confirmed, &self.email)
    }

    /// The city field changed. Any edit un-confirms the city.
    pub fn edit_city(&mut self, text: impl Into<String>) {
        self.city = text.into();
        self.city_confirmed = false;

        self.suggestions = match self.fetcher.on_input(&self.city, false) {
            InputOutcome::Cleared { .. } => SuggestionState::Idle,
            InputOutcome::Debouncing(query) => SuggestionState::Debouncing {
                query_id: query.id(),
            },
        };
    }

    /// Accept a suggestion. Further suggestion queries are suppressed until
    /// the city is edited again.
    pub fn select_suggestion(&mut self, city: impl Into<String>) {
        self.city = city.into();
        self.city_confirmed = true;
        self.fetcher.cancel();
        self.suggestions = SuggestionState::Idle;
        debug!("City confirmed: {}", self.city);
    }

    /// Accept the suggestion at `index` of the current list, if any.
    pub fn select_suggestion_at(&mut self, index: usize) -> bool {
        let Some(city) = self.suggestions.suggestions().get(index).cloned() else {
            return false;
        };
        self.select_suggestion(city);
        true
    }

    pub fn edit_range(&mut self, text: impl Into<String>) {
        self.range_input = text.into();
    }

    pub fn step_range(&mut self, up: bool) {
        self.range_input = self.effective_range().step(up).to_string();
    }

    pub fn edit_email(&mut self, text: impl Into<String>) {
        self.email = text.into();
    }

    /// Start a conditions search for the current city, superseding any
    /// search still in flight.
    pub fn request_search(&mut self) -> Option<Query> {
        if self.city.trim().is_empty() {
            self.search = SearchState::Rejected(ValidationError::MissingCity);
            return None;
        }

        let query = self.searcher.search(&self.city, self.effective_range());
        info!("Issued search {}", query.summary());
        self.search = SearchState::Searching {
            query: query.clone(),
        };
        Some(query)
    }

    /// Validate the subscribe form. Nothing is sent anywhere.
    pub fn subscribe(&mut self) -> Result<(), ValidationError> {
        match validate_subscription(self.city_confirmed, &self.email) {
            Ok(address) => {
                info!("Subscription accepted for {address} ({})", self.city.trim());
                self.toast.show(SUBSCRIBE_ACK_MESSAGE);
                self.email.clear();
                Ok(())
            }
            Err(reason) => {
                debug!("Subscription rejected: {reason}");
                self.toast.show_sticky(reason.to_string());
                Err(reason)
            }
        }
    }

    /// Apply a background event. Returns whether visible state changed.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Suggestion(event) => self.apply_suggestion_event(event),
            AppEvent::Search(event) => self.apply_search_event(event),
            AppEvent::ToastExpired(expired) => self.toast.on_expired(expired),
        }
    }

    fn apply_suggestion_event(&mut self, event: SuggestionEvent) -> bool {
        match event {
            SuggestionEvent::Loading { query_id } => {
                if !self.fetcher.is_current(query_id) || self.city_confirmed {
                    return false;
                }
                self.suggestions = SuggestionState::Loading { query_id };
            }
            SuggestionEvent::Resolved { query_id, result } => {
                if !self.fetcher.is_current(query_id) || self.city_confirmed {
                    debug!("Dropping stale suggestions for query #{query_id}");
                    return false;
                }
                self.suggestions = match result {
                    Ok(list) if list.is_empty() => SuggestionState::Empty,
                    Ok(list) => SuggestionState::Shown(list),
                    Err(e) => {
                        warn!("City suggestions unavailable: {e}");
                        SuggestionState::Errored(SUGGESTIONS_ERROR_MESSAGE.to_string())
                    }
                };
            }
        }
        true
    }

    fn apply_search_event(&mut self, event: SearchEvent) -> bool {
        let SearchEvent { query_id, result } = event;

        let query = match &self.search {
            SearchState::Searching { query }
                if query.id() == query_id && self.searcher.is_current(query_id) =>
            {
                query.clone()
            }
            _ => {
                debug!("Dropping stale search result for query #{query_id}");
                return false;
            }
        };

        self.searcher.complete(query_id);
        self.search = SearchState::resolve(&query, result);
        true
    }
}
