use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::{is_suggestible, SuggestCitiesUseCase};
use crate::domain::{DomainError, Query, SuggestionList};

/// How long input must stay unchanged before a suggestion query is issued.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(400);

/// Progress of a debounced suggestion query, reported back to the owner.
#[derive(Debug)]
pub enum SuggestionEvent {
    /// The quiet interval elapsed and the request is on the wire.
    Loading { query_id: u64 },
    Resolved {
        query_id: u64,
        result: Result<SuggestionList, DomainError>,
    },
}

/// What a keystroke led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Nothing will be fetched for this input (too short, or a city is confirmed).
    Cleared { query_id: u64 },
    /// A query was scheduled to fire after the quiet interval.
    Debouncing(Query),
}

/// Debounced suggestion fetcher.
///
/// Every call to [`SuggestionFetcher::on_input`] invalidates the previous
/// timer and any request it started, then schedules a fresh one. Each
/// scheduled task owns a cancellation token and only reports results while
/// that token is still live, so at most one suggestion query is ever
/// in flight and only the newest one can deliver a result.
pub struct SuggestionFetcher<E> {
    use_case: Arc<SuggestCitiesUseCase>,
    events: UnboundedSender<E>,
    quiet_interval: Duration,
    current_id: u64,
    pending: Option<CancellationToken>,
}

impl<E> SuggestionFetcher<E>
where
    E: From<SuggestionEvent> + Send + 'static,
{
    pub fn new(use_case: Arc<SuggestCitiesUseCase>, events: UnboundedSender<E>) -> Self {
        Self {
            use_case,
            events,
            quiet_interval: DEBOUNCE_INTERVAL,
            current_id: 0,
            pending: None,
        }
    }

    pub fn with_quiet_interval(mut self, quiet_interval: Duration) -> Self {
        self.quiet_interval = quiet_interval;
        self
    }

    pub fn is_current(&self, query_id: u64) -> bool {
        query_id == self.current_id
    }

    /// React to the city field changing.
    pub fn on_input(&mut self, text: &str, confirmed: bool) -> InputOutcome {
        let query_id = self.supersede();

        if confirmed || !is_suggestible(text) {
            return InputOutcome::Cleared { query_id };
        }

        let query = Query::suggestion(query_id, text.trim());
        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let use_case = self.use_case.clone();
        let events = self.events.clone();
        let quiet_interval = self.quiet_interval;
        let prefix = query.text().to_string();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Suggestion query #{query_id} superseded while debouncing");
                    return;
                }
                _ = tokio::time::sleep(quiet_interval) => {}
            }

            if events.send(SuggestionEvent::Loading { query_id }.into()).is_err() {
                return;
            }

            let result = tokio::select! {
                _ = token.cancelled() => {
                    debug!("Suggestion query #{query_id} superseded while in flight");
                    return;
                }
                result = use_case.execute(&prefix) => result,
            };

            if token.is_cancelled() {
                return;
            }
            let _ = events.send(SuggestionEvent::Resolved { query_id, result }.into());
        });

        InputOutcome::Debouncing(query)
    }

    /// Invalidate whatever is pending without scheduling anything new.
    pub fn cancel(&mut self) -> u64 {
        self.supersede()
    }

    fn supersede(&mut self) -> u64 {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
        self.current_id += 1;
        self.current_id
    }
}

impl<E> Drop for SuggestionFetcher<E> {
    fn drop(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::{ScriptedChatClient, ScriptedReply};
    use tokio::sync::mpsc;

    fn fetcher(
        client: Arc<ScriptedChatClient>,
    ) -> (
        SuggestionFetcher<SuggestionEvent>,
        mpsc::UnboundedReceiver<SuggestionEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let use_case = Arc::new(SuggestCitiesUseCase::new(client));
        (SuggestionFetcher::new(use_case, tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_keystrokes_issue_one_query() {
        let client = Arc::new(ScriptedChatClient::new());
        let (mut fetcher, mut rx) = fetcher(client.clone());

        for text in ["Za", "Zak", "Zako", "Zakop"] {
            fetcher.on_input(text, false);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let loading = rx.recv().await.unwrap();
        assert!(matches!(loading, SuggestionEvent::Loading { query_id: 4 }));
        let resolved = rx.recv().await.unwrap();
        match resolved {
            SuggestionEvent::Resolved { query_id, result } => {
                assert_eq!(query_id, 4);
                assert!(result.is_ok());
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user, "Zakop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_clears_without_network() {
        let client = Arc::new(ScriptedChatClient::new());
        let (mut fetcher, mut rx) = fetcher(client.clone());

        let outcome = fetcher.on_input(" K ", false);
        assert_eq!(outcome, InputOutcome::Cleared { query_id: 1 });

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_input_is_not_fetched() {
        let client = Arc::new(ScriptedChatClient::new());
        let (mut fetcher, _rx) = fetcher(client.clone());

        let outcome = fetcher.on_input("Zakopane", true);
        assert!(matches!(outcome, InputOutcome::Cleared { .. }));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_request_is_dropped_when_superseded() {
        let client = Arc::new(ScriptedChatClient::new().with_reply(
            "Kra",
            ScriptedReply::text("Kraków").after(Duration::from_secs(5)),
        ));
        let (mut fetcher, mut rx) = fetcher(client.clone());

        fetcher.on_input("Kra", false);
        let loading = rx.recv().await.unwrap();
        assert!(matches!(loading, SuggestionEvent::Loading { query_id: 1 }));

        // The request is now on the wire; a new keystroke must silence it.
        fetcher.on_input("K", false);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(client.call_count(), 1);
        assert!(fetcher.is_current(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_reported() {
        let client = Arc::new(
            ScriptedChatClient::new().with_reply("Gd", ScriptedReply::status(502, "bad gateway")),
        );
        let (mut fetcher, mut rx) = fetcher(client);

        fetcher.on_input("Gd", false);
        let _loading = rx.recv().await.unwrap();
        match rx.recv().await.unwrap() {
            SuggestionEvent::Resolved { result, .. } => {
                assert!(result.unwrap_err().is_transport());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
