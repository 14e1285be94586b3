use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::SearchConditionsUseCase;
use crate::domain::{DomainError, Query, SearchRange, SlopeRecord};

#[derive(Debug)]
pub struct SearchEvent {
    pub query_id: u64,
    pub result: Result<Vec<SlopeRecord>, DomainError>,
}

/// Runs conditions searches, one at a time.
///
/// Starting a search cancels the previous one. Results are tagged with the
/// query id so the owner can also reject anything that is not the newest.
pub struct ConditionsSearcher<E> {
    use_case: Arc<SearchConditionsUseCase>,
    events: UnboundedSender<E>,
    current_id: u64,
    in_flight: Option<CancellationToken>,
}

impl<E> ConditionsSearcher<E>
where
    E: From<SearchEvent> + Send + 'static,
{
    pub fn new(use_case: Arc<SearchConditionsUseCase>, events: UnboundedSender<E>) -> Self {
        Self {
            use_case,
            events,
            current_id: 0,
            in_flight: None,
        }
    }

    pub fn is_current(&self, query_id: u64) -> bool {
        query_id == self.current_id
    }

    pub fn search(&mut self, city: &str, range: SearchRange) -> Query {
        if let Some(token) = self.in_flight.take() {
            debug!("Search #{} superseded", self.current_id);
            token.cancel();
        }
        self.current_id += 1;

        let query = Query::conditions(self.current_id, city.trim(), range);
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let use_case = self.use_case.clone();
        let events = self.events.clone();
        let query_id = query.id();
        let city = query.text().to_string();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = use_case.execute(&city, range) => result,
            };
            if token.is_cancelled() {
                return;
            }
            let _ = events.send(SearchEvent { query_id, result }.into());
        });

        query
    }

    /// Mark the in-flight search as finished so a later `search` does not
    /// log it as superseded.
    pub fn complete(&mut self, query_id: u64) {
        if self.is_current(query_id) {
            self.in_flight = None;
        }
    }
}

impl<E> Drop for ConditionsSearcher<E> {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
