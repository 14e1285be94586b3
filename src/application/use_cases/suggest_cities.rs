use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{prompts, ChatClient};
use crate::domain::{parse_suggestions, DomainError, SuggestionList};

/// Prefixes shorter than this (after trimming) never reach the model.
pub const MIN_PREFIX_CHARS: usize = 2;

pub fn is_suggestible(prefix: &str) -> bool {
    prefix.trim().chars().count() >= MIN_PREFIX_CHARS
}

pub struct SuggestCitiesUseCase {
    chat_client: Arc<dyn ChatClient>,
}

impl SuggestCitiesUseCase {
    pub fn new(chat_client: Arc<dyn ChatClient>) -> Self {
        Self { chat_client }
    }

    /// Ask the model for city names matching `prefix`.
    ///
    /// Short prefixes yield an empty list without a network call. Transport
    /// failures are returned to the caller, which degrades them to an empty
    /// list; suggestions are best-effort.
    pub async fn execute(&self, prefix: &str) -> Result<SuggestionList, DomainError> {
        let prefix = prefix.trim();
        if !is_suggestible(prefix) {
            return Ok(SuggestionList::empty());
        }

        let request = prompts::suggestion_request(prefix);
        let raw = self.chat_client.complete(&request).await.map_err(|e| {
            warn!("City suggestions for \"{prefix}\" failed: {e}");
            e
        })?;

        let suggestions = parse_suggestions(&raw);
        debug!(
            "Model suggested {} cities for \"{}\"",
            suggestions.len(),
            prefix
        );
        Ok(suggestions)
    }
}
