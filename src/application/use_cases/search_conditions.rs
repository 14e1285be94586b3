use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::{prompts, ChatClient};
use crate::domain::{parse_conditions, DomainError, SearchRange, SlopeRecord};

pub struct SearchConditionsUseCase {
    chat_client: Arc<dyn ChatClient>,
}

impl SearchConditionsUseCase {
    pub fn new(chat_client: Arc<dyn ChatClient>) -> Self {
        Self { chat_client }
    }

    /// Ask the model for ski slopes within `range` of `city`.
    ///
    /// Transport failures propagate so the caller can show a distinct error
    /// state. Parse failures come back as [`DomainError::Parse`] with the
    /// sanitized text attached. An empty vector is a valid answer.
    pub async fn execute(
        &self,
        city: &str,
        range: SearchRange,
    ) -> Result<Vec<SlopeRecord>, DomainError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(DomainError::invalid_input("city must not be empty"));
        }

        info!("Searching ski slopes within {} km of {}", range, city);

        let request = prompts::conditions_request(city, range);
        let raw = self.chat_client.complete(&request).await.map_err(|e| {
            error!("Ski conditions request for {city} failed: {e}");
            e
        })?;

        let slopes = parse_conditions(&raw).map_err(|failure| {
            warn!("Ski conditions for {city} were not usable: {failure}");
            DomainError::from(failure)
        })?;

        info!("Model returned {} slopes near {}", slopes.len(), city);
        Ok(slopes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::{ScriptedChatClient, ScriptedReply};
    use crate::domain::ParseFailureKind;

    #[tokio::test]
    async fn test_fenced_reply_is_parsed() {
        let client = Arc::new(ScriptedChatClient::new().with_reply(
            "City: Zakopane.",
            ScriptedReply::text("```json\n[{\"name\":\"Nosal\",\"status\":\"open\"}]\n```"),
        ));
        let use_case = SearchConditionsUseCase::new(client.clone());

        let slopes = use_case
            .execute("Zakopane", SearchRange::from_km(30))
            .await
            .unwrap();
        assert_eq!(slopes.len(), 1);
        assert_eq!(slopes[0].name(), Some("Nosal"));

        let calls = client.calls();
        assert!(calls[0].user.contains("within about 30 km"));
        assert_eq!(calls[0].temperature, prompts::CONDITIONS_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_parse_failure_carries_raw_text() {
        let client = Arc::new(
            ScriptedChatClient::new()
                .with_reply("City: Łódź.", ScriptedReply::text("Sorry, I cannot help.")),
        );
        let use_case = SearchConditionsUseCase::new(client);

        let err = use_case
            .execute("Łódź", SearchRange::default())
            .await
            .unwrap_err();
        let failure = err.parse_failure().expect("parse failure");
        assert_eq!(failure.kind, ParseFailureKind::MalformedJson);
        assert_eq!(failure.raw, "Sorry, I cannot help.");
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client = Arc::new(
            ScriptedChatClient::new()
                .with_reply("City: Wisła.", ScriptedReply::status(500, "oops")),
        );
        let use_case = SearchConditionsUseCase::new(client);

        let err = use_case
            .execute("Wisła", SearchRange::default())
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_blank_city_is_rejected_without_network() {
        let client = Arc::new(ScriptedChatClient::new());
        let use_case = SearchConditionsUseCase::new(client.clone());

        let err = use_case.execute("   ", SearchRange::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(client.call_count(), 0);
    }
}
