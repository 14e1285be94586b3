use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::application::{prompts, ChatClient, CompletionRequest};
use crate::domain::DomainError;

const DEMO_CITIES: &[&str] = &[
    "Bielsko-Biała",
    "Białystok",
    "Gdańsk",
    "Gdynia",
    "Jelenia Góra",
    "Karpacz",
    "Katowice",
    "Kielce",
    "Kraków",
    "Krynica-Zdrój",
    "Lublin",
    "Łódź",
    "Nowy Sącz",
    "Nowy Targ",
    "Poznań",
    "Rzeszów",
    "Szczecin",
    "Szczyrk",
    "Szklarska Poręba",
    "Ustrzyki Dolne",
    "Warszawa",
    "Wisła",
    "Wrocław",
    "Zakopane",
    "Zawoja",
];

const DEMO_SLOPES: &str = r#"```json
[
  {"name": "Kasprowy Wierch", "status": "open", "conditions": "Excellent, fresh powder", "snowDepth": "140 cm", "url": "https://www.pkl.pl"},
  {"name": "Nosal", "status": "partial", "conditions": "Groomed, ok in the morning", "snowDepth": "60 cm", "url": ""},
  {"name": "Harenda", "status": "closed", "conditions": "icy", "snowDepth": "unknown"},
  {"name": "Polana Szymoszkowa", "status": "open", "snowDepth": 85}
]
```"#;

/// Canned answer for requests whose user message contains a given key.
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    outcome: ScriptedOutcome,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
enum ScriptedOutcome {
    Text(String),
    Status(u16, String),
    Timeout,
}

impl ScriptedReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            outcome: ScriptedOutcome::Text(text.into()),
            delay: None,
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: ScriptedOutcome::Status(status, body.into()),
            delay: None,
        }
    }

    pub fn timeout() -> Self {
        Self {
            outcome: ScriptedOutcome::Timeout,
            delay: None,
        }
    }

    /// Answer only after `delay` has passed.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn resolve(&self) -> Result<String, DomainError> {
        match &self.outcome {
            ScriptedOutcome::Text(text) => Ok(text.clone()),
            ScriptedOutcome::Status(status, body) => {
                Err(DomainError::http_status(*status, body.clone()))
            }
            ScriptedOutcome::Timeout => Err(DomainError::Timeout(0)),
        }
    }
}

/// Offline [`ChatClient`] with deterministic answers.
///
/// Scripted replies are matched by substring against the user message, in
/// registration order. Unmatched requests get demo data: suggestions from a
/// fixed list of Polish cities, and a fenced JSON array of slopes for
/// conditions requests. Every request is recorded.
pub struct ScriptedChatClient {
    scripts: Vec<(String, ScriptedReply)>,
    default_delay: Option<Duration>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedChatClient {
    pub fn new() -> Self {
        Self {
            scripts: Vec::new(),
            default_delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(mut self, user_contains: impl Into<String>, reply: ScriptedReply) -> Self {
        self.scripts.push((user_contains.into(), reply));
        self
    }

    /// Delay applied to demo answers, to make loading states visible.
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn demo_reply(request: &CompletionRequest) -> String {
        if request.system == prompts::CONDITIONS_SYSTEM_PROMPT {
            return DEMO_SLOPES.to_string();
        }

        let prefix = request.user.trim().to_lowercase();
        DEMO_CITIES
            .iter()
            .filter(|city| city.to_lowercase().starts_with(&prefix))
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ScriptedChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        let scripted = self
            .scripts
            .iter()
            .find(|(key, _)| request.user.contains(key.as_str()))
            .map(|(_, reply)| reply);

        let delay = match scripted {
            Some(reply) => reply.delay,
            None => self.default_delay,
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match scripted {
            Some(reply) => {
                debug!("ScriptedChatClient: scripted reply for \"{}\"", request.user);
                reply.resolve()
            }
            None => Ok(Self::demo_reply(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_conditions, parse_suggestions, SearchRange};

    #[tokio::test]
    async fn test_demo_suggestions_match_prefix() {
        let client = ScriptedChatClient::new();
        let raw = client
            .complete(&prompts::suggestion_request("sz"))
            .await
            .unwrap();
        let list = parse_suggestions(&raw);
        assert_eq!(list.items(), ["Szczecin", "Szczyrk", "Szklarska Poręba"]);
    }

    #[tokio::test]
    async fn test_demo_conditions_survive_sanitizer() {
        let client = ScriptedChatClient::new();
        let raw = client
            .complete(&prompts::conditions_request("Zakopane", SearchRange::default()))
            .await
            .unwrap();
        let slopes = parse_conditions(&raw).unwrap();
        assert_eq!(slopes.len(), 4);
        assert_eq!(slopes[3].snow_depth(), Some("85"));
    }

    #[tokio::test]
    async fn test_scripts_match_in_order_and_record_calls() {
        let client = ScriptedChatClient::new()
            .with_reply("Gd", ScriptedReply::text("Gdańsk"))
            .with_reply("G", ScriptedReply::timeout());

        assert_eq!(
            client.complete(&prompts::suggestion_request("Gdy")).await.unwrap(),
            "Gdańsk"
        );
        let err = client
            .complete(&prompts::suggestion_request("Gi"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Timeout(_)));
        assert_eq!(client.call_count(), 2);
    }
}
