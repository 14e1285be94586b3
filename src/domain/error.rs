use thiserror::Error;

/// Why the conditions payload could not be turned into slope records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailureKind {
    /// The sanitized text is not valid JSON.
    MalformedJson,
    /// Valid JSON, but not an array.
    UnexpectedShape,
}

impl ParseFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseFailureKind::MalformedJson => "malformed_json",
            ParseFailureKind::UnexpectedShape => "unexpected_shape",
        }
    }
}

impl std::fmt::Display for ParseFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified parse failure. `raw` is the sanitized model text, kept
/// verbatim for the diagnostics pane.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct ParseFailure {
    pub kind: ParseFailureKind,
    pub raw: String,
    pub detail: String,
}

impl ParseFailure {
    pub fn malformed_json(raw: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: ParseFailureKind::MalformedJson,
            raw: raw.into(),
            detail: detail.into(),
        }
    }

    pub fn unexpected_shape(raw: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: ParseFailureKind::UnexpectedShape,
            raw: raw.into(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    /// Non-success HTTP status or network failure. `body` is for logs only.
    #[error("Transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
        body: String,
    },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseFailure),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
            body: String::new(),
        }
    }

    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: format!("chat completion endpoint returned HTTP {status}"),
            body: body.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Timeouts count as transport failures for the UI.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout(_))
    }

    pub fn parse_failure(&self) -> Option<&ParseFailure> {
        match self {
            Self::Parse(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_counts_as_transport() {
        assert!(DomainError::Timeout(30).is_transport());
        assert!(DomainError::http_status(500, "boom").is_transport());
        assert!(!DomainError::invalid_input("x").is_transport());
    }

    #[test]
    fn http_status_message_hides_body() {
        let err = DomainError::http_status(401, "secret details");
        let text = err.to_string();
        assert!(text.contains("HTTP 401"));
        assert!(!text.contains("secret details"));
    }

    #[test]
    fn parse_failure_converts_into_domain_error() {
        let err: DomainError = ParseFailure::unexpected_shape("{}", "object").into();
        let failure = err.parse_failure().expect("parse failure");
        assert_eq!(failure.kind, ParseFailureKind::UnexpectedShape);
        assert_eq!(failure.raw, "{}");
    }
}
