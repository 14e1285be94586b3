use serde::{Deserialize, Serialize};

const GOOD_KEYWORDS: &[&str] = &["excellent", "very good", "powder", "fresh"];
const FAIR_KEYWORDS: &[&str] = &["good", "ok", "fair", "decent"];
const BAD_KEYWORDS: &[&str] = &["poor", "bad", "slush", "icy", "closed"];

/// Severity of a free-text conditions string. Derived for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionLevel {
    Good,
    Fair,
    Bad,
    Unknown,
}

impl ConditionLevel {
    /// Keyword classification, first match wins. Tiers are checked good,
    /// fair, bad; the order matters because "very good" also contains "good".
    pub fn classify(conditions: Option<&str>) -> Self {
        let text = conditions.unwrap_or_default().to_lowercase();
        if text.is_empty() {
            return ConditionLevel::Unknown;
        }

        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

        if contains_any(GOOD_KEYWORDS) {
            ConditionLevel::Good
        } else if contains_any(FAIR_KEYWORDS) {
            ConditionLevel::Fair
        } else if contains_any(BAD_KEYWORDS) {
            ConditionLevel::Bad
        } else {
            ConditionLevel::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionLevel::Good => "good",
            ConditionLevel::Fair => "fair",
            ConditionLevel::Bad => "bad",
            ConditionLevel::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ConditionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
