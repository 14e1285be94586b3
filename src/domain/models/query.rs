use serde::{Deserialize, Serialize};

/// Range used when the user-supplied value is missing, non-numeric or not positive.
pub const DEFAULT_RANGE_KM: u32 = 100;
pub const MIN_RANGE_KM: u32 = 10;
pub const MAX_RANGE_KM: u32 = 300;
pub const RANGE_STEP_KM: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Suggestion,
    Conditions,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Suggestion => "suggestion",
            QueryKind::Conditions => "conditions",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user-triggered request. `id` is the issue order within its kind; a
/// higher id supersedes every lower one of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    id: u64,
    kind: QueryKind,
    text: String,
    range_km: Option<u32>,
}

impl Query {
    pub fn suggestion(id: u64, prefix: impl Into<String>) -> Self {
        Self {
            id,
            kind: QueryKind::Suggestion,
            text: prefix.into(),
            range_km: None,
        }
    }

    pub fn conditions(id: u64, city: impl Into<String>, range: SearchRange) -> Self {
        Self {
            id,
            kind: QueryKind::Conditions,
            text: city.into(),
            range_km: Some(range.km()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn range_km(&self) -> Option<u32> {
        self.range_km
    }

    pub fn summary(&self) -> String {
        match self.range_km {
            Some(km) => format!("#{} {} \"{}\" within {} km", self.id, self.kind, self.text, km),
            None => format!("#{} {} \"{}\"", self.id, self.kind, self.text),
        }
    }
}

/// Effective search radius in kilometers. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchRange(u32);

impl SearchRange {
    pub fn from_km(value: i64) -> Self {
        if value > 0 {
            Self(u32::try_from(value).unwrap_or(u32::MAX))
        } else {
            Self(DEFAULT_RANGE_KM)
        }
    }

    /// Parse free-form field text the way a lenient integer prefix parser
    /// would: leading whitespace and sign are accepted, trailing garbage is
    /// ignored ("150km" is 150), no digits at all means the default.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Self(DEFAULT_RANGE_KM);
        }

        match digits.parse::<i64>() {
            Ok(value) if !negative => Self::from_km(value),
            Ok(_) => Self(DEFAULT_RANGE_KM),
            // Too many digits for i64: still a positive number.
            Err(_) if !negative => Self(u32::MAX),
            Err(_) => Self(DEFAULT_RANGE_KM),
        }
    }

    pub fn km(&self) -> u32 {
        self.0
    }

    /// Step the value the way the numeric field does, staying within the
    /// advertised bounds.
    pub fn step(&self, up: bool) -> Self {
        let next = if up {
            self.0.saturating_add(RANGE_STEP_KM)
        } else {
            self.0.saturating_sub(RANGE_STEP_KM)
        };
        Self(next.clamp(MIN_RANGE_KM, MAX_RANGE_KM))
    }
}

impl Default for SearchRange {
    fn default() -> Self {
        Self(DEFAULT_RANGE_KM)
    }
}

impl std::fmt::Display for SearchRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
