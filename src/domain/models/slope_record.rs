use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single ski-area entry as reported by the model.
///
/// Every field is optional: the model is not a reliable producer of complete
/// records, so absence is tolerated here and replaced by placeholders only
/// when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlopeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(default, rename = "snowDepth", skip_serializing_if = "Option::is_none")]
    pub snow_depth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SlopeRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_conditions(mut self, conditions: impl Into<String>) -> Self {
        self.conditions = Some(conditions.into());
        self
    }

    pub fn with_snow_depth(mut self, snow_depth: impl Into<String>) -> Self {
        self.snow_depth = Some(snow_depth.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Build a record from one element of the model's array. Never fails:
    /// scalars are stringified, nulls and nested values count as absent,
    /// and a non-object element yields an all-absent record.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let field = |key: &str| object.get(key).and_then(scalar_to_string);

        Self {
            name: field("name"),
            status: field("status"),
            conditions: field("conditions"),
            snow_depth: field("snowDepth").or_else(|| field("snow_depth")),
            url: field("url"),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn conditions(&self) -> Option<&str> {
        self.conditions.as_deref()
    }

    pub fn snow_depth(&self) -> Option<&str> {
        self.snow_depth.as_deref()
    }

    /// Non-empty url, if the model supplied one.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn slope_status(&self) -> SlopeStatus {
        SlopeStatus::from_text(self.status())
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// View projection of the free-text `status` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlopeStatus {
    Open,
    Closed,
    Partial,
    Unknown,
    Other(String),
}

impl SlopeStatus {
    pub fn from_text(text: Option<&str>) -> Self {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return SlopeStatus::Unknown;
        };
        match text.to_lowercase().as_str() {
            "open" => SlopeStatus::Open,
            "closed" => SlopeStatus::Closed,
            "partial" | "partially open" => SlopeStatus::Partial,
            "unknown" => SlopeStatus::Unknown,
            _ => SlopeStatus::Other(text.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SlopeStatus::Open => "open",
            SlopeStatus::Closed => "closed",
            SlopeStatus::Partial => "partial",
            SlopeStatus::Unknown => "unknown",
            SlopeStatus::Other(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_all_fields() {
        let record = SlopeRecord::from_value(&json!({
            "name": "Kasprowy Wierch",
            "status": "open",
            "conditions": "fresh powder",
            "snowDepth": "120 cm",
            "url": "https://pkl.pl"
        }));

        assert_eq!(record.name(), Some("Kasprowy Wierch"));
        assert_eq!(record.snow_depth(), Some("120 cm"));
        assert_eq!(record.url(), Some("https://pkl.pl"));
        assert_eq!(record.slope_status(), SlopeStatus::Open);
    }

    #[test]
    fn test_from_value_tolerates_missing_and_odd_fields() {
        let record = SlopeRecord::from_value(&json!({
            "name": "Gubałówka",
            "snowDepth": 60,
            "status": null,
            "url": ""
        }));

        assert_eq!(record.name(), Some("Gubałówka"));
        assert_eq!(record.snow_depth(), Some("60"));
        assert_eq!(record.status(), None);
        assert_eq!(record.conditions(), None);
        assert_eq!(record.url(), None);
        assert_eq!(record.slope_status(), SlopeStatus::Unknown);
    }

    #[test]
    fn test_from_value_non_object_is_all_absent() {
        assert_eq!(SlopeRecord::from_value(&json!("Szczyrk")), SlopeRecord::default());
        assert_eq!(SlopeRecord::from_value(&json!(null)), SlopeRecord::default());
    }

    #[test]
    fn test_status_projection() {
        assert_eq!(SlopeStatus::from_text(Some(" Closed ")), SlopeStatus::Closed);
        assert_eq!(SlopeStatus::from_text(Some("PARTIAL")), SlopeStatus::Partial);
        assert_eq!(
            SlopeStatus::from_text(Some("opens Friday")),
            SlopeStatus::Other("opens Friday".to_string())
        );
        assert_eq!(SlopeStatus::Other("x".into()).label(), "x");
    }
}
