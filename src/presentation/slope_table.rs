use crate::domain::{ConditionLevel, SlopeRecord, SlopeStatus};

pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";
pub const EMPTY_PLACEHOLDER: &str = "—";
pub const COLUMN_TITLES: [&str; 5] = ["Name", "Status", "Conditions", "Snow depth", "Website"];

/// A slope record with rendering defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlopeRow {
    pub name: String,
    pub status: String,
    pub slope_status: SlopeStatus,
    pub conditions: String,
    pub level: ConditionLevel,
    pub snow_depth: String,
    pub website: Option<String>,
}

impl SlopeRow {
    pub fn from_record(record: &SlopeRecord) -> Self {
        let slope_status = record.slope_status();
        let status = match &slope_status {
            SlopeStatus::Unknown => UNKNOWN_PLACEHOLDER.to_string(),
            known => known.label().to_string(),
        };

        Self {
            name: or_placeholder(record.name(), UNKNOWN_PLACEHOLDER),
            status,
            slope_status,
            conditions: or_placeholder(record.conditions(), EMPTY_PLACEHOLDER),
            level: ConditionLevel::classify(record.conditions()),
            snow_depth: or_placeholder(record.snow_depth(), UNKNOWN_PLACEHOLDER),
            website: record.url().map(|u| u.trim().to_string()),
        }
    }

    pub fn website_label(&self) -> &str {
        self.website.as_deref().unwrap_or(EMPTY_PLACEHOLDER)
    }

    fn cells(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.status.clone(),
            format!("[{}] {}", self.level, self.conditions),
            self.snow_depth.clone(),
            self.website_label().to_string(),
        ]
    }
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

pub fn rows(records: &[SlopeRecord]) -> Vec<SlopeRow> {
    records.iter().map(SlopeRow::from_record).collect()
}

/// Plain-text table for terminal output.
pub fn format_table(rows: &[SlopeRow]) -> String {
    let cells: Vec<[String; 5]> = rows.iter().map(SlopeRow::cells).collect();

    let mut widths = COLUMN_TITLES.map(|title| title.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_line = |values: &[&str]| {
        values
            .iter()
            .zip(widths)
            .map(|(value, width)| {
                let pad = width.saturating_sub(value.chars().count());
                format!("{value}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(render_line(&COLUMN_TITLES[..]));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &cells {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(render_line(values.as_slice()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_render_placeholders() {
        let row = SlopeRow::from_record(&SlopeRecord::default());
        assert_eq!(row.name, "Unknown");
        assert_eq!(row.status, "Unknown");
        assert_eq!(row.conditions, "—");
        assert_eq!(row.snow_depth, "Unknown");
        assert_eq!(row.website_label(), "—");
        assert_eq!(row.level, ConditionLevel::Unknown);
    }

    #[test]
    fn test_row_carries_condition_level() {
        let record = SlopeRecord::new("Nosal")
            .with_conditions("slush in the afternoon")
            .with_url("https://nosal.pl");
        let row = SlopeRow::from_record(&record);
        assert_eq!(row.level, ConditionLevel::Bad);
        assert_eq!(row.website_label(), "https://nosal.pl");
    }

    #[test]
    fn test_status_cell_uses_normalized_projection() {
        let row = SlopeRow::from_record(&SlopeRecord::new("Harenda").with_status(" CLOSED "));
        assert_eq!(row.slope_status, SlopeStatus::Closed);
        assert_eq!(row.status, "closed");

        let row = SlopeRow::from_record(&SlopeRecord::new("Nosal").with_status("unknown"));
        assert_eq!(row.slope_status, SlopeStatus::Unknown);
        assert_eq!(row.status, "Unknown");

        let row = SlopeRow::from_record(&SlopeRecord::new("Polana").with_status("opens Friday"));
        assert_eq!(row.status, "opens Friday");
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let table = format_table(&rows(&[
            SlopeRecord::new("Nosal").with_status("open"),
            SlopeRecord::new("Kasprowy Wierch"),
        ]));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Name            | Status"));
        assert!(lines[2].starts_with("Nosal           | open"));
        assert!(lines[3].contains("[unknown] —"));
    }
}
