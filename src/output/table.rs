//! Table output formatting

use tabled::{
    Table, Tabled,
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format rows as a rounded table with centered headers
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Two-column key/value table for single records
pub fn format_record(fields: &[(&str, String)]) -> String {
    let mut builder = Builder::default();
    for (key, value) in fields {
        builder.push_record([*key, value.as_str()]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct EventRow {
        #[tabled(rename = "DATE")]
        date: String,
        #[tabled(rename = "EVENT")]
        event: String,
    }

    #[test]
    fn test_format_table_empty() {
        let rows: Vec<EventRow> = vec![];
        assert_eq!(format_table(&rows), "No results found.");
    }

    #[test]
    fn test_format_table_rows() {
        let rows = vec![
            EventRow {
                date: "2025-08-23".to_string(),
                event: "New Moon".to_string(),
            },
            EventRow {
                date: "2025-08-31".to_string(),
                event: "First Quarter".to_string(),
            },
        ];

        let result = format_table(&rows);

        assert!(result.contains("DATE"));
        assert!(result.contains("New Moon"));
        assert!(result.contains("First Quarter"));
        // Rounded style corners
        assert!(result.contains("╭"));
        assert!(result.contains("╰"));
    }

    #[test]
    fn test_format_record() {
        let result = format_record(&[
            ("Phase", "Full Moon".to_string()),
            ("Illumination", "100%".to_string()),
        ]);

        assert!(result.contains("Phase"));
        assert!(result.contains("Full Moon"));
        assert_eq!(result.lines().filter(|l| l.contains("Phase")).count(), 1);
    }
}
