//! Terminal rendering of normalized metadata.

use comfy_table::{Attribute, Cell, Table};

use crate::models::NormalizedMetadata;

/// Widest title shown in the listing table
const TITLE_WIDTH: usize = 40;

/// Truncate text to fit within `max_width` display columns, appending an ellipsis.
///
/// ```
/// use comicvine_metadata::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let char_widths: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)))
        .collect();

    let total_width: usize = char_widths.iter().map(|(_, w)| *w).sum();
    if total_width <= max_width {
        return text.to_string();
    }

    let mut current_width = 0;
    let mut end_idx = 0;
    for (i, (_, w)) in char_widths.iter().enumerate() {
        if current_width + w > max_width.saturating_sub(3) {
            break;
        }
        current_width += w;
        end_idx = i + 1;
    }

    if end_idx == 0 {
        return "...".to_string();
    }

    let truncated: String = char_widths[..end_idx].iter().map(|(c, _)| *c).collect();
    format!("{}...", truncated)
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// One row per issue, in walk order
pub fn issues_table(records: &[NormalizedMetadata]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Id", "Series", "Volume", "#", "Title", "Cover Date", "Store Date"]);

    for record in records {
        let title = record
            .title
            .as_deref()
            .map(|t| truncate_with_ellipsis(t, TITLE_WIDTH))
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(&record.source_id),
            Cell::new(&record.series).add_attribute(Attribute::Bold),
            Cell::new(&record.volume),
            Cell::new(&record.issue_number),
            Cell::new(title),
            Cell::new(format_date(record.cover_date)),
            Cell::new(format_date(record.store_date)),
        ]);
    }

    table
}

/// Field/value layout for a single fully detailed issue
pub fn detail_table(record: &NormalizedMetadata) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);

    let credits = record
        .credits
        .iter()
        .map(|c| format!("{} ({})", c.name, c.role))
        .collect::<Vec<_>>()
        .join("\n");

    let rows = [
        ("Source Id", record.source_id.clone()),
        ("Publisher", record.publisher.clone()),
        ("Series", record.series.clone()),
        ("Volume", record.volume.clone()),
        ("Issue", record.issue_number.clone()),
        ("Title", record.title.clone().unwrap_or_default()),
        ("Cover Date", format_date(record.cover_date)),
        ("Store Date", format_date(record.store_date)),
        ("Characters", record.characters.join(", ")),
        ("Teams", record.teams.join(", ")),
        ("Locations", record.locations.join(", ")),
        ("Stories", record.stories.join(", ")),
        ("Credits", credits),
    ];

    for (field, value) in rows {
        table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
    }

    table
}
