//! Text rendering of inspections for terminal output.

use std::fmt::Write;

use crate::inspection::Inspection;

/// Shown when there is nothing to list.
pub const EMPTY_LIST: &str = "No Inspections";

/// Width of the shortened id shown in tables.
const SHORT_ID_LEN: usize = 8;

/// Render one inspection as a block of lines.
///
/// The description line is omitted when the description is blank.
#[must_use]
pub fn render_inspection(inspection: &Inspection) -> String {
    let title = if inspection.title.is_empty() {
        "(untitled)"
    } else {
        inspection.title.as_str()
    };

    let mut out = String::new();
    let _ = writeln!(out, "[{}] {title}", inspection.icon());
    let _ = writeln!(out, "  Id:       {}", inspection.id);
    let _ = writeln!(out, "  Location: {}", inspection.coordinate());
    let _ = writeln!(out, "  Color:    {}", inspection.marker_color);
    let _ = writeln!(out, "  Image:    {}", inspection.image_uri);
    if inspection.has_description() {
        let _ = writeln!(out, "  Notes:    {}", inspection.description.trim());
    }
    let _ = write!(out, "  Recorded: {}", inspection.display_timestamp());
    out
}

/// Render a list of inspections as blocks separated by blank lines.
#[must_use]
pub fn render_plain(inspections: &[Inspection]) -> String {
    if inspections.is_empty() {
        return EMPTY_LIST.to_string();
    }

    inspections
        .iter()
        .map(render_inspection)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a list of inspections as an aligned table.
#[must_use]
pub fn render_table(inspections: &[Inspection]) -> String {
    if inspections.is_empty() {
        return EMPTY_LIST.to_string();
    }

    let rows: Vec<[String; 5]> = inspections
        .iter()
        .map(|i| {
            [
                i.id.chars().take(SHORT_ID_LEN).collect(),
                i.display_timestamp(),
                i.icon().to_string(),
                i.coordinate().to_string(),
                i.title.clone(),
            ]
        })
        .collect();

    let headers = ["ID", "RECORDED", "ICON", "LOCATION", "TITLE"];
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[&str]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(&headers)];
    lines.extend(rows.iter().map(|row| {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        format_row(&cells)
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, title: &str, description: &str) -> Inspection {
        Inspection {
            id: id.to_string(),
            latitude: 52.52,
            longitude: 13.405,
            image_uri: "/data/images/photo.jpg".to_string(),
            marker_color: "#1976D2".to_string(),
            marker_icon: "water".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            timestamp: "not a timestamp".to_string(),
        }
    }

    #[test]
    fn test_empty_list_message() {
        assert_eq!(render_plain(&[]), "No Inspections");
        assert_eq!(render_table(&[]), "No Inspections");
    }

    #[test]
    fn test_render_inspection_fields() {
        let text = render_inspection(&sample("abc", "Leak", "Under the bridge"));
        assert!(text.starts_with("[water] Leak"));
        assert!(text.contains("52.520000, 13.405000"));
        assert!(text.contains("Notes:    Under the bridge"));
        assert!(text.contains("Recorded: not a timestamp"));
    }

    #[test]
    fn test_blank_description_omitted() {
        let text = render_inspection(&sample("abc", "Leak", "   "));
        assert!(!text.contains("Notes:"));
    }

    #[test]
    fn test_unknown_icon_falls_back() {
        let mut inspection = sample("abc", "Leak", "");
        inspection.marker_icon = "spaceship".to_string();
        assert!(render_inspection(&inspection).starts_with("[default] Leak"));
    }

    #[test]
    fn test_untitled() {
        assert!(render_inspection(&sample("abc", "", "")).starts_with("[water] (untitled)"));
    }

    #[test]
    fn test_plain_keeps_order() {
        let text = render_plain(&[sample("1", "First", ""), sample("2", "Second", "")]);
        let first = text.find("First").unwrap();
        let second = text.find("Second").unwrap();
        assert!(first < second);
        assert!(text.contains("\n\n"));
    }

    #[test]
    fn test_table_shortens_ids() {
        let text = render_table(&[sample("0123456789abcdef", "Leak", "")]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("01234567 "));
        assert!(!lines[1].contains("89abcdef"));
        assert!(lines[1].ends_with("Leak"));
    }
}
