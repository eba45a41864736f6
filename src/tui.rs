//! TUI utilities shared by the terminal browser.
//!
//! This module turns records, filters, page windows and errors into styled
//! [`Line`]s, so the binary only has to lay them out. It is only available
//! when the `tui` feature is enabled.
//!
//! # Examples
//!
//! ```rust
//! use titanwiki::tui::format_page_controls;
//! use titanwiki::pagination::page_window;
//!
//! let line = format_page_controls(&page_window(5, 10), 5);
//! let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
//! assert_eq!(text, "1 … 4 [5] 6 … 9 10");
//! ```

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::{
    browser::{FilterField, FilterInputs},
    image::{ImageSource, ImageStatus, initial_badge},
    pagination::PageControl,
    types::{Character, Resource},
};

fn status_color(status: Option<&str>) -> Color {
    match status.map(str::to_ascii_lowercase).as_deref() {
        Some("alive") => Color::Green,
        Some("deceased") => Color::Red,
        _ => Color::DarkGray,
    }
}

fn row_marker(selected: bool) -> Span<'static> {
    if selected {
        Span::styled("▶ ", Style::default().fg(Color::Cyan))
    } else {
        Span::raw("  ")
    }
}

/// Formats a character for the characters list.
///
/// # Examples
///
/// ```rust
/// use titanwiki::tui::format_character_row;
/// use titanwiki::types::Character;
///
/// let levi: Character = serde_json::from_str(
///     r#"{"id": 188, "name": "Levi Ackerman", "status": "Alive", "occupation": "Captain"}"#,
/// ).unwrap();
///
/// let line = format_character_row(&levi, true);
/// ```
pub fn format_character_row(character: &Character, selected: bool) -> Line<'static> {
    let mut spans = vec![
        row_marker(selected),
        Span::styled(
            character.name.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(status) = &character.status {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("({})", status),
            Style::default().fg(status_color(Some(status.as_str()))),
        ));
    }

    if let Some(occupation) = &character.occupation {
        spans.push(Span::raw(" - "));
        spans.push(Span::styled(
            occupation.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    Line::from(spans)
}

/// Widest summary shown next to a record's name.
pub const SUMMARY_WIDTH: usize = 60;

/// Formats any record for a plain list: name, then its summary.
pub fn format_record_row<T: Resource>(record: &T, selected: bool) -> Line<'static> {
    let mut spans = vec![
        row_marker(selected),
        Span::styled(
            record.name().to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    let summary = record.summary();
    if !summary.is_empty() {
        spans.push(Span::raw(" - "));
        spans.push(Span::styled(
            truncate_text(&summary, SUMMARY_WIDTH),
            Style::default().fg(Color::Gray),
        ));
    }

    Line::from(spans)
}

/// Formats pagination controls, highlighting the current page.
pub fn format_page_controls(controls: &[PageControl], current: u32) -> Line<'static> {
    let mut spans = Vec::with_capacity(controls.len() * 2);

    for (i, control) in controls.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(match control {
            PageControl::Page(n) if *n == current => Span::styled(
                format!("[{}]", n),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            PageControl::Page(n) => Span::styled(n.to_string(), Style::default().fg(Color::White)),
            PageControl::Ellipsis => Span::styled("…", Style::default().fg(Color::DarkGray)),
        });
    }

    Line::from(spans)
}

/// Formats the filter bar.
///
/// `focused` is highlighted; when `editing` is set it replaces the focused
/// field's value and shows a cursor.
pub fn format_filter_bar(
    inputs: &FilterInputs,
    focused: Option<FilterField>,
    editing: Option<&str>,
) -> Line<'static> {
    let mut spans = Vec::new();

    for (i, field) in FilterField::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }

        let is_focused = focused == Some(*field);
        let label_style = if is_focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("{}: ", field.label()), label_style));

        let value = match (is_focused, editing) {
            (true, Some(buffer)) => {
                spans.push(Span::styled(
                    format!("{}_", buffer),
                    Style::default().fg(Color::Yellow),
                ));
                continue;
            }
            _ => inputs.get(*field).trim(),
        };

        if value.is_empty() {
            spans.push(Span::styled("any", Style::default().fg(Color::DarkGray)));
        } else {
            spans.push(Span::styled(
                value.to_string(),
                Style::default().fg(Color::White),
            ));
        }
    }

    Line::from(spans)
}

/// Lines of the error panel: the message, a hint when retrying may help,
/// then the retry action and, for filterable lists, clear filters.
///
/// # Examples
///
/// ```rust
/// use titanwiki::tui::error_panel_lines;
///
/// let lines = error_panel_lines("Failed to load titans: HTTP error! status: 404", false, false);
/// assert_eq!(lines.len(), 3);
/// ```
pub fn error_panel_lines(message: &str, transient: bool, offer_clear: bool) -> Vec<Line<'static>> {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![error_message(message)];
    if transient {
        lines.push(Line::from(Span::styled(
            "The wiki may be busy or unreachable; retrying may help.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));

    let mut actions = vec![Span::styled("[r]", key), Span::raw(" Retry")];
    if offer_clear {
        actions.push(Span::raw("    "));
        actions.push(Span::styled("[c]", key));
        actions.push(Span::raw(" Clear filters"));
    }
    lines.push(Line::from(actions));
    lines
}

/// Lines of a details modal: the image (or its initial badge) followed by
/// every present field.
pub fn details_lines<T: Resource>(
    record: &T,
    source: &ImageSource,
    status: ImageStatus,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            record.name().to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let image_line = match source.remote_url() {
        Some(url) if !status.shows_badge(source) => {
            let mut spans = vec![
                Span::styled("Image: ", Style::default().fg(Color::Gray)),
                Span::styled(url.to_string(), Style::default().fg(Color::Blue)),
            ];
            if status == ImageStatus::Unknown {
                spans.push(Span::styled(
                    " (checking…)",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
        _ => Line::from(Span::styled(
            format!(" {} ", initial_badge(record.name())),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    };
    lines.push(image_line);
    lines.push(Line::from(""));

    let details = record.details();
    if details.is_empty() {
        lines.push(Line::from(Span::styled(
            "No further details",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (label, value) in details {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", label),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(value, Style::default().fg(Color::White)),
        ]));
    }

    lines
}

/// Creates a styled status message for TUI display.
///
/// # Examples
///
/// ```rust
/// use titanwiki::tui::create_status_message;
/// use ratatui::style::Color;
///
/// let message = create_status_message("Loaded", "20 characters", Color::Green);
/// ```
pub fn create_status_message(prefix: &str, message: &str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{}:", prefix),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(message.to_string(), Style::default().fg(color)),
    ])
}

/// Creates a success message for TUI display.
pub fn success_message(message: &str) -> Line<'static> {
    create_status_message("Success", message, Color::Green)
}

/// Creates a warning message for TUI display.
pub fn warning_message(message: &str) -> Line<'static> {
    create_status_message("Warning", message, Color::Yellow)
}

/// Creates an error message for TUI display.
pub fn error_message(message: &str) -> Line<'static> {
    create_status_message("Error", message, Color::Red)
}

/// Creates an info message for TUI display.
pub fn info_message(message: &str) -> Line<'static> {
    create_status_message("Info", message, Color::Blue)
}

/// Truncates text to fit within `width` characters.
///
/// # Examples
///
/// ```rust
/// use titanwiki::tui::truncate_text;
///
/// assert_eq!(truncate_text("Bertolt Hoover", 10), "Bertolt...");
/// ```
pub fn truncate_text(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else if width > 3 {
        let kept: String = text.chars().take(width - 3).collect();
        format!("{}...", kept)
    } else {
        text.chars().take(width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::page_window;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn character(json: &str) -> Character {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_page_controls_text() {
        assert_eq!(text(&format_page_controls(&page_window(1, 10), 1)), "[1] 2 … 9 10");
        assert_eq!(text(&format_page_controls(&page_window(2, 3), 2)), "1 [2] 3");
        assert!(format_page_controls(&[], 1).spans.is_empty());
    }

    #[test]
    fn test_character_row() {
        let mikasa = character(r#"{"id": 2, "name": "Mikasa Ackerman", "status": "Alive", "occupation": "Soldier"}"#);
        assert_eq!(
            text(&format_character_row(&mikasa, false)),
            "  Mikasa Ackerman (Alive) - Soldier"
        );

        let bare = character(r#"{"id": 3, "name": "Ymir"}"#);
        assert_eq!(text(&format_character_row(&bare, true)), "▶ Ymir");
    }

    #[test]
    fn test_filter_bar_shows_any_for_blank_fields() {
        let inputs = FilterInputs {
            status: "Deceased".into(),
            ..FilterInputs::default()
        };
        assert_eq!(
            text(&format_filter_bar(&inputs, None, None)),
            "Name: any │ Status: Deceased │ Gender: any │ Occupation: any"
        );
        assert!(text(&format_filter_bar(&inputs, Some(FilterField::Name), Some("Hist"))).starts_with("Name: Hist_"));
    }

    #[test]
    fn test_error_panel_offers_retry_and_clear() {
        let lines = error_panel_lines("Failed to load characters: HTTP error! status: 503", true, true);
        let all: Vec<String> = lines.iter().map(text).collect();

        assert!(all[0].contains("503"));
        assert!(all.iter().any(|l| l.contains("retrying may help")));
        assert!(all.iter().any(|l| l.contains("Retry")));
        assert!(all.iter().any(|l| l.contains("Clear filters")));
    }

    #[test]
    fn test_error_panel_without_filters_or_hint() {
        let lines = error_panel_lines("Failed to load titans: HTTP error! status: 404", false, false);
        let all: Vec<String> = lines.iter().map(text).collect();

        assert!(all.iter().any(|l| l.contains("Retry")));
        assert!(!all.iter().any(|l| l.contains("Clear filters")));
        assert!(!all.iter().any(|l| l.contains("retrying may help")));
    }

    #[test]
    fn test_details_badge_and_image() {
        let annie = character(r#"{"id": 9, "name": "Annie Leonhart", "gender": "Female", "img": "https://host/annie.png"}"#);
        let remote = ImageSource::Remote("https://host/annie.png".into());

        let loaded: Vec<String> = details_lines(&annie, &remote, ImageStatus::Loaded)
            .iter()
            .map(text)
            .collect();
        assert!(loaded.contains(&"Image: https://host/annie.png".to_string()));
        assert!(loaded.contains(&"Gender: Female".to_string()));

        let failed: Vec<String> = details_lines(&annie, &remote, ImageStatus::Failed)
            .iter()
            .map(text)
            .collect();
        assert!(failed.contains(&" A ".to_string()));
        assert!(!failed.iter().any(|l| l.starts_with("Image:")));
    }

    #[test]
    fn test_record_row_truncates_summary() {
        let titan: crate::types::Titan = serde_json::from_str(
            r#"{"id": 1, "name": "Founding Titan", "height": "Variable", "allegiance": "Eldia, Subjects of Ymir, Fritz and Reiss royal families"}"#,
        )
        .unwrap();

        let row = text(&format_record_row(&titan, false));
        assert!(row.starts_with("  Founding Titan - "));
        assert!(row.chars().count() <= "  Founding Titan - ".chars().count() + SUMMARY_WIDTH);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Hello World", 5), "He...");
        assert_eq!(truncate_text("Hi", 10), "Hi");
        assert_eq!(truncate_text("Test", 3), "Tes");
        assert_eq!(truncate_text("Hange Zoë", 8), "Hange...");
    }
}
