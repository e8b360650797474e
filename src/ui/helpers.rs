use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};

use crate::models::{format_number, Field, Record};
use crate::render::NameStyle;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Terminal counterpart of the HTML name-cell styling.
pub(crate) fn name_style(style: NameStyle) -> Style {
    match style {
        NameStyle::Plain => Style::default(),
        NameStyle::Bold => Style::default().add_modifier(Modifier::BOLD),
        NameStyle::BoldItalicBlue => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

/// Header text for a column, with arrows on sortable ones.
pub(crate) fn header_label(field: Field, sortable: bool) -> String {
    if sortable {
        format!("{} ▲▼", field.label())
    } else {
        field.label().to_string()
    }
}

/// Cell text for one field of a record, with the units the HTML view uses.
pub(crate) fn cell_text(record: &Record, field: Field) -> String {
    match field {
        Field::Size => format!("{} ft", format_number(record.size)),
        Field::Weight => format!("{} Kg", format_number(record.weight)),
        other => record.value(other).to_string(),
    }
}
