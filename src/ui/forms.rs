use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::form::RecordForm;
use crate::models::Field;

/// Width of the widest field label plus its separator, so every input starts
/// in the same column.
pub(crate) const LABEL_WIDTH: usize = 10;

/// Render one input line of the record form.
pub(crate) fn build_field_line(form: &RecordForm, field: Field, focused: bool) -> Line<'static> {
    let value = form.input(field);
    let is_active = focused && form.active() == field;

    let display = if value.is_empty() {
        format!("<{}>", field.placeholder())
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{:<width$}", format!("{}:", field.label()), width = LABEL_WIDTH)),
        Span::styled(display, style),
    ])
}

/// Button row under the inputs; the cancel action only exists while editing.
pub(crate) fn build_button_line(editing: bool) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled("[Enter]", key_style),
        Span::raw(if editing { " Update Animal" } else { " Add Animal" }),
    ];
    if editing {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("[Esc]", key_style));
        spans.push(Span::raw(" Cancel"));
    } else {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("[Ctrl+A]", key_style));
        spans.push(Span::raw(" Quick Add"));
    }
    Line::from(spans)
}

/// Cursor offset inside the form block for the focused input.
pub(crate) fn cursor_offset(form: &RecordForm) -> (u16, u16) {
    let row = Field::ALL
        .iter()
        .position(|field| *field == form.active())
        .unwrap_or(0);
    (
        (LABEL_WIDTH + form.value_len(form.active())) as u16,
        row as u16,
    )
}

/// A blocking message the user has to dismiss before anything else happens.
pub(crate) struct Alert {
    pub(crate) message: String,
}

impl Alert {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
