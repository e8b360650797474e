//! HTML rendering of one table and its form.
//!
//! Rendering is a pure function of a [`TableView`]: the whole subtree is
//! rebuilt every time, nothing is diffed against the previous markup.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::action::Action;
use crate::form::RecordForm;
use crate::models::{format_number, Field, Record};

/// Up/down arrows appended to sortable headers.
const SORT_INDICATOR: &str = "&#x25B2;&#x25BC;";

/// Cosmetic treatment of the name column. Purely visual; it never changes
/// how a table behaves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum NameStyle {
    #[default]
    Plain,
    Bold,
    BoldItalicBlue,
}

impl NameStyle {
    fn class(self) -> Option<&'static str> {
        match self {
            NameStyle::Plain => None,
            NameStyle::Bold => Some("bold"),
            NameStyle::BoldItalicBlue => Some("bold italic blue"),
        }
    }

    fn inline_style(self) -> Option<&'static str> {
        match self {
            NameStyle::BoldItalicBlue => Some("color: blue;"),
            _ => None,
        }
    }
}

/// Borrowed snapshot of everything the markup depends on.
pub struct TableView<'a> {
    pub table_id: &'a str,
    pub records: &'a [Record],
    pub sortable: &'a BTreeSet<Field>,
    pub editing: Option<usize>,
    pub form: &'a RecordForm,
    pub name_style: NameStyle,
}

/// Produce the full markup for a table: the scrollable table followed by the
/// add/edit form.
pub fn render_table(view: &TableView<'_>) -> String {
    let mut html = String::with_capacity(1024 + view.records.len() * 512);
    let id = escape_html(view.table_id);

    html.push_str("<div class=\"overflow-auto\">\n<table class=\"table table-bordered\">\n");
    render_header(&mut html, view, &id);
    render_body(&mut html, view, &id);
    html.push_str("</table>\n</div>\n");
    render_form(&mut html, view, &id);
    html
}

fn render_header(html: &mut String, view: &TableView<'_>, id: &str) {
    html.push_str("<thead>\n<tr>\n");
    for field in Field::ALL {
        if view.sortable.contains(&field) {
            let _ = writeln!(
                html,
                "<th class=\"pointer\" {}>{} {SORT_INDICATOR}</th>",
                Action::Sort(field).attributes(id),
                field.label()
            );
        } else {
            let _ = writeln!(html, "<th>{}</th>", field.label());
        }
    }
    html.push_str("<th>Actions</th>\n</tr>\n</thead>\n");
}

fn render_body(html: &mut String, view: &TableView<'_>, id: &str) {
    html.push_str("<tbody>\n");
    for (index, record) in view.records.iter().enumerate() {
        let name = escape_html(&record.name);
        html.push_str("<tr>\n<td");
        if let Some(style) = view.name_style.inline_style() {
            let _ = write!(html, " style=\"{style}\"");
        }
        if let Some(class) = view.name_style.class() {
            let _ = write!(html, " class=\"{class}\"");
        }
        let _ = writeln!(html, ">{name}</td>");
        let _ = writeln!(
            html,
            "<td><img src=\"{}\" alt=\"{name}\"></td>",
            escape_html(&record.image)
        );
        let _ = writeln!(html, "<td>{}</td>", escape_html(&record.location));
        let _ = writeln!(html, "<td>{} ft</td>", format_number(record.size));
        let _ = writeln!(html, "<td>{} Kg</td>", format_number(record.weight));
        let _ = writeln!(
            html,
            "<td>\n<button class=\"btn btn-warning btn-sm\" {}>Edit</button>\n\
             <button class=\"btn btn-danger btn-sm\" {}>Delete</button>\n</td>",
            Action::Edit(index).attributes(id),
            Action::Delete(index).attributes(id)
        );
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n");
}

fn render_form(html: &mut String, view: &TableView<'_>, id: &str) {
    let editing = view.editing.is_some();
    html.push_str("<div class=\"mt-3\">\n");
    let _ = writeln!(
        html,
        "<h5>{}</h5>",
        if editing { "Edit Animal" } else { "Add New Animal" }
    );
    for field in Field::ALL {
        let kind = if field.is_numeric() { "number" } else { "text" };
        let _ = writeln!(
            html,
            "<input id=\"{id}-{}\" type=\"{kind}\" placeholder=\"{}\" value=\"{}\" class=\"form-control mb-2\">",
            field.key(),
            field.placeholder(),
            escape_html(view.form.input(field))
        );
    }
    let _ = writeln!(
        html,
        "<button class=\"btn btn-primary\" {}>{}</button>",
        Action::Submit.attributes(id),
        if editing { "Update Animal" } else { "Add Animal" }
    );
    if editing {
        let _ = writeln!(
            html,
            "<button class=\"btn btn-secondary\" {}>Cancel</button>",
            Action::Cancel.attributes(id)
        );
    }
    html.push_str("</div>\n");
}

/// Escape the characters that are significant inside element text and
/// double-quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
