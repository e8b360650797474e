//! Interaction handles embedded in rendered markup.
//!
//! Every clickable element carries `data-table`, `data-action` and, where
//! needed, `data-field` or `data-index`. A host reads those attributes back
//! into an [`Action`] and hands it to the table it already owns through
//! [`RecordTable::dispatch`](crate::RecordTable::dispatch), so no global
//! lookup of tables by identifier is needed.

use std::fmt;

use crate::error::TableError;
use crate::models::Field;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Sort(Field),
    Add,
    Edit(usize),
    Delete(usize),
    Submit,
    Cancel,
}

impl Action {
    /// Value of the `data-action` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Action::Sort(_) => "sort",
            Action::Add => "add",
            Action::Edit(_) => "edit",
            Action::Delete(_) => "delete",
            Action::Submit => "submit",
            Action::Cancel => "cancel",
        }
    }

    /// Rebuild an action from its `data-action` value and the optional
    /// `data-field` / `data-index` argument.
    pub fn parse(name: &str, argument: Option<&str>) -> Result<Self, TableError> {
        let name = name.trim();
        match name {
            "sort" => {
                let field = argument.ok_or(TableError::MissingArgument("sort"))?;
                Ok(Action::Sort(field.parse()?))
            }
            "edit" => Ok(Action::Edit(parse_index("edit", argument)?)),
            "delete" => Ok(Action::Delete(parse_index("delete", argument)?)),
            "add" => Ok(Action::Add),
            "submit" => Ok(Action::Submit),
            "cancel" => Ok(Action::Cancel),
            other => Err(TableError::UnknownAction(other.to_string())),
        }
    }

    /// `data-*` attributes for an element that triggers this action on
    /// `table_id`. Identifiers are escaped by the caller.
    pub fn attributes(self, table_id: &str) -> String {
        let mut attrs = format!(
            r#"data-table="{table_id}" data-action="{}""#,
            self.name()
        );
        match self {
            Action::Sort(field) => attrs.push_str(&format!(r#" data-field="{}""#, field.key())),
            Action::Edit(index) | Action::Delete(index) => {
                attrs.push_str(&format!(r#" data-index="{index}""#))
            }
            Action::Add | Action::Submit | Action::Cancel => {}
        }
        attrs
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Sort(field) => write!(f, "sort({field})"),
            Action::Edit(index) => write!(f, "edit({index})"),
            Action::Delete(index) => write!(f, "delete({index})"),
            other => f.write_str(other.name()),
        }
    }
}

fn parse_index(action: &'static str, argument: Option<&str>) -> Result<usize, TableError> {
    let raw = argument.ok_or(TableError::MissingArgument(action))?;
    raw.trim()
        .parse::<usize>()
        .map_err(|_| TableError::MissingArgument(action))
}
