//! Errors returned by table operations, with the alert text shown to users.

use thiserror::Error;

use crate::models::Field;

/// Everything a table operation can refuse. Each variant leaves the table
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("{}", .0.required_message())]
    EmptyRequiredField(Field),
    #[error("Animal already exists.")]
    DuplicateIdentity(String),
    /// Combined rejection of the quick-add path, which does not say which of
    /// its two checks failed.
    #[error("Animal already exists or invalid input.")]
    InvalidInput,
    #[error("row {index} does not exist (table has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("action `{0}` needs an argument")]
    MissingArgument(&'static str),
}

impl TableError {
    /// Whether the error is a validation failure the user should see as an
    /// alert, as opposed to a malformed handle coming from the host.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TableError::EmptyRequiredField(_)
                | TableError::DuplicateIdentity(_)
                | TableError::InvalidInput
        )
    }
}
