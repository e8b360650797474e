//! Editable, sortable animal tables.
//!
//! [`RecordTable`] is the component: it owns a list of [`Record`]s, the
//! shared add/edit form and the edit state, and re-renders its HTML into a
//! [`RenderTarget`] after every change. The `ui` module hosts several tables
//! in a terminal front-end.
pub mod action;
pub mod compare;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod models;
pub mod page;
pub mod render;
pub mod table;
pub mod ui;

pub use action::Action;
pub use error::TableError;
pub use form::RecordForm;
pub use models::{Field, FieldValue, Record};
pub use page::{Page, RenderTarget, SharedPage};
pub use render::NameStyle;
pub use table::{FormMode, RecordTable};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
