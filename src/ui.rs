//! Ratatui front-end hosting the record tables. The shell owns every table
//! directly and routes key presses to the table on screen, so rendered
//! handles never need a global lookup.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
