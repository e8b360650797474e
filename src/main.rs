//! Binary entry point: resolve the data directory, start file logging, build
//! the tables into one page and drive the Ratatui event loop until the user
//! exits.
use animal_tables::config::{default_tables, Paths, PAGE_TITLE};
use animal_tables::{logging, run_app, App, Page, SharedPage};

fn main() -> anyhow::Result<()> {
    let paths = Paths::resolve()?;
    logging::init(&paths.log_file)?;
    tracing::info!(data_dir = %paths.data_dir.display(), "starting");

    let page = SharedPage::new(Page::new(PAGE_TITLE));
    let tables = default_tables()
        .into_iter()
        .map(|config| (config.title, config.build(&page)))
        .collect();

    let mut app = App::new(page, tables, paths.export_file);
    let result = run_app(&mut app);
    tracing::info!("exiting");
    result
}
