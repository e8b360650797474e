//! Static configuration: where files go and which tables the page shows.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

use crate::models::{Field, Record};
use crate::page::{RenderTarget, SharedPage};
use crate::render::NameStyle;
use crate::table::RecordTable;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".animal-tables";
/// Log file written by the tracing subscriber.
const LOG_FILE_NAME: &str = "animal-tables.log";
/// Standalone HTML document produced by the export command.
const EXPORT_FILE_NAME: &str = "animal-tables.html";
/// Title of the exported page.
pub const PAGE_TITLE: &str = "Animal Tables";

/// Resolved file locations.
#[derive(Debug, Clone)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub export_file: PathBuf,
}

impl Paths {
    /// Resolve everything below the user's home and make sure the data
    /// directory exists.
    pub fn resolve() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        let paths = Self::under(base_dirs.home_dir().join(DATA_DIR_NAME));
        fs::create_dir_all(&paths.data_dir).context("failed to create data directory")?;
        Ok(paths)
    }

    /// Lay the files out below an explicit directory without touching disk.
    pub fn under(data_dir: PathBuf) -> Self {
        Self {
            log_file: data_dir.join(LOG_FILE_NAME),
            export_file: data_dir.join(EXPORT_FILE_NAME),
            data_dir,
        }
    }
}

/// Everything needed to build one table.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Mount-point name, also shown in handles.
    pub id: &'static str,
    pub title: &'static str,
    pub sortable: Vec<Field>,
    pub name_style: NameStyle,
    pub records: Vec<Record>,
}

impl TableConfig {
    /// Declare the mount point on `page` and build the table rendering into
    /// it.
    pub fn build(self, page: &SharedPage) -> RecordTable {
        page.add_mount(self.id);
        self.build_into(page.clone())
    }

    /// Build the table against any render target.
    pub fn build_into(self, target: impl RenderTarget + 'static) -> RecordTable {
        RecordTable::new(self.records, self.id, self.sortable, target)
            .with_name_style(self.name_style)
    }
}

/// The three tables shown by the application.
pub fn default_tables() -> Vec<TableConfig> {
    vec![
        TableConfig {
            id: "big-cats-table",
            title: "Big Cats",
            sortable: vec![Field::Name, Field::Location, Field::Size, Field::Weight],
            name_style: NameStyle::Plain,
            records: vec![
                Record::new("Tiger", image_url("tiger"), "Asia", 10.0, 190.0),
                Record::new("Lion", image_url("lion"), "Africa", 8.0, 220.0),
                Record::new("Leopard", image_url("leopard"), "Africa and Asia", 5.0, 120.0),
                Record::new("Cheetah", image_url("cheetah"), "Africa", 5.0, 170.0),
                Record::new("Caracal", image_url("caracal"), "Africa", 3.0, 160.0),
                Record::new("Jaguar", image_url("jaguar"), "Amazon", 5.0, 200.0),
            ],
        },
        TableConfig {
            id: "dogs-table",
            title: "Dogs",
            sortable: vec![Field::Name, Field::Location],
            name_style: NameStyle::Bold,
            records: vec![
                Record::new("Rotwailer", image_url("rottweiler"), "Germany", 2.0, 50.0),
                Record::new("German Shepherd", image_url("german-shepherd"), "Germany", 2.3, 40.0),
                Record::new("Labrodar", image_url("labrador"), "UK", 3.0, 35.0),
                Record::new("Alabai", image_url("alabai"), "Turkey", 4.0, 60.0),
            ],
        },
        TableConfig {
            id: "big-fish-table",
            title: "Big Fish",
            sortable: vec![Field::Size],
            name_style: NameStyle::BoldItalicBlue,
            records: vec![
                Record::new("Humpback Whale", image_url("humpback-whale"), "Atlantic Ocean", 15.0, 80.0),
                Record::new("Killer Whale", image_url("killer-whale"), "Atlantic Ocean", 12.0, 60.0),
                Record::new("Tiger Shark", image_url("tiger-shark"), "Ocean", 8.0, 70.0),
                Record::new("Hammerhead Shark", image_url("hammerhead-shark"), "Ocean", 8.0, 100.0),
            ],
        },
    ]
}

fn image_url(slug: &str) -> String {
    format!("https://commons.wikimedia.org/wiki/Special:Search?search={slug}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn seed_names_are_unique_per_table() {
        for table in default_tables() {
            let names: HashSet<_> = table.records.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names.len(), table.records.len(), "{}", table.id);
        }
    }

    #[test]
    fn sortable_fields_never_include_image() {
        for table in default_tables() {
            assert!(!table.sortable.contains(&Field::Image), "{}", table.id);
        }
    }

    #[test]
    fn paths_hang_off_the_data_dir() {
        let paths = Paths::under(PathBuf::from("/tmp/animals"));
        assert_eq!(paths.log_file, PathBuf::from("/tmp/animals/animal-tables.log"));
        assert_eq!(paths.export_file, PathBuf::from("/tmp/animals/animal-tables.html"));
    }
}
