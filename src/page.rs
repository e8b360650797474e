//! Named mount points that tables render into.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::render::escape_html;

/// Anything a table can write its markup into.
pub trait RenderTarget {
    /// Replace the content of mount point `id`. Returns `false` when the mount
    /// point does not exist, in which case nothing is written.
    fn mount(&mut self, id: &str, html: String) -> bool;
}

/// A page layout: an ordered set of mount points, each holding the last
/// markup rendered into it.
#[derive(Debug, Default, Clone)]
pub struct Page {
    title: String,
    order: Vec<String>,
    slots: BTreeMap<String, String>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Declare an empty mount point. Declaring an existing id again keeps its
    /// content and position.
    pub fn add_mount(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.slots.contains_key(&id) {
            self.order.push(id.clone());
            self.slots.insert(id, String::new());
        }
    }

    pub fn has_mount(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Markup currently held by a mount point.
    pub fn content(&self, id: &str) -> Option<&str> {
        self.slots.get(id).map(String::as_str)
    }

    /// Wrap every mount point, in declaration order, into a standalone HTML
    /// document.
    pub fn document(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        html.push_str(
            "<style>.pointer{cursor:pointer}.bold{font-weight:bold}\
             .italic{font-style:italic}.blue{color:blue}img{max-width:120px}</style>\n",
        );
        html.push_str("</head>\n<body>\n");
        for id in &self.order {
            let content = self.slots.get(id).map(String::as_str).unwrap_or_default();
            html.push_str(&format!(
                "<section id=\"{}\">\n{}</section>\n",
                escape_html(id),
                content
            ));
        }
        html.push_str("</body>\n</html>\n");
        html
    }

    /// Write [`Page::document`] to `path`, creating parent directories.
    pub fn export(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create export directory")?;
        }
        fs::write(path, self.document())
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

impl RenderTarget for Page {
    fn mount(&mut self, id: &str, html: String) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) => {
                *slot = html;
                true
            }
            None => false,
        }
    }
}

/// Single-threaded shared handle so several tables can render into one page.
#[derive(Debug, Default, Clone)]
pub struct SharedPage(Rc<RefCell<Page>>);

impl SharedPage {
    pub fn new(page: Page) -> Self {
        Self(Rc::new(RefCell::new(page)))
    }

    /// Run `f` with read access to the page.
    pub fn with<R>(&self, f: impl FnOnce(&Page) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn add_mount(&self, id: impl Into<String>) {
        self.0.borrow_mut().add_mount(id);
    }
}

impl RenderTarget for SharedPage {
    fn mount(&mut self, id: &str, html: String) -> bool {
        self.0.borrow_mut().mount(id, html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mounts_are_ignored() {
        let mut page = Page::new("Animals");
        page.add_mount("dogs-table");
        assert!(page.mount("dogs-table", "<p>dogs</p>".into()));
        assert!(!page.mount("cats-table", "<p>cats</p>".into()));
        assert_eq!(page.content("dogs-table"), Some("<p>dogs</p>"));
        assert!(!page.has_mount("cats-table"));
    }

    #[test]
    fn document_keeps_declaration_order() {
        let mut page = Page::new("Animals");
        page.add_mount("b");
        page.add_mount("a");
        page.add_mount("b");
        page.mount("a", "alpha\n".into());
        page.mount("b", "beta\n".into());

        let doc = page.document();
        let beta = doc.find("beta").unwrap();
        let alpha = doc.find("alpha").unwrap();
        assert!(beta < alpha);
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Animals</title>"));
    }

    #[test]
    fn shared_handles_write_to_the_same_page() {
        let shared = SharedPage::new(Page::new("Animals"));
        shared.add_mount("fish");
        let mut other = shared.clone();
        assert!(other.mount("fish", "shark".into()));
        assert_eq!(shared.with(|page| page.content("fish").map(str::to_owned)), Some("shark".to_string()));
    }
}
