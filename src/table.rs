//! The editable, sortable record table.
//!
//! A [`RecordTable`] owns its records, the shared add/edit form and the index
//! of the record being edited. Every operation that changes any of those
//! re-renders the complete markup into the table's mount point.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::action::Action;
use crate::compare::compare_values;
use crate::error::TableError;
use crate::form::{first_missing_field, RecordForm};
use crate::models::{Field, Record};
use crate::page::RenderTarget;
use crate::render::{render_table, NameStyle, TableView};

/// Which flow the shared form is in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormMode {
    Adding,
    Editing(usize),
}

pub struct RecordTable {
    records: Vec<Record>,
    table_id: String,
    sortable: BTreeSet<Field>,
    editing_index: Option<usize>,
    form: RecordForm,
    name_style: NameStyle,
    target: Box<dyn RenderTarget>,
}

impl RecordTable {
    /// Build a table and render it once. Records are taken as given, without
    /// any validation.
    pub fn new(
        records: Vec<Record>,
        table_id: impl Into<String>,
        sortable_fields: impl IntoIterator<Item = Field>,
        target: impl RenderTarget + 'static,
    ) -> Self {
        let mut table = Self {
            records,
            table_id: table_id.into(),
            sortable: sortable_fields.into_iter().collect(),
            editing_index: None,
            form: RecordForm::default(),
            name_style: NameStyle::default(),
            target: Box::new(target),
        };
        table.render();
        table
    }

    /// Switch the cosmetic style of the name column and re-render.
    pub fn with_name_style(mut self, style: NameStyle) -> Self {
        self.name_style = style;
        self.render();
        self
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn sortable_fields(&self) -> &BTreeSet<Field> {
        &self.sortable
    }

    pub fn is_sortable(&self, field: Field) -> bool {
        self.sortable.contains(&field)
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.editing_index
    }

    pub fn mode(&self) -> FormMode {
        match self.editing_index {
            Some(index) => FormMode::Editing(index),
            None => FormMode::Adding,
        }
    }

    pub fn name_style(&self) -> NameStyle {
        self.name_style
    }

    pub fn form(&self) -> &RecordForm {
        &self.form
    }

    /// Mutable access to the form inputs. Typing is not a table mutation, so
    /// nothing is re-rendered.
    pub fn form_mut(&mut self) -> &mut RecordForm {
        &mut self.form
    }

    /// Route a handle read back from rendered markup to the matching
    /// operation.
    pub fn dispatch(&mut self, action: Action) -> Result<(), TableError> {
        debug!(table = %self.table_id, %action, "dispatching action");
        match action {
            Action::Sort(field) => {
                self.sort_table(field);
                Ok(())
            }
            Action::Add => self.add_record(),
            Action::Edit(index) => self.edit_record(index),
            Action::Delete(index) => self.delete_record(index),
            Action::Submit => self.submit_form(),
            Action::Cancel => {
                self.cancel_edit();
                Ok(())
            }
        }
    }

    /// Stable ascending sort by `field`. Fields outside the sortable set are
    /// ignored without complaint. There is no descending mode.
    pub fn sort_table(&mut self, field: Field) {
        if !self.is_sortable(field) {
            debug!(table = %self.table_id, %field, "ignoring sort on unsortable field");
            return;
        }
        self.records
            .sort_by(|a, b| compare_values(a.value(field), b.value(field)));
        debug!(table = %self.table_id, %field, "sorted");
        self.render();
    }

    /// Quick-add path: append the form's candidate when its name is present
    /// and unused. No other field is checked here.
    pub fn add_record(&mut self) -> Result<(), TableError> {
        let candidate = self.form.candidate();
        if candidate.name.is_empty() || self.contains_name(&candidate.name) {
            warn!(table = %self.table_id, name = %candidate.name, "rejected quick add");
            return Err(TableError::InvalidInput);
        }
        info!(table = %self.table_id, name = %candidate.name, "added record");
        self.records.push(candidate);
        self.form.clear();
        self.render();
        Ok(())
    }

    /// Load `records[index]` into the form and switch it to update mode.
    pub fn edit_record(&mut self, index: usize) -> Result<(), TableError> {
        self.check_index(index)?;
        self.editing_index = Some(index);
        debug!(table = %self.table_id, index, "editing record");
        self.render();
        Ok(())
    }

    /// Remove `records[index]`. Any edit in progress is abandoned, whichever
    /// row it was on.
    pub fn delete_record(&mut self, index: usize) -> Result<(), TableError> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        if self.editing_index.take().is_some() {
            self.form.clear();
        }
        info!(table = %self.table_id, name = %removed.name, index, "deleted record");
        self.render();
        Ok(())
    }

    /// Validate the form and either overwrite the record being edited or
    /// append a new one.
    ///
    /// Updates do not re-check the name against the other records; only
    /// appends reject duplicates.
    pub fn submit_form(&mut self) -> Result<(), TableError> {
        let candidate = self.form.candidate();
        if let Some(field) = first_missing_field(&candidate) {
            warn!(table = %self.table_id, %field, "rejected submit with missing field");
            return Err(TableError::EmptyRequiredField(field));
        }

        match self.editing_index {
            Some(index) => {
                info!(table = %self.table_id, index, name = %candidate.name, "updated record");
                if let Some(slot) = self.records.get_mut(index) {
                    *slot = candidate;
                }
                self.editing_index = None;
            }
            None => {
                if self.contains_name(&candidate.name) {
                    warn!(table = %self.table_id, name = %candidate.name, "rejected duplicate");
                    return Err(TableError::DuplicateIdentity(candidate.name));
                }
                info!(table = %self.table_id, name = %candidate.name, "added record");
                self.records.push(candidate);
            }
        }

        self.form.clear();
        self.render();
        Ok(())
    }

    /// Leave update mode without touching the records.
    pub fn cancel_edit(&mut self) {
        self.editing_index = None;
        self.form.clear();
        debug!(table = %self.table_id, "edit cancelled");
        self.render();
    }

    /// Markup for the current state. When editing, the form shows the values
    /// of the edited record.
    pub fn render_html(&self) -> String {
        render_table(&TableView {
            table_id: &self.table_id,
            records: &self.records,
            sortable: &self.sortable,
            editing: self.editing_index,
            form: &self.form,
            name_style: self.name_style,
        })
    }

    fn render(&mut self) {
        if let Some(record) = self.editing_index.and_then(|index| self.records.get(index)) {
            self.form.fill(record);
        }
        let html = self.render_html();
        if !self.target.mount(&self.table_id, html) {
            debug!(table = %self.table_id, "mount point missing, render skipped");
        }
    }

    fn contains_name(&self, name: &str) -> bool {
        self.records.iter().any(|record| record.name == name)
    }

    fn check_index(&self, index: usize) -> Result<(), TableError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(TableError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::page::{Page, SharedPage};

    fn cats() -> Vec<Record> {
        vec![
            Record::new("Tiger", "tiger.png", "Asia", 10.0, 190.0),
            Record::new("Lion", "lion.png", "Africa", 8.0, 220.0),
        ]
    }

    fn table_with(records: Vec<Record>, sortable: &[Field]) -> (RecordTable, SharedPage) {
        let page = SharedPage::new(Page::new("test"));
        page.add_mount("cats");
        let table = RecordTable::new(records, "cats", sortable.iter().copied(), page.clone());
        (table, page)
    }

    fn fill_form(table: &mut RecordTable, record: &Record) {
        table.form_mut().fill(record);
    }

    #[test]
    fn construction_renders_immediately() {
        let (_table, page) = table_with(cats(), &[Field::Name]);
        let html = page.with(|p| p.content("cats").unwrap_or_default().to_string());
        assert!(html.contains(">Tiger</td>"));
        assert!(html.contains("Add New Animal"));
    }

    #[test]
    fn sorting_by_size_orders_lion_first() {
        let (mut table, _) = table_with(cats(), &[Field::Size]);
        table.sort_table(Field::Size);
        let names: Vec<_> = table.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Lion", "Tiger"]);
    }

    #[test]
    fn unsortable_field_is_ignored() {
        let (mut table, _) = table_with(cats(), &[Field::Size]);
        table.sort_table(Field::Name);
        assert_eq!(table.records(), cats().as_slice());
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let records = vec![
            Record::new("Leopard", "l.png", "Africa and Asia", 5.0, 120.0),
            Record::new("Cheetah", "c.png", "Africa", 5.0, 170.0),
            Record::new("Caracal", "k.png", "Africa", 3.0, 160.0),
            Record::new("Jaguar", "j.png", "Amazon", 5.0, 200.0),
        ];
        let (mut table, _) = table_with(records, &[Field::Size]);
        table.sort_table(Field::Size);
        let names: Vec<_> = table.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Caracal", "Leopard", "Cheetah", "Jaguar"]);
    }

    #[test]
    fn quick_add_rejects_blank_and_duplicate_names() {
        let (mut table, _) = table_with(cats(), &[]);
        assert_eq!(table.add_record(), Err(TableError::InvalidInput));

        table.form_mut().set_input(Field::Name, "Tiger");
        assert_eq!(table.add_record(), Err(TableError::InvalidInput));
        assert_eq!(table.records().len(), 2);

        table.form_mut().set_input(Field::Name, "Puma");
        table.add_record().unwrap();
        assert_eq!(table.records().len(), 3);
        assert_eq!(table.records()[2].name, "Puma");
        assert!(table.form().is_blank());
    }

    #[test]
    fn submit_reports_first_missing_field() {
        let (mut table, _) = table_with(cats(), &[]);
        table.form_mut().set_input(Field::Name, "Puma");
        table.form_mut().set_input(Field::Location, "Andes");
        assert_eq!(
            table.submit_form(),
            Err(TableError::EmptyRequiredField(Field::Image))
        );
        assert_eq!(table.records().len(), 2);
        assert_eq!(table.form().input(Field::Name), "Puma");
    }

    #[test]
    fn add_mode_submit_rejects_duplicates() {
        let (mut table, _) = table_with(cats(), &[]);
        fill_form(&mut table, &Record::new("Tiger", "t2.png", "India", 9.0, 180.0));
        assert_eq!(
            table.submit_form(),
            Err(TableError::DuplicateIdentity("Tiger".to_string()))
        );
        assert_eq!(table.records().len(), 2);
    }

    #[test]
    fn edit_then_submit_updates_in_place() {
        let (mut table, page) = table_with(cats(), &[]);
        table.edit_record(0).unwrap();
        assert_eq!(table.mode(), FormMode::Editing(0));
        assert_eq!(table.form().input(Field::Location), "Asia");

        table.form_mut().set_input(Field::Location, "India");
        table.submit_form().unwrap();

        assert_eq!(table.records()[0].location, "India");
        assert_eq!(table.editing_index(), None);
        assert_eq!(table.records().len(), 2);
        let html = page.with(|p| p.content("cats").unwrap_or_default().to_string());
        assert!(html.contains("<td>India</td>"));
        assert!(html.contains("Add New Animal"));
    }

    #[test]
    fn update_does_not_recheck_names() {
        let (mut table, _) = table_with(cats(), &[]);
        table.edit_record(0).unwrap();
        table.form_mut().set_input(Field::Name, "Lion");
        table.submit_form().unwrap();
        assert_eq!(table.records()[0].name, "Lion");
        assert_eq!(table.records()[1].name, "Lion");
    }

    #[test]
    fn delete_always_returns_to_adding() {
        let (mut table, _) = table_with(cats(), &[]);
        table.edit_record(0).unwrap();
        table.delete_record(1).unwrap();
        assert_eq!(table.mode(), FormMode::Adding);
        assert_eq!(table.records().len(), 1);
        assert!(table.form().is_blank());
    }

    #[test]
    fn delete_keeps_an_add_mode_draft() {
        let (mut table, _) = table_with(cats(), &[]);
        table.form_mut().set_input(Field::Name, "Puma");
        table.delete_record(0).unwrap();
        assert_eq!(table.form().input(Field::Name), "Puma");
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let (mut table, _) = table_with(cats(), &[]);
        assert_eq!(
            table.delete_record(5),
            Err(TableError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert!(table.edit_record(2).is_err());
        assert_eq!(table.records().len(), 2);
        assert_eq!(table.mode(), FormMode::Adding);
    }

    #[test]
    fn edit_then_cancel_leaves_records_alone() {
        let (mut table, _) = table_with(cats(), &[]);
        table.edit_record(1).unwrap();
        table.form_mut().set_input(Field::Name, "Changed");
        table.cancel_edit();
        assert_eq!(table.records(), cats().as_slice());
        assert_eq!(table.mode(), FormMode::Adding);
        assert!(table.form().is_blank());
    }

    #[test]
    fn dispatch_routes_to_operations() {
        let (mut table, _) = table_with(cats(), &[Field::Size]);
        table.dispatch(Action::Sort(Field::Size)).unwrap();
        assert_eq!(table.records()[0].name, "Lion");
        table.dispatch(Action::Edit(1)).unwrap();
        assert_eq!(table.mode(), FormMode::Editing(1));
        table.dispatch(Action::Cancel).unwrap();
        assert_eq!(table.mode(), FormMode::Adding);
        table.dispatch(Action::Delete(0)).unwrap();
        assert_eq!(table.records().len(), 1);
    }

    #[test]
    fn missing_mount_point_skips_render() {
        let page = SharedPage::new(Page::new("test"));
        let mut table = RecordTable::new(cats(), "nowhere", [Field::Size], page.clone());
        table.sort_table(Field::Size);
        assert_eq!(table.records()[0].name, "Lion");
        assert!(!page.with(|p| p.has_mount("nowhere")));
    }
}
