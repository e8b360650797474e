use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use ratatui::Frame;
use tracing::{error, info};

use crate::error::TableError;
use crate::models::Field;
use crate::page::SharedPage;
use crate::table::{FormMode, RecordTable};

use super::forms::{build_button_line, build_field_line, cursor_offset, Alert};
use super::helpers::{cell_text, centered_rect, header_label, name_style, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the tab strip naming each table.
const TABS_HEIGHT: u16 = 3;
/// Five inputs, a spacer and the button row, plus the block borders.
const FORM_HEIGHT: u16 = 9;

/// Where key presses go.
enum Mode {
    /// Moving around the table on screen.
    Browsing,
    /// Typing into the table's form.
    Form,
    /// A validation failure waiting to be acknowledged; dismissing it returns
    /// to the form.
    Alert(Alert),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// One tab: a table plus the row highlighted in it.
struct TablePane {
    title: &'static str,
    table: RecordTable,
    selected: usize,
}

impl TablePane {
    fn move_selection(&mut self, offset: isize) {
        let len = self.table.records().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let new = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = new as usize;
    }

    fn select_last(&mut self) {
        self.selected = self.table.records().len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        let len = self.table.records().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn has_selection(&self) -> bool {
        self.selected < self.table.records().len()
    }
}

/// Central application state shared across the TUI.
pub struct App {
    page: SharedPage,
    panes: Vec<TablePane>,
    current: usize,
    mode: Mode,
    status: Option<StatusMessage>,
    export_path: PathBuf,
}

impl App {
    /// `tables` must already render into `page`; the app only reads the page
    /// back when exporting.
    pub fn new(
        page: SharedPage,
        tables: Vec<(&'static str, RecordTable)>,
        export_path: PathBuf,
    ) -> Self {
        Self {
            page,
            panes: tables
                .into_iter()
                .map(|(title, table)| TablePane {
                    title,
                    table,
                    selected: 0,
                })
                .collect(),
            current: 0,
            mode: Mode::Browsing,
            status: None,
            export_path,
        }
    }

    /// Table currently on screen.
    pub fn current_table(&self) -> Option<&RecordTable> {
        self.panes.get(self.current).map(|pane| &pane.table)
    }

    /// Route one terminal key event. Returns `true` once the user asked to
    /// quit. Only presses count; Ctrl+C quits from any mode and Ctrl+A is the
    /// form's quick add.
    pub fn handle_key_event(&mut self, event: KeyEvent) -> Result<bool> {
        if event.kind != KeyEventKind::Press {
            return Ok(false);
        }
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            match event.code {
                KeyCode::Char('c') => return Ok(true),
                KeyCode::Char('a') => {
                    self.handle_ctrl_a()?;
                    return Ok(false);
                }
                _ => {}
            }
        }
        self.handle_key(event.code)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Browsing);

        self.mode = match mode {
            Mode::Browsing => self.handle_browse_key(code, &mut exit)?,
            Mode::Form => self.handle_form_key(code)?,
            // any key acknowledges the alert
            Mode::Alert(_) => Mode::Form,
        };

        Ok(exit)
    }

    /// Quick add from the form: only the name is checked.
    fn handle_ctrl_a(&mut self) -> Result<()> {
        if !matches!(self.mode, Mode::Form) {
            return Ok(());
        }
        let Some(pane) = self.panes.get_mut(self.current) else {
            return Ok(());
        };
        match pane.table.add_record() {
            Ok(()) => {
                pane.select_last();
                let name = pane
                    .table
                    .records()
                    .last()
                    .map(|record| record.name.clone())
                    .unwrap_or_default();
                self.set_status(format!("Added {name}."), StatusKind::Info);
                self.mode = Mode::Browsing;
            }
            Err(err) => self.mode = self.alert_for(err),
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let Some(pane) = self.panes.get_mut(self.current) else {
            if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                *exit = true;
            }
            return Ok(Mode::Browsing);
        };

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Tab => {
                self.clear_status();
                self.current = (self.current + 1) % self.panes.len();
            }
            KeyCode::BackTab => {
                self.clear_status();
                self.current = (self.current + self.panes.len() - 1) % self.panes.len();
            }
            KeyCode::Up => pane.move_selection(-1),
            KeyCode::Down => pane.move_selection(1),
            KeyCode::PageUp => pane.move_selection(-5),
            KeyCode::PageDown => pane.move_selection(5),
            KeyCode::Home => pane.selected = 0,
            KeyCode::End => pane.select_last(),
            KeyCode::Char(key @ ('n' | 'l' | 's' | 'w')) => {
                let field = match key {
                    'n' => Field::Name,
                    'l' => Field::Location,
                    's' => Field::Size,
                    _ => Field::Weight,
                };
                pane.table.sort_table(field);
            }
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                if pane.has_selection() {
                    let index = pane.selected;
                    pane.table.edit_record(index)?;
                    self.clear_status();
                    return Ok(Mode::Form);
                }
                self.set_status("No animal selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('d') | KeyCode::Char('-') | KeyCode::Delete => {
                if pane.has_selection() {
                    let index = pane.selected;
                    let name = pane.table.records()[index].name.clone();
                    pane.table.delete_record(index)?;
                    pane.ensure_in_bounds();
                    self.set_status(format!("Deleted {name}."), StatusKind::Info);
                } else {
                    self.set_status("No animal selected to delete.", StatusKind::Error);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Ok(Mode::Form);
            }
            KeyCode::Char('o') => {
                let image = pane
                    .table
                    .records()
                    .get(pane.selected)
                    .map(|record| record.image.trim().to_string());
                match image {
                    None => self.set_status("No animal selected.", StatusKind::Error),
                    Some(link) if link.is_empty() => {
                        self.set_status("This animal has no image.", StatusKind::Error)
                    }
                    Some(link) => match open_link(&link) {
                        Ok(()) => self.set_status("Opened image.", StatusKind::Info),
                        Err(err) => self.set_status(
                            format!("Failed to open image: {err}"),
                            StatusKind::Error,
                        ),
                    },
                }
            }
            KeyCode::Char('x') => match self.export_page() {
                Ok(path) => {
                    if let Err(err) = open_link(&path) {
                        self.set_status(
                            format!("Exported to {}, but could not open it: {err}", path.display()),
                            StatusKind::Error,
                        );
                    } else {
                        self.set_status(
                            format!("Exported to {}.", path.display()),
                            StatusKind::Info,
                        );
                    }
                }
                Err(err) => {
                    error!(error = %err, "export failed");
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
            },
            _ => {}
        }
        Ok(Mode::Browsing)
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Result<Mode> {
        let Some(pane) = self.panes.get_mut(self.current) else {
            return Ok(Mode::Browsing);
        };

        match code {
            KeyCode::Esc => {
                if pane.table.editing_index().is_some() {
                    pane.table.cancel_edit();
                    self.set_status("Edit cancelled.", StatusKind::Info);
                }
                return Ok(Mode::Browsing);
            }
            KeyCode::Tab | KeyCode::Down => pane.table.form_mut().next_field(),
            KeyCode::BackTab | KeyCode::Up => pane.table.form_mut().previous_field(),
            KeyCode::Backspace => pane.table.form_mut().backspace(),
            KeyCode::Enter => {
                let editing = pane.table.editing_index();
                match pane.table.submit_form() {
                    Ok(()) => {
                        match editing {
                            Some(index) => pane.selected = index,
                            None => pane.select_last(),
                        }
                        let name = pane
                            .table
                            .records()
                            .get(pane.selected)
                            .map(|record| record.name.clone())
                            .unwrap_or_default();
                        let verb = if editing.is_some() { "Updated" } else { "Added" };
                        self.set_status(format!("{verb} {name}."), StatusKind::Info);
                        return Ok(Mode::Browsing);
                    }
                    Err(err) => return Ok(self.alert_for(err)),
                }
            }
            KeyCode::Char(ch) => {
                pane.table.form_mut().push_char(ch);
            }
            _ => {}
        }
        Ok(Mode::Form)
    }

    /// Write the rendered page to the export path.
    pub(crate) fn export_page(&self) -> Result<PathBuf> {
        self.page.with(|page| page.export(&self.export_path))?;
        info!(path = %self.export_path.display(), "exported page");
        Ok(self.export_path.clone())
    }

    /// Mirror a rejected operation in the footer and block on an alert.
    fn alert_for(&mut self, err: TableError) -> Mode {
        self.set_status(err.to_string(), StatusKind::Error);
        Mode::Alert(Alert::new(err.to_string()))
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TABS_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(FORM_HEIGHT),
            ])
            .split(content_area);

        self.draw_tabs(frame, chunks[0]);
        if let Some(pane) = self.panes.get(self.current) {
            self.draw_table(frame, chunks[1], pane);
            self.draw_form(frame, chunks[2], pane);
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::Alert(alert) = &self.mode {
            self.draw_alert(frame, area, alert);
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = self
            .panes
            .iter()
            .map(|pane| Line::from(format!("{} ({})", pane.title, pane.table.records().len())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.current)
            .block(Block::default().borders(Borders::ALL).title("Animal Tables"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, pane: &TablePane) {
        let table = &pane.table;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} • {}", pane.title, table.table_id()));

        if table.records().is_empty() {
            let message = Paragraph::new("No animals yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header_style = Style::default().add_modifier(Modifier::BOLD);
        let sortable_style = header_style.fg(Color::Cyan);
        let header = Row::new(Field::ALL.iter().map(|field| {
            let sortable = table.is_sortable(*field);
            Cell::from(header_label(*field, sortable)).style(if sortable {
                sortable_style
            } else {
                header_style
            })
        }));

        let editing = table.editing_index();
        let rows = table.records().iter().enumerate().map(|(index, record)| {
            let cells = Field::ALL.iter().map(|field| {
                let cell = Cell::from(cell_text(record, *field));
                if *field == Field::Name {
                    cell.style(name_style(table.name_style()))
                } else {
                    cell
                }
            });
            let row = Row::new(cells);
            if editing == Some(index) {
                row.style(Style::default().fg(Color::Yellow))
            } else {
                row
            }
        });

        let widths = [
            Constraint::Percentage(20),
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(12),
            Constraint::Percentage(13),
        ];

        let widget = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default();
        if matches!(self.mode, Mode::Browsing) {
            state.select(Some(pane.selected));
        }
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, pane: &TablePane) {
        let table = &pane.table;
        let title = match table.mode() {
            FormMode::Editing(_) => "Edit Animal",
            FormMode::Adding => "Add New Animal",
        };
        let focused = !matches!(self.mode, Mode::Browsing);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            });
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let form = table.form();
        let mut lines: Vec<Line> = Field::ALL
            .iter()
            .map(|field| build_field_line(form, *field, focused))
            .collect();
        lines.push(Line::from(""));
        lines.push(build_button_line(table.editing_index().is_some()));

        frame.render_widget(Paragraph::new(lines), inner);

        if matches!(self.mode, Mode::Form) {
            let (dx, dy) = cursor_offset(form);
            frame.set_cursor_position((inner.x + dx, inner.y + dy));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Alert(_) => Line::from(vec![
                Span::styled("[any key]", key_style),
                Span::raw(" Dismiss"),
            ]),
            Mode::Form => Line::from(vec![
                Span::styled("[Tab/↑↓]", key_style),
                Span::raw(" Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Submit   "),
                Span::styled("[Ctrl+A]", key_style),
                Span::raw(" Quick Add   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel / Back"),
            ]),
            Mode::Browsing => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Table   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[n/l/s/w]", key_style),
                Span::raw(" Sort   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[d]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[o]", key_style),
                Span::raw(" Image   "),
                Span::styled("[x]", key_style),
                Span::raw(" Export   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_alert(&self, frame: &mut Frame, area: Rect, alert: &Alert) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Alert").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(Span::styled(
                alert.message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to continue.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::config::default_tables;
    use crate::page::Page;

    fn app_in(export_path: PathBuf) -> App {
        let page = SharedPage::new(Page::new("Animals"));
        let tables = default_tables()
            .into_iter()
            .map(|config| (config.title, config.build(&page)))
            .collect();
        App::new(page, tables, export_path)
    }

    fn app() -> App {
        app_in(PathBuf::from("unused.html"))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn names(app: &App) -> Vec<String> {
        app.current_table()
            .unwrap()
            .records()
            .iter()
            .map(|record| record.name.clone())
            .collect()
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn sort_keys_reach_the_current_table() {
        let mut app = app();
        app.handle_key(KeyCode::Char('s')).unwrap();
        assert_eq!(names(&app)[0], "Caracal");
    }

    #[test]
    fn unsortable_keys_do_nothing() {
        let mut app = app();
        app.handle_key(KeyCode::Tab).unwrap();
        let before = names(&app);
        app.handle_key(KeyCode::Char('s')).unwrap();
        assert_eq!(names(&app), before);
    }

    #[test]
    fn invalid_submit_raises_an_alert_that_returns_to_the_form() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Puma");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(&app.mode, Mode::Alert(alert) if alert.message == "Image URL is required."));
        assert!(screen_text(&app).contains("Image URL is required."));

        app.handle_key(KeyCode::Char('z')).unwrap();
        assert!(matches!(app.mode, Mode::Form));
        assert_eq!(names(&app).len(), 6);
        assert_eq!(
            app.current_table().unwrap().form().input(Field::Name),
            "Puma"
        );
    }

    #[test]
    fn full_submit_adds_a_row_and_selects_it() {
        let mut app = app();
        app.handle_key(KeyCode::Char('a')).unwrap();
        for value in ["Puma", "puma.png", "Andes", "6", "60"] {
            type_text(&mut app, value);
            app.handle_key(KeyCode::Tab).unwrap();
        }
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Browsing));
        assert_eq!(names(&app).last().map(String::as_str), Some("Puma"));
        assert_eq!(app.panes[0].selected, 6);
    }

    #[test]
    fn quick_add_only_needs_a_name() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Puma");
        app.handle_ctrl_a().unwrap();
        assert_eq!(names(&app).len(), 7);

        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Tiger");
        app.handle_ctrl_a().unwrap();
        assert!(
            matches!(&app.mode, Mode::Alert(alert) if alert.message == "Animal already exists or invalid input.")
        );
    }

    #[test]
    fn control_keys_quit_or_quick_add() {
        let mut app = app();
        let ctrl = |ch| KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL);

        // quick add is a no-op outside the form
        assert!(!app.handle_key_event(ctrl('a')).unwrap());
        assert_eq!(names(&app).len(), 6);

        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Puma");
        assert!(!app.handle_key_event(ctrl('a')).unwrap());
        assert_eq!(names(&app).len(), 7);

        app.handle_key(KeyCode::Char('+')).unwrap();
        assert!(app.handle_key_event(ctrl('c')).unwrap());
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut app = app();
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!app.handle_key_event(release).unwrap());
        assert!(app
            .handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE))
            .unwrap());
    }

    #[test]
    fn edit_and_escape_cancels() {
        let mut app = app();
        app.handle_key(KeyCode::Char('e')).unwrap();
        assert_eq!(
            app.current_table().unwrap().mode(),
            FormMode::Editing(0)
        );
        assert!(screen_text(&app).contains("Edit Animal"));
        app.handle_key(KeyCode::Esc).unwrap();
        assert_eq!(app.current_table().unwrap().mode(), FormMode::Adding);
        assert!(matches!(app.mode, Mode::Browsing));
    }

    #[test]
    fn delete_removes_the_selected_row() {
        let mut app = app();
        app.handle_key(KeyCode::End).unwrap();
        app.handle_key(KeyCode::Char('d')).unwrap();
        assert_eq!(names(&app).len(), 5);
        assert_eq!(app.panes[0].selected, 4);
    }

    #[test]
    fn export_writes_every_table() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path().join("page.html"));
        let path = app.export_page().unwrap();
        assert_eq!(path, dir.path().join("page.html"));
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("<section id=\"big-cats-table\">"));
        assert!(html.contains("<section id=\"big-fish-table\">"));
        assert!(html.contains("Hammerhead Shark"));
    }
}
