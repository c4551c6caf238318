use arboard::Clipboard;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, error, info, trace, warn};

use crate::domain::{FilterField, HELP_TEXT, Message, TrackerConfig, TrackerError};
use crate::exporter::Exporter;
use crate::filter::Filters;
use crate::form::{EntryForm, FormField};
use crate::record::COLUMNS;
use crate::session::Session;
use crate::table::TableView;
use crate::ui::{
    COLUMN_WIDTH_MARGIN, FILTER_BAR_HEIGHT, MAX_COLUMN_WIDTH, STATUSLINE_HEIGHT,
    TABLE_BORDER_HEIGHT, TABLE_HEADER_HEIGHT,
};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    FORM,
    POPUP,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct FormFieldView {
    pub label: &'static str,
    pub value: String,
    pub curser_pos: Option<usize>, // Set for text inputs only
}

/// Snapshot of everything the ui needs to draw one frame.
#[derive(Debug, Clone)]
pub struct UIData {
    pub name: String,
    pub headers: Vec<String>,
    pub column_widths: Vec<usize>,
    pub rows: Vec<Vec<String>>, // Visible window of the filtered view
    pub nrows: usize,           // Rows in the filtered view
    pub total_rows: usize,
    pub selected_row: usize,
    pub abs_selected_row: usize,
    pub filters: Vec<(&'static str, String)>,
    pub show_form: bool,
    pub form: Vec<FormFieldView>,
    pub form_focus: usize,
    pub show_popup: bool,
    pub popup_message: String,
    pub status_message: String,
    pub status_level: StatusLevel,
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            name: String::new(),
            headers: COLUMNS.iter().map(|c| c.to_string()).collect(),
            column_widths: Vec::new(),
            rows: Vec::new(),
            nrows: 0,
            total_rows: 0,
            selected_row: 0,
            abs_selected_row: 0,
            filters: Vec::new(),
            show_form: false,
            form: Vec::new(),
            form_focus: 0,
            show_popup: false,
            popup_message: String::new(),
            status_message: String::new(),
            status_level: StatusLevel::Info,
        }
    }
}

pub struct Model {
    config: TrackerConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    session: Session,
    exporter: Exporter,
    filters: Filters,
    view: TableView,
    form: EntryForm,
    curser_row: usize,
    offset_row: usize,
    table_height: usize,
    uidata: UIData,
    clipboard: Option<Clipboard>,
    status_message: String,
    status_level: StatusLevel,
    #[cfg(test)]
    last_export: Option<crate::exporter::ExportArtifact>,
}

impl Model {
    pub fn init(
        config: &TrackerConfig,
        session: Session,
        ui_height: usize,
    ) -> Self {
        let exporter = Exporter::new(
            config.export_dir.clone(),
            config.export_prefix.clone(),
            config.export_format,
        );
        let clipboard = if config.use_clipboard {
            Clipboard::new()
                .inspect_err(|e| warn!("Clipboard not available: {e}"))
                .ok()
        } else {
            None
        };

        let mut model = Self {
            config: config.clone(),
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            session,
            exporter,
            filters: Filters::default(),
            view: TableView::default(),
            form: EntryForm::default(),
            curser_row: 0,
            offset_row: 0,
            table_height: Self::table_height_for(ui_height),
            uidata: UIData::empty(),
            clipboard,
            status_message: String::new(),
            status_level: StatusLevel::Info,
            #[cfg(test)]
            last_export: None,
        };
        trace!("UI height {ui_height}");

        let table = model.session.table();
        let message = if table.is_empty() {
            format!(
                "No companies in {} yet. Press a to add one, ? for help.",
                model.config.data_file.display()
            )
        } else {
            format!(
                "Loaded {} companies from {}. Press ? for help.",
                table.len(),
                model.config.data_file.display()
            )
        };
        model.refresh_view();
        model.set_status(StatusLevel::Info, message);
        model
    }

    fn table_height_for(ui_height: usize) -> usize {
        ui_height
            .saturating_sub(
                FILTER_BAR_HEIGHT + STATUSLINE_HEIGHT + TABLE_HEADER_HEIGHT + TABLE_BORDER_HEIGHT,
            )
            .max(1)
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    #[cfg(test)]
    pub fn last_export(&self) -> Option<&crate::exporter::ExportArtifact> {
        self.last_export.as_ref()
    }

    /// Form mode wants every key as it was pressed.
    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::FORM
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), TrackerError> {
        if let Some(msg) = message {
            trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);
            match self.modus {
                Modus::TABLE => match msg {
                    Message::Quit => self.quit(),
                    Message::MoveDown => self.move_selection_down(1),
                    Message::MoveUp => self.move_selection_up(1),
                    Message::MovePageDown => self.move_selection_down(self.table_height),
                    Message::MovePageUp => self.move_selection_up(self.table_height),
                    Message::MoveBeginning => self.move_selection_beginning(),
                    Message::MoveEnd => self.move_selection_end(),
                    Message::OpenForm => self.open_form(),
                    Message::NextFilterValue(field) => self.step_filter(field, true),
                    Message::PrevFilterValue(field) => self.step_filter(field, false),
                    Message::ResetFilters => self.reset_filters(),
                    Message::Export => self.export(),
                    Message::Help => self.show_help(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
                Modus::FORM => match msg {
                    Message::Quit => self.quit(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    Message::RawKey(key) => self.form_input(key),
                    _ => (),
                },
                Modus::POPUP => match msg {
                    Message::Quit => self.quit(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    Message::Exit | Message::Enter | Message::Help => self.exit(),
                    _ => (),
                },
            }
        }
        self.update_uidata();
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    fn exit(&mut self) {
        match self.modus {
            Modus::POPUP => {
                trace!("Close popup ...");
                self.modus = self.previous_modus;
                self.previous_modus = Modus::POPUP;
            }
            Modus::FORM => {
                self.previous_modus = Modus::FORM;
                self.modus = Modus::TABLE;
            }
            Modus::TABLE => {}
        }
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
    }

    fn open_form(&mut self) {
        trace!("Opening form ...");
        self.previous_modus = self.modus;
        self.modus = Modus::FORM;
    }

    fn form_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_form(),
            KeyCode::Esc => self.exit(),
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_previous(),
            _ => {
                self.form.handle_key(key);
            }
        }
    }

    fn submit_form(&mut self) {
        let record = match self.form.submit() {
            Ok(record) => record,
            Err(e) => {
                debug!("Form rejected: {e}");
                self.set_status(StatusLevel::Warning, e.to_string());
                return;
            }
        };

        let name = record.name.clone();
        let saved = self.session.append(record);
        self.refresh_view();
        match saved {
            Ok(()) => {
                self.form.clear();
                self.set_status(StatusLevel::Success, format!("Company \"{name}\" added!"));
            }
            Err(e) => {
                error!("Saving {} failed: {e}", self.session.store().path().display());
                self.set_status(StatusLevel::Error, format!("Could not save: {e}"));
            }
        }
    }

    fn step_filter(&mut self, field: FilterField, forward: bool) {
        self.filters.step(field, self.session.table(), forward);
        self.move_selection_beginning();
        self.refresh_view();
        self.set_filter_status();
    }

    fn reset_filters(&mut self) {
        self.filters.reset();
        self.move_selection_beginning();
        self.refresh_view();
        self.set_filter_status();
    }

    fn set_filter_status(&mut self) {
        let message = format!(
            "Showing {} of {} companies",
            self.view.len(),
            self.session.table().len()
        );
        self.set_status(StatusLevel::Info, message);
    }

    fn export(&mut self) {
        match self.exporter.export(self.session.table(), &self.view) {
            Ok(artifact) => {
                let mut message = format!(
                    "Exported {} rows to {} ({})",
                    artifact.rows, artifact.file_name, artifact.mime
                );
                if let Some(clipboard) = self.clipboard.as_mut() {
                    match clipboard.set_text(artifact.path.to_string_lossy().to_string()) {
                        Ok(_) => message.push_str(", path copied to clipboard"),
                        Err(e) => trace!("Error copying to clipboard: {:?}", e),
                    }
                }
                self.set_status(StatusLevel::Success, message);
                #[cfg(test)]
                {
                    self.last_export = Some(artifact);
                }
            }
            Err(e) => {
                error!("Export failed: {e}");
                self.set_status(StatusLevel::Error, format!("Export failed: {e}"));
            }
        }
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!("UI was resized! w:{width}, h:{height}");
        self.table_height = Self::table_height_for(height);
        self.clamp_selection();
    }

    fn set_status(&mut self, level: StatusLevel, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_level = level;
        if level == StatusLevel::Warning {
            info!("{}", self.status_message);
        }
        self.update_uidata();
    }

    // -------------------- Table navigation ---------------------- //

    fn move_selection_beginning(&mut self) {
        self.curser_row = 0;
        self.offset_row = 0;
    }

    fn move_selection_end(&mut self) {
        let nrows = self.view.len();
        if nrows <= self.table_height {
            self.offset_row = 0;
            self.curser_row = nrows.saturating_sub(1);
        } else {
            self.offset_row = nrows - self.table_height;
            self.curser_row = self.table_height - 1;
        }
    }

    fn move_selection_up(&mut self, size: usize) {
        let abs = (self.offset_row + self.curser_row).saturating_sub(size);
        self.select_row(abs);
    }

    fn move_selection_down(&mut self, size: usize) {
        let last = self.view.len().saturating_sub(1);
        let abs = std::cmp::min(self.offset_row + self.curser_row + size, last);
        self.select_row(abs);
    }

    // Moves the window only when the row is outside of it
    fn select_row(&mut self, abs: usize) {
        if abs < self.offset_row {
            self.offset_row = abs;
        } else if abs >= self.offset_row + self.table_height {
            self.offset_row = abs + 1 - self.table_height;
        }
        self.curser_row = abs - self.offset_row;
    }

    fn clamp_selection(&mut self) {
        let last = self.view.len().saturating_sub(1);
        let abs = std::cmp::min(self.offset_row + self.curser_row, last);
        self.offset_row = std::cmp::min(self.offset_row, abs);
        self.select_row(abs);
    }

    // -------------------- Snapshot building ---------------------- //

    fn refresh_view(&mut self) {
        self.view = self.filters.apply(self.session.table());
        self.clamp_selection();
        self.update_uidata();
    }

    fn column_widths(headers: &[String], rows: &[Vec<String>]) -> Vec<usize> {
        headers
            .iter()
            .enumerate()
            .map(|(cidx, header)| {
                let widest = rows
                    .iter()
                    .map(|r| r.get(cidx).map(|c| c.chars().count()).unwrap_or(0))
                    .max()
                    .unwrap_or(0);
                std::cmp::min(
                    std::cmp::max(header.chars().count(), widest) + COLUMN_WIDTH_MARGIN,
                    MAX_COLUMN_WIDTH,
                )
            })
            .collect()
    }

    fn form_snapshot(&self) -> Vec<FormFieldView> {
        FormField::ALL
            .iter()
            .map(|&field| match self.form.input(field) {
                Some(input) => FormFieldView {
                    label: field.label(),
                    value: input.value().to_string(),
                    curser_pos: Some(input.curser_pos()),
                },
                None => FormFieldView {
                    label: field.label(),
                    value: format!("◀ {} ▶", self.form.interest().label()),
                    curser_pos: None,
                },
            })
            .collect()
    }

    fn update_uidata(&mut self) {
        let table = self.session.table();
        let rows = self
            .view
            .cells(table, self.offset_row, self.offset_row + self.table_height);
        let headers: Vec<String> = table.columns().iter().map(|c| c.to_string()).collect();
        let name = match self.filters.is_active() {
            true => format!("F[{}]", self.config.data_file.display()),
            false => self.config.data_file.display().to_string(),
        };

        self.uidata = UIData {
            name,
            column_widths: Self::column_widths(&headers, &rows),
            headers,
            rows,
            nrows: self.view.len(),
            total_rows: table.len(),
            selected_row: self.curser_row,
            abs_selected_row: self.offset_row + self.curser_row,
            filters: vec![
                ("Country", self.filters.selected(FilterField::Country)),
                ("Sector", self.filters.selected(FilterField::Sector)),
                ("Interest Level", self.filters.selected(FilterField::Interest)),
            ],
            show_form: self.modus == Modus::FORM
                || (self.modus == Modus::POPUP && self.previous_modus == Modus::FORM),
            form: self.form_snapshot(),
            form_focus: FormField::ALL
                .iter()
                .position(|f| *f == self.form.focus())
                .unwrap_or(0),
            show_popup: self.modus == Modus::POPUP,
            popup_message: HELP_TEXT.to_string(),
            status_message: self.status_message.clone(),
            status_level: self.status_level,
        };
    }
}
