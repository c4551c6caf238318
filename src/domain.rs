use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;

pub const DEFAULT_DATA_FILE: &str = "target_companies.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Companies";
pub const DEFAULT_EXPORT_PREFIX: &str = "companies_export";
pub const DEFAULT_LOG_FILE: &str = "company-tracker.log";

pub const HELP_TEXT: &str = "\
Table
  a        Add a new company (opens the form)
  c / C    Next / previous country filter
  s / S    Next / previous sector filter
  i / I    Next / previous interest level filter
  r        Reset all filters
  e        Export the filtered table
  j / k    Move down / up
  g / G    Jump to first / last row
  ?        Show this help
  q        Quit

Form
  Tab / Down        Next field
  Shift-Tab / Up    Previous field
  Left / Right      Change interest level
  Enter             Add company
  Esc               Back to the table";

#[derive(Debug)]
pub enum TrackerError {
    IoError(Error),
    PolarsError(PolarsError),
    SpreadsheetError(String),
    SheetNotFound(String),
    MissingColumn(String),
    UnknownFileType(PathBuf),
    Validation(String),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::IoError(e) => write!(f, "I/O error: {e}"),
            TrackerError::PolarsError(e) => write!(f, "Table error: {e}"),
            TrackerError::SpreadsheetError(e) => write!(f, "Spreadsheet error: {e}"),
            TrackerError::SheetNotFound(sheet) => write!(f, "Sheet \"{sheet}\" not found"),
            TrackerError::MissingColumn(column) => write!(f, "Column \"{column}\" not found"),
            TrackerError::UnknownFileType(path) => {
                write!(f, "Unknown file type: {}", path.display())
            }
            TrackerError::Validation(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TrackerError {}

impl From<Error> for TrackerError {
    fn from(err: Error) -> Self {
        TrackerError::IoError(err)
    }
}

impl From<PolarsError> for TrackerError {
    fn from(err: PolarsError) -> Self {
        TrackerError::PolarsError(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, Setters)]
pub struct TrackerConfig {
    pub data_file: PathBuf,
    pub sheet_name: String,
    pub export_dir: PathBuf,
    pub export_prefix: String,
    pub export_format: ExportFormat,
    pub event_poll_time: u64,
    pub use_clipboard: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            export_dir: PathBuf::from("."),
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            export_format: ExportFormat::Xlsx,
            event_poll_time: 100,
            use_clipboard: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Country,
    Sector,
    Interest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    Exit,
    Enter,
    Help,
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    OpenForm,
    NextFilterValue(FilterField),
    PrevFilterValue(FilterField),
    ResetFilters,
    Export,
    Resize(usize, usize),
    RawKey(KeyEvent),
}
