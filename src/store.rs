use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::TrackerError;
use crate::record::{COLUMNS, CompanyRecord};
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileType {
    CSV,
    XLSX,
}

pub fn detect_file_type(path: &Path) -> Result<FileType, TrackerError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::CSV),
        Some("XLSX") => Ok(FileType::XLSX),
        _ => Err(TrackerError::UnknownFileType(path.to_path_buf())),
    }
}

/// The persisted spreadsheet holding all company records.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    sheet_name: String,
}

impl Store {
    pub fn new(path: PathBuf, sheet_name: impl Into<String>) -> Self {
        Self {
            path,
            sheet_name: sheet_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the table. A missing or unreadable file yields an empty table.
    pub fn load(&self) -> Table {
        match self.try_load() {
            Ok(table) => table,
            Err(e) => {
                warn!("Could not read {}: {e}. Starting empty.", self.path.display());
                Table::empty()
            }
        }
    }

    fn try_load(&self) -> Result<Table, TrackerError> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("{} does not exist yet. Starting empty.", self.path.display());
                return Ok(Table::empty());
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(TrackerError::IoError(std::io::Error::other("not a file")));
        }

        let records = read_records(&self.path, &self.sheet_name)?;
        info!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(Table::new(records))
    }

    /// Overwrites the file with the whole table.
    pub fn save(&self, table: &Table) -> Result<(), TrackerError> {
        let records: Vec<&CompanyRecord> = table.records().iter().collect();
        write_records(&self.path, &self.sheet_name, &records)?;
        debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

pub fn read_records(path: &Path, sheet_name: &str) -> Result<Vec<CompanyRecord>, TrackerError> {
    let records = match detect_file_type(path)? {
        FileType::XLSX => read_xlsx(path, sheet_name)?,
        FileType::CSV => read_csv(path)?,
    };
    Ok(records.into_iter().filter(|r| !r.is_blank()).collect())
}

pub fn write_records(
    path: &Path,
    sheet_name: &str,
    records: &[&CompanyRecord],
) -> Result<(), TrackerError> {
    match detect_file_type(path)? {
        FileType::XLSX => write_xlsx(path, sheet_name, records),
        FileType::CSV => write_csv(path, records),
    }
}

fn spreadsheet_error(e: impl std::fmt::Display) -> TrackerError {
    TrackerError::SpreadsheetError(e.to_string())
}

// Position of each of COLUMNS within the header row
fn column_positions(header: &[String]) -> Result<[usize; 5], TrackerError> {
    let mut positions = [0; 5];
    for (pos, name) in positions.iter_mut().zip(COLUMNS) {
        *pos = header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| TrackerError::MissingColumn(name.to_string()))?;
    }
    Ok(positions)
}

fn read_xlsx(path: &Path, sheet_name: &str) -> Result<Vec<CompanyRecord>, TrackerError> {
    let book = umya_spreadsheet::reader::xlsx::read(path).map_err(spreadsheet_error)?;
    let sheet = book
        .get_sheet_by_name(sheet_name)
        .ok_or_else(|| TrackerError::SheetNotFound(sheet_name.to_string()))?;

    let header: Vec<String> = (1..=sheet.get_highest_column())
        .map(|c| sheet.get_value((c, 1)))
        .collect();
    let positions = column_positions(&header)?;

    let records = (2..=sheet.get_highest_row())
        .map(|row| {
            CompanyRecord::from_fields(positions.map(|c| sheet.get_value((c as u32 + 1, row))))
        })
        .collect();
    Ok(records)
}

fn write_xlsx(path: &Path, sheet_name: &str, records: &[&CompanyRecord]) -> Result<(), TrackerError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book.new_sheet(sheet_name).map_err(spreadsheet_error)?;

    for (cidx, name) in COLUMNS.iter().enumerate() {
        sheet.get_cell_mut((cidx as u32 + 1, 1)).set_value_string(*name);
    }
    for (ridx, record) in records.iter().enumerate() {
        for cidx in 0..COLUMNS.len() {
            sheet
                .get_cell_mut((cidx as u32 + 1, ridx as u32 + 2))
                .set_value_string(record.field(cidx));
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, path).map_err(spreadsheet_error)
}

fn read_csv(path: &Path) -> Result<Vec<CompanyRecord>, TrackerError> {
    let df = LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // every column as text
        .finish()?
        .collect()?;

    let mut columns: Vec<Vec<String>> = Vec::with_capacity(COLUMNS.len());
    for name in COLUMNS {
        let col = df
            .column(name)
            .map_err(|_| TrackerError::MissingColumn(name.to_string()))?
            .cast(&DataType::String)?;
        let series = col.str()?;
        columns.push(
            series
                .into_iter()
                .map(|v| v.unwrap_or_default().to_string())
                .collect(),
        );
    }

    let records = (0..df.height())
        .map(|row| CompanyRecord::from_fields(std::array::from_fn(|c| columns[c][row].clone())))
        .collect();
    Ok(records)
}

fn write_csv(path: &Path, records: &[&CompanyRecord]) -> Result<(), TrackerError> {
    let mut df: DataFrame = COLUMNS
        .iter()
        .enumerate()
        .map(|(cidx, name)| {
            let values: Vec<&str> = records.iter().map(|r| r.field(cidx)).collect();
            Series::new((*name).into(), values)
        })
        .collect();

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, country: &str, date: &str) -> CompanyRecord {
        CompanyRecord {
            name: name.into(),
            country: country.into(),
            sector: "Energy".into(),
            interest_level: "Medium".into(),
            contact_date: date.into(),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("missing.xlsx"), "Companies");
        let table = store.load();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &COLUMNS);
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        fs::write(&path, b"definitely not a zip archive").unwrap();
        assert!(Store::new(path, "Companies").load().is_empty());
    }

    #[test]
    fn unknown_extension_loads_empty_and_refuses_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.txt");
        fs::write(&path, "Name\nAcme\n").unwrap();
        let store = Store::new(path, "Companies");
        assert!(store.load().is_empty());
        assert!(matches!(
            store.save(&Table::empty()),
            Err(TrackerError::UnknownFileType(_))
        ));
    }

    #[test]
    fn xlsx_round_trip() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("companies.xlsx"), "Companies");
        let table = Table::new(vec![
            record("Acme", "Spain", "2024-01-31"),
            record("1234", "Portugal", "2024-02-01"),
        ]);
        store.save(&table).unwrap();
        assert_eq!(store.load(), table);
    }

    #[test]
    fn xlsx_with_other_sheet_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.xlsx");
        Store::new(path.clone(), "Other")
            .save(&Table::new(vec![record("Acme", "Spain", "2024-01-31")]))
            .unwrap();
        assert!(Store::new(path, "Companies").load().is_empty());
    }

    #[test]
    fn csv_round_trip_keeps_blank_cells() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("companies.csv"), "ignored");
        let mut blank_country = record("Beta", "", "2024-05-05");
        blank_country.sector = "Retail, online".into();
        let table = Table::new(vec![record("Acme", "Spain", "2024-01-31"), blank_country]);
        store.save(&table).unwrap();
        assert_eq!(store.load(), table);
    }

    #[test]
    fn csv_keeps_numeric_looking_text() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("companies.csv"), "ignored");
        let mut agent = record("007", "Spain", "2024-01-31");
        agent.sector = "1.50".into();
        let table = Table::new(vec![agent]);
        store.save(&table).unwrap();
        assert_eq!(store.load(), table);
    }

    #[test]
    fn csv_late_text_after_numbers_still_loads() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("companies.csv"), "ignored");
        let records = (0..150)
            .map(|i| {
                let name = if i == 120 { "Acme".to_string() } else { i.to_string() };
                record(&name, "Spain", "2024-01-31")
            })
            .collect();
        let table = Table::new(records);
        store.save(&table).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 150);
        assert_eq!(loaded, table);
    }

    #[test]
    fn csv_columns_are_matched_by_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.csv");
        fs::write(
            &path,
            "Contact Date,Sector,Name,Interest Level,Country,Notes\n\
             2024-01-31,Energy,Acme,Medium,Spain,call back\n",
        )
        .unwrap();
        let table = Store::new(path, "Companies").load();
        assert_eq!(table.records(), &[record("Acme", "Spain", "2024-01-31")]);
    }

    #[test]
    fn csv_missing_column_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.csv");
        fs::write(&path, "Name,Country\nAcme,Spain\n").unwrap();
        assert!(Store::new(path, "Companies").load().is_empty());
    }

    #[test]
    fn detects_file_type_case_insensitive() {
        assert_eq!(detect_file_type(Path::new("a.XLSX")).unwrap(), FileType::XLSX);
        assert_eq!(detect_file_type(Path::new("a.csv")).unwrap(), FileType::CSV);
        assert!(detect_file_type(Path::new("a")).is_err());
    }
}
