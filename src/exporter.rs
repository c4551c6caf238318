use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::domain::{ExportFormat, TrackerError};
use crate::record::CompanyRecord;
use crate::store::write_records;
use crate::table::{Table, TableView};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_MIME: &str = "text/csv";
const EXPORT_SHEET_NAME: &str = "Sheet1";

/// A written export, ready to be handed to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: &'static str,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
    prefix: String,
    format: ExportFormat,
}

impl Exporter {
    pub fn new(dir: PathBuf, prefix: impl Into<String>, format: ExportFormat) -> Self {
        Self {
            dir,
            prefix: prefix.into(),
            format,
        }
    }

    /// `<prefix>_<YYYYMMDD_HHMMSS>.<ext>`. Two exports in the same second share a name.
    pub fn file_name(&self, now: DateTime<Local>) -> String {
        format!(
            "{}_{}.{}",
            self.prefix,
            now.format("%Y%m%d_%H%M%S"),
            self.format.extension()
        )
    }

    pub fn export(&self, table: &Table, view: &TableView) -> Result<ExportArtifact, TrackerError> {
        self.export_at(table, view, Local::now())
    }

    pub fn export_at(
        &self,
        table: &Table,
        view: &TableView,
        now: DateTime<Local>,
    ) -> Result<ExportArtifact, TrackerError> {
        let file_name = self.file_name(now);
        let path = self.dir.join(&file_name);
        let records: Vec<&CompanyRecord> = view.records(table).collect();
        write_records(&path, EXPORT_SHEET_NAME, &records)?;
        info!("Exported {} rows to {}", records.len(), path.display());

        Ok(ExportArtifact {
            mime: mime_for(&path),
            path,
            file_name,
            rows: records.len(),
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => CSV_MIME,
        _ => XLSX_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FilterField;
    use crate::filter::Filters;
    use crate::store::read_records;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn table() -> Table {
        let record = |name: &str, country: &str| CompanyRecord {
            name: name.into(),
            country: country.into(),
            sector: "Tech".into(),
            interest_level: "High".into(),
            contact_date: "2024-04-04".into(),
        };
        Table::new(vec![
            record("a", "Spain"),
            record("b", "Italy"),
            record("c", "Spain"),
        ])
    }

    fn moment() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 7, 9, 8, 5, 3).unwrap()
    }

    #[test]
    fn file_name_has_second_granularity() {
        let exporter = Exporter::new(".".into(), "companies_export", ExportFormat::Xlsx);
        assert_eq!(exporter.file_name(moment()), "companies_export_20240709_080503.xlsx");
        let exporter = Exporter::new(".".into(), "x", ExportFormat::Csv);
        assert_eq!(exporter.file_name(moment()), "x_20240709_080503.csv");
    }

    #[test]
    fn export_writes_exactly_the_filtered_rows() {
        let dir = tempdir().unwrap();
        let table = table();
        let mut filters = Filters::default();
        filters.select(FilterField::Country, "Spain");
        let view = filters.apply(&table);

        let exporter = Exporter::new(dir.path().to_path_buf(), "companies_export", ExportFormat::Xlsx);
        let artifact = exporter.export_at(&table, &view, moment()).unwrap();
        assert_eq!(artifact.mime, XLSX_MIME);
        assert_eq!(artifact.rows, 2);

        let written = read_records(&artifact.path, "Sheet1").unwrap();
        let expected: Vec<CompanyRecord> = view.records(&table).cloned().collect();
        assert_eq!(written, expected);
    }

    #[test]
    fn csv_export_and_same_second_overwrite() {
        let dir = tempdir().unwrap();
        let table = table();
        let exporter = Exporter::new(dir.path().to_path_buf(), "out", ExportFormat::Csv);

        let first = exporter.export_at(&table, &table.full_view(), moment()).unwrap();
        let second = exporter
            .export_at(&table, &TableView::new(vec![1]), moment())
            .unwrap();
        assert_eq!(first.path, second.path);
        assert_eq!(second.mime, CSV_MIME);

        let written = read_records(&second.path, "").unwrap();
        assert_eq!(written, vec![table.records()[1].clone()]);
    }

    #[test]
    fn export_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::new(dir.path().join("nope"), "out", ExportFormat::Xlsx);
        let table = table();
        assert!(exporter.export(&table, &table.full_view()).is_err());
    }
}
