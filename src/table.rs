use std::sync::Arc;

use crate::record::{COLUMNS, CompanyRecord};

/// Ordered sequence of company records. Insertion order is display order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Table {
    records: Vec<CompanyRecord>,
}

impl Table {
    pub fn new(records: Vec<CompanyRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: CompanyRecord) {
        self.records.push(record);
    }

    pub fn get(&self, idx: usize) -> Option<&CompanyRecord> {
        self.records.get(idx)
    }

    pub fn full_view(&self) -> TableView {
        TableView::new((0..self.records.len()).collect())
    }
}

/// Read-only projection of a [`Table`]: row indices into the table, in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    rows: Arc<Vec<usize>>, // Wrapped in an Arc so the ui snapshot can share it
}

impl TableView {
    pub fn new(rows: Vec<usize>) -> Self {
        Self {
            rows: Arc::new(rows),
        }
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = &'a CompanyRecord> + 'a {
        self.rows.iter().filter_map(move |&ridx| table.get(ridx))
    }

    /// Cell values of the rows in `begin..end`, one Vec per row.
    pub fn cells(&self, table: &Table, begin: usize, end: usize) -> Vec<Vec<String>> {
        let end = std::cmp::min(end, self.rows.len());
        let begin = std::cmp::min(begin, end);
        self.rows[begin..end]
            .iter()
            .filter_map(|&ridx| table.get(ridx))
            .map(|r| (0..COLUMNS.len()).map(|c| r.field(c).to_string()).collect())
            .collect()
    }
}
