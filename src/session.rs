use once_cell::unsync::OnceCell;
use tracing::info;

use crate::domain::TrackerError;
use crate::record::CompanyRecord;
use crate::store::Store;
use crate::table::Table;

/// Application state for one run of the tracker.
///
/// The table is read from the store on first access and is never reloaded
/// afterwards; later changes on disk by another process are not seen.
pub struct Session {
    store: Store,
    table: OnceCell<Table>,
}

impl Session {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            table: OnceCell::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn table(&self) -> &Table {
        self.table.get_or_init(|| self.store.load())
    }

    /// Appends a record and persists the whole table.
    ///
    /// The record stays in memory even when saving fails.
    pub fn append(&mut self, record: CompanyRecord) -> Result<(), TrackerError> {
        info!("Adding company \"{}\"", record.name);
        let mut table = self.table.take().unwrap_or_else(|| self.store.load());
        table.push(record);
        let saved = self.store.save(&table);
        self.table = OnceCell::from(table);
        saved
    }
}
