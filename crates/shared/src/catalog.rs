//! Persistent catalog of owned manga, with a per-series index.
//!
//! Primary records live under `manga:isbn:<ISBN>`; the series index is a
//! materialized list under `manga:series:<name>`, maintained by separate
//! writes. `add` and `add_to_series` are not atomic with each other;
//! `register` wraps both in one transaction and is what the binaries use.
//! `delete` removes the primary entry only; a series index entry for the
//! same ISBN stays until the index is corrected independently.

use crate::error::CatalogError;
use crate::models::MangaRecord;
use crate::store::Store;
use tracing::{debug, info};

const ISBN_PREFIX: &str = "manga:isbn:";
const SERIES_PREFIX: &str = "manga:series:";

/// Catalog manager owning the backing store
pub struct Catalog {
    store: Store,
}

impl Catalog {
    /// Create a catalog over the given store
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn isbn_key(isbn: &str) -> String {
        format!("{ISBN_PREFIX}{isbn}")
    }

    fn series_key(series: &str) -> String {
        format!("{SERIES_PREFIX}{series}")
    }

    /// Write or overwrite the primary entry for `record`.
    ///
    /// The series index is not touched; callers tracking the series must
    /// also call `add_to_series`, or go through `register`.
    pub fn add(&self, record: &MangaRecord) -> Result<(), CatalogError> {
        if record.isbn.is_empty() {
            return Err(CatalogError::Validation("isbn must not be empty".into()));
        }

        self.store.set_json(&Self::isbn_key(&record.isbn), record)?;
        debug!(isbn = %record.isbn, title = %record.title, "Stored record");
        Ok(())
    }

    /// Add `record` to its series index list.
    ///
    /// An existing entry with the same ISBN is replaced in place rather
    /// than duplicated. No-op success for standalone records.
    pub fn add_to_series(&self, record: &MangaRecord) -> Result<(), CatalogError> {
        let Some(series) = record.tracked_series() else {
            return Ok(());
        };

        let key = Self::series_key(series);
        let mut entries: Vec<MangaRecord> = self.store.get_json(&key)?.unwrap_or_default();

        match entries.iter_mut().find(|e| e.isbn == record.isbn) {
            Some(existing) => *existing = record.clone(),
            None => entries.push(record.clone()),
        }

        self.store.set_json(&key, &entries)?;
        debug!(isbn = %record.isbn, series = %series, "Updated series index");
        Ok(())
    }

    /// `add` + `add_to_series` in a single transaction, so the primary
    /// entry and the series index cannot half-write.
    pub fn register(&self, record: &MangaRecord) -> Result<(), CatalogError> {
        self.store.begin()?;
        let result = self
            .add(record)
            .and_then(|()| self.add_to_series(record));
        match result {
            Ok(()) => {
                self.store.commit()?;
                Ok(())
            }
            Err(e) => {
                let _ = self.store.rollback();
                Err(e)
            }
        }
    }

    /// Look up a record by ISBN
    pub fn get_by_isbn(&self, isbn: &str) -> Result<MangaRecord, CatalogError> {
        self.store
            .get_json(&Self::isbn_key(isbn))?
            .ok_or_else(|| CatalogError::NotFound(isbn.to_string()))
    }

    /// Records recorded for `series` via `add_to_series`, in insertion
    /// order; empty when the series has no index entry.
    pub fn get_by_series(&self, series: &str) -> Result<Vec<MangaRecord>, CatalogError> {
        Ok(self
            .store
            .get_json(&Self::series_key(series))?
            .unwrap_or_default())
    }

    /// Highest volume number recorded for `series`; 0 when empty.
    pub fn latest_volume_in_series(&self, series: &str) -> Result<u32, CatalogError> {
        let records = self.get_by_series(series)?;
        Ok(records.iter().map(|r| r.volume).max().unwrap_or(0))
    }

    /// All primary records, in the store's key order.
    pub fn list(&self) -> Result<Vec<MangaRecord>, CatalogError> {
        Ok(self.store.values_with_prefix(ISBN_PREFIX)?)
    }

    /// Names of all series with an index entry.
    pub fn list_series_names(&self) -> Result<Vec<String>, CatalogError> {
        let keys = self.store.keys_with_prefix(SERIES_PREFIX)?;
        Ok(keys
            .into_iter()
            .map(|k| k[SERIES_PREFIX.len()..].to_string())
            .collect())
    }

    /// Full-replace update; same write path as `add`.
    pub fn update(&self, record: &MangaRecord) -> Result<(), CatalogError> {
        self.add(record)
    }

    /// Remove the primary entry for `isbn`. The series index is left as
    /// is (documented inconsistency window).
    pub fn delete(&self, isbn: &str) -> Result<(), CatalogError> {
        if !self.store.delete(&Self::isbn_key(isbn))? {
            return Err(CatalogError::NotFound(isbn.to_string()));
        }
        info!(isbn = %isbn, "Deleted record");
        Ok(())
    }
}
