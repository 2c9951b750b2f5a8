//! Formrelay Results Table
//!
//! Implements the `RecordStore` trait using SQLite. Each committed
//! `FormRecord` becomes exactly one immutable row in the `form_records`
//! table; the external dashboard polls the same table for the latest row.
//!
//! # Thread Safety
//!
//! SQLite connections are not thread-safe. Each task should have its own
//! SqliteRecordStore instance; the pipeline only ever holds one.
//!
//! # Examples
//!
//! ```
//! use formrelay_record::SqliteRecordStore;
//! use formrelay_domain::{FormRecord, RecordStore};
//!
//! let mut store = SqliteRecordStore::in_memory().unwrap();
//! store
//!     .insert_record(&FormRecord::empty(), "form-abc.jpg")
//!     .unwrap();
//! assert_eq!(store.count_records().unwrap(), 1);
//! ```

#![warn(missing_docs)]

use formrelay_domain::{FormRecord, RecordId, RecordStore};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during persistence operations
#[derive(Error, Debug)]
pub enum PersistError {
    /// Database error (connectivity, schema mismatch, constraint)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored data could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-backed implementation of RecordStore
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Open (or create) the results table at the given database path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PersistError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory store (useful for testing)
    pub fn in_memory() -> Result<Self, PersistError> {
        Self::new(":memory:")
    }

    fn initialize_schema(&self) -> Result<(), PersistError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Most recently committed record, if any
    ///
    /// This is the row the external dashboard renders.
    pub fn latest_record(&self) -> Result<Option<(RecordId, FormRecord)>, PersistError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, score, date_value, text_value, dropdown_value,
                        numeric_value, free_text_writing_value
                 FROM form_records
                 ORDER BY created_at DESC, id DESC
                 LIMIT 1",
                [],
                |row| {
                    let id_bytes: Vec<u8> = row.get(0)?;
                    Ok((
                        id_bytes,
                        FormRecord {
                            score: row.get(1)?,
                            date_value: row.get(2)?,
                            text_value: row.get(3)?,
                            dropdown_value: row.get(4)?,
                            numeric_value: row.get(5)?,
                            free_text_writing_value: row.get(6)?,
                        },
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id_bytes, record)) => {
                let id = Self::bytes_to_record_id(&id_bytes)?;
                Ok(Some((id, record)))
            }
            None => Ok(None),
        }
    }

    /// Number of committed records
    pub fn count_records(&self) -> Result<u64, PersistError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM form_records", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Convert RecordId to bytes for storage
    fn record_id_to_bytes(id: RecordId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to RecordId
    fn bytes_to_record_id(bytes: &[u8]) -> Result<RecordId, PersistError> {
        if bytes.len() != 16 {
            return Err(PersistError::InvalidData(format!(
                "Expected 16 bytes for RecordId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(RecordId::from_value(u128::from_be_bytes(arr)))
    }
}

impl RecordStore for SqliteRecordStore {
    type Error = PersistError;

    fn insert_record(
        &mut self,
        record: &FormRecord,
        source_key: &str,
    ) -> Result<RecordId, Self::Error> {
        let id = RecordId::new();
        let id_bytes = Self::record_id_to_bytes(id);
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        self.conn.execute(
            "INSERT INTO form_records (id, score, date_value, text_value, dropdown_value,
                                       numeric_value, free_text_writing_value, source_key, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &id_bytes,
                record.score,
                &record.date_value,
                &record.text_value,
                &record.dropdown_value,
                &record.numeric_value,
                &record.free_text_writing_value,
                source_key,
                created_at,
            ],
        )?;

        info!(record_id = %id, source_key = %source_key, "record committed");

        Ok(id)
    }
}
