use redb::{Database as RedbDatabase, ReadTransaction, ReadableTable, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::models::{Profile, SlideshowDoc};
use super::tables::*;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Commit error: {0}")]
    Commit(Box<redb::CommitError>),
    #[error("Database error: {0}")]
    Redb(Box<redb::Error>),
    #[error("Database error: {0}")]
    RedbDatabase(Box<redb::DatabaseError>),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),
    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),
    #[error("Storage error: {0}")]
    Storage(Box<redb::StorageError>),
    #[error("Table error: {0}")]
    Table(Box<redb::TableError>),
    #[error("Transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
}

impl From<redb::CommitError> for DatabaseError {
    fn from(e: redb::CommitError) -> Self {
        DatabaseError::Commit(Box::new(e))
    }
}

impl From<redb::DatabaseError> for DatabaseError {
    fn from(e: redb::DatabaseError) -> Self {
        DatabaseError::RedbDatabase(Box::new(e))
    }
}

impl From<redb::Error> for DatabaseError {
    fn from(e: redb::Error) -> Self {
        DatabaseError::Redb(Box::new(e))
    }
}

impl From<redb::StorageError> for DatabaseError {
    fn from(e: redb::StorageError) -> Self {
        DatabaseError::Storage(Box::new(e))
    }
}

impl From<redb::TableError> for DatabaseError {
    fn from(e: redb::TableError) -> Self {
        DatabaseError::Table(Box::new(e))
    }
}

impl From<redb::TransactionError> for DatabaseError {
    fn from(e: redb::TransactionError) -> Self {
        DatabaseError::Transaction(Box::new(e))
    }
}

pub struct Database {
    db: Arc<RedbDatabase>,
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

/// Statistics from a purge operation
#[derive(Debug, Default)]
pub struct PurgeStats {
    pub documents: u64,
}

impl Database {
    /// Open or create a database at the given path.
    /// Seeds the profile and slideshow singleton documents so that
    /// merge-updates against them always have a target.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join("portfolio-backend.redb");
        let db = Arc::new(RedbDatabase::create(db_path)?);

        let write_txn = db.begin_write()?;
        {
            for collection in ALL_COLLECTIONS {
                let _ = write_txn.open_table(collection)?;
            }
            seed_singletons(&write_txn)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> Result<ReadTransaction, DatabaseError> {
        Ok(self.db.begin_read()?)
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> Result<WriteTransaction, DatabaseError> {
        Ok(self.db.begin_write()?)
    }

    // ========================================================================
    // Admin operations
    // ========================================================================

    /// Purge all data and re-seed the singletons - for testing only
    pub fn purge_all(&self) -> Result<PurgeStats, DatabaseError> {
        let write_txn = self.begin_write()?;
        let mut stats = PurgeStats::default();

        for collection in ALL_COLLECTIONS {
            let keys: Vec<String> = {
                let table = write_txn.open_table(collection)?;
                table
                    .iter()?
                    .map(|r| r.map(|(k, _)| k.value().to_string()))
                    .collect::<Result<Vec<_>, _>>()?
            };

            let mut table = write_txn.open_table(collection)?;
            for key in keys {
                table.remove(key.as_str())?;
                stats.documents += 1;
            }
        }

        seed_singletons(&write_txn)?;
        write_txn.commit()?;
        Ok(stats)
    }
}

fn seed_singletons(write_txn: &WriteTransaction) -> Result<(), DatabaseError> {
    {
        let mut table = write_txn.open_table(PROFILE_SECTION)?;
        if table.get(MAIN_PROFILE)?.is_none() {
            let data = rmp_serde::to_vec_named(&Profile::default())?;
            table.insert(MAIN_PROFILE, data.as_slice())?;
        }
    }
    {
        let mut table = write_txn.open_table(SLIDESHOW_MAIN)?;
        if table.get(MAIN_SLIDES)?.is_none() {
            let data = rmp_serde::to_vec_named(&SlideshowDoc::default())?;
            table.insert(MAIN_SLIDES, data.as_slice())?;
        }
    }
    Ok(())
}
