use redb::ReadableTable;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::db::{Database, DatabaseError};
use super::tables::Collection;

impl Database {
    // ========================================================================
    // Document operations
    // ========================================================================

    /// Get a document by id
    pub fn get_document<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<T>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(collection)?;

        match table.get(id)? {
            Some(data) => {
                let doc: T = rmp_serde::from_slice(data.value())?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    /// List all documents in a collection as (id, document) pairs
    pub fn list_documents<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<(String, T)>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(collection)?;

        let mut docs = Vec::new();
        for result in table.iter()? {
            let (key, value) = result?;
            let doc: T = rmp_serde::from_slice(value.value())?;
            docs.push((key.value().to_string(), doc));
        }

        Ok(docs)
    }

    /// Write a full document under the given id, creating or replacing it
    pub fn set_document<T: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        doc: &T,
    ) -> Result<(), DatabaseError> {
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(collection)?;
            let data = rmp_serde::to_vec_named(doc)?;
            table.insert(id, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Store a document under a generated id and return the id
    pub fn add_document<T: Serialize>(
        &self,
        collection: Collection,
        doc: &T,
    ) -> Result<String, DatabaseError> {
        let id = uuid::Uuid::new_v4().to_string();
        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(collection)?;
            let data = rmp_serde::to_vec_named(doc)?;
            table.insert(id.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(id)
    }

    /// Merge top-level fields into an existing document.
    /// Returns false when the document does not exist.
    pub fn merge_document(
        &self,
        collection: Collection,
        id: &str,
        fields: &serde_json::Map<String, Value>,
    ) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing: Option<Value> = {
            let table = write_txn.open_table(collection)?;
            let value = match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };
            value
        };

        let merged = match existing {
            Some(mut doc) => match doc.as_object_mut() {
                Some(obj) => {
                    for (key, value) in fields {
                        obj.insert(key.clone(), value.clone());
                    }
                    let data = rmp_serde::to_vec_named(&doc)?;
                    let mut table = write_txn.open_table(collection)?;
                    table.insert(id, data.as_slice())?;
                    true
                }
                None => false,
            },
            None => false,
        };

        write_txn.commit()?;
        Ok(merged)
    }

    /// Delete a document by id
    pub fn delete_document(&self, collection: Collection, id: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(collection)?;
            let removed = table.remove(id)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    // ========================================================================
    // Array-field set operations
    // ========================================================================

    /// Append a value to an array field unless a deep-equal member exists.
    /// Returns false when the document does not exist.
    pub fn add_to_set(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        value: &Value,
    ) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing: Option<Value> = {
            let table = write_txn.open_table(collection)?;
            let value = match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };
            value
        };

        let updated = match existing {
            Some(mut doc) => {
                let appended = match doc
                    .as_object_mut()
                    .map(|obj| obj.entry(field).or_insert_with(|| Value::Array(Vec::new())))
                    .and_then(Value::as_array_mut)
                {
                    Some(items) => {
                        if !items.iter().any(|v| v == value) {
                            items.push(value.clone());
                        }
                        true
                    }
                    None => false,
                };

                if appended {
                    let data = rmp_serde::to_vec_named(&doc)?;
                    let mut table = write_txn.open_table(collection)?;
                    table.insert(id, data.as_slice())?;
                }
                appended
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(updated)
    }

    /// Remove every member of an array field that deep-equals the value.
    /// Returns false when the document is absent or nothing matched.
    pub fn remove_from_set(
        &self,
        collection: Collection,
        id: &str,
        field: &str,
        value: &Value,
    ) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing: Option<Value> = {
            let table = write_txn.open_table(collection)?;
            let value = match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };
            value
        };

        let removed = match existing {
            Some(mut doc) => {
                let removed = match doc
                    .as_object_mut()
                    .and_then(|obj| obj.get_mut(field))
                    .and_then(Value::as_array_mut)
                {
                    Some(items) => {
                        let before = items.len();
                        items.retain(|v| v != value);
                        items.len() != before
                    }
                    None => false,
                };

                if removed {
                    let data = rmp_serde::to_vec_named(&doc)?;
                    let mut table = write_txn.open_table(collection)?;
                    table.insert(id, data.as_slice())?;
                }
                removed
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(removed)
    }

    // ========================================================================
    // Cross-collection operations
    // ========================================================================

    /// Move a document between collections inside a single transaction,
    /// applying `transform` on the way. Either both the removal and the
    /// insertion commit, or neither does -- the document can never be
    /// observed in both collections, nor lost.
    /// Returns the transformed document, or None when the source is absent.
    pub fn move_document<F>(
        &self,
        from: Collection,
        to: Collection,
        id: &str,
        transform: F,
    ) -> Result<Option<Value>, DatabaseError>
    where
        F: FnOnce(Value) -> Value,
    {
        let write_txn = self.begin_write()?;

        let existing: Option<Value> = {
            let table = write_txn.open_table(from)?;
            match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            }
        };

        let moved = match existing {
            Some(doc) => {
                {
                    let mut table = write_txn.open_table(from)?;
                    table.remove(id)?;
                }
                let doc = transform(doc);
                let data = rmp_serde::to_vec_named(&doc)?;
                {
                    let mut table = write_txn.open_table(to)?;
                    table.insert(id, data.as_slice())?;
                }
                Some(doc)
            }
            None => None,
        };

        write_txn.commit()?;
        Ok(moved)
    }
}
