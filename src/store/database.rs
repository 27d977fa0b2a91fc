//! In-memory collections with write-through persistence.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;

use super::persistence::{self, Collections};
use super::{Record, StoreError};
use crate::observability::metrics;

/// Search filter: field name → substring. Fields are OR-combined.
pub type Filter = HashMap<String, String>;

/// The record store.
///
/// Holds named, insertion-ordered collections of records. Every mutation is
/// followed by a full rewrite of the backing file, if one is configured.
#[derive(Debug, Default)]
pub struct Database {
    collections: Collections,
    persistence_path: Option<PathBuf>,
}

impl Database {
    /// Create an empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store backed by `path`, hydrating it if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let collections = persistence::load(&path)?;
        for (name, records) in &collections {
            metrics::record_store_size(name, records.len());
        }
        Ok(Self {
            collections,
            persistence_path: Some(path),
        })
    }

    /// Return records of `collection`, in insertion order.
    ///
    /// With a filter, a record is kept when any filtered field holds a string
    /// containing that field's substring (case-sensitive). Missing, null and
    /// non-string fields never match.
    pub fn select(&self, collection: &str, filter: Option<&Filter>) -> Vec<Record> {
        let Some(records) = self.collections.get(collection) else {
            return Vec::new();
        };

        match filter {
            None => records.clone(),
            Some(filter) => records
                .iter()
                .filter(|record| matches_any(record, filter))
                .cloned()
                .collect(),
        }
    }

    /// Append `record` to `collection`, creating the collection if needed.
    ///
    /// Ids are not checked for uniqueness.
    pub fn insert(&mut self, collection: &str, record: Record) -> Result<(), StoreError> {
        let records = self.collections.entry(collection.to_string()).or_default();
        records.push(record);
        metrics::record_store_size(collection, records.len());
        self.persist()
    }

    /// Position of the first record whose `id` equals `id`.
    pub fn index_of(&self, collection: &str, id: &str) -> Option<usize> {
        self.collections
            .get(collection)?
            .iter()
            .position(|record| record_id(record) == Some(id))
    }

    /// Record at `index`, as returned by [`Database::index_of`].
    pub fn get(&self, collection: &str, index: usize) -> Option<&Record> {
        self.collections.get(collection)?.get(index)
    }

    /// Merge `fields` into the record with the given id.
    ///
    /// Only the supplied keys are replaced and `id` is never overwritten.
    /// Returns `Ok(false)` without touching the file when no record matches.
    pub fn update(
        &mut self,
        collection: &str,
        id: &str,
        fields: Record,
    ) -> Result<bool, StoreError> {
        let Some(index) = self.index_of(collection, id) else {
            return Ok(false);
        };

        if let Some(record) = self
            .collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(index))
        {
            for (key, value) in fields {
                if key != "id" {
                    record.insert(key, value);
                }
            }
        }

        self.persist()?;
        Ok(true)
    }

    /// Remove the record with the given id.
    ///
    /// Returns `Ok(false)` without touching the file when no record matches.
    pub fn delete(&mut self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let Some(index) = self.index_of(collection, id) else {
            return Ok(false);
        };

        if let Some(records) = self.collections.get_mut(collection) {
            records.remove(index);
            metrics::record_store_size(collection, records.len());
        }

        self.persist()?;
        Ok(true)
    }

    /// Number of records in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    fn persist(&self) -> Result<(), StoreError> {
        match &self.persistence_path {
            Some(path) => persistence::save(path, &self.collections),
            None => Ok(()),
        }
    }
}

fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn matches_any(record: &Record, filter: &Filter) -> bool {
    filter.iter().any(|(field, needle)| {
        record
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|value| value.contains(needle.as_str()))
    })
}
