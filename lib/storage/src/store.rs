use crate::dataset::Dataset;
use parking_lot::RwLock;
use relata_core::{
    ContentTypeSelector, Filter, FilterExpression, QueryService, Record, RecordId, Result, Schema,
};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Default)]
struct Records {
    /// Insertion order
    items: Vec<Record>,
    index: HashMap<RecordId, usize>,
}

/// In-memory content store
///
/// Holds the schema and every record of a site. Queries return records in
/// insertion order.
pub struct ContentStore {
    schema: Schema,
    records: RwLock<Records>,
}

impl ContentStore {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: RwLock::new(Records::default()),
        }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        for record in dataset.undeclared_records() {
            warn!(record = %record.id, "record content type is not in the schema");
        }

        let store = Self::new(dataset.schema);
        for record in dataset.records {
            store.upsert(record);
        }
        debug!(records = store.count(), "content store loaded");
        store
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_dataset(Dataset::from_path(path)?))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Insert or replace a record; a replaced record keeps its position.
    pub fn upsert(&self, record: Record) {
        let mut records = self.records.write();
        match records.index.get(&record.id).copied() {
            Some(pos) => records.items[pos] = record,
            None => {
                let pos = records.items.len();
                records.index.insert(record.id.clone(), pos);
                records.items.push(record);
            }
        }
    }

    pub fn get(&self, id: &RecordId) -> Option<Record> {
        let records = self.records.read();
        records
            .index
            .get(id)
            .and_then(|&pos| records.items.get(pos))
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.records.read().items.len()
    }

    /// All records of one content type, in insertion order
    pub fn list(&self, contenttype: &str) -> Vec<Record> {
        self.records
            .read()
            .items
            .iter()
            .filter(|r| r.content_type() == contenttype)
            .cloned()
            .collect()
    }
}

impl QueryService for ContentStore {
    fn content_by_selector(
        &self,
        selector: &ContentTypeSelector,
        filter: &FilterExpression,
    ) -> Result<Vec<Record>> {
        for name in selector.names() {
            if self.schema.contenttype(name).is_none() {
                debug!(contenttype = name, "selector names an unknown content type");
            }
        }

        let results: Vec<Record> = self
            .records
            .read()
            .items
            .iter()
            .filter(|r| selector.contains(r.content_type()) && filter.matches(r))
            .cloned()
            .collect();

        debug!(%selector, %filter, results = results.len(), "selector query");
        Ok(results)
    }

    fn content_by_id(&self, id: &RecordId) -> Result<Option<Record>> {
        Ok(self.get(id))
    }
}
