// JSON datasets: the content schema plus the records of a site
use relata_core::{Record, Result, Schema};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Schema and records loaded together
///
/// ```json
/// {
///   "contenttypes": { "pages": { "name": "Pages", "fields": { "title": { "type": "text" } } } },
///   "taxonomy": { "tags": { "name": "Tags", "searchweight": 20 } },
///   "records": [ { "contenttype": "pages", "id": 1, "taxonomy": { "tags": ["rust"] } } ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(flatten)]
    pub schema: Schema,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(schema: Schema, records: Vec<Record>) -> Self {
        Self { schema, records }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Records whose content type the schema does not define
    pub fn undeclared_records(&self) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(|r| self.schema.contenttype(r.content_type()).is_none())
    }
}
