//! Customer store keyed by `customer_id`.
//!
//! Records live in memory and, when the store was opened from a path, are
//! rewritten to a pretty-printed JSON file after every upsert. The decision
//! pipeline never reads from here.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::Customer;
use crate::error::SinkError;

#[derive(Debug, Default)]
pub struct CustomerStore {
    path: Option<PathBuf>,
    records: RwLock<BTreeMap<String, Customer>>,
}

impl CustomerStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let records = match File::open(&path) {
            Ok(file) => {
                let list: Vec<Customer> = serde_json::from_reader(file)?;
                list.into_iter().map(|c| (c.customer_id.clone(), c)).collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            records: RwLock::new(records),
        })
    }

    /// Insert a new customer, or replace name/email/phone of an existing one.
    pub fn upsert(&self, customer: Customer) -> Result<Customer, SinkError> {
        let mut records = self.records.write();
        let existed = records.insert(customer.customer_id.clone(), customer.clone()).is_some();
        if let Some(path) = &self.path {
            persist(path, &records)?;
        }
        debug!(customer_id = %customer.customer_id, existed, "customer upserted");
        Ok(customer)
    }

    pub fn get(&self, customer_id: &str) -> Option<Customer> {
        self.records.read().get(customer_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

fn persist(path: &Path, records: &BTreeMap<String, Customer>) -> Result<(), SinkError> {
    let list: Vec<&Customer> = records.values().collect();
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &list)?;
    Ok(())
}
