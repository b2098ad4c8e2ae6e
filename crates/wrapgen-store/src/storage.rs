//! Persistent signature table
//!
//! Uses sled for the name-keyed signature records and the running list of
//! headers to include in the wrapper.

use serde::{Deserialize, Serialize};
use std::path::Path;
use wrapgen_core::Signature;

use crate::Result;

/// Signature record as persisted, with the header it was extracted from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSignature {
    pub header: String,
    pub signature: Signature,
}

/// sled-backed table of signatures and include headers
pub struct SignatureTable {
    db: sled::Db,
    signatures_tree: sled::Tree,
    includes_tree: sled::Tree,
}

impl SignatureTable {
    /// Open or create a table at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Create an in-memory table (for testing)
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let signatures_tree = db.open_tree("signatures")?;
        let includes_tree = db.open_tree("includes")?;

        Ok(Self {
            db,
            signatures_tree,
            includes_tree,
        })
    }

    /// Store a signature, replacing any previous record for the same name
    pub fn store_signature(&self, record: &StoredSignature) -> Result<()> {
        let key = record.signature.name().as_bytes();
        let value = serde_json::to_vec(record)?;
        self.signatures_tree.insert(key, value)?;
        Ok(())
    }

    /// Get a signature by function name
    pub fn get_signature(&self, name: &str) -> Result<Option<StoredSignature>> {
        match self.signatures_tree.get(name.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All signatures, ordered by function name
    pub fn signatures(&self) -> Result<Vec<StoredSignature>> {
        let mut records = Vec::new();
        for item in self.signatures_tree.iter() {
            let (_, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }

    /// Append a header to the include list. Returns false if already listed.
    pub fn append_include(&self, header: &str) -> Result<bool> {
        if self.includes()?.iter().any(|h| h == header) {
            return Ok(false);
        }
        let id = self.db.generate_id()?;
        self.includes_tree
            .insert(id.to_be_bytes(), header.as_bytes())?;
        Ok(true)
    }

    /// Include headers in the order they were first recorded
    pub fn includes(&self) -> Result<Vec<String>> {
        let mut headers = Vec::new();
        for item in self.includes_tree.iter() {
            let (_, value) = item?;
            headers.push(String::from_utf8_lossy(&value).into_owned());
        }
        Ok(headers)
    }

    /// Flush changes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Get statistics
    pub fn stats(&self) -> TableStats {
        TableStats {
            signatures_count: self.signatures_tree.len(),
            includes_count: self.includes_tree.len(),
        }
    }
}

/// Table statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub signatures_count: usize,
    pub includes_count: usize,
}
