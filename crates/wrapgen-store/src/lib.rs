//! wrapgen Store
//!
//! Keeps everything extraction runs have produced so that a later
//! generation run can build the wrapper. A store directory holds one
//! editable stub file per function next to a sled database with the
//! original signatures and the headers to include.
//!
//! Recording a function again overwrites its signature and resets its stub
//! to the default body, discarding any edits.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use wrapgen_core::Signature;

mod storage;
mod stubs;

pub use storage::{SignatureTable, StoredSignature, TableStats};
pub use stubs::{default_stub, StubDirectory};

/// Name of the database directory inside a store directory
pub const DATABASE_DIR: &str = "signatures.db";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("no stubs have been generated in {0}")]
    NotInitialized(PathBuf),
    #[error("stub file for `{0}` is missing")]
    MissingStub(String),
    #[error("stub file for `{0}` has no signature record")]
    OrphanStub(String),
}

impl From<StoreError> for wrapgen_core::Error {
    fn from(err: StoreError) -> Self {
        wrapgen_core::Error::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One function ready for generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub header: String,
    pub signature: Signature,
    /// Stub body, possibly hand-edited
    pub stub: String,
}

/// Store of signatures and stub bodies, keyed by function name
pub struct SignatureStore {
    stubs: StubDirectory,
    table: SignatureTable,
}

impl SignatureStore {
    /// Open a store for extraction, creating it if needed
    pub fn create(dir: &Path, extension: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let table = SignatureTable::open(&dir.join(DATABASE_DIR))?;
        debug!("Opened store at {:?}", dir);

        Ok(Self {
            stubs: StubDirectory::new(dir, extension),
            table,
        })
    }

    /// Open a store that extraction has already populated
    pub fn open_existing(dir: &Path, extension: &str) -> Result<Self> {
        if !dir.join(DATABASE_DIR).exists() {
            return Err(StoreError::NotInitialized(dir.to_path_buf()));
        }
        let table = SignatureTable::open(&dir.join(DATABASE_DIR))?;
        if table.stats().includes_count == 0 {
            return Err(StoreError::NotInitialized(dir.to_path_buf()));
        }

        Ok(Self {
            stubs: StubDirectory::new(dir, extension),
            table,
        })
    }

    pub fn dir(&self) -> &Path {
        self.stubs.dir()
    }

    /// Store a signature and reset its stub to the default body
    pub fn record(&self, header: &str, signature: &Signature) -> Result<()> {
        self.table.store_signature(&StoredSignature {
            header: header.to_string(),
            signature: signature.clone(),
        })?;
        self.stubs
            .write(signature.name(), &default_stub(header, signature))?;
        debug!("Recorded {} from {}", signature.name(), header);
        Ok(())
    }

    /// Append a header to the include list
    pub fn record_header(&self, header: &str) -> Result<bool> {
        self.table.append_include(header)
    }

    /// Record everything one extraction run produced and flush it
    pub fn record_extraction(&self, header: &str, signatures: &[Signature]) -> Result<()> {
        for signature in signatures {
            self.record(header, signature)?;
        }
        self.record_header(header)?;
        self.flush()?;

        info!(
            "Stored {} signatures from {} in {:?}",
            signatures.len(),
            header,
            self.dir()
        );
        Ok(())
    }

    /// Look up one stored signature
    pub fn signature(&self, name: &str) -> Result<Option<StoredSignature>> {
        self.table.get_signature(name)
    }

    /// All stored signatures, ordered by name
    pub fn signatures(&self) -> Result<Vec<StoredSignature>> {
        self.table.signatures()
    }

    /// Headers to include, in first-recorded order
    pub fn includes(&self) -> Result<Vec<String>> {
        self.table.includes()
    }

    /// Stub body exactly as on disk
    pub fn load_stub(&self, name: &str) -> Result<String> {
        self.stubs.read(name)
    }

    /// Every stub paired with its signature, ordered by function name.
    ///
    /// Fails if a stub file has no signature record or a record has no stub.
    pub fn entries(&self) -> Result<Vec<StoreEntry>> {
        let names = self.stubs.names()?;
        let mut entries = Vec::with_capacity(names.len());

        for name in &names {
            let record = self
                .table
                .get_signature(name)?
                .ok_or_else(|| StoreError::OrphanStub(name.clone()))?;
            entries.push(StoreEntry {
                header: record.header,
                signature: record.signature,
                stub: self.stubs.read(name)?,
            });
        }

        if let Some(record) = self
            .table
            .signatures()?
            .into_iter()
            .find(|r| !names.iter().any(|n| n == r.signature.name()))
        {
            return Err(StoreError::MissingStub(record.signature.name().to_string()));
        }

        Ok(entries)
    }

    /// Requested names with no stub in the store, sorted
    pub fn missing(&self, requested: &BTreeSet<String>) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for name in requested {
            if !self.stubs.exists(name) || self.table.get_signature(name)?.is_none() {
                missing.push(name.clone());
            }
        }
        Ok(missing)
    }

    pub fn flush(&self) -> Result<()> {
        self.table.flush()
    }

    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }
}
