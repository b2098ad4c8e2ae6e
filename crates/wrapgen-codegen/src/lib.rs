//! wrapgen Codegen
//!
//! Assembles the interception wrapper: a prologue with the recorded
//! includes, one original-pointer declaration and intercepting definition
//! per stored function, and a constructor resolving every original symbol
//! with `dlsym(RTLD_NEXT, ...)` when the library is loaded.

use std::path::Path;
use thiserror::Error;
use tracing::info;
use wrapgen_store::{SignatureStore, StoreEntry, StoreError};

pub mod templates;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodegenError {
    /// Whether generation ran before any extraction
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, CodegenError::Store(StoreError::NotInitialized(_)))
    }
}

pub type Result<T> = std::result::Result<T, CodegenError>;

/// Wrapper source generator
pub struct WrapperGenerator {
    init_function: String,
}

impl WrapperGenerator {
    pub fn new() -> Self {
        Self {
            init_function: templates::INIT_FUNCTION.to_string(),
        }
    }

    /// Use a different name for the load-time constructor
    pub fn with_init_function(mut self, name: &str) -> Self {
        self.init_function = name.to_string();
        self
    }

    /// Render the wrapper source. Output depends only on the arguments.
    pub fn render(&self, includes: &[String], entries: &[StoreEntry]) -> String {
        let mut source = String::from(templates::LIB_HEADER);
        for header in includes {
            source.push_str(&templates::include(header));
        }

        let mut lookups = String::new();
        for entry in entries {
            let signature = &entry.signature;
            source.push_str(&templates::function(
                &signature.pointer_declaration(),
                &signature.prototype(),
                &entry.stub,
            ));
            lookups.push_str(&templates::init_lookup(
                signature.name(),
                &signature.original_pointer(),
                &signature.pointer_cast(),
            ));
        }

        source.push_str(&templates::init_header(&self.init_function));
        source.push_str(&lookups);
        source.push_str(templates::INIT_FOOTER);
        source
    }

    /// Render everything in the store
    pub fn render_store(&self, store: &SignatureStore) -> Result<String> {
        let includes = store.includes()?;
        let entries = store.entries()?;
        Ok(self.render(&includes, &entries))
    }

    /// Generate the wrapper for a store directory, overwriting `output`.
    ///
    /// Nothing is written unless the store was populated by an extraction
    /// run and is consistent.
    pub fn generate(&self, store_dir: &Path, extension: &str, output: &Path) -> Result<usize> {
        let store = SignatureStore::open_existing(store_dir, extension)?;
        let source = self.render_store(&store)?;
        std::fs::write(output, &source)?;

        let count = store.stats().signatures_count;
        info!("Wrote wrapper for {} functions to {:?}", count, output);
        Ok(count)
    }
}

impl Default for WrapperGenerator {
    fn default() -> Self {
        Self::new()
    }
}
