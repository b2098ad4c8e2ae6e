//! Editable stub files
//!
//! One file per function holds the body of its intercepting definition.
//! Operators edit these between extraction and generation.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use wrapgen_core::Signature;

use crate::{Result, StoreError};

/// Default body for a freshly extracted function: call the original and
/// return its result.
pub fn default_stub(header: &str, signature: &Signature) -> String {
    let name = signature.name();
    let original = signature.original_pointer();
    let params = signature.call_arguments();

    if signature.returns_void() {
        format!(
            "\t// {header} wrapper - stub body for {name}\n\
             \t// Write your own code here\n\
             \t{original}({params});"
        )
    } else {
        let local = result_local(signature);
        format!(
            "\t// {header} wrapper - stub body for {name}\n\
             \t{ty} {local};\n\
             \t// Write your own code here\n\
             \t{local} = {original}({params});\n\
             \treturn {local};",
            ty = signature.return_type()
        )
    }
}

/// `ret`, with underscores appended until no parameter shares the name
fn result_local(signature: &Signature) -> String {
    let mut local = String::from("ret");
    while signature.parameter_names().iter().any(|p| *p == local) {
        local.push('_');
    }
    local
}

/// Directory of stub files sharing one extension
pub struct StubDirectory {
    dir: PathBuf,
    extension: String,
}

impl StubDirectory {
    pub fn new(dir: &Path, extension: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the stub file for a function
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", name, self.extension))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Write (overwrite) a stub body
    pub fn write(&self, name: &str, body: &str) -> Result<()> {
        fs::write(self.path_for(name), body)?;
        Ok(())
    }

    /// Read a stub body verbatim
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(StoreError::MissingStub(name.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Function names with a stub file, sorted
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if let Some(name) = file_name.strip_suffix(self.extension.as_str()) {
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }
}
