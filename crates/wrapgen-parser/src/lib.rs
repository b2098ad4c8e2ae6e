//! wrapgen Parser
//!
//! Recovers function signatures from C/C++ headers without a grammar:
//! the header is macro-expanded by an external compiler, then scanned for
//! declaration openers naming the requested functions.
//!
//! ## Modules
//!
//! - `preprocessor` - compiler `-E` integration
//! - `extractor` - opener scan and declaration reconstruction

pub mod extractor;
pub mod preprocessor;

pub use extractor::{DeclarationExtractor, DeclarationLine, DeclarationScanner, Extraction};
pub use preprocessor::{CompilerPreprocessor, MacroDefinition, PreprocessError, PreprocessOptions};

use std::collections::BTreeSet;
use std::path::Path;
use wrapgen_core::{Error, Result};

/// Source of macro-expanded header text
pub trait Preprocessor {
    /// Preprocess a header, returning the fully buffered output
    fn preprocess(&self, header: &Path) -> Result<String>;

    /// Get preprocessor name
    fn name(&self) -> &str;
}

/// Read the requested function names, one per line.
///
/// Blank lines and lines starting with `#` are ignored.
pub fn read_function_list(path: &Path) -> Result<BTreeSet<String>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(parse_function_list(&content))
}

/// Parse a function list from text
pub fn parse_function_list(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod basic_tests {
    use super::*;

    #[test]
    fn test_parse_function_list() {
        let names = parse_function_list("hipMalloc\n\n  hipFree  \n# comment\nhipMalloc\n");
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["hipFree".to_string(), "hipMalloc".to_string()]
        );
    }

    #[test]
    fn test_read_function_list() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("functions.txt");
        std::fs::write(&path, "foo\nbar\n").unwrap();

        let names = read_function_list(&path).unwrap();
        assert!(names.contains("foo"));
        assert!(names.contains("bar"));

        assert!(matches!(
            read_function_list(&temp.path().join("missing.txt")),
            Err(Error::FileNotFound(_))
        ));
    }
}
