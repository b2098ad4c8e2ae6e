//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// wrapgen configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preprocessor configuration
    pub preprocessor: PreprocessorConfig,

    /// Stub store configuration
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Preprocessor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Compiler used to run `-E` on the header
    pub compiler: PathBuf,

    /// Include arguments passed verbatim (e.g. `-I/opt/rocm/include/`)
    pub includes: Vec<String>,

    /// Macro definitions, `NAME` or `NAME=VALUE`
    pub defines: Vec<String>,

    /// Additional compiler arguments
    pub extra_args: Vec<String>,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            compiler: PathBuf::from("/opt/rocm/bin/hipcc"),
            includes: vec!["-I/opt/rocm/include/".into()],
            defines: vec![],
            extra_args: vec![],
        }
    }
}

/// Stub store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// File extension of editable stub bodies
    pub stub_extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            stub_extension: ".cpp".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.preprocessor.compiler, PathBuf::from("/opt/rocm/bin/hipcc"));
        assert_eq!(config.preprocessor.includes, vec!["-I/opt/rocm/include/".to_string()]);
        assert_eq!(config.store.stub_extension, ".cpp");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
preprocessor:
  compiler: /usr/bin/clang
  defines:
    - __HIP_PLATFORM_AMD__
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.preprocessor.compiler, PathBuf::from("/usr/bin/clang"));
        assert_eq!(config.preprocessor.defines, vec!["__HIP_PLATFORM_AMD__".to_string()]);
        assert_eq!(config.preprocessor.includes, vec!["-I/opt/rocm/include/".to_string()]);
        assert_eq!(config.store.stub_extension, ".cpp");
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_yaml_file(Path::new("/nonexistent/wrapgen.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wrapgen.yaml");
        std::fs::write(&path, "store:\n  stub_extension: .c\n").unwrap();

        let config = Config::from_yaml_file(&path).unwrap();
        assert_eq!(config.store.stub_extension, ".c");
    }
}
