//! Compiler Preprocessor Integration
//!
//! Runs an external compiler driver (`hipcc`, `clang`, `gcc`, ...) with `-E`
//! to obtain the macro-expanded text of a header.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, warn};
use wrapgen_core::config::PreprocessorConfig;

use super::macros::MacroDefinition;
use crate::Preprocessor;

/// Errors that can occur during preprocessing
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Compiler not found: {0}")]
    CompilerNotFound(String),

    #[error("Preprocessing failed: {0}")]
    PreprocessFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid source file: {0}")]
    InvalidSource(String),

    #[error("Invalid macro definition: {0:?}")]
    InvalidMacro(String),
}

impl From<PreprocessError> for wrapgen_core::Error {
    fn from(err: PreprocessError) -> Self {
        wrapgen_core::Error::Preprocess(err.to_string())
    }
}

/// Options for preprocessing
#[derive(Debug, Clone, Default)]
pub struct PreprocessOptions {
    /// Include arguments (`-I...`), passed through as given
    pub includes: Vec<String>,
    /// Macro definitions (-D/-U flags)
    pub defines: Vec<MacroDefinition>,
    /// Additional compiler arguments
    pub extra_args: Vec<String>,
}

impl PreprocessOptions {
    /// Build options from the `preprocessor` section of the configuration
    pub fn from_config(config: &PreprocessorConfig) -> Result<Self, PreprocessError> {
        let defines = config
            .defines
            .iter()
            .map(|d| d.parse())
            .collect::<Result<Vec<MacroDefinition>, _>>()?;

        Ok(Self {
            includes: config.includes.clone(),
            defines,
            extra_args: config.extra_args.clone(),
        })
    }
}

/// Result of preprocessing
#[derive(Debug)]
pub struct PreprocessResult {
    /// Preprocessed source code
    pub code: String,
    /// Warnings generated during preprocessing
    pub warnings: Vec<String>,
}

/// Compiler driver used as a preprocessor
pub struct CompilerPreprocessor {
    /// Path to the compiler executable
    compiler: PathBuf,
    options: PreprocessOptions,
}

impl CompilerPreprocessor {
    /// Create a preprocessor for the given compiler
    pub fn new(compiler: PathBuf, options: PreprocessOptions) -> Self {
        Self { compiler, options }
    }

    /// Create a preprocessor from configuration
    pub fn from_config(config: &PreprocessorConfig) -> Result<Self, PreprocessError> {
        Ok(Self::new(
            config.compiler.clone(),
            PreprocessOptions::from_config(config)?,
        ))
    }

    /// Preprocess a header file. Blocks until the compiler exits.
    pub fn preprocess_file(&self, header: &Path) -> Result<PreprocessResult, PreprocessError> {
        if !header.exists() {
            return Err(PreprocessError::InvalidSource(format!(
                "File not found: {:?}",
                header
            )));
        }

        let args = self.build_args();
        debug!("Preprocessing {:?} with {:?} {:?}", header, self.compiler, args);

        let output = Command::new(&self.compiler)
            .arg("-E")
            .arg(header)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    PreprocessError::CompilerNotFound(self.compiler.display().to_string())
                }
                _ => PreprocessError::IoError(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PreprocessError::PreprocessFailed(stderr.to_string()));
        }

        let code = String::from_utf8_lossy(&output.stdout).to_string();
        let warnings = parse_warnings(&output.stderr);
        for warning in &warnings {
            warn!("{}", warning);
        }

        Ok(PreprocessResult { code, warnings })
    }

    /// Build compiler arguments following the header path
    fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        // An include entry may hold several flags, e.g. "-I/a -I/b"
        for include in &self.options.includes {
            args.extend(include.split_whitespace().map(String::from));
        }

        for macro_def in &self.options.defines {
            args.push(macro_def.to_arg());
        }

        args.extend(self.options.extra_args.iter().cloned());
        args
    }
}

impl Preprocessor for CompilerPreprocessor {
    fn preprocess(&self, header: &Path) -> wrapgen_core::Result<String> {
        Ok(self.preprocess_file(header)?.code)
    }

    fn name(&self) -> &str {
        "compiler"
    }
}

/// Parse warnings from stderr
fn parse_warnings(stderr: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stderr)
        .lines()
        .filter(|line| line.contains("warning:"))
        .map(|s| s.to_string())
        .collect()
}
