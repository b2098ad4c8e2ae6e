//! C Preprocessor Integration
//!
//! Obtains macro-expanded header text by running an external compiler
//! driver with `-E`.

pub mod compiler;
pub mod macros;

pub use compiler::{CompilerPreprocessor, PreprocessError, PreprocessOptions, PreprocessResult};
pub use macros::MacroDefinition;
