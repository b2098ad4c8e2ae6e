//! Macro definitions passed to the preprocessor

use std::str::FromStr;

use super::compiler::PreprocessError;

/// A macro definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDefinition {
    pub name: String,
    pub value: Option<String>,
}

impl MacroDefinition {
    /// Create a macro that is simply defined
    pub fn defined(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Some("1".to_string()),
        }
    }

    /// Create a macro with a specific value
    pub fn with_value(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }

    /// Create an undefined macro (for -U flag)
    pub fn undefined(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }

    /// Convert to a -D/-U compiler argument
    pub fn to_arg(&self) -> String {
        match &self.value {
            Some(v) => format!("-D{}={}", self.name, v),
            None => format!("-U{}", self.name),
        }
    }
}

impl FromStr for MacroDefinition {
    type Err = PreprocessError;

    /// Parse `NAME` or `NAME=VALUE`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, value) = match s.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (s, None),
        };

        let valid = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(PreprocessError::InvalidMacro(s.to_string()));
        }

        Ok(match value {
            Some(value) => Self::with_value(name, value),
            None => Self::defined(name),
        })
    }
}
