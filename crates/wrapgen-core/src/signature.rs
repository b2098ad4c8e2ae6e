//! Function signature model
//!
//! A [`Signature`] is recovered from the text of one C declaration without a
//! grammar: the return type is whatever precedes the function name, and each
//! comma-separated parameter must carry both a type and a declarator name.
//! Anything that does not fit this shape is rejected with a
//! [`DeclarationError`] instead of being guessed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of the static variable holding the resolved original function
pub const ORIGINAL_PREFIX: &str = "orig_";

/// Keywords that can never be a parameter's declarator name
const TYPE_KEYWORDS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "bool",
    "_Bool", "const", "volatile", "restrict", "__restrict", "struct", "union", "enum",
    "register", "auto",
];

/// Storage classes dropped from the front of a return type
const STORAGE_CLASSES: &[&str] = &["extern \"C\"", "extern"];

/// Reasons a declaration cannot be turned into a [`Signature`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("`{0}` is not followed by a parameter list")]
    NameNotFound(String),

    #[error("declaration of `{0}` has no return type")]
    MissingReturnType(String),

    #[error("unbalanced parameter list for `{0}`")]
    UnbalancedParameters(String),

    #[error("ambiguous parameter `{0}` (type and name cannot be told apart)")]
    AmbiguousParameter(String),

    #[error("invalid parameter name in `{0}`")]
    InvalidParameterName(String),
}

/// Signature of one interceptable function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    name: String,
    return_type: String,
    parameter_names: Vec<String>,
    /// Parameter declarations with default values removed
    arguments: Vec<String>,
    /// Reconstructed declaration, whitespace collapsed
    declaration: String,
}

impl Signature {
    /// Build a signature for `name` from the declaration text containing it.
    pub fn parse(name: &str, declaration: &str) -> Result<Self, DeclarationError> {
        let declaration = collapse_whitespace(declaration);

        let (start, open) = find_declarator(&declaration, name)
            .ok_or_else(|| DeclarationError::NameNotFound(name.to_string()))?;
        let close = matching_paren(&declaration, open)
            .ok_or_else(|| DeclarationError::UnbalancedParameters(name.to_string()))?;

        let return_type = strip_storage_class(&declaration[..start]);
        if return_type.is_empty() {
            return Err(DeclarationError::MissingReturnType(name.to_string()));
        }

        let parameter_list = declaration[open + 1..close].trim();
        let mut arguments = Vec::new();
        let mut parameter_names = Vec::new();
        if !parameter_list.is_empty() {
            for raw in split_top_level(parameter_list) {
                let argument = strip_default(raw);
                parameter_names.push(declarator_name(argument)?);
                arguments.push(argument.to_string());
            }
        }

        Ok(Self {
            name: name.to_string(),
            return_type: return_type.to_string(),
            parameter_names,
            arguments,
            declaration,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    /// Whether the function returns nothing
    pub fn returns_void(&self) -> bool {
        self.return_type == "void"
    }

    /// Name of the static pointer to the original function
    pub fn original_pointer(&self) -> String {
        format!("{}{}", ORIGINAL_PREFIX, self.name)
    }

    /// Parameter names joined for a call expression
    pub fn call_arguments(&self) -> String {
        self.parameter_names.join(", ")
    }

    /// `ret name(args)`
    pub fn prototype(&self) -> String {
        format!("{} {}({})", self.return_type, self.name, self.arguments.join(", "))
    }

    /// `ret (*orig_name)(args)`
    pub fn pointer_declaration(&self) -> String {
        format!(
            "{} (*{})({})",
            self.return_type,
            self.original_pointer(),
            self.arguments.join(", ")
        )
    }

    /// `ret (*)(args)`, used to cast the result of the symbol lookup
    pub fn pointer_cast(&self) -> String {
        format!("{} (*)({})", self.return_type, self.arguments.join(", "))
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prototype())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(is_ident_char),
        _ => false,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte offsets of the name and of the `(` that follows it
fn find_declarator(text: &str, name: &str) -> Option<(usize, usize)> {
    if name.is_empty() {
        return None;
    }
    let mut from = 0;
    while let Some(pos) = text[from..].find(name) {
        let start = from + pos;
        let end = start + name.len();
        let preceded = text[..start].chars().next_back().is_some_and(is_ident_char);
        let rest = &text[end..];
        let after = rest.trim_start();
        if !preceded && after.starts_with('(') {
            return Some((start, end + (rest.len() - after.len())));
        }
        from = end;
    }
    None
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_storage_class(text: &str) -> &str {
    let mut ty = text.trim();
    while let Some(rest) = STORAGE_CLASSES.iter().find_map(|class| {
        ty.strip_prefix(class)
            .filter(|rest| !rest.starts_with(is_ident_char))
    }) {
        ty = rest.trim_start();
    }
    ty
}

/// Split on commas not nested inside parentheses or brackets
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

fn strip_default(argument: &str) -> &str {
    match argument.find('=') {
        Some(pos) => argument[..pos].trim(),
        None => argument.trim(),
    }
}

fn strip_array_suffix(mut argument: &str) -> &str {
    while argument.ends_with(']') {
        match argument.rfind('[') {
            Some(pos) => argument = argument[..pos].trim_end(),
            None => break,
        }
    }
    argument
}

/// Declarator name of one parameter; a lone token is a type without a name.
fn declarator_name(argument: &str) -> Result<String, DeclarationError> {
    let declarator = strip_array_suffix(argument).replace(['*', '&'], " ");
    let tokens: Vec<&str> = declarator.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(DeclarationError::AmbiguousParameter(argument.to_string()));
    }
    let name = tokens[tokens.len() - 1];
    if !is_identifier(name) || TYPE_KEYWORDS.contains(&name) {
        return Err(DeclarationError::InvalidParameterName(argument.to_string()));
    }
    Ok(name.to_string())
}
