//! Declaration extraction from preprocessed headers
//!
//! The preprocessed text is viewed twice: in full, and filtered down to the
//! lines that look like the start of a function declaration. Each opener that
//! names a still-requested function is grown line by line in the full text
//! until a `;` or a `{` closes it, and the result is handed to
//! [`Signature::parse`].

use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};
use wrapgen_core::{Result, Signature};

use crate::Preprocessor;

/// Optional `extern "C"`, type tokens (a word followed by spaces or stars),
/// then the declarator and `(`
const OPENER_PATTERN: &str = r#"^(?:extern\s*"C"\s*)?(?:\w+(?:\s+|\s*\*+\s*))+\w+\s*\("#;

/// Identifier immediately followed by a parameter list
const CALL_PATTERN: &str = r"(\w+)\s*\(";

/// Lines containing any of these tokens are never interception candidates
const EXCLUDED_TOKENS: &[&str] = &[
    "static",
    "inline",
    "__inline",
    "__inline__",
    "__forceinline",
    "typedef",
];

/// A line of the filtered view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationLine<'a> {
    /// 1-based line number in the preprocessed text
    pub number: usize,
    pub text: &'a str,
}

/// Outcome of one extraction run
#[derive(Debug, Default, Clone)]
pub struct Extraction {
    /// Signatures in the order their declarations appear in the header
    pub signatures: Vec<Signature>,
    /// Requested names that were not found
    pub remaining: BTreeSet<String>,
}

/// Scans preprocessed text for function declarations
pub struct DeclarationScanner {
    opener: Regex,
    call: Regex,
}

impl DeclarationScanner {
    pub fn new() -> Self {
        Self {
            opener: Regex::new(OPENER_PATTERN).expect("opener pattern is valid"),
            call: Regex::new(CALL_PATTERN).expect("call pattern is valid"),
        }
    }

    /// Filtered view: lines that open a declaration, with their line numbers
    pub fn openers<'a>(&self, text: &'a str) -> Vec<DeclarationLine<'a>> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| self.opener.is_match(line))
            .map(|(i, line)| DeclarationLine {
                number: i + 1,
                text: line,
            })
            .collect()
    }

    /// Extract signatures for the requested names.
    ///
    /// Takes the worklist by value and hands back what is left of it: a name
    /// leaves `remaining` only when a signature was built for it.
    pub fn extract(&self, preprocessed: &str, mut requested: BTreeSet<String>) -> Extraction {
        let lines: Vec<&str> = preprocessed.lines().collect();
        let mut signatures = Vec::new();

        for opener in self.openers(preprocessed) {
            if requested.is_empty() {
                break;
            }
            let Some(name) = self.declared_name(opener.text, &requested) else {
                continue;
            };
            if is_excluded(opener.text) {
                debug!("Skipping {} at line {}: not externally resolvable", name, opener.number);
                continue;
            }

            let Some(declaration) = collect_declaration(&lines, opener.number) else {
                debug!("Declaration of {} at line {} is never terminated", name, opener.number);
                continue;
            };

            match Signature::parse(&name, &declaration) {
                Ok(signature) => {
                    debug!("Found {} at line {}", signature, opener.number);
                    requested.remove(&name);
                    signatures.push(signature);
                }
                Err(e) => {
                    warn!("Rejected {} at line {}: {}", name, opener.number, e);
                }
            }
        }

        Extraction {
            signatures,
            remaining: requested,
        }
    }

    /// First requested identifier on the line that is followed by `(`
    fn declared_name(&self, line: &str, requested: &BTreeSet<String>) -> Option<String> {
        self.call
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|ident| requested.contains(*ident))
            .map(String::from)
    }
}

impl Default for DeclarationScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn is_excluded(line: &str) -> bool {
    line.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|token| EXCLUDED_TOKENS.contains(&token))
}

/// Join lines from `start` (1-based) until a `;` or `{`; the text is cut at
/// the first of them and re-terminated with `;`.
fn collect_declaration(lines: &[&str], start: usize) -> Option<String> {
    let mut buffer = String::new();
    for line in lines.iter().skip(start.saturating_sub(1)) {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(line);

        if let Some(end) = buffer.find([';', '{']) {
            buffer.truncate(end);
            let mut declaration = buffer.trim().to_string();
            declaration.push(';');
            return Some(declaration);
        }
    }
    None
}

/// Runs the preprocessor on a header and extracts the requested signatures
pub struct DeclarationExtractor<P: Preprocessor> {
    preprocessor: P,
    scanner: DeclarationScanner,
}

impl<P: Preprocessor> DeclarationExtractor<P> {
    pub fn new(preprocessor: P) -> Self {
        Self {
            preprocessor,
            scanner: DeclarationScanner::new(),
        }
    }

    pub fn preprocessor(&self) -> &P {
        &self.preprocessor
    }

    pub fn extract_header(&self, header: &Path, requested: BTreeSet<String>) -> Result<Extraction> {
        let preprocessed = self.preprocessor.preprocess(header)?;
        let requested_count = requested.len();
        let extraction = self.scanner.extract(&preprocessed, requested);

        info!(
            "{}: {} of {} functions found ({} preprocessor)",
            header.display(),
            extraction.signatures.len(),
            requested_count,
            self.preprocessor.name()
        );
        Ok(extraction)
    }
}
