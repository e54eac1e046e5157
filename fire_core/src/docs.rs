//! Optional documentation sources for help output.
//!
//! A [`DocSource`] maps a command name to a one-line description. Missing
//! entries are not errors, the command is just listed without one.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub trait DocSource {
    fn describe(&self, name: &str) -> Option<String>;
}

impl DocSource for HashMap<String, String> {
    fn describe(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl DocSource for BTreeMap<String, String> {
    fn describe(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Doc comments collected by statically scanning Rust source text.
///
/// Consecutive `///` lines are attached to the next `fn <name>`
/// declaration. Blank lines, attributes and plain `//` comments between
/// the doc block and the function are skipped. Any other line discards
/// the pending block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocs {
    entries: BTreeMap<String, String>,
}

impl SourceDocs {
    pub fn scan(source: &str) -> Self {
        let mut entries = BTreeMap::new();
        let mut pending: Vec<&str> = Vec::new();

        for line in source.lines() {
            let line = line.trim();

            if let Some(text) = doc_line(line) {
                if !text.is_empty() {
                    pending.push(text);
                }
                continue;
            }
            if line.is_empty() || line.starts_with("#[") || line.starts_with("//") {
                continue;
            }

            if let Some(name) = fn_name(line) {
                if !pending.is_empty() {
                    entries.insert(name.to_owned(), pending.join(" "));
                }
            }
            pending.clear();
        }

        Self { entries }
    }

    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self::scan(&source))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DocSource for SourceDocs {
    fn describe(&self, name: &str) -> Option<String> {
        self.entries.get(name).cloned()
    }
}

/// Text of an outer doc comment line, `None` for anything else.
fn doc_line(line: &str) -> Option<&str> {
    let text = line.strip_prefix("///")?;
    if text.starts_with('/') {
        return None;
    }
    Some(text.trim())
}

/// Name declared by a `fn` item on this line, if any.
fn fn_name(line: &str) -> Option<&str> {
    let mut words = line.split_whitespace();
    while let Some(word) = words.next() {
        if word == "fn" {
            let rest = words.next()?;
            let rest = rest.strip_prefix("r#").unwrap_or(rest);
            let end = rest
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            let name = &rest[..end];
            return (!name.is_empty()).then_some(name);
        }
        if word.starts_with("//") || (word.contains('(') && !word.starts_with("pub(")) {
            return None;
        }
    }
    None
}
