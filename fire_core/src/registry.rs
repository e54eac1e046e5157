//! Signature registry: command name to [`Symbol`] for one fire target.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::docs::DocSource;
use crate::error::FireError;
use crate::introspect::{Introspectable, Shape};
use crate::symbol::{Handle, Kind, Symbol};
use crate::value::Value;

/// Every command exposed by a target, ordered by name.
///
/// Built fresh for each dispatch. Each symbol owns a handle that borrows
/// the target for `'t`.
#[derive(Debug)]
pub struct Registry<'t> {
    kind: Kind,
    symbols: BTreeMap<String, Symbol<'t>>,
}

impl<'t> Registry<'t> {
    /// Introspect `target`.
    ///
    /// A function yields exactly one entry, a method set one entry per
    /// exposed method. Any other shape is an `UnsupportedTarget` error.
    pub fn build<T>(target: &'t T) -> Result<Self, FireError>
    where
        T: Introspectable + ?Sized,
    {
        let kind = match target.shape() {
            Shape::Function => Kind::Function,
            Shape::Aggregate => Kind::Method,
            Shape::Unsupported { type_name } => {
                return Err(FireError::UnsupportedTarget { type_name });
            }
        };

        let mut signatures = target.signatures();
        if kind == Kind::Function {
            signatures.truncate(1);
        }

        let mut symbols = BTreeMap::new();
        for signature in signatures {
            let name = signature.name.clone();
            let handle: Handle<'t> = {
                let name = name.clone();
                Box::new(move |args: &[Value]| target.call(&name, args))
            };
            let symbol = Symbol::new(signature, kind, handle);
            if symbols.insert(name.clone(), symbol).is_some() {
                warn!(command = %name, "duplicate command name, keeping the last one");
            }
        }

        debug!(?kind, commands = symbols.len(), "registry built");
        Ok(Self { kind, symbols })
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol<'t>> {
        self.symbols.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol<'t>> {
        self.symbols.get_mut(name)
    }

    /// Command names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol<'t>> {
        self.symbols.values()
    }

    /// The only symbol of a function registry.
    pub fn function(&self) -> Option<&Symbol<'t>> {
        match self.kind {
            Kind::Function => self.symbols.values().next(),
            Kind::Method => None,
        }
    }

    /// Registered name matching a selector token.
    ///
    /// An exact match wins. Otherwise the selector and the names are
    /// compared after normalization, so `Add` finds `add` and
    /// `print-name` finds `print_name`.
    pub fn resolve(&self, selector: &str) -> Option<&str> {
        if let Some((name, _)) = self.symbols.get_key_value(selector) {
            return Some(name);
        }
        let wanted = normalize(selector);
        self.names().find(|name| normalize(name) == wanted)
    }

    /// Fill in documentation from `docs`, overriding what the target declared.
    pub fn apply_docs(&mut self, docs: &dyn DocSource) {
        for (name, symbol) in self.symbols.iter_mut() {
            if let Some(doc) = docs.describe(name) {
                symbol.set_doc(doc);
            }
        }
    }

    /// True when at least one command carries documentation.
    pub fn has_docs(&self) -> bool {
        self.symbols.values().any(|s| s.doc().is_some())
    }
}

/// snake_case form of a command name: `HelloWorld`, `hello-world` and
/// `HELLO_WORLD` all give `hello_world`.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c == '-' {
            out.push('_');
        } else {
            // word boundary inside CamelCase
            if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        }
        prev = Some(c);
    }
    out
}
