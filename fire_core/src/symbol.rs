//! Callable descriptor: one named command of a registry.

use core::fmt;

use crate::coerce::coerce_all;
use crate::error::FireError;
use crate::introspect::Signature;
use crate::value::{TypeTag, Value};

/// Owned invocation handle of a symbol.
pub type Handle<'t> = Box<dyn Fn(&[Value]) -> Result<Vec<Value>, FireError> + 't>;

/// Documentation shown for commands that have none, once any command has some.
pub const NO_DESCRIPTION: &str = "No description available";

/// Whether a command is a free function or a method of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Function,
    Method,
}

impl Kind {
    /// Raw argument slots consumed before the first parameter.
    ///
    /// The program name always takes one. A method also needs its
    /// selector token.
    pub const fn selector_slots(&self) -> usize {
        match self {
            Kind::Function => 1,
            Kind::Method => 2,
        }
    }
}

/// An introspected, invocable command.
///
/// The arguments are bound with [`Symbol::bind`] right before
/// [`Symbol::invoke`], which consumes them.
pub struct Symbol<'t> {
    name: String,
    kind: Kind,
    params: Vec<TypeTag>,
    returns: Vec<TypeTag>,
    doc: Option<String>,
    handle: Handle<'t>,
    bound: Option<Vec<Value>>,
}

impl<'t> Symbol<'t> {
    pub fn new(signature: Signature, kind: Kind, handle: Handle<'t>) -> Self {
        let Signature { name, params, returns, doc } = signature;
        Self {
            name,
            kind,
            params,
            returns,
            doc,
            handle,
            bound: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn param_type(&self, index: usize) -> Option<TypeTag> {
        self.params.get(index).copied()
    }

    pub fn param_types(&self) -> &[TypeTag] {
        &self.params
    }

    pub fn return_types(&self) -> &[TypeTag] {
        &self.returns
    }

    pub fn num_returns(&self) -> usize {
        self.returns.len()
    }

    /// Length the raw argument list must have to call this command.
    pub fn required_tokens(&self) -> usize {
        self.num_params() + self.kind.selector_slots()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Documentation text, or the placeholder when there is none.
    pub fn documentation(&self) -> &str {
        self.doc().unwrap_or(NO_DESCRIPTION)
    }

    pub fn set_doc(&mut self, doc: impl Into<String>) {
        self.doc = Some(doc.into());
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Coerce `tokens` positionally and keep them as pending arguments.
    pub fn bind<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), FireError> {
        self.bound = None;
        if tokens.len() != self.params.len() {
            return Err(FireError::ArgumentCount {
                command: self.name.clone(),
                expected: self.params.len(),
                got: tokens.len(),
            });
        }
        self.bound = Some(coerce_all(tokens, &self.params)?);
        Ok(())
    }

    /// Call the underlying callable with the bound arguments.
    pub fn invoke(&mut self) -> Result<Vec<Value>, FireError> {
        let args = self.bound.take().ok_or_else(|| FireError::Unbound {
            command: self.name.clone(),
        })?;
        (self.handle)(&args)
    }
}

impl fmt::Debug for Symbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("doc", &self.doc)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}
