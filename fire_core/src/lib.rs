//! # fire_core
//!
//! Turns a function or a set of methods into a command-line interface.
//!
//! The target is introspected into a [`Registry`] of [`Symbol`]s. Raw
//! command-line tokens then select a symbol, are coerced to its parameter
//! types, and the results of the call are printed space separated.
//!
//! ```ignore
//! fn add(a: i64, b: i64) -> (i64, i64) {
//!     (a + b, a - b)
//! }
//!
//! // $ calc 3 5
//! // 8 -2
//! let args: Vec<String> = std::env::args().collect();
//! fire_core::fire(&Function::new(add), &args, Config::from_env())?;
//! ```
//!
//! Methods are exposed with the [`commands`] attribute:
//!
//! ```ignore
//! struct Sample;
//!
//! #[fire_core::commands]
//! impl Sample {
//!     /// Add is a method for Add.
//!     pub fn add(&self, a: i64, b: i64) -> i64 {
//!         a + b
//!     }
//! }
//!
//! // $ sample add 3 5
//! // 8
//! ```

extern crate self as fire_core;

pub mod coerce;
pub mod config;
pub mod dispatcher;
pub mod docs;
pub mod error;
pub mod introspect;
pub mod present;
pub mod registry;
pub mod symbol;
pub mod value;

use std::io::Write;

pub use coerce::{CoercionError, coerce};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use docs::{DocSource, SourceDocs};
pub use error::{FireError, InvalidReason};
pub use fire_macros::commands;
pub use introspect::{Callable, Function, Introspectable, Shape, Signature, argument};
pub use present::Presenter;
pub use registry::Registry;
pub use symbol::{Kind, Symbol};
pub use value::{IntoValue, Param, Returns, TypeTag, Value};

/// Fire `target` with `args` (program name first), printing to stdout.
///
/// Returns the produced values. Invalid command lines print usage and
/// return [`FireError::InvalidCommand`].
pub fn fire<T, S>(target: &T, args: &[S], config: Config) -> Result<Vec<Value>, FireError>
where
    T: Introspectable + ?Sized,
    S: AsRef<str>,
{
    Fire::new(target).config(config).run(args)
}

/// Configurable single dispatch of a target.
pub struct Fire<'t, 'o, T: ?Sized> {
    target: &'t T,
    config: Config,
    docs: Option<Box<dyn DocSource + 'o>>,
    presenter: Option<Presenter<'o>>,
}

impl<'t, 'o, T> Fire<'t, 'o, T>
where
    T: Introspectable + ?Sized,
{
    pub fn new(target: &'t T) -> Self {
        Self {
            target,
            config: Config::default(),
            docs: None,
            presenter: None,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Documentation for the help output. Overrides docs declared on methods.
    pub fn docs(mut self, docs: impl DocSource + 'o) -> Self {
        self.docs = Some(Box::new(docs));
        self
    }

    /// Write results and usage to `out` instead of stdout.
    pub fn output(mut self, out: impl Write + 'o) -> Self {
        self.presenter = Some(Presenter::new(out));
        self
    }

    pub fn run<S: AsRef<str>>(self, args: &[S]) -> Result<Vec<Value>, FireError> {
        let mut registry = Registry::build(self.target)?;
        if let Some(docs) = &self.docs {
            registry.apply_docs(&**docs);
        }
        let presenter = self.presenter.unwrap_or_else(Presenter::stdout);
        Dispatcher::new(registry, self.config, presenter).dispatch(args)
    }
}
