//! Dispatcher: resolve, check arity, coerce, invoke, present.
//!
//! ```text
//! Idle -> ResolvingCommand -> ValidatingArity -> Coercing -> Invoking -> Presenting -> Done
//!              |                    |
//!              +------> Invalid <---+
//! ```
//!
//! `Invalid` prints usage and ends the dispatch with
//! [`FireError::InvalidCommand`]. A token that fails coercion also prints
//! usage and ends with [`FireError::Coercion`].

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{FireError, InvalidReason};
use crate::present::{Presenter, program_name};
use crate::registry::Registry;
use crate::symbol::Kind;
use crate::value::Value;

/// Dispatch states, reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    ResolvingCommand,
    ValidatingArity,
    Coercing,
    Invoking,
    Presenting,
    Done,
    Invalid,
}

/// Runs one command line against a registry.
pub struct Dispatcher<'t, 'o> {
    registry: Registry<'t>,
    config: Config,
    presenter: Presenter<'o>,
}

impl<'t, 'o> Dispatcher<'t, 'o> {
    pub fn new(registry: Registry<'t>, config: Config, presenter: Presenter<'o>) -> Self {
        Self { registry, config, presenter }
    }

    pub fn registry(&self) -> &Registry<'t> {
        &self.registry
    }

    /// Dispatch `args`, where `args[0]` is the program name.
    pub fn dispatch<S: AsRef<str>>(mut self, args: &[S]) -> Result<Vec<Value>, FireError> {
        let program = program_name(args);
        debug!(state = ?State::Idle, %program, tokens = args.len(), "dispatch started");

        debug!(state = ?State::ResolvingCommand, kind = ?self.registry.kind());
        let name = match self.resolve(args) {
            Ok(name) => name,
            Err(reason) => return self.reject(&program, reason),
        };

        debug!(state = ?State::ValidatingArity, command = %name);
        let Some(symbol) = self.registry.get_mut(&name) else {
            return self.reject(&program, InvalidReason::UnknownCommand(name));
        };
        let expected = symbol.required_tokens();
        if args.len() != expected {
            let reason = InvalidReason::ArityMismatch { expected, got: args.len() };
            return self.reject(&program, reason);
        }

        debug!(state = ?State::Coercing, command = %name);
        let offset = symbol.kind().selector_slots();
        if let Err(err) = symbol.bind(&args[offset..]) {
            warn!(command = %name, error = %err, "argument coercion failed");
            self.presenter.usage(&program, &self.registry)?;
            return Err(err);
        }

        debug!(state = ?State::Invoking, command = %name);
        let results = symbol.invoke()?;

        debug!(state = ?State::Presenting, results = results.len(), suppressed = self.config.suppress_results);
        if !self.config.suppress_results {
            self.presenter.results(&results)?;
        }

        debug!(state = ?State::Done, command = %name);
        Ok(results)
    }

    /// Name of the command selected by `args`.
    fn resolve<S: AsRef<str>>(&self, args: &[S]) -> Result<String, InvalidReason> {
        match self.registry.kind() {
            Kind::Function => self
                .registry
                .function()
                .map(|symbol| symbol.name().to_owned())
                .ok_or(InvalidReason::MissingCommand),
            Kind::Method => {
                let selector: &str = args.get(1).map(|s| s.as_ref()).ok_or(InvalidReason::MissingCommand)?;
                self.registry
                    .resolve(selector)
                    .map(str::to_owned)
                    .ok_or_else(|| InvalidReason::UnknownCommand(selector.to_owned()))
            }
        }
    }

    fn reject(mut self, program: &str, reason: InvalidReason) -> Result<Vec<Value>, FireError> {
        warn!(state = ?State::Invalid, ?reason, "invalid command");
        self.presenter.usage(program, &self.registry)?;
        Err(FireError::InvalidCommand { reason })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::coerce::CoercionError;
    use crate::introspect::{Function, Introspectable, Shape, Signature};
    use crate::value::TypeTag;

    // Calls observed by the sample targets, keyed by command name
    static CALL_LOG: Mutex<Option<HashMap<String, Vec<String>>>> = Mutex::new(None);

    fn record_call(name: &str, args: &[Value]) {
        let mut log = CALL_LOG.lock().unwrap();
        let rendered = args.iter().map(Value::to_string).collect::<Vec<_>>().join(",");
        log.get_or_insert_with(HashMap::new)
            .entry(name.to_string())
            .or_default()
            .push(rendered);
    }

    fn get_calls(name: &str) -> Vec<String> {
        let log = CALL_LOG.lock().unwrap();
        log.as_ref().and_then(|map| map.get(name).cloned()).unwrap_or_default()
    }

    struct SampleStruct;

    impl Introspectable for SampleStruct {
        fn shape(&self) -> Shape {
            Shape::Aggregate
        }

        fn signatures(&self) -> Vec<Signature> {
            let int2 = |name: &str| Signature {
                name: name.into(),
                params: vec![TypeTag::I64, TypeTag::I64],
                returns: vec![TypeTag::I64],
                doc: None,
            };
            vec![
                int2("add"),
                int2("minus"),
                Signature {
                    name: "string".into(),
                    params: vec![TypeTag::Str],
                    returns: vec![TypeTag::Str],
                    doc: None,
                },
                Signature {
                    name: "touch".into(),
                    params: vec![],
                    returns: vec![],
                    doc: None,
                },
            ]
        }

        fn call(&self, name: &str, args: &[Value]) -> Result<Vec<Value>, FireError> {
            record_call(name, args);
            let int = |i: usize| args.get(i).and_then(Value::as_i64).unwrap_or_default();
            match name {
                "add" => Ok(vec![Value::Int(int(0) + int(1))]),
                "minus" => Ok(vec![Value::Int(int(0) - int(1))]),
                "string" => Ok(vec![Value::Str(args[0].to_string().to_uppercase())]),
                "touch" => Ok(vec![]),
                _ => Err(FireError::unknown_command(name)),
            }
        }
    }

    fn func1(a: i64, b: i64) -> (i64, i64) {
        (a + b, a - b)
    }

    fn func2(a: f64, b: f64) -> (f64, f64) {
        (a + b, a - b)
    }

    fn run<T: Introspectable + ?Sized>(target: &T, args: &[&str], config: Config) -> (Result<Vec<Value>, FireError>, String) {
        let mut out = Vec::new();
        let result = {
            let registry = Registry::build(target).unwrap();
            Dispatcher::new(registry, config, Presenter::new(&mut out)).dispatch(args)
        };
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_function_happy_path() {
        let (result, out) = run(&Function::new(func1), &["TestFunc1", "3", "5"], Config::default());
        assert_eq!(result.unwrap(), vec![Value::Int(8), Value::Int(-2)]);
        assert_eq!(out, "8 -2\n");
    }

    #[test]
    fn test_function_floats() {
        let (result, out) = run(&Function::new(func2), &["TestFunc2", "3.5", "5.4"], Config::default());
        let (sum, diff) = func2(3.5, 5.4);
        assert_eq!(result.unwrap(), vec![Value::F64(sum), Value::F64(diff)]);
        assert_eq!(out, format!("{sum} {diff}\n"));
    }

    #[test]
    fn test_function_wrong_arity() {
        let (result, out) = run(&Function::new(func1), &["prog", "3"], Config::default());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            FireError::InvalidCommand { reason: InvalidReason::ArityMismatch { expected: 3, got: 2 } }
        ));
        assert_eq!(err.to_string(), "Invalid command");
        assert_eq!(out, "Usage:  prog i64 i64\n");
    }

    #[test]
    fn test_function_malformed_token() {
        let (result, out) = run(&Function::new(func1), &["prog", "3", "abc"], Config::default());
        assert!(matches!(result, Err(FireError::Coercion(CoercionError::Malformed { .. }))));
        assert_eq!(out, "Usage:  prog i64 i64\n");
    }

    #[test]
    fn test_method_add_and_minus() {
        let (result, out) = run(&SampleStruct, &["TestSampleStruct", "Add", "3", "5"], Config::default());
        assert_eq!(result.unwrap(), vec![Value::Int(8)]);
        assert_eq!(out, "8\n");
        assert!(get_calls("add").contains(&"3,5".to_string()));

        let (result, _) = run(&SampleStruct, &["TestSampleStruct", "minus", "3", "5"], Config::default());
        assert_eq!(result.unwrap(), vec![Value::Int(-2)]);
    }

    #[test]
    fn test_method_string() {
        let (result, out) = run(&SampleStruct, &["TestSampleStruct", "String", "hello, world"], Config::default());
        assert_eq!(result.unwrap(), vec![Value::Str("HELLO, WORLD".into())]);
        assert_eq!(out, "HELLO, WORLD\n");
    }

    #[test]
    fn test_method_wrong_command() {
        let (result, out) = run(&SampleStruct, &["TestSampleStruct", "Wrong", "3", "5"], Config::default());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            FireError::InvalidCommand { reason: InvalidReason::UnknownCommand(ref s) } if s == "Wrong"
        ));
        assert!(out.starts_with("Usage:  TestSampleStruct\n"));
        assert!(out.contains("TestSampleStruct add i64 i64\n"));
        assert!(get_calls("Wrong").is_empty());
    }

    #[test]
    fn test_method_missing_selector() {
        let (result, out) = run(&SampleStruct, &["prog"], Config::default());
        assert!(matches!(
            result,
            Err(FireError::InvalidCommand { reason: InvalidReason::MissingCommand })
        ));
        assert!(out.starts_with("Usage:  prog\n"));
    }

    #[test]
    fn test_method_wrong_arity() {
        let (result, _) = run(&SampleStruct, &["prog", "add", "3"], Config::default());
        assert!(matches!(
            result,
            Err(FireError::InvalidCommand { reason: InvalidReason::ArityMismatch { expected: 4, got: 3 } })
        ));

        let (result, _) = run(&SampleStruct, &["prog", "add", "3", "5", "7"], Config::default());
        assert!(result.unwrap_err().is_invalid_command());
    }

    #[test]
    fn test_method_without_results_prints_nothing() {
        let (result, out) = run(&SampleStruct, &["prog", "touch"], Config::default());
        assert!(result.unwrap().is_empty());
        assert_eq!(out, "");
        assert!(!get_calls("touch").is_empty());
    }

    #[test]
    fn test_suppressed_results_are_still_returned() {
        let (loud, loud_out) = run(&Function::new(func1), &["prog", "3", "5"], Config::default());
        let (quiet, quiet_out) = run(&Function::new(func1), &["prog", "3", "5"], Config::quiet());
        assert_eq!(loud.unwrap(), quiet.unwrap());
        assert_eq!(loud_out, "8 -2\n");
        assert_eq!(quiet_out, "");
    }
}
