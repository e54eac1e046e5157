//! The introspection seam between a target and the dispatcher.
//!
//! A target describes itself through [`Introspectable`]: what shape it has,
//! which named callables it exposes with which parameter and return types,
//! and how to call one of them with already coerced values.
//!
//! Free functions are wrapped in [`Function`], which reads the signature
//! from the `Fn` bound. Method sets get their implementation from the
//! `#[commands]` attribute.

use core::any::type_name;
use core::marker::PhantomData;

use crate::error::FireError;
use crate::value::{Param, Returns, TypeTag, Value};

/// Classification of a fire target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single callable.
    Function,
    /// A value exposing named methods.
    Aggregate,
    /// Anything else. Registry construction fails for these.
    Unsupported { type_name: &'static str },
}

/// Introspected signature of one exposed callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<TypeTag>,
    pub returns: Vec<TypeTag>,
    pub doc: Option<String>,
}

pub trait Introspectable {
    fn shape(&self) -> Shape;

    /// Every exposed callable, in declaration order.
    fn signatures(&self) -> Vec<Signature>;

    /// Call `name` with values already coerced to its parameter types.
    fn call(&self, name: &str, args: &[Value]) -> Result<Vec<Value>, FireError>;
}

/// Fetch argument `index` of `command` as `T`.
///
/// Used by the code `#[commands]` generates.
#[doc(hidden)]
pub fn argument<'a, T: Param<'a>>(command: &str, args: &'a [Value], index: usize) -> Result<T, FireError> {
    args.get(index)
        .and_then(T::from_value)
        .ok_or_else(|| FireError::ArgumentMismatch {
            command: command.to_owned(),
            index,
        })
}

/// A function whose parameter list is a tuple of [`Param`] types.
///
/// Implemented for every `Fn` of up to six owned parameters whose return
/// type implements [`Returns`].
pub trait Callable<Args> {
    fn param_types() -> Vec<TypeTag>;

    fn return_types() -> Vec<TypeTag>;

    fn call_with(&self, command: &str, args: &[Value]) -> Result<Vec<Value>, FireError>;
}

macro_rules! impl_callable {
    ($($ty:ident $val:ident),*) => {
        impl<Func, Ret, $($ty,)*> Callable<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Ret,
            Ret: Returns,
            $($ty: for<'a> Param<'a>,)*
        {
            fn param_types() -> Vec<TypeTag> {
                vec![$(<$ty as Param<'static>>::TAG),*]
            }

            fn return_types() -> Vec<TypeTag> {
                Ret::tags()
            }

            #[allow(unused_variables, unused_mut, unused_assignments)]
            fn call_with(&self, command: &str, args: &[Value]) -> Result<Vec<Value>, FireError> {
                let mut index = 0usize;
                $(
                    let $val: $ty = argument(command, args, index)?;
                    index += 1;
                )*
                Ok((self)($($val),*).into_values())
            }
        }
    };
}

impl_callable!();
impl_callable!(A a);
impl_callable!(A a, B b);
impl_callable!(A a, B b, C c);
impl_callable!(A a, B b, C c, D d);
impl_callable!(A a, B b, C c, D d, E e);
impl_callable!(A a, B b, C c, D d, E e, F f);

/// A free function exposed as a single command.
pub struct Function<F, Args> {
    name: String,
    func: F,
    _args: PhantomData<fn() -> Args>,
}

impl<F, Args> Function<F, Args>
where
    F: Callable<Args>,
{
    /// Wrap `func`, naming it after the last path segment of its type name.
    pub fn new(func: F) -> Self {
        Self::named(short_name(type_name::<F>()), func)
    }

    pub fn named(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _args: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<F, Args> Introspectable for Function<F, Args>
where
    F: Callable<Args>,
{
    fn shape(&self) -> Shape {
        Shape::Function
    }

    fn signatures(&self) -> Vec<Signature> {
        vec![Signature {
            name: self.name.clone(),
            params: F::param_types(),
            returns: F::return_types(),
            doc: None,
        }]
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Vec<Value>, FireError> {
        if name != self.name {
            return Err(FireError::unknown_command(name));
        }
        self.func.call_with(name, args)
    }
}

/// `crate::module::add` => `add`, `crate::pick::<alloc::string::String>` => `pick`
fn short_name(full: &str) -> &str {
    let path = full.split('<').next().unwrap_or(full);
    let path = path.strip_suffix("::").unwrap_or(path);
    path.rsplit("::").next().unwrap_or(path)
}

macro_rules! unsupported_target {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Introspectable for $ty {
                fn shape(&self) -> Shape {
                    Shape::Unsupported { type_name: type_name::<$ty>() }
                }

                fn signatures(&self) -> Vec<Signature> {
                    Vec::new()
                }

                fn call(&self, _name: &str, _args: &[Value]) -> Result<Vec<Value>, FireError> {
                    Err(FireError::UnsupportedTarget { type_name: type_name::<$ty>() })
                }
            }
        )*
    };
}

unsupported_target!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char, String, str);

#[cfg(test)]
mod tests {
    use super::*;

    fn add(a: i64, b: i64) -> (i64, i64) {
        (a + b, a - b)
    }

    fn shout(s: String) -> String {
        s.to_uppercase()
    }

    fn noop() {}

    fn first<T>(a: T, _b: T) -> T {
        a
    }

    #[test]
    fn test_function_name_from_type() {
        assert_eq!(Function::new(add).name(), "add");
        assert_eq!(Function::new(noop).name(), "noop");
        assert_eq!(Function::named("sum", add).name(), "sum");
    }

    #[test]
    fn test_generic_function_name_drops_type_arguments() {
        let f = Function::new(first::<String>);
        assert_eq!(f.name(), "first");
        let out = f.call("first", &[Value::Str("a".into()), Value::Str("b".into())]).unwrap();
        assert_eq!(out, vec![Value::Str("a".into())]);
        assert_eq!(short_name("demo::pick::<alloc::string::String>"), "pick");
        assert_eq!(short_name("add"), "add");
    }

    #[test]
    fn test_function_signature() {
        let f = Function::new(add);
        assert_eq!(f.shape(), Shape::Function);
        let sigs = f.signatures();
        assert_eq!(sigs.len(), 1);
        assert_eq!(sigs[0].params, vec![TypeTag::I64, TypeTag::I64]);
        assert_eq!(sigs[0].returns, vec![TypeTag::I64, TypeTag::I64]);
        assert!(Function::new(noop).signatures()[0].returns.is_empty());
    }

    #[test]
    fn test_function_call() {
        let f = Function::new(add);
        let out = f.call("add", &[Value::Int(3), Value::Int(5)]).unwrap();
        assert_eq!(out, vec![Value::Int(8), Value::Int(-2)]);

        let f = Function::new(shout);
        let out = f.call("shout", &[Value::Str("hi".into())]).unwrap();
        assert_eq!(out, vec![Value::Str("HI".into())]);
    }

    #[test]
    fn test_function_call_mismatch() {
        let f = Function::new(add);
        let err = f.call("add", &[Value::Int(3), Value::Str("5".into())]).unwrap_err();
        assert!(matches!(err, FireError::ArgumentMismatch { index: 1, .. }));

        let err = f.call("add", &[Value::Int(3)]).unwrap_err();
        assert!(matches!(err, FireError::ArgumentMismatch { index: 1, .. }));

        let err = f.call("sub", &[Value::Int(3), Value::Int(5)]).unwrap_err();
        assert!(err.is_invalid_command());
    }

    #[test]
    fn test_scalar_targets_are_unsupported() {
        assert_eq!(42i64.shape(), Shape::Unsupported { type_name: "i64" });
        let err = String::from("x").call("len", &[]).unwrap_err();
        assert!(matches!(err, FireError::UnsupportedTarget { .. }));
    }
}
