//! Values passed into and returned from fired callables.
//!
//! Every parameter and return slot is described by a [`TypeTag`]. Tokens are
//! turned into [`Value`]s by the coercion engine, and [`Param`] /
//! [`Returns`] convert between `Value` and the statically typed Rust
//! arguments of the target.

use core::fmt;

/// Primitive type of one parameter or return slot.
///
/// | Tag     | Type    | Tag     | Type    | Tag    | Type   |
/// |---------|---------|---------|---------|--------|--------|
/// | `I8`    | `i8`    | `U8`    | `u8`    | `F32`  | `f32`  |
/// | `I16`   | `i16`   | `U16`   | `u16`   | `F64`  | `f64`  |
/// | `I32`   | `i32`   | `U32`   | `u32`   | `Bool` | `bool` |
/// | `I64`   | `i64`   | `U64`   | `u64`   | `Char` | `char` |
/// | `Isize` | `isize` | `Usize` | `usize` | `Str`  | `str`  |
///
/// `Other` names a type the coercion engine cannot produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    Char,
    Str,
    Other(&'static str),
}

impl TypeTag {
    /// Rust spelling of the tagged type, used as the usage placeholder.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TypeTag::I8 => "i8",
            TypeTag::I16 => "i16",
            TypeTag::I32 => "i32",
            TypeTag::I64 => "i64",
            TypeTag::Isize => "isize",
            TypeTag::U8 => "u8",
            TypeTag::U16 => "u16",
            TypeTag::U32 => "u32",
            TypeTag::U64 => "u64",
            TypeTag::Usize => "usize",
            TypeTag::F32 => "f32",
            TypeTag::F64 => "f64",
            TypeTag::Bool => "bool",
            TypeTag::Char => "char",
            TypeTag::Str => "str",
            TypeTag::Other(name) => name,
        }
    }

    pub const fn is_signed(&self) -> bool {
        matches!(self, TypeTag::I8 | TypeTag::I16 | TypeTag::I32 | TypeTag::I64 | TypeTag::Isize)
    }

    pub const fn is_unsigned(&self) -> bool {
        matches!(self, TypeTag::U8 | TypeTag::U16 | TypeTag::U32 | TypeTag::U64 | TypeTag::Usize)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coerced argument or a produced result.
///
/// Signed integers of every width are widened to `Int`, unsigned ones to
/// `Uint`. Floats keep their width so they render with the shortest
/// representation of their own precision.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char(char),
    Str(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(v) => Some(*v),
            Value::F32(v) => Some(f64::from(*v)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Uint(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
        }
    }
}

/// A Rust type that can receive one coerced argument.
///
/// The lifetime lets borrowed parameters such as `&str` point into the
/// bound argument list for the duration of a call.
pub trait Param<'a>: Sized {
    const TAG: TypeTag;

    /// Extract `Self` from a value produced for [`Self::TAG`].
    fn from_value(value: &'a Value) -> Option<Self>;
}

/// A Rust type that can be rendered as one result value.
pub trait IntoValue {
    const TAG: TypeTag;

    fn into_value(self) -> Value;
}

/// The full return type of a callable: nothing, one value, or a tuple.
pub trait Returns {
    fn tags() -> Vec<TypeTag>;

    fn into_values(self) -> Vec<Value>;
}

macro_rules! scalar {
    ($ty:ty, $tag:ident, $variant:ident, $wide:ty) => {
        impl<'a> Param<'a> for $ty {
            const TAG: TypeTag = TypeTag::$tag;

            fn from_value(value: &'a Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => <$ty>::try_from(*v).ok(),
                    _ => None,
                }
            }
        }

        impl IntoValue for $ty {
            const TAG: TypeTag = TypeTag::$tag;

            #[allow(clippy::unnecessary_cast)]
            fn into_value(self) -> Value {
                Value::$variant(self as $wide)
            }
        }

        impl Returns for $ty {
            fn tags() -> Vec<TypeTag> {
                vec![TypeTag::$tag]
            }

            fn into_values(self) -> Vec<Value> {
                vec![self.into_value()]
            }
        }
    };
}

scalar!(i8, I8, Int, i64);
scalar!(i16, I16, Int, i64);
scalar!(i32, I32, Int, i64);
scalar!(i64, I64, Int, i64);
scalar!(isize, Isize, Int, i64);
scalar!(u8, U8, Uint, u64);
scalar!(u16, U16, Uint, u64);
scalar!(u32, U32, Uint, u64);
scalar!(u64, U64, Uint, u64);
scalar!(usize, Usize, Uint, u64);
scalar!(f32, F32, F32, f32);
scalar!(f64, F64, F64, f64);
scalar!(bool, Bool, Bool, bool);
scalar!(char, Char, Char, char);

impl<'a> Param<'a> for String {
    const TAG: TypeTag = TypeTag::Str;

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl<'a> Param<'a> for &'a str {
    const TAG: TypeTag = TypeTag::Str;

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_str()
    }
}

impl IntoValue for String {
    const TAG: TypeTag = TypeTag::Str;

    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    const TAG: TypeTag = TypeTag::Str;

    fn into_value(self) -> Value {
        Value::Str(self.to_owned())
    }
}

impl Returns for String {
    fn tags() -> Vec<TypeTag> {
        vec![TypeTag::Str]
    }

    fn into_values(self) -> Vec<Value> {
        vec![Value::Str(self)]
    }
}

impl Returns for &str {
    fn tags() -> Vec<TypeTag> {
        vec![TypeTag::Str]
    }

    fn into_values(self) -> Vec<Value> {
        vec![Value::Str(self.to_owned())]
    }
}

impl Returns for () {
    fn tags() -> Vec<TypeTag> {
        Vec::new()
    }

    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }
}

macro_rules! tuple_returns {
    ($($name:ident $val:ident),+) => {
        impl<$($name: IntoValue),+> Returns for ($($name,)+) {
            fn tags() -> Vec<TypeTag> {
                vec![$($name::TAG),+]
            }

            fn into_values(self) -> Vec<Value> {
                let ($($val,)+) = self;
                vec![$($val.into_value()),+]
            }
        }
    };
}

tuple_returns!(A a);
tuple_returns!(A a, B b);
tuple_returns!(A a, B b, C c);
tuple_returns!(A a, B b, C c, D d);
tuple_returns!(A a, B b, C c, D d, E e);
tuple_returns!(A a, B b, C c, D d, E e, F f);
