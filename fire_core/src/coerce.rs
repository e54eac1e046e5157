//! Type coercion engine: one string token in, one [`Value`] out.
//!
//! Integers accept an optional sign and a `0x`, `0o` or `0b` radix prefix,
//! and are range checked against the width of their tag. Booleans accept
//! `1|true|True|TRUE` and `0|false|False|FALSE`. Strings pass through
//! unchanged. A token that does not parse is a [`CoercionError`], never a
//! silently substituted zero.

use thiserror::Error;

use crate::value::{TypeTag, Value};

/// Errors produced while converting a token into a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// The token is not a valid literal of the expected type.
    #[error("cannot parse {token:?} as {expected}")]
    Malformed { token: String, expected: TypeTag },

    /// The parameter type has no coercion from text.
    #[error("parameters of type {0} are not supported")]
    Unsupported(TypeTag),
}

/// Convert `token` into a value of the primitive type named by `tag`.
pub fn coerce(token: &str, tag: TypeTag) -> Result<Value, CoercionError> {
    let value = match tag {
        TypeTag::I8 => narrow::<i8>(token).map(Value::Int),
        TypeTag::I16 => narrow::<i16>(token).map(Value::Int),
        TypeTag::I32 => narrow::<i32>(token).map(Value::Int),
        TypeTag::I64 => narrow::<i64>(token).map(Value::Int),
        TypeTag::Isize => narrow::<isize>(token).map(Value::Int),

        TypeTag::U8 => narrow_unsigned::<u8>(token).map(Value::Uint),
        TypeTag::U16 => narrow_unsigned::<u16>(token).map(Value::Uint),
        TypeTag::U32 => narrow_unsigned::<u32>(token).map(Value::Uint),
        TypeTag::U64 => narrow_unsigned::<u64>(token).map(Value::Uint),
        TypeTag::Usize => narrow_unsigned::<usize>(token).map(Value::Uint),

        TypeTag::F32 => token.trim().parse::<f32>().ok().map(Value::F32),
        TypeTag::F64 => token.trim().parse::<f64>().ok().map(Value::F64),

        TypeTag::Bool => parse_bool(token).map(Value::Bool),
        TypeTag::Char => parse_char(token).map(Value::Char),
        TypeTag::Str => Some(Value::Str(token.to_owned())),

        TypeTag::Other(_) => return Err(CoercionError::Unsupported(tag)),
    };

    value.ok_or_else(|| CoercionError::Malformed {
        token: token.to_owned(),
        expected: tag,
    })
}

/// Coerce a whole token list positionally against `tags`.
///
/// The caller guarantees both slices have the same length.
pub fn coerce_all<S: AsRef<str>>(tokens: &[S], tags: &[TypeTag]) -> Result<Vec<Value>, CoercionError> {
    tokens
        .iter()
        .zip(tags)
        .map(|(token, tag)| coerce(token.as_ref(), *tag))
        .collect()
}

/// Signed or unsigned integer literal with optional radix prefix.
fn parse_integer(token: &str) -> Option<i128> {
    let s = token.trim();
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if let Some(stripped) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (16, stripped)
    } else if let Some(stripped) = body.strip_prefix("0o").or_else(|| body.strip_prefix("0O")) {
        (8, stripped)
    } else if let Some(stripped) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (2, stripped)
    } else {
        (10, body)
    };

    // from_str_radix would accept a second sign
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn narrow<T>(token: &str) -> Option<i64>
where
    T: TryFrom<i128> + TryInto<i128>,
{
    let wide = parse_integer(token)?;
    let narrowed: i128 = T::try_from(wide).ok()?.try_into().ok()?;
    i64::try_from(narrowed).ok()
}

fn narrow_unsigned<T>(token: &str) -> Option<u64>
where
    T: TryFrom<i128> + TryInto<i128>,
{
    let wide = parse_integer(token)?;
    let narrowed: i128 = T::try_from(wide).ok()?.try_into().ok()?;
    u64::try_from(narrowed).ok()
}

/// Accepts `1|true|True|TRUE` as `true`, and `0|false|False|FALSE` as `false`.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "1" | "true" | "True" | "TRUE" => Some(true),
        "0" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// One-character string => `char`.
fn parse_char(s: &str) -> Option<char> {
    let mut it = s.chars();
    let c = it.next()?;
    if it.next().is_none() { Some(c) } else { None }
}
