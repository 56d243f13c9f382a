use std::fmt;

use crate::BindError;
use crate::Result;

/// Scalar slot kinds a record field can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Text,
    Float32,
    Float64,
    /// Platform-width signed integer
    Int,
    Bool,
    Uint,
}

impl fmt::Display for ScalarKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            ScalarKind::Text => "string",
            ScalarKind::Float32 => "f32",
            ScalarKind::Float64 => "f64",
            ScalarKind::Int => "isize",
            ScalarKind::Bool => "bool",
            ScalarKind::Uint => "u64",
        };
        f.write_str(name)
    }
}

/// Result of a successful coercion
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Float32(f32),
    Float64(f64),
    Int(isize),
}

impl ScalarValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::Text(_) => ScalarKind::Text,
            ScalarValue::Float32(_) => ScalarKind::Float32,
            ScalarValue::Float64(_) => ScalarKind::Float64,
            ScalarValue::Int(_) => ScalarKind::Int,
        }
    }
}

/// Converts a raw payload into a value of `kind`.
///
/// Text is decoded lossily and never fails; invalid UTF-8 sequences become
/// U+FFFD. Numeric kinds trim surrounding whitespace first. Empty or unparsable
/// input, and floats that overflow the target width, fail with
/// [`BindError::MalformedValue`]. `Bool` and `Uint` have no rule and fail
/// with [`BindError::UnsupportedType`].
pub fn coerce(
    kind: ScalarKind,
    raw: &[u8],
) -> Result<ScalarValue> {
    match kind {
        ScalarKind::Text => Ok(ScalarValue::Text(decode_text(raw))),
        ScalarKind::Float32 => {
            let text = numeric_text(kind, raw)?;
            let n: f32 = text.parse().map_err(|_| malformed(kind, raw))?;
            if n.is_infinite() && !is_infinity_literal(text) {
                return Err(malformed(kind, raw));
            }
            Ok(ScalarValue::Float32(n))
        }
        ScalarKind::Float64 => {
            let text = numeric_text(kind, raw)?;
            let n: f64 = text.parse().map_err(|_| malformed(kind, raw))?;
            if n.is_infinite() && !is_infinity_literal(text) {
                return Err(malformed(kind, raw));
            }
            Ok(ScalarValue::Float64(n))
        }
        ScalarKind::Int => coerce_int(raw).map(ScalarValue::Int),
        ScalarKind::Bool | ScalarKind::Uint => Err(BindError::UnsupportedType { kind }.into()),
    }
}

/// Text rule of [`coerce`]
pub(crate) fn decode_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Platform-integer rule of [`coerce`]
pub(crate) fn coerce_int(raw: &[u8]) -> Result<isize> {
    let text = numeric_text(ScalarKind::Int, raw)?;
    text.parse().map_err(|_| malformed(ScalarKind::Int, raw))
}

fn numeric_text(
    kind: ScalarKind,
    raw: &[u8],
) -> Result<&str> {
    std::str::from_utf8(raw)
        .map(str::trim)
        .map_err(|_| malformed(kind, raw))
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn malformed(
    kind: ScalarKind,
    raw: &[u8],
) -> crate::Error {
    BindError::MalformedValue {
        kind,
        raw: String::from_utf8_lossy(raw).into_owned(),
    }
    .into()
}
