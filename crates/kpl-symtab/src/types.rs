//! Type descriptors for KPL.
//!
//! A descriptor is a plain owned value: arrays box their element type, so
//! dropping an array releases the whole element chain and no two objects
//! ever share a descriptor.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Error when constructing or parsing a type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("array size must be positive, got {0}")]
    InvalidArraySize(i64),
    #[error("array element type is missing")]
    MissingElementType,
    #[error("unknown type `{0}`")]
    UnknownType(String),
}

/// A KPL type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum TypeDescriptor {
    Integer,
    Char,
    /// Fixed-size array; the element type is exclusively owned
    Array {
        size: NonZeroUsize,
        element: Box<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    pub fn int() -> Self {
        TypeDescriptor::Integer
    }

    pub fn char() -> Self {
        TypeDescriptor::Char
    }

    /// Create an array type of `size` elements.
    ///
    /// Fails when `size <= 0` or the element type is absent. Both are
    /// declaration errors the caller may recover from.
    pub fn array(size: i64, element: Option<TypeDescriptor>) -> Result<Self, TypeError> {
        let Some(size) = usize::try_from(size).ok().and_then(NonZeroUsize::new) else {
            tracing::warn!(size, "invalid array size");
            return Err(TypeError::InvalidArraySize(size));
        };
        let Some(element) = element else {
            tracing::warn!("array type without element type");
            return Err(TypeError::MissingElementType);
        };
        Ok(TypeDescriptor::Array {
            size,
            element: Box::new(element),
        })
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, TypeDescriptor::Integer | TypeDescriptor::Char)
    }

    /// Number of elements, for array types
    pub fn array_size(&self) -> Option<usize> {
        match self {
            TypeDescriptor::Array { size, .. } => Some(size.get()),
            _ => None,
        }
    }

    /// Element type, for array types
    pub fn element_type(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Array { element, .. } => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Integer => write!(f, "integer"),
            TypeDescriptor::Char => write!(f, "char"),
            TypeDescriptor::Array { size, element } => {
                write!(f, "array(. {size} .) of {element}")
            }
        }
    }
}

/// Parses KPL type syntax: `integer`, `char`, `array(. N .) of T`.
/// Keywords are case-insensitive and `[N]` is accepted for `(. N .)`.
impl FromStr for TypeDescriptor {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "integer" => Ok(TypeDescriptor::Integer),
            "char" => Ok(TypeDescriptor::Char),
            other => parse_array(other)
                .unwrap_or_else(|| Err(TypeError::UnknownType(other.to_string()))),
        }
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Returns `None` when `s` is not array syntax at all.
fn parse_array(s: &str) -> Option<Result<TypeDescriptor, TypeError>> {
    let rest = s.strip_prefix("array")?.trim_start();
    let (size, rest) = match rest.strip_prefix("(.") {
        Some(rest) => rest.split_once(".)")?,
        None => rest.strip_prefix('[')?.split_once(']')?,
    };
    let size: i64 = size.trim().parse().ok()?;
    let element = rest.trim_start().strip_prefix("of")?;
    if !element.starts_with(char::is_whitespace) {
        return None;
    }
    Some(
        element
            .parse()
            .and_then(|element| TypeDescriptor::array(size, Some(element))),
    )
}
