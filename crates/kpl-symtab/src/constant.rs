//! Constant literal values.

use std::fmt;

use crate::types::TypeDescriptor;

/// A typed literal bound by a `CONST` declaration.
///
/// Duplicating a value is `Clone`; an absent value duplicates to absent
/// through `Option::cloned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantValue {
    Integer(i32),
    Char(char),
}

impl ConstantValue {
    pub fn int(value: i32) -> Self {
        ConstantValue::Integer(value)
    }

    pub fn char(value: char) -> Self {
        ConstantValue::Char(value)
    }

    /// The scalar type of this literal
    pub fn type_descriptor(&self) -> TypeDescriptor {
        match self {
            ConstantValue::Integer(_) => TypeDescriptor::int(),
            ConstantValue::Char(_) => TypeDescriptor::char(),
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Integer(value) => write!(f, "{value}"),
            ConstantValue::Char(value) => write!(f, "'{value}'"),
        }
    }
}
