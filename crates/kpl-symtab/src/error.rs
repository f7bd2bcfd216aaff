use thiserror::Error;

use crate::object::{NameError, ObjectKind};
use crate::types::TypeError;

/// Recoverable failures reported by the symbol table.
#[derive(Debug, Error)]
pub enum SymtabError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("invalid identifier: {0}")]
    Name(#[from] NameError),

    /// An attribute setter was called on an object of the wrong kind
    #[error("`{name}` is a {found}, expected {expected}")]
    KindMismatch {
        name: String,
        found: ObjectKind,
        expected: &'static str,
    },

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
