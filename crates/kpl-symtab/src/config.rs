//! Symbol table configuration.
//!
//! Settings can be built in code or loaded from a TOML file; every field has
//! a default so partial files are accepted.

use std::path::Path;

use serde::Deserialize;

use crate::error::SymtabError;

/// Identifiers must be strictly shorter than this many bytes.
pub const MAX_IDENT_LEN: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SymtabConfig {
    /// Exclusive upper bound on identifier length
    pub max_ident_len: usize,
    /// Whether `find_object` compares names exactly or ASCII-case-insensitively
    pub case_sensitive: bool,
}

impl Default for SymtabConfig {
    fn default() -> Self {
        Self {
            max_ident_len: MAX_IDENT_LEN,
            case_sensitive: true,
        }
    }
}

impl SymtabConfig {
    /// Load configuration from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, SymtabError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::load_from_str(&content)?)
    }

    /// Compare two identifiers under this configuration's case rule.
    pub fn names_match(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    }
}
