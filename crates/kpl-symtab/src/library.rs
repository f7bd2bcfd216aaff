//! Built-in library definitions.
//!
//! The standard KPL library is built in code by [`LibraryDefinitions::kpl`];
//! other libraries can be loaded from TOML:
//!
//! ```toml
//! [[functions]]
//! name = "READI"
//! return_type = "integer"
//!
//! [[procedures]]
//! name = "WRITEI"
//! params = [{ name = "i", type = "integer" }]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::SymtabError;
use crate::object::{validate_identifier, ParamMode};
use crate::types::TypeDescriptor;

/// Signatures registered in the global object list at initialization
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LibraryDefinitions {
    #[serde(default)]
    pub functions: Vec<RoutineDef>,
    #[serde(default)]
    pub procedures: Vec<RoutineDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoutineDef {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDef>,
    /// Ignored for procedures
    #[serde(default)]
    pub return_type: Option<TypeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParamDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub mode: ParamMode,
}

impl RoutineDef {
    fn new(name: &str, params: Vec<ParamDef>, return_type: Option<TypeDescriptor>) -> Self {
        Self {
            name: name.to_string(),
            params,
            return_type,
        }
    }
}

impl ParamDef {
    fn by_value(name: &str, ty: TypeDescriptor) -> Self {
        Self {
            name: name.to_string(),
            ty,
            mode: ParamMode::Value,
        }
    }
}

impl LibraryDefinitions {
    /// The standard KPL I/O library: `READC`, `READI`, `WRITEI`, `WRITEC`, `WRITELN`
    pub fn kpl() -> Self {
        Self {
            functions: vec![
                RoutineDef::new("READC", Vec::new(), Some(TypeDescriptor::char())),
                RoutineDef::new("READI", Vec::new(), Some(TypeDescriptor::int())),
            ],
            procedures: vec![
                RoutineDef::new(
                    "WRITEI",
                    vec![ParamDef::by_value("i", TypeDescriptor::int())],
                    None,
                ),
                RoutineDef::new(
                    "WRITEC",
                    vec![ParamDef::by_value("ch", TypeDescriptor::char())],
                    None,
                ),
                RoutineDef::new("WRITELN", Vec::new(), None),
            ],
        }
    }

    /// Load library definitions from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, SymtabError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::load_from_str(&content)?)
    }

    /// Load library definitions from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check every routine and parameter name against `max_ident_len`.
    pub fn validate(&self, max_ident_len: usize) -> Result<(), SymtabError> {
        for routine in self.routines() {
            validate_identifier(&routine.name, max_ident_len)?;
            for param in &routine.params {
                validate_identifier(&param.name, max_ident_len)?;
            }
        }
        Ok(())
    }

    /// All routines, functions first, in definition order
    pub fn routines(&self) -> impl Iterator<Item = &RoutineDef> {
        self.functions.iter().chain(&self.procedures)
    }

    /// Get all routine names
    pub fn routine_names(&self) -> impl Iterator<Item = &str> {
        self.routines().map(|r| r.name.as_str())
    }
}
