//! Declared objects.
//!
//! An [`Object`] is one declared name together with the attributes its kind
//! carries. Objects live in the [`SymbolTable`](crate::SymbolTable) arena and
//! refer to each other through [`ObjectId`] and [`ScopeId`] handles. Handles
//! stored in attribute lists (`params`, a routine's `scope`) are owning;
//! the `declared_in` and `routine` links are back-references only.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::constant::ConstantValue;
use crate::error::SymtabError;
use crate::scope::ScopeId;
use crate::types::TypeDescriptor;

/// Unique identifier for an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// The kind of a declared object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Program,
    Variable,
    Constant,
    Type,
    Function,
    Procedure,
    Parameter,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Program => "program",
            ObjectKind::Variable => "variable",
            ObjectKind::Constant => "constant",
            ObjectKind::Type => "type",
            ObjectKind::Function => "function",
            ObjectKind::Procedure => "procedure",
            ObjectKind::Parameter => "parameter",
        }
    }

    /// Functions and procedures
    pub fn is_routine(self) -> bool {
        matches!(self, ObjectKind::Function | ObjectKind::Procedure)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an argument is passed to a routine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamMode {
    #[default]
    Value,
    /// `VAR` parameter
    Reference,
}

/// Error when validating an identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier `{name}` must be shorter than {max} characters")]
    TooLong { name: String, max: usize },
}

/// Check that `name` is non-empty and strictly shorter than `max_len` bytes.
pub fn validate_identifier(name: &str, max_len: usize) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() >= max_len {
        return Err(NameError::TooLong {
            name: name.to_string(),
            max: max_len,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramAttributes {
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableAttributes {
    pub ty: Option<TypeDescriptor>,
    /// Scope that was current when the variable was created
    pub declared_in: Option<ScopeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantAttributes {
    pub value: Option<ConstantValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAttributes {
    pub actual_type: Option<TypeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionAttributes {
    pub params: Vec<ObjectId>,
    pub return_type: Option<TypeDescriptor>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureAttributes {
    pub params: Vec<ObjectId>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterAttributes {
    pub mode: ParamMode,
    pub ty: Option<TypeDescriptor>,
    /// Function or procedure the parameter belongs to
    pub routine: ObjectId,
}

/// Kind-specific attributes; exactly one variant per object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectAttributes {
    Program(ProgramAttributes),
    Variable(VariableAttributes),
    Constant(ConstantAttributes),
    Type(TypeAttributes),
    Function(FunctionAttributes),
    Procedure(ProcedureAttributes),
    Parameter(ParameterAttributes),
}

impl ObjectAttributes {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectAttributes::Program(_) => ObjectKind::Program,
            ObjectAttributes::Variable(_) => ObjectKind::Variable,
            ObjectAttributes::Constant(_) => ObjectKind::Constant,
            ObjectAttributes::Type(_) => ObjectKind::Type,
            ObjectAttributes::Function(_) => ObjectKind::Function,
            ObjectAttributes::Procedure(_) => ObjectKind::Procedure,
            ObjectAttributes::Parameter(_) => ObjectKind::Parameter,
        }
    }
}

/// A declared name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    id: ObjectId,
    name: String,
    attrs: ObjectAttributes,
}

impl Object {
    pub(crate) fn new(id: ObjectId, name: impl Into<String>, attrs: ObjectAttributes) -> Self {
        Self {
            id,
            name: name.into(),
            attrs,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ObjectKind {
        self.attrs.kind()
    }

    pub fn attrs(&self) -> &ObjectAttributes {
        &self.attrs
    }

    pub(crate) fn attrs_mut(&mut self) -> &mut ObjectAttributes {
        &mut self.attrs
    }

    pub(crate) fn into_attrs(self) -> ObjectAttributes {
        self.attrs
    }

    /// The scope this object owns (programs and routines)
    pub fn scope(&self) -> Option<ScopeId> {
        match &self.attrs {
            ObjectAttributes::Program(attrs) => Some(attrs.scope),
            ObjectAttributes::Function(attrs) => Some(attrs.scope),
            ObjectAttributes::Procedure(attrs) => Some(attrs.scope),
            _ => None,
        }
    }

    /// Parameter list of a routine, empty for every other kind
    pub fn params(&self) -> &[ObjectId] {
        match &self.attrs {
            ObjectAttributes::Function(attrs) => &attrs.params,
            ObjectAttributes::Procedure(attrs) => &attrs.params,
            _ => &[],
        }
    }

    pub(crate) fn params_mut(&mut self) -> Option<&mut Vec<ObjectId>> {
        match &mut self.attrs {
            ObjectAttributes::Function(attrs) => Some(&mut attrs.params),
            ObjectAttributes::Procedure(attrs) => Some(&mut attrs.params),
            _ => None,
        }
    }

    /// Type carried by the object: a variable's or parameter's type, a type
    /// declaration's definition, or a function's return type.
    pub fn type_descriptor(&self) -> Option<&TypeDescriptor> {
        match &self.attrs {
            ObjectAttributes::Variable(attrs) => attrs.ty.as_ref(),
            ObjectAttributes::Type(attrs) => attrs.actual_type.as_ref(),
            ObjectAttributes::Function(attrs) => attrs.return_type.as_ref(),
            ObjectAttributes::Parameter(attrs) => attrs.ty.as_ref(),
            _ => None,
        }
    }

    /// Replace the type carried by the object. See [`Object::type_descriptor`].
    pub fn set_type(&mut self, ty: TypeDescriptor) -> Result<(), SymtabError> {
        match &mut self.attrs {
            ObjectAttributes::Variable(attrs) => attrs.ty = Some(ty),
            ObjectAttributes::Type(attrs) => attrs.actual_type = Some(ty),
            ObjectAttributes::Function(attrs) => attrs.return_type = Some(ty),
            ObjectAttributes::Parameter(attrs) => attrs.ty = Some(ty),
            _ => return Err(self.mismatch("a variable, type, function or parameter")),
        }
        Ok(())
    }

    pub fn constant_value(&self) -> Option<&ConstantValue> {
        match &self.attrs {
            ObjectAttributes::Constant(attrs) => attrs.value.as_ref(),
            _ => None,
        }
    }

    pub fn set_value(&mut self, value: ConstantValue) -> Result<(), SymtabError> {
        match &mut self.attrs {
            ObjectAttributes::Constant(attrs) => {
                attrs.value = Some(value);
                Ok(())
            }
            _ => Err(self.mismatch("a constant")),
        }
    }

    pub fn param_mode(&self) -> Option<ParamMode> {
        match &self.attrs {
            ObjectAttributes::Parameter(attrs) => Some(attrs.mode),
            _ => None,
        }
    }

    /// Routine a parameter belongs to
    pub fn routine(&self) -> Option<ObjectId> {
        match &self.attrs {
            ObjectAttributes::Parameter(attrs) => Some(attrs.routine),
            _ => None,
        }
    }

    /// Scope a variable was created in
    pub fn declared_in(&self) -> Option<ScopeId> {
        match &self.attrs {
            ObjectAttributes::Variable(attrs) => attrs.declared_in,
            _ => None,
        }
    }

    fn mismatch(&self, expected: &'static str) -> SymtabError {
        SymtabError::KindMismatch {
            name: self.name.clone(),
            found: self.kind(),
            expected,
        }
    }
}
