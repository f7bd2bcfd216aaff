//! Indented dumps of objects and scopes for debugging and golden tests.
//!
//! ```text
//! Program PRG
//!     Const c1 = 10
//!     Var v1 : integer
//!     Function f : integer
//!         Param VAR p : char
//!         Var v : char
//! ```
//!
//! Routines list their parameters first, then the objects declared in their
//! scope. Absent types and values print as `?`. An object already being
//! printed further up the tree is skipped, so a routine declared into its own
//! scope prints once.

use std::fmt::{self, Display, Write};

use crate::object::{Object, ObjectAttributes, ObjectId, ParamMode};
use crate::scope::ScopeId;
use crate::table::SymbolTable;

const INDENT: usize = 4;

/// Dump of one object and everything nested under it
pub struct ObjectDump<'a> {
    table: &'a SymbolTable,
    id: ObjectId,
}

/// Dump of a list of objects at the same level
pub struct ListDump<'a> {
    table: &'a SymbolTable,
    list: &'a [ObjectId],
}

impl SymbolTable {
    pub fn dump_object(&self, id: ObjectId) -> ObjectDump<'_> {
        ObjectDump { table: self, id }
    }

    /// Dump the objects declared in `scope`; empty for a released scope.
    pub fn dump_scope(&self, scope: ScopeId) -> ListDump<'_> {
        let list = self.scope(scope).map(|s| s.objects()).unwrap_or_default();
        self.dump_objects(list)
    }

    pub fn dump_objects<'a>(&'a self, list: &'a [ObjectId]) -> ListDump<'a> {
        ListDump { table: self, list }
    }
}

impl Display for ObjectDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_object(f, self.table, self.id, 0, &mut Vec::new())
    }
}

impl Display for ListDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, self.table, self.list, 0, &mut Vec::new())
    }
}

fn write_list(
    f: &mut impl Write,
    table: &SymbolTable,
    list: &[ObjectId],
    indent: usize,
    path: &mut Vec<ObjectId>,
) -> fmt::Result {
    for &id in list {
        write_object(f, table, id, indent, path)?;
    }
    Ok(())
}

fn write_object(
    f: &mut impl Write,
    table: &SymbolTable,
    id: ObjectId,
    indent: usize,
    path: &mut Vec<ObjectId>,
) -> fmt::Result {
    // released objects leave nothing to print
    let Some(object) = table.object(id) else {
        return Ok(());
    };
    if path.contains(&id) {
        return Ok(());
    }
    path.push(id);
    let result = write_attrs(f, table, object, indent, path);
    path.pop();
    result
}

fn write_attrs(
    f: &mut impl Write,
    table: &SymbolTable,
    object: &Object,
    indent: usize,
    path: &mut Vec<ObjectId>,
) -> fmt::Result {
    let name = object.name();
    write!(f, "{:indent$}", "")?;

    match object.attrs() {
        ObjectAttributes::Program(attrs) => {
            writeln!(f, "Program {name}")?;
            write_scope(f, table, attrs.scope, indent + INDENT, path)
        }
        ObjectAttributes::Constant(attrs) => {
            writeln!(f, "Const {name} = {}", or_unknown(attrs.value.as_ref()))
        }
        ObjectAttributes::Type(attrs) => {
            writeln!(f, "Type {name} = {}", or_unknown(attrs.actual_type.as_ref()))
        }
        ObjectAttributes::Variable(attrs) => {
            writeln!(f, "Var {name} : {}", or_unknown(attrs.ty.as_ref()))
        }
        ObjectAttributes::Parameter(attrs) => {
            let var = match attrs.mode {
                ParamMode::Value => "",
                ParamMode::Reference => "VAR ",
            };
            writeln!(f, "Param {var}{name} : {}", or_unknown(attrs.ty.as_ref()))
        }
        ObjectAttributes::Function(attrs) => {
            writeln!(f, "Function {name} : {}", or_unknown(attrs.return_type.as_ref()))?;
            write_list(f, table, &attrs.params, indent + INDENT, path)?;
            write_scope(f, table, attrs.scope, indent + INDENT, path)
        }
        ObjectAttributes::Procedure(attrs) => {
            writeln!(f, "Procedure {name}")?;
            write_list(f, table, &attrs.params, indent + INDENT, path)?;
            write_scope(f, table, attrs.scope, indent + INDENT, path)
        }
    }
}

fn write_scope(
    f: &mut impl Write,
    table: &SymbolTable,
    scope: ScopeId,
    indent: usize,
    path: &mut Vec<ObjectId>,
) -> fmt::Result {
    match table.scope(scope) {
        Some(scope) => write_list(f, table, scope.objects(), indent, path),
        None => Ok(()),
    }
}

fn or_unknown<T: Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "?".to_string(), ToString::to_string)
}
