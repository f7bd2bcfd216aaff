//! The symbol table.
//!
//! [`SymbolTable`] is the context handle the parser threads through every
//! declaration and lookup. It owns an arena of objects and scopes; ownership
//! runs program → scope → objects and routine → (parameters, scope), and
//! releasing an object walks only that direction. Back-links (a scope's
//! owner, a parameter's routine, a variable's declaring scope) are plain
//! handles that resolve to `None` once their target has been released.

use crate::config::SymtabConfig;
use crate::error::SymtabError;
use crate::library::{LibraryDefinitions, ParamDef};
use crate::object::{
    validate_identifier, ConstantAttributes, FunctionAttributes, Object, ObjectAttributes,
    ObjectId, ParamMode, ParameterAttributes, ProcedureAttributes, ProgramAttributes,
    TypeAttributes, VariableAttributes,
};
use crate::scope::{Scope, ScopeId};
use crate::types::TypeDescriptor;

/// Summary returned by [`SymbolTable::clean`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub objects_released: usize,
    pub scopes_released: usize,
    /// Objects no declaration reached, swept after the ownership walk
    pub unowned_objects: usize,
    pub unowned_scopes: usize,
}

/// Primitive types shared by built-in signatures and callers
#[derive(Debug)]
struct Primitives {
    int: TypeDescriptor,
    char: TypeDescriptor,
}

#[derive(Debug)]
pub struct SymbolTable {
    config: SymtabConfig,
    objects: Vec<Option<Object>>,
    scopes: Vec<Option<Scope>>,
    program: Option<ObjectId>,
    current_scope: Option<ScopeId>,
    globals: Vec<ObjectId>,
    primitives: Primitives,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table with the standard KPL library registered
    pub fn new() -> Self {
        let mut table = Self::empty(SymtabConfig::default());
        table.register_library(&LibraryDefinitions::kpl());
        table
    }

    /// Create a table with the standard KPL library under `config`.
    ///
    /// Fails when `config.max_ident_len` is too short for a built-in name.
    pub fn with_config(config: SymtabConfig) -> Result<Self, SymtabError> {
        Self::with_library(config, &LibraryDefinitions::kpl())
    }

    /// Create a table with a custom built-in library.
    ///
    /// Library names are validated up front, so malformed definitions are
    /// reported as errors rather than treated as contract violations.
    pub fn with_library(
        config: SymtabConfig,
        library: &LibraryDefinitions,
    ) -> Result<Self, SymtabError> {
        library.validate(config.max_ident_len)?;
        let mut table = Self::empty(config);
        table.register_library(library);
        Ok(table)
    }

    fn empty(config: SymtabConfig) -> Self {
        Self {
            config,
            objects: Vec::new(),
            scopes: Vec::new(),
            program: None,
            current_scope: None,
            globals: Vec::new(),
            primitives: Primitives {
                int: TypeDescriptor::int(),
                char: TypeDescriptor::char(),
            },
        }
    }

    fn register_library(&mut self, library: &LibraryDefinitions) {
        for def in &library.functions {
            let function = self.create_function_object(&def.name);
            if let Some(ObjectAttributes::Function(attrs)) =
                self.object_mut(function).map(Object::attrs_mut)
            {
                attrs.return_type = def.return_type.clone();
            }
            self.register_params(function, &def.params);
            self.globals.push(function);
        }
        for def in &library.procedures {
            let procedure = self.create_procedure_object(&def.name);
            self.register_params(procedure, &def.params);
            self.globals.push(procedure);
        }
        tracing::debug!(count = self.globals.len(), "registered built-in routines");
    }

    fn register_params(&mut self, routine: ObjectId, params: &[ParamDef]) {
        for def in params {
            let param = self.create_parameter_object(&def.name, def.mode, routine);
            if let Some(ObjectAttributes::Parameter(attrs)) =
                self.object_mut(param).map(Object::attrs_mut)
            {
                attrs.ty = Some(def.ty.clone());
            }
            self.push_param(routine, param);
        }
    }

    // Accessors

    pub fn config(&self) -> &SymtabConfig {
        &self.config
    }

    pub fn program(&self) -> Option<ObjectId> {
        self.program
    }

    pub fn current_scope(&self) -> Option<ScopeId> {
        self.current_scope
    }

    /// Owner of the current scope
    pub fn current_owner(&self) -> Option<ObjectId> {
        self.current_scope
            .and_then(|id| self.scope(id))
            .and_then(|scope| scope.owner)
    }

    /// Built-in objects, in registration order
    pub fn global_objects(&self) -> &[ObjectId] {
        &self.globals
    }

    pub fn int_type(&self) -> &TypeDescriptor {
        &self.primitives.int
    }

    pub fn char_type(&self) -> &TypeDescriptor {
        &self.primitives.char
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0).and_then(Option::as_ref)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0).and_then(Option::as_ref)
    }

    fn scope_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Enclosing scope of `id`
    pub fn enclosing(&self, id: ScopeId) -> Option<ScopeId> {
        self.scope(id).and_then(|scope| scope.enclosing)
    }

    /// Walk from `from` outward through its enclosing scopes.
    pub fn scope_chain(&self, from: Option<ScopeId>) -> impl Iterator<Item = ScopeId> + '_ {
        let live = move |id: &ScopeId| self.scope(*id).is_some();
        std::iter::successors(from.filter(live), move |&id| {
            self.enclosing(id).filter(live)
        })
    }

    /// Number of objects currently held by the table
    pub fn live_objects(&self) -> usize {
        self.objects.iter().flatten().count()
    }

    /// Number of scopes currently held by the table
    pub fn live_scopes(&self) -> usize {
        self.scopes.iter().flatten().count()
    }

    // Object construction

    fn check_name(&self, name: &str) {
        if let Err(err) = validate_identifier(name, self.config.max_ident_len) {
            panic!("symbol table given an invalid identifier: {err}");
        }
    }

    fn push_object(&mut self, name: &str, attrs: ObjectAttributes) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(Some(Object::new(id, name, attrs)));
        id
    }

    /// Create the program object and record it as the table's program.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or too long; identifiers are expected to be
    /// validated by the scanner before they reach the table.
    pub fn create_program_object(&mut self, name: &str) -> ObjectId {
        self.check_name(name);
        if let Some(previous) = self.program {
            tracing::warn!(name, "replacing existing program object");
            self.free_object(previous);
        }
        let id = ObjectId(self.objects.len());
        let scope = self.create_scope(Some(id), None);
        let id = self.push_object(name, ObjectAttributes::Program(ProgramAttributes { scope }));
        self.program = Some(id);
        id
    }

    pub fn create_variable_object(&mut self, name: &str) -> ObjectId {
        self.check_name(name);
        let attrs = VariableAttributes {
            ty: None,
            declared_in: self.current_scope,
        };
        self.push_object(name, ObjectAttributes::Variable(attrs))
    }

    pub fn create_constant_object(&mut self, name: &str) -> ObjectId {
        self.check_name(name);
        self.push_object(
            name,
            ObjectAttributes::Constant(ConstantAttributes { value: None }),
        )
    }

    pub fn create_type_object(&mut self, name: &str) -> ObjectId {
        self.check_name(name);
        self.push_object(
            name,
            ObjectAttributes::Type(TypeAttributes { actual_type: None }),
        )
    }

    /// Create a function whose scope is nested in the current scope
    pub fn create_function_object(&mut self, name: &str) -> ObjectId {
        self.check_name(name);
        let id = ObjectId(self.objects.len());
        let scope = self.create_scope(Some(id), self.current_scope);
        let attrs = FunctionAttributes {
            params: Vec::new(),
            return_type: None,
            scope,
        };
        self.push_object(name, ObjectAttributes::Function(attrs))
    }

    /// Create a procedure whose scope is nested in the current scope
    pub fn create_procedure_object(&mut self, name: &str) -> ObjectId {
        self.check_name(name);
        let id = ObjectId(self.objects.len());
        let scope = self.create_scope(Some(id), self.current_scope);
        let attrs = ProcedureAttributes {
            params: Vec::new(),
            scope,
        };
        self.push_object(name, ObjectAttributes::Procedure(attrs))
    }

    pub fn create_parameter_object(
        &mut self,
        name: &str,
        mode: ParamMode,
        routine: ObjectId,
    ) -> ObjectId {
        self.check_name(name);
        let attrs = ParameterAttributes {
            mode,
            ty: None,
            routine,
        };
        self.push_object(name, ObjectAttributes::Parameter(attrs))
    }

    // Scopes

    pub fn create_scope(&mut self, owner: Option<ObjectId>, enclosing: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Some(Scope::new(id, owner, enclosing)));
        id
    }

    /// Make `scope` the current scope; does nothing for `None`.
    pub fn enter_block(&mut self, scope: Option<ScopeId>) {
        if let Some(scope) = scope {
            tracing::trace!(scope = scope.0, "enter block");
            self.current_scope = Some(scope);
        }
    }

    /// Return to the enclosing scope. The outermost scope is never exited.
    pub fn exit_block(&mut self) {
        let Some(enclosing) = self.current_scope.and_then(|id| self.enclosing(id)) else {
            return;
        };
        tracing::trace!(scope = enclosing.0, "exit block");
        self.current_scope = Some(enclosing);
    }

    // Declaration and lookup

    /// Declare `id` in the current scope.
    ///
    /// Parameters go to their routine's parameter list instead of the scope's
    /// object list. Nothing happens without a current scope. Duplicate names
    /// are not rejected here.
    pub fn declare_object(&mut self, id: ObjectId) {
        let Some(current) = self.current_scope else {
            return;
        };
        let Some(object) = self.object(id) else {
            return;
        };

        if let Some(routine) = object.routine() {
            if !self.push_param(routine, id) {
                tracing::warn!(
                    param = id.0,
                    routine = routine.0,
                    "parameter does not belong to a function or procedure"
                );
            }
            return;
        }

        tracing::debug!(name = object.name(), kind = %object.kind(), scope = current.0, "declare");
        if let Some(scope) = self.scope_mut(current) {
            scope.push(id);
        }
    }

    fn push_param(&mut self, routine: ObjectId, param: ObjectId) -> bool {
        match self.object_mut(routine).and_then(Object::params_mut) {
            Some(params) => {
                params.push(param);
                true
            }
            None => false,
        }
    }

    /// First object in `list` named `name`, in list order.
    pub fn find_object(&self, list: &[ObjectId], name: &str) -> Option<ObjectId> {
        list.iter().copied().find(|&id| {
            self.object(id)
                .is_some_and(|object| self.config.names_match(object.name(), name))
        })
    }

    /// [`find_object`](Self::find_object) over the objects of one scope
    pub fn find_in_scope(&self, scope: ScopeId, name: &str) -> Option<ObjectId> {
        self.scope(scope)
            .and_then(|scope| self.find_object(scope.objects(), name))
    }

    // Teardown

    /// Release `id` and everything it owns.
    ///
    /// Stale handles are ignored. A current scope released along the way is
    /// cleared.
    pub fn free_object(&mut self, id: ObjectId) {
        self.release_object(id);
        self.globals.retain(|&global| global != id);
        if self.program == Some(id) {
            self.program = None;
        }
        if self
            .current_scope
            .is_some_and(|scope| self.scope(scope).is_none())
        {
            self.current_scope = None;
        }
    }

    fn release_object(&mut self, id: ObjectId) {
        let Some(object) = self.objects.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        match object.into_attrs() {
            ObjectAttributes::Function(FunctionAttributes { params, scope, .. })
            | ObjectAttributes::Procedure(ProcedureAttributes { params, scope }) => {
                for param in params {
                    self.release_object(param);
                }
                self.release_scope(scope);
            }
            ObjectAttributes::Program(attrs) => self.release_scope(attrs.scope),
            // owned types and values drop with the attributes
            _ => {}
        }
    }

    fn release_scope(&mut self, id: ScopeId) {
        let Some(scope) = self.scopes.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        for object in scope.into_objects() {
            self.release_object(object);
        }
    }

    /// Release the program, the built-ins and the table itself.
    ///
    /// Objects and scopes that were created but never attached to the
    /// program or the global list are swept last and counted in the report.
    pub fn clean(mut self) -> TeardownReport {
        let objects_released = self.live_objects();
        let scopes_released = self.live_scopes();

        self.current_scope = None;
        if let Some(program) = self.program.take() {
            self.release_object(program);
        }
        for global in std::mem::take(&mut self.globals) {
            self.release_object(global);
        }

        let report = TeardownReport {
            objects_released,
            scopes_released,
            unowned_objects: self.live_objects(),
            unowned_scopes: self.live_scopes(),
        };
        if report.unowned_objects > 0 || report.unowned_scopes > 0 {
            tracing::warn!(
                objects = report.unowned_objects,
                scopes = report.unowned_scopes,
                "sweeping undeclared objects"
            );
        }
        tracing::debug!(?report, "symbol table cleaned");
        report
    }
}
