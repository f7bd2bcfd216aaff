//! Lexical scopes.
//!
//! A scope lists the objects declared directly inside one block, in
//! declaration order. Scopes nest through the `enclosing` link; the `owner`
//! link names the program or routine whose block this is.

use crate::object::ObjectId;

/// Unique identifier for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

/// A scope in the scope chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub id: ScopeId,
    /// Declared objects, duplicates allowed; lookups take the first match
    objects: Vec<ObjectId>,
    /// Program or routine owning this scope (back-reference)
    pub owner: Option<ObjectId>,
    /// Immediately enclosing scope, `None` for the outermost one
    pub enclosing: Option<ScopeId>,
}

impl Scope {
    pub fn new(id: ScopeId, owner: Option<ObjectId>, enclosing: Option<ScopeId>) -> Self {
        Self {
            id,
            objects: Vec::new(),
            owner,
            enclosing,
        }
    }

    /// Objects declared in this scope, in declaration order
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    pub(crate) fn push(&mut self, object: ObjectId) {
        self.objects.push(object);
    }

    pub(crate) fn into_objects(self) -> Vec<ObjectId> {
        self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}
