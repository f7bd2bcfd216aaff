pub mod config;
pub mod constant;
pub mod debug;
pub mod error;
pub mod library;
pub mod object;
pub mod scope;
pub mod table;
pub mod types;

pub use config::SymtabConfig;
pub use constant::ConstantValue;
pub use error::SymtabError;
pub use library::LibraryDefinitions;
pub use object::{Object, ObjectAttributes, ObjectId, ObjectKind, ParamMode};
pub use scope::{Scope, ScopeId};
pub use table::{SymbolTable, TeardownReport};
pub use types::{TypeDescriptor, TypeError};
