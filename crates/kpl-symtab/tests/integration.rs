//! End-to-end tests driving the symbol table the way the parser does.
//!
//! The sample program built here mirrors this KPL source:
//!
//! ```text
//! PROGRAM PRG;
//! CONST c1 = 10; c2 = 'a';
//! TYPE t1 = ARRAY(. 10 .) OF INTEGER;
//! VAR v1 : INTEGER; v2 : ARRAY(. 10 .) OF ARRAY(. 10 .) OF INTEGER;
//! FUNCTION f(p1 : INTEGER; VAR p2 : CHAR) : INTEGER;
//!   VAR v3 : CHAR;
//! PROCEDURE p(v1 : INTEGER);
//!   CONST c1 = 'a'; c3 = 10;
//!   TYPE t1 = INTEGER; t2 = ARRAY(. 10 .) OF INTEGER;
//!   VAR v2 : ARRAY(. 10 .) OF INTEGER; v3 : CHAR;
//! ```

use std::path::{Path, PathBuf};

use kpl_symtab::{
    ConstantValue, LibraryDefinitions, Object, ObjectId, ObjectKind, ParamMode, SymbolTable,
    SymtabConfig, TypeDescriptor,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn int_array(size: i64) -> TypeDescriptor {
    TypeDescriptor::array(size, Some(TypeDescriptor::int())).expect("valid array")
}

fn scope_of(table: &SymbolTable, id: ObjectId) -> kpl_symtab::ScopeId {
    table.object(id).and_then(Object::scope).expect("object owns a scope")
}

fn declare_constant(table: &mut SymbolTable, name: &str, value: ConstantValue) {
    let id = table.create_constant_object(name);
    table
        .object_mut(id)
        .expect("live")
        .set_value(value)
        .expect("constant");
    table.declare_object(id);
}

fn declare_type(table: &mut SymbolTable, name: &str, ty: TypeDescriptor) {
    let id = table.create_type_object(name);
    table.object_mut(id).expect("live").set_type(ty).expect("type");
    table.declare_object(id);
}

fn declare_variable(table: &mut SymbolTable, name: &str, ty: TypeDescriptor) -> ObjectId {
    let id = table.create_variable_object(name);
    table.object_mut(id).expect("live").set_type(ty).expect("variable");
    table.declare_object(id);
    id
}

fn declare_param(table: &mut SymbolTable, name: &str, mode: ParamMode, ty: TypeDescriptor) {
    let routine = table.current_owner().expect("inside a routine");
    let id = table.create_parameter_object(name, mode, routine);
    table.object_mut(id).expect("live").set_type(ty).expect("parameter");
    table.declare_object(id);
}

fn build_sample_program(table: &mut SymbolTable) -> ObjectId {
    let program = table.create_program_object("PRG");
    let scope = scope_of(table, program);
    table.enter_block(Some(scope));

    declare_constant(table, "c1", ConstantValue::int(10));
    declare_constant(table, "c2", ConstantValue::char('a'));
    declare_type(table, "t1", int_array(10));
    declare_variable(table, "v1", TypeDescriptor::int());
    let matrix = TypeDescriptor::array(10, Some(int_array(10))).expect("valid array");
    declare_variable(table, "v2", matrix);

    let f = table.create_function_object("f");
    table
        .object_mut(f)
        .expect("live")
        .set_type(TypeDescriptor::int())
        .expect("function");
    table.declare_object(f);
    let scope = scope_of(table, f);
    table.enter_block(Some(scope));
    declare_param(table, "p1", ParamMode::Value, TypeDescriptor::int());
    declare_param(table, "p2", ParamMode::Reference, TypeDescriptor::char());
    declare_variable(table, "v3", TypeDescriptor::char());
    table.exit_block();

    let p = table.create_procedure_object("p");
    table.declare_object(p);
    let scope = scope_of(table, p);
    table.enter_block(Some(scope));
    declare_param(table, "v1", ParamMode::Value, TypeDescriptor::int());
    declare_constant(table, "c1", ConstantValue::char('a'));
    declare_constant(table, "c3", ConstantValue::int(10));
    declare_type(table, "t1", TypeDescriptor::int());
    declare_type(table, "t2", int_array(10));
    declare_variable(table, "v2", int_array(10));
    declare_variable(table, "v3", TypeDescriptor::char());
    table.exit_block();

    program
}

// =============================================================================
// Golden dump
// =============================================================================

#[test]
fn sample_program_matches_golden_dump() {
    init_tracing();
    let mut table = SymbolTable::new();
    let program = build_sample_program(&mut table);

    let expected = std::fs::read_to_string(fixtures_dir().join("sample_program.dump"))
        .expect("Failed to read fixture file");
    assert_eq!(table.dump_object(program).to_string(), expected);
}

#[test]
fn sample_program_tears_down_cleanly() {
    init_tracing();
    let mut table = SymbolTable::new();
    build_sample_program(&mut table);

    // 5 built-ins + 2 built-in params + PRG and its 17 nested objects
    assert_eq!(table.live_objects(), 25);
    // PRG, f, p and one scope per built-in
    assert_eq!(table.live_scopes(), 8);

    let report = table.clean();
    assert_eq!(report.objects_released, 25);
    assert_eq!(report.scopes_released, 8);
    assert_eq!(report.unowned_objects, 0);
    assert_eq!(report.unowned_scopes, 0);
}

// =============================================================================
// Declaration and lookup scenarios
// =============================================================================

#[test]
fn function_parameters_are_not_scope_members() {
    init_tracing();
    let mut table = SymbolTable::new();
    let program = table.create_program_object("PRG");
    let prg_scope = scope_of(&table, program);
    table.enter_block(Some(prg_scope));

    let f = table.create_function_object("F");
    table.declare_object(f);
    let x = table.create_parameter_object("x", ParamMode::Value, f);
    table
        .object_mut(x)
        .expect("live")
        .set_type(TypeDescriptor::int())
        .expect("parameter");
    table.declare_object(x);

    let f_scope = scope_of(&table, f);
    table.enter_block(Some(f_scope));
    let y = declare_variable(&mut table, "y", TypeDescriptor::int());
    table.exit_block();

    assert_eq!(table.current_scope(), Some(prg_scope));
    assert_eq!(table.find_in_scope(prg_scope, "F"), Some(f));
    assert!(table.find_in_scope(prg_scope, "x").is_none());
    assert_eq!(table.find_in_scope(f_scope, "y"), Some(y));
    assert_eq!(table.object(f).map(Object::params), Some(&[x][..]));
    assert_eq!(table.object(y).and_then(Object::declared_in), Some(f_scope));
}

/// The outward walk a semantic analyzer composes from the primitives:
/// routine parameters, then each scope outward, then the built-ins.
fn resolve(table: &SymbolTable, name: &str) -> Option<ObjectId> {
    for scope_id in table.scope_chain(table.current_scope()) {
        let scope = table.scope(scope_id)?;
        let params = scope
            .owner
            .and_then(|owner| table.object(owner))
            .map(Object::params)
            .unwrap_or_default();
        if let Some(found) = table.find_object(params, name) {
            return Some(found);
        }
        if let Some(found) = table.find_object(scope.objects(), name) {
            return Some(found);
        }
    }
    table.find_object(table.global_objects(), name)
}

#[test]
fn inner_declarations_shadow_outer_ones() {
    init_tracing();
    let mut table = SymbolTable::new();
    build_sample_program(&mut table);
    let program = table.program().expect("program");
    let prg_scope = scope_of(&table, program);
    let p = table.find_in_scope(prg_scope, "p").expect("procedure p");
    table.enter_block(Some(scope_of(&table, p)));

    // v1 is p's parameter, shadowing the program variable
    let v1 = resolve(&table, "v1").expect("v1");
    assert_eq!(table.object(v1).map(Object::kind), Some(ObjectKind::Parameter));

    // c1 is p's char constant, shadowing the program's integer constant
    let c1 = resolve(&table, "c1").expect("c1");
    assert_eq!(
        table.object(c1).and_then(Object::constant_value),
        Some(&ConstantValue::Char('a'))
    );

    // c2 only exists in the program scope
    let c2 = resolve(&table, "c2").expect("c2");
    assert_eq!(
        table.object(c2).and_then(Object::constant_value),
        Some(&ConstantValue::Char('a'))
    );

    // built-ins are found last
    let writeln = resolve(&table, "WRITELN").expect("WRITELN");
    assert_eq!(table.global_objects().last(), Some(&writeln));

    assert!(resolve(&table, "p1").is_none());
    table.exit_block();
    assert!(resolve(&table, "v3").is_none());
}

#[test]
fn redeclaration_is_left_to_the_caller() {
    init_tracing();
    let mut table = SymbolTable::new();
    let program = table.create_program_object("PRG");
    let prg_scope = scope_of(&table, program);
    table.enter_block(Some(prg_scope));

    let first = declare_variable(&mut table, "a", TypeDescriptor::int());
    declare_variable(&mut table, "b", TypeDescriptor::int());
    let second = declare_variable(&mut table, "a", TypeDescriptor::char());

    let scope = table.scope(prg_scope).expect("live");
    assert_eq!(scope.len(), 3);
    assert_eq!(table.find_object(scope.objects(), "a"), Some(first));
    assert_ne!(first, second);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn clean_then_init_reproduces_globals() {
    init_tracing();
    let first = SymbolTable::new();
    let first_dump = first.dump_objects(first.global_objects()).to_string();
    let report = first.clean();
    assert_eq!(report.objects_released, 7);
    assert_eq!(report.scopes_released, 5);

    let second = SymbolTable::new();
    assert_eq!(
        second.dump_objects(second.global_objects()).to_string(),
        first_dump
    );
    for name in ["READC", "READI", "WRITEI", "WRITEC", "WRITELN"] {
        assert!(
            second.find_object(second.global_objects(), name).is_some(),
            "missing built-in {name}"
        );
    }
}

#[test]
fn independent_tables_do_not_interact() {
    init_tracing();
    let mut a = SymbolTable::new();
    let b = SymbolTable::new();
    build_sample_program(&mut a);
    assert!(b.program().is_none());
    assert_eq!(b.live_objects(), 7);
}

// =============================================================================
// Configuration and library fixtures
// =============================================================================

#[test]
fn library_fixture_matches_builtin_library() {
    let lib = LibraryDefinitions::load_from_file(&fixtures_dir().join("kpl-library.toml"))
        .expect("Failed to load library definitions");
    assert_eq!(lib, LibraryDefinitions::kpl());

    let table = SymbolTable::with_library(SymtabConfig::default(), &lib).expect("valid library");
    let builtin = SymbolTable::new();
    assert_eq!(
        table.dump_objects(table.global_objects()).to_string(),
        builtin.dump_objects(builtin.global_objects()).to_string()
    );
}

#[test]
fn config_fixture_enables_case_insensitive_lookup() {
    let config = SymtabConfig::load_from_file(&fixtures_dir().join("case-insensitive.toml"))
        .expect("Failed to load config");
    assert!(!config.case_sensitive);

    let mut table = SymbolTable::with_config(config).expect("valid config");
    let program = table.create_program_object("PRG");
    table.enter_block(Some(scope_of(&table, program)));
    let count = declare_variable(&mut table, "Count", TypeDescriptor::int());
    assert_eq!(resolve(&table, "COUNT"), Some(count));
    assert!(resolve(&table, "readi").is_some());
}

#[test]
fn identifier_limit_below_builtin_names_is_rejected() {
    let config = SymtabConfig::load_from_str("max_ident_len = 5").expect("Failed to parse config");
    let result = SymbolTable::with_config(config);
    assert!(matches!(result, Err(kpl_symtab::SymtabError::Name(_))));
}

#[test]
fn missing_fixture_is_an_io_error() {
    let result = SymtabConfig::load_from_file(&fixtures_dir().join("does-not-exist.toml"));
    assert!(matches!(result, Err(kpl_symtab::SymtabError::Io(_))));
}
