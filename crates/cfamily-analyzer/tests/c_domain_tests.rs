use cfamily_analyzer::c::ast::{DeclarationBody, Expr, ObjectType};
use cfamily_analyzer::c::{SymbolTree, parse_cross_reference, parse_declaration, symbol_id};
use cfamily_analyzer::{ParseOptions, SourceLocation, TextSink};

fn loc() -> SourceLocation {
    SourceLocation::new("doc", 1)
}

fn parse(signature: &str, object_type: ObjectType) -> cfamily_analyzer::c::Declaration {
    parse_declaration(signature, object_type, &loc(), ParseOptions::default())
        .unwrap_or_else(|e| panic!("{signature:?} should parse: {e}"))
}

fn insert(
    tree: &mut SymbolTree,
    signature: &str,
    object_type: ObjectType,
    docname: &str,
    line: u32,
) -> cfamily_analyzer::c::InsertOutcome {
    let decl = parse(signature, object_type);
    let root = tree.root();
    tree.insert(root, decl, docname, line)
        .unwrap_or_else(|e| panic!("{signature:?} should insert: {e}"))
}

fn lookup(tree: &SymbolTree, target: &str) -> Vec<cfamily_analyzer::c::SymbolId> {
    let name = parse_cross_reference(target, ParseOptions::default())
        .unwrap_or_else(|e| panic!("{target:?} should parse as a name: {e}"));
    tree.lookup(tree.root(), &name)
}

#[test]
fn function_with_restrict_pointer_parameter() {
    let decl = parse(
        "ssize_t read(int fd, void *restrict buf, size_t count)",
        ObjectType::Function,
    );
    let params = decl.function_params().expect("function has parameters");
    assert_eq!(params.args.len(), 3);
    let buf = params.args[1].arg.as_ref().expect("named parameter");
    assert_eq!(buf.ty.abstract_text(), "void*restrict");
    assert_eq!(
        decl.to_string(),
        "ssize_t read(int fd, void *restrict buf, size_t count)"
    );
}

#[test]
fn roundtrip_canonical_forms() {
    for (signature, object_type) in [
        ("int main(int argc, char *argv[])", ObjectType::Function),
        ("static inline int clamp(int v, int lo, int hi)", ObjectType::Function),
        ("const char *version", ObjectType::Member),
        ("unsigned flags : 4", ObjectType::Member),
        ("double matrix[4][4]", ObjectType::Member),
        ("int buf[static 10]", ObjectType::Member),
        ("_Thread_local int counter", ObjectType::Member),
        ("Point", ObjectType::Struct),
        ("Color", ObjectType::Enum),
        ("RED = 1", ObjectType::Enumerator),
        ("size_t offset_of", ObjectType::Type),
        ("int (*handler)(int, void *)", ObjectType::Member),
    ] {
        let first = parse(signature, object_type);
        let rendered = first.to_string();
        let second = parse_declaration(&rendered, object_type, &loc(), ParseOptions::default())
            .unwrap_or_else(|e| panic!("canonical form {rendered:?} should re-parse: {e}"));
        assert_eq!(first, second, "round-trip changed the AST for {signature:?}");
    }
}

#[test]
fn object_like_and_function_like_macros() {
    let object = parse("VERSION", ObjectType::Macro);
    let DeclarationBody::Macro(m) = &object.body else {
        panic!("expected macro body");
    };
    assert!(m.args.is_none());

    let function = parse("LOG(level, fmt, ...)", ObjectType::Macro);
    let DeclarationBody::Macro(m) = &function.body else {
        panic!("expected macro body");
    };
    let args = m.args.as_ref().expect("function-like macro");
    assert_eq!(args.len(), 3);
    assert!(args[2].ellipsis);
    assert_eq!(function.to_string(), "LOG(level, fmt, ...)");

    let named_variadic = parse("CHECK(cond, args...)", ObjectType::Macro);
    let DeclarationBody::Macro(m) = &named_variadic.body else {
        panic!("expected macro body");
    };
    assert!(m.args.as_ref().expect("args")[1].variadic);
}

#[test]
fn vla_and_qualified_array_bounds() {
    let decl = parse("void f(int n, double data[restrict static n])", ObjectType::Function);
    assert_eq!(
        decl.to_string(),
        "void f(int n, double data[static restrict n])"
    );

    let vla = parse("void g(int rows[*])", ObjectType::Function);
    assert_eq!(vla.to_string(), "void g(int rows[*])");
}

#[test]
fn fallback_for_macro_sized_array() {
    let decl = parse("char name[MAX_NAME + 1]", ObjectType::Member);
    // Parses strictly: a binary expression over an identifier.
    assert_eq!(decl.to_string(), "char name[MAX_NAME + 1]");

    let fallback = parse("char name[offsetof(struct s, f)]", ObjectType::Member);
    let DeclarationBody::Member(m) = &fallback.body else {
        panic!("expected member body");
    };
    let text = m.ty.decl.to_string();
    assert!(
        text.contains("offsetof"),
        "array bound kept verbatim: {text}"
    );
}

#[test]
fn dotted_insertion_and_enum_transparency() {
    let mut tree = SymbolTree::new();
    insert(&mut tree, "Data", ObjectType::Struct, "doc", 1);
    insert(&mut tree, "int Data.refcount", ObjectType::Member, "doc", 2);
    insert(&mut tree, "Color", ObjectType::Enum, "doc", 3);
    let red = insert(&mut tree, "Color.RED", ObjectType::Enumerator, "doc", 4);

    assert_eq!(lookup(&tree, "Data.refcount").len(), 1);
    assert_eq!(
        red.enumerator_scope.map(|s| tree.full_name(s)),
        Some("Color".to_string())
    );
    assert_eq!(lookup(&tree, "RED").len(), 1, "C enumerators leak into the parent scope");
}

#[test]
fn redeclaration_is_flagged_once() {
    let mut tree = SymbolTree::new();
    let first = insert(&mut tree, "int x", ObjectType::Member, "doc", 1);
    let second = insert(&mut tree, "int x", ObjectType::Member, "doc", 5);
    assert!(first.diagnostics.is_empty());
    assert_eq!(second.diagnostics.len(), 1);
    assert!(tree.get(second.symbol).is_redeclaration());
}

#[test]
fn ids_use_versioned_prefixes() {
    let mut tree = SymbolTree::new();
    insert(&mut tree, "Data", ObjectType::Struct, "doc", 1);
    let field = insert(&mut tree, "int Data.refcount", ObjectType::Member, "doc", 2);
    assert_eq!(symbol_id(&tree, field.symbol, 1).unwrap(), "c.Data.refcount");
    assert_eq!(symbol_id(&tree, field.symbol, 2).unwrap(), "Cv2.Data.refcount");

    let log = insert(&mut tree, "LOG(level, fmt, ...)", ObjectType::Macro, "doc", 3);
    assert_eq!(symbol_id(&tree, log.symbol, 1).unwrap(), "c.LOG");
    assert_eq!(symbol_id(&tree, log.symbol, 2).unwrap(), "Cv2.LOG__3");
}

#[test]
fn prune_completeness() {
    let mut tree = SymbolTree::new();
    insert(&mut tree, "Data", ObjectType::Struct, "doc-a", 1);
    insert(&mut tree, "int Data.x", ObjectType::Member, "doc-a", 2);
    insert(&mut tree, "int standalone", ObjectType::Member, "doc-b", 1);

    tree.prune("doc-a");
    assert!(lookup(&tree, "Data").is_empty());
    assert!(lookup(&tree, "Data.x").is_empty());
    assert_eq!(lookup(&tree, "standalone").len(), 1);
}

#[test]
fn describe_emits_plain_text_signature() {
    let decl = parse("const char *version", ObjectType::Member);
    let mut sink = TextSink::new();
    decl.describe_signature(&mut sink);
    assert_eq!(sink.finish(), "const char *version");
}

#[test]
fn serialization_round_trips() {
    let mut tree = SymbolTree::new();
    insert(&mut tree, "Data", ObjectType::Struct, "doc", 1);
    insert(&mut tree, "int Data.x", ObjectType::Member, "doc", 2);
    let json = serde_json::to_string(&tree).expect("serializes");
    let restored: SymbolTree = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(tree, restored);
}
