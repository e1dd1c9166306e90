use cfamily_analyzer::cpp::ast::{
    DeclarationBody, Expr, ObjectType, TemplateParam, TemplatePrefixItem,
};
use cfamily_analyzer::cpp::parse_declaration;
use cfamily_analyzer::{
    DefinitionErrorKind, ParseOptions, SourceLocation, TextSink,
};

fn loc() -> SourceLocation {
    SourceLocation::new("doc", 1)
}

fn parse(signature: &str, object_type: ObjectType) -> cfamily_analyzer::cpp::Declaration {
    parse_declaration(signature, object_type, &loc(), ParseOptions::default())
        .unwrap_or_else(|e| panic!("{signature:?} should parse: {e}"))
}

fn roundtrip(signature: &str, object_type: ObjectType) {
    let first = parse(signature, object_type);
    let rendered = first.to_string();
    let second = parse_declaration(&rendered, object_type, &loc(), ParseOptions::default())
        .unwrap_or_else(|e| panic!("canonical form {rendered:?} should re-parse: {e}"));
    assert_eq!(first, second, "round-trip changed the AST for {signature:?}");
}

#[test]
fn function_with_defaulted_pointer_parameter() {
    let decl = parse("int foo(int a, const char *b = nullptr)", ObjectType::Function);
    let params = decl.function_params().expect("function has parameters");
    assert_eq!(params.args.len(), 2);

    let second = params.args[1].arg.as_ref().expect("named parameter");
    assert_eq!(second.ty.abstract_text(), "const char*");
    let init = second.init.as_ref().expect("default value");
    assert_eq!(init.value, Expr::PointerLiteral);

    assert_eq!(decl.to_string(), "int foo(int a, const char *b = nullptr)");
}

#[test]
fn template_class_with_one_type_parameter() {
    let decl = parse("template<typename T> class Vector", ObjectType::Class);
    let prefix = decl.template_prefix.as_ref().expect("template prefix");
    assert_eq!(prefix.templates.len(), 1);
    let TemplatePrefixItem::Params(params) = &prefix.templates[0] else {
        panic!("expected a parameter list, not an introduction");
    };
    assert_eq!(params.params.len(), 1);
    let TemplateParam::Type(data) = &params.params[0] else {
        panic!("expected a type parameter");
    };
    assert_eq!(data.identifier.as_ref().map(|i| i.as_str()), Some("T"));
    assert!(data.default.is_none());
    assert!(!data.parameter_pack);
}

#[test]
fn roundtrip_canonical_forms() {
    for (signature, object_type) in [
        ("int foo(int a, const char *b = nullptr)", ObjectType::Function),
        ("template<typename T> class Vector", ObjectType::Class),
        ("void f(int)", ObjectType::Function),
        ("auto f(int x) -> bool", ObjectType::Function),
        ("bool operator==(const Vector &other) const", ObjectType::Function),
        ("~Vector()", ObjectType::Function),
        ("operator int() const", ObjectType::Function),
        ("static constexpr std::size_t capacity", ObjectType::Member),
        ("int N::M::value = 42", ObjectType::Member),
        ("unsigned long long big", ObjectType::Member),
        ("int (*callback)(void *, int)", ObjectType::Member),
        ("double values[16]", ObjectType::Member),
        ("T N::M::foo", ObjectType::Type),
        ("template<typename ...Ts> void f(Ts ... args)", ObjectType::Function),
        ("template<typename T, int N = 8> class Ring", ObjectType::Class),
        ("enum class State : unsigned char", ObjectType::Enum),
        ("Red = 1", ObjectType::Enumerator),
        ("std::filesystem", ObjectType::Namespace),
        ("void swap(Vector &other) noexcept", ObjectType::Function),
        ("virtual void resize(std::size_t n) = 0", ObjectType::Function),
        ("int &front()", ObjectType::Function),
        ("const int *const p", ObjectType::Member),
    ] {
        roundtrip(signature, object_type);
    }
}

#[test]
fn nested_template_arguments_close_correctly() {
    let decl = parse("Vector<Vector<int>> rows", ObjectType::Member);
    let DeclarationBody::Member(member) = &decl.body else {
        panic!("expected member body");
    };
    let name = member
        .ty
        .decl_specs
        .trailing
        .as_ref()
        .and_then(|t| t.name())
        .expect("named type");
    assert_eq!(name.to_string(), "Vector<Vector<int>>");
    roundtrip("Vector<Vector<int>> rows", ObjectType::Member);
}

#[test]
fn fallback_contains_unparseable_default_argument() {
    let decl = parse("void f(int x = throw Error())", ObjectType::Function);
    let params = decl.function_params().expect("function has parameters");
    let init = params.args[0]
        .arg
        .as_ref()
        .and_then(|a| a.init.as_ref())
        .expect("default value");
    assert_eq!(init.value, Expr::Fallback("throw Error()".to_string()));
}

#[test]
fn strict_mode_rejects_unparseable_default_argument() {
    let options = ParseOptions {
        allow_fallback_expressions: false,
        ..ParseOptions::default()
    };
    let result = parse_declaration("void f(int x = throw Error())", ObjectType::Function, &loc(), options);
    assert!(result.is_err(), "strict mode should fail, got {result:?}");
}

#[test]
fn multi_character_char_literal_is_unsupported_not_syntax() {
    let options = ParseOptions {
        allow_fallback_expressions: false,
        ..ParseOptions::default()
    };
    let err = parse_declaration("int x = 'ab'", ObjectType::Member, &loc(), options)
        .expect_err("multi-character literal should be rejected");
    assert_eq!(err.kind, DefinitionErrorKind::UnsupportedConstruct);
}

#[test]
fn malformed_declarator_reports_offset() {
    let err = parse_declaration("int ***", ObjectType::Function, &loc(), ParseOptions::default())
        .expect_err("no function declarator here");
    assert_eq!(err.kind, DefinitionErrorKind::Syntax);
    assert!(err.offset <= "int ***".len());
}

#[test]
fn fold_expression_in_enumerator_initializer() {
    let decl = parse("Sum = (Ts + ...)", ObjectType::Enumerator);
    let DeclarationBody::Enumerator(e) = &decl.body else {
        panic!("expected enumerator body");
    };
    let init = e.init.as_ref().expect("initializer");
    assert!(
        matches!(init.value, Expr::Fold { .. }),
        "expected fold expression, got {:?}",
        init.value
    );
}

#[test]
fn describe_emits_plain_text_signature() {
    let decl = parse("int foo(int a, const char *b = nullptr)", ObjectType::Function);
    let mut sink = TextSink::new();
    decl.describe_signature(&mut sink);
    assert_eq!(sink.finish(), "int foo(int a, const char *b = nullptr)");
}

#[test]
fn describe_marks_definition_name() {
    use cfamily_analyzer::{Fragment, FragmentSink, SignatureSink as _};
    let decl = parse("int foo(int a)", ObjectType::Function);
    let mut sink = FragmentSink::new();
    decl.describe_signature(&mut sink);
    assert!(
        sink.fragments.contains(&Fragment::Name("foo".to_string())),
        "the declared name should be a Name fragment: {:?}",
        sink.fragments
    );
    assert!(
        !sink.fragments.contains(&Fragment::Name("a".to_string())),
        "parameter names are not definition names: {:?}",
        sink.fragments
    );
}

#[test]
fn requires_clause_is_kept() {
    let decl = parse(
        "template<typename T> requires true void f(T t)",
        ObjectType::Function,
    );
    let prefix = decl.template_prefix.as_ref().expect("template prefix");
    let TemplatePrefixItem::Params(params) = &prefix.templates[0] else {
        panic!("expected parameter list");
    };
    assert!(params.requires_clause.is_some());
}
