use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cfamily_analyzer::cpp::ast::ObjectType;
use cfamily_analyzer::cpp::parse_declaration;
use cfamily_analyzer::{ParseOptions, SourceLocation};

const SIGNATURES: &[(&str, ObjectType)] = &[
    ("int foo(int a, const char *b = nullptr)", ObjectType::Function),
    ("template<typename T> class Vector", ObjectType::Class),
    (
        "template<typename T, typename Allocator> void Vector<T>::assign(std::initializer_list<T> values)",
        ObjectType::Function,
    ),
    ("bool operator==(const Vector &other) const noexcept", ObjectType::Function),
    ("virtual auto resize(std::size_t n) -> std::error_code", ObjectType::Function),
    ("int (*callback)(void *, int)", ObjectType::Member),
];

fn bench_parse(c: &mut Criterion) {
    let loc = SourceLocation::new("bench", 1);
    c.bench_function("parse_cpp_declarations", |b| {
        b.iter(|| {
            for (signature, object_type) in SIGNATURES {
                let decl = parse_declaration(
                    black_box(signature),
                    *object_type,
                    &loc,
                    ParseOptions::default(),
                );
                let _ = black_box(decl);
            }
        });
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
