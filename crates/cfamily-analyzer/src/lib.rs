//! Declaration-signature parser and symbol-table resolver for C and C++
//! documentation tooling.
//!
//! Each documentation directive's signature string is parsed into an
//! immutable AST, registered into a persistent symbol tree (qualified
//! lookup, overloads, redeclaration detection, incremental prune/merge),
//! and given stable identifiers for cross-referencing.

pub mod attrs;
pub mod c;
pub mod cpp;
pub mod document;
pub mod error;
pub mod ident;
pub mod options;
pub mod render;
pub mod syntax;

pub use document::{DocumentEntry, DocumentStore, Project};
pub use error::{
    DefinitionError, DefinitionErrorKind, Diagnostic, IdError, Severity, SourceLocation,
    TreeError,
};
pub use ident::{ANON_SENTINEL, Identifier};
pub use options::ParseOptions;
pub use render::{DescribeMode, Fragment, FragmentSink, SignatureSink, TextSink};
