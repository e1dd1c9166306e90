//! The C++ domain: declaration AST, parser, symbol tree, and identifier
//! generation.

pub mod ast;
pub mod ids;
pub mod parser;
pub mod symbols;

use tracing::debug;

pub use ast::{Declaration, NestedName, ObjectType};
pub use ids::{IdError, MAX_ID_VERSION, symbol_id};
pub use parser::{ParseOptions, Parser};
pub use symbols::{InsertOutcome, SymbolId, SymbolTree};

use crate::error::{DefinitionError, SourceLocation};

/// Parse one declaration signature as written in a documentation directive.
pub fn parse_declaration(
    signature: &str,
    object_type: ObjectType,
    location: &SourceLocation,
    options: ParseOptions,
) -> Result<Declaration, DefinitionError> {
    let mut parser = Parser::new(signature, options);
    parser
        .parse_declaration(object_type, None)
        .inspect_err(|err| {
            debug!("failed to parse C++ {} at {location}: {err}", object_type.as_str());
        })
}

/// Parse a cross-reference target: a possibly-qualified name with optional
/// template arguments per component.
pub fn parse_cross_reference(
    target: &str,
    options: ParseOptions,
) -> Result<NestedName, DefinitionError> {
    let mut parser = Parser::new(target, options);
    parser.parse_xref_name()
}
