//! Stable identifier generation for C symbols.
//!
//! C has no overloading, so both schemes are dotted paths; they differ only
//! in prefix and in whether function-like macros carry their arity. Version
//! 1 is the legacy `c.` scheme kept for previously published links; version
//! 2 (`Cv2.`) is current.

use crate::c::ast::DeclarationBody;
use crate::c::symbols::{SymbolId, SymbolTree};
use crate::error::IdError;

pub const MAX_ID_VERSION: u8 = 2;

pub fn symbol_id(tree: &SymbolTree, symbol: SymbolId, version: u8) -> Result<String, IdError> {
    let prefix = match version {
        1 => "c.",
        2 => "Cv2.",
        other => return Err(IdError::UnknownVersion(other)),
    };
    let mut parts = Vec::new();
    for id in tree.ancestors(symbol) {
        if let Some(ident) = tree.get(id).ident() {
            parts.push(ident.as_str().to_string());
        }
    }
    parts.reverse();
    let mut out = format!("{prefix}{}", parts.join("."));
    if version >= 2
        && let Some(decl) = tree.get(symbol).declaration()
        && let DeclarationBody::Macro(m) = &decl.body
        && let Some(args) = &m.args
    {
        out.push_str(&format!("__{}", args.len()));
    }
    Ok(out)
}
