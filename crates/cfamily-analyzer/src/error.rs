use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a declaration came from: document name plus line of the directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub document: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(document: impl Into<String>, line: u32) -> Self {
        Self {
            document: document.into(),
            line,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.document, self.line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefinitionErrorKind {
    /// Malformed input signature.
    Syntax,
    /// Grammatically recognized but unimplemented construct (e.g. a
    /// multi-character character literal).
    UnsupportedConstruct,
}

/// Failure to parse one declaration signature. Recoverable: the caller drops
/// the declaration and reports a build warning at the directive's location.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (at offset {offset})")]
pub struct DefinitionError {
    pub kind: DefinitionErrorKind,
    pub message: String,
    /// Byte offset into the signature text where parsing failed.
    pub offset: usize,
}

impl DefinitionError {
    pub fn syntax(message: impl Into<String>, offset: usize) -> Self {
        Self {
            kind: DefinitionErrorKind::Syntax,
            message: message.into(),
            offset,
        }
    }

    pub fn unsupported(message: impl Into<String>, offset: usize) -> Self {
        Self {
            kind: DefinitionErrorKind::UnsupportedConstruct,
            message: message.into(),
            offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A diagnostic surfaced to the build pipeline, e.g. a duplicate-declaration
/// warning naming both source locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub other_location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            location,
            other_location: None,
        }
    }

    pub fn with_other(mut self, other: Option<SourceLocation>) -> Self {
        self.other_location = other;
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{loc}: {}", self.message)?,
            None => write!(f, "{}", self.message)?,
        }
        if let Some(other) = &self.other_location {
            write!(f, " (previous declaration at {other})")?;
        }
        Ok(())
    }
}

/// Identifier-generation failure. Non-fatal: callers fall back to the
/// current scheme or omit the legacy anchor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The legacy scheme cannot express this declaration.
    #[error("declaration has no legacy identifier")]
    NoLegacyId,
    #[error("unknown identifier scheme version {0}")]
    UnknownVersion(u8),
}

/// Internal invariant violation inside the symbol tree. Fatal for the current
/// document's insertion: the operation is aborted before any mutation that
/// would leave parent/child links inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("internal error: empty identifier in nested name")]
    EmptyIdentifier,
    #[error("internal error: symbol {0} used after removal")]
    StaleSymbol(usize),
    #[error("internal error: parent/child link mismatch at symbol {0}")]
    LinkMismatch(usize),
}
