//! Semantic signature fragments.
//!
//! Declarations are rendered as a stream of typed fragments into a
//! caller-provided sink, never as pre-formatted strings, so HTML, LaTeX, and
//! text writers can style each fragment class independently.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fragment {
    /// The name being declared (link target).
    Name(String),
    /// A reference to another type by name.
    TypeName(String),
    Keyword(String),
    Operator(String),
    Punctuation(String),
    Literal(String),
    Space,
    /// Uninterpreted source text (expressions, fallback spans).
    Text(String),
}

/// How a type/declarator pair is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescribeMode {
    /// Full declaration: the terminal name is the definition name, everything
    /// else is marked up as types/keywords.
    MarkType,
    /// The whole rendering is one name (e.g. cross-reference targets).
    NoneIsName,
    /// Function parameter position: nothing is a definition name.
    Param,
    /// Only the last nested-name component is the definition name.
    LastIsName,
}

pub trait SignatureSink {
    fn emit(&mut self, fragment: Fragment);

    fn keyword(&mut self, kw: &str) {
        self.emit(Fragment::Keyword(kw.to_string()));
    }

    fn punct(&mut self, p: &str) {
        self.emit(Fragment::Punctuation(p.to_string()));
    }

    fn operator(&mut self, op: &str) {
        self.emit(Fragment::Operator(op.to_string()));
    }

    fn name(&mut self, name: &str) {
        self.emit(Fragment::Name(name.to_string()));
    }

    fn type_name(&mut self, name: &str) {
        self.emit(Fragment::TypeName(name.to_string()));
    }

    fn text(&mut self, text: &str) {
        self.emit(Fragment::Text(text.to_string()));
    }

    fn space(&mut self) {
        self.emit(Fragment::Space);
    }
}

/// Sink that flattens fragments to plain text. Used in tests and as the
/// reference rendering for debugging.
#[derive(Debug, Default)]
pub struct TextSink {
    out: String,
}

impl TextSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl SignatureSink for TextSink {
    fn emit(&mut self, fragment: Fragment) {
        match fragment {
            Fragment::Space => self.out.push(' '),
            Fragment::Name(s)
            | Fragment::TypeName(s)
            | Fragment::Keyword(s)
            | Fragment::Operator(s)
            | Fragment::Punctuation(s)
            | Fragment::Literal(s)
            | Fragment::Text(s) => self.out.push_str(&s),
        }
    }
}

/// Sink that records the raw fragment stream.
#[derive(Debug, Default)]
pub struct FragmentSink {
    pub fragments: Vec<Fragment>,
}

impl FragmentSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignatureSink for FragmentSink {
    fn emit(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }
}
