use serde::{Deserialize, Serialize};

use crate::cpp::ast::template::TemplateArgs;
use crate::cpp::ast::ty::Type;
use crate::render::{DescribeMode, SignatureSink};

pub use crate::ident::{ANON_SENTINEL, Identifier};

/// An overloadable operator name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `operator+`, `operator()`, `operator new[]`, ...
    BuildIn(String),
    /// `operator"" _suffix`
    Literal(Identifier),
    /// Conversion operator: `operator int*`
    Cast(Box<Type>),
}

impl Operator {
    pub fn describe(&self, sink: &mut dyn SignatureSink, as_definition: bool) {
        let text = self.to_string();
        if as_definition {
            sink.name(&text);
        } else {
            sink.type_name(&text);
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuildIn(op) => {
                if op.chars().next().is_some_and(char::is_alphabetic) {
                    write!(f, "operator {op}")
                } else {
                    write!(f, "operator{op}")
                }
            },
            Self::Literal(ident) => write!(f, "operator\"\"{ident}"),
            Self::Cast(ty) => write!(f, "operator {ty}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentOrOp {
    Ident(Identifier),
    Op(Operator),
}

impl IdentOrOp {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(Identifier::new(name))
    }

    pub fn as_ident(&self) -> Option<&Identifier> {
        match self {
            Self::Ident(ident) => Some(ident),
            Self::Op(_) => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Ident(ident) if ident.is_anonymous())
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink, as_definition: bool) {
        match self {
            Self::Ident(ident) => ident.describe(sink, as_definition),
            Self::Op(op) => op.describe(sink, as_definition),
        }
    }
}

impl std::fmt::Display for IdentOrOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ident(ident) => ident.fmt(f),
            Self::Op(op) => op.fmt(f),
        }
    }
}

/// One component of a nested name: identifier-or-operator plus optional
/// template arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestedNameElement {
    pub ident_or_op: IdentOrOp,
    pub template_args: Option<TemplateArgs>,
}

impl NestedNameElement {
    pub fn new(ident_or_op: IdentOrOp, template_args: Option<TemplateArgs>) -> Self {
        Self {
            ident_or_op,
            template_args,
        }
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink, as_definition: bool) {
        self.ident_or_op.describe(sink, as_definition);
        if let Some(args) = &self.template_args {
            sink.text(&args.to_string());
        }
    }
}

impl std::fmt::Display for NestedNameElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ident_or_op.fmt(f)?;
        if let Some(args) = &self.template_args {
            args.fmt(f)?;
        }
        Ok(())
    }
}

/// A possibly-qualified name as written by the user, e.g. `N::M::foo<int>`.
/// `templates[i]` records whether component `i` was preceded by the
/// `template` disambiguation keyword; `rooted` is a leading `::`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestedName {
    pub names: Vec<NestedNameElement>,
    pub templates: Vec<bool>,
    pub rooted: bool,
}

impl NestedName {
    pub fn new(names: Vec<NestedNameElement>, templates: Vec<bool>, rooted: bool) -> Self {
        assert_eq!(names.len(), templates.len());
        Self {
            names,
            templates,
            rooted,
        }
    }

    /// Unqualified single-identifier name.
    pub fn from_ident(ident: Identifier) -> Self {
        Self::new(
            vec![NestedNameElement::new(IdentOrOp::Ident(ident), None)],
            vec![false],
            false,
        )
    }

    pub fn num_components(&self) -> usize {
        self.names.len()
    }

    pub fn last(&self) -> &NestedNameElement {
        self.names.last().expect("nested name with no components")
    }

    pub fn is_anonymous(&self) -> bool {
        self.names.iter().any(|n| n.ident_or_op.is_anonymous())
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink, mode: DescribeMode) {
        match mode {
            DescribeMode::NoneIsName => {
                sink.name(&self.to_string());
            },
            DescribeMode::Param => {
                sink.type_name(&self.to_string());
            },
            DescribeMode::MarkType | DescribeMode::LastIsName => {
                if self.rooted {
                    sink.punct("::");
                }
                let last = self.names.len() - 1;
                for (i, (name, template)) in
                    self.names.iter().zip(self.templates.iter()).enumerate()
                {
                    if i > 0 {
                        sink.punct("::");
                    }
                    if *template {
                        sink.keyword("template");
                        sink.space();
                    }
                    name.describe(sink, i == last);
                }
            },
        }
    }
}

impl std::fmt::Display for NestedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.rooted {
            f.write_str("::")?;
        }
        for (i, (name, template)) in self.names.iter().zip(self.templates.iter()).enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            if *template {
                f.write_str("template ")?;
            }
            name.fmt(f)?;
        }
        Ok(())
    }
}
