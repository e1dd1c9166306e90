//! Attribute forms shared by the C and C++ domains.

use serde::{Deserialize, Serialize};

use crate::render::SignatureSink;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// C++11 `[[...]]`; the balanced token soup is kept verbatim.
    Cpp(String),
    /// GNU `__attribute__((name(args), ...))`.
    Gnu(Vec<GnuAttribute>),
    /// A bare user-declared attribute keyword.
    Id(String),
    /// A user-declared attribute with a parenthesized argument.
    Paren { id: String, arg: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GnuAttribute {
    pub name: String,
    /// Verbatim argument list, parentheses included.
    pub args: Option<String>,
}

impl std::fmt::Display for GnuAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        if let Some(args) = &self.args {
            f.write_str(args)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpp(arg) => write!(f, "[[{arg}]]"),
            Self::Gnu(attrs) => {
                f.write_str("__attribute__((")?;
                for (i, a) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    a.fmt(f)?;
                }
                f.write_str("))")
            },
            Self::Id(id) => f.write_str(id),
            Self::Paren { id, arg } => write!(f, "{id}({arg})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AttributeList {
    pub attrs: Vec<Attribute>,
}

impl AttributeList {
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink) {
        for (i, attr) in self.attrs.iter().enumerate() {
            if i > 0 {
                sink.space();
            }
            sink.text(&attr.to_string());
        }
    }
}

impl std::fmt::Display for AttributeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, attr) in self.attrs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            attr.fmt(f)?;
        }
        Ok(())
    }
}
