//! Identifiers, shared by the C and C++ domains.

use serde::{Deserialize, Serialize};

use crate::render::SignatureSink;

/// The sentinel character marking anonymous entities.
pub const ANON_SENTINEL: char = '@';

/// A single (possibly anonymous) name. Anonymous identifiers are never
/// matched by name lookup, only by structural position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    name: String,
}

impl Identifier {
    /// Panics on an empty name: that is a parser bug, not an input error.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "empty identifier");
        Self { name }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.starts_with(ANON_SENTINEL)
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink, as_definition: bool) {
        let display = if self.is_anonymous() {
            "[anonymous]"
        } else {
            &self.name
        };
        if as_definition {
            sink.name(display);
        } else {
            sink.type_name(display);
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
