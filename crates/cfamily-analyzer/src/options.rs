//! Per-parse configuration shared by the C and C++ domains.

/// Handed in by the build pipeline for every parse request. Carried
/// explicitly (never global state) so parallel per-document parses cannot
/// interfere.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// When strict expression parsing fails, capture the balanced span as an
    /// opaque fallback expression instead of failing the declaration.
    pub allow_fallback_expressions: bool,
    /// Highest identifier-scheme version to generate for symbols of this
    /// declaration.
    pub max_id_version: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_fallback_expressions: true,
            max_id_version: crate::cpp::ids::MAX_ID_VERSION,
        }
    }
}
