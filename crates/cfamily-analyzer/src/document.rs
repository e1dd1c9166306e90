//! Per-document parse products and the project-wide merge.
//!
//! Distinct documents may be parsed in parallel, each into its own
//! [`DocumentEntry`] (declarations inserted into a document-local symbol
//! tree). The store is a concurrent map so workers never contend on shared
//! tree state; merging into the project tree is a serialization point, done
//! on one thread in document-name order so duplicate-declaration warnings
//! are reproducible across runs.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;
use crate::{c, cpp};

/// Everything one document's parse produced.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub cpp: cpp::SymbolTree,
    pub c: c::SymbolTree,
    /// Diagnostics collected while inserting into the document-local trees.
    pub diagnostics: Vec<Diagnostic>,
}

/// Thread-safe store of per-document parse products.
pub struct DocumentStore {
    entries: DashMap<String, DocumentEntry>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Store a finished per-document parse, replacing any existing entry.
    pub fn insert(&self, docname: impl Into<String>, entry: DocumentEntry) {
        self.entries.insert(docname.into(), entry);
    }

    pub fn get(&self, docname: &str) -> Option<DocumentEntry> {
        self.entries.get(docname).map(|e| e.clone())
    }

    pub fn remove(&self, docname: &str) {
        self.entries.remove(docname);
    }

    /// Document names in merge order.
    pub fn docnames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The project-wide symbol trees, owned by the build orchestrator across
/// incremental builds. Plain data: the orchestrator persists and restores it
/// between runs.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Project {
    pub cpp: cpp::SymbolTree,
    pub c: c::SymbolTree,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the store into the project trees, one document at a time in
    /// name order. A document's sub-tree is committed only if its merge
    /// fully succeeds; an internal tree error drops that document and is
    /// reported, leaving the project tree as it was.
    pub fn merge_all(&mut self, store: &DocumentStore) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for docname in store.docnames() {
            let Some(entry) = store.get(&docname) else {
                continue;
            };
            store.remove(&docname);
            diagnostics.extend(entry.diagnostics.iter().cloned());

            let mut cpp_tree = self.cpp.clone();
            match cpp_tree.merge(&entry.cpp) {
                Ok(merge_diags) => {
                    self.cpp = cpp_tree;
                    diagnostics.extend(merge_diags);
                },
                Err(err) => {
                    diagnostics.push(Diagnostic::warning(
                        format!("dropped C++ declarations of document '{docname}': {err}"),
                        None,
                    ));
                },
            }

            let mut c_tree = self.c.clone();
            match c_tree.merge(&entry.c) {
                Ok(merge_diags) => {
                    self.c = c_tree;
                    diagnostics.extend(merge_diags);
                },
                Err(err) => {
                    diagnostics.push(Diagnostic::warning(
                        format!("dropped C declarations of document '{docname}': {err}"),
                        None,
                    ));
                },
            }
        }
        diagnostics
    }

    /// Remove every symbol whose provenance is `docname`, e.g. before an
    /// incremental re-read of that document.
    pub fn prune(&mut self, docname: &str) {
        self.cpp.prune(docname);
        self.c.prune(docname);
    }
}
