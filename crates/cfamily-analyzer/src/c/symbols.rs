//! The C symbol tree: the same arena discipline as the C++ tree without
//! template identity. C has no overloading, so a second declaration of a
//! name is always a redeclaration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::c::ast::{Declaration, DeclarationBody, NestedName, ObjectType};
use crate::error::{Diagnostic, SourceLocation, TreeError};
use crate::ident::Identifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(usize);

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolData {
    parent: Option<SymbolId>,
    children: Vec<SymbolId>,
    children_by_name: HashMap<String, Vec<SymbolId>>,
    children_by_doc: HashMap<String, Vec<SymbolId>>,
    ident: Option<Identifier>,
    declaration: Option<Declaration>,
    docname: Option<String>,
    line: Option<u32>,
    is_redeclaration: bool,
    alive: bool,
}

impl SymbolData {
    fn placeholder(ident: Option<Identifier>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            children_by_name: HashMap::new(),
            children_by_doc: HashMap::new(),
            ident,
            declaration: None,
            docname: None,
            line: None,
            is_redeclaration: false,
            alive: true,
        }
    }

    pub fn ident(&self) -> Option<&Identifier> {
        self.ident.as_ref()
    }

    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    pub fn docname(&self) -> Option<&str> {
        self.docname.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn is_redeclaration(&self) -> bool {
        self.is_redeclaration
    }
}

#[derive(Debug)]
pub struct InsertOutcome {
    pub symbol: SymbolId,
    /// For enumerators: the enum symbol through which scoped lookup goes.
    pub enumerator_scope: Option<SymbolId>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolTree {
    symbols: Vec<SymbolData>,
    root: SymbolId,
}

impl Default for SymbolTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTree {
    pub fn new() -> Self {
        Self {
            symbols: vec![SymbolData::placeholder(None)],
            root: SymbolId(0),
        }
    }

    pub fn root(&self) -> SymbolId {
        self.root
    }

    pub fn get(&self, id: SymbolId) -> &SymbolData {
        &self.symbols[id.0]
    }

    fn get_mut(&mut self, id: SymbolId) -> &mut SymbolData {
        &mut self.symbols[id.0]
    }

    pub fn parent(&self, id: SymbolId) -> Option<SymbolId> {
        self.get(id).parent
    }

    pub fn children(&self, id: SymbolId) -> &[SymbolId] {
        &self.get(id).children
    }

    pub fn sibling_above(&self, id: SymbolId) -> Option<SymbolId> {
        let parent = self.get(id).parent?;
        let siblings = &self.get(parent).children;
        let index = siblings.iter().position(|&c| c == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    pub fn sibling_below(&self, id: SymbolId) -> Option<SymbolId> {
        let parent = self.get(id).parent?;
        let siblings = &self.get(parent).children;
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    pub fn ancestors(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut out = vec![id];
        let mut cur = id;
        while let Some(parent) = self.get(cur).parent {
            out.push(parent);
            cur = parent;
        }
        out
    }

    pub fn full_name(&self, id: SymbolId) -> String {
        let mut parts = Vec::new();
        for ancestor in self.ancestors(id) {
            if let Some(ident) = &self.get(ancestor).ident {
                parts.push(ident.to_string());
            }
        }
        parts.reverse();
        parts.join(".")
    }

    pub fn location(&self, id: SymbolId) -> Option<SourceLocation> {
        let data = self.get(id);
        Some(SourceLocation::new(data.docname.clone()?, data.line?))
    }

    // ---- link maintenance --------------------------------------------------

    fn new_symbol(&mut self, data: SymbolData) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        self.symbols.push(data);
        id
    }

    fn attach_child(&mut self, parent: SymbolId, child: SymbolId) -> Result<(), TreeError> {
        if !self.get(parent).alive || !self.get(child).alive {
            return Err(TreeError::StaleSymbol(child.0));
        }
        self.get_mut(child).parent = Some(parent);
        self.get_mut(parent).children.push(child);
        if let Some(key) = self.get(child).ident.as_ref().map(|i| i.to_string()) {
            self.get_mut(parent)
                .children_by_name
                .entry(key)
                .or_default()
                .push(child);
        }
        if let Some(doc) = self.get(child).docname.clone() {
            self.get_mut(parent)
                .children_by_doc
                .entry(doc)
                .or_default()
                .push(child);
        }
        if self.get(child).parent != Some(parent) || !self.get(parent).children.contains(&child)
        {
            return Err(TreeError::LinkMismatch(child.0));
        }
        Ok(())
    }

    fn detach_child(&mut self, parent: SymbolId, child: SymbolId) {
        let key = self.get(child).ident.as_ref().map(|i| i.to_string());
        let doc = self.get(child).docname.clone();
        let data = self.get_mut(parent);
        data.children.retain(|&c| c != child);
        if let Some(key) = key
            && let Some(ids) = data.children_by_name.get_mut(&key)
        {
            ids.retain(|&c| c != child);
            if ids.is_empty() {
                data.children_by_name.remove(&key);
            }
        }
        if let Some(doc) = doc
            && let Some(ids) = data.children_by_doc.get_mut(&doc)
        {
            ids.retain(|&c| c != child);
            if ids.is_empty() {
                data.children_by_doc.remove(&doc);
            }
        }
        self.get_mut(child).parent = None;
    }

    fn find_children(&self, scope: SymbolId, ident: &Identifier) -> Vec<SymbolId> {
        self.get(scope)
            .children_by_name
            .get(ident.as_str())
            .cloned()
            .unwrap_or_default()
    }

    // ---- insertion ---------------------------------------------------------

    pub fn insert(
        &mut self,
        scope: SymbolId,
        declaration: Declaration,
        docname: &str,
        line: u32,
    ) -> Result<InsertOutcome, TreeError> {
        let name = match declaration.name() {
            Some(name) => name.clone(),
            None => NestedName::from_ident(self.synthesize_anonymous_name(scope)),
        };
        if name.names.is_empty() {
            return Err(TreeError::EmptyIdentifier);
        }

        let start = if name.rooted { self.root } else { scope };
        let mut parent = start;
        for ident in &name.names[..name.names.len() - 1] {
            let existing = self.find_children(parent, ident).first().copied();
            parent = match existing {
                Some(found) => found,
                None => {
                    let data = SymbolData::placeholder(Some(ident.clone()));
                    let id = self.new_symbol(data);
                    self.attach_child(parent, id)?;
                    id
                },
            };
        }

        let last = name.last();
        let mut diagnostics = Vec::new();
        let candidates = self.find_children(parent, last);
        let mut placeholder = None;
        let mut duplicate_of = None;
        for candidate in candidates {
            match self.get(candidate).declaration {
                None => placeholder = Some(candidate),
                Some(_) => {
                    duplicate_of = Some(candidate);
                    break;
                },
            }
        }

        let symbol = if let Some(existing) = duplicate_of {
            let location = SourceLocation::new(docname, line);
            let other = self.location(existing);
            debug!(
                "duplicate declaration of '{}' in {}",
                self.full_name(existing),
                docname
            );
            diagnostics.push(
                Diagnostic::warning(
                    format!("duplicate C declaration of '{}'", self.full_name(existing)),
                    Some(location),
                )
                .with_other(other),
            );
            let mut data = SymbolData::placeholder(Some(last.clone()));
            data.declaration = Some(declaration);
            data.docname = Some(docname.to_string());
            data.line = Some(line);
            data.is_redeclaration = true;
            let id = self.new_symbol(data);
            self.attach_child(parent, id)?;
            id
        } else if let Some(placeholder) = placeholder {
            let data = self.get_mut(placeholder);
            data.declaration = Some(declaration);
            data.docname = Some(docname.to_string());
            data.line = Some(line);
            self.get_mut(parent)
                .children_by_doc
                .entry(docname.to_string())
                .or_default()
                .push(placeholder);
            placeholder
        } else {
            let mut data = SymbolData::placeholder(Some(last.clone()));
            data.declaration = Some(declaration);
            data.docname = Some(docname.to_string());
            data.line = Some(line);
            let id = self.new_symbol(data);
            self.attach_child(parent, id)?;
            id
        };

        let enumerator_scope = self.enumerator_scope_of(symbol);
        Ok(InsertOutcome {
            symbol,
            enumerator_scope,
            diagnostics,
        })
    }

    fn synthesize_anonymous_name(&self, scope: SymbolId) -> Identifier {
        let count = self
            .get(scope)
            .children
            .iter()
            .filter(|&&c| {
                self.get(c)
                    .ident
                    .as_ref()
                    .is_some_and(Identifier::is_anonymous)
            })
            .count();
        Identifier::new(format!("@{count}"))
    }

    fn enumerator_scope_of(&self, symbol: SymbolId) -> Option<SymbolId> {
        let data = self.get(symbol);
        if data.declaration.as_ref().map(|d| d.object_type) != Some(ObjectType::Enumerator) {
            return None;
        }
        let parent = data.parent?;
        let parent_is_enum = self
            .get(parent)
            .declaration
            .as_ref()
            .is_some_and(|d| matches!(d.body, DeclarationBody::Enum(_)));
        parent_is_enum.then_some(parent)
    }

    fn is_transparent_scope(&self, id: SymbolId) -> bool {
        let data = self.get(id);
        // C enums are always unscoped; anonymous entities are transparent
        // as well.
        if data.ident.as_ref().is_some_and(Identifier::is_anonymous) {
            return true;
        }
        data.declaration
            .as_ref()
            .is_some_and(|d| matches!(d.body, DeclarationBody::Enum(_)))
    }

    // ---- lookup ------------------------------------------------------------

    /// Resolve a (possibly qualified) name from `scope`. Read-only.
    pub fn lookup(&self, scope: SymbolId, name: &NestedName) -> Vec<SymbolId> {
        if name.names.is_empty() {
            return Vec::new();
        }
        let first = &name.names[0];
        let start_scopes: Vec<SymbolId> = if name.rooted {
            vec![self.root]
        } else {
            self.ancestors(scope)
        };

        let mut heads = Vec::new();
        for enclosing in start_scopes {
            heads = self.find_in_scope(enclosing, first);
            if !heads.is_empty() {
                break;
            }
        }
        if heads.is_empty() {
            return Vec::new();
        }

        let mut current = heads;
        for ident in &name.names[1..] {
            let mut next = Vec::new();
            for head in current {
                next.extend(self.find_in_scope(head, ident));
            }
            if next.is_empty() {
                return Vec::new();
            }
            current = next;
        }
        current.sort_by_key(|&c| self.get(c).is_redeclaration);
        current
    }

    fn find_in_scope(&self, scope: SymbolId, ident: &Identifier) -> Vec<SymbolId> {
        if ident.is_anonymous() {
            return Vec::new();
        }
        let mut found: Vec<SymbolId> = self
            .get(scope)
            .children_by_name
            .get(ident.as_str())
            .cloned()
            .unwrap_or_default();
        for &child in &self.get(scope).children {
            if self.is_transparent_scope(child)
                && let Some(ids) = self.get(child).children_by_name.get(ident.as_str())
            {
                found.extend(ids.iter().copied());
            }
        }
        found
    }

    // ---- merge -------------------------------------------------------------

    pub fn merge(&mut self, other: &SymbolTree) -> Result<Vec<Diagnostic>, TreeError> {
        let mut diagnostics = Vec::new();
        self.merge_children(self.root, other, other.root, &mut diagnostics)?;
        Ok(diagnostics)
    }

    fn merge_children(
        &mut self,
        dest: SymbolId,
        other: &SymbolTree,
        src: SymbolId,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(), TreeError> {
        for &src_child in &other.get(src).children {
            let src_data = other.get(src_child);
            if !src_data.alive {
                continue;
            }
            let Some(ident) = src_data.ident.clone() else {
                continue;
            };
            let candidates = self.find_children(dest, &ident);

            let target = match &src_data.declaration {
                None => candidates.first().copied(),
                Some(src_decl) => {
                    let declared = candidates
                        .iter()
                        .copied()
                        .find(|&c| self.get(c).declaration.is_some());
                    let placeholder = candidates
                        .iter()
                        .copied()
                        .find(|&c| self.get(c).declaration.is_none());
                    if let Some(existing) = declared {
                        diagnostics.push(
                            Diagnostic::warning(
                                format!(
                                    "duplicate C declaration of '{}'",
                                    self.full_name(existing)
                                ),
                                other.location(src_child),
                            )
                            .with_other(self.location(existing)),
                        );
                        None
                    } else if let Some(placeholder) = placeholder {
                        let data = self.get_mut(placeholder);
                        data.declaration = Some(src_decl.clone());
                        data.docname = src_data.docname.clone();
                        data.line = src_data.line;
                        if let Some(doc) = src_data.docname.clone() {
                            self.get_mut(dest)
                                .children_by_doc
                                .entry(doc)
                                .or_default()
                                .push(placeholder);
                        }
                        Some(placeholder)
                    } else {
                        None
                    }
                },
            };

            let dest_child = match target {
                Some(id) => id,
                None => {
                    let duplicates_sibling = src_data.declaration.is_some()
                        && candidates
                            .iter()
                            .any(|&c| self.get(c).declaration.is_some());
                    let mut data = SymbolData::placeholder(Some(ident));
                    data.declaration = src_data.declaration.clone();
                    data.docname = src_data.docname.clone();
                    data.line = src_data.line;
                    data.is_redeclaration = src_data.is_redeclaration || duplicates_sibling;
                    let id = self.new_symbol(data);
                    self.attach_child(dest, id)?;
                    id
                },
            };
            self.merge_children(dest_child, other, src_child, diagnostics)?;
        }
        Ok(())
    }

    // ---- pruning -----------------------------------------------------------

    pub fn prune(&mut self, docname: &str) {
        self.prune_under(self.root, docname);
    }

    fn prune_under(&mut self, id: SymbolId, docname: &str) {
        let children: Vec<SymbolId> = self.get(id).children.clone();
        for child in children {
            self.prune_under(child, docname);
            let (from_doc, childless, pure_placeholder) = {
                let data = self.get(child);
                (
                    data.docname.as_deref() == Some(docname),
                    data.children.is_empty(),
                    data.declaration.is_none() && data.docname.is_none(),
                )
            };
            if from_doc && childless {
                self.remove_symbol(id, child);
            } else if from_doc {
                let data = self.get_mut(child);
                data.declaration = None;
                data.docname = None;
                data.line = None;
                data.is_redeclaration = false;
                let parent_data = self.get_mut(id);
                if let Some(ids) = parent_data.children_by_doc.get_mut(docname) {
                    ids.retain(|&c| c != child);
                    if ids.is_empty() {
                        parent_data.children_by_doc.remove(docname);
                    }
                }
            } else if pure_placeholder && childless {
                self.remove_symbol(id, child);
            }
        }
    }

    fn remove_symbol(&mut self, parent: SymbolId, child: SymbolId) {
        self.detach_child(parent, child);
        let data = self.get_mut(child);
        data.alive = false;
        data.declaration = None;
        data.docname = None;
    }
}
