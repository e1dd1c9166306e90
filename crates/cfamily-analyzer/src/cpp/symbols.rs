//! The C++ symbol tree.
//!
//! Symbols live in an arena addressed by stable indices; parent, child, and
//! sibling relationships are index fields, so back-links carry no ownership.
//! Mutation keeps parent/child links bidirectionally consistent at every
//! step — an operation that would break that aborts before touching the
//! tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cpp::ast::{
    Declaration, DeclarationBody, IdentOrOp, Identifier, NestedName, NestedNameElement,
    ObjectType, TemplateArg, TemplateArgs, TemplateParams, TemplatePrefixItem,
};
use crate::error::{Diagnostic, SourceLocation, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(usize);

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One node of the symbol tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolData {
    parent: Option<SymbolId>,
    /// Declaration order; sibling order among same-named overloads follows
    /// from position here.
    children: Vec<SymbolId>,
    children_by_name: HashMap<String, Vec<SymbolId>>,
    children_by_doc: HashMap<String, Vec<SymbolId>>,
    ident_or_op: Option<IdentOrOp>,
    template_params: Option<TemplateParams>,
    template_args: Option<TemplateArgs>,
    declaration: Option<Declaration>,
    docname: Option<String>,
    line: Option<u32>,
    is_redeclaration: bool,
    alive: bool,
}

impl SymbolData {
    fn placeholder(parent: Option<SymbolId>, ident_or_op: Option<IdentOrOp>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            children_by_name: HashMap::new(),
            children_by_doc: HashMap::new(),
            ident_or_op,
            template_params: None,
            template_args: None,
            declaration: None,
            docname: None,
            line: None,
            is_redeclaration: false,
            alive: true,
        }
    }

    pub fn ident_or_op(&self) -> Option<&IdentOrOp> {
        self.ident_or_op.as_ref()
    }

    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    pub fn template_params(&self) -> Option<&TemplateParams> {
        self.template_params.as_ref()
    }

    pub fn template_args(&self) -> Option<&TemplateArgs> {
        self.template_args.as_ref()
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

    fn name_key(&self) -> Option<String> {
        self.ident_or_op.as_ref().map(|i| i.to_string())
    }
}

/// Result of inserting one declaration.
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
            symbols: vec![SymbolData::placeholder(None, None)],
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

    /// The previous same-parent symbol in declaration order.
    pub fn sibling_above(&self, id: SymbolId) -> Option<SymbolId> {
        let parent = self.get(id).parent?;
        let siblings = &self.get(parent).children;
        let index = siblings.iter().position(|&c| c == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// The next same-parent symbol in declaration order.
    pub fn sibling_below(&self, id: SymbolId) -> Option<SymbolId> {
        let parent = self.get(id).parent?;
        let siblings = &self.get(parent).children;
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    /// Ancestors from `id` (inclusive) up to the root.
    pub fn ancestors(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut out = vec![id];
        let mut cur = id;
        while let Some(parent) = self.get(cur).parent {
            out.push(parent);
            cur = parent;
        }
        out
    }

    /// Fully qualified display name.
    pub fn full_name(&self, id: SymbolId) -> String {
        let mut parts = Vec::new();
        for ancestor in self.ancestors(id) {
            let data = self.get(ancestor);
            if let Some(ident) = &data.ident_or_op {
                let mut part = ident.to_string();
                if let Some(args) = &data.template_args {
                    part.push_str(&args.to_string());
                }
                parts.push(part);
            }
        }
        parts.reverse();
        parts.join("::")
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
        if let Some(key) = self.get(child).name_key() {
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
        self.assert_links(parent, child)
    }

    fn detach_child(&mut self, parent: SymbolId, child: SymbolId) {
        let data = self.get_mut(parent);
        data.children.retain(|&c| c != child);
        let key = self.get(child).name_key();
        let doc = self.get(child).docname.clone();
        let data = self.get_mut(parent);
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

    /// Bidirectional consistency check for a freshly mutated link.
    fn assert_links(&self, parent: SymbolId, child: SymbolId) -> Result<(), TreeError> {
        if self.get(child).parent != Some(parent)
            || !self.get(parent).children.contains(&child)
        {
            return Err(TreeError::LinkMismatch(child.0));
        }
        Ok(())
    }

    // ---- identity ----------------------------------------------------------

    fn identity_matches(
        &self,
        candidate: SymbolId,
        ident_or_op: &IdentOrOp,
        template_params: Option<&TemplateParams>,
        template_args: Option<&TemplateArgs>,
    ) -> bool {
        let data = self.get(candidate);
        data.ident_or_op.as_ref() == Some(ident_or_op)
            && data.template_params.as_ref() == template_params
            && data.template_args.as_ref() == template_args
    }

    fn find_children(
        &self,
        scope: SymbolId,
        ident_or_op: &IdentOrOp,
        template_params: Option<&TemplateParams>,
        template_args: Option<&TemplateArgs>,
    ) -> Vec<SymbolId> {
        let key = ident_or_op.to_string();
        self.get(scope)
            .children_by_name
            .get(&key)
            .map(|candidates| {
                candidates
                    .iter()
                    .copied()
                    .filter(|&c| {
                        self.identity_matches(c, ident_or_op, template_params, template_args)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    // ---- insertion ---------------------------------------------------------

    /// Insert one parsed declaration under `scope` (usually the root),
    /// creating intermediate scope placeholders along the qualified name.
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

        let assignments = assign_template_lists(&declaration, &name);
        let start = if name.rooted { self.root } else { scope };

        // Walk/create the qualifying scopes.
        let mut parent = start;
        for (element, params) in name.names[..name.names.len() - 1]
            .iter()
            .zip(&assignments)
        {
            let args = normalized_args(element.template_args.as_ref(), params.as_deref());
            let existing = self
                .find_children(parent, &element.ident_or_op, params.as_deref(), args)
                .first()
                .copied();
            parent = match existing {
                Some(found) => found,
                None => {
                    let mut data =
                        SymbolData::placeholder(None, Some(element.ident_or_op.clone()));
                    data.template_params = params.as_deref().cloned();
                    data.template_args = args.cloned();
                    let id = self.new_symbol(data);
                    self.attach_child(parent, id)?;
                    id
                },
            };
        }

        let last = name.last();
        let last_params = assignments
            .last()
            .and_then(|p| p.as_deref())
            .cloned();
        let args = normalized_args(last.template_args.as_ref(), last_params.as_ref()).cloned();

        let mut diagnostics = Vec::new();
        let candidates = self.find_children(
            parent,
            &last.ident_or_op,
            last_params.as_ref(),
            args.as_ref(),
        );

        let new_key = overload_key(&declaration);
        let mut placeholder = None;
        let mut duplicate_of = None;
        for candidate in candidates {
            match self.get(candidate).declaration {
                None => placeholder = Some(candidate),
                Some(ref existing) if overload_key(existing) == new_key => {
                    duplicate_of = Some(candidate);
                    break;
                },
                Some(_) => {},
            }
        }

        let symbol = if let Some(existing) = duplicate_of {
            // Redeclaration: keep both in document order; the new symbol is
            // the one flagged.
            let location = SourceLocation::new(docname, line);
            let other = self.location(existing);
            debug!(
                "duplicate declaration of '{}' in {}",
                self.full_name(existing),
                docname
            );
            diagnostics.push(
                Diagnostic::warning(
                    format!(
                        "duplicate C++ declaration of '{}'",
                        self.full_name(existing)
                    ),
                    Some(location),
                )
                .with_other(other),
            );
            let mut data = SymbolData::placeholder(None, Some(last.ident_or_op.clone()));
            data.template_params = last_params.clone();
            data.template_args = args.clone();
            data.declaration = Some(declaration);
            data.docname = Some(docname.to_string());
            data.line = Some(line);
            data.is_redeclaration = true;
            let id = self.new_symbol(data);
            self.attach_child(parent, id)?;
            id
        } else if let Some(placeholder) = placeholder {
            // A pure scope placeholder adopts the declaration in place.
            let data = self.get_mut(placeholder);
            data.declaration = Some(declaration);
            data.docname = Some(docname.to_string());
            data.line = Some(line);
            data.template_params = last_params.clone();
            data.template_args = args.clone();
            // The by-doc index does not know this symbol yet.
            self.get_mut(parent)
                .children_by_doc
                .entry(docname.to_string())
                .or_default()
                .push(placeholder);
            placeholder
        } else {
            let mut data = SymbolData::placeholder(None, Some(last.ident_or_op.clone()));
            data.template_params = last_params.clone();
            data.template_args = args.clone();
            data.declaration = Some(declaration);
            data.docname = Some(docname.to_string());
            data.line = Some(line);
            let id = self.new_symbol(data);
            self.attach_child(parent, id)?;
            id
        };

        self.add_template_param_children(symbol, docname)?;

        let enumerator_scope = self.enumerator_scope_of(symbol);
        Ok(InsertOutcome {
            symbol,
            enumerator_scope,
            diagnostics,
        })
    }

    /// Deterministic `@N` name for an unnamed declaration: `N` depends only
    /// on how many anonymous siblings the scope already has, not on global
    /// insertion order.
    fn synthesize_anonymous_name(&self, scope: SymbolId) -> Identifier {
        let count = self
            .get(scope)
            .children
            .iter()
            .filter(|&&c| {
                self.get(c)
                    .ident_or_op
                    .as_ref()
                    .is_some_and(IdentOrOp::is_anonymous)
            })
            .count();
        Identifier::new(format!("@{count}"))
    }

    /// Named template parameters resolve inside the declaration's scope, so
    /// they are registered as placeholder children tagged with the document.
    fn add_template_param_children(
        &mut self,
        symbol: SymbolId,
        docname: &str,
    ) -> Result<(), TreeError> {
        let params: Vec<Identifier> = match self
            .get(symbol)
            .declaration
            .as_ref()
            .and_then(|d| d.template_prefix.as_ref())
        {
            Some(prefix) => prefix
                .templates
                .iter()
                .flat_map(TemplatePrefixItem::named_parameters)
                .cloned()
                .collect(),
            None => return Ok(()),
        };
        for ident in params {
            let ident_or_op = IdentOrOp::Ident(ident);
            if !self
                .find_children(symbol, &ident_or_op, None, None)
                .is_empty()
            {
                continue;
            }
            let mut data = SymbolData::placeholder(None, Some(ident_or_op));
            data.docname = Some(docname.to_string());
            let id = self.new_symbol(data);
            self.attach_child(symbol, id)?;
        }
        Ok(())
    }

    fn enumerator_scope_of(&self, symbol: SymbolId) -> Option<SymbolId> {
        let data = self.get(symbol);
        if data
            .declaration
            .as_ref()
            .map(|d| d.object_type)
            != Some(ObjectType::Enumerator)
        {
            return None;
        }
        let parent = data.parent?;
        let parent_is_enum = self
            .get(parent)
            .declaration
            .as_ref()
            .is_some_and(|d| d.object_type == ObjectType::Enum);
        parent_is_enum.then_some(parent)
    }

    fn is_transparent_scope(&self, id: SymbolId) -> bool {
        let data = self.get(id);
        // Unscoped enums and anonymous entities do not shield their
        // children from lookup in the surrounding scope.
        if data
            .ident_or_op
            .as_ref()
            .is_some_and(IdentOrOp::is_anonymous)
        {
            return true;
        }
        match data.declaration.as_ref() {
            Some(decl) => match &decl.body {
                DeclarationBody::Enum(e) => !e.is_scoped(),
                _ => false,
            },
            None => false,
        }
    }

    // ---- lookup ------------------------------------------------------------

    /// Resolve a (possibly qualified) name from `scope`. Read-only. Returns
    /// the full candidate set for overloads, non-redeclared symbols first,
    /// otherwise in declaration order.
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

        // Find the scope holding the first component, innermost first.
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

        // Remaining components resolve strictly within the found scope.
        let mut current = heads;
        for element in &name.names[1..] {
            let mut next = Vec::new();
            for head in current {
                next.extend(self.find_in_scope(head, element));
            }
            if next.is_empty() {
                return Vec::new();
            }
            current = next;
        }
        self.order_candidates(current)
    }

    /// Search one scope, looking through transparent children (unscoped
    /// enums, anonymous scopes).
    fn find_in_scope(&self, scope: SymbolId, element: &NestedNameElement) -> Vec<SymbolId> {
        let mut found = self.find_in_scope_shallow(scope, element);
        for &child in &self.get(scope).children {
            if self.is_transparent_scope(child) {
                found.extend(self.find_in_scope_shallow(child, element));
            }
        }
        found
    }

    fn find_in_scope_shallow(
        &self,
        scope: SymbolId,
        element: &NestedNameElement,
    ) -> Vec<SymbolId> {
        if element.ident_or_op.is_anonymous() {
            // Anonymous identifiers are never found by name lookup.
            return Vec::new();
        }
        let key = element.ident_or_op.to_string();
        let Some(candidates) = self.get(scope).children_by_name.get(&key) else {
            return Vec::new();
        };
        match &element.template_args {
            None => candidates.clone(),
            Some(args) => {
                // Specialization match first, otherwise the primary template.
                let exact: Vec<SymbolId> = candidates
                    .iter()
                    .copied()
                    .filter(|&c| self.get(c).template_args.as_ref() == Some(args))
                    .collect();
                if !exact.is_empty() {
                    return exact;
                }
                candidates
                    .iter()
                    .copied()
                    .filter(|&c| self.get(c).template_args.is_none())
                    .collect()
            },
        }
    }

    /// Deterministic candidate order: non-redeclared symbols first, then
    /// declaration order.
    fn order_candidates(&self, mut candidates: Vec<SymbolId>) -> Vec<SymbolId> {
        candidates.sort_by_key(|&c| self.get(c).is_redeclaration);
        candidates
    }

    /// Narrow a candidate set by a textual parameter-signature, as written
    /// in a cross-reference like `f(int)`.
    pub fn filter_by_signature(&self, candidates: &[SymbolId], signature: &str) -> Vec<SymbolId> {
        let wanted: String = signature.chars().filter(|c| !c.is_whitespace()).collect();
        candidates
            .iter()
            .copied()
            .filter(|&c| {
                self.get(c).declaration.as_ref().is_some_and(|d| {
                    let key: String = overload_key(d)
                        .chars()
                        .filter(|c| !c.is_whitespace())
                        .collect();
                    key == wanted
                })
            })
            .collect()
    }

    // ---- merge -------------------------------------------------------------

    /// Merge another tree (e.g. a per-document scratch tree) into this one.
    /// Conflicting declarations produce duplicate-declaration warnings, not
    /// failures.
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
            let Some(ident_or_op) = src_data.ident_or_op.clone() else {
                continue;
            };
            let candidates = self.find_children(
                dest,
                &ident_or_op,
                src_data.template_params.as_ref(),
                src_data.template_args.as_ref(),
            );

            let target = match &src_data.declaration {
                None => candidates.first().copied(),
                Some(src_decl) => {
                    let src_key = overload_key(src_decl);
                    let mut duplicate = None;
                    let mut placeholder = None;
                    for &candidate in &candidates {
                        match self.get(candidate).declaration {
                            None => placeholder = Some(candidate),
                            Some(ref existing) if overload_key(existing) == src_key => {
                                duplicate = Some(candidate);
                                break;
                            },
                            Some(_) => {},
                        }
                    }
                    if let Some(existing) = duplicate {
                        diagnostics.push(
                            Diagnostic::warning(
                                format!(
                                    "duplicate C++ declaration of '{}'",
                                    self.full_name(existing)
                                ),
                                other.location(src_child),
                            )
                            .with_other(self.location(existing)),
                        );
                        // Keep both, as direct insertion would.
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
                    let mut data = SymbolData::placeholder(None, Some(ident_or_op));
                    data.template_params = src_data.template_params.clone();
                    data.template_args = src_data.template_args.clone();
                    data.declaration = src_data.declaration.clone();
                    data.docname = src_data.docname.clone();
                    data.line = src_data.line;
                    let duplicates_sibling = match &src_data.declaration {
                        Some(src_decl) => {
                            let src_key = overload_key(src_decl);
                            candidates.iter().any(|&c| {
                                self.get(c)
                                    .declaration
                                    .as_ref()
                                    .is_some_and(|d| overload_key(d) == src_key)
                            })
                        },
                        None => false,
                    };
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

    /// Remove every symbol whose provenance is `docname`, then collect
    /// declaration-less scopes left with no children.
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
                // Other documents still hang below: demote to placeholder.
                let data = self.get_mut(child);
                data.declaration = None;
                data.docname = None;
                data.line = None;
                data.is_redeclaration = false;
                self.reindex_doc(id, child, docname);
            } else if pure_placeholder && childless {
                // Placeholder whose only purpose was to host removed
                // children.
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

    fn reindex_doc(&mut self, parent: SymbolId, child: SymbolId, docname: &str) {
        let data = self.get_mut(parent);
        if let Some(ids) = data.children_by_doc.get_mut(docname) {
            ids.retain(|&c| c != child);
            if ids.is_empty() {
                data.children_by_doc.remove(docname);
            }
        }
    }
}

/// The identity of a declaration among same-named siblings: its
/// parameter-type signature (names stripped) plus cv/ref qualifiers.
/// Non-functions collapse to the empty key, so a second declaration of the
/// same name is a redeclaration.
pub(crate) fn overload_key(declaration: &Declaration) -> String {
    let Some(pq) = declaration.function_params() else {
        return String::new();
    };
    let mut key = String::from("(");
    for (i, param) in pq.args.iter().enumerate() {
        if i > 0 {
            key.push_str(", ");
        }
        if param.ellipsis {
            key.push_str("...");
        } else if let Some(arg) = &param.arg {
            key.push_str(&arg.ty.abstract_text());
        }
    }
    key.push(')');
    if pq.const_ {
        key.push_str(" const");
    }
    if pq.volatile_ {
        key.push_str(" volatile");
    }
    if let Some(ref_qual) = pq.ref_qual {
        key.push_str(ref_qual.text());
    }
    key
}

/// Distribute the declaration's template parameter lists over the qualified
/// name: components with template arguments take lists left to right, and
/// the final component takes the innermost remaining list.
fn assign_template_lists(
    declaration: &Declaration,
    name: &NestedName,
) -> Vec<Option<Box<TemplateParams>>> {
    let mut lists: Vec<Option<&TemplateParams>> = match &declaration.template_prefix {
        Some(prefix) => prefix
            .templates
            .iter()
            .map(|t| match t {
                TemplatePrefixItem::Params(params) => Some(params),
                TemplatePrefixItem::Introduction(_) => None,
            })
            .collect(),
        None => Vec::new(),
    };
    lists.reverse(); // consume from the outermost first via pop from the back

    let n = name.names.len();
    let mut out: Vec<Option<Box<TemplateParams>>> = Vec::with_capacity(n);
    for (i, element) in name.names.iter().enumerate() {
        let takes_list = element.template_args.is_some() || (i == n - 1 && !lists.is_empty());
        if takes_list {
            out.push(lists.pop().flatten().map(|p| Box::new(p.clone())));
        } else {
            out.push(None);
        }
    }
    out
}

/// Template arguments that merely restate the primary template's parameter
/// names are not a specialization: `Vector<T>` declared with
/// `template<typename T>` is the primary template.
fn normalized_args<'a>(
    args: Option<&'a TemplateArgs>,
    params: Option<&TemplateParams>,
) -> Option<&'a TemplateArgs> {
    let args = args?;
    let Some(params) = params else {
        return Some(args);
    };
    if args.args.len() != params.params.len() {
        return Some(args);
    }
    let restates = args.args.iter().zip(&params.params).all(|(arg, param)| {
        let Some(ident) = param.identifier() else {
            return false;
        };
        match arg {
            TemplateArg::Type(ty) => ty.to_string() == ident.as_str(),
            TemplateArg::Constant(expr) => expr.to_string() == ident.as_str(),
        }
    });
    if restates { None } else { Some(args) }
}
