use serde::{Deserialize, Serialize};

use crate::attrs::AttributeList;
use crate::cpp::ast::name::NestedName;
use crate::cpp::ast::template::{RequiresClause, TemplateDeclarationPrefix};
use crate::cpp::ast::ty::{Initializer, Type, TypeUsing, TypeWithInit};
use crate::render::{DescribeMode, SignatureSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseClass {
    pub name: NestedName,
    pub visibility: Option<Visibility>,
    pub virtual_: bool,
    pub pack: bool,
}

impl std::fmt::Display for BaseClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(visibility) = self.visibility {
            write!(f, "{} ", visibility.keyword())?;
        }
        if self.virtual_ {
            f.write_str("virtual ")?;
        }
        self.name.fmt(f)?;
        if self.pack {
            f.write_str("...")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Class {
    pub name: NestedName,
    pub final_: bool,
    pub bases: Vec<BaseClass>,
    pub attrs: AttributeList,
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.attrs.is_empty() {
            write!(f, "{} ", self.attrs)?;
        }
        self.name.fmt(f)?;
        if self.final_ {
            f.write_str(" final")?;
        }
        for (i, base) in self.bases.iter().enumerate() {
            f.write_str(if i == 0 { " : " } else { ", " })?;
            base.fmt(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Union {
    pub name: NestedName,
    pub attrs: AttributeList,
}

impl std::fmt::Display for Union {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.attrs.is_empty() {
            write!(f, "{} ", self.attrs)?;
        }
        self.name.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnumKey {
    Class,
    Struct,
}

impl EnumKey {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enum {
    pub name: NestedName,
    pub scoped: Option<EnumKey>,
    pub underlying_type: Option<Type>,
    pub attrs: AttributeList,
}

impl Enum {
    pub fn is_scoped(&self) -> bool {
        self.scoped.is_some()
    }
}

impl std::fmt::Display for Enum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(key) = self.scoped {
            write!(f, "{} ", key.keyword())?;
        }
        if !self.attrs.is_empty() {
            write!(f, "{} ", self.attrs)?;
        }
        self.name.fmt(f)?;
        if let Some(underlying) = &self.underlying_type {
            write!(f, " : {underlying}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enumerator {
    pub name: NestedName,
    pub init: Option<Initializer>,
    pub attrs: AttributeList,
}

impl std::fmt::Display for Enumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name.fmt(f)?;
        if !self.attrs.is_empty() {
            write!(f, " {}", self.attrs)?;
        }
        if let Some(init) = &self.init {
            init.fmt(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Concept {
    pub name: NestedName,
    pub initializer: Option<Initializer>,
}

impl std::fmt::Display for Concept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name.fmt(f)?;
        if let Some(init) = &self.initializer {
            init.fmt(f)?;
        }
        Ok(())
    }
}

/// What kind of entity a declaration introduces. Determines which parsing
/// alternatives apply and how the symbol is categorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Class,
    Union,
    Enum,
    Enumerator,
    Function,
    Member,
    Type,
    Concept,
    Namespace,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Enumerator => "enumerator",
            Self::Function => "function",
            Self::Member => "member",
            Self::Type => "type",
            Self::Concept => "concept",
            Self::Namespace => "namespace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationBody {
    Class(Class),
    Union(Union),
    Enum(Enum),
    Enumerator(Enumerator),
    Concept(Concept),
    Namespace(NestedName),
    /// Functions and freestanding types.
    Type(Type),
    /// `using` alias.
    TypeUsing(TypeUsing),
    /// Members/variables, optionally initialized.
    Member(TypeWithInit),
}

impl DeclarationBody {
    pub fn name(&self) -> Option<&NestedName> {
        match self {
            Self::Class(c) => Some(&c.name),
            Self::Union(u) => Some(&u.name),
            Self::Enum(e) => Some(&e.name),
            Self::Enumerator(e) => Some(&e.name),
            Self::Concept(c) => Some(&c.name),
            Self::Namespace(name) => Some(name),
            Self::Type(ty) => ty.name(),
            Self::TypeUsing(u) => Some(&u.name),
            Self::Member(m) => m.ty.name(),
        }
    }
}

impl std::fmt::Display for DeclarationBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class(c) => c.fmt(f),
            Self::Union(u) => u.fmt(f),
            Self::Enum(e) => e.fmt(f),
            Self::Enumerator(e) => e.fmt(f),
            Self::Concept(c) => c.fmt(f),
            Self::Namespace(name) => name.fmt(f),
            Self::Type(ty) => ty.fmt(f),
            Self::TypeUsing(u) => u.fmt(f),
            Self::Member(m) => m.fmt(f),
        }
    }
}

/// The root of one parsed signature.
///
/// Symbol back-references are intentionally not part of this value: the
/// symbol tree owns the declaration after insertion and reports the owning
/// and enumerator-scope symbols through insertion results, keeping the AST
/// immutable and structurally comparable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    pub object_type: ObjectType,
    /// The directive name this was parsed for, when it differs from the
    /// object type (e.g. `struct` vs `class`).
    pub directive_type: Option<String>,
    pub visibility: Option<Visibility>,
    pub template_prefix: Option<TemplateDeclarationPrefix>,
    pub body: DeclarationBody,
    pub trailing_requires: Option<RequiresClause>,
    pub semicolon: bool,
}

impl Declaration {
    pub fn name(&self) -> Option<&NestedName> {
        self.body.name()
    }

    /// The parameter list when this declares a function.
    pub fn function_params(&self) -> Option<&crate::cpp::ast::ty::ParametersQualifiers> {
        match &self.body {
            DeclarationBody::Type(ty) => ty.decl.function_params(),
            DeclarationBody::Member(m) => m.ty.decl.function_params(),
            _ => None,
        }
    }

    /// Render as semantic fragments. The terminal declared name is emitted
    /// as a `Name` fragment; everything else as types/keywords/punctuation.
    pub fn describe_signature(&self, sink: &mut dyn SignatureSink) {
        if let Some(prefix) = &self.template_prefix {
            for item in &prefix.templates {
                sink.text(&item.to_string());
                sink.space();
            }
        }
        if let Some(visibility) = self.visibility {
            sink.keyword(visibility.keyword());
            sink.space();
        }
        match &self.body {
            DeclarationBody::Class(c) => {
                sink.keyword("class");
                sink.space();
                c.name.describe(sink, DescribeMode::LastIsName);
                if c.final_ {
                    sink.space();
                    sink.keyword("final");
                }
                for (i, base) in c.bases.iter().enumerate() {
                    sink.punct(if i == 0 { " : " } else { ", " });
                    sink.text(&base.to_string());
                }
            },
            DeclarationBody::Union(u) => {
                sink.keyword("union");
                sink.space();
                u.name.describe(sink, DescribeMode::LastIsName);
            },
            DeclarationBody::Enum(e) => {
                sink.keyword("enum");
                sink.space();
                if let Some(key) = e.scoped {
                    sink.keyword(key.keyword());
                    sink.space();
                }
                e.name.describe(sink, DescribeMode::LastIsName);
                if let Some(underlying) = &e.underlying_type {
                    sink.punct(" : ");
                    sink.text(&underlying.to_string());
                }
            },
            DeclarationBody::Enumerator(e) => {
                e.name.describe(sink, DescribeMode::LastIsName);
                if let Some(init) = &e.init {
                    sink.text(&init.to_string());
                }
            },
            DeclarationBody::Concept(c) => {
                sink.keyword("concept");
                sink.space();
                c.name.describe(sink, DescribeMode::LastIsName);
            },
            DeclarationBody::Namespace(name) => {
                name.describe(sink, DescribeMode::LastIsName);
            },
            DeclarationBody::Type(ty) => {
                ty.describe(sink, DescribeMode::MarkType);
            },
            DeclarationBody::TypeUsing(u) => {
                u.name.describe(sink, DescribeMode::LastIsName);
                if let Some(ty) = &u.ty {
                    sink.punct(" = ");
                    sink.text(&ty.to_string());
                }
            },
            DeclarationBody::Member(m) => {
                m.describe(sink, DescribeMode::MarkType);
            },
        }
        if let Some(clause) = &self.trailing_requires {
            sink.space();
            sink.text(&clause.to_string());
        }
        if self.semicolon {
            sink.punct(";");
        }
    }
}

impl std::fmt::Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(prefix) = &self.template_prefix {
            prefix.fmt(f)?;
        }
        if let Some(visibility) = self.visibility {
            write!(f, "{} ", visibility.keyword())?;
        }
        self.body.fmt(f)?;
        if let Some(clause) = &self.trailing_requires {
            write!(f, " {clause}")?;
        }
        if self.semicolon {
            f.write_str(";")?;
        }
        Ok(())
    }
}
