use serde::{Deserialize, Serialize};

use crate::cpp::ast::expr::Expr;
use crate::cpp::ast::name::{Identifier, NestedName};
use crate::cpp::ast::ty::{Type, TypeWithInit};
use crate::render::SignatureSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateKey {
    Typename,
    Class,
}

impl TemplateKey {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Typename => "typename",
            Self::Class => "class",
        }
    }
}

/// The common shape of type and template-template parameters:
/// `typename... Name = Default`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateKeyParamPackIdDefault {
    pub key: TemplateKey,
    pub identifier: Option<Identifier>,
    pub parameter_pack: bool,
    pub default: Option<Type>,
}

impl std::fmt::Display for TemplateKeyParamPackIdDefault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key.keyword())?;
        if self.parameter_pack {
            f.write_str("...")?;
        }
        if let Some(identifier) = &self.identifier {
            write!(f, " {identifier}")?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

/// `Concept T = Default` — a constrained type parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstrainedTypeWithInit {
    pub ty: Type,
    pub init: Option<Type>,
}

impl std::fmt::Display for ConstrainedTypeWithInit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ty.fmt(f)?;
        if let Some(init) = &self.init {
            write!(f, " = {init}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateParam {
    Type(TemplateKeyParamPackIdDefault),
    ConstrainedType(ConstrainedTypeWithInit),
    TemplateType {
        nested_params: Box<TemplateParams>,
        data: TemplateKeyParamPackIdDefault,
    },
    NonType {
        param: TypeWithInit,
        parameter_pack: bool,
    },
}

impl TemplateParam {
    /// The parameter's name, when it has one — used to register the
    /// parameter in the declaring symbol's scope.
    pub fn identifier(&self) -> Option<&Identifier> {
        match self {
            Self::Type(data) | Self::TemplateType { data, .. } => data.identifier.as_ref(),
            Self::ConstrainedType(c) => c
                .ty
                .name()
                .and_then(|n| n.last().ident_or_op.as_ident()),
            Self::NonType { param, .. } => param
                .ty
                .name()
                .and_then(|n| n.last().ident_or_op.as_ident()),
        }
    }

    pub fn is_pack(&self) -> bool {
        match self {
            Self::Type(data) | Self::TemplateType { data, .. } => data.parameter_pack,
            Self::ConstrainedType(_) => false,
            Self::NonType { parameter_pack, .. } => *parameter_pack,
        }
    }
}

impl std::fmt::Display for TemplateParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(data) => data.fmt(f),
            Self::ConstrainedType(c) => c.fmt(f),
            Self::TemplateType {
                nested_params,
                data,
            } => write!(f, "{nested_params} {data}"),
            Self::NonType { param, .. } => param.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequiresClause {
    pub expr: Expr,
}

impl std::fmt::Display for RequiresClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "requires {}", self.expr)
    }
}

/// `template<...>` with an optional trailing requires-clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateParams {
    pub params: Vec<TemplateParam>,
    pub requires_clause: Option<RequiresClause>,
}

impl TemplateParams {
    pub fn describe(&self, sink: &mut dyn SignatureSink) {
        sink.keyword("template");
        sink.punct("<");
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                sink.punct(",");
                sink.space();
            }
            sink.text(&param.to_string());
        }
        sink.punct(">");
        if let Some(clause) = &self.requires_clause {
            sink.space();
            sink.text(&clause.to_string());
        }
    }
}

impl std::fmt::Display for TemplateParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("template<")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            param.fmt(f)?;
        }
        f.write_str(">")?;
        if let Some(clause) = &self.requires_clause {
            write!(f, " {clause}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateIntroductionParameter {
    pub identifier: Identifier,
    pub parameter_pack: bool,
}

impl std::fmt::Display for TemplateIntroductionParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.parameter_pack {
            f.write_str("...")?;
        }
        self.identifier.fmt(f)
    }
}

/// Terse template syntax: `Concept{T, ...Us}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateIntroduction {
    pub concept: NestedName,
    pub params: Vec<TemplateIntroductionParameter>,
}

impl std::fmt::Display for TemplateIntroduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.concept.fmt(f)?;
        f.write_str("{")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            param.fmt(f)?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplatePrefixItem {
    Params(TemplateParams),
    Introduction(TemplateIntroduction),
}

impl TemplatePrefixItem {
    pub fn named_parameters(&self) -> Vec<&Identifier> {
        match self {
            Self::Params(params) => params
                .params
                .iter()
                .filter_map(TemplateParam::identifier)
                .collect(),
            Self::Introduction(intro) => {
                intro.params.iter().map(|p| &p.identifier).collect()
            },
        }
    }
}

impl std::fmt::Display for TemplatePrefixItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Params(params) => params.fmt(f),
            Self::Introduction(intro) => intro.fmt(f),
        }
    }
}

/// The stack of template parameter lists preceding a declaration — one list
/// per enclosing template level, innermost last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateDeclarationPrefix {
    pub templates: Vec<TemplatePrefixItem>,
}

impl std::fmt::Display for TemplateDeclarationPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for item in &self.templates {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateArg {
    Type(Type),
    Constant(Expr),
}

impl std::fmt::Display for TemplateArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(ty) => ty.fmt(f),
            Self::Constant(expr) => expr.fmt(f),
        }
    }
}

/// `<arg, arg, ...>` on one nested-name component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateArgs {
    pub args: Vec<TemplateArg>,
    pub pack_expansion: bool,
}

impl std::fmt::Display for TemplateArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            arg.fmt(f)?;
        }
        if self.pack_expansion {
            f.write_str("...")?;
        }
        f.write_str(">")
    }
}
