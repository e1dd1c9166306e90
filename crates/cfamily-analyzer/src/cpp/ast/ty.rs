use serde::{Deserialize, Serialize};

use crate::attrs::AttributeList;
use crate::cpp::ast::expr::Expr;
use crate::cpp::ast::name::NestedName;
use crate::render::{DescribeMode, SignatureSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageClass {
    Static,
    Extern,
    Mutable,
    Register,
}

impl StorageClass {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Extern => "extern",
            Self::Mutable => "mutable",
            Self::Register => "register",
        }
    }
}

/// `explicit` with an optional condition: `explicit(bool-expr)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExplicitSpec {
    pub expr: Option<Expr>,
}

impl std::fmt::Display for ExplicitSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("explicit")?;
        if let Some(expr) = &self.expr {
            write!(f, "({expr})")?;
        }
        Ok(())
    }
}

/// The "simple" declaration specifiers: everything except the trailing type
/// specifier. Specifiers may appear on either side of the type, so a
/// `DeclSpecs` holds two of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DeclSpecsSimple {
    pub storage: Option<StorageClass>,
    pub thread_local: bool,
    pub inline: bool,
    pub virtual_: bool,
    pub explicit_spec: Option<ExplicitSpec>,
    pub consteval: bool,
    pub constexpr_: bool,
    pub constinit: bool,
    pub volatile_: bool,
    pub const_: bool,
    pub friend: bool,
    pub attrs: AttributeList,
}

impl DeclSpecsSimple {
    pub fn is_empty(&self) -> bool {
        self.storage.is_none()
            && !self.thread_local
            && !self.inline
            && !self.virtual_
            && self.explicit_spec.is_none()
            && !self.consteval
            && !self.constexpr_
            && !self.constinit
            && !self.volatile_
            && !self.const_
            && !self.friend
            && self.attrs.is_empty()
    }

    /// Combine left-of-type and right-of-type specifier runs into one set,
    /// used for identity comparisons.
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            storage: self.storage.or(other.storage),
            thread_local: self.thread_local || other.thread_local,
            inline: self.inline || other.inline,
            virtual_: self.virtual_ || other.virtual_,
            explicit_spec: self.explicit_spec.clone().or_else(|| other.explicit_spec.clone()),
            consteval: self.consteval || other.consteval,
            constexpr_: self.constexpr_ || other.constexpr_,
            constinit: self.constinit || other.constinit,
            volatile_: self.volatile_ || other.volatile_,
            const_: self.const_ || other.const_,
            friend: self.friend || other.friend,
            attrs: AttributeList {
                attrs: self
                    .attrs
                    .attrs
                    .iter()
                    .chain(other.attrs.attrs.iter())
                    .cloned()
                    .collect(),
            },
        }
    }

    fn words(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.attrs.is_empty() {
            out.push(self.attrs.to_string());
        }
        if let Some(storage) = self.storage {
            out.push(storage.keyword().to_string());
        }
        if self.thread_local {
            out.push("thread_local".to_string());
        }
        if self.inline {
            out.push("inline".to_string());
        }
        if self.friend {
            out.push("friend".to_string());
        }
        if self.virtual_ {
            out.push("virtual".to_string());
        }
        if let Some(explicit_spec) = &self.explicit_spec {
            out.push(explicit_spec.to_string());
        }
        if self.consteval {
            out.push("consteval".to_string());
        }
        if self.constexpr_ {
            out.push("constexpr".to_string());
        }
        if self.constinit {
            out.push("constinit".to_string());
        }
        if self.volatile_ {
            out.push("volatile".to_string());
        }
        if self.const_ {
            out.push("const".to_string());
        }
        out
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink) {
        for (i, word) in self.words().iter().enumerate() {
            if i > 0 {
                sink.space();
            }
            sink.keyword(word);
        }
    }
}

impl std::fmt::Display for DeclSpecsSimple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.words().join(" "))
    }
}

/// Prefix keyword of a named type specifier: `typename T::value_type`,
/// `struct tag`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypePrefix {
    Typename,
    Class,
    Struct,
    Union,
    Enum,
}

impl TypePrefix {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Typename => "typename",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailingTypeSpec {
    /// Possibly multi-token: `unsigned long long int`.
    Fundamental(Vec<String>),
    Decltype(Expr),
    DecltypeAuto,
    Name {
        prefix: Option<TypePrefix>,
        name: NestedName,
        /// Constrained placeholder: `Sortable auto`.
        placeholder: Option<String>,
    },
}

impl TrailingTypeSpec {
    pub fn name(&self) -> Option<&NestedName> {
        match self {
            Self::Name { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink, mode: DescribeMode) {
        match self {
            Self::Fundamental(names) => {
                for (i, n) in names.iter().enumerate() {
                    if i > 0 {
                        sink.space();
                    }
                    sink.keyword(n);
                }
            },
            Self::Decltype(expr) => {
                sink.keyword("decltype");
                sink.punct("(");
                expr.describe(sink);
                sink.punct(")");
            },
            Self::DecltypeAuto => {
                sink.keyword("decltype");
                sink.punct("(");
                sink.keyword("auto");
                sink.punct(")");
            },
            Self::Name {
                prefix,
                name,
                placeholder,
            } => {
                if let Some(prefix) = prefix {
                    sink.keyword(prefix.keyword());
                    sink.space();
                }
                name.describe(sink, mode);
                if let Some(placeholder) = placeholder {
                    sink.space();
                    sink.keyword(placeholder);
                }
            },
        }
    }
}

impl std::fmt::Display for TrailingTypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fundamental(names) => f.write_str(&names.join(" ")),
            Self::Decltype(expr) => write!(f, "decltype({expr})"),
            Self::DecltypeAuto => f.write_str("decltype(auto)"),
            Self::Name {
                prefix,
                name,
                placeholder,
            } => {
                if let Some(prefix) = prefix {
                    write!(f, "{} ", prefix.keyword())?;
                }
                name.fmt(f)?;
                if let Some(placeholder) = placeholder {
                    write!(f, " {placeholder}")?;
                }
                Ok(())
            },
        }
    }
}

/// Declaration specifiers: simple specifiers on both sides of the trailing
/// type specifier. `const int static x` keeps `const` left and `static`
/// right of `int`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclSpecs {
    pub left: DeclSpecsSimple,
    pub right: DeclSpecsSimple,
    pub trailing: Option<TrailingTypeSpec>,
}

impl DeclSpecs {
    pub fn merged_simple(&self) -> DeclSpecsSimple {
        self.left.merged_with(&self.right)
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink, mode: DescribeMode) {
        let mut need_space = false;
        if !self.left.is_empty() {
            self.left.describe(sink);
            need_space = true;
        }
        if let Some(trailing) = &self.trailing {
            if need_space {
                sink.space();
            }
            trailing.describe(sink, mode);
            need_space = true;
        }
        if !self.right.is_empty() {
            if need_space {
                sink.space();
            }
            self.right.describe(sink);
        }
    }
}

impl std::fmt::Display for DeclSpecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        let left = self.left.to_string();
        if !left.is_empty() {
            parts.push(left);
        }
        if let Some(trailing) = &self.trailing {
            parts.push(trailing.to_string());
        }
        let right = self.right.to_string();
        if !right.is_empty() {
            parts.push(right);
        }
        f.write_str(&parts.join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefQualifier {
    LValue,
    RValue,
}

impl RefQualifier {
    pub fn text(self) -> &'static str {
        match self {
            Self::LValue => "&",
            Self::RValue => "&&",
        }
    }
}

/// `noexcept` or `noexcept(condition)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoexceptSpec {
    pub expr: Option<Expr>,
}

impl std::fmt::Display for NoexceptSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("noexcept")?;
        if let Some(expr) = &self.expr {
            write!(f, "({expr})")?;
        }
        Ok(())
    }
}

/// One function parameter; `ellipsis` stands for a trailing `...` with no
/// parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionParameter {
    pub arg: Option<TypeWithInit>,
    pub ellipsis: bool,
}

impl FunctionParameter {
    pub fn describe(&self, sink: &mut dyn SignatureSink) {
        if self.ellipsis {
            sink.punct("...");
        } else if let Some(arg) = &self.arg {
            arg.describe(sink, DescribeMode::Param);
        }
    }
}

impl std::fmt::Display for FunctionParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ellipsis {
            f.write_str("...")
        } else if let Some(arg) = &self.arg {
            arg.fmt(f)
        } else {
            Ok(())
        }
    }
}

/// Pure-virtual / defaulted / deleted marker on a function declarator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionSpecifier {
    PureVirtual,
    Default,
    Delete,
}

impl FunctionSpecifier {
    pub fn text(self) -> &'static str {
        match self {
            Self::PureVirtual => "0",
            Self::Default => "default",
            Self::Delete => "delete",
        }
    }
}

/// The parameter list and everything that may trail it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParametersQualifiers {
    pub args: Vec<FunctionParameter>,
    pub volatile_: bool,
    pub const_: bool,
    pub ref_qual: Option<RefQualifier>,
    pub exception_spec: Option<NoexceptSpec>,
    pub trailing_return: Option<Box<Type>>,
    pub override_: bool,
    pub final_: bool,
    pub attrs: AttributeList,
    pub initializer: Option<FunctionSpecifier>,
}

impl ParametersQualifiers {
    pub fn describe(&self, sink: &mut dyn SignatureSink) {
        sink.punct("(");
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                sink.punct(",");
                sink.space();
            }
            arg.describe(sink);
        }
        sink.punct(")");
        for (on, kw) in [(self.const_, "const"), (self.volatile_, "volatile")] {
            if on {
                sink.space();
                sink.keyword(kw);
            }
        }
        if let Some(ref_qual) = self.ref_qual {
            sink.punct(ref_qual.text());
        }
        if let Some(spec) = &self.exception_spec {
            sink.space();
            sink.keyword(&spec.to_string());
        }
        if self.final_ {
            sink.space();
            sink.keyword("final");
        }
        if self.override_ {
            sink.space();
            sink.keyword("override");
        }
        if !self.attrs.is_empty() {
            sink.space();
            self.attrs.describe(sink);
        }
        if let Some(trailing) = &self.trailing_return {
            sink.space();
            sink.punct("->");
            sink.space();
            trailing.describe(sink, DescribeMode::Param);
        }
        if let Some(init) = self.initializer {
            sink.space();
            sink.punct("=");
            sink.space();
            sink.keyword(init.text());
        }
    }
}

impl std::fmt::Display for ParametersQualifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            arg.fmt(f)?;
        }
        f.write_str(")")?;
        if self.const_ {
            f.write_str(" const")?;
        }
        if self.volatile_ {
            f.write_str(" volatile")?;
        }
        if let Some(ref_qual) = self.ref_qual {
            f.write_str(ref_qual.text())?;
        }
        if let Some(spec) = &self.exception_spec {
            write!(f, " {spec}")?;
        }
        if self.final_ {
            f.write_str(" final")?;
        }
        if self.override_ {
            f.write_str(" override")?;
        }
        if !self.attrs.is_empty() {
            write!(f, " {}", self.attrs)?;
        }
        if let Some(trailing) = &self.trailing_return {
            write!(f, " -> {trailing}")?;
        }
        if let Some(init) = self.initializer {
            write!(f, " = {}", init.text())?;
        }
        Ok(())
    }
}

/// One `[size]` array wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayOp {
    pub size: Option<Expr>,
}

impl std::fmt::Display for ArrayOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.size {
            Some(size) => write!(f, "[{size}]"),
            None => f.write_str("[]"),
        }
    }
}

/// Declarator chain. Pointer/reference/member-pointer variants wrap an inner
/// declarator; the chain terminates at a (possibly absent) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Declarator {
    /// Terminal: name, array ops, and optionally a function parameter list
    /// with qualifiers.
    NameParamQual {
        name: Option<NestedName>,
        array_ops: Vec<ArrayOp>,
        param_qual: Option<ParametersQualifiers>,
    },
    /// Terminal: `name : width`.
    NameBitField {
        name: Option<NestedName>,
        size: Expr,
    },
    Ptr {
        next: Box<Declarator>,
        volatile_: bool,
        const_: bool,
        attrs: AttributeList,
    },
    Ref {
        next: Box<Declarator>,
        rvalue: bool,
        attrs: AttributeList,
    },
    /// `... name` parameter pack declarator.
    ParamPack { next: Box<Declarator> },
    /// `Class::* name` member pointer.
    MemPtr {
        class_name: NestedName,
        const_: bool,
        volatile_: bool,
        next: Box<Declarator>,
    },
    /// `( inner ) next` — explicit grouping, e.g. `(*fp)(int)`.
    Paren {
        inner: Box<Declarator>,
        next: Box<Declarator>,
    },
}

impl Declarator {
    /// The declared name, if the chain has one.
    pub fn name(&self) -> Option<&NestedName> {
        match self {
            Self::NameParamQual { name, .. } | Self::NameBitField { name, .. } => name.as_ref(),
            Self::Ptr { next, .. }
            | Self::Ref { next, .. }
            | Self::ParamPack { next }
            | Self::MemPtr { next, .. } => next.name(),
            Self::Paren { inner, .. } => inner.name(),
        }
    }

    /// The innermost parameter list, used for overload identity.
    pub fn function_params(&self) -> Option<&ParametersQualifiers> {
        match self {
            Self::NameParamQual { param_qual, .. } => param_qual.as_ref(),
            Self::NameBitField { .. } => None,
            Self::Ptr { next, .. }
            | Self::Ref { next, .. }
            | Self::ParamPack { next }
            | Self::MemPtr { next, .. } => next.function_params(),
            Self::Paren { inner, next } => {
                inner.function_params().or_else(|| next.function_params())
            },
        }
    }

    pub fn is_function(&self) -> bool {
        self.function_params().is_some()
    }

    fn is_empty_terminal(&self) -> bool {
        matches!(
            self,
            Self::NameParamQual {
                name: None,
                array_ops,
                param_qual: None,
            } if array_ops.is_empty()
        )
    }

    /// Stringify with the declared name omitted: the abstract-declarator
    /// reading of this chain, used for overload identity and identifier
    /// generation.
    pub fn abstract_text(&self) -> String {
        match self {
            Self::NameParamQual {
                array_ops,
                param_qual,
                ..
            } => {
                let mut out = String::new();
                for op in array_ops {
                    out.push_str(&op.to_string());
                }
                if let Some(pq) = param_qual {
                    out.push_str(&pq.to_string());
                }
                out
            },
            Self::NameBitField { size, .. } => format!(" : {size}"),
            Self::Ptr {
                next,
                volatile_,
                const_,
                ..
            } => {
                let mut out = String::from("*");
                if *volatile_ {
                    out.push_str("volatile ");
                }
                if *const_ {
                    out.push_str("const ");
                }
                out.push_str(&next.abstract_text());
                out
            },
            Self::Ref { next, rvalue, .. } => {
                format!("{}{}", if *rvalue { "&&" } else { "&" }, next.abstract_text())
            },
            Self::ParamPack { next } => format!("...{}", next.abstract_text()),
            Self::MemPtr {
                class_name,
                const_,
                volatile_,
                next,
            } => {
                let mut out = format!("{class_name}::*");
                if *volatile_ {
                    out.push_str("volatile ");
                }
                if *const_ {
                    out.push_str("const ");
                }
                out.push_str(&next.abstract_text());
                out
            },
            Self::Paren { inner, next } => {
                format!("({}){}", inner.abstract_text(), next.abstract_text())
            },
        }
    }

    /// Whether rendering needs a space between the decl-specs and this
    /// declarator: named declarators get one (`int *b`), abstract chains
    /// bind tight (`int*`).
    pub fn require_space_after_decl_specs(&self) -> bool {
        match self {
            Self::NameParamQual { name, .. } => name.is_some(),
            Self::NameBitField { name, .. } => name.is_some(),
            Self::Ptr { next, .. } | Self::Ref { next, .. } | Self::MemPtr { next, .. } => {
                next.require_space_after_decl_specs()
            },
            Self::ParamPack { .. } => true,
            Self::Paren { .. } => true,
        }
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink, mode: DescribeMode) {
        match self {
            Self::NameParamQual {
                name,
                array_ops,
                param_qual,
            } => {
                if let Some(name) = name {
                    name.describe(sink, mode);
                }
                for op in array_ops {
                    sink.punct(&op.to_string());
                }
                if let Some(pq) = param_qual {
                    pq.describe(sink);
                }
            },
            Self::NameBitField { name, size } => {
                if let Some(name) = name {
                    name.describe(sink, mode);
                }
                sink.space();
                sink.punct(":");
                sink.space();
                size.describe(sink);
            },
            Self::Ptr {
                next,
                volatile_,
                const_,
                attrs,
            } => {
                sink.punct("*");
                if !attrs.is_empty() {
                    attrs.describe(sink);
                    sink.space();
                }
                if *volatile_ {
                    sink.keyword("volatile");
                    sink.space();
                }
                if *const_ {
                    sink.keyword("const");
                    sink.space();
                }
                next.describe(sink, mode);
            },
            Self::Ref {
                next,
                rvalue,
                attrs,
            } => {
                sink.punct(if *rvalue { "&&" } else { "&" });
                if !attrs.is_empty() {
                    attrs.describe(sink);
                    sink.space();
                }
                next.describe(sink, mode);
            },
            Self::ParamPack { next } => {
                sink.punct("...");
                if !next.is_empty_terminal() {
                    sink.space();
                }
                next.describe(sink, mode);
            },
            Self::MemPtr {
                class_name,
                const_,
                volatile_,
                next,
            } => {
                class_name.describe(sink, DescribeMode::Param);
                sink.punct("::*");
                if *volatile_ {
                    sink.keyword("volatile");
                    sink.space();
                }
                if *const_ {
                    sink.keyword("const");
                    sink.space();
                }
                next.describe(sink, mode);
            },
            Self::Paren { inner, next } => {
                sink.punct("(");
                inner.describe(sink, mode);
                sink.punct(")");
                next.describe(sink, mode);
            },
        }
    }
}

impl std::fmt::Display for Declarator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameParamQual {
                name,
                array_ops,
                param_qual,
            } => {
                if let Some(name) = name {
                    name.fmt(f)?;
                }
                for op in array_ops {
                    op.fmt(f)?;
                }
                if let Some(pq) = param_qual {
                    pq.fmt(f)?;
                }
                Ok(())
            },
            Self::NameBitField { name, size } => {
                if let Some(name) = name {
                    name.fmt(f)?;
                }
                write!(f, " : {size}")
            },
            Self::Ptr {
                next,
                volatile_,
                const_,
                attrs,
            } => {
                f.write_str("*")?;
                if !attrs.is_empty() {
                    write!(f, "{attrs} ")?;
                }
                if *volatile_ {
                    f.write_str("volatile ")?;
                }
                if *const_ {
                    f.write_str("const ")?;
                }
                next.fmt(f)
            },
            Self::Ref {
                next,
                rvalue,
                attrs,
            } => {
                f.write_str(if *rvalue { "&&" } else { "&" })?;
                if !attrs.is_empty() {
                    write!(f, "{attrs} ")?;
                }
                next.fmt(f)
            },
            Self::ParamPack { next } => {
                f.write_str("...")?;
                if !next.is_empty_terminal() {
                    f.write_str(" ")?;
                }
                next.fmt(f)
            },
            Self::MemPtr {
                class_name,
                const_,
                volatile_,
                next,
            } => {
                write!(f, "{class_name}::*")?;
                if *volatile_ {
                    f.write_str("volatile ")?;
                }
                if *const_ {
                    f.write_str("const ")?;
                }
                next.fmt(f)
            },
            Self::Paren { inner, next } => {
                write!(f, "({inner})")?;
                next.fmt(f)
            },
        }
    }
}

/// `= expr`, `= {...}`, or direct `{...}` initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Initializer {
    pub value: Expr,
    pub has_assign: bool,
}

impl std::fmt::Display for Initializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_assign {
            write!(f, " = {}", self.value)
        } else {
            self.value.fmt(f)
        }
    }
}

/// A full type: declaration specifiers plus a declarator chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Type {
    pub decl_specs: DeclSpecs,
    pub decl: Declarator,
}

impl Type {
    pub fn name(&self) -> Option<&NestedName> {
        self.decl.name()
    }

    /// Canonical text with the declared name omitted.
    pub fn abstract_text(&self) -> String {
        let specs = self.decl_specs.to_string();
        let decl = self.decl.abstract_text();
        let text = if specs.is_empty() {
            decl
        } else if decl.is_empty() {
            specs
        } else if decl.starts_with('*') || decl.starts_with('&') || decl.starts_with('(') {
            format!("{specs}{decl}")
        } else {
            format!("{specs} {decl}")
        };
        text.trim_end().to_string()
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink, mode: DescribeMode) {
        self.decl_specs.describe(sink, DescribeMode::Param);
        let specs_empty = self.decl_specs.left.is_empty()
            && self.decl_specs.trailing.is_none()
            && self.decl_specs.right.is_empty();
        if !specs_empty && self.decl.require_space_after_decl_specs() {
            sink.space();
        }
        self.decl.describe(sink, mode);
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let specs = self.decl_specs.to_string();
        let decl = self.decl.to_string();
        if specs.is_empty() {
            f.write_str(&decl)
        } else if decl.is_empty() {
            f.write_str(&specs)
        } else if self.decl.require_space_after_decl_specs() {
            write!(f, "{specs} {decl}")
        } else {
            write!(f, "{specs}{decl}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeWithInit {
    pub ty: Type,
    pub init: Option<Initializer>,
}

impl TypeWithInit {
    pub fn describe(&self, sink: &mut dyn SignatureSink, mode: DescribeMode) {
        self.ty.describe(sink, mode);
        if let Some(init) = &self.init {
            sink.text(&init.to_string());
        }
    }
}

impl std::fmt::Display for TypeWithInit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ty.fmt(f)?;
        if let Some(init) = &self.init {
            init.fmt(f)?;
        }
        Ok(())
    }
}

/// `using Alias = type` (type omitted for opaque aliases).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeUsing {
    pub name: NestedName,
    pub ty: Option<Type>,
}

impl std::fmt::Display for TypeUsing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name.fmt(f)?;
        if let Some(ty) = &self.ty {
            write!(f, " = {ty}")?;
        }
        Ok(())
    }
}
