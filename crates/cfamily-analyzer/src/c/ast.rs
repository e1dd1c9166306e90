//! C declaration AST: the C domain's smaller parallel of the C++ node
//! model — no templates, operators, or references; adds `restrict`,
//! `_Atomic`, C array qualifiers, and macro declarations.

use serde::{Deserialize, Serialize};

use crate::attrs::AttributeList;
use crate::ident::Identifier;
use crate::render::{DescribeMode, SignatureSink};

/// A possibly-qualified C name: `tag.member` nesting uses `.` in directive
/// input, but the canonical form is the identifier sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestedName {
    pub names: Vec<Identifier>,
    pub rooted: bool,
}

impl NestedName {
    pub fn new(names: Vec<Identifier>, rooted: bool) -> Self {
        Self { names, rooted }
    }

    pub fn from_ident(ident: Identifier) -> Self {
        Self::new(vec![ident], false)
    }

    pub fn num_components(&self) -> usize {
        self.names.len()
    }

    pub fn last(&self) -> &Identifier {
        self.names.last().expect("nested name with no components")
    }

    pub fn is_anonymous(&self) -> bool {
        self.names.iter().any(Identifier::is_anonymous)
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink, mode: DescribeMode) {
        match mode {
            DescribeMode::NoneIsName => sink.name(&self.to_string()),
            DescribeMode::Param => sink.type_name(&self.to_string()),
            DescribeMode::MarkType | DescribeMode::LastIsName => {
                if self.rooted {
                    sink.punct(".");
                }
                let last = self.names.len() - 1;
                for (i, name) in self.names.iter().enumerate() {
                    if i > 0 {
                        sink.punct(".");
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
            f.write_str(".")?;
        }
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            name.fmt(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharLiteral {
    pub prefix: Option<String>,
    pub data: String,
    pub value: u64,
}

impl std::fmt::Display for CharLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(prefix) = &self.prefix {
            f.write_str(prefix)?;
        }
        write!(f, "'{}'", self.data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParenExprList {
    pub exprs: Vec<Expr>,
}

impl std::fmt::Display for ParenExprList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (i, e) in self.exprs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            e.fmt(f)?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BracedInitList {
    pub exprs: Vec<Expr>,
    pub trailing_comma: bool,
}

impl std::fmt::Display for BracedInitList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, e) in self.exprs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            e.fmt(f)?;
        }
        if self.trailing_comma {
            f.write_str(",")?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostfixOp {
    Call(ParenExprList),
    Subscript(Box<Expr>),
    Member(NestedName),
    MemberOfPointer(NestedName),
    Inc,
    Dec,
}

impl std::fmt::Display for PostfixOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call(args) => args.fmt(f),
            Self::Subscript(e) => write!(f, "[{e}]"),
            Self::Member(name) => write!(f, ".{name}"),
            Self::MemberOfPointer(name) => write!(f, "->{name}"),
            Self::Inc => f.write_str("++"),
            Self::Dec => f.write_str("--"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    BooleanLiteral(bool),
    NumberLiteral(String),
    StringLiteral(String),
    CharLiteral(CharLiteral),
    Id(NestedName),
    Paren(Box<Expr>),
    BracedInit(BracedInitList),
    Postfix {
        prefix: Box<Expr>,
        ops: Vec<PostfixOp>,
    },
    Unary {
        op: String,
        expr: Box<Expr>,
    },
    SizeofType(Box<Type>),
    Sizeof(Box<Expr>),
    Alignof(Box<Type>),
    Cast {
        ty: Box<Type>,
        expr: Box<Expr>,
    },
    Binary {
        exprs: Vec<Expr>,
        ops: Vec<String>,
    },
    /// Right-leaning run: `exprs[0] ops[0] exprs[1] ...`
    Assignment {
        exprs: Vec<Expr>,
        ops: Vec<String>,
    },
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Fallback(String),
}

impl Expr {
    pub fn describe(&self, sink: &mut dyn SignatureSink) {
        sink.text(&self.to_string());
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BooleanLiteral(v) => f.write_str(if *v { "true" } else { "false" }),
            Self::NumberLiteral(data) => f.write_str(data),
            Self::StringLiteral(data) => f.write_str(data),
            Self::CharLiteral(lit) => lit.fmt(f),
            Self::Id(name) => name.fmt(f),
            Self::Paren(e) => write!(f, "({e})"),
            Self::BracedInit(list) => list.fmt(f),
            Self::Postfix { prefix, ops } => {
                prefix.fmt(f)?;
                for op in ops {
                    op.fmt(f)?;
                }
                Ok(())
            },
            Self::Unary { op, expr } => {
                if op.chars().next().is_some_and(char::is_alphabetic) {
                    write!(f, "{op} {expr}")
                } else {
                    write!(f, "{op}{expr}")
                }
            },
            Self::SizeofType(ty) => write!(f, "sizeof({ty})"),
            Self::Sizeof(e) => write!(f, "sizeof {e}"),
            Self::Alignof(ty) => write!(f, "alignof({ty})"),
            Self::Cast { ty, expr } => write!(f, "({ty}){expr}"),
            Self::Binary { exprs, ops } | Self::Assignment { exprs, ops } => {
                exprs[0].fmt(f)?;
                for (op, e) in ops.iter().zip(&exprs[1..]) {
                    write!(f, " {op} {e}")?;
                }
                Ok(())
            },
            Self::Conditional {
                cond,
                then,
                otherwise,
            } => write!(f, "{cond} ? {then} : {otherwise}"),
            Self::Fallback(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageClass {
    Auto,
    Static,
    Extern,
    Register,
}

impl StorageClass {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Static => "static",
            Self::Extern => "extern",
            Self::Register => "register",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypePrefix {
    Struct,
    Union,
    Enum,
}

impl TypePrefix {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailingTypeSpec {
    Fundamental(Vec<String>),
    Name {
        prefix: Option<TypePrefix>,
        name: NestedName,
    },
}

impl TrailingTypeSpec {
    pub fn name(&self) -> Option<&NestedName> {
        match self {
            Self::Name { name, .. } => Some(name),
            Self::Fundamental(_) => None,
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
            Self::Name { prefix, name } => {
                if let Some(prefix) = prefix {
                    sink.keyword(prefix.keyword());
                    sink.space();
                }
                name.describe(sink, mode);
            },
        }
    }
}

impl std::fmt::Display for TrailingTypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fundamental(names) => f.write_str(&names.join(" ")),
            Self::Name { prefix, name } => {
                if let Some(prefix) = prefix {
                    write!(f, "{} ", prefix.keyword())?;
                }
                name.fmt(f)
            },
        }
    }
}

/// Thread-locality keeps its source spelling (`_Thread_local` or the
/// `thread_local` macro form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DeclSpecsSimple {
    pub storage: Option<StorageClass>,
    pub thread_local: Option<String>,
    pub inline: bool,
    pub noreturn: bool,
    pub restrict_: bool,
    pub atomic: bool,
    pub volatile_: bool,
    pub const_: bool,
    pub attrs: AttributeList,
}

impl DeclSpecsSimple {
    pub fn is_empty(&self) -> bool {
        self.storage.is_none()
            && self.thread_local.is_none()
            && !self.inline
            && !self.noreturn
            && !self.restrict_
            && !self.atomic
            && !self.volatile_
            && !self.const_
            && self.attrs.is_empty()
    }

    fn words(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.attrs.is_empty() {
            out.push(self.attrs.to_string());
        }
        if let Some(storage) = self.storage {
            out.push(storage.keyword().to_string());
        }
        if let Some(spelling) = &self.thread_local {
            out.push(spelling.clone());
        }
        if self.inline {
            out.push("inline".to_string());
        }
        if self.noreturn {
            out.push("_Noreturn".to_string());
        }
        if self.restrict_ {
            out.push("restrict".to_string());
        }
        if self.atomic {
            out.push("_Atomic".to_string());
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

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclSpecs {
    pub left: DeclSpecsSimple,
    pub right: DeclSpecsSimple,
    pub trailing: Option<TrailingTypeSpec>,
}

impl DeclSpecs {
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

/// One C array declarator suffix, with C99 qualifiers and `*` VLA bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayOp {
    pub static_: bool,
    pub const_: bool,
    pub volatile_: bool,
    pub restrict_: bool,
    pub vla: bool,
    pub size: Option<Expr>,
}

impl std::fmt::Display for ArrayOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        let mut space = "";
        if self.static_ {
            f.write_str("static")?;
            space = " ";
        }
        for (on, kw) in [
            (self.restrict_, "restrict"),
            (self.volatile_, "volatile"),
            (self.const_, "const"),
        ] {
            if on {
                write!(f, "{space}{kw}")?;
                space = " ";
            }
        }
        if self.vla {
            write!(f, "{space}*")?;
        } else if let Some(size) = &self.size {
            write!(f, "{space}{size}")?;
        }
        f.write_str("]")
    }
}

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

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameters {
    pub args: Vec<FunctionParameter>,
    pub attrs: AttributeList,
}

impl Parameters {
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
        if !self.attrs.is_empty() {
            sink.space();
            self.attrs.describe(sink);
        }
    }
}

impl std::fmt::Display for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            arg.fmt(f)?;
        }
        f.write_str(")")?;
        if !self.attrs.is_empty() {
            write!(f, " {}", self.attrs)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Declarator {
    NameParam {
        name: Option<NestedName>,
        array_ops: Vec<ArrayOp>,
        param: Option<Parameters>,
    },
    NameBitField {
        name: Option<NestedName>,
        size: Expr,
    },
    Ptr {
        next: Box<Declarator>,
        restrict_: bool,
        volatile_: bool,
        const_: bool,
        attrs: AttributeList,
    },
    Paren {
        inner: Box<Declarator>,
        next: Box<Declarator>,
    },
}

impl Declarator {
    pub fn name(&self) -> Option<&NestedName> {
        match self {
            Self::NameParam { name, .. } | Self::NameBitField { name, .. } => name.as_ref(),
            Self::Ptr { next, .. } => next.name(),
            Self::Paren { inner, .. } => inner.name(),
        }
    }

    pub fn function_params(&self) -> Option<&Parameters> {
        match self {
            Self::NameParam { param, .. } => param.as_ref(),
            Self::NameBitField { .. } => None,
            Self::Ptr { next, .. } => next.function_params(),
            Self::Paren { inner, next } => {
                inner.function_params().or_else(|| next.function_params())
            },
        }
    }

    pub fn is_function(&self) -> bool {
        self.function_params().is_some()
    }

    pub fn abstract_text(&self) -> String {
        match self {
            Self::NameParam {
                array_ops, param, ..
            } => {
                let mut out = String::new();
                for op in array_ops {
                    out.push_str(&op.to_string());
                }
                if let Some(param) = param {
                    out.push_str(&param.to_string());
                }
                out
            },
            Self::NameBitField { size, .. } => format!(" : {size}"),
            Self::Ptr {
                next,
                restrict_,
                volatile_,
                const_,
                ..
            } => {
                let mut out = String::from("*");
                for (on, kw) in [
                    (*restrict_, "restrict "),
                    (*volatile_, "volatile "),
                    (*const_, "const "),
                ] {
                    if on {
                        out.push_str(kw);
                    }
                }
                out.push_str(&next.abstract_text());
                out
            },
            Self::Paren { inner, next } => {
                format!("({}){}", inner.abstract_text(), next.abstract_text())
            },
        }
    }

    pub fn require_space_after_decl_specs(&self) -> bool {
        match self {
            Self::NameParam { name, .. } | Self::NameBitField { name, .. } => name.is_some(),
            Self::Ptr { next, .. } => next.require_space_after_decl_specs(),
            Self::Paren { .. } => true,
        }
    }

    pub fn describe(&self, sink: &mut dyn SignatureSink, mode: DescribeMode) {
        match self {
            Self::NameParam {
                name,
                array_ops,
                param,
            } => {
                if let Some(name) = name {
                    name.describe(sink, mode);
                }
                for op in array_ops {
                    sink.punct(&op.to_string());
                }
                if let Some(param) = param {
                    param.describe(sink);
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
                restrict_,
                volatile_,
                const_,
                attrs,
            } => {
                sink.punct("*");
                if !attrs.is_empty() {
                    attrs.describe(sink);
                    sink.space();
                }
                for (on, kw) in [
                    (*restrict_, "restrict"),
                    (*volatile_, "volatile"),
                    (*const_, "const"),
                ] {
                    if on {
                        sink.keyword(kw);
                        sink.space();
                    }
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
            Self::NameParam {
                name,
                array_ops,
                param,
            } => {
                if let Some(name) = name {
                    name.fmt(f)?;
                }
                for op in array_ops {
                    op.fmt(f)?;
                }
                if let Some(param) = param {
                    param.fmt(f)?;
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
                restrict_,
                volatile_,
                const_,
                attrs,
            } => {
                f.write_str("*")?;
                if !attrs.is_empty() {
                    write!(f, "{attrs} ")?;
                }
                for (on, kw) in [
                    (*restrict_, "restrict "),
                    (*volatile_, "volatile "),
                    (*const_, "const "),
                ] {
                    if on {
                        f.write_str(kw)?;
                    }
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

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Type {
    pub decl_specs: DeclSpecs,
    pub decl: Declarator,
}

impl Type {
    pub fn name(&self) -> Option<&NestedName> {
        self.decl.name()
    }

    pub fn abstract_text(&self) -> String {
        let specs = self.decl_specs.to_string();
        let decl = self.decl.abstract_text();
        let text = if specs.is_empty() {
            decl
        } else if decl.is_empty() {
            specs
        } else if decl.starts_with('*') || decl.starts_with('(') {
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

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacroParameter {
    pub arg: Option<Identifier>,
    /// Bare `...`.
    pub ellipsis: bool,
    /// Named variadic parameter `args...`.
    pub variadic: bool,
}

impl std::fmt::Display for MacroParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ellipsis {
            return f.write_str("...");
        }
        if let Some(arg) = &self.arg {
            arg.fmt(f)?;
        }
        if self.variadic {
            f.write_str("...")?;
        }
        Ok(())
    }
}

/// An object-like or function-like macro declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Macro {
    pub ident: NestedName,
    pub args: Option<Vec<MacroParameter>>,
}

impl std::fmt::Display for Macro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ident.fmt(f)?;
        if let Some(args) = &self.args {
            f.write_str("(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                arg.fmt(f)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Struct {
    pub name: NestedName,
    pub attrs: AttributeList,
}

impl std::fmt::Display for Struct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.attrs.is_empty() {
            write!(f, "{} ", self.attrs)?;
        }
        self.name.fmt(f)
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

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enum {
    pub name: NestedName,
    pub attrs: AttributeList,
}

impl std::fmt::Display for Enum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.attrs.is_empty() {
            write!(f, "{} ", self.attrs)?;
        }
        self.name.fmt(f)
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Function,
    Member,
    Macro,
    Struct,
    Union,
    Enum,
    Enumerator,
    Type,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Member => "member",
            Self::Macro => "macro",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Enumerator => "enumerator",
            Self::Type => "type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationBody {
    Function(Type),
    Member(TypeWithInit),
    Macro(Macro),
    Struct(Struct),
    Union(Union),
    Enum(Enum),
    Enumerator(Enumerator),
    Type(Type),
}

impl DeclarationBody {
    pub fn name(&self) -> Option<&NestedName> {
        match self {
            Self::Function(ty) | Self::Type(ty) => ty.name(),
            Self::Member(m) => m.ty.name(),
            Self::Macro(m) => Some(&m.ident),
            Self::Struct(s) => Some(&s.name),
            Self::Union(u) => Some(&u.name),
            Self::Enum(e) => Some(&e.name),
            Self::Enumerator(e) => Some(&e.name),
        }
    }
}

impl std::fmt::Display for DeclarationBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function(ty) | Self::Type(ty) => ty.fmt(f),
            Self::Member(m) => m.fmt(f),
            Self::Macro(m) => m.fmt(f),
            Self::Struct(s) => s.fmt(f),
            Self::Union(u) => u.fmt(f),
            Self::Enum(e) => e.fmt(f),
            Self::Enumerator(e) => e.fmt(f),
        }
    }
}

/// The root of one parsed C signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    pub object_type: ObjectType,
    pub directive_type: Option<String>,
    pub body: DeclarationBody,
    pub semicolon: bool,
}

impl Declaration {
    pub fn name(&self) -> Option<&NestedName> {
        self.body.name()
    }

    pub fn function_params(&self) -> Option<&Parameters> {
        match &self.body {
            DeclarationBody::Function(ty) | DeclarationBody::Type(ty) => {
                ty.decl.function_params()
            },
            DeclarationBody::Member(m) => m.ty.decl.function_params(),
            _ => None,
        }
    }

    pub fn describe_signature(&self, sink: &mut dyn SignatureSink) {
        match &self.body {
            DeclarationBody::Function(ty) | DeclarationBody::Type(ty) => {
                ty.describe(sink, DescribeMode::MarkType);
            },
            DeclarationBody::Member(m) => m.describe(sink, DescribeMode::MarkType),
            DeclarationBody::Macro(m) => {
                m.ident.describe(sink, DescribeMode::LastIsName);
                if let Some(args) = &m.args {
                    sink.punct("(");
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            sink.punct(",");
                            sink.space();
                        }
                        sink.text(&arg.to_string());
                    }
                    sink.punct(")");
                }
            },
            DeclarationBody::Struct(s) => {
                sink.keyword("struct");
                sink.space();
                s.name.describe(sink, DescribeMode::LastIsName);
            },
            DeclarationBody::Union(u) => {
                sink.keyword("union");
                sink.space();
                u.name.describe(sink, DescribeMode::LastIsName);
            },
            DeclarationBody::Enum(e) => {
                sink.keyword("enum");
                sink.space();
                e.name.describe(sink, DescribeMode::LastIsName);
            },
            DeclarationBody::Enumerator(e) => {
                e.name.describe(sink, DescribeMode::LastIsName);
                if let Some(init) = &e.init {
                    sink.text(&init.to_string());
                }
            },
        }
        if self.semicolon {
            sink.punct(";");
        }
    }
}

impl std::fmt::Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.body.fmt(f)?;
        if self.semicolon {
            f.write_str(";")?;
        }
        Ok(())
    }
}
