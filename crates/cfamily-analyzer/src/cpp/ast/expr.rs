use serde::{Deserialize, Serialize};

use crate::cpp::ast::name::{Identifier, NestedName};
use crate::cpp::ast::ty::Type;
use crate::render::SignatureSink;

/// A validated character literal. The value is computed because character
/// literals can feed constant contexts (enumerator initializers).
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastKind {
    Dynamic,
    Static,
    Reinterpret,
    Const,
}

impl CastKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Dynamic => "dynamic_cast",
            Self::Static => "static_cast",
            Self::Reinterpret => "reinterpret_cast",
            Self::Const => "const_cast",
        }
    }
}

/// `{ e1, e2, ... }` — usable wherever an initializer or call argument list
/// accepts braces.
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

/// Argument list of a call or `new` initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallArgs {
    Paren(ParenExprList),
    Braced(BracedInitList),
}

impl std::fmt::Display for CallArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paren(list) => list.fmt(f),
            Self::Braced(list) => list.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostfixOp {
    Call(CallArgs),
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

/// Base of a postfix chain: a functional cast starts from a type
/// (`int(5)`, `T{...}`), everything else from an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostfixBase {
    Type(Box<Type>),
    Expr(Box<Expr>),
}

impl std::fmt::Display for PostfixBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(t) => t.fmt(f),
            Self::Expr(e) => e.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeOrExpr {
    Type(Box<Type>),
    Expr(Box<Expr>),
}

impl std::fmt::Display for TypeOrExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(t) => t.fmt(f),
            Self::Expr(e) => e.fmt(f),
        }
    }
}

/// Expression AST. One variant per grammar construct; structural equality and
/// hashing back redeclaration detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    BooleanLiteral(bool),
    /// `nullptr`
    PointerLiteral,
    /// Raw text; the value is never computed.
    NumberLiteral(String),
    /// Raw text including encoding prefix and quotes.
    StringLiteral(String),
    CharLiteral(CharLiteral),
    UserDefinedLiteral {
        literal: Box<Expr>,
        ident: Identifier,
    },
    This,
    Id(NestedName),
    Paren(Box<Expr>),
    BracedInit(BracedInitList),
    Postfix {
        base: PostfixBase,
        ops: Vec<PostfixOp>,
    },
    Unary {
        op: String,
        expr: Box<Expr>,
    },
    /// Flat same-precedence run: `exprs[0] ops[0] exprs[1] ops[1] ...`
    Binary {
        exprs: Vec<Expr>,
        ops: Vec<String>,
    },
    Assignment {
        left: Box<Expr>,
        op: String,
        right: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Comma(Vec<Expr>),
    /// `(pack op ...)`, `(... op pack)`, `(a op ... op b)`
    Fold {
        left: Option<Box<Expr>>,
        op: String,
        right: Option<Box<Expr>>,
    },
    /// C-style cast `(T)e`
    Cast {
        ty: Box<Type>,
        expr: Box<Expr>,
    },
    /// `static_cast<T>(e)` and friends
    ExplicitCast {
        kind: CastKind,
        ty: Box<Type>,
        expr: Box<Expr>,
    },
    TypeId(TypeOrExpr),
    SizeofParamPack(Identifier),
    SizeofType(Box<Type>),
    Sizeof(Box<Expr>),
    Alignof(Box<Type>),
    Noexcept(Box<Expr>),
    New {
        rooted: bool,
        /// Parenthesized type-id form: `new (int)` vs `new int`.
        is_new_type_id: bool,
        ty: Box<Type>,
        init: Option<CallArgs>,
    },
    Delete {
        rooted: bool,
        array: bool,
        expr: Box<Expr>,
    },
    PackExpansion(Box<Expr>),
    /// Opaque span captured when strict expression parsing failed but
    /// fallback mode was enabled.
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
            Self::PointerLiteral => f.write_str("nullptr"),
            Self::NumberLiteral(data) => f.write_str(data),
            Self::StringLiteral(data) => f.write_str(data),
            Self::CharLiteral(lit) => lit.fmt(f),
            Self::UserDefinedLiteral { literal, ident } => write!(f, "{literal}{ident}"),
            Self::This => f.write_str("this"),
            Self::Id(name) => name.fmt(f),
            Self::Paren(e) => write!(f, "({e})"),
            Self::BracedInit(list) => list.fmt(f),
            Self::Postfix { base, ops } => {
                base.fmt(f)?;
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
            Self::Binary { exprs, ops } => {
                exprs[0].fmt(f)?;
                for (op, e) in ops.iter().zip(&exprs[1..]) {
                    write!(f, " {op} {e}")?;
                }
                Ok(())
            },
            Self::Assignment { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::Conditional {
                cond,
                then,
                otherwise,
            } => write!(f, "{cond} ? {then} : {otherwise}"),
            Self::Comma(exprs) => {
                for (i, e) in exprs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    e.fmt(f)?;
                }
                Ok(())
            },
            Self::Fold { left, op, right } => match (left, right) {
                (None, Some(r)) => write!(f, "(... {op} {r})"),
                (Some(l), None) => write!(f, "({l} {op} ...)"),
                (Some(l), Some(r)) => write!(f, "({l} {op} ... {op} {r})"),
                (None, None) => unreachable!("fold expression with no operands"),
            },
            Self::Cast { ty, expr } => write!(f, "({ty}){expr}"),
            Self::ExplicitCast { kind, ty, expr } => {
                write!(f, "{}<{ty}>({expr})", kind.keyword())
            },
            Self::TypeId(arg) => write!(f, "typeid({arg})"),
            Self::SizeofParamPack(ident) => write!(f, "sizeof...({ident})"),
            Self::SizeofType(ty) => write!(f, "sizeof({ty})"),
            Self::Sizeof(e) => write!(f, "sizeof {e}"),
            Self::Alignof(ty) => write!(f, "alignof({ty})"),
            Self::Noexcept(e) => write!(f, "noexcept({e})"),
            Self::New {
                rooted,
                is_new_type_id,
                ty,
                init,
            } => {
                if *rooted {
                    f.write_str("::")?;
                }
                f.write_str("new ")?;
                if *is_new_type_id {
                    ty.fmt(f)?;
                } else {
                    write!(f, "({ty})")?;
                }
                if let Some(init) = init {
                    init.fmt(f)?;
                }
                Ok(())
            },
            Self::Delete {
                rooted,
                array,
                expr,
            } => {
                if *rooted {
                    f.write_str("::")?;
                }
                f.write_str(if *array { "delete[] " } else { "delete " })?;
                expr.fmt(f)
            },
            Self::PackExpansion(e) => write!(f, "{e}..."),
            Self::Fallback(text) => f.write_str(text),
        }
    }
}
