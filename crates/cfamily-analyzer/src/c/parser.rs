//! Recursive-descent parser for C declaration signatures.
//!
//! Same discipline as the C++ parser — one instance per input, explicit
//! mark/reset backtracking, `DefinitionError` values for failures — over the
//! much smaller C grammar.

use crate::attrs::{Attribute, AttributeList, GnuAttribute};
use crate::c::ast::*;
use crate::error::DefinitionError;
use crate::ident::Identifier;
use crate::options::ParseOptions;
use crate::syntax::literals::{self, CharLiteralError};
use crate::syntax::{Token, TokenKind, tokenize};

type Result<T> = std::result::Result<T, DefinitionError>;

const UNARY_OPS: &[&str] = &["++", "--", "*", "&", "+", "-", "!", "~"];

/// Binary operators by precedence level, loosest first.
const BIN_OPS: &[&[&str]] = &[
    &["||"],
    &["&&"],
    &["|"],
    &["^"],
    &["&"],
    &["==", "!="],
    &["<=", ">=", "<", ">"],
    &["<<", ">>"],
    &["+", "-"],
    &["*", "/", "%"],
];

const ASSIGN_OPS: &[&str] = &[
    "=", "*=", "/=", "%=", "+=", "-=", ">>=", "<<=", "&=", "^=", "|=",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameMode {
    No,
    Maybe,
    Yes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outer {
    Type,
    Member,
    Function,
    FunctionParam,
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, options: ParseOptions) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
            options,
        }
    }

    // ---- cursor primitives -------------------------------------------------

    fn mark(&self) -> usize {
        self.pos
    }

    fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn peek_nth(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn peek_text(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(|t| t.text)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn bump(&mut self) -> Token<'a> {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token<'a>> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn adjacent(&self, offset: usize) -> bool {
        match (
            self.tokens.get(self.pos + offset),
            self.tokens.get(self.pos + offset + 1),
        ) {
            (Some(a), Some(b)) => a.end() == b.start,
            _ => false,
        }
    }

    fn current_offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source.len(), |t| t.start)
    }

    fn error(&self, message: impl Into<String>) -> DefinitionError {
        DefinitionError::syntax(message, self.current_offset())
    }

    fn assert_end(&mut self) -> Result<()> {
        if self.is_eof() {
            Ok(())
        } else {
            Err(self.error("expected end of declaration"))
        }
    }

    // ---- attributes --------------------------------------------------------

    fn parse_attribute(&mut self) -> Result<Option<Attribute>> {
        if self.at(TokenKind::LDoubleBracket) {
            self.bump();
            let arg_start = self.current_offset();
            let mut depth = 0usize;
            loop {
                match self.peek() {
                    None => return Err(self.error("unterminated [[attribute]]")),
                    Some(TokenKind::LDoubleBracket) => {
                        depth += 2;
                        self.bump();
                    },
                    Some(TokenKind::LBracket) => {
                        depth += 1;
                        self.bump();
                    },
                    Some(TokenKind::RDoubleBracket) if depth == 0 => break,
                    Some(TokenKind::RDoubleBracket) => {
                        depth = depth.saturating_sub(2);
                        self.bump();
                    },
                    Some(TokenKind::RBracket) => {
                        depth = depth.saturating_sub(1);
                        self.bump();
                    },
                    Some(_) => {
                        self.bump();
                    },
                }
            }
            let end = self.bump();
            let arg = self.source[arg_start..end.start].trim().to_string();
            return Ok(Some(Attribute::Cpp(arg)));
        }
        if self.at(TokenKind::KwGnuAttribute) {
            self.bump();
            self.expect(TokenKind::LParen, "'(' after __attribute__")?;
            self.expect(TokenKind::LParen, "'((' after __attribute__")?;
            let mut attrs = Vec::new();
            loop {
                let name = self.expect(TokenKind::Ident, "attribute name")?;
                let args = if self.at(TokenKind::LParen) {
                    Some(self.capture_balanced_parens()?)
                } else {
                    None
                };
                attrs.push(GnuAttribute {
                    name: name.text.to_string(),
                    args,
                });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen, "')' closing __attribute__")?;
            self.expect(TokenKind::RParen, "'))' closing __attribute__")?;
            return Ok(Some(Attribute::Gnu(attrs)));
        }
        Ok(None)
    }

    fn capture_balanced_parens(&mut self) -> Result<String> {
        let open = self.expect(TokenKind::LParen, "'('")?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek() {
                None => return Err(self.error("unbalanced parentheses")),
                Some(TokenKind::LParen) => {
                    depth += 1;
                    self.bump();
                },
                Some(TokenKind::RParen) => {
                    depth -= 1;
                    self.bump();
                },
                Some(_) => {
                    self.bump();
                },
            }
        }
        let end = self.tokens[self.pos - 1].end();
        Ok(self.source[open.start..end].to_string())
    }

    fn parse_attribute_list(&mut self) -> Result<AttributeList> {
        let mut attrs = Vec::new();
        while let Some(attr) = self.parse_attribute()? {
            attrs.push(attr);
        }
        Ok(AttributeList { attrs })
    }

    // ---- names -------------------------------------------------------------

    /// C nested names use `.` as the scope separator in directive input.
    fn parse_nested_name(&mut self) -> Result<NestedName> {
        let rooted = self.eat(TokenKind::Dot);
        let mut names = Vec::new();
        loop {
            let token = self.expect(TokenKind::Ident, "identifier")?;
            names.push(Identifier::new(token.text));
            if !self.eat(TokenKind::Dot) {
                break;
            }
        }
        Ok(NestedName::new(names, rooted))
    }

    // ---- expressions -------------------------------------------------------

    fn peek_operator_text(&self) -> Option<(&'static str, usize)> {
        use TokenKind::*;
        let merged: Option<(&'static str, usize)> = match self.peek()? {
            Greater if self.peek_nth(1) == Some(Greater)
                && self.adjacent(0)
                && self.peek_nth(2) == Some(Equal)
                && self.adjacent(1) =>
            {
                Some((">>=", 3))
            },
            Greater if self.peek_nth(1) == Some(Greater) && self.adjacent(0) => Some((">>", 2)),
            Greater if self.peek_nth(1) == Some(Equal) && self.adjacent(0) => Some((">=", 2)),
            Greater => Some((">", 1)),
            _ => None,
        };
        if let Some(op) = merged {
            return Some(op);
        }
        let single = match self.peek()? {
            OrOr => "||",
            AndAnd => "&&",
            Pipe => "|",
            Caret => "^",
            Amp => "&",
            EqualEqual => "==",
            NotEqual => "!=",
            LessEqual => "<=",
            Less => "<",
            LeftShift => "<<",
            LeftShiftEqual => "<<=",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Equal => "=",
            StarEqual => "*=",
            SlashEqual => "/=",
            PercentEqual => "%=",
            PlusEqual => "+=",
            MinusEqual => "-=",
            AmpEqual => "&=",
            CaretEqual => "^=",
            PipeEqual => "|=",
            Exclaim => "!",
            Tilde => "~",
            PlusPlus => "++",
            MinusMinus => "--",
            _ => return None,
        };
        Some((single, 1))
    }

    fn consume_operator(&mut self, tokens: usize) {
        for _ in 0..tokens {
            self.bump();
        }
    }

    fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_assignment_expression()
    }

    fn parse_assignment_expression(&mut self) -> Result<Expr> {
        let first = self.parse_conditional_expression()?;
        let mut exprs = vec![first];
        let mut ops = Vec::new();
        loop {
            let Some((op_text, consumed)) = self.peek_operator_text() else {
                break;
            };
            if !ASSIGN_OPS.contains(&op_text) {
                break;
            }
            self.consume_operator(consumed);
            ops.push(op_text.to_string());
            exprs.push(self.parse_conditional_expression()?);
        }
        if ops.is_empty() {
            return Ok(exprs.remove(0));
        }
        Ok(Expr::Assignment { exprs, ops })
    }

    fn parse_constant_expression(&mut self) -> Result<Expr> {
        self.parse_conditional_expression()
    }

    fn parse_conditional_expression(&mut self) -> Result<Expr> {
        let cond = self.parse_binary_level(0)?;
        if !self.eat(TokenKind::Question) {
            return Ok(cond);
        }
        let then = self.parse_expression()?;
        self.expect(TokenKind::Colon, "':' in conditional expression")?;
        let otherwise = self.parse_assignment_expression()?;
        Ok(Expr::Conditional {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_binary_level(&mut self, level: usize) -> Result<Expr> {
        if level >= BIN_OPS.len() {
            return self.parse_cast_expression();
        }
        let first = self.parse_binary_level(level + 1)?;
        let mut exprs = vec![first];
        let mut ops = Vec::new();
        loop {
            let Some((op_text, consumed)) = self.peek_operator_text() else {
                break;
            };
            if !BIN_OPS[level].contains(&op_text) {
                break;
            }
            let saved = self.mark();
            self.consume_operator(consumed);
            match self.parse_binary_level(level + 1) {
                Ok(operand) => {
                    exprs.push(operand);
                    ops.push(op_text.to_string());
                },
                Err(_) => {
                    self.reset(saved);
                    break;
                },
            }
        }
        if ops.is_empty() {
            return Ok(exprs.remove(0));
        }
        Ok(Expr::Binary { exprs, ops })
    }

    fn parse_cast_expression(&mut self) -> Result<Expr> {
        if self.at(TokenKind::LParen) {
            let saved = self.mark();
            self.bump();
            let attempt = (|| -> Result<Expr> {
                let ty = self.parse_type(NameMode::No, Outer::Type)?;
                self.expect(TokenKind::RParen, "')' closing cast")?;
                let expr = self.parse_cast_expression()?;
                Ok(Expr::Cast {
                    ty: Box::new(ty),
                    expr: Box::new(expr),
                })
            })();
            match attempt {
                Ok(expr) => return Ok(expr),
                Err(_) => self.reset(saved),
            }
        }
        self.parse_unary_expression()
    }

    fn parse_unary_expression(&mut self) -> Result<Expr> {
        if let Some((op_text, consumed)) = self.peek_operator_text()
            && UNARY_OPS.contains(&op_text)
        {
            self.consume_operator(consumed);
            let expr = self.parse_cast_expression()?;
            return Ok(Expr::Unary {
                op: op_text.to_string(),
                expr: Box::new(expr),
            });
        }

        if self.at(TokenKind::KwSizeof) {
            self.bump();
            if self.at(TokenKind::LParen) {
                let saved = self.mark();
                self.bump();
                let attempt = (|| -> Result<Expr> {
                    let ty = self.parse_type(NameMode::No, Outer::Type)?;
                    self.expect(TokenKind::RParen, "')' closing sizeof")?;
                    Ok(Expr::SizeofType(Box::new(ty)))
                })();
                match attempt {
                    Ok(expr) => return Ok(expr),
                    Err(_) => self.reset(saved),
                }
            }
            let expr = self.parse_unary_expression()?;
            return Ok(Expr::Sizeof(Box::new(expr)));
        }

        if self.at(TokenKind::KwAlignof) || self.at(TokenKind::KwCAlignof) {
            self.bump();
            self.expect(TokenKind::LParen, "'(' after alignof")?;
            let ty = self.parse_type(NameMode::No, Outer::Type)?;
            self.expect(TokenKind::RParen, "')' closing alignof")?;
            return Ok(Expr::Alignof(Box::new(ty)));
        }

        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> Result<Expr> {
        let prefix = self.parse_primary_expression()?;
        let mut ops = Vec::new();
        loop {
            match self.peek() {
                Some(TokenKind::LParen) => {
                    ops.push(PostfixOp::Call(self.parse_paren_expr_list()?));
                },
                Some(TokenKind::LBracket) => {
                    self.bump();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "']' closing subscript")?;
                    ops.push(PostfixOp::Subscript(Box::new(index)));
                },
                Some(TokenKind::Dot) => {
                    self.bump();
                    let token = self.expect(TokenKind::Ident, "member name")?;
                    ops.push(PostfixOp::Member(NestedName::from_ident(Identifier::new(
                        token.text,
                    ))));
                },
                Some(TokenKind::Arrow) => {
                    self.bump();
                    let token = self.expect(TokenKind::Ident, "member name")?;
                    ops.push(PostfixOp::MemberOfPointer(NestedName::from_ident(
                        Identifier::new(token.text),
                    )));
                },
                Some(TokenKind::PlusPlus) => {
                    self.bump();
                    ops.push(PostfixOp::Inc);
                },
                Some(TokenKind::MinusMinus) => {
                    self.bump();
                    ops.push(PostfixOp::Dec);
                },
                _ => break,
            }
        }
        if ops.is_empty() {
            return Ok(prefix);
        }
        Ok(Expr::Postfix {
            prefix: Box::new(prefix),
            ops,
        })
    }

    fn parse_primary_expression(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(TokenKind::KwTrue) => {
                self.bump();
                Ok(Expr::BooleanLiteral(true))
            },
            Some(TokenKind::KwFalse) => {
                self.bump();
                Ok(Expr::BooleanLiteral(false))
            },
            Some(TokenKind::Number) => {
                let token = self.bump();
                match literals::classify_number(token.text) {
                    // C has no UDL suffixes.
                    Some(n) if n.udl_suffix.is_none() => {
                        Ok(Expr::NumberLiteral(n.literal.to_string()))
                    },
                    _ => Err(DefinitionError::syntax(
                        format!("invalid number literal '{}'", token.text),
                        token.start,
                    )),
                }
            },
            Some(TokenKind::CharLit) => {
                let token = self.bump();
                let decoded = literals::decode_char_literal(token.text).map_err(|e| match e {
                    CharLiteralError::MultiCharacter => DefinitionError::unsupported(
                        format!("multi-character character literal '{}'", token.text),
                        token.start,
                    ),
                    CharLiteralError::Malformed => DefinitionError::syntax(
                        format!("invalid character literal '{}'", token.text),
                        token.start,
                    ),
                })?;
                Ok(Expr::CharLiteral(CharLiteral {
                    prefix: decoded.prefix,
                    data: decoded.data,
                    value: decoded.value,
                }))
            },
            Some(TokenKind::StringLit) => {
                let token = self.bump();
                Ok(Expr::StringLiteral(token.text.to_string()))
            },
            Some(TokenKind::LParen) => {
                self.bump();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')' closing expression")?;
                Ok(Expr::Paren(Box::new(expr)))
            },
            Some(TokenKind::Ident) | Some(TokenKind::Dot) => {
                Ok(Expr::Id(self.parse_nested_name()?))
            },
            _ => Err(self.error("expected expression")),
        }
    }

    fn parse_paren_expr_list(&mut self) -> Result<ParenExprList> {
        self.expect(TokenKind::LParen, "'(' starting argument list")?;
        let mut exprs = Vec::new();
        if self.eat(TokenKind::RParen) {
            return Ok(ParenExprList { exprs });
        }
        loop {
            exprs.push(self.parse_assignment_expression()?);
            if self.eat(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen, "')' closing argument list")?;
            break;
        }
        Ok(ParenExprList { exprs })
    }

    fn parse_braced_init_list(&mut self) -> Result<Expr> {
        self.expect(TokenKind::LBrace, "'{' starting initializer list")?;
        let mut exprs = Vec::new();
        let mut trailing_comma = false;
        if !self.eat(TokenKind::RBrace) {
            loop {
                let expr = if self.at(TokenKind::LBrace) {
                    self.parse_braced_init_list()?
                } else {
                    self.parse_assignment_expression()?
                };
                exprs.push(expr);
                if self.eat(TokenKind::Comma) {
                    if self.eat(TokenKind::RBrace) {
                        trailing_comma = true;
                        break;
                    }
                    continue;
                }
                self.expect(TokenKind::RBrace, "'}' closing initializer list")?;
                break;
            }
        }
        Ok(Expr::BracedInit(BracedInitList {
            exprs,
            trailing_comma,
        }))
    }

    fn parse_expr_with_fallback(
        &mut self,
        terminators: &[TokenKind],
        f: fn(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        let saved = self.mark();
        let err = match f(self) {
            Ok(expr) => {
                if terminators.is_empty()
                    || self.is_eof()
                    || self.peek().is_some_and(|k| terminators.contains(&k))
                {
                    return Ok(expr);
                }
                self.error("trailing tokens after expression")
            },
            Err(err) => err,
        };
        if !self.options.allow_fallback_expressions {
            return Err(err);
        }
        self.reset(saved);
        let start_offset = self.current_offset();
        let mut depth = 0usize;
        loop {
            let Some(kind) = self.peek() else { break };
            if depth == 0 && terminators.contains(&kind) {
                break;
            }
            match kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                },
                _ => {},
            }
            self.bump();
        }
        let end_offset = self.current_offset();
        let text = self.source[start_offset..end_offset].trim();
        if text.is_empty() {
            return Err(err);
        }
        Ok(Expr::Fallback(text.to_string()))
    }

    // ---- decl specs and types ----------------------------------------------

    fn parse_decl_specs_simple(&mut self) -> Result<DeclSpecsSimple> {
        let mut specs = DeclSpecsSimple::default();
        loop {
            if let Some(attr) = self.parse_attribute()? {
                specs.attrs.attrs.push(attr);
                continue;
            }
            let storage = match self.peek() {
                Some(TokenKind::KwAuto) => Some(StorageClass::Auto),
                Some(TokenKind::KwStatic) => Some(StorageClass::Static),
                Some(TokenKind::KwExtern) => Some(StorageClass::Extern),
                Some(TokenKind::KwRegister) => Some(StorageClass::Register),
                _ => None,
            };
            if let Some(storage) = storage {
                if specs.storage.is_some() {
                    break;
                }
                specs.storage = Some(storage);
                self.bump();
                continue;
            }
            match self.peek() {
                Some(TokenKind::KwCThreadLocal) | Some(TokenKind::KwThreadLocal)
                    if specs.thread_local.is_none() =>
                {
                    specs.thread_local = Some(self.bump().text.to_string());
                },
                Some(TokenKind::KwInline) if !specs.inline => {
                    specs.inline = true;
                    self.bump();
                },
                Some(TokenKind::KwNoreturn) if !specs.noreturn => {
                    specs.noreturn = true;
                    self.bump();
                },
                Some(TokenKind::KwRestrict) if !specs.restrict_ => {
                    specs.restrict_ = true;
                    self.bump();
                },
                Some(TokenKind::KwAtomic) if !specs.atomic => {
                    specs.atomic = true;
                    self.bump();
                },
                Some(TokenKind::KwVolatile) if !specs.volatile_ => {
                    specs.volatile_ = true;
                    self.bump();
                },
                Some(TokenKind::KwConst) if !specs.const_ => {
                    specs.const_ = true;
                    self.bump();
                },
                _ => break,
            }
        }
        Ok(specs)
    }

    fn parse_trailing_type_spec(&mut self) -> Result<TrailingTypeSpec> {
        if self.peek().is_some_and(TokenKind::is_simple_type_specifier) {
            let mut names = Vec::new();
            while let Some(kind) = self.peek() {
                if kind.is_simple_type_specifier() {
                    names.push(self.bump().text.to_string());
                } else {
                    break;
                }
            }
            return Ok(TrailingTypeSpec::Fundamental(names));
        }
        let prefix = match self.peek() {
            Some(TokenKind::KwStruct) => Some(TypePrefix::Struct),
            Some(TokenKind::KwUnion) => Some(TypePrefix::Union),
            Some(TokenKind::KwEnum) => Some(TypePrefix::Enum),
            _ => None,
        };
        if prefix.is_some() {
            self.bump();
        }
        let name = self.parse_nested_name()?;
        Ok(TrailingTypeSpec::Name { prefix, name })
    }

    fn parse_decl_specs(&mut self, typed: bool) -> Result<DeclSpecs> {
        let left = self.parse_decl_specs_simple()?;
        let (trailing, right) = if typed {
            let trailing = self.parse_trailing_type_spec()?;
            let right = self.parse_decl_specs_simple()?;
            (Some(trailing), right)
        } else {
            (None, DeclSpecsSimple::default())
        };
        Ok(DeclSpecs {
            left,
            trailing,
            right,
        })
    }

    fn parse_array_ops(&mut self) -> Result<Vec<ArrayOp>> {
        let mut ops = Vec::new();
        while self.at(TokenKind::LBracket) {
            self.bump();
            let mut op = ArrayOp {
                static_: false,
                const_: false,
                volatile_: false,
                restrict_: false,
                vla: false,
                size: None,
            };
            loop {
                match self.peek() {
                    Some(TokenKind::KwStatic) if !op.static_ => {
                        op.static_ = true;
                        self.bump();
                    },
                    Some(TokenKind::KwConst) if !op.const_ => {
                        op.const_ = true;
                        self.bump();
                    },
                    Some(TokenKind::KwVolatile) if !op.volatile_ => {
                        op.volatile_ = true;
                        self.bump();
                    },
                    Some(TokenKind::KwRestrict) if !op.restrict_ => {
                        op.restrict_ = true;
                        self.bump();
                    },
                    _ => break,
                }
            }
            if self.at(TokenKind::Star) && self.peek_nth(1) == Some(TokenKind::RBracket) {
                self.bump();
                op.vla = true;
            } else if !self.at(TokenKind::RBracket) {
                let size = self.parse_expr_with_fallback(
                    &[TokenKind::RBracket],
                    Self::parse_expression,
                )?;
                op.size = Some(size);
            }
            self.expect(TokenKind::RBracket, "']' closing array bound")?;
            ops.push(op);
        }
        Ok(ops)
    }

    fn parse_parameters(&mut self) -> Result<Parameters> {
        self.expect(TokenKind::LParen, "'(' starting parameter list")?;
        let mut args = Vec::new();
        if !self.eat(TokenKind::RParen) {
            loop {
                if self.eat(TokenKind::Ellipsis) {
                    args.push(FunctionParameter {
                        arg: None,
                        ellipsis: true,
                    });
                    self.expect(TokenKind::RParen, "')' after '...'")?;
                    break;
                }
                let arg = self.parse_type_with_init(NameMode::Maybe, Outer::FunctionParam)?;
                args.push(FunctionParameter {
                    arg: Some(arg),
                    ellipsis: false,
                });
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                self.expect(TokenKind::RParen, "')' closing parameter list")?;
                break;
            }
        }
        let attrs = self.parse_attribute_list()?;
        Ok(Parameters { args, attrs })
    }

    fn parse_declarator_name_suffix(
        &mut self,
        named: NameMode,
        outer: Outer,
    ) -> Result<Declarator> {
        let name = match named {
            NameMode::No => None,
            NameMode::Maybe => {
                let saved = self.mark();
                match self.parse_nested_name() {
                    Ok(name) => Some(name),
                    Err(_) => {
                        self.reset(saved);
                        None
                    },
                }
            },
            NameMode::Yes => Some(self.parse_nested_name()?),
        };

        let array_ops = self.parse_array_ops()?;

        if outer == Outer::Member && array_ops.is_empty() && self.at(TokenKind::Colon) {
            self.bump();
            let size = self.parse_expr_with_fallback(&[], Self::parse_constant_expression)?;
            return Ok(Declarator::NameBitField { name, size });
        }

        let param = if self.at(TokenKind::LParen) {
            Some(self.parse_parameters()?)
        } else {
            None
        };
        Ok(Declarator::NameParam {
            name,
            array_ops,
            param,
        })
    }

    fn parse_declarator(&mut self, named: NameMode, outer: Outer) -> Result<Declarator> {
        if self.at(TokenKind::Star) {
            self.bump();
            let attrs = self.parse_attribute_list()?;
            let mut restrict_ = false;
            let mut volatile_ = false;
            let mut const_ = false;
            loop {
                match self.peek() {
                    Some(TokenKind::KwRestrict) if !restrict_ => {
                        restrict_ = true;
                        self.bump();
                    },
                    Some(TokenKind::KwVolatile) if !volatile_ => {
                        volatile_ = true;
                        self.bump();
                    },
                    Some(TokenKind::KwConst) if !const_ => {
                        const_ = true;
                        self.bump();
                    },
                    _ => break,
                }
            }
            let next = self.parse_declarator(named, outer)?;
            return Ok(Declarator::Ptr {
                next: Box::new(next),
                restrict_,
                volatile_,
                const_,
                attrs,
            });
        }

        if self.at(TokenKind::LParen) {
            let saved = self.mark();
            self.bump();
            let attempt = (|| -> Result<Declarator> {
                let inner = self.parse_declarator(named, outer)?;
                self.expect(TokenKind::RParen, "')' closing declarator group")?;
                let next = self.parse_declarator_name_suffix(NameMode::No, outer)?;
                Ok(Declarator::Paren {
                    inner: Box::new(inner),
                    next: Box::new(next),
                })
            })();
            match attempt {
                Ok(decl)
                    if decl.name().is_some()
                        || named == NameMode::No
                        || paren_inner_is_indirect(&decl) =>
                {
                    return Ok(decl);
                },
                _ => self.reset(saved),
            }
        }

        self.parse_declarator_name_suffix(named, outer)
    }

    fn parse_type(&mut self, named: NameMode, outer: Outer) -> Result<Type> {
        let decl_specs = self.parse_decl_specs(true)?;
        let decl = self.parse_declarator(named, outer)?;
        if outer == Outer::Function && !decl.is_function() {
            return Err(self.error("expected function declarator"));
        }
        Ok(Type { decl_specs, decl })
    }

    fn parse_initializer(&mut self, outer: Outer) -> Result<Option<Initializer>> {
        let terminators: &[TokenKind] = match outer {
            Outer::FunctionParam => &[TokenKind::Comma, TokenKind::RParen],
            _ => &[],
        };
        if self.eat(TokenKind::Equal) {
            let value = if self.at(TokenKind::LBrace) {
                self.parse_braced_init_list()?
            } else {
                self.parse_expr_with_fallback(terminators, Self::parse_assignment_expression)?
            };
            return Ok(Some(Initializer {
                value,
                has_assign: true,
            }));
        }
        Ok(None)
    }

    fn parse_type_with_init(&mut self, named: NameMode, outer: Outer) -> Result<TypeWithInit> {
        let ty = self.parse_type(named, outer)?;
        let init = self.parse_initializer(outer)?;
        Ok(TypeWithInit { ty, init })
    }

    // ---- declarations ------------------------------------------------------

    fn parse_macro(&mut self) -> Result<Macro> {
        let ident = self.parse_nested_name()?;
        if !self.at(TokenKind::LParen) {
            return Ok(Macro { ident, args: None });
        }
        self.bump();
        let mut args = Vec::new();
        if !self.eat(TokenKind::RParen) {
            loop {
                if self.eat(TokenKind::Ellipsis) {
                    args.push(MacroParameter {
                        arg: None,
                        ellipsis: true,
                        variadic: false,
                    });
                    self.expect(TokenKind::RParen, "')' after '...'")?;
                    break;
                }
                let token = self.expect(TokenKind::Ident, "macro parameter")?;
                let variadic = self.eat(TokenKind::Ellipsis);
                args.push(MacroParameter {
                    arg: Some(Identifier::new(token.text)),
                    ellipsis: false,
                    variadic,
                });
                if variadic {
                    self.expect(TokenKind::RParen, "')' after named variadic parameter")?;
                    break;
                }
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                self.expect(TokenKind::RParen, "')' closing macro parameters")?;
                break;
            }
        }
        Ok(Macro {
            ident,
            args: Some(args),
        })
    }

    fn parse_enumerator(&mut self) -> Result<Enumerator> {
        let name = self.parse_nested_name()?;
        let attrs = self.parse_attribute_list()?;
        let init = if self.eat(TokenKind::Equal) {
            let value = self.parse_expr_with_fallback(&[], Self::parse_constant_expression)?;
            Some(Initializer {
                value,
                has_assign: true,
            })
        } else {
            None
        };
        Ok(Enumerator { name, init, attrs })
    }

    /// Entry point: parse exactly one declaration of the given object type.
    pub fn parse_declaration(
        &mut self,
        object_type: ObjectType,
        directive_type: Option<&str>,
    ) -> Result<Declaration> {
        let body = match object_type {
            ObjectType::Function => {
                DeclarationBody::Function(self.parse_type(NameMode::Yes, Outer::Function)?)
            },
            ObjectType::Member => DeclarationBody::Member(
                self.parse_type_with_init(NameMode::Yes, Outer::Member)?,
            ),
            ObjectType::Macro => DeclarationBody::Macro(self.parse_macro()?),
            ObjectType::Struct => {
                self.eat(TokenKind::KwStruct);
                let attrs = self.parse_attribute_list()?;
                DeclarationBody::Struct(Struct {
                    name: self.parse_nested_name()?,
                    attrs,
                })
            },
            ObjectType::Union => {
                self.eat(TokenKind::KwUnion);
                let attrs = self.parse_attribute_list()?;
                DeclarationBody::Union(Union {
                    name: self.parse_nested_name()?,
                    attrs,
                })
            },
            ObjectType::Enum => {
                self.eat(TokenKind::KwEnum);
                let attrs = self.parse_attribute_list()?;
                DeclarationBody::Enum(Enum {
                    name: self.parse_nested_name()?,
                    attrs,
                })
            },
            ObjectType::Enumerator => DeclarationBody::Enumerator(self.parse_enumerator()?),
            ObjectType::Type => {
                self.eat(TokenKind::KwTypedef);
                DeclarationBody::Type(self.parse_type(NameMode::Yes, Outer::Type)?)
            },
        };

        let semicolon = self.eat(TokenKind::Semicolon);
        self.assert_end()?;

        Ok(Declaration {
            object_type,
            directive_type: directive_type.map(str::to_string),
            body,
            semicolon,
        })
    }

    /// Parse a cross-reference target.
    pub fn parse_xref_name(&mut self) -> Result<NestedName> {
        let name = self.parse_nested_name()?;
        self.assert_end()?;
        Ok(name)
    }
}

/// A paren group whose inner declarator starts with a pointer (`(*fp)`) is a
/// genuine grouping even without a name.
fn paren_inner_is_indirect(decl: &Declarator) -> bool {
    match decl {
        Declarator::Paren { inner, .. } => matches!(inner.as_ref(), Declarator::Ptr { .. }),
        _ => false,
    }
}
