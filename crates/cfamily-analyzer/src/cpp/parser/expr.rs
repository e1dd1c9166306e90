//! Expression parsing: the full C++ operator-precedence ladder, with an
//! opt-in fallback that captures unparseable balanced spans verbatim.

use super::{NameMode, Outer, Parser, Result};
use crate::cpp::ast::*;
use crate::error::DefinitionError;
use crate::syntax::TokenKind;
use crate::syntax::literals::{self, CharLiteralError};

/// Binary operators by precedence level, loosest first. Alternative keyword
/// spellings are matched as identifiers.
const BIN_OPS: &[&[&str]] = &[
    &["||", "or"],
    &["&&", "and"],
    &["|", "bitor"],
    &["^", "xor"],
    &["&", "bitand"],
    &["==", "!=", "not_eq"],
    &["<=", ">=", "<", ">"],
    &["<<", ">>"],
    &["+", "-"],
    &["*", "/", "%"],
    &[".*", "->*"],
];

const ASSIGN_OPS: &[&str] = &[
    "=", "*=", "/=", "%=", "+=", "-=", ">>=", "<<=", "&=", "^=", "|=", "and_eq", "xor_eq",
    "or_eq",
];

const UNARY_OPS: &[&str] = &["++", "--", "*", "&", "+", "-", "!", "not", "~", "compl"];

impl<'a> Parser<'a> {
    /// The symbolic operator starting at the cursor, if any, with the token
    /// count to consume. Adjacent `>` tokens merge into `>>`/`>=`/`>>=`
    /// unless a template argument list is open.
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
            if self.in_template_arg {
                return None;
            }
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
            DotStar => ".*",
            ArrowStar => "->*",
            Equal => "=",
            StarEqual => "*=",
            SlashEqual => "/=",
            PercentEqual => "%=",
            PlusEqual => "+=",
            MinusEqual => "-=",
            AmpEqual => "&=",
            CaretEqual => "^=",
            PipeEqual => "|=",
            Comma => ",",
            Exclaim => "!",
            Tilde => "~",
            PlusPlus => "++",
            MinusMinus => "--",
            Ident => match self.peek_text()? {
                "or" => "or",
                "and" => "and",
                "bitor" => "bitor",
                "xor" => "xor",
                "bitand" => "bitand",
                "not_eq" => "not_eq",
                "not" => "not",
                "compl" => "compl",
                "and_eq" => "and_eq",
                "xor_eq" => "xor_eq",
                "or_eq" => "or_eq",
                _ => return None,
            },
            _ => return None,
        };
        Some((single, 1))
    }

    fn consume_operator(&mut self, tokens: usize) {
        for _ in 0..tokens {
            self.bump();
        }
    }

    // ---- entry points ------------------------------------------------------

    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        let first = self.parse_assignment_expression()?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.eat(TokenKind::Comma) {
            exprs.push(self.parse_assignment_expression()?);
        }
        Ok(Expr::Comma(exprs))
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> Result<Expr> {
        let left = self.parse_conditional_expression()?;
        let Some((op_text, consumed)) = self.peek_operator_text() else {
            return Ok(left);
        };
        if !ASSIGN_OPS.contains(&op_text) {
            return Ok(left);
        }
        self.consume_operator(consumed);
        let right = if self.at(TokenKind::LBrace) {
            self.parse_braced_init_list()?
        } else {
            self.parse_assignment_expression()?
        };
        Ok(Expr::Assignment {
            left: Box::new(left),
            op: op_text.to_string(),
            right: Box::new(right),
        })
    }

    pub(crate) fn parse_constant_expression(&mut self) -> Result<Expr> {
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

    pub(crate) fn parse_logical_or_expression(&mut self) -> Result<Expr> {
        self.parse_binary_level(0)
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
            // Operand failure backtracks past the operator: `(a + ...)`
            // leaves the `+` for the fold-expression reading.
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
            let was = self.in_template_arg;
            self.in_template_arg = false;
            let attempt = (|| -> Result<Expr> {
                let ty = self.parse_type(NameMode::No, None)?;
                self.expect(TokenKind::RParen, "')' closing cast")?;
                self.in_template_arg = was;
                let expr = self.parse_cast_expression()?;
                Ok(Expr::Cast {
                    ty: Box::new(ty),
                    expr: Box::new(expr),
                })
            })();
            match attempt {
                Ok(expr) => return Ok(expr),
                Err(_) => {
                    self.in_template_arg = was;
                    self.reset(saved);
                },
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
            if self.eat(TokenKind::Ellipsis) {
                self.expect(TokenKind::LParen, "'(' after sizeof...")?;
                let ident = self.expect(TokenKind::Ident, "pack name")?;
                let ident = Identifier::new(ident.text);
                self.expect(TokenKind::RParen, "')' closing sizeof...")?;
                return Ok(Expr::SizeofParamPack(ident));
            }
            if self.at(TokenKind::LParen) {
                let saved = self.mark();
                self.bump();
                let was = self.in_template_arg;
                self.in_template_arg = false;
                let attempt = (|| -> Result<Expr> {
                    let ty = self.parse_type(NameMode::No, None)?;
                    self.expect(TokenKind::RParen, "')' closing sizeof")?;
                    Ok(Expr::SizeofType(Box::new(ty)))
                })();
                self.in_template_arg = was;
                match attempt {
                    Ok(expr) => return Ok(expr),
                    Err(_) => self.reset(saved),
                }
            }
            let expr = self.parse_unary_expression()?;
            return Ok(Expr::Sizeof(Box::new(expr)));
        }

        if self.at(TokenKind::KwAlignof) {
            self.bump();
            self.expect(TokenKind::LParen, "'(' after alignof")?;
            let was = self.in_template_arg;
            self.in_template_arg = false;
            let ty = self.parse_type(NameMode::No, None)?;
            self.in_template_arg = was;
            self.expect(TokenKind::RParen, "')' closing alignof")?;
            return Ok(Expr::Alignof(Box::new(ty)));
        }

        if self.at(TokenKind::KwNoexcept) {
            self.bump();
            self.expect(TokenKind::LParen, "'(' after noexcept")?;
            let was = self.in_template_arg;
            self.in_template_arg = false;
            let expr = self.parse_expression()?;
            self.in_template_arg = was;
            self.expect(TokenKind::RParen, "')' closing noexcept")?;
            return Ok(Expr::Noexcept(Box::new(expr)));
        }

        // new/delete, optionally scope-qualified.
        let rooted = self.at(TokenKind::DoubleColon)
            && matches!(
                self.peek_nth(1),
                Some(TokenKind::KwNew) | Some(TokenKind::KwDelete)
            );
        if rooted {
            self.bump();
        }
        if self.at(TokenKind::KwNew) {
            self.bump();
            return self.parse_new_expression(rooted);
        }
        if self.at(TokenKind::KwDelete) {
            self.bump();
            let array = self.at(TokenKind::LBracket)
                && self.peek_nth(1) == Some(TokenKind::RBracket);
            if array {
                self.bump();
                self.bump();
            }
            let expr = self.parse_cast_expression()?;
            return Ok(Expr::Delete {
                rooted,
                array,
                expr: Box::new(expr),
            });
        }

        self.parse_postfix_expression()
    }

    fn parse_new_expression(&mut self, rooted: bool) -> Result<Expr> {
        // Either a parenthesized type-id or a new-type-id without parens.
        let (is_new_type_id, ty) = if self.at(TokenKind::LParen) {
            let saved = self.mark();
            self.bump();
            match self.parse_type(NameMode::No, Some(Outer::New)) {
                Ok(ty) if self.eat(TokenKind::RParen) => (false, ty),
                _ => {
                    self.reset(saved);
                    (true, self.parse_type(NameMode::No, Some(Outer::New))?)
                },
            }
        } else {
            (true, self.parse_type(NameMode::No, Some(Outer::New))?)
        };
        let init = if self.at(TokenKind::LParen) {
            Some(CallArgs::Paren(self.parse_paren_expr_list()?))
        } else if self.at(TokenKind::LBrace) {
            let Expr::BracedInit(list) = self.parse_braced_init_list()? else {
                return Err(self.error("expected braced initializer"));
            };
            Some(CallArgs::Braced(list))
        } else {
            None
        };
        Ok(Expr::New {
            rooted,
            is_new_type_id,
            ty: Box::new(ty),
            init,
        })
    }

    fn parse_postfix_expression(&mut self) -> Result<Expr> {
        let cast_kind = match self.peek() {
            Some(TokenKind::KwDynamicCast) => Some(CastKind::Dynamic),
            Some(TokenKind::KwStaticCast) => Some(CastKind::Static),
            Some(TokenKind::KwReinterpretCast) => Some(CastKind::Reinterpret),
            Some(TokenKind::KwConstCast) => Some(CastKind::Const),
            _ => None,
        };
        if let Some(kind) = cast_kind {
            self.bump();
            self.expect(TokenKind::Less, "'<' after cast keyword")?;
            let was = self.in_template_arg;
            self.in_template_arg = true;
            let ty = self.parse_type(NameMode::No, None)?;
            self.in_template_arg = was;
            self.expect(TokenKind::Greater, "'>' closing cast type")?;
            self.expect(TokenKind::LParen, "'(' in cast expression")?;
            let was = self.in_template_arg;
            self.in_template_arg = false;
            let expr = self.parse_expression()?;
            self.in_template_arg = was;
            self.expect(TokenKind::RParen, "')' closing cast expression")?;
            return Ok(Expr::ExplicitCast {
                kind,
                ty: Box::new(ty),
                expr: Box::new(expr),
            });
        }

        if self.at(TokenKind::KwTypeid) {
            self.bump();
            self.expect(TokenKind::LParen, "'(' after typeid")?;
            let was = self.in_template_arg;
            self.in_template_arg = false;
            let saved = self.mark();
            let operand = match self.parse_type(NameMode::No, None) {
                Ok(ty) if self.at(TokenKind::RParen) => TypeOrExpr::Type(Box::new(ty)),
                _ => {
                    self.reset(saved);
                    TypeOrExpr::Expr(Box::new(self.parse_expression()?))
                },
            };
            self.in_template_arg = was;
            self.expect(TokenKind::RParen, "')' closing typeid")?;
            return Ok(Expr::TypeId(operand));
        }

        let saved = self.mark();
        let base = match self.parse_primary_expression() {
            Ok(expr) => PostfixBase::Expr(Box::new(expr)),
            Err(primary_err) => {
                self.reset(saved);
                // Functional cast from a type: `int(5)`, `T{...}`.
                let type_attempt = self.parse_type(NameMode::No, None);
                match type_attempt {
                    Ok(ty)
                        if self.at(TokenKind::LParen) || self.at(TokenKind::LBrace) =>
                    {
                        PostfixBase::Type(Box::new(ty))
                    },
                    _ => {
                        self.reset(saved);
                        return Err(primary_err);
                    },
                }
            },
        };

        let mut ops = Vec::new();
        loop {
            match self.peek() {
                Some(TokenKind::LParen) => {
                    ops.push(PostfixOp::Call(CallArgs::Paren(
                        self.parse_paren_expr_list()?,
                    )));
                },
                Some(TokenKind::LBrace) => {
                    let Expr::BracedInit(list) = self.parse_braced_init_list()? else {
                        return Err(self.error("expected braced initializer"));
                    };
                    ops.push(PostfixOp::Call(CallArgs::Braced(list)));
                },
                Some(TokenKind::LBracket) => {
                    self.bump();
                    let was = self.in_template_arg;
                    self.in_template_arg = false;
                    let index = self.parse_expression()?;
                    self.in_template_arg = was;
                    self.expect(TokenKind::RBracket, "']' closing subscript")?;
                    ops.push(PostfixOp::Subscript(Box::new(index)));
                },
                Some(TokenKind::Dot) => {
                    self.bump();
                    ops.push(PostfixOp::Member(self.parse_nested_name(false)?));
                },
                Some(TokenKind::Arrow) => {
                    self.bump();
                    ops.push(PostfixOp::MemberOfPointer(self.parse_nested_name(false)?));
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

        // Trailing pack expansion binds the whole postfix chain.
        let expr = if ops.is_empty() {
            match base {
                PostfixBase::Expr(e) => *e,
                PostfixBase::Type(_) => return Err(self.error("expected expression")),
            }
        } else {
            Expr::Postfix { base, ops }
        };
        // In a template argument list the trailing `...` belongs to the
        // argument (pack-expansion flag), not to this expression.
        if self.at(TokenKind::Ellipsis) && !self.in_template_arg {
            self.bump();
            return Ok(Expr::PackExpansion(Box::new(expr)));
        }
        Ok(expr)
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
            Some(TokenKind::KwNullptr) => {
                self.bump();
                Ok(Expr::PointerLiteral)
            },
            Some(TokenKind::KwThis) => {
                self.bump();
                Ok(Expr::This)
            },
            Some(TokenKind::Number) => self.parse_number_literal(),
            Some(TokenKind::CharLit) => self.parse_char_literal(),
            Some(TokenKind::StringLit) => self.parse_string_literal(),
            Some(TokenKind::LParen) => self.parse_fold_or_paren_expression(),
            Some(TokenKind::Ident)
            | Some(TokenKind::DoubleColon)
            | Some(TokenKind::KwOperator)
            | Some(TokenKind::Tilde) => {
                let name = self.parse_nested_name(false)?;
                Ok(Expr::Id(name))
            },
            _ => Err(self.error("expected expression")),
        }
    }

    fn parse_number_literal(&mut self) -> Result<Expr> {
        let token = self.bump();
        let Some(classified) = literals::classify_number(token.text) else {
            return Err(DefinitionError::syntax(
                format!("invalid number literal '{}'", token.text),
                token.start,
            ));
        };
        let literal = Expr::NumberLiteral(classified.literal.to_string());
        match classified.udl_suffix {
            Some(suffix) => Ok(Expr::UserDefinedLiteral {
                literal: Box::new(literal),
                ident: Identifier::new(suffix),
            }),
            None => Ok(literal),
        }
    }

    fn parse_char_literal(&mut self) -> Result<Expr> {
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
        let literal = Expr::CharLiteral(CharLiteral {
            prefix: decoded.prefix,
            data: decoded.data,
            value: decoded.value,
        });
        if self.at(TokenKind::Ident) && self.tokens_adjacent_to_previous() {
            let suffix = self.bump();
            return Ok(Expr::UserDefinedLiteral {
                literal: Box::new(literal),
                ident: Identifier::new(suffix.text),
            });
        }
        Ok(literal)
    }

    fn parse_string_literal(&mut self) -> Result<Expr> {
        let token = self.bump();
        let literal = Expr::StringLiteral(token.text.to_string());
        if self.at(TokenKind::Ident) && self.tokens_adjacent_to_previous() {
            let suffix = self.bump();
            return Ok(Expr::UserDefinedLiteral {
                literal: Box::new(literal),
                ident: Identifier::new(suffix.text),
            });
        }
        Ok(literal)
    }

    /// Whether the current token starts exactly where the previous ended.
    fn tokens_adjacent_to_previous(&self) -> bool {
        let pos = self.position();
        if pos == 0 {
            return false;
        }
        match (self.token_at(pos - 1), self.token_at(pos)) {
            (Some(prev), Some(cur)) => prev.end() == cur.start,
            _ => false,
        }
    }

    fn match_fold_operator(&mut self) -> Option<String> {
        let (text, consumed) = self.peek_operator_text()?;
        let is_fold_op = text == ","
            || ASSIGN_OPS.contains(&text)
            || BIN_OPS.iter().any(|level| level.contains(&text));
        if !is_fold_op {
            return None;
        }
        self.consume_operator(consumed);
        Some(text.to_string())
    }

    fn parse_fold_or_paren_expression(&mut self) -> Result<Expr> {
        self.expect(TokenKind::LParen, "'('")?;
        let was = self.in_template_arg;
        self.in_template_arg = false;
        let result = self.parse_fold_or_paren_inner();
        self.in_template_arg = was;
        result
    }

    fn parse_fold_or_paren_inner(&mut self) -> Result<Expr> {
        // Unary right fold: (... op pack)
        if self.eat(TokenKind::Ellipsis) {
            let op = self
                .match_fold_operator()
                .ok_or_else(|| self.error("expected fold operator after '...'"))?;
            let right = self.parse_cast_expression()?;
            self.expect(TokenKind::RParen, "')' closing fold expression")?;
            return Ok(Expr::Fold {
                left: None,
                op,
                right: Some(Box::new(right)),
            });
        }

        let expr = self.parse_expression()?;
        if self.eat(TokenKind::RParen) {
            return Ok(Expr::Paren(Box::new(expr)));
        }

        let op = self
            .match_fold_operator()
            .ok_or_else(|| self.error("expected ')' or fold operator"))?;
        self.expect(TokenKind::Ellipsis, "'...' in fold expression")?;
        if self.eat(TokenKind::RParen) {
            // Unary left fold: (pack op ...)
            return Ok(Expr::Fold {
                left: Some(Box::new(expr)),
                op,
                right: None,
            });
        }
        // Binary fold: (a op ... op b)
        let second = self
            .match_fold_operator()
            .ok_or_else(|| self.error("expected fold operator after '...'"))?;
        if second != op {
            return Err(self.error("mismatched operators in binary fold expression"));
        }
        let right = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' closing fold expression")?;
        Ok(Expr::Fold {
            left: Some(Box::new(expr)),
            op,
            right: Some(Box::new(right)),
        })
    }

    pub(crate) fn parse_paren_expr_list(&mut self) -> Result<ParenExprList> {
        self.expect(TokenKind::LParen, "'(' starting argument list")?;
        let was = self.in_template_arg;
        self.in_template_arg = false;
        let result = (|| -> Result<ParenExprList> {
            let mut exprs = Vec::new();
            if self.eat(TokenKind::RParen) {
                return Ok(ParenExprList { exprs });
            }
            loop {
                let expr = if self.at(TokenKind::LBrace) {
                    self.parse_braced_init_list()?
                } else {
                    self.parse_assignment_expression()?
                };
                exprs.push(expr);
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                self.expect(TokenKind::RParen, "')' closing argument list")?;
                break;
            }
            Ok(ParenExprList { exprs })
        })();
        self.in_template_arg = was;
        result
    }

    pub(crate) fn parse_braced_init_list(&mut self) -> Result<Expr> {
        self.expect(TokenKind::LBrace, "'{' starting initializer list")?;
        let was = self.in_template_arg;
        self.in_template_arg = false;
        let result = (|| -> Result<Expr> {
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
        })();
        self.in_template_arg = was;
        result
    }

    // ---- fallback ----------------------------------------------------------

    /// Try `f`; when it fails (or stops before a required terminator) and
    /// fallback parsing is enabled, capture the balanced token span up to the
    /// nearest un-nested terminator as an opaque expression.
    pub(crate) fn parse_expr_with_fallback(
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
        if !self.options().allow_fallback_expressions {
            return Err(err);
        }
        self.reset(saved);
        self.capture_fallback(terminators, err)
    }

    fn capture_fallback(
        &mut self,
        terminators: &[TokenKind],
        original: DefinitionError,
    ) -> Result<Expr> {
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
        let text = self.source()[start_offset..end_offset].trim();
        if text.is_empty() {
            return Err(original);
        }
        Ok(Expr::Fallback(text.to_string()))
    }
}
