//! Recursive-descent parser for C++ declaration signatures.
//!
//! One parser instance per input string. Backtracking is explicit position
//! save/restore over the token buffer (`mark`/`reset`); failures are
//! `DefinitionError` values, which callers may catch to try the next
//! alternative.

mod expr;

use crate::attrs::{Attribute, AttributeList, GnuAttribute};
use crate::cpp::ast::*;
use crate::error::DefinitionError;
use crate::syntax::{Token, TokenKind, tokenize};

pub(crate) type Result<T> = std::result::Result<T, DefinitionError>;

pub use crate::options::ParseOptions;

/// How eagerly a declarator name is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameMode {
    No,
    Maybe,
    Yes,
}

/// The syntactic slot a type is being parsed in; drives which alternatives
/// apply and which fallback terminators are in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outer {
    Type,
    Member,
    Function,
    FunctionParam,
    TemplateParam,
    OperatorCast,
    /// The type of a `new` expression: no parameter list, no name.
    New,
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    options: ParseOptions,
    /// Nonzero while parsing inside a template argument list at bracket
    /// depth zero: a bare `>` closes the list instead of comparing.
    pub(crate) in_template_arg: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Mark {
    pos: usize,
    in_template_arg: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, options: ParseOptions) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
            options,
            in_template_arg: false,
        }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    // ---- cursor primitives -------------------------------------------------

    pub(crate) fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            in_template_arg: self.in_template_arg,
        }
    }

    pub(crate) fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.in_template_arg = mark.in_template_arg;
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    pub(crate) fn peek_text(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(|t| t.text)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    /// Contextual keywords (`final`, `override`, `auto` placeholders) are
    /// plain identifiers matched by text.
    pub(crate) fn at_text(&self, text: &str) -> bool {
        self.at(TokenKind::Ident) && self.peek_text() == Some(text)
    }

    pub(crate) fn bump(&mut self) -> Token<'a> {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_text(&mut self, text: &str) -> bool {
        if self.at_text(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token<'a>> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    /// Two consecutive tokens with no whitespace between them.
    pub(crate) fn adjacent(&self, offset: usize) -> bool {
        match (
            self.tokens.get(self.pos + offset),
            self.tokens.get(self.pos + offset + 1),
        ) {
            (Some(a), Some(b)) => a.end() == b.start,
            _ => false,
        }
    }

    pub(crate) fn current_offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source.len(), |t| t.start)
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> DefinitionError {
        DefinitionError::syntax(message, self.current_offset())
    }

    pub(crate) fn source(&self) -> &'a str {
        self.source
    }

    pub(crate) fn token_at(&self, index: usize) -> Option<&Token<'a>> {
        self.tokens.get(index)
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Of two failed alternatives, report the one that progressed further.
    pub(crate) fn pick_error(a: DefinitionError, b: DefinitionError) -> DefinitionError {
        if b.offset > a.offset { b } else { a }
    }

    fn assert_end(&mut self) -> Result<()> {
        if self.is_eof() {
            Ok(())
        } else {
            Err(self.error("expected end of declaration"))
        }
    }

    // ---- attributes --------------------------------------------------------

    pub(crate) fn parse_attribute(&mut self) -> Result<Option<Attribute>> {
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
            let end = self.bump(); // ]]
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

    /// Verbatim capture of a balanced `( ... )` group, parentheses included.
    pub(crate) fn capture_balanced_parens(&mut self) -> Result<String> {
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

    pub(crate) fn parse_attribute_list(&mut self) -> Result<AttributeList> {
        let mut attrs = Vec::new();
        while let Some(attr) = self.parse_attribute()? {
            attrs.push(attr);
        }
        Ok(AttributeList { attrs })
    }

    // ---- names -------------------------------------------------------------

    fn parse_identifier(&mut self) -> Result<Identifier> {
        // Destructor names are a `~` immediately followed by an identifier.
        if self.at(TokenKind::Tilde)
            && self.peek_nth(1) == Some(TokenKind::Ident)
            && self.adjacent(0)
        {
            self.bump();
            let ident = self.bump();
            return Ok(Identifier::new(format!("~{}", ident.text)));
        }
        let token = self.expect(TokenKind::Ident, "identifier")?;
        Ok(Identifier::new(token.text))
    }

    /// `member_pointer` stops the qualification walk before a trailing
    /// `::*`, leaving it for the member-pointer declarator.
    pub(crate) fn parse_nested_name(&mut self, member_pointer: bool) -> Result<NestedName> {
        let rooted = self.eat(TokenKind::DoubleColon);
        let mut names = Vec::new();
        let mut templates = Vec::new();
        loop {
            let template = self.eat(TokenKind::KwTemplate);
            let ident_or_op = if self.at(TokenKind::KwOperator) {
                IdentOrOp::Op(self.parse_operator()?)
            } else {
                IdentOrOp::Ident(self.parse_identifier()?)
            };
            let template_args = if self.at(TokenKind::Less) {
                self.try_parse_template_args()
            } else {
                None
            };
            names.push(NestedNameElement::new(ident_or_op, template_args));
            templates.push(template);

            if !self.at(TokenKind::DoubleColon) {
                break;
            }
            if member_pointer && self.peek_nth(1) == Some(TokenKind::Star) {
                break;
            }
            self.bump();
        }
        Ok(NestedName::new(names, templates, rooted))
    }

    fn parse_operator(&mut self) -> Result<Operator> {
        self.expect(TokenKind::KwOperator, "'operator'")?;

        // new/delete, with optional [].
        for (kind, name) in [(TokenKind::KwNew, "new"), (TokenKind::KwDelete, "delete")] {
            if self.at(kind) {
                self.bump();
                if self.at(TokenKind::LBracket) && self.peek_nth(1) == Some(TokenKind::RBracket) {
                    self.bump();
                    self.bump();
                    return Ok(Operator::BuildIn(format!("{name}[]")));
                }
                return Ok(Operator::BuildIn(name.to_string()));
            }
        }

        // Literal operator: operator"" _suffix
        if self.at(TokenKind::StringLit) && self.peek_text() == Some("\"\"") {
            self.bump();
            let ident = self.expect(TokenKind::Ident, "literal operator suffix")?;
            return Ok(Operator::Literal(Identifier::new(ident.text)));
        }

        if let Some(op) = self.match_symbolic_operator() {
            return Ok(Operator::BuildIn(op));
        }

        // Conversion operator: a type with abstract declarator, no params.
        let ty = self.parse_type(NameMode::No, Some(Outer::OperatorCast))?;
        Ok(Operator::Cast(Box::new(ty)))
    }

    /// Longest-match over the overloadable symbolic operators, merging
    /// adjacent `>` tokens where needed.
    fn match_symbolic_operator(&mut self) -> Option<String> {
        use TokenKind::*;
        let (text, consumed): (&str, usize) = match self.peek()? {
            LParen if self.peek_nth(1) == Some(RParen) => ("()", 2),
            LBracket if self.peek_nth(1) == Some(RBracket) => ("[]", 2),
            Greater if self.peek_nth(1) == Some(Greater)
                && self.adjacent(0)
                && self.peek_nth(2) == Some(Equal)
                && self.adjacent(1) =>
            {
                (">>=", 3)
            },
            Greater if self.peek_nth(1) == Some(Greater) && self.adjacent(0) => (">>", 2),
            Greater if self.peek_nth(1) == Some(Equal) && self.adjacent(0) => (">=", 2),
            LessEqual if self.peek_nth(1) == Some(Greater) && self.adjacent(0) => ("<=>", 2),
            Greater => (">", 1),
            Less => ("<", 1),
            LessEqual => ("<=", 1),
            LeftShift => ("<<", 1),
            LeftShiftEqual => ("<<=", 1),
            PlusPlus => ("++", 1),
            MinusMinus => ("--", 1),
            PlusEqual => ("+=", 1),
            MinusEqual => ("-=", 1),
            StarEqual => ("*=", 1),
            SlashEqual => ("/=", 1),
            PercentEqual => ("%=", 1),
            AmpEqual => ("&=", 1),
            PipeEqual => ("|=", 1),
            CaretEqual => ("^=", 1),
            EqualEqual => ("==", 1),
            NotEqual => ("!=", 1),
            AndAnd => ("&&", 1),
            OrOr => ("||", 1),
            Plus => ("+", 1),
            Minus => ("-", 1),
            Star => ("*", 1),
            Slash => ("/", 1),
            Percent => ("%", 1),
            Caret => ("^", 1),
            Amp => ("&", 1),
            Pipe => ("|", 1),
            Tilde => ("~", 1),
            Exclaim => ("!", 1),
            Equal => ("=", 1),
            Comma => (",", 1),
            ArrowStar => ("->*", 1),
            Arrow => ("->", 1),
            _ => return None,
        };
        for _ in 0..consumed {
            self.bump();
        }
        Some(text.to_string())
    }

    /// Attempt a `<...>` template argument list; restores the cursor and
    /// returns `None` if the brackets do not parse as one.
    pub(crate) fn try_parse_template_args(&mut self) -> Option<TemplateArgs> {
        let saved = self.mark();
        match self.parse_template_args() {
            Ok(args) => Some(args),
            Err(_) => {
                self.reset(saved);
                None
            },
        }
    }

    fn parse_template_args(&mut self) -> Result<TemplateArgs> {
        self.expect(TokenKind::Less, "'<'")?;
        let was_in_template = self.in_template_arg;
        self.in_template_arg = true;
        let result = self.parse_template_args_inner();
        self.in_template_arg = was_in_template;
        result
    }

    fn parse_template_args_inner(&mut self) -> Result<TemplateArgs> {
        let mut args = Vec::new();
        let mut pack_expansion = false;
        if self.eat(TokenKind::Greater) {
            return Ok(TemplateArgs {
                args,
                pack_expansion,
            });
        }
        loop {
            // Types and constant expressions are ambiguous; try the type
            // reading first and only keep it if it ends the argument.
            let saved = self.mark();
            let mut parsed = None;
            if let Ok(ty) = self.parse_type(NameMode::No, None)
                && matches!(
                    self.peek(),
                    Some(TokenKind::Comma) | Some(TokenKind::Greater) | Some(TokenKind::Ellipsis)
                )
            {
                parsed = Some(TemplateArg::Type(ty));
            }
            let arg = match parsed {
                Some(arg) => arg,
                None => {
                    self.reset(saved);
                    let expr = self.parse_expr_with_fallback(
                        &[TokenKind::Comma, TokenKind::Greater],
                        Self::parse_assignment_expression,
                    )?;
                    TemplateArg::Constant(expr)
                },
            };
            args.push(arg);

            if self.eat(TokenKind::Ellipsis) {
                pack_expansion = true;
                self.expect(TokenKind::Greater, "'>' after pack expansion")?;
                break;
            }
            if self.eat(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::Greater, "'>' closing template arguments")?;
            break;
        }
        Ok(TemplateArgs {
            args,
            pack_expansion,
        })
    }

    // ---- decl specs and trailing type specifiers ---------------------------

    fn parse_decl_specs_simple(&mut self, _outer: Option<Outer>) -> Result<DeclSpecsSimple> {
        let mut specs = DeclSpecsSimple::default();
        loop {
            if let Some(attr) = self.parse_attribute()? {
                specs.attrs.attrs.push(attr);
                continue;
            }
            let storage = match self.peek() {
                Some(TokenKind::KwStatic) => Some(StorageClass::Static),
                Some(TokenKind::KwExtern) => Some(StorageClass::Extern),
                Some(TokenKind::KwMutable) => Some(StorageClass::Mutable),
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
                Some(TokenKind::KwThreadLocal) if !specs.thread_local => {
                    specs.thread_local = true;
                    self.bump();
                },
                Some(TokenKind::KwInline) if !specs.inline => {
                    specs.inline = true;
                    self.bump();
                },
                Some(TokenKind::KwVirtual) if !specs.virtual_ => {
                    specs.virtual_ = true;
                    self.bump();
                },
                Some(TokenKind::KwExplicit) if specs.explicit_spec.is_none() => {
                    self.bump();
                    let expr = if self.at(TokenKind::LParen) {
                        self.bump();
                        let was = self.in_template_arg;
                        self.in_template_arg = false;
                        let expr = self.parse_constant_expression()?;
                        self.in_template_arg = was;
                        self.expect(TokenKind::RParen, "')' closing explicit(...)")?;
                        Some(expr)
                    } else {
                        None
                    };
                    specs.explicit_spec = Some(ExplicitSpec { expr });
                },
                Some(TokenKind::KwConsteval) if !specs.consteval => {
                    specs.consteval = true;
                    self.bump();
                },
                Some(TokenKind::KwConstexpr) if !specs.constexpr_ => {
                    specs.constexpr_ = true;
                    self.bump();
                },
                Some(TokenKind::KwConstinit) if !specs.constinit => {
                    specs.constinit = true;
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
                Some(TokenKind::KwFriend) if !specs.friend => {
                    specs.friend = true;
                    self.bump();
                },
                _ => break,
            }
        }
        Ok(specs)
    }

    fn parse_trailing_type_spec(&mut self) -> Result<TrailingTypeSpec> {
        if self.at(TokenKind::KwDecltype) {
            self.bump();
            self.expect(TokenKind::LParen, "'(' after decltype")?;
            if self.eat(TokenKind::KwAuto) {
                self.expect(TokenKind::RParen, "')' closing decltype(auto)")?;
                return Ok(TrailingTypeSpec::DecltypeAuto);
            }
            let was = self.in_template_arg;
            self.in_template_arg = false;
            let expr = self.parse_expression()?;
            self.in_template_arg = was;
            self.expect(TokenKind::RParen, "')' closing decltype")?;
            return Ok(TrailingTypeSpec::Decltype(expr));
        }

        // Fundamental types may span several keywords.
        if self.peek().is_some_and(TokenKind::is_simple_type_specifier) || self.at(TokenKind::KwAuto)
        {
            let mut names = Vec::new();
            while let Some(kind) = self.peek() {
                if kind.is_simple_type_specifier() || kind == TokenKind::KwAuto {
                    names.push(self.bump().text.to_string());
                } else {
                    break;
                }
            }
            return Ok(TrailingTypeSpec::Fundamental(names));
        }

        let prefix = match self.peek() {
            Some(TokenKind::KwTypename) => Some(TypePrefix::Typename),
            Some(TokenKind::KwClass) => Some(TypePrefix::Class),
            Some(TokenKind::KwStruct) => Some(TypePrefix::Struct),
            Some(TokenKind::KwUnion) => Some(TypePrefix::Union),
            Some(TokenKind::KwEnum) => Some(TypePrefix::Enum),
            _ => None,
        };
        if prefix.is_some() {
            self.bump();
        }
        let name = self.parse_nested_name(false)?;
        let placeholder = if self.eat(TokenKind::KwAuto) {
            Some("auto".to_string())
        } else if self.at(TokenKind::KwDecltype)
            && self.peek_nth(1) == Some(TokenKind::LParen)
            && self.peek_nth(2) == Some(TokenKind::KwAuto)
        {
            self.bump();
            self.bump();
            self.bump();
            self.expect(TokenKind::RParen, "')' closing decltype(auto)")?;
            Some("decltype(auto)".to_string())
        } else {
            None
        };
        Ok(TrailingTypeSpec::Name {
            prefix,
            name,
            placeholder,
        })
    }

    fn parse_decl_specs(&mut self, outer: Option<Outer>, typed: bool) -> Result<DeclSpecs> {
        let left = self.parse_decl_specs_simple(outer)?;
        let (trailing, right) = if typed {
            let trailing = self.parse_trailing_type_spec()?;
            let right = self.parse_decl_specs_simple(outer)?;
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

    // ---- declarators -------------------------------------------------------

    fn parse_array_ops(&mut self) -> Result<Vec<ArrayOp>> {
        let mut ops = Vec::new();
        while self.at(TokenKind::LBracket) {
            self.bump();
            if self.eat(TokenKind::RBracket) {
                ops.push(ArrayOp { size: None });
                continue;
            }
            let was = self.in_template_arg;
            self.in_template_arg = false;
            let size = self.parse_expr_with_fallback(
                &[TokenKind::RBracket],
                Self::parse_expression,
            )?;
            self.in_template_arg = was;
            self.expect(TokenKind::RBracket, "']' closing array bound")?;
            ops.push(ArrayOp { size: Some(size) });
        }
        Ok(ops)
    }

    fn parse_parameters_and_qualifiers(&mut self, outer: Option<Outer>) -> Result<ParametersQualifiers> {
        self.expect(TokenKind::LParen, "'(' starting parameter list")?;
        let was = self.in_template_arg;
        self.in_template_arg = false;
        let result = self.parse_parameters_and_qualifiers_inner(outer);
        self.in_template_arg = was;
        result
    }

    fn parse_parameters_and_qualifiers_inner(
        &mut self,
        outer: Option<Outer>,
    ) -> Result<ParametersQualifiers> {
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
                let arg = self.parse_type_with_init(NameMode::Maybe, Some(Outer::FunctionParam))?;
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

        let mut const_ = false;
        let mut volatile_ = false;
        loop {
            if !const_ && self.eat(TokenKind::KwConst) {
                const_ = true;
            } else if !volatile_ && self.eat(TokenKind::KwVolatile) {
                volatile_ = true;
            } else {
                break;
            }
        }
        let ref_qual = if self.eat(TokenKind::AndAnd) {
            Some(RefQualifier::RValue)
        } else if self.eat(TokenKind::Amp) {
            Some(RefQualifier::LValue)
        } else {
            None
        };
        let exception_spec = if self.eat(TokenKind::KwNoexcept) {
            let expr = if self.at(TokenKind::LParen) {
                self.bump();
                let expr = self.parse_constant_expression()?;
                self.expect(TokenKind::RParen, "')' closing noexcept")?;
                Some(expr)
            } else {
                None
            };
            Some(NoexceptSpec { expr })
        } else {
            None
        };
        let mut final_ = false;
        let mut override_ = false;
        loop {
            if !final_ && self.eat_text("final") {
                final_ = true;
            } else if !override_ && self.eat_text("override") {
                override_ = true;
            } else {
                break;
            }
        }
        let attrs = self.parse_attribute_list()?;
        let trailing_return = if outer != Some(Outer::OperatorCast) && self.eat(TokenKind::Arrow) {
            Some(Box::new(self.parse_type(NameMode::No, None)?))
        } else {
            None
        };
        let initializer = if self.at(TokenKind::Equal) {
            let saved = self.mark();
            self.bump();
            if self.eat(TokenKind::KwDefault) {
                Some(FunctionSpecifier::Default)
            } else if self.eat(TokenKind::KwDelete) {
                Some(FunctionSpecifier::Delete)
            } else if self.at(TokenKind::Number) && self.peek_text() == Some("0") {
                self.bump();
                Some(FunctionSpecifier::PureVirtual)
            } else {
                self.reset(saved);
                None
            }
        } else {
            None
        };

        Ok(ParametersQualifiers {
            args,
            volatile_,
            const_,
            ref_qual,
            exception_spec,
            trailing_return,
            override_,
            final_,
            attrs,
            initializer,
        })
    }

    fn parse_declarator_name_suffix(
        &mut self,
        named: NameMode,
        outer: Option<Outer>,
    ) -> Result<Declarator> {
        let name = match named {
            NameMode::No => None,
            NameMode::Maybe => {
                let saved = self.mark();
                match self.parse_nested_name(false) {
                    Ok(name) => Some(name),
                    Err(_) => {
                        self.reset(saved);
                        None
                    },
                }
            },
            NameMode::Yes => Some(self.parse_nested_name(false)?),
        };

        let array_ops = self.parse_array_ops()?;

        // Bit-field width, only meaningful for members.
        if outer == Some(Outer::Member) && array_ops.is_empty() && self.at(TokenKind::Colon) {
            self.bump();
            let size = self.parse_expr_with_fallback(&[], Self::parse_constant_expression)?;
            return Ok(Declarator::NameBitField { name, size });
        }

        // A conversion operator's type never takes the parameter list (the
        // parens after `operator int` belong to the enclosing function
        // declarator), and `new int(5)`'s parens are its initializer.
        let no_params = matches!(outer, Some(Outer::OperatorCast) | Some(Outer::New));
        let param_qual = if !no_params && self.at(TokenKind::LParen) {
            Some(self.parse_parameters_and_qualifiers(outer)?)
        } else {
            None
        };
        Ok(Declarator::NameParamQual {
            name,
            array_ops,
            param_qual,
        })
    }

    fn parse_declarator(&mut self, named: NameMode, outer: Option<Outer>) -> Result<Declarator> {
        if self.at(TokenKind::Star) {
            self.bump();
            let attrs = self.parse_attribute_list()?;
            let mut volatile_ = false;
            let mut const_ = false;
            loop {
                if !volatile_ && self.eat(TokenKind::KwVolatile) {
                    volatile_ = true;
                } else if !const_ && self.eat(TokenKind::KwConst) {
                    const_ = true;
                } else {
                    break;
                }
            }
            let next = self.parse_declarator(named, outer)?;
            return Ok(Declarator::Ptr {
                next: Box::new(next),
                volatile_,
                const_,
                attrs,
            });
        }
        if self.at(TokenKind::Amp) || self.at(TokenKind::AndAnd) {
            let rvalue = self.bump().kind == TokenKind::AndAnd;
            let attrs = self.parse_attribute_list()?;
            let next = self.parse_declarator(named, outer)?;
            return Ok(Declarator::Ref {
                next: Box::new(next),
                rvalue,
                attrs,
            });
        }
        if self.at(TokenKind::Ellipsis) {
            // Pack declarator: `Args... args` / `Ts ...`
            let saved = self.mark();
            self.bump();
            match self.parse_declarator_name_suffix(named, outer) {
                Ok(next) => {
                    return Ok(Declarator::ParamPack {
                        next: Box::new(next),
                    });
                },
                Err(_) => self.reset(saved),
            }
        }

        // Member pointer: `Class::* decl`
        if self.at(TokenKind::Ident) || self.at(TokenKind::DoubleColon) {
            let saved = self.mark();
            if let Ok(class_name) = self.parse_nested_name(true)
                && self.at(TokenKind::DoubleColon)
                && self.peek_nth(1) == Some(TokenKind::Star)
            {
                self.bump();
                self.bump();
                let mut const_ = false;
                let mut volatile_ = false;
                loop {
                    if !const_ && self.eat(TokenKind::KwConst) {
                        const_ = true;
                    } else if !volatile_ && self.eat(TokenKind::KwVolatile) {
                        volatile_ = true;
                    } else {
                        break;
                    }
                }
                let next = self.parse_declarator(named, outer)?;
                return Ok(Declarator::MemPtr {
                    class_name,
                    const_,
                    volatile_,
                    next: Box::new(next),
                });
            }
            self.reset(saved);
        }

        // Parenthesized grouping: `(*fp)(int)`. Conversion-operator and
        // `new` type-ids take no grouping (their parens belong to the
        // enclosing construct), and the parens of an unnamed function
        // declarator are its parameter list, not a group.
        let no_grouping = matches!(outer, Some(Outer::OperatorCast) | Some(Outer::New));
        if !no_grouping && self.at(TokenKind::LParen) {
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

    // ---- types -------------------------------------------------------------

    pub(crate) fn parse_type(&mut self, named: NameMode, outer: Option<Outer>) -> Result<Type> {
        match outer {
            Some(Outer::Function) | Some(Outer::Member) => {
                let saved = self.mark();
                // Typed reading first.
                let typed_attempt = (|| -> Result<Type> {
                    let decl_specs = self.parse_decl_specs(outer, true)?;
                    let decl = self.parse_declarator(named, outer)?;
                    Ok(Type { decl_specs, decl })
                })();
                match typed_attempt {
                    Ok(ty) if self.type_is_acceptable(&ty, outer) => Ok(ty),
                    result => {
                        let typed_err = match result {
                            Err(e) => e,
                            Ok(_) => self.error("declarator does not fit this object type"),
                        };
                        self.reset(saved);
                        // Untyped reading: constructors, destructors,
                        // conversion operators have no return type.
                        let untyped_attempt = (|| -> Result<Type> {
                            let decl_specs = self.parse_decl_specs(outer, false)?;
                            let decl = self.parse_declarator(named, Some(Outer::Function))?;
                            Ok(Type { decl_specs, decl })
                        })();
                        match untyped_attempt {
                            Ok(ty) if ty.decl.is_function() => Ok(ty),
                            Ok(_) => {
                                self.reset(saved);
                                Err(typed_err)
                            },
                            Err(untyped_err) => {
                                self.reset(saved);
                                Err(Self::pick_error(untyped_err, typed_err))
                            },
                        }
                    },
                }
            },
            _ => {
                let decl_specs = self.parse_decl_specs(outer, true)?;
                let decl = self.parse_declarator(named, outer)?;
                Ok(Type { decl_specs, decl })
            },
        }
    }

    fn type_is_acceptable(&self, ty: &Type, outer: Option<Outer>) -> bool {
        match outer {
            // A function declaration must end in a parameter list.
            Some(Outer::Function) => ty.decl.is_function(),
            _ => true,
        }
    }

    fn parse_initializer(&mut self, outer: Option<Outer>) -> Result<Option<Initializer>> {
        let terminators: &[TokenKind] = match outer {
            Some(Outer::FunctionParam) => &[TokenKind::Comma, TokenKind::RParen],
            Some(Outer::TemplateParam) => &[TokenKind::Comma, TokenKind::Greater],
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
        if outer == Some(Outer::Member) && self.at(TokenKind::LBrace) {
            let value = self.parse_braced_init_list()?;
            return Ok(Some(Initializer {
                value,
                has_assign: false,
            }));
        }
        Ok(None)
    }

    pub(crate) fn parse_type_with_init(
        &mut self,
        named: NameMode,
        outer: Option<Outer>,
    ) -> Result<TypeWithInit> {
        let ty = self.parse_type(named, outer)?;
        let init = self.parse_initializer(outer)?;
        Ok(TypeWithInit { ty, init })
    }

    // ---- templates ---------------------------------------------------------

    fn parse_template_parameter(&mut self) -> Result<TemplateParam> {
        if self.at(TokenKind::KwTemplate) {
            self.bump();
            self.expect(TokenKind::Less, "'<' after 'template'")?;
            let nested_params = self.parse_template_parameter_list()?;
            let key = if self.eat(TokenKind::KwTypename) {
                TemplateKey::Typename
            } else if self.eat(TokenKind::KwClass) {
                TemplateKey::Class
            } else {
                return Err(self.error("expected 'typename' or 'class' after template template parameter list"));
            };
            let parameter_pack = self.eat(TokenKind::Ellipsis);
            let identifier = if self.at(TokenKind::Ident) {
                Some(Identifier::new(self.bump().text))
            } else {
                None
            };
            let default = if self.eat(TokenKind::Equal) {
                Some(self.parse_type(NameMode::No, None)?)
            } else {
                None
            };
            return Ok(TemplateParam::TemplateType {
                nested_params: Box::new(nested_params),
                data: TemplateKeyParamPackIdDefault {
                    key,
                    identifier,
                    parameter_pack,
                    default,
                },
            });
        }

        if self.at(TokenKind::KwTypename) || self.at(TokenKind::KwClass) {
            let saved = self.mark();
            let key = if self.bump().kind == TokenKind::KwTypename {
                TemplateKey::Typename
            } else {
                TemplateKey::Class
            };
            let parameter_pack = self.eat(TokenKind::Ellipsis);
            let identifier = if self.at(TokenKind::Ident) {
                Some(Identifier::new(self.bump().text))
            } else {
                None
            };
            let default = if self.eat(TokenKind::Equal) {
                Some(self.parse_type(NameMode::No, None)?)
            } else {
                None
            };
            // `typename T::type N` is really a typed non-type parameter;
            // only keep the key reading when the parameter ends here.
            if matches!(self.peek(), Some(TokenKind::Comma) | Some(TokenKind::Greater)) || self.is_eof()
            {
                return Ok(TemplateParam::Type(TemplateKeyParamPackIdDefault {
                    key,
                    identifier,
                    parameter_pack,
                    default,
                }));
            }
            self.reset(saved);
        }

        // Non-type (or constrained type) parameter.
        let ty = self.parse_type(NameMode::Maybe, Some(Outer::TemplateParam))?;
        let parameter_pack = declarator_has_pack(&ty.decl);
        if self.eat(TokenKind::Equal) {
            let saved = self.mark();
            let expr_attempt = self.parse_expr_with_fallback(
                &[TokenKind::Comma, TokenKind::Greater],
                Self::parse_assignment_expression,
            );
            match expr_attempt {
                Ok(value) => {
                    return Ok(TemplateParam::NonType {
                        param: TypeWithInit {
                            ty,
                            init: Some(Initializer {
                                value,
                                has_assign: true,
                            }),
                        },
                        parameter_pack,
                    });
                },
                Err(expr_err) => {
                    self.reset(saved);
                    match self.parse_type(NameMode::No, None) {
                        Ok(default) => {
                            return Ok(TemplateParam::ConstrainedType(ConstrainedTypeWithInit {
                                ty,
                                init: Some(default),
                            }));
                        },
                        Err(type_err) => return Err(Self::pick_error(expr_err, type_err)),
                    }
                },
            }
        }
        Ok(TemplateParam::NonType {
            param: TypeWithInit { ty, init: None },
            parameter_pack,
        })
    }

    /// Parses parameters up to and including the closing `>`.
    fn parse_template_parameter_list(&mut self) -> Result<TemplateParams> {
        let mut params = Vec::new();
        if self.eat(TokenKind::Greater) {
            return Ok(TemplateParams {
                params,
                requires_clause: None,
            });
        }
        loop {
            params.push(self.parse_template_parameter()?);
            if self.eat(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::Greater, "'>' closing template parameter list")?;
            break;
        }
        Ok(TemplateParams {
            params,
            requires_clause: None,
        })
    }

    fn parse_template_introduction(&mut self) -> Option<TemplateIntroduction> {
        let saved = self.mark();
        let attempt = (|| -> Result<TemplateIntroduction> {
            let concept = self.parse_nested_name(false)?;
            self.expect(TokenKind::LBrace, "'{' starting template introduction")?;
            let mut params = Vec::new();
            loop {
                let parameter_pack = self.eat(TokenKind::Ellipsis);
                let ident = self.expect(TokenKind::Ident, "introduction parameter")?;
                params.push(TemplateIntroductionParameter {
                    identifier: Identifier::new(ident.text),
                    parameter_pack,
                });
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                self.expect(TokenKind::RBrace, "'}' closing template introduction")?;
                break;
            }
            Ok(TemplateIntroduction { concept, params })
        })();
        match attempt {
            Ok(intro) => Some(intro),
            Err(_) => {
                self.reset(saved);
                None
            },
        }
    }

    pub(crate) fn parse_requires_clause(&mut self) -> Result<Option<RequiresClause>> {
        if !self.eat(TokenKind::KwRequires) {
            return Ok(None);
        }
        let expr = self.parse_logical_or_expression()?;
        Ok(Some(RequiresClause { expr }))
    }

    fn parse_template_declaration_prefix(&mut self) -> Result<Option<TemplateDeclarationPrefix>> {
        let mut templates = Vec::new();
        loop {
            if self.at(TokenKind::KwTemplate) && self.peek_nth(1) == Some(TokenKind::Less) {
                self.bump();
                self.bump();
                let mut params = self.parse_template_parameter_list()?;
                params.requires_clause = self.parse_requires_clause()?;
                templates.push(TemplatePrefixItem::Params(params));
                continue;
            }
            // Terse syntax: `Concept{T}` in template-prefix position.
            if self.at(TokenKind::Ident) || self.at(TokenKind::DoubleColon) {
                if let Some(intro) = self.parse_template_introduction() {
                    templates.push(TemplatePrefixItem::Introduction(intro));
                    continue;
                }
            }
            break;
        }
        if templates.is_empty() {
            Ok(None)
        } else {
            Ok(Some(TemplateDeclarationPrefix { templates }))
        }
    }

    // ---- declarations ------------------------------------------------------

    fn parse_class(&mut self) -> Result<Class> {
        let attrs = self.parse_attribute_list()?;
        let name = self.parse_nested_name(false)?;
        let final_ = self.eat_text("final");
        let mut bases = Vec::new();
        if self.eat(TokenKind::Colon) {
            loop {
                let mut visibility = None;
                let mut virtual_ = false;
                loop {
                    match self.peek() {
                        Some(TokenKind::KwPublic) if visibility.is_none() => {
                            visibility = Some(Visibility::Public);
                            self.bump();
                        },
                        Some(TokenKind::KwProtected) if visibility.is_none() => {
                            visibility = Some(Visibility::Protected);
                            self.bump();
                        },
                        Some(TokenKind::KwPrivate) if visibility.is_none() => {
                            visibility = Some(Visibility::Private);
                            self.bump();
                        },
                        Some(TokenKind::KwVirtual) if !virtual_ => {
                            virtual_ = true;
                            self.bump();
                        },
                        _ => break,
                    }
                }
                let base_name = self.parse_nested_name(false)?;
                let pack = self.eat(TokenKind::Ellipsis);
                bases.push(BaseClass {
                    name: base_name,
                    visibility,
                    virtual_,
                    pack,
                });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(Class {
            name,
            final_,
            bases,
            attrs,
        })
    }

    fn parse_union(&mut self) -> Result<Union> {
        let attrs = self.parse_attribute_list()?;
        let name = self.parse_nested_name(false)?;
        Ok(Union { name, attrs })
    }

    fn parse_enum(&mut self) -> Result<Enum> {
        let scoped = if self.eat(TokenKind::KwClass) {
            Some(EnumKey::Class)
        } else if self.eat(TokenKind::KwStruct) {
            Some(EnumKey::Struct)
        } else {
            None
        };
        let attrs = self.parse_attribute_list()?;
        let name = self.parse_nested_name(false)?;
        let underlying_type = if self.eat(TokenKind::Colon) {
            Some(self.parse_type(NameMode::No, None)?)
        } else {
            None
        };
        Ok(Enum {
            name,
            scoped,
            underlying_type,
            attrs,
        })
    }

    fn parse_enumerator(&mut self) -> Result<Enumerator> {
        let name = self.parse_nested_name(false)?;
        let attrs = self.parse_attribute_list()?;
        let init = if self.eat(TokenKind::Equal) {
            let value =
                self.parse_expr_with_fallback(&[], Self::parse_constant_expression)?;
            Some(Initializer {
                value,
                has_assign: true,
            })
        } else {
            None
        };
        Ok(Enumerator { name, init, attrs })
    }

    fn parse_concept(&mut self) -> Result<Concept> {
        let name = self.parse_nested_name(false)?;
        let initializer = if self.eat(TokenKind::Equal) {
            let value = self.parse_expr_with_fallback(&[], Self::parse_constant_expression)?;
            Some(Initializer {
                value,
                has_assign: true,
            })
        } else {
            None
        };
        Ok(Concept { name, initializer })
    }

    fn parse_type_alias(&mut self) -> Result<DeclarationBody> {
        // `using`-style alias: Name [= type]. Only taken when it spans the
        // whole declaration.
        let saved = self.mark();
        let using_attempt = (|| -> Result<TypeUsing> {
            let name = self.parse_nested_name(false)?;
            let ty = if self.eat(TokenKind::Equal) {
                Some(self.parse_type(NameMode::No, Some(Outer::Type))?)
            } else {
                None
            };
            Ok(TypeUsing { name, ty })
        })();
        if let Ok(using) = using_attempt
            && (self.is_eof() || self.at(TokenKind::Semicolon))
        {
            return Ok(DeclarationBody::TypeUsing(using));
        }
        self.reset(saved);
        let ty = self.parse_type(NameMode::Yes, Some(Outer::Type))?;
        Ok(DeclarationBody::Type(ty))
    }

    /// Entry point: parse exactly one declaration of the given object type.
    pub fn parse_declaration(
        &mut self,
        object_type: ObjectType,
        directive_type: Option<&str>,
    ) -> Result<Declaration> {
        let visibility = match self.peek() {
            Some(TokenKind::KwPublic) => Some(Visibility::Public),
            Some(TokenKind::KwProtected) => Some(Visibility::Protected),
            Some(TokenKind::KwPrivate) => Some(Visibility::Private),
            _ => None,
        };
        if visibility.is_some() {
            self.bump();
        }

        let template_prefix = match object_type {
            ObjectType::Enum | ObjectType::Enumerator | ObjectType::Namespace => None,
            _ => self.parse_template_declaration_prefix()?,
        };

        let body = match object_type {
            ObjectType::Class => {
                // The directive may repeat the class-key.
                if !self.eat(TokenKind::KwClass) {
                    self.eat(TokenKind::KwStruct);
                }
                DeclarationBody::Class(self.parse_class()?)
            },
            ObjectType::Union => {
                self.eat(TokenKind::KwUnion);
                DeclarationBody::Union(self.parse_union()?)
            },
            ObjectType::Enum => {
                self.eat(TokenKind::KwEnum);
                DeclarationBody::Enum(self.parse_enum()?)
            },
            ObjectType::Enumerator => DeclarationBody::Enumerator(self.parse_enumerator()?),
            ObjectType::Concept => {
                self.eat(TokenKind::KwConcept);
                DeclarationBody::Concept(self.parse_concept()?)
            },
            ObjectType::Namespace => {
                self.eat(TokenKind::KwNamespace);
                DeclarationBody::Namespace(self.parse_nested_name(false)?)
            },
            ObjectType::Function => {
                DeclarationBody::Type(self.parse_type(NameMode::Yes, Some(Outer::Function))?)
            },
            ObjectType::Member => DeclarationBody::Member(
                self.parse_type_with_init(NameMode::Yes, Some(Outer::Member))?,
            ),
            ObjectType::Type => self.parse_type_alias()?,
        };

        let trailing_requires = match object_type {
            ObjectType::Function if template_prefix.is_some() => self.parse_requires_clause()?,
            _ => None,
        };

        let semicolon = self.eat(TokenKind::Semicolon);
        self.assert_end()?;

        Ok(Declaration {
            object_type,
            directive_type: directive_type.map(str::to_string),
            visibility,
            template_prefix,
            body,
            trailing_requires,
            semicolon,
        })
    }

    /// Parse a cross-reference target: a possibly-qualified name with
    /// optional template arguments per component.
    pub fn parse_xref_name(&mut self) -> Result<NestedName> {
        let name = self.parse_nested_name(false)?;
        self.assert_end()?;
        Ok(name)
    }
}

/// A paren group whose inner declarator starts with an indirection
/// (`(*fp)`, `(&r)`, `(C::*m)`) is a genuine grouping even without a name.
fn paren_inner_is_indirect(decl: &Declarator) -> bool {
    match decl {
        Declarator::Paren { inner, .. } => matches!(
            inner.as_ref(),
            Declarator::Ptr { .. } | Declarator::Ref { .. } | Declarator::MemPtr { .. }
        ),
        _ => false,
    }
}

fn declarator_has_pack(decl: &Declarator) -> bool {
    match decl {
        Declarator::ParamPack { .. } => true,
        Declarator::Ptr { next, .. }
        | Declarator::Ref { next, .. }
        | Declarator::MemPtr { next, .. } => declarator_has_pack(next),
        Declarator::Paren { inner, next } => {
            declarator_has_pack(inner) || declarator_has_pack(next)
        },
        Declarator::NameParamQual { .. } | Declarator::NameBitField { .. } => false,
    }
}
