use logos::Logos;

/// Token set shared by the C and C++ declaration parsers.
///
/// `>>` and `>=` are deliberately not lexed as single tokens: a `>` may close
/// a template argument list, so the parsers merge adjacent `Greater` tokens
/// only where shift or comparison semantics apply.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[logos(error = ())]
pub enum TokenKind {
    #[regex(r"[ \t\n\f]+")]
    Whitespace,

    #[regex(r"//.*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    // Identifiers. `@name` is the extension for anonymous entities.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    #[regex(r"@[a-zA-Z0-9_][a-zA-Z0-9_]*")]
    Ident,

    // Preprocessing-number: covers integer and float literals including
    // digit separators, suffixes, and UDL suffixes. Classified precisely by
    // the literal validators.
    #[regex(r"\.?[0-9]([0-9a-zA-Z_'.]|[eEpP][+-])*")]
    Number,

    // Coarse quoted forms; escape and prefix grammar is validated separately.
    #[regex(r#"(u8|u|U|L)?'([^'\\\n]|\\[^\n])*'"#)]
    CharLit,
    #[regex(r#"(u8|u|U|L)?"([^"\\\n]|\\[^\n])*""#)]
    StringLit,

    // Punctuation
    #[token("[[")]
    LDoubleBracket,
    #[token("]]")]
    RDoubleBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("...")]
    Ellipsis,
    #[token("->*")]
    ArrowStar,
    #[token("->")]
    Arrow,
    #[token(".*")]
    DotStar,
    #[token(".")]
    Dot,
    #[token("::")]
    DoubleColon,
    #[token("?")]
    Question,

    // Operators (multi-char first; no Greater compounds, see above)
    #[token("<<=")]
    LeftShiftEqual,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("%=")]
    PercentEqual,
    #[token("&=")]
    AmpEqual,
    #[token("|=")]
    PipeEqual,
    #[token("^=")]
    CaretEqual,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessEqual,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("<<")]
    LeftShift,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("~")]
    Tilde,
    #[token("!")]
    Exclaim,
    #[token("=")]
    Equal,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("#")]
    Hash,

    // Keywords (C and C++; contextual keywords like `final` and `override`
    // stay identifiers and are matched by text)
    #[token("alignas")]
    KwAlignas,
    #[token("alignof")]
    KwAlignof,
    #[token("auto")]
    KwAuto,
    #[token("bool")]
    KwBool,
    #[token("char")]
    KwChar,
    #[token("char8_t")]
    KwChar8,
    #[token("char16_t")]
    KwChar16,
    #[token("char32_t")]
    KwChar32,
    #[token("class")]
    KwClass,
    #[token("const")]
    KwConst,
    #[token("consteval")]
    KwConsteval,
    #[token("constexpr")]
    KwConstexpr,
    #[token("constinit")]
    KwConstinit,
    #[token("concept")]
    KwConcept,
    #[token("decltype")]
    KwDecltype,
    #[token("default")]
    KwDefault,
    #[token("delete")]
    KwDelete,
    #[token("double")]
    KwDouble,
    #[token("enum")]
    KwEnum,
    #[token("explicit")]
    KwExplicit,
    #[token("extern")]
    KwExtern,
    #[token("false")]
    KwFalse,
    #[token("float")]
    KwFloat,
    #[token("friend")]
    KwFriend,
    #[token("inline")]
    KwInline,
    #[token("int")]
    KwInt,
    #[token("long")]
    KwLong,
    #[token("mutable")]
    KwMutable,
    #[token("namespace")]
    KwNamespace,
    #[token("new")]
    KwNew,
    #[token("noexcept")]
    KwNoexcept,
    #[token("nullptr")]
    KwNullptr,
    #[token("operator")]
    KwOperator,
    #[token("private")]
    KwPrivate,
    #[token("protected")]
    KwProtected,
    #[token("public")]
    KwPublic,
    #[token("register")]
    KwRegister,
    #[token("requires")]
    KwRequires,
    #[token("restrict")]
    KwRestrict,
    #[token("short")]
    KwShort,
    #[token("signed")]
    KwSigned,
    #[token("sizeof")]
    KwSizeof,
    #[token("static")]
    KwStatic,
    #[token("struct")]
    KwStruct,
    #[token("template")]
    KwTemplate,
    #[token("this")]
    KwThis,
    #[token("thread_local")]
    KwThreadLocal,
    #[token("true")]
    KwTrue,
    #[token("typedef")]
    KwTypedef,
    #[token("typeid")]
    KwTypeid,
    #[token("typename")]
    KwTypename,
    #[token("union")]
    KwUnion,
    #[token("unsigned")]
    KwUnsigned,
    #[token("using")]
    KwUsing,
    #[token("virtual")]
    KwVirtual,
    #[token("void")]
    KwVoid,
    #[token("volatile")]
    KwVolatile,
    #[token("wchar_t")]
    KwWchar,

    // Cast keywords
    #[token("const_cast")]
    KwConstCast,
    #[token("dynamic_cast")]
    KwDynamicCast,
    #[token("reinterpret_cast")]
    KwReinterpretCast,
    #[token("static_cast")]
    KwStaticCast,

    // C-only keywords
    #[token("_Alignas")]
    KwCAlignas,
    #[token("_Alignof")]
    KwCAlignof,
    #[token("_Atomic")]
    KwAtomic,
    #[token("_Bool")]
    KwCBool,
    #[token("_Complex")]
    KwComplex,
    #[token("_Decimal32")]
    KwDecimal32,
    #[token("_Decimal64")]
    KwDecimal64,
    #[token("_Decimal128")]
    KwDecimal128,
    #[token("_Imaginary")]
    KwImaginary,
    #[token("_Noreturn")]
    KwNoreturn,
    #[token("_Thread_local")]
    KwCThreadLocal,

    // GNU attribute extension
    #[token("__attribute__")]
    KwGnuAttribute,

    Error,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    /// Keywords that can start or continue a multi-token fundamental type
    /// ("unsigned long long int", "_Decimal64", ...).
    pub fn is_simple_type_specifier(self) -> bool {
        matches!(
            self,
            Self::KwVoid
                | Self::KwBool
                | Self::KwCBool
                | Self::KwChar
                | Self::KwChar8
                | Self::KwChar16
                | Self::KwChar32
                | Self::KwWchar
                | Self::KwInt
                | Self::KwShort
                | Self::KwLong
                | Self::KwSigned
                | Self::KwUnsigned
                | Self::KwFloat
                | Self::KwDouble
                | Self::KwComplex
                | Self::KwImaginary
                | Self::KwDecimal32
                | Self::KwDecimal64
                | Self::KwDecimal128
        )
    }
}
