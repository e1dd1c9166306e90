use crate::syntax::kind::TokenKind;
use logos::Logos;

/// One lexed token with its byte span into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
}

impl<'a> Token<'a> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// A lexer that wraps `logos::Lexer` to produce spanned tokens.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token_result = self.inner.next()?;
        let text = self.inner.slice();
        let start = self.inner.span().start;

        let kind = match token_result {
            Ok(kind) => kind,
            Err(()) => TokenKind::Error,
        };

        Some(Token { kind, text, start })
    }
}

/// Lex the whole input, dropping whitespace and comments. The surviving
/// tokens keep their byte spans, so adjacency (e.g. `>` `>` forming a shift,
/// a number followed by a UDL suffix) stays detectable.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).filter(|t| !t.kind.is_trivia()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_idents() {
        assert_eq!(
            kinds("const int foo"),
            vec![TokenKind::KwConst, TokenKind::KwInt, TokenKind::Ident]
        );
    }

    #[test]
    fn nested_template_close_is_two_greater_tokens() {
        assert_eq!(
            kinds("Vector<Vector<int>>"),
            vec![
                TokenKind::Ident,
                TokenKind::Less,
                TokenKind::Ident,
                TokenKind::Less,
                TokenKind::KwInt,
                TokenKind::Greater,
                TokenKind::Greater,
            ]
        );
    }

    #[test]
    fn number_with_digit_separators_is_one_token() {
        let tokens = tokenize("1'000'000ull");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text, "1'000'000ull");
    }

    #[test]
    fn char_literal_with_prefix() {
        let tokens = tokenize("u8'a'");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::CharLit);
    }

    #[test]
    fn anonymous_identifier() {
        let tokens = tokenize("@data");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "@data");
    }

    #[test]
    fn spans_detect_adjacency() {
        let tokens = tokenize("a >> b");
        assert_eq!(tokens[1].kind, TokenKind::Greater);
        assert_eq!(tokens[2].kind, TokenKind::Greater);
        assert_eq!(tokens[1].end(), tokens[2].start);
    }
}
