//! Literal grammar validation shared by the C and C++ parsers.
//!
//! The lexer only produces coarse `Number`/`CharLit`/`StringLit` tokens; the
//! validators here check the precise grammar (digit separators, suffix
//! combinations, escape sequences) and classify numbers as integer or float.
//! Only character literals have their value computed; other literals are kept
//! as raw text.

use once_cell::sync::Lazy;
use regex::Regex;

static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9][0-9]*('[0-9]+)*").unwrap());
static OCTAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0[0-7]*('[0-7]+)*").unwrap());
static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[xX][0-9a-fA-F]+('[0-9a-fA-F]+)*").unwrap());
static BINARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0[bB][01]+('[01]+)*").unwrap());

// Unsigned and/or (long) long, in any order, but at least one of them. The
// trailing word boundary distinguishes suffixes from UDL suffixes.
static INTEGER_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(([uU](l|L|ll|LL)?)|((l|L|ll|LL)[uU]?))\b").unwrap());

static FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(",
        // decimal
        r"([0-9]+('[0-9]+)*[eE][+-]?[0-9]+('[0-9]+)*)",
        r"|(([0-9]+('[0-9]+)*)?\.[0-9]+('[0-9]+)*([eE][+-]?[0-9]+('[0-9]+)*)?)",
        r"|([0-9]+('[0-9]+)*\.([eE][+-]?[0-9]+('[0-9]+)*)?)",
        // hex
        r"|(0[xX][0-9a-fA-F]+('[0-9a-fA-F]+)*[pP][+-]?[0-9a-fA-F]+('[0-9a-fA-F]+)*)",
        r"|(0[xX]([0-9a-fA-F]+('[0-9a-fA-F]+)*)?\.",
        r"[0-9a-fA-F]+('[0-9a-fA-F]+)*([pP][+-]?[0-9a-fA-F]+('[0-9a-fA-F]+)*)?)",
        r"|(0[xX][0-9a-fA-F]+('[0-9a-fA-F]+)*\.([pP][+-]?[0-9a-fA-F]+('[0-9a-fA-F]+)*)?)",
        r")",
    ))
    .unwrap()
});
static FLOAT_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[fFlL]\b").unwrap());

static UDL_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^_[a-zA-Z0-9_]*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Integer,
    Float,
}

/// A classified number literal: the validated literal text and an optional
/// user-defined-literal suffix remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedNumber<'a> {
    pub kind: NumberKind,
    pub literal: &'a str,
    pub udl_suffix: Option<&'a str>,
}

/// Validate a `Number` token against the literal grammar. Returns `None` if
/// the text is not a well-formed integer or float literal (with optional UDL
/// suffix).
pub fn classify_number(text: &str) -> Option<ClassifiedNumber<'_>> {
    // Floats first: "1.5" begins with a valid integer literal prefix.
    if let Some(m) = FLOAT_RE.find(text) {
        let mut end = m.end();
        if let Some(s) = FLOAT_SUFFIX_RE.find(&text[end..]) {
            end += s.end();
        }
        if let Some(lit) = finish_number(text, end, NumberKind::Float) {
            return Some(lit);
        }
    }
    for re in [&*BINARY_RE, &*HEX_RE, &*INTEGER_RE, &*OCTAL_RE] {
        let Some(m) = re.find(text) else { continue };
        let mut end = m.end();
        if let Some(s) = INTEGER_SUFFIX_RE.find(&text[end..]) {
            end += s.end();
        }
        if let Some(lit) = finish_number(text, end, NumberKind::Integer) {
            return Some(lit);
        }
    }
    None
}

fn finish_number(text: &str, end: usize, kind: NumberKind) -> Option<ClassifiedNumber<'_>> {
    let rest = &text[end..];
    if rest.is_empty() {
        return Some(ClassifiedNumber {
            kind,
            literal: text,
            udl_suffix: None,
        });
    }
    if UDL_SUFFIX_RE.is_match(rest) {
        return Some(ClassifiedNumber {
            kind,
            literal: &text[..end],
            udl_suffix: Some(rest),
        });
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharLiteralError {
    /// Multi-character literals ('ab') are recognized but not supported.
    MultiCharacter,
    Malformed,
}

/// A validated character literal with its computed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCharLiteral {
    pub prefix: Option<String>,
    /// Literal text between the quotes, escapes unexpanded.
    pub data: String,
    /// Code-point value, needed when the literal feeds constant contexts.
    pub value: u64,
}

/// Validate a `CharLit` token (full text, quotes and prefix included) and
/// compute its value.
pub fn decode_char_literal(text: &str) -> Result<DecodedCharLiteral, CharLiteralError> {
    let (prefix, rest) = ["u8", "u", "U", "L"]
        .iter()
        .find_map(|p| {
            text.strip_prefix(p)
                .filter(|r| r.starts_with('\''))
                .map(|r| (Some(p.to_string()), r))
        })
        .unwrap_or((None, text));

    let body = rest
        .strip_prefix('\'')
        .and_then(|r| r.strip_suffix('\''))
        .ok_or(CharLiteralError::Malformed)?;
    if body.is_empty() {
        return Err(CharLiteralError::Malformed);
    }

    let mut chars = body.chars();
    let value = if body.starts_with('\\') {
        decode_escape(&mut chars)?
    } else {
        let c = chars.next().ok_or(CharLiteralError::Malformed)?;
        c as u64
    };
    if chars.next().is_some() {
        return Err(CharLiteralError::MultiCharacter);
    }

    Ok(DecodedCharLiteral {
        prefix,
        data: body.to_string(),
        value,
    })
}

fn decode_escape(chars: &mut std::str::Chars<'_>) -> Result<u64, CharLiteralError> {
    let backslash = chars.next();
    debug_assert_eq!(backslash, Some('\\'));
    let c = chars.next().ok_or(CharLiteralError::Malformed)?;
    let value = match c {
        '\'' => '\'' as u64,
        '"' => '"' as u64,
        '?' => '?' as u64,
        '\\' => '\\' as u64,
        'a' => 0x07,
        'b' => 0x08,
        'f' => 0x0c,
        'n' => 0x0a,
        'r' => 0x0d,
        't' => 0x09,
        'v' => 0x0b,
        'x' => hex_digits(chars, 2, 2)?,
        'u' => hex_digits(chars, 4, 4)?,
        'U' => hex_digits(chars, 8, 8)?,
        '0'..='7' => {
            let mut v = c.to_digit(8).unwrap() as u64;
            // Up to two more octal digits.
            for _ in 0..2 {
                let mut peek = chars.clone();
                match peek.next().and_then(|d| d.to_digit(8)) {
                    Some(d) => {
                        chars.next();
                        v = v * 8 + d as u64;
                    },
                    None => break,
                }
            }
            v
        },
        _ => return Err(CharLiteralError::Malformed),
    };
    Ok(value)
}

fn hex_digits(
    chars: &mut std::str::Chars<'_>,
    min: usize,
    max: usize,
) -> Result<u64, CharLiteralError> {
    let mut v = 0u64;
    let mut count = 0;
    while count < max {
        let mut peek = chars.clone();
        match peek.next().and_then(|d| d.to_digit(16)) {
            Some(d) => {
                chars.next();
                v = v * 16 + d as u64;
                count += 1;
            },
            None => break,
        }
    }
    if count < min {
        return Err(CharLiteralError::Malformed);
    }
    Ok(v)
}

/// Split a `StringLit` token into encoding prefix and quoted data. The body
/// is kept as raw text.
pub fn split_string_literal(text: &str) -> (Option<&str>, &str) {
    for p in ["u8", "u", "U", "L"] {
        if let Some(rest) = text.strip_prefix(p)
            && rest.starts_with('"')
        {
            return (Some(p), rest);
        }
    }
    (None, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_plain_integer() {
        let n = classify_number("42").unwrap();
        assert_eq!(n.kind, NumberKind::Integer);
        assert_eq!(n.literal, "42");
        assert!(n.udl_suffix.is_none());
    }

    #[test]
    fn classify_separated_integer_with_suffix() {
        let n = classify_number("1'000'000ull").unwrap();
        assert_eq!(n.kind, NumberKind::Integer);
        assert_eq!(n.literal, "1'000'000ull");
    }

    #[test]
    fn classify_hex_and_binary() {
        assert_eq!(classify_number("0xFF'FF").unwrap().kind, NumberKind::Integer);
        assert_eq!(classify_number("0b1010").unwrap().kind, NumberKind::Integer);
    }

    #[test]
    fn classify_floats() {
        for text in ["1.5", ".5", "1.", "1e10", "1.5e-3f", "0x1.8p3"] {
            let n = classify_number(text).unwrap_or_else(|| panic!("{text} should classify"));
            assert_eq!(n.kind, NumberKind::Float, "{text}");
        }
    }

    #[test]
    fn classify_udl() {
        let n = classify_number("12_km").unwrap();
        assert_eq!(n.literal, "12");
        assert_eq!(n.udl_suffix, Some("_km"));
    }

    #[test]
    fn reject_bad_suffix() {
        assert!(classify_number("12xyz").is_none());
    }

    #[test]
    fn char_values() {
        assert_eq!(decode_char_literal("'A'").unwrap().value, 65);
        assert_eq!(decode_char_literal(r"'\n'").unwrap().value, 0x0a);
        assert_eq!(decode_char_literal(r"'\x41'").unwrap().value, 0x41);
        assert_eq!(decode_char_literal(r"'\101'").unwrap().value, 0o101);
        assert_eq!(decode_char_literal(r"'A'").unwrap().value, 0x41);
        assert_eq!(decode_char_literal("u8'a'").unwrap().prefix.as_deref(), Some("u8"));
    }

    #[test]
    fn multi_character_char_literal_is_distinguished() {
        assert_eq!(
            decode_char_literal("'ab'"),
            Err(CharLiteralError::MultiCharacter)
        );
    }
}
