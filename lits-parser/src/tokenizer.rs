// lits-parser - Tokenizer for Lits
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Tokenizer for Lits source code.
//!
//! Scans left to right. At each offset a fixed, ordered list of
//! sub-tokenizers is tried and the first one that matches consumes its
//! span. A sugar pass then rewrites collection accessors (`a.b`, `a#0`)
//! into explicit call syntax.

use crate::error::{Result, SyntaxError};
use crate::reserved::{is_forbidden_name, is_reserved_name};
use crate::token::{Position, Token, TokenKind};

/// Tokenize `source`. Positions are recorded only when `debug` is true.
pub fn tokenize(source: &str, debug: bool) -> Result<Vec<Token>> {
    let tokens = Tokenizer::new(source, debug).tokenize()?;
    log::trace!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    apply_sugar(tokens)
}

/// What a sub-tokenizer matched: how many bytes it consumed and the token
/// it produced, if any (comments and whitespace produce none).
struct Scan {
    length: usize,
    lexeme: Option<Lexeme>,
}

struct Lexeme {
    kind: TokenKind,
    text: String,
    options: Option<String>,
}

impl Scan {
    fn skip(length: usize) -> Option<Scan> {
        Some(Scan {
            length,
            lexeme: None,
        })
    }

    fn token(length: usize, kind: TokenKind, text: impl Into<String>) -> Option<Scan> {
        Some(Scan {
            length,
            lexeme: Some(Lexeme {
                kind,
                text: text.into(),
                options: None,
            }),
        })
    }
}

/// A sub-tokenizer looks at `source[offset..]` and either declines (`None`),
/// matches (`Some(scan)`), or fails with a message.
type SubTokenizer = fn(&str, usize) -> std::result::Result<Option<Scan>, String>;

const SUB_TOKENIZERS: &[SubTokenizer] = &[
    skip_comment,
    skip_whitespace,
    tokenize_bracket,
    tokenize_string,
    tokenize_symbol_string,
    tokenize_number,
    tokenize_reserved_name,
    tokenize_name,
    tokenize_modifier,
    tokenize_collection_accessor,
    tokenize_regexp_shorthand,
    tokenize_fn_shorthand,
];

struct Tokenizer<'a> {
    source: &'a str,
    debug: bool,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str, debug: bool) -> Self {
        Tokenizer { source, debug }
    }

    fn tokenize(&self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut offset = 0;

        'scan: while offset < self.source.len() {
            for sub_tokenizer in SUB_TOKENIZERS {
                let scan = sub_tokenizer(self.source, offset).map_err(|message| {
                    SyntaxError::new(message, Some(Position::at_offset(self.source, offset)))
                })?;
                if let Some(scan) = scan {
                    if let Some(lexeme) = scan.lexeme {
                        tokens.push(Token {
                            kind: lexeme.kind,
                            text: lexeme.text,
                            options: lexeme.options,
                            position: self.position(offset),
                        });
                    }
                    offset += scan.length;
                    continue 'scan;
                }
            }

            let c = self.source[offset..].chars().next().unwrap_or(' ');
            return Err(SyntaxError::new(
                format!("Unrecognized character '{}'", c),
                Some(Position::at_offset(self.source, offset)),
            ));
        }

        Ok(tokens)
    }

    fn position(&self, offset: usize) -> Option<Position> {
        self.debug
            .then(|| Position::at_offset(self.source, offset))
    }
}

// ============================================================================
// Character classes
// ============================================================================

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn is_bracket(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']' | '{' | '}')
}

/// Characters that always end a token.
fn is_delimiter(c: char) -> bool {
    is_separator(c) || is_bracket(c) || matches!(c, ';' | '"' | '\'')
}

pub(crate) fn is_name_start(c: char) -> bool {
    c.is_alphabetic()
        || matches!(
            c,
            '_' | '-' | '+' | '*' | '/' | '<' | '>' | '=' | '!' | '?' | '$' | '%' | '^' | '|'
                | '~' | '@'
        )
}

pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_alphanumeric()
}

fn char_at(source: &str, offset: usize) -> Option<char> {
    source.get(offset..).and_then(|s| s.chars().next())
}

// ============================================================================
// Sub-tokenizers, in the order they are tried
// ============================================================================

fn skip_comment(source: &str, offset: usize) -> std::result::Result<Option<Scan>, String> {
    let rest = &source[offset..];
    if !rest.starts_with(';') {
        return Ok(None);
    }
    let length = rest.find('\n').unwrap_or(rest.len());
    Ok(Scan::skip(length))
}

fn skip_whitespace(source: &str, offset: usize) -> std::result::Result<Option<Scan>, String> {
    let length: usize = source[offset..]
        .chars()
        .take_while(|c| is_separator(*c))
        .map(char::len_utf8)
        .sum();
    Ok(if length > 0 { Scan::skip(length) } else { None })
}

fn tokenize_bracket(source: &str, offset: usize) -> std::result::Result<Option<Scan>, String> {
    Ok(match char_at(source, offset) {
        Some(c) if is_bracket(c) => Scan::token(1, TokenKind::Bracket(c), c.to_string()),
        _ => None,
    })
}

fn tokenize_string(source: &str, offset: usize) -> std::result::Result<Option<Scan>, String> {
    let quote = match char_at(source, offset) {
        Some(q @ ('"' | '\'')) => q,
        _ => return Ok(None),
    };

    let mut value = String::new();
    let mut chars = source[offset + 1..].char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, escaped)) => value.push(escaped),
                None => break,
            },
            c if c == quote => {
                return Ok(Scan::token(i + 2, TokenKind::String, value));
            }
            c => value.push(c),
        }
    }

    Err("Unterminated string".to_string())
}

/// `:foo` is shorthand for the string `"foo"`.
fn tokenize_symbol_string(
    source: &str,
    offset: usize,
) -> std::result::Result<Option<Scan>, String> {
    let rest = &source[offset..];
    let Some(name) = rest.strip_prefix(':') else {
        return Ok(None);
    };
    let length: usize = name
        .chars()
        .take_while(|c| is_name_char(*c))
        .map(char::len_utf8)
        .sum();
    if length == 0 {
        return Ok(None);
    }
    Ok(Scan::token(
        length + 1,
        TokenKind::String,
        &name[..length],
    ))
}

fn tokenize_number(source: &str, offset: usize) -> std::result::Result<Option<Scan>, String> {
    let rest = &source[offset..];
    let bytes = rest.as_bytes();
    let digit_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut i = usize::from(bytes.first() == Some(&b'-'));
    let body_start = i;

    let radix = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'0'), Some(b'b' | b'B')) => Some(2),
        (Some(b'0'), Some(b'o' | b'O')) => Some(8),
        (Some(b'0'), Some(b'x' | b'X')) => Some(16),
        _ => None,
    };

    if let Some(radix) = radix {
        i += 2;
        let digits_start = i;
        while bytes
            .get(i)
            .is_some_and(|b| char::from(*b).is_digit(radix))
        {
            i += 1;
        }
        if i == digits_start {
            return Ok(None);
        }
    } else {
        while digit_at(i) {
            i += 1;
        }
        if i == body_start {
            return Ok(None);
        }
        if bytes.get(i) == Some(&b'.') && digit_at(i + 1) {
            i += 1;
            while digit_at(i) {
                i += 1;
            }
        }
    }

    // A number must end at a delimiter or at a collection accessor.
    let ends_cleanly = match rest[i..].chars().next() {
        None => true,
        Some(c) if is_delimiter(c) => true,
        Some('#') => digit_at(i + 1),
        Some('.') => char_at(rest, i + 1).is_some_and(is_name_start),
        Some(_) => false,
    };
    if !ends_cleanly {
        return Ok(None);
    }

    Ok(Scan::token(i, TokenKind::Number, &rest[..i]))
}

fn tokenize_reserved_name(
    source: &str,
    offset: usize,
) -> std::result::Result<Option<Scan>, String> {
    let rest = &source[offset..];
    let length: usize = rest
        .chars()
        .take_while(|c| !is_delimiter(*c))
        .map(char::len_utf8)
        .sum();
    let word = &rest[..length];

    if is_forbidden_name(word) {
        return Err(format!("{} is forbidden", word));
    }
    Ok(if is_reserved_name(word) {
        Scan::token(length, TokenKind::ReservedName, word)
    } else {
        None
    })
}

fn tokenize_name(source: &str, offset: usize) -> std::result::Result<Option<Scan>, String> {
    let rest = &source[offset..];
    match rest.chars().next() {
        Some(c) if is_name_start(c) => {}
        _ => return Ok(None),
    }
    let length: usize = rest
        .chars()
        .take_while(|c| is_name_char(*c))
        .map(char::len_utf8)
        .sum();
    Ok(Scan::token(length, TokenKind::Name, &rest[..length]))
}

fn tokenize_modifier(source: &str, offset: usize) -> std::result::Result<Option<Scan>, String> {
    let rest = &source[offset..];
    for modifier in ["&while", "&when", "&let", "&"] {
        if let Some(after) = rest.strip_prefix(modifier)
            && after.chars().next().is_none_or(is_delimiter)
        {
            return Ok(Scan::token(modifier.len(), TokenKind::Modifier, modifier));
        }
    }
    Ok(None)
}

/// `.` or `#` glued to the end of a name: `obj.key`, `arr#2`.
fn tokenize_collection_accessor(
    source: &str,
    offset: usize,
) -> std::result::Result<Option<Scan>, String> {
    let accessor = match char_at(source, offset) {
        Some(c @ ('.' | '#')) => c,
        _ => return Ok(None),
    };
    let follows_name = source[..offset].chars().next_back().is_some_and(is_name_char);
    let next = char_at(source, offset + 1);
    let key_follows = match accessor {
        '.' => next.is_some_and(is_name_start),
        _ => next.is_some_and(|c| c.is_ascii_digit()),
    };
    Ok(if follows_name && key_follows {
        Scan::token(1, TokenKind::CollectionAccessor, accessor.to_string())
    } else {
        None
    })
}

fn tokenize_regexp_shorthand(
    source: &str,
    offset: usize,
) -> std::result::Result<Option<Scan>, String> {
    let rest = &source[offset..];
    if !rest.starts_with("#'") {
        return Ok(None);
    }

    let mut pattern = String::new();
    let mut chars = rest[2..].char_indices();
    let mut end = None;
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, '\'')) => pattern.push('\''),
                Some((_, escaped)) => {
                    pattern.push('\\');
                    pattern.push(escaped);
                }
                None => break,
            },
            '\'' => {
                end = Some(i + 3);
                break;
            }
            c => pattern.push(c),
        }
    }
    let Some(mut length) = end else {
        return Err("Unterminated regexp".to_string());
    };

    let mut flags = String::new();
    while let Some(flag @ ('g' | 'i')) = char_at(rest, length) {
        if flags.contains(flag) {
            return Err(format!("Duplicated regexp option \"{}\"", flag));
        }
        flags.push(flag);
        length += 1;
    }

    Ok(Some(Scan {
        length,
        lexeme: Some(Lexeme {
            kind: TokenKind::RegexpShorthand,
            text: pattern,
            options: Some(flags),
        }),
    }))
}

fn tokenize_fn_shorthand(
    source: &str,
    offset: usize,
) -> std::result::Result<Option<Scan>, String> {
    Ok(if source[offset..].starts_with("#(") {
        Scan::token(2, TokenKind::FnShorthand, "#(")
    } else {
        None
    })
}

// ============================================================================
// Sugar pass
// ============================================================================

/// Rewrite collection accessors into explicit calls:
/// `a.b` becomes `(a "b")` and `a#1` becomes `(a 1)`. Chains nest left to right.
fn apply_sugar(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    // Index in `out` where the operand of a pending accessor chain starts.
    let mut operand_start: Option<usize> = None;
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        match token.kind {
            TokenKind::CollectionAccessor => {
                let start = operand_start.ok_or_else(|| {
                    SyntaxError::new(
                        format!("Collection accessor '{}' must follow a name", token.text),
                        token.position.clone(),
                    )
                })?;
                let key = iter.next().ok_or_else(|| {
                    SyntaxError::new("Missing collection accessor key", token.position.clone())
                })?;
                let key = match (token.text.as_str(), key.kind) {
                    (".", TokenKind::Name) => Token::new(TokenKind::String, key.text, key.position),
                    ("#", TokenKind::Number) if key.text.bytes().all(|b| b.is_ascii_digit()) => key,
                    _ => {
                        return Err(SyntaxError::new(
                            format!("Invalid collection accessor key '{}'", key.text),
                            key.position,
                        ));
                    }
                };
                out.insert(start, Token::new(TokenKind::Bracket('('), "(", token.position.clone()));
                out.push(key);
                out.push(Token::new(TokenKind::Bracket(')'), ")", token.position));
            }
            TokenKind::Name => {
                operand_start = Some(out.len());
                out.push(token);
            }
            _ => {
                operand_start = None;
                out.push(token);
            }
        }
    }

    Ok(out)
}
