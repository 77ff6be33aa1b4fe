// lits-parser - Token types for Lits
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Tokens and source positions produced by the tokenizer.

use std::fmt;
use std::rc::Rc;

/// Where a token (or AST node) came from in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// A concrete location: 1-indexed line and column plus the full text of that line.
    At {
        line: usize,
        column: usize,
        source_line: Rc<str>,
    },
    /// The parser ran out of tokens.
    EndOfFile,
}

impl Position {
    /// Compute the position of byte `offset` in `source`.
    ///
    /// This is a pure function of the input: line and column are recounted
    /// from the start of the text on every call.
    pub fn at_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = source[line_start..offset].chars().count() + 1;
        let line_end = source[line_start..]
            .find('\n')
            .map_or(source.len(), |i| line_start + i);
        Position::At {
            line,
            column,
            source_line: Rc::from(&source[line_start..line_end]),
        }
    }

    /// The line number, if this is a concrete position.
    pub fn line(&self) -> Option<usize> {
        match self {
            Position::At { line, .. } => Some(*line),
            Position::EndOfFile => None,
        }
    }

    /// The column number, if this is a concrete position.
    pub fn column(&self) -> Option<usize> {
        match self {
            Position::At { column, .. } => Some(*column),
            Position::EndOfFile => None,
        }
    }

    /// Render the offending source line with a caret under the column.
    pub fn code_marker(&self) -> Option<String> {
        match self {
            Position::At {
                column,
                source_line,
                ..
            } => Some(format!(
                "{}\n{}^",
                source_line,
                " ".repeat(column.saturating_sub(1))
            )),
            Position::EndOfFile => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::At { line, column, .. } => write!(f, "{}:{}", line, column),
            Position::EndOfFile => write!(f, "end of file"),
        }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// One of `(`, `)`, `[`, `]`, `{`, `}`.
    Bracket(char),
    Number,
    String,
    Name,
    ReservedName,
    /// `&`, `&let`, `&when` or `&while`.
    Modifier,
    /// `#'pattern'flags`; the flags live in [`Token::options`].
    RegexpShorthand,
    /// `#(`
    FnShorthand,
    /// `.` or `#` directly after a name; removed by the sugar pass.
    CollectionAccessor,
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Literal text. For strings this is the unescaped value, for regexp
    /// shorthands it is the pattern source.
    pub text: String,
    /// Regexp flags for [`TokenKind::RegexpShorthand`].
    pub options: Option<String>,
    /// `None` when position tracking is disabled.
    pub position: Option<Position>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Option<Position>) -> Self {
        Token {
            kind,
            text: text.into(),
            options: None,
            position,
        }
    }

    /// True if this is the given bracket character.
    pub fn is_bracket(&self, c: char) -> bool {
        self.kind == TokenKind::Bracket(c)
    }

    /// True if this is an opening bracket of any kind.
    pub fn is_open_bracket(&self) -> bool {
        matches!(self.kind, TokenKind::Bracket('(' | '[' | '{'))
    }

    /// True if this is a name token with the given text.
    pub fn is_name(&self, name: &str) -> bool {
        self.kind == TokenKind::Name && self.text == name
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "\"{}\"", self.text),
            TokenKind::RegexpShorthand => write!(
                f,
                "#'{}'{}",
                self.text,
                self.options.as_deref().unwrap_or("")
            ),
            _ => write!(f, "{}", self.text),
        }
    }
}
