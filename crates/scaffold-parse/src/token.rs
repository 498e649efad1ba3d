use scaffold_ast::span::Span;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Keyword {
    Null,
    False,
    True,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokKind {
    // trivia / error
    Whitespace,
    Error,
    // literals
    Number,
    Str,
    Char,
    // idents / keywords
    Ident,
    Keyword(Keyword),
    // punctuation, one kind per symbol
    Bang,
    Hash,
    Dollar,
    Percent,
    Amp,
    LParen,
    RParen,
    Star,
    Plus,
    Comma,
    Minus,
    Dot,
    Slash,
    Colon,
    Semicolon,
    Lt,
    Eq,
    Gt,
    Question,
    At,
    LBracket,
    Backslash,
    RBracket,
    Caret,
    Backtick,
    LBrace,
    Pipe,
    RBrace,
    Tilde,
}

impl TokKind {
    pub fn punct(c: char) -> Option<TokKind> {
        let kind = match c {
            '!' => TokKind::Bang,
            '#' => TokKind::Hash,
            '$' => TokKind::Dollar,
            '%' => TokKind::Percent,
            '&' => TokKind::Amp,
            '(' => TokKind::LParen,
            ')' => TokKind::RParen,
            '*' => TokKind::Star,
            '+' => TokKind::Plus,
            ',' => TokKind::Comma,
            '-' => TokKind::Minus,
            '.' => TokKind::Dot,
            '/' => TokKind::Slash,
            ':' => TokKind::Colon,
            ';' => TokKind::Semicolon,
            '<' => TokKind::Lt,
            '=' => TokKind::Eq,
            '>' => TokKind::Gt,
            '?' => TokKind::Question,
            '@' => TokKind::At,
            '[' => TokKind::LBracket,
            '\\' => TokKind::Backslash,
            ']' => TokKind::RBracket,
            '^' => TokKind::Caret,
            '`' => TokKind::Backtick,
            '{' => TokKind::LBrace,
            '|' => TokKind::Pipe,
            '}' => TokKind::RBrace,
            '~' => TokKind::Tilde,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokKind,
    pub span: Span,
    /// Type suffix on a numeric literal (`l`, `f`, `d`, `m`, ...).
    pub modifier: Option<char>,
    /// Numeric literal carried a `u` suffix.
    pub unsigned: bool,
    pub message: Option<String>,
}

impl Token {
    pub fn new(kind: TokKind, span: Span) -> Self {
        Self {
            kind,
            span,
            modifier: None,
            unsigned: false,
            message: None,
        }
    }

    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(TokKind::Error, span)
        }
    }

    /// Grow the token over the next `n` bytes of input.
    pub fn extend(&mut self, n: u32) {
        self.span.len += n;
    }

    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        let start = self.span.offset as usize;
        &src[start..start + self.span.len as usize]
    }

    pub fn is_trivia(&self) -> bool {
        self.kind == TokKind::Whitespace
    }
}
