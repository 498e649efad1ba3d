use crate::token::{Keyword, TokKind, Token};
use scaffold_ast::span::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unexpected character at {}:{}", span.line, span.offset)]
    UnexpectedCharacter { span: Span },
    #[error("Unterminated string at {}:{}", span.line, span.offset)]
    UnterminatedString { span: Span },
    #[error("Unterminated char literal at {}:{}", span.line, span.offset)]
    UnterminatedChar { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedChar { span } => *span,
        }
    }
}

/// Lazily tokenize `src`. The iterator stops after the first `LexError`.
pub fn tokenize(src: &str) -> Lexer<'_> {
    Lexer::new(src)
}

/// Tokenize `src`, dropping whitespace and turning `Error` tokens into `LexError`s.
pub fn tokenize_filtered(src: &str) -> Result<Vec<Token>, LexError> {
    let mut toks = Vec::new();
    for tok in tokenize(src) {
        let tok = tok?;
        match tok.kind {
            _ if tok.is_trivia() => {}
            TokKind::Error => return Err(LexError::UnexpectedCharacter { span: tok.span }),
            _ => toks.push(tok),
        }
    }
    Ok(toks)
}

pub struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            done: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    /// Start a zero-length token at the current position.
    fn start(&self, kind: TokKind) -> Token {
        Token::new(
            kind,
            Span {
                line: self.line,
                offset: self.pos as u32,
                len: 0,
            },
        )
    }

    /// Consume `n` bytes into `tok`.
    fn take(&mut self, tok: &mut Token, n: usize) {
        self.pos += n;
        tok.extend(n as u32);
    }

    fn whitespace(&mut self) -> Token {
        let mut tok = self.start(TokKind::Whitespace);
        let line = self.line;
        while let Some(c) = self.peek().filter(u8::is_ascii_whitespace) {
            if c == b'\n' {
                self.line += 1;
            }
            self.take(&mut tok, 1);
        }
        // a whitespace run keeps the line it started on
        tok.span.line = line;
        tok
    }

    fn number(&mut self) -> Token {
        let mut tok = self.start(TokKind::Number);
        let mut dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.take(&mut tok, 1);
            } else if c == b'.' && !dot && self.peek2().is_some_and(|d| d.is_ascii_digit()) {
                dot = true;
                self.take(&mut tok, 1);
            } else {
                break;
            }
        }
        if matches!(self.peek(), Some(b'u' | b'U')) {
            tok.unsigned = true;
            self.take(&mut tok, 1);
        }
        if let Some(m @ (b'l' | b'L' | b'f' | b'F' | b'd' | b'D' | b'm' | b'M')) = self.peek() {
            tok.modifier = Some(m as char);
            self.take(&mut tok, 1);
        }
        tok
    }

    fn ident(&mut self) -> Token {
        let mut tok = self.start(TokKind::Ident);
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.take(&mut tok, 1);
        }
        tok.kind = match tok.text(self.src) {
            "null" => TokKind::Keyword(Keyword::Null),
            "false" => TokKind::Keyword(Keyword::False),
            "true" => TokKind::Keyword(Keyword::True),
            _ => TokKind::Ident,
        };
        tok
    }

    fn string(&mut self) -> Result<Token, LexError> {
        let mut tok = self.start(TokKind::Str);
        self.take(&mut tok, 1); // opening quote
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(LexError::UnterminatedString { span: tok.span });
                }
                Some(b'"') => {
                    self.take(&mut tok, 1);
                    return Ok(tok);
                }
                Some(b'\\') if !matches!(self.peek2(), None | Some(b'\n')) => {
                    let width = 1 + self.char_width(self.pos + 1);
                    self.take(&mut tok, width);
                }
                Some(_) => {
                    let width = self.char_width(self.pos);
                    self.take(&mut tok, width);
                }
            }
        }
    }

    fn char_lit(&mut self) -> Result<Token, LexError> {
        let mut tok = self.start(TokKind::Char);
        self.take(&mut tok, 1); // opening quote
        match self.peek() {
            None | Some(b'\n' | b'\'') => {
                return Err(LexError::UnterminatedChar { span: tok.span });
            }
            Some(b'\\') => {
                if matches!(self.peek2(), None | Some(b'\n')) {
                    self.take(&mut tok, 1);
                    return Err(LexError::UnterminatedChar { span: tok.span });
                }
                let width = 1 + self.char_width(self.pos + 1);
                self.take(&mut tok, width);
            }
            Some(_) => {
                let width = self.char_width(self.pos);
                self.take(&mut tok, width);
            }
        }
        if self.peek() != Some(b'\'') {
            return Err(LexError::UnterminatedChar { span: tok.span });
        }
        self.take(&mut tok, 1);
        Ok(tok)
    }

    fn char_width(&self, at: usize) -> usize {
        self.src[at..].chars().next().map_or(1, char::len_utf8)
    }

    pub fn next_tok(&mut self) -> Option<Result<Token, LexError>> {
        if self.done {
            return None;
        }
        let Some(b) = self.peek() else {
            self.done = true;
            return None;
        };

        let result = match b {
            c if c.is_ascii_whitespace() => Ok(self.whitespace()),
            c if c.is_ascii_digit() => Ok(self.number()),
            c if c.is_ascii_alphabetic() || c == b'_' => Ok(self.ident()),
            b'"' => self.string(),
            b'\'' => self.char_lit(),
            c => {
                let width = self.char_width(self.pos);
                let mut tok = match TokKind::punct(c as char) {
                    Some(kind) => self.start(kind),
                    None => Token::error(self.start(TokKind::Error).span, "Unexpected character"),
                };
                self.take(&mut tok, width);
                Ok(tok)
            }
        };
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_tok()
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Value of a quoted string or char literal, quotes stripped and escapes resolved.
pub fn unescape(raw: &str) -> String {
    let inner = raw
        .get(1..raw.len().saturating_sub(1))
        .unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(c @ ('"' | '\'' | '\\')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokKind> {
        tokenize(src).map(|t| t.unwrap().kind).collect()
    }

    #[test]
    fn whitespace_run_is_one_token() {
        let toks: Vec<_> = tokenize(" \t \n  ").collect::<Result<_, _>>().unwrap();
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokKind::Whitespace);
        assert_eq!(toks[0].span.len, 6);
    }

    #[test]
    fn multi_char_operators_stay_split() {
        assert_eq!(
            kinds("a:=b**2"),
            vec![
                TokKind::Ident,
                TokKind::Colon,
                TokKind::Eq,
                TokKind::Ident,
                TokKind::Star,
                TokKind::Star,
                TokKind::Number,
            ]
        );
    }

    #[test]
    fn number_with_suffixes() {
        let tok = tokenize("42ul").next().unwrap().unwrap();
        assert_eq!(tok.kind, TokKind::Number);
        assert!(tok.unsigned);
        assert_eq!(tok.modifier, Some('l'));
        assert_eq!(tok.span.len, 4);
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        assert_eq!(kinds("1."), vec![TokKind::Number, TokKind::Dot]);
        assert_eq!(kinds("1.5.2"), vec![TokKind::Number, TokKind::Dot, TokKind::Number]);
    }

    #[test]
    fn unescape_resolves_known_escapes() {
        assert_eq!(unescape(r#""a\"b\\c\n""#), "a\"b\\c\n");
        assert_eq!(unescape(r"'\r'"), "\r");
        assert_eq!(unescape(r#""\q""#), "\\q");
    }
}
