use crate::lexer::{tokenize_filtered, unescape, LexError};
use crate::token::{Keyword, TokKind, Token};
use scaffold_ast::ast::{BinOp, Node, UnOp};

/// Maximum height of an expression tree: parentheses, unary operators and
/// every operator in a binary chain each count as one level.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Lex and parse a single expression.
///
/// Lexical errors are returned as `Err`; parse errors come back as
/// `Node::Error` so they surface through evaluation like any other node.
pub fn parse_str(src: &str) -> Result<Node, LexError> {
    let toks = tokenize_filtered(src)?;
    Ok(parse_tokens(src, &toks))
}

/// Parse non-whitespace `toks` (lexed from `src`) into an expression tree.
pub fn parse_tokens(src: &str, toks: &[Token]) -> Node {
    if toks.is_empty() {
        return Node::Error("Empty expression".to_string());
    }
    let mut p = Parser {
        src,
        toks,
        pos: 0,
        depth: 0,
    };
    match p.parse_expr() {
        Err(msg) => Node::Error(msg),
        Ok(_) if p.pos < toks.len() => Node::Error(format!(
            "Not all source matched. Only {} of {} tokens consumed.",
            p.pos,
            toks.len()
        )),
        Ok(node) => node,
    }
}

type PResult = Result<Node, String>;

struct Parser<'a> {
    src: &'a str,
    toks: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek_kind(&self, ahead: usize) -> Option<TokKind> {
        self.toks.get(self.pos + ahead).map(|t| t.kind)
    }

    /// True when the tokens at `pos` and `pos + 1` are `a` and `b` with no gap between them.
    fn at_pair(&self, a: TokKind, b: TokKind) -> bool {
        match (self.toks.get(self.pos), self.toks.get(self.pos + 1)) {
            (Some(x), Some(y)) => x.kind == a && y.kind == b && x.span.touches(&y.span),
            _ => false,
        }
    }

    fn describe_current(&self) -> String {
        match self.toks.get(self.pos) {
            Some(t) => format!("unexpected token '{}'", t.text(self.src)),
            None => "unexpected end of expression".to_string(),
        }
    }

    fn enter(&mut self) -> Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(format!(
                "Expression nesting exceeds {MAX_NESTING_DEPTH} levels"
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ======= expressions (precedence climbing) =======
    //
    // Precedence (low -> high):
    //   :=            assignment, right-assoc
    //   ? :           ternary, right-assoc
    //   1:  ||
    //   2:  &&
    //   3:  == !=
    //   4:  < <= > >=
    //   5:  + -
    //   6:  * / %
    //   7:  **        right-assoc
    // unary + - ! bind tighter than every infix operator

    fn parse_expr(&mut self) -> PResult {
        self.enter()?;
        let result = self.parse_assignment();
        self.leave();
        result
    }

    fn parse_assignment(&mut self) -> PResult {
        let start = self.pos;
        let lhs = self.parse_ternary()?;
        if !self.at_pair(TokKind::Colon, TokKind::Eq) {
            return Ok(lhs);
        }
        let bare_ident = self.pos == start + 1 && self.toks[start].kind == TokKind::Ident;
        let Node::VariableReference(name) = lhs else {
            return Err("assignment target must be an identifier".to_string());
        };
        if !bare_ident {
            return Err("assignment target must be an identifier".to_string());
        }
        self.pos += 2; // ':='
        let value = self.parse_expr()?;
        Ok(Node::Assignment {
            name,
            value: Box::new(value),
        })
    }

    fn parse_ternary(&mut self) -> PResult {
        let cond = self.parse_binary(1)?;
        if self.peek_kind(0) != Some(TokKind::Question) {
            return Ok(cond);
        }
        self.pos += 1; // '?'
        let then = self.parse_expr()?;
        if self.peek_kind(0) != Some(TokKind::Colon) || self.at_pair(TokKind::Colon, TokKind::Eq) {
            return Err(format!("expected ':' in conditional, {}", self.describe_current()));
        }
        self.pos += 1; // ':'
        self.enter()?;
        let otherwise = self.parse_ternary();
        self.leave();
        Ok(Node::Ternary {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise?),
        })
    }

    /// Binary operator at the cursor: (op, tokens it spans, precedence, right-assoc).
    fn binary_op(&self) -> Option<(BinOp, usize, u8, bool)> {
        let op = match self.peek_kind(0)? {
            TokKind::Pipe if self.at_pair(TokKind::Pipe, TokKind::Pipe) => (BinOp::Or, 2, 1, false),
            TokKind::Amp if self.at_pair(TokKind::Amp, TokKind::Amp) => (BinOp::And, 2, 2, false),
            TokKind::Eq if self.at_pair(TokKind::Eq, TokKind::Eq) => (BinOp::Eq, 2, 3, false),
            TokKind::Bang if self.at_pair(TokKind::Bang, TokKind::Eq) => (BinOp::Ne, 2, 3, false),
            TokKind::Lt if self.at_pair(TokKind::Lt, TokKind::Eq) => (BinOp::Le, 2, 4, false),
            TokKind::Gt if self.at_pair(TokKind::Gt, TokKind::Eq) => (BinOp::Ge, 2, 4, false),
            TokKind::Lt => (BinOp::Lt, 1, 4, false),
            TokKind::Gt => (BinOp::Gt, 1, 4, false),
            TokKind::Plus => (BinOp::Add, 1, 5, false),
            TokKind::Minus => (BinOp::Sub, 1, 5, false),
            TokKind::Star if self.at_pair(TokKind::Star, TokKind::Star) => (BinOp::Pow, 2, 7, true),
            TokKind::Star => (BinOp::Mul, 1, 6, false),
            TokKind::Slash => (BinOp::Div, 1, 6, false),
            TokKind::Percent => (BinOp::Rem, 1, 6, false),
            _ => return None,
        };
        Some(op)
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult {
        let base = self.depth;
        let result = self.parse_binary_chain(min_prec);
        self.depth = base;
        result
    }

    /// Each operator folded into `lhs` deepens the left spine by one, so its
    /// level is held until the whole chain is done.
    fn parse_binary_chain(&mut self, min_prec: u8) -> PResult {
        let mut lhs = self.parse_unary()?;
        while let Some((op, width, prec, right_assoc)) = self.binary_op() {
            if prec < min_prec {
                break;
            }
            self.pos += width;
            let next_min = if right_assoc { prec } else { prec + 1 };
            self.enter()?;
            let rhs = self.parse_binary(next_min)?;
            lhs = Node::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult {
        let op = match self.peek_kind(0) {
            Some(TokKind::Plus) => UnOp::Plus,
            Some(TokKind::Minus) => UnOp::Neg,
            Some(TokKind::Bang) => UnOp::Not,
            _ => return self.parse_primary(),
        };
        self.pos += 1;
        self.enter()?;
        let operand = self.parse_unary();
        self.leave();
        Ok(Node::Unary {
            op,
            operand: Box::new(operand?),
        })
    }

    fn parse_primary(&mut self) -> PResult {
        let toks = self.toks;
        let Some(tok) = toks.get(self.pos) else {
            return Err(self.describe_current());
        };
        let text = tok.text(self.src);
        let node = match tok.kind {
            TokKind::Number => {
                let suffix = usize::from(tok.unsigned) + usize::from(tok.modifier.is_some());
                Node::NumericConstant {
                    text: text[..text.len() - suffix].to_string(),
                    modifier: tok.modifier,
                    unsigned: tok.unsigned,
                }
            }
            TokKind::Str | TokKind::Char => Node::StringConstant(unescape(text)),
            TokKind::Keyword(Keyword::Null) => Node::NullConstant,
            TokKind::Keyword(Keyword::True) => Node::BoolConstant(true),
            TokKind::Keyword(Keyword::False) => Node::BoolConstant(false),
            TokKind::Ident => Node::VariableReference(text.to_string()),
            TokKind::LParen => {
                self.pos += 1; // '('
                let inner = self.parse_expr()?;
                if self.peek_kind(0) != Some(TokKind::RParen) {
                    return Err(format!("expected ')', {}", self.describe_current()));
                }
                self.pos += 1; // ')'
                return Ok(inner);
            }
            _ => return Err(self.describe_current()),
        };
        self.pos += 1;
        Ok(node)
    }
}
