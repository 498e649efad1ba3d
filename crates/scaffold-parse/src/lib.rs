#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod lexer;
mod parser;
mod token;

pub use lexer::{tokenize, tokenize_filtered, unescape, LexError, Lexer};
pub use parser::{parse_str, parse_tokens, MAX_NESTING_DEPTH};
pub use token::{Keyword, TokKind, Token};
