//! Error types for template processing.

use scaffold_parse::LexError;
use thiserror::Error;

/// Misuse of a directive line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("unknown directive '{0}'")]
    Unknown(String),

    #[error("'{0}' requires an expression")]
    MissingExpression(&'static str),

    #[error("'{keyword}' takes no argument, found '{found}'")]
    UnexpectedArgument { keyword: &'static str, found: String },

    #[error("'eval' expects an assignment of the form `name := expression`")]
    NotAnAssignment,

    #[error("'{0}' with no matching if")]
    NoMatchingIf(&'static str),

    #[error("'elif' after 'else'")]
    ElifAfterElse,

    #[error("duplicate 'else'")]
    DuplicateElse,

    #[error("condition must be a boolean, found {0}")]
    NonBooleanCondition(&'static str),

    #[error("unterminated if")]
    UnterminatedIf,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessErrorKind {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("evaluation error: {0}")]
    Eval(String),

    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error("unresolved placeholder '{name}'")]
    Substitution { name: String },
}

/// A failed template pass. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {kind}")]
pub struct ProcessError {
    pub line: usize,
    pub kind: ProcessErrorKind,
}

impl ProcessError {
    pub fn new(line: usize, kind: impl Into<ProcessErrorKind>) -> Self {
        Self {
            line,
            kind: kind.into(),
        }
    }
}

/// Invalid language descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    EmptyPrefix(&'static str),

    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
}
