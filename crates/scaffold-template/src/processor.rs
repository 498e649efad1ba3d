//! Line-oriented macro processor.
//!
//! Each line is either a directive (`<comment><directive>keyword ...`), a
//! comment text line, or an ordinary text line. Text lines are emitted,
//! with placeholders substituted, only while every open conditional frame
//! is active.

use std::borrow::Cow;

use scaffold_ast::ast::Node;
use scaffold_eval::{evaluate, Environment, Scope, Value};
use scaffold_parse::{parse_tokens, tokenize_filtered};

use crate::directive::Directive;
use crate::error::{DirectiveError, ProcessError, ProcessErrorKind};
use crate::language::{Language, ProcessOptions};
use crate::substitute::substitute_placeholders;

/// State of one open `if` block.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Every enclosing frame is active.
    parent_active: bool,
    /// Some branch of this block has already been selected.
    branch_taken: bool,
    /// Lines in the current branch are emitted.
    active: bool,
    seen_else: bool,
    /// Line of the opening `if`.
    opened_at: usize,
}

struct Processor<'a, 's> {
    language: &'a Language,
    options: &'a ProcessOptions,
    env: Environment<'s>,
    frames: Vec<Frame>,
    out: Vec<String>,
}

/// Run one template pass over `lines`.
///
/// `scope` seeds the pass's variables; `eval` bindings made during the pass
/// stay private to it. Any error aborts the pass without partial output.
#[tracing::instrument(level = "debug", skip_all, fields(language = %language.name, lines = lines.len()))]
pub fn process<S: AsRef<str>>(
    lines: &[S],
    language: &Language,
    scope: Option<&Scope>,
    options: &ProcessOptions,
) -> Result<Vec<String>, ProcessError> {
    let env = match scope {
        Some(scope) => Environment::with_scope(scope),
        None => Environment::new(),
    };
    let mut p = Processor {
        language,
        options,
        env,
        frames: Vec::new(),
        out: Vec::with_capacity(lines.len()),
    };

    for (idx, line) in lines.iter().enumerate() {
        p.line(idx + 1, line.as_ref())?;
    }

    if let Some(frame) = p.frames.last() {
        return Err(ProcessError::new(
            frame.opened_at,
            DirectiveError::UnterminatedIf,
        ));
    }
    tracing::trace!(emitted = p.out.len(), "template pass complete");
    Ok(p.out)
}

/// Process a whole template text.
///
/// Output lines are joined with `\r\n` when the template uses CRLF endings,
/// otherwise `\n`; a trailing newline in the input is kept.
pub fn process_str(
    template: &str,
    language: &Language,
    scope: Option<&Scope>,
    options: &ProcessOptions,
) -> Result<String, ProcessError> {
    let newline = if template.contains("\r\n") { "\r\n" } else { "\n" };
    let lines: Vec<&str> = template.lines().collect();
    let mut text = process(&lines, language, scope, options)?.join(newline);
    if template.ends_with('\n') && !text.is_empty() {
        text.push_str(newline);
    }
    Ok(text)
}

impl<'a, 's> Processor<'a, 's> {
    fn active(&self) -> bool {
        self.frames.iter().all(|f| f.active)
    }

    fn line(&mut self, line_no: usize, line: &str) -> Result<(), ProcessError> {
        let rest = line.trim_start();
        if let Some(after_comment) = rest.strip_prefix(self.language.comment_prefix.as_str()) {
            let inner = after_comment.trim_start();
            if let Some(body) = inner.strip_prefix(self.language.directive_prefix.as_str()) {
                let body = match &self.language.comment_suffix {
                    Some(suffix) => body.trim_end().strip_suffix(suffix.as_str()).unwrap_or(body),
                    None => body,
                };
                let directive =
                    Directive::parse(body).map_err(|e| ProcessError::new(line_no, e))?;
                return self.directive(line_no, directive);
            }
        }

        if self.active() {
            let text = self.substitute(line_no, line)?;
            self.out.push(text);
        }
        Ok(())
    }

    fn directive(&mut self, line_no: usize, directive: Directive<'_>) -> Result<(), ProcessError> {
        let keyword = directive.keyword();
        let err = |e: DirectiveError| ProcessError::new(line_no, e);

        match directive {
            Directive::Eval(src) => {
                if !self.active() {
                    return Ok(());
                }
                let node = self.parse(line_no, src)?;
                if node.assigned_name().is_none() {
                    return Err(err(DirectiveError::NotAnAssignment));
                }
                self.eval(line_no, &node)?;
            }
            Directive::If(src) => {
                let parent_active = self.active();
                let cond = if parent_active {
                    self.condition(line_no, src)?
                } else {
                    false
                };
                self.frames.push(Frame {
                    parent_active,
                    // an inactive parent means no branch here may ever run
                    branch_taken: cond || !parent_active,
                    active: parent_active && cond,
                    seen_else: false,
                    opened_at: line_no,
                });
            }
            Directive::Elif(src) => {
                let frame = *self
                    .frames
                    .last()
                    .ok_or_else(|| err(DirectiveError::NoMatchingIf("elif")))?;
                if frame.seen_else {
                    return Err(err(DirectiveError::ElifAfterElse));
                }
                let cond = if frame.parent_active && !frame.branch_taken {
                    self.condition(line_no, src)?
                } else {
                    false
                };
                if let Some(top) = self.frames.last_mut() {
                    top.active = cond;
                    top.branch_taken |= cond;
                }
            }
            Directive::Else => {
                let top = self
                    .frames
                    .last_mut()
                    .ok_or_else(|| err(DirectiveError::NoMatchingIf("else")))?;
                if top.seen_else {
                    return Err(err(DirectiveError::DuplicateElse));
                }
                top.active = top.parent_active && !top.branch_taken;
                top.branch_taken = true;
                top.seen_else = true;
            }
            Directive::Endif => {
                self.frames
                    .pop()
                    .ok_or_else(|| err(DirectiveError::NoMatchingIf("endif")))?;
            }
        }

        tracing::debug!(
            line = line_no,
            directive = keyword,
            depth = self.frames.len(),
            active = self.active(),
            "directive"
        );
        Ok(())
    }

    fn parse(&self, line_no: usize, src: &str) -> Result<Node, ProcessError> {
        let toks = tokenize_filtered(src).map_err(|e| ProcessError::new(line_no, e))?;
        match parse_tokens(src, &toks) {
            Node::Error(msg) => Err(ProcessError::new(line_no, ProcessErrorKind::Parse(msg))),
            node => Ok(node),
        }
    }

    fn eval(&mut self, line_no: usize, node: &Node) -> Result<Value, ProcessError> {
        match evaluate(node, &mut self.env) {
            Value::Error(msg) => Err(ProcessError::new(line_no, ProcessErrorKind::Eval(msg))),
            v => Ok(v),
        }
    }

    /// Evaluate an `if`/`elif` condition; `null` counts as false.
    fn condition(&mut self, line_no: usize, src: &str) -> Result<bool, ProcessError> {
        let node = self.parse(line_no, src)?;
        match self.eval(line_no, &node)? {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(ProcessError::new(
                line_no,
                DirectiveError::NonBooleanCondition(other.kind_name()),
            )),
        }
    }

    fn substitute(&self, line_no: usize, line: &str) -> Result<String, ProcessError> {
        let env = &self.env;
        substitute_placeholders(
            line,
            &self.language.placeholder,
            self.options.unresolved,
            |name| match env.local(name) {
                Some(v) => Some(Cow::Owned(v.to_string())),
                None => env.scope().and_then(|s| s.resolve(name)).map(Cow::Borrowed),
            },
        )
        .map_err(|name| ProcessError::new(line_no, ProcessErrorKind::Substitution { name }))
    }
}
