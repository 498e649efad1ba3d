use crate::error::DirectiveError;

/// A parsed directive line; expression arguments are borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    Eval(&'a str),
    If(&'a str),
    Elif(&'a str),
    Else,
    Endif,
}

impl<'a> Directive<'a> {
    /// Parse the text following the directive prefix, e.g. `if A && B`.
    pub fn parse(text: &'a str) -> Result<Self, DirectiveError> {
        let text = text.trim();
        let split = text
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(text.len());
        let (keyword, arg) = text.split_at(split);
        let arg = arg.trim();

        let needs_arg = |keyword: &'static str| {
            if arg.is_empty() {
                Err(DirectiveError::MissingExpression(keyword))
            } else {
                Ok(arg)
            }
        };
        let no_arg = |keyword: &'static str| {
            if arg.is_empty() {
                Ok(())
            } else {
                Err(DirectiveError::UnexpectedArgument {
                    keyword,
                    found: arg.to_string(),
                })
            }
        };

        match keyword {
            "eval" => needs_arg("eval").map(Directive::Eval),
            "if" => needs_arg("if").map(Directive::If),
            "elif" => needs_arg("elif").map(Directive::Elif),
            "else" => no_arg("else").map(|()| Directive::Else),
            "endif" => no_arg("endif").map(|()| Directive::Endif),
            "" => Err(DirectiveError::Unknown(text.to_string())),
            other => Err(DirectiveError::Unknown(other.to_string())),
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::Eval(_) => "eval",
            Directive::If(_) => "if",
            Directive::Elif(_) => "elif",
            Directive::Else => "else",
            Directive::Endif => "endif",
        }
    }
}
