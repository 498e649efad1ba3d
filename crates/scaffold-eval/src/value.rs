use serde::Serialize;

/// Runtime values of the expression language.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "t", content = "v")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Lex, parse or evaluation failure; callers treat it as a hard error.
    Error(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
            Value::Error(msg) => f.write_str(msg),
        }
    }
}

impl Value {
    pub fn error(msg: impl Into<String>) -> Self {
        Value::Error(msg.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
            Value::Error(_) => "Error",
        }
    }

    /// Boolean coercion used by `&&`, `||`, `!`, `?:` and conditional directives.
    ///
    /// `Null` counts as false; any kind other than `Bool`/`Null` is rejected.
    pub fn truthy(&self) -> Result<bool, Value> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Null => Ok(false),
            Value::Error(_) => Err(self.clone()),
            other => Err(Value::error(format!(
                "Expected a boolean, found {}",
                other.kind_name()
            ))),
        }
    }

    /// Type a scope binding: `true`/`false`, decimal integers and decimal
    /// floats become typed values, everything else stays a string.
    pub fn from_scope_text(text: &str) -> Self {
        match text {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
        let digits = text.strip_prefix('-').unwrap_or(text);
        let mut parts = digits.splitn(2, '.');
        let whole = parts.next().unwrap_or_default();
        let frac = parts.next();
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        match frac {
            None if all_digits(whole) => text
                .parse::<i64>()
                .map_or_else(|_| Value::float_text(text), Value::Int),
            Some(frac) if all_digits(whole) && all_digits(frac) => Value::float_text(text),
            _ => Value::Str(text.to_string()),
        }
    }

    /// Value of a numeric literal's text.
    ///
    /// Integral text that fits `i64` becomes `Int`; a decimal point, a
    /// floating modifier (`f`, `d`, `m`) or `i64` overflow gives `Float`.
    pub fn from_numeric_literal(text: &str, modifier: Option<char>) -> Self {
        let floating = matches!(modifier, Some('f' | 'F' | 'd' | 'D' | 'm' | 'M'));
        if floating || text.contains('.') {
            return Value::float_text(text);
        }
        text.parse::<i64>()
            .map_or_else(|_| Value::float_text(text), Value::Int)
    }

    fn float_text(text: &str) -> Self {
        text.parse::<f64>().map_or_else(
            |_| Value::error(format!("Invalid numeric literal '{text}'")),
            Value::Float,
        )
    }
}
