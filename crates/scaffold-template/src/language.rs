use crate::error::ConfigError;

/// Textual convention for placeholders: `prefix` + name + `suffix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderStyle {
    pub prefix: String,
    pub suffix: String,
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            prefix: "T_".to_string(),
            suffix: "_".to_string(),
        }
    }
}

/// How a target language spells comments and directives.
///
/// A directive line is `comment_prefix` + `directive_prefix` + keyword,
/// e.g. `// #if IsNullable` for C-style languages. When `comment_suffix`
/// is set (block comments such as `<!-- ... -->`) it is stripped from the
/// end of directive lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub name: String,
    pub comment_prefix: String,
    pub comment_suffix: Option<String>,
    pub directive_prefix: String,
    pub placeholder: PlaceholderStyle,
}

impl Language {
    pub fn new(
        name: impl Into<String>,
        comment_prefix: impl Into<String>,
        directive_prefix: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let comment_prefix = comment_prefix.into();
        let directive_prefix = directive_prefix.into();
        if comment_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix("comment prefix"));
        }
        if directive_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix("directive prefix"));
        }
        Ok(Self {
            name: name.into(),
            comment_prefix,
            comment_suffix: None,
            directive_prefix,
            placeholder: PlaceholderStyle::default(),
        })
    }

    fn builtin(name: &str, comment: &str, directive: &str) -> Self {
        Self {
            name: name.to_string(),
            comment_prefix: comment.to_string(),
            comment_suffix: None,
            directive_prefix: directive.to_string(),
            placeholder: PlaceholderStyle::default(),
        }
    }

    /// `// #if ...` (Rust, C#, Java, C++, Go, TypeScript).
    pub fn c_style() -> Self {
        Self::builtin("c", "//", "#")
    }

    /// `# @if ...` (Python, shell, YAML, TOML).
    pub fn hash() -> Self {
        Self::builtin("hash", "#", "@")
    }

    /// `-- #if ...`
    pub fn sql() -> Self {
        Self::builtin("sql", "--", "#")
    }

    /// `<!-- #if ... -->`
    pub fn xml() -> Self {
        Self {
            comment_suffix: Some("-->".to_string()),
            ..Self::builtin("xml", "<!--", "#")
        }
    }

    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "c" | "cpp" | "csharp" | "cs" | "java" | "rust" | "rs" | "go" | "ts"
            | "typescript" | "js" | "javascript" | "kotlin" | "swift" => Ok(Self::c_style()),
            "hash" | "python" | "py" | "shell" | "sh" | "yaml" | "toml" | "ruby" => {
                Ok(Self::hash())
            }
            "sql" => Ok(Self::sql()),
            "xml" | "html" => Ok(Self::xml()),
            _ => Err(ConfigError::UnknownLanguage(name.to_string())),
        }
    }

    pub fn with_placeholder(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder = style;
        self
    }

    pub fn with_comment_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.comment_suffix = Some(suffix.into());
        self
    }
}

/// What to do with a placeholder whose name resolves nowhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    /// Abort the pass with a substitution error.
    #[default]
    Error,
    /// Leave the placeholder text in the output.
    PassThrough,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub unresolved: UnresolvedPolicy,
}

impl ProcessOptions {
    pub fn pass_through() -> Self {
        Self {
            unresolved: UnresolvedPolicy::PassThrough,
        }
    }
}
