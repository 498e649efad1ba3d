use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use scaffold_cli::model::{Domain, Level};
use scaffold_cli::vars::{build_scope, parse_var, vars_from_json};
use scaffold_eval::{evaluate_str, Environment, Scope, Value};
use scaffold_parse::{parse_str, tokenize_filtered};
use scaffold_template::{process_str, Language, ProcessError, ProcessOptions};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Maximum template file size in bytes (1MB)
const MAX_TEMPLATE_SIZE: usize = 1_000_000;

#[derive(Parser, Debug)]
#[command(name = "scaffold")]
#[command(about = "Scaffold: line-oriented code templates with conditional directives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template against ad-hoc variables
    Render {
        /// Path to the template file
        template: PathBuf,

        #[command(flatten)]
        lang: LangArgs,

        #[command(flatten)]
        vars: VarArgs,

        /// Leave unresolved placeholders in the output instead of failing
        #[arg(long)]
        pass_through: bool,

        /// Write output to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a template once per object of a JSON model
    Generate {
        /// Path to the template file
        template: PathBuf,

        /// Path to the model JSON file
        #[arg(long)]
        model: PathBuf,

        /// Which model objects to render for
        #[arg(long, value_enum, default_value_t = Level::Entity)]
        level: Level,

        #[command(flatten)]
        lang: LangArgs,

        /// Leave unresolved placeholders in the output instead of failing
        #[arg(long)]
        pass_through: bool,

        /// Write one file per object into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate a directive expression and print its value
    Eval {
        expression: String,

        #[command(flatten)]
        vars: VarArgs,
    },

    /// Parse an expression and dump the AST
    Parse {
        expression: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Print the token stream of an expression
    Tokens {
        expression: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
}

#[derive(Args, Debug)]
struct LangArgs {
    /// Built-in language (c, rust, python, sql, xml, ...)
    #[arg(long, default_value = "c", conflicts_with_all = ["comment", "directive"])]
    lang: String,

    /// Custom comment prefix
    #[arg(long, requires = "directive")]
    comment: Option<String>,

    /// Custom directive prefix
    #[arg(long, requires = "comment")]
    directive: Option<String>,
}

#[derive(Args, Debug)]
struct VarArgs {
    /// Bind a variable (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// Flat JSON object of variables; --var pairs take precedence
    #[arg(long = "vars", value_name = "FILE")]
    vars_file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Debug)]
enum Format {
    Pretty,
    Json,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCAFFOLD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            template,
            lang,
            vars,
            pass_through,
            output,
        } => cmd_render(&template, &lang, &vars, pass_through, output.as_deref()),

        Commands::Generate {
            template,
            model,
            level,
            lang,
            pass_through,
            output,
        } => cmd_generate(&template, &model, level, &lang, pass_through, output.as_deref()),

        Commands::Eval { expression, vars } => cmd_eval(&expression, &vars),

        Commands::Parse { expression, format } => cmd_parse(&expression, format),

        Commands::Tokens { expression, format } => cmd_tokens(&expression, format),
    }
}

impl LangArgs {
    fn language(&self) -> Result<Language> {
        match (&self.comment, &self.directive) {
            (Some(comment), Some(directive)) => Ok(Language::new("custom", comment, directive)?),
            _ => Ok(Language::by_name(&self.lang)?),
        }
    }
}

impl VarArgs {
    fn scope(&self) -> Result<Scope> {
        let file_vars = match &self.vars_file {
            Some(path) => {
                let src = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read variables file '{}'", path.display()))?;
                vars_from_json(&src)?
            }
            None => BTreeMap::new(),
        };
        Ok(build_scope(file_vars, &self.vars))
    }
}

fn options(pass_through: bool) -> ProcessOptions {
    if pass_through {
        ProcessOptions::pass_through()
    } else {
        ProcessOptions::default()
    }
}

fn load_template(path: &Path) -> Result<String> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template '{}'", path.display()))?;

    if src.len() > MAX_TEMPLATE_SIZE {
        bail!(
            "template exceeds {}MB limit ({} bytes)",
            MAX_TEMPLATE_SIZE / 1_000_000,
            src.len()
        );
    }
    Ok(src)
}

/// Report a failed pass as `file:line: message` and exit.
fn fail_pass(path: &Path, label: Option<&str>, err: &ProcessError) -> ! {
    match label {
        Some(label) => eprintln!("{}:{}: {} (for {})", path.display(), err.line, err.kind, label),
        None => eprintln!("{}:{}: {}", path.display(), err.line, err.kind),
    }
    std::process::exit(1);
}

fn cmd_render(
    template: &Path,
    lang: &LangArgs,
    vars: &VarArgs,
    pass_through: bool,
    output: Option<&Path>,
) -> Result<()> {
    let src = load_template(template)?;
    let language = lang.language()?;
    let scope = vars.scope()?;

    let text = match process_str(&src, &language, Some(&scope), &options(pass_through)) {
        Ok(text) => text,
        Err(e) => fail_pass(template, None, &e),
    };

    match output {
        Some(path) => std::fs::write(path, &text)
            .with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => print!("{}", text),
    }
    Ok(())
}

fn cmd_generate(
    template: &Path,
    model: &Path,
    level: Level,
    lang: &LangArgs,
    pass_through: bool,
    output: Option<&Path>,
) -> Result<()> {
    let src = load_template(template)?;
    let language = lang.language()?;
    let model_src = std::fs::read_to_string(model)
        .with_context(|| format!("Failed to read model '{}'", model.display()))?;
    let domain = Domain::from_json(&model_src)?;
    let options = options(pass_through);

    if let Some(dir) = output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create '{}'", dir.display()))?;
    }
    let extension = template
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("txt");

    let scopes = domain.scopes(level);
    tracing::debug!(objects = scopes.len(), ?level, "generating");
    for (label, scope) in &scopes {
        let text = match process_str(&src, &language, Some(scope.as_ref()), &options) {
            Ok(text) => text,
            Err(e) => fail_pass(template, Some(label), &e),
        };
        match output {
            Some(dir) => {
                let path = dir.join(format!("{}.{}", label, extension));
                std::fs::write(&path, &text)
                    .with_context(|| format!("Failed to write '{}'", path.display()))?;
            }
            None => {
                println!("==> {} <==", label);
                print!("{}", text);
            }
        }
    }

    if let Some(dir) = output {
        eprintln!("Generated {} files in {}", scopes.len(), dir.display());
    }
    Ok(())
}

fn cmd_eval(expression: &str, vars: &VarArgs) -> Result<()> {
    let scope = vars.scope()?;
    let mut env = Environment::with_scope(&scope);
    match evaluate_str(expression, &mut env) {
        Value::Error(msg) => {
            eprintln!("Error: {}", msg);
            std::process::exit(1);
        }
        Value::Null => println!("null"),
        Value::Str(s) => println!("{:?}", s),
        other => println!("{}", other),
    }
    Ok(())
}

fn cmd_parse(expression: &str, format: Format) -> Result<()> {
    let node = parse_str(expression)?;
    if let Some(msg) = node.error_message() {
        eprintln!("Parse error: {}", msg);
        std::process::exit(1);
    }

    match format {
        Format::Pretty => println!("{:#?}", node),
        Format::Json => println!("{}", serde_json::to_string_pretty(&node)?),
    }
    Ok(())
}

fn cmd_tokens(expression: &str, format: Format) -> Result<()> {
    let tokens = tokenize_filtered(expression)?;
    if let Format::Json = format {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }
    for tok in &tokens {
        println!(
            "{}:{}\t{:?}\t{}",
            tok.span.line,
            tok.span.offset,
            tok.kind,
            tok.text(expression)
        );
    }
    Ok(())
}
