//! Ad-hoc variables for `render` and `eval`: `--var NAME=VALUE` pairs and
//! flat JSON objects.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use scaffold_eval::{Scope, ScopeLevel};

/// clap value parser for `NAME=VALUE`.
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, found '{s}'"))?;
    if name.is_empty() {
        return Err(format!("empty variable name in '{s}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Read a flat JSON object of scalars.
pub fn vars_from_json(src: &str) -> Result<BTreeMap<String, String>> {
    let map: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(src).context("variables file must be a JSON object")?;
    let mut vars = BTreeMap::new();
    for (name, value) in map {
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            other => bail!("variable '{name}' must be a string, number or boolean, found {other}"),
        };
        vars.insert(name, text);
    }
    Ok(vars)
}

/// Root scope for ad-hoc variables; `pairs` override `file_vars`.
pub fn build_scope(file_vars: BTreeMap<String, String>, pairs: &[(String, String)]) -> Scope {
    let mut scope = Scope::root(ScopeLevel::Custom("vars".to_string()));
    for (name, value) in file_vars {
        scope.bind(name, value);
    }
    for (name, value) in pairs {
        scope.bind(name.as_str(), value.as_str());
    }
    scope
}
