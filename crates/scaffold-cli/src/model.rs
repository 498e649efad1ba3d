//! Minimal model graph (domain -> entities -> members) and the scope
//! chains built from it.
//!
//! A real backend gets this graph from its own declaration walker; the CLI
//! reads it from JSON so templates can be exercised without one.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use scaffold_eval::{Scope, ScopeLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub nullable: bool,
    /// Wire sequence number (field tag).
    pub sequence: Option<u32>,
    /// Byte offset for fixed-layout encodings.
    pub offset: Option<u32>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

/// Which model objects a template is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Level {
    Domain,
    Entity,
    Member,
}

impl Domain {
    pub fn from_json(src: &str) -> Result<Self> {
        serde_json::from_str(src).context("invalid model JSON")
    }

    /// Scope chains for every object at `level`, labelled `Entity` or `Entity.Member`.
    pub fn scopes(&self, level: Level) -> Vec<(String, Arc<Scope>)> {
        let domain = Arc::new(domain_scope(self));
        if level == Level::Domain {
            return vec![(self.name.clone(), domain)];
        }

        let mut out = Vec::new();
        for (i, entity) in self.entities.iter().enumerate() {
            let entity_scope = Arc::new(entity_scope(&domain, entity, i));
            if level == Level::Entity {
                out.push((entity.name.clone(), entity_scope));
                continue;
            }
            for (j, member) in entity.members.iter().enumerate() {
                out.push((
                    format!("{}.{}", entity.name, member.name),
                    Arc::new(member_scope(&entity_scope, member, j)),
                ));
            }
        }
        out
    }
}

/// Scope text for a JSON attribute; `null`, arrays and objects are skipped.
fn attribute_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn bind_attributes(scope: &mut Scope, attributes: &BTreeMap<String, serde_json::Value>) {
    for (name, value) in attributes {
        match attribute_text(value) {
            Some(text) => scope.bind(name.as_str(), text),
            None => tracing::debug!(attribute = %name, "skipping non-scalar attribute"),
        }
    }
}

pub fn domain_scope(domain: &Domain) -> Scope {
    let mut scope = Scope::root(ScopeLevel::Domain)
        .with("Domain", domain.name.as_str())
        .with("Name", domain.name.as_str())
        .with("EntityCount", domain.entities.len().to_string());
    bind_attributes(&mut scope, &domain.attributes);
    scope
}

pub fn entity_scope(parent: &Arc<Scope>, entity: &Entity, index: usize) -> Scope {
    let mut scope = Scope::child(parent, ScopeLevel::Entity)
        .with("Entity", entity.name.as_str())
        .with("Name", entity.name.as_str())
        .with("EntityIndex", index.to_string())
        .with("MemberCount", entity.members.len().to_string());
    bind_attributes(&mut scope, &entity.attributes);
    scope
}

pub fn member_scope(parent: &Arc<Scope>, member: &Member, index: usize) -> Scope {
    let mut scope = Scope::child(parent, ScopeLevel::Member)
        .with("Member", member.name.as_str())
        .with("Name", member.name.as_str())
        .with("Type", member.type_name.as_str())
        .with("Nullable", member.nullable.to_string())
        .with("MemberIndex", index.to_string());
    if let Some(seq) = member.sequence {
        scope.bind("Sequence", seq.to_string());
    }
    if let Some(offset) = member.offset {
        scope.bind("Offset", offset.to_string());
    }
    bind_attributes(&mut scope, &member.attributes);
    scope
}
