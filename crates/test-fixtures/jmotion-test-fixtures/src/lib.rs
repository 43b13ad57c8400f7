//! Shared pattern fixtures for jmotion tests.
//!
//! Fixtures live in `fixtures/` at the workspace root and are indexed by
//! `fixtures/manifest.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    patterns: BTreeMap<String, PatternEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        tags: Vec<String>,
    },
}

impl PatternEntry {
    fn as_path(&self) -> &str {
        match self {
            PatternEntry::Path(path) => path,
            PatternEntry::Detailed { path, .. } => path,
        }
    }

    fn has_tag(&self, tag: &str) -> bool {
        match self {
            PatternEntry::Path(_) => false,
            PatternEntry::Detailed { tags, .. } => tags.iter().any(|t| t == tag),
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a BTreeMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod patterns {
    use super::*;

    /// Fixture names in sorted order.
    pub fn keys() -> Vec<String> {
        MANIFEST.patterns.keys().cloned().collect()
    }

    /// Fixture names carrying `tag` in the manifest.
    pub fn tagged(tag: &str) -> Vec<String> {
        MANIFEST
            .patterns
            .iter()
            .filter(|(_, entry)| entry.has_tag(tag))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.patterns, "pattern", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.patterns, "pattern", name)?;
        super::load_json(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.patterns, "pattern", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}
