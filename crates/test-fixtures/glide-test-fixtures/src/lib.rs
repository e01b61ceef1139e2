use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Result<Manifest, String>> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).map_err(|e| e.to_string())
});

#[derive(Debug, Deserialize)]
struct Manifest {
    configs: HashMap<String, FixtureEntry>,
    curves: HashMap<String, FixtureEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixtureEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        #[allow(dead_code)]
        description: Option<String>,
    },
}

impl FixtureEntry {
    fn as_path(&self) -> &str {
        match self {
            FixtureEntry::Path(path) => path,
            FixtureEntry::Detailed { path, .. } => path,
        }
    }
}

fn manifest() -> Result<&'static Manifest> {
    MANIFEST
        .as_ref()
        .map_err(|e| anyhow!("fixtures manifest failed to parse: {e}"))
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

fn lookup<'a>(
    map: &'a HashMap<String, FixtureEntry>,
    kind: &str,
    name: &str,
) -> Result<&'a str> {
    map.get(name)
        .map(FixtureEntry::as_path)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Whole animation configuration documents.
pub mod configs {
    use super::*;

    pub fn keys() -> Result<Vec<String>> {
        Ok(manifest()?.configs.keys().cloned().collect())
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&manifest()?.configs, "config", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        super::load_json(lookup(&manifest()?.configs, "config", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&manifest()?.configs, "config", name)?))
    }
}

/// Single curve descriptors.
pub mod curves {
    use super::*;

    pub fn keys() -> Result<Vec<String>> {
        Ok(manifest()?.curves.keys().cloned().collect())
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&manifest()?.curves, "curve", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        super::load_json(lookup(&manifest()?.curves, "curve", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&manifest()?.curves, "curve", name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_exists() {
        for name in configs::keys().unwrap() {
            let path = configs::path(&name).unwrap();
            assert!(path.exists(), "missing config fixture {}", path.display());
            let _: serde_json::Value = configs::load(&name).unwrap();
        }
        for name in curves::keys().unwrap() {
            let _: serde_json::Value = curves::load(&name).unwrap();
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        let err = configs::json("nope").unwrap_err();
        assert!(err.to_string().contains("unknown config fixture 'nope'"));
    }
}
