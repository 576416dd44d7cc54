// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference data store.
//!
//! Static game tables (`item_desc`, `crafting_recipe_desc`, `npc_desc`, ...)
//! shipped as one JSON object mapping table name to an array of row
//! objects, optionally zstd-compressed.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const REFERENCE_FILE: &str = "reference.json";
pub const REFERENCE_FILE_ZST: &str = "reference.json.zst";

/// Tables the engine cannot resolve names without.
const CORE_TABLES: [&str; 3] = ["item_desc", "building_desc", "crafting_recipe_desc"];

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reference table `{0}` is not an array")]
    NotATable(String),
    #[error("reference store is not a JSON object")]
    NotAnObject,
}

/// Raw reference tables by name.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    tables: HashMap<String, Vec<Value>>,
}

impl ReferenceTables {
    /// Rows of `name`, empty when the table is absent.
    pub fn rows(&self, name: &str) -> &[Value] {
        self.tables.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>, rows: Vec<Value>) {
        self.tables.insert(name.into(), rows);
    }

    fn from_value(value: Value) -> Result<Self, ReferenceError> {
        let Value::Object(map) = value else {
            return Err(ReferenceError::NotAnObject);
        };
        let mut tables = HashMap::with_capacity(map.len());
        for (name, rows) in map {
            match rows {
                Value::Array(rows) => {
                    tables.insert(name, rows);
                }
                _ => return Err(ReferenceError::NotATable(name)),
            }
        }
        Ok(Self { tables })
    }
}

/// Find the reference store in `dir`, preferring the compressed file.
pub fn locate_reference(dir: &Path) -> Option<PathBuf> {
    [REFERENCE_FILE_ZST, REFERENCE_FILE].iter().map(|name| dir.join(name)).find(|p| p.exists())
}

/// Load a reference store. Files ending in `.zst` are zstd-decoded.
pub fn load_reference(path: &Path) -> Result<ReferenceTables, ReferenceError> {
    let bytes = fs::read(path)?;
    let bytes = if path.extension().is_some_and(|ext| ext == "zst") {
        zstd::decode_all(bytes.as_slice())?
    } else {
        bytes
    };
    let tables = ReferenceTables::from_value(serde_json::from_slice(&bytes)?)?;

    let missing: Vec<&str> = CORE_TABLES.iter().copied().filter(|t| !tables.contains(t)).collect();
    if !missing.is_empty() {
        tracing::warn!(path = %path.display(), ?missing, "reference store is missing core tables");
    }
    tracing::info!(path = %path.display(), tables = tables.len(), "loaded reference store");
    Ok(tables)
}

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;
