//! Lookup tables that translate file-specific atom labels into element symbols.
//!
//! Two flavours exist because the two inputs treat unknown labels differently:
//!
//! - [`SymbolMap`] rewrites placeholder symbols from custom XYZ trajectories. It is partial:
//!   a symbol that is not in the table passes through unchanged.
//! - [`TypeMap`] assigns element symbols to numeric LAMMPS atom types. It is total: every type
//!   present in the data must be mapped, otherwise the lookup fails.
//!
//! Both tables can be loaded from a TOML file containing a single flat table, e.g.
//!
//! ```toml
//! A = "H"
//! B = "He"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid atom type '{0}': expected a positive integer")]
    InvalidType(String),
    #[error("Empty element symbol for key '{0}'")]
    EmptySymbol(String),
    #[error("Malformed mapping entry '{0}': expected KEY=SYMBOL")]
    MalformedEntry(String),
}

fn read_table(path: &Path) -> Result<BTreeMap<String, String>, MappingError> {
    let content = std::fs::read_to_string(path).map_err(|e| MappingError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| MappingError::Toml {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

/// Splits a `KEY=SYMBOL` command-line style entry into its two trimmed halves.
pub fn split_entry(entry: &str) -> Result<(&str, &str), MappingError> {
    let (key, symbol) = entry
        .split_once('=')
        .ok_or_else(|| MappingError::MalformedEntry(entry.to_string()))?;
    let (key, symbol) = (key.trim(), symbol.trim());
    if key.is_empty() {
        return Err(MappingError::MalformedEntry(entry.to_string()));
    }
    if symbol.is_empty() {
        return Err(MappingError::EmptySymbol(key.to_string()));
    }
    Ok((key, symbol))
}

/// Partial substitution table from raw trajectory symbols to element symbols.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymbolMap {
    entries: BTreeMap<String, String>,
}

impl SymbolMap {
    /// Creates an empty map, which substitutes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table used by the custom XYZ trajectories this tool was written for:
    /// `A → H` and `B → He`.
    pub fn placeholder_defaults() -> Self {
        [("A", "H"), ("B", "He")].into_iter().collect()
    }

    pub fn load(path: &Path) -> Result<Self, MappingError> {
        Self::from_string_table(read_table(path)?)
    }

    /// Builds a map from a table of raw symbols, rejecting empty element symbols.
    pub fn from_string_table(table: BTreeMap<String, String>) -> Result<Self, MappingError> {
        let mut map = Self::new();
        for (raw, symbol) in table {
            if symbol.trim().is_empty() {
                return Err(MappingError::EmptySymbol(raw));
            }
            map.insert(&raw, symbol.trim());
        }
        Ok(map)
    }

    pub fn insert(&mut self, raw: &str, symbol: &str) {
        self.entries.insert(raw.to_string(), symbol.to_string());
    }

    /// Extends the map with `other`, whose entries take precedence.
    pub fn merge(&mut self, other: SymbolMap) {
        self.entries.extend(other.entries);
    }

    /// Maps `raw` to its canonical symbol, or returns `raw` itself when it is not in the table.
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        self.entries.get(raw).map_or(raw, String::as_str)
    }

    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SymbolMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for SymbolMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let table = BTreeMap::<String, String>::deserialize(deserializer)?;
        Self::from_string_table(table).map_err(serde::de::Error::custom)
    }
}

/// Total mapping from numeric LAMMPS atom types to element symbols.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeMap {
    entries: BTreeMap<u32, String>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sodium silicate table: `1 → Na`, `2 → O`, `3 → Si`.
    pub fn sodium_silicate() -> Self {
        [(1u32, "Na"), (2, "O"), (3, "Si")].into_iter().collect()
    }

    pub fn load(path: &Path) -> Result<Self, MappingError> {
        Self::from_string_table(read_table(path)?)
    }

    /// Builds a map from string keys, as found in TOML tables.
    pub fn from_string_table(table: BTreeMap<String, String>) -> Result<Self, MappingError> {
        let mut map = Self::new();
        for (key, symbol) in table {
            let type_id = parse_type_id(&key)?;
            if symbol.trim().is_empty() {
                return Err(MappingError::EmptySymbol(key));
            }
            map.insert(type_id, symbol.trim());
        }
        Ok(map)
    }

    pub fn insert(&mut self, type_id: u32, symbol: &str) {
        self.entries.insert(type_id, symbol.to_string());
    }

    /// Extends the map with `other`, whose entries take precedence.
    pub fn merge(&mut self, other: TypeMap) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, type_id: u32) -> Option<&str> {
        self.entries.get(&type_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl<V: Into<String>> FromIterator<(u32, V)> for TypeMap {
    fn from_iter<I: IntoIterator<Item = (u32, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for TypeMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let table = BTreeMap::<String, String>::deserialize(deserializer)?;
        Self::from_string_table(table).map_err(serde::de::Error::custom)
    }
}

pub fn parse_type_id(key: &str) -> Result<u32, MappingError> {
    match key.trim().parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(MappingError::InvalidType(key.to_string())),
    }
}
