use atomprep::core::io::lammps::AtomStyle;
use atomprep::core::mapping::{self, MappingError, SymbolMap, TypeMap};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid map entry: {0}")]
    Mapping(#[from] MappingError),

    #[error("Unknown atom style '{0}'. Expected one of: atomic, charge, molecular, full.")]
    UnknownAtomStyle(String),
}

/// Parses `TYPE=SYMBOL` entries such as `3=Si`.
pub fn parse_type_map_entries(entries: &[String]) -> Result<TypeMap, ParseError> {
    let mut map = TypeMap::new();
    for entry in entries {
        let (key, symbol) = mapping::split_entry(entry)?;
        map.insert(mapping::parse_type_id(key)?, symbol);
    }
    Ok(map)
}

/// Parses `RAW=SYMBOL` entries such as `A=H`.
pub fn parse_symbol_map_entries(entries: &[String]) -> Result<SymbolMap, ParseError> {
    let mut map = SymbolMap::new();
    for entry in entries {
        let (raw, symbol) = mapping::split_entry(entry)?;
        map.insert(raw, symbol);
    }
    Ok(map)
}

pub fn parse_atom_style(value: &str) -> Result<AtomStyle, ParseError> {
    value
        .parse()
        .map_err(|_| ParseError::UnknownAtomStyle(value.to_string()))
}
