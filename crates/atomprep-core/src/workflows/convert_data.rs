use super::error::WorkflowError;
use crate::core::io::extxyz::ExtXyzFile;
use crate::core::io::lammps::{AtomStyle, LammpsDataFile, LammpsReadOptions};
use crate::core::io::traits::StructureFile;
use crate::core::mapping::TypeMap;
use crate::core::models::structure::Structure;
use crate::core::utils::elements;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Differences between the `Masses` section and the element table above this many atomic mass
/// units are reported, since they usually mean the type map assigns the wrong element.
const MASS_TOLERANCE_AMU: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertDataOptions {
    /// Overrides the atom style declared in the data file.
    pub atom_style: Option<AtomStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataConversionSummary {
    pub atoms: usize,
    pub element_counts: BTreeMap<String, usize>,
    pub atom_style: AtomStyle,
}

/// Replaces the type-id symbol of every atom with its element from `type_map`.
///
/// The structure is left untouched unless every atom type is mapped.
///
/// # Errors
///
/// Returns [`WorkflowError::UnmappedTypes`] listing every type id without an entry.
pub fn apply_type_map(structure: &mut Structure, type_map: &TypeMap) -> Result<(), WorkflowError> {
    let unmapped: BTreeSet<u32> = structure
        .atoms()
        .iter()
        .filter_map(|atom| atom.type_id)
        .filter(|id| type_map.get(*id).is_none())
        .collect();
    if !unmapped.is_empty() {
        return Err(WorkflowError::UnmappedTypes(unmapped.into_iter().collect()));
    }

    for atom in structure.atoms_mut() {
        if let Some(symbol) = atom.type_id.and_then(|id| type_map.get(id)) {
            atom.symbol = symbol.to_string();
        }
    }
    Ok(())
}

fn check_masses(masses: &BTreeMap<u32, f64>, type_map: &TypeMap) {
    for (&type_id, &mass) in masses {
        let Some(symbol) = type_map.get(type_id) else {
            continue;
        };
        match elements::atomic_mass(symbol) {
            Some(expected) if (expected - mass).abs() > MASS_TOLERANCE_AMU => warn!(
                "Atom type {} has mass {:.3} but is mapped to {} ({:.3}). Check the type map.",
                type_id, mass, symbol, expected
            ),
            Some(_) => {}
            None => debug!("No reference mass for '{}', skipping mass check", symbol),
        }
    }
}

/// Returns the symbols in `structure` that are not chemical elements, logging each one.
fn report_unknown_elements(structure: &Structure) -> Vec<String> {
    let unknown: BTreeSet<&str> = structure
        .symbols()
        .filter(|symbol| elements::lookup(symbol).is_none())
        .collect();
    for symbol in &unknown {
        warn!("'{}' is not a known chemical symbol. Check the type map.", symbol);
    }
    unknown.into_iter().map(str::to_string).collect()
}

fn count_elements(structure: &Structure) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for symbol in structure.symbols() {
        *counts.entry(symbol.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Converts a LAMMPS data file into extended XYZ, naming atoms through `type_map`.
///
/// Nothing is written if the input cannot be read or an atom type is missing from the map.
#[instrument(skip_all, name = "convert_data_workflow")]
pub fn run(
    input: &Path,
    output: &Path,
    type_map: &TypeMap,
    options: &ConvertDataOptions,
) -> Result<DataConversionSummary, WorkflowError> {
    info!("Reading LAMMPS data file '{}'", input.display());
    let file = File::open(input).map_err(|source| WorkflowError::Input {
        path: input.to_path_buf(),
        source,
    })?;
    let read_options = LammpsReadOptions {
        atom_style: options.atom_style,
    };
    let data = LammpsDataFile::read_data(&mut BufReader::new(file), &read_options)?;

    let mut structure = data.structure;
    apply_type_map(&mut structure, type_map)?;
    report_unknown_elements(&structure);
    check_masses(&data.masses, type_map);

    ExtXyzFile::write_to_path(&structure, output)?;

    let summary = DataConversionSummary {
        atoms: structure.len(),
        element_counts: count_elements(&structure),
        atom_style: data.atom_style,
    };
    info!("Wrote {} atoms to '{}'", summary.atoms, output.display());
    Ok(summary)
}
