use super::atom::Atom;
use super::cell::Cell;
use crate::core::utils::elements;
use nalgebra::Point3;

/// Avogadro constant in 1/mol.
pub const AVOGADRO: f64 = 6.02214076e23;

/// Cubic Angstroms per cubic centimetre.
pub const ANGSTROM3_PER_CM3: f64 = 1e24;

/// An atomic configuration: the unit produced by readers and consumed by writers.
///
/// Atom order is significant. In a trajectory, the atom at index `i` in one frame is the same
/// atom as the one at index `i` in every other frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Structure {
    atoms: Vec<Atom>,
    cell: Option<Cell>,
    pbc: [bool; 3],
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell(cell: Cell, pbc: [bool; 3]) -> Self {
        Self {
            atoms: Vec::new(),
            cell: Some(cell),
            pbc,
        }
    }

    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        Self {
            atoms,
            ..Self::default()
        }
    }

    pub fn push(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn cell(&self) -> Option<&Cell> {
        self.cell.as_ref()
    }

    pub fn set_cell(&mut self, cell: Option<Cell>) {
        self.cell = cell;
    }

    pub fn pbc(&self) -> [bool; 3] {
        self.pbc
    }

    pub fn set_pbc(&mut self, pbc: [bool; 3]) {
        self.pbc = pbc;
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.atoms.iter().map(|a| a.symbol.as_str())
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> + '_ {
        self.atoms.iter().map(|a| &a.position)
    }

    /// Total mass in atomic mass units.
    ///
    /// Returns `None` if any atom's symbol is not a known element.
    pub fn total_mass(&self) -> Option<f64> {
        self.symbols()
            .map(elements::atomic_mass)
            .sum::<Option<f64>>()
    }

    /// Volume of the periodic cell in cubic Angstroms, if a cell is defined.
    pub fn volume(&self) -> Option<f64> {
        self.cell.as_ref().map(Cell::volume)
    }

    /// Mass density in g/cm^3, derived from the cell volume.
    ///
    /// Returns `None` without a cell, with a degenerate cell, or with unknown elements.
    pub fn density_g_cm3(&self) -> Option<f64> {
        let volume = self.volume().filter(|v| *v > 0.0)?;
        let mass_g = self.total_mass()? / AVOGADRO;
        Some(mass_g / (volume / ANGSTROM3_PER_CM3))
    }
}
