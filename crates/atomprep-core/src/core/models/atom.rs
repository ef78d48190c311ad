use nalgebra::Point3;

/// A single atom in a structure.
///
/// The symbol is usually a chemical element symbol, but the model does not enforce this:
/// placeholder labels read from custom files are carried through verbatim until a mapping
/// table translates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol (e.g., "Si", "O").
    pub symbol: String,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// The numeric atom type from a LAMMPS data file, when the atom originated from one.
    pub type_id: Option<u32>,
}

impl Atom {
    /// Creates a new `Atom` without a LAMMPS type.
    pub fn new(symbol: &str, position: Point3<f64>) -> Self {
        Self {
            symbol: symbol.to_string(),
            position,
            type_id: None,
        }
    }

    /// Creates a new `Atom` tagged with a LAMMPS atom type.
    pub fn with_type(symbol: &str, position: Point3<f64>, type_id: u32) -> Self {
        Self {
            type_id: Some(type_id),
            ..Self::new(symbol, position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_no_type() {
        let atom = Atom::new("O", Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.symbol, "O");
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.type_id, None);
    }

    #[test]
    fn with_type_sets_type_id() {
        let atom = Atom::with_type("Na", Point3::origin(), 1);
        assert_eq!(atom.symbol, "Na");
        assert_eq!(atom.type_id, Some(1));
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let atom1 = Atom::with_type("Si", Point3::new(0.5, 0.5, 0.5), 3);
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
    }
}
