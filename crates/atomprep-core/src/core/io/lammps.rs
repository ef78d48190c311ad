use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::cell::Cell;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::collections::{BTreeMap, HashSet};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Box bounds LAMMPS assumes when a data file does not declare them.
const DEFAULT_BOUNDS: (f64, f64) = (-0.5, 0.5);

#[derive(Debug, Error)]
pub enum LammpsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: LammpsParseErrorKind,
    },
    #[error("Missing required header entry: {0}")]
    MissingHeader(&'static str),
    #[error("Header declares {declared} atoms but the Atoms section contains {found}")]
    AtomCountMismatch { declared: usize, found: usize },
    #[error("Duplicate atom id {0}")]
    DuplicateAtomId(u64),
    #[error("Writing LAMMPS data files is not supported")]
    WriteUnsupported,
}

#[derive(Debug, Error)]
pub enum LammpsParseErrorKind {
    #[error("Invalid header entry '{0}'")]
    InvalidHeader(String),
    #[error("Atom line has {found} fields, atom style '{style}' requires {expected}")]
    TooFewFields {
        style: AtomStyle,
        expected: usize,
        found: usize,
    },
    #[error("Invalid {field} value '{value}'")]
    InvalidValue { field: &'static str, value: String },
    #[error("Atom type {type_id} exceeds the declared {declared} atom types")]
    TypeOutOfRange { type_id: u32, declared: u32 },
    #[error("Atoms section found before the atom count header")]
    AtomsBeforeHeader,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported atom style '{0}'. Expected one of: atomic, charge, molecular, full")]
pub struct UnknownAtomStyle(pub String);

/// Column layout of the `Atoms` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AtomStyle {
    /// `atom-id atom-type x y z`
    Atomic,
    /// `atom-id atom-type q x y z`
    Charge,
    /// `atom-id molecule-id atom-type x y z`
    Molecular,
    /// `atom-id molecule-id atom-type q x y z`
    #[default]
    Full,
}

impl AtomStyle {
    fn type_column(self) -> usize {
        match self {
            AtomStyle::Atomic | AtomStyle::Charge => 1,
            AtomStyle::Molecular | AtomStyle::Full => 2,
        }
    }

    fn position_column(self) -> usize {
        match self {
            AtomStyle::Atomic => 2,
            AtomStyle::Charge | AtomStyle::Molecular => 3,
            AtomStyle::Full => 4,
        }
    }

    fn min_fields(self) -> usize {
        self.position_column() + 3
    }
}

impl FromStr for AtomStyle {
    type Err = UnknownAtomStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(AtomStyle::Atomic),
            "charge" => Ok(AtomStyle::Charge),
            "molecular" => Ok(AtomStyle::Molecular),
            "full" => Ok(AtomStyle::Full),
            _ => Err(UnknownAtomStyle(s.to_string())),
        }
    }
}

impl std::fmt::Display for AtomStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AtomStyle::Atomic => "atomic",
            AtomStyle::Charge => "charge",
            AtomStyle::Molecular => "molecular",
            AtomStyle::Full => "full",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LammpsReadOptions {
    /// Forces an atom style. When `None`, the `Atoms # style` comment decides, falling back to
    /// [`AtomStyle::Full`].
    pub atom_style: Option<AtomStyle>,
}

/// Contents of a LAMMPS data file relevant to structure conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct LammpsData {
    /// Atoms sorted by atom id. Symbols are the decimal atom type until a type map is applied.
    pub structure: Structure,
    /// Per-type masses from the `Masses` section.
    pub masses: BTreeMap<u32, f64>,
    pub atom_types: Option<u32>,
    pub atom_style: AtomStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Masses,
    Atoms,
    Skipped,
}

fn strip_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once('#') {
        Some((content, comment)) => (content.trim(), Some(comment.trim())),
        None => (line.trim(), None),
    }
}

fn parse_field<T: FromStr>(
    value: &str,
    field: &'static str,
    line: usize,
) -> Result<T, LammpsError> {
    value.parse().map_err(|_| LammpsError::Parse {
        line,
        kind: LammpsParseErrorKind::InvalidValue {
            field,
            value: value.to_string(),
        },
    })
}

#[derive(Debug, Default)]
struct Header {
    atoms: Option<usize>,
    atom_types: Option<u32>,
    bounds: [Option<(f64, f64)>; 3],
    tilt: [f64; 3],
}

impl Header {
    fn parse_line(&mut self, content: &str, line: usize) -> Result<(), LammpsError> {
        let fields: Vec<&str> = content.split_whitespace().collect();
        let invalid = || LammpsError::Parse {
            line,
            kind: LammpsParseErrorKind::InvalidHeader(content.to_string()),
        };
        match fields.as_slice() {
            [n, "atoms"] => self.atoms = Some(n.parse().map_err(|_| invalid())?),
            [n, "atom", "types"] => self.atom_types = Some(n.parse().map_err(|_| invalid())?),
            [lo, hi, lo_key, hi_key] if lo_key.ends_with("lo") && hi_key.ends_with("hi") => {
                let axis = match *lo_key {
                    "xlo" => 0,
                    "ylo" => 1,
                    "zlo" => 2,
                    _ => return Err(invalid()),
                };
                let lo: f64 = lo.parse().map_err(|_| invalid())?;
                let hi: f64 = hi.parse().map_err(|_| invalid())?;
                self.bounds[axis] = Some((lo, hi));
            }
            [xy, xz, yz, "xy", "xz", "yz"] => {
                self.tilt = [
                    xy.parse().map_err(|_| invalid())?,
                    xz.parse().map_err(|_| invalid())?,
                    yz.parse().map_err(|_| invalid())?,
                ];
            }
            _ => debug!("Ignoring LAMMPS header line {}: '{}'", line, content),
        }
        Ok(())
    }

    fn cell(&self) -> Cell {
        Cell::from_lammps_box(self.bounds.map(|b| b.unwrap_or(DEFAULT_BOUNDS)), self.tilt)
    }
}

fn parse_atom_line(
    fields: &[&str],
    style: AtomStyle,
    atom_types: Option<u32>,
    line: usize,
) -> Result<(u64, Atom), LammpsError> {
    if fields.len() < style.min_fields() {
        return Err(LammpsError::Parse {
            line,
            kind: LammpsParseErrorKind::TooFewFields {
                style,
                expected: style.min_fields(),
                found: fields.len(),
            },
        });
    }
    let id: u64 = parse_field(fields[0], "atom id", line)?;
    let type_id: u32 = parse_field(fields[style.type_column()], "atom type", line)?;
    if type_id == 0 {
        return Err(LammpsError::Parse {
            line,
            kind: LammpsParseErrorKind::InvalidValue {
                field: "atom type",
                value: fields[style.type_column()].to_string(),
            },
        });
    }
    if let Some(declared) = atom_types.filter(|declared| type_id > *declared) {
        return Err(LammpsError::Parse {
            line,
            kind: LammpsParseErrorKind::TypeOutOfRange { type_id, declared },
        });
    }
    let p = style.position_column();
    let x: f64 = parse_field(fields[p], "x", line)?;
    let y: f64 = parse_field(fields[p + 1], "y", line)?;
    let z: f64 = parse_field(fields[p + 2], "z", line)?;
    Ok((
        id,
        Atom::with_type(&type_id.to_string(), Point3::new(x, y, z), type_id),
    ))
}

/// Reader for LAMMPS data files (`read_data` format).
///
/// Only the header, the `Masses` section and the `Atoms` section are interpreted; all other
/// sections are skipped. The resulting structure is fully periodic.
pub struct LammpsDataFile;

impl LammpsDataFile {
    pub fn read_data(
        reader: &mut impl BufRead,
        options: &LammpsReadOptions,
    ) -> Result<LammpsData, LammpsError> {
        let mut header = Header::default();
        let mut section = Section::Header;
        let mut style = options.atom_style.unwrap_or_default();
        let mut masses = BTreeMap::new();
        let mut atoms: Vec<(u64, Atom)> = Vec::new();
        let mut seen_ids = HashSet::new();

        // The first line of a data file is always a title.
        for (line_num, line_res) in reader.lines().enumerate().skip(1) {
            let line = line_res?;
            let line_num = line_num + 1;
            let (content, comment) = strip_comment(&line);
            if content.is_empty() {
                continue;
            }

            if content.starts_with(|c: char| c.is_ascii_alphabetic()) {
                section = match content {
                    "Masses" => Section::Masses,
                    "Atoms" => {
                        if header.atoms.is_none() {
                            return Err(LammpsError::Parse {
                                line: line_num,
                                kind: LammpsParseErrorKind::AtomsBeforeHeader,
                            });
                        }
                        if options.atom_style.is_none() {
                            if let Some(declared) = comment.filter(|c| !c.is_empty()) {
                                style = declared.parse().map_err(|e: UnknownAtomStyle| {
                                    LammpsError::Parse {
                                        line: line_num,
                                        kind: LammpsParseErrorKind::InvalidHeader(e.to_string()),
                                    }
                                })?;
                            }
                        }
                        debug!("Reading Atoms section with atom style '{}'", style);
                        Section::Atoms
                    }
                    other => {
                        debug!("Skipping LAMMPS section '{}'", other);
                        Section::Skipped
                    }
                };
                continue;
            }

            match section {
                Section::Header => header.parse_line(content, line_num)?,
                Section::Masses => {
                    let fields: Vec<&str> = content.split_whitespace().collect();
                    if fields.len() < 2 {
                        return Err(LammpsError::Parse {
                            line: line_num,
                            kind: LammpsParseErrorKind::InvalidHeader(content.to_string()),
                        });
                    }
                    let type_id: u32 = parse_field(fields[0], "atom type", line_num)?;
                    let mass: f64 = parse_field(fields[1], "mass", line_num)?;
                    masses.insert(type_id, mass);
                }
                Section::Atoms => {
                    let fields: Vec<&str> = content.split_whitespace().collect();
                    let (id, atom) = parse_atom_line(&fields, style, header.atom_types, line_num)?;
                    if !seen_ids.insert(id) {
                        return Err(LammpsError::DuplicateAtomId(id));
                    }
                    atoms.push((id, atom));
                }
                Section::Skipped => {}
            }
        }

        let declared = header.atoms.ok_or(LammpsError::MissingHeader("atoms"))?;
        if declared != atoms.len() {
            return Err(LammpsError::AtomCountMismatch {
                declared,
                found: atoms.len(),
            });
        }

        atoms.sort_unstable_by_key(|(id, _)| *id);
        let mut structure = Structure::with_cell(header.cell(), [true; 3]);
        for (_, atom) in atoms {
            structure.push(atom);
        }

        Ok(LammpsData {
            structure,
            masses,
            atom_types: header.atom_types,
            atom_style: style,
        })
    }
}

impl StructureFile for LammpsDataFile {
    type ReadOptions = LammpsReadOptions;
    type Error = LammpsError;

    fn read_from(
        reader: &mut impl BufRead,
        options: &LammpsReadOptions,
    ) -> Result<Structure, Self::Error> {
        Self::read_data(reader, options).map(|data| data.structure)
    }

    fn write_to(_structure: &Structure, _writer: &mut impl Write) -> Result<(), Self::Error> {
        Err(LammpsError::WriteUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::io::{BufReader, Cursor};

    const SODIUM_SILICATE: &str = "\
LAMMPS data file via write_data

4 atoms
3 atom types

0.0 10.0 xlo xhi
0.0 12.0 ylo yhi
-1.0 9.0 zlo zhi

Masses

1 22.98977
2 15.9994
3 28.0855

Atoms # atomic

3 3 5.0 5.0 5.0 0 0 0
1 1 1.0 2.0 3.0 0 0 0
4 2 6.5 5.0 5.0
2 2 1.5 2.0 3.0

Velocities

1 0.0 0.0 0.0
2 0.0 0.0 0.0
3 0.0 0.0 0.0
4 0.0 0.0 0.0
";

    fn read(text: &str, options: LammpsReadOptions) -> Result<LammpsData, LammpsError> {
        let mut reader = BufReader::new(Cursor::new(text.as_bytes()));
        LammpsDataFile::read_data(&mut reader, &options)
    }

    #[test]
    fn reads_atomic_style_sorted_by_id() {
        let data = read(SODIUM_SILICATE, LammpsReadOptions::default()).unwrap();
        let s = &data.structure;

        assert_eq!(data.atom_style, AtomStyle::Atomic);
        assert_eq!(data.atom_types, Some(3));
        assert_eq!(s.len(), 4);
        let types: Vec<_> = s.atoms().iter().map(|a| a.type_id.unwrap()).collect();
        assert_eq!(types, vec![1, 2, 3, 2]);
        assert_eq!(s.symbols().collect::<Vec<_>>(), vec!["1", "2", "3", "2"]);
        assert_eq!(s.atoms()[0].position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(s.atoms()[3].position, Point3::new(6.5, 5.0, 5.0));
        assert_eq!(s.pbc(), [true; 3]);
    }

    #[test]
    fn reads_box_and_masses() {
        let data = read(SODIUM_SILICATE, LammpsReadOptions::default()).unwrap();
        let cell = data.structure.cell().unwrap();
        assert_eq!(cell.lengths(), [10.0, 12.0, 10.0]);
        assert!((cell.volume() - 1200.0).abs() < 1e-9);
        assert_eq!(data.masses.len(), 3);
        assert!((data.masses[&3] - 28.0855).abs() < 1e-12);
    }

    #[test]
    fn reads_full_style_by_default_and_triclinic_tilt() {
        let text = "\
title
2 atoms
1 atom types
0 4 xlo xhi
0 4 ylo yhi
0 4 zlo zhi
1.0 0.0 0.5 xy xz yz

Atoms

1 7 1 -0.8 0.1 0.2 0.3
2 7 1 0.8 1.1 1.2 1.3
";
        let data = read(text, LammpsReadOptions::default()).unwrap();
        assert_eq!(data.atom_style, AtomStyle::Full);
        assert_eq!(data.structure.atoms()[1].position, Point3::new(1.1, 1.2, 1.3));
        let cell = data.structure.cell().unwrap();
        assert_eq!(cell.vector(1), Vector3::new(1.0, 4.0, 0.0));
        assert_eq!(cell.vector(2), Vector3::new(0.0, 0.5, 4.0));
    }

    #[test]
    fn reads_charge_and_molecular_styles() {
        let body = "t\n1 atoms\n0 1 xlo xhi\n0 1 ylo yhi\n0 1 zlo zhi\n\n";
        let charge = format!("{body}Atoms # charge\n\n1 2 -1.2 0.1 0.2 0.3\n");
        let data = read(&charge, LammpsReadOptions::default()).unwrap();
        assert_eq!(data.structure.atoms()[0].type_id, Some(2));
        assert_eq!(data.structure.atoms()[0].position, Point3::new(0.1, 0.2, 0.3));

        let molecular = format!("{body}Atoms # molecular\n\n1 5 3 0.4 0.5 0.6\n");
        let data = read(&molecular, LammpsReadOptions::default()).unwrap();
        assert_eq!(data.structure.atoms()[0].type_id, Some(3));
        assert_eq!(data.structure.atoms()[0].position, Point3::new(0.4, 0.5, 0.6));
    }

    #[test]
    fn explicit_style_overrides_section_comment() {
        let text = "t\n1 atoms\n\nAtoms # full\n\n1 2 0.1 0.2 0.3\n";
        let options = LammpsReadOptions {
            atom_style: Some(AtomStyle::Atomic),
        };
        let data = read(text, options).unwrap();
        assert_eq!(data.atom_style, AtomStyle::Atomic);
        assert_eq!(data.structure.atoms()[0].type_id, Some(2));
    }

    #[test]
    fn missing_bounds_fall_back_to_lammps_default_box() {
        let text = "t\n1 atoms\n\nAtoms # atomic\n\n1 1 0 0 0\n";
        let data = read(text, LammpsReadOptions::default()).unwrap();
        assert!((data.structure.volume().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn atom_count_mismatch_is_an_error() {
        let text = "t\n3 atoms\n\nAtoms # atomic\n\n1 1 0 0 0\n2 1 1 1 1\n";
        let result = read(text, LammpsReadOptions::default());
        assert!(matches!(
            result,
            Err(LammpsError::AtomCountMismatch {
                declared: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn missing_atom_count_is_an_error() {
        let result = read("t\n\nMasses\n\n1 1.0\n", LammpsReadOptions::default());
        assert!(matches!(result, Err(LammpsError::MissingHeader("atoms"))));

        let result = read("t\n\nAtoms # atomic\n\n1 1 0 0 0\n", LammpsReadOptions::default());
        assert!(matches!(
            result,
            Err(LammpsError::Parse {
                line: 3,
                kind: LammpsParseErrorKind::AtomsBeforeHeader
            })
        ));
    }

    #[test]
    fn duplicate_ids_and_bad_fields_are_rejected() {
        let dup = "t\n2 atoms\n\nAtoms # atomic\n\n1 1 0 0 0\n1 1 1 1 1\n";
        assert!(matches!(
            read(dup, LammpsReadOptions::default()),
            Err(LammpsError::DuplicateAtomId(1))
        ));

        let short = "t\n1 atoms\n\nAtoms # full\n\n1 1 1 0.0 0.0\n";
        assert!(matches!(
            read(short, LammpsReadOptions::default()),
            Err(LammpsError::Parse {
                line: 6,
                kind: LammpsParseErrorKind::TooFewFields { expected: 7, found: 5, .. }
            })
        ));

        let bad = "t\n1 atoms\n\nAtoms # atomic\n\n1 1 0.0 abc 0.0\n";
        assert!(matches!(
            read(bad, LammpsReadOptions::default()),
            Err(LammpsError::Parse {
                kind: LammpsParseErrorKind::InvalidValue { field: "y", .. },
                ..
            })
        ));
    }

    #[test]
    fn types_beyond_declared_count_are_rejected() {
        let text = "t\n1 atoms\n2 atom types\n\nAtoms # atomic\n\n1 3 0 0 0\n";
        assert!(matches!(
            read(text, LammpsReadOptions::default()),
            Err(LammpsError::Parse {
                kind: LammpsParseErrorKind::TypeOutOfRange {
                    type_id: 3,
                    declared: 2
                },
                ..
            })
        ));
    }

    #[test]
    fn unknown_style_comment_is_rejected() {
        let text = "t\n1 atoms\n\nAtoms # ellipsoid\n\n1 1 0 0 0\n";
        assert!(read(text, LammpsReadOptions::default()).is_err());
    }

    #[test]
    fn atom_style_parses_case_insensitively() {
        assert_eq!("Atomic".parse::<AtomStyle>(), Ok(AtomStyle::Atomic));
        assert_eq!("FULL".parse::<AtomStyle>(), Ok(AtomStyle::Full));
        assert_eq!(
            "sphere".parse::<AtomStyle>(),
            Err(UnknownAtomStyle("sphere".to_string()))
        );
        assert_eq!(AtomStyle::Molecular.to_string(), "molecular");
    }

    #[test]
    fn structure_file_reader_returns_structure_and_refuses_writing() {
        let mut reader = BufReader::new(Cursor::new(SODIUM_SILICATE.as_bytes()));
        let structure =
            LammpsDataFile::read_from(&mut reader, &LammpsReadOptions::default()).unwrap();
        assert_eq!(structure.len(), 4);

        let mut sink = Vec::new();
        assert!(matches!(
            LammpsDataFile::write_to(&structure, &mut sink),
            Err(LammpsError::WriteUnsupported)
        ));
    }
}
