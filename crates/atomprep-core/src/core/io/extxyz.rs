use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::cell::Cell;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtXyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ExtXyzParseErrorKind },
    #[error("Unexpected end of file: expected {expected} atom lines, found {found}")]
    UnexpectedEof { expected: usize, found: usize },
    #[error("Cannot write atom symbol '{0}': symbols must be non-empty and contain no whitespace")]
    InvalidSymbol(String),
}

#[derive(Debug, Error)]
pub enum ExtXyzParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidAtomCount(String),
    #[error("Missing comment line")]
    MissingCommentLine,
    #[error("Unterminated quoted value for key '{0}'")]
    UnterminatedQuote(String),
    #[error("Invalid Lattice value '{0}': expected 9 numbers")]
    InvalidLattice(String),
    #[error("Invalid pbc value '{0}'")]
    InvalidPbc(String),
    #[error("Invalid Properties value '{0}'")]
    InvalidProperties(String),
    #[error("Properties must declare 'species:S:1' and 'pos:R:3'")]
    MissingRequiredProperty,
    #[error("Expected {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
    #[error("Invalid {kind} value '{value}' in column '{column}'")]
    InvalidValue {
        column: String,
        kind: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    kind: char,
    count: usize,
}

#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    species: usize,
    pos: usize,
    type_id: Option<usize>,
    width: usize,
}

fn parse_error(line: usize, kind: ExtXyzParseErrorKind) -> ExtXyzError {
    ExtXyzError::Parse { line, kind }
}

/// Splits an extended XYZ comment line into `key=value` pairs.
///
/// Keys are lowercased. Values may be wrapped in double quotes to include whitespace. A bare key
/// without `=` is recorded with the value `T`.
fn parse_comment(comment: &str, line: usize) -> Result<HashMap<String, String>, ExtXyzError> {
    let mut pairs = HashMap::new();
    let mut chars = comment.trim().chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }

        if chars.next_if_eq(&'=').is_none() {
            pairs.insert(key.to_lowercase(), "T".to_string());
            continue;
        }

        let mut value = String::new();
        if chars.next_if_eq(&'"').is_some() {
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(c) => value.push(c),
                    None => {
                        return Err(parse_error(
                            line,
                            ExtXyzParseErrorKind::UnterminatedQuote(key),
                        ));
                    }
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                value.push(c);
            }
        }
        pairs.insert(key.to_lowercase(), value);
    }

    Ok(pairs)
}

fn parse_lattice(value: &str, line: usize) -> Result<Cell, ExtXyzError> {
    let invalid = || parse_error(line, ExtXyzParseErrorKind::InvalidLattice(value.into()));
    let numbers: Vec<f64> = value
        .split_whitespace()
        .map(|s| s.parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid())?;
    let values: [f64; 9] = numbers.try_into().map_err(|_| invalid())?;
    Ok(Cell::from_row_major(values))
}

fn parse_pbc(value: &str, line: usize) -> Result<[bool; 3], ExtXyzError> {
    let flags: Vec<bool> = value
        .split_whitespace()
        .map(|s| match s {
            "T" | "t" | "True" | "true" | "1" => Some(true),
            "F" | "f" | "False" | "false" | "0" => Some(false),
            _ => None,
        })
        .collect::<Option<_>>()
        .ok_or_else(|| parse_error(line, ExtXyzParseErrorKind::InvalidPbc(value.into())))?;
    flags
        .try_into()
        .map_err(|_| parse_error(line, ExtXyzParseErrorKind::InvalidPbc(value.into())))
}

fn parse_properties(value: &str, line: usize) -> Result<Vec<Column>, ExtXyzError> {
    let invalid = || parse_error(line, ExtXyzParseErrorKind::InvalidProperties(value.into()));
    let parts: Vec<&str> = value.split(':').collect();
    if parts.is_empty() || parts.len() % 3 != 0 {
        return Err(invalid());
    }
    parts
        .chunks(3)
        .map(|chunk| {
            let kind = match chunk[1] {
                "S" | "R" | "I" | "L" => chunk[1].chars().next().ok_or_else(invalid)?,
                _ => return Err(invalid()),
            };
            let count = chunk[2].parse::<usize>().map_err(|_| invalid())?;
            Ok(Column {
                name: chunk[0].to_string(),
                kind,
                count,
            })
        })
        .collect()
}

fn layout(columns: &[Column], line: usize) -> Result<ColumnLayout, ExtXyzError> {
    let mut offset = 0;
    let mut species = None;
    let mut pos = None;
    let mut type_id = None;
    for column in columns {
        match (column.name.as_str(), column.kind, column.count) {
            ("species", 'S', 1) => species = Some(offset),
            ("pos", 'R', 3) => pos = Some(offset),
            ("type", 'I', 1) => type_id = Some(offset),
            _ => {}
        }
        offset += column.count;
    }
    match (species, pos) {
        (Some(species), Some(pos)) => Ok(ColumnLayout {
            species,
            pos,
            type_id,
            width: offset,
        }),
        _ => Err(parse_error(
            line,
            ExtXyzParseErrorKind::MissingRequiredProperty,
        )),
    }
}

fn parse_atom(fields: &[&str], layout: &ColumnLayout, line: usize) -> Result<Atom, ExtXyzError> {
    if fields.len() < layout.width {
        return Err(parse_error(
            line,
            ExtXyzParseErrorKind::TooFewColumns {
                expected: layout.width,
                found: fields.len(),
            },
        ));
    }
    let real = |i: usize| {
        fields[i].parse::<f64>().map_err(|_| {
            parse_error(
                line,
                ExtXyzParseErrorKind::InvalidValue {
                    column: "pos".into(),
                    kind: "real",
                    value: fields[i].into(),
                },
            )
        })
    };
    let position = Point3::new(
        real(layout.pos)?,
        real(layout.pos + 1)?,
        real(layout.pos + 2)?,
    );
    let symbol = fields[layout.species];
    match layout.type_id {
        Some(i) => {
            let type_id = fields[i].parse::<u32>().map_err(|_| {
                parse_error(
                    line,
                    ExtXyzParseErrorKind::InvalidValue {
                        column: "type".into(),
                        kind: "integer",
                        value: fields[i].into(),
                    },
                )
            })?;
            Ok(Atom::with_type(symbol, position, type_id))
        }
        None => Ok(Atom::new(symbol, position)),
    }
}

fn format_flag(flag: bool) -> &'static str {
    if flag { "T" } else { "F" }
}

/// Extended XYZ format, as used by ASE and many other atomistic tools.
///
/// The writer emits the `Lattice`, `Properties` and `pbc` keys. A `type` column is added when
/// every atom carries a LAMMPS type id. The reader accepts the species/pos columns (plus an
/// optional integer `type` column) and skips any other declared per-atom columns.
pub struct ExtXyzFile;

impl StructureFile for ExtXyzFile {
    type ReadOptions = ();
    type Error = ExtXyzError;

    fn read_from(reader: &mut impl BufRead, _options: &()) -> Result<Structure, Self::Error> {
        let mut lines = reader.lines();

        let count_line = lines.next().transpose()?.unwrap_or_default();
        let natoms: usize = count_line.trim().parse().map_err(|_| {
            parse_error(
                1,
                ExtXyzParseErrorKind::InvalidAtomCount(count_line.trim().into()),
            )
        })?;

        let comment = lines
            .next()
            .transpose()?
            .ok_or_else(|| parse_error(2, ExtXyzParseErrorKind::MissingCommentLine))?;
        let pairs = parse_comment(&comment, 2)?;

        let columns = match pairs.get("properties") {
            Some(value) => parse_properties(value, 2)?,
            None => parse_properties("species:S:1:pos:R:3", 2)?,
        };
        let layout = layout(&columns, 2)?;
        let cell = pairs
            .get("lattice")
            .map(|value| parse_lattice(value, 2))
            .transpose()?;
        let pbc = match pairs.get("pbc") {
            Some(value) => parse_pbc(value, 2)?,
            None => [cell.is_some(); 3],
        };

        let mut structure = match cell {
            Some(cell) => Structure::with_cell(cell, pbc),
            None => {
                let mut s = Structure::new();
                s.set_pbc(pbc);
                s
            }
        };

        for i in 0..natoms {
            let line_num = i + 3;
            let Some(line) = lines.next().transpose()? else {
                return Err(ExtXyzError::UnexpectedEof {
                    expected: natoms,
                    found: i,
                });
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            structure.push(parse_atom(&fields, &layout, line_num)?);
        }

        Ok(structure)
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        if let Some(bad) = structure
            .symbols()
            .find(|s| s.is_empty() || s.contains(char::is_whitespace))
        {
            return Err(ExtXyzError::InvalidSymbol(bad.to_string()));
        }

        let with_types =
            !structure.is_empty() && structure.atoms().iter().all(|a| a.type_id.is_some());

        writeln!(writer, "{}", structure.len())?;

        let mut comment = Vec::new();
        if let Some(cell) = structure.cell() {
            let lattice: Vec<String> = cell.to_row_major().iter().map(|v| v.to_string()).collect();
            comment.push(format!("Lattice=\"{}\"", lattice.join(" ")));
        }
        let properties = if with_types {
            "species:S:1:pos:R:3:type:I:1"
        } else {
            "species:S:1:pos:R:3"
        };
        comment.push(format!("Properties={}", properties));
        let [px, py, pz] = structure.pbc();
        comment.push(format!(
            "pbc=\"{} {} {}\"",
            format_flag(px),
            format_flag(py),
            format_flag(pz)
        ));
        writeln!(writer, "{}", comment.join(" "))?;

        for atom in structure.atoms() {
            let p = &atom.position;
            write!(
                writer,
                "{:<2} {:>16.8} {:>16.8} {:>16.8}",
                atom.symbol, p.x, p.y, p.z
            )?;
            match atom.type_id {
                Some(type_id) if with_types => writeln!(writer, " {:>8}", type_id)?,
                _ => writeln!(writer)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn write_to_string(structure: &Structure) -> String {
        let mut buffer = Vec::new();
        ExtXyzFile::write_to(structure, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn read_from_str(text: &str) -> Result<Structure, ExtXyzError> {
        let mut reader = BufReader::new(Cursor::new(text.as_bytes()));
        ExtXyzFile::read_from(&mut reader, &())
    }

    fn silica_pair() -> Structure {
        let mut s = Structure::with_cell(Cell::cubic(5.0), [true; 3]);
        s.push(Atom::new("Si", Point3::new(0.0, 0.0, 0.0)));
        s.push(Atom::new("O", Point3::new(1.6, 0.0, 0.0)));
        s
    }

    #[test]
    fn writer_emits_lattice_properties_and_pbc() {
        let text = write_to_string(&silica_pair());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "2");
        assert_eq!(
            lines[1],
            "Lattice=\"5 0 0 0 5 0 0 0 5\" Properties=species:S:1:pos:R:3 pbc=\"T T T\""
        );
        assert_eq!(
            lines[2],
            "Si       0.00000000       0.00000000       0.00000000"
        );
        assert!(lines[3].starts_with("O "));
        assert!(lines[3].contains("1.60000000"));
    }

    #[test]
    fn writer_adds_type_column_when_all_atoms_are_typed() {
        let mut s = Structure::with_cell(Cell::cubic(2.0), [true; 3]);
        s.push(Atom::with_type("Na", Point3::origin(), 1));
        s.push(Atom::with_type("O", Point3::new(1.0, 1.0, 1.0), 2));
        let text = write_to_string(&s);

        assert!(text.contains("Properties=species:S:1:pos:R:3:type:I:1"));
        let last = text.lines().last().unwrap();
        assert!(last.ends_with(" 2"));
    }

    #[test]
    fn writer_omits_lattice_without_cell() {
        let s = Structure::from_atoms(vec![Atom::new("H", Point3::origin())]);
        let text = write_to_string(&s);
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "Properties=species:S:1:pos:R:3 pbc=\"F F F\""
        );
    }

    #[test]
    fn writer_rejects_symbols_with_whitespace() {
        let s = Structure::from_atoms(vec![Atom::new("S i", Point3::origin())]);
        let mut buffer = Vec::new();
        let result = ExtXyzFile::write_to(&s, &mut buffer);
        assert!(matches!(result, Err(ExtXyzError::InvalidSymbol(_))));
    }

    #[test]
    fn written_structure_reads_back() {
        let mut original = silica_pair();
        original.set_cell(Some(Cell::from_lammps_box(
            [(0.0, 5.0), (0.0, 6.0), (0.0, 7.0)],
            [0.5, 0.0, -0.25],
        )));
        original.set_pbc([true, true, false]);

        let parsed = read_from_str(&write_to_string(&original)).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.symbols().collect::<Vec<_>>(), vec!["Si", "O"]);
        assert_eq!(parsed.pbc(), [true, true, false]);
        assert_eq!(parsed.cell(), original.cell());
        assert!((parsed.atoms()[1].position - original.atoms()[1].position).norm() < 1e-8);
    }

    #[test]
    fn reader_accepts_plain_xyz() {
        let parsed = read_from_str("2\nwater fragment\nO 0 0 0\nH 0.96 0 0\n").unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed.cell().is_none());
        assert_eq!(parsed.pbc(), [false; 3]);
    }

    #[test]
    fn reader_skips_unknown_columns_and_reads_types() {
        let text = "\
1
Properties=species:S:1:mass:R:1:pos:R:3:type:I:1 Lattice=\"3 0 0 0 3 0 0 0 3\"
Si 28.085 1.0 2.0 3.0 7
";
        let parsed = read_from_str(text).unwrap();
        let atom = &parsed.atoms()[0];
        assert_eq!(atom.symbol, "Si");
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.type_id, Some(7));
        assert_eq!(parsed.pbc(), [true; 3]);
    }

    #[test]
    fn reader_reports_line_numbers_for_bad_values() {
        let result = read_from_str("2\n\nO 0 0 0\nH 0.96 zero 0\n");
        assert!(matches!(
            result,
            Err(ExtXyzError::Parse {
                line: 4,
                kind: ExtXyzParseErrorKind::InvalidValue { .. }
            })
        ));
    }

    #[test]
    fn reader_reports_bad_count_and_truncation() {
        assert!(matches!(
            read_from_str("abc\n\n"),
            Err(ExtXyzError::Parse {
                line: 1,
                kind: ExtXyzParseErrorKind::InvalidAtomCount(_)
            })
        ));
        assert!(matches!(
            read_from_str("3\n\nO 0 0 0\n"),
            Err(ExtXyzError::UnexpectedEof {
                expected: 3,
                found: 1
            })
        ));
    }

    #[test]
    fn comment_parser_handles_quotes_and_bare_flags() {
        let pairs = parse_comment("Lattice=\"1 0 0 0 1 0 0 0 1\" energy=-1.5 relaxed", 2).unwrap();
        assert_eq!(pairs["lattice"], "1 0 0 0 1 0 0 0 1");
        assert_eq!(pairs["energy"], "-1.5");
        assert_eq!(pairs["relaxed"], "T");

        let err = parse_comment("Lattice=\"1 0 0", 2).unwrap_err();
        assert!(matches!(
            err,
            ExtXyzError::Parse {
                kind: ExtXyzParseErrorKind::UnterminatedQuote(_),
                ..
            }
        ));
    }

    #[test]
    fn invalid_lattice_and_pbc_are_rejected() {
        assert!(parse_lattice("1 2 3", 2).is_err());
        assert!(parse_lattice("1 0 0 0 1 0 0 0 x", 2).is_err());
        assert!(parse_pbc("T T", 2).is_err());
        assert!(parse_pbc("T maybe F", 2).is_err());
        assert_eq!(parse_pbc("T F T", 2).unwrap(), [true, false, true]);
    }
}
