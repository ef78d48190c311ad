use super::error::WorkflowError;
use crate::core::io::extxyz::ExtXyzFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::cell::Cell;
use crate::core::models::structure::{ANGSTROM3_PER_CM3, AVOGADRO, Structure};
use crate::core::utils::elements;
use nalgebra::Vector3;
use rand::prelude::*;
use std::path::Path;
use tracing::{debug, info, instrument};

pub const DEFAULT_DENSITY_G_CM3: f64 = 2.2;
pub const DEFAULT_NUM_SI: usize = 100;

const SILICON: &str = "Si";
const OXYGEN: &str = "O";

#[derive(Debug, Clone, PartialEq)]
pub struct AmorphousConfig {
    pub density_g_cm3: f64,
    pub num_si: usize,
    /// Seed for reproducible placement. Drawn from the OS when `None`.
    pub seed: Option<u64>,
}

impl Default for AmorphousConfig {
    fn default() -> Self {
        Self {
            density_g_cm3: DEFAULT_DENSITY_G_CM3,
            num_si: DEFAULT_NUM_SI,
            seed: None,
        }
    }
}

impl AmorphousConfig {
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if !self.density_g_cm3.is_finite() || self.density_g_cm3 <= 0.0 {
            return Err(WorkflowError::InvalidParameter {
                name: "density",
                reason: format!(
                    "must be a positive number of g/cm^3, got {}",
                    self.density_g_cm3
                ),
            });
        }
        if self.num_si == 0 {
            return Err(WorkflowError::InvalidParameter {
                name: "num-si",
                reason: "at least one Si atom is required".to_string(),
            });
        }
        self.atom_counts()?;
        Ok(())
    }

    /// Returns the O and total atom counts for `num_si` Si atoms.
    fn atom_counts(&self) -> Result<(usize, usize), WorkflowError> {
        let num_o = self.num_si.checked_mul(2);
        let total = num_o.and_then(|o| o.checked_add(self.num_si));
        match (num_o, total) {
            (Some(num_o), Some(total)) => Ok((num_o, total)),
            _ => Err(WorkflowError::InvalidParameter {
                name: "num-si",
                reason: format!("{} Si atoms overflow the total atom count", self.num_si),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmorphousSummary {
    pub target_density: f64,
    pub num_si: usize,
    pub num_o: usize,
    pub total_atoms: usize,
    /// Edge length of the cubic cell in Angstroms.
    pub cell_length: f64,
    /// Cell volume in cubic Angstroms.
    pub cell_volume: f64,
    /// Density recomputed from the generated cell.
    pub actual_density: f64,
}

fn element_mass(symbol: &str) -> Result<f64, WorkflowError> {
    elements::atomic_mass(symbol).ok_or_else(|| WorkflowError::UnknownElement(symbol.to_string()))
}

/// Places `num_si` Si and `2 * num_si` O atoms uniformly at random in a cubic periodic cell
/// whose volume gives the requested density. Si atoms come first.
#[instrument(level = "debug", skip_all, fields(num_si = config.num_si))]
pub fn generate(
    config: &AmorphousConfig,
    rng: &mut impl Rng,
) -> Result<(Structure, AmorphousSummary), WorkflowError> {
    config.validate()?;

    let num_si = config.num_si;
    let (num_o, total_atoms) = config.atom_counts()?;

    let total_mass_u =
        num_si as f64 * element_mass(SILICON)? + num_o as f64 * element_mass(OXYGEN)?;
    let total_mass_g = total_mass_u / AVOGADRO;
    let volume_a3 = total_mass_g / config.density_g_cm3 * ANGSTROM3_PER_CM3;
    let cell_length = volume_a3.cbrt();
    debug!(
        "Total mass {:.3} u gives a cubic cell of {:.3} A",
        total_mass_u, cell_length
    );

    let cell = Cell::cubic(cell_length);
    let mut structure = Structure::with_cell(cell, [true; 3]);
    let symbols = std::iter::repeat_n(SILICON, num_si).chain(std::iter::repeat_n(OXYGEN, num_o));
    for symbol in symbols {
        let fractional = Vector3::new(rng.r#gen::<f64>(), rng.r#gen::<f64>(), rng.r#gen::<f64>());
        structure.push(Atom::new(symbol, cell.to_cartesian(&fractional)));
    }

    let cell_volume = cell.volume();
    let actual_density = total_mass_g / (cell_volume / ANGSTROM3_PER_CM3);

    let summary = AmorphousSummary {
        target_density: config.density_g_cm3,
        num_si,
        num_o,
        total_atoms,
        cell_length,
        cell_volume,
        actual_density,
    };
    Ok((structure, summary))
}

/// Generates a random SiO2 structure and writes it to `output` as extended XYZ.
#[instrument(skip_all, name = "amorphous_sio2_workflow")]
pub fn run(config: &AmorphousConfig, output: &Path) -> Result<AmorphousSummary, WorkflowError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (structure, summary) = generate(config, &mut rng)?;
    ExtXyzFile::write_to_path(&structure, output)?;
    info!(
        "Saved {} atoms ({:.3} g/cm^3) to '{}'",
        summary.total_atoms,
        summary.actual_density,
        output.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn composition_is_one_silicon_to_two_oxygen_with_silicon_first() {
        let config = AmorphousConfig {
            num_si: 4,
            ..Default::default()
        };
        let (structure, summary) = generate(&config, &mut seeded(1)).unwrap();

        assert_eq!(summary.num_o, 8);
        assert_eq!(summary.total_atoms, 12);
        assert_eq!(structure.len(), 12);
        let symbols: Vec<_> = structure.symbols().collect();
        assert!(symbols[..4].iter().all(|s| *s == "Si"));
        assert!(symbols[4..].iter().all(|s| *s == "O"));
        assert_eq!(structure.pbc(), [true; 3]);
    }

    #[test]
    fn default_cell_matches_silica_density() {
        let (structure, summary) = generate(&AmorphousConfig::default(), &mut seeded(7)).unwrap();

        // 100 SiO2 units: 6008.3 u at 2.2 g/cm^3.
        let expected_volume = 6008.3 / AVOGADRO / 2.2 * 1e24;
        assert!((summary.cell_volume - expected_volume).abs() < 1e-6);
        assert!((summary.cell_length - expected_volume.cbrt()).abs() < 1e-9);
        assert!((summary.cell_length - 16.55).abs() < 0.01);
        assert!((summary.actual_density - 2.2).abs() < 1e-9);
        assert!((structure.density_g_cm3().unwrap() - 2.2).abs() < 1e-9);
    }

    #[test]
    fn atoms_lie_inside_the_cell() {
        let (structure, summary) = generate(&AmorphousConfig::default(), &mut seeded(3)).unwrap();
        for p in structure.positions() {
            for c in [p.x, p.y, p.z] {
                assert!((0.0..summary.cell_length).contains(&c));
            }
        }
    }

    #[test]
    fn same_seed_gives_same_structure() {
        let config = AmorphousConfig::default();
        let (a, _) = generate(&config, &mut seeded(42)).unwrap();
        let (b, _) = generate(&config, &mut seeded(42)).unwrap();
        let (c, _) = generate(&config, &mut seeded(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        for density in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = AmorphousConfig {
                density_g_cm3: density,
                ..Default::default()
            };
            let err = generate(&config, &mut seeded(0)).unwrap_err();
            assert!(matches!(
                err,
                WorkflowError::InvalidParameter { name: "density", .. }
            ));
        }

        let config = AmorphousConfig {
            num_si: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WorkflowError::InvalidParameter { name: "num-si", .. })
        ));
    }

    #[test]
    fn oversized_silicon_count_is_rejected_before_generation() {
        let config = AmorphousConfig {
            num_si: usize::MAX / 2 + 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WorkflowError::InvalidParameter { name: "num-si", .. })
        ));
        let err = generate(&config, &mut seeded(0)).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidParameter { name: "num-si", .. }
        ));

        let config = AmorphousConfig {
            num_si: usize::MAX / 3 + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn run_writes_a_readable_extended_xyz_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("random_sio2.xyz");
        let config = AmorphousConfig {
            num_si: 10,
            seed: Some(5),
            ..Default::default()
        };

        let summary = run(&config, &output).unwrap();
        let written = ExtXyzFile::read_from_path(&output).unwrap();

        assert_eq!(written.len(), summary.total_atoms);
        assert_eq!(written.pbc(), [true; 3]);
        let length = written.cell().unwrap().lengths()[0];
        assert!((length - summary.cell_length).abs() < 1e-6);
    }
}
