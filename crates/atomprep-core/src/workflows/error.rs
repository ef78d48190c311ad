use crate::core::io::extxyz::ExtXyzError;
use crate::core::io::lammps::LammpsError;
use crate::core::io::trajectory::TrajectoryError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to read LAMMPS data: {0}")]
    Lammps(#[from] LammpsError),

    #[error("Failed to process extended XYZ: {0}")]
    ExtXyz(#[from] ExtXyzError),

    #[error("Trajectory error: {0}")]
    Trajectory(#[from] TrajectoryError),

    #[error("Failed to read '{path}': {source}", path = path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Atom type(s) {} not defined in the type map. Add an element symbol for every atom type present in the data file",
        join_ids(.0)
    )]
    UnmappedTypes(Vec<u32>),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Element '{0}' is missing from the element table")]
    UnknownElement(String),
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
