//! # Workflows Module
//!
//! High-level pipelines that tie the [`core`](crate::core) models and file formats together.
//! Each workflow is a linear read → transform → write pass over files, with progress
//! reporting and a summary of what was produced.
//!
//! - **LAMMPS data conversion** ([`convert_data`]) - Applies a type → element map to a LAMMPS
//!   data file and writes extended XYZ.
//! - **Trajectory conversion** ([`convert_trajectory`]) - Streams a custom multi-frame XYZ file
//!   into the binary trajectory container, remapping placeholder symbols.
//! - **Amorphous silica generation** ([`amorphous`]) - Packs Si and O atoms at random into a
//!   cubic periodic cell sized for a target density.

pub mod amorphous;
pub mod convert_data;
pub mod convert_trajectory;
pub mod error;
pub mod progress;
