//! # Core Models Module
//!
//! Data structures used to represent atomic configurations throughout atomprep.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom: element symbol, Cartesian position and optional LAMMPS type
//! - [`cell`] - Periodic simulation cell defined by three lattice vectors
//! - [`structure`] - An ordered collection of atoms with optional cell and periodicity
//!
//! ## Usage
//!
//! ```
//! use atomprep::core::models::{atom::Atom, cell::Cell, structure::Structure};
//! use nalgebra::Point3;
//!
//! let mut structure = Structure::with_cell(Cell::cubic(10.0), [true; 3]);
//! structure.push(Atom::new("Si", Point3::new(0.0, 0.0, 0.0)));
//! assert_eq!(structure.len(), 1);
//! ```

pub mod atom;
pub mod cell;
pub mod structure;
