//! # Core Module
//!
//! The building blocks every workflow in atomprep relies on.
//!
//! ## Architecture
//!
//! - **Structural Representation** ([`models`]) - Atoms, periodic cells and structure records
//! - **Chemical Data** ([`utils`]) - Static element table with atomic numbers and masses
//! - **Label Translation** ([`mapping`]) - Placeholder-symbol and LAMMPS-type lookup tables
//! - **File I/O** ([`io`]) - Readers and writers for the supported file formats

pub mod io;
pub mod mapping;
pub mod models;
pub mod utils;
