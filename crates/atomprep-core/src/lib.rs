//! # atomprep Core Library
//!
//! Utilities for preparing atomic-structure data for molecular-simulation workflows.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers with a clear separation of concerns.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Cell`), the static
//!   element table, symbol/type mapping tables, and the file-format readers and writers
//!   (extended XYZ, LAMMPS data, custom multi-frame XYZ, binary trajectory container).
//!
//! - **[`workflows`]: The Public API.** Complete read → transform → write pipelines built on
//!   top of `core`: converting LAMMPS data to extended XYZ, converting a custom XYZ trajectory
//!   into a binary trajectory, and generating a random amorphous silica structure.

pub mod core;
pub mod workflows;
