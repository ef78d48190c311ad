//! Provides input/output functionality for atomic-structure file formats.
//!
//! Single-structure formats implement the [`traits::StructureFile`] trait. Multi-frame data
//! goes through the streaming [`frames::FrameExtractor`] on input and the
//! [`trajectory::TrajectoryWriter`] capability on output.

pub mod extxyz;
pub mod frames;
pub mod lammps;
pub mod traits;
pub mod trajectory;
