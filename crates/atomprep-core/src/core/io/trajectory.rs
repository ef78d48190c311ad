//! Binary trajectory container.
//!
//! A compact, append-only file holding an ordered sequence of structures. All numbers are
//! little-endian:
//!
//! ```text
//! header:  b"ATRJ"  u32 version
//! frame:   u32 natoms
//!          natoms × (u8 len, len bytes UTF-8 symbol)
//!          natoms × 3 × f64 positions
//!          u8 flags (bit 0: cell present, bits 1..=3: pbc x, y, z)
//!          [9 × f64 cell, row-major, if bit 0 is set]
//! footer:  u32::MAX
//! ```
//!
//! The footer is only written by [`TrajectoryWriter::close`]; readers treat a file without it
//! as incomplete.

use crate::core::models::atom::Atom;
use crate::core::models::cell::Cell;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const MAGIC: [u8; 4] = *b"ATRJ";
pub const FORMAT_VERSION: u32 = 1;
const END_MARKER: u32 = u32::MAX;

const FLAG_CELL: u8 = 0b0001;
const FLAG_PBC_SHIFT: u8 = 1;

#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Not a trajectory file: invalid magic bytes {0:?}")]
    InvalidMagic([u8; 4]),
    #[error("Unsupported trajectory format version {0} (supported: {FORMAT_VERSION})")]
    UnsupportedVersion(u32),
    #[error("Atom symbol '{0}' is longer than 255 bytes")]
    SymbolTooLong(String),
    #[error("Frame has {0} atoms, which exceeds the container limit")]
    TooManyAtoms(usize),
    #[error("Atom symbol is not valid UTF-8")]
    InvalidSymbol,
    #[error("Trajectory ended unexpectedly after {frames} complete frame(s)")]
    UnexpectedEof { frames: usize },
}

/// A sink that persists structures, one frame at a time, in call order.
///
/// Writers are opened before the first frame and must be closed explicitly once the last frame
/// has been written, even if no frame was written at all.
pub trait TrajectoryWriter {
    /// Appends one frame.
    fn write(&mut self, structure: &Structure) -> Result<(), TrajectoryError>;

    /// Number of frames written so far.
    fn frames_written(&self) -> usize;

    /// Finalizes the container and returns the total number of frames written.
    fn close(self) -> Result<usize, TrajectoryError>
    where
        Self: Sized;
}

/// Writer for the binary container format described in the [module docs](self).
#[derive(Debug)]
pub struct BinaryTrajectoryWriter<W: Write> {
    inner: W,
    frames: usize,
}

impl BinaryTrajectoryWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and writes the container header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, TrajectoryError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> BinaryTrajectoryWriter<W> {
    pub fn new(mut inner: W) -> Result<Self, TrajectoryError> {
        inner.write_all(&MAGIC)?;
        inner.write_all(&FORMAT_VERSION.to_le_bytes())?;
        Ok(Self { inner, frames: 0 })
    }

    /// Consumes the writer without writing the footer and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn encode_frame(structure: &Structure) -> Result<Vec<u8>, TrajectoryError> {
        let natoms = u32::try_from(structure.len())
            .ok()
            .filter(|n| *n != END_MARKER)
            .ok_or(TrajectoryError::TooManyAtoms(structure.len()))?;

        let mut buf = Vec::with_capacity(4 + structure.len() * (3 * 8 + 3) + 1 + 9 * 8);
        buf.extend_from_slice(&natoms.to_le_bytes());
        for symbol in structure.symbols() {
            let len = u8::try_from(symbol.len())
                .map_err(|_| TrajectoryError::SymbolTooLong(symbol.to_string()))?;
            buf.push(len);
            buf.extend_from_slice(symbol.as_bytes());
        }
        for p in structure.positions() {
            for value in [p.x, p.y, p.z] {
                buf.extend_from_slice(&value.to_le_bytes());
            }
        }

        let mut flags = 0u8;
        if structure.cell().is_some() {
            flags |= FLAG_CELL;
        }
        for (axis, periodic) in structure.pbc().into_iter().enumerate() {
            if periodic {
                flags |= 1 << (FLAG_PBC_SHIFT + axis as u8);
            }
        }
        buf.push(flags);
        if let Some(cell) = structure.cell() {
            for value in cell.to_row_major() {
                buf.extend_from_slice(&value.to_le_bytes());
            }
        }
        Ok(buf)
    }
}

impl<W: Write> TrajectoryWriter for BinaryTrajectoryWriter<W> {
    fn write(&mut self, structure: &Structure) -> Result<(), TrajectoryError> {
        let frame = Self::encode_frame(structure)?;
        self.inner.write_all(&frame)?;
        self.frames += 1;
        Ok(())
    }

    fn frames_written(&self) -> usize {
        self.frames
    }

    fn close(mut self) -> Result<usize, TrajectoryError> {
        self.inner.write_all(&END_MARKER.to_le_bytes())?;
        self.inner.flush()?;
        debug!("Closed trajectory after {} frame(s)", self.frames);
        Ok(self.frames)
    }
}

/// Reader for the binary container format, yielding one [`Structure`] per frame.
#[derive(Debug)]
pub struct BinaryTrajectoryReader<R: Read> {
    inner: R,
    frames: usize,
    finished: bool,
}

impl BinaryTrajectoryReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TrajectoryError> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

fn read_array<const N: usize>(reader: &mut impl Read) -> io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

impl<R: Read> BinaryTrajectoryReader<R> {
    /// Wraps `inner` after validating the container header.
    pub fn new(mut inner: R) -> Result<Self, TrajectoryError> {
        let magic = read_array::<4>(&mut inner)?;
        if magic != MAGIC {
            return Err(TrajectoryError::InvalidMagic(magic));
        }
        let version = u32::from_le_bytes(read_array(&mut inner)?);
        if version != FORMAT_VERSION {
            return Err(TrajectoryError::UnsupportedVersion(version));
        }
        Ok(Self {
            inner,
            frames: 0,
            finished: false,
        })
    }

    /// Number of frames read so far.
    pub fn frames_read(&self) -> usize {
        self.frames
    }

    fn eof_to_truncation(&self, err: io::Error) -> TrajectoryError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            TrajectoryError::UnexpectedEof {
                frames: self.frames,
            }
        } else {
            TrajectoryError::Io(err)
        }
    }

    fn read_f64(&mut self) -> Result<f64, TrajectoryError> {
        read_array(&mut self.inner)
            .map(f64::from_le_bytes)
            .map_err(|e| self.eof_to_truncation(e))
    }

    /// Reads the next frame, or `None` at the end-of-trajectory marker.
    pub fn read_frame(&mut self) -> Result<Option<Structure>, TrajectoryError> {
        if self.finished {
            return Ok(None);
        }
        let natoms = read_array(&mut self.inner)
            .map(u32::from_le_bytes)
            .map_err(|e| self.eof_to_truncation(e))?;
        if natoms == END_MARKER {
            self.finished = true;
            return Ok(None);
        }
        let natoms = natoms as usize;

        let mut symbols = Vec::with_capacity(natoms.min(1 << 16));
        for _ in 0..natoms {
            let [len] = read_array::<1>(&mut self.inner).map_err(|e| self.eof_to_truncation(e))?;
            let mut bytes = vec![0u8; len as usize];
            self.inner
                .read_exact(&mut bytes)
                .map_err(|e| self.eof_to_truncation(e))?;
            symbols.push(String::from_utf8(bytes).map_err(|_| TrajectoryError::InvalidSymbol)?);
        }

        let mut atoms = Vec::with_capacity(symbols.len());
        for symbol in &symbols {
            let position = Point3::new(self.read_f64()?, self.read_f64()?, self.read_f64()?);
            atoms.push(Atom::new(symbol, position));
        }

        let [flags] = read_array::<1>(&mut self.inner).map_err(|e| self.eof_to_truncation(e))?;
        let pbc = [0u8, 1, 2].map(|axis| flags & (1 << (FLAG_PBC_SHIFT + axis)) != 0);
        let mut structure = Structure::from_atoms(atoms);
        structure.set_pbc(pbc);
        if flags & FLAG_CELL != 0 {
            let mut values = [0.0; 9];
            for value in &mut values {
                *value = self.read_f64()?;
            }
            structure.set_cell(Some(Cell::from_row_major(values)));
        }

        self.frames += 1;
        Ok(Some(structure))
    }
}

impl<R: Read> Iterator for BinaryTrajectoryReader<R> {
    type Item = Result<Structure, TrajectoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Ok(frame) => frame.map(Ok),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
