//! Streaming parser for custom multi-frame XYZ trajectories.
//!
//! A frame is an atom count `N` on its own line, one free-form label line, and `N` atom lines of
//! the form `SYMBOL X Y Z [extra...]`. Frames follow one another without separators.
//!
//! Parsing is best-effort: the extractor yields every frame up to the first one that cannot be
//! read completely and then stops without raising an error. What stopped it is available
//! afterwards through [`FrameExtractor::termination`], which leaves the yielded sequence
//! untouched.

use crate::core::mapping::SymbolMap;
use crate::core::models::atom::Atom;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::Path;
use tracing::{debug, trace};

/// Why a [`FrameExtractor`] stopped producing frames. Line numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// All input was consumed (only blank lines, if anything, remained).
    EndOfInput,
    /// The line where a frame header was expected is not a non-negative integer.
    InvalidHeader { line: usize },
    /// The header declared more atoms than there are lines left in the input.
    TruncatedFrame {
        line: usize,
        declared: usize,
        available: usize,
    },
    /// An atom line lacks a symbol or three numeric coordinates.
    MalformedRecord { line: usize },
}

impl Termination {
    /// Returns `true` if extraction ended because the input ran out, not because of bad data.
    pub fn is_clean(&self) -> bool {
        matches!(self, Termination::EndOfInput)
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::EndOfInput => write!(f, "end of input"),
            Termination::InvalidHeader { line } => {
                write!(f, "line {line}: expected an atom count")
            }
            Termination::TruncatedFrame {
                line,
                declared,
                available,
            } => write!(
                f,
                "line {line}: frame declares {declared} atoms but only {available} lines remain"
            ),
            Termination::MalformedRecord { line } => {
                write!(f, "line {line}: expected 'SYMBOL X Y Z'")
            }
        }
    }
}

/// Lazy, forward-only iterator over the frames of a custom XYZ buffer.
///
/// Each item is one [`Structure`] holding the frame's atoms in file order, with symbols
/// translated through the [`SymbolMap`]. Frames carry no cell. Once the iterator returns `None`
/// it stays exhausted; to extract again, build a new extractor over the same lines.
#[derive(Debug)]
pub struct FrameExtractor<'a, L> {
    lines: &'a [L],
    symbol_map: &'a SymbolMap,
    cursor: usize,
    frames_emitted: usize,
    termination: Option<Termination>,
}

impl<'a, L: AsRef<str>> FrameExtractor<'a, L> {
    pub fn new(lines: &'a [L], symbol_map: &'a SymbolMap) -> Self {
        Self {
            lines,
            symbol_map,
            cursor: 0,
            frames_emitted: 0,
            termination: None,
        }
    }

    /// The reason extraction stopped, or `None` while frames may still follow.
    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    pub fn frames_emitted(&self) -> usize {
        self.frames_emitted
    }

    fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).map(AsRef::as_ref)
    }

    fn only_blank_lines_remain(&self) -> bool {
        self.lines[self.cursor.min(self.lines.len())..]
            .iter()
            .all(|l| l.as_ref().trim().is_empty())
    }

    fn parse_frame(&self) -> Result<Structure, Termination> {
        let header_index = self.cursor;
        let Some(header) = self.line(header_index) else {
            return Err(Termination::EndOfInput);
        };
        let declared: usize = match header.trim().parse() {
            Ok(n) => n,
            Err(_) if self.only_blank_lines_remain() => return Err(Termination::EndOfInput),
            Err(_) => {
                return Err(Termination::InvalidHeader {
                    line: header_index + 1,
                });
            }
        };

        let first_atom = header_index + 2;
        let available = self.lines.len().saturating_sub(first_atom);
        if available < declared {
            return Err(Termination::TruncatedFrame {
                line: header_index + 1,
                declared,
                available,
            });
        }

        let mut structure = Structure::from_atoms(Vec::with_capacity(declared));
        for index in first_atom..first_atom + declared {
            let atom = self
                .line(index)
                .and_then(|line| self.parse_atom(line))
                .ok_or(Termination::MalformedRecord { line: index + 1 })?;
            structure.push(atom);
        }
        Ok(structure)
    }

    fn parse_atom(&self, line: &str) -> Option<Atom> {
        let mut fields = line.split_whitespace();
        let raw_symbol = fields.next()?;
        let mut coord = || fields.next()?.parse::<f64>().ok();
        let (x, y, z) = (coord()?, coord()?, coord()?);
        Some(Atom::new(
            self.symbol_map.resolve(raw_symbol),
            Point3::new(x, y, z),
        ))
    }
}

impl<L: AsRef<str>> Iterator for FrameExtractor<'_, L> {
    type Item = Structure;

    fn next(&mut self) -> Option<Structure> {
        if self.termination.is_some() {
            return None;
        }
        match self.parse_frame() {
            Ok(structure) => {
                self.cursor += structure.len() + 2;
                self.frames_emitted += 1;
                trace!(
                    frame = self.frames_emitted,
                    atoms = structure.len(),
                    "Extracted frame"
                );
                Some(structure)
            }
            Err(termination) => {
                debug!(
                    ?termination,
                    frames = self.frames_emitted,
                    "Frame extraction finished"
                );
                self.termination = Some(termination);
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.termination.is_some() {
            return (0, Some(0));
        }
        // Every frame consumes at least two lines, except a zero-atom frame on the last line.
        let remaining = self.lines.len().saturating_sub(self.cursor);
        (0, Some(remaining.div_ceil(2)))
    }
}

impl<L: AsRef<str>> FusedIterator for FrameExtractor<'_, L> {}

/// Splits an in-memory text buffer into lines for a [`FrameExtractor`].
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Reads every line of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid UTF-8.
pub fn read_lines<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}
