use super::error::WorkflowError;
use super::progress::{Progress, ProgressReporter};
use crate::core::io::frames::{self, FrameExtractor, Termination};
use crate::core::io::trajectory::{BinaryTrajectoryWriter, TrajectoryWriter};
use crate::core::mapping::SymbolMap;
use std::io;
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySummary {
    pub frames_written: usize,
    /// The input file did not exist and an empty trajectory was written.
    pub input_missing: bool,
    /// Why frame extraction stopped. `None` only when the input was missing.
    pub termination: Option<Termination>,
}

/// Streams the frames of a custom XYZ file into a binary trajectory at `output`.
///
/// The output is created before the input is read, so a missing input still leaves a valid,
/// empty trajectory behind.
#[instrument(skip_all, name = "convert_trajectory_workflow")]
pub fn run(
    input: &Path,
    output: &Path,
    symbol_map: &SymbolMap,
    reporter: &ProgressReporter,
) -> Result<TrajectorySummary, WorkflowError> {
    let writer = BinaryTrajectoryWriter::create(output)?;
    let summary = convert_into(input, writer, symbol_map, reporter)?;
    info!("Wrote {} frame(s) to '{}'", summary.frames_written, output.display());
    Ok(summary)
}

/// Extracts frames from `input` and appends them to `writer`, closing it afterwards.
pub fn convert_into<W: TrajectoryWriter>(
    input: &Path,
    mut writer: W,
    symbol_map: &SymbolMap,
    reporter: &ProgressReporter,
) -> Result<TrajectorySummary, WorkflowError> {
    reporter.report(Progress::PhaseStart {
        name: "Reading frames",
    });
    let lines = match frames::read_lines(input) {
        Ok(lines) => Some(lines),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(
                "Input file '{}' not found; writing an empty trajectory",
                input.display()
            );
            None
        }
        Err(source) => {
            close_after_error(writer);
            return Err(WorkflowError::Input {
                path: input.to_path_buf(),
                source,
            });
        }
    };
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Writing trajectory",
    });
    reporter.report(Progress::TaskStart { total_steps: None });
    let mut termination = None;
    if let Some(lines) = &lines {
        let mut extractor = FrameExtractor::new(lines, symbol_map);
        for frame in extractor.by_ref() {
            if let Err(e) = writer.write(&frame) {
                close_after_error(writer);
                return Err(e.into());
            }
            reporter.report(Progress::TaskIncrement);
        }
        termination = extractor.termination().copied();
    }
    reporter.report(Progress::TaskFinish);

    let frames_written = writer.close()?;
    reporter.report(Progress::PhaseFinish);

    if let Some(reason) = termination.filter(|t| !t.is_clean()) {
        warn!(
            "Stopped reading '{}' after {} frame(s): {}",
            input.display(),
            frames_written,
            reason
        );
        reporter.report(Progress::Message(format!(
            "Stopped early after {} frame(s): {}",
            frames_written, reason
        )));
    }

    Ok(TrajectorySummary {
        frames_written,
        input_missing: lines.is_none(),
        termination,
    })
}

/// Finalizes `writer` on a failure path so the frames already written stay readable.
fn close_after_error<W: TrajectoryWriter>(writer: W) {
    let frames = writer.frames_written();
    match writer.close() {
        Ok(_) => warn!("Closed trajectory after {} frame(s) following an error", frames),
        Err(e) => warn!("Failed to close trajectory after an error: {}", e),
    }
}
