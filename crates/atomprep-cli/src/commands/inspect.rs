use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use atomprep::core::io::trajectory::{BinaryTrajectoryReader, TrajectoryError};
use atomprep::core::models::structure::Structure;
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Reading trajectory {:?}", &args.trajectory);
    let parse_error = |e: TrajectoryError| CliError::FileParsing {
        path: args.trajectory.clone(),
        source: e.into(),
    };
    let reader = BinaryTrajectoryReader::open(&args.trajectory).map_err(parse_error)?;

    let mut frames = 0usize;
    for frame in reader {
        let frame = frame.map_err(parse_error)?;
        println!("{}", describe_frame(frames, &frame));
        frames += 1;
    }
    println!("✓ {} frame(s) in {}", frames, args.trajectory.display());
    Ok(())
}

fn describe_frame(index: usize, frame: &Structure) -> String {
    let mut line = format!("Frame {:>6}: {:>8} atoms", index, frame.len());
    if let Some(cell) = frame.cell() {
        let [a, b, c] = cell.lengths();
        line.push_str(&format!("  cell {:.3} x {:.3} x {:.3}", a, b, c));
    }
    line
}
