use crate::cli::ConvertTrajArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use atomprep::workflows::{self, progress::ProgressReporter};
use tracing::info;

pub fn run(args: ConvertTrajArgs, config: PartialConfig) -> Result<()> {
    let settings = config.merge_convert_traj(&args)?;
    for (raw, symbol) in settings.symbol_map.iter() {
        info!("Mapping symbol '{}' to '{}'", raw, symbol);
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let summary = workflows::convert_trajectory::run(
        &settings.input,
        &settings.output,
        &settings.symbol_map,
        &reporter,
    )?;

    if summary.input_missing {
        println!(
            "Warning: input file {} was not found; an empty trajectory was written.",
            settings.input.display()
        );
    }
    if let Some(reason) = summary.termination.filter(|t| !t.is_clean()) {
        println!("Warning: stopped reading input early ({}).", reason);
    }
    println!(
        "✓ Wrote {} frame(s) to: {}",
        summary.frames_written,
        settings.output.display()
    );
    Ok(())
}
