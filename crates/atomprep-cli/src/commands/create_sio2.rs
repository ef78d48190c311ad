use crate::cli::CreateSio2Args;
use crate::config::PartialConfig;
use crate::error::Result;
use atomprep::workflows::{self, amorphous::AmorphousSummary};
use tracing::info;

pub fn run(args: CreateSio2Args, config: PartialConfig) -> Result<()> {
    let settings = config.merge_create_sio2(&args)?;
    info!(
        "Generating amorphous SiO2: {} Si atoms at {} g/cm^3",
        settings.config.num_si, settings.config.density_g_cm3
    );

    let summary = workflows::amorphous::run(&settings.config, &settings.output)?;

    print!("{}", format_summary(&summary));
    println!("✓ Structure saved to: {}", settings.output.display());
    Ok(())
}

fn format_summary(summary: &AmorphousSummary) -> String {
    format!(
        "--- Structure Summary ---\n\
         Target density:   {:.3} g/cm^3\n\
         Si atoms:         {}\n\
         O atoms:          {}\n\
         Total atoms:      {}\n\
         Cell edge length: {:.3} Å\n\
         Cell volume:      {:.3} Å^3\n\
         Actual density:   {:.3} g/cm^3\n\
         -------------------------\n",
        summary.target_density,
        summary.num_si,
        summary.num_o,
        summary.total_atoms,
        summary.cell_length,
        summary.cell_volume,
        summary.actual_density,
    )
}
