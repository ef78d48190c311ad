use crate::cli::ConvertDataArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use atomprep::workflows;
use tracing::info;

pub fn run(args: ConvertDataArgs, config: PartialConfig) -> Result<()> {
    let settings = config.merge_convert_data(&args)?;
    info!(
        "Converting {:?} with {} mapped atom type(s)",
        &settings.input,
        settings.type_map.len()
    );

    let summary = workflows::convert_data::run(
        &settings.input,
        &settings.output,
        &settings.type_map,
        &settings.options,
    )?;

    println!(
        "✓ Converted {} atoms (atom style '{}') to: {}",
        summary.atoms,
        summary.atom_style,
        settings.output.display()
    );
    for (symbol, count) in &summary.element_counts {
        println!("  {:<3} {:>8}", symbol, count);
    }
    Ok(())
}
