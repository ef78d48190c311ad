use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "atomprep developers",
    version,
    about = "atomprep - Prepare atomic structures and trajectories for molecular-simulation workflows.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a TOML configuration file with per-command defaults
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a LAMMPS data file into extended XYZ, assigning elements to atom types.
    ConvertData(ConvertDataArgs),
    /// Convert a custom multi-frame XYZ file into a binary trajectory.
    ConvertTraj(ConvertTrajArgs),
    /// Generate a random amorphous SiO2 structure at a target density.
    CreateSio2(CreateSio2Args),
    /// Show the frames stored in a binary trajectory.
    Inspect(InspectArgs),
}

/// Arguments for the `convert-data` subcommand.
#[derive(Args, Debug)]
pub struct ConvertDataArgs {
    /// Path to the input LAMMPS data file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path for the output extended XYZ file. Defaults to the input path with an `.xyz` extension.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Assign an element to an atom type, overriding the config file.
    /// Can be used multiple times. Example: --type-map 1=Na --type-map 3=Si
    #[arg(short = 't', long = "type-map", value_name = "TYPE=SYMBOL")]
    pub type_map: Vec<String>,

    /// Load atom type assignments from a TOML table file (e.g. `1 = "Na"`).
    /// Entries given with --type-map take precedence.
    #[arg(long, value_name = "PATH")]
    pub type_map_file: Option<PathBuf>,

    /// Atom style of the Atoms section (atomic, charge, molecular, full).
    /// Overrides the style comment in the data file.
    #[arg(short = 's', long, value_name = "STYLE")]
    pub atom_style: Option<String>,
}

/// Arguments for the `convert-traj` subcommand.
#[derive(Args, Debug)]
pub struct ConvertTrajArgs {
    /// Path to the input multi-frame XYZ file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path for the output trajectory file.
    #[arg(short, long, value_name = "PATH", default_value = "./trajectory.traj")]
    pub output: PathBuf,

    /// Replace a raw symbol with an element symbol, overriding the config file.
    /// Can be used multiple times. Example: --symbol-map A=H
    #[arg(short = 'm', long = "symbol-map", value_name = "RAW=SYMBOL")]
    pub symbol_map: Vec<String>,

    /// Load symbol replacements from a TOML table file (e.g. `A = "H"`).
    /// Entries given with --symbol-map take precedence.
    #[arg(long, value_name = "PATH")]
    pub symbol_map_file: Option<PathBuf>,
}

/// Arguments for the `create-sio2` subcommand.
#[derive(Args, Debug)]
pub struct CreateSio2Args {
    /// Target density in g/cm^3. [default: 2.2]
    #[arg(short, long, value_name = "FLOAT")]
    pub density: Option<f64>,

    /// Number of Si atoms; twice as many O atoms are added. [default: 100]
    #[arg(short, long, value_name = "INT")]
    pub num_si: Option<usize>,

    /// Seed for reproducible atom placement.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Path for the output extended XYZ file.
    #[arg(short, long, value_name = "PATH", default_value = "random_sio2.xyz")]
    pub output: PathBuf,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to a binary trajectory file.
    #[arg(value_name = "TRAJECTORY")]
    pub trajectory: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_traj_defaults_output_path() {
        let cli = Cli::parse_from(["atomprep", "convert-traj", "frames.xyz"]);
        match cli.command {
            Commands::ConvertTraj(args) => {
                assert_eq!(args.output, PathBuf::from("./trajectory.traj"));
                assert!(args.symbol_map.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn repeated_map_entries_and_global_flags_are_collected() {
        let cli = Cli::parse_from([
            "atomprep",
            "convert-data",
            "glass.data",
            "-t",
            "1=Na",
            "--type-map",
            "2=O",
            "-vv",
            "--config",
            "atomprep.toml",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("atomprep.toml")));
        match cli.command {
            Commands::ConvertData(args) => {
                assert_eq!(args.type_map, ["1=Na", "2=O"]);
                assert_eq!(args.output, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["atomprep", "-q", "-v", "inspect", "a.traj"]);
        assert!(result.is_err());
    }
}
