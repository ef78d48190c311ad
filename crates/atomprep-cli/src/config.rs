use crate::cli::{ConvertDataArgs, ConvertTrajArgs, CreateSio2Args};
use crate::error::{CliError, Result};
use crate::utils::parser;
use atomprep::core::mapping::{SymbolMap, TypeMap};
use atomprep::workflows::amorphous::AmorphousConfig;
use atomprep::workflows::convert_data::ConvertDataOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialConvertDataConfig {
    #[serde(rename = "atom-style")]
    atom_style: Option<String>,
    #[serde(rename = "type-map")]
    type_map: Option<TypeMap>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialConvertTrajConfig {
    #[serde(rename = "symbol-map")]
    symbol_map: Option<SymbolMap>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialCreateSio2Config {
    density: Option<f64>,
    #[serde(rename = "num-si")]
    num_si: Option<usize>,
    seed: Option<u64>,
}

/// Per-command defaults read from the optional `--config` file.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(rename = "convert-data")]
    convert_data: Option<PartialConvertDataConfig>,
    #[serde(rename = "convert-traj")]
    convert_traj: Option<PartialConvertTrajConfig>,
    #[serde(rename = "create-sio2")]
    create_sio2: Option<PartialCreateSio2Config>,
}

#[derive(Debug)]
pub struct ConvertDataSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub type_map: TypeMap,
    pub options: ConvertDataOptions,
}

#[derive(Debug)]
pub struct ConvertTrajSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub symbol_map: SymbolMap,
}

#[derive(Debug)]
pub struct CreateSio2Settings {
    pub config: AmorphousConfig,
    pub output: PathBuf,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the config file when one is given, otherwise starts from built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_convert_data(self, args: &ConvertDataArgs) -> Result<ConvertDataSettings> {
        let file_config = self.convert_data.unwrap_or_default();

        let mut type_map = file_config
            .type_map
            .unwrap_or_else(TypeMap::sodium_silicate);
        if let Some(path) = &args.type_map_file {
            type_map.merge(TypeMap::load(path)?);
        }
        type_map.merge(parser::parse_type_map_entries(&args.type_map)?);

        let atom_style = args
            .atom_style
            .as_deref()
            .or(file_config.atom_style.as_deref())
            .map(parser::parse_atom_style)
            .transpose()?;

        let output = match &args.output {
            Some(output) => output.clone(),
            None => {
                let derived = args.input.with_extension("xyz");
                if derived == args.input {
                    return Err(CliError::Argument(format!(
                        "Refusing to overwrite the input file {}. Pass --output explicitly.",
                        args.input.display()
                    )));
                }
                derived
            }
        };

        Ok(ConvertDataSettings {
            input: args.input.clone(),
            output,
            type_map,
            options: ConvertDataOptions { atom_style },
        })
    }

    pub fn merge_convert_traj(self, args: &ConvertTrajArgs) -> Result<ConvertTrajSettings> {
        let file_config = self.convert_traj.unwrap_or_default();

        let mut symbol_map = file_config
            .symbol_map
            .unwrap_or_else(SymbolMap::placeholder_defaults);
        if let Some(path) = &args.symbol_map_file {
            symbol_map.merge(SymbolMap::load(path)?);
        }
        symbol_map.merge(parser::parse_symbol_map_entries(&args.symbol_map)?);

        Ok(ConvertTrajSettings {
            input: args.input.clone(),
            output: args.output.clone(),
            symbol_map,
        })
    }

    pub fn merge_create_sio2(self, args: &CreateSio2Args) -> Result<CreateSio2Settings> {
        let file_config = self.create_sio2.unwrap_or_default();
        let defaults = AmorphousConfig::default();

        let config = AmorphousConfig {
            density_g_cm3: args
                .density
                .or(file_config.density)
                .unwrap_or(defaults.density_g_cm3),
            num_si: args
                .num_si
                .or(file_config.num_si)
                .unwrap_or(defaults.num_si),
            seed: args.seed.or(file_config.seed),
        };
        config.validate()?;

        Ok(CreateSio2Settings {
            config,
            output: args.output.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use atomprep::core::io::lammps::AtomStyle;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn convert_data_args(extra: &[&str]) -> ConvertDataArgs {
        let argv = ["atomprep", "convert-data", "glass.data"]
            .into_iter()
            .chain(extra.iter().copied());
        match Cli::parse_from(argv).command {
            Commands::ConvertData(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn create_sio2_args(extra: &[&str]) -> CreateSio2Args {
        let argv = ["atomprep", "create-sio2"]
            .into_iter()
            .chain(extra.iter().copied());
        match Cli::parse_from(argv).command {
            Commands::CreateSio2(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn defaults_apply_without_a_config_file() {
        let settings = PartialConfig::load(None)
            .unwrap()
            .merge_convert_data(&convert_data_args(&[]))
            .unwrap();
        assert_eq!(settings.output, PathBuf::from("glass.xyz"));
        assert_eq!(settings.type_map, TypeMap::sodium_silicate());
        assert_eq!(settings.options.atom_style, None);

        let sio2 = PartialConfig::default()
            .merge_create_sio2(&create_sio2_args(&[]))
            .unwrap();
        assert_eq!(sio2.config, AmorphousConfig::default());
        assert_eq!(sio2.output, PathBuf::from("random_sio2.xyz"));
    }

    #[test]
    fn config_file_values_replace_defaults_and_cli_overrides_them() {
        let file = write_config(
            r#"
[convert-data]
atom-style = "atomic"

[convert-data.type-map]
1 = "Li"
2 = "O"

[create-sio2]
density = 2.65
num-si = 8
seed = 11
"#,
        );
        let config = PartialConfig::from_file(file.path()).unwrap();
        let settings = config
            .merge_convert_data(&convert_data_args(&["-t", "2=F", "--atom-style", "charge"]))
            .unwrap();
        assert_eq!(settings.type_map.get(1), Some("Li"));
        assert_eq!(settings.type_map.get(2), Some("F"));
        assert_eq!(settings.type_map.get(3), None);
        assert_eq!(settings.options.atom_style, Some(AtomStyle::Charge));

        let config = PartialConfig::from_file(file.path()).unwrap();
        let sio2 = config
            .merge_create_sio2(&create_sio2_args(&["--num-si", "20"]))
            .unwrap();
        assert_eq!(sio2.config.density_g_cm3, 2.65);
        assert_eq!(sio2.config.num_si, 20);
        assert_eq!(sio2.config.seed, Some(11));
    }

    #[test]
    fn symbol_map_layers_config_file_map_file_and_cli_entries() {
        let config_file = write_config("[convert-traj.symbol-map]\nA = \"C\"\nB = \"N\"\n");
        let map_file = write_config("B = \"S\"\nC = \"P\"\n");
        let map_path = map_file.path().to_string_lossy().to_string();

        let args = match Cli::parse_from([
            "atomprep",
            "convert-traj",
            "frames.xyz",
            "--symbol-map-file",
            map_path.as_str(),
            "-m",
            "C=K",
        ])
        .command
        {
            Commands::ConvertTraj(args) => args,
            other => panic!("unexpected command: {:?}", other),
        };

        let settings = PartialConfig::from_file(config_file.path())
            .unwrap()
            .merge_convert_traj(&args)
            .unwrap();
        assert_eq!(settings.symbol_map.resolve("A"), "C");
        assert_eq!(settings.symbol_map.resolve("B"), "S");
        assert_eq!(settings.symbol_map.resolve("C"), "K");
        assert_eq!(settings.output, PathBuf::from("./trajectory.traj"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("[create-sio2]\ndensty = 2.2\n");
        let result = PartialConfig::from_file(file.path());
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn empty_symbol_in_config_symbol_map_is_rejected() {
        let file = write_config("[convert-traj.symbol-map]\nA = \"\"\n");
        let result = PartialConfig::from_file(file.path());
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn invalid_values_are_reported() {
        let result = PartialConfig::default()
            .merge_convert_data(&convert_data_args(&["--atom-style", "sphere"]));
        assert!(matches!(result, Err(CliError::Argument(_))));

        let result = PartialConfig::default().merge_create_sio2(&create_sio2_args(&["-d", "0"]));
        assert!(matches!(result, Err(CliError::Workflow(_))));
    }

    #[test]
    fn xyz_input_requires_explicit_output() {
        let args = match Cli::parse_from(["atomprep", "convert-data", "glass.xyz"]).command {
            Commands::ConvertData(args) => args,
            other => panic!("unexpected command: {:?}", other),
        };
        let result = PartialConfig::default().merge_convert_data(&args);
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
