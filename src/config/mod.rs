use clap::ArgMatches;
use serde::Deserialize;

use std::path::{Path, PathBuf};

mod log;
mod sources;

pub use self::log::{Level, Log};
pub use sources::{Disks, Output, Smbios};

#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    log: Log,
    #[serde(default)]
    output: Output,
    #[serde(default)]
    smbios: Smbios,
    #[serde(default)]
    disks: Disks,
}

impl Config {
    pub fn load(path: &dyn AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("unable to open config file {}: {e}", path.display()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| format!("failed to parse config file: {e}"))?;

        config.check()?;

        Ok(config)
    }

    fn check(&self) -> Result<(), String> {
        self.smbios.check()
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn smbios(&self) -> &Smbios {
        &self.smbios
    }

    pub fn disks(&self) -> &Disks {
        &self.disks
    }
}

/// Command line flags are applied on top of the config file, if one is given.
impl TryFrom<ArgMatches> for Config {
    type Error = String;

    fn try_from(args: ArgMatches) -> Result<Self, Self::Error> {
        let mut config = match args.get_one::<PathBuf>("CONFIG") {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let verbose = args.get_count("VERBOSE");
        if verbose > 0 {
            config.log.set_level(match verbose {
                1 => Level::Debug,
                _ => Level::Trace,
            });
        }

        if args.get_flag("PRETTY") {
            config.output.pretty = true;
        }

        if args.get_flag("NO_DISKS") {
            config.disks.enabled = false;
        }

        if let Some(path) = args.get_one::<PathBuf>("ENTRY_POINT") {
            config.smbios.entry_point = Some(path.clone());
        }

        if let Some(path) = args.get_one::<PathBuf>("TABLE") {
            config.smbios.table = Some(path.clone());
        }

        config.check()?;

        Ok(config)
    }
}
