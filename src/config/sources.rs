use serde::Deserialize;

use std::path::{Path, PathBuf};

fn enabled() -> bool {
    true
}

#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct Output {
    #[serde(default)]
    pub(super) pretty: bool,
}

impl Output {
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

/// Decode a dumped table instead of the one the host exposes.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct Smbios {
    #[serde(default)]
    pub(super) entry_point: Option<PathBuf>,
    #[serde(default)]
    pub(super) table: Option<PathBuf>,
}

impl Smbios {
    pub(super) fn check(&self) -> Result<(), String> {
        match (&self.entry_point, &self.table) {
            (Some(_), None) => Err("smbios entry point given without a table".into()),
            (None, Some(_)) => Err("smbios table given without an entry point".into()),
            _ => Ok(()),
        }
    }

    /// Entry point and table paths, when both are configured.
    pub fn files(&self) -> Option<(&Path, &Path)> {
        match (&self.entry_point, &self.table) {
            (Some(entry_point), Some(table)) => Some((entry_point.as_path(), table.as_path())),
            _ => None,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Disks {
    #[serde(default = "enabled")]
    pub(super) enabled: bool,
}

impl Default for Disks {
    fn default() -> Self {
        Self { enabled: enabled() }
    }
}

impl Disks {
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}
