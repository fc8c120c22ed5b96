//! Discovery of the raw table and its entry point.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::PathBuf;

use super::{EntryPoint, Error, Layout};

#[cfg(target_os = "linux")]
mod linux;

#[cfg(windows)]
mod windows;

/// Something that can hand out the table bytes along with the entry point
/// describing them.
///
/// The returned stream is owned by the caller and closed when dropped.
pub trait TableSource {
    fn open(&self) -> Result<(Box<dyn Read>, EntryPoint), Error>;
}

/// The table source for the host operating system.
#[cfg(target_os = "linux")]
pub fn platform() -> Box<dyn TableSource> {
    Box::new(linux::Linux::default())
}

#[cfg(windows)]
pub fn platform() -> Box<dyn TableSource> {
    Box::new(windows::FirmwareTable)
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform() -> Box<dyn TableSource> {
    Box::new(Unsupported)
}

#[cfg(not(any(target_os = "linux", windows)))]
struct Unsupported;

#[cfg(not(any(target_os = "linux", windows)))]
impl TableSource for Unsupported {
    fn open(&self) -> Result<(Box<dyn Read>, EntryPoint), Error> {
        Err(Error::NotFound)
    }
}

/// Reads an anchored entry point and the table from two files, the way
/// Linux exposes them in sysfs and the way `dmidecode --dump-bin` style
/// dumps are usually kept.
#[derive(Clone, Debug)]
pub struct FileSource {
    entry_point: PathBuf,
    table: PathBuf,
}

impl FileSource {
    pub fn new(entry_point: impl Into<PathBuf>, table: impl Into<PathBuf>) -> Self {
        Self {
            entry_point: entry_point.into(),
            table: table.into(),
        }
    }
}

impl TableSource for FileSource {
    fn open(&self) -> Result<(Box<dyn Read>, EntryPoint), Error> {
        let raw = fs::read(&self.entry_point).map_err(|e| Error::open(e, &self.entry_point))?;
        let mut entry_point = EntryPoint::parse(&raw)?;

        let table = File::open(&self.table).map_err(|e| Error::open(e, &self.table))?;

        // a 64-bit entry point only gives an upper bound on the table size
        if entry_point.layout == Layout::Bits64 {
            let len = table.metadata()?.len();
            if len < entry_point.table_length as u64 {
                entry_point.table_length = len as u32;
            }
        }

        debug!(
            "reading smbios table from {} ({} bytes)",
            self.table.display(),
            entry_point.table_length
        );

        Ok((Box::new(BufReader::new(table)), entry_point))
    }
}
