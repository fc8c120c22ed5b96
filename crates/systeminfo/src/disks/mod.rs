//! Block device enumeration.
//!
//! Disks are not described by SMBIOS, so each platform asks the operating
//! system instead. Providers are independent of the table decoder.

use crate::Result;

mod lsblk;
mod powershell;
mod sysfs;

pub use self::lsblk::Lsblk;
pub use self::powershell::GetDisk;
pub use self::sysfs::SysfsBlock;

/// One physical disk as reported by the operating system.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDevice {
    pub path: String,
    pub friendly_name: String,
    pub bus_type: String,
    pub size_bytes: u64,
}

impl BlockDevice {
    pub fn new(
        path: impl Into<String>,
        friendly_name: impl Into<String>,
        bus_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            path: path.into(),
            friendly_name: friendly_name.into(),
            bus_type: bus_type.into(),
            size_bytes,
        }
    }
}

pub trait DiskProvider {
    fn disks(&self) -> Result<Vec<BlockDevice>>;
}

/// The disk provider for the host operating system.
#[cfg(target_os = "linux")]
pub fn platform() -> Box<dyn DiskProvider> {
    Box::new(Lsblk::default())
}

#[cfg(windows)]
pub fn platform() -> Box<dyn DiskProvider> {
    Box::new(GetDisk::default())
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform() -> Box<dyn DiskProvider> {
    Box::new(NoDisks)
}

#[cfg(not(any(target_os = "linux", windows)))]
struct NoDisks;

#[cfg(not(any(target_os = "linux", windows)))]
impl DiskProvider for NoDisks {
    fn disks(&self) -> Result<Vec<BlockDevice>> {
        Ok(Vec::new())
    }
}

/// Join vendor and model the way disk names are usually displayed.
pub(crate) fn friendly_name(vendor: Option<&str>, model: Option<&str>) -> String {
    [vendor, model]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
