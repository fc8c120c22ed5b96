//! Gather a hardware inventory of the current system from its SMBIOS table
//! and the operating system's disk list.
//!

#[macro_use]
extern crate serde;

#[macro_use]
extern crate log;

mod error;
mod util;

pub mod disks;
pub mod report;
pub mod smbios;

use crate::disks::{BlockDevice, DiskProvider};
use crate::report::*;
use crate::smbios::{Smbios, TableSource};

pub use crate::error::{Error, Result};

/// Read the [`SystemInfo`] for the current system.
pub fn systeminfo() -> Result<SystemInfo> {
    SystemInfo::new()
}

#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemInfo {
    pub bios_information: BiosInformation,
    pub system_information: SystemInformation,
    pub chassis_information: ChassisInformation,
    pub base_board_information: BaseBoardInformation,
    pub processor_information: ProcessorInformation,
    pub memory_devices: Vec<MemoryDevice>,
    pub disks: Vec<Disk>,
}

impl SystemInfo {
    /// Inventory the host using the platform table location and disk list.
    pub fn new() -> Result<Self> {
        let disks = disks::platform();
        Self::collect(smbios::platform().as_ref(), Some(disks.as_ref()))
    }

    /// Inventory using the given table source. Disks are left empty when no
    /// provider is given.
    pub fn collect(source: &dyn TableSource, disks: Option<&dyn DiskProvider>) -> Result<Self> {
        let smbios = Smbios::from_source(source)?;

        let disks = match disks {
            Some(provider) => provider.disks()?,
            None => Vec::new(),
        };
        debug!("found {} disks", disks.len());

        Ok(Self::from_parts(&smbios, &disks))
    }

    pub fn from_parts(smbios: &Smbios, disks: &[BlockDevice]) -> Self {
        Self {
            bios_information: smbios
                .bios_information()
                .map(Into::into)
                .unwrap_or_default(),
            system_information: smbios
                .system_information()
                .map(Into::into)
                .unwrap_or_default(),
            chassis_information: smbios
                .system_enclosure()
                .map(Into::into)
                .unwrap_or_default(),
            base_board_information: smbios
                .baseboard_information()
                .map(Into::into)
                .unwrap_or_default(),
            processor_information: smbios
                .processor_information()
                .map(Into::into)
                .unwrap_or_default(),
            memory_devices: smbios.memory_devices().map(Into::into).collect(),
            disks: disks.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smbios::testing::*;

    struct FixedDisks(Vec<BlockDevice>);

    impl DiskProvider for FixedDisks {
        fn disks(&self) -> Result<Vec<BlockDevice>> {
            Ok(self.0.clone())
        }
    }

    fn table() -> Vec<u8> {
        let mut memory = vec![0u8; 0x1B - 4];
        memory[0x0C - 4..0x0E - 4].copy_from_slice(&4096u16.to_le_bytes());
        memory[0x12 - 4] = 0x1A;

        let mut table = Vec::new();
        table.extend(structure(1, 0x0100, &[1, 2, 0, 0], &["QEMU", "Standard PC"]));
        table.extend(structure(17, 0x1100, &memory, &[]));
        table.extend(structure(17, 0x1101, &memory, &[]));
        table.extend(end_of_table(0xFFFF));
        table
    }

    #[test]
    fn report_shape() {
        let table = table();
        let source = MemorySource {
            entry_point: entry_point(3, 0, table.len() as u32),
            table,
        };
        let disks = FixedDisks(vec![BlockDevice::new("vda", "", "virtio", 21474836480)]);

        let info = SystemInfo::collect(&source, Some(&disks)).unwrap();
        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["system_information"]["manufacturer"], "QEMU");
        assert_eq!(json["system_information"]["productName"], "Standard PC");
        assert_eq!(json["system_information"]["sku"], "");
        assert_eq!(json["base_board_information"]["product"], "");
        assert_eq!(json["processor_information"]["currentSpeed"], "Unknown");
        assert_eq!(json["memory_devices"].as_array().unwrap().len(), 2);
        assert_eq!(json["memory_devices"][0]["size"], "4 GB");
        assert_eq!(json["memory_devices"][1]["memoryType"], "DDR4");
        assert_eq!(json["disks"][0]["path"], "vda");
        assert_eq!(json["disks"][0]["size"], "20 GB");
    }

    #[test]
    fn without_disks() {
        let table = table();
        let source = MemorySource {
            entry_point: entry_point(3, 0, table.len() as u32),
            table,
        };

        let info = SystemInfo::collect(&source, None).unwrap();
        assert!(info.disks.is_empty());
    }

    #[test]
    fn decode_failures_are_fatal() {
        let mut table = table();
        table.truncate(10);
        let source = MemorySource {
            entry_point: entry_point(3, 0, 64),
            table,
        };

        let e = SystemInfo::collect(&source, None).unwrap_err();
        assert!(matches!(
            e.smbios(),
            Some(smbios::Error::TruncatedStructure { .. })
        ));
    }
}
