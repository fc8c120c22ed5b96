use super::{BlockDevice, DiskProvider};
use crate::util::run;
use crate::{Error, Result};

const POWERSHELL: &str = "powershell";
const GET_DISK: &[&str] = &["-NoProfile", "-Command", "Get-Disk | ConvertTo-Json"];

// MSFT_Disk.BusType
const BUS_TYPES: &[&str] = &[
    "Unknown",
    "SCSI",
    "ATAPI",
    "ATA",
    "1394",
    "SSA",
    "Fibre Channel",
    "USB",
    "RAID",
    "iSCSI",
    "SAS",
    "SATA",
    "SD",
    "MMC",
    "Virtual",
    "File Backed Virtual",
    "Storage Spaces",
    "NVMe",
];

/// Lists disks with the `Get-Disk` cmdlet.
#[derive(Default)]
pub struct GetDisk;

impl DiskProvider for GetDisk {
    fn disks(&self) -> Result<Vec<BlockDevice>> {
        parse(&run(POWERSHELL, GET_DISK)?)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Output {
    Many(Vec<Disk>),
    One(Disk),
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Disk {
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    disk_number: Option<u32>,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    bus_type: Option<BusType>,
    #[serde(default)]
    size: u64,
}

/// Windows PowerShell serializes the enum as its numeric value, newer
/// releases may emit the name.
#[derive(Deserialize)]
#[serde(untagged)]
enum BusType {
    Code(u16),
    Name(String),
}

impl BusType {
    fn label(self) -> String {
        match self {
            Self::Code(code) => BUS_TYPES
                .get(code as usize)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("Unknown ({code})")),
            Self::Name(name) => name,
        }
    }
}

fn parse(stdout: &str) -> Result<Vec<BlockDevice>> {
    // no disks at all produces no output
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let disks = match serde_json::from_str(stdout).map_err(|e| Error::output(e, POWERSHELL))? {
        Output::Many(disks) => disks,
        Output::One(disk) => vec![disk],
    };

    Ok(disks
        .into_iter()
        .map(|disk| {
            BlockDevice::new(
                format!(
                    r"\\.\PHYSICALDRIVE{}",
                    disk.disk_number.or(disk.number).unwrap_or_default()
                ),
                disk.friendly_name.unwrap_or_default().trim(),
                disk.bus_type.map(BusType::label).unwrap_or_default(),
                disk.size,
            )
        })
        .collect())
}
