//! Report sections built from decoded SMBIOS structures.
//!
//! Every field is rendered as a string so the document has the same shape on
//! every machine: values the firmware does not provide become `"Unknown"`
//! for measurements and labels, and `""` for free-form strings.

use core::fmt::Display;

use crate::disks::BlockDevice;
use crate::smbios;
use crate::util::gigabytes;

const UNKNOWN: &str = "Unknown";

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn measured(value: Option<impl Display>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value} {unit}"),
        None => UNKNOWN.to_string(),
    }
}

fn labelled(value: Option<impl Display>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiosInformation {
    pub vendor: String,
    pub version: String,
    pub release_date: String,
}

impl From<smbios::Bios<'_>> for BiosInformation {
    fn from(bios: smbios::Bios<'_>) -> Self {
        Self {
            vendor: text(bios.vendor()),
            version: text(bios.version()),
            release_date: text(bios.release_date()),
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInformation {
    pub family: String,
    pub manufacturer: String,
    pub product_name: String,
    pub serial_number: String,
    pub sku: String,
    pub version: String,
}

impl From<smbios::System<'_>> for SystemInformation {
    fn from(system: smbios::System<'_>) -> Self {
        Self {
            family: text(system.family()),
            manufacturer: text(system.manufacturer()),
            product_name: text(system.product_name()),
            serial_number: text(system.serial_number()),
            sku: text(system.sku_number()),
            version: text(system.version()),
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseBoardInformation {
    pub manufacturer: String,
    pub product: String,
    pub version: String,
    pub serial_number: String,
    pub asset_tag: String,
}

impl From<smbios::Baseboard<'_>> for BaseBoardInformation {
    fn from(board: smbios::Baseboard<'_>) -> Self {
        Self {
            manufacturer: text(board.manufacturer()),
            product: text(board.product()),
            version: text(board.version()),
            serial_number: text(board.serial_number()),
            asset_tag: text(board.asset_tag()),
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChassisInformation {
    pub manufacturer: String,
    #[serde(rename = "type")]
    pub chassis_type: String,
    pub version: String,
    pub serial_number: String,
    pub asset_tag: String,
}

impl Default for ChassisInformation {
    fn default() -> Self {
        Self {
            manufacturer: String::new(),
            chassis_type: UNKNOWN.to_string(),
            version: String::new(),
            serial_number: String::new(),
            asset_tag: String::new(),
        }
    }
}

impl From<smbios::Enclosure<'_>> for ChassisInformation {
    fn from(enclosure: smbios::Enclosure<'_>) -> Self {
        Self {
            manufacturer: text(enclosure.manufacturer()),
            chassis_type: labelled(enclosure.chassis_type()),
            version: text(enclosure.version()),
            serial_number: text(enclosure.serial_number()),
            asset_tag: text(enclosure.asset_tag()),
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorInformation {
    pub processor_version: String,
    pub socket_designation: String,
    pub serial_number: String,
    pub part_number: String,
    pub current_speed: String,
    pub core_count: String,
    pub thread_count: String,
}

impl Default for ProcessorInformation {
    fn default() -> Self {
        Self {
            processor_version: String::new(),
            socket_designation: String::new(),
            serial_number: String::new(),
            part_number: String::new(),
            current_speed: UNKNOWN.to_string(),
            core_count: UNKNOWN.to_string(),
            thread_count: UNKNOWN.to_string(),
        }
    }
}

impl From<smbios::Processor<'_>> for ProcessorInformation {
    fn from(processor: smbios::Processor<'_>) -> Self {
        Self {
            processor_version: text(processor.processor_version()),
            socket_designation: text(processor.socket_designation()),
            serial_number: text(processor.serial_number()),
            part_number: text(processor.part_number()),
            current_speed: measured(processor.current_speed(), "MHz"),
            core_count: labelled(processor.core_count()),
            thread_count: labelled(processor.thread_count()),
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryDevice {
    pub manufacturer: String,
    pub serial_number: String,
    pub bank_locator: String,
    pub configured_memory_speed: String,
    pub configured_voltage: String,
    pub memory_type: String,
    pub data_width: String,
    pub form_factor: String,
    pub size: String,
    pub part_number: String,
}

impl From<smbios::MemoryDevice<'_>> for MemoryDevice {
    fn from(device: smbios::MemoryDevice<'_>) -> Self {
        let size = match device.size() {
            Some(smbios::MemorySize::NotInstalled) => "No Module Installed".to_string(),
            size => measured(size.and_then(|s| s.gigabytes()), "GB"),
        };

        Self {
            manufacturer: text(device.manufacturer()),
            serial_number: text(device.serial_number()),
            bank_locator: text(device.bank_locator()),
            configured_memory_speed: measured(device.configured_memory_speed(), "MT/s"),
            configured_voltage: measured(
                device.configured_voltage().map(|mv| f64::from(mv) / 1000.0),
                "V",
            ),
            memory_type: labelled(device.memory_type()),
            data_width: measured(device.data_width(), "bits"),
            form_factor: labelled(device.form_factor()),
            size,
            part_number: text(device.part_number()),
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    pub path: String,
    pub friendly_name: String,
    pub bus_type: String,
    pub size: String,
}

impl From<&BlockDevice> for Disk {
    fn from(device: &BlockDevice) -> Self {
        Self {
            path: device.path.clone(),
            friendly_name: device.friendly_name.clone(),
            bus_type: device.bus_type.clone(),
            size: gigabytes(device.size_bytes),
        }
    }
}
