//! Enumerated byte codes and their human-readable labels.

use core::fmt;

macro_rules! code_label {
    ($(#[$meta:meta])* $name:ident, $table:ident, $mask:expr) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub u8);

        impl $name {
            pub fn code(&self) -> u8 {
                self.0
            }

            /// Label for the code, `None` for reserved or unassigned codes.
            pub fn label(&self) -> Option<&'static str> {
                $table
                    .get((self.0 & $mask) as usize)
                    .copied()
                    .filter(|label| !label.is_empty())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.label() {
                    Some(label) => f.write_str(label),
                    None => write!(f, "Unknown ({:#04x})", self.0),
                }
            }
        }
    };
}

// indexed by code, empty entries are reserved
static MEMORY_TYPES: &[&str] = &[
    "",
    "Other",
    "Unknown",
    "DRAM",
    "EDRAM",
    "VRAM",
    "SRAM",
    "RAM",
    "ROM",
    "Flash",
    "EEPROM",
    "FEPROM",
    "EPROM",
    "CDRAM",
    "3DRAM",
    "SDRAM",
    "SGRAM",
    "RDRAM",
    "DDR",
    "DDR2",
    "DDR2 FB-DIMM",
    "",
    "",
    "",
    "DDR3",
    "FBD2",
    "DDR4",
    "LPDDR",
    "LPDDR2",
    "LPDDR3",
    "LPDDR4",
    "Logical non-volatile device",
    "HBM",
    "HBM2",
    "DDR5",
    "LPDDR5",
    "HBM3",
];

static FORM_FACTORS: &[&str] = &[
    "",
    "Other",
    "Unknown",
    "SIMM",
    "SIP",
    "Chip",
    "DIP",
    "ZIP",
    "Proprietary Card",
    "DIMM",
    "TSOP",
    "Row Of Chips",
    "RIMM",
    "SODIMM",
    "SRIMM",
    "FB-DIMM",
    "Die",
    "CAMM",
];

static CHASSIS_TYPES: &[&str] = &[
    "",
    "Other",
    "Unknown",
    "Desktop",
    "Low Profile Desktop",
    "Pizza Box",
    "Mini Tower",
    "Tower",
    "Portable",
    "Laptop",
    "Notebook",
    "Hand Held",
    "Docking Station",
    "All In One",
    "Sub Notebook",
    "Space-saving",
    "Lunch Box",
    "Main Server Chassis",
    "Expansion Chassis",
    "Sub Chassis",
    "Bus Expansion Chassis",
    "Peripheral Chassis",
    "RAID Chassis",
    "Rack Mount Chassis",
    "Sealed-case PC",
    "Multi-system",
    "CompactPCI",
    "AdvancedTCA",
    "Blade",
    "Blade Enclosing",
    "Tablet",
    "Convertible",
    "Detachable",
    "IoT Gateway",
    "Embedded PC",
    "Mini PC",
    "Stick PC",
];

code_label!(
    /// Memory Device type, offset 0x12 of a type 17 structure.
    MemoryType,
    MEMORY_TYPES,
    0xFF
);

code_label!(
    /// Memory Device form factor, offset 0x0E of a type 17 structure.
    FormFactor,
    FORM_FACTORS,
    0xFF
);

code_label!(
    /// Enclosure type, offset 0x05 of a type 3 structure. Bit 7 flags a
    /// chassis lock and is ignored.
    ChassisType,
    CHASSIS_TYPES,
    0x7F
);
