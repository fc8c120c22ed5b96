use super::super::{FormFactor, MemoryType, Structure, Version};

const DATA_WIDTH: usize = 0x0A;
const SIZE: usize = 0x0C;
const FORM_FACTOR: usize = 0x0E;
const BANK_LOCATOR: usize = 0x11;
const MEMORY_TYPE: usize = 0x12;
const MANUFACTURER: usize = 0x17;
const SERIAL_NUMBER: usize = 0x18;
const PART_NUMBER: usize = 0x1A;
const EXTENDED_SIZE: usize = 0x1C;
const CONFIGURED_SPEED: usize = 0x20;
const CONFIGURED_VOLTAGE: usize = 0x26;
const EXTENDED_CONFIGURED_SPEED: usize = 0x58;

/// Installed size of a memory device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemorySize {
    NotInstalled,
    Unknown,
    Kilobytes(u32),
    Megabytes(u32),
}

impl MemorySize {
    pub fn megabytes(&self) -> Option<u32> {
        match self {
            Self::Kilobytes(kb) => Some(kb / 1024),
            Self::Megabytes(mb) => Some(*mb),
            Self::NotInstalled => Some(0),
            Self::Unknown => None,
        }
    }

    /// Size in whole gigabytes of 1000 megabytes, which is how module sizes
    /// have always been reported (16384 MB is "16 GB").
    pub fn gigabytes(&self) -> Option<u32> {
        self.megabytes().map(|mb| mb / 1000)
    }
}

/// Memory Device (type 17).
#[derive(Copy, Clone, Debug)]
pub struct MemoryDevice<'a> {
    structure: &'a Structure,
    version: Version,
}

impl<'a> MemoryDevice<'a> {
    pub fn new(structure: &'a Structure, version: Version) -> Self {
        Self { structure, version }
    }

    pub fn structure(&self) -> &'a Structure {
        self.structure
    }

    pub fn bank_locator(&self) -> Option<&'a str> {
        self.structure.string_at(BANK_LOCATOR)
    }

    pub fn manufacturer(&self) -> Option<&'a str> {
        self.string_since(2, 3, MANUFACTURER)
    }

    pub fn serial_number(&self) -> Option<&'a str> {
        self.string_since(2, 3, SERIAL_NUMBER)
    }

    pub fn part_number(&self) -> Option<&'a str> {
        self.string_since(2, 3, PART_NUMBER)
    }

    /// Data width in bits.
    pub fn data_width(&self) -> Option<u16> {
        self.width(DATA_WIDTH)
    }

    pub fn size(&self) -> Option<MemorySize> {
        let f = self.structure.formatted();

        let size = match f.u16(SIZE)? {
            0 => MemorySize::NotInstalled,
            0xFFFF => MemorySize::Unknown,
            // before 2.7 this is an ordinary size of 32767 MB
            0x7FFF if !self.version.at_least(2, 7) => MemorySize::Megabytes(0x7FFF),
            0x7FFF => {
                // the real size lives in the extended size field, in MB
                match f.u32(EXTENDED_SIZE) {
                    Some(mb) => MemorySize::Megabytes(mb & 0x7FFF_FFFF),
                    None => MemorySize::Unknown,
                }
            }
            raw if raw & 0x8000 != 0 => MemorySize::Kilobytes((raw & 0x7FFF) as u32),
            raw => MemorySize::Megabytes(raw as u32),
        };

        Some(size)
    }

    pub fn form_factor(&self) -> Option<FormFactor> {
        self.structure.formatted().u8(FORM_FACTOR).map(FormFactor)
    }

    pub fn memory_type(&self) -> Option<MemoryType> {
        self.structure.formatted().u8(MEMORY_TYPE).map(MemoryType)
    }

    /// Configured speed in MT/s.
    pub fn configured_memory_speed(&self) -> Option<u32> {
        if !self.version.at_least(2, 7) {
            return None;
        }
        self.transfer_rate(CONFIGURED_SPEED, EXTENDED_CONFIGURED_SPEED)
    }

    /// Configured voltage in millivolts.
    pub fn configured_voltage(&self) -> Option<u16> {
        if !self.version.at_least(2, 8) {
            return None;
        }
        self.structure
            .formatted()
            .u16(CONFIGURED_VOLTAGE)
            .filter(|mv| *mv != 0)
    }

    fn string_since(&self, major: u8, minor: u8, offset: usize) -> Option<&'a str> {
        if !self.version.at_least(major, minor) {
            return None;
        }
        self.structure.string_at(offset)
    }

    // 0xFFFF means unknown
    fn width(&self, offset: usize) -> Option<u16> {
        self.structure
            .formatted()
            .u16(offset)
            .filter(|bits| *bits != 0xFFFF)
    }

    /// Read a 16-bit speed, following 0xFFFF to the 32-bit extended field
    /// (3.3+). Zero means unknown.
    fn transfer_rate(&self, offset: usize, extended: usize) -> Option<u32> {
        let f = self.structure.formatted();
        match f.u16(offset)? {
            0 => None,
            0xFFFF if self.version.at_least(3, 3) => f
                .u32(extended)
                .map(|mts| mts & 0x7FFF_FFFF)
                .filter(|mts| *mts != 0),
            0xFFFF => None,
            mts => Some(mts as u32),
        }
    }
}
