use super::super::{Structure, Version};

const SOCKET_DESIGNATION: usize = 0x04;
const VERSION: usize = 0x10;
const CURRENT_SPEED: usize = 0x16;
const SERIAL_NUMBER: usize = 0x20;
const PART_NUMBER: usize = 0x22;
const CORE_COUNT: usize = 0x23;
const THREAD_COUNT: usize = 0x25;
const CORE_COUNT_2: usize = 0x2A;
const THREAD_COUNT_2: usize = 0x2E;

/// Processor Information (type 4).
///
/// Numeric fields are read at fixed offsets and only when both the table
/// version defines them and the structure is long enough to hold them.
#[derive(Copy, Clone, Debug)]
pub struct Processor<'a> {
    structure: &'a Structure,
    version: Version,
}

impl<'a> Processor<'a> {
    pub fn new(structure: &'a Structure, version: Version) -> Self {
        Self { structure, version }
    }

    pub fn structure(&self) -> &'a Structure {
        self.structure
    }

    pub fn socket_designation(&self) -> Option<&'a str> {
        self.structure.string_at(SOCKET_DESIGNATION)
    }

    pub fn processor_version(&self) -> Option<&'a str> {
        self.structure.string_at(VERSION)
    }

    pub fn serial_number(&self) -> Option<&'a str> {
        self.string_since(2, 3, SERIAL_NUMBER)
    }

    pub fn part_number(&self) -> Option<&'a str> {
        self.string_since(2, 3, PART_NUMBER)
    }

    /// Speed at boot in MHz.
    pub fn current_speed(&self) -> Option<u16> {
        self.speed(CURRENT_SPEED)
    }

    pub fn core_count(&self) -> Option<u16> {
        self.count(CORE_COUNT, CORE_COUNT_2)
    }

    pub fn thread_count(&self) -> Option<u16> {
        self.count(THREAD_COUNT, THREAD_COUNT_2)
    }

    fn string_since(&self, major: u8, minor: u8, offset: usize) -> Option<&'a str> {
        if !self.version.at_least(major, minor) {
            return None;
        }
        self.structure.string_at(offset)
    }

    // zero means unknown
    fn speed(&self, offset: usize) -> Option<u16> {
        self.structure
            .formatted()
            .u16(offset)
            .filter(|mhz| *mhz != 0)
    }

    /// Read a one byte count (2.5+). A value of 0xFF defers to the two byte
    /// count at `extended` on 3.0+ tables.
    fn count(&self, offset: usize, extended: usize) -> Option<u16> {
        if !self.version.at_least(2, 5) {
            return None;
        }

        let f = self.structure.formatted();
        match f.u8(offset)? {
            0 => None,
            0xFF if self.version.at_least(3, 0) => match f.u16(extended) {
                Some(0) | Some(0xFFFF) | None => Some(0xFF),
                Some(count) => Some(count),
            },
            count => Some(count as u16),
        }
    }
}
