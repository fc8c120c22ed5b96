//! Typed views over raw structures.

use super::{Structure, Version};

mod memory;
mod processor;
mod system;

pub use self::memory::{MemoryDevice, MemorySize};
pub use self::processor::Processor;
pub use self::system::{Baseboard, Bios, Enclosure, System};

/// What a structure type code decodes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    BiosInformation,
    SystemInformation,
    BaseboardInformation,
    SystemEnclosure,
    ProcessorInformation,
    MemoryDevice,
    /// Defined by earlier revisions and since withdrawn.
    Obsolete,
    EndOfTable,
    /// Valid but without a typed view, including OEM types 128-255.
    Ignored,
}

static KINDS: [Kind; 256] = {
    let mut kinds = [Kind::Ignored; 256];
    kinds[0] = Kind::BiosInformation;
    kinds[1] = Kind::SystemInformation;
    kinds[2] = Kind::BaseboardInformation;
    kinds[3] = Kind::SystemEnclosure;
    kinds[4] = Kind::ProcessorInformation;
    // memory controller, memory module and on board devices
    kinds[5] = Kind::Obsolete;
    kinds[6] = Kind::Obsolete;
    kinds[10] = Kind::Obsolete;
    kinds[17] = Kind::MemoryDevice;
    kinds[127] = Kind::EndOfTable;
    kinds
};

impl Kind {
    pub fn from_code(code: u8) -> Self {
        KINDS[code as usize]
    }
}

/// A structure dispatched on its type code.
#[derive(Copy, Clone, Debug)]
pub enum Table<'a> {
    Bios(Bios<'a>),
    System(System<'a>),
    Baseboard(Baseboard<'a>),
    Enclosure(Enclosure<'a>),
    Processor(Processor<'a>),
    MemoryDevice(MemoryDevice<'a>),
    Obsolete(&'a Structure),
    EndOfTable(&'a Structure),
    Ignored(&'a Structure),
}

impl<'a> Table<'a> {
    /// `version` is the table's specification version, which decides which
    /// version-dependent fields are read.
    pub fn new(structure: &'a Structure, version: Version) -> Self {
        match Kind::from_code(structure.kind()) {
            Kind::BiosInformation => Self::Bios(Bios::new(structure)),
            Kind::SystemInformation => Self::System(System::new(structure, version)),
            Kind::BaseboardInformation => Self::Baseboard(Baseboard::new(structure)),
            Kind::SystemEnclosure => Self::Enclosure(Enclosure::new(structure)),
            Kind::ProcessorInformation => Self::Processor(Processor::new(structure, version)),
            Kind::MemoryDevice => Self::MemoryDevice(MemoryDevice::new(structure, version)),
            Kind::Obsolete => Self::Obsolete(structure),
            Kind::EndOfTable => Self::EndOfTable(structure),
            Kind::Ignored => Self::Ignored(structure),
        }
    }

    pub fn structure(&self) -> &'a Structure {
        match self {
            Self::Bios(t) => t.structure(),
            Self::System(t) => t.structure(),
            Self::Baseboard(t) => t.structure(),
            Self::Enclosure(t) => t.structure(),
            Self::Processor(t) => t.structure(),
            Self::MemoryDevice(t) => t.structure(),
            Self::Obsolete(s) | Self::EndOfTable(s) | Self::Ignored(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: u8) -> Structure {
        Structure::new(vec![kind, 4, 0, 0], vec![])
    }

    #[test]
    fn lookup() {
        assert_eq!(Kind::from_code(1), Kind::SystemInformation);
        assert_eq!(Kind::from_code(4), Kind::ProcessorInformation);
        assert_eq!(Kind::from_code(17), Kind::MemoryDevice);
        assert_eq!(Kind::from_code(6), Kind::Obsolete);
        assert_eq!(Kind::from_code(7), Kind::Ignored);
        assert_eq!(Kind::from_code(127), Kind::EndOfTable);
        assert_eq!(Kind::from_code(0xC0), Kind::Ignored);
    }

    #[test]
    fn obsolete_and_unknown_types_are_inert() {
        let version = Version::new(3, 0, 0);
        for code in [5u8, 6, 10, 7, 9, 38, 130, 255] {
            let s = raw(code);
            let table = Table::new(&s, version);
            assert!(
                matches!(table, Table::Obsolete(_) | Table::Ignored(_)),
                "type {code}"
            );
            assert_eq!(table.structure().kind(), code);
        }
    }

    #[test]
    fn minimal_structures_still_map() {
        // header only: every accessor must come back empty
        let version = Version::new(3, 4, 0);

        let s = raw(4);
        let Table::Processor(p) = Table::new(&s, version) else {
            panic!("expected processor");
        };
        assert_eq!(p.current_speed(), None);
        assert_eq!(p.core_count(), None);
        assert_eq!(p.socket_designation(), None);

        let s = raw(17);
        let Table::MemoryDevice(m) = Table::new(&s, version) else {
            panic!("expected memory device");
        };
        assert_eq!(m.size(), None);
        assert_eq!(m.memory_type(), None);
        assert_eq!(m.manufacturer(), None);
    }
}
