//! SMBIOS/DMI table decoding.
//!
//! A decode session locates the raw table through a [`TableSource`], parses
//! the entry point for the specification version and table size, splits the
//! table into raw [`Structure`]s and exposes typed views over them.

use std::io;
use std::path::Path;

mod decode;
mod entry;
mod labels;
mod locate;
mod structure;
mod types;

pub use self::decode::{decode_table, Decoder};
pub use self::entry::{EntryPoint, Layout, Version};
pub use self::labels::{ChassisType, FormFactor, MemoryType};
pub use self::locate::{platform, FileSource, TableSource};
pub use self::structure::{Formatted, Header, Structure};
pub use self::types::{
    Baseboard, Bios, Enclosure, Kind, MemoryDevice, MemorySize, Processor, System, Table,
};

/// Structure type code marking the end of the table.
pub const END_OF_TABLE: u8 = 127;

/// Errors which abort a decode session.
///
/// Per-field problems inside an otherwise well-framed structure never show up
/// here; the typed accessors return `None` for those instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no SMBIOS table is exposed on this host")]
    NotFound,
    #[error("insufficient permissions to read {0}")]
    PermissionDenied(String),
    #[error("malformed entry point: {0}")]
    MalformedEntryPoint(&'static str),
    #[error("unsupported SMBIOS version: {0}.{1}")]
    UnsupportedVersion(u8, u8),
    #[error("truncated structure at offset {offset}: {needed} bytes needed, {available} available")]
    TruncatedStructure {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("invalid structure length {length} at offset {offset}")]
    InvalidLength { offset: usize, length: u8 },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Classify an I/O failure while opening `path`.
    pub(crate) fn open(error: io::Error, path: impl AsRef<Path>) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => {
                Self::PermissionDenied(path.as_ref().display().to_string())
            }
            _ => Self::Io(error),
        }
    }
}

/// A fully decoded SMBIOS table.
///
/// The table stream is opened, read front to back and closed before this is
/// returned, so holding a `Smbios` holds no OS resources.
#[derive(Clone, Debug)]
pub struct Smbios {
    entry_point: EntryPoint,
    structures: Vec<Structure>,
}

impl Smbios {
    /// Decode the table provided by `source`.
    pub fn from_source(source: &dyn TableSource) -> Result<Self, Error> {
        let (stream, entry_point) = source.open()?;

        debug!(
            "smbios {} entry point, version {}, table length {}",
            entry_point.layout,
            entry_point.version(),
            entry_point.table_length
        );

        // the decoder owns the stream and drops it on every exit path
        let structures = Decoder::new(stream, entry_point.table_length as usize).decode()?;

        debug!("decoded {} smbios structures", structures.len());

        Ok(Self {
            entry_point,
            structures,
        })
    }

    pub fn new(entry_point: EntryPoint, structures: Vec<Structure>) -> Self {
        Self {
            entry_point,
            structures,
        }
    }

    pub fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    pub fn version(&self) -> Version {
        self.entry_point.version()
    }

    /// Raw structures in table order.
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    /// Typed views over every structure, in table order.
    pub fn tables(&self) -> impl Iterator<Item = Table<'_>> {
        let version = self.version();
        self.structures
            .iter()
            .map(move |structure| Table::new(structure, version))
    }

    pub fn bios_information(&self) -> Option<Bios<'_>> {
        self.tables().find_map(|table| match table {
            Table::Bios(bios) => Some(bios),
            _ => None,
        })
    }

    pub fn system_information(&self) -> Option<System<'_>> {
        self.tables().find_map(|table| match table {
            Table::System(system) => Some(system),
            _ => None,
        })
    }

    pub fn baseboard_information(&self) -> Option<Baseboard<'_>> {
        self.tables().find_map(|table| match table {
            Table::Baseboard(baseboard) => Some(baseboard),
            _ => None,
        })
    }

    pub fn system_enclosure(&self) -> Option<Enclosure<'_>> {
        self.tables().find_map(|table| match table {
            Table::Enclosure(enclosure) => Some(enclosure),
            _ => None,
        })
    }

    pub fn processor_information(&self) -> Option<Processor<'_>> {
        self.tables().find_map(|table| match table {
            Table::Processor(processor) => Some(processor),
            _ => None,
        })
    }

    /// Every memory device, in table order.
    pub fn memory_devices(&self) -> impl Iterator<Item = MemoryDevice<'_>> {
        self.tables().filter_map(|table| match table {
            Table::MemoryDevice(device) => Some(device),
            _ => None,
        })
    }

    /// Re-encode the structures into table bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for structure in &self.structures {
            structure.encode(&mut out);
        }
        out
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Builders for synthetic tables.

    use super::*;

    /// Encode one structure: `body` is the formatted area after the 4-byte
    /// header.
    pub fn structure(kind: u8, handle: u16, body: &[u8], strings: &[&str]) -> Vec<u8> {
        let mut out = vec![kind, (body.len() + 4) as u8];
        out.extend_from_slice(&handle.to_le_bytes());
        out.extend_from_slice(body);
        if strings.is_empty() {
            out.push(0);
        }
        for s in strings {
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }
        out.push(0);
        out
    }

    pub fn end_of_table(handle: u16) -> Vec<u8> {
        structure(END_OF_TABLE, handle, &[], &[])
    }

    pub fn entry_point(major: u8, minor: u8, table_length: u32) -> EntryPoint {
        EntryPoint {
            layout: Layout::Bits64,
            major,
            minor,
            revision: 0,
            table_length,
            table_address: 0,
        }
    }

    /// A source serving an in-memory table.
    pub struct MemorySource {
        pub entry_point: EntryPoint,
        pub table: Vec<u8>,
    }

    impl TableSource for MemorySource {
        fn open(&self) -> Result<(Box<dyn io::Read>, EntryPoint), Error> {
            Ok((
                Box::new(io::Cursor::new(self.table.clone())),
                self.entry_point.clone(),
            ))
        }
    }
}
