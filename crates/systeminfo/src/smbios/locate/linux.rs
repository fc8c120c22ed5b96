use std::fs::File;
use std::io::{Cursor, Read};

use memmap2::{Mmap, MmapOptions};

use super::super::entry::{Layout, ANCHOR_32, ANCHOR_64};
use super::{EntryPoint, Error, FileSource, TableSource};

const SYSFS_ENTRY_POINT: &str = "/sys/firmware/dmi/tables/smbios_entry_point";
const SYSFS_TABLE: &str = "/sys/firmware/dmi/tables/DMI";
const DEV_MEM: &str = "/dev/mem";

/// Legacy BIOS area searched for an anchor when sysfs is unavailable.
const BIOS_REGION_START: u64 = 0xF0000;
const BIOS_REGION_LEN: usize = 0x10000;
/// Anchors are aligned to paragraph boundaries.
const ANCHOR_ALIGN: usize = 16;
const MAX_ENTRY_POINT_LEN: usize = 0x20;

/// Prefers the sysfs export and falls back to scanning physical memory.
pub struct Linux {
    sysfs: FileSource,
    dev_mem: DevMem,
}

impl Default for Linux {
    fn default() -> Self {
        Self {
            sysfs: FileSource::new(SYSFS_ENTRY_POINT, SYSFS_TABLE),
            dev_mem: DevMem {
                path: DEV_MEM.into(),
            },
        }
    }
}

impl TableSource for Linux {
    fn open(&self) -> Result<(Box<dyn Read>, EntryPoint), Error> {
        match self.sysfs.open() {
            Err(Error::NotFound) => {
                debug!("smbios tables not exported in sysfs, scanning {DEV_MEM}");
                self.dev_mem.open()
            }
            result => result,
        }
    }
}

/// Finds the entry point by scanning the BIOS region of `/dev/mem` and maps
/// the table from the physical address it names.
pub struct DevMem {
    path: String,
}

impl TableSource for DevMem {
    fn open(&self) -> Result<(Box<dyn Read>, EntryPoint), Error> {
        let file = File::open(&self.path).map_err(|e| Error::open(e, &self.path))?;

        let region = map(&file, BIOS_REGION_START, BIOS_REGION_LEN)?;
        let entry_point = find_entry_point(&region).ok_or(Error::NotFound)?;
        drop(region);

        if entry_point.table_length == 0 {
            return Ok((Box::new(std::io::empty()), entry_point));
        }

        let table = map(
            &file,
            entry_point.table_address,
            entry_point.table_length as usize,
        )?;

        Ok((Box::new(Cursor::new(table)), entry_point))
    }
}

fn map(file: &File, offset: u64, len: usize) -> Result<Mmap, Error> {
    // SAFETY: the mapping is read-only and firmware tables are never
    // modified while the system is running.
    unsafe { MmapOptions::new().offset(offset).len(len).map(file) }.map_err(|e| {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => Error::PermissionDenied(DEV_MEM.into()),
            _ => Error::Io(e),
        }
    })
}

/// Scan `region` for a valid entry point. A 64-bit one wins wherever it is,
/// otherwise the first valid 32-bit one is used.
fn find_entry_point(region: &[u8]) -> Option<EntryPoint> {
    let candidates = (0..region.len())
        .step_by(ANCHOR_ALIGN)
        .map(|offset| &region[offset..region.len().min(offset + MAX_ENTRY_POINT_LEN)])
        .filter(|candidate| candidate.starts_with(ANCHOR_64) || candidate.starts_with(ANCHOR_32));

    let mut found = None;
    for candidate in candidates {
        match EntryPoint::parse(candidate) {
            Ok(entry_point) if entry_point.layout == Layout::Bits64 => return Some(entry_point),
            Ok(entry_point) => {
                found.get_or_insert(entry_point);
            }
            Err(e) => debug!("skipping smbios anchor candidate: {e}"),
        }
    }
    found
}
