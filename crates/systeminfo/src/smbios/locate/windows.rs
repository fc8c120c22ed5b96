use std::io::{self, Cursor, Read};

use windows_sys::Win32::System::SystemInformation::GetSystemFirmwareTable;

use super::{EntryPoint, Error, TableSource};

/// Provider signature of the raw SMBIOS firmware table.
const RSMB: u32 = u32::from_be_bytes(*b"RSMB");
const HEADER_LEN: usize = 8;

/// Reads the table through `GetSystemFirmwareTable`, which returns a small
/// `RawSMBIOSData` header followed by the structure table.
pub struct FirmwareTable;

impl TableSource for FirmwareTable {
    fn open(&self) -> Result<(Box<dyn Read>, EntryPoint), Error> {
        // SAFETY: a null buffer with zero size only queries the required size
        let size = unsafe { GetSystemFirmwareTable(RSMB, 0, std::ptr::null_mut(), 0) };
        if size == 0 {
            return Err(Error::NotFound);
        }

        let mut buffer = vec![0u8; size as usize];

        // SAFETY: the buffer is valid for writes of `size` bytes
        let written =
            unsafe { GetSystemFirmwareTable(RSMB, 0, buffer.as_mut_ptr().cast(), size) };
        if written == 0 || written > size {
            return Err(Error::Io(io::Error::last_os_error()));
        }
        buffer.truncate(written as usize);

        let entry_point = EntryPoint::parse_firmware_header(&buffer)?;
        let table = buffer.split_off(HEADER_LEN);

        Ok((Box::new(Cursor::new(table)), entry_point))
    }
}
