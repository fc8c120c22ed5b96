use core::fmt;

use super::{Error, Formatted};

/// Anchor of the 32-bit (SMBIOS 2.1+) entry point.
pub const ANCHOR_32: &[u8; 4] = b"_SM_";
/// Anchor of the 64-bit (SMBIOS 3.0+) entry point.
pub const ANCHOR_64: &[u8; 5] = b"_SM3_";
/// Intermediate anchor embedded in the 32-bit entry point.
const INTERMEDIATE_ANCHOR: &[u8; 5] = b"_DMI_";

const ENTRY_32_MIN_LEN: usize = 0x1F;
const ENTRY_64_MIN_LEN: usize = 0x18;
const FIRMWARE_HEADER_LEN: usize = 8;

/// Which binary layout an entry point was read from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// `_SM_` anchored, 32-bit table address.
    Bits32,
    /// `_SM3_` anchored, 64-bit table address. The table length is a maximum.
    Bits64,
    /// The `RawSMBIOSData` header returned by the Windows firmware table API.
    Firmware,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits32 => f.write_str("32-bit"),
            Self::Bits64 => f.write_str("64-bit"),
            Self::Firmware => f.write_str("firmware"),
        }
    }
}

/// SMBIOS specification version implemented by a table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8, revision: u8) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// True if this version is `major.minor` or later.
    pub fn at_least(&self, major: u8, minor: u8) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// The parsed entry point of an SMBIOS table. Immutable once parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPoint {
    pub layout: Layout,
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
    /// Size of the structure table in bytes.
    pub table_length: u32,
    /// Physical address of the structure table, zero when not applicable.
    pub table_address: u64,
}

impl EntryPoint {
    /// Parse an anchored entry point, dispatching on its signature.
    ///
    /// Both layouts carry a checksum over the whole entry point, which must
    /// sum to zero. The 32-bit layout additionally carries an intermediate
    /// `_DMI_` block with its own checksum.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        let entry = if data.starts_with(ANCHOR_64) {
            Self::parse_64(data)?
        } else if data.starts_with(ANCHOR_32) {
            Self::parse_32(data)?
        } else {
            return Err(Error::MalformedEntryPoint("unrecognized anchor"));
        };

        entry.check_version()?;

        Ok(entry)
    }

    fn parse_32(data: &[u8]) -> Result<Self, Error> {
        if data.len() < ENTRY_32_MIN_LEN {
            return Err(Error::MalformedEntryPoint("32-bit entry point too short"));
        }

        let len = match (data[0x05] as usize, data[0x06], data[0x07]) {
            // some 2.1 firmware reports 0x1E for a 0x1F byte entry point
            (0x1E, 2, 1) => ENTRY_32_MIN_LEN,
            (len, _, _) => len,
        };
        if len < ENTRY_32_MIN_LEN || data.len() < len {
            return Err(Error::MalformedEntryPoint("bad 32-bit entry point length"));
        }

        if !checksum(&data[..len]) {
            return Err(Error::MalformedEntryPoint("entry point checksum mismatch"));
        }

        let intermediate = &data[0x10..0x1F];
        if !intermediate.starts_with(INTERMEDIATE_ANCHOR) {
            return Err(Error::MalformedEntryPoint("missing intermediate anchor"));
        }
        if !checksum(intermediate) {
            return Err(Error::MalformedEntryPoint(
                "intermediate checksum mismatch",
            ));
        }

        Ok(Self {
            layout: Layout::Bits32,
            major: data[0x06],
            minor: data[0x07],
            revision: 0,
            table_length: u16::from_le_bytes([data[0x16], data[0x17]]) as u32,
            table_address: u32::from_le_bytes([data[0x18], data[0x19], data[0x1A], data[0x1B]])
                as u64,
        })
    }

    fn parse_64(data: &[u8]) -> Result<Self, Error> {
        if data.len() < ENTRY_64_MIN_LEN {
            return Err(Error::MalformedEntryPoint("64-bit entry point too short"));
        }

        let len = data[0x06] as usize;
        if len < ENTRY_64_MIN_LEN || data.len() < len {
            return Err(Error::MalformedEntryPoint("bad 64-bit entry point length"));
        }

        if !checksum(&data[..len]) {
            return Err(Error::MalformedEntryPoint("entry point checksum mismatch"));
        }

        let fields = Formatted::new(&data[..len]);
        let short = || Error::MalformedEntryPoint("64-bit entry point too short");

        Ok(Self {
            layout: Layout::Bits64,
            major: data[0x07],
            minor: data[0x08],
            revision: data[0x09],
            table_length: fields.u32(0x0C).ok_or_else(short)?,
            table_address: fields.u64(0x10).ok_or_else(short)?,
        })
    }

    /// Parse the 8-byte `RawSMBIOSData` header which precedes the table in
    /// the Windows firmware table buffer.
    ///
    /// This layout has no anchor and no checksum.
    pub fn parse_firmware_header(data: &[u8]) -> Result<Self, Error> {
        if data.len() < FIRMWARE_HEADER_LEN {
            return Err(Error::MalformedEntryPoint("firmware header too short"));
        }

        let entry = Self {
            layout: Layout::Firmware,
            major: data[1],
            minor: data[2],
            revision: data[3],
            table_length: Formatted::new(data)
                .u32(4)
                .ok_or(Error::MalformedEntryPoint("firmware header too short"))?,
            table_address: 0,
        };

        entry.check_version()?;

        Ok(entry)
    }

    pub fn version(&self) -> Version {
        Version::new(self.major, self.minor, self.revision)
    }

    // structure layouts are only defined from 2.0 onward
    fn check_version(&self) -> Result<(), Error> {
        if self.major < 2 {
            return Err(Error::UnsupportedVersion(self.major, self.minor));
        }
        Ok(())
    }
}

/// True if the bytes sum to zero with 8-bit wrapping addition.
fn checksum(data: &[u8]) -> bool {
    data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)) == 0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Patch the checksum byte at `at` so `data` sums to zero.
    fn seal(data: &mut [u8], at: usize) {
        data[at] = 0;
        let sum = data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        data[at] = 0u8.wrapping_sub(sum);
    }

    pub fn entry_32(major: u8, minor: u8, table_length: u16, address: u32) -> Vec<u8> {
        let mut data = vec![0u8; 0x1F];
        data[..4].copy_from_slice(ANCHOR_32);
        data[0x05] = 0x1F;
        data[0x06] = major;
        data[0x07] = minor;
        data[0x08..0x0A].copy_from_slice(&0x100u16.to_le_bytes());
        data[0x10..0x15].copy_from_slice(INTERMEDIATE_ANCHOR);
        data[0x16..0x18].copy_from_slice(&table_length.to_le_bytes());
        data[0x18..0x1C].copy_from_slice(&address.to_le_bytes());
        data[0x1C..0x1E].copy_from_slice(&12u16.to_le_bytes());
        data[0x1E] = (major << 4) | minor;
        seal(&mut data[0x10..0x1F], 0x05);
        seal(&mut data, 0x04);
        data
    }

    pub fn entry_64(major: u8, minor: u8, docrev: u8, table_length: u32, address: u64) -> Vec<u8> {
        let mut data = vec![0u8; 0x18];
        data[..5].copy_from_slice(ANCHOR_64);
        data[0x06] = 0x18;
        data[0x07] = major;
        data[0x08] = minor;
        data[0x09] = docrev;
        data[0x0A] = 1;
        data[0x0C..0x10].copy_from_slice(&table_length.to_le_bytes());
        data[0x10..0x18].copy_from_slice(&address.to_le_bytes());
        seal(&mut data, 0x05);
        data
    }

    #[test]
    fn parse_32_bit() {
        let data = entry_32(2, 8, 0x0C2D, 0x000F_0000);
        let entry = EntryPoint::parse(&data).unwrap();

        assert_eq!(entry.layout, Layout::Bits32);
        assert_eq!(entry.version(), Version::new(2, 8, 0));
        assert_eq!(entry.table_length, 0x0C2D);
        assert_eq!(entry.table_address, 0x000F_0000);
    }

    #[test]
    fn parse_64_bit() {
        let data = entry_64(3, 3, 1, 0x1_0000, 0x7AF0_9000);
        let entry = EntryPoint::parse(&data).unwrap();

        assert_eq!(entry.layout, Layout::Bits64);
        assert_eq!(entry.version(), Version::new(3, 3, 1));
        assert_eq!(entry.table_length, 0x1_0000);
        assert_eq!(entry.table_address, 0x7AF0_9000);
    }

    #[test]
    fn bad_checksum() {
        let mut data = entry_64(3, 0, 0, 100, 0);
        data[0x05] = data[0x05].wrapping_add(1);
        assert!(matches!(
            EntryPoint::parse(&data),
            Err(Error::MalformedEntryPoint(_))
        ));

        let mut data = entry_32(2, 7, 100, 0);
        // corrupt the intermediate block but keep the outer sum intact
        data[0x1C] = data[0x1C].wrapping_add(1);
        data[0x0B] = data[0x0B].wrapping_sub(1);
        assert!(checksum(&data));
        assert!(matches!(
            EntryPoint::parse(&data),
            Err(Error::MalformedEntryPoint("intermediate checksum mismatch"))
        ));
    }

    #[test]
    fn short_length_on_2_1() {
        let mut data = entry_32(2, 1, 0x0200, 0x000F_0000);
        data[0x05] = 0x1E;
        data[0x04] = data[0x04].wrapping_add(1);
        let entry = EntryPoint::parse(&data).unwrap();
        assert_eq!(entry.version(), Version::new(2, 1, 0));
        assert_eq!(entry.table_length, 0x0200);

        let mut data = entry_32(2, 8, 0x0200, 0x000F_0000);
        data[0x05] = 0x1E;
        data[0x04] = data[0x04].wrapping_add(1);
        assert!(matches!(
            EntryPoint::parse(&data),
            Err(Error::MalformedEntryPoint("bad 32-bit entry point length"))
        ));
    }

    #[test]
    fn unrecognized_anchor() {
        assert!(matches!(
            EntryPoint::parse(b"_DMI_ not an entry point"),
            Err(Error::MalformedEntryPoint("unrecognized anchor"))
        ));
        assert!(matches!(
            EntryPoint::parse(&[]),
            Err(Error::MalformedEntryPoint(_))
        ));
    }

    #[test]
    fn truncated_entry_point() {
        let data = entry_64(3, 0, 0, 100, 0);
        assert!(matches!(
            EntryPoint::parse(&data[..0x10]),
            Err(Error::MalformedEntryPoint(_))
        ));
    }

    #[test]
    fn unsupported_version() {
        let data = entry_64(1, 9, 0, 100, 0);
        assert!(matches!(
            EntryPoint::parse(&data),
            Err(Error::UnsupportedVersion(1, 9))
        ));
    }

    #[test]
    fn firmware_header() {
        let data = [0, 3, 4, 0, 0x10, 0x02, 0, 0, 0xAA];
        let entry = EntryPoint::parse_firmware_header(&data).unwrap();

        assert_eq!(entry.layout, Layout::Firmware);
        assert_eq!(entry.version(), Version::new(3, 4, 0));
        assert_eq!(entry.table_length, 0x0210);

        assert!(EntryPoint::parse_firmware_header(&data[..7]).is_err());
    }

    #[test]
    fn version_ordering() {
        let v = Version::new(2, 7, 0);
        assert!(v.at_least(2, 5));
        assert!(v.at_least(2, 7));
        assert!(!v.at_least(2, 8));
        assert!(!v.at_least(3, 0));
        assert!(Version::new(3, 0, 0).at_least(2, 8));
    }
}
