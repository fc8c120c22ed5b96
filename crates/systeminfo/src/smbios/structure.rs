/// Size of the header shared by every structure: type, length and handle.
pub const HEADER_LEN: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub kind: u8,
    /// Length of the formatted area, header included.
    pub length: u8,
    pub handle: u16,
}

/// One raw structure as framed in the table.
///
/// `formatted` holds exactly `header.length` bytes starting at the type byte,
/// so field offsets match the ones published for each structure type.
/// `strings` is the trailing string set; the formatted area refers to it with
/// 1-based indices, 0 meaning "not set".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    header: Header,
    formatted: Vec<u8>,
    strings: Vec<String>,
}

impl Structure {
    /// Build a structure from its formatted area, which must hold at least
    /// the 4-byte header.
    pub(crate) fn new(formatted: Vec<u8>, strings: Vec<String>) -> Self {
        let header = Header {
            kind: formatted[0],
            length: formatted[1],
            handle: u16::from_le_bytes([formatted[2], formatted[3]]),
        };

        Self {
            header,
            formatted,
            strings,
        }
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn kind(&self) -> u8 {
        self.header.kind
    }

    pub fn handle(&self) -> u16 {
        self.header.handle
    }

    pub fn formatted(&self) -> Formatted<'_> {
        Formatted {
            bytes: &self.formatted,
        }
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Look up a string by its 1-based index.
    pub fn string(&self, index: u8) -> Option<&str> {
        match index {
            0 => None,
            i => self.strings.get(i as usize - 1).map(String::as_str),
        }
    }

    /// Resolve the string whose index is stored at `offset`.
    pub fn string_at(&self, offset: usize) -> Option<&str> {
        self.formatted().u8(offset).and_then(|index| self.string(index))
    }

    /// Append the table encoding of this structure to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.formatted);

        if self.strings.is_empty() {
            out.push(0);
        }

        for s in &self.strings {
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }

        out.push(0);
    }
}

/// Bounds-checked little-endian reads over a formatted area.
///
/// Every read returns `None` when the field does not fit in the structure,
/// which is how older or vendor-trimmed structures lose trailing fields.
#[derive(Copy, Clone, Debug)]
pub struct Formatted<'a> {
    bytes: &'a [u8],
}

impl<'a> Formatted<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn bytes<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        let end = offset.checked_add(N)?;
        self.bytes.get(offset..end)?.try_into().ok()
    }

    pub fn u8(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    pub fn u16(&self, offset: usize) -> Option<u16> {
        self.bytes(offset).map(u16::from_le_bytes)
    }

    pub fn u32(&self, offset: usize) -> Option<u32> {
        self.bytes(offset).map(u32::from_le_bytes)
    }

    pub fn u64(&self, offset: usize) -> Option<u64> {
        self.bytes(offset).map(u64::from_le_bytes)
    }
}
