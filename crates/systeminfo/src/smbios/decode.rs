use std::io::Read;

use super::structure::HEADER_LEN;
use super::{Error, Structure, END_OF_TABLE};

/// Splits a table stream into raw structures.
pub struct Decoder<R> {
    reader: R,
    table_length: usize,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R, table_length: usize) -> Self {
        Self {
            reader,
            table_length,
        }
    }

    /// Read at most `table_length` bytes and decode them.
    ///
    /// Consumes the decoder so the underlying stream is released whether or
    /// not decoding succeeds.
    pub fn decode(self) -> Result<Vec<Structure>, Error> {
        let mut data = Vec::new();
        self.reader
            .take(self.table_length as u64)
            .read_to_end(&mut data)?;

        decode_table(&data, self.table_length)
    }
}

/// Decode a table held in memory.
///
/// Decoding stops after the end-of-table structure or once `table_length`
/// bytes have been consumed, whichever comes first. Structures are returned
/// in table order, the end-of-table structure included.
pub fn decode_table(data: &[u8], table_length: usize) -> Result<Vec<Structure>, Error> {
    let data = &data[..data.len().min(table_length)];

    let mut structures = Vec::new();
    let mut offset = 0;

    while offset < table_length {
        let (structure, next) = decode_structure(data, offset, table_length)?;

        trace!(
            "structure type {} handle {:#06x} length {} at offset {offset}",
            structure.kind(),
            structure.handle(),
            structure.header().length
        );

        let end = structure.kind() == END_OF_TABLE;
        structures.push(structure);
        offset = next;

        if end {
            break;
        }
    }

    Ok(structures)
}

/// Decode the structure starting at `offset`, returning it with the offset
/// of the structure that follows.
fn decode_structure(
    data: &[u8],
    offset: usize,
    table_length: usize,
) -> Result<(Structure, usize), Error> {
    let truncated = |needed: usize| Error::TruncatedStructure {
        offset,
        needed,
        available: data.len().saturating_sub(offset),
    };

    // the declared table claims more bytes than the stream delivered
    if data.len() < offset + HEADER_LEN {
        return Err(truncated(HEADER_LEN.max(table_length - offset)));
    }

    let length = data[offset + 1];
    if (length as usize) < HEADER_LEN {
        return Err(Error::InvalidLength { offset, length });
    }

    let formatted_end = offset + length as usize;
    if data.len() < formatted_end {
        return Err(truncated(length as usize));
    }

    // the string set runs up to and including the first double null
    let strings_start = formatted_end;
    let terminator = data[strings_start..]
        .windows(2)
        .position(|w| w[0] == 0 && w[1] == 0)
        .ok_or_else(|| truncated(data.len() - offset + 1))?;

    let strings = data[strings_start..strings_start + terminator]
        .split(|b| *b == 0)
        .filter(|s| !s.is_empty())
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect();

    let next = strings_start + terminator + 2;

    Ok((
        Structure::new(data[offset..formatted_end].to_vec(), strings),
        next,
    ))
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn empty_table() {
        assert!(decode_table(&[], 0).unwrap().is_empty());
        assert!(Decoder::new(std::io::empty(), 0)
            .decode()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn structures_in_table_order() {
        let mut table = Vec::new();
        table.extend(structure(17, 0x1100, &[0; 4], &["DIMM A"]));
        table.extend(structure(2, 0x0200, &[1], &["Board Co"]));
        table.extend(structure(17, 0x1101, &[0; 4], &["DIMM B"]));
        table.extend(end_of_table(0xFEFF));

        let structures = decode_table(&table, table.len()).unwrap();
        let order: Vec<(u8, u16)> = structures
            .iter()
            .map(|s| (s.kind(), s.handle()))
            .collect();

        assert_eq!(
            order,
            vec![(17, 0x1100), (2, 0x0200), (17, 0x1101), (127, 0xFEFF)]
        );
        assert_eq!(structures[1].strings(), &["Board Co".to_string()]);
        assert_eq!(structures[1].formatted().len(), 5);
    }

    #[test]
    fn stops_at_end_of_table() {
        let mut table = Vec::new();
        table.extend(structure(1, 0x0100, &[1], &["Acme"]));
        table.extend(end_of_table(0x0101));
        // garbage after the marker is never examined
        table.extend_from_slice(&[0xFF, 0x02, 0xAA]);

        let structures = decode_table(&table, table.len()).unwrap();
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[1].kind(), END_OF_TABLE);
    }

    #[test]
    fn stops_at_table_length() {
        let first = structure(1, 0x0100, &[1], &["Acme"]);
        let mut table = first.clone();
        table.extend(structure(2, 0x0200, &[1], &["Board"]));

        let structures = decode_table(&table, first.len()).unwrap();
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].kind(), 1);
    }

    #[test]
    fn round_trip() {
        let mut table = Vec::new();
        table.extend(structure(
            0,
            0x0000,
            &[1, 2, 0, 0xF0, 3, 0x3F],
            &["Vendor", "1.2", "01/02/2020"],
        ));
        table.extend(structure(1, 0x0001, &[0; 23], &[]));
        table.extend(structure(4, 0x0004, &[0x11; 0x2C], &["a", "b", "c"]));
        table.extend(structure(200, 0x00C8, &[9, 9, 9], &["oem"]));
        table.extend(end_of_table(0x00FF));

        let structures = decode_table(&table, table.len()).unwrap();

        let mut encoded = Vec::new();
        for s in &structures {
            s.encode(&mut encoded);
        }
        assert_eq!(encoded, table);
    }

    #[test]
    fn declared_length_exceeds_stream() {
        let mut table = structure(1, 0x0100, &[1], &["Acme"]);
        let declared = table.len() + 32;

        let result = decode_table(&table, declared);
        assert!(matches!(
            result,
            Err(Error::TruncatedStructure { available: 0, .. })
        ));

        // the same through a stream that ends early
        table.truncate(table.len() - 3);
        let result = Decoder::new(&table[..], declared).decode();
        assert!(matches!(result, Err(Error::TruncatedStructure { .. })));
    }

    #[test]
    fn huge_declared_length_on_short_stream() {
        // the declared length is only an upper bound on what gets read
        let table = structure(1, 0x0100, &[1], &["Acme"]);
        let result = Decoder::new(&table[..], u32::MAX as usize).decode();
        assert!(matches!(result, Err(Error::TruncatedStructure { .. })));
    }

    #[test]
    fn structure_length_exceeds_buffer() {
        // declares a 0x40 byte formatted area but only 8 bytes follow
        let table = [4, 0x40, 0, 4, 1, 2, 3, 4, 5, 6, 7, 8];
        let result = decode_table(&table, table.len());
        assert!(matches!(
            result,
            Err(Error::TruncatedStructure {
                offset: 0,
                needed: 0x40,
                available: 12
            })
        ));
    }

    #[test]
    fn unterminated_string_set() {
        let table = [1, 5, 0, 1, 1, b'A', b'c', b'm', b'e', 0];
        let result = decode_table(&table, table.len());
        assert!(matches!(result, Err(Error::TruncatedStructure { .. })));
    }

    #[test]
    fn header_shorter_than_four_bytes() {
        let table = [1, 2, 0, 1, 0, 0];
        let result = decode_table(&table, table.len());
        assert!(matches!(
            result,
            Err(Error::InvalidLength {
                offset: 0,
                length: 2
            })
        ));
    }
}
