// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values

use std::io::{Read, Seek};

use log::debug;

use crate::buffer::{VeroBufReader, VeroBufReaderError};

use super::GlyphIndexMap;

/// Decodes a format 4 subtable. The reader must sit right after the format field.
///
/// Every mapping is inserted both into the returned subtable map and into `unified`.
pub fn parse<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    unified: &mut GlyphIndexMap,
) -> Result<GlyphIndexMap, VeroBufReaderError> {
    let _length = reader.read_u16()?;
    let _language = reader.read_u16()?;
    let seg_count_x2 = reader.read_u16()?;
    reader.skip(6)?; // searchRange + entrySelector + rangeShift

    let seg_count = usize::from(seg_count_x2 / 2);

    let end_codes = read_array(reader, seg_count)?;
    reader.skip(2)?; // reservedPad
    let start_codes = read_array(reader, seg_count)?;
    // Signed on disk, only ever used in modulo 0x10000 arithmetic
    let id_deltas = read_array(reader, seg_count)?;
    let id_range_offsets_pos = reader.position()?;
    let id_range_offsets = read_array(reader, seg_count)?;

    let mut map = GlyphIndexMap::new();

    // The last segment is the 0xFFFF terminator.
    for i in 0..seg_count.saturating_sub(1) {
        let start = start_codes[i];
        let end = end_codes[i];
        let id_delta = id_deltas[i];
        let id_range_offset = id_range_offsets[i];
        let id_range_offset_pos = id_range_offsets_pos + i as u64 * 2;

        for code_point in start..=end {
            let glyph_id = if id_range_offset == 0 {
                code_point.wrapping_add(id_delta)
            } else {
                let pos = id_range_offset_pos
                    + u64::from(id_range_offset)
                    + u64::from(code_point - start) * 2;

                match reader.read_u16_at(pos)? {
                    // 0 is the missing glyph, the delta does not apply.
                    0 => 0,
                    glyph_id => glyph_id.wrapping_add(id_delta),
                }
            };

            map.insert(u32::from(code_point), u32::from(glyph_id));
            unified.insert(u32::from(code_point), u32::from(glyph_id));
        }
    }

    debug!("Decoded format 4 subtable with {} segments, {} mappings", seg_count, map.len());

    Ok(map)
}

fn read_array<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    len: usize,
) -> Result<Vec<u16>, VeroBufReaderError> {
    (0..len).map(|_| reader.read_u16()).collect()
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::{buffer::VeroBufReader, tables::cmap::GlyphIndexMap};

    fn decode(data: &[u8]) -> GlyphIndexMap {
        let mut reader = VeroBufReader::from_bytes(data);
        reader.skip(2).unwrap(); // format
        let mut unified = GlyphIndexMap::new();
        let map = parse(&mut reader, &mut unified).unwrap();
        assert_eq!(map, unified);
        map
    }

    #[test]
    fn single_glyph() {
        let data = &[
            0x00, 0x04, // format: 4
            0x00, 0x20, // subtable size: 32
            0x00, 0x00, // language ID: 0
            0x00, 0x04, // 2 x segCount: 4
            0x00, 0x02, // search range: 2
            0x00, 0x00, // entry selector: 0
            0x00, 0x02, // range shift: 2
            // End character codes
            0x00, 0x41, // char code [0]: 65
            0xFF, 0xFF, // char code [1]: 65535
            0x00, 0x00, // reserved: 0
            // Start character codes
            0x00, 0x41, // char code [0]: 65
            0xFF, 0xFF, // char code [1]: 65535
            // Deltas
            0xFF, 0xC0, // delta [0]: -64
            0x00, 0x01, // delta [1]: 1
            // Offsets into Glyph index array
            0x00, 0x00, // offset [0]: 0
            0x00, 0x00, // offset [1]: 0
        ];

        let map = decode(data);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&0x41), Some(&1));
        assert_eq!(map.get(&0xFFFF), None);
    }

    #[test]
    fn multiple_ranges() {
        let data = &[
            0x00, 0x04, // format: 4
            0x00, 0x30, // subtable size: 48
            0x00, 0x00, // language ID: 0
            0x00, 0x08, // 2 x segCount: 8
            0x00, 0x04, // search range: 4
            0x00, 0x01, // entry selector: 1
            0x00, 0x04, // range shift: 4
            // End character codes
            0x00, 0x41, // char code [0]: 65
            0x00, 0x45, // char code [1]: 69
            0x00, 0x49, // char code [2]: 73
            0xFF, 0xFF, // char code [3]: 65535
            0x00, 0x00, // reserved: 0
            // Start character codes
            0x00, 0x41, // char code [0]: 65
            0x00, 0x43, // char code [1]: 67
            0x00, 0x47, // char code [2]: 71
            0xFF, 0xFF, // char code [3]: 65535
            // Deltas
            0xFF, 0xC0, // delta [0]: -64
            0xFF, 0xBF, // delta [1]: -65
            0xFF, 0xBE, // delta [2]: -66
            0x00, 0x01, // delta [3]: 1
            // Offsets into Glyph index array
            0x00, 0x00, // offset [0]: 0
            0x00, 0x00, // offset [1]: 0
            0x00, 0x00, // offset [2]: 0
            0x00, 0x00, // offset [3]: 0
        ];

        let map = decode(data);
        let expected: Vec<(u32, u32)> = vec![
            (0x41, 1),
            (0x43, 2),
            (0x44, 3),
            (0x45, 4),
            (0x47, 5),
            (0x48, 6),
            (0x49, 7),
        ];
        assert_eq!(map.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn delta_wraps_around() {
        let data = &[
            0x00, 0x04, // format: 4
            0x00, 0x20, // subtable size: 32
            0x00, 0x00, // language ID: 0
            0x00, 0x04, // 2 x segCount: 4
            0x00, 0x02, // search range: 2
            0x00, 0x00, // entry selector: 0
            0x00, 0x02, // range shift: 2
            // End character codes
            0xF0, 0x01, // char code [0]: 61441
            0xFF, 0xFF, // char code [1]: 65535
            0x00, 0x00, // reserved: 0
            // Start character codes
            0xF0, 0x00, // char code [0]: 61440
            0xFF, 0xFF, // char code [1]: 65535
            // Deltas
            0x10, 0x05, // delta [0]: 4101
            0x00, 0x01, // delta [1]: 1
            // Offsets into Glyph index array
            0x00, 0x00, // offset [0]: 0
            0x00, 0x00, // offset [1]: 0
        ];

        let map = decode(data);
        // (0xF000 + 0x1005) mod 0x10000
        assert_eq!(map.get(&0xF000), Some(&5));
        assert_eq!(map.get(&0xF001), Some(&6));
    }

    #[test]
    fn glyph_id_array() {
        let data = &[
            0x00, 0x04, // format: 4
            0x00, 0x2A, // subtable size: 42
            0x00, 0x00, // language ID: 0
            0x00, 0x04, // 2 x segCount: 4
            0x00, 0x02, // search range: 2
            0x00, 0x00, // entry selector: 0
            0x00, 0x02, // range shift: 2
            // End character codes
            0x00, 0x45, // char code [0]: 69
            0xFF, 0xFF, // char code [1]: 65535
            0x00, 0x00, // reserved: 0
            // Start character codes
            0x00, 0x41, // char code [0]: 65
            0xFF, 0xFF, // char code [1]: 65535
            // Deltas
            0x00, 0x02, // delta [0]: 2
            0x00, 0x01, // delta [1]: 1
            // Offsets into Glyph index array
            0x00, 0x04, // offset [0]: 4
            0x00, 0x00, // offset [1]: 0
            // Glyph index array
            0x00, 0x01, // glyph ID [0]: 1
            0x00, 0x00, // glyph ID [1]: 0
            0x00, 0x64, // glyph ID [2]: 100
            0x03, 0xE8, // glyph ID [3]: 1000
            0xFF, 0xFF, // glyph ID [4]: 65535
        ];

        let map = decode(data);
        assert_eq!(map.get(&0x41), Some(&3));
        // A zero entry stays unmapped whatever the delta
        assert_eq!(map.get(&0x42), Some(&0));
        assert_eq!(map.get(&0x43), Some(&102));
        assert_eq!(map.get(&0x44), Some(&1002));
        assert_eq!(map.get(&0x45), Some(&1));
    }

    #[test]
    fn only_terminator() {
        let data = &[
            0x00, 0x04, // format: 4
            0x00, 0x18, // subtable size: 24
            0x00, 0x00, // language ID: 0
            0x00, 0x02, // 2 x segCount: 2
            0x00, 0x02, // search range: 2
            0x00, 0x00, // entry selector: 0
            0x00, 0x00, // range shift: 0
            0xFF, 0xFF, // end char code: 65535
            0x00, 0x00, // reserved: 0
            0xFF, 0xFF, // start char code: 65535
            0x00, 0x01, // delta: 1
            0x00, 0x00, // offset: 0
        ];

        assert!(decode(data).is_empty());
    }

    #[test]
    fn truncated_arrays() {
        let data = &[
            0x00, 0x04, // format: 4
            0x00, 0x20, // subtable size: 32
            0x00, 0x00, // language ID: 0
            0x00, 0x04, // 2 x segCount: 4
            0x00, 0x02, // search range: 2
            0x00, 0x00, // entry selector: 0
            0x00, 0x02, // range shift: 2
            0x00, 0x41, // char code [0]: 65
        ];

        let mut reader = VeroBufReader::from_bytes(data);
        reader.skip(2).unwrap();
        assert!(parse(&mut reader, &mut GlyphIndexMap::new()).is_err());
    }
}
