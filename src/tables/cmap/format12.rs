// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage

use std::io::{Read, Seek};

use log::debug;

use crate::buffer::{VeroBufReader, VeroBufReaderError};

use super::GlyphIndexMap;

/// Decodes a format 12 subtable. The reader must sit right after the format field.
///
/// Groups are applied in file order, so an overlapping later group wins.
pub fn parse<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    unified: &mut GlyphIndexMap,
) -> Result<GlyphIndexMap, VeroBufReaderError> {
    reader.skip(2)?; // reserved
    let _length = reader.read_u32()?;
    let _language = reader.read_u32()?;
    let groups = reader.read_u32()?;

    let mut map = GlyphIndexMap::new();

    for _ in 0..groups {
        let start_char_code = reader.read_u32()?;
        let end_char_code = reader.read_u32()?;
        let start_glyph_id = reader.read_u32()?;

        for code_point in start_char_code..=end_char_code {
            let glyph_id = start_glyph_id.wrapping_add(code_point - start_char_code);
            map.insert(code_point, glyph_id);
            unified.insert(code_point, glyph_id);
        }
    }

    debug!("Decoded format 12 subtable with {groups} groups, {} mappings", map.len());

    Ok(map)
}
