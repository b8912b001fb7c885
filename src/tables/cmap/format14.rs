// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-14-unicode-variation-sequences

use std::io::{Read, Seek};

use log::debug;

use crate::buffer::{VeroBufReader, VeroBufReaderError};

use super::{GlyphVariation, UvsGlyphMap};

/// Decodes a format 14 subtable. The reader must sit right after the format field,
/// `subtable_start` is the absolute position of that format field.
///
/// Default and non-default UVS offsets are relative to the subtable start.
pub fn parse<B: Read + Seek>(
    reader: &mut VeroBufReader<B>,
    subtable_start: u64,
) -> Result<UvsGlyphMap, VeroBufReaderError> {
    let _length = reader.read_u32()?;
    let records = reader.read_u32()?;

    let mut map = UvsGlyphMap::new();

    for _ in 0..records {
        let var_selector = reader.read_u24()?;
        let default_uvs_offset = reader.read_u32()?;
        let non_default_uvs_offset = reader.read_u32()?;
        let next_record = reader.position()?;

        let sequences = map.entry(var_selector).or_default();

        if default_uvs_offset != 0 {
            reader.seek_to(subtable_start + u64::from(default_uvs_offset))?;
            let ranges = reader.read_u32()?;
            for _ in 0..ranges {
                let start_unicode_value = reader.read_u24()?;
                let additional_count = reader.read_u8()?;
                for code_point in
                    start_unicode_value..=start_unicode_value + u32::from(additional_count)
                {
                    sequences.insert(code_point, GlyphVariation::UseDefault);
                }
            }
        }

        if non_default_uvs_offset != 0 {
            reader.seek_to(subtable_start + u64::from(non_default_uvs_offset))?;
            let mappings = reader.read_u32()?;
            for _ in 0..mappings {
                let unicode_value = reader.read_u24()?;
                let glyph_id = reader.read_u16()?;
                sequences.insert(unicode_value, GlyphVariation::Found(glyph_id));
            }
        }

        reader.seek_to(next_record)?;
    }

    debug!("Decoded format 14 subtable with {records} variation selectors");

    Ok(map)
}
