use log::{trace, warn};

use crate::{
    glyphs::GlyphSet,
    tables::{
        PlatformId, TableEncodingError,
        builder::{Field, FieldValue, Table},
    },
};

/// The encoder always writes a single Windows Unicode BMP subtable
pub const PLATFORM_ID: PlatformId = PlatformId::Windows;
pub const ENCODING_ID: u16 = 1;
pub const LANGUAGE: u16 = 0;

/// version + numTables + one encoding record
pub const SUBTABLE_OFFSET: u32 = 12;

// format, length, language, segCountX2, searchRange, entrySelector, rangeShift
const FORMAT4_HEADER_SIZE: usize = 14;

/// A format 4 segment mapping `start..=end` to glyphs by adding `delta`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: u16,
    pub end: u16,
    pub delta: i16,
    pub offset: u16,
    /// An explicit glyph for the glyph id array, unused by `build_segments`
    pub glyph_id: Option<u16>,
}

impl Segment {
    /// The mandatory last segment
    pub const TERMINATOR: Self = Self {
        start: 0xFFFF,
        end: 0xFFFF,
        delta: 1,
        offset: 0,
        glyph_id: None,
    };

    /// A segment covering exactly one code point
    pub fn single(code_point: u16, glyph_index: u16) -> Self {
        Self {
            start: code_point,
            end: code_point,
            // -(code_point - glyph_index) mod 0x10000
            delta: glyph_index.wrapping_sub(code_point) as i16,
            offset: 0,
            glyph_id: None,
        }
    }
}

/// Binary search hints stored in a format 4 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

impl SearchParams {
    /// Computes the hints for `seg_count` segments, terminator included.
    ///
    /// ```
    /// use vero_cmap::tables::cmap::SearchParams;
    ///
    /// let params = SearchParams::new(39);
    /// assert_eq!(params.search_range, 64);
    /// assert_eq!(params.entry_selector, 5);
    /// assert_eq!(params.range_shift, 14);
    /// ```
    pub fn new(seg_count: u16) -> Self {
        let seg_count = u32::from(seg_count.max(1));
        let entry_selector = seg_count.ilog2();
        let search_range = 2 * (1u32 << entry_selector);

        Self {
            search_range: search_range as u16,
            entry_selector: entry_selector as u16,
            range_shift: (seg_count * 2 - search_range) as u16,
        }
    }
}

/// Builds one single code point segment per mapped code point, sorted by
/// start and followed by the terminator. Adjacent code points are not merged.
///
/// Code points outside the BMP, and 0xFFFF itself, can not be represented
/// next to the terminator and are dropped with a warning.
pub fn build_segments<G: GlyphSet + ?Sized>(
    glyphs: &G,
) -> Result<Vec<Segment>, TableEncodingError> {
    let mut segments = Vec::new();

    for index in 0..glyphs.glyph_count() {
        for &unicode in glyphs.unicodes(index) {
            let code_point = match u16::try_from(unicode) {
                Ok(code_point) if code_point != 0xFFFF => code_point,
                _ => {
                    warn!("Glyph {index}: code point U+{unicode:04X} does not fit in a format 4 cmap");
                    continue;
                }
            };

            let glyph_index =
                u16::try_from(index).map_err(|_| TableEncodingError::GlyphIndexOverflow(index))?;

            segments.push(Segment::single(code_point, glyph_index));
        }

        segments.sort_by_key(|segment| segment.start);
    }

    segments.push(Segment::TERMINATOR);

    Ok(segments)
}

/// Lays out a cmap table with a single format 4 subtable for `glyphs`.
///
/// The result is a field list, the bytes come from `Table::to_bytes`.
pub fn make_cmap_table<G: GlyphSet + ?Sized>(glyphs: &G) -> Result<Table, TableEncodingError> {
    let segments = build_segments(glyphs)?;
    let seg_count = u16::try_from(segments.len())
        .ok()
        .filter(|count| *count <= u16::MAX / 2)
        .ok_or(TableEncodingError::TooManySegments(segments.len()))?;

    let mut end_counts = Vec::with_capacity(segments.len());
    let mut start_counts = Vec::with_capacity(segments.len());
    let mut id_deltas = Vec::with_capacity(segments.len());
    let mut id_range_offsets = Vec::with_capacity(segments.len());
    let mut glyph_ids = Vec::new();

    for (i, segment) in segments.iter().enumerate() {
        end_counts.push(Field::new(format!("endCount_{i}"), FieldValue::UShort(segment.end)));
        start_counts.push(Field::new(format!("startCount_{i}"), FieldValue::UShort(segment.start)));
        id_deltas.push(Field::new(format!("idDelta_{i}"), FieldValue::Short(segment.delta)));
        id_range_offsets.push(Field::new(
            format!("idRangeOffset_{i}"),
            FieldValue::UShort(segment.offset),
        ));

        if let Some(glyph_id) = segment.glyph_id {
            glyph_ids.push(Field::new(format!("glyphId_{i}"), FieldValue::UShort(glyph_id)));
        }
    }

    let reserved_pad = Field::new("reservedPad", FieldValue::UShort(0));

    let arrays_size: usize = [&end_counts, &start_counts, &id_deltas, &id_range_offsets, &glyph_ids]
        .iter()
        .flat_map(|fields| fields.iter())
        .map(|field| field.value.size())
        .sum();
    let length = FORMAT4_HEADER_SIZE + reserved_pad.value.size() + arrays_size;
    let length =
        u16::try_from(length).map_err(|_| TableEncodingError::TooManySegments(segments.len()))?;

    let seg_count_x2 = seg_count * 2;
    let params = SearchParams::new(seg_count);

    trace!(
        "format 4 header: length {length}, segCountX2 {seg_count_x2}, searchRange {}, entrySelector {}, rangeShift {}",
        params.search_range, params.entry_selector, params.range_shift
    );

    let mut table = Table::new(*b"cmap");
    table.push("version", FieldValue::UShort(0));
    table.push("numTables", FieldValue::UShort(1));
    table.push("platformID", FieldValue::UShort(PLATFORM_ID.into()));
    table.push("encodingID", FieldValue::UShort(ENCODING_ID));
    table.push("offset", FieldValue::ULong(SUBTABLE_OFFSET));
    table.push("format", FieldValue::UShort(4));
    table.push("length", FieldValue::UShort(length));
    table.push("language", FieldValue::UShort(LANGUAGE));
    table.push("segCountX2", FieldValue::UShort(seg_count_x2));
    table.push("searchRange", FieldValue::UShort(params.search_range));
    table.push("entrySelector", FieldValue::UShort(params.entry_selector));
    table.push("rangeShift", FieldValue::UShort(params.range_shift));

    table.fields.extend(end_counts);
    table.fields.push(reserved_pad);
    table.fields.extend(start_counts);
    table.fields.extend(id_deltas);
    table.fields.extend(id_range_offsets);
    table.fields.extend(glyph_ids);

    Ok(table)
}
