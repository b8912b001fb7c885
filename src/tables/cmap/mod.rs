use std::{
    collections::BTreeMap,
    io::{Read, Seek},
};

use log::debug;
use thiserror::Error;

use crate::{VeroCmapError, buffer::VeroBufReader};

use super::PlatformId;

mod encode;
pub mod format12;
pub mod format14;
pub mod format4;

pub use encode::{
    ENCODING_ID, LANGUAGE, PLATFORM_ID, SUBTABLE_OFFSET, SearchParams, Segment, build_segments,
    make_cmap_table,
};

/// Code point to glyph index
pub type GlyphIndexMap = BTreeMap<u32, u32>;

/// Variation selector to base code point to glyph
pub type UvsGlyphMap = BTreeMap<u32, BTreeMap<u32, GlyphVariation>>;

/// Represents the error messages specific to the cmap table
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CmapError {
    #[error("Unsupported cmap table version {0}, only version 0 exists")]
    MalformedVersion(u16),

    #[error("Unsupported cmap subtable format {0}")]
    UnsupportedFormat(u16),
}

/// The glyph selected by a Unicode variation sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphVariation {
    /// The sequence renders with the glyph the base code point maps to
    UseDefault,
    /// The sequence has a dedicated glyph
    Found(u16),
}

/// The decoded payload of a cmap subtable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subtable {
    Format4(GlyphIndexMap),
    Format12(GlyphIndexMap),
    Format14(UvsGlyphMap),
}

impl Subtable {
    pub fn format(&self) -> u16 {
        match self {
            Self::Format4(_) => 4,
            Self::Format12(_) => 12,
            Self::Format14(_) => 14,
        }
    }
}

/// A representation of the cmap [sub table](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6cmap.html)
/// along with the encoding record that pointed at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtableRecord {
    /// The platform identifier
    pub platform_id: PlatformId,

    /// The platform specific encoding identifier
    pub encoding_id: u16,

    pub subtable: Subtable,
}

impl SubtableRecord {
    pub fn format(&self) -> u16 {
        self.subtable.format()
    }
}

/// A representation of the [cmap table](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6cmap.html)
/// supporting formats 4 and 12 for Windows encodings and format 14 for
/// Unicode variation sequences. Other formats are either for specialized
/// uses or just never got materialized as the reference manual suggests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmapTable {
    /// The version of the cmap table, always zero
    pub version: u16,

    /// The number of encoding records in the directory
    pub num_tables: u16,

    /// Decoded subtables, last directory record first
    pub tables: Vec<SubtableRecord>,

    /// The union of every format 4 and 12 subtable. When two subtables
    /// map the same code point the one listed earlier in the directory wins.
    pub glyph_index_map: GlyphIndexMap,

    pub uvs_glyph_map: Option<UvsGlyphMap>,
}

impl CmapTable {
    /// Decodes a cmap table starting at `start` bytes into the reader.
    ///
    /// Returns `Ok(None)` when the table has no Windows subtable this crate
    /// understands, in which case the font should be treated as unsupported.
    pub fn from_reader<B: Read + Seek>(
        reader: &mut VeroBufReader<B>,
        start: u64,
    ) -> Result<Option<Self>, VeroCmapError> {
        reader.seek_to(start)?;

        let version = reader.read_u16()?;
        if version != 0 {
            return Err(CmapError::MalformedVersion(version).into());
        }

        let num_tables = reader.read_u16()?;

        let mut tables = Vec::new();
        let mut glyph_index_map = GlyphIndexMap::new();
        let mut uvs_glyph_map = None;
        let mut windows_subtable = None;

        // Walking backwards lets the earlier records overwrite the later ones
        for index in (0..num_tables).rev() {
            // version + numTables, then 8 bytes per encoding record
            reader.seek_to(start + 4 + u64::from(index) * 8)?;

            let platform_id = reader.read_u16()?;
            let encoding_id = reader.read_u16()?;
            let offset = reader.read_u32()?;
            let subtable_start = start + u64::from(offset);

            let subtable = match (platform_id, encoding_id) {
                (0, 5) => {
                    reader.seek_to(subtable_start)?;
                    let format = reader.read_u16()?;
                    if format != 14 {
                        debug!("Skipping format {format} subtable for Unicode variation sequences");
                        continue;
                    }

                    let map = format14::parse(reader, subtable_start)?;
                    uvs_glyph_map = Some(map.clone());
                    Subtable::Format14(map)
                }
                (3, 0 | 1 | 10) => {
                    reader.seek_to(subtable_start)?;
                    let format = reader.read_u16()?;
                    windows_subtable = Some(offset);

                    match format {
                        4 => Subtable::Format4(format4::parse(reader, &mut glyph_index_map)?),
                        12 => Subtable::Format12(format12::parse(reader, &mut glyph_index_map)?),
                        _ => return Err(CmapError::UnsupportedFormat(format).into()),
                    }
                }
                _ => {
                    debug!("Skipping cmap subtable for platform {platform_id}, encoding {encoding_id}");
                    continue;
                }
            };

            tables.push(SubtableRecord {
                platform_id: PlatformId::from(platform_id),
                encoding_id,
                subtable,
            });
        }

        if windows_subtable.is_none() {
            debug!("No supported Windows subtable among {num_tables} cmap encoding records");
            return Ok(None);
        }

        Ok(Some(Self {
            version,
            num_tables,
            tables,
            glyph_index_map,
            uvs_glyph_map,
        }))
    }

    /// Returns the glyph mapped to `code_point`, if any.
    /// Glyph 0 is `.notdef` and means the code point is not really covered.
    pub fn glyph_index(&self, code_point: u32) -> Option<u32> {
        self.glyph_index_map.get(&code_point).copied()
    }

    /// Returns the raw variation sequence entry for `code_point` followed by `selector`
    pub fn glyph_variation_index(&self, code_point: u32, selector: u32) -> Option<GlyphVariation> {
        self.uvs_glyph_map
            .as_ref()?
            .get(&selector)?
            .get(&code_point)
            .copied()
    }

    /// Like `glyph_variation_index`, but resolves `UseDefault` through the
    /// ordinary mapping of the base code point.
    pub fn resolve_variation(&self, code_point: u32, selector: u32) -> Option<u32> {
        match self.glyph_variation_index(code_point, selector)? {
            GlyphVariation::Found(glyph) => Some(u32::from(glyph)),
            GlyphVariation::UseDefault => self.glyph_index(code_point),
        }
    }
}

/// Decodes the cmap table found `start` bytes into `data`.
///
/// ```
/// use vero_cmap::parse_cmap_table;
///
/// let data = [
///     0x00, 0x00, // version: 0
///     0x00, 0x00, // numTables: 0
/// ];
///
/// assert!(parse_cmap_table(&data, 0).unwrap().is_none());
/// ```
pub fn parse_cmap_table(data: &[u8], start: u64) -> Result<Option<CmapTable>, VeroCmapError> {
    let mut reader = VeroBufReader::from_bytes(data);
    CmapTable::from_reader(&mut reader, start)
}
