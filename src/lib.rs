use buffer::VeroBufReaderError;
use tables::{TableEncodingError, cmap::CmapError};
use thiserror::Error;

pub mod buffer;
pub mod glyphs;
pub mod tables;

pub use glyphs::{Glyph, GlyphSet};
pub use tables::builder::{Field, FieldValue, Table};
pub use tables::cmap::{
    CmapTable, GlyphVariation, Subtable, SubtableRecord, make_cmap_table, parse_cmap_table,
};

#[derive(Debug, Error)]
pub enum VeroCmapError {
    #[error(transparent)]
    TableEncodingError(#[from] TableEncodingError),

    #[error(transparent)]
    CmapError(#[from] CmapError),

    #[error(transparent)]
    VeroBufReaderError(#[from] VeroBufReaderError),
}
