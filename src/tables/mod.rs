use thiserror::Error;

pub mod builder;
pub mod cmap;

/// Represents the error messages which may occur when trying
/// to lay out a table as a list of fixed-width fields
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableEncodingError {
    #[error("Glyph {0} can not be addressed by a 16-bit glyph id")]
    GlyphIndexOverflow(usize),

    #[error("{0} segments do not fit in a format 4 subtable")]
    TooManySegments(usize),
}

/// Represents the platform identifier of an encoding record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformId {
    Unicode,
    Macintosh,
    Reserved,
    Windows,
    Custom,
    Unknown(u16),
}

impl From<u16> for PlatformId {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Unicode,
            1 => Self::Macintosh,
            2 => Self::Reserved,
            3 => Self::Windows,
            4 => Self::Custom,
            _ => Self::Unknown(value),
        }
    }
}

impl From<PlatformId> for u16 {
    fn from(value: PlatformId) -> Self {
        match value {
            PlatformId::Unicode => 0,
            PlatformId::Macintosh => 1,
            PlatformId::Reserved => 2,
            PlatformId::Windows => 3,
            PlatformId::Custom => 4,
            PlatformId::Unknown(id) => id,
        }
    }
}
