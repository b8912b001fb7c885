/// An ordered glyph collection as seen by the cmap encoder.
///
/// Glyph indices are positions in the collection, so the first glyph
/// (usually `.notdef`) is glyph 0.
pub trait GlyphSet {
    /// The number of glyphs in the collection
    fn glyph_count(&self) -> usize;

    /// The Unicode code points assigned to the glyph at `index`,
    /// in the order they were assigned.
    fn unicodes(&self, index: usize) -> &[u32];
}

/// A glyph reduced to the part the cmap table cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glyph {
    /// Assigned code points, the first one being the primary
    pub unicodes: Vec<u32>,
}

impl Glyph {
    pub fn new(unicodes: &[u32]) -> Self {
        Self {
            unicodes: unicodes.to_vec(),
        }
    }

    /// A glyph with no code points, such as `.notdef`
    pub fn unmapped() -> Self {
        Self::default()
    }
}

impl GlyphSet for [Glyph] {
    fn glyph_count(&self) -> usize {
        self.len()
    }

    fn unicodes(&self, index: usize) -> &[u32] {
        match self.get(index) {
            Some(glyph) => &glyph.unicodes,
            None => &[],
        }
    }
}

impl GlyphSet for Vec<Glyph> {
    fn glyph_count(&self) -> usize {
        self.as_slice().glyph_count()
    }

    fn unicodes(&self, index: usize) -> &[u32] {
        self.as_slice().unicodes(index)
    }
}
