/// A single value in a table layout, tagged with its on-disk width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    UShort(u16),
    Short(i16),
    ULong(u32),
}

impl FieldValue {
    /// Size of the value in bytes once written
    pub fn size(&self) -> usize {
        match self {
            Self::UShort(_) | Self::Short(_) => 2,
            Self::ULong(_) => 4,
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        match *self {
            Self::UShort(v) => out.extend_from_slice(&v.to_be_bytes()),
            Self::Short(v) => out.extend_from_slice(&v.to_be_bytes()),
            Self::ULong(v) => out.extend_from_slice(&v.to_be_bytes()),
        }
    }
}

/// A named field of a table layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// An ordered description of a table: the fields are written back to back,
/// big-endian, with no implicit padding between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// The table tag, e.g. `cmap`
    pub tag: [u8; 4],
    pub fields: Vec<Field>,
}

impl Table {
    pub fn new(tag: [u8; 4]) -> Self {
        Self {
            tag,
            fields: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push(Field::new(name, value));
    }

    /// Returns the value of the first field called `name`
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value)
    }

    /// Total size of the table in bytes, without the trailing padding
    pub fn size_of(&self) -> usize {
        self.fields.iter().map(|field| field.value.size()).sum()
    }

    /// Serializes every field in order.
    ///
    /// ```
    /// use vero_cmap::{FieldValue, Table};
    ///
    /// let mut table = Table::new(*b"test");
    /// table.push("version", FieldValue::UShort(1));
    /// table.push("delta", FieldValue::Short(-2));
    ///
    /// assert_eq!(table.to_bytes(), [0x00, 0x01, 0xFF, 0xFE]);
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_of());
        for field in &self.fields {
            field.value.write_to(&mut out);
        }

        out
    }

    /// The table directory checksum: the wrapping sum of the table
    /// read as big-endian u32 words, zero padded to a 4 byte boundary.
    pub fn checksum(&self) -> u32 {
        self.to_bytes()
            .chunks(4)
            .map(|chunk| {
                let mut word = [0u8; 4];
                word[..chunk.len()].copy_from_slice(chunk);
                u32::from_be_bytes(word)
            })
            .fold(0u32, u32::wrapping_add)
    }
}
