use std::io::{self, BufReader, Read, Seek, SeekFrom};

use thiserror::Error;

macro_rules! impl_read {
    ($fn_name:ident, $typ:ty) => {
        pub fn $fn_name(&mut self) -> Result<$typ, VeroBufReaderError> {
            let mut buf = [0u8; size_of::<$typ>()];

            self.inner.read_exact(&mut buf)?;

            Ok(<$typ>::from_be_bytes(buf))
        }
    };
}

/// Represents the possible errors that can occur when using `VeroBufReader`.
#[derive(Error, Debug)]
pub enum VeroBufReaderError {
    /// An error occurred during a read operation on the underlying buffer.
    /// Reading past the end of the buffer lands here as `UnexpectedEof`.
    #[error(transparent)]
    ReadError(#[from] io::Error),

    /// An error occurred during a seek operation on the underlying buffer.
    /// This variant contains the `std::io::Error` that caused the seek failure.
    #[error("Failed to seek, error context: {0}")]
    FailedToSeek(io::Error),
}

/// A big-endian cursor over a font buffer.
///
/// Reads are sequential from the current position; every table decoder
/// in this crate shares one reader and moves it around with `seek_to`.
pub struct VeroBufReader<B: Read + Seek> {
    inner: BufReader<B>,
}

impl<'a> VeroBufReader<io::Cursor<&'a [u8]>> {
    /// Wraps an in-memory byte slice.
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self::from_buffer(io::Cursor::new(data))
    }
}

impl<B> VeroBufReader<B>
where
    B: Read + Seek,
{
    /// Returns a new buf reader from anything which implements read
    /// the most obvious use case would be a File
    /// but it's also useful for loading fonts off a network buffer
    /// and such
    pub fn from_buffer(buffer: B) -> Self {
        Self {
            inner: BufReader::new(buffer),
        }
    }

    /// Seeks to a specifc place in the buffer
    /// from the start of the file
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use vero_cmap::buffer::VeroBufReader;
    ///
    /// let data = vec![0, 0, 0, 10, 0, 0, 0, 20]; // Represents two u32 values: 10 and 20 in big-endian
    /// let cursor = Cursor::new(data);
    /// let mut reader = VeroBufReader::from_buffer(cursor);
    ///
    /// // Seek to the beginning of the second u32 (at index 4)
    /// reader.seek_to(4).unwrap();
    /// let second_value = reader.read_u32().unwrap();
    /// assert_eq!(second_value, 20);
    /// ```
    pub fn seek_to(&mut self, pos: u64) -> Result<(), VeroBufReaderError> {
        self.inner
            .seek(SeekFrom::Start(pos))
            .map_err(VeroBufReaderError::FailedToSeek)?;

        Ok(())
    }

    /// Skips n bytes from the CURRENT cursor positon
    ///
    /// # Examples
    ///
    /// ```
    /// use vero_cmap::buffer::VeroBufReader;
    ///
    /// let data = [0, 0, 0, 10, 0, 0, 0, 20];
    /// let mut reader = VeroBufReader::from_bytes(&data);
    ///
    /// assert_eq!(reader.read_u32().unwrap(), 10);
    ///
    /// // Skip the next 4 bytes (the second u32)
    /// reader.skip(4).unwrap();
    ///
    /// // Attempting to read should now result in an EOF error
    /// assert!(reader.read_u32().is_err());
    /// ```
    pub fn skip(&mut self, n: i64) -> Result<(), VeroBufReaderError> {
        self.inner
            .seek_relative(n)
            .map_err(VeroBufReaderError::FailedToSeek)?;

        Ok(())
    }

    /// Returns the absolute cursor position.
    pub fn position(&mut self) -> Result<u64, VeroBufReaderError> {
        self.inner
            .stream_position()
            .map_err(VeroBufReaderError::FailedToSeek)
    }

    /// Reads a big-endian 24-bit unsigned integer.
    ///
    /// ```
    /// use vero_cmap::buffer::VeroBufReader;
    ///
    /// let mut reader = VeroBufReader::from_bytes(&[0x01, 0xF9, 0x03]);
    /// assert_eq!(reader.read_u24().unwrap(), 0x01F903);
    /// ```
    pub fn read_u24(&mut self) -> Result<u32, VeroBufReaderError> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf[1..])?;

        Ok(u32::from_be_bytes(buf))
    }

    /// Reads a u16 at an absolute position and puts the cursor back where it was.
    pub fn read_u16_at(&mut self, pos: u64) -> Result<u16, VeroBufReaderError> {
        let current = self.position()?;
        self.seek_to(pos)?;
        let value = self.read_u16();
        self.seek_to(current)?;

        value
    }

    impl_read!(read_u32, u32);
    impl_read!(read_i16, i16);
    impl_read!(read_u16, u16);
    impl_read!(read_u8, u8);
}
