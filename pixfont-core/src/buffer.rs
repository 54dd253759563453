//! Monochrome pixel buffer.
//!
//! Every cell is either ink (opaque black) or empty (fully transparent).
//! The buffer is never smaller than 1×1, mirroring a canvas that cannot
//! be sized to zero.

use image::{ImageBuffer, ImageFormat, RgbaImage};
use std::fmt;
use std::io::Cursor;
use thiserror::Error;

/// RGBA of an ink pixel.
pub const INK_RGBA: [u8; 4] = [0, 0, 0, 255];
/// RGBA of an empty pixel.
pub const EMPTY_RGBA: [u8; 4] = [0, 0, 0, 0];

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("pixel data does not fit a {width}×{height} image")]
    Dimensions { width: u32, height: u32 },
}

/// A `width × height` grid of ink/empty cells.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl PixelBuffer {
    /// Create an all-empty buffer. Zero dimensions are raised to 1.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Whether `(x, y)` is ink. Out-of-range reads are empty.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    /// Set `(x, y)`; returns `false` when the cell is out of range.
    pub fn set(&mut self, x: u32, y: u32, ink: bool) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = ink;
                true
            }
            None => false,
        }
    }

    /// Number of ink cells.
    pub fn ink_count(&self) -> u32 {
        self.cells.iter().filter(|&&c| c).count() as u32
    }

    /// Non-premultiplied RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.cells
            .iter()
            .flat_map(|&ink| if ink { INK_RGBA } else { EMPTY_RGBA })
            .collect()
    }

    /// Encode as a PNG file at 1 cell = 1 pixel.
    pub fn encode_png(&self) -> Result<Vec<u8>, EncodeError> {
        let image: RgbaImage = ImageBuffer::from_raw(self.width, self.height, self.to_rgba8())
            .ok_or(EncodeError::Dimensions {
                width: self.width,
                height: self.height,
            })?;

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        log::debug!(
            "Encoded {}×{} buffer as PNG ({} bytes)",
            self.width,
            self.height,
            png.len()
        );
        Ok(png)
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// `#` for ink, `.` for empty, one line per row.
impl fmt::Display for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.width as usize).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for &ink in row {
                f.write_str(if ink { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PixelBuffer({}×{})\n{self}", self.width, self.height)
    }
}

/// Output of either rasterizer: the buffer plus the ink pixels written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub buffer: PixelBuffer,
    pub ink_count: u32,
}

impl Rendered {
    /// The degenerate result: a 1×1 transparent buffer with no ink.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.ink_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_to_one() {
        let buffer = PixelBuffer::new(0, 0);
        assert_eq!((buffer.width(), buffer.height()), (1, 1));
        assert_eq!(buffer.ink_count(), 0);
    }

    #[test]
    fn test_get_set() {
        let mut buffer = PixelBuffer::new(3, 2);
        assert!(buffer.set(2, 1, true));
        assert!(!buffer.set(3, 0, true));
        assert!(buffer.get(2, 1));
        assert!(!buffer.get(0, 0));
        assert!(!buffer.get(10, 10));
        assert_eq!(buffer.ink_count(), 1);
    }

    #[test]
    fn test_rgba_semantics() {
        let mut buffer = PixelBuffer::new(2, 1);
        buffer.set(1, 0, true);
        assert_eq!(buffer.to_rgba8(), vec![0, 0, 0, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_display() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.set(0, 0, true);
        buffer.set(2, 1, true);
        assert_eq!(buffer.to_string(), "#..\n..#");
    }

    #[test]
    fn test_encode_png_roundtrip() {
        let mut buffer = PixelBuffer::new(4, 3);
        buffer.set(1, 1, true);
        let png = buffer.encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(1, 1).0, INK_RGBA);
        assert_eq!(decoded.get_pixel(0, 0).0, EMPTY_RGBA);
    }

    #[test]
    fn test_rendered_empty() {
        let rendered = Rendered::empty();
        assert!(rendered.is_blank());
        assert_eq!(rendered.buffer, PixelBuffer::new(1, 1));
    }
}
