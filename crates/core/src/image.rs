//! Indexed-color images.
//!
//! Pixels are small integer palette indices rather than direct colors. Index 0
//! is the transparency key when an image is composited with transparency on.
//!
//! The [`Image`] trait is the boundary the blitter works against: hosts with
//! their own screen buffer implement it, everything in this crate uses
//! [`IndexedImage`].

use std::fmt;
use std::str::FromStr;

/// A 2D grid of palette indices with bounds-checked pixel access.
///
/// Reads outside the image return 0 and writes outside the image are ignored.
pub trait Image {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    /// Read the index at (x, y), or 0 when outside the image.
    fn get_pixel(&self, x: i32, y: i32) -> i32;

    /// Write the index at (x, y). Writes outside the image are ignored.
    fn set_pixel(&mut self, x: i32, y: i32, value: i32);

    /// Borrow row `y` as a slice, if the storage allows it.
    ///
    /// Returning `Some` lets the blitter skip per-pixel calls. The slice
    /// should be exactly `width()` long; a shorter row is ignored and the
    /// blitter goes through `get_pixel` instead. The default is `None`, which
    /// keeps every access going through `get_pixel`.
    fn row(&self, _y: i32) -> Option<&[i32]> {
        None
    }

    /// Mutable counterpart of [`Image::row`].
    ///
    /// Same length rules as `row`. Implementors that return `Some` here must
    /// treat anything outside the returned slice as out of bounds, the same
    /// way `set_pixel` does.
    fn row_mut(&mut self, _y: i32) -> Option<&mut [i32]> {
        None
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("Invalid image size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },
    #[error("Row {row} has {found} pixels, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Unknown pixel character {ch:?} at row {row}, column {column}")]
    UnknownPixel { ch: char, row: usize, column: usize },
}

/// Owned row-major indexed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: i32,
    height: i32,
    pixels: Vec<i32>,
}

impl IndexedImage {
    /// Create an image with every pixel set to index 0.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Create an image with every pixel set to `value`.
    ///
    /// Negative dimensions are treated as zero.
    pub fn filled(width: i32, height: i32, value: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![value; (width as usize) * (height as usize)],
        }
    }

    /// Build an image from rows of indices. All rows must have the same length.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, ImageError> {
        let expected = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut pixels = Vec::with_capacity(expected * rows.len());
        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != expected {
                return Err(ImageError::RaggedRow {
                    row: idx,
                    expected,
                    found: row.len(),
                });
            }
            pixels.extend_from_slice(row);
        }

        let width = i32::try_from(expected).map_err(|_| ImageError::InvalidSize {
            width: i32::MAX,
            height: rows.len() as i32,
        })?;
        let height = i32::try_from(rows.len()).map_err(|_| ImageError::InvalidSize {
            width,
            height: i32::MAX,
        })?;

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an image from a flat row-major pixel buffer.
    pub fn from_pixels(width: i32, height: i32, pixels: Vec<i32>) -> Result<Self, ImageError> {
        if width < 0 || height < 0 || pixels.len() != (width as usize) * (height as usize) {
            return Err(ImageError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn fill(&mut self, value: i32) {
        self.pixels.fill(value);
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[i32] {
        &self.pixels
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[i32]> {
        // chunks() rejects a zero chunk size
        self.pixels.chunks(self.width.max(1) as usize)
    }

    /// Render the image as text art, one line per row.
    ///
    /// Index 0 is written as `.`, 1–15 as a lowercase hex digit and anything
    /// else as `?`. Parsing the result gives back the same image as long as
    /// every index is in 0–15.
    pub fn to_art(&self) -> String {
        let mut out = String::with_capacity(self.pixels.len() + self.height as usize);
        for row in self.rows() {
            for &px in row {
                out.push(match px {
                    0 => '.',
                    1..=15 => char::from_digit(px as u32, 16).unwrap_or('?'),
                    _ => '?',
                });
            }
            out.push('\n');
        }
        out
    }

    #[inline]
    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl Image for IndexedImage {
    #[inline]
    fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn get_pixel(&self, x: i32, y: i32) -> i32 {
        self.index_of(x, y).map(|i| self.pixels[i]).unwrap_or(0)
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, value: i32) {
        if let Some(i) = self.index_of(x, y) {
            self.pixels[i] = value;
        }
    }

    #[inline]
    fn row(&self, y: i32) -> Option<&[i32]> {
        if y < 0 || y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        Some(&self.pixels[start..start + w])
    }

    #[inline]
    fn row_mut(&mut self, y: i32) -> Option<&mut [i32]> {
        if y < 0 || y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        Some(&mut self.pixels[start..start + w])
    }
}

impl FromStr for IndexedImage {
    type Err = ImageError;

    /// Parse text art: `.` or `0` is index 0, hex digits are 1–15.
    ///
    /// Blank lines are skipped and whitespace inside a row is ignored, so
    /// `". 3 3 ."` and `".33."` are the same row.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<i32>> = Vec::new();
        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row_idx = rows.len();
            let mut row = Vec::with_capacity(line.len());
            for (column, ch) in line.chars().filter(|c| !c.is_whitespace()).enumerate() {
                let value = match ch {
                    '.' => 0,
                    _ => ch.to_digit(16).ok_or(ImageError::UnknownPixel {
                        ch,
                        row: row_idx,
                        column,
                    })? as i32,
                };
                row.push(value);
            }
            rows.push(row);
        }
        Self::from_rows(&rows)
    }
}

impl fmt::Display for IndexedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_art())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_blank() {
        let img = IndexedImage::new(4, 3);
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);
        assert!(img.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_negative_size_clamps_to_empty() {
        let img = IndexedImage::filled(-2, 5, 7);
        assert_eq!(img.width(), 0);
        assert!(img.pixels().is_empty());
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut img = IndexedImage::filled(2, 2, 9);

        // Reads outside return 0
        assert_eq!(img.get_pixel(-1, 0), 0);
        assert_eq!(img.get_pixel(2, 0), 0);
        assert_eq!(img.get_pixel(0, 2), 0);

        // Writes outside are dropped
        img.set_pixel(5, 5, 1);
        img.set_pixel(-1, -1, 1);
        assert!(img.pixels().iter().all(|&p| p == 9));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = IndexedImage::from_rows(&[vec![1, 2], vec![3]]).unwrap_err();
        assert_eq!(
            err,
            ImageError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(IndexedImage::from_pixels(2, 2, vec![0; 4]).is_ok());
        assert!(IndexedImage::from_pixels(2, 2, vec![0; 3]).is_err());
        assert!(IndexedImage::from_pixels(-1, 2, vec![]).is_err());
    }

    #[test]
    fn test_parse_art() {
        let img: IndexedImage = "
            . 3
            5 .
        "
        .parse()
        .unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
        assert_eq!(img.get_pixel(1, 0), 3);
        assert_eq!(img.get_pixel(0, 1), 5);
        assert_eq!(img.get_pixel(0, 0), 0);
    }

    #[test]
    fn test_parse_art_hex_digits() {
        let img: IndexedImage = "0aF1".parse().unwrap();
        assert_eq!(img.pixels(), &[0, 10, 15, 1]);
    }

    #[test]
    fn test_parse_art_unknown_char() {
        let err = "..\n.x".parse::<IndexedImage>().unwrap_err();
        assert_eq!(
            err,
            ImageError::UnknownPixel {
                ch: 'x',
                row: 1,
                column: 1
            }
        );
    }

    #[test]
    fn test_art_round_trip() {
        let art = ".12\nf.e\n";
        let img: IndexedImage = art.parse().unwrap();
        assert_eq!(img.to_art(), art);
    }

    #[test]
    fn test_row_access() {
        let mut img = IndexedImage::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(img.row(1), Some(&[4, 5, 6][..]));
        assert_eq!(img.row(2), None);
        assert_eq!(img.row(-1), None);

        if let Some(row) = img.row_mut(0) {
            row[2] = 9;
        }
        assert_eq!(img.get_pixel(2, 0), 9);
    }
}
