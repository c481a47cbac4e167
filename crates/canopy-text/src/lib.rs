//! Byte, UTF-16 and row/column addressing over a single source text.

mod point;

use std::fmt;

use line_index::{LineIndex, WideEncoding, WideLineCol};
pub use point::Point;
pub use text_size::{TextRange, TextSize};
use thiserror::Error;

/// A position conversion that falls outside of the indexed text.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TextError {
    #[error("offset {offset} is past the end of the text (length {len})")]
    OffsetOutOfRange { offset: u32, len: u32 },
    #[error("position {point} is outside of the text")]
    PointOutOfRange { point: Point },
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: u32 },
}

/// Immutable lookup tables for one source text.
///
/// Built once per text and shared read-only by everything that reports
/// positions into it.
pub struct TextIndex {
    text: Box<str>,
    lines: LineIndex,
    /// UTF-16 offset of the first character of every line.
    utf16_line_starts: Box<[u32]>,
    utf16_len: u32,
}

impl TextIndex {
    pub fn new(text: impl Into<Box<str>>) -> Self {
        let text = text.into();
        assert!(u32::try_from(text.len()).is_ok(), "text is larger than 4 GiB");

        let lines = LineIndex::new(&text);
        let mut utf16_line_starts = vec![0];
        let mut utf16_len = 0u32;
        for c in text.chars() {
            utf16_len += c.len_utf16() as u32;
            if c == '\n' {
                utf16_line_starts.push(utf16_len);
            }
        }

        Self { text, lines, utf16_line_starts: utf16_line_starts.into(), utf16_len }
    }

    /// Returns the indexed text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the text length in bytes.
    #[inline]
    pub fn len(&self) -> TextSize {
        TextSize::of(&*self.text)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the text length in UTF-16 code units.
    #[inline]
    pub fn utf16_len(&self) -> u32 {
        self.utf16_len
    }

    /// Returns the number of rows, which is one more than the number of `\n`.
    #[inline]
    pub fn line_count(&self) -> u32 {
        self.utf16_line_starts.len() as u32
    }

    /// Returns the position just past the last character.
    pub fn end_point(&self) -> Point {
        let row = self.line_count() - 1;
        Point::new(row, self.line_utf16_len(row))
    }

    /// Converts a byte offset into a row/column position.
    pub fn byte_to_point(&self, offset: TextSize) -> Result<Point, TextError> {
        self.check_offset(offset)?;
        let line_col = self.lines.line_col(offset);
        let wide = self
            .lines
            .to_wide(WideEncoding::Utf16, line_col)
            .ok_or(TextError::NotCharBoundary { offset: offset.into() })?;
        Ok(Point::new(wide.line, wide.col))
    }

    /// Converts a row/column position back into a byte offset.
    pub fn point_to_byte(&self, point: Point) -> Result<TextSize, TextError> {
        let out_of_range = TextError::PointOutOfRange { point };
        if point.row >= self.line_count() || point.column > self.line_utf16_len(point.row) {
            return Err(out_of_range);
        }

        let line_col = self
            .lines
            .to_utf8(WideEncoding::Utf16, WideLineCol { line: point.row, col: point.column })
            .ok_or(out_of_range)?;
        let offset = self.lines.offset(line_col).ok_or(out_of_range)?;
        if offset > self.len() || !self.text.is_char_boundary(offset.into()) {
            // The column points between the two halves of a surrogate pair.
            return Err(TextError::NotCharBoundary { offset: offset.into() });
        }
        Ok(offset)
    }

    /// Converts a byte offset into a UTF-16 code unit offset.
    pub fn byte_to_utf16(&self, offset: TextSize) -> Result<u32, TextError> {
        let point = self.byte_to_point(offset)?;
        Ok(self.utf16_line_starts[point.row as usize] + point.column)
    }

    /// Converts a UTF-16 code unit offset into a byte offset.
    pub fn utf16_to_byte(&self, offset: u32) -> Result<TextSize, TextError> {
        if offset > self.utf16_len {
            return Err(TextError::OffsetOutOfRange { offset, len: self.utf16_len });
        }
        let row = self.utf16_line_starts.partition_point(|&start| start <= offset) - 1;
        let column = offset - self.utf16_line_starts[row];
        self.point_to_byte(Point::new(row as u32, column))
    }

    fn check_offset(&self, offset: TextSize) -> Result<(), TextError> {
        if offset > self.len() {
            return Err(TextError::OffsetOutOfRange {
                offset: offset.into(),
                len: self.len().into(),
            });
        }
        if !self.text.is_char_boundary(offset.into()) {
            return Err(TextError::NotCharBoundary { offset: offset.into() });
        }
        Ok(())
    }

    /// UTF-16 length of `row`, excluding its line terminator.
    fn line_utf16_len(&self, row: u32) -> u32 {
        let row = row as usize;
        let start = self.utf16_line_starts[row];
        match self.utf16_line_starts.get(row + 1) {
            Some(&next) => next - start - 1,
            None => self.utf16_len - start,
        }
    }
}

impl fmt::Debug for TextIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextIndex")
            .field("len", &self.text.len())
            .field("utf16_len", &self.utf16_len)
            .field("line_count", &self.line_count())
            .finish_non_exhaustive()
    }
}
