use std::fmt;

/// A zero-based row/column position.
///
/// Columns are counted in UTF-16 code units from the start of the row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: u32,
    pub column: u32,
}

impl Point {
    pub const ZERO: Self = Self { row: 0, column: 0 };

    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Appends `extent` to this point, treating `self` as the origin.
    ///
    /// An extent that spans rows replaces the column; one that stays on the
    /// first row shifts it.
    #[must_use]
    pub const fn add(self, extent: Self) -> Self {
        if extent.row > 0 {
            Self { row: self.row + extent.row, column: extent.column }
        } else {
            Self { row: self.row, column: self.column + extent.column }
        }
    }

    /// Inverse of [`Point::add`], clamping at [`Point::ZERO`].
    #[must_use]
    pub const fn saturating_sub(self, origin: Self) -> Self {
        if self.row > origin.row {
            Self { row: self.row - origin.row, column: self.column }
        } else if self.row == origin.row {
            Self { row: 0, column: self.column.saturating_sub(origin.column) }
        } else {
            Self::ZERO
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}
