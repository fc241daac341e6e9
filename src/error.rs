use std::{error, fmt};

/// Error type for sprite-sheet decoding
#[derive(Debug)]
pub enum SheetError {
    /// A row's metadata pixel reads a height of zero; carries the y
    /// coordinate of the offending pixel
    NoHeightData(u32),
    /// The image has no decodable rows
    EmptySheet,
    /// Row 0 cannot host the fallback tile (zero sprite count or width)
    UnusableNullTile,
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::NoHeightData(y) => {
                write!(f, "sheet metadata pixel at (0, {}) has no height data", y)
            }
            SheetError::EmptySheet => write!(f, "sheet image has no rows"),
            SheetError::UnusableNullTile => {
                write!(f, "sheet row 0 has no sprites to fall back on")
            }
        }
    }
}

impl error::Error for SheetError {}
