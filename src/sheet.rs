use macroquad::logging::{error, info};
use macroquad::texture::Image;

use crate::error::SheetError;

/// Transparency/blend mode selector stored per row.
///
/// Carried through from the metadata so a backend that distinguishes blend
/// modes can honor it; macroquad's pipeline alpha-blends everything, so the
/// bundled viewport treats all modes alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Opaque blit.
    Normal,
    /// Fully-transparent pixels are skipped, everything else is opaque.
    Mask,
    /// Full alpha blending.
    Alpha,
    /// Backend-defined blending.
    Custom,
}

impl RenderMode {
    fn from_byte(byte: u8) -> Self {
        match byte {
            1 => RenderMode::Mask,
            2 => RenderMode::Alpha,
            3 => RenderMode::Custom,
            _ => RenderMode::Normal,
        }
    }
}

/// Layout of one horizontal band of same-sized sprites in a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetRow {
    /// Number of sprites packed left-to-right in this row.
    pub sprite_count: u32,
    /// Width in pixels of each sprite in this row.
    pub sprite_width: u32,
    /// Height in pixels of each sprite in this row.
    pub sprite_height: u32,
    /// Anchor correction in tile-height units, applied upwards when drawing
    /// so tall sprites sit on their visual base.
    pub sprite_vertical_offset: u32,
    /// Blend mode requested for this row's sprites.
    pub mode: RenderMode,
    /// Y pixel in the source image where this row's data begins.
    pub row_vertical_offset: u32,
}

/// Immutable row table decoded from column 0 of a sheet image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTable {
    rows: Vec<SheetRow>,
}

impl SheetTable {
    /// Decodes the metadata column of `image` into a row table.
    ///
    /// Column 0 is reserved: the pixel at a row's top holds
    /// (sprite width, row height, sprite count) in its RGB channels and the
    /// pixel directly below holds (blend mode, vertical offset). Rows are
    /// stacked contiguously from y = 0; the scan stops once the cursor
    /// reaches the image height.
    ///
    /// Fails without producing a table when a row height reads as zero, when
    /// there are no rows at all, or when row 0 cannot host the fallback tile.
    pub fn decode(image: &Image) -> Result<SheetTable, SheetError> {
        let width = image.width();
        let height = image.height();
        let pixels = image.get_image_data();
        let at = |x: usize, y: usize| pixels[y * width + x];

        let mut rows = Vec::new();
        let mut cursor = 0usize;
        while cursor < height {
            let head = at(0, cursor);
            let row_height = head[1] as usize;
            if row_height == 0 {
                error!("sheet metadata pixel at (0, {}) has no height data", cursor);
                return Err(SheetError::NoHeightData(cursor as u32));
            }

            // Second metadata pixel; reads as defaults when it would fall
            // outside the image.
            let (mode, offset) = if cursor + 1 < height {
                let data = at(0, cursor + 1);
                (RenderMode::from_byte(data[0]), data[1] as u32)
            } else {
                (RenderMode::Normal, 0)
            };

            info!(
                "sheet row {}: {} sprites {}x{} at y={}",
                rows.len(),
                head[2],
                head[0],
                row_height,
                cursor
            );

            rows.push(SheetRow {
                sprite_count: head[2] as u32,
                sprite_width: head[0] as u32,
                sprite_height: row_height as u32,
                sprite_vertical_offset: offset,
                mode,
                row_vertical_offset: cursor as u32,
            });
            cursor += row_height;
        }

        match rows.first() {
            None => {
                error!("sheet image has no rows to decode");
                return Err(SheetError::EmptySheet);
            }
            // Invalid tile addresses resolve to row 0, column 0, so that
            // tile must exist.
            Some(first) if first.sprite_count == 0 || first.sprite_width == 0 => {
                error!("sheet row 0 has no sprites to fall back on");
                return Err(SheetError::UnusableNullTile);
            }
            Some(_) => {}
        }

        Ok(SheetTable { rows })
    }

    /// Number of decoded rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Row metadata, if `index` is in range.
    pub fn row(&self, index: usize) -> Option<&SheetRow> {
        self.rows.get(index)
    }

    /// All rows in top-to-bottom order.
    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<SheetRow>) -> SheetTable {
        SheetTable { rows }
    }
}
