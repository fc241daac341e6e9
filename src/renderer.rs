use macroquad::math::{vec2, IVec2, Rect, Vec2};
use macroquad::texture::Image;

use crate::error::SheetError;
use crate::sheet::{SheetRow, SheetTable};

/// Minimal drawing capability a backend must offer the renderer.
///
/// Any 2D rasterizer that can blit a sub-rectangle of the sheet texture and
/// answer a view-space visibility query can drive [`SheetRenderer`].
pub trait Viewport {
    /// True when a rect at `dest` with `size` (both in view space) would be
    /// at least partially on screen.
    fn is_rect_visible(&self, dest: Vec2, size: Vec2) -> bool;

    /// Blits the `src` region of the sheet texture (in texture pixels) to
    /// `dest`, scaled by `scale`.
    fn draw_partial(&mut self, dest: Vec2, src: Rect, scale: Vec2);
}

/// Resolves (row, column) tile addresses against a decoded [`SheetTable`]
/// and issues culled, offset-corrected draws through a [`Viewport`].
#[derive(Debug)]
pub struct SheetRenderer {
    table: SheetTable,
    tile_w: f32,
    tile_h: f32,
}

impl SheetRenderer {
    /// Builds a renderer over an already-decoded table. `tile_w`/`tile_h`
    /// are the grid cell dimensions used for isometric placement and for
    /// converting row vertical offsets to pixels.
    pub fn new(tile_w: u32, tile_h: u32, table: SheetTable) -> Self {
        SheetRenderer {
            table,
            tile_w: tile_w as f32,
            tile_h: tile_h as f32,
        }
    }

    /// Decodes `image` and builds a renderer in one step.
    pub fn from_image(tile_w: u32, tile_h: u32, image: &Image) -> Result<Self, SheetError> {
        Ok(Self::new(tile_w, tile_h, SheetTable::decode(image)?))
    }

    /// The decoded row table.
    pub fn table(&self) -> &SheetTable {
        &self.table
    }

    /// Grid cell width in pixels.
    pub fn tile_width(&self) -> f32 {
        self.tile_w
    }

    /// Grid cell height in pixels.
    pub fn tile_height(&self) -> f32 {
        self.tile_h
    }

    /// Substitutes the fallback tile at (0, 0) for any out-of-range address
    /// before rectangle math. The decoder guarantees row 0 exists and has at
    /// least one sprite.
    fn lookup(&self, tile_row: usize, tile_col: usize) -> (&SheetRow, usize) {
        match self.table.row(tile_row) {
            Some(row) if (tile_col as u32) < row.sprite_count => (row, tile_col),
            _ => (&self.table.rows()[0], 0),
        }
    }

    fn source_rect(row: &SheetRow, col: usize) -> Rect {
        Rect::new(
            (col as u32 * row.sprite_width + 1) as f32, // column 0 is metadata
            row.row_vertical_offset as f32,
            row.sprite_width as f32,
            row.sprite_height as f32,
        )
    }

    /// Source rectangle in texture space for a tile address.
    ///
    /// Out-of-range addresses are not an error: they resolve to the fallback
    /// tile at row 0, column 0, so bulk callers never bounds-check.
    pub fn resolve(&self, tile_row: usize, tile_col: usize) -> Rect {
        let (row, col) = self.lookup(tile_row, tile_col);
        Self::source_rect(row, col)
    }

    /// Draws one tile at `screen_pos`.
    ///
    /// The row's vertical offset anchors tall sprites at their visual base:
    /// `sprite_vertical_offset * tile_height * scale.y` pixels are subtracted
    /// from the destination y. Off-screen tiles (per the viewport's
    /// visibility test) skip the draw call entirely.
    pub fn render<V: Viewport>(
        &self,
        view: &mut V,
        screen_pos: Vec2,
        tile_row: usize,
        tile_col: usize,
        scale: Vec2,
    ) {
        let (row, col) = self.lookup(tile_row, tile_col);
        let src = Self::source_rect(row, col);

        let correction = row.sprite_vertical_offset as f32 * self.tile_h * scale.y;
        let dest = vec2(screen_pos.x, screen_pos.y - correction);
        let size = vec2(src.w * scale.x, src.h * scale.y);

        if view.is_rect_visible(dest, size) {
            view.draw_partial(dest, src, scale);
        }
    }

    /// Projects an integer cell onto the 2:1 isometric diamond and draws the
    /// tile there at unit scale. `pixel_offset` shifts the result in view
    /// space (used for height displacement).
    pub fn render_isometric<V: Viewport>(
        &self,
        view: &mut V,
        cell: IVec2,
        tile_row: usize,
        tile_col: usize,
        pixel_offset: Vec2,
    ) {
        let screen = vec2(
            (cell.x - cell.y) as f32 * self.tile_w * 0.5,
            (cell.x + cell.y) as f32 * self.tile_h * 0.5,
        ) + pixel_offset;
        self.render(view, screen, tile_row, tile_col, vec2(1.0, 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::RenderMode;
    use macroquad::math::ivec2;

    #[derive(Default)]
    struct MockViewport {
        everything_hidden: bool,
        queries: std::cell::RefCell<Vec<(Vec2, Vec2)>>,
        draws: Vec<(Vec2, Rect, Vec2)>,
    }

    impl Viewport for MockViewport {
        fn is_rect_visible(&self, dest: Vec2, size: Vec2) -> bool {
            self.queries.borrow_mut().push((dest, size));
            !self.everything_hidden
        }

        fn draw_partial(&mut self, dest: Vec2, src: Rect, scale: Vec2) {
            self.draws.push((dest, src, scale));
        }
    }

    fn row(count: u32, w: u32, h: u32, voffset: u32, y: u32) -> SheetRow {
        SheetRow {
            sprite_count: count,
            sprite_width: w,
            sprite_height: h,
            sprite_vertical_offset: voffset,
            mode: RenderMode::Normal,
            row_vertical_offset: y,
        }
    }

    fn two_row_renderer() -> SheetRenderer {
        let table = SheetTable::from_rows(vec![row(3, 16, 10, 0, 0), row(1, 8, 8, 1, 10)]);
        SheetRenderer::new(36, 18, table)
    }

    #[test]
    fn resolves_source_rects() {
        let r = two_row_renderer();
        assert_eq!(r.resolve(0, 2), Rect::new(33.0, 0.0, 16.0, 10.0));
        assert_eq!(r.resolve(1, 0), Rect::new(1.0, 10.0, 8.0, 8.0));
    }

    #[test]
    fn origin_skips_metadata_column() {
        let r = two_row_renderer();
        for (tile_row, meta) in r.table().rows().iter().enumerate() {
            for col in 0..meta.sprite_count as usize {
                let rect = r.resolve(tile_row, col);
                assert_eq!(rect.x, (col as u32 * meta.sprite_width + 1) as f32);
            }
        }
    }

    #[test]
    fn out_of_range_addresses_fall_back_to_null_tile() {
        let r = two_row_renderer();
        let null = r.resolve(0, 0);
        assert_eq!(null.point(), vec2(1.0, 0.0));
        assert_eq!(r.resolve(5, 0), null); // row out of range
        assert_eq!(r.resolve(0, 3), null); // column out of range
        assert_eq!(r.resolve(1, 1), null); // column out of range in row 1
    }

    #[test]
    fn vertical_offset_anchors_at_visual_base() {
        let table = SheetTable::from_rows(vec![row(2, 16, 36, 2, 0)]);
        let r = SheetRenderer::new(36, 18, table);
        let mut view = MockViewport::default();

        r.render(&mut view, vec2(100.0, 100.0), 0, 1, vec2(1.0, 1.0));

        assert_eq!(view.draws.len(), 1);
        let (dest, src, _) = view.draws[0];
        assert_eq!(dest, vec2(100.0, 100.0 - 2.0 * 18.0));
        assert_eq!(src, Rect::new(17.0, 0.0, 16.0, 36.0));
    }

    #[test]
    fn fallback_uses_the_substituted_rows_offset() {
        // Row 1 has a vertical offset but its column 1 is invalid; the draw
        // must use row 0's (zero) offset, not row 1's.
        let r = two_row_renderer();
        let mut view = MockViewport::default();

        r.render(&mut view, vec2(50.0, 50.0), 1, 1, vec2(1.0, 1.0));

        assert_eq!(view.draws[0].0, vec2(50.0, 50.0));
    }

    #[test]
    fn scale_applies_to_correction_and_cull_extent() {
        let table = SheetTable::from_rows(vec![row(2, 16, 10, 1, 0)]);
        let r = SheetRenderer::new(36, 18, table);
        let mut view = MockViewport::default();

        r.render(&mut view, vec2(0.0, 0.0), 0, 0, vec2(2.0, 3.0));

        let (dest, size) = view.queries.borrow()[0];
        assert_eq!(dest, vec2(0.0, -(1.0 * 18.0 * 3.0)));
        assert_eq!(size, vec2(16.0 * 2.0, 10.0 * 3.0));
    }

    #[test]
    fn offscreen_tiles_never_draw() {
        let r = two_row_renderer();
        let mut view = MockViewport {
            everything_hidden: true,
            ..Default::default()
        };

        for col in 0..3 {
            r.render(&mut view, vec2(0.0, 0.0), 0, col, vec2(1.0, 1.0));
        }

        assert_eq!(view.queries.borrow().len(), 3);
        assert!(view.draws.is_empty());
    }

    #[test]
    fn isometric_projection_matches_diamond_grid() {
        let r = two_row_renderer();
        let mut view = MockViewport::default();

        r.render_isometric(&mut view, ivec2(3, 5), 0, 0, vec2(0.0, 0.0));
        assert_eq!(view.draws[0].0, vec2((3 - 5) as f32 * 18.0, (3 + 5) as f32 * 9.0));

        r.render_isometric(&mut view, ivec2(3, 5), 0, 0, vec2(4.0, -7.0));
        assert_eq!(view.draws[1].0, vec2(-36.0 + 4.0, 72.0 - 7.0));
    }
}
