use macroquad::math::{vec2, IVec2, Vec2};
use macroquad::rand;

/// Ground type drawn as water. Water sits at a fixed level and cannot carry
/// an overlay.
pub const WATER: u32 = 0;
/// Ground type for bare stone; like water it cannot carry an overlay.
pub const STONE: u32 = 3;
/// Number of ground types the brush cycles through.
pub const GROUND_TYPES: u32 = 4;
/// Number of overlay types the brush cycles through.
pub const OVERLAY_TYPES: u32 = 3;

/// One cell of the editable world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tile {
    /// Ground type, indexing a sprite column in the ground row.
    pub ground: u32,
    /// Overlay type (plants etc.), 0 for none.
    pub overlay: u32,
    /// Terrain height in grid steps; positive is up.
    pub height: i32,
}

/// Procedural fill applied to a fresh world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// Randomized terrain with sparse overlays and height jitter.
    Random,
    /// Cycling ground types on flat terrain; handy for checking sprite
    /// sizes against the grid.
    Stripes,
    /// Saddle-shaped height field with ground bands by radius and height.
    Pringle,
}

/// The editable tile world. Application-layer state: the renderer only ever
/// sees explicit tile addresses and positions derived from it.
pub struct World {
    size: IVec2,
    tiles: Vec<Tile>,
}

impl World {
    /// Creates a `size.x` by `size.y` world filled by `mode`, seeded so runs
    /// are reproducible.
    pub fn generate(size: IVec2, mode: Generation, seed: u64) -> Self {
        // Local generator: reseeding the global one would bleed into other
        // users of macroquad's rand.
        let rng = rand::RandGenerator::new();
        rng.srand(seed);
        let mut tiles = vec![Tile::default(); (size.x * size.y) as usize];

        for y in 0..size.y {
            for x in 0..size.x {
                let i = (y * size.x + x) as usize;
                match mode {
                    Generation::Random => {
                        tiles[i].ground = rng.rand() % 2 + 1;
                        if tiles[i].ground == 1 {
                            // Grass: mostly bare, occasionally a plant.
                            if rng.rand() % 10 != 1 {
                                continue;
                            }
                            tiles[i].overlay = 1;
                        }
                        tiles[i].height = (rng.rand() % 3) as i32 - 1;
                    }
                    Generation::Stripes => {
                        tiles[i].ground = i as u32 % 3 + 1;
                    }
                    Generation::Pringle => {
                        let nx = x - size.x / 2;
                        let ny = y - size.y / 2;
                        tiles[i].height = (nx * nx - ny * ny) / 128;
                        // Ground banded by distance from the centre, nudged
                        // by height.
                        const LAYER_COUNT: f32 = 13.0;
                        let dist = ((nx * nx + ny * ny) as f32).sqrt() / size.x as f32;
                        let band = (dist * LAYER_COUNT * 2.0) as i32 + tiles[i].height.abs() / 8;
                        tiles[i].ground = band as u32 % 3 + 1;
                    }
                }
            }
        }

        World { size, tiles }
    }

    /// World dimensions in cells.
    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// True when `cell` lies inside the world.
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.size.x && cell.y >= 0 && cell.y < self.size.y
    }

    /// The tile at `cell`, if inside the world.
    pub fn get(&self, cell: IVec2) -> Option<Tile> {
        if self.contains(cell) {
            Some(self.tiles[(cell.y * self.size.x + cell.x) as usize])
        } else {
            None
        }
    }

    fn get_mut(&mut self, cell: IVec2) -> Option<&mut Tile> {
        if self.contains(cell) {
            let i = (cell.y * self.size.x + cell.x) as usize;
            Some(&mut self.tiles[i])
        } else {
            None
        }
    }

    /// Raises or lowers terrain under `cell`; out-of-world clicks are
    /// ignored.
    pub fn adjust_height(&mut self, cell: IVec2, delta: i32) {
        if let Some(tile) = self.get_mut(cell) {
            tile.height += delta;
        }
    }

    /// Paints the ground type. Water and stone shed any overlay.
    pub fn paint_ground(&mut self, cell: IVec2, ground: u32) {
        if let Some(tile) = self.get_mut(cell) {
            tile.ground = ground;
            if tile.ground == WATER || tile.ground == STONE {
                tile.overlay = 0; // no plants on water and stone
            }
        }
    }

    /// Paints the overlay; rejected on water and stone.
    pub fn paint_overlay(&mut self, cell: IVec2, overlay: u32) {
        if let Some(tile) = self.get_mut(cell) {
            if tile.ground != WATER && tile.ground != STONE {
                tile.overlay = overlay;
            }
        }
    }
}

/// Current edit selection, cycled from the keyboard.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    /// Ground type painted with the primary button.
    pub ground: u32,
    /// Overlay type painted with the secondary button.
    pub overlay: u32,
}

impl Brush {
    /// Cycles to the next ground type.
    pub fn next_ground(&mut self) {
        self.ground = (self.ground + 1) % GROUND_TYPES;
    }

    /// Cycles to the next overlay type.
    pub fn next_overlay(&mut self) {
        self.overlay = (self.overlay + 1) % OVERLAY_TYPES;
    }
}

/// Projects fractional world coordinates onto the 2:1 isometric diamond.
pub fn world_to_screen(world: Vec2, tile_size: Vec2) -> Vec2 {
    vec2(
        (world.x - world.y) * tile_size.x * 0.5,
        (world.x + world.y) * tile_size.y * 0.5,
    )
}

/// Inverse of [`world_to_screen`].
pub fn screen_to_world(screen: Vec2, tile_size: Vec2) -> Vec2 {
    let u = screen.x / tile_size.x;
    let v = screen.y / tile_size.y;
    vec2(u + v, v - u)
}

/// Splits world coordinates into the containing cell and the fractional
/// position inside it. Floors, so negative coordinates land in the right
/// cell.
pub fn world_to_cell(world: Vec2) -> (IVec2, Vec2) {
    let cell = world.floor();
    (cell.as_ivec2(), world - cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::ivec2;

    #[test]
    fn generation_is_reproducible_for_a_seed() {
        let a = World::generate(ivec2(16, 16), Generation::Random, 69);
        let b = World::generate(ivec2(16, 16), Generation::Random, 69);
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(a.get(ivec2(x, y)), b.get(ivec2(x, y)));
            }
        }
    }

    #[test]
    fn stripes_cycle_ground_types() {
        let w = World::generate(ivec2(6, 1), Generation::Stripes, 0);
        let grounds: Vec<u32> = (0..6).map(|x| w.get(ivec2(x, 0)).unwrap().ground).collect();
        assert_eq!(grounds, vec![1, 2, 3, 1, 2, 3]);
        assert!((0..6).all(|x| w.get(ivec2(x, 0)).unwrap().height == 0));
    }

    #[test]
    fn edits_outside_the_world_are_ignored() {
        let mut w = World::generate(ivec2(4, 4), Generation::Stripes, 0);
        w.adjust_height(ivec2(-1, 0), 1);
        w.paint_ground(ivec2(4, 4), 2);
        assert_eq!(w.get(ivec2(-1, 0)), None);
        assert!(w.contains(ivec2(3, 3)));
    }

    #[test]
    fn water_and_stone_refuse_overlays() {
        let mut w = World::generate(ivec2(2, 1), Generation::Stripes, 0);

        w.paint_ground(ivec2(0, 0), 1);
        w.paint_overlay(ivec2(0, 0), 2);
        assert_eq!(w.get(ivec2(0, 0)).unwrap().overlay, 2);

        // Painting water clears the overlay and blocks new ones.
        w.paint_ground(ivec2(0, 0), WATER);
        assert_eq!(w.get(ivec2(0, 0)).unwrap().overlay, 0);
        w.paint_overlay(ivec2(0, 0), 2);
        assert_eq!(w.get(ivec2(0, 0)).unwrap().overlay, 0);

        w.paint_ground(ivec2(1, 0), STONE);
        w.paint_overlay(ivec2(1, 0), 1);
        assert_eq!(w.get(ivec2(1, 0)).unwrap().overlay, 0);
    }

    #[test]
    fn brush_cycles_wrap() {
        let mut b = Brush::default();
        for _ in 0..GROUND_TYPES {
            b.next_ground();
        }
        for _ in 0..OVERLAY_TYPES {
            b.next_overlay();
        }
        assert_eq!(b, Brush::default());
    }

    #[test]
    fn iso_projection_round_trips() {
        let tile = vec2(36.0, 18.0);
        for world in [vec2(3.0, 5.0), vec2(-2.5, 0.25), vec2(0.0, -7.75)] {
            let screen = world_to_screen(world, tile);
            let back = screen_to_world(screen, tile);
            assert!((back - world).length() < 1e-4);
        }
        assert_eq!(world_to_screen(vec2(3.0, 5.0), tile), vec2(-36.0, 72.0));
    }

    #[test]
    fn cell_split_floors_negative_coordinates() {
        let (cell, within) = world_to_cell(vec2(-0.25, 1.5));
        assert_eq!(cell, ivec2(-1, 1));
        assert!((within - vec2(0.75, 0.5)).length() < 1e-6);
    }
}
