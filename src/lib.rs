#![warn(missing_docs)]

//! Isometric sprite-sheet decoder, tile renderer & map editor toolkit for Macroquad.

mod error;
mod renderer;
mod sheet;
mod view;
mod world;

pub use error::SheetError;
pub use renderer::{SheetRenderer, Viewport};
pub use sheet::{RenderMode, SheetRow, SheetTable};
pub use view::PanZoomView;
pub use world::{
    screen_to_world, world_to_cell, world_to_screen, Brush, Generation, Tile, World, GROUND_TYPES,
    OVERLAY_TYPES, STONE, WATER,
};
