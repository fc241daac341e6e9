//! Interactive isometric world editor.
//!
//! Middle-drag pans, wheel zooms, left/right mouse paints ground/overlay
//! (or raises/lowers terrain in height mode), Q/E cycle the brush,
//! Tab switches edit mode, H toggles the inventory.

use anyhow::Context;
use macroquad::prelude::*;
use macroquad_iso_sheet::{
    screen_to_world, world_to_cell, Brush, Generation, PanZoomView, SheetRenderer, Viewport, World,
    WATER,
};

const TILE_W: u32 = 36;
const TILE_H: u32 = 18;
const WORLD_SIZE: IVec2 = IVec2::new(200, 200);

/// Pixels of vertical displacement per terrain height step; negative is up.
const HEIGHT_STEP: i32 = -(TILE_H as i32 / 2);
/// Every second zoom notch lands on an exact power of two.
const ZOOM_STEP: f32 = std::f32::consts::SQRT_2;

// Sheet rows used by the editor.
const ROW_HIGHLIGHT: usize = 1;
const ROW_GROUND: usize = 2;
const ROW_WATER: usize = 3;
const ROW_OVERLAY: usize = 4;

fn window_conf() -> Conf {
    Conf {
        window_title: "Isometric Editor".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

/// Screen-space backend for UI drawing: no pan/zoom, never culled.
struct UiView<'a> {
    texture: &'a Texture2D,
}

impl Viewport for UiView<'_> {
    fn is_rect_visible(&self, _dest: Vec2, _size: Vec2) -> bool {
        true
    }

    fn draw_partial(&mut self, dest: Vec2, src: Rect, scale: Vec2) {
        draw_texture_ex(
            self.texture,
            dest.x,
            dest.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(src.w * scale.x, src.h * scale.y)),
                source: Some(src),
                ..Default::default()
            },
        );
    }
}

async fn load_sheet(path: &str) -> anyhow::Result<(SheetRenderer, PanZoomView)> {
    let image = load_image(path)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Loading sprite sheet {path}"))?;
    let renderer = SheetRenderer::from_image(TILE_W, TILE_H, &image)
        .with_context(|| format!("Decoding sprite sheet {path}"))?;
    Ok((renderer, PanZoomView::from_image(&image)))
}

#[macroquad::main(window_conf)]
async fn main() {
    let (renderer, mut view) = load_sheet("assets/spritesheet.png")
        .await
        .expect("Failed to load sprite sheet");

    let mut world = World::generate(WORLD_SIZE, Generation::Random, 69);
    let mut brush = Brush::default();
    let mut show_ui = true;
    let mut edit_heights = false;

    let tile_size = vec2(TILE_W as f32, TILE_H as f32);

    loop {
        clear_background(WHITE);

        view.handle_input(ZOOM_STEP);

        // Mouse -> view space -> world space -> cell. The half-cell nudge
        // centres picking on the diamond instead of its bounding box corner.
        let mouse_view = view.screen_to_view(Vec2::from(mouse_position()));
        let mouse_world = screen_to_world(mouse_view, tile_size) + vec2(-0.5, 0.5);
        let (selected, _within) = world_to_cell(mouse_world);

        if is_key_pressed(KeyCode::H) {
            show_ui = !show_ui;
        }
        if is_key_pressed(KeyCode::Tab) {
            edit_heights = !edit_heights;
        }
        if is_key_pressed(KeyCode::Q) {
            brush.next_ground();
        }
        if is_key_pressed(KeyCode::E) {
            brush.next_overlay();
        }

        if edit_heights {
            if is_mouse_button_pressed(MouseButton::Left) {
                world.adjust_height(selected, 1);
            }
            if is_mouse_button_pressed(MouseButton::Right) {
                world.adjust_height(selected, -1);
            }
        } else {
            if is_mouse_button_down(MouseButton::Left) {
                world.paint_ground(selected, brush.ground);
            }
            if is_mouse_button_down(MouseButton::Right) {
                world.paint_overlay(selected, brush.overlay);
            }
        }

        draw_world(&renderer, &mut view, &world, selected);

        if show_ui {
            draw_inventory(&renderer, &view, &brush);
        }

        draw_text(&format!("FPS: {}", get_fps()), 8.0, 20.0, 24.0, BLACK);
        draw_text(
            &format!("Mouse (world): {:.3}, {:.3}", mouse_world.x, mouse_world.y),
            8.0,
            44.0,
            24.0,
            BLACK,
        );
        draw_text(
            &format!("Selected: {}, {}", selected.x, selected.y),
            8.0,
            68.0,
            24.0,
            BLACK,
        );
        draw_text(
            if edit_heights {
                "Mode: terrain height (Tab)"
            } else {
                "Mode: tile/overlay (Tab)"
            },
            8.0,
            92.0,
            24.0,
            BLACK,
        );

        next_frame().await;
    }
}

fn draw_world(renderer: &SheetRenderer, view: &mut PanZoomView, world: &World, selected: IVec2) {
    let size = world.size();
    for y in 0..size.y {
        for x in 0..size.x {
            let cell = ivec2(x, y);
            let tile = match world.get(cell) {
                Some(t) => t,
                None => continue,
            };

            let mut ground_row = ROW_GROUND;
            let mut displacement = tile.height * HEIGHT_STEP;
            if tile.ground == WATER {
                // Water sits at one fixed level regardless of terrain.
                ground_row = ROW_WATER;
                displacement = HEIGHT_STEP;
            }
            let offset = vec2(0.0, displacement as f32);

            renderer.render_isometric(view, cell, ground_row, tile.ground as usize, offset);
            if cell == selected {
                renderer.render_isometric(view, cell, ROW_HIGHLIGHT, 0, offset);
            }
            if tile.overlay != 0 {
                renderer.render_isometric(view, cell, ROW_OVERLAY, tile.overlay as usize, offset);
            }
        }
    }
}

fn draw_inventory(renderer: &SheetRenderer, view: &PanZoomView, brush: &Brush) {
    let scale = vec2(3.0, 3.0);
    let slot = vec2(TILE_W as f32, TILE_H as f32) * scale;
    let origin = vec2(TILE_W as f32, screen_height() - TILE_H as f32 * 7.5);

    draw_rectangle(
        origin.x - slot.x * 0.2,
        origin.y - slot.y * 0.6,
        slot.x * 2.4,
        slot.y * 2.2,
        GRAY,
    );

    let mut ui = UiView {
        texture: view.texture(),
    };

    // The water brush has no ground sprite of its own; show the water row.
    if brush.ground == WATER {
        renderer.render(&mut ui, origin, ROW_WATER, 0, scale);
    } else {
        renderer.render(&mut ui, origin, ROW_GROUND, brush.ground as usize, scale);
    }
    renderer.render(&mut ui, origin + vec2(slot.x, 0.0), ROW_GROUND, 0, scale);
    renderer.render(
        &mut ui,
        origin + vec2(slot.x, 0.0),
        ROW_OVERLAY,
        brush.overlay as usize,
        scale,
    );

    let text_y = origin.y + slot.y * 1.2;
    draw_text("Q", origin.x + slot.x * 0.4, text_y, 32.0, BLACK);
    draw_text("E", origin.x + slot.x * 1.4, text_y, 32.0, BLACK);
    draw_text(
        "H to hide/show",
        origin.x - slot.x * 0.2,
        text_y + 24.0,
        16.0,
        BLACK,
    );
}
