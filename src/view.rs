use macroquad::prelude::*;

use crate::renderer::Viewport;

/// Pan/zoom world-to-screen transform backed by macroquad.
///
/// Owns the sheet texture for its lifetime and implements [`Viewport`] on
/// top of `draw_texture_ex`, so a [`crate::SheetRenderer`] can draw through
/// it. View space is the pre-pan, pre-zoom coordinate system tiles are
/// placed in.
pub struct PanZoomView {
    texture: Texture2D,
    offset: Vec2,
    zoom: f32,
    pan_anchor: Option<Vec2>,
}

impl PanZoomView {
    /// Uploads `image` as the sheet texture, nearest-filtered so pixel art
    /// stays crisp under zoom.
    pub fn from_image(image: &Image) -> Self {
        let texture = Texture2D::from_image(image);
        texture.set_filter(FilterMode::Nearest);
        PanZoomView {
            texture,
            offset: Vec2::ZERO,
            zoom: 1.0,
            pan_anchor: None,
        }
    }

    /// The uploaded sheet texture, for callers that draw UI outside the
    /// pan/zoom transform.
    pub fn texture(&self) -> &Texture2D {
        &self.texture
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Converts a screen position (e.g. the mouse) to view space.
    pub fn screen_to_view(&self, screen: Vec2) -> Vec2 {
        self.offset + screen / self.zoom
    }

    /// Converts a view-space position to screen pixels.
    pub fn view_to_screen(&self, view: Vec2) -> Vec2 {
        (view - self.offset) * self.zoom
    }

    /// Rescales around `screen` so the point under it stays fixed.
    pub fn zoom_at(&mut self, screen: Vec2, factor: f32) {
        let before = self.screen_to_view(screen);
        self.zoom *= factor;
        self.offset = before - screen / self.zoom;
    }

    /// Polls middle-button drag panning and wheel zoom for this frame.
    ///
    /// Zoom is multiplicative by `zoom_factor` per wheel notch; sqrt(2)
    /// makes every second notch an exact power of two.
    pub fn handle_input(&mut self, zoom_factor: f32) {
        let mouse = Vec2::from(mouse_position());

        if is_mouse_button_pressed(MouseButton::Middle) {
            self.pan_anchor = Some(mouse);
        }
        if is_mouse_button_released(MouseButton::Middle) {
            self.pan_anchor = None;
        }
        if let Some(anchor) = self.pan_anchor.as_mut() {
            let drag = mouse - *anchor;
            *anchor = mouse;
            self.offset -= drag / self.zoom;
        }

        let (_, wheel) = mouse_wheel();
        if wheel > 0.0 {
            self.zoom_at(mouse, zoom_factor);
        }
        if wheel < 0.0 {
            self.zoom_at(mouse, 1.0 / zoom_factor);
        }
    }
}

impl Viewport for PanZoomView {
    fn is_rect_visible(&self, dest: Vec2, size: Vec2) -> bool {
        let min = self.view_to_screen(dest);
        let max = min + size * self.zoom;
        max.x >= 0.0 && max.y >= 0.0 && min.x <= screen_width() && min.y <= screen_height()
    }

    fn draw_partial(&mut self, dest: Vec2, src: Rect, scale: Vec2) {
        let screen = self.view_to_screen(dest);
        draw_texture_ex(
            &self.texture,
            screen.x,
            screen.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(src.w * scale.x, src.h * scale.y) * self.zoom),
                source: Some(src),
                ..Default::default()
            },
        );
    }
}
