use crate::app::{Rect, Vec2};
use crate::assets::Sprite;

use super::text;

/// Borrowed RGBA8 frame with clipped drawing helpers. All coordinates are screen pixels.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    /// Returns `None` when `frame` is not exactly `width * height` RGBA pixels.
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (frame.len() == expected).then_some(Self {
            frame,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let offset = self.offset(x, y)?;
        let px = &self.frame[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let left = (rect.x.floor() as i32).max(0);
        let top = (rect.y.floor() as i32).max(0);
        let right = (rect.right().ceil() as i32).min(self.width as i32);
        let bottom = (rect.bottom().ceil() as i32).min(self.height as i32);
        for y in top..bottom {
            for x in left..right {
                self.blend(x, y, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: [u8; 4]) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let t = thickness.max(1.0).min(rect.width.min(rect.height));
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, t), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - t, rect.width, t), color);
        self.fill_rect(
            Rect::new(rect.x, rect.y + t, t, rect.height - 2.0 * t),
            color,
        );
        self.fill_rect(
            Rect::new(rect.right() - t, rect.y + t, t, rect.height - 2.0 * t),
            color,
        );
    }

    /// Draws `sprite` with its top-left corner at `position`.
    pub fn blit(&mut self, sprite: &Sprite, position: Vec2) {
        let left = position.x.round() as i32;
        let top = position.y.round() as i32;
        let sprite_w = sprite.width() as i32;
        let sprite_h = sprite.height() as i32;
        let draw_left = left.max(0);
        let draw_top = top.max(0);
        let draw_right = (left + sprite_w).min(self.width as i32);
        let draw_bottom = (top + sprite_h).min(self.height as i32);
        if draw_left >= draw_right || draw_top >= draw_bottom {
            return;
        }

        for y in draw_top..draw_bottom {
            for x in draw_left..draw_right {
                let Some(color) = sprite.pixel((x - left) as u32, (y - top) as u32) else {
                    continue;
                };
                self.blend(x, y, color);
            }
        }
    }

    /// Repeats `sprite` over the whole canvas, shifted so that world point
    /// `origin` lands on the canvas top-left.
    pub fn tile(&mut self, sprite: &Sprite, origin: Vec2) {
        let tile_w = sprite.width() as i32;
        let tile_h = sprite.height() as i32;
        if tile_w == 0 || tile_h == 0 {
            return;
        }
        let shift_x = (origin.x.round() as i32).rem_euclid(tile_w);
        let shift_y = (origin.y.round() as i32).rem_euclid(tile_h);
        let mut y = -shift_y;
        while y < self.height as i32 {
            let mut x = -shift_x;
            while x < self.width as i32 {
                self.blit(sprite, Vec2::new(x as f32, y as f32));
                x += tile_w;
            }
            y += tile_h;
        }
    }

    pub fn draw_text(&mut self, position: Vec2, text: &str, color: [u8; 4]) {
        let x = position.x.round() as i32;
        let y = position.y.round() as i32;
        text::for_each_text_pixel(x, y, text, |px, py| self.blend(px, py, color));
    }

    pub fn text_width(text: &str) -> f32 {
        text::text_width(text) as f32
    }

    pub fn line_height() -> f32 {
        text::LINE_ADVANCE as f32
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    fn blend(&mut self, x: i32, y: i32, color: [u8; 4]) {
        let Some(offset) = self.offset(x, y) else {
            return;
        };
        let alpha = color[3] as u32;
        if alpha == 0 {
            return;
        }
        let dst = &mut self.frame[offset..offset + 4];
        if alpha == 255 {
            dst.copy_from_slice(&color);
            return;
        }
        for channel in 0..3 {
            let src = color[channel] as u32;
            let old = dst[channel] as u32;
            dst[channel] = ((src * alpha + old * (255 - alpha)) / 255) as u8;
        }
        dst[3] = 255;
    }
}
