use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use tracing::warn;
use winit::window::Window;

use crate::app::Scene;

use super::overlay::{draw_overlay, OverlayData};
use super::Canvas;

/// Owns the pixel surface. The frame buffer stays at the logical view size
/// and is scaled to whatever the window surface is.
pub(crate) struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub(crate) fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(width, height, surface)?;
        Ok(Self {
            window,
            pixels,
            width,
            height,
        })
    }

    pub(crate) fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    pub(crate) fn render_frame(
        &mut self,
        scene: &dyn Scene,
        overlay: Option<&OverlayData>,
    ) -> Result<(), Error> {
        {
            let frame = self.pixels.frame_mut();
            let Some(mut canvas) = Canvas::new(frame, self.width, self.height) else {
                warn!(
                    width = self.width,
                    height = self.height,
                    "frame_buffer_size_mismatch"
                );
                return Ok(());
            };
            scene.draw(&mut canvas);
            if let Some(data) = overlay {
                draw_overlay(&mut canvas, data);
            }
        }
        self.window.pre_present_notify();
        self.pixels.render()
    }
}
