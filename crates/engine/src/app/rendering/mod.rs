mod canvas;
mod overlay;
mod renderer;
mod text;

pub use canvas::Canvas;
pub(crate) use overlay::OverlayData;
pub(crate) use renderer::Renderer;
