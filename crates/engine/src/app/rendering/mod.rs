mod raster;
mod renderer;
mod sprites;
mod text;
mod transform;

pub use renderer::Renderer;
pub(crate) use text::OverlayData;
pub use transform::Viewport;

pub const PLACEHOLDER_BODY_COLOR: [u8; 4] = [110, 74, 46, 255];
pub const PLACEHOLDER_HEAD_COLOR: [u8; 4] = [241, 214, 168, 255];
