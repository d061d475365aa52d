mod pixel_buffer;
mod surface;
#[cfg(feature = "window")]
mod window;

pub use pixel_buffer::{BlendMode, PixelBuffer};
#[cfg(test)]
pub use surface::recording;
pub use surface::Surface;
#[cfg(feature = "window")]
pub use window::{Display, InputEvent, RenderTarget};

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 800;
