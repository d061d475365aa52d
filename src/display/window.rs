//! SDL2 window hosting the backdrops
//!
//! Plays the role the browser plays for the portfolio page: a sized
//! container, a frame clock (vsync), and resize/pointer/touch/visibility
//! events.

use super::PixelBuffer;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

/// Window events, in window (CSS) pixel coordinates
#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    PointerDown { x: i32, y: i32 },
    TouchStart { x: i32, y: i32 },
    Resized { width: u32, height: u32 },
    Visibility(bool),
}

impl Display {
    /// Create a resizable, HiDPI-aware display
    /// vsync=true: one frame per display refresh, like requestAnimationFrame
    /// vsync=false: uncapped framerate for performance testing
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .allow_highdpi()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((Self { canvas, event_pump }, texture_creator))
    }

    /// Window size in window (CSS) pixels
    pub fn size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }

    /// Drawable size in device pixels
    pub fn drawable_size(&self) -> (u32, u32) {
        self.canvas.window().drawable_size()
    }

    /// Device pixels per window pixel (2.0 on most HiDPI screens)
    pub fn device_pixel_ratio(&self) -> f32 {
        let (w, _) = self.size();
        let (dw, _) = self.drawable_size();
        if w == 0 {
            1.0
        } else {
            dw as f32 / w as f32
        }
    }

    pub fn present(
        &mut self,
        target: &mut RenderTarget,
        buffer: &PixelBuffer,
    ) -> Result<(), String> {
        if buffer.width() != target.width || buffer.height() != target.height {
            return Err(format!(
                "frame {}x{} does not match render target {}x{}",
                buffer.width(),
                buffer.height(),
                target.width,
                target.height
            ));
        }
        target
            .texture
            .update(None, buffer.as_bytes(), (buffer.width() * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let (win_w, win_h) = self.size();
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                Event::MouseButtonDown {
                    x,
                    y,
                    mouse_btn: MouseButton::Left,
                    ..
                } => events.push(InputEvent::PointerDown { x, y }),
                // Finger coordinates are normalized to the window
                Event::FingerDown { x, y, .. } => events.push(InputEvent::TouchStart {
                    x: (x * win_w as f32) as i32,
                    y: (y * win_h as f32) as i32,
                }),
                Event::Window { win_event, .. } => match win_event {
                    WindowEvent::SizeChanged(w, h) => events.push(InputEvent::Resized {
                        width: w.max(0) as u32,
                        height: h.max(0) as u32,
                    }),
                    WindowEvent::Hidden | WindowEvent::Minimized => {
                        events.push(InputEvent::Visibility(false));
                    },
                    WindowEvent::Shown | WindowEvent::Restored => {
                        events.push(InputEvent::Visibility(true));
                    },
                    _ => {},
                },
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a streaming texture matching a frame buffer size
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width.max(1), height.max(1))
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            width: width.max(1),
            height: height.max(1),
        })
    }
}
