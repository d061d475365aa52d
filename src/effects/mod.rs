mod black_hole;
mod fireworks;

pub use black_hole::{disc_alpha, BlackHole, Disc, Dot};
pub use fireworks::{Explosion, Fireworks, Mortar, MortarState, Particle, SpawnTimer};

use crate::display::Surface;

/// Host events an effect can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Listeners {
    /// Container resize
    pub resize: bool,
    /// Click and touch start
    pub pointer: bool,
    /// Shown/hidden, gates the frame body
    pub visibility: bool,
}

impl Listeners {
    pub const NONE: Self = Self {
        resize: false,
        pointer: false,
        visibility: false,
    };
}

/// Trait for the animated backdrops
///
/// A host drives one effect per frame: `update` advances every entity, then
/// `render` draws the frame. Nothing is drawn from a half-updated state.
pub trait Effect {
    /// Rebuild size-dependent state
    /// - width/height: container size in CSS pixels (may be zero)
    /// - dpi: device pixels per CSS pixel
    fn resize(&mut self, width: u32, height: u32, dpi: f32);

    /// Advance the simulation by one frame
    /// - dt: seconds since the previous frame
    fn update(&mut self, dt: f32);

    /// Draw the current state
    fn render(&self, surface: &mut dyn Surface);

    /// Pointer press or touch start, in container-local CSS pixels
    fn pointer_down(&mut self, _x: f32, _y: f32) {}

    /// Host events this effect wants delivered
    fn listeners(&self) -> Listeners;

    /// Effect name for logging
    fn name(&self) -> &str;
}
