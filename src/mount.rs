//! Mount lifecycle
//!
//! A `Mount` owns one effect and the pixel buffer it draws into, and stands in
//! for the page that hosts a canvas: it forwards the container events the
//! effect subscribed to, runs one update+render per host frame, pauses while
//! hidden and stops for good on teardown.

use crate::display::PixelBuffer;
use crate::effects::{Effect, Listeners};

/// Container rectangle in window (CSS) pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Window point inside the container
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && ((x - self.x) as i64) < self.width as i64
            && ((y - self.y) as i64) < self.height as i64
    }
}

/// Container events, in window (CSS) pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize { bounds: Bounds, dpi: f32 },
    PointerDown { x: i32, y: i32 },
    TouchStart { x: i32, y: i32 },
    Visibility(bool),
}

/// One effect bound to its drawing surface
pub struct Mount<E: Effect> {
    effect: E,
    surface: Option<PixelBuffer>,
    bounds: Bounds,
    dpi: f32,
    visible: bool,
    cancelled: bool,
    listeners: Listeners,
    frames: u64,
}

/// Device pixel size of a container, 0x0 when the container has no area
fn device_size(bounds: &Bounds, dpi: f32) -> (u32, u32) {
    if bounds.is_empty() {
        return (0, 0);
    }
    (
        ((bounds.width as f32 * dpi).round() as u32).max(1),
        ((bounds.height as f32 * dpi).round() as u32).max(1),
    )
}

impl<E: Effect> Mount<E> {
    /// Attach an effect to a container and size it
    pub fn new(mut effect: E, bounds: Bounds, dpi: f32) -> Self {
        let dpi = if dpi > 0.0 { dpi } else { 1.0 };
        let listeners = effect.listeners();
        effect.resize(bounds.width, bounds.height, dpi);

        let (w, h) = device_size(&bounds, dpi);
        let surface = (w > 0).then(|| PixelBuffer::with_size(w, h));
        log::debug!(
            "mount {}: {}x{} at ({}, {}), surface {}x{}",
            effect.name(),
            bounds.width,
            bounds.height,
            bounds.x,
            bounds.y,
            w,
            h
        );

        Self {
            effect,
            surface,
            bounds,
            dpi,
            visible: true,
            cancelled: false,
            listeners,
            frames: 0,
        }
    }

    /// Route a host event to the effect
    ///
    /// Returns true when the event was delivered.
    pub fn dispatch(&mut self, event: HostEvent) -> bool {
        if self.cancelled {
            return false;
        }

        match event {
            HostEvent::Resize { bounds, dpi } if self.listeners.resize => {
                self.resize(bounds, dpi);
                true
            },
            HostEvent::PointerDown { x, y } | HostEvent::TouchStart { x, y } if self.listeners.pointer => {
                if !self.bounds.contains(x, y) {
                    return false;
                }
                let local_x = (x - self.bounds.x) as f32;
                let local_y = (y - self.bounds.y) as f32;
                self.effect.pointer_down(local_x, local_y);
                true
            },
            HostEvent::Visibility(visible) if self.listeners.visibility => {
                if visible != self.visible {
                    log::debug!(
                        "mount {}: {}",
                        self.effect.name(),
                        if visible { "resumed" } else { "paused" }
                    );
                }
                self.visible = visible;
                true
            },
            _ => false,
        }
    }

    fn resize(&mut self, bounds: Bounds, dpi: f32) {
        let dpi = if dpi > 0.0 { dpi } else { self.dpi };
        let (w, h) = device_size(&bounds, dpi);
        let current = self
            .surface
            .as_ref()
            .map(|s| (s.width(), s.height()))
            .unwrap_or((0, 0));

        if (w, h) != current {
            self.surface = (w > 0).then(|| PixelBuffer::with_size(w, h));
        }
        self.bounds = bounds;
        self.dpi = dpi;
        self.effect.resize(bounds.width, bounds.height, dpi);
    }

    /// Run one frame: update, then render into the surface
    ///
    /// Returns whether the frame callback stays armed. Paused mounts skip the
    /// frame body but stay armed; torn-down mounts do nothing and disarm.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.cancelled {
            return false;
        }
        if !self.visible {
            return true;
        }

        self.effect.update(dt);
        if let Some(surface) = self.surface.as_mut() {
            self.effect.render(surface);
        }
        self.frames += 1;
        true
    }

    /// Cancel the frame callback and drop every subscription
    pub fn teardown(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.listeners = Listeners::NONE;
        log::debug!("mount {}: torn down after {} frames", self.effect.name(), self.frames);
    }

    pub fn is_live(&self) -> bool {
        !self.cancelled
    }

    pub fn is_paused(&self) -> bool {
        !self.visible
    }

    /// Drawn pixels, `None` for a zero-area container
    pub fn surface(&self) -> Option<&PixelBuffer> {
        self.surface.as_ref()
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Frames run since mount (paused frames excluded)
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<E: Effect> Drop for Mount<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldConfig, FireworksConfig};
    use crate::effects::{BlackHole, Fireworks};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> BlackHole<StdRng> {
        let config = FieldConfig {
            dot_count: 50,
            ..FieldConfig::default()
        };
        BlackHole::with_rng(config, StdRng::seed_from_u64(11))
    }

    fn fireworks() -> Fireworks<StdRng> {
        let config = FireworksConfig {
            interval: (100_000, 100_000),
            ..FireworksConfig::default()
        };
        Fireworks::with_rng(config, StdRng::seed_from_u64(12))
    }

    #[test]
    fn test_bounds_contains() {
        let b = Bounds::new(10, 20, 100, 50);
        assert!(b.contains(10, 20));
        assert!(b.contains(109, 69));
        assert!(!b.contains(110, 20));
        assert!(!b.contains(9, 30));
        assert!(!b.contains(50, 70));
        assert!(!Bounds::new(0, 0, 0, 10).contains(0, 0));
    }

    #[test]
    fn test_zero_area_mount_never_draws() {
        let mut mount = Mount::new(field(), Bounds::new(0, 0, 0, 600), 2.0);
        assert!(mount.surface().is_none());
        for _ in 0..10 {
            assert!(mount.tick(1.0 / 60.0));
        }
        assert!(mount.surface().is_none());
        assert!(mount.effect().discs().is_empty());
    }

    #[test]
    fn test_surface_scaled_by_dpi() {
        let mut mount = Mount::new(field(), Bounds::new(0, 0, 100, 80), 2.0);
        let surface = mount.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (200, 160));

        mount.tick(1.0 / 60.0);
        assert_eq!(mount.frames(), 1);
    }

    #[test]
    fn test_resize_reallocates_surface() {
        let mut mount = Mount::new(field(), Bounds::new(0, 0, 100, 80), 1.0);
        let delivered = mount.dispatch(HostEvent::Resize {
            bounds: Bounds::new(0, 0, 300, 200),
            dpi: 1.5,
        });
        assert!(delivered);
        let surface = mount.surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (450, 300));
        assert_eq!(mount.effect().discs()[0].w, 300.0);

        mount.dispatch(HostEvent::Resize {
            bounds: Bounds::new(0, 0, 300, 0),
            dpi: 1.5,
        });
        assert!(mount.surface().is_none());
    }

    #[test]
    fn test_teardown_stops_frames_and_events() {
        let mut mount = Mount::new(fireworks(), Bounds::new(0, 0, 400, 300), 1.0);
        assert!(mount.tick(1.0 / 60.0));
        mount.teardown();

        assert!(!mount.is_live());
        assert!(!mount.tick(1.0 / 60.0));
        assert_eq!(mount.frames(), 1);
        assert!(!mount.dispatch(HostEvent::PointerDown { x: 10, y: 10 }));
        assert!(!mount.dispatch(HostEvent::Resize {
            bounds: Bounds::new(0, 0, 10, 10),
            dpi: 1.0,
        }));
        assert_eq!(mount.bounds(), Bounds::new(0, 0, 400, 300));

        // Idempotent
        mount.teardown();
        assert!(!mount.is_live());
    }

    #[test]
    fn test_hidden_field_skips_frames() {
        let mut mount = Mount::new(field(), Bounds::new(0, 0, 100, 80), 1.0);
        mount.tick(1.0 / 60.0);
        let p = mount.effect().discs()[0].p;

        assert!(mount.dispatch(HostEvent::Visibility(false)));
        assert!(mount.is_paused());
        for _ in 0..5 {
            assert!(mount.tick(1.0 / 60.0));
        }
        assert_eq!(mount.effect().discs()[0].p, p);
        assert_eq!(mount.frames(), 1);

        mount.dispatch(HostEvent::Visibility(true));
        mount.tick(1.0 / 60.0);
        assert!(mount.effect().discs()[0].p > p);
    }

    #[test]
    fn test_field_ignores_pointer_events() {
        let mut mount = Mount::new(field(), Bounds::new(0, 0, 100, 80), 1.0);
        assert!(!mount.dispatch(HostEvent::PointerDown { x: 10, y: 10 }));
    }

    #[test]
    fn test_fireworks_ignore_visibility() {
        let mut mount = Mount::new(fireworks(), Bounds::new(0, 0, 100, 80), 1.0);
        assert!(!mount.dispatch(HostEvent::Visibility(false)));
        assert!(!mount.is_paused());
    }

    #[test]
    fn test_pointer_translated_to_container() {
        let mut mount = Mount::new(fireworks(), Bounds::new(0, 500, 400, 300), 1.0);

        assert!(mount.dispatch(HostEvent::PointerDown { x: 200, y: 650 }));
        assert!(mount.dispatch(HostEvent::TouchStart { x: 30, y: 799 }));
        assert!(!mount.dispatch(HostEvent::PointerDown { x: 200, y: 100 }));

        let launched: Vec<_> = mount
            .effect()
            .mortars()
            .iter()
            .map(|m| (m.x, m.y, m.is_targeted()))
            .collect();
        assert_eq!(launched, vec![(200.0, 300.0, true), (30.0, 300.0, true)]);
    }
}
