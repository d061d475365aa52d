//! Black Hole Effect
//!
//! A receding tunnel of concentric discs with tens of thousands of warm dots
//! orbiting them. Every disc slides down the depth axis at a constant rate
//! per frame and shrinks along two eased curves; its stroke and dots fade in
//! and out with its apparent size, so rings never pop at either end.

use super::{Effect, Listeners};
use crate::config::FieldConfig;
use crate::display::Surface;
use crate::easing::{tween, Easing};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Below this apparent size a disc fades in cubically
const FADE_IN_END: f32 = 0.01;
/// Above this apparent size a disc fades out linearly, reaching 0 at 1.0
const FADE_OUT_START: f32 = 0.2;

/// Disc alpha as a function of apparent size `sx * sy`
///
/// Cubic ramp on [0, 0.01), plateau on [0.01, 0.2], linear fall to 0 at 1.
#[inline]
pub fn disc_alpha(scale: f32) -> f32 {
    if scale < FADE_IN_END {
        (scale / FADE_IN_END).min(1.0).powi(3)
    } else if scale > FADE_OUT_START {
        1.0 - ((scale - FADE_OUT_START) / (1.0 - FADE_OUT_START)).min(1.0)
    } else {
        1.0
    }
}

/// The outermost ring every disc is scaled from
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct StartDisc {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

/// One depth ring of the tunnel
#[derive(Debug, Clone, PartialEq)]
pub struct Disc {
    /// Depth progress in [0, 1)
    pub p: f64,
    pub sx: f32,
    pub sy: f32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Stroke alpha, always `disc_alpha(sx * sy)`
    pub a: f32,
}

impl Disc {
    fn new(p: f64, start: &StartDisc) -> Self {
        let mut disc = Self {
            p,
            sx: 1.0,
            sy: 1.0,
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            a: 0.0,
        };
        disc.tween(start);
        disc
    }

    /// Recompute every derived field from `p`
    fn tween(&mut self, start: &StartDisc) {
        let p = self.p as f32;
        self.sx = tween(1.0, 0.0, p, Easing::CubicOut);
        self.sy = tween(1.0, 0.0, p, Easing::ExpoOut);
        self.w = start.w * self.sx;
        self.h = start.h * self.sy;
        self.x = start.x;
        self.y = start.y + p * start.h;
        self.a = disc_alpha(self.scale());
    }

    fn advance(&mut self, speed: f64, start: &StartDisc) {
        self.p = (self.p + speed) % 1.0;
        self.tween(start);
    }

    /// Apparent size: 1 for the full outer ring, 0 for a vanished point
    #[inline]
    pub fn scale(&self) -> f32 {
        self.sx * self.sy
    }
}

/// A star riding one disc
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    /// Index of the bound disc
    pub disc: usize,
    /// Angular phase
    pub a: f32,
    /// Radial progress in [0, 1)
    pub p: f32,
    pub color: (u8, u8, u8),
    /// Opacity multiplier
    pub o: f32,
}

impl Dot {
    /// Position on the bound disc's ellipse, in CSS pixels
    pub fn position(&self, disc: &Disc) -> (f32, f32) {
        let angle = self.a + TAU * self.p;
        (
            disc.x + angle.cos() * disc.w,
            disc.y + disc.h + angle.sin() * disc.h,
        )
    }

    /// Dots on shrunken discs sweep faster
    fn advance(&mut self, disc: &Disc, max_speed: f32) {
        let v = tween(0.0, max_speed, 1.0 - disc.scale(), Easing::ExpoIn);
        self.p = (self.p + v) % 1.0;
    }
}

/// The black-hole tunnel backdrop
pub struct BlackHole<R: Rng = StdRng> {
    config: FieldConfig,
    width: u32,
    height: u32,
    dpi: f32,
    start: StartDisc,
    discs: Vec<Disc>,
    dots: Vec<Dot>,
    rng: R,
}

impl BlackHole<StdRng> {
    pub fn new(config: FieldConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl Default for BlackHole<StdRng> {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

impl<R: Rng> BlackHole<R> {
    /// Field with an injected random source; nothing is built until `resize`
    pub fn with_rng(config: FieldConfig, rng: R) -> Self {
        Self {
            config,
            width: 0,
            height: 0,
            dpi: 1.0,
            start: StartDisc::default(),
            discs: Vec::new(),
            dots: Vec::new(),
            rng,
        }
    }

    pub fn discs(&self) -> &[Disc] {
        &self.discs
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Position of a dot in CSS pixels
    pub fn dot_position(&self, dot: &Dot) -> (f32, f32) {
        dot.position(&self.discs[dot.disc])
    }

    fn build_discs(&mut self) {
        self.start = StartDisc {
            x: self.width as f32 * 0.5,
            y: 0.0,
            w: self.width as f32,
            h: self.height as f32,
        };

        let total = self.config.disc_count;
        let start = self.start;
        self.discs = (0..total)
            .map(|i| Disc::new(i as f64 / total as f64, &start))
            .collect();
    }

    fn build_dots(&mut self) {
        if self.discs.is_empty() {
            self.dots = Vec::new();
            return;
        }

        let disc_count = self.discs.len();
        let rng = &mut self.rng;
        self.dots = (0..self.config.dot_count)
            .map(|_| Dot {
                disc: rng.gen_range(0..disc_count),
                a: 0.0,
                color: (
                    (200.0 + rng.gen::<f32>() * 55.0) as u8,
                    (50.0 + rng.gen::<f32>() * 100.0) as u8,
                    (rng.gen::<f32>() * 50.0) as u8,
                ),
                p: rng.gen::<f32>(),
                o: rng.gen::<f32>(),
            })
            .collect();
    }
}

impl<R: Rng> Effect for BlackHole<R> {
    fn resize(&mut self, width: u32, height: u32, dpi: f32) {
        self.width = width;
        self.height = height;
        self.dpi = if dpi > 0.0 { dpi } else { 1.0 };

        if width == 0 || height == 0 {
            self.discs = Vec::new();
            self.dots = Vec::new();
            log::debug!("black hole: zero-area container, nothing to build");
            return;
        }

        self.build_discs();
        self.build_dots();
        log::debug!(
            "black hole: {}x{} @{}x, {} discs, {} dots",
            width,
            height,
            self.dpi,
            self.discs.len(),
            self.dots.len()
        );
    }

    fn update(&mut self, _dt: f32) {
        // Frame-coupled on purpose: the tunnel speed follows the refresh rate
        let start = self.start;
        for disc in &mut self.discs {
            disc.advance(self.config.speed, &start);
        }

        let discs = &self.discs;
        for dot in &mut self.dots {
            dot.advance(&discs[dot.disc], self.config.dot_speed);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        if self.discs.is_empty() {
            return;
        }
        let dpi = self.dpi;

        surface.clear(self.config.background);

        for disc in &self.discs {
            surface.stroke_ellipse(
                disc.x * dpi,
                (disc.y + disc.h) * dpi,
                disc.w * dpi,
                disc.h * dpi,
                dpi,
                self.config.stroke_color,
                disc.a,
            );
        }

        for dot in &self.dots {
            let disc = &self.discs[dot.disc];
            let (x, y) = dot.position(disc);
            let radius = 1.0 + disc.scale() * 0.5;
            surface.fill_circle(x * dpi, y * dpi, radius * dpi, dot.color, disc.a * dot.o);
        }
    }

    fn listeners(&self) -> Listeners {
        Listeners {
            resize: true,
            pointer: false,
            visibility: true,
        }
    }

    fn name(&self) -> &str {
        "Black Hole"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::recording::{DrawOp, RecordingSurface};

    fn field(dot_count: usize) -> BlackHole<StdRng> {
        let config = FieldConfig {
            dot_count,
            ..FieldConfig::default()
        };
        BlackHole::with_rng(config, StdRng::seed_from_u64(7))
    }

    fn circular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).abs();
        d.min(1.0 - d)
    }

    #[test]
    fn test_alpha_segments() {
        assert_eq!(disc_alpha(0.0), 0.0);
        assert!((disc_alpha(0.005) - 0.125).abs() < 1e-6);
        assert_eq!(disc_alpha(0.01), 1.0);
        assert_eq!(disc_alpha(0.1), 1.0);
        assert_eq!(disc_alpha(0.2), 1.0);
        assert!((disc_alpha(0.6) - 0.5).abs() < 1e-6);
        assert_eq!(disc_alpha(1.0), 0.0);
    }

    #[test]
    fn test_alpha_continuous_at_segment_boundaries() {
        let eps = 1e-6;
        for edge in [FADE_IN_END, FADE_OUT_START] {
            let below = disc_alpha(edge - eps);
            let at = disc_alpha(edge);
            let above = disc_alpha(edge + eps);
            assert!((below - at).abs() < 1e-3, "jump below {edge}: {below} vs {at}");
            assert!((above - at).abs() < 1e-3, "jump above {edge}: {above} vs {at}");
        }
    }

    #[test]
    fn test_alpha_continuous_over_progress() {
        let start = StartDisc {
            x: 500.0,
            y: 0.0,
            w: 1000.0,
            h: 800.0,
        };
        let mut prev = Disc::new(0.0, &start).a;
        for i in 1..10_000 {
            let a = Disc::new(i as f64 / 10_000.0, &start).a;
            assert!((a - prev).abs() < 0.01, "alpha jump at p={}", i as f64 / 10_000.0);
            prev = a;
        }
    }

    #[test]
    fn test_disc_progress_wraps_after_full_cycle() {
        let start = StartDisc {
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 100.0,
        };
        let speed: f64 = 0.0001;
        let origin = 0.37;
        let mut disc = Disc::new(origin, &start);
        let n = (1.0 / speed).round() as usize;
        for _ in 0..n {
            disc.advance(speed, &start);
            assert!((0.0..1.0).contains(&disc.p), "p escaped: {}", disc.p);
        }
        assert!(circular_distance(disc.p, origin) <= speed);
    }

    #[test]
    fn test_disc_geometry_follows_start_disc() {
        let start = StartDisc {
            x: 500.0,
            y: 0.0,
            w: 1000.0,
            h: 800.0,
        };
        let outer = Disc::new(0.0, &start);
        assert_eq!((outer.sx, outer.sy), (1.0, 1.0));
        assert_eq!((outer.x, outer.y, outer.w, outer.h), (500.0, 0.0, 1000.0, 800.0));

        let mid = Disc::new(0.5, &start);
        assert!((mid.sx - 0.125).abs() < 1e-6);
        assert!((mid.sy - 2.0_f32.powf(-5.0)).abs() < 1e-6);
        assert!((mid.y - 400.0).abs() < 1e-3);
        assert!((mid.w - 125.0).abs() < 1e-3);
    }

    #[test]
    fn test_resize_builds_configured_population() {
        let mut bh = field(500);
        bh.resize(1000, 800, 1.0);
        assert_eq!(bh.discs().len(), 150);
        assert_eq!(bh.dots().len(), 500);
        for (i, disc) in bh.discs().iter().enumerate() {
            assert!((disc.p - i as f64 / 150.0).abs() < 1e-12);
        }
        for dot in bh.dots() {
            assert!(dot.disc < 150);
            assert!((0.0..1.0).contains(&dot.p));
            assert!((0.0..1.0).contains(&dot.o));
            assert!(dot.color.0 >= 200 && (50..150).contains(&dot.color.1) && dot.color.2 < 50);
        }
    }

    #[test]
    fn test_resize_replaces_rather_than_accumulates() {
        let mut bh = field(300);
        bh.resize(1000, 800, 1.0);
        bh.resize(640, 480, 2.0);
        bh.resize(640, 480, 2.0);
        assert_eq!(bh.discs().len(), 150);
        assert_eq!(bh.dots().len(), 300);
        assert_eq!(bh.discs()[0].w, 640.0);
        assert_eq!(bh.discs()[0].x, 320.0);
    }

    #[test]
    fn test_zero_area_builds_and_draws_nothing() {
        let mut bh = field(300);
        bh.resize(1000, 800, 1.0);
        bh.resize(0, 800, 1.0);
        assert!(bh.discs().is_empty());
        assert!(bh.dots().is_empty());

        bh.update(0.016);
        let mut surface = RecordingSurface::new(0, 0);
        bh.render(&mut surface);
        assert!(surface.ops.is_empty());

        bh.resize(1000, 0, 2.0);
        assert!(bh.discs().is_empty());
    }

    #[test]
    fn test_dot_position_on_disc_ellipse() {
        let start = StartDisc {
            x: 500.0,
            y: 0.0,
            w: 1000.0,
            h: 800.0,
        };
        let disc = Disc::new(0.0, &start);
        let mut dot = Dot {
            disc: 0,
            a: 0.0,
            p: 0.0,
            color: (255, 100, 0),
            o: 1.0,
        };
        let (x, y) = dot.position(&disc);
        assert!((x - 1500.0).abs() < 1e-3);
        assert!((y - 800.0).abs() < 1e-3);

        dot.p = 0.25;
        let (x, y) = dot.position(&disc);
        assert!((x - 500.0).abs() < 1e-2);
        assert!((y - 1600.0).abs() < 1e-2);
    }

    #[test]
    fn test_dots_on_shrunken_discs_advance_faster() {
        let start = StartDisc {
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 100.0,
        };
        let outer = Disc::new(0.0, &start);
        let inner = Disc::new(0.9, &start);
        let mut on_outer = Dot {
            disc: 0,
            a: 0.0,
            p: 0.5,
            color: (0, 0, 0),
            o: 1.0,
        };
        let mut on_inner = on_outer.clone();

        on_outer.advance(&outer, 0.001);
        on_inner.advance(&inner, 0.001);

        // Full-size disc: 1 - scale == 0, so the dot stands still
        assert_eq!(on_outer.p, 0.5);
        assert!(on_inner.p > 0.5 && on_inner.p <= 0.501 + 1e-6);
    }

    #[test]
    fn test_render_draws_discs_then_dots_scaled_by_dpi() {
        let mut bh = field(20);
        bh.resize(100, 80, 2.0);
        bh.update(0.016);

        let mut surface = RecordingSurface::new(200, 160);
        bh.render(&mut surface);

        assert_eq!(surface.ops[0], DrawOp::Clear((0, 0, 0)));
        assert_eq!(surface.ellipses().count(), 150);
        assert_eq!(surface.circles().count(), 20);

        // Every ellipse precedes every circle
        let last_ellipse = surface
            .ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::Ellipse { .. }))
            .unwrap();
        let first_circle = surface
            .ops
            .iter()
            .position(|op| matches!(op, DrawOp::Circle { .. }))
            .unwrap();
        assert!(last_ellipse < first_circle);

        if let DrawOp::Ellipse { cx, rx, line_width, .. } = &surface.ops[1] {
            assert!((cx - 100.0).abs() < 1e-3);
            assert!(*rx <= 200.0);
            // 1 CSS px line at dpi 2
            assert_eq!(*line_width, 2.0);
        } else {
            panic!("expected the outer disc first");
        }

        let dot = &bh.dots()[0];
        let disc = &bh.discs()[dot.disc];
        let (x, y) = bh.dot_position(dot);
        let first = surface.circles().next().unwrap();
        if let DrawOp::Circle {
            cx,
            cy,
            opacity,
            color,
            ..
        } = first
        {
            assert!((cx - x * 2.0).abs() < 1e-3);
            assert!((cy - y * 2.0).abs() < 1e-3);
            assert!((opacity - disc.a * dot.o).abs() < 1e-6);
            assert_eq!(*color, dot.color);
        }
    }

    #[test]
    fn test_full_cycle_on_desktop_container() {
        let mut bh = field(100);
        bh.resize(1000, 800, 1.0);

        let mut alphas = Vec::with_capacity(10_000);
        for _ in 0..10_000 {
            bh.update(1.0 / 60.0);
            alphas.push(bh.discs()[0].a);
        }

        let disc = &bh.discs()[0];
        assert!(circular_distance(disc.p, 0.0) < 1e-4, "p = {}", disc.p);

        // Starts faded at full size, plateaus while mid-tunnel, fades at the vanishing point
        assert!(alphas[0] < 0.01);
        assert!(alphas.iter().any(|&a| a == 1.0));
        assert!(alphas[5_000..].iter().any(|&a| a < 0.01));
        assert!(alphas[9_999] < 0.01);
    }
}
