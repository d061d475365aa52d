//! Footer Fireworks Effect
//!
//! Mortars launch from below the bottom edge, arc under gravity and burst into
//! a shower of embers at their apex. A translucent veil over the previous
//! frame leaves short trails behind everything in flight.

use super::{Effect, Listeners};
use crate::config::FireworksConfig;
use crate::display::Surface;
use crate::util::hsl_to_rgb;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MORTAR_RADIUS: f32 = 3.0;
const MORTAR_GRAVITY: f32 = 0.08;
/// Horizontal drift wave, radians per second
const DRIFT_FREQUENCY: f32 = 5.0;
const DRIFT_SCALE: f32 = 0.1;

const PARTICLE_RADIUS: f32 = 2.0;
const PARTICLE_TTL: f32 = 2.0;
const PARTICLE_DECAY: f32 = 0.02;
const PARTICLE_MAX_DX: f32 = 3.0;
const PARTICLE_MAX_DY: f32 = 7.0;
const GRAVITY: f32 = 0.1;
const PULL: f32 = 0.15;
const BOUNCE: f32 = 0.6;

/// Glow halo drawn under each ember, relative to its core
const GLOW_SCALE: f32 = 2.5;
const GLOW_OPACITY: f32 = 0.25;

/// Ambient mortars stay this far from the side edges
const SPAWN_MARGIN: i32 = 50;
/// Ambient mortars start this far below the bottom edge
const SPAWN_DEPTH: f32 = 10.0;

/// A single decaying ember
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    /// Vertical speed, positive is upward
    pub dy: f32,
    pub radius: f32,
    pub time_to_live: f32,
}

impl Particle {
    pub fn new(x: f32, y: f32, dx: f32, dy: f32) -> Self {
        Self {
            x,
            y,
            dx,
            dy,
            radius: PARTICLE_RADIUS,
            time_to_live: PARTICLE_TTL,
        }
    }

    /// Random ember launched from a point
    fn spawn<R: Rng>(x: f32, y: f32, rng: &mut R) -> Self {
        let dx = if rng.gen_bool(0.5) {
            -rng.gen::<f32>() * PARTICLE_MAX_DX
        } else {
            rng.gen::<f32>() * PARTICLE_MAX_DX
        };
        let dy = rng.gen::<f32>() * PARTICLE_MAX_DY;
        Self::new(x, y, dx, dy)
    }

    /// One frame of physics against a floor at `floor`
    pub fn update(&mut self, floor: f32) {
        if self.y + self.radius + self.dy > floor {
            self.dy = -self.dy * BOUNCE;
        } else {
            self.dy -= GRAVITY;
        }

        self.dy -= PULL;
        self.x += self.dx;
        self.y -= self.dy;

        self.time_to_live -= PARTICLE_DECAY;
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.time_to_live.max(0.0)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.time_to_live >= 0.0
    }
}

/// The burst owned by a triggered mortar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Explosion {
    pub particles: Vec<Particle>,
}

impl Explosion {
    /// Burst of `count` embers at a point
    pub fn new<R: Rng>(x: f32, y: f32, count: usize, rng: &mut R) -> Self {
        Self {
            particles: (0..count).map(|_| Particle::spawn(x, y, rng)).collect(),
        }
    }

    /// Advance every ember and drop the expired ones
    pub fn update(&mut self, floor: f32) {
        for p in &mut self.particles {
            p.update(floor);
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Lifecycle of a mortar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MortarState {
    /// Climbing, drawn as a solid ember
    Rising,
    /// Reached its apex, burst not created yet
    Triggered,
    /// Burst in progress, mortar itself hidden
    Exploding,
    /// Burst burned out, ready for removal
    Consumed,
}

/// Projectile fired from the bottom edge
#[derive(Debug, Clone, PartialEq)]
pub struct Mortar {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    /// Vertical speed, negative is upward
    pub dy: f32,
    pub radius: f32,
    triggered: bool,
    is_targeted: bool,
    explosion: Option<Explosion>,
}

impl Mortar {
    pub fn new(x: f32, y: f32, dx: f32, dy: f32, is_targeted: bool) -> Self {
        Self {
            x,
            y,
            dx,
            dy,
            radius: MORTAR_RADIUS,
            triggered: false,
            is_targeted,
            explosion: None,
        }
    }

    /// Pointer-launched mortars fly straight up
    pub fn is_targeted(&self) -> bool {
        self.is_targeted
    }

    pub fn triggered(&self) -> bool {
        self.triggered
    }

    pub fn explosion(&self) -> Option<&Explosion> {
        self.explosion.as_ref()
    }

    pub fn state(&self) -> MortarState {
        match (&self.explosion, self.triggered) {
            (Some(explosion), _) if explosion.is_empty() => MortarState::Consumed,
            (Some(_), _) => MortarState::Exploding,
            (None, true) => MortarState::Triggered,
            (None, false) => MortarState::Rising,
        }
    }

    /// One frame of ballistic flight
    /// - t: seconds since the effect was mounted, drives the drift wave
    pub fn advance(&mut self, t: f32) {
        self.dy += MORTAR_GRAVITY;

        if !self.is_targeted {
            self.x += self.dx * (t * DRIFT_FREQUENCY).sin() * DRIFT_SCALE;
        }

        self.y += self.dy;

        if self.dy >= 0.0 {
            self.triggered = true;
        }
    }

    /// Create the burst on first call, then advance it
    ///
    /// Returns false once the burst has burned out.
    pub fn explode<R: Rng>(&mut self, burst: usize, floor: f32, rng: &mut R) -> bool {
        let (x, y) = (self.x, self.y);
        let explosion = self.explosion.get_or_insert_with(|| Explosion::new(x, y, burst, rng));
        self.radius = 0.0;

        explosion.update(floor);
        !explosion.is_empty()
    }
}

/// Frame counter deciding when the next ambient mortar launches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnTimer {
    elapsed: u32,
    interval: u32,
    reroll: (u32, u32),
}

impl SpawnTimer {
    /// Timer with its first interval rolled from `first` and later ones from `reroll`
    pub fn new<R: Rng>(first: (u32, u32), reroll: (u32, u32), rng: &mut R) -> Self {
        Self {
            elapsed: 0,
            interval: roll_interval(first, rng),
            reroll,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Count one frame; true when a mortar should launch on it
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> bool {
        let fire = self.elapsed % self.interval == 0;
        if fire {
            self.interval = roll_interval(self.reroll, rng);
            self.elapsed = 0;
        }
        self.elapsed += 1;
        fire
    }
}

fn roll_interval<R: Rng>((lo, hi): (u32, u32), rng: &mut R) -> u32 {
    let lo = lo.max(1);
    rng.gen_range(lo..=hi.max(lo))
}

fn roll_int<R: Rng>((lo, hi): (i32, i32), rng: &mut R) -> i32 {
    rng.gen_range(lo..=hi.max(lo))
}

/// The footer fireworks show
pub struct Fireworks<R: Rng = StdRng> {
    config: FireworksConfig,
    width: u32,
    height: u32,
    dpi: f32,
    /// Seconds since mount
    clock: f32,
    mortars: Vec<Mortar>,
    timer: SpawnTimer,
    color: (u8, u8, u8),
    rng: R,
}

impl Fireworks<StdRng> {
    pub fn new(config: FireworksConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl Default for Fireworks<StdRng> {
    fn default() -> Self {
        Self::new(FireworksConfig::default())
    }
}

impl<R: Rng> Fireworks<R> {
    pub fn with_rng(config: FireworksConfig, mut rng: R) -> Self {
        let timer = SpawnTimer::new(config.first_interval, config.interval, &mut rng);
        let color = hsl_to_rgb(config.hue, config.saturation, config.lightness);
        Self {
            config,
            width: 0,
            height: 0,
            dpi: 1.0,
            clock: 0.0,
            mortars: Vec::new(),
            timer,
            color,
            rng,
        }
    }

    pub fn mortars(&self) -> &[Mortar] {
        &self.mortars
    }

    pub fn timer(&self) -> &SpawnTimer {
        &self.timer
    }

    /// Launch a pointer-targeted mortar from the bottom edge under `x`
    pub fn launch_at(&mut self, x: f32) {
        let dy = roll_int(self.config.launch_dy, &mut self.rng) as f32;
        self.mortars
            .push(Mortar::new(x, self.height as f32, 0.0, dy, true));
        log::trace!("fireworks: targeted launch at x={x}");
    }

    fn spawn_ambient(&mut self) {
        let w = self.width as i32;
        let x = if w < SPAWN_MARGIN * 2 {
            w / 2
        } else {
            self.rng.gen_range(SPAWN_MARGIN..=w - SPAWN_MARGIN)
        };
        let dy = roll_int(self.config.launch_dy, &mut self.rng) as f32;
        self.mortars.push(Mortar::new(
            x as f32,
            self.height as f32 + SPAWN_DEPTH,
            self.config.ambient_dx,
            dy,
            false,
        ));
    }

    fn burst_size(&mut self) -> usize {
        let (lo, hi) = self.config.burst;
        self.rng.gen_range(lo..=hi.max(lo)) as usize
    }
}

impl<R: Rng> Effect for Fireworks<R> {
    fn resize(&mut self, width: u32, height: u32, dpi: f32) {
        // In-flight mortars and embers keep their coordinates
        self.width = width;
        self.height = height;
        self.dpi = if dpi > 0.0 { dpi } else { 1.0 };
        log::debug!("fireworks: {}x{} @{}x", width, height, self.dpi);
    }

    fn update(&mut self, dt: f32) {
        self.clock += dt;
        let t = self.clock;
        let floor = self.height as f32;

        let mut mortars = std::mem::take(&mut self.mortars);
        mortars.retain_mut(|mortar| {
            if !mortar.triggered() {
                mortar.advance(t);
            }
            if !mortar.triggered() {
                return true;
            }
            let burst = if mortar.explosion().is_none() {
                self.burst_size()
            } else {
                0
            };
            mortar.explode(burst, floor, &mut self.rng)
        });
        self.mortars = mortars;

        if self.width == 0 || self.height == 0 {
            return;
        }
        if self.timer.tick(&mut self.rng) {
            self.spawn_ambient();
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let dpi = self.dpi;

        surface.veil(self.config.veil_color, self.config.veil_opacity);

        for mortar in &self.mortars {
            if mortar.radius > 0.0 {
                surface.fill_circle(mortar.x * dpi, mortar.y * dpi, mortar.radius * dpi, self.color, 1.0);
            }

            let Some(explosion) = mortar.explosion() else {
                continue;
            };
            for p in &explosion.particles {
                let opacity = p.opacity().min(1.0);
                let (x, y) = (p.x * dpi, p.y * dpi);
                surface.fill_circle(x, y, p.radius * GLOW_SCALE * dpi, self.color, opacity * GLOW_OPACITY);
                surface.fill_circle(x, y, p.radius * dpi, self.color, opacity);
            }
        }
    }

    fn pointer_down(&mut self, x: f32, _y: f32) {
        self.launch_at(x);
    }

    fn listeners(&self) -> Listeners {
        Listeners {
            resize: true,
            pointer: true,
            visibility: false,
        }
    }

    fn name(&self) -> &str {
        "Fireworks"
    }
}
