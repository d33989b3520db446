//! The particle field: the particles and everything they share.

use crate::canvas::Canvas;
use crate::config::Config;
use crate::particle::Particle;

/// The size of the surface being drawn on, in canvas units.
#[expect(
    clippy::exhaustive_structs,
    reason = "It's very unlikely that a 2D size is going to get any more fields"
)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Width of the canvas
    pub width: f32,
    /// Height of the canvas
    pub height: f32,
}

impl Bounds {
    /// Instantiate
    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether there's actually anything to draw on. A surface that doesn't exist yet, or that
    /// has collapsed to nothing, is not drawable.
    #[inline]
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// All the state of one particle simulation.
///
/// Several fields can run side by side without knowing about each other: each one owns its own
/// particles, clock and random number source.
pub struct Field {
    /// How the field behaves.
    config: Config,
    /// The size of the surface the field is drawn on.
    bounds: Bounds,
    /// All the particles, in drawing order.
    particles: Vec<Particle>,
    /// Frames elapsed since the field was initialised.
    time: f64,
    /// A disabled field neither moves nor draws.
    is_enabled: bool,
    /// Where all the randomness comes from.
    rng: Box<dyn rand::RngCore + Send>,
}

impl core::fmt::Debug for Field {
    #[inline]
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter
            .debug_struct("Field")
            .field("bounds", &self.bounds)
            .field("particles", &self.particles.len())
            .field("time", &self.time)
            .field("is_enabled", &self.is_enabled)
            .finish_non_exhaustive()
    }
}

impl Field {
    /// Create a field of `config.count` freshly randomised particles.
    #[inline]
    #[must_use]
    pub fn new<R>(config: Config, bounds: Bounds, rng: R) -> Self
    where
        R: rand::RngCore + Send + 'static,
    {
        let mut field = Self {
            config,
            bounds,
            particles: Vec::new(),
            time: 0.0,
            is_enabled: true,
            rng: Box::new(rng),
        };
        field.reinitialise();
        field
    }

    /// Create a field of exactly `count` particles, whatever `config` says.
    #[inline]
    #[must_use]
    pub fn initialise<R>(count: usize, bounds: Bounds, mut config: Config, rng: R) -> Self
    where
        R: rand::RngCore + Send + 'static,
    {
        config.count = count;
        Self::new(config, bounds, rng)
    }

    /// Create a field seeded from the operating system's randomness.
    #[inline]
    #[must_use]
    pub fn with_entropy(config: Config, bounds: Bounds) -> Self {
        Self::new(
            config,
            bounds,
            <rand::rngs::StdRng as rand::SeedableRng>::from_entropy(),
        )
    }

    /// The field's config.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The current size of the canvas.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// All the particles, in drawing order.
    #[inline]
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Frames elapsed since the field was initialised.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Whether the field is moving and drawing.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Whether stepping and rendering will actually do anything.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_enabled && self.bounds.is_drawable()
    }

    /// Throw away all the particles and make `config.count` new ones. The clock restarts.
    #[inline]
    pub fn reinitialise(&mut self) {
        let count = crate::config::clamp_count(self.config.count);
        self.config.count = count;
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = Particle::randomise(&self.config, self.bounds, &mut *self.rng);
            self.particles.push(particle);
        }
        self.time = 0.0;

        tracing::trace!(
            "Initialised {count} particles in {}x{}",
            self.bounds.width,
            self.bounds.height
        );
    }

    /// Change the number of particles. All the particles are remade.
    #[inline]
    pub fn set_count(&mut self, count: usize) {
        tracing::debug!("Particle count changing from {} to {count}", self.config.count);
        self.config.count = count;
        self.reinitialise();
    }

    /// Advance the simulation by `frames` frames (at [`crate::REFERENCE_FRAME_RATE`]). Particles
    /// are moved in place; none are ever added or removed.
    ///
    /// Negative and non-finite durations count as no time at all.
    #[inline]
    pub fn step(&mut self, frames: f32) {
        if !self.is_active() {
            return;
        }

        let frames = if frames.is_finite() {
            frames.max(0.0)
        } else {
            0.0
        };
        self.time += f64::from(frames);

        for particle in &mut self.particles {
            crate::motion::advance(
                particle,
                &self.config.motion,
                self.bounds,
                self.time,
                frames,
                &mut *self.rng,
            );
            crate::motion::fade(particle, &self.config.opacity, self.time, frames);
        }
    }

    /// Draw the field onto a canvas. Nothing at all is drawn whilst the field is inactive.
    #[inline]
    pub fn render(&self, canvas: &mut impl Canvas) {
        if !self.is_active() {
            return;
        }
        crate::render::render(&self.config, self.bounds, &self.particles, canvas);
    }

    /// Step and then render, the usual work of a single animation frame.
    #[inline]
    pub fn frame(&mut self, frames: f32, canvas: &mut impl Canvas) {
        self.step(frames);
        self.render(canvas);
    }

    /// Follow a change in the size of the canvas. Resizing to the current size does nothing.
    #[inline]
    pub fn resize(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }

        tracing::debug!(
            "Resizing field from {}x{} to {}x{}",
            self.bounds.width,
            self.bounds.height,
            bounds.width,
            bounds.height
        );
        let was_drawable = self.bounds.is_drawable();
        self.bounds = bounds;

        // Particles made before there was a surface are all piled up at the origin.
        if self.config.reinitialise_on_resize || !was_drawable {
            self.reinitialise();
        }
    }

    /// Turn the field on or off. Whilst off, stepping and rendering are skipped entirely.
    #[inline]
    pub fn set_enabled(&mut self, is_enabled: bool) {
        if is_enabled == self.is_enabled {
            return;
        }

        tracing::debug!("Particle field enabled: {is_enabled}");
        self.is_enabled = is_enabled;
        if is_enabled && self.config.reset_on_enable {
            self.reinitialise();
        }
    }

    /// Replace the whole config and remake the particles.
    #[inline]
    pub fn reconfigure(&mut self, config: Config) {
        self.config = config;
        self.reinitialise();
    }
}
