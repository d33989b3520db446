//! All the variables that can be configured for a particle field.
//!
//! Everything deserialises from TOML (or anything else `serde` speaks), and anything missing is
//! filled in from [`Config::default`].

use rand::Rng as _;

use crate::colour::{Colour, WHITE};

/// The particle count used when the configured count is missing or isn't a number.
pub const DEFAULT_PARTICLE_COUNT: usize = 50;

/// The most particles a single field will make, whatever it's asked for.
pub const MAX_PARTICLE_COUNT: usize = 10_000;

/// The distance under which two particles get a connector drawn between them.
pub const DEFAULT_CONNECTOR_THRESHOLD: f32 = 100.0;

/// All the config for a single particle field.
#[expect(
    clippy::exhaustive_structs,
    reason = "Config reads best as a struct literal with `..Config::default()`"
)]
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// How many particles make up the field.
    #[serde(deserialize_with = "deserialize_count")]
    pub count: usize,
    /// How particles move and what happens at the edges.
    pub motion: Motion,
    /// How a particle's opacity changes over time.
    pub opacity: Opacity,
    /// How a particle is drawn.
    pub style: Style,
    /// Lines between nearby particles.
    pub connectors: Option<Connectors>,
    /// Whether the canvas is cleared or faded between frames.
    pub trail: Trail,
    /// The radius of a new particle.
    pub size: Spread,
    /// The horizontal velocity of a new particle, in canvas units per frame.
    pub velocity_x: Spread,
    /// The vertical velocity of a new particle, in canvas units per frame.
    pub velocity_y: Spread,
    /// The opacity of a new particle.
    pub initial_opacity: Spread,
    /// Throw away all particles and make new ones whenever the canvas changes size.
    pub reinitialise_on_resize: bool,
    /// Throw away all particles and make new ones when the field is re-enabled.
    pub reset_on_enable: bool,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            motion: Motion::Wrap { scatter: false },
            opacity: Opacity::Fixed,
            style: Style::Flat {
                colours: vec![WHITE],
            },
            connectors: None,
            trail: Trail::Clear,
            size: Spread::new(1.0, 3.0),
            velocity_x: Spread::new(-0.5, 0.5),
            velocity_y: Spread::new(-0.5, 0.5),
            initial_opacity: Spread::fixed(1.0),
            reinitialise_on_resize: false,
            reset_on_enable: false,
        }
    }
}

/// The motion policy. Exactly one applies to every particle in a field.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Motion {
    /// Linear drift. A coordinate that leaves the canvas re-enters from the opposite edge.
    Wrap {
        /// Re-randomise the other axis when a coordinate wraps, so that particles don't just
        /// repeat the same column (or row) forever.
        #[serde(default)]
        scatter: bool,
    },
    /// Linear drift. A velocity component flips sign when its coordinate leaves the canvas.
    Bounce,
    /// Circle around an anchor point whilst the anchor drifts. Free-wraps at the edges.
    WaveDrift {
        /// The radius of the circling, in canvas units.
        amplitude: f32,
        /// How quickly the circling goes round, in radians per frame.
        frequency: f32,
        /// The constant drift of the anchor, in canvas units per frame.
        #[serde(default)]
        drift: (f32, f32),
    },
}

/// How opacity is animated.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Opacity {
    /// Opacity stays at whatever it was born with.
    Fixed,
    /// Fade in: opacity grows by `rate` every frame until it reaches 1.
    Ramp {
        /// Opacity gained per frame.
        rate: f32,
    },
    /// Breathe: `base ± amplitude`, following a sine wave.
    Pulse {
        /// The middle of the pulse.
        base: f32,
        /// How far above and below the base the pulse reaches.
        amplitude: f32,
        /// Radians per frame.
        speed: f32,
    },
}

/// How particles look.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Style {
    /// A plain filled disc. Each particle picks one of the colours at random.
    Flat {
        /// The colours to pick from.
        colours: Vec<Colour>,
    },
    /// A disc with a glowing halo, and optionally a small highlight.
    Glow {
        /// The colours to pick from.
        colours: Vec<Colour>,
        /// How far the glow reaches beyond the disc, in canvas units.
        blur: f32,
        /// Draw a smaller, brighter disc towards the top-left of the particle.
        #[serde(default)]
        highlight: bool,
    },
    /// Every particle gets its own random hue.
    RandomHue {
        /// Saturation, `0.0..=1.0`.
        saturation: f32,
        /// Lightness, `0.0..=1.0`.
        lightness: f32,
    },
}

/// Lines drawn between every pair of particles that are close enough to each other.
#[expect(
    clippy::exhaustive_structs,
    reason = "Config reads best as a struct literal"
)]
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Connectors {
    /// Particles further apart than this don't get a line.
    pub threshold: f32,
    /// The opacity of a line between two particles at exactly the same spot.
    pub max_opacity: f32,
    /// The colour of the lines.
    pub colour: Colour,
    /// The width of the lines, in canvas units.
    pub width: f32,
}

impl Default for Connectors {
    #[inline]
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONNECTOR_THRESHOLD,
            max_opacity: 1.0,
            colour: WHITE,
            width: 1.0,
        }
    }
}

impl Connectors {
    /// The opacity of a line between two particles `distance` apart. It's strongest when they
    /// touch and fades linearly to nothing at the threshold.
    #[inline]
    #[must_use]
    pub fn opacity_at(&self, distance: f32) -> f32 {
        let is_usable_threshold = self.threshold.is_finite() && self.threshold > 0.0;
        if !is_usable_threshold || !distance.is_finite() || distance >= self.threshold {
            return 0.0;
        }
        let closeness = 1.0 - distance.max(0.0) / self.threshold;
        (self.max_opacity * closeness).clamp(0.0, 1.0)
    }
}

/// What happens to the previous frame before drawing the next one.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Trail {
    /// Wipe the canvas completely.
    Clear,
    /// Paint a translucent layer over the previous frame, so that moving particles leave trails.
    Fade {
        /// The colour of the layer, usually the background colour.
        colour: Colour,
        /// The opacity of the layer. Lower values give longer trails.
        alpha: f32,
    },
}

/// A range to randomly pick values from.
#[expect(
    clippy::exhaustive_structs,
    reason = "It's just a pair of numbers"
)]
#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    /// The smallest value.
    pub min: f32,
    /// The largest value.
    pub max: f32,
}

impl Spread {
    /// Instantiate
    #[inline]
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A "range" that always gives the same value.
    #[inline]
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Pick a value. An empty or inverted range gives its minimum, and non-finite bounds give 0.
    #[inline]
    pub fn sample<R: rand::RngCore + ?Sized>(&self, rng: &mut R) -> f32 {
        if !self.min.is_finite() {
            return 0.0;
        }
        if !self.max.is_finite() || self.min >= self.max {
            return self.min;
        }
        if (self.max - self.min).is_finite() {
            return rng.gen_range(self.min..self.max);
        }

        // The width of the range overflows, so interpolate between the ends instead.
        let amount: f32 = rng.gen_range(0.0..1.0);
        self.min
            .mul_add(1.0 - amount, self.max * amount)
            .clamp(self.min, self.max)
    }
}

/// Make sense of a count given as free text, such as the value of a slider. Anything that isn't a
/// number gives [`DEFAULT_PARTICLE_COUNT`].
#[inline]
#[must_use]
pub fn parse_count(text: &str) -> usize {
    text.trim()
        .parse::<f64>()
        .map_or(DEFAULT_PARTICLE_COUNT, count_from_number)
}

/// Keep a count within [`MAX_PARTICLE_COUNT`].
#[inline]
#[must_use]
pub fn clamp_count(count: usize) -> usize {
    if count > MAX_PARTICLE_COUNT {
        tracing::warn!("Particle count {count} is too big, using {MAX_PARTICLE_COUNT}");
        return MAX_PARTICLE_COUNT;
    }
    count
}

/// Negative counts clamp to zero, fractional ones are rounded down and huge ones are capped.
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is checked to be finite and non-negative, and `as` saturates"
)]
fn count_from_number(number: f64) -> usize {
    if !number.is_finite() {
        return DEFAULT_PARTICLE_COUNT;
    }
    clamp_count(number.max(0.0).floor() as usize)
}

/// Deserialise a particle count leniently: numbers and numeric strings are accepted, anything else
/// falls back to the default.
///
/// # Errors
/// Only if the deserializer itself fails, never because of the value.
#[inline]
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    /// Every shape a count might turn up in.
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        /// A whole number.
        Whole(i64),
        /// A number with a fractional part.
        Fractional(f64),
        /// Text, hopefully of a number.
        Text(String),
        /// Anything else at all.
        Other(serde::de::IgnoredAny),
    }

    let raw = <RawCount as serde::Deserialize>::deserialize(deserializer)?;
    let count = match raw {
        RawCount::Whole(whole) => {
            clamp_count(usize::try_from(whole.max(0)).unwrap_or(MAX_PARTICLE_COUNT))
        }
        RawCount::Fractional(fractional) => count_from_number(fractional),
        RawCount::Text(text) => parse_count(&text),
        RawCount::Other(_) => {
            tracing::warn!("Particle count isn't a number, using {DEFAULT_PARTICLE_COUNT}");
            DEFAULT_PARTICLE_COUNT
        }
    };
    Ok(count)
}
