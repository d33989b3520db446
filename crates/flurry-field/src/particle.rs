//! A single particle: plain data, plus the function that dreams up a new random one.

use glam::Vec2;
use rand::Rng as _;

use crate::colour::{self, Colour, WHITE};
use crate::config::{Config, Spread, Style};
use crate::field::Bounds;

/// One animated point.
#[expect(
    clippy::exhaustive_structs,
    reason = "Particles are plain records that hosts are free to build and inspect"
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Where the particle currently is, in canvas units.
    pub position: Vec2,
    /// The centre that wave-drift motion circles around. Unused by the other motions.
    pub anchor: Vec2,
    /// Canvas units per frame.
    pub velocity: Vec2,
    /// Radius, in canvas units.
    pub size: f32,
    /// The particle's colour, before opacity is applied.
    pub colour: Colour,
    /// `0.0..=1.0`
    pub opacity: f32,
    /// Offset into the wave-drift cycle, in radians.
    pub phase: f32,
    /// Offset into the opacity pulse cycle, in radians.
    pub pulse_offset: f32,
}

impl Particle {
    /// Make a new particle with every attribute randomly picked from the ranges in `config`,
    /// positioned somewhere inside `bounds`.
    #[inline]
    #[must_use]
    pub fn randomise<R: rand::RngCore + ?Sized>(
        config: &Config,
        bounds: Bounds,
        rng: &mut R,
    ) -> Self {
        let position = Vec2::new(
            Spread::new(0.0, bounds.width).sample(rng),
            Spread::new(0.0, bounds.height).sample(rng),
        );

        Self {
            position,
            anchor: position,
            velocity: Vec2::new(config.velocity_x.sample(rng), config.velocity_y.sample(rng)),
            size: config.size.sample(rng).max(f32::EPSILON),
            colour: pick_colour(&config.style, rng),
            opacity: config.initial_opacity.sample(rng).clamp(0.0, 1.0),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            pulse_offset: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }
}

/// Choose a colour for a new particle.
fn pick_colour<R: rand::RngCore + ?Sized>(style: &Style, rng: &mut R) -> Colour {
    match style {
        Style::Flat { colours } | Style::Glow { colours, .. } => {
            if colours.is_empty() {
                return WHITE;
            }
            let index = rng.gen_range(0..colours.len());
            colours.get(index).copied().unwrap_or(WHITE)
        }
        Style::RandomHue {
            saturation,
            lightness,
        } => colour::from_hue(rng.gen_range(0.0..360.0), *saturation, *lightness),
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng as _;

    use super::*;

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(42)
    }

    #[test]
    fn randomised_within_ranges() {
        let config = Config {
            size: Spread::new(1.0, 3.0),
            velocity_x: Spread::fixed(0.0),
            velocity_y: Spread::new(0.3, 0.9),
            initial_opacity: Spread::new(0.2, 0.4),
            ..Config::default()
        };
        let bounds = Bounds::new(100.0, 50.0);
        let mut rng = rng();

        for _ in 0..200 {
            let particle = Particle::randomise(&config, bounds, &mut rng);
            assert!((0.0..100.0).contains(&particle.position.x));
            assert!((0.0..50.0).contains(&particle.position.y));
            assert_eq!(particle.anchor, particle.position);
            assert!((1.0..3.0).contains(&particle.size));
            assert!(particle.velocity.x.abs() < f32::EPSILON);
            assert!((0.3..0.9).contains(&particle.velocity.y));
            assert!((0.2..0.4).contains(&particle.opacity));
        }
    }

    #[test]
    fn same_seed_same_particle() {
        let config = Config::default();
        let bounds = Bounds::new(10.0, 10.0);
        let first = Particle::randomise(&config, bounds, &mut rng());
        let second = Particle::randomise(&config, bounds, &mut rng());
        assert_eq!(first, second);
    }

    #[test]
    fn colours_come_from_the_style() {
        let cyan = crate::colour::CYAN;
        let magenta = crate::colour::MAGENTA;
        let config = Config {
            style: Style::Glow {
                colours: vec![cyan, magenta],
                blur: 4.0,
                highlight: false,
            },
            ..Config::default()
        };
        let mut rng = rng();
        for _ in 0..50 {
            let particle = Particle::randomise(&config, Bounds::new(10.0, 10.0), &mut rng);
            assert!(particle.colour == cyan || particle.colour == magenta);
        }
    }

    #[test]
    fn no_colours_means_white() {
        let config = Config {
            style: Style::Flat { colours: vec![] },
            ..Config::default()
        };
        let particle = Particle::randomise(&config, Bounds::new(10.0, 10.0), &mut rng());
        assert_eq!(particle.colour, WHITE);
    }

    #[test]
    fn zero_sized_bounds_put_particles_at_the_origin() {
        let particle = Particle::randomise(&Config::default(), Bounds::new(0.0, 0.0), &mut rng());
        assert_eq!(particle.position, Vec2::ZERO);
    }
}
