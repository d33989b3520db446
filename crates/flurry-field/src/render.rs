//! Turning particles into draw calls.

use glam::Vec2;

use crate::canvas::{Canvas, Shadow};
use crate::colour::{self, WHITE};
use crate::config::{Config, Connectors, Style, Trail};
use crate::field::Bounds;
use crate::particle::Particle;

/// The highlight disc's radius, relative to its particle.
const HIGHLIGHT_SCALE: f32 = 0.4;

/// How far towards the top-left the highlight sits, relative to the particle's radius.
const HIGHLIGHT_OFFSET: f32 = 0.3;

/// How opaque the highlight is, relative to its particle.
const HIGHLIGHT_OPACITY: f32 = 0.6;

/// Draw a whole frame.
pub(crate) fn render(
    config: &Config,
    bounds: Bounds,
    particles: &[Particle],
    canvas: &mut impl Canvas,
) {
    canvas.set_global_alpha(1.0);
    canvas.set_shadow(None);

    match &config.trail {
        Trail::Clear => canvas.clear(),
        Trail::Fade { colour, alpha } => canvas.fill_rect(
            Vec2::ZERO,
            Vec2::new(bounds.width, bounds.height),
            colour::with_alpha(*colour, alpha.clamp(0.0, 1.0)),
        ),
    }

    if let Some(connectors) = &config.connectors {
        draw_connectors(connectors, particles, canvas);
    }

    for particle in particles {
        draw_particle(&config.style, particle, canvas);
    }

    canvas.set_global_alpha(1.0);
    canvas.set_shadow(None);
}

/// Link every pair of particles that are closer than the threshold.
///
/// This compares every particle with every other one, which is fine for the few hundred
/// particles a decorative field has, but no more.
fn draw_connectors(connectors: &Connectors, particles: &[Particle], canvas: &mut impl Canvas) {
    for (index, particle) in particles.iter().enumerate() {
        for other in particles.iter().skip(index + 1) {
            let distance = particle.position.distance(other.position);
            if distance >= connectors.threshold {
                continue;
            }

            let opacity = connectors.opacity_at(distance);
            if opacity <= 0.0 {
                continue;
            }

            canvas.stroke_line(
                particle.position,
                other.position,
                connectors.width,
                colour::with_alpha(connectors.colour, opacity),
            );
        }
    }
}

/// Draw a single particle, in whatever style the field uses.
fn draw_particle(style: &Style, particle: &Particle, canvas: &mut impl Canvas) {
    canvas.set_global_alpha(particle.opacity);

    match style {
        Style::Flat { .. } | Style::RandomHue { .. } => {
            canvas.fill_circle(particle.position, particle.size, particle.colour);
        }
        Style::Glow {
            blur, highlight, ..
        } => {
            canvas.set_shadow(Some(Shadow {
                blur: *blur,
                colour: particle.colour,
            }));
            canvas.fill_circle(particle.position, particle.size, particle.colour);
            canvas.set_shadow(None);

            if *highlight {
                let offset = Vec2::splat(particle.size * HIGHLIGHT_OFFSET);
                canvas.fill_circle(
                    particle.position - offset,
                    particle.size * HIGHLIGHT_SCALE,
                    colour::with_alpha(WHITE, HIGHLIGHT_OPACITY),
                );
            }
        }
    }
}

#[cfg(test)]
#[expect(clippy::indexing_slicing, reason = "Tests aren't so strict")]
mod test {
    use super::*;
    use crate::canvas::{DrawCommand, Recorder};

    fn particle(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            anchor: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size: 2.0,
            colour: colour::CYAN,
            opacity: 0.5,
            phase: 0.0,
            pulse_offset: 0.0,
        }
    }

    fn record(config: &Config, particles: &[Particle]) -> Recorder {
        let mut canvas = Recorder::default();
        render(config, Bounds::new(200.0, 200.0), particles, &mut canvas);
        canvas
    }

    fn with_connectors() -> Config {
        Config {
            connectors: Some(Connectors {
                threshold: 100.0,
                max_opacity: 0.8,
                ..Connectors::default()
            }),
            ..Config::default()
        }
    }

    #[test]
    fn clear_comes_first() {
        let canvas = record(&Config::default(), &[particle(1.0, 1.0)]);
        assert_eq!(canvas.commands[2], DrawCommand::Clear);
        assert_eq!(canvas.circles().len(), 1);
    }

    #[test]
    fn trails_fade_instead_of_clearing() {
        let config = Config {
            trail: Trail::Fade {
                colour: colour::BLACK,
                alpha: 0.1,
            },
            ..Config::default()
        };
        let canvas = record(&config, &[]);
        assert!(!canvas.commands.contains(&DrawCommand::Clear));
        assert!(canvas.commands.contains(&DrawCommand::FillRect {
            origin: Vec2::ZERO,
            size: Vec2::new(200.0, 200.0),
            colour: (0.0, 0.0, 0.0, 0.1),
        }));
    }

    #[test]
    fn discs_use_particle_opacity() {
        let canvas = record(&Config::default(), &[particle(1.0, 1.0)]);
        let alpha_index = canvas
            .commands
            .iter()
            .position(|command| *command == DrawCommand::GlobalAlpha(0.5))
            .unwrap();
        assert!(matches!(
            canvas.commands[alpha_index + 1],
            DrawCommand::FillCircle { radius, .. } if (radius - 2.0).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn connectors_only_between_close_particles() {
        let particles = [particle(0.0, 0.0), particle(50.0, 0.0), particle(190.0, 0.0)];
        let canvas = record(&with_connectors(), &particles);
        let lines = canvas.lines();
        assert_eq!(lines.len(), 1);
        let DrawCommand::StrokeLine { colour, .. } = lines[0] else {
            panic!("Not a line");
        };
        assert!((colour.3 - 0.4).abs() < 0.0001);
    }

    #[test]
    fn no_connector_at_exactly_the_threshold() {
        let particles = [particle(0.0, 0.0), particle(100.0, 0.0)];
        let canvas = record(&with_connectors(), &particles);
        assert!(canvas.lines().is_empty());
    }

    #[test]
    fn connectors_are_drawn_under_particles() {
        let particles = [particle(0.0, 0.0), particle(10.0, 0.0)];
        let canvas = record(&with_connectors(), &particles);
        let first_line = canvas
            .commands
            .iter()
            .position(|command| matches!(command, DrawCommand::StrokeLine { .. }))
            .unwrap();
        let first_circle = canvas
            .commands
            .iter()
            .position(|command| matches!(command, DrawCommand::FillCircle { .. }))
            .unwrap();
        assert!(first_line < first_circle);
    }

    #[test]
    fn glow_with_highlight() {
        let config = Config {
            style: Style::Glow {
                colours: vec![colour::CYAN],
                blur: 5.0,
                highlight: true,
            },
            ..Config::default()
        };
        let canvas = record(&config, &[particle(10.0, 10.0)]);
        assert!(canvas.commands.contains(&DrawCommand::Shadow(Some(Shadow {
            blur: 5.0,
            colour: colour::CYAN,
        }))));

        let circles = canvas.circles();
        assert_eq!(circles.len(), 2);
        let DrawCommand::FillCircle { centre, radius, .. } = circles[1] else {
            panic!("Not a circle");
        };
        assert!((*centre - Vec2::new(9.4, 9.4)).length() < 0.0001);
        assert!((radius - 0.8).abs() < 0.0001);
    }

    #[test]
    fn canvas_state_is_reset_afterwards() {
        let canvas = record(&Config::default(), &[particle(1.0, 1.0)]);
        let length = canvas.commands.len();
        assert_eq!(canvas.commands[length - 2], DrawCommand::GlobalAlpha(1.0));
        assert_eq!(canvas.commands[length - 1], DrawCommand::Shadow(None));
    }
}
