//! The per-frame update rules for a single particle.

use glam::Vec2;

use crate::config::{Motion, Opacity, Spread};
use crate::field::Bounds;
use crate::particle::Particle;

/// Move a particle on by `frames` frames. `time` is the field's animation clock *after* this step.
pub(crate) fn advance<R: rand::RngCore + ?Sized>(
    particle: &mut Particle,
    motion: &Motion,
    bounds: Bounds,
    time: f64,
    frames: f32,
    rng: &mut R,
) {
    match motion {
        Motion::Wrap { scatter } => {
            particle.position += particle.velocity * frames;
            wrap(particle, bounds, *scatter, rng);
        }
        Motion::Bounce => {
            particle.position += particle.velocity * frames;
            bounce(particle, bounds);
        }
        Motion::WaveDrift {
            amplitude,
            frequency,
            drift,
        } => {
            particle.anchor += Vec2::from(*drift) * frames;
            particle.anchor = free_wrap(particle.anchor, bounds);

            let angle = cycle(time, *frequency) + particle.phase;
            let offset = Vec2::new(amplitude * angle.sin(), amplitude * angle.cos());
            particle.position = free_wrap(particle.anchor + offset, bounds);
        }
    }
}

/// Animate a particle's opacity.
pub(crate) fn fade(particle: &mut Particle, opacity: &Opacity, time: f64, frames: f32) {
    let next = match opacity {
        Opacity::Fixed => return,
        Opacity::Ramp { rate } => particle.opacity + rate.max(0.0) * frames,
        Opacity::Pulse {
            base,
            amplitude,
            speed,
        } => base + amplitude * (cycle(time, *speed) + particle.pulse_offset).sin(),
    };

    particle.opacity = if next.is_finite() {
        next.clamp(0.0, 1.0)
    } else {
        0.0
    };
}

/// How far round a cycle turning at `rate` radians per frame has got after `time` frames.
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    reason = "The angle is brought into `0..TAU` before narrowing"
)]
fn cycle(time: f64, rate: f32) -> f32 {
    (time * f64::from(rate)).rem_euclid(std::f64::consts::TAU) as f32
}

/// Bring any coordinate that has left the canvas back in from the opposite edge. A particle that
/// leaves past the far edge restarts exactly at 0, like a snowflake reappearing at the top.
fn wrap<R: rand::RngCore + ?Sized>(
    particle: &mut Particle,
    bounds: Bounds,
    scatter: bool,
    rng: &mut R,
) {
    if let Some(x) = wrap_axis(particle.position.x, bounds.width) {
        particle.position.x = x;
        if scatter {
            particle.position.y = Spread::new(0.0, bounds.height).sample(rng);
        }
    }

    if let Some(y) = wrap_axis(particle.position.y, bounds.height) {
        particle.position.y = y;
        if scatter {
            particle.position.x = Spread::new(0.0, bounds.width).sample(rng);
        }
    }
}

/// Where a coordinate should wrap to, or `None` if it's still inside `0..bound`.
fn wrap_axis(value: f32, bound: f32) -> Option<f32> {
    if (0.0..bound).contains(&value) {
        return None;
    }
    if value >= bound || !value.is_finite() {
        return Some(0.0);
    }
    Some(free_wrap_axis(value, bound))
}

/// Reflect velocity components whose coordinate is outside the canvas.
///
/// The position isn't clamped, so a particle can overshoot an edge by up to one step's worth of
/// velocity before it comes back. A component only flips whilst it points further outside, so a
/// particle that overshoots by more than one step can't get stuck flipping back and forth.
fn bounce(particle: &mut Particle, bounds: Bounds) {
    let Vec2 { x, y } = particle.position;

    let is_outside_left = x < 0.0 && particle.velocity.x < 0.0;
    let is_outside_right = x > bounds.width && particle.velocity.x > 0.0;
    if is_outside_left || is_outside_right {
        particle.velocity.x = -particle.velocity.x;
    }

    let is_outside_top = y < 0.0 && particle.velocity.y < 0.0;
    let is_outside_bottom = y > bounds.height && particle.velocity.y > 0.0;
    if is_outside_top || is_outside_bottom {
        particle.velocity.y = -particle.velocity.y;
    }
}

/// Wrap a point onto the canvas, toroidally.
fn free_wrap(point: Vec2, bounds: Bounds) -> Vec2 {
    Vec2::new(
        free_wrap_axis(point.x, bounds.width),
        free_wrap_axis(point.y, bounds.height),
    )
}

/// Euclidean remainder that is guaranteed to land in `0..bound`.
fn free_wrap_axis(value: f32, bound: f32) -> f32 {
    if !value.is_finite() || bound <= 0.0 {
        return 0.0;
    }

    // For tiny negative values the remainder can round up to `bound` itself.
    let wrapped = value.rem_euclid(bound);
    if wrapped < bound {
        wrapped
    } else {
        0.0
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng as _;

    use super::*;

    fn particle(position: (f32, f32), velocity: (f32, f32)) -> Particle {
        Particle {
            position: position.into(),
            anchor: position.into(),
            velocity: velocity.into(),
            size: 1.0,
            colour: crate::colour::WHITE,
            opacity: 1.0,
            phase: 0.0,
            pulse_offset: 0.0,
        }
    }

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(3)
    }

    const BOUNDS: Bounds = Bounds::new(100.0, 50.0);

    #[test]
    fn wrap_past_far_edge_restarts_at_zero() {
        let mut dot = particle((99.5, 10.0), (1.0, 0.0));
        advance(&mut dot, &Motion::Wrap { scatter: false }, BOUNDS, 1.0, 1.0, &mut rng());
        assert_eq!(dot.position, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn wrap_past_near_edge_comes_in_from_far_edge() {
        let mut dot = particle((0.5, 10.0), (-1.0, 0.0));
        advance(&mut dot, &Motion::Wrap { scatter: false }, BOUNDS, 1.0, 1.0, &mut rng());
        assert!((dot.position.x - 99.5).abs() < 0.001);
    }

    #[test]
    fn wrap_with_scatter_moves_the_other_axis() {
        let mut dot = particle((10.0, 49.9), (0.0, 0.5));
        advance(&mut dot, &Motion::Wrap { scatter: true }, BOUNDS, 1.0, 1.0, &mut rng());
        assert!(dot.position.y.abs() < f32::EPSILON);
        assert!((0.0..100.0).contains(&dot.position.x));
    }

    #[test]
    fn tiny_negative_coordinates_stay_inside() {
        let wrapped = free_wrap_axis(-1e-9, 100.0);
        assert!((0.0..100.0).contains(&wrapped));
    }

    #[test]
    fn bounce_flips_velocity_without_clamping() {
        let mut dot = particle((99.5, 10.0), (2.0, 0.0));
        advance(&mut dot, &Motion::Bounce, BOUNDS, 1.0, 1.0, &mut rng());
        assert!((dot.position.x - 101.5).abs() < 0.001);
        assert!((dot.velocity.x + 2.0).abs() < f32::EPSILON);

        advance(&mut dot, &Motion::Bounce, BOUNDS, 2.0, 1.0, &mut rng());
        assert!((dot.position.x - 99.5).abs() < 0.001);
        assert!((dot.velocity.x + 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn bounce_does_not_stick_when_far_outside() {
        let mut dot = particle((150.0, 10.0), (-1.0, 0.0));
        advance(&mut dot, &Motion::Bounce, BOUNDS, 1.0, 1.0, &mut rng());
        assert!((dot.velocity.x + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn wave_drift_circles_the_anchor() {
        let motion = Motion::WaveDrift {
            amplitude: 10.0,
            frequency: 1.0,
            drift: (0.0, 0.0),
        };
        let mut dot = particle((50.0, 25.0), (0.0, 0.0));
        advance(&mut dot, &motion, BOUNDS, 0.0, 0.0, &mut rng());
        assert!((dot.position.x - 50.0).abs() < 0.001);
        assert!((dot.position.y - 35.0).abs() < 0.001);

        advance(&mut dot, &motion, BOUNDS, std::f64::consts::FRAC_PI_2, 1.0, &mut rng());
        assert!((dot.position.x - 60.0).abs() < 0.001);
        assert!((dot.position.y - 25.0).abs() < 0.001);
    }

    #[test]
    fn wave_drift_anchor_free_wraps() {
        let motion = Motion::WaveDrift {
            amplitude: 0.0,
            frequency: 1.0,
            drift: (3.0, 0.0),
        };
        let mut dot = particle((99.0, 25.0), (0.0, 0.0));
        advance(&mut dot, &motion, BOUNDS, 1.0, 1.0, &mut rng());
        assert!((dot.anchor.x - 2.0).abs() < 0.001);
        assert!((dot.position.x - 2.0).abs() < 0.001);
    }

    #[test]
    fn ramp_is_clamped_to_one() {
        let mut dot = particle((0.0, 0.0), (0.0, 0.0));
        dot.opacity = 0.95;
        fade(&mut dot, &Opacity::Ramp { rate: 0.01 }, 1.0, 1.0);
        assert!((dot.opacity - 0.96).abs() < 0.0001);
        fade(&mut dot, &Opacity::Ramp { rate: 0.01 }, 2.0, 10.0);
        assert!((dot.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn pulse_follows_a_sine() {
        let mut dot = particle((0.0, 0.0), (0.0, 0.0));
        let pulse = Opacity::Pulse {
            base: 0.5,
            amplitude: 0.25,
            speed: 1.0,
        };
        fade(&mut dot, &pulse, std::f64::consts::FRAC_PI_2, 1.0);
        assert!((dot.opacity - 0.75).abs() < 0.0001);
    }

    #[test]
    fn pulse_keeps_moving_on_a_late_clock() {
        let pulse = Opacity::Pulse {
            base: 0.5,
            amplitude: 0.5,
            speed: 1.0,
        };
        let late = 16_777_216.0 * std::f64::consts::TAU;
        let mut dot = particle((0.0, 0.0), (0.0, 0.0));
        fade(&mut dot, &pulse, late, 1.0);
        assert!((dot.opacity - 0.5).abs() < 0.001);
        fade(&mut dot, &pulse, late + std::f64::consts::FRAC_PI_2, 1.0);
        assert!((dot.opacity - 1.0).abs() < 0.001);
    }

    #[test]
    fn pulse_is_clamped() {
        let mut dot = particle((0.0, 0.0), (0.0, 0.0));
        let pulse = Opacity::Pulse {
            base: 0.9,
            amplitude: 0.5,
            speed: 1.0,
        };
        fade(&mut dot, &pulse, std::f64::consts::FRAC_PI_2, 1.0);
        assert!((dot.opacity - 1.0).abs() < f32::EPSILON);
    }
}
