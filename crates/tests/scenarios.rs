//! Whole-field scenarios, driven the way a host would drive them.
#[cfg(test)]
mod scenarios {
    use flurry_field::animator::Animator;
    use flurry_field::canvas::{DrawCommand, Recorder};
    use flurry_field::config::{Config, Connectors, Motion, Opacity, Trail};
    use flurry_field::field::{Bounds, Field};
    use flurry_field::presets::Preset;
    use glam::Vec2;
    use rand::SeedableRng as _;

    fn seeded(seed: u64) -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(seed)
    }

    fn wrap_config() -> Config {
        Config {
            motion: Motion::Wrap { scatter: false },
            velocity_x: flurry_field::config::Spread::new(-7.0, 7.0),
            velocity_y: flurry_field::config::Spread::new(-7.0, 7.0),
            ..Config::default()
        }
    }

    #[test]
    fn small_wrapping_field_runs_for_a_long_time() {
        let mut field = Field::initialise(3, Bounds::new(100.0, 100.0), wrap_config(), seeded(1));
        let mut canvas = Recorder::default();
        for _ in 0..1000 {
            field.frame(1.0, &mut canvas);
        }

        assert_eq!(field.particles().len(), 3);
        for particle in field.particles() {
            assert!(particle.position.is_finite());
            assert!(particle.velocity.is_finite());
            assert!((0.0..100.0).contains(&particle.position.x));
            assert!((0.0..100.0).contains(&particle.position.y));
        }
    }

    #[test]
    fn wrapping_with_uneven_frame_lengths() {
        let bounds = Bounds::new(37.0, 11.0);
        let mut field = Field::new(wrap_config(), bounds, seeded(2));
        for step in 0..500_u16 {
            field.step(f32::from(step % 7) * 0.75);
            for particle in field.particles() {
                assert!((0.0..bounds.width).contains(&particle.position.x));
                assert!((0.0..bounds.height).contains(&particle.position.y));
            }
        }
    }

    #[test]
    fn bouncing_conserves_speed() {
        let config = Config {
            motion: Motion::Bounce,
            velocity_x: flurry_field::config::Spread::new(1.0, 4.0),
            velocity_y: flurry_field::config::Spread::new(-4.0, -1.0),
            ..Config::default()
        };
        let mut field = Field::new(config, Bounds::new(30.0, 20.0), seeded(3));
        let speeds: Vec<f32> = field
            .particles()
            .iter()
            .map(|particle| particle.velocity.length())
            .collect();

        for _ in 0..400 {
            field.step(1.0);
        }

        for (particle, speed) in field.particles().iter().zip(speeds) {
            assert!((particle.velocity.length() - speed).abs() < 0.0001);
        }
    }

    #[test]
    fn bouncing_particles_stay_near_the_canvas() {
        let config = Config {
            motion: Motion::Bounce,
            ..Config::default()
        };
        let mut field = Field::new(config, Bounds::new(50.0, 50.0), seeded(4));
        for _ in 0..2000 {
            field.step(1.0);
            for particle in field.particles() {
                let speed = particle.velocity.abs();
                assert!(particle.position.x > -speed.x - 0.001);
                assert!(particle.position.x < 50.0 + speed.x + 0.001);
                assert!(particle.position.y > -speed.y - 0.001);
                assert!(particle.position.y < 50.0 + speed.y + 0.001);
            }
        }
    }

    #[test]
    fn pulsing_opacity_stays_in_range() {
        let config = Config {
            opacity: Opacity::Pulse {
                base: 0.9,
                amplitude: 0.5,
                speed: 0.3,
            },
            ..Config::default()
        };
        let mut field = Field::new(config, Bounds::new(80.0, 80.0), seeded(5));
        for _ in 0..300 {
            field.step(1.0);
            for particle in field.particles() {
                assert!((0.0..=1.0).contains(&particle.opacity));
            }
        }
    }

    #[test]
    fn resizing_to_the_same_size_changes_nothing() {
        let bounds = Bounds::new(120.0, 90.0);
        let mut field = Field::new(Preset::Network.config(), bounds, seeded(6));
        field.step(3.0);
        let before = field.particles().to_vec();

        field.resize(bounds);
        assert_eq!(field.particles(), before.as_slice());
    }

    #[test]
    fn disabled_field_is_frozen_and_silent() {
        let mut field = Field::new(Preset::Preview.config(), Bounds::new(200.0, 100.0), seeded(7));
        field.set_enabled(false);
        let before = field.particles().to_vec();

        let mut canvas = Recorder::default();
        for _ in 0..50 {
            field.frame(1.0, &mut canvas);
        }

        assert_eq!(field.particles(), before.as_slice());
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn connectors_depend_on_distance() {
        let config = Config {
            connectors: Some(Connectors::default()),
            ..Config::default()
        };
        let connectors = config.connectors.clone().unwrap_or_default();
        assert!((connectors.opacity_at(0.0) - connectors.max_opacity).abs() < f32::EPSILON);
        assert!(connectors.opacity_at(connectors.threshold).abs() < f32::EPSILON);
        assert!(connectors.opacity_at(connectors.threshold + 1.0).abs() < f32::EPSILON);

        let field = Field::initialise(20, Bounds::new(1000.0, 1000.0), config, seeded(8));
        let mut canvas = Recorder::default();
        field.render(&mut canvas);

        let particles = field.particles();
        let mut close_pairs = 0;
        for (index, particle) in particles.iter().enumerate() {
            for other in particles.iter().skip(index + 1) {
                if particle.position.distance(other.position) < connectors.threshold {
                    close_pairs += 1;
                }
            }
        }
        assert_eq!(canvas.lines().len(), close_pairs);
    }

    #[test]
    fn fading_trails_never_clear() {
        let mut field = Field::new(Preset::Network.config(), Bounds::new(300.0, 200.0), seeded(9));
        let mut canvas = Recorder::default();
        for _ in 0..10 {
            field.frame(1.0, &mut canvas);
        }
        assert!(!canvas.commands.contains(&DrawCommand::Clear));
        assert!(matches!(field.config().trail, Trail::Fade { .. }));
    }

    #[test]
    fn separate_fields_dont_interfere() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut first = Field::new(Preset::Falling.config(), bounds, seeded(10));
        let mut second = Field::new(Preset::Falling.config(), bounds, seeded(10));

        for _ in 0..20 {
            first.step(1.0);
        }
        second.set_count(5);
        for _ in 0..20 {
            second.step(1.0);
        }

        assert_eq!(first.particles().len(), 90);
        assert_eq!(second.particles().len(), 5);
    }

    #[test]
    fn animator_drives_a_field() {
        let start = std::time::Instant::now();
        let mut field = Field::new(Preset::Falling.config(), Bounds::new(100.0, 100.0), seeded(11));
        let mut animator = Animator::started();
        let mut canvas = Recorder::default();

        for frame in 0..10 {
            let now = start + std::time::Duration::from_millis(frame * 16);
            assert!(animator.run_frame(now, &mut field, &mut canvas));
        }
        assert!(field.time() > 9.0);

        animator.cancel();
        let time = field.time();
        assert!(!animator.run_frame(
            start + std::time::Duration::from_secs(1),
            &mut field,
            &mut canvas
        ));
        assert!((field.time() - time).abs() < f64::EPSILON);
    }

    #[test]
    fn fields_load_from_toml() {
        let config: Config = toml::from_str(indoc::indoc! {r#"
            count = "-4"
            motion = { kind = "wave_drift", amplitude = 3.0, frequency = 0.1 }
            opacity = { kind = "ramp", rate = 0.5 }
        "#})
        .unwrap();
        let field = Field::new(config, Bounds::new(10.0, 10.0), seeded(12));
        assert!(field.particles().is_empty());

        let fallback: Config = toml::from_str("count = \"lots\"").unwrap();
        assert_eq!(fallback.count, flurry_field::config::DEFAULT_PARTICLE_COUNT);
    }

    #[test]
    fn extreme_numbers_in_toml_still_make_a_field() {
        let config: Config = toml::from_str(indoc::indoc! {r#"
            count = 1e18
            velocity_x = { min = -3e38, max = 3e38 }
            size = { min = -3e38, max = 3e38 }
        "#})
        .unwrap();
        let mut field = Field::new(config, Bounds::new(10.0, 10.0), seeded(14));
        assert_eq!(
            field.particles().len(),
            flurry_field::config::MAX_PARTICLE_COUNT
        );

        field.step(1.0);
        for particle in field.particles() {
            assert!(particle.velocity.is_finite());
            assert!((0.0..10.0).contains(&particle.position.y));
        }
    }

    #[test]
    fn missing_surface_does_nothing_until_it_appears() {
        let mut field = Field::new(Preset::Falling.config(), Bounds::default(), seeded(13));
        let mut canvas = Recorder::default();
        field.frame(1.0, &mut canvas);
        assert!(canvas.commands.is_empty());

        field.resize(Bounds::new(64.0, 48.0));
        field.frame(1.0, &mut canvas);
        assert!(!canvas.commands.is_empty());
        assert!(field
            .particles()
            .iter()
            .all(|particle| particle.position.cmplt(Vec2::new(64.0, 48.0)).all()));
    }
}
