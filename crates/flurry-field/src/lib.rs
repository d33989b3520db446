//! # Flurry Field
//! A particle field simulator for decorative backgrounds.
//!
//! A [`field::Field`] owns a collection of particles, advances them once per animation frame and
//! draws them onto anything that implements [`canvas::Canvas`]. How particles move, fade and look
//! is described by a [`config::Config`], a few of which come ready-made in [`presets`].
//!
//! The host drives the cadence: it asks an [`animator::Animator`] whether a frame is due, steps
//! the field by the elapsed time and renders it. Nothing in here blocks, spawns or locks.
//!
//! ```
//! use flurry_field::{canvas::Recorder, field::Bounds, field::Field, presets::Preset};
//! use rand::SeedableRng as _;
//!
//! let rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut field = Field::new(Preset::Falling.config(), Bounds::new(320.0, 200.0), rng);
//! let mut canvas = Recorder::default();
//! field.step(1.0);
//! field.render(&mut canvas);
//! assert_eq!(field.particles().len(), 90);
//! ```

#![expect(clippy::pub_use, reason = "Re-exporting the vector type that the API is written in")]

pub use glam::Vec2;

pub mod animator;
pub mod canvas;
pub mod colour;
pub mod config;
pub mod errors;
pub mod field;
mod motion;
pub mod particle;
pub mod presets;
mod render;

/// The frame rate that velocities and rates are expressed against. A velocity of `1.0` moves a
/// particle one canvas unit per frame at this rate.
pub const REFERENCE_FRAME_RATE: f32 = 60.0;
