//! Ready-made field configs.

use snafu::OptionExt as _;

use crate::colour::{BLACK, CYAN, MAGENTA, WHITE};
use crate::config::{Config, Connectors, Motion, Opacity, Spread, Style, Trail};
use crate::errors::{FieldError, UnknownPresetSnafu};

/// The bundled field configs.
#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Preset {
    /// Faint white flakes drifting down the screen.
    Falling,
    /// Neon particles bouncing around, linked by glowing lines, leaving trails.
    Network,
    /// Softly pulsing, multicoloured particles circling as they drift.
    Preview,
}

impl Preset {
    /// Every preset.
    pub const ALL: [Self; 3] = [Self::Falling, Self::Network, Self::Preview];

    /// The name used in config files and on the command line.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Falling => "falling",
            Self::Network => "network",
            Self::Preview => "preview",
        }
    }

    /// The full config for the preset.
    #[inline]
    #[must_use]
    pub fn config(self) -> Config {
        match self {
            Self::Falling => falling(),
            Self::Network => network(),
            Self::Preview => preview(),
        }
    }
}

impl core::fmt::Display for Preset {
    #[inline]
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter.write_str(self.name())
    }
}

impl core::str::FromStr for Preset {
    type Err = FieldError;

    #[inline]
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(trimmed))
            .context(UnknownPresetSnafu {
                name: trimmed,
                expected: Self::ALL.map(Self::name).join(", "),
            })
    }
}

/// Faint snow. Flakes fall straight down and restart at the top in a new column.
fn falling() -> Config {
    Config {
        count: 90,
        motion: Motion::Wrap { scatter: true },
        opacity: Opacity::Fixed,
        style: Style::Flat {
            colours: vec![WHITE],
        },
        connectors: None,
        trail: Trail::Clear,
        size: Spread::new(1.0, 3.0),
        velocity_x: Spread::fixed(0.0),
        velocity_y: Spread::new(0.3, 0.9),
        initial_opacity: Spread::fixed(0.15),
        reinitialise_on_resize: true,
        reset_on_enable: false,
    }
}

/// A glowing cyberpunk network. Particles fade in, bounce off the edges and link up.
fn network() -> Config {
    Config {
        count: 80,
        motion: Motion::Bounce,
        opacity: Opacity::Ramp { rate: 0.01 },
        style: Style::Glow {
            colours: vec![CYAN, MAGENTA],
            blur: 8.0,
            highlight: true,
        },
        connectors: Some(Connectors {
            threshold: crate::config::DEFAULT_CONNECTOR_THRESHOLD,
            max_opacity: 0.5,
            colour: CYAN,
            width: 1.0,
        }),
        trail: Trail::Fade {
            colour: BLACK,
            alpha: 0.25,
        },
        size: Spread::new(1.0, 2.5),
        velocity_x: Spread::new(-0.5, 0.5),
        velocity_y: Spread::new(-0.5, 0.5),
        initial_opacity: Spread::fixed(0.0),
        reinitialise_on_resize: true,
        reset_on_enable: false,
    }
}

/// The preview widget: colourful particles breathing in and out as they wander in circles.
fn preview() -> Config {
    Config {
        count: crate::config::DEFAULT_PARTICLE_COUNT,
        motion: Motion::WaveDrift {
            amplitude: 15.0,
            frequency: 0.02,
            drift: (0.2, -0.1),
        },
        opacity: Opacity::Pulse {
            base: 0.6,
            amplitude: 0.3,
            speed: 0.05,
        },
        style: Style::RandomHue {
            saturation: 0.8,
            lightness: 0.6,
        },
        connectors: None,
        trail: Trail::Clear,
        size: Spread::new(1.5, 4.0),
        velocity_x: Spread::fixed(0.0),
        velocity_y: Spread::fixed(0.0),
        initial_opacity: Spread::fixed(0.6),
        reinitialise_on_resize: true,
        reset_on_enable: true,
    }
}
