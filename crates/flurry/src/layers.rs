//! A stack of particle fields, each drawn into its own buffer and then composited in order.

use std::time::Instant;

use rand::SeedableRng as _;

use flurry_field::animator::Animator;
use flurry_field::canvas::Canvas as _;
use flurry_field::field::Field;

use crate::config::input::KeybindingAction;
use crate::config::main::LayerConfig;
use crate::pixels::PixelBuffer;

/// How many particles the more/fewer keybindings add or remove.
const COUNT_STEP: usize = 10;

/// A single field and everything it needs to be drawn.
struct Layer {
    /// For logging
    name: String,
    /// The simulation
    field: Field,
    /// When the field next gets a frame
    animator: Animator,
    /// What the field draws on
    buffer: PixelBuffer,
}

impl Layer {
    /// Pause or resume the layer. A paused layer shows nothing.
    fn set_enabled(&mut self, is_enabled: bool) {
        self.field.set_enabled(is_enabled);
        if is_enabled {
            self.animator.request_frame();
        } else {
            self.animator.cancel();
            self.buffer.clear();
        }
    }
}

/// All the running fields.
pub(crate) struct Layers {
    /// Bottom-most first
    layers: Vec<Layer>,
    /// Canvas units per pixel
    scale: f32,
    /// Seed for repeatable randomness
    seed: Option<u64>,
    /// Width in pixels
    width: usize,
    /// Height in pixels
    height: usize,
}

impl Layers {
    /// Build a layer for every config, sized to the given pixel dimensions.
    pub fn new(
        configs: &[LayerConfig],
        scale: f32,
        seed: Option<u64>,
        width: usize,
        height: usize,
    ) -> Self {
        let mut layers = Self {
            layers: Vec::new(),
            scale,
            seed,
            width,
            height,
        };
        layers.rebuild(configs);
        layers
    }

    /// Throw away every field and start again from new configs.
    pub fn reconfigure(&mut self, configs: &[LayerConfig], scale: f32) {
        self.scale = scale;
        self.rebuild(configs);
    }

    /// Make all the layers from scratch.
    fn rebuild(&mut self, configs: &[LayerConfig]) {
        self.layers = configs
            .iter()
            .zip(0u64..)
            .map(|(config, index)| self.make_layer(config, index))
            .collect();
        tracing::debug!(
            "Running layers: {:?}",
            self.layers
                .iter()
                .map(|layer| layer.name.as_str())
                .collect::<Vec<_>>()
        );
    }

    /// Make a single layer.
    fn make_layer(&self, config: &LayerConfig, index: u64) -> Layer {
        let buffer = PixelBuffer::new(self.width, self.height, self.scale);
        let field_config = config.field_config();
        let field = match self.seed {
            Some(seed) => Field::new(
                field_config,
                buffer.bounds(),
                rand::rngs::StdRng::seed_from_u64(seed.wrapping_add(index)),
            ),
            None => Field::with_entropy(field_config, buffer.bounds()),
        };

        let mut layer = Layer {
            name: config.name(),
            field,
            animator: Animator::default(),
            buffer,
        };
        layer.set_enabled(config.enabled);
        layer
    }

    /// The user's terminal has changed size.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        for layer in &mut self.layers {
            layer.buffer.resize(width, height);
            layer.field.resize(layer.buffer.bounds());
        }
    }

    /// Advance and draw every layer that has a frame due. Returns whether anything was drawn.
    pub fn frame(&mut self, now: Instant) -> bool {
        let mut is_drawn = false;
        for layer in &mut self.layers {
            is_drawn |= layer
                .animator
                .run_frame(now, &mut layer.field, &mut layer.buffer);
        }
        is_drawn
    }

    /// Flatten all the layers into a single buffer.
    pub fn composite(&self) -> PixelBuffer {
        let mut output = PixelBuffer::new(self.width, self.height, self.scale);
        for layer in &self.layers {
            output.composite(&layer.buffer);
        }
        output
    }

    /// The number of particles across all the running layers.
    pub fn particle_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|layer| layer.field.is_enabled())
            .map(|layer| layer.field.particles().len())
            .sum()
    }

    /// Respond to a keybinding. Returns `false` when the user wants to quit.
    pub fn handle_action(&mut self, action: KeybindingAction) -> bool {
        tracing::debug!("Handling keybinding action: {action:?}");
        match action {
            KeybindingAction::ToggleEnabled => {
                let is_any_enabled = self.layers.iter().any(|layer| layer.field.is_enabled());
                for layer in &mut self.layers {
                    layer.set_enabled(!is_any_enabled);
                }
            }
            KeybindingAction::Reinitialise => {
                for layer in &mut self.layers {
                    layer.field.reinitialise();
                }
            }
            KeybindingAction::MoreParticles => {
                for layer in &mut self.layers {
                    let count = layer.field.config().count.saturating_add(COUNT_STEP);
                    layer.field.set_count(count);
                }
            }
            KeybindingAction::FewerParticles => {
                for layer in &mut self.layers {
                    let count = layer.field.config().count.saturating_sub(COUNT_STEP);
                    layer.field.set_count(count);
                }
            }
            KeybindingAction::Quit => return false,
        }
        true
    }
}
