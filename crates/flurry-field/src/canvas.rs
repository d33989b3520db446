//! The drawing surface that fields render onto.
//!
//! It's modelled on an immediate-mode 2D context: commands apply in the order they're issued, and
//! global alpha and shadow settings stick until they're changed.

use glam::Vec2;

use crate::colour::Colour;

/// A glow drawn around filled shapes.
#[expect(
    clippy::exhaustive_structs,
    reason = "A shadow is just a colour and a size"
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// How far the glow reaches beyond the edge of the shape, in canvas units.
    pub blur: f32,
    /// The colour of the glow.
    pub colour: Colour,
}

/// Anything that particles can be drawn on.
pub trait Canvas {
    /// Wipe the whole canvas.
    fn clear(&mut self);

    /// Paint a rectangle. Used with a translucent colour over the whole canvas to leave trails.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, colour: Colour);

    /// Paint a disc.
    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Colour);

    /// Paint a straight line.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, colour: Colour);

    /// Multiply the alpha of everything drawn from now on.
    fn set_global_alpha(&mut self, alpha: f32);

    /// Glow around everything filled from now on, or stop glowing with `None`.
    fn set_shadow(&mut self, shadow: Option<Shadow>);
}

/// A single call made on a [`Canvas`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DrawCommand {
    /// See [`Canvas::clear`]
    Clear,
    /// See [`Canvas::fill_rect`]
    FillRect {
        /// Top-left corner
        origin: Vec2,
        /// Width and height
        size: Vec2,
        /// Fill colour
        colour: Colour,
    },
    /// See [`Canvas::fill_circle`]
    FillCircle {
        /// Centre of the disc
        centre: Vec2,
        /// Radius of the disc
        radius: f32,
        /// Fill colour
        colour: Colour,
    },
    /// See [`Canvas::stroke_line`]
    StrokeLine {
        /// Start of the line
        from: Vec2,
        /// End of the line
        to: Vec2,
        /// Line width
        width: f32,
        /// Line colour
        colour: Colour,
    },
    /// See [`Canvas::set_global_alpha`]
    GlobalAlpha(f32),
    /// See [`Canvas::set_shadow`]
    Shadow(Option<Shadow>),
}

/// A canvas that doesn't draw anything, it just remembers what it was asked to draw.
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct Recorder {
    /// Every command, in the order it was issued.
    pub commands: Vec<DrawCommand>,
}

impl Recorder {
    /// Just the lines that were drawn.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::StrokeLine { .. }))
            .collect()
    }

    /// Just the discs that were drawn.
    #[inline]
    #[must_use]
    pub fn circles(&self) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::FillCircle { .. }))
            .collect()
    }
}

impl Canvas for Recorder {
    #[inline]
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    #[inline]
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, colour: Colour) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            size,
            colour,
        });
    }

    #[inline]
    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Colour) {
        self.commands.push(DrawCommand::FillCircle {
            centre,
            radius,
            colour,
        });
    }

    #[inline]
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, colour: Colour) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            width,
            colour,
        });
    }

    #[inline]
    fn set_global_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    #[inline]
    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.commands.push(DrawCommand::Shadow(shadow));
    }
}
