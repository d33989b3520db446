//! Turn pixels into terminal cells.
//!
//! Every cell holds two pixels, one above the other, drawn with the half block characters "▀" and
//! "▄". The upper pixel is the cell's foreground and the lower one its background. A cell with only
//! a lower pixel has to use "▄" instead, otherwise it couldn't keep the terminal's default
//! background colour in its upper half.

use color_eyre::eyre::bail;
use color_eyre::eyre::Result;
use termwiz::surface::Change as TermwizChange;
use termwiz::surface::Position as TermwizPosition;

use flurry_field::colour::{Colour, WHITE};

use crate::pixels::PixelBuffer;

/// Pixels fainter than this are left as the terminal's own background.
const MIN_VISIBLE_ALPHA: f32 = 1.0 / 255.0;

/// `Surface`
#[derive(Clone)]
pub(crate) struct Surface {
    /// The terminal's width
    pub width: usize,
    /// The terminal's height
    pub height: usize,
    /// A surface of terminal cells
    pub surface: termwiz::surface::Surface,
}

impl Surface {
    /// Instantiate a blank surface.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            surface: termwiz::surface::Surface::new(width, height),
        }
    }

    /// Convert a whole pixel buffer, which must be twice as tall as the surface it makes.
    pub fn from_pixels(pixels: &PixelBuffer) -> Result<Self> {
        let mut surface = Self::new(pixels.width, pixels.height.div_ceil(2));
        for row in 0..surface.height {
            for col in 0..surface.width {
                let upper = pixels.get(col, row * 2).and_then(Self::visible);
                let lower = pixels.get(col, row * 2 + 1).and_then(Self::visible);
                surface.add_pixel_pair(col, row, upper, lower)?;
            }
        }
        Ok(surface)
    }

    /// A terminal cell can't be translucent, so faint pixels are darkened instead, as if they
    /// were drawn over a black background.
    fn visible(colour: Colour) -> Option<Colour> {
        let alpha = colour.3;
        if !alpha.is_finite() || alpha < MIN_VISIBLE_ALPHA {
            return None;
        }
        let alpha = alpha.min(1.0);
        Some((colour.0 * alpha, colour.1 * alpha, colour.2 * alpha, 1.0))
    }

    /// Set both of the pixels in a single cell. `None` leaves that half showing the terminal's
    /// default background.
    pub fn add_pixel_pair(
        &mut self,
        col: usize,
        row: usize,
        upper: Option<Colour>,
        lower: Option<Colour>,
    ) -> Result<()> {
        if col >= self.width {
            bail!("Tried to add pixel to column: {col}")
        }
        if row >= self.height {
            bail!("Tried to add pixel to row: {row}")
        }

        let (character, fg_colour, bg_colour) = match (upper, lower) {
            (None, None) => return Ok(()),
            (Some(upper_colour), None) => (
                "▀",
                Self::make_fg_colour(upper_colour),
                Self::make_default_bg_colour(),
            ),
            (None, Some(lower_colour)) => (
                "▄",
                Self::make_fg_colour(lower_colour),
                Self::make_default_bg_colour(),
            ),
            (Some(upper_colour), Some(lower_colour)) => (
                "▀",
                Self::make_fg_colour(upper_colour),
                Self::make_bg_colour(lower_colour),
            ),
        };

        self.surface.add_changes(vec![
            TermwizChange::CursorPosition {
                x: TermwizPosition::Absolute(col),
                y: TermwizPosition::Absolute(row),
            },
            fg_colour,
            bg_colour,
        ]);
        self.surface.add_change(character);

        Ok(())
    }

    /// Overlay text at a given coord with the given colours.
    pub fn add_text(
        &mut self,
        x: usize,
        y: usize,
        text: String,
        maybe_background_colour: Option<Colour>,
        maybe_foreground_colour: Option<Colour>,
    ) {
        let bg_colour = maybe_background_colour
            .map_or_else(Self::make_default_bg_colour, Self::make_bg_colour);

        let fg_colour = maybe_foreground_colour
            .map_or_else(|| Self::make_fg_colour(WHITE), Self::make_fg_colour);

        self.surface.add_changes(vec![
            TermwizChange::CursorPosition {
                x: TermwizPosition::Absolute(x),
                y: TermwizPosition::Absolute(y),
            },
            bg_colour,
            fg_colour,
        ]);
        self.surface.add_change(text);
    }

    /// Make a Termwiz colour attribute
    #[must_use]
    pub const fn make_colour_attribute(colour: Colour) -> termwiz::color::ColorAttribute {
        termwiz::color::ColorAttribute::TrueColorWithDefaultFallback(termwiz::color::SrgbaTuple(
            colour.0, colour.1, colour.2, colour.3,
        ))
    }

    /// Make a Termwiz background colour
    #[must_use]
    pub const fn make_bg_colour(colour: Colour) -> TermwizChange {
        let colour_attribute = Self::make_colour_attribute(colour);
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(colour_attribute))
    }

    /// Make the default Termwiz background colour. This is the non-colour, usually black, that a
    /// terminal displays when nothing else has been set.
    #[must_use]
    pub const fn make_default_bg_colour() -> TermwizChange {
        let colour_attribute = termwiz::color::ColorAttribute::Default;
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(colour_attribute))
    }

    /// Make a Termwiz foreground colour
    #[must_use]
    pub const fn make_fg_colour(colour: Colour) -> TermwizChange {
        let colour_attribute = Self::make_colour_attribute(colour);
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Foreground(colour_attribute))
    }
}
