//! Colours and the little bit of colour maths the simulator needs.

use palette::IntoColor as _;

/// An RGBA colour, each channel in `0.0..=1.0`.
pub type Colour = (f32, f32, f32, f32);

/// A default pure white.
pub const WHITE: Colour = (1.0, 1.0, 1.0, 1.0);

/// A default pure black.
pub const BLACK: Colour = (0.0, 0.0, 0.0, 1.0);

/// Fully transparent, what a cleared canvas holds.
pub const TRANSPARENT: Colour = (0.0, 0.0, 0.0, 0.0);

/// The neon cyan used by the network preset.
pub const CYAN: Colour = (0.0, 1.0, 0.95, 1.0);

/// The neon magenta used by the network preset.
pub const MAGENTA: Colour = (1.0, 0.0, 0.8, 1.0);

/// Return the colour with its alpha multiplied by `factor`.
#[inline]
#[must_use]
pub fn with_alpha(colour: Colour, factor: f32) -> Colour {
    (colour.0, colour.1, colour.2, (colour.3 * factor).clamp(0.0, 1.0))
}

/// Make an opaque colour from a hue in degrees.
#[inline]
#[must_use]
pub fn from_hue(hue: f32, saturation: f32, lightness: f32) -> Colour {
    let hsl: palette::Hsl = palette::Hsl::new(
        hue.rem_euclid(360.0),
        saturation.clamp(0.0, 1.0),
        lightness.clamp(0.0, 1.0),
    );
    let rgb: palette::Srgb = hsl.into_color();
    (rgb.red, rgb.green, rgb.blue, 1.0)
}

/// Porter-Duff "source over destination" compositing of straight (non-premultiplied) colours.
#[inline]
#[must_use]
pub fn over(source: Colour, destination: Colour) -> Colour {
    let source_alpha = source.3.clamp(0.0, 1.0);
    let destination_alpha = destination.3.clamp(0.0, 1.0);
    let alpha = source_alpha + destination_alpha * (1.0 - source_alpha);
    if alpha <= f32::EPSILON {
        return TRANSPARENT;
    }

    let channel = |src: f32, dst: f32| {
        (src * source_alpha + dst * destination_alpha * (1.0 - source_alpha)) / alpha
    };
    (
        channel(source.0, destination.0),
        channel(source.1, destination.1),
        channel(source.2, destination.2),
        alpha,
    )
}
