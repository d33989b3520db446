//! A grid of RGBA pixels that fields can be drawn on.
//!
//! Fields think in canvas units, and a terminal has very few pixels, so every pixel covers
//! `scale` canvas units in each direction. Shapes smaller than a pixel still light up the pixel
//! they're in, otherwise most particles would simply vanish.

use flurry_field::canvas::{Canvas, Shadow};
use flurry_field::colour::{self, Colour, TRANSPARENT};
use flurry_field::field::Bounds;
use flurry_field::Vec2;

/// A run of pixel coordinates along one axis.
type PixelRange = core::ops::Range<usize>;

/// How strong the glow is right at the edge of a shape, relative to the shape's own alpha.
const SHADOW_STRENGTH: f32 = 0.6;

/// An RGBA raster canvas.
#[derive(Debug, Clone)]
pub(crate) struct PixelBuffer {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Canvas units per pixel
    scale: f32,
    /// Row-major pixels
    pixels: Vec<Colour>,
    /// Alpha multiplier for everything drawn
    global_alpha: f32,
    /// The glow for filled shapes, if any
    shadow: Option<Shadow>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: usize, height: usize, scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            tracing::warn!("Pixel scale of {scale} isn't usable, using 1.0");
            1.0
        };

        Self {
            width,
            height,
            scale,
            pixels: vec![TRANSPARENT; width * height],
            global_alpha: 1.0,
            shadow: None,
        }
    }

    /// Change the size of the buffer. Everything already drawn is lost.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![TRANSPARENT; width * height];
    }

    /// The size of the buffer in canvas units.
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Terminals are nowhere near big enough to lose precision"
    )]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width as f32 * self.scale, self.height as f32 * self.scale)
    }

    /// The colour of a single pixel.
    pub fn get(&self, x: usize, y: usize) -> Option<Colour> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Paint another buffer of the same size over this one.
    pub fn composite(&mut self, other: &Self) {
        if other.width != self.width || other.height != self.height {
            tracing::warn!(
                "Not compositing a {}x{} layer onto a {}x{} buffer",
                other.width,
                other.height,
                self.width,
                self.height
            );
            return;
        }

        for (pixel, source) in self.pixels.iter_mut().zip(&other.pixels) {
            *pixel = colour::over(*source, *pixel);
        }
    }

    /// Blend a colour over a single pixel, respecting the global alpha.
    fn blend(&mut self, x: usize, y: usize, colour: Colour) {
        if x >= self.width {
            return;
        }
        let source = colour::with_alpha(colour, self.global_alpha);
        if let Some(pixel) = self.pixels.get_mut(y * self.width + x) {
            *pixel = colour::over(source, *pixel);
        }
    }

    /// The pixel that a point in canvas units falls in, if it's on the buffer.
    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Checked to be finite and non-negative first, and `as` saturates"
    )]
    fn to_pixel(&self, point: Vec2) -> Option<(usize, usize)> {
        let pixel = point / self.scale;
        if !pixel.is_finite() || pixel.x < 0.0 || pixel.y < 0.0 {
            return None;
        }
        let x = pixel.x.floor() as usize;
        let y = pixel.y.floor() as usize;
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// The range of pixels, clipped to the buffer, that covers a box in canvas units.
    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "Clamped to the buffer's size first, and `as` saturates"
    )]
    fn pixel_span(&self, min: Vec2, max: Vec2) -> Option<(PixelRange, PixelRange)> {
        let min = (min / self.scale).floor().max(Vec2::ZERO);
        let max = (max / self.scale)
            .ceil()
            .min(Vec2::new(self.width as f32, self.height as f32));
        if !min.is_finite() || !max.is_finite() || min.x >= max.x || min.y >= max.y {
            return None;
        }
        Some((min.x as usize..max.x as usize, min.y as usize..max.y as usize))
    }

    /// The centre of a pixel, in canvas units.
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Terminals are nowhere near big enough to lose precision"
    )]
    fn pixel_centre(&self, x: usize, y: usize) -> Vec2 {
        (Vec2::new(x as f32, y as f32) + 0.5) * self.scale
    }

    /// A soft halo that fades out over `blur` canvas units beyond the edge of a disc.
    fn draw_glow(&mut self, centre: Vec2, radius: f32, shadow: Shadow) {
        if !(shadow.blur.is_finite() && shadow.blur > 0.0) {
            return;
        }

        let reach = Vec2::splat(radius + shadow.blur);
        let Some((xs, ys)) = self.pixel_span(centre - reach, centre + reach) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let beyond_edge = self.pixel_centre(x, y).distance(centre) - radius;
                if beyond_edge <= 0.0 || beyond_edge >= shadow.blur {
                    continue;
                }
                let falloff = 1.0 - beyond_edge / shadow.blur;
                self.blend(
                    x,
                    y,
                    colour::with_alpha(shadow.colour, SHADOW_STRENGTH * falloff * falloff),
                );
            }
        }
    }
}

impl Canvas for PixelBuffer {
    fn clear(&mut self) {
        self.pixels.fill(TRANSPARENT);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, colour: Colour) {
        let Some((xs, ys)) = self.pixel_span(origin, origin + size) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                self.blend(x, y, colour);
            }
        }
    }

    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Colour) {
        if !centre.is_finite() {
            return;
        }
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        if let Some(shadow) = self.shadow {
            self.draw_glow(centre, radius, shadow);
        }

        let mut is_painted = false;
        let reach = Vec2::splat(radius);
        if let Some((xs, ys)) = self.pixel_span(centre - reach, centre + reach) {
            for y in ys {
                for x in xs.clone() {
                    if self.pixel_centre(x, y).distance(centre) <= radius {
                        self.blend(x, y, colour);
                        is_painted = true;
                    }
                }
            }
        }

        if !is_painted {
            if let Some((x, y)) = self.to_pixel(centre) {
                self.blend(x, y, colour);
            }
        }
    }

    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "The step count is small, finite and positive"
    )]
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, colour: Colour) {
        if !from.is_finite() || !to.is_finite() {
            return;
        }

        // Two samples per pixel is enough to not leave gaps.
        let steps = ((from.distance(to) / self.scale) * 2.0).ceil().max(1.0) as usize;
        let half_width = (width / self.scale / 2.0).floor();
        let spread = if half_width.is_finite() && half_width > 0.0 {
            half_width as usize
        } else {
            0
        };

        let mut covered = Vec::new();
        for step in 0..=steps {
            let point = from.lerp(to, step as f32 / steps as f32);
            let Some((x, y)) = self.to_pixel(point) else {
                continue;
            };
            for offset_y in y.saturating_sub(spread)..=y + spread {
                for offset_x in x.saturating_sub(spread)..=x + spread {
                    if offset_x < self.width && offset_y < self.height {
                        covered.push((offset_x, offset_y));
                    }
                }
            }
        }

        covered.sort_unstable();
        covered.dedup();
        for (x, y) in covered {
            self.blend(x, y, colour);
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.shadow = shadow;
    }
}
