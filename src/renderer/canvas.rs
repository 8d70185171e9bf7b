use std::io::Cursor;

use euclid::default::Rect;
use image::{GrayImage, ImageFormat, Rgba, RgbaImage, imageops};

use super::color::{Color, to_unit};

/// Largest width or height a surface may have.
pub const MAX_SURFACE_DIMENSION: u32 = 16_384;
/// Largest pixel count a surface may have.
pub const MAX_SURFACE_AREA: u64 = 1 << 28;
/// Upper bound on the shadow's Gaussian sigma, in pixels.
pub const MAX_SHADOW_SIGMA: f32 = 64.0;

/// Drop shadow applied to filled coverage while set on a [`Canvas`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowStyle {
    pub color: Color,
    /// Blur extent in pixels. The Gaussian sigma is half of this.
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ShadowStyle {
    /// Soft dark shadow that keeps light text legible on light backgrounds.
    fn default() -> Self {
        Self {
            color: Color::new(0, 0, 0, 128),
            blur: 4.0,
            offset_x: 2.0,
            offset_y: 2.0,
        }
    }
}

impl ShadowStyle {
    fn is_visible(&self) -> bool {
        self.color.alpha > 0
    }
}

/// Dashed outline drawn around the text box in the interactive preview.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideBoxStyle {
    pub color: Color,
    pub line_width: f32,
    pub dash: f32,
    pub gap: f32,
}

impl Default for GuideBoxStyle {
    fn default() -> Self {
        Self {
            color: Color::new(255, 255, 255, 128),
            line_width: 2.0,
            dash: 5.0,
            gap: 5.0,
        }
    }
}

/// 8-bit coverage mask the size of a canvas.
///
/// Glyphs and strokes are accumulated here first and then composited in one
/// pass, so overlapping pieces never blend twice and a shadow can be derived
/// from the finished shape.
pub struct CoverageMask {
    pixels: GrayImage,
    /// Dirty region as `[x0, y0, x1, y1)`.
    bounds: Option<[u32; 4]>,
}

impl CoverageMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: GrayImage::new(width, height),
            bounds: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel_checked(x, y).map_or(0, |p| p.0[0])
    }

    /// Adds `alpha` to the pixel, saturating at 255. Out-of-range pixels are ignored.
    pub fn accumulate(&mut self, x: i64, y: i64, alpha: u8) {
        if alpha == 0 || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let Some(pixel) = self.pixels.get_pixel_mut_checked(x, y) else {
            return;
        };
        pixel.0[0] = pixel.0[0].saturating_add(alpha);
        self.mark(x, y);
    }

    /// Sets the pixel to full coverage.
    pub fn cover(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let Some(pixel) = self.pixels.get_pixel_mut_checked(x, y) else {
            return;
        };
        pixel.0[0] = u8::MAX;
        self.mark(x, y);
    }

    fn mark(&mut self, x: u32, y: u32) {
        self.bounds = Some(match self.bounds {
            None => [x, y, x + 1, y + 1],
            Some([x0, y0, x1, y1]) => [x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)],
        });
    }
}

/// RGBA drawing surface with the small set of operations the text renderer needs.
///
/// A canvas keeps one piece of drawing state, the current shadow, which is
/// applied to every [`Canvas::fill_coverage`] call until cleared.
pub struct Canvas {
    pixels: RgbaImage,
    shadow: Option<ShadowStyle>,
}

impl Canvas {
    /// Allocates a transparent surface.
    ///
    /// Returns `None` for zero-sized or oversized dimensions; callers treat
    /// that as "no surface available" and skip the work.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            log::warn!("Refusing to allocate an empty {}x{} surface.", width, height);
            return None;
        }
        if width > MAX_SURFACE_DIMENSION
            || height > MAX_SURFACE_DIMENSION
            || width as u64 * height as u64 > MAX_SURFACE_AREA
        {
            log::warn!("Surface {}x{} exceeds the supported size.", width, height);
            return None;
        }

        Some(Self {
            pixels: RgbaImage::new(width, height),
            shadow: None,
        })
    }

    /// Allocates a surface the size of `background` and draws it at the origin.
    pub fn with_background(background: &RgbaImage) -> Option<Self> {
        let mut canvas = Self::new(background.width(), background.height())?;
        canvas.draw_image(background, 0, 0);
        Some(canvas)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Draws `image` with its top-left corner at (`x`, `y`), alpha blended.
    pub fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.pixels, image, x, y);
    }

    pub fn shadow(&self) -> Option<&ShadowStyle> {
        self.shadow.as_ref()
    }

    pub fn set_shadow(&mut self, shadow: ShadowStyle) {
        self.shadow = Some(shadow);
    }

    /// Resets the shadow so later fills are drawn without one.
    pub fn clear_shadow(&mut self) {
        self.shadow = None;
    }

    /// Composites `color` through `mask`, drawing the current shadow underneath first.
    pub fn fill_coverage(&mut self, mask: &CoverageMask, color: Color) {
        let Some([x0, y0, x1, y1]) = mask.bounds else {
            return;
        };

        if let Some(shadow) = self.shadow
            && shadow.is_visible()
        {
            self.fill_shadow(mask, &shadow);
        }

        let color = to_unit(color);
        for y in y0..y1 {
            for x in x0..x1 {
                let coverage = mask.get(x, y);
                if coverage == 0 {
                    continue;
                }
                if let Some(pixel) = self.pixels.get_pixel_mut_checked(x, y) {
                    blend(pixel, color, coverage as f32 / 255.0);
                }
            }
        }
    }

    fn fill_shadow(&mut self, mask: &CoverageMask, shadow: &ShadowStyle) {
        let Some([x0, y0, x1, y1]) = mask.bounds else {
            return;
        };

        let sigma = if shadow.blur.is_nan() {
            0.0
        } else {
            (shadow.blur / 2.0).clamp(0.0, MAX_SHADOW_SIGMA)
        };
        let pad = (sigma * 3.0).ceil() as u32;
        let rx0 = x0.saturating_sub(pad);
        let ry0 = y0.saturating_sub(pad);
        let rx1 = x1.saturating_add(pad).min(mask.width());
        let ry1 = y1.saturating_add(pad).min(mask.height());

        let region = imageops::crop_imm(&mask.pixels, rx0, ry0, rx1 - rx0, ry1 - ry0).to_image();
        let blurred = if sigma.is_normal() {
            imageops::blur(&region, sigma)
        } else {
            region
        };

        let color = to_unit(shadow.color);
        let dx = shadow.offset_x.round() as i64 + rx0 as i64;
        let dy = shadow.offset_y.round() as i64 + ry0 as i64;
        for (x, y, coverage) in blurred.enumerate_pixels() {
            let coverage = coverage.0[0];
            if coverage == 0 {
                continue;
            }
            let (tx, ty) = (x as i64 + dx, y as i64 + dy);
            if tx < 0 || ty < 0 {
                continue;
            }
            if let Some(pixel) = self.pixels.get_pixel_mut_checked(tx as u32, ty as u32) {
                blend(pixel, color, coverage as f32 / 255.0);
            }
        }
    }

    /// Strokes a dashed rectangle outline centred on the edges of `rect`.
    ///
    /// The dash pattern runs clockwise from the top-left corner and continues
    /// across corners, like a canvas `strokeRect` with a line dash set.
    pub fn stroke_dashed_rect(&mut self, rect: &Rect<f32>, style: &GuideBoxStyle) {
        let mut mask = CoverageMask::new(self.width(), self.height());

        let (left, top) = (rect.min_x(), rect.min_y());
        let (right, bottom) = (rect.max_x(), rect.max_y());
        let corners = [(left, top), (right, top), (right, bottom), (left, bottom), (left, top)];

        let period = (style.dash + style.gap).max(1.0);
        let half = style.line_width.max(1.0) / 2.0;
        let mut travelled = 0.0f32;

        for edge in corners.windows(2) {
            let (sx, sy) = edge[0];
            let (ex, ey) = edge[1];
            let length = ((ex - sx).powi(2) + (ey - sy).powi(2)).sqrt();
            let steps = length.ceil() as u32;
            for step in 0..=steps {
                let t = (step as f32).min(length);
                if (travelled + t) % period >= style.dash {
                    continue;
                }
                let ratio = if length > 0.0 { t / length } else { 0.0 };
                let px = sx + (ex - sx) * ratio;
                let py = sy + (ey - sy) * ratio;
                for y in (py - half).floor() as i64..(py + half).floor() as i64 {
                    for x in (px - half).floor() as i64..(px + half).floor() as i64 {
                        mask.cover(x, y);
                    }
                }
            }
            travelled += length;
        }

        self.fill_coverage(&mask, style.color);
    }

    /// Encodes the surface as PNG.
    pub fn encode_png(&self) -> image::ImageResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Source-over blend of a straight-alpha colour scaled by `coverage`.
fn blend(pixel: &mut Rgba<u8>, color: [f32; 4], coverage: f32) {
    let a = color[3] * coverage;
    if a <= 0.0 {
        return;
    }

    let [bg_r, bg_g, bg_b, bg_a] = pixel.0.map(|c| c as f32 / 255.0);
    let out_a = a + bg_a * (1.0 - a);
    if out_a <= 0.0 {
        return;
    }

    let mix = |fg: f32, bg: f32| (fg * a + bg * bg_a * (1.0 - a)) / out_a;
    pixel.0 = [
        (mix(color[0], bg_r) * 255.0).round() as u8,
        (mix(color[1], bg_g) * 255.0).round() as u8,
        (mix(color[2], bg_b) * 255.0).round() as u8,
        (out_a * 255.0).round() as u8,
    ];
}
