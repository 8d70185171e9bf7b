use euclid::default::Rect;

use crate::font_storage::ResolvedFont;
use crate::style::TextAlign;
use crate::text::TextMeasure;

use super::canvas::{Canvas, CoverageMask, GuideBoxStyle, ShadowStyle};
use super::color::Color;
use super::glyph_cache::GlyphCache;

/// Already fitted lines and everything needed to draw them into a box.
#[derive(Clone, Debug)]
pub struct TextBox<'a> {
    pub lines: &'a [String],
    pub font_size_px: u32,
    /// Box in surface pixels.
    pub bounds: Rect<f32>,
    pub align: TextAlign,
    pub color: Color,
    /// Line advance as a multiple of the font size.
    pub line_height_scale: f32,
    /// Outline the box with a dashed guide. Only the interactive preview sets this.
    pub show_guide_box: bool,
}

/// Where one line ends up on the surface. **Y-axis goes down.**
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine<'a> {
    pub text: &'a str,
    /// Left edge of the line's advance box.
    pub x: f32,
    /// Top of the line; text is drawn with a "top" baseline.
    pub y: f32,
    pub width: f32,
    /// Point the line is aligned against: its left edge, centre or right edge.
    pub anchor_x: f32,
}

impl<'a> TextBox<'a> {
    pub fn line_height(&self) -> f32 {
        self.font_size_px as f32 * self.line_height_scale
    }

    /// Positions every line without drawing anything.
    ///
    /// Line `i` starts at `bounds.min_y() + i * line_height`. All lines share
    /// the anchor picked by `align`, so right-aligned lines end exactly at
    /// `bounds.max_x()` and centred lines are centred on the box.
    pub fn place_lines<M: TextMeasure + ?Sized>(&self, measure: &M) -> Vec<PlacedLine<'a>> {
        let size = self.font_size_px as f32;
        let anchor_x = self.align.anchor_x(self.bounds.min_x(), self.bounds.width());
        let line_height = self.line_height();
        let lines = self.lines;

        lines
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let width = measure.measure_width(text, size);
                PlacedLine {
                    text: text.as_str(),
                    x: self.align.line_left(anchor_x, width),
                    y: self.bounds.min_y() + index as f32 * line_height,
                    width,
                    anchor_x,
                }
            })
            .collect()
    }
}

/// Draws a fitted text box onto `canvas`.
///
/// The guide box, when requested, is stroked first. Text is then filled with
/// `shadow` set on the canvas, and the shadow is cleared again afterwards so
/// later drawing on the same canvas is unaffected. Without a usable face
/// nothing but the guide box is drawn.
pub fn draw_text_box(
    canvas: &mut Canvas,
    glyphs: &mut GlyphCache,
    font: Option<&ResolvedFont>,
    text_box: &TextBox<'_>,
    shadow: &ShadowStyle,
    guide: &GuideBoxStyle,
) {
    if text_box.show_guide_box {
        canvas.stroke_dashed_rect(&text_box.bounds, guide);
    }

    let Some(font) = font else {
        log::warn!("No font face available, skipping text drawing.");
        return;
    };

    let size = text_box.font_size_px as f32;
    let ascent = font
        .font
        .horizontal_line_metrics(size)
        .map_or(size * 0.8, |metrics| metrics.ascent);

    let mut mask = CoverageMask::new(canvas.width(), canvas.height());
    for line in text_box.place_lines(font) {
        rasterize_line(&mut mask, glyphs, font, &line, size, line.y + ascent);
    }

    canvas.set_shadow(*shadow);
    canvas.fill_coverage(&mask, text_box.color);
    canvas.clear_shadow();
}

/// Accumulates the glyphs of one line into `mask`, pen starting at the line's left edge.
fn rasterize_line(
    mask: &mut CoverageMask,
    glyphs: &mut GlyphCache,
    font: &ResolvedFont,
    line: &PlacedLine<'_>,
    font_size: f32,
    baseline: f32,
) {
    let mut pen_x = line.x;
    let mut prev: Option<u16> = None;

    for ch in line.text.chars() {
        let glyph_index = font.font.lookup_glyph_index(ch);
        if let Some(prev) = prev {
            pen_x += font
                .font
                .horizontal_kern_indexed(prev, glyph_index, font_size)
                .unwrap_or(0.0);
        }
        prev = Some(glyph_index);

        let glyph = glyphs.get(font, glyph_index, font_size);
        let metrics = &glyph.metrics;
        let origin_x = (pen_x + metrics.xmin as f32).floor() as i64;
        let origin_y = (baseline - (metrics.ymin as f32 + metrics.height as f32)).floor() as i64;

        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let alpha = glyph.coverage[row * metrics.width + col];
                mask.accumulate(origin_x + col as i64, origin_y + row as i64, alpha);
            }
        }

        pen_x += metrics.advance_width;
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::HeuristicMeasure;
    use euclid::{point2, size2};

    fn text_box(lines: &[String], align: TextAlign) -> TextBox<'_> {
        TextBox {
            lines,
            font_size_px: 20,
            bounds: Rect::new(point2(100.0, 40.0), size2(50.0, 80.0)),
            align,
            color: Color::new(255, 255, 255, 255),
            line_height_scale: 1.2,
            show_guide_box: false,
        }
    }

    #[test]
    fn right_aligned_lines_end_at_box_edge() {
        let lines = vec!["a".to_string(), "abc".to_string()];
        let placed = text_box(&lines, TextAlign::Right).place_lines(&HeuristicMeasure);
        for line in &placed {
            assert_eq!(line.anchor_x, 150.0);
            assert!((line.x + line.width - 150.0).abs() < 1e-4);
        }
    }

    #[test]
    fn centered_lines_share_box_center() {
        let lines = vec!["a".to_string(), "abc".to_string()];
        let placed = text_box(&lines, TextAlign::Center).place_lines(&HeuristicMeasure);
        for line in &placed {
            assert_eq!(line.anchor_x, 125.0);
            assert!((line.x + line.width / 2.0 - 125.0).abs() < 1e-4);
        }
    }

    #[test]
    fn left_aligned_lines_start_at_box_edge() {
        let lines = vec!["a".to_string(), "abc".to_string()];
        let placed = text_box(&lines, TextAlign::Left).place_lines(&HeuristicMeasure);
        for line in &placed {
            assert_eq!(line.anchor_x, 100.0);
            assert_eq!(line.x, 100.0);
        }
    }

    #[test]
    fn lines_step_down_by_line_height() {
        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let placed = text_box(&lines, TextAlign::Left).place_lines(&HeuristicMeasure);
        for (line, expected) in placed.iter().zip([40.0, 64.0, 88.0]) {
            assert!((line.y - expected).abs() < 1e-3, "{} != {}", line.y, expected);
        }
    }

    #[test]
    fn guide_box_is_drawn_even_without_a_face() {
        let mut canvas = Canvas::new(200, 200).unwrap();
        let mut glyphs = GlyphCache::default();
        let lines = vec!["Hello".to_string()];
        let mut tb = text_box(&lines, TextAlign::Center);
        tb.show_guide_box = true;

        draw_text_box(
            &mut canvas,
            &mut glyphs,
            None,
            &tb,
            &ShadowStyle::default(),
            &GuideBoxStyle::default(),
        );

        assert!(canvas.image().get_pixel(101, 40).0[3] > 0);
        assert!(canvas.shadow().is_none());
        assert!(glyphs.is_empty());
    }

    /// Horizontal extent of the pixels the white text touched. The black
    /// shadow alone leaves the red channel at zero.
    fn text_ink_x_range(canvas: &Canvas) -> Option<(u32, u32)> {
        canvas
            .image()
            .enumerate_pixels()
            .filter(|(_, _, pixel)| pixel.0[0] > 0)
            .fold(None, |range, (x, _, _)| match range {
                None => Some((x, x)),
                Some((min, max)) => Some((min.min(x), max.max(x))),
            })
    }

    #[test]
    fn drawn_ink_follows_alignment_and_shadow_is_reset() {
        let mut storage = crate::font_storage::FontStorage::new();
        storage.load_system_fonts();
        let Some(font) = storage.resolve_family("sans-serif") else {
            eprintln!("no system fonts installed, skipping");
            return;
        };

        let lines = vec!["Hello".to_string()];
        let mut glyphs = GlyphCache::default();

        for (align, anchor) in [
            (TextAlign::Left, 100.0),
            (TextAlign::Center, 350.0),
            (TextAlign::Right, 600.0),
        ] {
            let mut canvas = Canvas::new(700, 120).unwrap();
            let tb = TextBox {
                lines: &lines,
                font_size_px: 40,
                bounds: Rect::new(point2(100.0, 20.0), size2(500.0, 80.0)),
                align,
                color: Color::new(255, 255, 255, 255),
                line_height_scale: 1.2,
                show_guide_box: false,
            };

            draw_text_box(
                &mut canvas,
                &mut glyphs,
                Some(&font),
                &tb,
                &ShadowStyle::default(),
                &GuideBoxStyle::default(),
            );

            assert!(canvas.shadow().is_none(), "{:?}", align);
            let (min_x, max_x) = text_ink_x_range(&canvas).unwrap();
            let tolerance = 8.0;
            match align {
                TextAlign::Left => assert!((min_x as f32 - anchor).abs() <= tolerance, "{min_x}"),
                TextAlign::Right => assert!((max_x as f32 + 1.0 - anchor).abs() <= tolerance, "{max_x}"),
                TextAlign::Center => {
                    let middle = (min_x + max_x + 1) as f32 / 2.0;
                    assert!((middle - anchor).abs() <= tolerance, "{min_x}..{max_x}");
                }
            }
        }
        assert!(!glyphs.is_empty());
    }
}
