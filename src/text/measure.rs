use crate::font_storage::ResolvedFont;

/// Pixel width of a run of text at a given font size.
///
/// This is the only capability the wrapper and the size search need from a
/// font, so they can run against a real face or against a heuristic.
pub trait TextMeasure {
    fn measure_width(&self, text: &str, font_size: f32) -> f32;
}

impl<M: TextMeasure + ?Sized> TextMeasure for &M {
    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        (**self).measure_width(text, font_size)
    }
}

/// Advance width of the glyph run, with pair kerning, as `fontdue` reports it.
impl TextMeasure for fontdue::Font {
    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        let mut width = 0.0;
        let mut prev: Option<u16> = None;
        for ch in text.chars() {
            let glyph = self.lookup_glyph_index(ch);
            if let Some(prev) = prev {
                width += self
                    .horizontal_kern_indexed(prev, glyph, font_size)
                    .unwrap_or(0.0);
            }
            width += self.metrics_indexed(glyph, font_size).advance_width;
            prev = Some(glyph);
        }
        width
    }
}

impl TextMeasure for ResolvedFont {
    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        self.font.measure_width(text, font_size)
    }
}

/// Width estimate from per-character em fractions.
///
/// Used when no face is loaded. Narrow ASCII punctuation and spaces count less
/// than letters, CJK ideographs count a full em.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeuristicMeasure;

impl HeuristicMeasure {
    fn char_units(ch: char) -> f32 {
        if ch.is_whitespace() {
            0.25
        } else if ch.is_ascii_alphanumeric() {
            0.55
        } else if ch.is_ascii() {
            0.35
        } else if matches!(
            ch as u32,
            0x4E00..=0x9FFF | 0x3040..=0x30FF | 0x31F0..=0x31FF | 0xAC00..=0xD7AF
        ) {
            1.0
        } else {
            0.6
        }
    }
}

impl TextMeasure for HeuristicMeasure {
    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(Self::char_units).sum::<f32>() * font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_scales_with_size() {
        let m = HeuristicMeasure;
        assert_eq!(m.measure_width("", 40.0), 0.0);
        assert!((m.measure_width("ab", 10.0) - 11.0).abs() < 1e-4);
        assert!((m.measure_width("ab", 20.0) - 22.0).abs() < 1e-4);
        assert!(m.measure_width("a b", 10.0) > m.measure_width("ab", 10.0));
    }
}
