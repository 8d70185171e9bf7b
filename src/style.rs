use std::str::FromStr;

use euclid::default::Rect;
use euclid::{point2, size2};

/// Horizontal placement of each line inside the text box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    /// X coordinate lines are anchored on for a box spanning `left..left + width`.
    pub fn anchor_x(self, left: f32, width: f32) -> f32 {
        match self {
            TextAlign::Left => left,
            TextAlign::Center => left + width / 2.0,
            TextAlign::Right => left + width,
        }
    }

    /// Left edge of a line of `line_width` drawn against `anchor_x`.
    pub fn line_left(self, anchor_x: f32, line_width: f32) -> f32 {
        match self {
            TextAlign::Left => anchor_x,
            TextAlign::Center => anchor_x - line_width / 2.0,
            TextAlign::Right => anchor_x - line_width,
        }
    }
}

impl FromStr for TextAlign {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(TextAlign::Left),
            "center" | "centre" => Ok(TextAlign::Center),
            "right" | "end" => Ok(TextAlign::Right),
            _ => Err(()),
        }
    }
}

/// Style shared by every image of a batch.
///
/// Box size and position are percentages of the target image, so one style
/// can be applied to images of any size.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleParams {
    pub font_family: String,
    /// Any colour string [`crate::renderer::parse_color`] understands.
    pub font_color: String,
    pub text_align: TextAlign,
    pub box_width_pct: f32,
    pub box_height_pct: f32,
    pub position_x_pct: f32,
    pub position_y_pct: f32,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            font_family: "Chau Philomene One".to_string(),
            font_color: "#000000".to_string(),
            text_align: TextAlign::Center,
            box_width_pct: 70.0,
            box_height_pct: 10.0,
            position_x_pct: 14.5,
            position_y_pct: 35.5,
        }
    }
}

impl StyleParams {
    /// Resolves the percentage box against a `width` x `height` pixel surface.
    pub fn box_rect(&self, width: u32, height: u32) -> Rect<f32> {
        let (w, h) = (width as f32, height as f32);
        Rect::new(
            point2(
                clamp_pct(self.position_x_pct) * w / 100.0,
                clamp_pct(self.position_y_pct) * h / 100.0,
            ),
            size2(
                clamp_pct(self.box_width_pct) * w / 100.0,
                clamp_pct(self.box_height_pct) * h / 100.0,
            ),
        )
    }
}

/// Clamps a percentage to `0..=100`. NaN becomes 0.
pub fn clamp_pct(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Parses a percentage typed by a user, clamped to `0..=100`.
///
/// Like a lenient number field, the longest numeric prefix is used, so
/// `"12.5%"` reads as 12.5. `None` when the input does not start with a
/// number; callers keep their previous value in that case.
pub fn parse_percent(input: &str) -> Option<f32> {
    let value = parse_number_prefix(input)?;
    if value.is_nan() {
        return None;
    }
    Some(clamp_pct(value))
}

fn parse_number_prefix(input: &str) -> Option<f32> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Splits raw multi-line input into text items, one per output image.
///
/// Lines are trimmed and blank lines dropped. Input without any text still
/// yields a single empty item so the preview has something to show.
pub fn split_text_items(raw: &str) -> Vec<String> {
    let items: Vec<String> = raw
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        vec![String::new()]
    } else {
        items
    }
}
