use std::str::FromStr;

use palette::Srgba;

/// 8-bit sRGB colour with straight (non-premultiplied) alpha.
pub type Color = Srgba<u8>;

pub const BLACK: Color = Srgba::new(0, 0, 0, 255);
pub const TRANSPARENT: Color = Srgba::new(0, 0, 0, 0);

/// Parses the colour strings a colour picker or stylesheet hands over.
///
/// Accepted forms: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` with `a` in `0..=1`, `transparent` and CSS colour
/// keywords.
pub fn parse_color(input: &str) -> Option<Color> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    if let Some(args) = functional_args(&lower, "rgba").or_else(|| functional_args(&lower, "rgb")) {
        return parse_rgb_args(args);
    }

    if lower == "transparent" {
        return Some(TRANSPARENT);
    }

    palette::named::from_str(&lower).map(|rgb| Srgba::new(rgb.red, rgb.green, rgb.blue, 255))
}

/// Like [`parse_color`] but never fails: unparseable input is drawn in black.
pub fn parse_color_or_black(input: &str) -> Color {
    parse_color(input).unwrap_or_else(|| {
        log::warn!("Unrecognized color {:?}, using black.", input);
        BLACK
    })
}

/// Colour channels scaled to `0.0..=1.0`.
pub fn to_unit(color: Color) -> [f32; 4] {
    [
        color.red as f32 / 255.0,
        color.green as f32 / 255.0,
        color.blue as f32 / 255.0,
        color.alpha as f32 / 255.0,
    ]
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 | 6 => {
            let rgb = palette::Srgb::<u8>::from_str(hex).ok()?;
            Some(Srgba::new(rgb.red, rgb.green, rgb.blue, 255))
        }
        4 => {
            let (rgb, alpha) = hex.split_at(3);
            let rgb = palette::Srgb::<u8>::from_str(rgb).ok()?;
            let alpha = u8::from_str_radix(alpha, 16).ok()?;
            Some(Srgba::new(rgb.red, rgb.green, rgb.blue, alpha * 17))
        }
        8 => {
            let (rgb, alpha) = hex.split_at(6);
            let rgb = palette::Srgb::<u8>::from_str(rgb).ok()?;
            let alpha = u8::from_str_radix(alpha, 16).ok()?;
            Some(Srgba::new(rgb.red, rgb.green, rgb.blue, alpha))
        }
        _ => None,
    }
}

fn functional_args<'a>(value: &'a str, name: &str) -> Option<&'a str> {
    value
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args
        .split([',', ' ', '/'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let channel = |part: &str| -> Option<u8> {
        let value = match part.strip_suffix('%') {
            Some(percent) => percent.parse::<f32>().ok()? * 2.55,
            None => part.parse::<f32>().ok()?,
        };
        Some(value.round().clamp(0.0, 255.0) as u8)
    };

    match parts.as_slice() {
        [r, g, b] => Some(Srgba::new(channel(r)?, channel(g)?, channel(b)?, 255)),
        [r, g, b, a] => {
            let alpha = match a.strip_suffix('%') {
                Some(percent) => percent.parse::<f32>().ok()? / 100.0,
                None => a.parse::<f32>().ok()?,
            };
            let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
            Some(Srgba::new(channel(r)?, channel(g)?, channel(b)?, alpha))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        assert_eq!(parse_color("#ffffff"), Some(Srgba::new(255, 255, 255, 255)));
        assert_eq!(parse_color("#000"), Some(BLACK));
        assert_eq!(parse_color("#ff000080"), Some(Srgba::new(255, 0, 0, 128)));
        assert_eq!(parse_color("#0f08"), Some(Srgba::new(0, 255, 0, 136)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn functional_forms() {
        assert_eq!(
            parse_color("rgba(255, 255, 255, 0.5)"),
            Some(Srgba::new(255, 255, 255, 128))
        );
        assert_eq!(parse_color("rgb(0,0,0)"), Some(BLACK));
        assert_eq!(parse_color("RGB(10 20 30)"), Some(Srgba::new(10, 20, 30, 255)));
        assert_eq!(parse_color("rgb(100%, 0%, 0%)"), Some(Srgba::new(255, 0, 0, 255)));
        assert_eq!(parse_color("rgb(1, 2)"), None);
    }

    #[test]
    fn keywords() {
        assert_eq!(parse_color("transparent"), Some(TRANSPARENT));
        assert_eq!(parse_color("White"), Some(Srgba::new(255, 255, 255, 255)));
        assert_eq!(parse_color("not-a-color"), None);
        assert_eq!(parse_color_or_black("not-a-color"), BLACK);
    }
}
