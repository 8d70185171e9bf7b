#![allow(clippy::unwrap_used)]

use fude::{
    EditorSession, FitCache, FitKey, FontSystem, StyleParams, TextAlign, generate_all,
    image::{Rgba, RgbaImage},
    text::TextMeasure,
};

fn scenario_style() -> StyleParams {
    StyleParams {
        font_family: "Arial".to_string(),
        font_color: "#ffffff".to_string(),
        text_align: TextAlign::Center,
        box_width_pct: 80.0,
        box_height_pct: 20.0,
        ..Default::default()
    }
}

fn dark_source() -> RgbaImage {
    RgbaImage::from_pixel(800, 600, Rgba([30, 30, 30, 255]))
}

#[test]
fn two_items_give_two_full_size_surfaces() {
    let system = FontSystem::new();
    let style = scenario_style();
    let mut cache = FitCache::new();

    let images = generate_all(&system, &dark_source(), &["Hello", "World Wide"], &style, &mut cache);

    assert_eq!(images.len(), 2);
    for image in &images {
        assert_eq!((image.canvas.width(), image.canvas.height()), (800, 600));
    }

    // Box resolves to 640 x 120 pixels.
    let hello = cache.get(&FitKey::new("Hello", 640.0, 120.0, "Arial")).unwrap();
    let world = cache.get(&FitKey::new("World Wide", 640.0, 120.0, "Arial")).unwrap();

    // One line each; the box height is the binding limit.
    assert_eq!(hello.lines, ["Hello"]);
    assert_eq!(world.lines, ["World Wide"]);
    for fitted in [hello, world] {
        assert!((96..=100).contains(&fitted.font_size_px), "{}", fitted.font_size_px);
        assert!(fitted.block_height(1.2) <= 120.0);
    }
}

#[test]
fn fitted_lines_respect_box_width() {
    let system = FontSystem::new();
    let style = StyleParams {
        box_width_pct: 20.0,
        ..scenario_style()
    };
    let mut cache = FitCache::new();
    let text = "the quick brown fox jumps over the lazy dog";

    generate_all(&system, &dark_source(), &[text], &style, &mut cache);

    let fitted = cache.get(&FitKey::new(text, 160.0, 120.0, "Arial")).unwrap();
    assert!(fitted.lines.len() > 1);
    assert!(fitted.block_height(1.2) <= 120.0);
    for line in &fitted.lines {
        let width = fude::text::HeuristicMeasure.measure_width(line, fitted.font_size_px as f32);
        assert!(width <= 160.0 || !line.contains(' '), "{line:?} is {width}px wide");
    }
}

#[test]
fn entities_are_decoded_before_fitting() {
    let system = FontSystem::new();
    let mut session = EditorSession::with_style(&system, scenario_style());
    session.set_text_input("Tom &amp; Jerry &copy;");

    let images = session.generate_all(&dark_source());

    assert_eq!(images.len(), 1);
    // Exported names use the text as typed.
    assert_eq!(images[0].text, "Tom &amp; Jerry &copy;");
    let cache = session.fit_cache();
    assert!(cache.get(&FitKey::new("Tom & Jerry ©", 640.0, 120.0, "Arial")).is_some());
    assert!(cache.get(&FitKey::new("Tom &amp; Jerry &copy;", 640.0, 120.0, "Arial")).is_none());
}

#[test]
fn text_is_drawn_inside_the_box_with_system_fonts() {
    let system = FontSystem::new();
    system.load_system_fonts();
    if system.is_empty() {
        eprintln!("no system fonts installed, skipping");
        return;
    }

    let source = dark_source();
    let mut session = EditorSession::with_style(&system, scenario_style());
    session.set_text_input("Hello");
    let images = session.generate_all(&source);

    let image = images[0].canvas.image();
    let changed = image
        .enumerate_pixels()
        .filter(|(_, _, pixel)| **pixel != Rgba([30, 30, 30, 255]))
        .collect::<Vec<_>>();
    assert!(!changed.is_empty());

    // Default position is 14.5% / 35.5%: box spans x 116..756, y 213..333.
    // Shadow and glyph overhang may reach a few pixels past it.
    for (x, y, _) in changed {
        assert!((100..780).contains(&x), "x = {x}");
        assert!((190..360).contains(&y), "y = {y}");
    }
}
