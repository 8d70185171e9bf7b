use image::RgbaImage;

use crate::{fit_cache::FitCache, font_system::FontSystem, renderer::Canvas, style::StyleParams};

/// One rendered surface of a batch.
pub struct GeneratedImage {
    /// Position of the text item in the input list.
    pub index: usize,
    /// The text item as given, before entity decoding.
    pub text: String,
    pub canvas: Canvas,
}

/// Draws `source` with `text` fitted into the style's box, without the guide box.
///
/// `None` when no surface of the source's size can be allocated.
pub fn render_item(
    font_system: &FontSystem,
    source: &RgbaImage,
    text: &str,
    style: &StyleParams,
    cache: &mut FitCache,
) -> Option<Canvas> {
    let mut canvas = Canvas::with_background(source)?;
    font_system.draw_styled_text(&mut canvas, text, style, false, cache);
    Some(canvas)
}

/// Renders one surface per text item, in input order.
///
/// Items whose surface cannot be allocated are skipped with a warning, so the
/// output may be shorter than `items`; every entry keeps its source index.
pub fn generate_all<S: AsRef<str>>(
    font_system: &FontSystem,
    source: &RgbaImage,
    items: &[S],
    style: &StyleParams,
    cache: &mut FitCache,
) -> Vec<GeneratedImage> {
    let mut generated = Vec::with_capacity(items.len());

    for (index, text) in items.iter().enumerate() {
        let text = text.as_ref();
        let Some(canvas) = render_item(font_system, source, text, style, cache) else {
            log::warn!("Skipping item {} ({:?}): no surface available.", index, text);
            continue;
        };
        generated.push(GeneratedImage {
            index,
            text: text.to_string(),
            canvas,
        });
    }

    log::debug!("Generated {} of {} image(s).", generated.len(), items.len());
    generated
}
