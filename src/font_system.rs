use std::{
    collections::HashMap,
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;

use crate::{
    fit_cache::{FitCache, FitKey},
    font_storage::{FontStorage, ResolvedFont},
    renderer::{
        Canvas, GlyphCache, GuideBoxStyle, ShadowStyle, TextBox, draw_text_box,
        parse_color_or_black,
    },
    style::StyleParams,
    text::{FitOptions, FitResult, HeuristicMeasure, decode_entities, fit},
};

/// High-level entry point for fitting and drawing text.
///
/// Owns the font storage, the glyph raster cache and the drawing styles that
/// are fixed for the whole application. It is shared by reference between
/// sessions, hence the `Mutex`es.
///
/// The fields are public to allow direct access to the underlying storage
/// when necessary.
pub struct FontSystem {
    /// The underlying font storage.
    pub font_storage: Mutex<FontStorage>,
    /// Rasterized glyphs reused across surfaces.
    pub glyph_cache: Mutex<GlyphCache>,
    /// Family name -> face it resolved to. Cleared whenever fonts are loaded.
    resolved: Mutex<HashMap<String, Option<ResolvedFont>, fxhash::FxBuildHasher>>,
    /// Bumped whenever the set of fonts changes.
    generation: AtomicU64,

    pub fit_options: FitOptions,
    pub shadow: ShadowStyle,
    pub guide_box: GuideBoxStyle,
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSystem {
    /// Creates a font system with no fonts loaded and default styles.
    pub fn new() -> Self {
        Self {
            font_storage: Mutex::new(FontStorage::new()),
            glyph_cache: Mutex::new(GlyphCache::default()),
            resolved: Mutex::new(HashMap::default()),
            generation: AtomicU64::new(0),
            fit_options: FitOptions::default(),
            shadow: ShadowStyle::default(),
            guide_box: GuideBoxStyle::default(),
        }
    }
}

/// font storage initialization
impl FontSystem {
    /// Loads the system fonts into the storage.
    pub fn load_system_fonts(&self) {
        self.font_storage.lock().load_system_fonts();
        self.fonts_changed();
    }

    /// Loads a font from binary data.
    pub fn load_font_binary(&self, data: impl Into<Vec<u8>>) {
        self.font_storage.lock().load_font_binary(data);
        self.fonts_changed();
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_storage.lock().load_font_file(path)?;
        self.fonts_changed();
        Ok(())
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&self, dir: PathBuf) {
        self.font_storage.lock().load_fonts_dir(dir);
        self.fonts_changed();
    }

    /// Sets the family used for "sans-serif" and therefore for fallbacks.
    pub fn set_sans_serif_family(&self, family: impl Into<String>) {
        self.font_storage.lock().set_sans_serif_family(family);
        self.fonts_changed();
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_storage.lock().is_empty()
    }

    /// Returns the number of loaded faces.
    pub fn len(&self) -> usize {
        self.font_storage.lock().len()
    }

    /// Counter bumped by every load; fit caches compare against it.
    pub fn font_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn fonts_changed(&self) {
        self.resolved.lock().clear();
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

/// fitting
impl FontSystem {
    /// Resolves a family name, falling back to sans-serif when it is unavailable.
    ///
    /// `None` only when no face is loaded at all. Results are memoized until
    /// the next font load so a missing family is reported once, not per image.
    pub fn resolve_font(&self, family: &str) -> Option<ResolvedFont> {
        if let Some(resolved) = self.resolved.lock().get(family) {
            return resolved.clone();
        }

        let resolved = self.font_storage.lock().resolve_family(family);
        self.resolved
            .lock()
            .insert(family.to_string(), resolved.clone());
        resolved
    }

    /// Runs the font-size search for `text` in a `max_width` x `max_height` box.
    ///
    /// `text` is measured as given; see [`Self::fit_text_cached`] for the
    /// variant that decodes entities and memoizes. Without any face the
    /// search runs against [`HeuristicMeasure`].
    pub fn fit_text(&self, text: &str, max_width: f32, max_height: f32, family: &str) -> FitResult {
        let result = match self.resolve_font(family) {
            Some(font) => fit(text, max_width, max_height, &font, &self.fit_options),
            None => fit(text, max_width, max_height, &HeuristicMeasure, &self.fit_options),
        };
        log::debug!(
            "fit {:?} into {}x{} -> {}px, {} line(s)",
            text,
            max_width,
            max_height,
            result.font_size_px,
            result.lines.len()
        );
        result
    }

    /// Decodes entities in `raw_text`, then looks the fit up in `cache`, computing it on a miss.
    ///
    /// A cache filled before the last font load is cleared first.
    pub fn fit_text_cached(
        &self,
        cache: &mut FitCache,
        raw_text: &str,
        box_width_px: f32,
        box_height_px: f32,
        family: &str,
    ) -> FitResult {
        cache.sync_font_generation(self.font_generation());
        let text = decode_entities(raw_text);
        let key = FitKey::new(&*text, box_width_px, box_height_px, family);
        cache
            .get_or_insert_with(key, || {
                self.fit_text(&text, box_width_px, box_height_px, family)
            })
            .clone()
    }
}

/// drawing
impl FontSystem {
    /// Draws already fitted lines with this system's shadow and guide box styles.
    pub fn draw_text_box(&self, canvas: &mut Canvas, family: &str, text_box: &TextBox<'_>) {
        let font = self.resolve_font(family);
        draw_text_box(
            canvas,
            &mut self.glyph_cache.lock(),
            font.as_ref(),
            text_box,
            &self.shadow,
            &self.guide_box,
        );
    }

    /// Fits `raw_text` into the style's box on `canvas` and draws it.
    ///
    /// The box is resolved against this canvas's pixel size before the cache
    /// lookup, so one style gives correct results on images of any size.
    pub fn draw_styled_text(
        &self,
        canvas: &mut Canvas,
        raw_text: &str,
        style: &StyleParams,
        show_guide_box: bool,
        cache: &mut FitCache,
    ) {
        let bounds = style.box_rect(canvas.width(), canvas.height());
        let fitted = self.fit_text_cached(
            cache,
            raw_text,
            bounds.width(),
            bounds.height(),
            &style.font_family,
        );

        let text_box = TextBox {
            lines: &fitted.lines,
            font_size_px: fitted.font_size_px,
            bounds,
            align: style.text_align,
            color: parse_color_or_black(&style.font_color),
            line_height_scale: self.fit_options.line_height_scale,
            show_guide_box,
        };
        self.draw_text_box(canvas, &style.font_family, &text_box);
    }

    /// Clears the glyph raster cache.
    pub fn glyph_cache_clear(&self) {
        self.glyph_cache.lock().clear();
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_with_heuristic_when_no_fonts_are_loaded() {
        let system = FontSystem::new();
        assert!(system.is_empty());
        assert!(system.resolve_font("Arial").is_none());

        let expected = fit("Hello", 640.0, 120.0, &HeuristicMeasure, &FitOptions::default());
        assert_eq!(system.fit_text("Hello", 640.0, 120.0, "Arial"), expected);
    }

    #[test]
    fn cached_fit_matches_uncached_fit() {
        let system = FontSystem::new();
        let mut cache = FitCache::new();

        let direct = system.fit_text("World Wide", 640.0, 120.0, "Arial");
        let first = system.fit_text_cached(&mut cache, "World Wide", 640.0, 120.0, "Arial");
        let second = system.fit_text_cached(&mut cache, "World Wide", 640.0, 120.0, "Arial");

        assert_eq!(direct, first);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn loading_fonts_drops_cached_fits() {
        let system = FontSystem::new();
        let mut cache = FitCache::new();
        system.fit_text_cached(&mut cache, "Hello", 640.0, 120.0, "Arial");
        let generation = system.font_generation();

        // Not a font; the load still counts as a change of the font set.
        system.load_font_binary(Vec::new());
        assert!(system.font_generation() > generation);

        system.fit_text_cached(&mut cache, "World", 640.0, 120.0, "Arial");
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&FitKey::new("Hello", 640.0, 120.0, "Arial")).is_none());
    }

    #[test]
    fn entities_are_decoded_before_keying_and_measuring() {
        let system = FontSystem::new();
        let mut cache = FitCache::new();

        let result = system.fit_text_cached(&mut cache, "Tom &amp; Jerry &copy;", 2000.0, 500.0, "Arial");
        assert_eq!(result.lines, vec!["Tom & Jerry ©"]);
        assert!(cache.get(&FitKey::new("Tom & Jerry ©", 2000.0, 500.0, "Arial")).is_some());
        assert!(cache.get(&FitKey::new("Tom &amp; Jerry &copy;", 2000.0, 500.0, "Arial")).is_none());
    }
}
