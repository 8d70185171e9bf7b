use std::time::Instant;

use image::RgbaImage;

use crate::{
    batch::{self, GeneratedImage},
    export::{self, ExportedImage},
    fit_cache::FitCache,
    font_system::FontSystem,
    redraw::RedrawScheduler,
    renderer::Canvas,
    style::{StyleParams, TextAlign, clamp_pct, parse_percent, split_text_items},
};

/// State of one editing session: style, text items and the caches tied to them.
///
/// The fit cache depends on the text items, the box size and the font
/// family, so only those setters clear it, and only when the value actually
/// changes. Colour, alignment and position never affect a fit. Loading fonts
/// into the shared [`FontSystem`] clears it on the next fit.
pub struct EditorSession<'a> {
    font_system: &'a FontSystem,
    style: StyleParams,
    raw_input: String,
    items: Vec<String>,
    cache: FitCache,
    redraw: RedrawScheduler,
    dragging: bool,
}

impl<'a> EditorSession<'a> {
    pub fn new(font_system: &'a FontSystem) -> Self {
        Self::with_style(font_system, StyleParams::default())
    }

    pub fn with_style(font_system: &'a FontSystem, style: StyleParams) -> Self {
        Self {
            font_system,
            style,
            raw_input: String::new(),
            items: split_text_items(""),
            cache: FitCache::new(),
            redraw: RedrawScheduler::new(),
            dragging: false,
        }
    }

    pub fn style(&self) -> &StyleParams {
        &self.style
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    /// Text items, one per generated image. Never empty.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn fit_cache(&self) -> &FitCache {
        &self.cache
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

/// style setters
impl EditorSession<'_> {
    /// Replaces the raw multi-line input; one item per non-blank line.
    pub fn set_text_input(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        if raw == self.raw_input {
            return;
        }

        let items = split_text_items(&raw);
        self.raw_input = raw;
        if items != self.items {
            self.items = items;
            self.invalidate_fits();
        }
    }

    pub fn set_box_width_pct(&mut self, pct: f32) {
        let pct = clamp_pct(pct);
        if pct != self.style.box_width_pct {
            self.style.box_width_pct = pct;
            self.invalidate_fits();
        }
    }

    pub fn set_box_height_pct(&mut self, pct: f32) {
        let pct = clamp_pct(pct);
        if pct != self.style.box_height_pct {
            self.style.box_height_pct = pct;
            self.invalidate_fits();
        }
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        let family = family.into();
        if family != self.style.font_family {
            self.style.font_family = family;
            self.invalidate_fits();
        }
    }

    pub fn set_font_color(&mut self, color: impl Into<String>) {
        self.style.font_color = color.into();
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.style.text_align = align;
    }

    pub fn set_position_x_pct(&mut self, pct: f32) {
        self.style.position_x_pct = clamp_pct(pct);
    }

    pub fn set_position_y_pct(&mut self, pct: f32) {
        self.style.position_y_pct = clamp_pct(pct);
    }

    /// Sets the x position from user input. Returns `false` and keeps the
    /// previous value when the input is not a number.
    pub fn set_position_x_str(&mut self, input: &str) -> bool {
        match parse_percent(input) {
            Some(pct) => {
                self.style.position_x_pct = pct;
                true
            }
            None => false,
        }
    }

    /// Sets the y position from user input. See [`Self::set_position_x_str`].
    pub fn set_position_y_str(&mut self, input: &str) -> bool {
        match parse_percent(input) {
            Some(pct) => {
                self.style.position_y_pct = pct;
                true
            }
            None => false,
        }
    }

    fn invalidate_fits(&mut self) {
        if !self.cache.is_empty() {
            log::trace!("Clearing {} cached fit(s).", self.cache.len());
        }
        self.cache.clear();
    }
}

/// rendering
impl EditorSession<'_> {
    /// Draws the first item onto a copy of `source` with the guide box shown.
    pub fn render_preview(&mut self, source: &RgbaImage) -> Option<Canvas> {
        let text = self.items.first().map_or("", String::as_str);
        let mut canvas = Canvas::with_background(source)?;
        self.font_system
            .draw_styled_text(&mut canvas, text, &self.style, true, &mut self.cache);
        Some(canvas)
    }

    /// Moves the box to (`x_pct`, `y_pct`) and schedules a preview redraw.
    ///
    /// The position is stored right away; the redraw is debounced.
    pub fn drag_to(&mut self, x_pct: f32, y_pct: f32, now: Instant) {
        self.dragging = true;
        self.set_position_x_pct(x_pct);
        self.set_position_y_pct(y_pct);
        self.redraw
            .schedule(self.style.position_x_pct, self.style.position_y_pct, now);
    }

    /// Renders the pending drag redraw if it is due at `now`.
    pub fn poll_redraw(&mut self, now: Instant, source: &RgbaImage) -> Option<Canvas> {
        self.redraw.take_due(now)?;
        self.render_preview(source)
    }

    /// Ends a drag and drops any pending redraw. The caller redraws the
    /// preview once with the final position.
    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.redraw.cancel();
    }

    pub fn has_pending_redraw(&self) -> bool {
        self.redraw.is_pending()
    }

    /// Renders every item onto its own copy of `source`.
    pub fn generate_all(&mut self, source: &RgbaImage) -> Vec<GeneratedImage> {
        batch::generate_all(self.font_system, source, &self.items, &self.style, &mut self.cache)
    }

    /// Renders and encodes every item, ready to be saved.
    pub fn export_all(&mut self, source: &RgbaImage) -> Vec<ExportedImage> {
        export::export_all(&self.generate_all(source))
    }
}
