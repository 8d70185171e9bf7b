use std::{collections::HashMap, sync::Arc};

use crate::font_storage::ResolvedFont;

/// Font sizes are stored as fixed point with this many steps per pixel.
pub const SIZE_QUANTIZE: f32 = 64f32;

/// Identifies one rasterization: face, glyph index and pixel size.
///
/// Face IDs come from `fontdb` and are only stable within one process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    font_id: fontdb::ID,
    glyph_index: u16,
    size_fixed: u32,
}

impl GlyphKey {
    pub fn new(font_id: fontdb::ID, glyph_index: u16, font_size: f32) -> Self {
        Self {
            font_id,
            glyph_index,
            size_fixed: (font_size.max(0.0) * SIZE_QUANTIZE).round() as u32,
        }
    }

    pub fn glyph_index(&self) -> u16 {
        self.glyph_index
    }

    pub fn font_size(&self) -> f32 {
        self.size_fixed as f32 / SIZE_QUANTIZE
    }
}

/// Coverage bitmap of one glyph plus the metrics needed to place it.
pub struct RasterGlyph {
    pub metrics: fontdue::Metrics,
    /// Row-major, `metrics.width * metrics.height` bytes.
    pub coverage: Vec<u8>,
}

/// Rasterized glyphs shared by every surface drawn with the same face and size.
///
/// Batch generation draws the same style on many images, so most glyphs
/// repeat. The cache is dropped wholesale once it holds `capacity` glyphs.
pub struct GlyphCache {
    glyphs: HashMap<GlyphKey, Arc<RasterGlyph>, fxhash::FxBuildHasher>,
    capacity: usize,
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new(4096)
    }
}

impl GlyphCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            glyphs: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn clear(&mut self) {
        self.glyphs.clear();
    }

    /// Returns the raster for `glyph_index` of `font` at `font_size`, rasterizing on a miss.
    pub fn get(&mut self, font: &ResolvedFont, glyph_index: u16, font_size: f32) -> Arc<RasterGlyph> {
        let key = GlyphKey::new(font.id, glyph_index, font_size);
        if let Some(glyph) = self.glyphs.get(&key) {
            return Arc::clone(glyph);
        }

        if self.glyphs.len() >= self.capacity {
            log::debug!("Glyph cache reached {} entries, clearing.", self.capacity);
            self.glyphs.clear();
        }

        let (metrics, coverage) = font.font.rasterize_indexed(key.glyph_index(), key.font_size());
        let glyph = Arc::new(RasterGlyph { metrics, coverage });
        self.glyphs.insert(key, Arc::clone(&glyph));
        glyph
    }
}
