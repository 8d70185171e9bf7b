use std::collections::HashMap;

use crate::text::FitResult;

/// Everything a [`FitResult`] depends on.
///
/// Box dimensions are stored in pixels, already resolved against the target
/// surface, because the same percentages give different pixel sizes on
/// different images. Position is absent: moving the box never
/// changes how its text fits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FitKey {
    text: String,
    box_width_bits: u32,
    box_height_bits: u32,
    font_family: String,
}

impl FitKey {
    /// `text` must already be sanitized; the key reflects exactly what is measured.
    pub fn new(
        text: impl Into<String>,
        box_width_px: f32,
        box_height_px: f32,
        font_family: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            box_width_bits: normalize(box_width_px).to_bits(),
            box_height_bits: normalize(box_height_px).to_bits(),
            font_family: font_family.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn box_width_px(&self) -> f32 {
        f32::from_bits(self.box_width_bits)
    }

    pub fn box_height_px(&self) -> f32 {
        f32::from_bits(self.box_height_bits)
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }
}

// -0.0 and 0.0 must land on the same key.
fn normalize(value: f32) -> f32 {
    if value == 0.0 { 0.0 } else { value }
}

/// Memoized font-size search results for one editing session.
///
/// The cache has no notion of staleness. The owner calls [`FitCache::clear`]
/// whenever text items, box size or font family change; entries are never
/// evicted one by one.
#[derive(Default)]
pub struct FitCache {
    entries: HashMap<FitKey, FitResult, fxhash::FxBuildHasher>,
    /// Font set the entries were measured with. See [`FitCache::sync_font_generation`].
    font_generation: u64,
}

impl FitCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &FitKey) -> Option<&FitResult> {
        self.entries.get(key)
    }

    /// Returns the cached result for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(
        &mut self,
        key: FitKey,
        compute: impl FnOnce() -> FitResult,
    ) -> &FitResult {
        use std::collections::hash_map::Entry;

        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                log::trace!("fit cache hit for {:?}", entry.key().text());
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(compute()),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Clears the cache if it was filled under a different font generation.
    ///
    /// Family names stay the same when fonts are loaded, but the face they
    /// resolve to, and so every measured width, may not.
    pub fn sync_font_generation(&mut self, generation: u64) {
        if self.font_generation != generation {
            if !self.entries.is_empty() {
                log::debug!("Fonts changed, dropping {} cached fit(s).", self.entries.len());
            }
            self.entries.clear();
            self.font_generation = generation;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn result(size: u32) -> FitResult {
        FitResult {
            font_size_px: size,
            lines: vec!["x".into()],
        }
    }

    #[test]
    fn computes_once_per_key() {
        let mut cache = FitCache::new();
        let mut calls = 0;

        let key = FitKey::new("Hello", 640.0, 120.0, "Arial");
        let first = cache
            .get_or_insert_with(key.clone(), || {
                calls += 1;
                result(80)
            })
            .clone();
        let second = cache
            .get_or_insert_with(key, || {
                calls += 1;
                result(12)
            })
            .clone();

        assert_eq!(calls, 1);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn every_dependency_is_part_of_the_key() {
        let base = FitKey::new("Hello", 640.0, 120.0, "Arial");
        assert_ne!(base, FitKey::new("Hello!", 640.0, 120.0, "Arial"));
        assert_ne!(base, FitKey::new("Hello", 641.0, 120.0, "Arial"));
        assert_ne!(base, FitKey::new("Hello", 640.0, 119.5, "Arial"));
        assert_ne!(base, FitKey::new("Hello", 640.0, 120.0, "Verdana"));
        assert_eq!(base, FitKey::new("Hello", 640.0, 120.0, "Arial"));
        assert_eq!(FitKey::new("", -0.0, 0.0, ""), FitKey::new("", 0.0, -0.0, ""));
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = FitCache::new();
        cache.get_or_insert_with(FitKey::new("a", 1.0, 1.0, "f"), || result(12));
        cache.get_or_insert_with(FitKey::new("b", 1.0, 1.0, "f"), || result(12));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&FitKey::new("a", 1.0, 1.0, "f")).is_none());
    }

    #[test]
    fn font_generation_change_clears() {
        let mut cache = FitCache::new();
        cache.sync_font_generation(0);
        cache.get_or_insert_with(FitKey::new("a", 1.0, 1.0, "f"), || result(12));

        cache.sync_font_generation(0);
        assert_eq!(cache.len(), 1);

        cache.sync_font_generation(1);
        assert!(cache.is_empty());
    }
}
