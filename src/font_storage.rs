use std::{collections::HashMap, path::PathBuf, sync::Arc};

/// Family name used when a requested family cannot be found.
pub const FALLBACK_FAMILY: &str = "sans-serif";

/// Installed families tried, in order, for the generic `sans-serif` family.
pub const SANS_SERIF_CANDIDATES: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Open Sans",
    "Roboto",
    "Verdana",
];

/// Installed families tried, in order, for the generic `serif` family.
pub const SERIF_CANDIDATES: &[&str] = &[
    "Times New Roman",
    "Times",
    "Liberation Serif",
    "DejaVu Serif",
    "Noto Serif",
    "Georgia",
];

/// Installed families tried, in order, for the generic `monospace` family.
pub const MONOSPACE_CANDIDATES: &[&str] = &[
    "Courier New",
    "Courier",
    "Liberation Mono",
    "DejaVu Sans Mono",
    "Noto Sans Mono",
    "Menlo",
    "Consolas",
];

/// A face picked for a family request, together with the name it was found under.
#[derive(Clone)]
pub struct ResolvedFont {
    pub id: fontdb::ID,
    pub font: Arc<fontdue::Font>,
    /// The family name that matched. Differs from the request when a fallback was used.
    pub family: String,
    pub is_fallback: bool,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("id", &self.id)
            .field("family", &self.family)
            .field("is_fallback", &self.is_fallback)
            .finish()
    }
}

/// Font database plus lazily parsed faces.
///
/// `fontdb` knows which faces exist and where their bytes live; `fontdue`
/// faces are only parsed the first time a family resolves to them.
pub struct FontStorage {
    font_db: fontdb::Database,
    /// Not all faces in `font_db` are necessarily parsed here.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates an empty storage. Call one of the `load_*` methods before resolving families.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading fonts into fontdb.
impl FontStorage {
    /// Loads a font from binary data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
        self.assign_generic_families();
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)?;
        self.assign_generic_families();
        Ok(())
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir);
        self.assign_generic_families();
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
        self.assign_generic_families();
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Returns the number of known faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }

    /// Sets the family name used for the "sans-serif" generic family, and so for fallbacks.
    ///
    /// Kept across later loads as long as the family is installed.
    pub fn set_sans_serif_family(&mut self, family: impl Into<String>) {
        self.font_db.set_sans_serif_family(family);
    }

    /// Checks if any loaded face belongs to `family` (ASCII case-insensitive).
    pub fn has_family(&self, family: &str) -> bool {
        self.font_db.faces().any(|face| {
            face.families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(family))
        })
    }

    /// Points each generic family that names an uninstalled family at the
    /// first installed candidate. `fontdb` defaults to Arial, Times New Roman
    /// and Courier New, which many Linux hosts lack.
    fn assign_generic_families(&mut self) {
        let generics: [(fontdb::Family<'static>, &[&str]); 3] = [
            (fontdb::Family::SansSerif, SANS_SERIF_CANDIDATES),
            (fontdb::Family::Serif, SERIF_CANDIDATES),
            (fontdb::Family::Monospace, MONOSPACE_CANDIDATES),
        ];

        for (generic, candidates) in generics {
            let current = self.font_db.family_name(&generic).to_string();
            if self.has_family(&current) {
                continue;
            }
            let Some(installed) = candidates.iter().find(|name| self.has_family(name)) else {
                continue;
            };

            log::debug!("{:?} family {:?} is not installed, using {:?}.", generic, current, installed);
            let installed = installed.to_string();
            match generic {
                fontdb::Family::SansSerif => self.font_db.set_sans_serif_family(installed),
                fontdb::Family::Serif => self.font_db.set_serif_family(installed),
                _ => self.font_db.set_monospace_family(installed),
            }
        }
    }
}

/// Family resolution.
impl FontStorage {
    /// Resolves a CSS-style family name to a parsed face.
    ///
    /// Generic names (`sans-serif`, `serif`, `monospace`, `cursive`, `fantasy`)
    /// map to the matching `fontdb` generic family. An unknown family falls
    /// back to sans-serif, then to [`SANS_SERIF_CANDIDATES`], and then to the
    /// first face that parses. `None` means no usable face is loaded at all.
    pub fn resolve_family(&mut self, family: &str) -> Option<ResolvedFont> {
        let requested = family.trim().trim_matches(|c| c == '"' || c == '\'');

        if !requested.is_empty()
            && let Some(resolved) = self.query_family(generic_family(requested), false)
        {
            return Some(resolved);
        }

        log::warn!(
            "Font family {:?} is not available, falling back to {}.",
            requested,
            FALLBACK_FAMILY
        );

        if let Some(resolved) = self.query_family(fontdb::Family::SansSerif, true) {
            return Some(resolved);
        }

        let candidate = SANS_SERIF_CANDIDATES
            .iter()
            .find_map(|name| self.query_family(fontdb::Family::Name(name), true));
        if candidate.is_some() {
            return candidate;
        }

        let ids: Vec<fontdb::ID> = self.font_db.faces().map(|face| face.id).collect();
        ids.into_iter().find_map(|id| {
            let font = self.font(id)?;
            let family = self.family_of(id);
            Some(ResolvedFont {
                id,
                font,
                family,
                is_fallback: true,
            })
        })
    }

    fn query_family(&mut self, family: fontdb::Family<'_>, is_fallback: bool) -> Option<ResolvedFont> {
        let families = [family];
        let query = fontdb::Query {
            families: &families,
            ..Default::default()
        };
        let id = self.font_db.query(&query)?;
        let font = self.font(id)?;
        Some(ResolvedFont {
            id,
            font,
            family: self.family_of(id),
            is_fallback,
        })
    }

    fn family_of(&self, id: fontdb::ID) -> String {
        self.font_db
            .face(id)
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .unwrap_or_default()
    }

    /// Retrieves a parsed face by ID, parsing it on first use.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            ..Default::default()
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => Some(Arc::clone(entry.insert(Arc::new(font)))),
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }
}

fn generic_family(name: &str) -> fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "sans-serif" => fontdb::Family::SansSerif,
        "serif" => fontdb::Family::Serif,
        "monospace" => fontdb::Family::Monospace,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        _ => fontdb::Family::Name(name),
    }
}
