pub mod canvas;
pub mod color;
pub mod glyph_cache;
pub mod text_box;

pub use canvas::{Canvas, CoverageMask, GuideBoxStyle, ShadowStyle};
pub use color::{Color, parse_color, parse_color_or_black};
pub use glyph_cache::{GlyphCache, GlyphKey, RasterGlyph};
pub use text_box::{PlacedLine, TextBox, draw_text_box};
