//! # Fude
//!
//! Fit-to-box text overlays for raster images.
//!
//! ## Overview
//!
//! `Fude` takes one source image, a list of short texts and a shared style,
//! and draws each text onto its own copy of the image. Every text is wrapped
//! and sized to the largest font that fits a box given in percentages of the
//! image. The core of the library is the [`FontSystem`], which coordinates
//! font loading, fitting and drawing; an [`EditorSession`] keeps the style,
//! the text items and the fit cache of one interactive editor.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fude::{EditorSession, FontSystem};
//!
//! // 1. Create a FontSystem
//! let font_system = FontSystem::new();
//! font_system.load_system_fonts();
//!
//! // 2. Set up a session
//! let mut session = EditorSession::new(&font_system);
//! session.set_text_input("Hello\nWorld Wide");
//! session.set_font_color("#ffffff");
//!
//! // 3. Render
//! let source = image::RgbaImage::new(800, 600);
//! let preview = session.render_preview(&source);
//! let files = session.export_all(&source);
//! ```
//!
//! ## Features
//!
//! *   **Fitting**: Greedy word wrap plus a descending font-size search, memoized per session.
//! *   **Drawing**: Alignment, drop shadow and a dashed guide box on an RGBA canvas.
//! *   **Font Management**: System fonts or custom font files, with sans-serif fallback.
//! *   **Thread Safety**: A `FontSystem` can be shared between sessions through internal locking.

pub mod batch;
pub mod export;
pub mod fit_cache;
pub mod font_storage;
pub mod font_system;
pub mod redraw;
pub mod renderer;
pub mod session;
pub mod style;
pub mod text;

// common re-exports
pub use batch::{GeneratedImage, generate_all};
pub use export::{ExportedImage, export_all, export_file_name};
pub use fit_cache::{FitCache, FitKey};
pub use font_storage::FontStorage;
pub use font_system::FontSystem;
pub use redraw::RedrawScheduler;
pub use renderer::Canvas;
pub use session::EditorSession;
pub use style::{StyleParams, TextAlign};
pub use text::{FitOptions, FitResult};

// re-export dependencies
pub use fontdb;
pub use fontdue;
pub use image;
pub use palette;
pub use parking_lot;
