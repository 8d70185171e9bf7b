//! Renders a small batch onto an image and writes one PNG per text line.
//!
//! ```text
//! cargo run --example batch_overlay -- [source.png] [output-dir]
//! ```
//!
//! Without a source image a gradient is generated.

use std::path::PathBuf;

use fude::{
    EditorSession, FontSystem, TextAlign,
    image::{self, Rgba, RgbaImage},
};

const TEXT: &str = "Hello\n\
                    World Wide\n\
                    Fish &amp; Chips &copy; 2024\n\
                    A considerably longer caption that has to wrap over several lines";

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width) as u8;
        let b = (y * 255 / height) as u8;
        Rgba([r, 64, b, 255])
    })
}

#[allow(clippy::unwrap_used)]
fn main() {
    let mut args = std::env::args().skip(1);
    let source = match args.next() {
        Some(path) => image::open(&path).unwrap().to_rgba8(),
        None => gradient(800, 600),
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "target/batch_overlay".to_string()));
    std::fs::create_dir_all(&out_dir).unwrap();

    let font_system = FontSystem::new();
    font_system.load_system_fonts();
    println!("Loaded {} font face(s).", font_system.len());

    let mut session = EditorSession::new(&font_system);
    session.set_text_input(TEXT);
    session.set_font_family("Arial");
    session.set_font_color("#ffffff");
    session.set_text_align(TextAlign::Center);
    session.set_box_width_pct(80.0);
    session.set_box_height_pct(20.0);

    if let Some(preview) = session.render_preview(&source) {
        preview.into_image().save(out_dir.join("preview.png")).unwrap();
    }

    for file in session.export_all(&source) {
        let path = out_dir.join(&file.file_name);
        std::fs::write(&path, &file.png).unwrap();
        println!("{} (+{:?})", path.display(), file.delay);
    }
}
