use std::time::Duration;

use crate::batch::GeneratedImage;

/// Gap between consecutive downloads of a batch.
pub const EXPORT_STAGGER: Duration = Duration::from_millis(200);

/// An encoded batch entry ready to be saved.
#[derive(Clone, Debug)]
pub struct ExportedImage {
    pub file_name: String,
    /// When to save this file, counted from the start of the export.
    pub delay: Duration,
    pub png: Vec<u8>,
}

/// `"{index + 1}-image-{text}.png"`, with path separators in `text` replaced by `_`.
pub fn export_file_name(index: usize, text: &str) -> String {
    let text: String = text
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}-image-{}.png", index + 1, text)
}

/// Delay before saving the file at `index`.
pub fn export_delay(index: usize) -> Duration {
    EXPORT_STAGGER * index as u32
}

/// Encodes every image as PNG, named and staggered by its source index.
///
/// Images that fail to encode are skipped with a warning.
pub fn export_all(images: &[GeneratedImage]) -> Vec<ExportedImage> {
    images
        .iter()
        .filter_map(|image| match image.canvas.encode_png() {
            Ok(png) => Some(ExportedImage {
                file_name: export_file_name(image.index, &image.text),
                delay: export_delay(image.index),
                png,
            }),
            Err(err) => {
                log::warn!("Failed to encode image {}: {}", image.index, err);
                None
            }
        })
        .collect()
}
