use super::{TextMeasure, wrap};

/// Bounds and step of the font-size search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitOptions {
    /// Smallest size ever returned. Text that does not fit at this size overflows.
    pub min_size_px: u32,
    /// First size tried.
    pub max_size_px: u32,
    /// Amount subtracted from the candidate size after each miss.
    pub step_px: u32,
    /// Line advance as a multiple of the font size.
    pub line_height_scale: f32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_size_px: 12,
            max_size_px: 200,
            step_px: 2,
            line_height_scale: 1.2,
        }
    }
}

impl FitOptions {
    pub fn line_height(&self, font_size_px: u32) -> f32 {
        font_size_px as f32 * self.line_height_scale
    }
}

/// Font size and line breaks chosen for one text in one box.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FitResult {
    pub font_size_px: u32,
    pub lines: Vec<String>,
}

impl FitResult {
    /// Height of the wrapped block with the given line height scale.
    pub fn block_height(&self, line_height_scale: f32) -> f32 {
        self.lines.len() as f32 * self.font_size_px as f32 * line_height_scale
    }
}

/// Finds the largest font size at which the wrapped text fits `max_height`.
///
/// Sizes are tried from `max_size_px` downwards in `step_px` decrements; the
/// first one whose block height (`lines * size * line_height_scale`) is within
/// `max_height` wins, so results depend on the step and not just on the
/// bounds. When nothing above `min_size_px` fits the wrap at `min_size_px`
/// is returned even if it overflows.
pub fn fit<M: TextMeasure + ?Sized>(
    text: &str,
    max_width: f32,
    max_height: f32,
    measure: &M,
    options: &FitOptions,
) -> FitResult {
    let step = options.step_px.max(1);
    let mut font_size_px = options.max_size_px;

    while font_size_px > options.min_size_px {
        let lines = wrap(text, max_width, font_size_px as f32, measure);
        let block_height = lines.len() as f32 * options.line_height(font_size_px);
        if block_height <= max_height {
            return FitResult {
                font_size_px,
                lines,
            };
        }
        font_size_px = font_size_px.saturating_sub(step);
    }

    FitResult {
        font_size_px: options.min_size_px,
        lines: wrap(text, max_width, options.min_size_px as f32, measure),
    }
}
