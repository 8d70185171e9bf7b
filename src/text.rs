/// Font-size search over wrapped text.
pub mod fit;
/// Width measurement used by wrapping and fitting.
pub mod measure;
/// Decoding of HTML character references in user text.
pub mod sanitize;
/// Greedy word wrapping.
pub mod wrap;

pub use fit::{FitOptions, FitResult, fit};
pub use measure::{HeuristicMeasure, TextMeasure};
pub use sanitize::decode_entities;
pub use wrap::wrap;
