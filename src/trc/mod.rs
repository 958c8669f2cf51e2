mod encoder;
mod format;

pub use encoder::TrcEncoder;
pub use format::{format_significant, SIGNIFICANT_DIGITS};
