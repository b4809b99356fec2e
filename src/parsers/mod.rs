pub mod delimited;
pub mod delimiter;
pub mod price;

pub use delimited::*;
pub use delimiter::*;
pub use price::*;

/// Normalize a header name: strip a byte-order mark and surrounding whitespace.
pub fn clean_key(key: &str) -> String {
    key.trim_start_matches('\u{feff}').trim().to_string()
}

/// Normalize a field value by trimming surrounding whitespace.
pub fn clean_text(text: &str) -> String {
    text.trim().to_string()
}
