use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[€$£]?\s*([+-]?(?:\d+(?:[.,]\d*)?|[.,]\d+)(?:[eE][+-]?\d+)?)\s*(?:€|\$|£|EUR|USD)?$")
        .expect("Invalid number regex")
});

/// Coerce a trimmed field value into a finite number.
///
/// Accepts an optional currency symbol on either side and a single decimal
/// comma (`3,50`). Returns `None` for anything else, including blanks.
pub fn parse_number(text: &str) -> Option<f64> {
    let captures = NUMBER_REGEX.captures(text.trim())?;
    let numeric = captures.get(1)?.as_str().replace(',', ".");

    numeric.parse::<f64>().ok().filter(|value| value.is_finite())
}
