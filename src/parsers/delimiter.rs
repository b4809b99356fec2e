use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field separator used by a menu file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Semicolon => write!(f, "semicolon"),
        }
    }
}

/// Configured delimiter: fixed, or guessed from the source name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimiterSetting {
    #[default]
    Auto,
    Comma,
    Semicolon,
}

impl DelimiterSetting {
    pub fn resolve(self, source_label: &str, semicolon_marker: &str) -> Delimiter {
        match self {
            DelimiterSetting::Comma => Delimiter::Comma,
            DelimiterSetting::Semicolon => Delimiter::Semicolon,
            DelimiterSetting::Auto => detect_delimiter(source_label, semicolon_marker),
        }
    }
}

impl FromStr for DelimiterSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(DelimiterSetting::Auto),
            "comma" | "," => Ok(DelimiterSetting::Comma),
            "semicolon" | ";" => Ok(DelimiterSetting::Semicolon),
            other => Err(format!(
                "unknown delimiter '{}', expected auto, comma or semicolon",
                other
            )),
        }
    }
}

/// Pick a delimiter from the file name alone.
///
/// Files whose name contains the marker are known to be semicolon
/// separated; everything else is assumed to be comma separated. The file
/// content is never inspected.
pub fn detect_delimiter(source_label: &str, semicolon_marker: &str) -> Delimiter {
    let marker = semicolon_marker.trim().to_lowercase();
    if marker.is_empty() {
        return Delimiter::Comma;
    }

    let file_name = source_label
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if file_name.contains(&marker) {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}
