use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use super::{clean_key, Delimiter};
use crate::error::LoadError;

/// One data row as it came out of the tokenizer: header name to raw value,
/// in column order. Nothing is trimmed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl ParsedTable {
    /// Which of `required` are missing from the header row (after trimming).
    pub fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|column| !self.headers.iter().any(|h| clean_key(h) == column.trim()))
            .cloned()
            .collect()
    }
}

/// Tokenize delimited text with a header row.
///
/// Blank lines (including whitespace-only ones) are skipped. A row whose
/// field count differs from the header is a format error and aborts the
/// whole parse.
pub fn parse_delimited(text: &str, delimiter: Delimiter) -> Result<ParsedTable, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .delimiter(delimiter.as_byte())
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::Format {
            line: Some(1),
            message: "menu data has no header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        if record.iter().all(|field| field.trim().is_empty()) {
            debug!("Skipping blank line {:?}", record.position().map(|p| p.line()));
            continue;
        }

        if record.len() != headers.len() {
            let line = record.position().map(|p| p.line());
            return Err(LoadError::Format {
                line,
                message: format!(
                    "line {}: found {} fields, expected {}",
                    line.map(|l| l.to_string()).unwrap_or_else(|| "?".to_string()),
                    record.len(),
                    headers.len()
                ),
            });
        }

        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect(),
        );
    }

    Ok(ParsedTable { headers, rows })
}
