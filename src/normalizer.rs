use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

use crate::models::{
    MenuItem, Price, CORE_FIELDS, FIELD_CATEGORY, FIELD_DESCRIPTION, FIELD_FLAVOR, FIELD_NAME,
    FIELD_PHOTO, FIELD_PRICE,
};
use crate::parsers::{clean_key, clean_text, parse_number, RawRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    MissingField(String),
    InvalidNumber(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::MissingField(field) => write!(f, "missing {}", field),
            DropReason::InvalidNumber(field) => write!(f, "{} is not a number", field),
        }
    }
}

/// A row that was left out, with its 1-based position among the data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    pub row: usize,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub items: Vec<MenuItem>,
    pub dropped: Vec<DroppedRow>,
}

/// Which columns must be present and which must hold numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    required: Vec<String>,
    numeric: Vec<String>,
}

impl FieldRules {
    /// The core fields are always required, whatever `required` says.
    pub fn new(required: &[String], numeric: &[String]) -> Self {
        let mut all_required: Vec<String> = CORE_FIELDS.iter().map(|f| f.to_string()).collect();
        for field in required.iter().map(|f| clean_key(f)) {
            if !field.is_empty() && !all_required.contains(&field) {
                all_required.push(field);
            }
        }

        let mut all_numeric = Vec::new();
        for field in numeric.iter().map(|f| clean_key(f)) {
            if !field.is_empty() && !all_numeric.contains(&field) {
                all_numeric.push(field);
            }
        }

        Self {
            required: all_required,
            numeric: all_numeric,
        }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn numeric(&self) -> &[String] {
        &self.numeric
    }
}

impl Default for FieldRules {
    fn default() -> Self {
        Self::new(&[], &[FIELD_PRICE.to_string()])
    }
}

/// Turn raw rows into menu items, dropping every row that fails validation.
///
/// Never fails: an unusable row is left out entirely and reported in
/// `Normalized::dropped`.
pub fn normalize(rows: &[RawRow], rules: &FieldRules) -> Normalized {
    let mut normalized = Normalized::default();

    for (idx, row) in rows.iter().enumerate() {
        let row_number = idx + 1;
        match normalize_row(row, rules) {
            Ok(item) => normalized.items.push(item),
            Err(reason) => {
                debug!("Dropping menu row {}: {}", row_number, reason);
                normalized.dropped.push(DroppedRow {
                    row: row_number,
                    reason,
                });
            }
        }
    }

    if !normalized.dropped.is_empty() {
        info!(
            "Kept {} menu items, dropped {} invalid rows",
            normalized.items.len(),
            normalized.dropped.len()
        );
    }

    normalized
}

fn normalize_row(row: &RawRow, rules: &FieldRules) -> Result<MenuItem, DropReason> {
    // Later columns win when two headers trim to the same name
    let mut fields: HashMap<String, String> = HashMap::with_capacity(row.len());
    for (key, value) in row.iter() {
        fields.insert(clean_key(key), clean_text(value));
    }

    for field in rules.required() {
        if fields.get(field).map_or(true, |v| v.is_empty()) {
            return Err(DropReason::MissingField(field.clone()));
        }
    }

    for field in rules.numeric() {
        if let Some(value) = fields.get(field) {
            if !value.is_empty() && parse_number(value).is_none() {
                return Err(DropReason::InvalidNumber(field.clone()));
            }
        }
    }

    let mut take = |name: &str| fields.remove(name).filter(|v| !v.is_empty());

    let name = take(FIELD_NAME).ok_or_else(|| DropReason::MissingField(FIELD_NAME.to_string()))?;
    let category =
        take(FIELD_CATEGORY).ok_or_else(|| DropReason::MissingField(FIELD_CATEGORY.to_string()))?;
    let flavor =
        take(FIELD_FLAVOR).ok_or_else(|| DropReason::MissingField(FIELD_FLAVOR.to_string()))?;

    Ok(MenuItem {
        name,
        category,
        flavor,
        description: take(FIELD_DESCRIPTION),
        photo: take(FIELD_PHOTO),
        price: take(FIELD_PRICE).and_then(|p| parse_number(&p)).map(Price),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn names(normalized: &Normalized) -> Vec<&str> {
        normalized.items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn trims_keys_and_values() {
        let rows = vec![row(&[
            (" Name ", "  Espresso "),
            ("Category ", "Beverage\t"),
            (" Flavor", " Strong"),
            ("Description", "  Short and dark. "),
        ])];

        let normalized = normalize(&rows, &FieldRules::default());

        assert_eq!(
            normalized.items,
            vec![MenuItem::new("Espresso", "Beverage", "Strong").with_description("Short and dark.")]
        );
        assert!(normalized.dropped.is_empty());
    }

    #[test]
    fn drops_rows_missing_core_fields() {
        let rows = vec![
            row(&[("Name", "X"), ("Category", ""), ("Flavor", "A")]),
            row(&[("Name", "   "), ("Category", "Food"), ("Flavor", "Savory")]),
            row(&[("Name", "Tea"), ("Category", "Beverage")]),
            row(&[("Name", "Pizza"), ("Category", "Food"), ("Flavor", "Savory")]),
        ];

        let normalized = normalize(&rows, &FieldRules::default());

        assert_eq!(names(&normalized), vec!["Pizza"]);
        assert_eq!(
            normalized.dropped,
            vec![
                DroppedRow { row: 1, reason: DropReason::MissingField("Category".into()) },
                DroppedRow { row: 2, reason: DropReason::MissingField("Name".into()) },
                DroppedRow { row: 3, reason: DropReason::MissingField("Flavor".into()) },
            ]
        );
    }

    #[test]
    fn extra_required_fields_are_enforced() {
        let rules = FieldRules::new(&["Description".to_string()], &[]);
        let rows = vec![
            row(&[("Name", "Tea"), ("Category", "Beverage"), ("Flavor", "Mild"), ("Description", "")]),
            row(&[("Name", "Soup"), ("Category", "Food"), ("Flavor", "Warm"), ("Description", "Hot")]),
        ];

        let normalized = normalize(&rows, &rules);

        assert_eq!(names(&normalized), vec!["Soup"]);
        assert_eq!(
            normalized.dropped[0].reason,
            DropReason::MissingField("Description".into())
        );
    }

    #[test]
    fn numeric_fields_must_parse() {
        let rows = vec![
            row(&[("Name", "Tea"), ("Category", "Beverage"), ("Flavor", "Mild"), ("Price", " 2.50 ")]),
            row(&[("Name", "Cake"), ("Category", "Dessert"), ("Flavor", "Sweet"), ("Price", "cheap")]),
            row(&[("Name", "Water"), ("Category", "Beverage"), ("Flavor", "Plain"), ("Price", "")]),
        ];

        let normalized = normalize(&rows, &FieldRules::default());

        assert_eq!(names(&normalized), vec!["Tea", "Water"]);
        assert_eq!(normalized.items[0].price, Some(Price(2.5)));
        assert_eq!(normalized.items[1].price, None);
        assert_eq!(
            normalized.dropped,
            vec![DroppedRow { row: 2, reason: DropReason::InvalidNumber("Price".into()) }]
        );
    }

    #[test]
    fn unchecked_price_is_best_effort() {
        let rules = FieldRules::new(&[], &[]);
        let rows = vec![row(&[
            ("Name", "Cake"),
            ("Category", "Dessert"),
            ("Flavor", "Sweet"),
            ("Price", "ask staff"),
        ])];

        let normalized = normalize(&rows, &rules);

        assert_eq!(normalized.items.len(), 1);
        assert_eq!(normalized.items[0].price, None);
    }

    #[test]
    fn later_duplicate_header_wins() {
        let rows = vec![row(&[
            ("Name", "Old"),
            ("Category", "Food"),
            ("Flavor", "Savory"),
            (" Name", "New"),
        ])];

        let normalized = normalize(&rows, &FieldRules::default());
        assert_eq!(names(&normalized), vec!["New"]);
    }

    #[test]
    fn optional_blank_fields_become_none() {
        let rows = vec![row(&[
            ("Name", "Tea"),
            ("Category", "Beverage"),
            ("Flavor", "Mild"),
            ("Description", "  "),
            ("Photo", " img/tea.jpg "),
        ])];

        let normalized = normalize(&rows, &FieldRules::default());
        let item = &normalized.items[0];

        assert_eq!(item.description, None);
        assert_eq!(item.photo.as_deref(), Some("img/tea.jpg"));
    }

    #[test]
    fn rules_always_include_core_fields() {
        let rules = FieldRules::new(&[" Description ".to_string(), "Name".to_string()], &[]);
        assert_eq!(rules.required(), &["Name", "Category", "Flavor", "Description"]);
    }
}
