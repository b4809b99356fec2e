use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use tracing::warn;

use crate::models::MenuItem;

/// Distinct categories and per-category flavors, derived from a menu.
///
/// Everything is kept in first-seen order so the dropdowns come out the
/// same way on every load of the same file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogIndex {
    categories: Vec<String>,
    flavors_by_category: Vec<(String, Vec<String>)>,
    sentinel: Option<String>,
}

impl CatalogIndex {
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Flavors for a category, or an empty slice if the category is unknown.
    pub fn flavors_for(&self, category: &str) -> &[String] {
        self.flavors_by_category
            .iter()
            .find(|(key, _)| key == category)
            .map(|(_, flavors)| flavors.as_slice())
            .unwrap_or(&[])
    }

    pub fn flavors_by_category(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.flavors_by_category
            .iter()
            .map(|(category, flavors)| (category.as_str(), flavors.as_slice()))
    }

    pub fn sentinel(&self) -> Option<&str> {
        self.sentinel.as_deref()
    }

    pub fn is_sentinel(&self, category: &str) -> bool {
        self.sentinel.as_deref() == Some(category)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Build the index in one go from the current item set.
pub fn build_index(items: &[MenuItem], include_sentinel: bool, sentinel_label: &str) -> CatalogIndex {
    let sentinel = include_sentinel.then(|| sentinel_label.trim().to_string());

    let mut real_categories = distinct_in_order(items.iter().map(|item| item.category.trim()));
    if let Some(label) = &sentinel {
        if let Some(pos) = real_categories.iter().position(|c| c == label) {
            warn!(
                "Category '{}' collides with the all-categories entry and is folded into it",
                label
            );
            real_categories.remove(pos);
        }
    }

    let mut categories = Vec::with_capacity(real_categories.len() + 1);
    let mut flavors_by_category = Vec::with_capacity(real_categories.len() + 1);

    if let Some(label) = &sentinel {
        categories.push(label.clone());
        flavors_by_category.push((
            label.clone(),
            distinct_in_order(items.iter().map(|item| item.flavor.trim())),
        ));
    }

    for category in real_categories {
        let flavors = distinct_in_order(
            items
                .iter()
                .filter(|item| item.in_category(&category))
                .map(|item| item.flavor.trim()),
        );
        categories.push(category.clone());
        flavors_by_category.push((category, flavors));
    }

    CatalogIndex {
        categories,
        flavors_by_category,
        sentinel,
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

struct FlavorMap<'a>(&'a [(String, Vec<String>)]);

impl Serialize for FlavorMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, flavors) in self.0 {
            map.serialize_entry(category, flavors)?;
        }
        map.end()
    }
}

impl Serialize for CatalogIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CatalogIndex", 2)?;
        state.serialize_field("categories", &self.categories)?;
        state.serialize_field("flavorsByCategory", &FlavorMap(&self.flavors_by_category))?;
        state.end()
    }
}
