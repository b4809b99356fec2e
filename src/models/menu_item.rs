use serde::{Deserialize, Serialize};
use std::fmt;

use super::{FIELD_CATEGORY, FIELD_FLAVOR, FIELD_NAME};

// NewType so prices never get mixed up with other numbers
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Price(pub f64);

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// One validated row of the menu file.
///
/// Items reaching the store always have a non-blank `name`, `category` and
/// `flavor`; the normalizer and `MenuStore::install_items` drop the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MenuItem {
    pub name: String,
    pub category: String,
    pub flavor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

impl MenuItem {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        flavor: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            flavor: flavor.into(),
            description: None,
            photo: None,
            price: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(Price(price));
        self
    }

    /// First core field that is blank after trimming, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            (FIELD_NAME, &self.name),
            (FIELD_CATEGORY, &self.category),
            (FIELD_FLAVOR, &self.flavor),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.trim() == category
    }

    pub fn has_flavor(&self, flavor: &str) -> bool {
        self.flavor.trim() == flavor
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} / {}]", self.name, self.category, self.flavor)?;
        if let Some(price) = &self.price {
            write!(f, " {}", price)?;
        }
        Ok(())
    }
}
