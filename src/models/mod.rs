pub mod menu_item;
pub mod sample;

pub use menu_item::*;
pub use sample::sample_menu;

// Column names as they appear in the header row
pub const FIELD_NAME: &str = "Name";
pub const FIELD_CATEGORY: &str = "Category";
pub const FIELD_FLAVOR: &str = "Flavor";
pub const FIELD_DESCRIPTION: &str = "Description";
pub const FIELD_PHOTO: &str = "Photo";
pub const FIELD_PRICE: &str = "Price";

/// Fields every `MenuItem` needs, whatever the configured required set says.
pub const CORE_FIELDS: [&str; 3] = [FIELD_NAME, FIELD_CATEGORY, FIELD_FLAVOR];

pub const DEFAULT_SENTINEL_LABEL: &str = "All Categories";
