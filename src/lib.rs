//! Menu recommendations from a delimited menu file.
//!
//! A load reads the file, drops unusable rows, and derives the category
//! list and the flavors offered per category. Queries then answer "which
//! categories", "which flavors for this category" and "which items match
//! this category and flavor".

pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod normalizer;
pub mod parsers;
pub mod query;
pub mod store;
pub mod utils;

pub use catalog::{build_index, CatalogIndex};
pub use config::{Config, ConfigOverrides};
pub use error::LoadError;
pub use loader::{parse_menu, FileSource, MenuLoader, MenuSource, UploadSource, UrlSource};
pub use models::{MenuItem, Price};
pub use normalizer::{normalize, DropReason, DroppedRow, FieldRules, Normalized};
pub use parsers::{Delimiter, DelimiterSetting, RawRow};
pub use query::{FilterPolicy, QueryEngine};
pub use store::{CatalogOptions, LoadStatus, MenuSnapshot, MenuStore};
