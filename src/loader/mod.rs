use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

use crate::config::Config;
use crate::error::LoadError;
use crate::normalizer::{normalize, FieldRules, Normalized};
use crate::parsers::{parse_delimited, Delimiter};
use crate::store::{MenuSnapshot, MenuStore};
use crate::utils::http::{create_client, RetryPolicy};

mod sources;

pub use sources::{FileSource, UploadSource, UrlSource};

/// Somewhere a menu file can be read from.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_text(&self) -> Result<String, LoadError>;
    /// File name, path or URL; also used for delimiter detection.
    fn label(&self) -> &str;

    /// Checks that can turn a request away before anything is read.
    fn validate(&self) -> Result<(), LoadError> {
        Ok(())
    }
}

/// Parse, check and normalize raw menu text.
///
/// Structural and header problems abort with an error; bad rows are only
/// dropped.
pub fn parse_menu(text: &str, delimiter: Delimiter, rules: &FieldRules) -> Result<Normalized, LoadError> {
    let table = parse_delimited(text, delimiter)?;

    let missing = table.missing_columns(rules.required());
    if !missing.is_empty() {
        return Err(LoadError::Schema { missing });
    }

    Ok(normalize(&table.rows, rules))
}

/// Runs loads from any `MenuSource` into a `MenuStore`.
pub struct MenuLoader {
    config: Arc<Config>,
    client: Client,
    rules: FieldRules,
}

impl MenuLoader {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = create_client(&config)?;
        let rules = FieldRules::new(&config.required_fields, &config.numeric_fields);
        Ok(Self {
            config,
            client,
            rules,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// File path or http(s) URL to a source.
    pub fn source_for(&self, location: &str) -> Box<dyn MenuSource> {
        let location = location.trim();
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Box::new(UrlSource::new(
                url,
                self.client.clone(),
                RetryPolicy::from(self.config.as_ref()),
            )),
            _ => Box::new(FileSource::new(location)),
        }
    }

    pub fn delimiter_for(&self, source: &dyn MenuSource) -> Delimiter {
        self.config
            .delimiter
            .resolve(source.label(), &self.config.semicolon_marker)
    }

    /// Load one source into the store.
    ///
    /// On success the new menu replaces the old one in a single swap. On
    /// failure the store keeps whatever it had and subscribers get a
    /// `Failed` status. A source that fails `validate` never starts a load,
    /// so it cannot supersede one already running.
    pub async fn load(
        &self,
        store: &MenuStore,
        source: &dyn MenuSource,
    ) -> Result<Arc<MenuSnapshot>, LoadError> {
        if let Err(e) = source.validate() {
            error!("Rejected menu source {}: {}", source.label(), e);
            store.reject(&e);
            return Err(e);
        }

        let ticket = store.begin_load();

        match self.read(source).await {
            Ok(normalized) => store.commit(ticket, source.label(), normalized),
            Err(e) => {
                error!("Error loading menu data from {}: {}", source.label(), e);
                store.fail(ticket, &e);
                Err(e)
            }
        }
    }

    pub async fn load_location(
        &self,
        store: &MenuStore,
        location: &str,
    ) -> Result<Arc<MenuSnapshot>, LoadError> {
        let source = self.source_for(location);
        self.load(store, source.as_ref()).await
    }

    async fn read(&self, source: &dyn MenuSource) -> Result<Normalized, LoadError> {
        let text = source.fetch_text().await?;
        let delimiter = self.delimiter_for(source);
        info!("Parsing {} as {}-separated text", source.label(), delimiter);

        parse_menu(&text, delimiter, &self.rules)
    }
}
