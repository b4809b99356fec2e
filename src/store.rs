use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::catalog::{build_index, CatalogIndex};
use crate::config::Config;
use crate::error::LoadError;
use crate::models::{sample_menu, MenuItem, DEFAULT_SENTINEL_LABEL};
use crate::normalizer::{DropReason, DroppedRow, Normalized};
use crate::query::{FilterPolicy, QueryEngine};

/// How the catalog is derived and queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    pub include_all_sentinel: bool,
    pub sentinel_label: String,
    pub filter_policy: FilterPolicy,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            include_all_sentinel: true,
            sentinel_label: DEFAULT_SENTINEL_LABEL.to_string(),
            filter_policy: FilterPolicy::Wildcard,
        }
    }
}

impl From<&Config> for CatalogOptions {
    fn from(config: &Config) -> Self {
        Self {
            include_all_sentinel: config.include_all_sentinel,
            sentinel_label: config.sentinel_label.clone(),
            filter_policy: config.filter_policy,
        }
    }
}

/// Published to subscribers whenever a load finishes.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Idle,
    Loaded {
        categories: Vec<String>,
        flavors_by_category: Vec<(String, Vec<String>)>,
        item_count: usize,
        dropped: usize,
    },
    Failed {
        message: String,
    },
}

/// A complete, immutable view of one successful load.
#[derive(Debug)]
pub struct MenuSnapshot {
    items: Vec<MenuItem>,
    index: CatalogIndex,
    source: String,
    dropped: usize,
    loaded_at: DateTime<Utc>,
    filter_policy: FilterPolicy,
}

impl MenuSnapshot {
    pub fn query(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.items, &self.index, self.filter_policy)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Ticket handed out when a load starts; only the newest one may install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Owns the current menu and its catalog.
///
/// The state is either unloaded or one `MenuSnapshot`, swapped as a whole.
/// Readers grab the `Arc` and keep a consistent view even if a reload
/// lands while they are working.
pub struct MenuStore {
    options: CatalogOptions,
    current: RwLock<Option<Arc<MenuSnapshot>>>,
    generation: AtomicU64,
    status: watch::Sender<LoadStatus>,
}

impl MenuStore {
    pub fn new(options: CatalogOptions) -> Self {
        let (status, _) = watch::channel(LoadStatus::Idle);
        Self {
            options,
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
            status,
        }
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> LoadStatus {
        self.status.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<Arc<MenuSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Start a load. Any load started earlier can no longer install.
    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Build the catalog for a finished load and swap it in.
    pub fn commit(
        &self,
        ticket: LoadTicket,
        source: &str,
        normalized: Normalized,
    ) -> Result<Arc<MenuSnapshot>, LoadError> {
        let index = build_index(
            &normalized.items,
            self.options.include_all_sentinel,
            &self.options.sentinel_label,
        );
        let snapshot = Arc::new(MenuSnapshot {
            items: normalized.items,
            index,
            source: source.to_string(),
            dropped: normalized.dropped.len(),
            loaded_at: Utc::now(),
            filter_policy: self.options.filter_policy,
        });

        // Status is published under the lock so subscribers see loads in install order
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(ticket) {
            warn!("Discarding menu from {}: a newer load was started", source);
            return Err(LoadError::Superseded);
        }
        *current = Some(snapshot.clone());
        self.status.send_replace(LoadStatus::Loaded {
            categories: snapshot.index.categories().to_vec(),
            flavors_by_category: snapshot
                .index
                .flavors_by_category()
                .map(|(category, flavors)| (category.to_string(), flavors.to_vec()))
                .collect(),
            item_count: snapshot.items.len(),
            dropped: snapshot.dropped,
        });
        drop(current);

        info!(
            "Menu data loaded from {}: {} items, {} categories",
            source,
            snapshot.items.len(),
            snapshot.index.categories().len()
        );

        Ok(snapshot)
    }

    /// Report a request that was turned away before any load started.
    ///
    /// Loads already in flight are unaffected and may still install.
    pub fn reject(&self, error: &LoadError) {
        let _current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        warn!("Menu request rejected: {}", error);
        self.status.send_replace(LoadStatus::Failed {
            message: error.user_message(),
        });
    }

    /// Report a failed load. The installed menu, if any, stays as it was.
    pub fn fail(&self, ticket: LoadTicket, error: &LoadError) {
        let _current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(ticket) {
            return;
        }
        warn!("Menu load failed: {}", error);
        self.status.send_replace(LoadStatus::Failed {
            message: error.user_message(),
        });
    }

    /// Install items built in code rather than parsed from a file.
    ///
    /// Items with a blank name, category or flavor are dropped and counted
    /// like rejected rows. Kept items have their core fields trimmed.
    pub fn install_items(
        &self,
        source: &str,
        items: Vec<MenuItem>,
    ) -> Result<Arc<MenuSnapshot>, LoadError> {
        let mut normalized = Normalized::default();
        for (idx, mut item) in items.into_iter().enumerate() {
            if let Some(field) = item.missing_field() {
                let row = idx + 1;
                debug!("Dropping menu item {} from {}: missing {}", row, source, field);
                normalized.dropped.push(DroppedRow {
                    row,
                    reason: DropReason::MissingField(field.to_string()),
                });
                continue;
            }
            item.name = item.name.trim().to_string();
            item.category = item.category.trim().to_string();
            item.flavor = item.flavor.trim().to_string();
            normalized.items.push(item);
        }

        let ticket = self.begin_load();
        self.commit(ticket, source, normalized)
    }

    pub fn load_sample(&self) -> Result<Arc<MenuSnapshot>, LoadError> {
        self.install_items("sample menu", sample_menu())
    }

    pub fn categories(&self) -> Vec<String> {
        self.snapshot()
            .map(|s| s.query().categories_available().to_vec())
            .unwrap_or_default()
    }

    pub fn flavors_for(&self, category: &str) -> Vec<String> {
        self.snapshot()
            .map(|s| s.query().flavors_for(category).to_vec())
            .unwrap_or_default()
    }

    pub fn filter(&self, category: &str, flavor: &str) -> Vec<MenuItem> {
        self.snapshot()
            .map(|s| s.query().filter(category, flavor).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn all_items(&self) -> Vec<MenuItem> {
        self.snapshot()
            .map(|s| s.items().to_vec())
            .unwrap_or_default()
    }
}

impl Default for MenuStore {
    fn default() -> Self {
        Self::new(CatalogOptions::default())
    }
}
