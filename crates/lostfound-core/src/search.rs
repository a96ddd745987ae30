// ── Ad-hoc item queries ──
//
// Stateless: the engine owns nothing and is handed its item source on
// every call. Used against catalog snapshots without re-querying the
// store, or delegated to the store's own search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RepoError;
use crate::model::{Category, Item, ReportType};
use crate::repository::ItemRepository;
use crate::store::Catalog;

/// Conjunctive filter. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring of name or description.
    pub text: Option<String>,
    pub category: Option<Category>,
    pub report_type: Option<ReportType>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_report_type(mut self, report_type: ReportType) -> Self {
        self.report_type = Some(report_type);
        self
    }

    /// Trimmed search text, or `None` when blank.
    pub fn text_term(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// `true` when no filter is set.
    pub fn is_unfiltered(&self) -> bool {
        self.text_term().is_none() && self.category.is_none() && self.report_type.is_none()
    }

    pub fn matches(&self, item: &Item) -> bool {
        let needle = self.text_term().map(str::to_lowercase);
        self.matches_with(item, needle.as_deref())
    }

    fn matches_with(&self, item: &Item, needle: Option<&str>) -> bool {
        if self.category.is_some_and(|c| c != item.category) {
            return false;
        }
        if self.report_type.is_some_and(|t| t != item.report_type) {
            return false;
        }
        match needle {
            None => true,
            Some(needle) => {
                item.name.to_lowercase().contains(needle)
                    || item.description.to_lowercase().contains(needle)
            }
        }
    }
}

/// Anything that can hand out an ordered sequence of items.
pub trait ItemSource {
    fn items(&self) -> Vec<Arc<Item>>;
}

impl ItemSource for Catalog {
    fn items(&self) -> Vec<Arc<Item>> {
        self.all_items()
    }
}

impl ItemSource for [Arc<Item>] {
    fn items(&self) -> Vec<Arc<Item>> {
        self.to_vec()
    }
}

impl ItemSource for Vec<Arc<Item>> {
    fn items(&self) -> Vec<Arc<Item>> {
        self.clone()
    }
}

/// Query evaluator over catalog snapshots or the backing store.
pub struct SearchEngine;

impl SearchEngine {
    /// Filter `source` by `query`, preserving the source's order.
    pub fn query<S: ItemSource + ?Sized>(source: &S, query: &SearchQuery) -> Vec<Arc<Item>> {
        let items = source.items();
        if query.is_unfiltered() {
            return items;
        }
        let needle = query.text_term().map(str::to_lowercase);
        items
            .into_iter()
            .filter(|item| query.matches_with(item, needle.as_deref()))
            .collect()
    }

    /// Run the same criteria against the store instead of the catalog.
    pub async fn query_repository(
        repository: &dyn ItemRepository,
        query: &SearchQuery,
    ) -> Result<Vec<Item>, RepoError> {
        repository.search(query).await
    }
}
