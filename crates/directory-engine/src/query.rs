//! Read-side operations consumed by the directory's pages: featured
//! listings, record lookup, keyword search.

use std::sync::Arc;

use crate::record::Winery;
use crate::store::DirectoryStore;

/// Stateless read façade over an injected store handle.
pub struct DirectoryQuery {
    store: Arc<DirectoryStore>,
}

impl DirectoryQuery {
    pub fn new(store: Arc<DirectoryStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` featured records, in store-native order.
    pub async fn list_featured(&self, limit: usize) -> Vec<Winery> {
        self.store
            .scan()
            .await
            .into_iter()
            .filter(|w| w.featured)
            .take(limit)
            .collect()
    }

    /// Fetch one record by id. `None` is a normal outcome the caller is
    /// expected to handle, typically as a not-found page.
    pub async fn get_by_id(&self, id: &str) -> Option<Winery> {
        self.store.get(id).await
    }

    /// Case-insensitive substring search over name, city, state and
    /// description.
    ///
    /// Scans the whole collection and filters in memory, so cost is linear
    /// in collection size per call. An empty term matches every record.
    pub async fn search_by_keyword(&self, term: &str) -> Vec<Winery> {
        let needle = term.to_lowercase();
        self.store
            .scan()
            .await
            .into_iter()
            .filter(|w| {
                [&w.name, &w.city, &w.state, &w.description]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }
}
