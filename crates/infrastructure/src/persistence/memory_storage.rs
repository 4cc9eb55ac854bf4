//! In-memory collection storage.

use std::collections::BTreeMap;

use tokio::sync::RwLock;
use workbench_application::ports::{CollectionStorage, StorageResult};
use workbench_domain::Collection;

/// Keeps snapshots in a map. Last write wins; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    collections: RwLock<BTreeMap<String, Collection>>,
}

impl InMemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-filled with `collections`.
    #[must_use]
    pub fn with_collections(collections: impl IntoIterator<Item = Collection>) -> Self {
        Self {
            collections: RwLock::new(
                collections
                    .into_iter()
                    .map(|collection| (collection.id.clone(), collection))
                    .collect(),
            ),
        }
    }
}

impl CollectionStorage for InMemoryStorage {
    async fn get(&self, id: &str) -> StorageResult<Option<Collection>> {
        Ok(self.collections.read().await.get(id).cloned())
    }

    async fn get_all(&self) -> StorageResult<Vec<Collection>> {
        Ok(self.collections.read().await.values().cloned().collect())
    }

    async fn put(&self, collection: &Collection) -> StorageResult<()> {
        self.collections
            .write()
            .await
            .insert(collection.id.clone(), collection.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.collections.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn named(id: &str, name: &str) -> Collection {
        let mut collection = Collection::new(name);
        collection.id = id.to_string();
        collection
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let storage = InMemoryStorage::new();
        storage.put(&named("a", "one")).await.unwrap();
        storage.put(&named("a", "two")).await.unwrap();

        assert_eq!(storage.get("a").await.unwrap().unwrap().name, "two");
        assert_eq!(storage.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_all_orders_by_id() {
        let storage = InMemoryStorage::with_collections([named("b", "B"), named("a", "A")]);
        let names: Vec<_> = storage
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_ok() {
        let storage = InMemoryStorage::with_collections([named("a", "A")]);
        storage.delete("missing").await.unwrap();
        storage.delete("a").await.unwrap();
        assert_eq!(storage.get("a").await.unwrap(), None);
    }
}
