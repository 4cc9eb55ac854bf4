//! Write-through collection editing.

use workbench_domain::collection::{
    add_variable, insert, remove, rename, set_auth, update_request,
};
use workbench_domain::{AuthConfig, Collection, DomainResult, Node, Request, Variable};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::CollectionStorage;

/// A single structural edit of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEdit {
    /// Adds a node under `parent_id`, or at the top level when `None`.
    Insert {
        /// Owning folder, or the collection id.
        parent_id: Option<String>,
        /// The folder or request to add.
        node: Node,
    },
    /// Deletes a node and its subtree.
    Remove {
        /// Node to delete.
        id: String,
    },
    /// Renames a node or the collection.
    Rename {
        /// Node to rename.
        id: String,
        /// New display name.
        name: String,
    },
    /// Replaces the authorization of a node or the collection.
    SetAuth {
        /// Target node, or the collection id.
        node_id: String,
        /// New authorization.
        auth: AuthConfig,
    },
    /// Replaces a request by id.
    UpdateRequest(Request),
    /// Appends a collection variable.
    AddVariable(Variable),
}

impl TreeEdit {
    fn apply(self, collection: &Collection) -> DomainResult<Collection> {
        match self {
            Self::Insert { parent_id, node } => insert(collection, parent_id.as_deref(), node),
            Self::Remove { id } => remove(collection, &id),
            Self::Rename { id, name } => rename(collection, &id, &name),
            Self::SetAuth { node_id, auth } => set_auth(collection, &node_id, auth),
            Self::UpdateRequest(request) => update_request(collection, request),
            Self::AddVariable(variable) => add_variable(collection, variable),
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Remove { .. } => "remove",
            Self::Rename { .. } => "rename",
            Self::SetAuth { .. } => "set_auth",
            Self::UpdateRequest(_) => "update_request",
            Self::AddVariable(_) => "add_variable",
        }
    }
}

/// Use case applying edits to a stored collection.
///
/// Each edit loads the latest snapshot, applies a pure tree operation and
/// writes the result back. Storage is only touched when the edit succeeds.
pub struct EditCollection<S: CollectionStorage> {
    storage: S,
}

impl<S: CollectionStorage> EditCollection<S> {
    /// Creates a new `EditCollection` use case.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Applies an edit and persists the new snapshot.
    ///
    /// # Errors
    ///
    /// - `CollectionNotFound` if no collection has this id
    /// - `Domain` if the tree operation rejects the edit
    /// - `Storage` if loading or saving fails
    pub async fn execute(&self, collection_id: &str, edit: TreeEdit) -> ApplicationResult<Collection> {
        let current = self
            .storage
            .get(collection_id)
            .await?
            .ok_or_else(|| ApplicationError::CollectionNotFound(collection_id.to_string()))?;

        let label = edit.label();
        let next = edit.apply(&current).inspect_err(|error| {
            tracing::debug!(collection_id, edit = label, %error, "edit rejected");
        })?;

        self.storage.put(&next).await?;
        tracing::debug!(collection_id, edit = label, "collection updated");
        Ok(next)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::StorageResult;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use workbench_domain::{DomainError, Folder, collection::find_request};

    #[derive(Default)]
    struct MockStorage {
        items: Mutex<BTreeMap<String, Collection>>,
        writes: Mutex<usize>,
    }

    impl MockStorage {
        fn with(collection: &Collection) -> Self {
            let storage = Self::default();
            storage
                .items
                .lock()
                .unwrap()
                .insert(collection.id.clone(), collection.clone());
            storage
        }

        fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }
    }

    impl CollectionStorage for MockStorage {
        async fn get(&self, id: &str) -> StorageResult<Option<Collection>> {
            Ok(self.items.lock().unwrap().get(id).cloned())
        }

        async fn get_all(&self) -> StorageResult<Vec<Collection>> {
            Ok(self.items.lock().unwrap().values().cloned().collect())
        }

        async fn put(&self, collection: &Collection) -> StorageResult<()> {
            *self.writes.lock().unwrap() += 1;
            self.items
                .lock()
                .unwrap()
                .insert(collection.id.clone(), collection.clone());
            Ok(())
        }

        async fn delete(&self, id: &str) -> StorageResult<()> {
            self.items.lock().unwrap().remove(id);
            Ok(())
        }
    }

    fn sample() -> (Collection, String) {
        let folder = Folder::new("users");
        let folder_id = folder.id.clone();
        (Collection::new("api").with_folder(folder), folder_id)
    }

    #[tokio::test]
    async fn test_insert_is_written_through() {
        let (collection, folder_id) = sample();
        let use_case = EditCollection::new(MockStorage::with(&collection));
        let request = Request::new("list");
        let request_id = request.id.clone();

        let updated = use_case
            .execute(
                &collection.id,
                TreeEdit::Insert {
                    parent_id: Some(folder_id),
                    node: Node::Request(request),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.request_count(), 1);
        let stored = use_case.storage().get(&collection.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
        assert!(find_request(&stored, &request_id).is_ok());
    }

    #[tokio::test]
    async fn test_rejected_edit_leaves_storage_untouched() {
        let (collection, _) = sample();
        let use_case = EditCollection::new(MockStorage::with(&collection));

        let error = use_case
            .execute(
                &collection.id,
                TreeEdit::Rename {
                    id: "missing".to_string(),
                    name: "x".to_string(),
                },
            )
            .await
            .unwrap_err();

        let ApplicationError::Domain(DomainError::NodeNotFound(id)) = error else {
            unreachable!("Expected NodeNotFound");
        };
        assert_eq!(id, "missing");
        assert_eq!(use_case.storage().writes(), 0);
        let stored = use_case.storage().get(&collection.id).await.unwrap().unwrap();
        assert_eq!(stored, collection);
    }

    #[tokio::test]
    async fn test_unknown_collection() {
        let use_case = EditCollection::new(MockStorage::default());
        let error = use_case
            .execute("nope", TreeEdit::Remove { id: "x".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(error, ApplicationError::CollectionNotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_sequential_edits_build_on_each_other() {
        let (collection, folder_id) = sample();
        let use_case = EditCollection::new(MockStorage::with(&collection));

        use_case
            .execute(
                &collection.id,
                TreeEdit::AddVariable(Variable::new("base", "https://api.test")),
            )
            .await
            .unwrap();
        use_case
            .execute(
                &collection.id,
                TreeEdit::SetAuth {
                    node_id: folder_id.clone(),
                    auth: AuthConfig::bearer("{{token}}"),
                },
            )
            .await
            .unwrap();
        let duplicate = use_case
            .execute(
                &collection.id,
                TreeEdit::AddVariable(Variable::new("base", "other")),
            )
            .await;

        assert!(matches!(
            duplicate,
            Err(ApplicationError::Domain(DomainError::DuplicateVariable(_)))
        ));
        let stored = use_case.storage().get(&collection.id).await.unwrap().unwrap();
        assert_eq!(stored.variables.len(), 1);
        assert_eq!(stored.folders[0].id, folder_id);
        assert_eq!(stored.folders[0].auth, Some(AuthConfig::bearer("{{token}}")));
        assert_eq!(use_case.storage().writes(), 2);
    }
}
