//! File system backed collection storage.
//!
//! Every collection is one deterministic JSON document at `<dir>/<id>.json`.

use std::path::{Path, PathBuf};

use workbench_application::ports::{CollectionStorage, FileSystem, StorageError, StorageResult};
use workbench_domain::Collection;

use crate::serialization::{from_json, to_json_stable_bytes};

const EXTENSION: &str = "json";

/// Stores collections as JSON files in one directory.
pub struct FileCollectionStorage<F: FileSystem> {
    fs: F,
    dir: PathBuf,
}

impl<F: FileSystem> FileCollectionStorage<F> {
    /// Creates a storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(fs: F, dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dir: dir.into(),
        }
    }

    /// The directory holding the snapshots.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> StorageResult<PathBuf> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
        if !safe {
            return Err(StorageError::Encode {
                id: id.to_string(),
                message: "id is not usable as a file name".to_string(),
            });
        }
        Ok(self.dir.join(format!("{id}.{EXTENSION}")))
    }

    async fn load(&self, path: &Path, id: &str) -> StorageResult<Collection> {
        let raw = self.fs.read_file_string(path).await?;
        from_json(&raw).map_err(|e| StorageError::Corrupt {
            id: id.to_string(),
            message: e.to_string(),
        })
    }
}

impl<F: FileSystem> CollectionStorage for FileCollectionStorage<F> {
    async fn get(&self, id: &str) -> StorageResult<Option<Collection>> {
        let path = self.path_for(id)?;
        if !self.fs.exists(&path).await {
            return Ok(None);
        }
        self.load(&path, id).await.map(Some)
    }

    async fn get_all(&self) -> StorageResult<Vec<Collection>> {
        if !self.fs.exists(&self.dir).await {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = self
            .fs
            .read_dir(&self.dir)
            .await?
            .into_iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == EXTENSION))
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut collections = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            collections.push(self.load(&path, &name).await?);
        }
        tracing::debug!(dir = %self.dir.display(), count = collections.len(), "collections loaded");
        Ok(collections)
    }

    async fn put(&self, collection: &Collection) -> StorageResult<()> {
        let path = self.path_for(&collection.id)?;
        let bytes = to_json_stable_bytes(collection).map_err(|e| StorageError::Encode {
            id: collection.id.clone(),
            message: e.to_string(),
        })?;
        self.fs.write_file(&path, &bytes).await?;
        tracing::debug!(collection_id = %collection.id, path = %path.display(), "collection saved");
        Ok(())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let path = self.path_for(id)?;
        if !self.fs.exists(&path).await {
            return Ok(());
        }
        self.fs.remove_file(&path).await?;
        tracing::debug!(collection_id = %id, "collection deleted");
        Ok(())
    }
}
