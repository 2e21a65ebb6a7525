//! Flat-file persistence for the service: one pretty-printed JSON document,
//! overwritten wholesale on every save.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{StorageError, StorageResult};
use crate::game::reconcile;
use crate::game::state::GameState;
use crate::protocol::{timestamp_now, StoredDocument};

pub struct SaveStore {
    path: PathBuf,
    /// Serializes file writes within this process.
    write_lock: Mutex<()>,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the save directory, and a default document if none exists.
    /// An existing save is left alone.
    pub async fn bootstrap(&self) -> StorageResult<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        if tokio::fs::try_exists(&self.path).await? {
            info!("Using existing save file {}", self.path.display());
            return Ok(());
        }
        self.write_defaults().await?;
        info!("Created default save file {}", self.path.display());
        Ok(())
    }

    /// Reads and reconciles the stored document. A missing or unparsable
    /// file is replaced by defaults, which are then returned.
    pub async fn load(&self) -> StorageResult<StoredDocument> {
        match self.read_raw().await {
            Ok(raw) => Ok(StoredDocument {
                state: reconcile(&raw),
                last_updated: timestamp_field(&raw, "lastUpdated"),
                created_at: timestamp_field(&raw, "createdAt"),
                extra: StoredDocument::unknown_fields(&raw),
            }),
            Err(e) => {
                warn!(
                    "Save file {} unusable ({}); restoring defaults",
                    self.path.display(),
                    e
                );
                self.write_defaults().await
            }
        }
    }

    /// Stores `doc` verbatim with a fresh `lastUpdated` and returns what was
    /// written.
    pub async fn save(&self, doc: Value) -> StorageResult<Value> {
        let Value::Object(mut fields) = doc else {
            return Err(StorageError::NotAnObject);
        };
        fields.insert("lastUpdated".to_string(), Value::String(timestamp_now()));
        let stored = Value::Object(fields);
        self.write(&stored).await?;
        Ok(stored)
    }

    async fn read_raw(&self) -> StorageResult<Value> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_defaults(&self) -> StorageResult<StoredDocument> {
        let doc = StoredDocument {
            state: GameState::default(),
            last_updated: None,
            created_at: Some(timestamp_now()),
            extra: Map::new(),
        };
        self.write(&doc).await?;
        Ok(doc)
    }

    async fn write<T: Serialize>(&self, doc: &T) -> StorageResult<()> {
        let json = serde_json::to_vec_pretty(doc)?;
        let _guard = self.write_lock.lock().await;
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

fn timestamp_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::achievements::AchievementId;
    use serde_json::json;

    fn store_in(dir: &tempfile::TempDir) -> SaveStore {
        SaveStore::new(dir.path().join("saves").join("game_data.json"))
    }

    #[tokio::test]
    async fn bootstrap_creates_default_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.bootstrap().await.unwrap();

        let raw: Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert!(raw["createdAt"].is_string());
        assert_eq!(reconcile(&raw), GameState::default());
    }

    #[tokio::test]
    async fn bootstrap_keeps_an_existing_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.bootstrap().await.unwrap();
        store.save(json!({ "resources": 42 })).await.unwrap();

        store.bootstrap().await.unwrap();
        let doc = store.load().await.unwrap();
        assert_eq!(doc.state.resources, 42.0);
    }

    #[tokio::test]
    async fn save_stamps_and_stores_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let stored = store
            .save(json!({ "resources": 5, "extra": "kept" }))
            .await
            .unwrap();
        assert!(stored["lastUpdated"].is_string());

        let raw: Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw, stored);
        assert_eq!(raw["extra"], "kept");
    }

    #[tokio::test]
    async fn save_rejects_non_objects() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let err = store.save(json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, StorageError::NotAnObject));
    }

    #[tokio::test]
    async fn load_backfills_partial_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .save(json!({
                "resources": 3,
                "achievements": { "firstClick": { "unlocked": true } }
            }))
            .await
            .unwrap();

        let doc = store.load().await.unwrap();
        assert_eq!(doc.state.resources, 3.0);
        assert!(doc.state.is_unlocked(AchievementId::FirstClick));
        assert!(!doc.state.is_unlocked(AchievementId::ExpertMiner));
        assert_eq!(doc.state.auto_drone().base_cost, 10.0);
        assert!(doc.last_updated.is_some());
    }

    #[tokio::test]
    async fn load_keeps_unknown_top_level_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .save(json!({ "resources": 1, "prestige": 3 }))
            .await
            .unwrap();

        let doc = store.load().await.unwrap();
        assert_eq!(doc.state.resources, 1.0);
        assert_eq!(doc.extra.get("prestige"), Some(&json!(3)));
        assert!(!doc.extra.contains_key("lastUpdated"));
    }

    #[tokio::test]
    async fn corrupt_file_is_healed_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.bootstrap().await.unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();

        let doc = store.load().await.unwrap();
        assert_eq!(doc.state, GameState::default());
        assert!(doc.created_at.is_some());

        let raw: Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(reconcile(&raw), GameState::default());
    }

    #[tokio::test]
    async fn missing_file_is_healed_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let doc = store.load().await.unwrap();
        assert_eq!(doc.state, GameState::default());
        assert!(store.path().exists());
    }
}
