//! Carbot — JSON-file-backed prompt repository.
//!
//! The whole store lives in one JSON file next to the bot. State is
//! loaded once at startup and every mutation rewrites the file through a
//! temp-file rename, so a crash mid-write leaves the previous contents
//! intact. In-memory state is committed only after the write lands:
//! a mutation that returned `Ok` is on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use carbot_core::error::StoreError;
use carbot_core::prompt::{Category, Prompt, PromptId};
use carbot_core::repository::PromptRepository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

/// On-disk shape of the store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonState {
    /// Next identifier to assign; identifiers are never reused.
    next_id: i64,
    /// All prompts, both categories, ascending by identifier.
    prompts: Vec<Prompt>,
}

impl Default for JsonState {
    fn default() -> Self {
        Self {
            next_id: 1,
            prompts: Vec::new(),
        }
    }
}

/// File-backed [`PromptRepository`].
#[derive(Debug)]
pub struct JsonPromptRepository {
    path: PathBuf,
    state: RwLock<JsonState>,
}

impl JsonPromptRepository {
    /// Opens the store file, creating an empty store when the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the file exists but cannot be
    /// decoded, or `StoreError::Backend` if it cannot be read.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<JsonState>(&bytes)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(err) if err.kind() == ErrorKind::NotFound => JsonState::default(),
            Err(err) => {
                return Err(StoreError::Backend(format!("{}: {err}", path.display())));
            }
        };
        debug!(path = %path.display(), prompts = state.prompts.len(), "opened prompt store file");
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }
}

async fn persist(path: &Path, state: &JsonState) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(state)
        .map_err(|e| StoreError::Backend(format!("serialize store: {e}")))?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| StoreError::Backend(format!("{}: {e}", tmp.display())))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::Backend(format!("{}: {e}", path.display())))?;
    Ok(())
}

#[async_trait]
impl PromptRepository for JsonPromptRepository {
    async fn list(&self, category: Category) -> Result<Vec<Prompt>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .prompts
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    async fn append(
        &self,
        category: Category,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Prompt, StoreError> {
        let mut state = self.state.write().await;
        let prompt = Prompt {
            id: PromptId(state.next_id),
            category,
            text: text.to_owned(),
            created_at,
        };
        let mut next = state.clone();
        next.next_id += 1;
        next.prompts.push(prompt.clone());
        persist(&self.path, &next).await?;
        *state = next;
        Ok(prompt)
    }

    async fn delete(&self, id: PromptId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        if !state.prompts.iter().any(|p| p.id == id) {
            return Ok(false);
        }
        let mut next = state.clone();
        next.prompts.retain(|p| p.id != id);
        persist(&self.path, &next).await?;
        *state = next;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir().join(format!("carbot-prompts-{}.json", Uuid::new_v4()))
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    async fn cleanup(path: &Path) {
        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn test_missing_file_opens_as_an_empty_store() {
        let path = temp_store_path();

        let repository = JsonPromptRepository::open(&path).await.unwrap();

        assert!(repository.list(Category::Truth).await.unwrap().is_empty());
        assert!(repository.list(Category::Dare).await.unwrap().is_empty());
        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_ids_across_categories() {
        // Arrange
        let path = temp_store_path();
        let repository = JsonPromptRepository::open(&path).await.unwrap();

        // Act — the id sequence is shared between categories.
        let a = repository
            .append(Category::Truth, "A", fixed_now())
            .await
            .unwrap();
        let b = repository
            .append(Category::Dare, "B", fixed_now())
            .await
            .unwrap();
        let c = repository
            .append(Category::Truth, "C", fixed_now())
            .await
            .unwrap();

        // Assert
        assert_eq!((a.id, b.id, c.id), (PromptId(1), PromptId(2), PromptId(3)));
        let truths = repository.list(Category::Truth).await.unwrap();
        assert_eq!(
            truths.iter().map(|p| p.text.as_str()).collect::<Vec<_>>(),
            vec!["A", "C"]
        );
        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_mutations_survive_a_reopen() {
        // Arrange
        let path = temp_store_path();
        {
            let repository = JsonPromptRepository::open(&path).await.unwrap();
            repository
                .append(Category::Truth, "A", fixed_now())
                .await
                .unwrap();
            let b = repository
                .append(Category::Truth, "B", fixed_now())
                .await
                .unwrap();
            repository
                .append(Category::Dare, "X", fixed_now())
                .await
                .unwrap();
            assert!(repository.delete(b.id).await.unwrap());
        }

        // Act — a fresh process over the same file.
        let repository = JsonPromptRepository::open(&path).await.unwrap();

        // Assert — committed appends and removals are all visible.
        let truths = repository.list(Category::Truth).await.unwrap();
        assert_eq!(
            truths.iter().map(|p| p.text.as_str()).collect::<Vec<_>>(),
            vec!["A"]
        );
        let dares = repository.list(Category::Dare).await.unwrap();
        assert_eq!(
            dares.iter().map(|p| p.text.as_str()).collect::<Vec<_>>(),
            vec!["X"]
        );

        // Deleted identifiers are never reused.
        let next = repository
            .append(Category::Truth, "C", fixed_now())
            .await
            .unwrap();
        assert_eq!(next.id, PromptId(4));
        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_delete_of_unknown_id_returns_false() {
        let path = temp_store_path();
        let repository = JsonPromptRepository::open(&path).await.unwrap();

        assert!(!repository.delete(PromptId(42)).await.unwrap());
        cleanup(&path).await;
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported_not_clobbered() {
        // Arrange
        let path = temp_store_path();
        tokio::fs::write(&path, b"not json at all").await.unwrap();

        // Act
        let result = JsonPromptRepository::open(&path).await;

        // Assert — the error names the file, and the file is untouched.
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert_eq!(bytes, b"not json at all");
        cleanup(&path).await;
    }
}
