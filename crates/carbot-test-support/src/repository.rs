//! Test repositories — `PromptRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use carbot_core::error::StoreError;
use carbot_core::prompt::{Category, Prompt, PromptId};
use carbot_core::repository::PromptRepository;
use chrono::{DateTime, Utc};

/// A fully functional in-memory repository with monotonically assigned
/// identifiers. Each operation takes the internal mutex once, so the
/// repository satisfies the per-operation atomicity the trait requires.
#[derive(Debug, Default)]
pub struct InMemoryPromptRepository {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    next_id: i64,
    prompts: Vec<Prompt>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            next_id: 1,
            prompts: Vec::new(),
        }
    }
}

impl InMemoryPromptRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored prompt, both categories, ascending by id.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<Prompt> {
        self.inner.lock().unwrap().prompts.clone()
    }
}

#[async_trait]
impl PromptRepository for InMemoryPromptRepository {
    async fn list(&self, category: Category) -> Result<Vec<Prompt>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
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
        let mut inner = self.inner.lock().unwrap();
        let prompt = Prompt {
            id: PromptId(inner.next_id),
            category,
            text: text.to_owned(),
            created_at,
        };
        inner.next_id += 1;
        inner.prompts.push(prompt.clone());
        Ok(prompt)
    }

    async fn delete(&self, id: PromptId) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.prompts.len();
        inner.prompts.retain(|p| p.id != id);
        Ok(inner.prompts.len() < before)
    }
}

/// A repository that always returns a backend error. Useful for testing
/// error-handling paths.
#[derive(Debug, Default)]
pub struct FailingPromptRepository;

#[async_trait]
impl PromptRepository for FailingPromptRepository {
    async fn list(&self, _category: Category) -> Result<Vec<Prompt>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn append(
        &self,
        _category: Category,
        _text: &str,
        _created_at: DateTime<Utc>,
    ) -> Result<Prompt, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn delete(&self, _id: PromptId) -> Result<bool, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }
}
