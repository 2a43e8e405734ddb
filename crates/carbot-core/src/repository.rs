//! Prompt repository abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::prompt::{Category, Prompt, PromptId};

/// Repository trait for durable, id-ordered prompt storage.
///
/// Implementations must make each operation individually atomic: a
/// concurrent reader sees either the state before a mutation or the state
/// after it, never an intermediate one. A mutation that returns `Ok` is
/// durable — it survives a process restart against the same backend.
#[async_trait]
pub trait PromptRepository: Send + Sync {
    /// Lists all prompts in a category, ascending by identifier.
    async fn list(&self, category: Category) -> Result<Vec<Prompt>, StoreError>;

    /// Appends a prompt, assigning the next identifier in the
    /// category-agnostic sequence.
    async fn append(
        &self,
        category: Category,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Prompt, StoreError>;

    /// Deletes a prompt by identifier. Returns whether a prompt with that
    /// identifier existed.
    async fn delete(&self, id: PromptId) -> Result<bool, StoreError>;
}
