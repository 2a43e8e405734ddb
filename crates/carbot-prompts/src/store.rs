//! The prompt store.

use std::sync::{Arc, Mutex};

use carbot_core::clock::Clock;
use carbot_core::error::StoreError;
use carbot_core::prompt::{Category, normalize_text};
use carbot_core::repository::PromptRepository;
use carbot_core::rng::RandomSource;
use tracing::info;

/// Reply used when a random truth is requested and none exist.
pub const NO_TRUTHS: &str = "No truths yet.";

/// Reply used when a random dare is requested and none exist.
pub const NO_DARES: &str = "No dares yet.";

fn empty_reply(category: Category) -> &'static str {
    match category {
        Category::Truth => NO_TRUTHS,
        Category::Dare => NO_DARES,
    }
}

/// Concurrency-safe store over the two prompt collections.
///
/// All mutations (adds and positional removes, either category) are
/// serialized through one async mutex: removal resolves a position to an
/// identifier and deletes it without another mutation interleaving.
/// Listing and random picks read the repository directly; they observe
/// either the pre- or post-mutation state, never an intermediate one.
pub struct PromptStore {
    repository: Arc<dyn PromptRepository>,
    clock: Arc<dyn Clock>,
    rng: Arc<Mutex<dyn RandomSource>>,
    mutation_lock: tokio::sync::Mutex<()>,
}

impl PromptStore {
    /// Create a store over the given repository.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PromptRepository>,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn RandomSource>>,
    ) -> Self {
        Self {
            repository,
            clock,
            rng,
            mutation_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// All truth prompts, ascending by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub async fn list_truths(&self) -> Result<Vec<String>, StoreError> {
        self.texts(Category::Truth).await
    }

    /// All dare prompts, ascending by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub async fn list_dares(&self) -> Result<Vec<String>, StoreError> {
        self.texts(Category::Dare).await
    }

    /// A uniformly random truth, or [`NO_TRUTHS`] when none exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub async fn random_truth(&self) -> Result<String, StoreError> {
        self.random(Category::Truth).await
    }

    /// A uniformly random dare, or [`NO_DARES`] when none exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    pub async fn random_dare(&self) -> Result<String, StoreError> {
        self.random(Category::Dare).await
    }

    /// Appends a truth prompt. Empty, whitespace-only, or overlong text
    /// is a quiet no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the mutation did not durably commit.
    pub async fn add_truth(&self, text: &str) -> Result<(), StoreError> {
        self.add(Category::Truth, text).await
    }

    /// Appends a dare prompt. Empty, whitespace-only, or overlong text
    /// is a quiet no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the mutation did not durably commit.
    pub async fn add_dare(&self, text: &str) -> Result<(), StoreError> {
        self.add(Category::Dare, text).await
    }

    /// Removes the truth at the given 0-based position. Returns whether
    /// an entry existed there; negative and out-of-range positions yield
    /// `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the mutation did not durably commit.
    pub async fn remove_truth_at(&self, position: i64) -> Result<bool, StoreError> {
        self.remove_at(Category::Truth, position).await
    }

    /// Removes the dare at the given 0-based position. Returns whether
    /// an entry existed there; negative and out-of-range positions yield
    /// `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the mutation did not durably commit.
    pub async fn remove_dare_at(&self, position: i64) -> Result<bool, StoreError> {
        self.remove_at(Category::Dare, position).await
    }

    async fn texts(&self, category: Category) -> Result<Vec<String>, StoreError> {
        let prompts = self.repository.list(category).await?;
        Ok(prompts.into_iter().map(|p| p.text).collect())
    }

    async fn random(&self, category: Category) -> Result<String, StoreError> {
        let mut texts = self.texts(category).await?;
        if texts.is_empty() {
            return Ok(empty_reply(category).to_owned());
        }
        // Lock the RNG only for the synchronous pick — never across an await.
        let index = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| StoreError::Backend(format!("RNG mutex poisoned: {e}")))?;
            rng.next_index(texts.len())
        };
        Ok(texts.swap_remove(index))
    }

    async fn add(&self, category: Category, text: &str) -> Result<(), StoreError> {
        let Some(text) = normalize_text(text) else {
            return Ok(());
        };
        let _guard = self.mutation_lock.lock().await;
        let prompt = self
            .repository
            .append(category, &text, self.clock.now())
            .await?;
        info!(category = %category, id = %prompt.id, "appended prompt");
        Ok(())
    }

    async fn remove_at(&self, category: Category, position: i64) -> Result<bool, StoreError> {
        let Ok(index) = usize::try_from(position) else {
            return Ok(false);
        };
        // Resolve position -> identifier and delete under the same lock,
        // so a concurrent mutation cannot shift ranks in between.
        let _guard = self.mutation_lock.lock().await;
        let prompts = self.repository.list(category).await?;
        let Some(prompt) = prompts.get(index) else {
            return Ok(false);
        };
        let removed = self.repository.delete(prompt.id).await?;
        info!(category = %category, id = %prompt.id, "removed prompt");
        Ok(removed)
    }
}
