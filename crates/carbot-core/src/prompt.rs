//! The prompt model shared by the store and its backends.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum prompt text length in characters, after trimming.
pub const MAX_PROMPT_LEN: usize = 2000;

/// Storage-assigned prompt identifier.
///
/// Identifiers are unique and strictly increasing in creation order
/// across both categories, and are never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PromptId(pub i64);

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two prompt partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A question the bot asks.
    Truth,
    /// A task the bot assigns.
    Dare,
}

impl Category {
    /// Stable lowercase name, used for storage and logging.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Truth => "truth",
            Category::Dare => "dare",
        }
    }

    /// Parses the stable name produced by [`Category::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "truth" => Some(Category::Truth),
            "dare" => Some(Category::Dare),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    /// Storage-assigned identifier.
    pub id: PromptId,
    /// Which partition the prompt belongs to.
    pub category: Category,
    /// The prompt text, trimmed and non-empty.
    pub text: String,
    /// When the prompt was appended.
    pub created_at: DateTime<Utc>,
}

/// Normalizes user-submitted prompt text.
///
/// Returns the trimmed text, or `None` when the submission is empty,
/// whitespace-only, or longer than [`MAX_PROMPT_LEN`] characters.
#[must_use]
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_PROMPT_LEN {
        return None;
    }
    Some(trimmed.to_owned())
}
