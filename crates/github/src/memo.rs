//! Memo entity committed to the repository as a Markdown file

use chrono::{DateTime, Utc};
use common::Error;

/// Longest memo accepted, in characters
const MAX_CONTENT_CHARS: usize = 10_000;

/// A validated memo ready to be committed
#[derive(Debug, Clone)]
pub struct Memo {
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Memo {
    /// Validate and build a memo. Content is trimmed before the checks
    /// so whitespace-only input is rejected as empty.
    pub fn new(content: &str, user_id: &str, created_at: DateTime<Utc>) -> Result<Self, Error> {
        let content = content.trim();
        let mut errors = Vec::new();

        if content.is_empty() {
            errors.push("Memo content cannot be empty".to_string());
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            errors.push(format!(
                "Memo content is too long (max {} characters)",
                MAX_CONTENT_CHARS
            ));
        }

        if !errors.is_empty() {
            return Err(Error::Validation {
                context: "Invalid memo content".to_string(),
                errors,
            });
        }

        Ok(Self {
            content: content.to_string(),
            user_id: user_id.to_string(),
            created_at,
        })
    }

    /// File name derived from the creation timestamp, e.g. `2024-01-15_09-30-45.md`
    pub fn file_name(&self) -> String {
        format!("{}.md", self.created_at.format("%Y-%m-%d_%H-%M-%S"))
    }

    /// Reply sent back to the user after the commit succeeds
    pub fn success_message(&self) -> String {
        format!("✅ Saved memo to GitHub.\n\n{}", self.content)
    }
}
