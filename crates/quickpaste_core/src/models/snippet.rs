//! Snippet records and request payloads.

use crate::{error::AppError, text::html_to_plain_text};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored snippet. `content` is an HTML fragment.
///
/// The id is assigned once at creation and never changes; uniqueness within a
/// store is the only invariant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// Request payload for creating a snippet.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSnippetRequest {
    pub title: String,
    pub content: String,
}

/// Request payload for updating a snippet. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSnippetRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Snippet {
    /// Create a snippet with a freshly generated id.
    pub fn new(title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            content,
        }
    }

    /// Plain-text rendering of the HTML content.
    pub fn plain_text(&self) -> String {
        html_to_plain_text(&self.content)
    }
}

/// Validate and normalize a title/content pair before it is persisted.
///
/// Title and content are trimmed. Both must be non-empty, and the content
/// must carry visible text once markup is stripped (an editor left holding
/// only `<br>` is rejected).
///
/// # Arguments
/// - `title`: Raw title from the form.
/// - `content`: Raw HTML content from the form.
/// - `max_size`: Maximum accepted content size in bytes.
///
/// # Returns
/// The trimmed `(title, content)` pair.
///
/// # Errors
/// Returns [`AppError::BadRequest`] when a field is empty or content is too large.
pub fn validate_snippet_fields(
    title: &str,
    content: &str,
    max_size: usize,
) -> Result<(String, String), AppError> {
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Snippet title is empty".to_string()));
    }
    if content.is_empty() || html_to_plain_text(content).trim().is_empty() {
        return Err(AppError::BadRequest("Snippet content is empty".to_string()));
    }
    if content.len() > max_size {
        return Err(AppError::BadRequest(format!(
            "Snippet content is {} bytes, limit is {}",
            content.len(),
            max_size
        )));
    }
    Ok((title.to_string(), content.to_string()))
}
