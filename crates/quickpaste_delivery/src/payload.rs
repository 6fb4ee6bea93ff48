//! Content handed to the insertion step, and the per-action delivery request.

use crate::protocol::TabId;
use quickpaste_core::{text::html_to_plain_text, Snippet};
use serde::{Deserialize, Serialize};

/// A snippet rendered for insertion: rich HTML plus a plain-text fallback.
///
/// Which one is used depends on the target element, never on preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub html: String,
    pub plain_text: String,
}

impl Payload {
    /// Build a payload from an HTML fragment, deriving the plain text.
    pub fn from_html(html: impl Into<String>) -> Self {
        let html = html.into();
        let plain_text = html_to_plain_text(&html);
        Self { html, plain_text }
    }
}

impl From<&Snippet> for Payload {
    fn from(snippet: &Snippet) -> Self {
        Self::from_html(snippet.content.clone())
    }
}

/// One user action aimed at one tab. Lives only for that action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub target_tab_id: TabId,
    pub snippet_id: Option<String>,
    pub payload: Payload,
}

impl DeliveryRequest {
    /// Request to paste `snippet` into `tab`.
    pub fn paste(tab: TabId, snippet: &Snippet) -> Self {
        Self {
            target_tab_id: tab,
            snippet_id: Some(snippet.id.clone()),
            payload: Payload::from(snippet),
        }
    }
}
