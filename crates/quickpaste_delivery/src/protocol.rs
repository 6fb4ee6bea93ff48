//! Wire messages exchanged between the popup, the page agent and the editor frame.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Browser tab identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab {}", self.0)
    }
}

/// Runtime message sent from the popup to a page agent.
///
/// The only acknowledgment is transport success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentMessage {
    #[serde(rename = "SHOW_EDITOR")]
    ShowEditor {
        #[serde(
            rename = "snippetId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        snippet_id: Option<String>,
    },
}

/// Window message posted by the editor frame to its parent page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FrameMessage {
    #[serde(rename = "QUICKPASTE_CLOSE")]
    Close,
}

impl FrameMessage {
    /// Recognize a window message. Pages post arbitrary data; anything that
    /// is not one of ours yields `None`.
    pub fn recognize(data: &serde_json::Value) -> Option<Self> {
        Self::deserialize(data).ok()
    }
}

/// Result of running the insertion step inside a page.
///
/// Serialized as `{"success": bool, "error"?: string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertReport {
    pub success: bool,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl InsertReport {
    pub fn inserted() -> Self {
        Self {
            success: true,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: Some(reason.into()),
        }
    }
}
