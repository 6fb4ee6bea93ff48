//! The page agent: mounts the overlay editor into a page and tears it down
//! when the editor frame asks to close.
//!
//! An [`AgentSession`] is created by mounting and consumed by unmounting, so
//! a page holds at most one overlay and no element references outlive it.

use crate::protocol::{AgentMessage, FrameMessage};
use quickpaste_core::{constants::EDITOR_PAGE_PATH, text::encode_query_component};

#[cfg(test)]
mod tests;

/// Element id of the full-page overlay.
pub const OVERLAY_ELEMENT_ID: &str = "quickpaste-overlay";
/// Element id of the editor frame inside the overlay.
pub const FRAME_ELEMENT_ID: &str = "quickpaste-editor-iframe";
/// Permission granted to the editor frame.
pub const FRAME_ALLOW: &str = "clipboard-write";
/// Body overflow applied while the overlay is shown.
pub const SUSPENDED_OVERFLOW: &str = "hidden";

/// Identity of a window (page, frame) as seen by `message` event sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Failure raised by the host page while mounting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("page has no body to mount into")]
    NoBody,
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

/// Attributes of the editor frame element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    pub element_id: String,
    pub src: String,
    pub allow: String,
}

/// The page as the agent sees it.
pub trait PageHost {
    /// Whether an element with `element_id` is present in the document.
    fn has_element(&self, element_id: &str) -> bool;
    /// Append an empty overlay element to the body.
    fn append_overlay(&mut self, element_id: &str) -> Result<(), HostError>;
    /// Append the editor frame to the overlay.
    ///
    /// # Returns
    /// The window id the frame's content window will use as message source.
    fn append_frame(&mut self, overlay_id: &str, frame: &FrameSpec) -> Result<WindowId, HostError>;
    /// Remove an element by id; missing elements are ignored.
    fn remove_element(&mut self, element_id: &str);
    /// The body's inline `overflow` value (`None` when unset).
    fn body_overflow(&self) -> Option<String>;
    fn set_body_overflow(&mut self, value: Option<&str>);
    /// Absolute URL of a file bundled with the extension.
    fn extension_url(&self, path: &str) -> String;
}

/// Build the editor URL, with `?id=` for edit mode.
pub fn editor_url(base: &str, snippet_id: Option<&str>) -> String {
    match snippet_id {
        Some(id) => format!("{}?id={}", base, encode_query_component(id)),
        None => base.to_string(),
    }
}

/// A mounted overlay and everything needed to take it down again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSession {
    frame_window: WindowId,
    frame_src: String,
    previous_overflow: Option<String>,
}

impl AgentSession {
    /// Mount the overlay and editor frame and suspend page scrolling.
    ///
    /// # Errors
    /// Returns the host failure; a half-mounted overlay is removed first.
    pub fn mount(host: &mut dyn PageHost, snippet_id: Option<&str>) -> Result<Self, HostError> {
        let frame = FrameSpec {
            element_id: FRAME_ELEMENT_ID.to_string(),
            src: editor_url(&host.extension_url(EDITOR_PAGE_PATH), snippet_id),
            allow: FRAME_ALLOW.to_string(),
        };
        let previous_overflow = host.body_overflow();

        host.append_overlay(OVERLAY_ELEMENT_ID)?;
        let frame_window = match host.append_frame(OVERLAY_ELEMENT_ID, &frame) {
            Ok(window) => window,
            Err(err) => {
                host.remove_element(OVERLAY_ELEMENT_ID);
                return Err(err);
            }
        };
        host.set_body_overflow(Some(SUSPENDED_OVERFLOW));

        Ok(Self {
            frame_window,
            frame_src: frame.src,
            previous_overflow,
        })
    }

    /// Remove frame and overlay and restore the remembered scroll setting.
    pub fn unmount(self, host: &mut dyn PageHost) {
        host.remove_element(FRAME_ELEMENT_ID);
        host.remove_element(OVERLAY_ELEMENT_ID);
        host.set_body_overflow(self.previous_overflow.as_deref());
    }

    /// Window that is allowed to send the close signal.
    pub fn frame_window(&self) -> WindowId {
        self.frame_window
    }

    pub fn frame_src(&self) -> &str {
        &self.frame_src
    }
}

/// Whether the agent currently shows its overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageAgentState {
    #[default]
    Unmounted,
    Mounted(AgentSession),
}

/// Agent resident in one page.
pub struct PageAgent<H: PageHost> {
    host: H,
    state: PageAgentState,
}

impl<H: PageHost> PageAgent<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            state: PageAgentState::Unmounted,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> &PageAgentState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.state, PageAgentState::Mounted(_))
    }

    /// Handle a runtime message from the popup.
    ///
    /// # Errors
    /// Propagates mount failures so the sender sees a failed delivery.
    pub fn handle_runtime_message(&mut self, message: &AgentMessage) -> Result<(), HostError> {
        match message {
            AgentMessage::ShowEditor { snippet_id } => {
                self.show_editor(snippet_id.as_deref())?;
                Ok(())
            }
        }
    }

    /// Show the overlay editor, in edit mode when `snippet_id` is given.
    ///
    /// A second request while an overlay is up, from this agent or from
    /// another instance injected into the same page, is ignored.
    ///
    /// # Returns
    /// `true` when a new overlay was mounted.
    ///
    /// # Errors
    /// Returns the host failure when mounting fails; state stays unmounted.
    pub fn show_editor(&mut self, snippet_id: Option<&str>) -> Result<bool, HostError> {
        if self.is_mounted() || self.host.has_element(OVERLAY_ELEMENT_ID) {
            tracing::debug!("editor overlay already present, ignoring show request");
            return Ok(false);
        }
        let session = AgentSession::mount(&mut self.host, snippet_id)?;
        tracing::debug!(src = %session.frame_src(), "editor overlay mounted");
        self.state = PageAgentState::Mounted(session);
        Ok(true)
    }

    /// Handle a window `message` event.
    ///
    /// Only a close signal whose source is this session's editor frame
    /// unmounts the overlay.
    ///
    /// # Returns
    /// `true` when the overlay was closed.
    pub fn handle_window_message(&mut self, source: Option<WindowId>, data: &serde_json::Value) -> bool {
        let PageAgentState::Mounted(session) = &self.state else {
            return false;
        };
        if FrameMessage::recognize(data) != Some(FrameMessage::Close) {
            return false;
        }
        if source != Some(session.frame_window()) {
            tracing::debug!(?source, "close signal from foreign window ignored");
            return false;
        }
        self.close();
        true
    }

    fn close(&mut self) {
        if let PageAgentState::Mounted(session) = std::mem::take(&mut self.state) {
            session.unmount(&mut self.host);
            tracing::debug!("editor overlay closed");
        }
    }
}
