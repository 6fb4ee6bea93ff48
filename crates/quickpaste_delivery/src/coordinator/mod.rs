//! Delivery coordinator: runs in the popup and decides, per user action, how
//! a snippet or the editor reaches the active tab.
//!
//! Each operation is a fixed chain of attempts with no retry beyond it:
//!
//! - `paste`: run the insertion step in the tab, report the result.
//! - `open_editor`: message a resident agent, else inject one and message
//!   it once more after a settling delay, else open the editor as its own tab.
//!
//! Every cross-context call returns `Result<_, TransportError>` and the chain
//! branches on those values. Each terminal outcome produces exactly one
//! notification or one surface transition.

use crate::{
    agent::editor_url,
    payload::DeliveryRequest,
    protocol::{AgentMessage, InsertReport, TabId},
    restricted::RestrictedPages,
};
use async_trait::async_trait;
use quickpaste_core::{
    constants::EDITOR_PAGE_PATH,
    locale::{Localizer, MessageKey},
    AppError, Config, Snippet, SnippetStore,
};
use std::fmt;
use std::time::Duration;


/// Failure of a call that crosses into another browser context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Could not establish connection. Receiving end does not exist.")]
    NoReceiver,
    #[error("Cannot access contents of {url}")]
    Restricted { url: String },
    #[error("No tab with id: {0}")]
    NoSuchTab(u32),
    #[error("{0}")]
    Runtime(String),
}

/// What the browser knows about the active tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabInfo {
    pub id: Option<TabId>,
    /// `None` when the extension may not read the tab URL.
    pub url: Option<String>,
}

/// The browser APIs the coordinator depends on.
#[async_trait]
pub trait Browser: Send + Sync {
    /// The active tab of the current window, if any.
    async fn active_tab(&self) -> Result<Option<TabInfo>, TransportError>;

    /// Run the insertion step inside `tab` with `payload`.
    async fn execute_insert(
        &self,
        tab: TabId,
        payload: &crate::payload::Payload,
    ) -> Result<InsertReport, TransportError>;

    /// Send a runtime message to the agent(s) listening in `tab`.
    async fn send_message(&self, tab: TabId, message: &AgentMessage) -> Result<(), TransportError>;

    /// Inject the page agent script into `tab`.
    async fn inject_agent_script(&self, tab: TabId) -> Result<(), TransportError>;

    /// Inject the overlay stylesheet into `tab`.
    async fn inject_agent_stylesheet(&self, tab: TabId) -> Result<(), TransportError>;

    /// Open `url` in a new tab.
    async fn open_tab(&self, url: &str) -> Result<TabId, TransportError>;

    /// Absolute URL of a file bundled with the extension.
    fn extension_url(&self, path: &str) -> String;
}

/// A transient status line shown by the initiating surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub key: MessageKey,
    /// Appended to the localized text.
    pub detail: Option<String>,
    pub is_error: bool,
}

impl Notification {
    pub fn info(key: MessageKey) -> Self {
        Self {
            key,
            detail: None,
            is_error: false,
        }
    }

    pub fn error(key: MessageKey, detail: Option<String>) -> Self {
        Self {
            key,
            detail,
            is_error: true,
        }
    }

    /// Render the notification in the localizer's language.
    pub fn text(&self, localizer: &Localizer<'_>) -> String {
        localizer.text_with_detail(self.key, self.detail.as_deref())
    }
}

/// The surface the user acted in (the popup).
#[async_trait]
pub trait Surface: Send + Sync {
    /// Write text to the system clipboard.
    async fn write_clipboard(&self, text: &str) -> Result<(), TransportError>;
    fn notify(&self, notification: Notification);
    /// Dismiss the surface.
    fn close(&self);
}

/// Terminal result of one delivery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    NoEditableTarget { reason: Option<String> },
    TabUnreachable { detail: String },
    InjectionFailed { detail: String },
    UserCancelled,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => write!(f, "delivered"),
            Self::NoEditableTarget { reason: None } => write!(f, "no editable target"),
            Self::NoEditableTarget {
                reason: Some(reason),
            } => write!(f, "no editable target: {}", reason),
            Self::TabUnreachable { detail } => write!(f, "tab unreachable: {}", detail),
            Self::InjectionFailed { detail } => write!(f, "agent injection failed: {}", detail),
            Self::UserCancelled => write!(f, "cancelled by user"),
        }
    }
}

/// How a delivery reached (or failed to reach) its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryRoute {
    /// Insertion step executed directly in the tab.
    InPageScript,
    /// An agent already in the page answered the first message.
    ResidentAgent,
    /// An agent injected on demand answered the retried message.
    InjectedAgent,
    /// The editor opened as its own tab.
    StandaloneTab,
    NotDelivered,
}

/// Outcome of one user action, with the route taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub outcome: DeliveryOutcome,
    pub route: DeliveryRoute,
    /// Why `open_editor` fell back to a standalone tab.
    pub fallback_reason: Option<DeliveryOutcome>,
}

impl DeliveryReport {
    fn new(outcome: DeliveryOutcome, route: DeliveryRoute) -> Self {
        Self {
            outcome,
            route,
            fallback_reason: None,
        }
    }
}

/// Failures returned to the caller instead of being reported as outcomes.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Snippet '{0}' not found")]
    UnknownSnippet(String),
    #[error("Clipboard write failed: {0}")]
    Clipboard(TransportError),
    #[error(transparent)]
    Store(#[from] AppError),
}

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// Wait between injecting the agent and the single retried message.
    pub settle_delay: Duration,
    /// Wait between a clipboard copy and closing the surface.
    pub copy_close_delay: Duration,
    pub restricted: RestrictedPages,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(quickpaste_core::DEFAULT_SETTLE_DELAY_MS),
            copy_close_delay: Duration::from_millis(quickpaste_core::DEFAULT_COPY_CLOSE_DELAY_MS),
            restricted: RestrictedPages::default(),
        }
    }
}

impl DeliveryConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            settle_delay: config.settle_delay(),
            copy_close_delay: config.copy_close_delay(),
            restricted: RestrictedPages::with_extra(&config.extra_restricted_prefixes),
        }
    }
}

/// Runs delivery chains for one initiating surface.
///
/// Operations take `&self`; concurrent requests share nothing but the
/// collaborators.
pub struct DeliveryCoordinator<B, U, S> {
    browser: B,
    surface: U,
    store: S,
    config: DeliveryConfig,
}

impl<B, U, S> DeliveryCoordinator<B, U, S>
where
    B: Browser,
    U: Surface,
    S: SnippetStore,
{
    pub fn new(browser: B, surface: U, store: S, config: DeliveryConfig) -> Self {
        Self {
            browser,
            surface,
            store,
            config,
        }
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn surface(&self) -> &U {
        &self.surface
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Paste a snippet into the focused field of the active tab.
    ///
    /// # Arguments
    /// - `snippet_id`: Id of the stored snippet to insert.
    ///
    /// # Returns
    /// The terminal report. `Delivered` closes the surface; any other
    /// outcome shows one error notification.
    ///
    /// # Errors
    /// Returns [`DeliveryError::UnknownSnippet`] before contacting the
    /// browser when the id is not stored, or a store read failure.
    pub async fn paste(&self, snippet_id: &str) -> Result<DeliveryReport, DeliveryError> {
        let snippet = self.load_snippet(snippet_id)?;

        let tab = match self.resolve_active_tab().await {
            Ok((tab, _)) => tab,
            Err(detail) => {
                return Ok(self.finish_paste(DeliveryReport::new(
                    DeliveryOutcome::TabUnreachable { detail },
                    DeliveryRoute::NotDelivered,
                )));
            }
        };

        let request = DeliveryRequest::paste(tab, &snippet);
        tracing::debug!(%tab, snippet_id, "executing insertion in tab");
        let report = match self
            .browser
            .execute_insert(request.target_tab_id, &request.payload)
            .await
        {
            Ok(result) if result.success => {
                DeliveryReport::new(DeliveryOutcome::Delivered, DeliveryRoute::InPageScript)
            }
            Ok(result) => DeliveryReport::new(
                DeliveryOutcome::NoEditableTarget {
                    reason: result.reason,
                },
                DeliveryRoute::NotDelivered,
            ),
            Err(err) => DeliveryReport::new(
                DeliveryOutcome::TabUnreachable {
                    detail: err.to_string(),
                },
                DeliveryRoute::NotDelivered,
            ),
        };
        Ok(self.finish_paste(report))
    }

    /// Show the editor over the active tab, or in its own tab when the page
    /// cannot host it.
    ///
    /// Restricted pages and a missing tab skip straight to the standalone
    /// tab without any messaging or injection.
    ///
    /// # Arguments
    /// - `snippet_id`: Snippet to edit; `None` opens the editor in create mode.
    ///
    /// # Returns
    /// The terminal report. `fallback_reason` is set when the standalone tab
    /// was used.
    pub async fn open_editor(&self, snippet_id: Option<&str>) -> DeliveryReport {
        let (tab, url) = match self.resolve_active_tab().await {
            Ok(resolved) => resolved,
            Err(detail) => {
                return self
                    .open_standalone(snippet_id, DeliveryOutcome::TabUnreachable { detail })
                    .await;
            }
        };
        if let Some(url) = url.filter(|url| self.config.restricted.is_restricted(url)) {
            return self
                .open_standalone(
                    snippet_id,
                    DeliveryOutcome::TabUnreachable {
                        detail: format!("restricted page {}", url),
                    },
                )
                .await;
        }

        let message = AgentMessage::ShowEditor {
            snippet_id: snippet_id.map(str::to_string),
        };
        match self.browser.send_message(tab, &message).await {
            Ok(()) => return self.finish_editor(DeliveryRoute::ResidentAgent),
            Err(err) => tracing::debug!(%tab, error = %err, "no resident agent"),
        }

        if let Err(err) = self.inject_agent(tab).await {
            return self
                .open_standalone(
                    snippet_id,
                    DeliveryOutcome::InjectionFailed {
                        detail: err.to_string(),
                    },
                )
                .await;
        }
        tokio::time::sleep(self.config.settle_delay).await;

        match self.browser.send_message(tab, &message).await {
            Ok(()) => self.finish_editor(DeliveryRoute::InjectedAgent),
            Err(err) => {
                self.open_standalone(
                    snippet_id,
                    DeliveryOutcome::TabUnreachable {
                        detail: err.to_string(),
                    },
                )
                .await
            }
        }
    }

    /// Copy a snippet's content to the clipboard, confirm, then close the
    /// surface after the configured delay.
    ///
    /// # Errors
    /// Returns [`DeliveryError::UnknownSnippet`], a store read failure, or
    /// [`DeliveryError::Clipboard`] when the write is refused. The surface
    /// stays open on error.
    pub async fn copy_to_clipboard(&self, snippet_id: &str) -> Result<(), DeliveryError> {
        let snippet = self.load_snippet(snippet_id)?;
        self.surface
            .write_clipboard(&snippet.content)
            .await
            .map_err(DeliveryError::Clipboard)?;
        self.surface
            .notify(Notification::info(MessageKey::CopiedToClipboard));
        tokio::time::sleep(self.config.copy_close_delay).await;
        self.surface.close();
        Ok(())
    }

    fn load_snippet(&self, snippet_id: &str) -> Result<Snippet, DeliveryError> {
        match self.store.find_snippet(snippet_id)? {
            Some(snippet) => Ok(snippet),
            None => {
                tracing::warn!(snippet_id, "requested snippet is not stored");
                Err(DeliveryError::UnknownSnippet(snippet_id.to_string()))
            }
        }
    }

    async fn resolve_active_tab(&self) -> Result<(TabId, Option<String>), String> {
        match self.browser.active_tab().await {
            Ok(Some(TabInfo { id: Some(id), url })) => Ok((id, url)),
            Ok(Some(TabInfo { id: None, .. })) => Err("active tab has no id".to_string()),
            Ok(None) => Err("no active tab".to_string()),
            Err(err) => Err(err.to_string()),
        }
    }

    async fn inject_agent(&self, tab: TabId) -> Result<(), TransportError> {
        tracing::debug!(%tab, "injecting page agent");
        self.browser.inject_agent_script(tab).await?;
        self.browser.inject_agent_stylesheet(tab).await
    }

    async fn open_standalone(
        &self,
        snippet_id: Option<&str>,
        reason: DeliveryOutcome,
    ) -> DeliveryReport {
        tracing::warn!(reason = %reason, "opening editor in a standalone tab");
        let url = editor_url(&self.browser.extension_url(EDITOR_PAGE_PATH), snippet_id);
        match self.browser.open_tab(&url).await {
            Ok(tab) => {
                self.surface.close();
                tracing::info!(%tab, "editor opened in standalone tab");
                DeliveryReport {
                    outcome: DeliveryOutcome::Delivered,
                    route: DeliveryRoute::StandaloneTab,
                    fallback_reason: Some(reason),
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "browser refused to open the editor tab");
                self.surface.notify(Notification::error(
                    MessageKey::OpenEditorError,
                    Some(err.to_string()),
                ));
                DeliveryReport {
                    outcome: DeliveryOutcome::TabUnreachable {
                        detail: err.to_string(),
                    },
                    route: DeliveryRoute::NotDelivered,
                    fallback_reason: Some(reason),
                }
            }
        }
    }

    fn finish_editor(&self, route: DeliveryRoute) -> DeliveryReport {
        self.surface.close();
        tracing::info!(?route, "editor shown in page");
        DeliveryReport::new(DeliveryOutcome::Delivered, route)
    }

    fn finish_paste(&self, report: DeliveryReport) -> DeliveryReport {
        match &report.outcome {
            DeliveryOutcome::Delivered => self.surface.close(),
            DeliveryOutcome::NoEditableTarget { .. } => self
                .surface
                .notify(Notification::error(MessageKey::PasteErrorNoField, None)),
            DeliveryOutcome::TabUnreachable { detail }
            | DeliveryOutcome::InjectionFailed { detail } => self.surface.notify(
                Notification::error(MessageKey::PasteErrorGeneric, Some(detail.clone())),
            ),
            DeliveryOutcome::UserCancelled => {}
        }
        tracing::info!(outcome = %report.outcome, "paste finished");
        report
    }
}
