//! The snippet editor form, shown in the overlay frame or a standalone tab.
//!
//! The editor reads its mode from its own URL (`?id=` means edit), writes
//! through the [`SnippetStore`] and ends only by posting the close signal
//! to its parent page.

use crate::{coordinator::DeliveryOutcome, protocol::FrameMessage};
use quickpaste_core::{
    locale::{Localizer, MessageKey},
    models::snippet::validate_snippet_fields,
    text::{decode_query_component, html_text_content},
    AppError, Snippet, SnippetStore,
};

/// Whether the editor creates a new snippet or edits a stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { snippet_id: String },
}

impl EditorMode {
    /// Derive the mode from the editor page URL.
    ///
    /// An absent, empty or undecodable `id` parameter means create mode.
    pub fn from_url(url: &str) -> Self {
        let without_fragment = url.split('#').next().unwrap_or_default();
        let Some((_, query)) = without_fragment.split_once('?') else {
            return Self::Create;
        };
        query
            .split('&')
            .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
            .find(|(key, _)| *key == "id")
            .and_then(|(_, value)| decode_query_component(value))
            .filter(|id| !id.is_empty())
            .map_or(Self::Create, |snippet_id| Self::Edit { snippet_id })
    }

    /// Heading shown above the form.
    pub fn heading(&self) -> MessageKey {
        match self {
            Self::Create => MessageKey::AddSnippet,
            Self::Edit { .. } => MessageKey::EditSnippet,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The form content does not pass validation; shown as `snippetError`.
    #[error("{0}")]
    Invalid(String),
    #[error("Snippet '{0}' no longer exists")]
    Missing(String),
    #[error(transparent)]
    Storage(AppError),
}

impl From<AppError> for EditorError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(message) => Self::Invalid(message),
            other => Self::Storage(other),
        }
    }
}

/// How the editor was left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorExit {
    Saved(Snippet),
    Cancelled,
}

impl EditorExit {
    /// Delivery outcome to report for this exit, if any. Saving is not a
    /// delivery; cancelling is the silent `UserCancelled`.
    pub fn outcome(&self) -> Option<DeliveryOutcome> {
        match self {
            Self::Saved(_) => None,
            Self::Cancelled => Some(DeliveryOutcome::UserCancelled),
        }
    }
}

/// Editor form state bound to a store.
pub struct Editor<S: SnippetStore> {
    store: S,
    mode: EditorMode,
    title: String,
    html: String,
    max_content_size: usize,
    saved: Option<Snippet>,
}

impl<S: SnippetStore> Editor<S> {
    /// Open the editor at `url`, loading the snippet in edit mode.
    ///
    /// A snippet id that is no longer stored leaves the form empty; saving
    /// then fails with [`EditorError::Missing`].
    ///
    /// # Errors
    /// Returns a storage error when the store cannot be read.
    pub fn open(store: S, url: &str, max_content_size: usize) -> Result<Self, EditorError> {
        let mode = EditorMode::from_url(url);
        let (title, html) = match &mode {
            EditorMode::Edit { snippet_id } => match store.find_snippet(snippet_id)? {
                Some(snippet) => (snippet.title, snippet.content),
                None => {
                    tracing::warn!(snippet_id = %snippet_id, "editor opened for a missing snippet");
                    (String::new(), String::new())
                }
            },
            EditorMode::Create => (String::new(), String::new()),
        };
        Ok(Self {
            store,
            mode,
            title,
            html,
            max_content_size,
            saved: None,
        })
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    /// Text content of the rich-text area, as the DOM's `textContent`
    /// reports it (block boundaries add nothing).
    pub fn text_content(&self) -> String {
        html_text_content(&self.html)
    }

    pub fn char_count(&self) -> usize {
        self.text_content().chars().count()
    }

    /// Counter label, e.g. `12 characters`.
    pub fn char_count_label(&self, localizer: &Localizer<'_>) -> String {
        format!("{} {}", self.char_count(), localizer.text(MessageKey::CharCount))
    }

    /// Plain text for the editor's copy button; `None` when there is none.
    pub fn clipboard_text(&self) -> Option<String> {
        Some(self.text_content()).filter(|text| !text.is_empty())
    }

    /// Validate the form and write it through the store.
    ///
    /// Edit mode keeps the id; create mode appends a snippet with a fresh id.
    /// After a successful save the surface should [`Editor::close`].
    ///
    /// # Returns
    /// The stored snippet.
    ///
    /// # Errors
    /// Returns [`EditorError::Invalid`] when the title or text content is
    /// empty, [`EditorError::Missing`] when the edited snippet was deleted,
    /// or a storage error.
    pub fn save(&mut self) -> Result<Snippet, EditorError> {
        let (title, content) = validate_snippet_fields(&self.title, &self.html, self.max_content_size)?;
        let mut saved = None;

        // Applied to the list as stored now, not as read at `open`.
        let result = self.store.update_with(&mut |snippets| {
            let snippet = match &self.mode {
                EditorMode::Edit { snippet_id } => {
                    let existing = snippets
                        .iter_mut()
                        .find(|snippet| &snippet.id == snippet_id)
                        .ok_or(AppError::NotFound)?;
                    existing.title = title.clone();
                    existing.content = content.clone();
                    existing.clone()
                }
                EditorMode::Create => {
                    let snippet = Snippet::new(title.clone(), content.clone());
                    snippets.push(snippet.clone());
                    snippet
                }
            };
            saved = Some(snippet);
            Ok(())
        });

        let saved = match (result, saved, &self.mode) {
            (Ok(()), Some(saved), _) => saved,
            (Err(AppError::NotFound), _, EditorMode::Edit { snippet_id }) => {
                return Err(EditorError::Missing(snippet_id.clone()));
            }
            (Err(err), _, _) => return Err(err.into()),
            (Ok(()), None, _) => {
                return Err(AppError::StorageMessage("store skipped the edit".to_string()).into());
            }
        };

        tracing::debug!(id = %saved.id, "editor saved snippet");
        self.saved = Some(saved.clone());
        Ok(saved)
    }

    /// Leave the editor.
    ///
    /// # Returns
    /// The close signal to post to the parent page, and how the editor ended.
    pub fn close(self) -> (FrameMessage, EditorExit) {
        let exit = match self.saved {
            Some(snippet) => EditorExit::Saved(snippet),
            None => EditorExit::Cancelled,
        };
        (FrameMessage::Close, exit)
    }
}
