//! Insertion of a payload into whatever element has focus in a page.
//!
//! The page is reached through [`PageDocument`] and [`EditableElement`]; the
//! real binding is a DOM, tests use [`crate::sim::SimDocument`]. Nothing here
//! knows about snippets, storage or messaging.

use crate::{payload::Payload, protocol::InsertReport};


/// Input `type` values that take free text.
pub const TEXT_LIKE_INPUT_TYPES: &[&str] = &["text", "search", "email", "url", "password", "tel"];

/// An exception raised by a DOM call. Its message is reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DomException {
    pub message: String,
}

impl DomException {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The focused element, as seen by the insertion step.
///
/// Offsets are character offsets into [`EditableElement::value`].
pub trait EditableElement {
    /// Tag name as the DOM reports it, in any case.
    fn tag_name(&self) -> &str;
    /// The `type` attribute, when the element has one.
    fn input_type(&self) -> Option<&str>;
    fn is_content_editable(&self) -> bool;
    fn value(&self) -> Result<String, DomException>;
    /// Current selection, or `None` when the element exposes no selection.
    fn selection_range(&self) -> Result<Option<(usize, usize)>, DomException>;
    fn set_value(&mut self, value: String) -> Result<(), DomException>;
    fn set_selection_range(&mut self, start: usize, end: usize) -> Result<(), DomException>;
    /// Fire a bubbling, cancelable `input` event on the element.
    fn dispatch_input_event(&mut self) -> Result<(), DomException>;
}

/// The page document hosting the focused element.
pub trait PageDocument {
    fn active_element(&mut self) -> Option<&mut dyn EditableElement>;
    /// Run the native insert-HTML editing command at the caret.
    ///
    /// # Returns
    /// Whether the command was applied.
    ///
    /// # Errors
    /// Returns the exception the command raised.
    fn exec_insert_html(&mut self, html: &str) -> Result<bool, DomException>;
}

/// How the focused element accepts content. Decided once per insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableKind {
    ContentEditable,
    TextLikeInput,
    TextArea,
    NotEditable,
}

impl EditableKind {
    pub fn classify(element: &dyn EditableElement) -> Self {
        if element.is_content_editable() {
            return Self::ContentEditable;
        }
        let tag = element.tag_name();
        if tag.eq_ignore_ascii_case("textarea") {
            Self::TextArea
        } else if tag.eq_ignore_ascii_case("input") && is_text_like_input_type(element.input_type())
        {
            Self::TextLikeInput
        } else {
            Self::NotEditable
        }
    }
}

/// Whether an input `type` attribute takes free text.
///
/// A missing or empty attribute is the `text` default.
pub fn is_text_like_input_type(input_type: Option<&str>) -> bool {
    match input_type.map(str::trim) {
        None | Some("") => true,
        Some(kind) => TEXT_LIKE_INPUT_TYPES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(kind)),
    }
}

/// Replace the selected range of `value` with `inserted`.
///
/// Offsets are clamped to the value and ordered; without a selection the
/// text is appended.
///
/// # Returns
/// The new value and the caret offset just after the inserted text.
pub fn splice_text(value: &str, selection: Option<(usize, usize)>, inserted: &str) -> (String, usize) {
    let length = value.chars().count();
    let (start, end) = match selection {
        Some((a, b)) => {
            let (a, b) = (a.min(length), b.min(length));
            (a.min(b), a.max(b))
        }
        None => (length, length),
    };
    let byte_at = |offset: usize| {
        value
            .char_indices()
            .nth(offset)
            .map_or(value.len(), |(index, _)| index)
    };

    let mut spliced = String::with_capacity(value.len() + inserted.len());
    spliced.push_str(&value[..byte_at(start)]);
    spliced.push_str(inserted);
    spliced.push_str(&value[byte_at(end)..]);
    (spliced, start + inserted.chars().count())
}

/// Insert `payload` into the document's focused element.
///
/// Content-editable regions get the HTML through the native editing command,
/// which keeps undo history. Text areas and text-like inputs get the plain
/// text spliced over the selection, followed by an `input` event.
///
/// Never fails: DOM exceptions come back as an unsuccessful report carrying
/// the exception message.
pub fn attempt_insert(document: &mut dyn PageDocument, payload: &Payload) -> InsertReport {
    let kind = document
        .active_element()
        .map_or(EditableKind::NotEditable, |element| {
            EditableKind::classify(&*element)
        });
    tracing::debug!(?kind, "classified focused element");

    let result = match kind {
        EditableKind::NotEditable => {
            return InsertReport {
                success: false,
                reason: None,
            }
        }
        EditableKind::ContentEditable => insert_html(document, &payload.html),
        EditableKind::TextArea | EditableKind::TextLikeInput => match document.active_element() {
            Some(element) => insert_plain_text(element, &payload.plain_text),
            None => Err(DomException::new("focused element is gone")),
        },
    };

    match result {
        Ok(()) => InsertReport::inserted(),
        Err(err) => InsertReport::failed(err.message),
    }
}

fn insert_html(document: &mut dyn PageDocument, html: &str) -> Result<(), DomException> {
    if document.exec_insert_html(html)? {
        Ok(())
    } else {
        Err(DomException::new("insertHTML was not applied"))
    }
}

fn insert_plain_text(element: &mut dyn EditableElement, text: &str) -> Result<(), DomException> {
    let value = element.value()?;
    let selection = element.selection_range()?;
    let (next, caret) = splice_text(&value, selection, text);
    element.set_value(next)?;
    // Fields without selection support (type=email) reject caret moves.
    if selection.is_some() {
        element.set_selection_range(caret, caret)?;
    }
    element.dispatch_input_event()
}
