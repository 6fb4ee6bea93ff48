use crate::insert::{splice_text, DomException, EditableElement, PageDocument};

/// A focusable element. For content-editable elements `value` holds the
/// region's HTML and `selection` the caret within it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimElement {
    pub tag_name: String,
    pub input_type: Option<String>,
    pub content_editable: bool,
    pub value: String,
    pub selection: Option<(usize, usize)>,
    pub input_events: usize,
    /// Message thrown by every mutating DOM call.
    pub throws: Option<String>,
}

impl SimElement {
    /// A `<textarea>` with the caret at `caret`.
    pub fn textarea(value: &str, caret: usize) -> Self {
        Self {
            tag_name: "TEXTAREA".to_string(),
            value: value.to_string(),
            selection: Some((caret, caret)),
            ..Self::default()
        }
    }

    /// An `<input>` with the caret at the end of `value`.
    pub fn input(input_type: Option<&str>, value: &str) -> Self {
        let end = value.chars().count();
        Self {
            tag_name: "INPUT".to_string(),
            input_type: input_type.map(str::to_string),
            value: value.to_string(),
            selection: Some((end, end)),
            ..Self::default()
        }
    }

    /// A content-editable `<div>` holding `html`, caret at `caret`.
    pub fn content_editable(html: &str, caret: usize) -> Self {
        Self {
            tag_name: "DIV".to_string(),
            content_editable: true,
            value: html.to_string(),
            selection: Some((caret, caret)),
            ..Self::default()
        }
    }

    /// A non-editable element such as a button.
    pub fn plain(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: Option<(usize, usize)>) -> Self {
        self.selection = selection;
        self
    }

    pub fn throwing(mut self, message: &str) -> Self {
        self.throws = Some(message.to_string());
        self
    }

    fn check(&self) -> Result<(), DomException> {
        match &self.throws {
            Some(message) => Err(DomException::new(message.clone())),
            None => Ok(()),
        }
    }
}

impl EditableElement for SimElement {
    fn tag_name(&self) -> &str {
        &self.tag_name
    }

    fn input_type(&self) -> Option<&str> {
        self.input_type.as_deref()
    }

    fn is_content_editable(&self) -> bool {
        self.content_editable
    }

    fn value(&self) -> Result<String, DomException> {
        Ok(self.value.clone())
    }

    fn selection_range(&self) -> Result<Option<(usize, usize)>, DomException> {
        Ok(self.selection)
    }

    fn set_value(&mut self, value: String) -> Result<(), DomException> {
        self.check()?;
        self.value = value;
        Ok(())
    }

    /// Like the DOM, an element that exposes no selection refuses a caret move.
    fn set_selection_range(&mut self, start: usize, end: usize) -> Result<(), DomException> {
        self.check()?;
        if self.selection.is_none() {
            return Err(DomException::new(
                "InvalidStateError: The input element's type does not support selection.",
            ));
        }
        self.selection = Some((start, end));
        Ok(())
    }

    fn dispatch_input_event(&mut self) -> Result<(), DomException> {
        self.input_events += 1;
        Ok(())
    }
}

/// A document with at most one focused element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimDocument {
    pub focused: Option<SimElement>,
    /// Make the native insert command report "not applied".
    pub rich_insert_unsupported: bool,
    /// Number of native insert commands issued.
    pub rich_inserts: usize,
}

impl SimDocument {
    pub fn focused_on(element: SimElement) -> Self {
        Self {
            focused: Some(element),
            ..Self::default()
        }
    }

    /// Value (or HTML) of the focused element.
    pub fn focused_value(&self) -> Option<&str> {
        self.focused.as_ref().map(|element| element.value.as_str())
    }
}

impl PageDocument for SimDocument {
    fn active_element(&mut self) -> Option<&mut dyn EditableElement> {
        self.focused
            .as_mut()
            .map(|element| element as &mut dyn EditableElement)
    }

    fn exec_insert_html(&mut self, html: &str) -> Result<bool, DomException> {
        self.rich_inserts += 1;
        if self.rich_insert_unsupported {
            return Ok(false);
        }
        let Some(element) = self.focused.as_mut().filter(|element| element.content_editable) else {
            return Ok(false);
        };
        element.check()?;
        let (next, caret) = splice_text(&element.value, element.selection, html);
        element.value = next;
        element.selection = Some((caret, caret));
        element.input_events += 1;
        Ok(true)
    }
}
