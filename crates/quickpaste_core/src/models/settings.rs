//! Persisted user settings.

use serde::{Deserialize, Serialize};

/// Color theme applied to the popup and the editor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Snippet list ordering.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Store order.
    #[default]
    Default,
    /// Case-insensitive title order.
    Alpha,
}

impl SortMode {
    /// The other sort mode, as flipped by the popup's sort button.
    pub fn toggled(self) -> Self {
        match self {
            Self::Default => Self::Alpha,
            Self::Alpha => Self::Default,
        }
    }
}

/// UI language preference: follow the browser, or a fixed locale code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LanguagePreference {
    #[default]
    Auto,
    Locale(String),
}

impl From<String> for LanguagePreference {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            Self::Auto
        } else {
            Self::Locale(trimmed.to_ascii_lowercase())
        }
    }
}

impl From<LanguagePreference> for String {
    fn from(value: LanguagePreference) -> Self {
        match value {
            LanguagePreference::Auto => "auto".to_string(),
            LanguagePreference::Locale(code) => code,
        }
    }
}

/// Settings stored under the `settings` key.
///
/// Every field defaults independently, so a stored object missing a field
/// (older versions only wrote `theme`) merges over the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub language: LanguagePreference,
    pub sort: SortMode,
}

/// Partial settings update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub language: Option<LanguagePreference>,
    pub sort: Option<SortMode>,
}

impl Settings {
    /// Apply a partial update and return the merged settings.
    pub fn merged(mut self, patch: SettingsPatch) -> Self {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        self
    }
}
