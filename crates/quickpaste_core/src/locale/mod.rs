//! Bundled message catalogs and language resolution.
//!
//! Catalogs use the extension `messages.json` layout (`{key: {message}}`).
//! Lookups fall back to English, then to the key itself with a warning, so a
//! missing translation never blanks a notification.

use crate::{constants::DEFAULT_LANGUAGE, error::AppError, models::settings::LanguagePreference};
use serde::Deserialize;
use std::collections::HashMap;

const BUNDLED: &[(&str, &str)] = &[
    ("en", include_str!("messages/en.json")),
    ("fr", include_str!("messages/fr.json")),
];

/// Message keys referenced from code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    AddSnippet,
    EditSnippet,
    NoSnippets,
    NoSnippetsFound,
    SnippetAdded,
    SnippetUpdated,
    SnippetDeleted,
    SnippetError,
    SnippetNotFound,
    PasteErrorNoField,
    PasteErrorGeneric,
    OpenEditorError,
    CopiedToClipboard,
    ExportSuccess,
    ImportSuccess,
    ImportError,
    CharCount,
    SettingsSaved,
}

impl MessageKey {
    /// Catalog key as written in `messages.json`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddSnippet => "addSnippet",
            Self::EditSnippet => "editSnippet",
            Self::NoSnippets => "noSnippets",
            Self::NoSnippetsFound => "noSnippetsFound",
            Self::SnippetAdded => "snippetAdded",
            Self::SnippetUpdated => "snippetUpdated",
            Self::SnippetDeleted => "snippetDeleted",
            Self::SnippetError => "snippetError",
            Self::SnippetNotFound => "snippetNotFound",
            Self::PasteErrorNoField => "pasteErrorNoField",
            Self::PasteErrorGeneric => "pasteErrorGeneric",
            Self::OpenEditorError => "openEditorError",
            Self::CopiedToClipboard => "copiedToClipboard",
            Self::ExportSuccess => "exportSuccess",
            Self::ImportSuccess => "importSuccess",
            Self::ImportError => "importError",
            Self::CharCount => "charCount",
            Self::SettingsSaved => "settingsSaved",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    message: String,
}

/// All bundled catalogs, keyed by language code.
#[derive(Debug)]
pub struct Catalog {
    languages: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// Parse the catalogs compiled into the binary.
    ///
    /// # Errors
    /// Returns [`AppError::Json`] when a bundled file is malformed.
    pub fn bundled() -> Result<Self, AppError> {
        let mut languages = HashMap::new();
        for (code, raw) in BUNDLED {
            let entries: HashMap<String, CatalogEntry> = serde_json::from_str(raw)?;
            let messages = entries
                .into_iter()
                .map(|(key, entry)| (key, entry.message))
                .collect();
            languages.insert((*code).to_string(), messages);
        }
        Ok(Self { languages })
    }

    /// Whether a catalog exists for `code`.
    pub fn supports(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    /// Resolve the effective language for a preference.
    ///
    /// `auto` follows `ui_language` (primary subtag only). Unsupported
    /// languages resolve to English.
    pub fn resolve_language(&self, preference: &LanguagePreference, ui_language: &str) -> String {
        let requested = match preference {
            LanguagePreference::Auto => ui_language,
            LanguagePreference::Locale(code) => code.as_str(),
        };
        let primary = requested
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if self.supports(&primary) {
            primary
        } else {
            DEFAULT_LANGUAGE.to_string()
        }
    }

    /// Look a message up for `language`, falling back to English then the key.
    pub fn message(&self, language: &str, key: &str) -> String {
        let lookup = |code: &str| {
            self.languages
                .get(code)
                .and_then(|messages| messages.get(key))
                .cloned()
        };
        lookup(language)
            .or_else(|| lookup(DEFAULT_LANGUAGE))
            .unwrap_or_else(|| {
                tracing::warn!("Missing i18n key: {}", key);
                key.to_string()
            })
    }

    /// Bind the catalog to one language.
    pub fn localizer(&self, language: impl Into<String>) -> Localizer<'_> {
        Localizer {
            catalog: self,
            language: language.into(),
        }
    }
}

/// A catalog bound to a resolved language.
#[derive(Debug, Clone)]
pub struct Localizer<'a> {
    catalog: &'a Catalog,
    language: String,
}

impl Localizer<'_> {
    /// Resolved language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Localized text for `key`.
    pub fn text(&self, key: MessageKey) -> String {
        self.catalog.message(&self.language, key.as_str())
    }

    /// Localized text for `key`, followed by `detail` when present.
    pub fn text_with_detail(&self, key: MessageKey, detail: Option<&str>) -> String {
        let mut text = self.text(key);
        if let Some(detail) = detail {
            text.push_str(detail);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KEYS: &[MessageKey] = &[
        MessageKey::AddSnippet,
        MessageKey::EditSnippet,
        MessageKey::NoSnippets,
        MessageKey::NoSnippetsFound,
        MessageKey::SnippetAdded,
        MessageKey::SnippetUpdated,
        MessageKey::SnippetDeleted,
        MessageKey::SnippetError,
        MessageKey::SnippetNotFound,
        MessageKey::PasteErrorNoField,
        MessageKey::PasteErrorGeneric,
        MessageKey::OpenEditorError,
        MessageKey::CopiedToClipboard,
        MessageKey::ExportSuccess,
        MessageKey::ImportSuccess,
        MessageKey::ImportError,
        MessageKey::CharCount,
        MessageKey::SettingsSaved,
    ];

    #[test]
    fn every_code_key_exists_in_every_bundled_catalog() {
        let catalog = Catalog::bundled().expect("catalog");
        for (code, _) in BUNDLED {
            let messages = catalog.languages.get(*code).expect("language");
            for key in ALL_KEYS {
                assert!(
                    messages.contains_key(key.as_str()),
                    "{} missing {}",
                    code,
                    key.as_str()
                );
            }
        }
    }

    #[test]
    fn auto_follows_ui_language_and_falls_back_to_english() {
        let catalog = Catalog::bundled().expect("catalog");
        assert_eq!(catalog.resolve_language(&LanguagePreference::Auto, "fr-CA"), "fr");
        assert_eq!(catalog.resolve_language(&LanguagePreference::Auto, "de"), "en");
        assert_eq!(
            catalog.resolve_language(&LanguagePreference::Locale("fr".to_string()), "en-US"),
            "fr"
        );
    }

    #[test]
    fn missing_keys_fall_back_to_english_then_key() {
        let catalog = Catalog::bundled().expect("catalog");
        assert_eq!(catalog.message("xx", "save"), "Save");
        assert_eq!(catalog.message("fr", "noSuchKey"), "noSuchKey");
    }

    #[test]
    fn localizer_appends_detail() {
        let catalog = Catalog::bundled().expect("catalog");
        let localizer = catalog.localizer("en");
        assert_eq!(
            localizer.text_with_detail(MessageKey::PasteErrorGeneric, Some("denied")),
            "Could not paste on this page: denied"
        );
        assert_eq!(localizer.text(MessageKey::CopiedToClipboard), "Copied to clipboard");
    }
}
