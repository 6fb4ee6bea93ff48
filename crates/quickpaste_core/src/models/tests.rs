//! Model-level unit tests.

#[cfg(test)]
mod model_tests {
    use super::super::*;
    use crate::error::AppError;
    use settings::{LanguagePreference, Settings, SettingsPatch, SortMode, Theme};
    use snippet::{validate_snippet_fields, Snippet};

    #[test]
    fn test_snippet_new_assigns_unique_ids() {
        let first = Snippet::new("greeting".to_string(), "<b>hi</b>".to_string());
        let second = Snippet::new("greeting".to_string(), "<b>hi</b>".to_string());

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
        assert_eq!(first.title, "greeting");
        assert_eq!(first.plain_text(), "hi");
    }

    #[test]
    fn test_validate_snippet_fields_trims_and_accepts() {
        let (title, content) =
            validate_snippet_fields("  Sig  ", "  <p>Regards</p> ", 1024).expect("valid");
        assert_eq!(title, "Sig");
        assert_eq!(content, "<p>Regards</p>");
    }

    #[test]
    fn test_validate_snippet_fields_rejects_blank_or_markup_only() {
        for (title, content) in [("", "x"), ("   ", "x"), ("t", ""), ("t", "<br><div> </div>")] {
            let err = validate_snippet_fields(title, content, 1024).expect_err("should reject");
            assert!(matches!(err, AppError::BadRequest(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_validate_snippet_fields_enforces_size_limit() {
        let content = "a".repeat(33);
        assert!(validate_snippet_fields("t", &content, 32).is_err());
        assert!(validate_snippet_fields("t", &content, 33).is_ok());
    }

    #[test]
    fn test_settings_missing_fields_merge_over_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).expect("parse");
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.language, LanguagePreference::Auto);
        assert_eq!(settings.sort, SortMode::Default);
    }

    #[test]
    fn test_settings_wire_format_matches_extension_storage() {
        let settings = Settings {
            theme: Theme::Light,
            language: LanguagePreference::Locale("fr".to_string()),
            sort: SortMode::Alpha,
        };
        let value = serde_json::to_value(&settings).expect("encode");
        assert_eq!(
            value,
            serde_json::json!({"theme": "light", "language": "fr", "sort": "alpha"})
        );

        let auto: Settings = serde_json::from_str(r#"{"language":"AUTO"}"#).expect("parse");
        assert_eq!(auto.language, LanguagePreference::Auto);
    }

    #[test]
    fn test_settings_patch_only_touches_named_fields() {
        let merged = Settings::default().merged(SettingsPatch {
            sort: Some(SortMode::Default.toggled()),
            ..SettingsPatch::default()
        });
        assert_eq!(merged.sort, SortMode::Alpha);
        assert_eq!(merged.theme, Theme::Light);
        assert_eq!(merged.sort.toggled(), SortMode::Default);
    }
}
