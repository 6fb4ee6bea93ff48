//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_COPY_CLOSE_DELAY_MS, DEFAULT_LANGUAGE, DEFAULT_MAX_SNIPPET_SIZE,
    DEFAULT_SETTLE_DELAY_MS,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for QuickPaste.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub settle_delay_ms: u64,
    pub copy_close_delay_ms: u64,
    pub ui_language: String,
    pub max_snippet_size: usize,
    pub auto_backup: bool,
    /// URL prefixes treated as restricted in addition to the built-in list.
    pub extra_restricted_prefixes: Vec<String>,
}

/// Resolve a leading `~/` against the home directory.
fn expand_home(path: String) -> String {
    match (path.strip_prefix("~/"), resolve_home_dir()) {
        (Some(rest), Some(home)) => home.join(rest).to_string_lossy().into_owned(),
        _ => path,
    }
}

/// `HOME`, then `USERPROFILE` (Windows), then the working directory.
fn resolve_home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
}

/// Interpret an on/off environment value.
///
/// Accepts `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off` (or blank),
/// case-insensitively and ignoring surrounding whitespace.
///
/// # Returns
/// `None` for anything else.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    const ON: [&str; 4] = ["1", "true", "yes", "on"];
    const OFF: [&str; 5] = ["", "0", "false", "no", "off"];
    let value = value.trim().to_ascii_lowercase();
    if ON.contains(&value.as_str()) {
        Some(true)
    } else if OFF.contains(&value.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Whether the flag `name` is switched on; unset or unparsable means off.
pub fn env_flag_enabled(name: &str) -> bool {
    matches!(env::var(name).as_deref().map(parse_env_flag), Ok(Some(true)))
}

/// Extract the primary language subtag from a POSIX/BCP-47 locale string.
///
/// `fr_FR.UTF-8`, `fr-CA` and `FR` all yield `fr`. `C` and `POSIX` carry no
/// language and yield `None`.
///
/// # Returns
/// Lowercased primary subtag, or `None` when the value names no language.
pub fn primary_language_subtag(locale: &str) -> Option<String> {
    let primary = locale
        .trim()
        .split(['_', '-', '.', '@'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if primary.is_empty() || primary == "c" || primary == "posix" {
        return None;
    }
    Some(primary)
}

fn parse_env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| raw.trim().parse().ok())
}

fn parse_env_list(name: &str) -> Vec<String> {
    env::var(name)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn resolve_ui_language() -> String {
    ["QUICKPASTE_UI_LANGUAGE", "LC_ALL", "LANG"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find_map(|value| primary_language_subtag(&value))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

impl Config {
    /// Read every `QUICKPASTE_*` variable, falling back to the defaults in
    /// [`crate::constants`] for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("QUICKPASTE_DB_PATH")
                .map(expand_home)
                .unwrap_or_else(|_| {
                    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
                    let cache_dir = home.join(".cache").join("quickpaste");
                    cache_dir.join("db").to_string_lossy().to_string()
                }),
            settle_delay_ms: parse_env_number("QUICKPASTE_SETTLE_DELAY_MS")
                .unwrap_or(DEFAULT_SETTLE_DELAY_MS),
            copy_close_delay_ms: parse_env_number("QUICKPASTE_COPY_CLOSE_DELAY_MS")
                .unwrap_or(DEFAULT_COPY_CLOSE_DELAY_MS),
            ui_language: resolve_ui_language(),
            max_snippet_size: parse_env_number("QUICKPASTE_MAX_SNIPPET_SIZE")
                .unwrap_or(DEFAULT_MAX_SNIPPET_SIZE),
            auto_backup: env_flag_enabled("QUICKPASTE_AUTO_BACKUP"),
            extra_restricted_prefixes: parse_env_list("QUICKPASTE_RESTRICTED_PREFIXES"),
        }
    }

    /// Settling delay applied after on-demand agent injection.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Delay before the popup closes after a clipboard copy.
    pub fn copy_close_delay(&self) -> Duration {
        Duration::from_millis(self.copy_close_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_env_flag, primary_language_subtag, Config};
    use crate::env::ScopedEnv;

    #[test]
    fn env_flags_recognize_on_off_words_only() {
        let cases = [
            (" yes ", Some(true)),
            ("ON", Some(true)),
            ("1", Some(true)),
            ("", Some(false)),
            ("Off", Some(false)),
            ("0", Some(false)),
            ("maybe", None),
            ("enabled", None),
        ];
        for (raw, expected) in cases {
            assert_eq!(parse_env_flag(raw), expected, "raw: {:?}", raw);
        }
    }

    #[test]
    fn primary_language_subtag_handles_posix_and_bcp47_forms() {
        assert_eq!(primary_language_subtag("fr_FR.UTF-8").as_deref(), Some("fr"));
        assert_eq!(primary_language_subtag("en-US").as_deref(), Some("en"));
        assert_eq!(primary_language_subtag("DE").as_deref(), Some("de"));
        assert_eq!(primary_language_subtag("C"), None);
        assert_eq!(primary_language_subtag("POSIX"), None);
        assert_eq!(primary_language_subtag("  "), None);
    }

    #[test]
    fn from_env_applies_overrides_and_defaults() {
        let mut env = ScopedEnv::new();
        env.set("QUICKPASTE_DB_PATH", "/tmp/quickpaste-config-test")
            .set("QUICKPASTE_SETTLE_DELAY_MS", "250")
            .remove("QUICKPASTE_COPY_CLOSE_DELAY_MS")
            .set("QUICKPASTE_UI_LANGUAGE", "fr-CA")
            .set("QUICKPASTE_MAX_SNIPPET_SIZE", "not-a-number")
            .set("QUICKPASTE_AUTO_BACKUP", "yes")
            .set("QUICKPASTE_RESTRICTED_PREFIXES", " https://intranet.example/ ,, file:// ");

        let config = Config::from_env();
        assert_eq!(config.db_path, "/tmp/quickpaste-config-test");
        assert_eq!(config.settle_delay_ms, 250);
        assert_eq!(config.copy_close_delay_ms, 1_000);
        assert_eq!(config.ui_language, "fr");
        assert_eq!(config.max_snippet_size, 1024 * 1024);
        assert!(config.auto_backup);
        assert_eq!(
            config.extra_restricted_prefixes,
            vec!["https://intranet.example/".to_string(), "file://".to_string()]
        );
    }

    #[test]
    fn from_env_expands_tilde_in_db_path() {
        let mut env = ScopedEnv::new();
        env.set("HOME", "/home/tester")
            .set("QUICKPASTE_DB_PATH", "~/snippets/db");

        let config = Config::from_env();
        assert!(
            config.db_path.ends_with("snippets/db") && config.db_path.starts_with("/home/tester"),
            "db_path: {}",
            config.db_path
        );
    }
}
