//! Shared constants used across QuickPaste crates.

/// Default wait after on-demand agent injection before the single retry.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 100;

/// Default delay before the popup closes after a clipboard copy.
pub const DEFAULT_COPY_CLOSE_DELAY_MS: u64 = 1_000;

/// Default maximum snippet content size accepted by create/update/import.
pub const DEFAULT_MAX_SNIPPET_SIZE: usize = 1024 * 1024;

/// Language used when neither settings nor the environment name a supported one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Storage key holding the snippet list.
pub const SNIPPETS_KEY: &str = "snippets";

/// Storage key holding persisted settings.
pub const SETTINGS_KEY: &str = "settings";

/// Bundled editor page, relative to the extension root.
pub const EDITOR_PAGE_PATH: &str = "editor/editor.html";
