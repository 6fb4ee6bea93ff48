//! Core domain library for QuickPaste (config, storage, models, search, i18n).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across QuickPaste crates.
pub mod constants;
/// Storage area backed by redb.
pub mod db;
/// Process-global environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Message catalogs and language resolution.
pub mod locale;
/// Data models for snippets and settings.
pub mod models;
/// Fuzzy title search and display ordering.
pub mod search;
/// The key-value snippet store contract.
pub mod store;
/// Text helpers (markup stripping, query encoding).
pub mod text;
/// Export/import file format.
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::*;
pub use db::Database;
pub use error::AppError;
pub use models::{settings::Settings, snippet::Snippet};
pub use store::{EditFn, MemoryStore, SnippetStore};
