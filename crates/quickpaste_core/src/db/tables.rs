//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// Key-value storage area. Keys are [`crate::SNIPPETS_KEY`] (bincode
/// `Vec<Snippet>`) and [`crate::SETTINGS_KEY`] (JSON `Settings`).
pub const STORAGE_AREA: TableDefinition<&str, &[u8]> = TableDefinition::new("storage_local");
