//! Snippet storage operations backed by redb.

use crate::{
    constants::SNIPPETS_KEY,
    db::tables::STORAGE_AREA,
    error::AppError,
    models::snippet::{validate_snippet_fields, CreateSnippetRequest, Snippet, UpdateSnippetRequest},
    store::{ensure_unique_ids, EditFn, SnippetStore},
    transfer::{merge_snippets, ImportSummary},
};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for the snippet list stored in the storage area.
///
/// The list is one value, so every mutation is a read-modify-write inside a
/// single write transaction. Two writers never interleave, but the last one
/// to commit wins.
pub struct SnippetDb {
    db: Arc<redb::Database>,
    max_content_size: usize,
}

fn decode_list(bytes: Option<&[u8]>) -> Result<Vec<Snippet>, AppError> {
    match bytes {
        Some(bytes) => Ok(bincode::deserialize(bytes)?),
        None => Ok(Vec::new()),
    }
}

impl SnippetDb {
    pub(crate) fn new(db: Arc<redb::Database>, max_content_size: usize) -> Self {
        Self {
            db,
            max_content_size,
        }
    }

    /// Maximum content size accepted by create/update/import.
    pub fn max_content_size(&self) -> usize {
        self.max_content_size
    }

    /// Load every snippet in store order.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list(&self) -> Result<Vec<Snippet>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STORAGE_AREA)?;
        let guard = table.get(SNIPPETS_KEY)?;
        decode_list(guard.as_ref().map(|value| value.value()))
    }

    /// Fetch a snippet by id.
    ///
    /// # Returns
    /// `Ok(Some(snippet))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn find(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        Ok(self.list()?.into_iter().find(|snippet| snippet.id == id))
    }

    /// Validate and append a new snippet with a fresh id.
    ///
    /// # Returns
    /// The persisted snippet.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for empty fields or oversized content,
    /// or a storage error when the write fails.
    pub fn create(&self, request: CreateSnippetRequest) -> Result<Snippet, AppError> {
        let (title, content) =
            validate_snippet_fields(&request.title, &request.content, self.max_content_size)?;
        let snippet = Snippet::new(title, content);
        let created = snippet.clone();
        self.modify(move |snippets| {
            snippets.push(snippet);
            Ok(())
        })?;
        tracing::debug!(id = %created.id, "snippet created");
        Ok(created)
    }

    /// Update title and/or content of an existing snippet, keeping its id.
    ///
    /// # Returns
    /// The updated snippet, or `None` when the id is unknown.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] when the merged fields are invalid, or a
    /// storage error when the write fails.
    pub fn update(
        &self,
        id: &str,
        request: UpdateSnippetRequest,
    ) -> Result<Option<Snippet>, AppError> {
        let max_size = self.max_content_size;
        self.modify(|snippets| {
            let Some(existing) = snippets.iter_mut().find(|snippet| snippet.id == id) else {
                return Ok(None);
            };
            let title = request.title.as_deref().unwrap_or(&existing.title);
            let content = request.content.as_deref().unwrap_or(&existing.content);
            let (title, content) = validate_snippet_fields(title, content, max_size)?;
            existing.title = title;
            existing.content = content;
            Ok(Some(existing.clone()))
        })
    }

    /// Delete a snippet by id.
    ///
    /// # Returns
    /// `true` if a snippet was removed.
    ///
    /// # Errors
    /// Returns an error when the write fails.
    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        self.modify(|snippets| {
            let before = snippets.len();
            snippets.retain(|snippet| snippet.id != id);
            Ok(snippets.len() != before)
        })
    }

    /// Merge already-validated import records, skipping ids that exist.
    ///
    /// # Returns
    /// Counts of added and skipped records.
    ///
    /// # Errors
    /// Returns an error when the write fails; nothing is merged in that case.
    pub fn import(&self, records: Vec<Snippet>) -> Result<ImportSummary, AppError> {
        let summary = self.modify(move |snippets| Ok(merge_snippets(snippets, records)))?;
        tracing::info!(
            added = summary.added,
            skipped = summary.skipped,
            "snippet import merged"
        );
        Ok(summary)
    }

    /// Replace the whole list.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] when two records share an id, or a
    /// storage error when the write fails.
    pub fn replace_all(&self, snippets: &[Snippet]) -> Result<(), AppError> {
        ensure_unique_ids(snippets)?;
        let replacement = snippets.to_vec();
        self.modify(move |current| {
            *current = replacement;
            Ok(())
        })
    }

    fn modify<T>(
        &self,
        apply: impl FnOnce(&mut Vec<Snippet>) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let write_txn = self.db.begin_write()?;
        let result = {
            let mut table = write_txn.open_table(STORAGE_AREA)?;
            let current = table.get(SNIPPETS_KEY)?.map(|value| value.value().to_vec());
            let mut snippets = decode_list(current.as_deref())?;
            // An error here drops the transaction uncommitted.
            let result = apply(&mut snippets)?;
            let encoded = bincode::serialize(&snippets)?;
            table.insert(SNIPPETS_KEY, encoded.as_slice())?;
            result
        };
        write_txn.commit()?;
        Ok(result)
    }
}

impl SnippetStore for SnippetDb {
    fn get(&self) -> Result<Vec<Snippet>, AppError> {
        self.list()
    }

    fn put(&self, snippets: &[Snippet]) -> Result<(), AppError> {
        self.replace_all(snippets)
    }

    fn update_with(&self, edit: &mut EditFn<'_>) -> Result<(), AppError> {
        self.modify(|snippets| {
            edit(snippets)?;
            ensure_unique_ids(snippets)
        })
    }
}
