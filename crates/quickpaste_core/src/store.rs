//! The key-value snippet store contract shared by every surface.

use crate::{error::AppError, models::snippet::Snippet};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// In-place edit of the whole snippet list, run by [`SnippetStore::update_with`].
pub type EditFn<'a> = dyn FnMut(&mut Vec<Snippet>) -> Result<(), AppError> + 'a;

/// Whole-list persistence of snippet records.
///
/// Mirrors the extension storage area: readers get a snapshot, writers
/// replace the list, and the last writer wins.
pub trait SnippetStore {
    /// Load every snippet in store order.
    ///
    /// # Errors
    /// Returns an error when the backing storage cannot be read.
    fn get(&self) -> Result<Vec<Snippet>, AppError>;

    /// Replace the stored list.
    ///
    /// # Errors
    /// Returns an error when ids collide or the backing storage cannot be written.
    fn put(&self, snippets: &[Snippet]) -> Result<(), AppError>;

    /// Apply `edit` to the stored list and write the result back.
    ///
    /// Stores that can should run this as one atomic read-modify-write so a
    /// concurrent writer cannot land between the read and the write. The
    /// default is a plain [`SnippetStore::get`] then [`SnippetStore::put`].
    ///
    /// # Errors
    /// Returns the error from `edit` (nothing is written), or a storage or
    /// duplicate-id failure.
    fn update_with(&self, edit: &mut EditFn<'_>) -> Result<(), AppError> {
        let mut snippets = self.get()?;
        edit(&mut snippets)?;
        self.put(&snippets)
    }

    /// Look a single snippet up by id from a fresh snapshot.
    ///
    /// # Errors
    /// Propagates [`SnippetStore::get`] failures.
    fn find_snippet(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        Ok(self.get()?.into_iter().find(|snippet| snippet.id == id))
    }
}

impl<S: SnippetStore + ?Sized> SnippetStore for Arc<S> {
    fn get(&self) -> Result<Vec<Snippet>, AppError> {
        (**self).get()
    }

    fn put(&self, snippets: &[Snippet]) -> Result<(), AppError> {
        (**self).put(snippets)
    }

    fn update_with(&self, edit: &mut EditFn<'_>) -> Result<(), AppError> {
        (**self).update_with(edit)
    }
}

impl<S: SnippetStore + ?Sized> SnippetStore for &S {
    fn get(&self) -> Result<Vec<Snippet>, AppError> {
        (**self).get()
    }

    fn put(&self, snippets: &[Snippet]) -> Result<(), AppError> {
        (**self).put(snippets)
    }

    fn update_with(&self, edit: &mut EditFn<'_>) -> Result<(), AppError> {
        (**self).update_with(edit)
    }
}

/// Reject a list in which two records share an id.
///
/// # Errors
/// Returns [`AppError::BadRequest`] naming the first duplicated id.
pub fn ensure_unique_ids(snippets: &[Snippet]) -> Result<(), AppError> {
    let mut seen = HashSet::with_capacity(snippets.len());
    for snippet in snippets {
        if !seen.insert(snippet.id.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Duplicate snippet id '{}'",
                snippet.id
            )));
        }
    }
    Ok(())
}

/// In-memory store used by simulated surfaces and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snippets: Mutex<Vec<Snippet>>,
}

impl MemoryStore {
    /// Create a store pre-filled with `snippets`.
    pub fn with_snippets(snippets: Vec<Snippet>) -> Self {
        Self {
            snippets: Mutex::new(snippets),
        }
    }
}

impl SnippetStore for MemoryStore {
    fn get(&self) -> Result<Vec<Snippet>, AppError> {
        self.snippets
            .lock()
            .map(|snippets| snippets.clone())
            .map_err(|_| AppError::StorageMessage("memory store lock poisoned".to_string()))
    }

    fn put(&self, snippets: &[Snippet]) -> Result<(), AppError> {
        ensure_unique_ids(snippets)?;
        let mut guard = self
            .snippets
            .lock()
            .map_err(|_| AppError::StorageMessage("memory store lock poisoned".to_string()))?;
        *guard = snippets.to_vec();
        Ok(())
    }

    fn update_with(&self, edit: &mut EditFn<'_>) -> Result<(), AppError> {
        let mut guard = self
            .snippets
            .lock()
            .map_err(|_| AppError::StorageMessage("memory store lock poisoned".to_string()))?;
        let mut next = guard.clone();
        edit(&mut next)?;
        ensure_unique_ids(&next)?;
        *guard = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(id: &str, title: &str) -> Snippet {
        Snippet {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("<p>{}</p>", title),
        }
    }

    #[test]
    fn memory_store_round_trips_and_finds_by_id() {
        let store = MemoryStore::default();
        assert!(store.get().expect("get").is_empty());

        store
            .put(&[snippet("1", "one"), snippet("2", "two")])
            .expect("put");
        assert_eq!(store.get().expect("get").len(), 2);
        assert_eq!(
            store.find_snippet("2").expect("find").map(|s| s.title),
            Some("two".to_string())
        );
        assert!(store.find_snippet("3").expect("find").is_none());
    }

    #[test]
    fn put_rejects_duplicate_ids_and_keeps_previous_list() {
        let store = MemoryStore::with_snippets(vec![snippet("1", "one")]);
        let err = store
            .put(&[snippet("a", "x"), snippet("a", "y")])
            .expect_err("duplicate ids");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(store.get().expect("get"), vec![snippet("1", "one")]);
    }

    #[test]
    fn update_with_commits_only_successful_edits() {
        let store = MemoryStore::with_snippets(vec![snippet("1", "one")]);
        store
            .update_with(&mut |list| {
                list.push(snippet("2", "two"));
                Ok(())
            })
            .expect("edit");
        assert_eq!(store.get().expect("get").len(), 2);

        let err = store
            .update_with(&mut |list| {
                list.clear();
                Err(AppError::NotFound)
            })
            .expect_err("failing edit");
        assert!(matches!(err, AppError::NotFound));
        assert!(store
            .update_with(&mut |list| {
                list.push(snippet("1", "dup"));
                Ok(())
            })
            .is_err());
        assert_eq!(store.get().expect("get").len(), 2);
    }

    #[test]
    fn arc_wrapped_store_delegates() {
        let store = Arc::new(MemoryStore::with_snippets(vec![snippet("1", "one")]));
        let shared: Arc<MemoryStore> = Arc::clone(&store);
        shared.put(&[snippet("9", "nine")]).expect("put");
        assert_eq!(store.get().expect("get")[0].id, "9");
    }
}
