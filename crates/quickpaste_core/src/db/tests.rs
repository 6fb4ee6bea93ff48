//! Storage-area tests against a real redb file.

use super::*;
use crate::{
    models::{
        settings::{SettingsPatch, SortMode, Theme},
        snippet::{CreateSnippetRequest, Snippet, UpdateSnippetRequest},
    },
    store::SnippetStore,
    test_support::setup_temp_db,
};

fn create(db: &Database, title: &str, content: &str) -> Snippet {
    db.snippets
        .create(CreateSnippetRequest {
            title: title.to_string(),
            content: content.to_string(),
        })
        .expect("create")
}

#[test]
fn create_list_and_find_preserve_insertion_order() {
    let (db, _dir) = setup_temp_db();
    let first = create(&db, "First", "<p>one</p>");
    let second = create(&db, "Second", "two");

    let ids: Vec<String> = db
        .snippets
        .list()
        .expect("list")
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);
    assert_eq!(
        db.snippets.find(&second.id).expect("find").map(|s| s.content),
        Some("two".to_string())
    );
    assert!(db.snippets.find("missing").expect("find").is_none());
}

#[test]
fn create_rejects_blank_fields_without_writing() {
    let (db, _dir) = setup_temp_db();
    let err = db
        .snippets
        .create(CreateSnippetRequest {
            title: "   ".to_string(),
            content: "x".to_string(),
        })
        .expect_err("blank title");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(db.snippets.list().expect("list").is_empty());
}

#[test]
fn update_keeps_id_and_validates_merged_fields() {
    let (db, _dir) = setup_temp_db();
    let snippet = create(&db, "Greeting", "<b>hi</b>");

    let updated = db
        .snippets
        .update(
            &snippet.id,
            UpdateSnippetRequest {
                title: Some(" Hello ".to_string()),
                content: None,
            },
        )
        .expect("update")
        .expect("exists");
    assert_eq!(updated.id, snippet.id);
    assert_eq!(updated.title, "Hello");
    assert_eq!(updated.content, "<b>hi</b>");

    let err = db
        .snippets
        .update(
            &snippet.id,
            UpdateSnippetRequest {
                title: None,
                content: Some("<br>".to_string()),
            },
        )
        .expect_err("markup-only content");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(
        db.snippets.find(&snippet.id).expect("find").map(|s| s.content),
        Some("<b>hi</b>".to_string()),
        "failed update must not commit"
    );

    assert!(db
        .snippets
        .update("missing", UpdateSnippetRequest::default())
        .expect("update missing")
        .is_none());
}

#[test]
fn delete_reports_whether_anything_was_removed() {
    let (db, _dir) = setup_temp_db();
    let snippet = create(&db, "Temp", "x");
    assert!(db.snippets.delete(&snippet.id).expect("delete"));
    assert!(!db.snippets.delete(&snippet.id).expect("delete again"));
    assert!(db.snippets.list().expect("list").is_empty());
}

#[test]
fn import_merges_and_skips_existing_ids() {
    let (db, _dir) = setup_temp_db();
    db.snippets
        .replace_all(&[Snippet {
            id: "1".to_string(),
            title: "kept".to_string(),
            content: "old".to_string(),
        }])
        .expect("seed");

    let summary = db
        .snippets
        .import(vec![
            Snippet {
                id: "1".to_string(),
                title: "ignored".to_string(),
                content: "new".to_string(),
            },
            Snippet {
                id: "2".to_string(),
                title: "added".to_string(),
                content: "x".to_string(),
            },
        ])
        .expect("import");
    assert_eq!(summary.added, 1);
    assert_eq!(summary.skipped, 1);

    let list = db.snippets.list().expect("list");
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].title, "kept");
}

#[test]
fn store_trait_put_replaces_and_rejects_duplicates() {
    let (db, _dir) = setup_temp_db();
    let store: &dyn SnippetStore = &db.snippets;
    let snippet = Snippet {
        id: "a".to_string(),
        title: "t".to_string(),
        content: "c".to_string(),
    };
    store.put(std::slice::from_ref(&snippet)).expect("put");
    assert_eq!(store.get().expect("get"), vec![snippet.clone()]);
    assert!(store.put(&[snippet.clone(), snippet]).is_err());
    assert_eq!(store.get().expect("get").len(), 1);
}

#[test]
fn data_survives_reopen() {
    let (db, dir) = setup_temp_db();
    let snippet = create(&db, "Persistent", "body");
    db.settings
        .update(SettingsPatch {
            theme: Some(Theme::Dark),
            ..SettingsPatch::default()
        })
        .expect("settings");
    drop(db);

    let reopened =
        Database::new(dir.path().join("db").to_str().expect("path")).expect("reopen");
    assert_eq!(
        reopened.snippets.find(&snippet.id).expect("find").map(|s| s.title),
        Some("Persistent".to_string())
    );
    assert_eq!(reopened.settings.get().expect("settings").theme, Theme::Dark);
}

#[test]
fn settings_default_then_merge_partial_updates() {
    let (db, _dir) = setup_temp_db();
    assert_eq!(db.settings.get().expect("get"), Default::default());

    let merged = db
        .settings
        .update(SettingsPatch {
            sort: Some(SortMode::Alpha),
            ..SettingsPatch::default()
        })
        .expect("update");
    assert_eq!(merged.sort, SortMode::Alpha);
    assert_eq!(merged.theme, Theme::Light);
    assert_eq!(db.settings.get().expect("get"), merged);
}

#[test]
fn unreadable_settings_fall_back_to_defaults() {
    let (db, _dir) = setup_temp_db();
    let write_txn = db.db.begin_write().expect("txn");
    {
        let mut table = write_txn.open_table(tables::STORAGE_AREA).expect("table");
        table
            .insert(crate::SETTINGS_KEY, b"{not json".as_slice())
            .expect("insert");
    }
    write_txn.commit().expect("commit");

    assert_eq!(db.settings.get().expect("get"), Default::default());
}
