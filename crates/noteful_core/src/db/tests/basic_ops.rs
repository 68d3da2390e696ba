//! Basic database CRUD tests.

use super::*;

#[test]
fn reopening_the_same_directory_keeps_rows() {
    let temp_dir = tempfile::TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("db");
    let path = path.to_str().expect("path");

    let folder = Folder::new("Persistent".to_string());
    {
        let db = Database::new(path).expect("open");
        db.folders.create(&folder).expect("create");
    }

    let reopened = Database::new(path).expect("reopen");
    let loaded = reopened
        .folders
        .get(folder.id)
        .expect("get")
        .expect("folder survives reopen");
    assert_eq!(loaded, folder);
}

#[test]
fn note_create_get_replace_delete_roundtrip() {
    let (db, _temp) = setup_temp_db();
    let folder = ObjectId::new();
    let note = insert_note(&db, "Title", Some("Content"), Some(folder), &[]);

    let retrieved = db.notes.get(note.id).expect("get").expect("exists");
    assert_eq!(retrieved, note);

    let tag = ObjectId::new();
    let replaced = db
        .notes
        .replace(
            note.id,
            NoteFields {
                title: "Renamed".to_string(),
                content: None,
                folder_id: None,
                tags: vec![tag],
            },
        )
        .expect("replace")
        .expect("replaced");
    assert_eq!(replaced.title, "Renamed");
    assert!(replaced.content.is_none());
    assert!(replaced.folder_id.is_none());
    assert_eq!(replaced.tags, vec![tag]);
    assert_eq!(replaced.created_at, note.created_at);
    assert!(replaced.updated_at >= note.updated_at);

    assert_eq!(db.notes.get(note.id).expect("get"), Some(replaced));

    assert!(db.notes.delete(note.id).expect("delete"));
    assert!(db.notes.get(note.id).expect("get").is_none());
    assert!(!db.notes.delete(note.id).expect("second delete is a no-op"));
    assert!(db.notes.find(&NoteFilter::default()).expect("find").is_empty());
}

#[test]
fn replace_missing_note_returns_none() {
    let (db, _temp) = setup_temp_db();
    let result = db
        .notes
        .replace(
            ObjectId::new(),
            NoteFields {
                title: "ghost".to_string(),
                ..NoteFields::default()
            },
        )
        .expect("replace");
    assert!(result.is_none());
}

#[test]
fn note_create_rejects_duplicate_id_without_overwrite() {
    let (db, _temp) = setup_temp_db();
    let original = insert_note(&db, "first", None, None, &[]);

    let mut conflicting = original.clone();
    conflicting.title = "second".to_string();
    let err = db
        .notes
        .create(&conflicting)
        .expect_err("duplicate id create must fail");
    assert!(
        matches!(err, AppError::StorageMessage(ref message) if message.contains("already exists")),
        "unexpected duplicate-create error: {}",
        err
    );
    let stored = db.notes.get(original.id).expect("get").expect("row");
    assert_eq!(stored.title, "first");
}

#[test]
fn folder_and_tag_crud_roundtrip() {
    let (db, _temp) = setup_temp_db();

    let folder = Folder::new("Work".to_string());
    db.folders.create(&folder).expect("create folder");
    assert_eq!(db.folders.get(folder.id).expect("get"), Some(folder.clone()));

    let renamed = db
        .folders
        .rename(folder.id, "Personal".to_string())
        .expect("rename")
        .expect("folder exists");
    assert_eq!(renamed.name, "Personal");
    assert_eq!(renamed.created_at, folder.created_at);

    let tag = Tag::new("urgent".to_string());
    db.tags.create(&tag).expect("create tag");
    assert_eq!(db.tags.list().expect("list"), vec![tag]);

    assert!(db
        .folders
        .rename(ObjectId::new(), "Nobody".to_string())
        .expect("rename missing")
        .is_none());
}

#[test]
fn get_unknown_ids_returns_none() {
    let (db, _temp) = setup_temp_db();
    let id = ObjectId::new();
    assert!(db.folders.get(id).expect("folder").is_none());
    assert!(db.tags.get(id).expect("tag").is_none());
    assert!(db.notes.get(id).expect("note").is_none());
}
