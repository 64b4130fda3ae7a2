use eventdesk_core::{
    Document, DocumentId, DocumentPatch, DocumentRepository, DocumentStore, DocumentVersion,
    FixedClock, PublishStatus, VersionId, VersionPatch,
};
use uuid::Uuid;

const NOW: i64 = 1_700_000_000_000;

fn store_with_run_sheet() -> (DocumentStore, DocumentId, VersionId, VersionId) {
    let mut store = DocumentStore::with_clock(Box::new(FixedClock(NOW)));
    let doc = Document::new("Run sheet", "operations", "ana", 1_000);
    let doc_id = doc.id;
    store.add_document(doc);

    let first = DocumentVersion::new(doc_id, "1.0", "initial", "ana", 2_000);
    let second = DocumentVersion::new(doc_id, "1.1", "changeover moved", "ana", 3_000);
    let (first_id, second_id) = (first.id, second.id);
    store.add_version(doc_id, first);
    store.add_version(doc_id, second);
    (store, doc_id, first_id, second_id)
}

#[test]
fn add_version_appends_and_moves_current_pointer() {
    let (mut store, doc_id, _, _) = store_with_run_sheet();
    let version = DocumentVersion::new(doc_id, "2.0", "new layout", "lee", 4_000);
    let version_id = version.id;

    assert!(store.add_version(doc_id, version));

    let doc = store.get_document(doc_id).unwrap();
    assert_eq!(doc.versions.len(), 3);
    assert!(doc.version(version_id).is_some());
    assert_eq!(doc.current_version, "2.0");
    assert_eq!(doc.updated_at, NOW);
}

#[test]
fn add_version_does_not_check_label_uniqueness() {
    let (mut store, doc_id, _, _) = store_with_run_sheet();
    let duplicate = DocumentVersion::new(doc_id, "1.0", "same label", "lee", 5_000);

    assert!(store.add_version(doc_id, duplicate));

    let doc = store.get_document(doc_id).unwrap();
    assert_eq!(doc.versions.len(), 3);
    assert_eq!(doc.duplicate_version_labels(), vec!["1.0".to_string()]);
}

#[test]
fn update_version_changes_only_the_target_status() {
    let (mut store, doc_id, first_id, second_id) = store_with_run_sheet();
    let before = store.get_document(doc_id).unwrap().clone();

    let patch = VersionPatch::new().status(PublishStatus::Published);
    assert!(store.update_version(doc_id, first_id, &patch));

    let after = store.get_document(doc_id).unwrap();
    let updated = after.version(first_id).unwrap();
    let mut expected = before.version(first_id).unwrap().clone();
    expected.status = PublishStatus::Published;
    assert_eq!(updated, &expected);
    assert_eq!(after.version(second_id), before.version(second_id));
    assert_eq!(after.current_version, before.current_version);
    assert_eq!(after.updated_at, before.updated_at);
    assert_eq!(after.title, before.title);
}

#[test]
fn delete_version_removes_once_and_is_idempotent() {
    let (mut store, doc_id, first_id, _) = store_with_run_sheet();

    assert!(store.delete_version(doc_id, first_id));
    assert_eq!(store.get_document(doc_id).unwrap().versions.len(), 1);

    assert!(!store.delete_version(doc_id, first_id));
    assert_eq!(store.get_document(doc_id).unwrap().versions.len(), 1);
}

#[test]
fn delete_current_version_leaves_pointer_untouched() {
    let (mut store, doc_id, _, second_id) = store_with_run_sheet();

    assert!(store.delete_version(doc_id, second_id));

    let doc = store.get_document(doc_id).unwrap();
    assert_eq!(doc.current_version, "1.1");
    assert!(doc.has_dangling_current_version());
}

#[test]
fn revert_moves_pointer_without_touching_versions() {
    let (mut store, doc_id, first_id, _) = store_with_run_sheet();
    let versions_before = store.get_document(doc_id).unwrap().versions.clone();
    assert_eq!(store.get_document(doc_id).unwrap().current_version, "1.1");

    assert!(store.revert_to_version(doc_id, first_id));

    let doc = store.get_document(doc_id).unwrap();
    assert_eq!(doc.current_version, "1.0");
    assert_eq!(doc.versions.len(), 2);
    assert_eq!(doc.versions, versions_before);
    assert_eq!(doc.updated_at, NOW);
}

#[test]
fn revert_to_unknown_version_is_noop() {
    let (mut store, doc_id, _, _) = store_with_run_sheet();
    let before = store.documents().to_vec();

    assert!(!store.revert_to_version(doc_id, Uuid::new_v4()));
    assert_eq!(store.documents(), before.as_slice());
}

#[test]
fn operations_on_missing_document_leave_collection_unchanged() {
    let (mut store, _, first_id, _) = store_with_run_sheet();
    let before = store.documents().to_vec();
    let missing = Uuid::new_v4();

    assert!(!store.add_version(
        missing,
        DocumentVersion::new(missing, "9.9", "ghost", "ana", 1)
    ));
    assert!(!store.update_version(
        missing,
        first_id,
        &VersionPatch::new().changes("ghost")
    ));
    assert!(!store.delete_version(missing, first_id));
    assert!(!store.revert_to_version(missing, first_id));
    assert!(!store.update_document(missing, &DocumentPatch::new().title("ghost")));
    assert!(!store.delete_document(missing));

    assert_eq!(store.documents(), before.as_slice());
}

#[test]
fn update_document_merges_partial_fields() {
    let (mut store, doc_id, _, _) = store_with_run_sheet();
    let before = store.get_document(doc_id).unwrap().clone();

    let patch = DocumentPatch::new()
        .title("Main stage run sheet")
        .status(PublishStatus::Published);
    assert!(store.update_document(doc_id, &patch));

    let after = store.get_document(doc_id).unwrap();
    assert_eq!(after.title, "Main stage run sheet");
    assert_eq!(after.status, PublishStatus::Published);
    assert_eq!(after.category, before.category);
    assert_eq!(after.versions, before.versions);
    assert_eq!(after.current_version, before.current_version);
}

#[test]
fn set_documents_replaces_collection_wholesale() {
    let (mut store, doc_id, _, _) = store_with_run_sheet();
    let replacement = vec![
        Document::new("Rider", "contracts", "lee", 1),
        Document::new("Stage plot", "technical", "lee", 2),
    ];

    store.set_documents(replacement.clone());

    assert_eq!(store.len(), 2);
    assert!(store.get_document(doc_id).is_none());
    assert_eq!(store.documents(), replacement.as_slice());
}

#[test]
fn delete_document_removes_only_the_match() {
    let (mut store, doc_id, _, _) = store_with_run_sheet();
    let other = Document::new("Rider", "contracts", "lee", 1);
    let other_id = other.id;
    store.add_document(other);

    assert!(store.delete_document(doc_id));
    assert_eq!(store.len(), 1);
    assert!(store.get_document(other_id).is_some());
}
