use eventdesk_core::seed::{demo_documents, RUN_SHEET_ID, SAFETY_PLAN_ID};
use eventdesk_core::{
    Document, DocumentId, DocumentRepository, DocumentStore, DocumentVersion, FixedClock,
    NewVersion, PublishStatus, VersionService, VersionServiceError,
};
use uuid::Uuid;

const NOW: i64 = 1_710_000_000_000;

fn demo_service() -> VersionService<DocumentStore> {
    VersionService::new(DocumentStore::with_documents(
        demo_documents(),
        Box::new(FixedClock(NOW)),
    ))
}

fn request(label: Option<&str>, changes: &str) -> NewVersion {
    NewVersion {
        label: label.map(str::to_string),
        changes: changes.to_string(),
        created_by: "morgan.ops".to_string(),
        ..NewVersion::default()
    }
}

fn version_id_of(service: &VersionService<DocumentStore>, doc: DocumentId, label: &str) -> Uuid {
    service
        .repo()
        .get_document(doc)
        .unwrap()
        .versions
        .iter()
        .find(|v| v.version == label)
        .unwrap()
        .id
}

#[test]
fn create_version_stamps_and_becomes_current() {
    let mut service = demo_service();

    let created = service
        .create_version(RUN_SHEET_ID, request(Some("1.2"), "Added encore slot"))
        .unwrap();

    assert_eq!(created.document_id, RUN_SHEET_ID);
    assert_eq!(created.created_at, NOW);
    assert_eq!(created.status, PublishStatus::Draft);
    let current = service.current(RUN_SHEET_ID).unwrap().unwrap();
    assert_eq!(current.id, created.id);
}

#[test]
fn create_version_without_label_uses_next_minor() {
    let mut service = demo_service();
    assert_eq!(service.suggest_next_label(SAFETY_PLAN_ID).unwrap(), "2.2");

    let created = service
        .create_version(SAFETY_PLAN_ID, request(None, "Final inspection"))
        .unwrap();
    assert_eq!(created.version, "2.2");
}

#[test]
fn create_version_rejects_duplicate_label() {
    let mut service = demo_service();

    let err = service
        .create_version(RUN_SHEET_ID, request(Some(" 1.1 "), "again"))
        .unwrap_err();

    assert_eq!(
        err,
        VersionServiceError::DuplicateLabel {
            document_id: RUN_SHEET_ID,
            label: "1.1".to_string(),
        }
    );
    assert_eq!(
        service.repo().get_document(RUN_SHEET_ID).unwrap().versions.len(),
        2
    );
}

#[test]
fn create_version_validates_input() {
    let mut service = demo_service();

    let blank_changes = service
        .create_version(RUN_SHEET_ID, request(Some("1.2"), "   "))
        .unwrap_err();
    assert_eq!(blank_changes, VersionServiceError::BlankChanges);

    let bad_label = service
        .create_version(RUN_SHEET_ID, request(Some("v 2"), "x"))
        .unwrap_err();
    assert!(matches!(bad_label, VersionServiceError::InvalidLabel(_)));

    let missing = Uuid::new_v4();
    let not_found = service
        .create_version(missing, request(Some("1.0"), "x"))
        .unwrap_err();
    assert_eq!(not_found, VersionServiceError::DocumentNotFound(missing));
}

#[test]
fn history_is_sorted_by_creation_time() {
    let service = demo_service();

    let labels: Vec<&str> = service
        .history(RUN_SHEET_ID)
        .unwrap()
        .into_iter()
        .map(|v| v.version.as_str())
        .collect();

    assert_eq!(labels, vec!["1.0", "1.1"]);
}

#[test]
fn revert_example_keeps_both_versions() {
    let mut service = demo_service();
    let target = version_id_of(&service, RUN_SHEET_ID, "1.0");

    let doc = service.revert(RUN_SHEET_ID, target).unwrap();

    assert_eq!(doc.current_version, "1.0");
    assert_eq!(doc.versions.len(), 2);
    assert_eq!(doc.updated_at, NOW);
}

#[test]
fn revert_unknown_version_is_an_error() {
    let mut service = demo_service();
    let missing = Uuid::new_v4();

    let err = service.revert(RUN_SHEET_ID, missing).unwrap_err();

    assert_eq!(
        err,
        VersionServiceError::VersionNotFound {
            document_id: RUN_SHEET_ID,
            version_id: missing,
        }
    );
}

#[test]
fn review_is_recorded_once() {
    let mut service = demo_service();
    let target = version_id_of(&service, RUN_SHEET_ID, "1.1");

    service.record_review(RUN_SHEET_ID, target, "casey.audio").unwrap();
    let reviewed = service
        .record_review(RUN_SHEET_ID, target, " casey.audio ")
        .unwrap();

    assert_eq!(reviewed.reviewed_by, vec!["casey.audio".to_string()]);
}

#[test]
fn approve_publishes_and_stamps_approval() {
    let mut service = demo_service();
    let target = version_id_of(&service, RUN_SHEET_ID, "1.1");

    let approved = service.approve(RUN_SHEET_ID, target, "riley.pm").unwrap();

    assert_eq!(approved.status, PublishStatus::Published);
    assert_eq!(approved.approved_by.as_deref(), Some("riley.pm"));
    assert_eq!(approved.approved_at, Some(NOW));
}

#[test]
fn approve_rejects_archived_version() {
    let mut service = demo_service();
    let target = version_id_of(&service, RUN_SHEET_ID, "1.0");
    service.archive(RUN_SHEET_ID, target).unwrap();

    let err = service.approve(RUN_SHEET_ID, target, "riley.pm").unwrap_err();

    assert_eq!(err, VersionServiceError::VersionArchived(target));
}

#[test]
fn comments_append_in_order() {
    let mut service = demo_service();
    let target = version_id_of(&service, RUN_SHEET_ID, "1.1");

    let comment = service
        .add_comment(RUN_SHEET_ID, target, "casey.audio", "Lighting confirmed.")
        .unwrap();
    assert_eq!(comment.created_at, NOW);

    let blank = service
        .add_comment(RUN_SHEET_ID, target, "casey.audio", "  ")
        .unwrap_err();
    assert_eq!(blank, VersionServiceError::BlankComment);

    let doc = service.repo().get_document(RUN_SHEET_ID).unwrap();
    let thread = &doc.version(target).unwrap().comments;
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[1].id, comment.id);
    assert_eq!(thread[1].content, "Lighting confirmed.");
}

#[test]
fn delete_refuses_sole_current_version() {
    let mut service = demo_service();
    let current = version_id_of(&service, RUN_SHEET_ID, "1.1");
    let older = version_id_of(&service, RUN_SHEET_ID, "1.0");

    let err = service.delete_version(RUN_SHEET_ID, current).unwrap_err();
    assert!(matches!(err, VersionServiceError::CannotDeleteCurrent { .. }));

    service.delete_version(RUN_SHEET_ID, older).unwrap();
    let report = service.integrity_report(RUN_SHEET_ID).unwrap();
    assert!(report.is_clean());
}

#[test]
fn delete_allows_current_when_label_is_shared() {
    let mut store = DocumentStore::with_clock(Box::new(FixedClock(NOW)));
    let doc = Document::new("Stage plot", "technical", "lee", 1);
    let doc_id = doc.id;
    store.add_document(doc);
    let first = DocumentVersion::new(doc_id, "1.0", "a", "lee", 2);
    let first_id = first.id;
    store.add_version(doc_id, first);
    store.add_version(doc_id, DocumentVersion::new(doc_id, "1.0", "b", "lee", 3));

    let mut service = VersionService::new(&mut store);
    assert_eq!(
        service.integrity_report(doc_id).unwrap().duplicate_labels,
        vec!["1.0".to_string()]
    );
    service.delete_version(doc_id, first_id).unwrap();
    assert!(service.integrity_report(doc_id).unwrap().is_clean());
}

#[test]
fn integrity_problems_lists_dangling_pointers() {
    let mut service = demo_service();
    let current = version_id_of(&service, RUN_SHEET_ID, "1.1");
    service.repo_mut().delete_version(RUN_SHEET_ID, current);

    let problems = service.integrity_problems();

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].document_id, RUN_SHEET_ID);
    assert_eq!(problems[0].dangling_current.as_deref(), Some("1.1"));
}
