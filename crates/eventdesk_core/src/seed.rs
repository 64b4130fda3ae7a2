//! Built-in demo documents the dashboard opens with.
//!
//! IDs and timestamps are fixed so demo output is reproducible.

use crate::model::document::{AccessLevel, Document, PublishStatus};
use crate::model::version::{DocumentVersion, VersionComment};
use uuid::Uuid;

pub const RUN_SHEET_ID: Uuid = Uuid::from_u128(0x0f5c_1a00_0000_4000_8000_0000_0000_0001);
pub const RIDER_ID: Uuid = Uuid::from_u128(0x0f5c_1a00_0000_4000_8000_0000_0000_0002);
pub const SAFETY_PLAN_ID: Uuid = Uuid::from_u128(0x0f5c_1a00_0000_4000_8000_0000_0000_0003);

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
/// 2024-03-01T00:00:00Z
const SEED_EPOCH_MS: i64 = 1_709_251_200_000;

fn version_id(n: u128) -> Uuid {
    Uuid::from_u128(0x0f5c_1a00_0000_4000_8000_0001_0000_0000 + n)
}

fn comment_id(n: u128) -> Uuid {
    Uuid::from_u128(0x0f5c_1a00_0000_4000_8000_0002_0000_0000 + n)
}

/// Returns the demo document collection.
pub fn demo_documents() -> Vec<Document> {
    vec![run_sheet(), rider(), safety_plan()]
}

fn run_sheet() -> Document {
    let mut doc = Document::with_id(
        RUN_SHEET_ID,
        "Main Stage Run Sheet",
        "operations",
        "morgan.ops",
        SEED_EPOCH_MS,
    );
    doc.description = "Minute-by-minute schedule for show day.".to_string();
    doc.tags = vec!["main-stage".to_string(), "schedule".to_string()];

    let mut first = DocumentVersion::with_id(
        version_id(1),
        RUN_SHEET_ID,
        "1.0",
        "Initial schedule",
        "morgan.ops",
        SEED_EPOCH_MS,
    );
    first.status = PublishStatus::Published;
    first.reviewed_by = vec!["riley.pm".to_string()];
    first.approved_by = Some("riley.pm".to_string());
    first.approved_at = Some(SEED_EPOCH_MS + DAY_MS / 2);

    let mut second = DocumentVersion::with_id(
        version_id(2),
        RUN_SHEET_ID,
        "1.1",
        "Moved changeover to 19:40",
        "morgan.ops",
        SEED_EPOCH_MS + 2 * DAY_MS,
    );
    second.comments = vec![VersionComment {
        id: comment_id(1),
        content: "Confirm with lighting before publishing.".to_string(),
        author: "riley.pm".to_string(),
        created_at: SEED_EPOCH_MS + 2 * DAY_MS + 3_600_000,
    }];

    doc.versions = vec![second, first];
    doc.current_version = "1.1".to_string();
    doc.updated_at = SEED_EPOCH_MS + 2 * DAY_MS;
    doc
}

fn rider() -> Document {
    let mut doc = Document::with_id(
        RIDER_ID,
        "Headliner Technical Rider",
        "contracts",
        "jordan.artist",
        SEED_EPOCH_MS + DAY_MS,
    );
    doc.tags = vec!["artist".to_string(), "audio".to_string()];
    doc.access_level = AccessLevel::Restricted;
    doc.allowed_users = vec!["casey.audio".to_string()];
    doc.allowed_roles = vec!["production-manager".to_string()];

    let mut version = DocumentVersion::with_id(
        version_id(3),
        RIDER_ID,
        "1.0",
        "Signed rider from agency",
        "jordan.artist",
        SEED_EPOCH_MS + DAY_MS,
    );
    version.file_name = Some("headliner-rider.pdf".to_string());
    version.file_size = Some(482_113);

    doc.versions = vec![version];
    doc.current_version = "1.0".to_string();
    doc.updated_at = SEED_EPOCH_MS + DAY_MS;
    doc
}

fn safety_plan() -> Document {
    let mut doc = Document::with_id(
        SAFETY_PLAN_ID,
        "Venue Safety Plan",
        "compliance",
        "sam.safety",
        SEED_EPOCH_MS,
    );
    doc.status = PublishStatus::Published;
    doc.tags = vec!["safety".to_string()];

    let labels = [
        ("1.0", "First draft"),
        ("2.0", "Council feedback"),
        ("2.1", "Exit signage update"),
    ];
    doc.versions = labels
        .iter()
        .zip(4u128..)
        .zip(0i64..)
        .map(|(((label, changes), n), day)| {
            let mut version = DocumentVersion::with_id(
                version_id(n),
                SAFETY_PLAN_ID,
                *label,
                *changes,
                "sam.safety",
                SEED_EPOCH_MS + day * DAY_MS,
            );
            version.status = PublishStatus::Published;
            version
        })
        .collect();
    // Reverted after the signage update failed inspection.
    doc.current_version = "2.0".to_string();
    doc.updated_at = SEED_EPOCH_MS + 3 * DAY_MS;
    doc
}

#[cfg(test)]
mod tests {
    use super::demo_documents;

    #[test]
    fn demo_documents_are_valid_and_pointers_resolve() {
        for document in demo_documents() {
            document.validate().unwrap();
            assert!(!document.has_dangling_current_version(), "{}", document.id);
            assert!(document.duplicate_version_labels().is_empty());
        }
    }
}
