use prospecto_core::domain::{LeadId, LeadStatus, MessageSender};
use prospecto_store::error::StoreError;
use prospecto_store::{JsonStore, LeadNew, LeadStore, LeadUpdate, MessageNew};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const NOW: i64 = 1_700_000_000;

fn open_store(temp: &TempDir) -> JsonStore {
    JsonStore::open(temp.path().join("leads.json")).expect("open store")
}

fn sample_lead() -> LeadNew {
    LeadNew {
        name: "Jane Doe".to_string(),
        phone: "5551234567".to_string(),
        email: "jane@x.com".to_string(),
        source: "01".to_string(),
        ..Default::default()
    }
}

#[test]
fn missing_file_reads_as_empty_store() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp);
    assert!(store.get_all().expect("get all").is_empty());
}

#[test]
fn create_then_get_roundtrip() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp);

    let created = store.create(NOW, sample_lead()).expect("create");
    assert_eq!(created.status, LeadStatus::New);
    assert_eq!(created.created_at, NOW);

    let fetched = store
        .get_by_id(created.id)
        .expect("get by id")
        .expect("lead exists");
    assert_eq!(fetched, created);
}

#[test]
fn update_keeps_previous_document_in_backup() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp);

    let created = store.create(NOW, sample_lead()).expect("create");
    let updated = store
        .update(
            NOW + 10,
            created.id,
            LeadUpdate {
                status: Some(LeadStatus::Contacted),
                ..Default::default()
            },
        )
        .expect("update")
        .expect("lead exists");
    assert_eq!(updated.status, LeadStatus::Contacted);

    let backup_raw = fs::read_to_string(store.backup_path()).expect("read backup");
    let backup: Value = serde_json::from_str(&backup_raw).expect("parse backup");
    assert_eq!(backup["leads"][0]["status"], "new");

    let primary_raw = fs::read_to_string(store.path()).expect("read primary");
    let primary: Value = serde_json::from_str(&primary_raw).expect("parse primary");
    assert_eq!(primary["leads"][0]["status"], "contacted");
}

#[test]
fn update_unknown_id_returns_none_without_side_effects() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp);
    store.create(NOW, sample_lead()).expect("create");

    let result = store
        .update(
            NOW + 10,
            LeadId::new(),
            LeadUpdate {
                status: Some(LeadStatus::Enrolled),
                ..Default::default()
            },
        )
        .expect("update should not error");
    assert!(result.is_none());
    assert_eq!(store.get_all().expect("get all").len(), 1);
}

#[test]
fn delete_unknown_id_returns_false() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp);
    assert!(!store.delete(LeadId::new()).expect("delete"));

    let created = store.create(NOW, sample_lead()).expect("create");
    assert!(store.delete(created.id).expect("delete"));
    assert!(store.get_by_id(created.id).expect("get").is_none());
}

#[test]
fn corrupt_primary_falls_back_to_backup() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp);

    let created = store.create(NOW, sample_lead()).expect("create");
    // Second write populates the backup generation.
    store
        .update(
            NOW + 10,
            created.id,
            LeadUpdate {
                observations: Some("called twice".to_string()),
                ..Default::default()
            },
        )
        .expect("update")
        .expect("lead exists");

    fs::write(store.path(), "{ not json").expect("corrupt primary");

    let leads = store.get_all().expect("fall back to backup");
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].id, created.id);
}

#[test]
fn corrupt_primary_and_backup_is_fatal() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp);
    store.create(NOW, sample_lead()).expect("create");

    fs::write(store.path(), "{ not json").expect("corrupt primary");
    fs::write(store.backup_path(), "also not json").expect("corrupt backup");

    let err = store.get_all().expect_err("both generations unreadable");
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn append_message_preserves_order_and_flags_unread() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp);
    let created = store.create(NOW, sample_lead()).expect("create");

    store
        .append_message(
            NOW + 1,
            created.id,
            MessageNew {
                sender: MessageSender::Executive,
                content: "Hola, ¿sigues interesada?".to_string(),
                sent_at: NOW + 1,
            },
        )
        .expect("append")
        .expect("lead exists");
    store
        .append_message(
            NOW + 2,
            created.id,
            MessageNew {
                sender: MessageSender::Prospect,
                content: "Sí, mándame información".to_string(),
                sent_at: NOW + 2,
            },
        )
        .expect("append")
        .expect("lead exists");

    let lead = store
        .get_by_id(created.id)
        .expect("get")
        .expect("lead exists");
    assert_eq!(lead.history.len(), 2);
    assert_eq!(lead.history[0].sender, MessageSender::Executive);
    assert_eq!(lead.history[1].sender, MessageSender::Prospect);
    assert!(lead.has_unread_messages);

    let lead = store
        .mark_read(NOW + 3, created.id)
        .expect("mark read")
        .expect("lead exists");
    assert!(!lead.has_unread_messages);
}

#[test]
fn get_all_preserves_insertion_order() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp);

    for n in 0..3 {
        store
            .create(
                NOW + n,
                LeadNew {
                    name: format!("Lead {n}"),
                    ..Default::default()
                },
            )
            .expect("create");
    }

    let names: Vec<String> = store
        .get_all()
        .expect("get all")
        .into_iter()
        .map(|lead| lead.name)
        .collect();
    assert_eq!(names, ["Lead 0", "Lead 1", "Lead 2"]);
}

#[test]
fn backup_to_rejects_primary_and_backup_paths() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp);
    store.create(NOW, sample_lead()).expect("create");

    let err = store.backup_to(store.path()).expect_err("primary path");
    assert!(matches!(err, StoreError::InvalidBackupPath(_)));
    let err = store
        .backup_to(store.backup_path())
        .expect_err("backup path");
    assert!(matches!(err, StoreError::InvalidBackupPath(_)));

    let out = temp.path().join("snapshot.json");
    store.backup_to(&out).expect("snapshot");
    assert!(out.exists());
}
