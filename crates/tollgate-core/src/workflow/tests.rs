//! Tests for the workflow module.

use jiff::Timestamp;
use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::{
    machine::Transition,
    models::{HistoryAction, ProcessData, StatusFilter, StepId},
    params::{Id, ListProcesses, SaveDraft, SelectRole, SendToNext},
    sla::SlaTier,
};

/// Helper function to create a test store
async fn create_test_store() -> (TempDir, ProcessStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = ProcessStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, store)
}

fn at(hours: i64) -> Timestamp {
    Timestamp::from_second(1_736_000_000 + hours * 3600).unwrap()
}

fn answers(pairs: &[(&str, serde_json::Value)]) -> ProcessData {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn id(process: &Process) -> Id {
    Id {
        id: process.id.clone(),
    }
}

#[tokio::test]
async fn test_create_process_ids_and_order() {
    let (_temp_dir, mut store) = create_test_store().await;

    let first = store.create_process_at(at(0));
    let second = store.create_process_at(at(0));

    // 1_736_000_000 is 2025-01-04 in UTC
    assert_eq!(first.id, "REQ-250104-001");
    assert_eq!(second.id, "REQ-250104-002");
    assert_eq!(store.processes()[0].id, second.id);
    assert_eq!(store.processes()[1].id, first.id);
    assert!(!store.is_dirty());
}

#[tokio::test]
async fn test_sequence_skips_taken_ids() {
    let (_temp_dir, mut store) = create_test_store().await;
    store
        .state
        .processes
        .push(Process::open("REQ-250104-002".to_string(), at(0)));

    // One stored process suggests 002, which is taken.
    assert_eq!(store.create_process_at(at(0)).id, "REQ-250104-003");
}

#[tokio::test]
async fn test_custom_id_prefix() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut store = ProcessStoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_id_prefix(Some("CAD"))
        .build()
        .await
        .expect("Failed to create store");

    assert_eq!(store.create_process_at(at(0)).id, "CAD-250104-001");
}

#[tokio::test]
async fn test_invalid_id_prefix_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = ProcessStoreBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .with_id_prefix(Some("A-B"))
        .build()
        .await;

    assert!(matches!(result, Err(WorkflowError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_walkthrough_skipping_services() {
    let (_temp_dir, mut store) = create_test_store().await;
    let process = store.create_process_at(at(0));

    store
        .save_draft_at(
            &SaveDraft {
                id: process.id.clone(),
                data: answers(&[
                    ("nomeSolicitante", json!("Ana")),
                    ("objetivo", json!("Novo reagente")),
                    ("itemNacional", json!(false)),
                ]),
            },
            at(1),
        )
        .expect("Failed to save draft");

    let transition = store
        .send_to_next_at(
            &SendToNext {
                id: process.id.clone(),
                notes: Some("ok".to_string()),
            },
            at(2),
        )
        .expect("Failed to send");

    assert_eq!(
        transition,
        Transition::Advanced {
            from: StepId::Primary,
            to: StepId::Fiscal
        }
    );

    let stored = store.get_process(&id(&process)).expect("process exists");
    assert_eq!(stored.current_step_id, StepId::Fiscal);
    assert_eq!(stored.history.len(), 2);
    assert_eq!(stored.history[0].action, HistoryAction::Sent);
    assert_eq!(stored.history[0].notes.as_deref(), Some("ok"));
    assert_eq!(stored.history[1].action, HistoryAction::Saved);
}

#[tokio::test]
async fn test_unknown_process() {
    let (_temp_dir, mut store) = create_test_store().await;
    let missing = Id {
        id: "REQ-000000-999".to_string(),
    };

    assert!(store.get_process(&missing).is_none());
    assert!(matches!(
        store.require_process(&missing),
        Err(WorkflowError::ProcessNotFound { .. })
    ));
    assert!(matches!(
        store.send_to_next(&SendToNext {
            id: missing.id.clone(),
            notes: None
        }),
        Err(WorkflowError::ProcessNotFound { .. })
    ));
    assert!(matches!(
        store.save_draft(&SaveDraft {
            id: missing.id,
            data: ProcessData::new()
        }),
        Err(WorkflowError::ProcessNotFound { .. })
    ));
}

#[tokio::test]
async fn test_validate_current_step() {
    let (_temp_dir, mut store) = create_test_store().await;
    let process = store.create_process();

    let err = store
        .validate_current_step(&id(&process))
        .expect_err("blank process must not validate");
    match err {
        WorkflowError::ValidationFailed { step, fields } => {
            assert_eq!(step, StepId::Primary);
            assert!(fields.contains(&"nomeSolicitante".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_sending_closed_process_writes_nothing() {
    let (_temp_dir, mut store) = create_test_store().await;
    let process = store.create_process();
    let send = SendToNext {
        id: process.id.clone(),
        notes: None,
    };

    let mut last = Transition::AlreadyClosed;
    for _ in 0..20 {
        last = store.send_to_next(&send).expect("send");
        if last == Transition::Closed {
            break;
        }
    }
    assert_eq!(last, Transition::Closed);

    let history_len = store.require_process(&id(&process)).expect("exists").history.len();
    assert_eq!(store.send_to_next(&send).expect("send"), Transition::AlreadyClosed);
    assert_eq!(
        store.require_process(&id(&process)).expect("exists").history.len(),
        history_len
    );
}

#[tokio::test]
async fn test_role_session_and_my_tasks() {
    let (_temp_dir, mut store) = create_test_store().await;
    let first = store.create_process();
    let second = store.create_process();
    store
        .send_to_next(&SendToNext {
            id: first.id.clone(),
            notes: None,
        })
        .expect("send");

    assert_eq!(store.current_role(), None);
    assert!(store.my_tasks().is_empty());

    store.select_role(&SelectRole {
        role: Role::PrimaryRequester,
    });
    let tasks: Vec<&str> = store.my_tasks().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(tasks, vec![second.id.as_str()]);
    assert!(store.can_edit(store.require_process(&id(&second)).expect("exists")));

    // Without itemNacional the services step is skipped.
    store.select_role(&SelectRole { role: Role::Fiscal });
    let tasks: Vec<&str> = store.my_tasks().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(tasks, vec![first.id.as_str()]);

    store.clear_role();
    assert_eq!(store.current_role(), None);
    assert!(!store.can_edit(store.require_process(&id(&first)).expect("exists")));
}

#[tokio::test]
async fn test_list_and_stats() {
    let (_temp_dir, mut store) = create_test_store().await;
    let open = store.create_process_at(at(0));
    let done = store.create_process_at(at(0));
    store
        .save_draft_at(
            &SaveDraft {
                id: open.id.clone(),
                data: answers(&[("nomeSolicitante", json!("Maria Silva"))]),
            },
            at(0),
        )
        .expect("save");

    let send = SendToNext {
        id: done.id.clone(),
        notes: None,
    };
    while store.send_to_next_at(&send, at(1)).expect("send") != Transition::Closed {}

    let pending = store.list_processes(&ListProcesses {
        status: StatusFilter::Pending,
        ..Default::default()
    });
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, open.id);

    let completed = store.list_processes(&ListProcesses {
        status: StatusFilter::Completed,
        ..Default::default()
    });
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, done.id);

    let found = store.list_processes(&ListProcesses {
        search: Some("maria".to_string()),
        ..Default::default()
    });
    assert_eq!(found.len(), 1);

    let summaries = store.list_summaries(&ListProcesses::default());
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries.0.first().map(|s| s.closed), Some(true));

    store.select_role(&SelectRole {
        role: Role::PrimaryRequester,
    });
    let stats = store.stats_at(at(1));
    assert_eq!(stats.total, 2);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.my_tasks, 1);
    // The primary step is untimed, so nothing is overdue.
    assert_eq!(stats.overdue, 0);
}

#[tokio::test]
async fn test_overdue_counted() {
    let (_temp_dir, mut store) = create_test_store().await;
    let process = store.create_process_at(at(0));
    store
        .send_to_next_at(
            &SendToNext {
                id: process.id.clone(),
                notes: None,
            },
            at(0),
        )
        .expect("send");

    // Fiscal has 48h.
    assert_eq!(store.stats_at(at(47)).overdue, 0);
    assert_eq!(store.stats_at(at(49)).overdue, 1);
    let summary = crate::models::ProcessSummary::at(&store.processes()[0], at(49));
    assert_eq!(summary.sla.tier, SlaTier::Overdue);
}

#[tokio::test]
async fn test_state_survives_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let created = {
        let mut store = ProcessStoreBuilder::new()
            .with_database_path(Some(&db_path))
            .build()
            .await
            .expect("Failed to create store");
        let process = store.create_process();
        store
            .save_draft(&SaveDraft {
                id: process.id.clone(),
                data: answers(&[("itemNacional", json!(true))]),
            })
            .expect("save");
        store.select_role(&SelectRole { role: Role::Fiscal });
        store.snapshot()
    };

    let reloaded = ProcessStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .with_demo_seed(true)
        .build()
        .await
        .expect("Failed to reload store");

    assert_eq!(reloaded.snapshot(), created);
    assert_eq!(reloaded.current_role(), Some(Role::Fiscal));
}

#[tokio::test]
async fn test_unreadable_state_falls_back_to_empty() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    {
        let mut db = Database::new(&db_path).expect("open db");
        db.store_value(STATE_KEY, "{not json").expect("store");
    }

    let store = ProcessStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("malformed state must not fail the build");
    assert!(store.processes().is_empty());
    assert_eq!(store.current_role(), None);

    let seeded = ProcessStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .with_demo_seed(true)
        .build()
        .await
        .expect("Failed to create store");
    assert_eq!(seeded.processes().len(), 2);
}

#[tokio::test]
async fn test_demo_seed_is_written_to_storage() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let seeded_ids: Vec<String> = {
        let store = ProcessStoreBuilder::new()
            .with_database_path(Some(&db_path))
            .with_demo_seed(true)
            .build()
            .await
            .expect("Failed to create store");
        assert!(!store.is_dirty());
        store.processes().iter().map(|p| p.id.clone()).collect()
    };
    assert_eq!(seeded_ids.len(), 2);

    let reopened = ProcessStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to reopen store");
    let reopened_ids: Vec<String> = reopened
        .processes()
        .iter()
        .map(|p| p.id.clone())
        .collect();
    assert_eq!(reopened_ids, seeded_ids);
}

#[tokio::test]
async fn test_corrupt_database_starts_dirty() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    std::fs::write(&db_path, vec![b'x'; 4096]).expect("write garbage");

    let store = ProcessStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("a corrupt database must not fail the build");
    assert!(store.processes().is_empty());
    assert!(store.is_dirty());

    let mut seeded = ProcessStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .with_demo_seed(true)
        .build()
        .await
        .expect("a corrupt database must not fail the build");
    assert_eq!(seeded.processes().len(), 2);
    assert!(seeded.is_dirty());
    assert!(matches!(
        seeded.flush(),
        Err(WorkflowError::PersistenceWriteFailed { .. })
    ));
}

#[tokio::test]
async fn test_failed_write_keeps_memory_and_marks_dirty() {
    let (temp_dir, mut store) = create_test_store().await;
    let db_path = temp_dir.path().join("test.db");

    // A directory where the database file should be makes every open fail.
    std::fs::remove_file(&db_path).expect("remove db");
    std::fs::create_dir(&db_path).expect("block db path");

    let process = store.create_process();
    assert!(store.is_dirty());
    assert!(store.get_process(&id(&process)).is_some());
    assert!(matches!(
        store.flush(),
        Err(WorkflowError::PersistenceWriteFailed { .. })
    ));
    assert!(store.is_dirty());

    std::fs::remove_dir(&db_path).expect("unblock db path");
    store.flush().expect("flush after recovery");
    assert!(!store.is_dirty());

    let reloaded = ProcessStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to reload store");
    assert_eq!(reloaded.processes().len(), 1);
}

#[tokio::test]
async fn test_ensure_editable() {
    let (_temp_dir, mut store) = create_test_store().await;
    let process = store.create_process();

    assert!(matches!(
        store.ensure_editable(&id(&process)),
        Err(WorkflowError::NotEditable { .. })
    ));

    store.select_role(&SelectRole { role: Role::Fiscal });
    let err = store
        .ensure_editable(&id(&process))
        .expect_err("fiscal does not own the primary step");
    assert!(err.to_string().contains("primary_requester"));

    store.select_role(&SelectRole {
        role: Role::PrimaryRequester,
    });
    assert_eq!(
        store.ensure_editable(&id(&process)).map(|p| p.id.clone()).ok(),
        Some(process.id.clone())
    );

    store.state.processes[0].closed = true;
    assert!(matches!(
        store.ensure_editable(&id(&process)),
        Err(WorkflowError::NotEditable { .. })
    ));
}
