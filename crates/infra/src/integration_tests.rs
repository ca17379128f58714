//! Integration tests for the full tracking pipeline.
//!
//! Tests: lifecycle callbacks → tracker → store, driven in the order an
//! execution framework invokes them (enqueue → start → (retry)* →
//! failure | completion).

use std::sync::Arc;
use std::time::Duration;

use procstatus_core::{ProcessId, Status};
use procstatus_events::LifecycleHooks;

use crate::status::clock::ManualClock;
use crate::status::store::{InMemoryStatusStore, StatusStore};
use crate::status::tracker::{DEFAULT_TTL, StatusTracker};
use crate::status::hooks::StatusHooks;

type TestStore = Arc<InMemoryStatusStore<ManualClock>>;

fn setup() -> (StatusHooks<TestStore>, TestStore, ManualClock) {
    let clock = ManualClock::default();
    let store = Arc::new(InMemoryStatusStore::with_clock(clock.clone()));
    let hooks = StatusHooks::new(StatusTracker::new(store.clone()));
    (hooks, store, clock)
}

fn payload(id: &str) -> serde_json::Value {
    serde_json::json!({"PROCESS_ID": id, "account": "acme", "shard": 3})
}

fn pid(id: &str) -> ProcessId {
    ProcessId::new(id).unwrap()
}

#[test]
fn happy_path_lifecycle() {
    let (hooks, _store, _clock) = setup();
    let payload = payload("job-1");

    hooks.on_enqueue(&payload, "ExportJob").unwrap();
    hooks.on_start(&payload).unwrap();
    hooks.on_completion(&payload).unwrap();

    let doc = hooks.tracker().describe(&pid("job-1")).unwrap().unwrap();
    assert_eq!(doc.status, Some(Status::Completed));
    assert_eq!(doc.job_class.as_deref(), Some("ExportJob"));
    assert_eq!(doc.vars, Some(payload));
    assert!(doc.created_at.is_some());
    assert!(doc.started_at.is_some());
    assert!(doc.stopped_at.is_some());
    assert!(doc.failed_at.is_none());
    assert!(doc.retries.is_empty());
}

#[test]
fn retry_then_failure_in_contract_order() {
    let (hooks, _store, _clock) = setup();
    let payload = payload("job-2");

    hooks.on_enqueue(&payload, "FlakyJob").unwrap();
    hooks.on_start(&payload).unwrap();

    // The framework signals the retry before recording the failure, so the
    // snapshot sees the pre-failure document.
    hooks.on_retry(&payload).unwrap();
    hooks.on_failure("timeout", &payload).unwrap();

    let doc = hooks.tracker().describe(&pid("job-2")).unwrap().unwrap();
    assert_eq!(doc.status, Some(Status::Failed));
    assert_eq!(doc.retries.len(), 1);
    assert_eq!(doc.retries[0].created_at, doc.created_at);
    assert_eq!(doc.retries[0].started_at, doc.started_at);
    // The snapshot was taken before the failure write.
    assert!(doc.retries[0].failed_at <= doc.failed_at.unwrap());
}

#[test]
fn repeated_retries_accumulate_history() {
    let (hooks, _store, _clock) = setup();
    let payload = payload("job-3");

    hooks.on_enqueue(&payload, "FlakyJob").unwrap();
    hooks.on_start(&payload).unwrap();
    for _ in 0..4 {
        hooks.on_retry(&payload).unwrap();
    }
    hooks.on_failure("still broken", &payload).unwrap();

    let doc = hooks.tracker().describe(&pid("job-3")).unwrap().unwrap();
    assert_eq!(doc.retries.len(), 4);
    for window in doc.retries.windows(2) {
        assert!(window[0].failed_at <= window[1].failed_at);
    }
}

#[test]
fn documents_expire_without_further_writes() {
    let (hooks, _store, clock) = setup();
    let payload = payload("job-4");

    hooks.on_enqueue(&payload, "ExportJob").unwrap();
    hooks.on_start(&payload).unwrap();

    clock.advance(DEFAULT_TTL + Duration::from_secs(1));

    assert!(hooks.tracker().describe(&pid("job-4")).unwrap().is_none());
}

#[test]
fn each_write_refreshes_retention() {
    let (hooks, _store, clock) = setup();
    let payload = payload("job-5");

    hooks.on_enqueue(&payload, "ExportJob").unwrap();
    clock.advance(DEFAULT_TTL - Duration::from_secs(60));

    // A start event inside the window pushes the deadline out again.
    hooks.on_start(&payload).unwrap();
    clock.advance(Duration::from_secs(120));

    let doc = hooks.tracker().describe(&pid("job-5")).unwrap().unwrap();
    assert_eq!(doc.status, Some(Status::Working));
}

#[test]
fn concurrent_identities_do_not_interfere() {
    let (hooks, _store, _clock) = setup();
    let hooks = Arc::new(hooks);

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let hooks = hooks.clone();
            std::thread::spawn(move || {
                let id = format!("job-iso-{n}");
                let payload = payload(&id);
                hooks.on_enqueue(&payload, "IsoJob").unwrap();
                hooks.on_start(&payload).unwrap();
                if n % 2 == 0 {
                    hooks.on_retry(&payload).unwrap();
                    hooks.on_failure("boom", &payload).unwrap();
                } else {
                    hooks.on_completion(&payload).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for n in 0..8 {
        let doc = hooks
            .tracker()
            .describe(&pid(&format!("job-iso-{n}")))
            .unwrap()
            .unwrap();
        if n % 2 == 0 {
            assert_eq!(doc.status, Some(Status::Failed));
            assert_eq!(doc.retries.len(), 1);
        } else {
            assert_eq!(doc.status, Some(Status::Completed));
            assert!(doc.retries.is_empty());
        }
    }
}

#[test]
fn corrupt_store_data_does_not_wedge_the_pipeline() {
    let (hooks, store, _clock) = setup();
    let id = pid("job-6");

    store.put_raw(&id, "}}garbage{{", DEFAULT_TTL);

    // Reads fail open.
    assert!(hooks.tracker().describe(&id).unwrap().is_none());

    // The next event overwrites the corrupt value.
    hooks.on_start(&payload("job-6")).unwrap();
    let doc = store.get(&id).unwrap().unwrap();
    assert_eq!(doc.status, Some(Status::Working));
}

#[test]
fn identity_tokens_are_opaque() {
    // Identities are whatever the framework supplies; uuid-shaped tokens are
    // the common case in production payloads.
    let (hooks, _store, _clock) = setup();
    let token = uuid::Uuid::now_v7().to_string();
    let payload = serde_json::json!({"PROCESS_ID": token.as_str()});

    hooks.on_enqueue(&payload, "UuidJob").unwrap();
    hooks.on_completion(&payload).unwrap();

    let doc = hooks.tracker().describe(&pid(&token)).unwrap().unwrap();
    assert_eq!(doc.status, Some(Status::Completed));
}

#[test]
fn dyn_hooks_are_usable_as_a_framework_dependency() {
    // An execution framework only needs the trait object.
    let (hooks, _store, _clock) = setup();
    let tracker = hooks.tracker().clone();
    let dynamic: Arc<dyn LifecycleHooks<Error = crate::status::hooks::TrackError>> =
        Arc::new(hooks);

    let payload = payload("job-7");
    dynamic.on_enqueue(&payload, "DynJob").unwrap();
    dynamic.on_start(&payload).unwrap();
    dynamic.on_completion(&payload).unwrap();

    let doc = tracker.describe(&pid("job-7")).unwrap().unwrap();
    assert_eq!(doc.status, Some(Status::Completed));
}
