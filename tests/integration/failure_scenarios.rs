//! Failure isolation tests
//!
//! A sweep only fails as a whole when the target list cannot be
//! loaded; every other failure stays confined to its target.

use std::sync::Arc;

use uptime_monitoring::actors::{SnapshotRow, SweepReport};
use uptime_monitoring::outage::TargetStatus;
use uptime_monitoring::store::{MemoryStore, ServerRecord, TargetStore, WebsiteRecord};
use uptime_monitoring::TargetKind;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn unreachable_target_becomes_a_down_row() {
    let store = Arc::new(MemoryStore::new());
    // Nothing listens here; connection is refused immediately.
    store
        .insert_website(WebsiteRecord::new("http://127.0.0.1:1", None))
        .await
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let (handle, _rx) = spawn_monitor(
        TargetKind::Website,
        &on_demand_only_config(),
        store,
        notifier,
    );

    let report = handle.check_now().await.unwrap();
    let rows = match report {
        SweepReport::Rows(rows) => rows,
        SweepReport::NoTargets => panic!("expected rows"),
    };

    assert_eq!(rows[0].status(), TargetStatus::Down);
    assert!(rows[0].error().is_some());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn one_down_target_does_not_poison_the_sweep() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let healthy = store
        .insert_website(WebsiteRecord::new(mock_server.uri(), None))
        .await
        .unwrap();
    let broken = store
        .insert_website(WebsiteRecord::new("http://127.0.0.1:1", None))
        .await
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let (handle, _rx) = spawn_monitor(
        TargetKind::Website,
        &on_demand_only_config(),
        store.clone(),
        notifier,
    );

    let report = handle.check_now().await.unwrap();
    let rows = match report {
        SweepReport::Rows(rows) => rows,
        SweepReport::NoTargets => panic!("expected rows"),
    };

    assert_eq!(rows.len(), 2);
    let up = rows.iter().filter(|r| r.status() == TargetStatus::Up).count();
    let down = rows.iter().filter(|r| r.status() == TargetStatus::Down).count();
    assert_eq!((up, down), (1, 1));

    // Both outcomes persisted independently.
    assert_eq!(
        store.get_website(healthy.id).await.unwrap().status,
        TargetStatus::Up
    );
    assert_eq!(
        store.get_website(broken.id).await.unwrap().status,
        TargetStatus::Down
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn write_failure_is_isolated_to_its_target() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let store = Arc::new(FlakyStore::new());
    let flaky = store
        .insert_website(WebsiteRecord::new(mock_server.uri(), None))
        .await
        .unwrap();
    let stable = store
        .insert_website(WebsiteRecord::new(format!("{}/", mock_server.uri()), None))
        .await
        .unwrap();
    store.fail_updates_for(flaky.id);

    let notifier = Arc::new(RecordingNotifier::new());
    let (handle, _rx) = spawn_monitor(
        TargetKind::Website,
        &on_demand_only_config(),
        store.clone(),
        notifier,
    );

    let report = handle.check_now().await.unwrap();
    let rows = match report {
        SweepReport::Rows(rows) => rows,
        SweepReport::NoTargets => panic!("expected rows"),
    };

    // The sweep still reports both targets.
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.status() == TargetStatus::Up));

    // The stable target's write went through; the flaky one kept its
    // stale record.
    assert_eq!(
        store.get_website(stable.id).await.unwrap().status,
        TargetStatus::Up
    );
    assert_eq!(
        store.get_website(flaky.id).await.unwrap().status,
        TargetStatus::Unknown
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn listing_failure_is_tick_fatal_but_not_actor_fatal() {
    let store = Arc::new(UnavailableStore);
    let notifier = Arc::new(RecordingNotifier::new());
    let (handle, _rx) = spawn_monitor(
        TargetKind::Server,
        &on_demand_only_config(),
        store,
        notifier,
    );

    // Two consecutive failing sweeps: the actor keeps serving.
    assert!(handle.check_now().await.is_err());
    assert!(handle.check_now().await.is_err());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn malformed_health_report_marks_server_down() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let (host, port) = host_port(&mock_server.uri());
    let store = Arc::new(MemoryStore::new());
    store
        .insert_server(ServerRecord::new("web-1", host.clone(), port, "test-key"))
        .await
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let (handle, _rx) = spawn_monitor(
        TargetKind::Server,
        &on_demand_only_config(),
        store,
        notifier,
    );

    let report = handle.check_now().await.unwrap();
    let rows = match report {
        SweepReport::Rows(rows) => rows,
        SweepReport::NoTargets => panic!("expected rows"),
    };

    let row = match &rows[0] {
        SnapshotRow::Server(row) => row,
        _ => panic!("expected a server row"),
    };
    assert_eq!(row.status, TargetStatus::Down);
    assert_eq!(row.name, "web-1");
    assert_eq!(row.address, format!("{host}:{port}"));
    assert!(row.error.as_deref().unwrap().contains("invalid health report"));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn unauthorized_agent_marks_server_down() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let (host, port) = host_port(&mock_server.uri());
    let store = Arc::new(MemoryStore::new());
    store
        .insert_server(ServerRecord::new("web-1", host, port, "wrong-key"))
        .await
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let (handle, _rx) = spawn_monitor(
        TargetKind::Server,
        &on_demand_only_config(),
        store,
        notifier,
    );

    let report = handle.check_now().await.unwrap();
    let rows = match report {
        SweepReport::Rows(rows) => rows,
        SweepReport::NoTargets => panic!("expected rows"),
    };
    assert_eq!(rows[0].status(), TargetStatus::Down);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn website_error_status_marks_it_down() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let record = store
        .insert_website(WebsiteRecord::new(mock_server.uri(), None))
        .await
        .unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let (handle, _rx) = spawn_monitor(
        TargetKind::Website,
        &on_demand_only_config(),
        store.clone(),
        notifier,
    );

    let report = handle.check_now().await.unwrap();
    let rows = match report {
        SweepReport::Rows(rows) => rows,
        SweepReport::NoTargets => panic!("expected rows"),
    };

    // A reachable site answering 5xx is down, not up-with-latency.
    assert_eq!(rows[0].status(), TargetStatus::Down);
    assert!(rows[0].error().unwrap().contains("HTTP 500"));

    let persisted = store.get_website(record.id).await.unwrap();
    assert_eq!(persisted.status, TargetStatus::Down);
    assert!(persisted.down_since.is_some());

    handle.shutdown().await.unwrap();
}
