#![allow(clippy::unwrap_used)]
// Integration tests for `Monitor` against a wiremock portal.
//
// Timer-driven paths use short real intervals rather than paused time —
// wiremock does real socket I/O, and auto-advanced time fires client
// timeouts before the response can arrive.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aruwatch_core::{
    CoreError, DataState, Monitor, MonitorConfig, MutationStatus, NetworkProfile, Role,
    SessionGate, Whitelist,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer) -> MonitorConfig {
    let mut cfg = MonitorConfig::new(Url::parse(&server.uri()).unwrap());
    cfg.poll_interval = Duration::from_millis(50);
    cfg.empty_retry_delay = Duration::from_millis(10);
    cfg
}

fn monitor_with_role(server: &MockServer, role: Role) -> Monitor {
    Monitor::new(config(server), SessionGate::new(role)).unwrap()
}

fn session_json(ip: &str, hostname: &str) -> serde_json::Value {
    json!({
        "ip": ip,
        "hostname": hostname,
        "band": "5GHz",
        "ssid": "Spatium/5",
        "ap_name": format!("AP-LT07-{ip}"),
        "duration": "0:02:30",
        "health": "❌"
    })
}

fn mock_users(body: serde_json::Value) -> Mock {
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("profile", "IDM_aaa_prof"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
}

async fn wait_for_rows(monitor: &Monitor, want: usize) {
    let mut stream = monitor.subscribe();
    if stream.latest().len() == want {
        return;
    }
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(snap) = stream.changed().await {
            if snap.len() == want {
                break;
            }
        }
    })
    .await
    .unwrap();
}

// ── Polling feed ────────────────────────────────────────────────────

#[tokio::test]
async fn test_feed_applies_initial_snapshot() {
    let server = MockServer::start().await;
    mock_users(json!([
        session_json("10.1.0.1", "laptop-a"),
        session_json("10.1.0.2", "laptop-b"),
    ]))
    .mount(&server)
    .await;

    let monitor = monitor_with_role(&server, Role::Observer);
    monitor.start(NetworkProfile::Spatium).await;
    wait_for_rows(&monitor, 2).await;

    assert_eq!(*monitor.data_state().borrow(), DataState::Live);
    let row = monitor.store().session_by_ip("10.1.0.1").unwrap();
    assert_eq!(row.hostname, "laptop-a");
    assert_eq!(row.floor(), Some(7));

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_next_poll_fully_replaces_snapshot() {
    let server = MockServer::start().await;
    // First poll sees one set of clients, every later poll another.
    mock_users(json!([session_json("10.1.0.1", "roamed-away")]))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mock_users(json!([session_json("10.1.0.9", "newcomer")]))
        .mount(&server)
        .await;

    let monitor = monitor_with_role(&server, Role::Observer);
    monitor.start(NetworkProfile::Spatium).await;
    wait_for_rows(&monitor, 1).await;

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if monitor.store().session_by_ip("10.1.0.9").is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    // Full replacement, not a merge.
    assert!(monitor.store().session_by_ip("10.1.0.1").is_none());
    assert_eq!(monitor.store().len(), 1);

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_empty_result_runs_bounded_recovery_then_no_data() {
    let server = MockServer::start().await;
    // Initial fetch plus exactly three recovery retries. The poll
    // interval is long enough that no scheduled tick lands in between.
    mock_users(json!([])).expect(4).mount(&server).await;

    let mut cfg = config(&server);
    cfg.poll_interval = Duration::from_secs(30);
    let monitor = Monitor::with_client(
        aruwatch_api::PortalClient::new(cfg.portal_url.clone(), &cfg.transport).unwrap(),
        cfg,
        SessionGate::observer(),
    );
    monitor.start(NetworkProfile::Spatium).await;

    let mut state = monitor.data_state();
    tokio::time::timeout(Duration::from_secs(5), async {
        while *state.borrow_and_update() != DataState::NoData {
            state.changed().await.unwrap();
        }
    })
    .await
    .unwrap();

    // Let the retry schedule (10 + 20 + 40 ms) drain completely.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(monitor.store().is_empty());

    monitor.shutdown().await;
    server.verify().await;
}

#[tokio::test]
async fn test_recovery_retry_picks_up_late_rows() {
    let server = MockServer::start().await;
    mock_users(json!([])).up_to_n_times(1).mount(&server).await;
    mock_users(json!([session_json("10.1.0.1", "late")]))
        .mount(&server)
        .await;

    let mut cfg = config(&server);
    cfg.poll_interval = Duration::from_secs(30);
    let monitor = Monitor::new(cfg, SessionGate::observer()).unwrap();
    monitor.start(NetworkProfile::Spatium).await;
    wait_for_rows(&monitor, 1).await;

    assert_eq!(*monitor.data_state().borrow(), DataState::Live);
    monitor.shutdown().await;
}

#[tokio::test]
async fn test_switching_profile_restarts_feed() {
    let server = MockServer::start().await;
    mock_users(json!([session_json("10.1.0.1", "spatium-client")]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("profile", "GUEST_aaa_prof"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([session_json("10.2.0.1", "guest-client")])),
        )
        .mount(&server)
        .await;

    let monitor = monitor_with_role(&server, Role::Observer);
    monitor.start(NetworkProfile::Spatium).await;
    wait_for_rows(&monitor, 1).await;
    assert_eq!(monitor.profile().await, Some(NetworkProfile::Spatium));

    monitor.start(NetworkProfile::Guest).await;
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if monitor.store().session_by_ip("10.2.0.1").is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(monitor.profile().await, Some(NetworkProfile::Guest));

    monitor.shutdown().await;
}

#[tokio::test]
async fn test_refresh_is_a_one_shot_fetch() {
    let server = MockServer::start().await;
    mock_users(json!([session_json("10.1.0.1", "one-shot")]))
        .expect(1)
        .mount(&server)
        .await;

    let monitor = monitor_with_role(&server, Role::Observer);
    let count = monitor.refresh(NetworkProfile::Spatium).await.unwrap();

    assert_eq!(count, 1);
    assert_eq!(monitor.store().len(), 1);
    server.verify().await;
}

#[tokio::test]
async fn test_slow_stale_response_never_overwrites_newer_snapshot() {
    let server = MockServer::start().await;
    // The first fetch is slow; a second fetch is issued and applied
    // while it is still in flight. Last issued wins, never last
    // completed.
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("profile", "IDM_aaa_prof"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([session_json("10.1.0.1", "stale")]))
                .set_delay(Duration::from_millis(200)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mock_users(json!([session_json("10.1.0.9", "fresh")]))
        .mount(&server)
        .await;

    let monitor = monitor_with_role(&server, Role::Observer);
    let slow = {
        let m = monitor.clone();
        tokio::spawn(async move { m.refresh(NetworkProfile::Spatium).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    monitor.refresh(NetworkProfile::Spatium).await.unwrap();
    slow.await.unwrap().unwrap();

    assert!(monitor.store().session_by_ip("10.1.0.9").is_some());
    assert!(monitor.store().session_by_ip("10.1.0.1").is_none());
    assert_eq!(monitor.store().len(), 1);
}

// ── Hostname rename ─────────────────────────────────────────────────

#[tokio::test]
async fn test_rename_patches_row_by_ip() {
    let server = MockServer::start().await;
    mock_users(json!([session_json("10.1.0.1", "old-name")]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/edit-hostname"))
        .and(body_json(json!({"ip": "10.1.0.1", "hostname": "new-name"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Hostname updated"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let monitor = monitor_with_role(&server, Role::Admin);
    monitor.refresh(NetworkProfile::Spatium).await.unwrap();

    let status = monitor.rename_hostname("10.1.0.1", "new-name").await.unwrap();

    assert_eq!(status, MutationStatus::Applied);
    assert_eq!(
        monitor.store().session_by_ip("10.1.0.1").unwrap().hostname,
        "new-name"
    );
    server.verify().await;
}

#[tokio::test]
async fn test_whitespace_rename_never_reaches_portal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/edit-hostname"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let monitor = monitor_with_role(&server, Role::Admin);
    let result = monitor.rename_hostname("10.1.0.1", "   ").await;

    assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
    server.verify().await;
}

#[tokio::test]
async fn test_observer_rename_is_denied_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/edit-hostname"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let monitor = monitor_with_role(&server, Role::Observer);
    let status = monitor.rename_hostname("10.1.0.1", "new-name").await.unwrap();

    assert_eq!(status, MutationStatus::Denied);
    server.verify().await;
}

// ── Whitelist ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_whitelist_add_flips_health_after_confirmation() {
    let server = MockServer::start().await;
    mock_users(json!([session_json("10.1.0.1", "host")]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/add-whitelist"))
        .and(body_json(json!({"ip": "10.1.0.1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Added to whitelist"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let monitor = monitor_with_role(&server, Role::Admin);
    monitor.refresh(NetworkProfile::Spatium).await.unwrap();

    let status = monitor.set_whitelist("10.1.0.1", true).await.unwrap();

    assert_eq!(status, MutationStatus::Applied);
    assert_eq!(
        monitor.store().session_by_ip("10.1.0.1").unwrap().health,
        Whitelist::Included
    );
    server.verify().await;
}

#[tokio::test]
async fn test_rejected_whitelist_surfaces_message_and_leaves_row_alone() {
    let server = MockServer::start().await;
    mock_users(json!([session_json("10.1.0.1", "host")]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/add-whitelist"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "device not found"})),
        )
        .mount(&server)
        .await;

    let monitor = monitor_with_role(&server, Role::Admin);
    monitor.refresh(NetworkProfile::Spatium).await.unwrap();

    let err = monitor.set_whitelist("10.1.0.1", true).await.unwrap_err();

    match err {
        CoreError::Rejected { ref message } => assert_eq!(message, "device not found"),
        other => panic!("expected Rejected, got {other:?}"),
    }
    // The sentinel only flips after the portal confirms.
    assert_eq!(
        monitor.store().session_by_ip("10.1.0.1").unwrap().health,
        Whitelist::Excluded
    );
}

#[tokio::test]
async fn test_unwhitelist_round_trip() {
    let server = MockServer::start().await;
    mock_users(json!([{
        "ip": "10.1.0.1",
        "hostname": "host",
        "health": "✅"
    }]))
    .mount(&server)
    .await;
    Mock::given(method("POST"))
        .and(path("/unwhitelist"))
        .and(body_json(json!({"ip": "10.1.0.1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Removed from whitelist"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let monitor = monitor_with_role(&server, Role::Admin);
    monitor.refresh(NetworkProfile::Spatium).await.unwrap();
    assert_eq!(
        monitor.store().session_by_ip("10.1.0.1").unwrap().health,
        Whitelist::Included
    );

    monitor.set_whitelist("10.1.0.1", false).await.unwrap();
    assert_eq!(
        monitor.store().session_by_ip("10.1.0.1").unwrap().health,
        Whitelist::Excluded
    );
    server.verify().await;
}
