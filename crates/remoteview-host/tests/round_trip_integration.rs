//! End-to-end round-trip tests.
//!
//! These drive a full session against scripted infrastructure: boot, initial
//! render, fired interactions, and the evaluation replies, with nothing
//! mocked below the port level.

use std::time::Duration;

use serde_json::json;

use remoteview_core::EventSnapshot;
use remoteview_host::application::{DriverError, RoundTripDriver, ViewBackend};
use remoteview_host::domain::{DriverState, SessionConfig};
use remoteview_host::infrastructure::{MemoryView, ScriptedRemote, StaticSource};

type TestDriver = RoundTripDriver<ScriptedRemote, MemoryView, StaticSource>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn booted_driver(remote: ScriptedRemote, config: SessionConfig) -> TestDriver {
    let mut driver = RoundTripDriver::new(
        remote,
        MemoryView::new(),
        StaticSource::new("def render(): pass"),
        config,
    );
    driver.boot().await.expect("boot must succeed");
    driver.initial_render().await.expect("render must succeed");
    driver
}

#[tokio::test]
async fn test_full_round_trip_delivers_the_interaction_and_applies_the_reply() {
    init_tracing();

    // Arrange: initial tree with a change handler, plus the reply tree.
    let remote = ScriptedRemote::new();
    let probe = remote.clone();
    remote.push_tree(json!({
        "tag": "div",
        "children": [
            {"tag": "input", "attributes": {"value": "hi"}, "on": {"change": "cb1"}}
        ]
    }));
    remote.push_tree(json!({
        "tag": "div",
        "children": [
            {"tag": "input", "attributes": {"value": "hey"}, "on": {"change": "cb1"}}
        ]
    }));
    let mut driver = booted_driver(remote, SessionConfig::default()).await;

    // Act: the user types into the input, then the driver pumps the queue.
    driver
        .view_mut()
        .fire_event(&[0], "change", EventSnapshot::with_value("hey"))
        .expect("the input declares a change handler");
    assert!(driver.pump_next().await.unwrap());

    // Assert: the exact wire call the interpreter expects.
    let log = probe.log();
    assert!(
        log.contains(
            &r#"eval:recv({"identifier":"cb1","event":{"target.value":"hey"}})"#.to_string()
        ),
        "unexpected call log: {log:?}"
    );

    // And the reply tree is now displayed.
    let root = driver.view().current().unwrap();
    let input = root.as_element().unwrap().children[0].as_element().unwrap();
    assert_eq!(input.attrs["value"], json!("hey"));
    assert_eq!(driver.state(), DriverState::Idle);
}

#[tokio::test]
async fn test_queued_interactions_are_replayed_strictly_in_order() {
    init_tracing();

    // Arrange: one tree with two handlers, then one reply per interaction.
    let remote = ScriptedRemote::new();
    let probe = remote.clone();
    remote.push_tree(json!([
        "div",
        null,
        [
            ["button", {"onClick": "first"}, ["a"]],
            ["button", {"onClick": "second"}, ["b"]]
        ]
    ]));
    remote.push_tree(json!(["div"]));
    remote.push_tree(json!(["div"]));
    let mut driver = booted_driver(remote, SessionConfig::default()).await;

    // Act: both clicks land before any round trip runs.
    driver
        .view_mut()
        .fire_event(&[0], "click", EventSnapshot::empty())
        .unwrap();
    driver
        .view_mut()
        .fire_event(&[1], "click", EventSnapshot::empty())
        .unwrap();
    assert!(driver.pump_next().await.unwrap());
    assert!(driver.pump_next().await.unwrap());

    // Assert: FIFO replay, and evaluation n+1 was issued only after
    // evaluation n settled.
    let evals: Vec<String> = probe
        .log()
        .into_iter()
        .filter(|e| e.starts_with("eval:recv") || e.starts_with("settled:recv"))
        .collect();
    assert_eq!(evals.len(), 4);
    assert!(evals[0].starts_with("eval:") && evals[0].contains("first"));
    assert!(evals[1].starts_with("settled:") && evals[1].contains("first"));
    assert!(evals[2].starts_with("eval:") && evals[2].contains("second"));
    assert!(evals[3].starts_with("settled:") && evals[3].contains("second"));
}

#[tokio::test]
async fn test_rejected_round_trip_keeps_the_last_tree_and_recovers() {
    init_tracing();

    // Arrange: the first interaction is rejected, the second succeeds.
    let remote = ScriptedRemote::new();
    remote.push_tree(json!(["div", {"onClick": "cb1"}, ["before"]]));
    remote.push_rejection("ValueError: nope");
    remote.push_tree(json!(["div", {"onClick": "cb1"}, ["after"]]));
    let mut driver = booted_driver(remote, SessionConfig::default()).await;
    let before = driver.view().current().unwrap().clone();

    // Act: first interaction fails its round trip.
    driver
        .view_mut()
        .fire_event(&[], "click", EventSnapshot::empty())
        .unwrap();
    assert!(driver.pump_next().await.unwrap());

    // Assert: the failure was absorbed, the old tree is still up.
    assert_eq!(driver.state(), DriverState::Idle);
    assert_eq!(driver.view().current(), Some(&before));

    // Act: the next interaction succeeds and re-renders.
    driver
        .view_mut()
        .fire_event(&[], "click", EventSnapshot::empty())
        .unwrap();
    assert!(driver.pump_next().await.unwrap());

    // Assert
    let root = driver.view().current().unwrap();
    assert_eq!(
        root.as_element().unwrap().children[0],
        remoteview_core::ViewNode::Text("after".to_string())
    );
}

#[tokio::test]
async fn test_malformed_reply_tree_keeps_the_last_tree() {
    init_tracing();

    let remote = ScriptedRemote::new();
    remote.push_tree(json!(["div", {"onClick": "cb1"}]));
    // A reply the normalizer rejects: booleans are not tree nodes.
    remote.push_tree(json!(true));
    let mut driver = booted_driver(remote, SessionConfig::default()).await;
    let before = driver.view().current().unwrap().clone();

    driver
        .view_mut()
        .fire_event(&[], "click", EventSnapshot::empty())
        .unwrap();
    assert!(driver.pump_next().await.unwrap());

    assert_eq!(driver.state(), DriverState::Idle);
    assert_eq!(driver.view().current(), Some(&before));
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_round_trip_keeps_the_last_tree() {
    init_tracing();

    let remote = ScriptedRemote::new();
    remote.push_tree(json!(["div", {"onClick": "cb1"}]));
    remote.push_tree_delayed(json!(["div"]), Duration::from_secs(120));
    let config = SessionConfig {
        eval_timeout: Duration::from_secs(5),
        ..SessionConfig::default()
    };
    let mut driver = booted_driver(remote, config).await;
    let before = driver.view().current().unwrap().clone();

    driver
        .view_mut()
        .fire_event(&[], "click", EventSnapshot::empty())
        .unwrap();
    assert!(driver.pump_next().await.unwrap());

    assert_eq!(driver.state(), DriverState::Idle);
    assert_eq!(driver.view().current(), Some(&before));
}

#[tokio::test]
async fn test_controlled_input_widget_echoes_and_resynchronizes() {
    init_tracing();

    // Arrange: the uppercase tag resolves to the text-input widget.
    let remote = ScriptedRemote::new();
    remote.push_tree(json!(["Input", {"value": "", "onChange": "cb1"}]));
    remote.push_tree(json!(["Input", {"value": "h", "onChange": "cb1"}]));
    let mut driver = booted_driver(remote, SessionConfig::default()).await;

    // Act: one keystroke. The echo updates before the round trip runs.
    driver
        .view_mut()
        .fire_event(&[], "change", EventSnapshot::with_value("h"))
        .unwrap();
    assert_eq!(driver.view().input_value(&[]), Some("h"));

    // The round trip brings back the authoritative tree with the same value.
    assert!(driver.pump_next().await.unwrap());
    assert_eq!(driver.view().input_value(&[]), Some("h"));
    let root = driver.view().current().unwrap();
    assert_eq!(root.as_element().unwrap().attrs["value"], json!("h"));
}

#[tokio::test]
async fn test_context_path_is_stamped_on_outbound_messages() {
    init_tracing();

    let remote = ScriptedRemote::new();
    let probe = remote.clone();
    remote.push_tree(json!(["div", {"onClick": "cb1"}]));
    remote.push_tree(json!(["div"]));
    let config = SessionConfig {
        context_path: Some("/todos".to_string()),
        ..SessionConfig::default()
    };
    let mut driver = booted_driver(remote, config).await;

    driver
        .view_mut()
        .fire_event(&[], "click", EventSnapshot::empty())
        .unwrap();
    assert!(driver.pump_next().await.unwrap());

    let log = probe.log();
    let call = log
        .iter()
        .find(|e| e.starts_with("eval:recv"))
        .expect("a receive call must have been issued");
    assert!(call.contains(r#""path":"/todos""#), "call was: {call}");
}

#[tokio::test]
async fn test_run_performs_boot_and_initial_render() {
    init_tracing();

    // run() loops on the event queue forever, so drive the phases directly
    // and check run() itself only propagates a boot failure.
    let remote = ScriptedRemote::new();
    remote.fail_ready("interpreter offline");
    let mut driver = RoundTripDriver::new(
        remote,
        MemoryView::new(),
        StaticSource::new(""),
        SessionConfig::default(),
    );

    let result = driver.run().await;

    assert!(matches!(result, Err(DriverError::Remote(_))));
    assert_eq!(driver.state(), DriverState::Failed);
}
