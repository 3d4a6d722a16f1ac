//! 浏览器环境下对导出 JSON API 的端到端测试。

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use wasm_tracker::{IntentResolution, LogEntry, MatchState, Tracker};

wasm_bindgen_test_configure!(run_in_browser);

fn parse_resolution(json: &str) -> IntentResolution {
    serde_json::from_str(json).expect("resolution should parse")
}

#[wasm_bindgen_test]
fn fresh_tracker_starts_logged_and_serializable() {
    let tracker = Tracker::new(None).expect("construction should succeed");

    let state: MatchState =
        serde_json::from_str(&tracker.state_json().expect("state should serialize"))
            .expect("state should parse");
    assert_eq!(state, MatchState::initial());

    let entries: Vec<LogEntry> =
        serde_json::from_str(&tracker.log_json().expect("log should serialize"))
            .expect("log should parse");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "Game start");
}

#[wasm_bindgen_test]
fn advance_turn_logs_two_entries_newest_first() {
    let mut tracker = Tracker::new(None).expect("construction should succeed");

    let resolution = parse_resolution(&tracker.advance_turn().expect("advance should succeed"));
    assert!(!resolution.state.is_player_turn);
    assert_eq!(resolution.state.opponent.max_cost, 1);
    assert_eq!(resolution.state.opponent.cost, 1);
    assert!(resolution.notification.is_none());

    let entries: Vec<LogEntry> =
        serde_json::from_str(&tracker.log_json().expect("log should serialize"))
            .expect("log should parse");
    let messages: Vec<&str> = entries.iter().map(|entry| entry.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Max cost is now 1.",
            "It is now the opponent's turn.",
            "Game start",
        ]
    );
}

#[wasm_bindgen_test]
fn skill_flow_notifies_through_the_json_api() {
    let mut tracker = Tracker::new(None).expect("construction should succeed");
    for _ in 0..3 {
        tracker
            .adjust_resource("player", "charge", "increment")
            .expect("adjust should succeed");
    }

    let resolution = parse_resolution(&tracker.use_skill("player").expect("skill should succeed"));
    assert_eq!(resolution.state.player.charge, 0);
    let notification = resolution.notification.expect("skill use should notify");
    assert_eq!(notification.message, "Leader skill activated");
    assert_eq!(notification.duration_secs, 3);
}

#[wasm_bindgen_test]
fn reset_without_confirm_handler_is_declined() {
    let mut tracker = Tracker::new(None).expect("construction should succeed");
    tracker.advance_turn().expect("advance should succeed");

    let outcome = tracker.reset().expect("reset call should not error");
    assert!(outcome.is_null(), "unwired confirmation declines");

    let state: MatchState =
        serde_json::from_str(&tracker.state_json().expect("state should serialize"))
            .expect("state should parse");
    assert!(!state.is_player_turn, "state kept the advanced turn");
}

#[wasm_bindgen_test]
fn intent_json_entry_point_dispatches() {
    let mut tracker = Tracker::new(None).expect("construction should succeed");

    let outcome = tracker
        .apply_intent_json(r#"{"type":"ToggleUltimate","side":"opponent"}"#)
        .expect("intent should apply");
    let resolution = parse_resolution(&outcome.as_string().expect("non-reset intents return JSON"));
    assert!(resolution.state.opponent.ultimate_used);
    assert_eq!(
        resolution.notification.expect("activation notifies").message,
        "Ultimate activated"
    );
}
