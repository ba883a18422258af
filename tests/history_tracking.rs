use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use serde_json::json;
use zakat_engine::prelude::*;

fn request(cash: i64) -> ZakatRequest {
    ZakatRequest::from_value(&json!({ "gold_price_per_gram": 60, "cash_on_hand": cash }))
}

#[test]
fn test_users_see_only_their_own_history() {
    let mut history = ZakatHistory::new();
    let alice = UserId(1);
    let bob = UserId(2);

    history.record_at(alice, request(6000), Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap());
    history.record_at(bob, request(100), Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap());
    history.record_at(alice, request(12000), Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap());

    let alice_entries = history.for_user(alice);
    assert_eq!(alice_entries.len(), 2);
    assert_eq!(alice_entries[0].result.zakat_due, dec!(300.00));
    assert_eq!(alice_entries[1].result.zakat_due, dec!(150.00));

    let bob_latest = history.latest(bob).unwrap();
    assert_eq!(bob_latest.verdict, "Zakat is Not Required");

    let summary = history.summary(alice);
    assert_eq!(summary.calculations, 2);
    assert_eq!(summary.total_zakat_due, dec!(450.00));
}

#[test]
fn test_history_serializes() {
    let mut history = ZakatHistory::new();
    let id = history.record(UserId(5), request(6000)).id;

    let json = serde_json::to_string(&history).unwrap();
    let restored: ZakatHistory = serde_json::from_str(&json).unwrap();

    let entry = restored.latest(UserId(5)).unwrap();
    assert_eq!(entry.id, id);
    assert_eq!(entry.user_id, UserId(5));
    assert_eq!(entry.request.cash_on_hand, dec!(6000));
    assert!(entry.result.is_above_nisab);
}
