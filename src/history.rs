//! Per-user record of past calculations.
//!
//! Entries are snapshots: the request as it was read, the result it produced
//! and the verdict text shown at the time. Nothing here feeds back into a
//! calculation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::calculator::ZakatCalculator;
use crate::request::ZakatRequest;
use crate::types::ZakatResult;

/// Identifies the owner of history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub recorded_at: DateTime<Utc>,
    pub request: ZakatRequest,
    pub result: ZakatResult,
    pub verdict: String,
    pub explanation: String,
}

/// Aggregate view of one user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub calculations: usize,
    pub times_above_nisab: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_zakat_due: Decimal,
    pub first_recorded: Option<DateTime<Utc>>,
    pub last_recorded: Option<DateTime<Utc>>,
}

/// In-memory calculation history for any number of users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZakatHistory {
    entries: Vec<HistoryEntry>,
}

impl ZakatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates `request` and records the outcome for `user_id`, stamped now.
    pub fn record(&mut self, user_id: UserId, request: ZakatRequest) -> &HistoryEntry {
        self.record_at(user_id, request, Utc::now())
    }

    /// Calculates `request` and records the outcome with an explicit timestamp.
    pub fn record_at(&mut self, user_id: UserId, request: ZakatRequest, recorded_at: DateTime<Utc>) -> &HistoryEntry {
        let result = ZakatCalculator::compute(&request);
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            user_id,
            recorded_at,
            request,
            result,
            verdict: result.verdict().to_string(),
            explanation: result.explanation().to_string(),
        };
        debug!(%user_id, id = %entry.id, is_above_nisab = result.is_above_nisab, "calculation recorded");

        let index = self.entries.len();
        self.entries.push(entry);
        &self.entries[index]
    }

    /// All entries for `user_id`, newest first.
    pub fn for_user(&self, user_id: UserId) -> Vec<&HistoryEntry> {
        let mut entries: Vec<&HistoryEntry> = self.entries.iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .collect();
        entries.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        entries
    }

    pub fn latest(&self, user_id: UserId) -> Option<&HistoryEntry> {
        self.for_user(user_id).into_iter().next()
    }

    pub fn summary(&self, user_id: UserId) -> HistorySummary {
        let entries = self.for_user(user_id);

        HistorySummary {
            calculations: entries.len(),
            times_above_nisab: entries.iter().filter(|e| e.result.is_above_nisab).count(),
            total_zakat_due: entries.iter()
                .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.result.zakat_due)),
            first_recorded: entries.last().map(|e| e.recorded_at),
            last_recorded: entries.first().map(|e| e.recorded_at),
        }
    }

    /// Removes every entry for `user_id` and returns how many were dropped.
    pub fn clear_user(&mut self, user_id: UserId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.user_id != user_id);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn payable() -> ZakatRequest {
        ZakatRequest::from_value(&json!({ "gold_price_per_gram": 60, "cash_on_hand": 6000 }))
    }

    fn exempt() -> ZakatRequest {
        ZakatRequest::from_value(&json!({ "gold_price_per_gram": 60, "cash_on_hand": 100 }))
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_record_snapshots_verdict() {
        let mut history = ZakatHistory::new();
        let entry = history.record(UserId(1), payable());
        assert_eq!(entry.result.zakat_due, dec!(150.00));
        assert_eq!(entry.verdict, "Zakat is Required");
        assert_eq!(entry.explanation, "Your net assets exceed the Nisab threshold.");
    }

    #[test]
    fn test_for_user_is_newest_first_and_isolated() {
        let mut history = ZakatHistory::new();
        history.record_at(UserId(1), exempt(), day(2));
        history.record_at(UserId(2), payable(), day(3));
        history.record_at(UserId(1), payable(), day(5));
        history.record_at(UserId(1), exempt(), day(1));

        let entries = history.for_user(UserId(1));
        let days: Vec<_> = entries.iter().map(|e| e.recorded_at).collect();
        assert_eq!(days, vec![day(5), day(2), day(1)]);
        assert!(entries.iter().all(|e| e.user_id == UserId(1)));
        assert_eq!(history.latest(UserId(1)).map(|e| e.recorded_at), Some(day(5)));
        assert!(history.latest(UserId(3)).is_none());
    }

    #[test]
    fn test_summary() {
        let mut history = ZakatHistory::new();
        history.record_at(UserId(7), payable(), day(1));
        history.record_at(UserId(7), exempt(), day(2));
        history.record_at(UserId(7), payable(), day(3));

        let summary = history.summary(UserId(7));
        assert_eq!(summary.calculations, 3);
        assert_eq!(summary.times_above_nisab, 2);
        assert_eq!(summary.total_zakat_due, dec!(300.00));
        assert_eq!(summary.first_recorded, Some(day(1)));
        assert_eq!(summary.last_recorded, Some(day(3)));

        let empty = history.summary(UserId(8));
        assert_eq!(empty.calculations, 0);
        assert_eq!(empty.first_recorded, None);
    }

    #[test]
    fn test_clear_user() {
        let mut history = ZakatHistory::new();
        history.record(UserId(1), payable());
        history.record(UserId(1), exempt());
        history.record(UserId(2), payable());

        assert_eq!(history.clear_user(UserId(1)), 2);
        assert_eq!(history.len(), 1);
        assert!(history.for_user(UserId(1)).is_empty());
        assert_eq!(history.clear_user(UserId(1)), 0);
    }
}
