// SPDX-License-Identifier: BUSL-1.1
//! # Usage Evaluation
//!
//! Decides, per usage record, whether a batch "processes" it. The mock has
//! no real metering rules, so the default evaluator flips a fair coin; the
//! [`UsageEvaluator`] trait keeps that decision out of the HTTP layer so it
//! can be replaced without touching the routes.
//!
//! ## Modes
//!
//! | `METERING_MODE` | Evaluator          | Behaviour                   |
//! |-----------------|--------------------|-----------------------------|
//! | `random`        | [`CoinFlip`]       | 50/50 per record (default)  |
//! | `accept`        | [`AcceptAll`]      | every record processed      |
//! | `reject`        | [`RejectAll`]      | every record unprocessed    |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

use crate::types::{BatchMeterUsageResponse, UsageRecord, UsageRecordResult, STATUS_SUCCESS};

/// Outcome of evaluating one usage record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Processed,
    Unprocessed,
}

/// Per-record metering decision.
///
/// Implementations are shared across concurrent requests and must not
/// require exclusive access.
pub trait UsageEvaluator: Send + Sync + fmt::Debug {
    fn evaluate(&self, record: &UsageRecord) -> Verdict;
}

/// Uniform 50/50 draw per record.
///
/// Draws from the thread-local CSPRNG, which is seeded once per thread
/// from the OS. Concurrent requests on different workers never share or
/// reseed a generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoinFlip;

impl UsageEvaluator for CoinFlip {
    fn evaluate(&self, _record: &UsageRecord) -> Verdict {
        if rand::thread_rng().gen_bool(0.5) {
            Verdict::Processed
        } else {
            Verdict::Unprocessed
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl UsageEvaluator for AcceptAll {
    fn evaluate(&self, _record: &UsageRecord) -> Verdict {
        Verdict::Processed
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RejectAll;

impl UsageEvaluator for RejectAll {
    fn evaluate(&self, _record: &UsageRecord) -> Verdict {
        Verdict::Unprocessed
    }
}

/// Evaluator selection, parsed from `METERING_MODE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeteringMode {
    #[default]
    Random,
    Accept,
    Reject,
}

impl MeteringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }

    /// Build the evaluator for this mode.
    pub fn evaluator(self) -> Arc<dyn UsageEvaluator> {
        match self {
            Self::Random => Arc::new(CoinFlip),
            Self::Accept => Arc::new(AcceptAll),
            Self::Reject => Arc::new(RejectAll),
        }
    }
}

impl fmt::Display for MeteringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when `METERING_MODE` names no known mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metering mode {0:?} (expected random, accept or reject)")]
pub struct UnknownModeError(pub String);

impl FromStr for MeteringMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            _ => Err(UnknownModeError(s.to_string())),
        }
    }
}

/// Partition a batch into processed results and unprocessed records.
///
/// Records are examined in input order and each bucket keeps the relative
/// order of the records assigned to it. Every input record ends up in
/// exactly one bucket. Processed records get a fresh UUID v4.
pub fn meter_batch(
    evaluator: &dyn UsageEvaluator,
    records: Vec<UsageRecord>,
) -> BatchMeterUsageResponse {
    let mut response = BatchMeterUsageResponse::default();
    for record in records {
        match evaluator.evaluate(&record) {
            Verdict::Processed => response.results.push(UsageRecordResult {
                metering_record_id: Uuid::new_v4().to_string(),
                status: STATUS_SUCCESS.to_string(),
                usage_record: record,
            }),
            Verdict::Unprocessed => response.unprocessed_records.push(record),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn records(n: usize) -> Vec<UsageRecord> {
        (0..n)
            .map(|i| UsageRecord {
                customer_identifier: format!("customer-{i}"),
                dimension: "requests".to_string(),
                quantity: i as i64,
                timestamp: 1_000 + i as i64,
            })
            .collect()
    }

    /// Processes every other record, starting with the first.
    #[derive(Debug, Default)]
    struct Alternating(AtomicUsize);

    impl UsageEvaluator for Alternating {
        fn evaluate(&self, _record: &UsageRecord) -> Verdict {
            if self.0.fetch_add(1, Ordering::Relaxed) % 2 == 0 {
                Verdict::Processed
            } else {
                Verdict::Unprocessed
            }
        }
    }

    fn assert_partition(input: &[UsageRecord], out: &BatchMeterUsageResponse) {
        assert_eq!(out.results.len() + out.unprocessed_records.len(), input.len());
        let mut seen: Vec<&UsageRecord> = out
            .results
            .iter()
            .map(|r| &r.usage_record)
            .chain(out.unprocessed_records.iter())
            .collect();
        let mut expected: Vec<&UsageRecord> = input.iter().collect();
        seen.sort_by_key(|r| r.quantity);
        expected.sort_by_key(|r| r.quantity);
        assert_eq!(seen, expected);
    }

    #[test]
    fn accept_all_processes_every_record() {
        let input = records(5);
        let out = meter_batch(&AcceptAll, input.clone());
        assert_eq!(out.results.len(), 5);
        assert!(out.unprocessed_records.is_empty());
        assert!(out.results.iter().all(|r| r.status == "Success"));
        assert_partition(&input, &out);
    }

    #[test]
    fn reject_all_leaves_every_record_unprocessed() {
        let input = records(5);
        let out = meter_batch(&RejectAll, input.clone());
        assert!(out.results.is_empty());
        assert_eq!(out.unprocessed_records, input);
    }

    #[test]
    fn coin_flip_partitions_exactly_once() {
        let input = records(256);
        let out = meter_batch(&CoinFlip, input.clone());
        assert_partition(&input, &out);
        // 2^-255 chance of either bucket being empty.
        assert!(!out.results.is_empty());
        assert!(!out.unprocessed_records.is_empty());
    }

    #[test]
    fn buckets_preserve_input_order() {
        let input = records(6);
        let out = meter_batch(&Alternating::default(), input.clone());
        let processed: Vec<i64> = out.results.iter().map(|r| r.usage_record.quantity).collect();
        let unprocessed: Vec<i64> = out.unprocessed_records.iter().map(|r| r.quantity).collect();
        assert_eq!(processed, vec![0, 2, 4]);
        assert_eq!(unprocessed, vec![1, 3, 5]);
    }

    #[test]
    fn metering_record_ids_are_unique() {
        let first = meter_batch(&AcceptAll, records(500));
        let second = meter_batch(&AcceptAll, records(500));
        let ids: HashSet<&str> = first
            .results
            .iter()
            .chain(second.results.iter())
            .map(|r| r.metering_record_id.as_str())
            .collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| Uuid::parse_str(id).is_ok()));
    }

    #[test]
    fn empty_batch_yields_empty_buckets() {
        let out = meter_batch(&CoinFlip, Vec::new());
        assert_eq!(out, BatchMeterUsageResponse::default());
    }

    #[test]
    fn records_are_echoed_unchanged() {
        let input = vec![UsageRecord {
            customer_identifier: "c".into(),
            dimension: "d".into(),
            quantity: -7,
            timestamp: i64::MAX,
        }];
        let out = meter_batch(&AcceptAll, input.clone());
        assert_eq!(out.results[0].usage_record, input[0]);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("random".parse::<MeteringMode>().unwrap(), MeteringMode::Random);
        assert_eq!("ACCEPT".parse::<MeteringMode>().unwrap(), MeteringMode::Accept);
        assert_eq!("Reject".parse::<MeteringMode>().unwrap(), MeteringMode::Reject);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "sometimes".parse::<MeteringMode>().unwrap_err();
        assert_eq!(err, UnknownModeError("sometimes".to_string()));
    }

    #[test]
    fn mode_builds_matching_evaluator() {
        let record = UsageRecord::default();
        assert_eq!(
            MeteringMode::Accept.evaluator().evaluate(&record),
            Verdict::Processed
        );
        assert_eq!(
            MeteringMode::Reject.evaluator().evaluate(&record),
            Verdict::Unprocessed
        );
    }
}
