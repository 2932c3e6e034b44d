//! Streaming duplicate filter between the producer and the writer

use std::collections::HashSet;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::types::Estimate;

/// Upper bound on entries reserved up front
const MAX_PREALLOCATED: usize = 1 << 20;

/// First-seen set of results
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    /// Size the set from a run estimate
    pub fn with_estimate(estimate: Estimate) -> Self {
        Self {
            seen: HashSet::with_capacity(estimate.count.min(MAX_PREALLOCATED)),
        }
    }

    /// Record `value`; returns `false` when it was seen before
    pub fn insert(&mut self, value: &str) -> bool {
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Forward unique values from `input` into a new channel of `capacity`.
///
/// The stage stops when the input closes, the output is dropped, or `token`
/// fires.
pub(crate) fn spawn(
    mut input: mpsc::Receiver<String>,
    capacity: usize,
    estimate: Estimate,
    token: CancellationToken,
) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(capacity.max(1));

    tokio::spawn(async move {
        tracing::debug!(
            expected = estimate.count,
            budget_bytes = estimate.dedupe_budget(),
            "Dedup stage started"
        );
        let mut seen = Deduplicator::with_estimate(estimate);
        let mut dropped = 0usize;

        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                value = input.recv() => value,
            };
            let Some(value) = next else { break };

            if !seen.insert(&value) {
                dropped += 1;
                continue;
            }

            let delivered = tokio::select! {
                biased;
                _ = token.cancelled() => false,
                sent = tx.send(value) => sent.is_ok(),
            };
            if !delivered {
                break;
            }
        }

        tracing::debug!(unique = seen.len(), dropped, "Dedup stage finished");
    });

    rx
}
