//! Per-run write accounting

use std::time::{Duration, Instant};

/// Characters a generated name must not start with
const SEPARATORS: &[char] = &['-', '.'];

/// Why a result was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The result limit has been reached
    Limit,
    /// The byte budget is used up
    SizeExhausted,
    /// The result starts with a separator
    InvalidLabel,
    /// The result does not fit the remaining byte budget
    TooLarge,
}

/// Mutable counters of one `execute_with_writer` run
#[derive(Debug, Clone)]
pub struct ExecutionSession {
    limit: Option<usize>,
    remaining: Option<usize>,
    written: usize,
    bytes_written: usize,
    skipped: usize,
    started_at: Instant,
}

impl ExecutionSession {
    /// Start a session with an optional result limit and byte budget
    pub fn new(limit: Option<usize>, max_size: Option<usize>) -> Self {
        Self {
            limit,
            remaining: max_size,
            written: 0,
            bytes_written: 0,
            skipped: 0,
            started_at: Instant::now(),
        }
    }

    /// Decide whether `value` (without terminator) may be written.
    ///
    /// A result that does not fit the remaining budget closes the budget for
    /// good, so later smaller results are refused as well.
    pub fn admit(&mut self, value: &str) -> Result<(), SkipReason> {
        let verdict = self.check(value);
        if verdict.is_err() {
            self.skipped += 1;
        }
        verdict
    }

    fn check(&mut self, value: &str) -> Result<(), SkipReason> {
        if self.limit.is_some_and(|limit| self.written >= limit) {
            return Err(SkipReason::Limit);
        }
        if self.remaining == Some(0) {
            return Err(SkipReason::SizeExhausted);
        }
        if value.starts_with(SEPARATORS) {
            return Err(SkipReason::InvalidLabel);
        }
        if let Some(remaining) = self.remaining.as_mut() {
            if value.len() + 1 > *remaining {
                *remaining = 0;
                return Err(SkipReason::TooLarge);
            }
        }
        Ok(())
    }

    /// Account for a completed write of `bytes`
    pub fn record_write(&mut self, bytes: usize) {
        self.written += 1;
        self.bytes_written += bytes;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(bytes);
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Time since the session started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
