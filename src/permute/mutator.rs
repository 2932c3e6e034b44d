//! Permutation orchestration: construction, estimation and streaming

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use crate::config_error;
use crate::domain::{decompose, DecomposedDomain};
use crate::error::{Result, SubforgeError};
use crate::template::{check_coverage, extract_variables, substitute, validate_syntax};
use crate::types::{Estimate, Options};

use super::cartesian::{expand, ValueSets};
use super::dedupe;
use super::defaults::{default_patterns, default_payloads};
use super::enrich::{dedupe_preserving_order, enrich_payloads};
use super::session::ExecutionSession;

/// Everything the producer reads, shared read-only across runs
#[derive(Debug)]
struct Plan {
    options: Options,
    inputs: Vec<DecomposedDomain>,
}

impl Plan {
    fn payload_available(&self, name: &str) -> bool {
        !name.is_empty()
            && self
                .options
                .payloads
                .get(name)
                .is_some_and(|values| !values.is_empty())
    }

    /// Pattern with domain variables substituted, payload variables left in place
    fn statement(&self, pattern: &str, domain_vars: &BTreeMap<String, String>) -> Result<String> {
        check_coverage(pattern, |name| {
            domain_vars.contains_key(name) || self.payload_available(name)
        })?;
        Ok(substitute(pattern, domain_vars))
    }

    fn estimate(&self) -> Estimate {
        let mut estimate = Estimate::default();
        for input in &self.inputs {
            let domain_vars = input.variables();
            for pattern in &self.options.patterns {
                let Ok(statement) = self.statement(pattern, &domain_vars) else {
                    continue;
                };
                estimate.max_result_len = estimate.max_result_len.max(statement.len());

                let expansions = extract_variables(&statement)
                    .iter()
                    .map(|name| self.options.payloads.get(name).map_or(0, Vec::len))
                    .fold(1usize, usize::saturating_mul);
                estimate.count = estimate.count.saturating_add(expansions);
            }
        }
        estimate
    }

    /// Payload values for every variable left in `statement`, minus values
    /// already present at either end of its leftmost label
    fn payload_sets(&self, statement: &str) -> ValueSets {
        let leftmost = statement
            .split_once('.')
            .map_or(statement, |(label, _)| label);

        let mut sets = ValueSets::new();
        for name in dedupe_preserving_order(extract_variables(statement)) {
            let values = self
                .options
                .payloads
                .get(&name)
                .map(|values| {
                    values
                        .iter()
                        .filter(|word| {
                            !leftmost.starts_with(word.as_str()) && !leftmost.ends_with(word.as_str())
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            sets.insert(name, values);
        }
        sets
    }

    /// Walk domains x patterns x payload tuples, sending every result.
    ///
    /// Runs on a blocking thread; returns early on cancellation or when the
    /// receiver is gone.
    fn produce(&self, token: &CancellationToken, tx: &mpsc::Sender<String>, handle: &Handle) {
        for input in &self.inputs {
            if token.is_cancelled() {
                return;
            }
            let domain_vars = input.variables();

            for pattern in &self.options.patterns {
                if token.is_cancelled() {
                    return;
                }
                let statement = match self.statement(pattern, &domain_vars) {
                    Ok(statement) => statement,
                    Err(e) => {
                        tracing::debug!(domain = %input.hostname(), error = %e, "Pattern not applicable");
                        continue;
                    }
                };

                let sets = self.payload_sets(&statement);
                let completed = if sets.is_empty() {
                    send(handle, tx, token, statement)
                } else {
                    expand(&sets, |tuple| {
                        send(handle, tx, token, substitute(&statement, tuple.iter().copied()))
                    })
                };
                if !completed {
                    return;
                }
            }
        }
    }
}

/// Send without blocking when there is room, otherwise wait for room or cancellation
fn send(handle: &Handle, tx: &mpsc::Sender<String>, token: &CancellationToken, value: String) -> bool {
    match tx.try_send(value) {
        Ok(()) => true,
        Err(TrySendError::Closed(_)) => false,
        Err(TrySendError::Full(value)) => handle.block_on(async {
            tokio::select! {
                biased;
                _ = token.cancelled() => false,
                sent = tx.send(value) => sent.is_ok(),
            }
        }),
    }
}

/// Generates subdomain permutations from decomposed inputs, patterns and payloads
#[derive(Debug)]
pub struct Mutator {
    plan: Arc<Plan>,
    payload_count: usize,
    time_taken: Duration,
    max_result_len: usize,
}

impl Mutator {
    /// Validate options, decompose the input domains and apply enrichment
    pub fn new(mut options: Options) -> Result<Self> {
        if options.domains.is_empty() {
            return Err(config_error!(
                "no domains provided: supply at least one domain via -l or stdin"
            ));
        }

        if options.payloads.is_empty() {
            options.payloads = default_payloads();
            if options.payloads.is_empty() {
                return Err(config_error!(
                    "no payloads available: built-in payloads are empty and none were supplied"
                ));
            }
        }
        if options.patterns.is_empty() {
            options.patterns = default_patterns();
            if options.patterns.is_empty() {
                return Err(config_error!(
                    "no patterns available: built-in patterns are empty and none were supplied"
                ));
            }
        }

        dedupe_payload_values(&mut options.payloads);

        for pattern in &options.patterns {
            validate_syntax(pattern)?;
        }

        let inputs = prepare_inputs(&options.domains)?;

        if options.enrich {
            enrich_payloads(&inputs, &mut options.payloads);
        }

        tracing::debug!(
            inputs = inputs.len(),
            patterns = options.patterns.len(),
            payloads = options.payloads.len(),
            "Mutator ready"
        );

        Ok(Self {
            plan: Arc::new(Plan { options, inputs }),
            payload_count: 0,
            time_taken: Duration::ZERO,
            max_result_len: 0,
        })
    }

    /// Decomposed input domains, in input order
    pub fn inputs(&self) -> &[DecomposedDomain] {
        &self.plan.inputs
    }

    /// Effective options after defaults, deduplication and enrichment
    pub fn options(&self) -> &Options {
        &self.plan.options
    }

    /// Upper bound on the number of results, without generating them
    pub fn estimate(&self) -> Estimate {
        self.plan.estimate()
    }

    /// Same as [`estimate`](Self::estimate), recording the longest statement
    pub fn estimate_count(&mut self) -> usize {
        let estimate = self.plan.estimate();
        self.max_result_len = self.max_result_len.max(estimate.max_result_len);
        estimate.count
    }

    /// Longest domain-substituted statement seen by [`estimate_count`](Self::estimate_count)
    pub fn max_result_len(&self) -> usize {
        self.max_result_len
    }

    /// Stream every permutation.
    ///
    /// Production happens on the blocking pool and stops when `token` is
    /// cancelled or the receiver is dropped. Must be called from within a
    /// Tokio runtime.
    pub fn execute(&self, token: CancellationToken) -> mpsc::Receiver<String> {
        let capacity = self.plan.options.patterns.len().max(1);
        let (tx, rx) = mpsc::channel(capacity);

        let plan = Arc::clone(&self.plan);
        let handle = Handle::current();
        let producer_token = token.clone();
        tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            plan.produce(&producer_token, &tx, &handle);
            tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                cancelled = producer_token.is_cancelled(),
                "Producer finished"
            );
        });

        if self.plan.options.dedupe {
            dedupe::spawn(rx, capacity, self.plan.estimate(), token)
        } else {
            rx
        }
    }

    /// Write every admitted permutation to `writer`, one per line
    pub async fn execute_with_writer<W>(
        &mut self,
        token: &CancellationToken,
        writer: Option<&mut W>,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let writer = writer.ok_or_else(|| SubforgeError::sink("output writer is not set"))?;

        let mut session = ExecutionSession::new(self.plan.options.limit, self.plan.options.max_size);
        let mut results = self.execute(token.clone());

        let outcome = loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                value = results.recv() => Some(value),
            };
            let value = match next {
                None => break Err(SubforgeError::Cancelled),
                Some(None) => break Ok(()),
                Some(Some(value)) => value,
            };

            if session.admit(&value).is_err() {
                continue;
            }

            let line = format!("{value}\n");
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                break Err(SubforgeError::io(format!("failed to write result: {e}"), None));
            }
            session.record_write(line.len());
        };

        // Lines already written stay delivered, whatever ended the run.
        let flushed = writer
            .flush()
            .await
            .map_err(|e| SubforgeError::io(format!("failed to flush output: {e}"), None));
        let outcome = match (outcome, flushed) {
            (Ok(()), flushed) => flushed,
            (Err(e), Err(flush_error)) => {
                tracing::debug!(error = %flush_error, "Flush after failed run also failed");
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
        };

        self.payload_count = session.written();
        self.time_taken = session.elapsed();

        if outcome.is_ok() {
            tracing::info!(
                bytes = session.bytes_written(),
                skipped = session.skipped(),
                "Generated {} permutations in {}",
                self.payload_count,
                self.time()
            );
        }
        outcome
    }

    /// Run the write pipeline into a discarding sink and return the written count
    pub async fn dry_run(&mut self) -> usize {
        self.payload_count = 0;
        let token = CancellationToken::new();
        let mut sink = tokio::io::sink();
        if let Err(e) = self.execute_with_writer(&token, Some(&mut sink)).await {
            tracing::error!(error = %e, "Dry run failed");
        }
        self.payload_count
    }

    /// Results written by the last run, or the estimate before any run
    pub fn payload_count(&self) -> usize {
        if self.payload_count == 0 {
            self.estimate().count
        } else {
            self.payload_count
        }
    }

    /// Duration of the last run, e.g. `0.0123s`
    pub fn time(&self) -> String {
        format!("{:.4}s", self.time_taken.as_secs_f64())
    }
}

fn dedupe_payload_values(payloads: &mut HashMap<String, Vec<String>>) {
    for (name, values) in payloads.iter_mut() {
        let before = values.len();
        *values = dedupe_preserving_order(std::mem::take(values));
        if values.len() < before {
            tracing::warn!(
                payload = %name,
                removed = before - values.len(),
                "Removed duplicate payload values"
            );
        }
    }
}

fn prepare_inputs(domains: &[String]) -> Result<Vec<DecomposedDomain>> {
    let mut inputs = Vec::with_capacity(domains.len());
    let mut failures = Vec::new();

    for domain in domains {
        match decompose(domain) {
            Ok(input) => inputs.push(input),
            Err(e) => failures.push(e.to_string()),
        }
    }

    if inputs.is_empty() {
        return Err(config_error!(
            "all {} input domains failed to parse: {}",
            domains.len(),
            failures.join("; ")
        ));
    }
    for failure in &failures {
        tracing::warn!("Skipping input: {}", failure);
    }
    if !failures.is_empty() {
        tracing::warn!(
            skipped = failures.len(),
            total = domains.len(),
            "Some input domains could not be parsed"
        );
    }
    Ok(inputs)
}
