//! Collection runner
//!
//! Replays a selected, ordered set of requests for a number of iterations.
//! Requests are sent one at a time; a failed request is recorded and the run
//! moves on.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use workbench_domain::collection::{find_request, record_response};
use workbench_domain::{Collection, Request, ResponseEntry};

use crate::dispatch::prepare_request;
use crate::ports::{Transport, TransportError};
use crate::variable_resolver::SubstitutionEngine;

/// Status text recorded when no response was received.
pub const ERROR_STATUS: &str = "Error";

/// Run parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunnerConfig {
    /// How many times the selection is replayed; at least 1.
    pub iterations: u32,
    /// Pause between two consecutive requests, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            delay_ms: 0,
        }
    }
}

impl RunnerConfig {
    /// Creates a config.
    #[must_use]
    pub const fn new(iterations: u32, delay_ms: u64) -> Self {
        Self {
            iterations,
            delay_ms,
        }
    }
}

/// Runner lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    /// Nothing has run yet.
    #[default]
    Idle,
    /// A run is in progress.
    Running,
    /// The last run finished or was stopped.
    Completed,
}

/// One entry of the result log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    /// 1-based iteration number.
    pub iteration: u32,
    /// Id of the request that was sent.
    pub request_id: String,
    /// Name of the request at the time it was sent.
    pub request_name: String,
    /// Status code; `0` when no response was received.
    pub code: u16,
    /// Status text, or [`ERROR_STATUS`].
    pub status: String,
    /// Response body, or the error description.
    pub body: String,
    /// Wall time spent on the request.
    pub duration_seconds: f64,
}

impl RunRecord {
    /// Returns true for codes in 200..=399.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 400
    }

    fn failure(iteration: u32, id: &str, name: &str, error: &TransportError, elapsed: Duration) -> Self {
        Self {
            iteration,
            request_id: id.to_string(),
            request_name: name.to_string(),
            code: 0,
            status: ERROR_STATUS.to_string(),
            body: format!("Error: {error}"),
            duration_seconds: elapsed.as_secs_f64(),
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Number of records.
    pub total: usize,
    /// Records with a 2xx or 3xx code.
    pub succeeded: usize,
    /// All other records.
    pub failed: usize,
    /// Sum of the records' durations.
    pub total_duration_seconds: f64,
}

impl RunSummary {
    fn from_records(records: &[RunRecord]) -> Self {
        let succeeded = records.iter().filter(|r| r.is_success()).count();
        Self {
            total: records.len(),
            succeeded,
            failed: records.len() - succeeded,
            total_duration_seconds: records.iter().map(|r| r.duration_seconds).sum(),
        }
    }
}

/// Requests the current run to stop before its next request.
///
/// The request in flight is allowed to finish.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Asks the run to stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true if a stop was requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Sequential batch executor over a [`Transport`].
pub struct CollectionRunner<T: Transport> {
    transport: Arc<T>,
    config: RunnerConfig,
    engine: SubstitutionEngine,
    state: RunState,
    results: Vec<RunRecord>,
    stop: StopHandle,
    progress: Option<UnboundedSender<RunRecord>>,
}

impl<T: Transport> CollectionRunner<T> {
    /// Creates a runner.
    #[must_use]
    pub fn new(transport: Arc<T>, config: RunnerConfig) -> Self {
        Self {
            transport,
            config,
            engine: SubstitutionEngine::default(),
            state: RunState::Idle,
            results: Vec::new(),
            stop: StopHandle::default(),
            progress: None,
        }
    }

    /// Uses the given substitution engine.
    #[must_use]
    pub fn with_engine(mut self, engine: SubstitutionEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Sends every record to `sender` as soon as it is appended.
    #[must_use]
    pub fn with_progress(mut self, sender: UnboundedSender<RunRecord>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// The result log of the current or last run.
    #[must_use]
    pub fn results(&self) -> &[RunRecord] {
        &self.results
    }

    /// Run parameters.
    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// A handle that stops the run from another task.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Runs the selected requests `iterations` times, in order.
    ///
    /// Unknown ids are skipped. The log is cleared when a new run starts.
    pub async fn run(&mut self, collection: &Collection, request_ids: &[String]) -> RunSummary {
        self.results.clear();
        self.stop.reset();
        self.state = RunState::Running;

        let iterations = self.config.iterations.max(1);
        let delay = Duration::from_millis(self.config.delay_ms);
        let total = u64::from(iterations) * request_ids.len() as u64;
        tracing::info!(
            collection_id = %collection.id,
            iterations,
            requests = request_ids.len(),
            "run started"
        );

        let mut scheduled: u64 = 0;
        'run: for iteration in 1..=iterations {
            for id in request_ids {
                if self.stop.is_stopped() {
                    tracing::info!(iteration, "run stopped");
                    break 'run;
                }
                scheduled += 1;

                let Ok(request) = find_request(collection, id) else {
                    tracing::warn!(request_id = %id, "request not found, skipping");
                    continue;
                };

                let record = self.execute(collection, request, iteration).await;
                tracing::info!(
                    request_id = %record.request_id,
                    iteration,
                    code = record.code,
                    duration_seconds = record.duration_seconds,
                    "request completed"
                );
                if let Some(progress) = &self.progress {
                    let _ = progress.send(record.clone());
                }
                self.results.push(record);

                if !delay.is_zero() && scheduled < total {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        self.state = RunState::Completed;
        let summary = RunSummary::from_records(&self.results);
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "run completed"
        );
        summary
    }

    /// Appends every logged result to its request's response cache, in run
    /// order. Each cache keeps only its most recent entries.
    #[must_use]
    pub fn record_results(&self, collection: &Collection) -> Collection {
        self.results.iter().fold(collection.clone(), |current, record| {
            let entry = ResponseEntry::now(record.code, &record.status, &record.body);
            record_response(&current, &record.request_id, entry).unwrap_or(current)
        })
    }

    async fn execute(
        &self,
        collection: &Collection,
        request: &Request,
        iteration: u32,
    ) -> RunRecord {
        let started = Instant::now();
        let prepared = match prepare_request(collection, request, &self.engine) {
            Ok(prepared) => prepared,
            Err(error) => {
                return RunRecord::failure(iteration, &request.id, &request.name, &error, started.elapsed());
            }
        };

        match self.transport.send(&prepared).await {
            Ok(response) => RunRecord {
                iteration,
                request_id: request.id.clone(),
                request_name: request.name.clone(),
                code: response.code,
                status: response.status,
                body: response.body,
                duration_seconds: started.elapsed().as_secs_f64(),
            },
            Err(error) => {
                tracing::warn!(request_id = %request.id, %error, "request failed");
                RunRecord::failure(iteration, &request.id, &request.name, &error, started.elapsed())
            }
        }
    }
}
