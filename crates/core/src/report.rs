//! Execution report - the durable artifact of a forward run.
//!
//! Written after every forward run, including connection failures and halted
//! runs, so a failed CI job still leaves something to diagnose from.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SeedbedResult;
use crate::verify::VerificationOutcome;

/// Default location of the report artifact.
pub const DEFAULT_REPORT_PATH: &str = "schema-execution-results.json";

/// Outcome classification for one executed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    /// The target object already existed; the run continued.
    Skipped,
    /// Unrecoverable error; no further steps ran.
    Failed,
}

/// One entry of the ordered result log, produced once per executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step: String,
    pub status: StepStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl StepResult {
    pub fn new(step: impl Into<String>, status: StepStatus, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            status,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Aggregate counts over the result log. `total` is the size of the step
/// table, so a halted run shows fewer recorded outcomes than `total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Snapshot of a forward run: per-step outcomes, stringified verification
/// results, and the aggregate counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub execution_results: Vec<StepResult>,
    pub verification_results: BTreeMap<String, String>,
    pub summary: ExecutionSummary,
}

impl ExecutionReport {
    /// Build the report from the result log and verification outcomes.
    /// `total_steps` is the size of the step table, not of the log.
    pub fn new(
        results: Vec<StepResult>,
        verification: Vec<(String, VerificationOutcome)>,
        total_steps: usize,
    ) -> Self {
        let successful = results
            .iter()
            .filter(|r| r.status == StepStatus::Success)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.status == StepStatus::Failed)
            .count();
        let skipped = results
            .iter()
            .filter(|r| r.status == StepStatus::Skipped)
            .count();

        Self {
            execution_results: results,
            verification_results: verification
                .into_iter()
                .map(|(name, outcome)| (name, outcome.to_report_string()))
                .collect(),
            summary: ExecutionSummary {
                total: total_steps,
                successful,
                failed,
                skipped,
            },
        }
    }

    /// Synthetic report for a run that never reached the step loop.
    pub fn connection_failure(message: impl Into<String>) -> Self {
        let results = vec![StepResult::new(
            "Connection",
            StepStatus::Failed,
            message,
        )];
        Self::new(results, Vec::new(), 1)
    }

    /// True when the log records at least one failed step. Drives the
    /// process exit code.
    pub fn has_failures(&self) -> bool {
        self.execution_results
            .iter()
            .any(|r| r.status == StepStatus::Failed)
    }

    /// Persist the report as pretty-printed JSON.
    pub fn write_to(&self, path: impl AsRef<Path>) -> SeedbedResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
