//! Ordered scenarios over a typed context.
//!
//! A suite is a list of named steps that share a context value `Ctx`. Steps
//! run strictly in declaration order; later steps read what earlier steps
//! captured (a snapshot, a sale id, a token name). Once a step fails, the rest
//! are reported as skipped instead of running against incomplete state.

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::chain::Chain;
use crate::harness::{Harness, HarnessError};

pub const SKIPPED_AFTER_FAILURE: &str = "earlier step failed";

type StepFn<C, Ctx> = Box<dyn Fn(&Harness<C>, &mut Ctx) -> Result<(), HarnessError>>;

enum StepBody<C, Ctx> {
    Run(StepFn<C, Ctx>),
    Skip(String),
}

struct Step<C, Ctx> {
    name: String,
    body: StepBody<C, Ctx>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub name: String,
    pub status: StepStatus,
    /// Failure message or skip reason.
    pub detail: Option<String>,
    pub duration_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub suite: String,
    pub steps: Vec<StepReport>,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u128,
}

impl ScenarioReport {
    fn from_steps(suite: &str, steps: Vec<StepReport>, duration_ms: u128) -> Self {
        let count = |s: StepStatus| steps.iter().filter(|r| r.status == s).count();
        Self {
            suite: suite.to_string(),
            passed: count(StepStatus::Passed),
            failed: count(StepStatus::Failed),
            skipped: count(StepStatus::Skipped),
            steps,
            duration_ms,
        }
    }

    pub fn ok(&self) -> bool {
        self.failed == 0
    }

    pub fn first_failure(&self) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }

    pub fn step(&self, name: &str) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.name == name)
    }
}

pub struct Scenario<C, Ctx> {
    name: String,
    steps: Vec<Step<C, Ctx>>,
}

impl<C: Chain, Ctx> Scenario<C, Ctx> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn step<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Harness<C>, &mut Ctx) -> Result<(), HarnessError> + 'static,
    {
        self.steps.push(Step {
            name: name.into(),
            body: StepBody::Run(Box::new(f)),
        });
        self
    }

    /// Declare a step that is known not to be runnable.
    pub fn skip(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.steps.push(Step {
            name: name.into(),
            body: StepBody::Skip(reason.into()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn run(&self, harness: &Harness<C>, ctx: Ctx) -> ScenarioReport {
        self.run_with_context(harness, ctx).0
    }

    /// Like [`Scenario::run`], also handing back the final context.
    pub fn run_with_context(&self, harness: &Harness<C>, mut ctx: Ctx) -> (ScenarioReport, Ctx) {
        let started = Instant::now();
        let limit = harness.step_timeout();
        let mut failed = false;
        let mut reports = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            if failed {
                reports.push(skipped(&step.name, SKIPPED_AFTER_FAILURE));
                continue;
            }
            let body = match &step.body {
                StepBody::Skip(reason) => {
                    info!(suite = %self.name, step = %step.name, %reason, "step skipped");
                    reports.push(skipped(&step.name, reason));
                    continue;
                }
                StepBody::Run(body) => body,
            };

            let step_started = Instant::now();
            let result = body(harness, &mut ctx)
                .and_then(|()| within_limit(&step.name, step_started.elapsed(), limit));
            let duration_ms = step_started.elapsed().as_millis();

            let report = match result {
                Ok(()) => {
                    info!(suite = %self.name, step = %step.name, duration_ms, "step passed");
                    StepReport {
                        name: step.name.clone(),
                        status: StepStatus::Passed,
                        detail: None,
                        duration_ms,
                    }
                }
                Err(e) => {
                    warn!(suite = %self.name, step = %step.name, error = %e, "step failed");
                    failed = true;
                    StepReport {
                        name: step.name.clone(),
                        status: StepStatus::Failed,
                        detail: Some(e.to_string()),
                        duration_ms,
                    }
                }
            };
            reports.push(report);
        }

        let report = ScenarioReport::from_steps(&self.name, reports, started.elapsed().as_millis());
        (report, ctx)
    }

    /// A report with every step skipped for `reason`, without running anything.
    pub fn report_skipped(&self, reason: &str) -> ScenarioReport {
        let steps = self.steps.iter().map(|s| skipped(&s.name, reason)).collect();
        ScenarioReport::from_steps(&self.name, steps, 0)
    }
}

fn skipped(name: &str, reason: &str) -> StepReport {
    StepReport {
        name: name.to_string(),
        status: StepStatus::Skipped,
        detail: Some(reason.to_string()),
        duration_ms: 0,
    }
}

fn within_limit(step: &str, elapsed: Duration, limit: Option<Duration>) -> Result<(), HarnessError> {
    match limit {
        Some(limit) if elapsed > limit => Err(HarnessError::StepTimeout {
            step: step.to_string(),
            elapsed_ms: elapsed.as_millis(),
            limit_ms: limit.as_millis(),
        }),
        _ => Ok(()),
    }
}
