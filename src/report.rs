//! Aggregated results of one `move-e2e run`.

use serde::Serialize;
use std::fmt::Write as _;

use crate::scenario::{ScenarioReport, StepStatus};

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub network: String,
    pub node_url: String,
    /// RFC 3339 start time.
    pub started_at: String,
    pub ok: bool,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub suites: Vec<ScenarioReport>,
}

impl RunReport {
    pub fn new(network: &str, node_url: &str) -> Self {
        Self {
            network: network.to_string(),
            node_url: node_url.to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            ok: true,
            passed: 0,
            failed: 0,
            skipped: 0,
            suites: Vec::new(),
        }
    }

    pub fn push(&mut self, suite: ScenarioReport) {
        self.passed += suite.passed;
        self.failed += suite.failed;
        self.skipped += suite.skipped;
        self.ok &= suite.ok();
        self.suites.push(suite);
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "move-e2e on {} ({})", self.network, self.node_url);
        for suite in &self.suites {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{} ({} passed, {} failed, {} skipped, {} ms)",
                suite.suite, suite.passed, suite.failed, suite.skipped, suite.duration_ms
            );
            for step in &suite.steps {
                let tag = match step.status {
                    StepStatus::Passed => "PASS",
                    StepStatus::Failed => "FAIL",
                    StepStatus::Skipped => "SKIP",
                };
                let _ = write!(out, "  [{}] {}", tag, step.name);
                if let Some(detail) = &step.detail {
                    let _ = write!(out, ": {}", detail);
                }
                let _ = writeln!(out);
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Summary: {} passed, {} failed, {} skipped",
            self.passed, self.failed, self.skipped
        );
        out
    }
}
