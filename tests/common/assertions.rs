//! Custom assertion utilities for tests.

use move_e2e::{ScenarioReport, StepStatus};

/// Assert that a result is Ok and return the inner value.
#[allow(dead_code)]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{} failed: {:?}", context, e),
    }
}

/// Assert that a result is Err and return the error.
#[allow(dead_code)]
pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>, context: &str) -> E {
    match result {
        Ok(v) => panic!("{} should have failed but got: {:?}", context, v),
        Err(e) => e,
    }
}

/// Assert that an error message contains expected text (case-insensitive).
#[allow(dead_code)]
pub fn assert_error_contains<E: std::fmt::Display>(error: E, expected_text: &str, context: &str) {
    let error_str = error.to_string().to_lowercase();
    let expected_lower = expected_text.to_lowercase();

    assert!(
        error_str.contains(&expected_lower),
        "{}: error message should contain '{}', got: {}",
        context,
        expected_text,
        error
    );
}

/// Assert every step passed, printing the failing step otherwise.
#[allow(dead_code)]
pub fn assert_all_passed(report: &ScenarioReport) {
    if let Some(step) = report.first_failure() {
        panic!(
            "suite {} failed at '{}': {}",
            report.suite,
            step.name,
            step.detail.as_deref().unwrap_or("<no detail>")
        );
    }
    assert_eq!(report.failed, 0, "suite {}", report.suite);
}

/// Assert the named step failed with a detail containing `expected_text`.
#[allow(dead_code)]
pub fn assert_step_failed(report: &ScenarioReport, step: &str, expected_text: &str) {
    let found = report
        .step(step)
        .unwrap_or_else(|| panic!("suite {} has no step '{}'", report.suite, step));
    assert_eq!(found.status, StepStatus::Failed, "step '{}'", step);
    let detail = found.detail.as_deref().unwrap_or_default();
    assert!(
        detail.contains(expected_text),
        "step '{}': detail should contain '{}', got: {}",
        step,
        expected_text,
        detail
    );
}
