//! Batches of independent sub-targets where one failure must not abort the
//! rest.
//!
//! Every sub-target is attempted; failures are collected next to successes
//! and nothing already applied is rolled back.

use std::future::Future;

use futures::future::join_all;

use crate::config::LookupMode;

#[derive(Clone, Debug, PartialEq)]
pub struct BatchOutcome<T, E> {
    /// Successful sub-targets, in input order.
    pub succeeded: Vec<(String, T)>,
    /// Failed sub-targets, in input order.
    pub failed: Vec<(String, E)>,
}

impl<T, E> Default for BatchOutcome<T, E> {
    fn default() -> Self {
        Self { succeeded: Vec::new(), failed: Vec::new() }
    }
}

impl<T, E> BatchOutcome<T, E> {
    fn record(&mut self, target: &str, result: Result<T, E>) {
        match result {
            Ok(value) => self.succeeded.push((target.to_owned(), value)),
            Err(error) => self.failed.push((target.to_owned(), error)),
        }
    }

    pub fn succeeded_targets(&self) -> Vec<&str> {
        self.succeeded.iter().map(|(target, _)| target.as_str()).collect()
    }

    pub fn failed_targets(&self) -> Vec<&str> {
        self.failed.iter().map(|(target, _)| target.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }
}

/// Runs `operation` once per target, one after another or all at once.
///
/// Either way the outcome lists keep the order of `targets`.
pub async fn run_batch<'a, T, E, F, Fut>(
    targets: &'a [String],
    mode: LookupMode,
    operation: F,
) -> BatchOutcome<T, E>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut outcome = BatchOutcome::default();
    match mode {
        LookupMode::Sequential => {
            for target in targets {
                let result = operation(target.as_str()).await;
                outcome.record(target, result);
            }
        }
        LookupMode::Concurrent => {
            let results = join_all(targets.iter().map(|target| operation(target.as_str()))).await;
            for (target, result) in targets.iter().zip(results) {
                outcome.record(target, result);
            }
        }
    }
    outcome
}

/// `<success> a, b. <failure> c.` with either half omitted when empty.
pub fn summarize<T, E>(outcome: &BatchOutcome<T, E>, success: &str, failure: &str) -> String {
    let mut message = String::new();
    if !outcome.succeeded.is_empty() {
        message.push_str(&format!("{success} {}. ", outcome.succeeded_targets().join(", ")));
    }
    if !outcome.failed.is_empty() {
        message.push_str(&format!("{failure} {}.", outcome.failed_targets().join(", ")));
    }
    message.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::{run_batch, summarize, BatchOutcome};
    use crate::config::LookupMode;

    fn targets() -> Vec<String> {
        ["alpha", "bravo", "charlie", "delta"].iter().map(|name| name.to_string()).collect()
    }

    async fn attempt(target: &str) -> Result<usize, String> {
        if target.starts_with('c') {
            Err(format!("{target} refused"))
        } else {
            Ok(target.len())
        }
    }

    #[tokio::test]
    async fn failures_do_not_abort_remaining_targets() {
        let calls = AtomicUsize::new(0);
        let targets = targets();

        let outcome = run_batch(&targets, LookupMode::Sequential, |target| {
            calls.fetch_add(1, Ordering::SeqCst);
            attempt(target)
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(outcome.succeeded_targets(), vec!["alpha", "bravo", "delta"]);
        assert_eq!(outcome.failed, vec![("charlie".to_owned(), "charlie refused".to_owned())]);
    }

    #[tokio::test]
    async fn concurrent_mode_keeps_input_order() {
        let targets = targets();

        let outcome = run_batch(&targets, LookupMode::Concurrent, |target| async move {
            // Later targets finish first.
            let delay = match target {
                "alpha" => 30,
                "bravo" => 20,
                "charlie" => 10,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            attempt(target).await
        })
        .await;

        assert_eq!(outcome.succeeded_targets(), vec!["alpha", "bravo", "delta"]);
        assert_eq!(outcome.failed_targets(), vec!["charlie"]);
    }

    #[test]
    fn summary_names_both_halves() {
        let outcome: BatchOutcome<(), ()> = BatchOutcome {
            succeeded: vec![("a.com".to_owned(), ()), ("b.com".to_owned(), ())],
            failed: vec![("c.invalid".to_owned(), ())],
        };
        assert_eq!(summarize(&outcome, "Successfully blocked", "Failed to block"), "Successfully blocked a.com, b.com. Failed to block c.invalid.");

        let only_failed: BatchOutcome<(), ()> =
            BatchOutcome { succeeded: Vec::new(), failed: vec![("c.invalid".to_owned(), ())] };
        assert_eq!(summarize(&only_failed, "Successfully blocked", "Failed to block"), "Failed to block c.invalid.");

        let only_succeeded: BatchOutcome<(), ()> =
            BatchOutcome { succeeded: vec![("a.com".to_owned(), ())], failed: Vec::new() };
        assert_eq!(summarize(&only_succeeded, "Successfully blocked", "Failed to block"), "Successfully blocked a.com.");
    }
}
