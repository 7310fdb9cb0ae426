//! Progress sinks for live rendering of a pipeline run.
//!
//! Sinks are purely observational: they receive stage lifecycle events and
//! per-fragment updates but never influence execution.

use crate::errors::StageFailure;
use crate::stages::StageName;
use tracing::{error, info, trace};

/// Observer for pipeline progress.
pub trait ProgressSink: Send + Sync {
    /// Called when a stage begins executing.
    fn stage_started(&self, _stage: StageName) {}

    /// Called after each payload-carrying fragment, with the delta and the
    /// text assembled so far.
    fn fragment(&self, _stage: StageName, _delta: &str, _assembled: &str) {}

    /// Called when a stage's output is fully materialized.
    fn stage_completed(&self, _stage: StageName, _output: &str) {}

    /// Called when a stage fails; the run aborts afterwards.
    fn stage_failed(&self, _stage: StageName, _failure: &StageFailure) {}

    /// Called once after the last stage of a successful run.
    fn run_completed(&self) {}
}

/// A no-op sink that discards all progress.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgressSink;

impl ProgressSink for NoOpProgressSink {}

/// A sink that logs progress using the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn stage_started(&self, stage: StageName) {
        info!(stage = %stage, "stage started");
    }

    fn fragment(&self, stage: StageName, delta: &str, assembled: &str) {
        trace!(
            stage = %stage,
            delta_chars = delta.len(),
            assembled_chars = assembled.len(),
            "fragment received"
        );
    }

    fn stage_completed(&self, stage: StageName, output: &str) {
        info!(stage = %stage, chars = output.len(), "stage completed");
    }

    fn stage_failed(&self, stage: StageName, failure: &StageFailure) {
        error!(stage = %stage, error = %failure.message, "stage failed");
    }

    fn run_completed(&self) {
        info!("run completed");
    }
}

/// A progress event captured by [`CollectingProgressSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A stage began executing.
    Started(StageName),
    /// A fragment arrived.
    Fragment {
        /// The stage receiving the fragment.
        stage: StageName,
        /// The fragment payload.
        delta: String,
        /// The text assembled so far.
        assembled: String,
    },
    /// A stage's output was materialized.
    Completed {
        /// The completed stage.
        stage: StageName,
        /// The materialized output.
        output: String,
    },
    /// A stage failed.
    Failed {
        /// The failed stage.
        stage: StageName,
        /// The failure message.
        message: String,
    },
    /// The run finished successfully.
    RunCompleted,
}

/// A collecting sink for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingProgressSink {
    events: parking_lot::RwLock<Vec<ProgressEvent>>,
}

impl CollectingProgressSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.read().clone()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Returns the stages that started, in order.
    #[must_use]
    pub fn started_stages(&self) -> Vec<StageName> {
        self.events
            .read()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Started(stage) => Some(*stage),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for CollectingProgressSink {
    fn stage_started(&self, stage: StageName) {
        self.events.write().push(ProgressEvent::Started(stage));
    }

    fn fragment(&self, stage: StageName, delta: &str, assembled: &str) {
        self.events.write().push(ProgressEvent::Fragment {
            stage,
            delta: delta.to_string(),
            assembled: assembled.to_string(),
        });
    }

    fn stage_completed(&self, stage: StageName, output: &str) {
        self.events.write().push(ProgressEvent::Completed {
            stage,
            output: output.to_string(),
        });
    }

    fn stage_failed(&self, stage: StageName, failure: &StageFailure) {
        self.events.write().push(ProgressEvent::Failed {
            stage,
            message: failure.message.clone(),
        });
    }

    fn run_completed(&self) {
        self.events.write().push(ProgressEvent::RunCompleted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_noop_sink() {
        let sink = NoOpProgressSink;
        sink.stage_started(StageName::IdeaEnhancer);
        sink.fragment(StageName::IdeaEnhancer, "x", "x");
        sink.run_completed();
        // Should not panic
    }

    #[test]
    fn test_collecting_sink_records_in_order() {
        let sink = CollectingProgressSink::new();
        assert!(sink.is_empty());

        sink.stage_started(StageName::IdeaEnhancer);
        sink.fragment(StageName::IdeaEnhancer, "a", "a");
        sink.stage_completed(StageName::IdeaEnhancer, "a");
        sink.run_completed();

        assert_eq!(sink.len(), 4);
        let events = sink.events();
        assert_eq!(events[0], ProgressEvent::Started(StageName::IdeaEnhancer));
        assert_eq!(events[3], ProgressEvent::RunCompleted);
    }

    #[test]
    fn test_collecting_sink_started_stages() {
        let sink = CollectingProgressSink::new();
        sink.stage_started(StageName::IdeaEnhancer);
        sink.stage_completed(StageName::IdeaEnhancer, "out");
        sink.stage_started(StageName::IdeaEvaluator);

        assert_eq!(
            sink.started_stages(),
            vec![StageName::IdeaEnhancer, StageName::IdeaEvaluator]
        );
    }

    #[test]
    fn test_collecting_sink_clear() {
        let sink = CollectingProgressSink::new();
        sink.run_completed();
        assert_eq!(sink.len(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }
}
