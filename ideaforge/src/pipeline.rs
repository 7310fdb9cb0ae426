//! Pipeline runner: strictly sequential execution of the stage catalog.
//!
//! One run takes the user's idea text through every stage in declaration
//! order. A stage's input is resolved from the fixed wiring (user idea, an
//! earlier stage's output, or a literal), its fragment stream is accumulated
//! to completion, and the materialized output is recorded exactly once. The
//! first failure aborts the remaining stages; completed outputs stay in the
//! report for display.

use crate::errors::{GenerationError, StageFailure, WiringError};
use crate::generation::{GenerationRequest, TextGenerator};
use crate::progress::{NoOpProgressSink, ProgressSink};
use crate::stages::{stage_catalog, InputSource, StageName, StageSpec};
use crate::streaming::accumulate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};
use uuid::Uuid;

/// The outcome of one pipeline run.
///
/// Outputs of completed stages are always preserved, including when the run
/// aborted part-way through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique identifier of this run.
    pub run_id: Uuid,
    /// Materialized outputs for every completed stage, in execution order.
    pub outputs: BTreeMap<StageName, String>,
    /// The first failure, if the run aborted.
    pub failure: Option<StageFailure>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished or aborted.
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Returns true if every stage completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Returns the output of a completed stage, if present.
    #[must_use]
    pub fn output(&self, stage: StageName) -> Option<&str> {
        self.outputs.get(&stage).map(String::as_str)
    }

    /// Returns the number of completed stages.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.outputs.len()
    }
}

/// Drives the stage catalog strictly in declaration order.
///
/// The runner is immutable configuration plus shared capability handles;
/// concurrent runs share no mutable state.
pub struct PipelineRunner {
    stages: Vec<StageSpec>,
    generator: Arc<dyn TextGenerator>,
    sink: Arc<dyn ProgressSink>,
    pacing: Duration,
}

impl PipelineRunner {
    /// Creates a runner over the standard nine-stage catalog.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            stages: stage_catalog(),
            generator,
            sink: Arc::new(NoOpProgressSink),
            pacing: Duration::ZERO,
        }
    }

    /// Creates a runner over a custom stage list, validating its wiring.
    ///
    /// # Errors
    ///
    /// Returns an error if a stage consumes an output that does not precede
    /// it in declaration order.
    pub fn with_stages(
        stages: Vec<StageSpec>,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self, WiringError> {
        validate_wiring(&stages)?;
        Ok(Self {
            stages,
            generator,
            sink: Arc::new(NoOpProgressSink),
            pacing: Duration::ZERO,
        })
    }

    /// Sets the progress sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the cosmetic inter-fragment delay.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Returns the number of stages in the catalog.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes every stage in order, aborting on the first failure.
    pub async fn run(&self, user_idea: &str) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut outputs: BTreeMap<StageName, String> = BTreeMap::new();
        let mut failure = None;

        info!(run_id = %run_id, stages = self.stages.len(), "pipeline run started");

        for spec in &self.stages {
            let input = resolve_input(&spec.input, user_idea, &outputs);
            self.sink.stage_started(spec.name);
            let start = Instant::now();

            match self.execute_stage(spec, input).await {
                Ok(output) => {
                    info!(
                        stage = %spec.name,
                        chars = output.len(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "stage completed"
                    );
                    self.sink.stage_completed(spec.name, &output);
                    outputs.insert(spec.name, output);
                }
                Err(err) => {
                    let failed = StageFailure::new(spec.name, err.to_string());
                    error!(stage = %spec.name, error = %failed.message, "stage failed, aborting run");
                    self.sink.stage_failed(spec.name, &failed);
                    failure = Some(failed);
                    break;
                }
            }
        }

        if failure.is_none() {
            info!(run_id = %run_id, "pipeline run completed");
            self.sink.run_completed();
        }

        RunReport {
            run_id,
            outputs,
            failure,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn execute_stage(
        &self,
        spec: &StageSpec,
        input: String,
    ) -> Result<String, GenerationError> {
        let request = GenerationRequest::new(&spec.role, input)
            .with_instructions(spec.instructions.clone());
        let fragments = self.generator.generate(request).await?;
        accumulate(spec.name, fragments, self.sink.as_ref(), self.pacing).await
    }
}

fn resolve_input(
    source: &InputSource,
    user_idea: &str,
    outputs: &BTreeMap<StageName, String>,
) -> String {
    match source {
        InputSource::UserIdea => user_idea.to_string(),
        // Wiring validation guarantees the producing stage already ran.
        InputSource::StageOutput(stage) => outputs.get(stage).cloned().unwrap_or_default(),
        InputSource::Literal(text) => text.clone(),
    }
}

/// Checks that every consumed stage output precedes its consumer.
fn validate_wiring(stages: &[StageSpec]) -> Result<(), WiringError> {
    let mut seen: HashSet<StageName> = HashSet::new();
    for spec in stages {
        if let InputSource::StageOutput(dep) = &spec.input {
            if !seen.contains(dep) {
                return Err(WiringError::new(spec.name, *dep));
            }
        }
        seen.insert(spec.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MockGenerator;
    use crate::progress::{CollectingProgressSink, ProgressEvent};
    use pretty_assertions::assert_eq;

    fn echo_runner() -> (Arc<MockGenerator>, PipelineRunner) {
        let mock = Arc::new(MockGenerator::echo());
        let runner = PipelineRunner::new(Arc::clone(&mock) as Arc<dyn TextGenerator>);
        (mock, runner)
    }

    #[tokio::test]
    async fn test_run_executes_all_stages_in_declaration_order() {
        let (mock, runner) = echo_runner();
        let report = runner.run("my idea").await;

        assert!(report.is_success());
        assert_eq!(report.completed_count(), 9);
        assert_eq!(mock.call_count(), 9);

        let calls = mock.calls();
        let catalog = stage_catalog();
        for (position, (call, spec)) in calls.iter().zip(catalog.iter()).enumerate() {
            assert_eq!(call.order, position);
            assert_eq!(call.role, spec.role);
        }
    }

    #[tokio::test]
    async fn test_run_wiring_feeds_each_stage_its_declared_input() {
        let (mock, runner) = echo_runner();
        let report = runner.run("my idea").await;
        assert!(report.is_success());

        // Echo mode: every output equals its input, so the recorded inputs
        // expose the wiring directly.
        let calls = mock.calls();
        let input_of = |stage: StageName| calls[stage.position()].input.clone();

        assert_eq!(input_of(StageName::IdeaEnhancer), "my idea");
        assert_eq!(
            input_of(StageName::IdeaEvaluator),
            report.output(StageName::IdeaEnhancer).unwrap()
        );
        assert_eq!(
            input_of(StageName::WorkflowDeveloper),
            report.output(StageName::IdeaEnhancer).unwrap()
        );
        assert_eq!(
            input_of(StageName::ResourceAnalyst),
            report.output(StageName::WorkflowDeveloper).unwrap()
        );
        assert_eq!(
            input_of(StageName::RecruitmentContentCreator),
            report.output(StageName::ResourceAnalyst).unwrap()
        );
        assert_eq!(
            input_of(StageName::InterviewDesigner),
            report.output(StageName::RecruitmentContentCreator).unwrap()
        );
        assert_eq!(
            input_of(StageName::Visualization),
            report.output(StageName::WorkflowDeveloper).unwrap()
        );
        assert_eq!(
            input_of(StageName::Feedback),
            "Please provide feedback on the generated plan."
        );
        assert_eq!(input_of(StageName::Export), "Export the plan to Google Sheets.");
    }

    #[tokio::test]
    async fn test_failure_at_stage_four_aborts_remaining_stages() {
        // Zero-based call 3 is the fourth stage (resource analyst).
        let mock = Arc::new(MockGenerator::echo().with_failure_at(3));
        let runner = PipelineRunner::new(Arc::clone(&mock) as Arc<dyn TextGenerator>);

        let report = runner.run("my idea").await;

        assert!(!report.is_success());
        assert_eq!(report.completed_count(), 3);
        assert!(report.output(StageName::IdeaEnhancer).is_some());
        assert!(report.output(StageName::IdeaEvaluator).is_some());
        assert!(report.output(StageName::WorkflowDeveloper).is_some());
        assert!(report.output(StageName::ResourceAnalyst).is_none());

        let failure = report.failure.unwrap();
        assert_eq!(failure.stage, StageName::ResourceAnalyst);

        // Stages five through nine were never invoked.
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_run_notifies_sink_per_stage() {
        let mock = Arc::new(MockGenerator::echo());
        let sink = Arc::new(CollectingProgressSink::new());
        let runner = PipelineRunner::new(Arc::clone(&mock) as Arc<dyn TextGenerator>)
            .with_sink(Arc::clone(&sink) as Arc<dyn ProgressSink>);

        let report = runner.run("my idea").await;
        assert!(report.is_success());

        assert_eq!(sink.started_stages(), StageName::ALL.to_vec());
        assert_eq!(
            sink.events().last(),
            Some(&ProgressEvent::RunCompleted)
        );
    }

    #[tokio::test]
    async fn test_failed_run_skips_run_completed_event() {
        let mock = Arc::new(MockGenerator::echo().with_failure_at(0));
        let sink = Arc::new(CollectingProgressSink::new());
        let runner = PipelineRunner::new(Arc::clone(&mock) as Arc<dyn TextGenerator>)
            .with_sink(Arc::clone(&sink) as Arc<dyn ProgressSink>);

        let report = runner.run("my idea").await;
        assert!(!report.is_success());
        assert_eq!(report.completed_count(), 0);

        let events = sink.events();
        assert!(events.iter().any(|e| matches!(e, ProgressEvent::Failed { .. })));
        assert!(!events.contains(&ProgressEvent::RunCompleted));
    }

    #[tokio::test]
    async fn test_with_stages_rejects_forward_reference() {
        let stages = vec![
            StageSpec::new(
                StageName::IdeaEvaluator,
                "role",
                InputSource::StageOutput(StageName::IdeaEnhancer),
            ),
            StageSpec::new(StageName::IdeaEnhancer, "role", InputSource::UserIdea),
        ];
        let mock = Arc::new(MockGenerator::echo());

        let result = PipelineRunner::with_stages(stages, mock);
        assert_eq!(
            result.err(),
            Some(WiringError::new(StageName::IdeaEvaluator, StageName::IdeaEnhancer))
        );
    }

    #[tokio::test]
    async fn test_with_stages_rejects_self_dependency() {
        let stages = vec![StageSpec::new(
            StageName::IdeaEnhancer,
            "role",
            InputSource::StageOutput(StageName::IdeaEnhancer),
        )];
        let mock = Arc::new(MockGenerator::echo());

        assert!(PipelineRunner::with_stages(stages, mock).is_err());
    }

    #[tokio::test]
    async fn test_standard_catalog_passes_wiring_validation() {
        let mock = Arc::new(MockGenerator::echo());
        let runner = PipelineRunner::with_stages(stage_catalog(), mock);
        assert!(runner.is_ok());
    }

    #[tokio::test]
    async fn test_report_timestamps_are_ordered() {
        let (_, runner) = echo_runner();
        let report = runner.run("my idea").await;
        assert!(report.started_at <= report.finished_at);
    }
}
