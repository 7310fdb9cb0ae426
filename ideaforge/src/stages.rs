//! Stage catalog: the nine generation stages and their fixed wiring.
//!
//! Stages are immutable configuration records built once at initialization.
//! The role and instruction strings are externally authored prompt data; the
//! only logic here is the input wiring between stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The nine pipeline stages, in execution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Refines the raw idea into a comprehensive description.
    IdeaEnhancer,
    /// Validates the feasibility of the enhanced idea.
    IdeaEvaluator,
    /// Develops the step-by-step implementation workflow.
    WorkflowDeveloper,
    /// Identifies resources, skill sets, and budget.
    ResourceAnalyst,
    /// Generates job postings for the required roles.
    RecruitmentContentCreator,
    /// Crafts interview questions for the job postings.
    InterviewDesigner,
    /// Produces charts and tables for the plan.
    Visualization,
    /// Collects feedback on the generated plan.
    Feedback,
    /// Exports the plan to external tools.
    Export,
}

impl StageName {
    /// All stages in declared execution order.
    pub const ALL: [Self; 9] = [
        Self::IdeaEnhancer,
        Self::IdeaEvaluator,
        Self::WorkflowDeveloper,
        Self::ResourceAnalyst,
        Self::RecruitmentContentCreator,
        Self::InterviewDesigner,
        Self::Visualization,
        Self::Feedback,
        Self::Export,
    ];

    /// Human-readable section title for display.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::IdeaEnhancer => "Enhanced Startup Idea",
            Self::IdeaEvaluator => "Idea Validation",
            Self::WorkflowDeveloper => "Implementation Workflow",
            Self::ResourceAnalyst => "Required Resources and Budget",
            Self::RecruitmentContentCreator => "Job Postings",
            Self::InterviewDesigner => "Interview Questions",
            Self::Visualization => "Visualization",
            Self::Feedback => "Feedback",
            Self::Export => "Export the Plan",
        }
    }

    /// Zero-based position in the execution order.
    #[must_use]
    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdeaEnhancer => write!(f, "idea_enhancer"),
            Self::IdeaEvaluator => write!(f, "idea_evaluator"),
            Self::WorkflowDeveloper => write!(f, "workflow_developer"),
            Self::ResourceAnalyst => write!(f, "resource_analyst"),
            Self::RecruitmentContentCreator => write!(f, "recruitment_content_creator"),
            Self::InterviewDesigner => write!(f, "interview_designer"),
            Self::Visualization => write!(f, "visualization"),
            Self::Feedback => write!(f, "feedback"),
            Self::Export => write!(f, "export"),
        }
    }
}

/// Where a stage's input text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "value")]
pub enum InputSource {
    /// The raw idea text submitted by the user.
    UserIdea,
    /// The materialized output of an earlier stage.
    StageOutput(StageName),
    /// A fixed literal, independent of pipeline data.
    Literal(String),
}

/// Immutable configuration for one generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    /// The stage identity.
    pub name: StageName,
    /// The role handed to the generation capability.
    pub role: String,
    /// Instruction lines, in order.
    pub instructions: Vec<String>,
    /// Where this stage's input text comes from.
    pub input: InputSource,
}

impl StageSpec {
    /// Creates a new stage specification with no instructions.
    #[must_use]
    pub fn new(name: StageName, role: impl Into<String>, input: InputSource) -> Self {
        Self {
            name,
            role: role.into(),
            instructions: Vec::new(),
            input,
        }
    }

    /// Appends an instruction line.
    #[must_use]
    pub fn with_instruction(mut self, line: impl Into<String>) -> Self {
        self.instructions.push(line.into());
        self
    }
}

/// Builds the nine stage records in execution order.
///
/// The wiring is fixed: the enhanced idea feeds both the evaluator and the
/// workflow developer; the workflow feeds both the resource analyst and the
/// visualization stage; recruitment chains into interview design; feedback
/// and export consume fixed literals.
#[must_use]
pub fn stage_catalog() -> Vec<StageSpec> {
    vec![
        StageSpec::new(
            StageName::IdeaEnhancer,
            "Refine and enhance the user's startup idea into a comprehensive description.",
            InputSource::UserIdea,
        )
        .with_instruction(
            "Analyze the user's startup idea and provide a detailed, refined description.",
        )
        .with_instruction(
            "Include potential market opportunities, target audience, and unique value proposition.",
        ),
        StageSpec::new(
            StageName::IdeaEvaluator,
            "Validate the feasibility of the startup idea.",
            InputSource::StageOutput(StageName::IdeaEnhancer),
        )
        .with_instruction("Analyze the market size, competition, and potential challenges.")
        .with_instruction("Provide data-driven insights to validate the idea."),
        StageSpec::new(
            StageName::WorkflowDeveloper,
            "Develop a step-by-step implementation plan for the startup idea.",
            InputSource::StageOutput(StageName::IdeaEnhancer),
        )
        .with_instruction("Create a detailed, actionable workflow for implementing the startup idea.")
        .with_instruction("Break down the plan into phases with clear milestones and deliverables."),
        StageSpec::new(
            StageName::ResourceAnalyst,
            "Identify the necessary resources, skill sets, and budget for the startup.",
            InputSource::StageOutput(StageName::WorkflowDeveloper),
        )
        .with_instruction("List the required resources (e.g., tools, software, hardware).")
        .with_instruction("Identify the skill sets needed for the team.")
        .with_instruction("Provide an estimated budget for the project."),
        StageSpec::new(
            StageName::RecruitmentContentCreator,
            "Generate job postings for the roles required to execute the startup idea.",
            InputSource::StageOutput(StageName::ResourceAnalyst),
        )
        .with_instruction("Create detailed job descriptions for each role.")
        .with_instruction("Include responsibilities, qualifications, and desired skills."),
        StageSpec::new(
            StageName::InterviewDesigner,
            "Craft tailored interview questions for evaluating candidates.",
            InputSource::StageOutput(StageName::RecruitmentContentCreator),
        )
        .with_instruction("Design interview questions specific to each role.")
        .with_instruction("Include technical, behavioral, and situational questions."),
        StageSpec::new(
            StageName::Visualization,
            "Create interactive charts and graphs for budgets, timelines, and resource allocation.",
            InputSource::StageOutput(StageName::WorkflowDeveloper),
        )
        .with_instruction("Visualize the workflow as a flowchart.")
        .with_instruction("Create charts for budgets and resource allocation.")
        .with_instruction("Generate well-formatted tables for the data."),
        StageSpec::new(
            StageName::Feedback,
            "Collect user feedback and refine agent outputs dynamically.",
            InputSource::Literal("Please provide feedback on the generated plan.".to_string()),
        )
        .with_instruction("Ask the user for feedback on each step.")
        .with_instruction("Refine the outputs based on user feedback."),
        StageSpec::new(
            StageName::Export,
            "Export the generated plans to external tools.",
            InputSource::Literal("Export the plan to Google Sheets.".to_string()),
        )
        .with_instruction("Export the workflow to Google Sheets, Trello, or Notion.")
        .with_instruction("Post job openings to LinkedIn or Indeed."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_has_nine_stages_in_order() {
        let catalog = stage_catalog();
        assert_eq!(catalog.len(), 9);

        let names: Vec<StageName> = catalog.iter().map(|s| s.name).collect();
        assert_eq!(names, StageName::ALL.to_vec());
    }

    #[test]
    fn test_catalog_wiring() {
        let catalog = stage_catalog();
        let input_of = |name: StageName| -> InputSource {
            catalog
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.input.clone())
                .unwrap_or(InputSource::UserIdea)
        };

        assert_eq!(input_of(StageName::IdeaEnhancer), InputSource::UserIdea);
        assert_eq!(
            input_of(StageName::IdeaEvaluator),
            InputSource::StageOutput(StageName::IdeaEnhancer)
        );
        assert_eq!(
            input_of(StageName::WorkflowDeveloper),
            InputSource::StageOutput(StageName::IdeaEnhancer)
        );
        assert_eq!(
            input_of(StageName::ResourceAnalyst),
            InputSource::StageOutput(StageName::WorkflowDeveloper)
        );
        assert_eq!(
            input_of(StageName::RecruitmentContentCreator),
            InputSource::StageOutput(StageName::ResourceAnalyst)
        );
        assert_eq!(
            input_of(StageName::InterviewDesigner),
            InputSource::StageOutput(StageName::RecruitmentContentCreator)
        );
        assert_eq!(
            input_of(StageName::Visualization),
            InputSource::StageOutput(StageName::WorkflowDeveloper)
        );
        assert!(matches!(input_of(StageName::Feedback), InputSource::Literal(_)));
        assert!(matches!(input_of(StageName::Export), InputSource::Literal(_)));
    }

    #[test]
    fn test_every_stage_has_instructions() {
        for spec in stage_catalog() {
            assert!(!spec.instructions.is_empty(), "{} has no instructions", spec.name);
            assert!(!spec.role.is_empty(), "{} has no role", spec.name);
        }
    }

    #[test]
    fn test_stage_name_display() {
        assert_eq!(StageName::IdeaEnhancer.to_string(), "idea_enhancer");
        assert_eq!(
            StageName::RecruitmentContentCreator.to_string(),
            "recruitment_content_creator"
        );
    }

    #[test]
    fn test_stage_name_serialize() {
        let json = serde_json::to_string(&StageName::WorkflowDeveloper).unwrap();
        assert_eq!(json, r#""workflow_developer""#);

        let deserialized: StageName = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, StageName::WorkflowDeveloper);
    }

    #[test]
    fn test_stage_name_position() {
        assert_eq!(StageName::IdeaEnhancer.position(), 0);
        assert_eq!(StageName::Export.position(), 8);
    }
}
