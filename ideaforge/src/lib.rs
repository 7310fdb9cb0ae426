//! # Ideaforge
//!
//! Turns a user-submitted startup idea into an actionable plan by piping it
//! through a fixed sequence of nine streaming text-generation stages.
//!
//! The library provides:
//!
//! - **Stage catalog**: nine immutable stage records with fixed wiring
//! - **Pipeline runner**: strictly sequential execution, abort on first failure
//! - **Streaming accumulation**: incremental text assembly with live
//!   progress notifications
//! - **Derived artifacts**: a workflow flowchart (Graphviz DOT) and the
//!   static budget dataset (CSV + bar-chart scaling)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ideaforge::prelude::*;
//! use std::sync::Arc;
//!
//! let api_key = api_key_from_env()?;
//! let generator = Arc::new(GeminiGenerator::new(GeneratorConfig::default(), api_key)?);
//! let runner = PipelineRunner::new(generator);
//!
//! let report = runner.run("AI-powered education tools").await;
//! if let Some(workflow) = report.output(StageName::WorkflowDeveloper) {
//!     let chart = Flowchart::from_workflow(workflow);
//!     std::fs::write("workflow.dot", chart.to_dot())?;
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod charts;
pub mod config;
pub mod errors;
pub mod generation;
pub mod pipeline;
pub mod progress;
pub mod stages;
pub mod streaming;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::charts::{BudgetChart, BudgetRow, Flowchart, FlowchartNode};
    pub use crate::config::{api_key_from_env, GeneratorConfig, API_KEY_VAR};
    pub use crate::errors::{
        ConfigError, GenerationError, IdeaforgeError, StageFailure, WiringError,
    };
    pub use crate::generation::{
        Fragment, FragmentStream, GeminiGenerator, GenerationRequest, MockGenerator,
        TextGenerator,
    };
    pub use crate::pipeline::{PipelineRunner, RunReport};
    pub use crate::progress::{
        CollectingProgressSink, NoOpProgressSink, ProgressEvent, ProgressSink,
        TracingProgressSink,
    };
    pub use crate::stages::{stage_catalog, InputSource, StageName, StageSpec};
    pub use crate::streaming::accumulate;
}
