//! Ideaforge CLI — interactive startup planning session.
//!
//! Reads a startup idea, drives the nine-stage generation pipeline with live
//! streaming output, and writes the downloadable artifacts (workflow
//! flowchart as Graphviz DOT, budget data as CSV) to the output directory.

use anyhow::Context;
use clap::Parser;
use ideaforge::prelude::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Ideaforge — turn a startup idea into actionable steps, resources, and
/// recruitment plans.
#[derive(Parser)]
#[command(name = "ideaforge", version, about)]
struct Cli {
    /// Directory where the downloadable artifacts are written
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Model identifier override
    #[arg(long)]
    model: Option<String>,

    /// Delay between streamed fragments, in milliseconds
    #[arg(long, default_value_t = 100)]
    pacing_ms: u64,

    /// Startup idea; read from the terminal when omitted
    #[arg(short = 'i', long = "idea")]
    idea: Option<String>,
}

/// Streams pipeline progress to the terminal.
struct TerminalSink;

impl ProgressSink for TerminalSink {
    fn stage_started(&self, stage: StageName) {
        println!("\n### Step {}: {}\n", stage.position() + 1, stage.title());
    }

    fn fragment(&self, _stage: StageName, delta: &str, _assembled: &str) {
        print!("{delta}");
        let _ = io::stdout().flush();
    }

    fn stage_completed(&self, _stage: StageName, _output: &str) {
        println!();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let api_key =
        api_key_from_env().context("Google API key not found. Please add it to the environment.")?;

    let mut config = GeneratorConfig::default().with_fragment_delay(cli.pacing_ms);
    if let Some(model) = cli.model.clone() {
        config = config.with_model(model);
    }

    let idea = match cli.idea.clone() {
        Some(idea) => idea,
        None => prompt_for_idea()?,
    };
    if idea.trim().is_empty() {
        println!("No idea entered; nothing to do.");
        return Ok(());
    }

    let generator = Arc::new(GeminiGenerator::new(config.clone(), api_key)?);
    let runner = PipelineRunner::new(generator)
        .with_sink(Arc::new(TerminalSink))
        .with_pacing(config.fragment_delay());

    println!("Processing your startup idea...");
    let report = runner.run(idea.trim()).await;

    if let Some(workflow) = report.output(StageName::WorkflowDeveloper) {
        let chart = Flowchart::from_workflow(workflow);
        let dot_path = cli.output_dir.join("workflow.dot");
        std::fs::write(&dot_path, chart.to_dot())
            .with_context(|| format!("failed to write {}", dot_path.display()))?;
        println!("\nFlowchart written to {}", dot_path.display());
    }

    let budget = BudgetChart::standard();
    let csv_path = cli.output_dir.join("budget.csv");
    std::fs::write(&csv_path, budget.to_csv())
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    println!("Budget data written to {}", csv_path.display());
    render_budget_chart(&budget);

    match report.failure {
        None => println!("\nStartup plan generated successfully!"),
        Some(failure) => println!("\nAn error occurred: {failure}"),
    }

    Ok(())
}

fn prompt_for_idea() -> anyhow::Result<String> {
    println!("Ideaforge — Startup Builder");
    println!(
        "Enter your startup idea (e.g., 'I want to build a platform for AI-powered education tools'):"
    );
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn render_budget_chart(budget: &BudgetChart) {
    println!("\nProject Budget");
    let widths = budget.bar_widths(40);
    for (row, width) in budget.rows().iter().zip(widths) {
        println!("{:>12} | {:<40} {}", row.category, "#".repeat(width), row.amount);
    }
}
