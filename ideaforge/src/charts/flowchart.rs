//! Flowchart derived from the workflow stage output.
//!
//! The construction is purely structural: one node per non-empty line, a
//! directed edge between consecutive nodes. No semantic validation, and no
//! cycles are possible.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One node of the flowchart: an index label and the step text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowchartNode {
    /// Zero-based node index.
    pub id: usize,
    /// The step text, taken verbatim from the workflow line.
    pub label: String,
}

/// A line-per-node directed chain built from workflow text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flowchart {
    nodes: Vec<FlowchartNode>,
    edges: Vec<(usize, usize)>,
}

impl Flowchart {
    /// Builds the chart from workflow text, one node per non-empty line.
    ///
    /// Blank lines are skipped; empty input yields an empty chart.
    #[must_use]
    pub fn from_workflow(workflow: &str) -> Self {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        for line in workflow.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let id = nodes.len();
            nodes.push(FlowchartNode {
                id,
                label: line.to_string(),
            });
            if id > 0 {
                edges.push((id - 1, id));
            }
        }

        Self { nodes, edges }
    }

    /// Returns the nodes in order.
    #[must_use]
    pub fn nodes(&self) -> &[FlowchartNode] {
        &self.nodes
    }

    /// Returns the directed edges in order.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the chart has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serializes to a Graphviz digraph description.
    ///
    /// The output is deterministic: node lines in index order, then edge
    /// lines in chain order.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph workflow {\n");
        for node in &self.nodes {
            let _ = writeln!(dot, "    {} [label={:?}];", node.id, node.label);
        }
        for (from, to) in &self.edges {
            let _ = writeln!(dot, "    {from} -> {to};");
        }
        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_three_steps_yield_three_nodes_two_edges() {
        let chart = Flowchart::from_workflow("Step 1\nStep 2\nStep 3");

        assert_eq!(chart.node_count(), 3);
        assert_eq!(chart.edges(), &[(0, 1), (1, 2)]);
        assert_eq!(chart.nodes()[0].label, "Step 1");
        assert_eq!(chart.nodes()[2].label, "Step 3");
    }

    #[test]
    fn test_empty_input_yields_empty_chart() {
        let chart = Flowchart::from_workflow("");
        assert!(chart.is_empty());
        assert_eq!(chart.edge_count(), 0);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let chart = Flowchart::from_workflow("Step 1\n\n   \nStep 2\n");
        assert_eq!(chart.node_count(), 2);
        assert_eq!(chart.edges(), &[(0, 1)]);
    }

    #[test]
    fn test_single_line_has_no_edges() {
        let chart = Flowchart::from_workflow("Only step");
        assert_eq!(chart.node_count(), 1);
        assert_eq!(chart.edge_count(), 0);
    }

    #[test]
    fn test_to_dot_shape() {
        let chart = Flowchart::from_workflow("First\nSecond");
        let dot = chart.to_dot();

        assert!(dot.starts_with("digraph workflow {\n"));
        assert!(dot.contains(r#"0 [label="First"];"#));
        assert!(dot.contains(r#"1 [label="Second"];"#));
        assert!(dot.contains("0 -> 1;"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_to_dot_escapes_quotes_in_labels() {
        let chart = Flowchart::from_workflow(r#"Say "hello""#);
        let dot = chart.to_dot();
        assert!(dot.contains(r#"label="Say \"hello\"""#));
    }

    #[test]
    fn test_to_dot_is_deterministic() {
        let chart = Flowchart::from_workflow("a\nb\nc");
        assert_eq!(chart.to_dot(), chart.to_dot());
    }
}
