use std::path::Path;

use anyhow::Context;
use domibubble::pipeline::{Pipeline, PipelineReport};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{load_graph, node_label, root_label, EdgeOutput, StageOptions},
    output::{print_output, print_section, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct DomtreeOutput {
    root: String,
    super_root: bool,
    entries: Vec<String>,
    edges: Vec<EdgeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unreachable: Vec<String>,
}

impl DomtreeOutput {
    fn from_report(report: &PipelineReport<String>) -> Self {
        let acyclic = report.acyclic();
        let tree = report.tree();
        let label = |node| node_label(acyclic, tree, node);

        Self {
            root: root_label(report),
            super_root: tree.super_root().is_some(),
            entries: tree.entries().iter().map(|&entry| label(entry)).collect(),
            edges: report
                .tree_edges()
                .into_iter()
                .map(|(parent, child)| EdgeOutput::new(label(parent), label(child)))
                .collect(),
            unreachable: report.unreachable_keys(),
        }
    }
}

pub fn run(path: &Path, options: &StageOptions, opts: &GlobalOptions) -> anyhow::Result<()> {
    let graph = load_graph(path)?;

    let report = Pipeline::new(options.pipeline_config())
        .run(&graph)
        .with_context(|| format!("dominator tree construction for {} failed", path.display()))?;

    print_output(&DomtreeOutput::from_report(&report), opts, |output| {
        println!("Root:            {}", output.root);
        println!("Entries:         {}", output.entries.join(" "));

        let mut edges =
            TabWriter::new(vec![("Idom", Align::Left), ("Node", Align::Left)]).indent("  ");
        for edge in &output.edges {
            edges.row(vec![edge.source.clone(), edge.target.clone()]);
        }
        print_section("Tree edges", &edges, "(none)");

        if !output.unreachable.is_empty() {
            println!("\nUnreachable:     {}", output.unreachable.join(" "));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::{parse_edge_list, SUPER_ROOT_LABEL};

    fn output(text: &str, options: &StageOptions) -> DomtreeOutput {
        let graph = parse_edge_list(text).unwrap();
        let report = Pipeline::new(options.pipeline_config()).run(&graph).unwrap();
        DomtreeOutput::from_report(&report)
    }

    fn pairs(edges: &[EdgeOutput]) -> Vec<(&str, &str)> {
        edges
            .iter()
            .map(|edge| (edge.source.as_str(), edge.target.as_str()))
            .collect()
    }

    #[test]
    fn test_single_entry_root() {
        let out = output("a b\na c\nb d\nc d\n", &StageOptions::default());

        assert_eq!(out.root, "a");
        assert!(!out.super_root);
        assert_eq!(out.entries, vec!["a"]);
        assert_eq!(pairs(&out.edges), vec![("a", "b"), ("a", "c"), ("a", "d")]);
    }

    #[test]
    fn test_multiple_entries_hide_super_root() {
        let out = output("a c\nb c\nc d\n", &StageOptions::default());

        assert_eq!(out.root, "a b");
        assert!(out.super_root);
        assert_eq!(out.entries, vec!["a", "b"]);
        assert_eq!(pairs(&out.edges), vec![("c", "d")]);
    }

    #[test]
    fn test_show_super_root() {
        let options = StageOptions {
            show_super_root: true,
            ..StageOptions::default()
        };
        let out = output("a c\nb c\nc d\n", &options);

        assert_eq!(out.root, SUPER_ROOT_LABEL);
        assert_eq!(out.entries, vec!["a", "b"]);
        assert_eq!(
            pairs(&out.edges),
            vec![
                (SUPER_ROOT_LABEL, "a"),
                (SUPER_ROOT_LABEL, "b"),
                (SUPER_ROOT_LABEL, "c"),
                ("c", "d"),
            ]
        );
    }

    #[test]
    fn test_unreachable_listed_when_allowed() {
        let options = StageOptions {
            entry: Some("a".to_string()),
            allow_unreachable: true,
            ..StageOptions::default()
        };
        let out = output("a b\nlonely\n", &options);

        assert_eq!(out.root, "a");
        assert_eq!(out.unreachable, vec!["lonely"]);
    }
}
