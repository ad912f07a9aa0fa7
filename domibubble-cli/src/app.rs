use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// domibubble - cycle breaking, dominator trees and bubbles for directed graphs
#[derive(Debug, Parser)]
#[command(name = "domibubble", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Pipeline stage rendered by the `dot` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    /// The graph as read from the file.
    Input,
    /// The graph after cycle breaking, reversed edges highlighted.
    Acyclic,
    /// The dominator tree, bubbles highlighted.
    Domtree,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: cycle breaking, dominator tree and bubbles.
    Analyze {
        /// Edge-list file: one `source target` pair per line, `#` starts a comment.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Root of the dominator tree (default: the in-degree-zero nodes).
        #[arg(long, value_name = "NODE")]
        entry: Option<String>,

        /// Exclude nodes unreachable from the root instead of failing.
        #[arg(long)]
        allow_unreachable: bool,

        /// Maximum number of cycle breaking passes (default: the edge count).
        #[arg(long, value_name = "N")]
        max_passes: Option<usize>,
    },

    /// Break cycles only and print the resulting edge list.
    Acyclic {
        /// Edge-list file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Maximum number of cycle breaking passes (default: the edge count).
        #[arg(long, value_name = "N")]
        max_passes: Option<usize>,
    },

    /// Print the dominator tree.
    Domtree {
        /// Edge-list file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Root of the dominator tree (default: the in-degree-zero nodes).
        #[arg(long, value_name = "NODE")]
        entry: Option<String>,

        /// Exclude nodes unreachable from the root instead of failing.
        #[arg(long)]
        allow_unreachable: bool,

        /// Include the synthetic super-root and its edges.
        #[arg(long)]
        show_super_root: bool,
    },

    /// Print Graphviz DOT text for one pipeline stage.
    Dot {
        /// Edge-list file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Stage to render.
        #[arg(long, value_enum)]
        stage: Stage,

        /// Root of the dominator tree (default: the in-degree-zero nodes).
        #[arg(long, value_name = "NODE")]
        entry: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_options() {
        let cli = Cli::parse_from([
            "domibubble",
            "--json",
            "analyze",
            "graph.txt",
            "--entry",
            "start",
            "--max-passes",
            "3",
        ]);

        assert!(cli.global.json);
        match cli.command {
            Command::Analyze {
                entry,
                allow_unreachable,
                max_passes,
                ..
            } => {
                assert_eq!(entry.as_deref(), Some("start"));
                assert!(!allow_unreachable);
                assert_eq!(max_passes, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_dot_stage() {
        let cli = Cli::parse_from(["domibubble", "dot", "graph.txt", "--stage", "domtree"]);
        assert!(matches!(
            cli.command,
            Command::Dot {
                stage: Stage::Domtree,
                ..
            }
        ));
    }
}
