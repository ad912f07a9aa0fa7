mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // Show domibubble info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("domibubble", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Analyze {
            path,
            entry,
            allow_unreachable,
            max_passes,
        } => commands::analyze::run(
            path,
            &commands::common::StageOptions {
                entry: entry.clone(),
                allow_unreachable: *allow_unreachable,
                max_passes: *max_passes,
                show_super_root: false,
            },
            &cli.global,
        ),
        Command::Acyclic { path, max_passes } => {
            commands::acyclic::run(path, *max_passes, &cli.global)
        }
        Command::Domtree {
            path,
            entry,
            allow_unreachable,
            show_super_root,
        } => commands::domtree::run(
            path,
            &commands::common::StageOptions {
                entry: entry.clone(),
                allow_unreachable: *allow_unreachable,
                max_passes: None,
                show_super_root: *show_super_root,
            },
            &cli.global,
        ),
        Command::Dot { path, stage, entry } => {
            commands::dot::run(path, *stage, entry.as_deref())
        }
    }
}
