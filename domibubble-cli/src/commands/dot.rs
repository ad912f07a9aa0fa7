use std::path::Path;

use anyhow::{anyhow, Context};
use domibubble::{
    analysis::CycleBreaker,
    pipeline::{render_acyclic, render_graph, DotObserver, Pipeline, PipelineConfig},
};

use crate::{app::Stage, commands::common::load_graph};

pub fn run(path: &Path, stage: Stage, entry: Option<&str>) -> anyhow::Result<()> {
    let graph = load_graph(path)?;
    let title = path.display().to_string();

    let text = match stage {
        Stage::Input => render_graph(&graph, &title),
        Stage::Acyclic => {
            let acyclic = CycleBreaker::new()
                .run(&graph)
                .with_context(|| format!("cycle breaking of {title} failed"))?;
            render_acyclic(&acyclic, &title)
        }
        Stage::Domtree => {
            let observer = DotObserver::new();
            let handle = observer.handle();
            let config = PipelineConfig {
                entry: entry.map(str::to_string),
                ..PipelineConfig::default()
            };

            Pipeline::new(config)
                .observe(Box::new(observer))
                .run(&graph)
                .with_context(|| format!("analysis of {title} failed"))?;

            handle
                .take()
                .map(|documents| documents.tree)
                .ok_or_else(|| anyhow!("no dominator tree was rendered"))?
        }
    };

    print!("{text}");
    Ok(())
}
