use std::path::PathBuf;

use anyhow::Result;
use er_route::config::load_network;
use er_route::contraction_hierarchies::{
    EdgeDifference,
    ShortcutBuilder,
};
use er_route::Shortcut;
use serde::Serialize;
use tracing::info;

#[derive(clap::Args)]
pub struct Args {
    #[arg(short, long, help = "network definition (YAML or JSON)")]
    pub network: PathBuf,

    #[arg(short, long, help = "stop after contracting this many nodes")]
    pub limit: Option<usize>,
}

/// Same shape as the `shortcuts` key of a network file, so the output can be pasted back in.
#[derive(Serialize)]
struct ShortcutList {
    shortcuts: Vec<Shortcut>,
}

pub fn cmd(args: &Args) -> Result<()> {
    let network = load_network(&args.network)?;
    let shortcuts = ShortcutBuilder::new(&network.snapshot(), EdgeDifference).build(args.limit);
    info!("built {} shortcuts", shortcuts.len());

    print!("{}", serde_yaml::to_string(&ShortcutList { shortcuts })?);
    Ok(())
}
