use std::path::PathBuf;

use anyhow::{
    bail,
    Result,
};
use er_route::config::load_network;
use er_route::utils::{
    network_to_dot,
    write_dot_file,
};
use tracing::info;

use crate::road::{
    apply_closures,
    parse_road,
};

#[derive(clap::Args)]
pub struct Args {
    #[arg(short, long, help = "network definition (YAML or JSON)")]
    pub network: PathBuf,

    #[arg(long, value_parser = parse_road, help = "close a road before rendering (FROM:TO, repeatable)")]
    pub close: Vec<(String, String)>,

    #[arg(long, default_value_t = 0, help = "close up to N fire-risk roads before rendering")]
    pub fire: usize,

    #[arg(short, long, help = "write the DOT file here instead of stdout")]
    pub output: Option<PathBuf>,
}

pub fn cmd(args: &Args) -> Result<()> {
    let mut network = load_network(&args.network)?;
    apply_closures(&mut network, &args.close, args.fire)?;
    let dot = network_to_dot(&network);

    let Some(output) = &args.output else {
        print!("{dot}");
        return Ok(());
    };
    let Some(filename) = output.file_name().and_then(|name| name.to_str()) else {
        bail!("{} is not a file path", output.display());
    };
    let dir = output.parent().map(PathBuf::from).unwrap_or_default();

    let path = write_dot_file(&dir, filename, &dot)?;
    info!("DOT graph written to {}", path.display());
    Ok(())
}
