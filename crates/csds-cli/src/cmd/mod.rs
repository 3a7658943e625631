use anyhow::Result;

use crate::args::{Cli, Command};

mod graph;
mod status;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Status(args) => status::run(&args).await,
        Command::Graph { input, out, no_open } => graph::run(&input, &out, !no_open).await,
    }
}
