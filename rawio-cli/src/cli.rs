use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "rawio-cli")]
#[clap(about = "Inspect and build tagged chunk containers", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
