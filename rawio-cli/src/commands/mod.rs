use clap::Subcommand;

use crate::AppError;

mod chunks;
mod pack;
mod scan;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Chunks(chunks::Chunks),
    Scan(scan::Scan),
    Pack(pack::Pack),
}

impl Commands {
    pub fn run(&self) -> Result<(), AppError> {
        match self {
            Commands::Chunks(chunks) => chunks.run(),
            Commands::Scan(scan) => scan.run(),
            Commands::Pack(pack) => pack.run(),
        }
    }
}
