use clap::Parser;

mod cli;
mod commands;
mod error;

pub use error::AppError;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = cli::Cli::parse();
    args.command.run()?;

    Ok(())
}
