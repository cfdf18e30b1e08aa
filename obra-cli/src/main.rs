//! Obra CLI - Command line tool for construction progress curves.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "obra-cli",
    version,
    about = "Control de Obra progress-curve toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: obra_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    obra_cmd::run(cli.command)
}
