use clap::Parser;
use easi_io::cli::{run, Cli};
use easi_io::env_config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_config::init_tracing(cli.verbose);

    run(cli)
}
