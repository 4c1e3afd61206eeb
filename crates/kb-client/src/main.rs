#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Context as _;
use clap::Parser;
use kb_client::{cli::Cli, configuration::get_configuration, AppShell};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = kb_client::tracing::init(&cli) {
        eprintln!("Failed to start tracing: {e}");
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("unable to create runtime")?;

    rt.block_on(async {
        let configuration = get_configuration(&cli.config_dir)?;
        let shell = AppShell::new(&configuration)?;
        let outcome = shell.run(cli.command).await;
        for notification in shell.drain_notifications() {
            eprintln!("[{}] {}", notification.level, notification.message);
        }
        println!("{}", outcome?);
        Ok(())
    })
}
