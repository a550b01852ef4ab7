//! Entra monitoring agent - main entry point

use clap::Parser;
use log::debug;

use entra_agent::{collector, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout is reserved for agent sections
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    debug!(
        "Starting agent_ms_entra v{} for tenant {} ({} services)",
        env!("CARGO_PKG_VERSION"),
        cli.tenant_id,
        cli.services_to_monitor.len()
    );

    let mut stdout = std::io::stdout();
    if let Err(e) = collector::run(&cli, &mut stdout).await {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
