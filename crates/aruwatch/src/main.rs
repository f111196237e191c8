mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use aruwatch_core::{Monitor, Role, SessionGate};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a portal connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "aruwatch", &mut std::io::stdout());
            Ok(())
        }

        // Networks listing is static reference data
        Command::Networks => commands::networks::handle(&cli.global),

        // Client commands require a portal connection
        Command::Clients(args) => {
            // The watch interval lands in the monitor config, so it has
            // to be known before the monitor is built.
            let interval = match &args.command {
                cli::ClientsCommand::Watch { interval, .. } => *interval,
                _ => None,
            };
            let (monitor, cfg) = build_monitor(&cli.global, interval).await?;
            let network = config::resolve_network(&cli.global, &cfg)?;
            tracing::debug!(role = ?monitor.gate().role(), "portal session established");
            commands::clients::handle(&monitor, network, args, &cli.global).await
        }
    }
}

/// Build a connected [`Monitor`] from the config file, portal entry, and
/// CLI overrides. Logs in when credentials are available; otherwise the
/// session is read-only.
async fn build_monitor(
    global: &cli::GlobalOpts,
    interval_override: Option<u64>,
) -> Result<(Monitor, config::Config), CliError> {
    let cfg = config::load_config_or_default();
    let portal_name = config::active_portal_name(global, &cfg);
    let portal = cfg.portals.get(&portal_name);

    let mut monitor_cfg = match portal {
        Some(p) => config::resolve_portal(p, global)?,
        None => config::config_from_flags(global)?,
    };
    let interval = interval_override.unwrap_or(cfg.defaults.poll_interval);
    monitor_cfg.poll_interval = std::time::Duration::from_secs(interval);

    let client = aruwatch_core::PortalClient::new(
        monitor_cfg.portal_url.clone(),
        &monitor_cfg.transport,
    )
    .map_err(aruwatch_core::CoreError::from)?;

    let gate = match config::resolve_credentials_with_flags(portal, &portal_name, global)? {
        Some((username, password)) => {
            let login = client
                .login(&username, &password)
                .await
                .map_err(aruwatch_core::CoreError::from)?;
            SessionGate::new(Role::from_portal(&login.role))
        }
        None => SessionGate::observer(),
    };

    Ok((Monitor::with_client(client, monitor_cfg, gate), cfg))
}
