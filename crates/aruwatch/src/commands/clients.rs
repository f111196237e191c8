//! Client command handlers.

use std::sync::Arc;

use chrono::Utc;
use owo_colors::OwoColorize;
use tabled::Tabled;

use aruwatch_core::{ClientSession, DataState, Monitor, NetworkProfile};

use crate::cli::{ClientsArgs, ClientsCommand, GlobalOpts, ViewArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Floor")]
    floor: String,
    #[tabled(rename = "Connected")]
    connected: String,
    #[tabled(rename = "Whitelist")]
    whitelist: &'static str,
}

impl From<&Arc<ClientSession>> for ClientRow {
    fn from(s: &Arc<ClientSession>) -> Self {
        Self {
            hostname: s.hostname.clone(),
            ip: s.ip.clone(),
            band: s.band.clone().unwrap_or_default(),
            ssid: s.ssid_display().unwrap_or_default().to_string(),
            floor: s.floor().map_or_else(String::new, |f| f.to_string()),
            connected: s
                .connected_at(Utc::now())
                .map_or_else(String::new, |t| t.format("%Y-%m-%d %H:%M").to_string()),
            whitelist: s.health.sentinel(),
        }
    }
}

fn render_view(view: &[Arc<ClientSession>], global: &GlobalOpts) -> String {
    output::render_list(&global.output, view, |s| ClientRow::from(s), |s| s.ip.clone())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    monitor: &Monitor,
    network: NetworkProfile,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List(view_args) => list(monitor, network, &view_args, global).await,

        ClientsCommand::Watch { view, .. } => watch(monitor, network, &view, global).await,

        ClientsCommand::Rename { ip, hostname } => {
            monitor.refresh(network).await?;
            util::require_client(monitor, &ip)?;
            let status = monitor.rename_hostname(&ip, &hostname).await?;
            util::require_applied(status, "clients rename")?;
            if !global.quiet {
                eprintln!("Hostname for {ip} set to '{}'", hostname.trim());
            }
            Ok(())
        }

        ClientsCommand::Whitelist { ip } => {
            monitor.refresh(network).await?;
            util::require_client(monitor, &ip)?;
            if !util::confirm(&format!("Add {ip} to the whitelist?"), global.yes)? {
                return Ok(());
            }
            let status = monitor.set_whitelist(&ip, true).await?;
            util::require_applied(status, "clients whitelist")?;
            if !global.quiet {
                eprintln!("{ip} added to whitelist");
            }
            Ok(())
        }

        ClientsCommand::Unwhitelist { ip } => {
            monitor.refresh(network).await?;
            util::require_client(monitor, &ip)?;
            if !util::confirm(&format!("Remove {ip} from the whitelist?"), global.yes)? {
                return Ok(());
            }
            let status = monitor.set_whitelist(&ip, false).await?;
            util::require_applied(status, "clients unwhitelist")?;
            if !global.quiet {
                eprintln!("{ip} removed from whitelist");
            }
            Ok(())
        }
    }
}

// ── List (one-shot) ─────────────────────────────────────────────────

async fn list(
    monitor: &Monitor,
    network: NetworkProfile,
    view_args: &ViewArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let count = monitor.refresh(network).await?;
    if count == 0 {
        if !global.quiet {
            eprintln!("No clients on {}", network.label());
        }
        return Ok(());
    }

    let snapshot = monitor.snapshot();
    let view = aruwatch_core::view::apply(
        &snapshot,
        view_args.filter.as_deref().unwrap_or(""),
        view_args.sort_config(),
    );
    output::print_output(&render_view(&view, global), global.quiet);
    Ok(())
}

// ── Watch (continuous) ──────────────────────────────────────────────

/// Poll the feed and reprint the filtered/sorted table on every change
/// until Ctrl-C.
async fn watch(
    monitor: &Monitor,
    network: NetworkProfile,
    view_args: &ViewArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let term = view_args.filter.clone().unwrap_or_default();
    let sort = view_args.sort_config();
    let color = output::should_color(&global.color);

    monitor.start(network).await;
    let mut stream = monitor.subscribe();
    let mut state = monitor.data_state();

    if !global.quiet {
        eprintln!("Watching {} (Ctrl-C to stop)", network.label());
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,

            changed = stream.changed() => {
                let Some(snapshot) = changed else { break };
                let view = aruwatch_core::view::apply(&snapshot, &term, sort);
                if !global.quiet {
                    let stamp = Utc::now().format("%H:%M:%S");
                    if color {
                        eprintln!("{} {} clients", stamp.to_string().dimmed(), view.len());
                    } else {
                        eprintln!("{stamp} {} clients", view.len());
                    }
                }
                output::print_output(&render_view(&view, global), global.quiet);
            }

            result = state.changed() => {
                if result.is_err() {
                    break;
                }
                let current = *state.borrow_and_update();
                if current == DataState::NoData && !global.quiet {
                    eprintln!("Portal returned no clients; retrying");
                }
            }
        }
    }

    monitor.shutdown().await;
    Ok(())
}
