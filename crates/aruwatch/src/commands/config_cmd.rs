//! Config subcommand handlers.

use std::collections::HashMap;

use dialoguer::{Confirm, Input, Password};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Portal};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn empty_portal() -> Portal {
    Portal {
        url: String::new(),
        username: None,
        password: None,
        password_env: None,
        ca_cert: None,
        insecure: None,
        timeout: None,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("aruwatch — configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let portal_name: String = Input::new()
                .with_prompt("Portal name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let url: String = Input::new()
                .with_prompt("Portal URL")
                .default("http://10.0.0.5:5000".into())
                .interact_text()
                .map_err(prompt_err)?;

            let with_login = Confirm::new()
                .with_prompt("Configure a login? (read-only access works without one)")
                .default(true)
                .interact()
                .map_err(prompt_err)?;

            let (username, password) = if with_login {
                let user: String = Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .map_err(prompt_err)?;

                let pass = Password::new()
                    .with_prompt("Password (empty to use ARUWATCH_PASSWORD instead)")
                    .allow_empty_password(true)
                    .interact()
                    .map_err(prompt_err)?;

                if user.is_empty() {
                    return Err(CliError::Validation {
                        field: "username".into(),
                        reason: "username cannot be empty".into(),
                    });
                }

                let password_field = if pass.is_empty() {
                    eprintln!("   Password will be read from ARUWATCH_PASSWORD");
                    None
                } else {
                    Some(pass)
                };
                (Some(user), password_field)
            } else {
                (None, None)
            };

            let portal = Portal {
                url,
                username,
                password,
                password_env: None,
                ca_cert: None,
                insecure: None,
                timeout: None,
            };

            let mut portals = HashMap::new();
            portals.insert(portal_name.clone(), portal);

            let cfg = Config {
                default_portal: Some(portal_name.clone()),
                defaults: Defaults::default(),
                portals,
            };

            config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active portal: {portal_name}");
            eprintln!("\n  Test it: aruwatch clients list");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| format!("{c:#?}"),
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let portal_name = config::active_portal_name(global, &cfg);

            // Workspace-level default, not a portal field.
            if key == "network" {
                cfg.defaults.network = value;
                config::save_config(&cfg)?;
                eprintln!("Set default network to '{}'", cfg.defaults.network);
                return Ok(());
            }

            let portal = cfg
                .portals
                .entry(portal_name.clone())
                .or_insert_with(empty_portal);

            match key.as_str() {
                "url" => portal.url = value,
                "username" => portal.username = Some(value),
                "password" => portal.password = Some(value),
                "password_env" | "password-env" => portal.password_env = Some(value),
                "insecure" => {
                    portal.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                        field: "insecure".into(),
                        reason: "must be 'true' or 'false'".into(),
                    })?);
                }
                "timeout" => {
                    portal.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                        field: "timeout".into(),
                        reason: "must be a number (seconds)".into(),
                    })?);
                }
                "ca_cert" | "ca-cert" => portal.ca_cert = Some(value.into()),
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: url, username, \
                             password, password_env, insecure, timeout, ca_cert, network"
                        ),
                    });
                }
            }

            config::save_config(&cfg)?;
            eprintln!("Set {key} on portal '{portal_name}'");
            Ok(())
        }

        // ── Portals ─────────────────────────────────────────────────
        ConfigCommand::Portals => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_portal.as_deref().unwrap_or("default");
            if cfg.portals.is_empty() {
                eprintln!("No portals configured. Run: aruwatch config init");
            } else {
                for name in cfg.portals.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.portals.contains_key(&name) {
                let available: Vec<_> = cfg.portals.keys().cloned().collect();
                return Err(CliError::PortalNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_portal = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("Default portal set to '{name}'");
            Ok(())
        }
    }
}
