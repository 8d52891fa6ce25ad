//! Config subcommand handlers.

use dialoguer::Password;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, KEYRING_SERVICE};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(ref url) = p.url {
            let _ = writeln!(out, "url = \"{url}\"");
        }
        if p.api_key.is_some() {
            let _ = writeln!(out, "api_key = \"****\"");
        }
        if let Some(ref env) = p.api_key_env {
            let _ = writeln!(out, "api_key_env = \"{env}\"");
        }
        if p.access_token.is_some() {
            let _ = writeln!(out, "access_token = \"****\"");
        }
        if let Some(ref user) = p.user {
            let _ = writeln!(out, "user = \"{user}\"");
        }
        if let Some(ref seed) = p.seed {
            let _ = writeln!(out, "seed = \"{}\"", seed.display());
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = match global.output {
                OutputFormat::Json | OutputFormat::JsonCompact => {
                    output::render_json_pretty(&redacted(cfg))
                }
                OutputFormat::Yaml => output::render_yaml(&redacted(cfg)),
                _ => format_config_redacted(&cfg),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            let out = names
                .iter()
                .map(|n| {
                    if *n == active {
                        format!("* {n}")
                    } else {
                        format!("  {n}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
                names.sort();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: names.join(", "),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetKey { key } => {
            let cfg = config::load_config_or_default();
            let profile = config::active_profile_name(global, &cfg);
            let key = match key {
                Some(k) => k,
                None => Password::new()
                    .with_prompt(format!("API key for profile '{profile}'"))
                    .interact()
                    .map_err(prompt_err)?,
            };
            if key.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "cannot be empty".into(),
                });
            }

            let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile}/api-key"))
                .map_err(|e| CliError::Config {
                    message: format!("keyring unavailable: {e}"),
                })?;
            entry.set_password(key.trim()).map_err(|e| CliError::Config {
                message: format!("failed to store key: {e}"),
            })?;
            if !global.quiet {
                eprintln!("API key stored in system keyring for profile '{profile}'");
            }
            Ok(())
        }
    }
}

/// The config with plaintext secrets masked, for structured output.
fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some("****".into());
        }
        if profile.access_token.is_some() {
            profile.access_token = Some("****".into());
        }
    }
    cfg
}
