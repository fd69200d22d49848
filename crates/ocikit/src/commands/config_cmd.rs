//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use ocikit_config::{self as config, AuthMode, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the plaintext token.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "retry_max_attempts = {}", cfg.defaults.retry_max_attempts);
    let _ = writeln!(
        out,
        "wait = {{ max_wait_seconds = {}, max_interval_seconds = {} }}",
        cfg.defaults.wait.max_wait_seconds, cfg.defaults.wait.max_interval_seconds
    );

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "region = \"{}\"", p.region);
        if let Some(ref domain) = p.realm_domain {
            let _ = writeln!(out, "realm_domain = \"{domain}\"");
        }
        if let Some(ref compartment) = p.compartment_id {
            let _ = writeln!(out, "compartment_id = \"{compartment}\"");
        }
        let auth = match p.auth {
            AuthMode::Token => "token",
            AuthMode::None => "none",
        };
        let _ = writeln!(out, "auth = \"{auth}\"");
        if p.auth_token.is_some() {
            let _ = writeln!(out, "auth_token = \"****\"");
        }
        if let Some(ref env) = p.auth_token_env {
            let _ = writeln!(out, "auth_token_env = \"{env}\"");
        }
        if let Some(ref lb) = p.endpoints.load_balancer {
            let _ = writeln!(out, "endpoints.load_balancer = \"{lb}\"");
        }
        if let Some(ref rm) = p.endpoints.resource_manager {
            let _ = writeln!(out, "endpoints.resource_manager = \"{rm}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(ref proxy) = p.proxy {
            let _ = writeln!(out, "proxy = \"{proxy}\"");
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

fn prompt_token() -> Result<String, CliError> {
    let token = rpassword::prompt_password("Auth token: ").map_err(prompt_err)?;
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "auth_token".into(),
            reason: "auth token cannot be empty".into(),
        });
    }
    Ok(token)
}

/// Offer to store the token in the system keyring or return it for plaintext config.
///
/// Returns `Some(token)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_token_storage(profile_name: &str, token: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the auth token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_token(profile_name, &token)?;
        eprintln!("   ✓ Auth token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token))
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("ocikit configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let region: String = Input::new()
                .with_prompt("Region")
                .default("us-phoenix-1".into())
                .interact_text()
                .map_err(prompt_err)?;

            let compartment: String = Input::new()
                .with_prompt("Default compartment OCID (optional)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let auth_choices = &["Auth token", "None (unsigned requests)"];
            let auth_selection = Select::new()
                .with_prompt("Authentication method")
                .items(auth_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let (auth, auth_token) = if auth_selection == 0 {
                let token = prompt_token()?;
                (AuthMode::Token, prompt_token_storage(&profile_name, token)?)
            } else {
                (AuthMode::None, None)
            };

            let profile = Profile {
                region: region.trim().to_owned(),
                compartment_id: optional(&compartment),
                auth,
                auth_token,
                ..Profile::default()
            };

            // Keep other profiles when re-running the wizard
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: ocikit lb list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            // Structured output must not leak the token either
            for profile in cfg.profiles.values_mut() {
                if profile.auth_token.is_some() {
                    profile.auth_token = Some("****".into());
                }
            }
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.profile_name(None);
            if cfg.profiles.is_empty() {
                output::notice("No profiles configured. Run: ocikit config init", global.quiet);
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                let listing = names
                    .into_iter()
                    .map(|name| {
                        let marker = if name == default { " *" } else { "" };
                        format!("{name}{marker}")
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                output::print_output(&listing, global.quiet);
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::notice(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        // ── Set-token ───────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let name = cfg
                .profile_name(profile.as_deref().or(global.profile.as_deref()))
                .to_owned();
            let token = prompt_token()?;
            config::store_token(&name, &token)?;
            output::notice(
                &format!("✓ Auth token for profile '{name}' stored in system keyring"),
                global.quiet,
            );
            Ok(())
        }
    }
}
