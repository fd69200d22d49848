//! CLI flag overrides layered over `ocikit-config` profiles.
//!
//! This is the single boundary where CLI flags and TOML profiles become
//! the SDK's `ClientConfig` and `WaiterConfig`.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use ocikit_api::{ClientConfig, Service, SharedSigner, TlsMode, TokenSigner};
use ocikit_config::{self as config, Config, Profile};
use ocikit_core::WaiterConfig;

use crate::cli::{GlobalOpts, WaitArgs};
use crate::error::CliError;

/// Active profile name and its settings, after CLI overrides.
pub struct Resolved {
    pub name: String,
    pub profile: Profile,
    pub defaults: config::Defaults,
}

/// Resolve the active profile from CLI flags and config.
///
/// A missing profile is only an error if it was asked for by name; otherwise
/// flags alone (`--region`, `--endpoint`) may describe the target.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = config::load_config_or_default();
    resolve_from(cfg, global)
}

pub fn resolve_from(mut cfg: Config, global: &GlobalOpts) -> Result<Resolved, CliError> {
    let name = cfg.profile_name(global.profile.as_deref()).to_owned();

    let mut profile = match cfg.profiles.remove(&name) {
        Some(profile) => profile,
        None if global.profile.is_some() => {
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
        None => Profile::default(),
    };

    // Flags win over the profile
    if let Some(ref region) = global.region {
        profile.region.clone_from(region);
    }
    if let Some(ref compartment) = global.compartment_id {
        profile.compartment_id = Some(compartment.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }

    if profile.region.is_empty() && global.endpoint.is_none() {
        return Err(CliError::NoConfig {
            path: config::config_path().display().to_string(),
        });
    }

    Ok(Resolved {
        name,
        profile,
        defaults: cfg.defaults,
    })
}

impl Resolved {
    /// Build a `ClientConfig` for `service`.
    pub fn client_config(&self, global: &GlobalOpts, service: Service) -> Result<ClientConfig, CliError> {
        let endpoint = match global.endpoint.as_deref() {
            Some(raw) => raw.parse::<url::Url>().map_err(|_| CliError::Validation {
                field: "endpoint".into(),
                reason: format!("invalid URL: {raw}"),
            })?,
            None => config::resolve_endpoint(&self.profile, service)?,
        };

        // --auth-token bypasses the profile's credential chain
        let signer: SharedSigner = match global.auth_token {
            Some(ref token) => Arc::new(TokenSigner::new(SecretString::from(token.clone()))),
            None => config::resolve_signer(&self.profile, &self.name)?,
        };

        let transport = config::transport_config(&self.profile, &self.defaults)?;
        if matches!(transport.tls, TlsMode::DangerAcceptInvalid) {
            tracing::warn!("TLS certificate verification is disabled");
        }

        Ok(ClientConfig::new(endpoint)
            .with_signer(signer)
            .with_retry_policy(config::retry_policy(&self.profile, &self.defaults))
            .with_transport(transport))
    }

    /// Compartment from flags or profile, required by list and create commands.
    pub fn compartment(&self) -> Result<&str, CliError> {
        self.profile
            .compartment_id
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CliError::Validation {
                field: "compartment-id".into(),
                reason: "pass --compartment-id or set compartment_id in the profile".into(),
            })
    }

    /// Waiter timing from the profile, overridden by wait flags.
    pub fn waiter_config(&self, wait: &WaitArgs) -> WaiterConfig {
        let mut waiter = config::profile_to_waiter_config(&self.profile, &self.defaults);
        if let Some(secs) = wait.max_wait_seconds {
            waiter = waiter.with_max_wait(Duration::from_secs(secs));
        }
        if let Some(secs) = wait.wait_interval_seconds {
            let interval = Duration::from_secs(secs.max(1));
            waiter = waiter
                .with_max_interval(interval)
                .with_initial_interval(waiter.initial_interval.min(interval));
        }
        waiter
    }
}
