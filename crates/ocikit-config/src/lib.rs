//! Shared configuration for the ocikit CLI and library consumers.
//!
//! TOML profiles, auth token resolution (env + keyring + plaintext),
//! and translation to `ocikit_api::ClientConfig` and
//! `ocikit_core::WaiterConfig`. The CLI layers its flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use ocikit_api::{
    ClientConfig, ExponentialBackoff, NoRetry, NoopSigner, Region, Service, SharedRetryPolicy,
    SharedSigner, TlsMode, TokenSigner, TransportConfig,
};
use ocikit_core::WaiterConfig;

/// Keyring service name under which tokens are stored.
pub const KEYRING_SERVICE: &str = "ocikit";

/// Prefix of environment variables merged over the config file.
pub const ENV_PREFIX: &str = "OCIKIT_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no auth token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the active profile: `requested`, else the configured default.
    pub fn profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Attempts per request, including the first. `1` disables retries.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    #[serde(default)]
    pub wait: WaitDefaults,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            retry_max_attempts: default_retry_max_attempts(),
            wait: WaitDefaults::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    60
}
fn default_retry_max_attempts() -> u32 {
    8
}

/// Waiter settings, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WaitDefaults {
    #[serde(default = "default_max_wait")]
    pub max_wait_seconds: u64,

    #[serde(default = "default_wait_interval")]
    pub max_interval_seconds: u64,
}

impl Default for WaitDefaults {
    fn default() -> Self {
        Self {
            max_wait_seconds: default_max_wait(),
            max_interval_seconds: default_wait_interval(),
        }
    }
}

fn default_max_wait() -> u64 {
    1200
}
fn default_wait_interval() -> u64 {
    30
}

/// How requests of a profile are authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Bearer token resolved from env, keyring, or the config file.
    #[default]
    Token,
    /// Send requests unsigned (authenticating proxies, local mocks).
    None,
}

/// A named profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Region identifier (e.g., "us-ashburn-1").
    pub region: String,

    /// Realm domain override for non-commercial realms.
    pub realm_domain: Option<String>,

    /// Default compartment OCID for list and create commands.
    pub compartment_id: Option<String>,

    #[serde(default)]
    pub auth: AuthMode,

    /// Auth token (plaintext; prefer keyring or env var).
    pub auth_token: Option<String>,

    /// Environment variable name containing the auth token.
    pub auth_token_env: Option<String>,

    /// Full endpoint overrides, bypassing region resolution.
    #[serde(default)]
    pub endpoints: EndpointOverrides,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    pub proxy: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override retry attempts.
    pub retry_max_attempts: Option<u32>,

    /// Override waiter settings.
    pub wait: Option<WaitDefaults>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointOverrides {
    pub load_balancer: Option<String>,
    pub resource_manager: Option<String>,
}

impl EndpointOverrides {
    fn get(&self, service: Service) -> Option<&str> {
        match service {
            Service::LoadBalancer => self.load_balancer.as_deref(),
            Service::ResourceManager => self.resource_manager.as_deref(),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "ocikit", "ocikit").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ocikit");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment.
///
/// Nested keys in the environment are separated by a double underscore:
/// `OCIKIT_PROFILES__PROD__REGION=eu-frankfurt-1`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/auth-token"))
}

/// Resolve a profile's auth token: env var, then keyring, then plaintext.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's auth_token_env → env var lookup
    if let Some(ref env_name) = profile.auth_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.auth_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's auth token in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    Ok(())
}

/// Build the request signer for a profile.
pub fn resolve_signer(profile: &Profile, profile_name: &str) -> Result<SharedSigner, ConfigError> {
    match profile.auth {
        AuthMode::None => Ok(Arc::new(NoopSigner)),
        AuthMode::Token => Ok(Arc::new(TokenSigner::new(resolve_token(
            profile,
            profile_name,
        )?))),
    }
}

// ── Translation ─────────────────────────────────────────────────────

/// Endpoint of `service` for a profile: explicit override, else resolved
/// from region and realm domain.
pub fn resolve_endpoint(profile: &Profile, service: Service) -> Result<Url, ConfigError> {
    if let Some(raw) = profile.endpoints.get(service) {
        return raw.parse().map_err(|_| ConfigError::Validation {
            field: "endpoints".into(),
            reason: format!("invalid URL: {raw}"),
        });
    }

    let mut region = Region::new(profile.region.as_str());
    if let Some(ref domain) = profile.realm_domain {
        region = region.with_realm_domain(domain.as_str());
    }
    region.endpoint(service).map_err(|e| ConfigError::Validation {
        field: "region".into(),
        reason: e.to_string(),
    })
}

/// Transport settings for a profile.
pub fn transport_config(profile: &Profile, defaults: &Defaults) -> Result<TransportConfig, ConfigError> {
    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let proxy = profile
        .proxy
        .as_deref()
        .map(|raw| {
            raw.parse::<Url>().map_err(|_| ConfigError::Validation {
                field: "proxy".into(),
                reason: format!("invalid URL: {raw}"),
            })
        })
        .transpose()?;

    Ok(TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        proxy,
        ..TransportConfig::default()
    })
}

/// Retry policy for a profile. One attempt means no retries.
pub fn retry_policy(profile: &Profile, defaults: &Defaults) -> SharedRetryPolicy {
    let attempts = profile
        .retry_max_attempts
        .unwrap_or(defaults.retry_max_attempts);
    if attempts <= 1 {
        Arc::new(NoRetry)
    } else {
        Arc::new(ExponentialBackoff::default().with_max_attempts(attempts))
    }
}

/// Build a `ClientConfig` for `service` from a profile, no CLI overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    service: Service,
) -> Result<ClientConfig, ConfigError> {
    let endpoint = resolve_endpoint(profile, service)?;
    let signer = resolve_signer(profile, profile_name)?;
    let transport = transport_config(profile, defaults)?;

    Ok(ClientConfig::new(endpoint)
        .with_signer(signer)
        .with_retry_policy(retry_policy(profile, defaults))
        .with_transport(transport))
}

/// Waiter settings for a profile.
pub fn profile_to_waiter_config(profile: &Profile, defaults: &Defaults) -> WaiterConfig {
    let wait = profile.wait.unwrap_or(defaults.wait);
    WaiterConfig::default()
        .with_max_wait(Duration::from_secs(wait.max_wait_seconds))
        .with_max_interval(Duration::from_secs(wait.max_interval_seconds))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"
default_profile = "prod"

[defaults]
output = "json"
retry_max_attempts = 3

[defaults.wait]
max_wait_seconds = 600

[profiles.prod]
region = "us-ashburn-1"
compartment_id = "ocid1.compartment.oc1..prod"
auth_token = "plain-token"

[profiles.gov]
region = "us-langley-1"
realm_domain = "oraclegovcloud.com"
auth = "none"
timeout = 5

[profiles.local]
region = "us-ashburn-1"
auth = "none"
retry_max_attempts = 1

[profiles.local.endpoints]
load_balancer = "http://127.0.0.1:8080"

[profiles.local.wait]
max_wait_seconds = 30
max_interval_seconds = 2
"#;

    fn sample() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let cfg = sample();
        assert_eq!(cfg.profile_name(None), "prod");
        assert_eq!(cfg.profile_name(Some("gov")), "gov");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.retry_max_attempts, 3);
        assert_eq!(cfg.defaults.timeout, 60);
        assert_eq!(cfg.defaults.wait.max_wait_seconds, 600);
        assert_eq!(cfg.defaults.wait.max_interval_seconds, 30);
        assert_eq!(cfg.profiles.len(), 3);
        assert_eq!(cfg.profile("gov").unwrap().auth, AuthMode::None);
        assert!(matches!(
            cfg.profile("staging"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.output, "table");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.prod\nregion = ").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Figment(_))
        ));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                region: "eu-frankfurt-1".into(),
                compartment_id: Some("ocid1.compartment".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.region, "eu-frankfurt-1");
        assert_eq!(profile.compartment_id.as_deref(), Some("ocid1.compartment"));
    }

    #[test]
    fn endpoint_from_region_realm_or_override() {
        let cfg = sample();
        assert_eq!(
            resolve_endpoint(cfg.profile("prod").unwrap(), Service::ResourceManager)
                .unwrap()
                .as_str(),
            "https://resourcemanager.us-ashburn-1.oraclecloud.com/"
        );
        assert_eq!(
            resolve_endpoint(cfg.profile("gov").unwrap(), Service::LoadBalancer)
                .unwrap()
                .as_str(),
            "https://iaas.us-langley-1.oraclegovcloud.com/"
        );
        let local = cfg.profile("local").unwrap();
        assert_eq!(
            resolve_endpoint(local, Service::LoadBalancer)
                .unwrap()
                .as_str(),
            "http://127.0.0.1:8080/"
        );
        // Only the load balancer endpoint is overridden.
        assert_eq!(
            resolve_endpoint(local, Service::ResourceManager)
                .unwrap()
                .host_str(),
            Some("resourcemanager.us-ashburn-1.oraclecloud.com")
        );
    }

    #[test]
    fn blank_region_is_rejected() {
        let profile = Profile::default();
        assert!(matches!(
            resolve_endpoint(&profile, Service::LoadBalancer),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn token_env_var_wins_over_plaintext() {
        // PATH is always set.
        let profile = Profile {
            region: "us-ashburn-1".into(),
            auth_token_env: Some("PATH".into()),
            auth_token: Some("plain-token".into()),
            ..Profile::default()
        };
        let token = resolve_token(&profile, "ocikit-test-env").unwrap();
        assert_eq!(
            token.expose_secret(),
            std::env::var("PATH").unwrap().as_str()
        );
    }

    #[test]
    fn token_falls_back_to_plaintext() {
        let profile = Profile {
            region: "us-ashburn-1".into(),
            auth_token_env: Some("OCIKIT_TEST_TOKEN_THAT_IS_NEVER_SET".into()),
            auth_token: Some("plain-token".into()),
            ..Profile::default()
        };
        let token = resolve_token(&profile, "ocikit-test-plaintext").unwrap();
        assert_eq!(token.expose_secret(), "plain-token");
    }

    #[test]
    fn token_mode_without_token_fails() {
        let profile = Profile {
            region: "us-ashburn-1".into(),
            ..Profile::default()
        };
        let err = profile_to_client_config(
            &profile,
            "ocikit-test-missing",
            &Defaults::default(),
            Service::LoadBalancer,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
    }

    #[test]
    fn client_config_applies_profile_overrides() {
        let cfg = sample();
        let gov = cfg.profile("gov").unwrap();
        let client = profile_to_client_config(gov, "gov", &cfg.defaults, Service::LoadBalancer)
            .unwrap();
        assert_eq!(client.endpoint.host_str(), Some("iaas.us-langley-1.oraclegovcloud.com"));
        assert_eq!(client.transport.timeout, Duration::from_secs(5));
        assert!(matches!(client.transport.tls, TlsMode::System));
    }

    #[test]
    fn invalid_proxy_is_rejected() {
        let profile = Profile {
            proxy: Some("not a url".into()),
            ..Profile::default()
        };
        assert!(matches!(
            transport_config(&profile, &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn waiter_config_prefers_profile() {
        let cfg = sample();
        let local = profile_to_waiter_config(cfg.profile("local").unwrap(), &cfg.defaults);
        assert_eq!(local.max_wait, Duration::from_secs(30));
        assert_eq!(local.max_interval, Duration::from_secs(2));

        let prod = profile_to_waiter_config(cfg.profile("prod").unwrap(), &cfg.defaults);
        assert_eq!(prod.max_wait, Duration::from_secs(600));
        assert_eq!(prod.max_interval, Duration::from_secs(30));
        assert_eq!(prod.initial_interval, Duration::from_secs(1));
    }
}
