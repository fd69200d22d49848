// Region → service endpoint resolution.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

/// Default second-level domain of the commercial realm.
pub const DEFAULT_REALM_DOMAIN: &str = "oraclecloud.com";

/// The services this SDK talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    LoadBalancer,
    ResourceManager,
}

impl Service {
    /// Host prefix in `https://<prefix>.<region>.<realm domain>`.
    pub fn host_prefix(self) -> &'static str {
        match self {
            Self::LoadBalancer => "iaas",
            Self::ResourceManager => "resourcemanager",
        }
    }

    /// API version path segment.
    pub fn api_version(self) -> &'static str {
        match self {
            Self::LoadBalancer => "20170115",
            Self::ResourceManager => "20180917",
        }
    }
}

/// A region identifier such as `us-ashburn-1`, plus its realm domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    id: String,
    realm_domain: String,
}

impl Region {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into().trim().to_ascii_lowercase(),
            realm_domain: DEFAULT_REALM_DOMAIN.into(),
        }
    }

    /// Use a different realm's domain (e.g. government or sovereign realms).
    pub fn with_realm_domain(mut self, domain: impl Into<String>) -> Self {
        self.realm_domain = domain.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn realm_domain(&self) -> &str {
        &self.realm_domain
    }

    /// The HTTPS endpoint of `service` in this region.
    pub fn endpoint(&self, service: Service) -> Result<Url, Error> {
        if self.id.is_empty() {
            return Err(Error::MissingParameter {
                operation: "resolve_endpoint",
                parameter: "region",
            });
        }
        let raw = format!(
            "https://{}.{}.{}",
            service.host_prefix(),
            self.id,
            self.realm_domain
        );
        Ok(Url::parse(&raw)?)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
