use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Signs an outgoing request just before it is sent.
///
/// Called once per attempt, so a retried request is signed again with a
/// fresh date. Implementations must not perform I/O.
pub trait RequestSigner: Send + Sync + fmt::Debug {
    fn sign(&self, request: &mut reqwest::Request) -> Result<(), Error>;
}

/// Shared handle to a signer, cloned into every client.
pub type SharedSigner = Arc<dyn RequestSigner>;

/// Leaves requests untouched.
///
/// For endpoints fronted by an authenticating proxy, and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSigner;

impl RequestSigner for NoopSigner {
    fn sign(&self, _request: &mut reqwest::Request) -> Result<(), Error> {
        Ok(())
    }
}

/// Attaches a session or delegation token as `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct TokenSigner {
    token: SecretString,
}

impl TokenSigner {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl RequestSigner for TokenSigner {
    fn sign(&self, request: &mut reqwest::Request) -> Result<(), Error> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
            .map_err(|e| Error::Signing {
                message: format!("invalid token header value: {e}"),
            })?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> reqwest::Request {
        reqwest::Request::new(
            reqwest::Method::GET,
            "https://iaas.us-ashburn-1.oraclecloud.com/20170115/loadBalancers"
                .parse()
                .unwrap(),
        )
    }

    #[test]
    fn token_signer_sets_bearer_header() {
        let signer = TokenSigner::new("s3cret".to_string().into());
        let mut req = request();
        signer.sign(&mut req).unwrap();

        let header = req.headers().get(AUTHORIZATION).map(HeaderValue::to_str);
        assert!(matches!(header, Some(Ok("Bearer s3cret"))));
        assert!(req.headers()[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn token_signer_debug_hides_secret() {
        let signer = TokenSigner::new("s3cret".to_string().into());
        assert!(!format!("{signer:?}").contains("s3cret"));
    }

    #[test]
    fn noop_signer_adds_nothing() {
        let mut req = request();
        NoopSigner.sign(&mut req).unwrap();
        assert!(req.headers().is_empty());
    }
}
