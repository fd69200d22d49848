// ocikit-api: Async Rust client for the OCI Load Balancer and Resource Manager APIs

pub mod auth;
mod client;
pub mod common;
pub mod enums;
pub mod error;
pub mod load_balancer;
pub mod pagination;
pub mod region;
pub mod request;
pub mod resource_manager;
pub mod retry;
pub mod transport;

pub use auth::{NoopSigner, RequestSigner, SharedSigner, TokenSigner};
pub use client::ClientConfig;
pub use error::Error;
pub use load_balancer::LoadBalancerClient;
pub use pagination::{collect_all, paginate};
pub use region::{Region, Service};
pub use request::{ApiResponse, Pagination, RequestOptions, ResponseHeaders};
pub use resource_manager::ResourceManagerClient;
pub use retry::{ExponentialBackoff, NoRetry, RetryPolicy, SharedRetryPolicy};
pub use transport::{TlsMode, TransportConfig};
