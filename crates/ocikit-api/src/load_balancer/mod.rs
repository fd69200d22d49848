// Load Balancer service: models and client.

mod client;
pub mod models;

pub use client::LoadBalancerClient;
