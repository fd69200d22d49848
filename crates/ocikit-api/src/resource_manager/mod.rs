// Resource Manager service: stacks, jobs, and their work requests.

mod client;
pub mod models;

pub use client::ResourceManagerClient;
