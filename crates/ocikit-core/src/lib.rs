// ocikit-core: Poll-until-state waiters and mutate-then-wait composite operations.

pub mod error;
pub mod load_balancer;
pub mod resource_manager;
pub mod waiter;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{CompositeError, WaitError};
pub use load_balancer::LoadBalancerCompositeOperations;
pub use resource_manager::ResourceManagerCompositeOperations;
pub use waiter::{WaitOutcome, Waitable, Waiter, WaiterConfig};
