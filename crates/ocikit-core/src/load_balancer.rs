// ── Load Balancer composite operations ──
//
// Every Load Balancer mutation returns an `opc-work-request-id`; these wrappers
// submit the mutation and then poll `get_work_request` until it reaches one of
// the caller's target states.

use ocikit_api::load_balancer::models::{
    ChangeLoadBalancerCompartmentDetails, CreateBackendDetails, CreateBackendSetDetails,
    CreateCertificateDetails, CreateListenerDetails, CreateLoadBalancerDetails, LoadBalancer,
    UpdateBackendDetails, UpdateBackendSetDetails, UpdateHealthCheckerDetails,
    UpdateListenerDetails, UpdateLoadBalancerDetails, UpdateLoadBalancerShapeDetails, WorkRequest,
    WorkRequestLifecycleState,
};
use ocikit_api::{ApiResponse, LoadBalancerClient, RequestOptions};
use tracing::info;

use crate::error::{CompositeError, WaitError};
use crate::waiter::{Waitable, Waiter, WaiterConfig};

impl Waitable for WorkRequest {
    fn state(&self) -> &str {
        self.lifecycle_state.as_ref()
    }

    fn terminal_states(&self) -> &'static [&'static str] {
        &["SUCCEEDED", "FAILED"]
    }
}

impl Waitable for LoadBalancer {
    fn state(&self) -> &str {
        self.lifecycle_state.as_ref()
    }

    fn terminal_states(&self) -> &'static [&'static str] {
        &["FAILED", "DELETED"]
    }
}

/// Result of a submitted mutation whose work request is being tracked.
pub type Submitted = ApiResponse<()>;

type TrackResult = Result<ApiResponse<WorkRequest>, CompositeError<Submitted>>;

/// Load Balancer mutations that wait for their work request to settle.
#[derive(Debug, Clone)]
pub struct LoadBalancerCompositeOperations {
    client: LoadBalancerClient,
    waiter: WaiterConfig,
}

impl LoadBalancerCompositeOperations {
    pub fn new(client: LoadBalancerClient) -> Self {
        Self {
            client,
            waiter: WaiterConfig::default(),
        }
    }

    pub fn with_waiter_config(mut self, config: WaiterConfig) -> Self {
        self.waiter = config;
        self
    }

    pub fn client(&self) -> &LoadBalancerClient {
        &self.client
    }

    /// Poll the work request named by `submitted` until a target state.
    async fn track(
        &self,
        operation: &'static str,
        submitted: Submitted,
        targets: &[WorkRequestLifecycleState],
    ) -> TrackResult {
        let Some(id) = submitted.headers.opc_work_request_id.clone() else {
            return Err(CompositeError::Wait {
                partial: submitted,
                source: WaitError::MissingWorkRequestId { operation },
            });
        };
        info!(operation, work_request_id = %id, "waiting for work request");

        let client = &self.client;
        let poll_options = RequestOptions::default();
        let poll_options = &poll_options;
        let work_request_id = id.as_str();
        let resource = format!("work request {id}");
        let waited = Waiter::new(self.waiter, targets)
            .wait(&resource, move || {
                client.get_work_request(work_request_id, poll_options)
            })
            .await
            .and_then(|outcome| outcome.into_reached(&resource));

        waited.map_err(|source| CompositeError::Wait {
            partial: submitted,
            source,
        })
    }

    // ── Load balancers ───────────────────────────────────────────────

    pub async fn create_load_balancer_and_wait_for_state(
        &self,
        details: &CreateLoadBalancerDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self.client.create_load_balancer(details, options).await?;
        self.track("create_load_balancer", submitted, targets).await
    }

    pub async fn update_load_balancer_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        details: &UpdateLoadBalancerDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .update_load_balancer(load_balancer_id, details, options)
            .await?;
        self.track("update_load_balancer", submitted, targets).await
    }

    pub async fn delete_load_balancer_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .delete_load_balancer(load_balancer_id, options)
            .await?;
        self.track("delete_load_balancer", submitted, targets).await
    }

    pub async fn change_load_balancer_compartment_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        details: &ChangeLoadBalancerCompartmentDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .change_load_balancer_compartment(load_balancer_id, details, options)
            .await?;
        self.track("change_load_balancer_compartment", submitted, targets)
            .await
    }

    pub async fn update_load_balancer_shape_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        details: &UpdateLoadBalancerShapeDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .update_load_balancer_shape(load_balancer_id, details, options)
            .await?;
        self.track("update_load_balancer_shape", submitted, targets)
            .await
    }

    // ── Backend sets ─────────────────────────────────────────────────

    pub async fn create_backend_set_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        details: &CreateBackendSetDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .create_backend_set(load_balancer_id, details, options)
            .await?;
        self.track("create_backend_set", submitted, targets).await
    }

    pub async fn update_backend_set_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        details: &UpdateBackendSetDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .update_backend_set(load_balancer_id, backend_set_name, details, options)
            .await?;
        self.track("update_backend_set", submitted, targets).await
    }

    pub async fn delete_backend_set_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .delete_backend_set(load_balancer_id, backend_set_name, options)
            .await?;
        self.track("delete_backend_set", submitted, targets).await
    }

    // ── Backends ─────────────────────────────────────────────────────

    pub async fn create_backend_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        details: &CreateBackendDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .create_backend(load_balancer_id, backend_set_name, details, options)
            .await?;
        self.track("create_backend", submitted, targets).await
    }

    pub async fn update_backend_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
        details: &UpdateBackendDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .update_backend(
                load_balancer_id,
                backend_set_name,
                backend_name,
                details,
                options,
            )
            .await?;
        self.track("update_backend", submitted, targets).await
    }

    pub async fn delete_backend_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .delete_backend(load_balancer_id, backend_set_name, backend_name, options)
            .await?;
        self.track("delete_backend", submitted, targets).await
    }

    // ── Health checkers ──────────────────────────────────────────────

    pub async fn update_health_checker_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        details: &UpdateHealthCheckerDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .update_health_checker(load_balancer_id, backend_set_name, details, options)
            .await?;
        self.track("update_health_checker", submitted, targets).await
    }

    // ── Listeners ────────────────────────────────────────────────────

    pub async fn create_listener_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        details: &CreateListenerDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .create_listener(load_balancer_id, details, options)
            .await?;
        self.track("create_listener", submitted, targets).await
    }

    pub async fn update_listener_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        listener_name: &str,
        details: &UpdateListenerDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .update_listener(load_balancer_id, listener_name, details, options)
            .await?;
        self.track("update_listener", submitted, targets).await
    }

    pub async fn delete_listener_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        listener_name: &str,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .delete_listener(load_balancer_id, listener_name, options)
            .await?;
        self.track("delete_listener", submitted, targets).await
    }

    // ── Certificates ─────────────────────────────────────────────────

    pub async fn create_certificate_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        details: &CreateCertificateDetails,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .create_certificate(load_balancer_id, details, options)
            .await?;
        self.track("create_certificate", submitted, targets).await
    }

    pub async fn delete_certificate_and_wait_for_state(
        &self,
        load_balancer_id: &str,
        certificate_name: &str,
        targets: &[WorkRequestLifecycleState],
        options: &RequestOptions,
    ) -> TrackResult {
        let submitted = self
            .client
            .delete_certificate(load_balancer_id, certificate_name, options)
            .await?;
        self.track("delete_certificate", submitted, targets).await
    }
}
