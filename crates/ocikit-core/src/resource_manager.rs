// ── Resource Manager composite operations ──
//
// Stack and job mutations, each followed by a wait on either the resource's
// own lifecycle state or the work request the mutation started.

use ocikit_api::resource_manager::models::{
    ChangeStackCompartmentDetails, CreateJobDetails, CreateStackDetails, DetectStackDriftDetails,
    Job, JobLifecycleState, Stack, StackLifecycleState, UpdateJobDetails, UpdateStackDetails,
    WorkRequest, WorkRequestStatus,
};
use ocikit_api::{ApiResponse, RequestOptions, ResourceManagerClient};
use tracing::info;

use crate::error::{CompositeError, WaitError};
use crate::waiter::{WaitOutcome, Waitable, Waiter, WaiterConfig};

impl Waitable for WorkRequest {
    fn state(&self) -> &str {
        self.status.as_ref()
    }

    fn terminal_states(&self) -> &'static [&'static str] {
        &["SUCCEEDED", "FAILED", "CANCELED"]
    }
}

impl Waitable for Stack {
    fn state(&self) -> &str {
        self.lifecycle_state.as_ref()
    }

    fn terminal_states(&self) -> &'static [&'static str] {
        &["FAILED", "DELETED"]
    }
}

impl Waitable for Job {
    fn state(&self) -> &str {
        self.lifecycle_state.as_ref()
    }

    fn terminal_states(&self) -> &'static [&'static str] {
        &["SUCCEEDED", "FAILED", "CANCELED"]
    }
}

/// Stack and job mutations that wait for a target state.
#[derive(Debug, Clone)]
pub struct ResourceManagerCompositeOperations {
    client: ResourceManagerClient,
    waiter: WaiterConfig,
}

impl ResourceManagerCompositeOperations {
    pub fn new(client: ResourceManagerClient) -> Self {
        Self {
            client,
            waiter: WaiterConfig::default(),
        }
    }

    pub fn with_waiter_config(mut self, config: WaiterConfig) -> Self {
        self.waiter = config;
        self
    }

    pub fn client(&self) -> &ResourceManagerClient {
        &self.client
    }

    // ── Shared polling ───────────────────────────────────────────────

    async fn wait_for_stack(
        &self,
        stack_id: &str,
        targets: &[StackLifecycleState],
        succeed_on_not_found: bool,
    ) -> Result<WaitOutcome<ApiResponse<Stack>>, WaitError> {
        let client = &self.client;
        let poll_options = RequestOptions::default();
        let poll_options = &poll_options;
        Waiter::new(self.waiter, targets)
            .succeed_on_not_found(succeed_on_not_found)
            .wait(&format!("stack {stack_id}"), move || {
                client.get_stack(stack_id, poll_options)
            })
            .await
    }

    async fn wait_for_job(
        &self,
        job_id: &str,
        targets: &[JobLifecycleState],
    ) -> Result<ApiResponse<Job>, WaitError> {
        let client = &self.client;
        let poll_options = RequestOptions::default();
        let poll_options = &poll_options;
        let resource = format!("job {job_id}");
        Waiter::new(self.waiter, targets)
            .wait(&resource, move || client.get_job(job_id, poll_options))
            .await?
            .into_reached(&resource)
    }

    async fn wait_for_work_request<T>(
        &self,
        operation: &'static str,
        submitted: &ApiResponse<T>,
        targets: &[WorkRequestStatus],
    ) -> Result<ApiResponse<WorkRequest>, WaitError> {
        let id = submitted.work_request_id(operation).map_err(|_| {
            WaitError::MissingWorkRequestId { operation }
        })?;
        info!(operation, work_request_id = %id, "waiting for work request");

        let client = &self.client;
        let poll_options = RequestOptions::default();
        let poll_options = &poll_options;
        let resource = format!("work request {id}");
        Waiter::new(self.waiter, targets)
            .wait(&resource, move || client.get_work_request(id, poll_options))
            .await?
            .into_reached(&resource)
    }

    // ── Stacks ───────────────────────────────────────────────────────

    /// Create a stack, then poll it until its lifecycle state is a target.
    pub async fn create_stack_and_wait_for_state(
        &self,
        details: &CreateStackDetails,
        targets: &[StackLifecycleState],
        options: &RequestOptions,
    ) -> Result<ApiResponse<Stack>, CompositeError<ApiResponse<Stack>>> {
        let created = self.client.create_stack(details, options).await?;
        let resource = format!("stack {}", created.data.id);
        let waited = self
            .wait_for_stack(&created.data.id, targets, false)
            .await
            .and_then(|outcome| outcome.into_reached(&resource));
        waited.map_err(|source| CompositeError::Wait {
            partial: created,
            source,
        })
    }

    /// Create a stack, then poll the work request that provisions it.
    pub async fn create_stack_and_wait_for_work_request(
        &self,
        details: &CreateStackDetails,
        targets: &[WorkRequestStatus],
        options: &RequestOptions,
    ) -> Result<ApiResponse<WorkRequest>, CompositeError<ApiResponse<Stack>>> {
        let created = self.client.create_stack(details, options).await?;
        let waited = self
            .wait_for_work_request("create_stack", &created, targets)
            .await;
        waited.map_err(|source| CompositeError::Wait {
            partial: created,
            source,
        })
    }

    pub async fn update_stack_and_wait_for_state(
        &self,
        stack_id: &str,
        details: &UpdateStackDetails,
        targets: &[StackLifecycleState],
        options: &RequestOptions,
    ) -> Result<ApiResponse<Stack>, CompositeError<ApiResponse<Stack>>> {
        let updated = self.client.update_stack(stack_id, details, options).await?;
        let resource = format!("stack {stack_id}");
        let waited = self
            .wait_for_stack(stack_id, targets, false)
            .await
            .and_then(|outcome| outcome.into_reached(&resource));
        waited.map_err(|source| CompositeError::Wait {
            partial: updated,
            source,
        })
    }

    /// Delete a stack and wait until it is gone. A 404 while polling counts
    /// as success and yields [`WaitOutcome::NotFound`].
    pub async fn delete_stack_and_wait_for_state(
        &self,
        stack_id: &str,
        targets: &[StackLifecycleState],
        options: &RequestOptions,
    ) -> Result<WaitOutcome<ApiResponse<Stack>>, CompositeError<ApiResponse<()>>> {
        let deleted = self.client.delete_stack(stack_id, options).await?;
        self.wait_for_stack(stack_id, targets, true)
            .await
            .map_err(|source| CompositeError::Wait {
                partial: deleted,
                source,
            })
    }

    pub async fn change_stack_compartment_and_wait_for_work_request(
        &self,
        stack_id: &str,
        details: &ChangeStackCompartmentDetails,
        targets: &[WorkRequestStatus],
        options: &RequestOptions,
    ) -> Result<ApiResponse<WorkRequest>, CompositeError<ApiResponse<()>>> {
        let moved = self
            .client
            .change_stack_compartment(stack_id, details, options)
            .await?;
        let waited = self
            .wait_for_work_request("change_stack_compartment", &moved, targets)
            .await;
        waited.map_err(|source| CompositeError::Wait {
            partial: moved,
            source,
        })
    }

    pub async fn detect_stack_drift_and_wait_for_work_request(
        &self,
        stack_id: &str,
        details: &DetectStackDriftDetails,
        targets: &[WorkRequestStatus],
        options: &RequestOptions,
    ) -> Result<ApiResponse<WorkRequest>, CompositeError<ApiResponse<()>>> {
        let started = self
            .client
            .detect_stack_drift(stack_id, details, options)
            .await?;
        let waited = self
            .wait_for_work_request("detect_stack_drift", &started, targets)
            .await;
        waited.map_err(|source| CompositeError::Wait {
            partial: started,
            source,
        })
    }

    // ── Jobs ─────────────────────────────────────────────────────────

    pub async fn create_job_and_wait_for_state(
        &self,
        details: &CreateJobDetails,
        targets: &[JobLifecycleState],
        options: &RequestOptions,
    ) -> Result<ApiResponse<Job>, CompositeError<ApiResponse<Job>>> {
        let created = self.client.create_job(details, options).await?;
        let waited = self.wait_for_job(&created.data.id, targets).await;
        waited.map_err(|source| CompositeError::Wait {
            partial: created,
            source,
        })
    }

    pub async fn update_job_and_wait_for_state(
        &self,
        job_id: &str,
        details: &UpdateJobDetails,
        targets: &[JobLifecycleState],
        options: &RequestOptions,
    ) -> Result<ApiResponse<Job>, CompositeError<ApiResponse<Job>>> {
        let updated = self.client.update_job(job_id, details, options).await?;
        let waited = self.wait_for_job(job_id, targets).await;
        waited.map_err(|source| CompositeError::Wait {
            partial: updated,
            source,
        })
    }
}
