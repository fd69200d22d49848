// Resource Manager service client.

use bytes::Bytes;
use tracing::debug;

use super::models::{
    ChangeStackCompartmentDetails, CreateJobDetails, CreateStackDetails, DetectStackDriftDetails,
    GetJobLogsRequest, Job, JobSummary, ListJobsRequest, ListStacksRequest,
    ListWorkRequestsRequest, LogEntry, Stack, StackSummary, TerraformVersionCollection,
    UpdateJobDetails, UpdateStackDetails, WorkRequest, WorkRequestError, WorkRequestLogEntry,
    WorkRequestSummary,
};
use crate::client::{Call, ClientConfig, ServiceClient};
use crate::enums::SortOrder;
use crate::error::Error;
use crate::region::Service;
use crate::request::{ApiResponse, Pagination, Query, RequestOptions, require};

/// Async client for the Resource Manager API (`/20180917`).
#[derive(Debug, Clone)]
pub struct ResourceManagerClient {
    inner: ServiceClient,
}

impl ResourceManagerClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let inner = ServiceClient::new(config, Service::ResourceManager.api_version())?;
        debug!(base_url = %inner.base_url(), "resource manager client ready");
        Ok(Self { inner })
    }

    pub fn with_http(config: &ClientConfig, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            inner: ServiceClient::with_http(config, Service::ResourceManager.api_version(), http)?,
        })
    }

    // ── Stacks ───────────────────────────────────────────────────────

    pub async fn list_stacks(
        &self,
        request: &ListStacksRequest,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<StackSummary>>, Error> {
        const OP: &str = "list_stacks";
        let query = Query::new()
            .push_opt("compartmentId", request.compartment_id.as_deref())
            .push_opt("id", request.id.as_deref())
            .push_enum("lifecycleState", request.lifecycle_state.as_ref())?
            .push_opt("displayName", request.display_name.as_deref())
            .push_enum("sortBy", request.sort_by.as_ref())?
            .push_enum("sortOrder", request.sort_order.as_ref())?
            .paginate(&request.pagination);
        let call = Call::get(OP, vec!["stacks"]).query(query);
        self.inner.json(call, options).await
    }

    pub async fn get_stack(
        &self,
        stack_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Stack>, Error> {
        const OP: &str = "get_stack";
        let id = require(OP, "stack_id", stack_id)?;
        let call = Call::get(OP, vec!["stacks", id]);
        self.inner.json(call, options).await
    }

    /// Create a stack. The response carries the new stack and the id of the
    /// work request that provisions it.
    pub async fn create_stack(
        &self,
        details: &CreateStackDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Stack>, Error> {
        const OP: &str = "create_stack";
        require(OP, "compartment_id", &details.compartment_id)?;
        let call = Call::post(OP, vec!["stacks"])
            .json(details)?
            .retry_token(options)?;
        self.inner.json(call, options).await
    }

    pub async fn update_stack(
        &self,
        stack_id: &str,
        details: &UpdateStackDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Stack>, Error> {
        const OP: &str = "update_stack";
        let id = require(OP, "stack_id", stack_id)?;
        let call = Call::put(OP, vec!["stacks", id])
            .json(details)?
            .if_match(options)?;
        self.inner.json(call, options).await
    }

    pub async fn delete_stack(
        &self,
        stack_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "delete_stack";
        let id = require(OP, "stack_id", stack_id)?;
        let call = Call::delete(OP, vec!["stacks", id]).if_match(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn change_stack_compartment(
        &self,
        stack_id: &str,
        details: &ChangeStackCompartmentDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "change_stack_compartment";
        let id = require(OP, "stack_id", stack_id)?;
        require(OP, "compartment_id", &details.compartment_id)?;
        let call = Call::post(OP, vec!["stacks", id, "actions", "changeCompartment"])
            .json(details)?
            .if_match(options)?
            .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn detect_stack_drift(
        &self,
        stack_id: &str,
        details: &DetectStackDriftDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "detect_stack_drift";
        let id = require(OP, "stack_id", stack_id)?;
        let call = Call::post(OP, vec!["stacks", id, "actions", "detectDrift"])
            .json(details)?
            .if_match(options)?
            .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    /// Download the stack's Terraform configuration as a zip archive.
    pub async fn get_stack_tf_config(
        &self,
        stack_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Bytes>, Error> {
        const OP: &str = "get_stack_tf_config";
        let id = require(OP, "stack_id", stack_id)?;
        let call = Call::get(OP, vec!["stacks", id, "tfConfig"]);
        self.inner.bytes(call, options).await
    }

    // ── Jobs ─────────────────────────────────────────────────────────

    pub async fn list_jobs(
        &self,
        request: &ListJobsRequest,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<JobSummary>>, Error> {
        const OP: &str = "list_jobs";
        let query = Query::new()
            .push_opt("compartmentId", request.compartment_id.as_deref())
            .push_opt("stackId", request.stack_id.as_deref())
            .push_opt("id", request.id.as_deref())
            .push_enum("lifecycleState", request.lifecycle_state.as_ref())?
            .push_opt("displayName", request.display_name.as_deref())
            .push_enum("sortBy", request.sort_by.as_ref())?
            .push_enum("sortOrder", request.sort_order.as_ref())?
            .paginate(&request.pagination);
        let call = Call::get(OP, vec!["jobs"]).query(query);
        self.inner.json(call, options).await
    }

    pub async fn get_job(
        &self,
        job_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Job>, Error> {
        const OP: &str = "get_job";
        let id = require(OP, "job_id", job_id)?;
        let call = Call::get(OP, vec!["jobs", id]);
        self.inner.json(call, options).await
    }

    pub async fn create_job(
        &self,
        details: &CreateJobDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Job>, Error> {
        const OP: &str = "create_job";
        require(OP, "stack_id", &details.stack_id)?;
        let call = Call::post(OP, vec!["jobs"])
            .json(details)?
            .retry_token(options)?;
        self.inner.json(call, options).await
    }

    pub async fn update_job(
        &self,
        job_id: &str,
        details: &UpdateJobDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Job>, Error> {
        const OP: &str = "update_job";
        let id = require(OP, "job_id", job_id)?;
        let call = Call::put(OP, vec!["jobs", id])
            .json(details)?
            .if_match(options)?;
        self.inner.json(call, options).await
    }

    /// Cancel a running job. `is_forced` terminates it without a graceful
    /// Terraform shutdown.
    pub async fn cancel_job(
        &self,
        job_id: &str,
        is_forced: Option<bool>,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "cancel_job";
        let id = require(OP, "job_id", job_id)?;
        let call = Call::delete(OP, vec!["jobs", id])
            .query(Query::new().push_opt("isForced", is_forced))
            .if_match(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn get_job_logs(
        &self,
        request: &GetJobLogsRequest,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<LogEntry>>, Error> {
        const OP: &str = "get_job_logs";
        let id = require(OP, "job_id", &request.job_id)?;
        let mut query = Query::new();
        for entry_type in &request.entry_types {
            query = query.push_enum("type", Some(entry_type))?;
        }
        let query = query
            .push_enum(
                "levelGreaterThanOrEqualTo",
                request.level_greater_than_or_equal_to.as_ref(),
            )?
            .push_enum("sortOrder", request.sort_order.as_ref())?
            .paginate(&request.pagination)
            .push_opt(
                "timestampGreaterThanOrEqualTo",
                request
                    .timestamp_greater_than_or_equal_to
                    .map(|t| t.to_rfc3339()),
            )
            .push_opt(
                "timestampLessThanOrEqualTo",
                request.timestamp_less_than_or_equal_to.map(|t| t.to_rfc3339()),
            );
        let call = Call::get(OP, vec!["jobs", id, "logs"]).query(query);
        self.inner.json(call, options).await
    }

    /// Raw Terraform console output of a job.
    pub async fn get_job_logs_content(
        &self,
        job_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<String>, Error> {
        const OP: &str = "get_job_logs_content";
        let id = require(OP, "job_id", job_id)?;
        let call = Call::get(OP, vec!["jobs", id, "logs", "content"]);
        self.inner.text(call, options).await
    }

    pub async fn get_job_tf_state(
        &self,
        job_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Bytes>, Error> {
        const OP: &str = "get_job_tf_state";
        let id = require(OP, "job_id", job_id)?;
        let call = Call::get(OP, vec!["jobs", id, "tfState"]);
        self.inner.bytes(call, options).await
    }

    // ── Work requests ────────────────────────────────────────────────

    pub async fn get_work_request(
        &self,
        work_request_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<WorkRequest>, Error> {
        const OP: &str = "get_work_request";
        let id = require(OP, "work_request_id", work_request_id)?;
        let call = Call::get(OP, vec!["workRequests", id]);
        self.inner.json(call, options).await
    }

    pub async fn list_work_requests(
        &self,
        request: &ListWorkRequestsRequest,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<WorkRequestSummary>>, Error> {
        const OP: &str = "list_work_requests";
        let compartment_id = require(OP, "compartment_id", &request.compartment_id)?;
        let query = Query::new()
            .push("compartmentId", compartment_id)
            .push_opt("resourceId", request.resource_id.as_deref())
            .paginate(&request.pagination);
        let call = Call::get(OP, vec!["workRequests"]).query(query);
        self.inner.json(call, options).await
    }

    pub async fn list_work_request_errors(
        &self,
        work_request_id: &str,
        pagination: &Pagination,
        sort_order: Option<SortOrder>,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<WorkRequestError>>, Error> {
        const OP: &str = "list_work_request_errors";
        let id = require(OP, "work_request_id", work_request_id)?;
        let query = Query::new()
            .paginate(pagination)
            .push_enum("sortOrder", sort_order.as_ref())?;
        let call = Call::get(OP, vec!["workRequests", id, "errors"]).query(query);
        self.inner.json(call, options).await
    }

    pub async fn list_work_request_logs(
        &self,
        work_request_id: &str,
        pagination: &Pagination,
        sort_order: Option<SortOrder>,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<WorkRequestLogEntry>>, Error> {
        const OP: &str = "list_work_request_logs";
        let id = require(OP, "work_request_id", work_request_id)?;
        let query = Query::new()
            .paginate(pagination)
            .push_enum("sortOrder", sort_order.as_ref())?;
        let call = Call::get(OP, vec!["workRequests", id, "logs"]).query(query);
        self.inner.json(call, options).await
    }

    // ── Terraform versions ───────────────────────────────────────────

    pub async fn list_terraform_versions(
        &self,
        compartment_id: Option<&str>,
        options: &RequestOptions,
    ) -> Result<ApiResponse<TerraformVersionCollection>, Error> {
        const OP: &str = "list_terraform_versions";
        let query = Query::new().push_opt("compartmentId", compartment_id);
        let call = Call::get(OP, vec!["terraformVersions"]).query(query);
        self.inner.json(call, options).await
    }
}
