// Load Balancer service client.
//
// Every mutation is asynchronous on the service side: the response carries an
// `opc-work-request-id` that callers (or `ocikit-core`) poll via
// `get_work_request`.

use tracing::debug;

use super::models::{
    Backend, BackendHealth, BackendSet, BackendSetHealth, Certificate,
    ChangeLoadBalancerCompartmentDetails, CreateBackendDetails, CreateBackendSetDetails,
    CreateCertificateDetails, CreateListenerDetails, CreateLoadBalancerDetails, HealthChecker,
    ListLoadBalancersRequest, LoadBalancer, LoadBalancerHealth, LoadBalancerHealthSummary,
    LoadBalancerShape, UpdateBackendDetails, UpdateBackendSetDetails, UpdateHealthCheckerDetails,
    UpdateListenerDetails, UpdateLoadBalancerDetails, UpdateLoadBalancerShapeDetails, WorkRequest,
};
use crate::client::{Call, ClientConfig, ServiceClient};
use crate::error::Error;
use crate::region::Service;
use crate::request::{ApiResponse, Pagination, Query, RequestOptions, require};

/// Async client for the Load Balancer API (`/20170115`).
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct LoadBalancerClient {
    inner: ServiceClient,
}

impl LoadBalancerClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let inner = ServiceClient::new(config, Service::LoadBalancer.api_version())?;
        debug!(base_url = %inner.base_url(), "load balancer client ready");
        Ok(Self { inner })
    }

    /// Build with a caller-supplied `reqwest::Client`.
    pub fn with_http(config: &ClientConfig, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            inner: ServiceClient::with_http(config, Service::LoadBalancer.api_version(), http)?,
        })
    }

    // ── Load balancers ───────────────────────────────────────────────

    pub async fn list_load_balancers(
        &self,
        request: &ListLoadBalancersRequest,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<LoadBalancer>>, Error> {
        const OP: &str = "list_load_balancers";
        let compartment_id = require(OP, "compartment_id", &request.compartment_id)?;
        let query = Query::new()
            .push("compartmentId", compartment_id)
            .paginate(&request.pagination)
            .push_enum("detail", request.detail.as_ref())?
            .push_enum("sortBy", request.sort_by.as_ref())?
            .push_enum("sortOrder", request.sort_order.as_ref())?
            .push_opt("displayName", request.display_name.as_deref())
            .push_enum("lifecycleState", request.lifecycle_state.as_ref())?;
        let call = Call::get(OP, vec!["loadBalancers"]).query(query);
        self.inner.json(call, options).await
    }

    pub async fn get_load_balancer(
        &self,
        load_balancer_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<LoadBalancer>, Error> {
        const OP: &str = "get_load_balancer";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let call = Call::get(OP, vec!["loadBalancers", id]).if_none_match(options)?;
        self.inner.json(call, options).await
    }

    pub async fn create_load_balancer(
        &self,
        details: &CreateLoadBalancerDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "create_load_balancer";
        require(OP, "compartment_id", &details.compartment_id)?;
        require(OP, "display_name", &details.display_name)?;
        require(OP, "shape_name", &details.shape_name)?;
        let call = Call::post(OP, vec!["loadBalancers"])
            .json(details)?
            .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn update_load_balancer(
        &self,
        load_balancer_id: &str,
        details: &UpdateLoadBalancerDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "update_load_balancer";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let call = Call::put(OP, vec!["loadBalancers", id])
            .json(details)?
            .if_match(options)?
            .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn delete_load_balancer(
        &self,
        load_balancer_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "delete_load_balancer";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let call = Call::delete(OP, vec!["loadBalancers", id]).if_match(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn change_load_balancer_compartment(
        &self,
        load_balancer_id: &str,
        details: &ChangeLoadBalancerCompartmentDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "change_load_balancer_compartment";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        require(OP, "compartment_id", &details.compartment_id)?;
        let call = Call::post(
            OP,
            vec!["loadBalancers", id, "actions", "changeCompartment"],
        )
        .json(details)?
        .if_match(options)?
        .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn update_load_balancer_shape(
        &self,
        load_balancer_id: &str,
        details: &UpdateLoadBalancerShapeDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "update_load_balancer_shape";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let call = Call::put(OP, vec!["loadBalancers", id, "updateShape"])
            .json(details)?
            .if_match(options)?
            .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn list_shapes(
        &self,
        compartment_id: &str,
        pagination: &Pagination,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<LoadBalancerShape>>, Error> {
        const OP: &str = "list_shapes";
        let compartment_id = require(OP, "compartment_id", compartment_id)?;
        let query = Query::new()
            .push("compartmentId", compartment_id)
            .paginate(pagination);
        let call = Call::get(OP, vec!["loadBalancerShapes"]).query(query);
        self.inner.json(call, options).await
    }

    // ── Health ───────────────────────────────────────────────────────

    pub async fn get_load_balancer_health(
        &self,
        load_balancer_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<LoadBalancerHealth>, Error> {
        const OP: &str = "get_load_balancer_health";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let call = Call::get(OP, vec!["loadBalancers", id, "health"]);
        self.inner.json(call, options).await
    }

    pub async fn list_load_balancer_healths(
        &self,
        compartment_id: &str,
        pagination: &Pagination,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<LoadBalancerHealthSummary>>, Error> {
        const OP: &str = "list_load_balancer_healths";
        let compartment_id = require(OP, "compartment_id", compartment_id)?;
        let query = Query::new()
            .push("compartmentId", compartment_id)
            .paginate(pagination);
        let call = Call::get(OP, vec!["loadBalancerHealths"]).query(query);
        self.inner.json(call, options).await
    }

    // ── Backend sets ─────────────────────────────────────────────────

    pub async fn list_backend_sets(
        &self,
        load_balancer_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<BackendSet>>, Error> {
        const OP: &str = "list_backend_sets";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let call = Call::get(OP, vec!["loadBalancers", id, "backendSets"]);
        self.inner.json(call, options).await
    }

    pub async fn get_backend_set(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<BackendSet>, Error> {
        const OP: &str = "get_backend_set";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let call = Call::get(OP, vec!["loadBalancers", id, "backendSets", set])
            .if_none_match(options)?;
        self.inner.json(call, options).await
    }

    pub async fn create_backend_set(
        &self,
        load_balancer_id: &str,
        details: &CreateBackendSetDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "create_backend_set";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        require(OP, "name", &details.name)?;
        let call = Call::post(OP, vec!["loadBalancers", id, "backendSets"])
            .json(details)?
            .if_match(options)?
            .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn update_backend_set(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        details: &UpdateBackendSetDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "update_backend_set";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let call = Call::put(OP, vec!["loadBalancers", id, "backendSets", set])
            .json(details)?
            .if_match(options)?
            .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn delete_backend_set(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "delete_backend_set";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let call = Call::delete(OP, vec!["loadBalancers", id, "backendSets", set])
            .if_match(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn get_backend_set_health(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<BackendSetHealth>, Error> {
        const OP: &str = "get_backend_set_health";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let call = Call::get(OP, vec!["loadBalancers", id, "backendSets", set, "health"]);
        self.inner.json(call, options).await
    }

    // ── Backends ─────────────────────────────────────────────────────

    pub async fn list_backends(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<Backend>>, Error> {
        const OP: &str = "list_backends";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let call = Call::get(
            OP,
            vec!["loadBalancers", id, "backendSets", set, "backends"],
        );
        self.inner.json(call, options).await
    }

    pub async fn get_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Backend>, Error> {
        const OP: &str = "get_backend";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let backend = require(OP, "backend_name", backend_name)?;
        let call = Call::get(
            OP,
            vec!["loadBalancers", id, "backendSets", set, "backends", backend],
        )
        .if_none_match(options)?;
        self.inner.json(call, options).await
    }

    pub async fn create_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        details: &CreateBackendDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "create_backend";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        require(OP, "ip_address", &details.ip_address)?;
        let call = Call::post(
            OP,
            vec!["loadBalancers", id, "backendSets", set, "backends"],
        )
        .json(details)?
        .if_match(options)?
        .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn update_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
        details: &UpdateBackendDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "update_backend";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let backend = require(OP, "backend_name", backend_name)?;
        let call = Call::put(
            OP,
            vec!["loadBalancers", id, "backendSets", set, "backends", backend],
        )
        .json(details)?
        .if_match(options)?
        .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn delete_backend(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "delete_backend";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let backend = require(OP, "backend_name", backend_name)?;
        let call = Call::delete(
            OP,
            vec!["loadBalancers", id, "backendSets", set, "backends", backend],
        )
        .if_match(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn get_backend_health(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        backend_name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<BackendHealth>, Error> {
        const OP: &str = "get_backend_health";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let backend = require(OP, "backend_name", backend_name)?;
        let call = Call::get(
            OP,
            vec![
                "loadBalancers",
                id,
                "backendSets",
                set,
                "backends",
                backend,
                "health",
            ],
        );
        self.inner.json(call, options).await
    }

    // ── Health checkers ──────────────────────────────────────────────

    pub async fn get_health_checker(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<HealthChecker>, Error> {
        const OP: &str = "get_health_checker";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let call = Call::get(
            OP,
            vec!["loadBalancers", id, "backendSets", set, "healthChecker"],
        )
        .if_none_match(options)?;
        self.inner.json(call, options).await
    }

    pub async fn update_health_checker(
        &self,
        load_balancer_id: &str,
        backend_set_name: &str,
        details: &UpdateHealthCheckerDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "update_health_checker";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let set = require(OP, "backend_set_name", backend_set_name)?;
        let call = Call::put(
            OP,
            vec!["loadBalancers", id, "backendSets", set, "healthChecker"],
        )
        .json(details)?
        .if_match(options)?
        .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    // ── Listeners ────────────────────────────────────────────────────

    pub async fn create_listener(
        &self,
        load_balancer_id: &str,
        details: &CreateListenerDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "create_listener";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        require(OP, "name", &details.name)?;
        let call = Call::post(OP, vec!["loadBalancers", id, "listeners"])
            .json(details)?
            .if_match(options)?
            .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn update_listener(
        &self,
        load_balancer_id: &str,
        listener_name: &str,
        details: &UpdateListenerDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "update_listener";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let listener = require(OP, "listener_name", listener_name)?;
        let call = Call::put(OP, vec!["loadBalancers", id, "listeners", listener])
            .json(details)?
            .if_match(options)?
            .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn delete_listener(
        &self,
        load_balancer_id: &str,
        listener_name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "delete_listener";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let listener = require(OP, "listener_name", listener_name)?;
        let call = Call::delete(OP, vec!["loadBalancers", id, "listeners", listener])
            .if_match(options)?;
        self.inner.empty(call, options).await
    }

    // ── Certificates ─────────────────────────────────────────────────

    pub async fn list_certificates(
        &self,
        load_balancer_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<Certificate>>, Error> {
        const OP: &str = "list_certificates";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let call = Call::get(OP, vec!["loadBalancers", id, "certificates"]);
        self.inner.json(call, options).await
    }

    pub async fn create_certificate(
        &self,
        load_balancer_id: &str,
        details: &CreateCertificateDetails,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "create_certificate";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        require(OP, "certificate_name", &details.certificate_name)?;
        let call = Call::post(OP, vec!["loadBalancers", id, "certificates"])
            .json(details)?
            .if_match(options)?
            .retry_token(options)?;
        self.inner.empty(call, options).await
    }

    pub async fn delete_certificate(
        &self,
        load_balancer_id: &str,
        certificate_name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<()>, Error> {
        const OP: &str = "delete_certificate";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let name = require(OP, "certificate_name", certificate_name)?;
        let call = Call::delete(OP, vec!["loadBalancers", id, "certificates", name])
            .if_match(options)?;
        self.inner.empty(call, options).await
    }

    // ── Work requests ────────────────────────────────────────────────

    pub async fn get_work_request(
        &self,
        work_request_id: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse<WorkRequest>, Error> {
        const OP: &str = "get_work_request";
        let id = require(OP, "work_request_id", work_request_id)?;
        let call = Call::get(OP, vec!["loadBalancerWorkRequests", id]);
        self.inner.json(call, options).await
    }

    pub async fn list_work_requests(
        &self,
        load_balancer_id: &str,
        pagination: &Pagination,
        options: &RequestOptions,
    ) -> Result<ApiResponse<Vec<WorkRequest>>, Error> {
        const OP: &str = "list_work_requests";
        let id = require(OP, "load_balancer_id", load_balancer_id)?;
        let query = Query::new().paginate(pagination);
        let call = Call::get(OP, vec!["loadBalancers", id, "workRequests"]).query(query);
        self.inner.json(call, options).await
    }
}
