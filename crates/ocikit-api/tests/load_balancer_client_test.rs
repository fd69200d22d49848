#![allow(clippy::unwrap_used)]
// Integration tests for `LoadBalancerClient` using wiremock.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{any, body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use ocikit_api::enums::{SortBy, SortOrder};
use ocikit_api::load_balancer::models::{
    CreateBackendDetails, CreateLoadBalancerDetails, HealthStatus, ListLoadBalancersRequest, LoadBalancerLifecycleState,
    UpdateBackendDetails, WorkRequestLifecycleState,
};
use ocikit_api::{
    ClientConfig, Error, ExponentialBackoff, LoadBalancerClient, Pagination, RequestOptions,
    collect_all,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(Url::parse(&server.uri()).unwrap())
}

async fn setup() -> (MockServer, LoadBalancerClient) {
    let server = MockServer::start().await;
    let client = LoadBalancerClient::new(&config(&server)).unwrap();
    (server, client)
}

fn load_balancer(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "compartmentId": "ocid1.compartment.oc1..c",
        "displayName": name,
        "lifecycleState": "ACTIVE",
        "timeCreated": "2024-05-01T12:00:00Z",
        "shapeName": "flexible",
        "ipAddresses": []
    })
}

/// Fails the test on drop if anything reaches the server.
async fn expect_no_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_load_balancers_with_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancers"))
        .and(query_param("compartmentId", "ocid1.compartment.oc1..c"))
        .and(query_param("sortBy", "DISPLAYNAME"))
        .and(query_param("sortOrder", "ASC"))
        .and(query_param("lifecycleState", "ACTIVE"))
        .and(query_param("limit", "2"))
        .and(header_exists("opc-request-id"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("opc-next-page", "page-2")
                .set_body_json(json!([
                    load_balancer("lb-1", "alpha"),
                    load_balancer("lb-2", "beta"),
                ])),
        )
        .mount(&server)
        .await;

    let mut request = ListLoadBalancersRequest::new("ocid1.compartment.oc1..c");
    request.sort_by = Some(SortBy::DisplayName);
    request.sort_order = Some(SortOrder::Asc);
    request.lifecycle_state = Some(LoadBalancerLifecycleState::Active);
    request.pagination.limit = Some(2);

    let resp = client
        .list_load_balancers(&request, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(resp.data.len(), 2);
    assert_eq!(resp.data[1].display_name, "beta");
    assert_eq!(resp.next_page(), Some("page-2"));
}

#[tokio::test]
async fn test_get_load_balancer_surfaces_etag_and_request_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancers/lb-1"))
        .and(header("opc-request-id", "my-request"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("etag", "etag-7")
                .insert_header("opc-request-id", "my-request")
                .set_body_json(load_balancer("lb-1", "alpha")),
        )
        .mount(&server)
        .await;

    let resp = client
        .get_load_balancer("lb-1", &RequestOptions::new().with_request_id("my-request"))
        .await
        .unwrap();

    assert_eq!(resp.data.id, "lb-1");
    assert_eq!(resp.data.lifecycle_state, LoadBalancerLifecycleState::Active);
    assert_eq!(resp.headers.etag.as_deref(), Some("etag-7"));
    assert_eq!(resp.headers.opc_request_id.as_deref(), Some("my-request"));
}

#[tokio::test]
async fn test_create_backend_returns_work_request_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/20170115/loadBalancers/lb-1/backendSets/web/backends"))
        .and(body_json(json!({ "ipAddress": "10.0.0.3", "port": 8080, "backup": false })))
        .and(header("opc-retry-token", "token-1"))
        .respond_with(ResponseTemplate::new(204).insert_header("opc-work-request-id", "wr-9"))
        .expect(1)
        .mount(&server)
        .await;

    let mut details = CreateBackendDetails::new("10.0.0.3", 8080);
    details.backup = Some(false);

    let resp = client
        .create_backend(
            "lb-1",
            "web",
            &details,
            &RequestOptions::new().with_retry_token("token-1"),
        )
        .await
        .unwrap();

    assert_eq!(resp.work_request_id("create_backend").unwrap(), "wr-9");
}

#[tokio::test]
async fn test_backend_name_is_a_single_path_segment() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(
            "/20170115/loadBalancers/lb-1/backendSets/web%20tier/backends/10.0.0.3:8080",
        ))
        .and(header("if-match", "etag-1"))
        .respond_with(ResponseTemplate::new(204).insert_header("opc-work-request-id", "wr-2"))
        .expect(1)
        .mount(&server)
        .await;

    let details = UpdateBackendDetails {
        weight: 3,
        drain: true,
        offline: false,
        backup: None,
    };
    client
        .update_backend(
            "lb-1",
            "web tier",
            "10.0.0.3:8080",
            &details,
            &RequestOptions::new().with_if_match("etag-1"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_backend_set_health() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancers/lb-1/backendSets/web/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "UNKNOWN",
            "warningStateBackendNames": [],
            "criticalStateBackendNames": ["10.0.0.4:80"],
            "unknownStateBackendNames": [],
            "totalBackendCount": 2
        })))
        .mount(&server)
        .await;

    let health = client
        .get_backend_set_health("lb-1", "web", &RequestOptions::new())
        .await
        .unwrap()
        .into_inner();

    // The service's own UNKNOWN is a real value, not the sentinel.
    assert_eq!(health.status, HealthStatus::Unknown);
    assert_eq!(health.critical_state_backend_names, vec!["10.0.0.4:80"]);
}

#[tokio::test]
async fn test_get_work_request_unknown_state() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancerWorkRequests/wr-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "wr-1",
            "loadBalancerId": "lb-1",
            "type": "CreateBackend",
            "lifecycleState": "QUEUED",
            "message": "",
            "timeAccepted": "2024-05-01T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let wr = client
        .get_work_request("wr-1", &RequestOptions::new())
        .await
        .unwrap()
        .into_inner();

    assert_eq!(wr.lifecycle_state, WorkRequestLifecycleState::UnknownEnumValue);
}

#[tokio::test]
async fn test_collect_all_shapes_follows_pages() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancerShapes"))
        .and(query_param("page", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "flexible" }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancerShapes"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("opc-next-page", "p2")
                .set_body_json(json!([{ "name": "100Mbps" }, { "name": "400Mbps" }])),
        )
        .mount(&server)
        .await;

    let options = RequestOptions::new();
    let shapes = collect_all(None, |page: Pagination| {
        let client = client.clone();
        let options = options.clone();
        async move { client.list_shapes("ocid1.compartment", &page, &options).await }
    })
    .await
    .unwrap();

    let names: Vec<_> = shapes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["100Mbps", "400Mbps", "flexible"]);
}

// ── Client-side validation ──────────────────────────────────────────

#[tokio::test]
async fn test_blank_id_fails_before_network() {
    let (server, client) = setup().await;
    expect_no_requests(&server).await;

    let result = client
        .delete_backend("lb-1", "web", "  ", &RequestOptions::new())
        .await;

    assert!(matches!(
        result,
        Err(Error::MissingParameter {
            operation: "delete_backend",
            parameter: "backend_name",
        })
    ));
}

#[tokio::test]
async fn test_blank_create_load_balancer_fields_fail_before_network() {
    let (server, client) = setup().await;
    expect_no_requests(&server).await;

    let blank_compartment = CreateLoadBalancerDetails::new("  ", "lb", "flexible", vec![]);
    let err = client
        .create_load_balancer(&blank_compartment, &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MissingParameter {
            operation: "create_load_balancer",
            parameter: "compartment_id",
        }
    ));

    let blank_shape = CreateLoadBalancerDetails::new("ocid1.compartment", "lb", "", vec![]);
    let err = client
        .create_load_balancer(&blank_shape, &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MissingParameter {
            parameter: "shape_name",
            ..
        }
    ));
}

#[tokio::test]
async fn test_sentinel_enum_fails_before_network() {
    let (server, client) = setup().await;
    expect_no_requests(&server).await;

    let mut request = ListLoadBalancersRequest::new("ocid1.compartment");
    request.sort_by = Some(SortBy::UnknownEnumValue);

    let err = client
        .list_load_balancers(&request, &RequestOptions::new())
        .await
        .unwrap_err();

    match err {
        Error::InvalidEnumValue {
            parameter, allowed, ..
        } => {
            assert_eq!(parameter, "sortBy");
            assert_eq!(allowed, "TIMECREATED, DISPLAYNAME");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ── Error and retry handling ────────────────────────────────────────

#[tokio::test]
async fn test_service_error_is_parsed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancers/lb-missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("opc-request-id", "req-404")
                .set_body_json(json!({
                    "code": "NotAuthorizedOrNotFound",
                    "message": "Authorization failed or requested resource not found."
                })),
        )
        .mount(&server)
        .await;

    let err = client
        .get_load_balancer("lb-missing", &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.service_code(), Some("NotAuthorizedOrNotFound"));
    assert_eq!(err.opc_request_id(), Some("req-404"));
}

#[tokio::test]
async fn test_transient_error_is_retried_with_stable_tokens() {
    let server = MockServer::start().await;
    let policy = ExponentialBackoff::default()
        .with_max_attempts(3)
        .with_base_delay(Duration::from_millis(5));
    let client =
        LoadBalancerClient::new(&config(&server).with_retry_policy(Arc::new(policy))).unwrap();

    Mock::given(method("POST"))
        .and(path("/20170115/loadBalancers/lb-1/backendSets/web/backends"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "code": "ServiceUnavailable",
            "message": "try later"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/20170115/loadBalancers/lb-1/backendSets/web/backends"))
        .respond_with(ResponseTemplate::new(204).insert_header("opc-work-request-id", "wr-3"))
        .mount(&server)
        .await;

    let resp = client
        .create_backend(
            "lb-1",
            "web",
            &CreateBackendDetails::new("10.0.0.5", 80),
            &RequestOptions::new(),
        )
        .await
        .unwrap();
    assert_eq!(resp.headers.opc_work_request_id.as_deref(), Some("wr-3"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let token = |r: &Request| r.headers.get("opc-retry-token").cloned();
    let request_id = |r: &Request| r.headers.get("opc-request-id").cloned();
    assert!(token(&requests[0]).is_some());
    assert_eq!(token(&requests[0]), token(&requests[1]));
    assert_eq!(request_id(&requests[0]), request_id(&requests[1]));
}

#[tokio::test]
async fn test_throttled_call_waits_for_retry_after() {
    let server = MockServer::start().await;
    let policy = ExponentialBackoff::default()
        .with_max_attempts(3)
        .with_base_delay(Duration::from_millis(5));
    let client =
        LoadBalancerClient::new(&config(&server).with_retry_policy(Arc::new(policy))).unwrap();

    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancers/lb-1"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_json(json!({
                    "code": "TooManyRequests",
                    "message": "slow down"
                })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancers/lb-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_balancer("lb-1", "alpha")))
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let resp = client
        .get_load_balancer("lb-1", &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(resp.data.display_name, "alpha");
    assert!(
        started.elapsed() >= Duration::from_secs(1),
        "retried after {:?}",
        started.elapsed()
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_service_error_carries_retry_after() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/20170115/loadBalancers/lb-1"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let err = client
        .get_load_balancer("lb-1", &RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(429));
    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn test_no_retry_token_generated_without_retries() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/20170115/loadBalancers"))
        .and(|req: &Request| !req.headers.contains_key("opc-retry-token"))
        .respond_with(ResponseTemplate::new(204).insert_header("opc-work-request-id", "wr-4"))
        .expect(1)
        .mount(&server)
        .await;

    let details = CreateLoadBalancerDetails::new(
        "ocid1.compartment",
        "lb",
        "flexible",
        vec!["ocid1.subnet".into()],
    );
    client
        .create_load_balancer(&details, &RequestOptions::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    let client = LoadBalancerClient::new(
        &config(&server).with_retry_policy(Arc::new(
            ExponentialBackoff::default().with_base_delay(Duration::from_millis(1)),
        )),
    )
    .unwrap();

    Mock::given(method("DELETE"))
        .and(path("/20170115/loadBalancers/lb-1/listeners/http"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "InvalidParameter",
            "message": "listener is in use"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .delete_listener("lb-1", "http", &RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}
