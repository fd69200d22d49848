//! Load Balancer command handlers.

use tabled::Tabled;

use ocikit_api::load_balancer::models::{
    Backend, BackendSet, Certificate, ChangeLoadBalancerCompartmentDetails, CreateBackendDetails,
    CreateBackendSetDetails, CreateCertificateDetails, CreateListenerDetails,
    CreateLoadBalancerDetails, HealthChecker, ListLoadBalancersRequest, LoadBalancer,
    LoadBalancerHealthSummary, LoadBalancerShape, ShapeDetails, UpdateBackendDetails,
    UpdateBackendSetDetails, UpdateHealthCheckerDetails, UpdateListenerDetails,
    UpdateLoadBalancerDetails, UpdateLoadBalancerShapeDetails, WorkRequest,
    WorkRequestLifecycleState,
};
use ocikit_api::{ApiResponse, LoadBalancerClient, RequestOptions, Service, collect_all};
use ocikit_core::{CompositeError, LoadBalancerCompositeOperations};

use crate::cli::{
    BackendSetsCommand, BackendsCommand, CertificatesCommand, GlobalOpts, HealthCheckerCommand,
    LbArgs, LbCommand, LbWorkRequestsCommand, ListenersCommand, WaitArgs,
};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LoadBalancerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Shape")]
    shape: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "IPs")]
    ips: String,
}

impl From<&LoadBalancer> for LoadBalancerRow {
    fn from(lb: &LoadBalancer) -> Self {
        Self {
            id: lb.id.clone(),
            name: lb.display_name.clone(),
            shape: lb.shape_name.clone(),
            state: output::state(lb.lifecycle_state),
            ips: lb
                .ip_addresses
                .iter()
                .map(|ip| ip.ip_address.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Tabled)]
struct BackendSetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Policy")]
    policy: String,
    #[tabled(rename = "Backends")]
    backends: usize,
    #[tabled(rename = "Health Check")]
    health_check: String,
}

#[derive(Tabled)]
struct BackendRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Weight")]
    weight: u32,
    #[tabled(rename = "Backup")]
    backup: bool,
    #[tabled(rename = "Drain")]
    drain: bool,
    #[tabled(rename = "Offline")]
    offline: bool,
}

impl From<&Backend> for BackendRow {
    fn from(b: &Backend) -> Self {
        Self {
            name: b.name.clone(),
            weight: b.weight,
            backup: b.backup,
            drain: b.drain,
            offline: b.offline,
        }
    }
}

#[derive(Tabled)]
struct WorkRequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Accepted")]
    accepted: String,
    #[tabled(rename = "Finished")]
    finished: String,
}

impl From<&WorkRequest> for WorkRequestRow {
    fn from(wr: &WorkRequest) -> Self {
        Self {
            id: wr.id.clone(),
            kind: wr.work_request_type.clone(),
            state: output::state(wr.lifecycle_state),
            accepted: output::timestamp(&wr.time_accepted),
            finished: output::timestamp_opt(wr.time_finished.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct NameRow {
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct HealthRow {
    #[tabled(rename = "Load Balancer")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
}

// ── Detail views ────────────────────────────────────────────────────

fn detail(lb: &LoadBalancer) -> String {
    let mut lines = vec![
        format!("ID:          {}", lb.id),
        format!("Name:        {}", lb.display_name),
        format!("Compartment: {}", lb.compartment_id),
        format!("State:       {}", output::state(lb.lifecycle_state)),
        format!("Shape:       {}", lb.shape_name),
        format!("Created:     {}", output::timestamp(&lb.time_created)),
    ];
    if let Some(ShapeDetails {
        minimum_bandwidth_in_mbps,
        maximum_bandwidth_in_mbps,
    }) = lb.shape_details
    {
        lines.push(format!(
            "Bandwidth:   {minimum_bandwidth_in_mbps}-{maximum_bandwidth_in_mbps} Mbps"
        ));
    }
    for ip in &lb.ip_addresses {
        let scope = match ip.is_public {
            Some(true) => "public",
            Some(false) => "private",
            None => "-",
        };
        lines.push(format!("IP:          {} ({scope})", ip.ip_address));
    }
    lines.join("\n")
}

fn backend_set_detail(bs: &BackendSet) -> String {
    let mut lines = vec![
        format!("Name:         {}", bs.name),
        format!("Policy:       {}", bs.policy),
        format!("Health check: {}", health_check_summary(&bs.health_checker)),
    ];
    for b in &bs.backends {
        lines.push(format!("Backend:      {} (weight {})", b.name, b.weight));
    }
    lines.join("\n")
}

fn health_check_summary(hc: &HealthChecker) -> String {
    let mut summary = hc.protocol.clone();
    if let Some(port) = hc.port {
        summary.push_str(&format!(" :{port}"));
    }
    if let Some(ref path) = hc.url_path {
        summary.push(' ');
        summary.push_str(path);
    }
    summary
}

fn health_checker_detail(hc: &HealthChecker) -> String {
    let opt = |v: Option<String>| v.unwrap_or_else(|| "-".into());
    [
        format!("Protocol:    {}", hc.protocol),
        format!("Port:        {}", opt(hc.port.map(|v| v.to_string()))),
        format!("URL path:    {}", hc.url_path.as_deref().unwrap_or("-")),
        format!(
            "Return code: {}",
            opt(hc.return_code.map(|v| v.to_string()))
        ),
        format!("Retries:     {}", opt(hc.retries.map(|v| v.to_string()))),
        format!(
            "Timeout:     {}",
            opt(hc.timeout_in_millis.map(|v| format!("{v}ms")))
        ),
        format!(
            "Interval:    {}",
            opt(hc.interval_in_millis.map(|v| format!("{v}ms")))
        ),
    ]
    .join("\n")
}

fn work_request_detail(wr: &WorkRequest) -> String {
    let mut lines = vec![
        format!("ID:            {}", wr.id),
        format!("Load balancer: {}", wr.load_balancer_id),
        format!("Type:          {}", wr.work_request_type),
        format!("State:         {}", output::state(wr.lifecycle_state)),
        format!("Accepted:      {}", output::timestamp(&wr.time_accepted)),
        format!(
            "Finished:      {}",
            output::timestamp_opt(wr.time_finished.as_ref())
        ),
    ];
    if !wr.message.is_empty() {
        lines.push(format!("Message:       {}", wr.message));
    }
    for err in &wr.error_details {
        lines.push(format!("Error:         {} {}", err.error_code, err.message));
    }
    lines.join("\n")
}

// ── Mutation plumbing ───────────────────────────────────────────────

/// Await the plain mutation, or the composite one when targets were given.
///
/// Both arguments are unpolled futures; only one of them ever runs.
async fn mutate(
    what: &str,
    targets: &[WorkRequestLifecycleState],
    global: &GlobalOpts,
    submit: impl Future<Output = Result<ApiResponse<()>, ocikit_api::Error>>,
    wait_for: impl Future<Output = Result<ApiResponse<WorkRequest>, CompositeError<ApiResponse<()>>>>,
) -> Result<(), CliError> {
    if targets.is_empty() {
        let response = submit.await?;
        util::accepted(what, &response, global.quiet);
        return Ok(());
    }

    let spinner = output::wait_spinner(format!("{what}: waiting for work request"), global.quiet);
    let result = wait_for.await;
    spinner.finish_and_clear();

    match result {
        Ok(work_request) => {
            let out = output::render_single(
                &global.output,
                &work_request.data,
                work_request_detail,
                |wr| wr.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        Err(err) => {
            if let Some(id) = err
                .partial()
                .and_then(|p| p.headers.opc_work_request_id.as_deref())
            {
                output::notice(&format!("{what} was accepted as work request {id}"), false);
            }
            Err(err.into())
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    resolved: &Resolved,
    args: LbArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = LoadBalancerClient::new(&resolved.client_config(global, Service::LoadBalancer)?)?;
    let none = RequestOptions::default();

    match args.command {
        LbCommand::List {
            list,
            lifecycle_state,
            display_name,
        } => {
            let mut request = ListLoadBalancersRequest::new(resolved.compartment()?);
            request.pagination = util::pagination(&list);
            request.display_name = display_name;
            request.lifecycle_state =
                util::parse_opt("lifecycle_state", lifecycle_state.as_deref())?;

            let items = if list.all {
                collect_all(list.limit, |pagination| {
                    let mut page_request = request.clone();
                    page_request.pagination = pagination;
                    let client = &client;
                    let none = &none;
                    async move { client.list_load_balancers(&page_request, none).await }
                })
                .await?
            } else {
                let response = client.list_load_balancers(&request, &none).await?;
                util::next_page_hint(&response, global.quiet);
                response.data
            };

            let out = output::render_list(
                &global.output,
                &items,
                |x| LoadBalancerRow::from(x),
                |lb| lb.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LbCommand::Get { load_balancer_id } => {
            let lb = client.get_load_balancer(&load_balancer_id, &none).await?;
            let out = output::render_single(&global.output, &lb.data, detail, |lb| lb.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LbCommand::Create { body, wait } => {
            let mut details: CreateLoadBalancerDetails = util::read_json_file(&body.from_file)?;
            if details.compartment_id.is_empty() {
                details.compartment_id = resolved.compartment()?.to_owned();
            }
            let ops = composite(&client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Load balancer creation",
                &targets,
                global,
                client.create_load_balancer(&details, &none),
                ops.create_load_balancer_and_wait_for_state(&details, &targets, &none),
            )
            .await
        }

        LbCommand::Update {
            load_balancer_id,
            body,
            if_match,
            wait,
        } => {
            let details: UpdateLoadBalancerDetails = util::read_json_file(&body.from_file)?;
            let options = util::if_match(&if_match);
            let ops = composite(&client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Load balancer update",
                &targets,
                global,
                client.update_load_balancer(&load_balancer_id, &details, &options),
                ops.update_load_balancer_and_wait_for_state(
                    &load_balancer_id,
                    &details,
                    &targets,
                    &options,
                ),
            )
            .await
        }

        LbCommand::Delete {
            load_balancer_id,
            if_match,
            wait,
        } => {
            if !util::confirm(
                &format!("Delete load balancer {load_balancer_id}?"),
                global.yes,
            )? {
                return Ok(());
            }
            let options = util::if_match(&if_match);
            let ops = composite(&client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Load balancer deletion",
                &targets,
                global,
                client.delete_load_balancer(&load_balancer_id, &options),
                ops.delete_load_balancer_and_wait_for_state(&load_balancer_id, &targets, &options),
            )
            .await
        }

        LbCommand::ChangeCompartment {
            load_balancer_id,
            to,
            wait,
        } => {
            let details = ChangeLoadBalancerCompartmentDetails { compartment_id: to };
            let ops = composite(&client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Compartment move",
                &targets,
                global,
                client.change_load_balancer_compartment(&load_balancer_id, &details, &none),
                ops.change_load_balancer_compartment_and_wait_for_state(
                    &load_balancer_id,
                    &details,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        LbCommand::UpdateShape {
            load_balancer_id,
            shape,
            min_mbps,
            max_mbps,
            wait,
        } => {
            let details = UpdateLoadBalancerShapeDetails {
                shape_name: shape,
                shape_details: min_mbps.zip(max_mbps).map(|(min, max)| ShapeDetails {
                    minimum_bandwidth_in_mbps: min,
                    maximum_bandwidth_in_mbps: max,
                }),
            };
            let ops = composite(&client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Shape update",
                &targets,
                global,
                client.update_load_balancer_shape(&load_balancer_id, &details, &none),
                ops.update_load_balancer_shape_and_wait_for_state(
                    &load_balancer_id,
                    &details,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        LbCommand::Shapes(list) => {
            let compartment = resolved.compartment()?;
            let shapes: Vec<LoadBalancerShape> = if list.all {
                collect_all(list.limit, |pagination| {
                    let client = &client;
                    let none = &none;
                    async move { client.list_shapes(compartment, &pagination, none).await }
                })
                .await?
            } else {
                let response = client
                    .list_shapes(compartment, &util::pagination(&list), &none)
                    .await?;
                util::next_page_hint(&response, global.quiet);
                response.data
            };
            let out = output::render_list(
                &global.output,
                &shapes,
                |s| NameRow {
                    name: s.name.clone(),
                },
                |s| s.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LbCommand::Health { load_balancer_id } => {
            if let Some(id) = load_balancer_id {
                let health = client.get_load_balancer_health(&id, &none).await?;
                let out = output::render_single(
                    &global.output,
                    &health.data,
                    |h| {
                        let mut lines = vec![
                            format!("Status:       {}", output::state(h.status)),
                            format!("Backend sets: {}", h.total_backend_set_count),
                        ];
                        for name in &h.critical_state_backend_set_names {
                            lines.push(format!("Critical:     {name}"));
                        }
                        for name in &h.warning_state_backend_set_names {
                            lines.push(format!("Warning:      {name}"));
                        }
                        for name in &h.unknown_state_backend_set_names {
                            lines.push(format!("Unknown:      {name}"));
                        }
                        lines.join("\n")
                    },
                    |h| h.status.to_string(),
                )?;
                output::print_output(&out, global.quiet);
            } else {
                let compartment = resolved.compartment()?;
                let healths: Vec<LoadBalancerHealthSummary> = collect_all(None, |pagination| {
                    let client = &client;
                    let none = &none;
                    async move {
                        client
                            .list_load_balancer_healths(compartment, &pagination, none)
                            .await
                    }
                })
                .await?;
                let out = output::render_list(
                    &global.output,
                    &healths,
                    |h| HealthRow {
                        id: h.load_balancer_id.clone(),
                        status: output::state(h.status),
                    },
                    |h| format!("{}\t{}", h.load_balancer_id, h.status),
                )?;
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        LbCommand::BackendSets(args) => backend_sets(&client, resolved, args.command, global).await,
        LbCommand::Backends(args) => backends(&client, resolved, args.command, global).await,
        LbCommand::HealthChecker(args) => {
            health_checker(&client, resolved, args.command, global).await
        }
        LbCommand::Listeners(args) => listeners(&client, resolved, args.command, global).await,
        LbCommand::Certificates(args) => {
            certificates(&client, resolved, args.command, global).await
        }
        LbCommand::WorkRequests(args) => match args.command {
            LbWorkRequestsCommand::List {
                load_balancer_id,
                list,
            } => {
                let items = if list.all {
                    collect_all(list.limit, |pagination| {
                        let client = &client;
                        let none = &none;
                        let id = load_balancer_id.as_str();
                        async move { client.list_work_requests(id, &pagination, none).await }
                    })
                    .await?
                } else {
                    let response = client
                        .list_work_requests(&load_balancer_id, &util::pagination(&list), &none)
                        .await?;
                    util::next_page_hint(&response, global.quiet);
                    response.data
                };
                let out = output::render_list(
                    &global.output,
                    &items,
                    |x| WorkRequestRow::from(x),
                    |wr| wr.id.clone(),
                )?;
                output::print_output(&out, global.quiet);
                Ok(())
            }
            LbWorkRequestsCommand::Get { work_request_id } => {
                let wr = client.get_work_request(&work_request_id, &none).await?;
                let out =
                    output::render_single(&global.output, &wr.data, work_request_detail, |wr| {
                        wr.lifecycle_state.to_string()
                    })?;
                output::print_output(&out, global.quiet);
                Ok(())
            }
        },
    }
}

fn composite(
    client: &LoadBalancerClient,
    resolved: &Resolved,
    wait: &WaitArgs,
) -> LoadBalancerCompositeOperations {
    LoadBalancerCompositeOperations::new(client.clone())
        .with_waiter_config(resolved.waiter_config(wait))
}

// ── Backend sets ────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
async fn backend_sets(
    client: &LoadBalancerClient,
    resolved: &Resolved,
    command: BackendSetsCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let none = RequestOptions::default();
    match command {
        BackendSetsCommand::List { load_balancer_id } => {
            let sets = client.list_backend_sets(&load_balancer_id, &none).await?;
            let out = output::render_list(
                &global.output,
                &sets.data,
                |bs| BackendSetRow {
                    name: bs.name.clone(),
                    policy: bs.policy.clone(),
                    backends: bs.backends.len(),
                    health_check: health_check_summary(&bs.health_checker),
                },
                |bs| bs.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BackendSetsCommand::Get {
            load_balancer_id,
            backend_set_name,
        } => {
            let bs = client
                .get_backend_set(&load_balancer_id, &backend_set_name, &none)
                .await?;
            let out = output::render_single(&global.output, &bs.data, backend_set_detail, |bs| {
                bs.name.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BackendSetsCommand::Create {
            load_balancer_id,
            body,
            wait,
        } => {
            let details: CreateBackendSetDetails = util::read_json_file(&body.from_file)?;
            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Backend set creation",
                &targets,
                global,
                client.create_backend_set(&load_balancer_id, &details, &none),
                ops.create_backend_set_and_wait_for_state(
                    &load_balancer_id,
                    &details,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        BackendSetsCommand::Update {
            load_balancer_id,
            backend_set_name,
            body,
            wait,
        } => {
            let details: UpdateBackendSetDetails = util::read_json_file(&body.from_file)?;
            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Backend set update",
                &targets,
                global,
                client.update_backend_set(&load_balancer_id, &backend_set_name, &details, &none),
                ops.update_backend_set_and_wait_for_state(
                    &load_balancer_id,
                    &backend_set_name,
                    &details,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        BackendSetsCommand::Delete {
            load_balancer_id,
            backend_set_name,
            wait,
        } => {
            if !util::confirm(
                &format!("Delete backend set {backend_set_name}?"),
                global.yes,
            )? {
                return Ok(());
            }
            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Backend set deletion",
                &targets,
                global,
                client.delete_backend_set(&load_balancer_id, &backend_set_name, &none),
                ops.delete_backend_set_and_wait_for_state(
                    &load_balancer_id,
                    &backend_set_name,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        BackendSetsCommand::Health {
            load_balancer_id,
            backend_set_name,
        } => {
            let health = client
                .get_backend_set_health(&load_balancer_id, &backend_set_name, &none)
                .await?;
            let out = output::render_single(
                &global.output,
                &health.data,
                |h| {
                    let mut lines = vec![
                        format!("Status:   {}", output::state(h.status)),
                        format!("Backends: {}", h.total_backend_count),
                    ];
                    for name in &h.critical_state_backend_names {
                        lines.push(format!("Critical: {name}"));
                    }
                    for name in &h.warning_state_backend_names {
                        lines.push(format!("Warning:  {name}"));
                    }
                    for name in &h.unknown_state_backend_names {
                        lines.push(format!("Unknown:  {name}"));
                    }
                    lines.join("\n")
                },
                |h| h.status.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

// ── Backends ────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
async fn backends(
    client: &LoadBalancerClient,
    resolved: &Resolved,
    command: BackendsCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let none = RequestOptions::default();
    match command {
        BackendsCommand::List {
            load_balancer_id,
            backend_set_name,
        } => {
            let items = client
                .list_backends(&load_balancer_id, &backend_set_name, &none)
                .await?;
            let out = output::render_list(
                &global.output,
                &items.data,
                |x| BackendRow::from(x),
                |b| b.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BackendsCommand::Get {
            load_balancer_id,
            backend_set_name,
            backend_name,
        } => {
            let backend = client
                .get_backend(&load_balancer_id, &backend_set_name, &backend_name, &none)
                .await?;
            let out = output::render_single(
                &global.output,
                &backend.data,
                |b| {
                    [
                        format!("Name:    {}", b.name),
                        format!("Address: {}:{}", b.ip_address, b.port),
                        format!("Weight:  {}", b.weight),
                        format!("Backup:  {}", b.backup),
                        format!("Drain:   {}", b.drain),
                        format!("Offline: {}", b.offline),
                    ]
                    .join("\n")
                },
                |b| b.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BackendsCommand::Create {
            load_balancer_id,
            backend_set_name,
            ip,
            port,
            weight,
            backup,
            drain,
            offline,
            wait,
        } => {
            let mut details = CreateBackendDetails::new(ip, port);
            details.weight = weight;
            details.backup = backup.then_some(true);
            details.drain = drain.then_some(true);
            details.offline = offline.then_some(true);

            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Backend creation",
                &targets,
                global,
                client.create_backend(&load_balancer_id, &backend_set_name, &details, &none),
                ops.create_backend_and_wait_for_state(
                    &load_balancer_id,
                    &backend_set_name,
                    &details,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        BackendsCommand::Update {
            load_balancer_id,
            backend_set_name,
            backend_name,
            weight,
            backup,
            drain,
            offline,
            wait,
        } => {
            // The update replaces all flags, so start from the current backend.
            let current = client
                .get_backend(&load_balancer_id, &backend_set_name, &backend_name, &none)
                .await?
                .data;
            let details = UpdateBackendDetails {
                weight: weight.unwrap_or(current.weight),
                drain: drain.unwrap_or(current.drain),
                offline: offline.unwrap_or(current.offline),
                backup: Some(backup.unwrap_or(current.backup)),
            };

            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Backend update",
                &targets,
                global,
                client.update_backend(
                    &load_balancer_id,
                    &backend_set_name,
                    &backend_name,
                    &details,
                    &none,
                ),
                ops.update_backend_and_wait_for_state(
                    &load_balancer_id,
                    &backend_set_name,
                    &backend_name,
                    &details,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        BackendsCommand::Delete {
            load_balancer_id,
            backend_set_name,
            backend_name,
            wait,
        } => {
            if !util::confirm(&format!("Remove backend {backend_name}?"), global.yes)? {
                return Ok(());
            }
            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Backend removal",
                &targets,
                global,
                client.delete_backend(&load_balancer_id, &backend_set_name, &backend_name, &none),
                ops.delete_backend_and_wait_for_state(
                    &load_balancer_id,
                    &backend_set_name,
                    &backend_name,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        BackendsCommand::Health {
            load_balancer_id,
            backend_set_name,
            backend_name,
        } => {
            let health = client
                .get_backend_health(&load_balancer_id, &backend_set_name, &backend_name, &none)
                .await?;
            let out = output::render_single(
                &global.output,
                &health.data,
                |h| {
                    let mut lines = vec![format!("Status: {}", output::state(h.status))];
                    for r in &h.health_check_results {
                        lines.push(format!(
                            "Check:  {} from {} at {}",
                            output::state(r.health_check_status),
                            r.source_ip_address,
                            output::timestamp(&r.timestamp)
                        ));
                    }
                    lines.join("\n")
                },
                |h| h.status.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

// ── Health checkers ─────────────────────────────────────────────────

async fn health_checker(
    client: &LoadBalancerClient,
    resolved: &Resolved,
    command: HealthCheckerCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let none = RequestOptions::default();
    match command {
        HealthCheckerCommand::Get {
            load_balancer_id,
            backend_set_name,
        } => {
            let hc = client
                .get_health_checker(&load_balancer_id, &backend_set_name, &none)
                .await?;
            let out =
                output::render_single(&global.output, &hc.data, health_checker_detail, |hc| {
                    hc.protocol.clone()
                })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HealthCheckerCommand::Update {
            load_balancer_id,
            backend_set_name,
            body,
            wait,
        } => {
            let details: UpdateHealthCheckerDetails = util::read_json_file(&body.from_file)?;
            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Health checker update",
                &targets,
                global,
                client.update_health_checker(&load_balancer_id, &backend_set_name, &details, &none),
                ops.update_health_checker_and_wait_for_state(
                    &load_balancer_id,
                    &backend_set_name,
                    &details,
                    &targets,
                    &none,
                ),
            )
            .await
        }
    }
}

// ── Listeners ───────────────────────────────────────────────────────

async fn listeners(
    client: &LoadBalancerClient,
    resolved: &Resolved,
    command: ListenersCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let none = RequestOptions::default();
    match command {
        ListenersCommand::Create {
            load_balancer_id,
            body,
            wait,
        } => {
            let details: CreateListenerDetails = util::read_json_file(&body.from_file)?;
            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Listener creation",
                &targets,
                global,
                client.create_listener(&load_balancer_id, &details, &none),
                ops.create_listener_and_wait_for_state(
                    &load_balancer_id,
                    &details,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        ListenersCommand::Update {
            load_balancer_id,
            listener_name,
            body,
            wait,
        } => {
            let details: UpdateListenerDetails = util::read_json_file(&body.from_file)?;
            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Listener update",
                &targets,
                global,
                client.update_listener(&load_balancer_id, &listener_name, &details, &none),
                ops.update_listener_and_wait_for_state(
                    &load_balancer_id,
                    &listener_name,
                    &details,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        ListenersCommand::Delete {
            load_balancer_id,
            listener_name,
            wait,
        } => {
            if !util::confirm(&format!("Delete listener {listener_name}?"), global.yes)? {
                return Ok(());
            }
            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Listener deletion",
                &targets,
                global,
                client.delete_listener(&load_balancer_id, &listener_name, &none),
                ops.delete_listener_and_wait_for_state(
                    &load_balancer_id,
                    &listener_name,
                    &targets,
                    &none,
                ),
            )
            .await
        }
    }
}

// ── Certificates ────────────────────────────────────────────────────

async fn certificates(
    client: &LoadBalancerClient,
    resolved: &Resolved,
    command: CertificatesCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let none = RequestOptions::default();
    match command {
        CertificatesCommand::List { load_balancer_id } => {
            let certs: ApiResponse<Vec<Certificate>> =
                client.list_certificates(&load_balancer_id, &none).await?;
            let out = output::render_list(
                &global.output,
                &certs.data,
                |c| NameRow {
                    name: c.certificate_name.clone(),
                },
                |c| c.certificate_name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CertificatesCommand::Create {
            load_balancer_id,
            body,
            wait,
        } => {
            let details: CreateCertificateDetails = util::read_json_file(&body.from_file)?;
            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Certificate upload",
                &targets,
                global,
                client.create_certificate(&load_balancer_id, &details, &none),
                ops.create_certificate_and_wait_for_state(
                    &load_balancer_id,
                    &details,
                    &targets,
                    &none,
                ),
            )
            .await
        }

        CertificatesCommand::Delete {
            load_balancer_id,
            certificate_name,
            wait,
        } => {
            if !util::confirm(
                &format!("Delete certificate {certificate_name}?"),
                global.yes,
            )? {
                return Ok(());
            }
            let ops = composite(client, resolved, &wait);
            let targets = util::parse_targets(&wait.wait_for_state)?;
            mutate(
                "Certificate deletion",
                &targets,
                global,
                client.delete_certificate(&load_balancer_id, &certificate_name, &none),
                ops.delete_certificate_and_wait_for_state(
                    &load_balancer_id,
                    &certificate_name,
                    &targets,
                    &none,
                ),
            )
            .await
        }
    }
}
