//! Resource Manager command handlers.

use std::path::Path;
use std::time::Duration;

use bytesize::ByteSize;
use tabled::Tabled;

use ocikit_api::resource_manager::models::{
    ApplyJobOperationDetails, ChangeStackCompartmentDetails, CreateJobDetails, CreateStackDetails,
    DestroyJobOperationDetails, DetectStackDriftDetails, ExecutionPlanStrategy, GetJobLogsRequest,
    Job, JobLifecycleState, JobOperationDetails, JobSummary, ListJobsRequest, ListStacksRequest,
    ListWorkRequestsRequest, LogEntry, LogLevel, PlanJobOperationDetails, Stack,
    StackLifecycleState, StackSummary, UpdateStackDetails, WorkRequest, WorkRequestStatus,
};
use ocikit_api::{RequestOptions, ResourceManagerClient, Service, collect_all};
use ocikit_core::{ResourceManagerCompositeOperations, WaitOutcome};

use crate::cli::{
    GlobalOpts, JobKind, JobsCommand, RmArgs, RmCommand, RmWorkRequestsCommand, StacksCommand,
    WaitArgs,
};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct StackRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Terraform")]
    terraform: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&StackSummary> for StackRow {
    fn from(s: &StackSummary) -> Self {
        Self {
            id: s.id.clone(),
            name: s.display_name.clone(),
            state: output::state(s.lifecycle_state),
            terraform: s.terraform_version.clone().unwrap_or_else(|| "-".into()),
            created: output::timestamp(&s.time_created),
        }
    }
}

#[derive(Tabled)]
struct JobRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Finished")]
    finished: String,
}

impl From<&JobSummary> for JobRow {
    fn from(j: &JobSummary) -> Self {
        Self {
            id: j.id.clone(),
            operation: j.operation.to_string(),
            state: output::state(j.lifecycle_state),
            created: output::timestamp(&j.time_created),
            finished: output::timestamp_opt(j.time_finished.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct WorkRequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Accepted")]
    accepted: String,
}

impl From<&WorkRequest> for WorkRequestRow {
    fn from(wr: &WorkRequest) -> Self {
        Self {
            id: wr.id.clone(),
            operation: wr.operation_type.to_string(),
            status: output::state(wr.status),
            progress: format!("{:.0}%", wr.percent_complete),
            accepted: output::timestamp(&wr.time_accepted),
        }
    }
}

#[derive(Tabled)]
struct MessageRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Message")]
    message: String,
}

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&LogEntry> for LogRow {
    fn from(e: &LogEntry) -> Self {
        Self {
            time: output::timestamp(&e.timestamp),
            level: e.level.to_string(),
            message: e.message.clone(),
        }
    }
}

#[derive(Tabled)]
struct VersionRow {
    #[tabled(rename = "Terraform Version")]
    name: String,
}

// ── Detail views ────────────────────────────────────────────────────

fn stack_detail(s: &Stack) -> String {
    let mut lines = vec![
        format!("ID:          {}", s.id),
        format!("Name:        {}", s.display_name),
        format!("Compartment: {}", s.compartment_id),
        format!("State:       {}", output::state(s.lifecycle_state)),
        format!("Created:     {}", output::timestamp(&s.time_created)),
        format!(
            "Terraform:   {}",
            s.terraform_version.as_deref().unwrap_or("-")
        ),
    ];
    if let Some(ref description) = s.description {
        lines.push(format!("Description: {description}"));
    }
    if let Some(drift) = s.stack_drift_status {
        lines.push(format!(
            "Drift:       {drift} (checked {})",
            output::timestamp_opt(s.time_drift_last_checked.as_ref())
        ));
    }
    for (key, value) in &s.variables {
        lines.push(format!("Variable:    {key} = {value}"));
    }
    lines.join("\n")
}

fn job_detail(j: &Job) -> String {
    let mut lines = vec![
        format!("ID:        {}", j.id),
        format!("Stack:     {}", j.stack_id),
        format!("Operation: {}", j.operation),
        format!("State:     {}", output::state(j.lifecycle_state)),
        format!("Created:   {}", output::timestamp(&j.time_created)),
        format!(
            "Finished:  {}",
            output::timestamp_opt(j.time_finished.as_ref())
        ),
    ];
    if let Some(finished) = j.time_finished {
        if let Ok(secs) = u64::try_from((finished - j.time_created).num_seconds()) {
            lines.push(format!(
                "Duration:  {}",
                humantime::format_duration(Duration::from_secs(secs))
            ));
        }
    }
    if let Some(ref name) = j.display_name {
        lines.push(format!("Name:      {name}"));
    }
    if let Some(ref plan) = j.resolved_plan_job_id {
        lines.push(format!("Plan job:  {plan}"));
    }
    if let Some(ref failure) = j.failure_details {
        lines.push(format!("Failure:   {} {}", failure.code, failure.message));
    }
    lines.join("\n")
}

fn work_request_detail(wr: &WorkRequest) -> String {
    let mut lines = vec![
        format!("ID:        {}", wr.id),
        format!("Operation: {}", wr.operation_type),
        format!("Status:    {}", output::state(wr.status)),
        format!("Progress:  {:.0}%", wr.percent_complete),
        format!("Accepted:  {}", output::timestamp(&wr.time_accepted)),
        format!(
            "Started:   {}",
            output::timestamp_opt(wr.time_started.as_ref())
        ),
        format!(
            "Finished:  {}",
            output::timestamp_opt(wr.time_finished.as_ref())
        ),
    ];
    for r in &wr.resources {
        lines.push(format!(
            "Resource:  {} {} ({})",
            r.entity_type, r.identifier, r.action_type
        ));
    }
    lines.join("\n")
}

// ── Helpers ─────────────────────────────────────────────────────────

fn composite(
    client: &ResourceManagerClient,
    resolved: &Resolved,
    wait: &WaitArgs,
) -> ResourceManagerCompositeOperations {
    ResourceManagerCompositeOperations::new(client.clone())
        .with_waiter_config(resolved.waiter_config(wait))
}

/// Await `fut` behind a spinner.
async fn with_spinner<T>(what: &str, quiet: bool, fut: impl Future<Output = T>) -> T {
    let spinner = output::wait_spinner(format!("{what}: waiting"), quiet);
    let result = fut.await;
    spinner.finish_and_clear();
    result
}

fn print_stack(global: &GlobalOpts, stack: &Stack) -> Result<(), CliError> {
    let out = output::render_single(&global.output, stack, stack_detail, |s| s.id.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_job(global: &GlobalOpts, job: &Job) -> Result<(), CliError> {
    let out = output::render_single(&global.output, job, job_detail, |j| j.id.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_work_request(global: &GlobalOpts, wr: &WorkRequest) -> Result<(), CliError> {
    let out = output::render_single(&global.output, wr, work_request_detail, |wr| {
        wr.status.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn write_artifact(path: &Path, bytes: &[u8], quiet: bool) -> Result<(), CliError> {
    std::fs::write(path, bytes)?;
    output::notice(
        &format!(
            "Wrote {} to {}",
            ByteSize::b(bytes.len() as u64),
            path.display()
        ),
        quiet,
    );
    Ok(())
}

fn job_operation(kind: JobKind, plan_job_id: Option<String>) -> JobOperationDetails {
    match kind {
        JobKind::Plan => JobOperationDetails::Plan(PlanJobOperationDetails::default()),
        JobKind::Apply => {
            let execution_plan_strategy = if plan_job_id.is_some() {
                ExecutionPlanStrategy::FromPlanJobId
            } else {
                ExecutionPlanStrategy::AutoApproved
            };
            JobOperationDetails::Apply(ApplyJobOperationDetails {
                execution_plan_strategy,
                execution_plan_job_id: plan_job_id,
                is_provider_upgrade_required: None,
            })
        }
        JobKind::Destroy => JobOperationDetails::Destroy(DestroyJobOperationDetails {
            execution_plan_strategy: ExecutionPlanStrategy::AutoApproved,
            is_provider_upgrade_required: None,
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    resolved: &Resolved,
    args: RmArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client =
        ResourceManagerClient::new(&resolved.client_config(global, Service::ResourceManager)?)?;

    match args.command {
        RmCommand::Stacks(args) => stacks(&client, resolved, args.command, global).await,
        RmCommand::Jobs(args) => jobs(&client, resolved, args.command, global).await,
        RmCommand::WorkRequests(args) => {
            work_requests(&client, resolved, args.command, global).await
        }
        RmCommand::TerraformVersions => {
            let versions = client
                .list_terraform_versions(
                    resolved.profile.compartment_id.as_deref(),
                    &RequestOptions::default(),
                )
                .await?;
            let out = output::render_list(
                &global.output,
                &versions.data.items,
                |v| VersionRow {
                    name: v.name.clone(),
                },
                |v| v.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

// ── Stacks ──────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
async fn stacks(
    client: &ResourceManagerClient,
    resolved: &Resolved,
    command: StacksCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let none = RequestOptions::default();
    match command {
        StacksCommand::List {
            list,
            lifecycle_state,
            display_name,
        } => {
            let request = ListStacksRequest {
                compartment_id: Some(resolved.compartment()?.to_owned()),
                lifecycle_state: util::parse_opt("lifecycle_state", lifecycle_state.as_deref())?,
                display_name,
                pagination: util::pagination(&list),
                ..ListStacksRequest::default()
            };
            let items = if list.all {
                collect_all(list.limit, |pagination| {
                    let request = ListStacksRequest {
                        pagination,
                        ..request.clone()
                    };
                    let none = &none;
                    async move { client.list_stacks(&request, none).await }
                })
                .await?
            } else {
                let response = client.list_stacks(&request, &none).await?;
                util::next_page_hint(&response, global.quiet);
                response.data
            };
            let out = output::render_list(
                &global.output,
                &items,
                |x| StackRow::from(x),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StacksCommand::Get { stack_id } => {
            let stack = client.get_stack(&stack_id, &none).await?;
            print_stack(global, &stack.data)
        }

        StacksCommand::Create { body, wait } => {
            let mut details: CreateStackDetails = util::read_json_file(&body.from_file)?;
            if details.compartment_id.is_empty() {
                details.compartment_id = resolved.compartment()?.to_owned();
            }
            let stack = if wait.wait_for_state.is_empty() {
                client.create_stack(&details, &none).await?
            } else {
                let targets: Vec<StackLifecycleState> = util::parse_targets(&wait.wait_for_state)?;
                let ops = composite(client, resolved, &wait);
                with_spinner(
                    "Stack creation",
                    global.quiet,
                    ops.create_stack_and_wait_for_state(&details, &targets, &none),
                )
                .await?
            };
            print_stack(global, &stack.data)
        }

        StacksCommand::Update {
            stack_id,
            body,
            if_match,
            wait,
        } => {
            let details: UpdateStackDetails = util::read_json_file(&body.from_file)?;
            let options = util::if_match(&if_match);
            let stack = if wait.wait_for_state.is_empty() {
                client.update_stack(&stack_id, &details, &options).await?
            } else {
                let targets: Vec<StackLifecycleState> = util::parse_targets(&wait.wait_for_state)?;
                let ops = composite(client, resolved, &wait);
                with_spinner(
                    "Stack update",
                    global.quiet,
                    ops.update_stack_and_wait_for_state(&stack_id, &details, &targets, &options),
                )
                .await?
            };
            print_stack(global, &stack.data)
        }

        StacksCommand::Delete {
            stack_id,
            if_match,
            wait,
        } => {
            if !util::confirm(&format!("Delete stack {stack_id}?"), global.yes)? {
                return Ok(());
            }
            let options = util::if_match(&if_match);
            if wait.wait_for_state.is_empty() {
                client.delete_stack(&stack_id, &options).await?;
                output::notice(&format!("Stack {stack_id} deletion accepted"), global.quiet);
                return Ok(());
            }

            let targets: Vec<StackLifecycleState> = util::parse_targets(&wait.wait_for_state)?;
            let ops = composite(client, resolved, &wait);
            let outcome = with_spinner(
                "Stack deletion",
                global.quiet,
                ops.delete_stack_and_wait_for_state(&stack_id, &targets, &options),
            )
            .await?;
            match outcome {
                WaitOutcome::Reached(stack) => print_stack(global, &stack.data),
                WaitOutcome::NotFound => {
                    output::notice(&format!("Stack {stack_id} deleted"), global.quiet);
                    Ok(())
                }
            }
        }

        StacksCommand::ChangeCompartment { stack_id, to, wait } => {
            let details = ChangeStackCompartmentDetails { compartment_id: to };
            if wait.wait_for_state.is_empty() {
                let response = client
                    .change_stack_compartment(&stack_id, &details, &none)
                    .await?;
                util::accepted("Compartment move", &response, global.quiet);
                return Ok(());
            }
            let targets: Vec<WorkRequestStatus> = util::parse_targets(&wait.wait_for_state)?;
            let ops = composite(client, resolved, &wait);
            let wr = with_spinner(
                "Compartment move",
                global.quiet,
                ops.change_stack_compartment_and_wait_for_work_request(
                    &stack_id, &details, &targets, &none,
                ),
            )
            .await?;
            print_work_request(global, &wr.data)
        }

        StacksCommand::DetectDrift {
            stack_id,
            resource_addresses,
            wait,
        } => {
            let details = DetectStackDriftDetails {
                resource_addresses: (!resource_addresses.is_empty()).then_some(resource_addresses),
                ..DetectStackDriftDetails::default()
            };
            if wait.wait_for_state.is_empty() {
                let response = client
                    .detect_stack_drift(&stack_id, &details, &none)
                    .await?;
                util::accepted("Drift detection", &response, global.quiet);
                return Ok(());
            }
            let targets: Vec<WorkRequestStatus> = util::parse_targets(&wait.wait_for_state)?;
            let ops = composite(client, resolved, &wait);
            let wr = with_spinner(
                "Drift detection",
                global.quiet,
                ops.detect_stack_drift_and_wait_for_work_request(
                    &stack_id, &details, &targets, &none,
                ),
            )
            .await?;
            print_work_request(global, &wr.data)
        }

        StacksCommand::TfConfig { stack_id, out } => {
            let config = client.get_stack_tf_config(&stack_id, &none).await?;
            write_artifact(&out, &config.data, global.quiet)
        }
    }
}

// ── Jobs ────────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
async fn jobs(
    client: &ResourceManagerClient,
    resolved: &Resolved,
    command: JobsCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let none = RequestOptions::default();
    match command {
        JobsCommand::List {
            stack_id,
            list,
            lifecycle_state,
        } => {
            // A stack scopes the listing on its own
            let compartment_id = if stack_id.is_some() {
                resolved.profile.compartment_id.clone()
            } else {
                Some(resolved.compartment()?.to_owned())
            };
            let request = ListJobsRequest {
                compartment_id,
                stack_id,
                lifecycle_state: util::parse_opt("lifecycle_state", lifecycle_state.as_deref())?,
                pagination: util::pagination(&list),
                ..ListJobsRequest::default()
            };
            let items = if list.all {
                collect_all(list.limit, |pagination| {
                    let request = ListJobsRequest {
                        pagination,
                        ..request.clone()
                    };
                    let none = &none;
                    async move { client.list_jobs(&request, none).await }
                })
                .await?
            } else {
                let response = client.list_jobs(&request, &none).await?;
                util::next_page_hint(&response, global.quiet);
                response.data
            };
            let out = output::render_list(
                &global.output,
                &items,
                |x| JobRow::from(x),
                |j| j.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        JobsCommand::Get { job_id } => {
            let job = client.get_job(&job_id, &none).await?;
            print_job(global, &job.data)
        }

        JobsCommand::Create {
            stack_id,
            operation,
            plan_job_id,
            display_name,
            wait,
        } => {
            let mut details =
                CreateJobDetails::new(stack_id, job_operation(operation, plan_job_id));
            details.display_name = display_name;

            let job = if wait.wait_for_state.is_empty() {
                client.create_job(&details, &none).await?
            } else {
                let targets: Vec<JobLifecycleState> = util::parse_targets(&wait.wait_for_state)?;
                let ops = composite(client, resolved, &wait);
                with_spinner(
                    "Job",
                    global.quiet,
                    ops.create_job_and_wait_for_state(&details, &targets, &none),
                )
                .await?
            };
            print_job(global, &job.data)
        }

        JobsCommand::Cancel { job_id, force } => {
            if !util::confirm(&format!("Cancel job {job_id}?"), global.yes)? {
                return Ok(());
            }
            client
                .cancel_job(&job_id, force.then_some(true), &none)
                .await?;
            output::notice(
                &format!("Cancellation of job {job_id} requested"),
                global.quiet,
            );
            Ok(())
        }

        JobsCommand::Logs { job_id, level, raw } => {
            if raw {
                let content = client.get_job_logs_content(&job_id, &none).await?;
                output::print_output(content.data.trim_end(), global.quiet);
                return Ok(());
            }

            let mut request = GetJobLogsRequest::new(job_id);
            request.level_greater_than_or_equal_to =
                util::parse_opt::<LogLevel>("level", level.as_deref())?;
            let entries = collect_all(None, |pagination| {
                let request = GetJobLogsRequest {
                    pagination,
                    ..request.clone()
                };
                let none = &none;
                async move { client.get_job_logs(&request, none).await }
            })
            .await?;
            let out = output::render_list(
                &global.output,
                &entries,
                |x| LogRow::from(x),
                |e| e.message.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        JobsCommand::TfState { job_id, out } => {
            let state = client.get_job_tf_state(&job_id, &none).await?;
            write_artifact(&out, &state.data, global.quiet)
        }
    }
}

// ── Work requests ───────────────────────────────────────────────────

async fn work_requests(
    client: &ResourceManagerClient,
    resolved: &Resolved,
    command: RmWorkRequestsCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let none = RequestOptions::default();
    match command {
        RmWorkRequestsCommand::List { resource_id, list } => {
            let request = ListWorkRequestsRequest {
                compartment_id: resolved.compartment()?.to_owned(),
                resource_id,
                pagination: util::pagination(&list),
            };
            let items = if list.all {
                collect_all(list.limit, |pagination| {
                    let request = ListWorkRequestsRequest {
                        pagination,
                        ..request.clone()
                    };
                    let none = &none;
                    async move { client.list_work_requests(&request, none).await }
                })
                .await?
            } else {
                let response = client.list_work_requests(&request, &none).await?;
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

        RmWorkRequestsCommand::Get { work_request_id } => {
            let wr = client.get_work_request(&work_request_id, &none).await?;
            print_work_request(global, &wr.data)
        }

        RmWorkRequestsCommand::Errors { work_request_id } => {
            let errors = collect_all(None, |pagination| {
                let id = work_request_id.as_str();
                let none = &none;
                async move {
                    client
                        .list_work_request_errors(id, &pagination, None, none)
                        .await
                }
            })
            .await?;
            let out = output::render_list(
                &global.output,
                &errors,
                |e| MessageRow {
                    time: output::timestamp(&e.timestamp),
                    message: format!("{}: {}", e.code, e.message),
                },
                |e| e.code.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RmWorkRequestsCommand::Logs { work_request_id } => {
            let entries = collect_all(None, |pagination| {
                let id = work_request_id.as_str();
                let none = &none;
                async move {
                    client
                        .list_work_request_logs(id, &pagination, None, none)
                        .await
                }
            })
            .await?;
            let out = output::render_list(
                &global.output,
                &entries,
                |e| MessageRow {
                    time: output::timestamp(&e.timestamp),
                    message: e.message.clone(),
                },
                |e| e.message.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn apply_uses_plan_job_when_given() {
        let details = job_operation(JobKind::Apply, Some("plan-1".into()));
        let JobOperationDetails::Apply(apply) = details else {
            panic!("expected apply details");
        };
        assert_eq!(
            apply.execution_plan_strategy,
            ExecutionPlanStrategy::FromPlanJobId
        );
        assert_eq!(apply.execution_plan_job_id.as_deref(), Some("plan-1"));
    }

    #[test]
    fn apply_and_destroy_default_to_auto_approved() {
        assert!(matches!(
            job_operation(JobKind::Apply, None),
            JobOperationDetails::Apply(ApplyJobOperationDetails {
                execution_plan_strategy: ExecutionPlanStrategy::AutoApproved,
                ..
            })
        ));
        assert!(matches!(
            job_operation(JobKind::Destroy, None),
            JobOperationDetails::Destroy(DestroyJobOperationDetails {
                execution_plan_strategy: ExecutionPlanStrategy::AutoApproved,
                ..
            })
        ));
        assert!(matches!(
            job_operation(JobKind::Plan, None),
            JobOperationDetails::Plan(_)
        ));
    }

    #[test]
    fn finished_job_detail_shows_duration_and_failure() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "id": "job-1",
            "stackId": "stack-1",
            "compartmentId": "c",
            "operation": "APPLY",
            "lifecycleState": "FAILED",
            "timeCreated": "2024-05-01T12:00:00Z",
            "timeFinished": "2024-05-01T12:01:30Z",
            "failureDetails": { "code": "TERRAFORM_EXECUTION_ERROR", "message": "boom" }
        }))
        .unwrap();

        let out = job_detail(&job);
        assert!(out.contains("Duration:  1m 30s"));
        assert!(out.contains("Failure:   TERRAFORM_EXECUTION_ERROR boom"));
    }
}
