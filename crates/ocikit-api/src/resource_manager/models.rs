//! Resource Manager service models (API version `20180917`).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::common::{DefinedTags, FreeformTags};
use crate::enums::{SortBy, SortOrder, open_enum};
use crate::request::Pagination;

// ── Enums ────────────────────────────────────────────────────────────

open_enum! {
    pub enum StackLifecycleState {
        Creating,
        Active,
        Deleting,
        Deleted,
        Failed,
    }
}

open_enum! {
    /// Result of the most recent drift detection run.
    pub enum StackDriftStatus {
        NotChecked,
        InSync,
        Drifted,
    }
}

open_enum! {
    pub enum JobOperation {
        Plan,
        Apply,
        Destroy,
        ImportTfState,
    }
}

open_enum! {
    pub enum JobLifecycleState {
        Accepted,
        InProgress,
        Failed,
        Succeeded,
        Canceling,
        Canceled,
    }
}

open_enum! {
    /// How an apply or destroy job obtains its execution plan.
    pub enum ExecutionPlanStrategy {
        FromPlanJobId,
        FromLatestPlanJob,
        AutoApproved,
    }
}

open_enum! {
    pub enum LogEntryType {
        TerraformConsole,
    }
}

open_enum! {
    pub enum LogLevel {
        Trace,
        Debug,
        Info,
        Warn,
        Error,
        Fatal,
    }
}

open_enum! {
    pub enum WorkRequestOperationType {
        CreateStack,
        UpdateStack,
        DeleteStack,
        MoveStack,
        DriftDetection,
        CreatePrivateEndpoint,
        UpdatePrivateEndpoint,
        DeletePrivateEndpoint,
        MovePrivateEndpoint,
    }
}

open_enum! {
    pub enum WorkRequestStatus {
        Accepted,
        InProgress,
        Failed,
        Succeeded,
        Canceling,
        Canceled,
    }
}

open_enum! {
    pub enum WorkRequestResourceActionType {
        Created,
        Updated,
        Deleted,
        InProgress,
        Related,
    }
}

// ── Configuration sources ────────────────────────────────────────────

/// Where a stack's Terraform configuration comes from.
///
/// Tagged on the wire by `configSourceType`. Source types this client does
/// not model are kept verbatim in `Other` and re-serialized unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    ZipUpload(ZipUploadConfigSource),
    Git(GitConfigSource),
    Other(Value),
}

const CONFIG_SOURCE_TAG: &str = "configSourceType";
const ZIP_UPLOAD: &str = "ZIP_UPLOAD";
const GIT_CONFIG_SOURCE: &str = "GIT_CONFIG_SOURCE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipUploadConfigSource {
    /// Base64 zip archive. Sent on create/update, never returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_file_base64_encoded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitConfigSource {
    pub configuration_source_provider_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
}

impl ConfigSource {
    /// The `configSourceType` discriminator.
    pub fn source_type(&self) -> &str {
        match self {
            Self::ZipUpload(_) => ZIP_UPLOAD,
            Self::Git(_) => GIT_CONFIG_SOURCE,
            Self::Other(raw) => raw
                .get(CONFIG_SOURCE_TAG)
                .and_then(Value::as_str)
                .unwrap_or(crate::enums::UNKNOWN_ENUM_VALUE),
        }
    }
}

fn tagged<T: Serialize>(tag: &str, body: &T) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(body)?;
    if let Value::Object(ref mut map) = value {
        map.insert(CONFIG_SOURCE_TAG.to_owned(), Value::String(tag.to_owned()));
    }
    Ok(value)
}

impl Serialize for ConfigSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self {
            Self::ZipUpload(zip) => tagged(ZIP_UPLOAD, zip),
            Self::Git(git) => tagged(GIT_CONFIG_SOURCE, git),
            Self::Other(raw) => Ok(raw.clone()),
        }
        .map_err(<S::Error as serde::ser::Error>::custom)?;
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConfigSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let tag = raw
            .get(CONFIG_SOURCE_TAG)
            .and_then(Value::as_str)
            .map(str::to_ascii_uppercase);
        match tag.as_deref() {
            Some(ZIP_UPLOAD) => serde_json::from_value(raw)
                .map(Self::ZipUpload)
                .map_err(D::Error::custom),
            Some(GIT_CONFIG_SOURCE) => serde_json::from_value(raw)
                .map(Self::Git)
                .map_err(D::Error::custom),
            _ => Ok(Self::Other(raw)),
        }
    }
}

// ── Stacks ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub id: String,
    pub compartment_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub time_created: DateTime<Utc>,
    pub lifecycle_state: StackLifecycleState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_source: Option<ConfigSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_drift_status: Option<StackDriftStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_drift_last_checked: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSummary {
    pub id: String,
    pub compartment_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub time_created: DateTime<Utc>,
    pub lifecycle_state: StackLifecycleState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStackDetails {
    pub compartment_id: String,
    pub config_source: ConfigSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl CreateStackDetails {
    pub fn new(compartment_id: impl Into<String>, config_source: ConfigSource) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            config_source,
            display_name: None,
            description: None,
            variables: None,
            terraform_version: None,
            freeform_tags: None,
            defined_tags: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStackDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_source: Option<ConfigSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStackCompartmentDetails {
    pub compartment_id: String,
}

/// Restrict drift detection to specific resources; empty checks everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectStackDriftDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_addresses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListStacksRequest {
    pub compartment_id: Option<String>,
    pub id: Option<String>,
    pub lifecycle_state: Option<StackLifecycleState>,
    pub display_name: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub pagination: Pagination,
}

// ── Jobs ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub stack_id: String,
    pub compartment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub operation: JobOperation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_operation_details: Option<JobOperationDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_job_plan_resolution: Option<ApplyJobPlanResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_plan_job_id: Option<String>,
    pub time_created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_finished: Option<DateTime<Utc>>,
    pub lifecycle_state: JobLifecycleState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_details: Option<FailureDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: String,
    pub stack_id: String,
    pub compartment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub operation: JobOperation,
    pub time_created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_finished: Option<DateTime<Utc>>,
    pub lifecycle_state: JobLifecycleState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDetails {
    /// e.g. `TERRAFORM_EXECUTION_ERROR`.
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyJobPlanResolution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_use_latest_job_id: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_auto_approved: Option<bool>,
}

/// Operation-specific job parameters, tagged by `operation`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobOperationDetails {
    Plan(PlanJobOperationDetails),
    Apply(ApplyJobOperationDetails),
    Destroy(DestroyJobOperationDetails),
    ImportTfState(ImportTfStateJobOperationDetails),
    /// An operation this client version does not model.
    #[serde(other)]
    UnknownEnumValue,
}

/// Job operation details accepted by `create_job`.
pub type CreateJobOperationDetails = JobOperationDetails;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanJobOperationDetails {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyJobOperationDetails {
    pub execution_plan_strategy: ExecutionPlanStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_plan_job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_provider_upgrade_required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestroyJobOperationDetails {
    pub execution_plan_strategy: ExecutionPlanStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_provider_upgrade_required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportTfStateJobOperationDetails {
    /// Only sent on create; the service does not echo the state back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tf_state_base64_encoded: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobDetails {
    pub stack_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Legacy form of `job_operation_details`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<JobOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_operation_details: Option<CreateJobOperationDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_job_plan_resolution: Option<ApplyJobPlanResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl CreateJobDetails {
    pub fn new(stack_id: impl Into<String>, details: CreateJobOperationDetails) -> Self {
        Self {
            stack_id: stack_id.into(),
            display_name: None,
            operation: None,
            job_operation_details: Some(details),
            apply_job_plan_resolution: None,
            freeform_tags: None,
            defined_tags: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<FreeformTags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListJobsRequest {
    pub compartment_id: Option<String>,
    pub stack_id: Option<String>,
    pub id: Option<String>,
    pub lifecycle_state: Option<JobLifecycleState>,
    pub display_name: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub pagination: Pagination,
}

// ── Job logs ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub entry_type: LogEntryType,
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetJobLogsRequest {
    pub job_id: String,
    pub entry_types: Vec<LogEntryType>,
    pub level_greater_than_or_equal_to: Option<LogLevel>,
    pub sort_order: Option<SortOrder>,
    pub timestamp_greater_than_or_equal_to: Option<DateTime<Utc>>,
    pub timestamp_less_than_or_equal_to: Option<DateTime<Utc>>,
    pub pagination: Pagination,
}

impl GetJobLogsRequest {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            ..Self::default()
        }
    }
}

// ── Work requests ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    pub id: String,
    pub operation_type: WorkRequestOperationType,
    pub status: WorkRequestStatus,
    pub compartment_id: String,
    #[serde(default)]
    pub resources: Vec<WorkRequestResource>,
    #[serde(default)]
    pub percent_complete: f32,
    pub time_accepted: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_started: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_finished: Option<DateTime<Utc>>,
}

/// Summaries carry the same fields as the full work request.
pub type WorkRequestSummary = WorkRequest;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequestResource {
    pub entity_type: String,
    pub action_type: WorkRequestResourceActionType,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequestError {
    pub code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequestLogEntry {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListWorkRequestsRequest {
    pub compartment_id: String,
    pub resource_id: Option<String>,
    pub pagination: Pagination,
}

// ── Terraform versions ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerraformVersionCollection {
    #[serde(default)]
    pub items: Vec<TerraformVersionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerraformVersionSummary {
    pub name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn config_source_dispatches_on_tag() {
        let zip: ConfigSource = serde_json::from_value(json!({
            "configSourceType": "ZIP_UPLOAD",
            "workingDirectory": "infra"
        }))
        .unwrap();
        assert_eq!(
            zip,
            ConfigSource::ZipUpload(ZipUploadConfigSource {
                zip_file_base64_encoded: None,
                working_directory: Some("infra".into()),
            })
        );

        let git: ConfigSource = serde_json::from_value(json!({
            "configSourceType": "GIT_CONFIG_SOURCE",
            "configurationSourceProviderId": "ocid1.ormconfigsourceprovider",
            "branchName": "main"
        }))
        .unwrap();
        assert_eq!(git.source_type(), "GIT_CONFIG_SOURCE");
    }

    #[test]
    fn unknown_config_source_is_preserved() {
        let raw = json!({
            "configSourceType": "OBJECT_STORAGE_CONFIG_SOURCE",
            "bucketName": "tf",
            "namespace": "acme"
        });
        let source: ConfigSource = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(source.source_type(), "OBJECT_STORAGE_CONFIG_SOURCE");
        assert_eq!(serde_json::to_value(&source).unwrap(), raw);
    }

    #[test]
    fn create_stack_serializes_tagged_source() {
        let details = CreateStackDetails::new(
            "ocid1.compartment",
            ConfigSource::ZipUpload(ZipUploadConfigSource {
                zip_file_base64_encoded: Some("UEsDBA==".into()),
                working_directory: None,
            }),
        );
        assert_eq!(
            serde_json::to_value(&details).unwrap(),
            json!({
                "compartmentId": "ocid1.compartment",
                "configSource": {
                    "configSourceType": "ZIP_UPLOAD",
                    "zipFileBase64Encoded": "UEsDBA=="
                }
            })
        );
    }

    #[test]
    fn job_operation_details_tagged_by_operation() {
        let details = CreateJobDetails::new(
            "ocid1.stack",
            JobOperationDetails::Apply(ApplyJobOperationDetails {
                execution_plan_strategy: ExecutionPlanStrategy::AutoApproved,
                execution_plan_job_id: None,
                is_provider_upgrade_required: None,
            }),
        );
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(
            value["jobOperationDetails"],
            json!({ "operation": "APPLY", "executionPlanStrategy": "AUTO_APPROVED" })
        );

        let plan: JobOperationDetails =
            serde_json::from_value(json!({ "operation": "PLAN" })).unwrap();
        assert_eq!(plan, JobOperationDetails::Plan(PlanJobOperationDetails {}));

        let future: JobOperationDetails =
            serde_json::from_value(json!({ "operation": "REFRESH" })).unwrap();
        assert_eq!(future, JobOperationDetails::UnknownEnumValue);
    }

    #[test]
    fn stack_round_trip() {
        let stack: Stack = serde_json::from_value(json!({
            "id": "ocid1.ormstack",
            "compartmentId": "ocid1.compartment",
            "displayName": "network",
            "timeCreated": "2024-05-01T12:00:00Z",
            "lifecycleState": "ACTIVE",
            "stackDriftStatus": "IN_SYNC",
            "terraformVersion": "1.5.x",
            "variables": { "region": "us-ashburn-1" },
            "freeformTags": { "team": "infra" }
        }))
        .unwrap();
        assert_eq!(stack.stack_drift_status, Some(StackDriftStatus::InSync));

        let back: Stack = serde_json::from_str(&serde_json::to_string(&stack).unwrap()).unwrap();
        assert_eq!(back, stack);
    }

    #[test]
    fn work_request_unknown_values_map_to_sentinel() {
        let wr: WorkRequest = serde_json::from_value(json!({
            "id": "wr-1",
            "operationType": "CREATE_TEMPLATE",
            "status": "WAITING",
            "compartmentId": "ocid1.compartment",
            "percentComplete": 12.5,
            "timeAccepted": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(wr.operation_type, WorkRequestOperationType::UnknownEnumValue);
        assert_eq!(wr.status, WorkRequestStatus::UnknownEnumValue);
        assert!(wr.resources.is_empty());
    }

    #[test]
    fn log_entry_from_wire() {
        let entry: LogEntry = serde_json::from_value(json!({
            "type": "TERRAFORM_CONSOLE",
            "level": "INFO",
            "timestamp": "2024-05-01T12:00:01Z",
            "message": "Apply complete! Resources: 3 added."
        }))
        .unwrap();
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.entry_type, LogEntryType::TerraformConsole);
    }
}
