//! Clap derive structures for the `ocikit` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ocikit -- manage OCI load balancers and Resource Manager stacks
#[derive(Debug, Parser)]
#[command(
    name = "ocikit",
    version,
    about = "Manage OCI load balancers and Resource Manager stacks from the command line",
    long_about = "A CLI for the OCI Load Balancer and Resource Manager services.\n\n\
        Mutations can block until the resource or its work request reaches a\n\
        target state with --wait-for-state.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "OCIKIT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Region identifier (overrides profile)
    #[arg(long, short = 'r', env = "OCIKIT_REGION", global = true)]
    pub region: Option<String>,

    /// Service endpoint URL (overrides region resolution)
    #[arg(long, env = "OCIKIT_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Compartment OCID (overrides the profile default)
    #[arg(long, short = 'c', env = "OCIKIT_COMPARTMENT_ID", global = true)]
    pub compartment_id: Option<String>,

    /// Bearer auth token
    #[arg(long, env = "OCIKIT_AUTH_TOKEN", global = true, hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OCIKIT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "OCIKIT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "OCIKIT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage load balancers and their components
    #[command(alias = "load-balancer")]
    Lb(LbArgs),

    /// Manage Resource Manager stacks and jobs
    #[command(alias = "resource-manager")]
    Rm(RmArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Shared pagination arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max results per page
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Page cursor from a previous listing
    #[arg(long)]
    pub page: Option<String>,

    /// Fetch all pages automatically
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Wait controls for mutations.
#[derive(Debug, Args)]
pub struct WaitArgs {
    /// Block until this state is reached (repeatable)
    #[arg(long = "wait-for-state", value_name = "STATE")]
    pub wait_for_state: Vec<String>,

    /// Give up waiting after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub max_wait_seconds: Option<u64>,

    /// Longest pause between polls, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub wait_interval_seconds: Option<u64>,
}

/// Request body read from a JSON file.
#[derive(Debug, Args)]
pub struct FromFileArgs {
    /// Path to a JSON file with the request details
    #[arg(long, short = 'F', value_name = "PATH")]
    pub from_file: PathBuf,
}

/// Etag precondition for updates and deletes.
#[derive(Debug, Args)]
pub struct IfMatchArgs {
    /// Only proceed if the resource's etag matches
    #[arg(long, value_name = "ETAG")]
    pub if_match: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOAD BALANCER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LbArgs {
    #[command(subcommand)]
    pub command: LbCommand,
}

#[derive(Debug, Subcommand)]
pub enum LbCommand {
    /// List load balancers in a compartment
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only load balancers in this lifecycle state
        #[arg(long)]
        lifecycle_state: Option<String>,

        /// Exact display name
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Get load balancer details
    Get {
        /// Load balancer OCID
        load_balancer_id: String,
    },

    /// Create a load balancer
    Create {
        #[command(flatten)]
        body: FromFileArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Update a load balancer's name or tags
    Update {
        load_balancer_id: String,

        #[command(flatten)]
        body: FromFileArgs,

        #[command(flatten)]
        if_match: IfMatchArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Delete a load balancer
    #[command(alias = "rm")]
    Delete {
        load_balancer_id: String,

        #[command(flatten)]
        if_match: IfMatchArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Move a load balancer to another compartment
    ChangeCompartment {
        load_balancer_id: String,

        /// Destination compartment OCID
        #[arg(long)]
        to: String,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Change a load balancer's shape
    UpdateShape {
        load_balancer_id: String,

        /// New shape name (e.g. "flexible")
        #[arg(long)]
        shape: String,

        /// Minimum bandwidth for flexible shapes
        #[arg(long, requires = "max_mbps")]
        min_mbps: Option<u32>,

        /// Maximum bandwidth for flexible shapes
        #[arg(long, requires = "min_mbps")]
        max_mbps: Option<u32>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// List available shapes
    Shapes(ListArgs),

    /// Show load balancer health, or list health for the compartment
    Health {
        /// Load balancer OCID (omit to list all in the compartment)
        load_balancer_id: Option<String>,
    },

    /// Manage backend sets
    #[command(alias = "bs")]
    BackendSets(BackendSetsArgs),

    /// Manage backends
    #[command(alias = "be")]
    Backends(BackendsArgs),

    /// Manage a backend set's health checker
    HealthChecker(HealthCheckerArgs),

    /// Manage listeners
    Listeners(ListenersArgs),

    /// Manage certificates
    #[command(alias = "certs")]
    Certificates(CertificatesArgs),

    /// Inspect work requests
    #[command(alias = "wr")]
    WorkRequests(LbWorkRequestsArgs),
}

#[derive(Debug, Args)]
pub struct BackendSetsArgs {
    #[command(subcommand)]
    pub command: BackendSetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BackendSetsCommand {
    /// List backend sets of a load balancer
    #[command(alias = "ls")]
    List { load_balancer_id: String },

    /// Get backend set details
    Get {
        load_balancer_id: String,
        backend_set_name: String,
    },

    /// Create a backend set
    Create {
        load_balancer_id: String,

        #[command(flatten)]
        body: FromFileArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Replace a backend set's configuration
    Update {
        load_balancer_id: String,
        backend_set_name: String,

        #[command(flatten)]
        body: FromFileArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Delete a backend set
    #[command(alias = "rm")]
    Delete {
        load_balancer_id: String,
        backend_set_name: String,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Show backend set health
    Health {
        load_balancer_id: String,
        backend_set_name: String,
    },
}

#[derive(Debug, Args)]
pub struct BackendsArgs {
    #[command(subcommand)]
    pub command: BackendsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BackendsCommand {
    /// List backends of a backend set
    #[command(alias = "ls")]
    List {
        load_balancer_id: String,
        backend_set_name: String,
    },

    /// Get backend details
    Get {
        load_balancer_id: String,
        backend_set_name: String,
        /// Backend name, `<ip>:<port>`
        backend_name: String,
    },

    /// Add a backend server to a backend set
    Create {
        load_balancer_id: String,
        backend_set_name: String,

        /// Backend IP address
        #[arg(long)]
        ip: String,

        /// Backend port
        #[arg(long)]
        port: u16,

        /// Load balancing weight
        #[arg(long)]
        weight: Option<u32>,

        /// Only receive traffic when primaries are unhealthy
        #[arg(long)]
        backup: bool,

        /// Add the backend drained
        #[arg(long)]
        drain: bool,

        /// Add the backend offline
        #[arg(long)]
        offline: bool,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Update a backend's weight or traffic flags
    Update {
        load_balancer_id: String,
        backend_set_name: String,
        backend_name: String,

        #[arg(long)]
        weight: Option<u32>,

        #[arg(long)]
        backup: Option<bool>,

        #[arg(long)]
        drain: Option<bool>,

        #[arg(long)]
        offline: Option<bool>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Remove a backend server
    #[command(alias = "rm")]
    Delete {
        load_balancer_id: String,
        backend_set_name: String,
        backend_name: String,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Show backend health
    Health {
        load_balancer_id: String,
        backend_set_name: String,
        backend_name: String,
    },
}

#[derive(Debug, Args)]
pub struct HealthCheckerArgs {
    #[command(subcommand)]
    pub command: HealthCheckerCommand,
}

#[derive(Debug, Subcommand)]
pub enum HealthCheckerCommand {
    /// Show the health checker of a backend set
    Get {
        load_balancer_id: String,
        backend_set_name: String,
    },

    /// Replace the health checker of a backend set
    Update {
        load_balancer_id: String,
        backend_set_name: String,

        #[command(flatten)]
        body: FromFileArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[derive(Debug, Args)]
pub struct ListenersArgs {
    #[command(subcommand)]
    pub command: ListenersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ListenersCommand {
    /// Create a listener
    Create {
        load_balancer_id: String,

        #[command(flatten)]
        body: FromFileArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Replace a listener's configuration
    Update {
        load_balancer_id: String,
        listener_name: String,

        #[command(flatten)]
        body: FromFileArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Delete a listener
    #[command(alias = "rm")]
    Delete {
        load_balancer_id: String,
        listener_name: String,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[derive(Debug, Args)]
pub struct CertificatesArgs {
    #[command(subcommand)]
    pub command: CertificatesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CertificatesCommand {
    /// List certificate bundles of a load balancer
    #[command(alias = "ls")]
    List { load_balancer_id: String },

    /// Upload a certificate bundle
    Create {
        load_balancer_id: String,

        #[command(flatten)]
        body: FromFileArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Delete a certificate bundle
    #[command(alias = "rm")]
    Delete {
        load_balancer_id: String,
        certificate_name: String,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[derive(Debug, Args)]
pub struct LbWorkRequestsArgs {
    #[command(subcommand)]
    pub command: LbWorkRequestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LbWorkRequestsCommand {
    /// List work requests of a load balancer
    #[command(alias = "ls")]
    List {
        load_balancer_id: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Get work request details
    Get { work_request_id: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCE MANAGER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RmArgs {
    #[command(subcommand)]
    pub command: RmCommand,
}

#[derive(Debug, Subcommand)]
pub enum RmCommand {
    /// Manage stacks
    Stacks(StacksArgs),

    /// Manage jobs
    Jobs(JobsArgs),

    /// Inspect work requests
    #[command(alias = "wr")]
    WorkRequests(RmWorkRequestsArgs),

    /// List supported Terraform versions
    TerraformVersions,
}

#[derive(Debug, Args)]
pub struct StacksArgs {
    #[command(subcommand)]
    pub command: StacksCommand,
}

#[derive(Debug, Subcommand)]
pub enum StacksCommand {
    /// List stacks in a compartment
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only stacks in this lifecycle state
        #[arg(long)]
        lifecycle_state: Option<String>,

        /// Exact display name
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Get stack details
    Get { stack_id: String },

    /// Create a stack
    Create {
        #[command(flatten)]
        body: FromFileArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Update a stack
    Update {
        stack_id: String,

        #[command(flatten)]
        body: FromFileArgs,

        #[command(flatten)]
        if_match: IfMatchArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Delete a stack
    #[command(alias = "rm")]
    Delete {
        stack_id: String,

        #[command(flatten)]
        if_match: IfMatchArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Move a stack to another compartment
    ChangeCompartment {
        stack_id: String,

        /// Destination compartment OCID
        #[arg(long)]
        to: String,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Start drift detection on a stack
    DetectDrift {
        stack_id: String,

        /// Limit detection to these resource addresses (repeatable)
        #[arg(long = "resource-address")]
        resource_addresses: Vec<String>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Download the stack's Terraform configuration zip
    TfConfig {
        stack_id: String,

        /// Output file
        #[arg(long, short = 'O')]
        out: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub command: JobsCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum JobKind {
    Plan,
    Apply,
    Destroy,
}

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List jobs of a stack or compartment
    #[command(alias = "ls")]
    List {
        /// Only jobs of this stack
        #[arg(long)]
        stack_id: Option<String>,

        #[command(flatten)]
        list: ListArgs,

        /// Only jobs in this lifecycle state
        #[arg(long)]
        lifecycle_state: Option<String>,
    },

    /// Get job details
    Get { job_id: String },

    /// Run a plan, apply, or destroy job on a stack
    Create {
        #[arg(long)]
        stack_id: String,

        #[arg(long, value_enum)]
        operation: JobKind,

        /// Apply a previous plan job instead of auto-approving
        #[arg(long)]
        plan_job_id: Option<String>,

        #[arg(long)]
        display_name: Option<String>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Cancel a running job
    Cancel {
        job_id: String,

        /// Terminate immediately instead of after the current step
        #[arg(long)]
        force: bool,
    },

    /// Show job log entries
    Logs {
        job_id: String,

        /// Minimum level (e.g. INFO, ERROR)
        #[arg(long)]
        level: Option<String>,

        /// Print the raw log instead of entries
        #[arg(long)]
        raw: bool,
    },

    /// Download the Terraform state produced by a job
    TfState {
        job_id: String,

        /// Output file
        #[arg(long, short = 'O')]
        out: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct RmWorkRequestsArgs {
    #[command(subcommand)]
    pub command: RmWorkRequestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RmWorkRequestsCommand {
    /// List work requests in a compartment
    #[command(alias = "ls")]
    List {
        /// Only work requests affecting this resource
        #[arg(long)]
        resource_id: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Get work request details
    Get { work_request_id: String },

    /// List errors of a work request
    Errors { work_request_id: String },

    /// List log messages of a work request
    Logs { work_request_id: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an auth token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
