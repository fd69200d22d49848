//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use strum::VariantNames;

use ocikit_api::enums::parse_enum;
use ocikit_api::{ApiResponse, Pagination, RequestOptions};

use crate::cli::{IfMatchArgs, ListArgs};
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON request body for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

/// Parse optional enum input from a flag.
pub fn parse_opt<E>(parameter: &'static str, value: Option<&str>) -> Result<Option<E>, CliError>
where
    E: FromStr + AsRef<str> + VariantNames,
{
    Ok(value.map(|v| parse_enum(parameter, v)).transpose()?)
}

/// Parse `--wait-for-state` values.
pub fn parse_targets<E>(values: &[String]) -> Result<Vec<E>, CliError>
where
    E: FromStr + AsRef<str> + VariantNames,
{
    values
        .iter()
        .map(|v| parse_enum("wait-for-state", v).map_err(CliError::from))
        .collect()
}

/// First page request from list flags.
pub fn pagination(list: &ListArgs) -> Pagination {
    Pagination {
        limit: list.limit,
        page: list.page.clone(),
    }
}

/// Options carrying an `--if-match` etag.
pub fn if_match(args: &IfMatchArgs) -> RequestOptions {
    RequestOptions {
        if_match: args.if_match.clone(),
        ..RequestOptions::default()
    }
}

/// Report the cursor of a truncated listing on stderr.
pub fn next_page_hint<T>(response: &ApiResponse<T>, quiet: bool) {
    if let Some(ref next) = response.headers.opc_next_page {
        output::notice(&format!("More results: --page {next}"), quiet);
    }
}

/// Report an accepted asynchronous mutation.
pub fn accepted<T>(what: &str, response: &ApiResponse<T>, quiet: bool) {
    match response.headers.opc_work_request_id {
        Some(ref id) => output::notice(&format!("{what} accepted (work request {id})"), quiet),
        None => output::notice(&format!("{what} accepted"), quiet),
    }
}
