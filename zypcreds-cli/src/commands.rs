use std::process::ExitCode;

use serde::Serialize;
use zypcreds_core::{CallOutcome, NormalizedResult, ZypCredsClient};

use crate::cli::{Command, ListAction};

#[derive(Serialize)]
struct Report<'a> {
    status: u16,
    has_data: bool,
    result: &'a NormalizedResult,
}

/// Runs `command` and prints its outcome. Exits non-zero when the service
/// reports a failure.
pub async fn run(client: &ZypCredsClient, command: Command, raw: bool) -> eyre::Result<ExitCode> {
    let outcome = match command {
        Command::RequestVerification { index, country, ip } => {
            client.request_verification(&index, country, ip).await?
        }
        Command::AttemptVerification { index, code, ip } => {
            client.attempt_verification(&index, &code, ip).await?
        }
        Command::CheckToken { index, token } => client.check_token(&index, &token).await?,
        Command::Whitelist { action } => match action {
            ListAction::Get => client.get_whitelist().await?,
            ListAction::Add { index } => client.add_to_whitelist(&index).await?,
            ListAction::Delete { index } => client.delete_from_whitelist(&index).await?,
        },
        Command::Blacklist { action } => match action {
            ListAction::Get => client.get_blacklist().await?,
            ListAction::Add { index } => client.add_to_blacklist(&index).await?,
            ListAction::Delete { index } => client.delete_from_blacklist(&index).await?,
        },
    };

    println!("{}", render(&outcome, raw)?);
    Ok(exit_code(&outcome.result))
}

fn render(outcome: &CallOutcome, raw: bool) -> eyre::Result<String> {
    if raw {
        return Ok(String::from_utf8_lossy(&outcome.raw).into_owned());
    }
    let report = Report {
        status: outcome.status,
        has_data: outcome.has_data,
        result: &outcome.result,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn exit_code(result: &NormalizedResult) -> ExitCode {
    if result.succeeded() == Some(false) {
        tracing::warn!(
            error_number = ?result.error_number,
            error_description = ?result.error_description,
            "service rejected the request"
        );
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}
