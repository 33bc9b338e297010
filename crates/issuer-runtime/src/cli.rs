//! Command line surface.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crset_bus::StepFilter;
use crset_types::LoggedPublication;
use cs_04_publication::{IssuerApi, RevokeOutcome};
use serde_json::json;

use crate::container::IssuerContainer;
use crate::import::read_status_rows;

/// CRSet revocation status issuer.
#[derive(Debug, Parser)]
#[command(name = "crset-issuer", version, about)]
pub struct Cli {
    /// JSON-RPC endpoint, overrides CRSET_RPC_URL.
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create a new valid status entry.
    CreateEntry,
    /// Revoke an entry by revocation id.
    Revoke { id: String },
    /// Seed status entries from a CSV file with `id` and `status` columns.
    Import { path: PathBuf },
    /// Print the status of an entry.
    Status { id: String },
    /// Publish the current revocation state.
    Publish,
    /// Print every publication record.
    Logs,
    /// Print the publisher address.
    Address,
    /// Publish while streaming progress events as JSON lines.
    Watch,
}

impl Command {
    /// Run the command, writing JSON to `out`.
    pub async fn execute<W: Write>(&self, container: &IssuerContainer, out: &mut W) -> Result<()> {
        let service = container.service();
        match self {
            Command::CreateEntry => {
                let entry = service
                    .create_status_entry()
                    .await
                    .context("Failed to create status entry")?;
                writeln!(out, "{}", serde_json::to_string_pretty(&entry)?)?;
            }
            Command::Revoke { id } => {
                let outcome = service
                    .revoke_outcome(id)
                    .await
                    .context("Failed to revoke credential")?;
                let result = match outcome {
                    RevokeOutcome::Revoked => "revoked",
                    RevokeOutcome::AlreadyRevoked => "alreadyRevoked",
                    RevokeOutcome::Unknown => "unknown",
                };
                writeln!(
                    out,
                    "{}",
                    json!({ "id": id, "revoked": outcome.revoked(), "result": result })
                )?;
            }
            Command::Import { path } => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                let rows = read_status_rows(BufReader::new(file))
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                let summary = service
                    .import_status_entries(rows)
                    .await
                    .context("Failed to import status entries")?;
                writeln!(out, "{}", serde_json::to_string(&summary)?)?;
            }
            Command::Status { id } => {
                let valid = service
                    .get_status(id)
                    .await
                    .with_context(|| format!("Failed to read status of {}", id))?;
                writeln!(out, "{}", json!({ "id": id, "valid": valid }))?;
            }
            Command::Publish => {
                let outcome = service.publish().await?;
                let logged = LoggedPublication {
                    log_id: outcome.log_id,
                    record: outcome.record,
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&logged)?)?;
            }
            Command::Logs => {
                let logs = service
                    .list_logs()
                    .await
                    .context("Failed to read publication log")?;
                writeln!(out, "{}", serde_json::to_string_pretty(&logs)?)?;
            }
            Command::Address => {
                writeln!(out, "{}", service.publisher_address())?;
            }
            Command::Watch => {
                let mut subscription = container.bus().subscribe(StepFilter::all());
                let publish = service.publish();
                tokio::pin!(publish);

                let result = loop {
                    tokio::select! {
                        result = &mut publish => break result,
                        Some(event) = subscription.recv() => {
                            writeln!(out, "{}", event.to_json())?;
                        }
                    }
                };
                while let Ok(Some(event)) = subscription.try_recv() {
                    writeln!(out, "{}", event.to_json())?;
                }

                let outcome = result?;
                writeln!(
                    out,
                    "{}",
                    json!({ "logId": outcome.log_id, "txHash": outcome.record.tx_hash })
                )?;
            }
        }
        Ok(())
    }
}
