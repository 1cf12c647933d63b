//! Backup, restore and export commands.

use std::path::Path;

use ledgerdesk_server::services::BackupService;
use ledgerdesk_server::services::export::export_invoices;

use super::{CliError, open_store};

/// Copy the store's bytes to `output`.
pub async fn backup(database: &Path, output: &Path) -> Result<(), CliError> {
    let store = open_store(database).await?;
    let bytes = store.snapshot().await?;
    tokio::fs::write(output, &bytes).await?;

    tracing::info!(output = %output.display(), bytes = bytes.len(), "Backup written");
    Ok(())
}

/// Replace the store with the database file at `input`.
///
/// The upload is staged next to the store and checked before the swap.
pub async fn restore(database: &Path, input: &Path) -> Result<(), CliError> {
    let bytes = tokio::fs::read(input).await?;
    let store = open_store(database).await?;
    let staging = database.parent().unwrap_or_else(|| Path::new("."));

    BackupService::new(&store, staging)
        .restore(Some(&bytes))
        .await?;

    tracing::info!(input = %input.display(), "Store restored");
    Ok(())
}

/// Write the invoice CSV to `output`.
pub async fn export(database: &Path, output: &Path) -> Result<(), CliError> {
    let store = open_store(database).await?;
    let csv = export_invoices(&store.pool()?).await?;
    tokio::fs::write(output, csv).await?;

    tracing::info!(output = %output.display(), "Invoices exported");
    Ok(())
}
