use std::io::Write;

use anyhow::{Context, Result};
use session_audit_aws::DynamoDbSource;
use session_audit_common::render::render;
use session_audit_common::{
    load_user_ids, reconcile, scan_sessions, AuditConfig, RowSource, Verdict,
};
use tracing::*;

pub(crate) async fn run(config: &AuditConfig) -> Result<Verdict> {
    let source = DynamoDbSource::from_config(config).await;
    audit(&source, config, &mut std::io::stdout()).await
}

/// Loads users (if configured), scans sessions, then renders the report.
/// Each stage finishes before the next one starts.
pub(crate) async fn audit<S, W>(source: &S, config: &AuditConfig, out: &mut W) -> Result<Verdict>
where
    S: RowSource + Sync + ?Sized,
    W: Write,
{
    let users = match &config.users_table {
        Some(table) => Some(
            load_user_ids(source, table)
                .await
                .with_context(|| format!("Could not load users from {table}"))?,
        ),
        None => None,
    };

    let scan = scan_sessions(source, &config.sessions_table)
        .await
        .with_context(|| format!("Could not scan sessions from {}", config.sessions_table))?;

    let report = reconcile(&scan, users.as_ref());
    let summary = &report.summary;
    info!(
        sessions_without_links = summary.sessions_without_links_count,
        links_without_session = summary.links_without_session_count,
        bad_user_refs = ?summary.bad_user_refs_count,
        "Reconciled sessions"
    );

    render(&report, config.output, config.detail(), out).context("Could not write report")?;
    out.flush().context("Could not write report")?;

    Ok(report.verdict())
}
