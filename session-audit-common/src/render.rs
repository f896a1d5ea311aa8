use std::borrow::Cow;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{AuditError, AuditReport, LinkRow, Row, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

/// How much of each offending link row to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detail {
    #[default]
    FullRow,
    IdsOnly,
}

impl Detail {
    pub fn from_ids_only(ids_only: bool) -> Self {
        if ids_only {
            Self::IdsOnly
        } else {
            Self::FullRow
        }
    }
}

pub const CSV_HEADER: [&str; 3] = ["type", "id", "sortId"];
const CSV_EOL: &str = "\r\n";

#[derive(Serialize)]
#[serde(untagged)]
enum LinkView<'a> {
    Ids {
        id: &'a str,
        #[serde(rename = "sortId")]
        sort_id: &'a str,
    },
    Row(&'a Row),
}

impl<'a> LinkView<'a> {
    fn new(link: &'a LinkRow, detail: Detail) -> Self {
        match detail {
            Detail::IdsOnly => Self::Ids {
                id: &link.id,
                sort_id: &link.sort_id,
            },
            Detail::FullRow => Self::Row(&link.row),
        }
    }
}

fn link_views<'a>(links: &[&'a LinkRow], detail: Detail) -> Vec<LinkView<'a>> {
    links.iter().map(|&link| LinkView::new(link, detail)).collect()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a Summary,
    sessions_without_links: &'a [String],
    links_without_session: Vec<LinkView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bad_user_refs: Option<Vec<LinkView<'a>>>,
}

pub fn render<W: Write>(
    report: &AuditReport<'_>,
    format: OutputFormat,
    detail: Detail,
    out: &mut W,
) -> Result<(), AuditError> {
    match format {
        OutputFormat::Json => render_json(report, detail, out),
        OutputFormat::Csv => render_csv(report, out),
    }
}

pub fn render_json<W: Write>(
    report: &AuditReport<'_>,
    detail: Detail,
    out: &mut W,
) -> Result<(), AuditError> {
    let doc = JsonReport {
        summary: &report.summary,
        sessions_without_links: &report.sessions_without_links,
        links_without_session: link_views(&report.links_without_session, detail),
        bad_user_refs: report
            .bad_user_refs
            .as_deref()
            .map(|links| link_views(links, detail)),
    };

    serde_json::to_writer_pretty(&mut *out, &doc)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// CSV only ever carries identifiers, so the detail mode does not apply.
pub fn render_csv<W: Write>(report: &AuditReport<'_>, out: &mut W) -> Result<(), AuditError> {
    write_record(out, &CSV_HEADER)?;

    for id in &report.sessions_without_links {
        write_record(out, &["session_without_links", id.as_str(), ""])?;
    }
    for link in &report.links_without_session {
        write_record(out, &["link_without_session", link.id.as_str(), link.sort_id.as_str()])?;
    }
    for link in report.bad_user_refs.iter().flatten() {
        write_record(out, &["bad_user_ref", link.id.as_str(), link.sort_id.as_str()])?;
    }
    Ok(())
}

fn write_record<W: Write>(out: &mut W, fields: &[&str]) -> Result<(), AuditError> {
    let line = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    out.write_all(line.as_bytes())?;
    out.write_all(CSV_EOL.as_bytes())?;
    Ok(())
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
