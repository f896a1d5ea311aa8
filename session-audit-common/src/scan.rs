use std::collections::{HashMap, HashSet};

use tracing::*;

use crate::source::{scan_all, RowSource, ScanRequest};
use crate::{AuditError, Row, ID_FIELD, SORT_ID_FIELD};

/// A session-table row whose `id` and `sortId` differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub id: String,
    pub sort_id: String,
    pub row: Row,
}

/// Everything learned from one pass over the session table.
#[derive(Debug, Clone, Default)]
pub struct SessionScan {
    pub sessions: HashSet<String>,
    pub links: Vec<LinkRow>,
    pub links_per_session: HashMap<String, u64>,
    pub scanned_rows: u64,
}

impl SessionScan {
    /// Classifies a single row. Rows lacking a scalar `id` or `sortId` are
    /// dropped without being counted.
    pub fn observe(&mut self, row: Row) {
        let (Some(id), Some(sort_id)) = (row.attr_str(ID_FIELD), row.attr_str(SORT_ID_FIELD))
        else {
            trace!(?row, "Skipping row without scalar keys");
            return;
        };
        let (id, sort_id) = (id.to_owned(), sort_id.to_owned());

        self.scanned_rows += 1;

        if id == sort_id {
            self.sessions.insert(id);
        } else {
            *self.links_per_session.entry(id.clone()).or_default() += 1;
            self.links.push(LinkRow { id, sort_id, row });
        }
    }

    pub fn link_count(&self, session_id: &str) -> u64 {
        self.links_per_session.get(session_id).copied().unwrap_or(0)
    }
}

impl FromIterator<Row> for SessionScan {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        let mut scan = Self::default();
        for row in iter {
            scan.observe(row);
        }
        scan
    }
}

/// Reads the whole session table and classifies every row.
pub async fn scan_sessions<S>(source: &S, table: &str) -> Result<SessionScan, AuditError>
where
    S: RowSource + Sync + ?Sized,
{
    let mut scan = SessionScan::default();
    let request = ScanRequest::new(table).project(&[ID_FIELD, SORT_ID_FIELD]);
    let read = scan_all(source, &request, |row| scan.observe(row)).await?;

    info!(
        table,
        read,
        valid = scan.scanned_rows,
        sessions = scan.sessions.len(),
        links = scan.links.len(),
        "Scanned sessions"
    );
    Ok(scan)
}
