use serde::Serialize;

use crate::{LinkRow, SessionScan, UserIds};

/// Counts reported alongside the defect lists. The user-related counts are
/// `None` when no user table was audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub sessions_count: usize,
    pub link_items_count: usize,
    pub sessions_without_links_count: usize,
    pub links_without_session_count: usize,
    pub users_count: Option<usize>,
    pub bad_user_refs_count: Option<usize>,
    pub scanned_rows_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Clean,
    Dirty,
}

#[derive(Debug, Clone)]
pub struct AuditReport<'a> {
    pub summary: Summary,
    /// Sessions that no link row points at, sorted.
    pub sessions_without_links: Vec<String>,
    /// Link rows pointing at a session that does not exist, in scan order.
    pub links_without_session: Vec<&'a LinkRow>,
    /// Link rows whose `sortId` is not a known user, in scan order.
    /// `None` when no user table was audited.
    pub bad_user_refs: Option<Vec<&'a LinkRow>>,
}

impl AuditReport<'_> {
    pub fn verdict(&self) -> Verdict {
        let dirty = !self.sessions_without_links.is_empty()
            || !self.links_without_session.is_empty()
            || self.bad_user_refs.as_ref().is_some_and(|refs| !refs.is_empty());

        if dirty {
            Verdict::Dirty
        } else {
            Verdict::Clean
        }
    }
}

pub fn reconcile<'a>(scan: &'a SessionScan, users: Option<&UserIds>) -> AuditReport<'a> {
    let mut sessions_without_links: Vec<String> = scan
        .sessions
        .iter()
        .filter(|id| scan.link_count(id) == 0)
        .cloned()
        .collect();
    sessions_without_links.sort_unstable();

    let links_without_session: Vec<&LinkRow> = scan
        .links
        .iter()
        .filter(|link| !scan.sessions.contains(&link.id))
        .collect();

    let bad_user_refs: Option<Vec<&LinkRow>> = users.map(|users| {
        scan.links
            .iter()
            .filter(|link| !users.contains(&link.sort_id))
            .collect()
    });

    let summary = Summary {
        sessions_count: scan.sessions.len(),
        link_items_count: scan.links.len(),
        sessions_without_links_count: sessions_without_links.len(),
        links_without_session_count: links_without_session.len(),
        users_count: users.map(UserIds::len),
        bad_user_refs_count: bad_user_refs.as_ref().map(Vec::len),
        scanned_rows_count: scan.scanned_rows,
    };

    AuditReport {
        summary,
        sessions_without_links,
        links_without_session,
        bad_user_refs,
    }
}
