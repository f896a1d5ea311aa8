//! Property-based tests for session classification and reconciliation.
//!
//! Covers scan-order independence, duplicate handling, and the
//! disjointness of orphan sessions and orphan links.

use std::collections::BTreeMap;

use proptest::prelude::*;
use session_audit_common::{reconcile, session_row, LinkRow, SessionScan, UserIds};

// =========================================================================
// Strategies
// =========================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        (0_u8..6).prop_map(|n| format!("S{n}")),
        (0_u8..6).prop_map(|n| format!("U{n}")),
    ]
}

fn arb_rows() -> impl Strategy<Value = Pairs> {
    proptest::collection::vec(
        prop_oneof![
            arb_key().prop_map(|k| (k.clone(), k)),
            (arb_key(), arb_key()),
        ],
        0..40,
    )
}

type Pairs = Vec<(String, String)>;

fn arb_rows_and_permutation() -> impl Strategy<Value = (Pairs, Pairs)> {
    arb_rows().prop_flat_map(|rows| {
        let shuffled = Just(rows.clone()).prop_shuffle();
        (Just(rows), shuffled)
    })
}

fn arb_users() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec((0_u8..6).prop_map(|n| format!("U{n}")), 0..6)
}

fn classify(rows: &[(String, String)]) -> SessionScan {
    rows.iter()
        .map(|(id, sort_id)| session_row(id, sort_id))
        .collect()
}

/// Order-insensitive view of a report: defect link lists become multisets.
#[derive(Debug, PartialEq, Eq)]
struct Fingerprint {
    sessions_without_links: Vec<String>,
    links_without_session: BTreeMap<(String, String), usize>,
    bad_user_refs: Option<BTreeMap<(String, String), usize>>,
    link_counts: BTreeMap<String, u64>,
    sessions: Vec<String>,
}

fn fingerprint(scan: &SessionScan, users: Option<&UserIds>) -> Fingerprint {
    let report = reconcile(scan, users);
    let multiset = |links: &[&LinkRow]| {
        let mut out = BTreeMap::new();
        for link in links {
            *out.entry((link.id.clone(), link.sort_id.clone())).or_insert(0) += 1;
        }
        out
    };

    let mut sessions: Vec<String> = scan.sessions.iter().cloned().collect();
    sessions.sort();

    Fingerprint {
        sessions_without_links: report.sessions_without_links.clone(),
        links_without_session: multiset(&report.links_without_session),
        bad_user_refs: report.bad_user_refs.as_deref().map(multiset),
        link_counts: scan
            .links_per_session
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect(),
        sessions,
    }
}

// =========================================================================
// Order independence
// =========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any permutation of the input yields the same classification and defects.
    #[test]
    fn prop_scan_order_independent(
        (rows, shuffled) in arb_rows_and_permutation(),
        users in arb_users(),
    ) {
        let users: UserIds = users.into_iter().collect();

        let a = classify(&rows);
        let b = classify(&shuffled);

        prop_assert_eq!(a.scanned_rows, b.scanned_rows);
        prop_assert_eq!(fingerprint(&a, None), fingerprint(&b, None));
        prop_assert_eq!(fingerprint(&a, Some(&users)), fingerprint(&b, Some(&users)));
    }

    /// Orphan sessions are never the target of an orphan link.
    #[test]
    fn prop_orphan_sessions_and_orphan_links_disjoint(rows in arb_rows()) {
        let scan = classify(&rows);
        let report = reconcile(&scan, None);

        for link in &report.links_without_session {
            prop_assert!(!report.sessions_without_links.contains(&link.id));
        }
    }

    /// Sessions and links partition the valid rows.
    #[test]
    fn prop_sessions_and_links_partition_rows(rows in arb_rows()) {
        let scan = classify(&rows);
        let self_rows = rows.iter().filter(|(id, sort_id)| id == sort_id).count();

        prop_assert_eq!(scan.scanned_rows as usize, rows.len());
        prop_assert_eq!(scan.links.len() + self_rows, rows.len());
        let total: u64 = scan.links_per_session.values().sum();
        prop_assert_eq!(total as usize, scan.links.len());
    }

    /// Repeating a session row leaves the session set unchanged; repeating
    /// a link row adds exactly one to its count.
    #[test]
    fn prop_duplicates(rows in arb_rows(), key in arb_key(), other in arb_key()) {
        prop_assume!(key != other);
        let base = classify(&rows);

        let mut with_session = rows.clone();
        with_session.push((key.clone(), key.clone()));
        with_session.push((key.clone(), key.clone()));
        let once = {
            let mut r = rows.clone();
            r.push((key.clone(), key.clone()));
            classify(&r)
        };
        prop_assert_eq!(classify(&with_session).sessions, once.sessions);

        let mut with_link = rows.clone();
        with_link.push((key.clone(), other.clone()));
        with_link.push((key.clone(), other));
        let twice = classify(&with_link);
        prop_assert_eq!(twice.link_count(&key), base.link_count(&key) + 2);
    }
}
