use std::collections::HashSet;

use tracing::*;

use crate::source::{scan_all, RowSource, ScanRequest};
use crate::{AuditError, Row, ID_FIELD};

/// Identifiers of every known user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIds(HashSet<String>);

impl UserIds {
    /// Records the row's `id`. Rows without a scalar `id` are ignored.
    pub fn observe(&mut self, row: &Row) {
        if let Some(id) = row.attr_str(ID_FIELD) {
            self.0.insert(id.to_owned());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for UserIds {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Reads the whole user table and collects its identifiers.
pub async fn load_user_ids<S>(source: &S, table: &str) -> Result<UserIds, AuditError>
where
    S: RowSource + Sync + ?Sized,
{
    let mut users = UserIds::default();
    let request = ScanRequest::new(table).project(&[ID_FIELD]);
    let scanned = scan_all(source, &request, |row| users.observe(&row)).await?;

    info!(table, scanned, users = users.len(), "Loaded user identifiers");
    Ok(users)
}
