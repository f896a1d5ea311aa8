use std::collections::HashMap;

use async_trait::async_trait;
use tracing::*;

use crate::{AuditError, Row};

/// What to read from a table.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub table: String,
    /// Fields to fetch. Empty means all fields. Sources may return more
    /// than asked for.
    pub projection: Vec<String>,
}

impl ScanRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            projection: vec![],
        }
    }

    pub fn project(mut self, fields: &[&str]) -> Self {
        self.projection = fields.iter().map(|f| (*f).to_owned()).collect();
        self
    }
}

/// One page of a scan. `next` is `None` once the table is exhausted.
#[derive(Debug)]
pub struct ScanPage<C> {
    pub rows: Vec<Row>,
    pub next: Option<C>,
}

/// A paginated full-table reader.
#[async_trait]
pub trait RowSource {
    /// Opaque continuation token handed back to the next `scan_page` call.
    type Cursor: Send;

    async fn scan_page(
        &self,
        request: &ScanRequest,
        start: Option<Self::Cursor>,
    ) -> Result<ScanPage<Self::Cursor>, AuditError>;
}

/// Drains every page of `request`, handing each row to `visit`.
/// Returns the number of rows read.
pub async fn scan_all<S, F>(
    source: &S,
    request: &ScanRequest,
    mut visit: F,
) -> Result<u64, AuditError>
where
    S: RowSource + Sync + ?Sized,
    F: FnMut(Row),
{
    let mut cursor = None;
    let mut pages = 0u64;
    let mut rows = 0u64;

    loop {
        let page = source.scan_page(request, cursor.take()).await?;
        pages += 1;
        rows += page.rows.len() as u64;
        debug!(table = %request.table, page = pages, rows = page.rows.len(), "Scanned page");

        for row in page.rows {
            visit(row);
        }

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(table = %request.table, pages, rows, "Scan complete");
    Ok(rows)
}

/// Row source backed by in-process tables, paginated like the real store.
#[derive(Debug, Clone)]
pub struct MemorySource {
    tables: HashMap<String, Vec<Row>>,
    page_size: usize,
}

impl MemorySource {
    pub fn new(page_size: usize) -> Self {
        Self {
            tables: HashMap::new(),
            page_size: page_size.max(1),
        }
    }

    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.tables.insert(name.into(), rows);
        self
    }
}

#[async_trait]
impl RowSource for MemorySource {
    type Cursor = usize;

    async fn scan_page(
        &self,
        request: &ScanRequest,
        start: Option<usize>,
    ) -> Result<ScanPage<usize>, AuditError> {
        let Some(rows) = self.tables.get(&request.table) else {
            return Err(AuditError::TableNotFound(request.table.clone()));
        };

        let start = start.unwrap_or(0).min(rows.len());
        let end = (start + self.page_size).min(rows.len());
        let page = rows[start..end]
            .iter()
            .cloned()
            .map(|row| row.project(&request.projection))
            .collect();

        Ok(ScanPage {
            rows: page,
            next: (end < rows.len()).then_some(end),
        })
    }
}
