mod config;
mod error;
mod reconcile;
pub mod render;
mod row;
mod scan;
pub mod source;
mod users;

pub use config::*;
pub use error::AuditError;
pub use reconcile::{reconcile, AuditReport, Summary, Verdict};
pub use render::{Detail, OutputFormat};
pub use row::*;
pub use scan::{scan_sessions, LinkRow, SessionScan};
pub use source::{MemorySource, RowSource, ScanPage, ScanRequest};
pub use users::{load_user_ids, UserIds};
