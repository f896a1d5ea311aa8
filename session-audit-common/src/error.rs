use std::error::Error;

#[derive(thiserror::Error, Debug)]
pub enum AuditError {
    #[error("failed to scan table {table}: {source}")]
    Storage {
        table: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error("table {0} not found")]
    TableNotFound(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("serialization failed: {0}")]
    SerializeJson(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    pub fn storage<E: Error + Send + Sync + 'static>(table: &str, err: E) -> Self {
        Self::Storage {
            table: table.to_owned(),
            source: Box::new(err),
        }
    }
}
