use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use session_audit_common::{AuditConfig, AuditError, RowSource, ScanPage, ScanRequest};
use tracing::*;

use crate::convert::row_from_item;

/// Reads tables with paginated DynamoDB `Scan` calls.
#[derive(Clone, Debug)]
pub struct DynamoDbSource {
    client: Client,
}

impl DynamoDbSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client for the configured region and profile. Throttling and
    /// transient failures are retried by the SDK up to `max_attempts`.
    pub async fn from_config(config: &AuditConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts));
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        debug!(
            region = %config.region,
            profile = ?config.profile,
            max_attempts = config.max_attempts,
            "Created DynamoDB client"
        );
        Self::new(Client::new(&sdk_config))
    }
}

/// `id` is a DynamoDB reserved word, so every projected field goes
/// through a placeholder.
fn projection_expression(fields: &[String]) -> (String, HashMap<String, String>) {
    let names: HashMap<String, String> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| (format!("#f{i}"), field.clone()))
        .collect();
    let expression = (0..fields.len())
        .map(|i| format!("#f{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    (expression, names)
}

#[async_trait]
impl RowSource for DynamoDbSource {
    type Cursor = HashMap<String, AttributeValue>;

    async fn scan_page(
        &self,
        request: &ScanRequest,
        start: Option<Self::Cursor>,
    ) -> Result<ScanPage<Self::Cursor>, AuditError> {
        let mut scan = self
            .client
            .scan()
            .table_name(&request.table)
            .set_exclusive_start_key(start);

        if !request.projection.is_empty() {
            let (expression, names) = projection_expression(&request.projection);
            scan = scan
                .projection_expression(expression)
                .set_expression_attribute_names(Some(names));
        }

        let output = scan.send().await.map_err(|error| {
            error!(table = %request.table, error = %DisplayErrorContext(&error), "Scan failed");
            AuditError::storage(&request.table, error)
        })?;

        let rows = output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(row_from_item)
            .collect();

        Ok(ScanPage {
            rows,
            next: output.last_evaluated_key.filter(|key| !key.is_empty()),
        })
    }
}
