//! Cosmos DB container handle
//!
//! Implements [`ContainerHandle`] on top of the SDK's `ContainerClient`. Every
//! call is a single request; SDK errors are classified into
//! [`CosmosDbError`] variants by their HTTP status and returned without
//! retrying.

use crate::adapters::database::traits::ContainerHandle;
use crate::domain::{ApiError, CosmosDbError, Document, DocumentQuery, RemoteStatus, Result};
use async_trait::async_trait;
use azure_data_cosmos::clients::ContainerClient;
use azure_data_cosmos::{PartitionKey, Query};
use futures::stream::StreamExt;
use serde_json::Value;

/// Status class of an SDK error, read from its HTTP response
pub(crate) fn remote_status(error: &azure_core::Error) -> RemoteStatus {
    RemoteStatus::from_code(error.http_status().map(u16::from))
}

/// A provisioned Cosmos DB container
pub struct CosmosContainer {
    client: ContainerClient,
    name: String,
}

impl CosmosContainer {
    /// Wrap a container client
    pub fn new(client: ContainerClient, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    fn build_query(&self, query: &DocumentQuery) -> Result<Query> {
        let mut built = Query::from(query.text().to_string());
        for parameter in query.parameters() {
            built = built
                .with_parameter(parameter.name.clone(), parameter.value.clone())
                .map_err(|e| {
                    ApiError::CosmosDb(CosmosDbError::QueryFailed(format!(
                        "Invalid query parameter {} for {}: {e}",
                        parameter.name, self.name
                    )))
                })?;
        }
        Ok(built)
    }
}

#[async_trait]
impl ContainerHandle for CosmosContainer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_item(&self, document: &Document) -> Result<Value> {
        let partition_key = PartitionKey::from(document.partition_key().as_str().to_string());
        let body = document.to_value();

        self.client
            .create_item(partition_key, body.clone(), None)
            .await
            .map_err(|e| {
                ApiError::CosmosDb(CosmosDbError::from_write_error(
                    remote_status(&e),
                    format!("create {} in {}: {e}", document.id(), self.name),
                    false,
                ))
            })?;

        // Writes do not echo the body back by default; the stored document is
        // what we sent plus server system properties.
        Ok(body)
    }

    async fn upsert_item(&self, document: &Document) -> Result<Value> {
        let partition_key = PartitionKey::from(document.partition_key().as_str().to_string());
        let body = document.to_value();

        self.client
            .upsert_item(partition_key, body.clone(), None)
            .await
            .map_err(|e| {
                ApiError::CosmosDb(CosmosDbError::from_write_error(
                    remote_status(&e),
                    format!("upsert {} in {}: {e}", document.id(), self.name),
                    true,
                ))
            })?;

        Ok(body)
    }

    async fn read_item(&self, id: &str, partition_key: &str) -> Result<Value> {
        let partition_key = PartitionKey::from(partition_key.to_string());

        match self
            .client
            .read_item::<Value>(partition_key, id, None)
            .await
        {
            Ok(response) => response.into_body().map_err(|e| {
                ApiError::CosmosDb(CosmosDbError::DeserializationFailed(format!(
                    "Failed to deserialize {id} from {}: {e}",
                    self.name
                )))
            }),
            Err(e) => Err(ApiError::CosmosDb(CosmosDbError::from_read_error(
                remote_status(&e),
                format!("read {id} from {}: {e}", self.name),
            ))),
        }
    }

    async fn query_items(
        &self,
        query: &DocumentQuery,
        partition_key: Option<&str>,
    ) -> Result<Vec<Value>> {
        let built = self.build_query(query)?;

        // An empty partition key asks the gateway for a cross-partition query
        let partition_key = match partition_key {
            Some(pk) => PartitionKey::from(pk.to_string()),
            None => PartitionKey::EMPTY,
        };

        let mut pager = self
            .client
            .query_items::<Value>(built, partition_key, None)
            .map_err(|e| {
                ApiError::CosmosDb(CosmosDbError::QueryFailed(format!(
                    "Failed to create query on {}: {e}",
                    self.name
                )))
            })?;

        let mut documents = Vec::new();
        while let Some(item) = pager.next().await {
            match item {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    return Err(ApiError::CosmosDb(CosmosDbError::QueryFailed(format!(
                        "Failed to fetch query results from {}: {e}",
                        self.name
                    ))));
                }
            }
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azure_core::error::ErrorKind;
    use azure_core::http::StatusCode;
    use test_case::test_case;

    fn http_error(status: StatusCode, message: &'static str) -> azure_core::Error {
        azure_core::Error::with_message(
            ErrorKind::HttpResponse {
                status,
                error_code: None,
                raw_response: None,
            },
            message,
        )
    }

    #[test_case(StatusCode::NotFound, RemoteStatus::NotFound; "not found")]
    #[test_case(StatusCode::Conflict, RemoteStatus::Conflict; "conflict")]
    #[test_case(StatusCode::TooManyRequests, RemoteStatus::Other; "throttled")]
    #[test_case(StatusCode::ServiceUnavailable, RemoteStatus::Other; "unavailable")]
    fn test_remote_status_uses_http_status(status: StatusCode, expected: RemoteStatus) {
        assert_eq!(remote_status(&http_error(status, "request failed")), expected);
    }

    #[test]
    fn test_remote_status_ignores_message_text() {
        let err = http_error(StatusCode::ServiceUnavailable, "read order-404: NotFound");
        assert_eq!(remote_status(&err), RemoteStatus::Other);

        let err = http_error(StatusCode::TooManyRequests, "create call-4091: 409 Conflict");
        assert_eq!(remote_status(&err), RemoteStatus::Other);
    }

    #[test]
    fn test_remote_status_without_response() {
        let err = azure_core::Error::with_message(ErrorKind::Io, "connection reset 404");
        assert_eq!(remote_status(&err), RemoteStatus::Other);
    }

    #[test]
    fn test_read_of_status_like_id_is_not_swallowed() {
        let err = http_error(StatusCode::ServiceUnavailable, "service unavailable");
        let classified = CosmosDbError::from_read_error(
            remote_status(&err),
            format!("read order-404 from profiles: {err}"),
        );
        assert!(matches!(classified, CosmosDbError::ReadFailed(_)));
    }

    #[test]
    fn test_throttled_create_of_status_like_id_is_not_a_conflict() {
        let err = http_error(StatusCode::TooManyRequests, "too many requests");
        let classified = CosmosDbError::from_write_error(
            remote_status(&err),
            format!("create call-4091 in conversations: {err}"),
            false,
        );
        assert!(matches!(classified, CosmosDbError::InsertFailed(_)));
    }
}
