// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! REST client for the warehouse statement-execution API.
//!
//! This module implements the `WarehouseClient` trait against the JSON/REST
//! endpoints: session lifecycle, statement submission with polling, and the
//! SHOW commands backing metadata queries.

use crate::client::{
    ExecuteResponse, ExecuteResultData, SessionInfo, WarehouseClient, WarehouseClientConfig,
    WarehouseHttpClient,
};
use crate::error::{Result, WarehouseErrorHelper};
use crate::metadata::results;
use crate::metadata::sql::SqlCommandBuilder;
use crate::types::rest::{
    CreateSessionRequest, CreateSessionResponse, ExecuteParams, ExecuteStatementRequest,
    ResultData, ResultFormat, StatementResponse, StatementState,
};
use arrow_array::RecordBatch;
use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Table types reported by the warehouse.
const TABLE_TYPES: [&str; 4] = ["TABLE", "VIEW", "SYSTEM TABLE", "MATERIALIZED VIEW"];

/// Client for the warehouse statement-execution REST API.
#[derive(Debug)]
pub struct RestClient {
    http_client: Arc<WarehouseHttpClient>,
    host: String,
    warehouse_id: String,
    config: WarehouseClientConfig,
}

impl RestClient {
    /// Create a new REST client.
    pub fn new(
        http_client: Arc<WarehouseHttpClient>,
        host: impl Into<String>,
        warehouse_id: impl Into<String>,
        config: WarehouseClientConfig,
    ) -> Self {
        Self {
            http_client,
            host: host.into(),
            warehouse_id: warehouse_id.into(),
            config,
        }
    }

    /// Build the base URL for API requests.
    fn base_url(&self) -> String {
        format!("{}/api/v1", self.host.trim_end_matches('/'))
    }

    /// Convert an API result payload to internal ExecuteResultData.
    fn convert_result_data(result: &ResultData) -> ExecuteResultData {
        ExecuteResultData {
            data_array: result.data_array.clone(),
            inline_arrow_data: result.attachment.clone(),
        }
    }

    /// Convert an API response to internal ExecuteResponse.
    fn convert_response(response: StatementResponse) -> ExecuteResponse {
        let result = response.result.as_ref().map(Self::convert_result_data);

        ExecuteResponse {
            statement_id: response.statement_id,
            status: response.status,
            manifest: response.manifest,
            result,
        }
    }

    /// Wait for statement to complete, polling status.
    async fn wait_for_completion(&self, response: ExecuteResponse) -> Result<ExecuteResponse> {
        let start = std::time::Instant::now();
        let mut current_response = response;

        loop {
            match current_response.status.state {
                StatementState::Succeeded => return Ok(current_response),
                StatementState::Failed => {
                    let error_msg = current_response
                        .status
                        .error
                        .as_ref()
                        .and_then(|e| e.message.clone())
                        .unwrap_or_else(|| "Unknown error".to_string());
                    return Err(WarehouseErrorHelper::io().message(error_msg));
                }
                StatementState::Canceled => {
                    return Err(
                        WarehouseErrorHelper::invalid_state().message("Statement was canceled")
                    );
                }
                StatementState::Closed => {
                    // Closed with result data is valid for inline results, the server
                    // delivers the data and immediately closes the statement since no
                    // further fetching is needed.
                    if current_response.result.is_some() {
                        debug!("Statement closed with inline result data - treating as success");
                        return Ok(current_response);
                    }
                    return Err(
                        WarehouseErrorHelper::invalid_state().message("Statement was closed")
                    );
                }
                StatementState::Pending | StatementState::Running => {
                    if start.elapsed() > self.config.poll_timeout {
                        return Err(
                            WarehouseErrorHelper::io().message("Statement execution timed out")
                        );
                    }

                    tokio::time::sleep(self.config.poll_interval).await;

                    debug!(
                        "Polling statement status: {}",
                        current_response.statement_id
                    );
                    current_response = self
                        .get_statement_status(&current_response.statement_id)
                        .await?;
                }
            }
        }
    }

    /// Call the execute statement API endpoint (without polling).
    async fn call_execute_api(
        &self,
        session_id: &str,
        sql: &str,
        params: &ExecuteParams,
    ) -> Result<ExecuteResponse> {
        let url = format!("{}/statements", self.base_url());

        let request_body = ExecuteStatementRequest {
            warehouse_id: self.warehouse_id.clone(),
            statement: sql.to_string(),
            session_id: Some(session_id.to_string()),
            catalog: params.catalog.clone(),
            schema: params.schema.clone(),
            disposition: "INLINE".to_string(),
            format: params.format.as_str().to_string(),
            wait_timeout: params.wait_timeout.clone(),
            on_wait_timeout: params.on_wait_timeout.clone(),
            row_limit: params.row_limit,
        };

        debug!("Executing statement at {}: {}", url, sql);

        let request = self
            .http_client
            .inner()
            .request(Method::POST, &url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .build()
            .map_err(|e| {
                WarehouseErrorHelper::io().message(format!("Failed to build request: {}", e))
            })?;

        let response = self.http_client.execute(request).await?;
        let body = response.text().await.map_err(|e| {
            WarehouseErrorHelper::io().message(format!("Failed to read response: {}", e))
        })?;

        let api_response: StatementResponse = serde_json::from_str(&body).map_err(|e| {
            WarehouseErrorHelper::io().message(format!(
                "Failed to parse execute response: {} - body: {}",
                e, body
            ))
        })?;

        debug!(
            "Execute response: statement_id={}, status={:?}",
            api_response.statement_id, api_response.status.state
        );

        Ok(Self::convert_response(api_response))
    }

    /// Execute a metadata SHOW command and collect the JSON rows into a batch.
    async fn execute_metadata_query(&self, session_id: &str, sql: &str) -> Result<RecordBatch> {
        let params = ExecuteParams {
            format: ResultFormat::JsonArray,
            wait_timeout: Some("30s".to_string()),
            on_wait_timeout: Some("CONTINUE".to_string()),
            ..Default::default()
        };

        let response = self.call_execute_api(session_id, sql, &params).await?;
        let response = self.wait_for_completion(response).await?;

        results::response_to_batch(&response)
    }
}

#[async_trait]
impl WarehouseClient for RestClient {
    async fn create_session(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        session_config: HashMap<String, String>,
    ) -> Result<SessionInfo> {
        let url = format!("{}/sessions", self.base_url());

        let request_body = CreateSessionRequest {
            warehouse_id: self.warehouse_id.clone(),
            catalog: catalog.map(|s| s.to_string()),
            schema: schema.map(|s| s.to_string()),
            session_config,
        };

        debug!("Creating session at {}", url);

        let request = self
            .http_client
            .inner()
            .request(Method::POST, &url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .build()
            .map_err(|e| {
                WarehouseErrorHelper::io().message(format!("Failed to build request: {}", e))
            })?;

        let response = self.http_client.execute(request).await?;
        let body = response.text().await.map_err(|e| {
            WarehouseErrorHelper::io().message(format!("Failed to read response: {}", e))
        })?;

        let session_response: CreateSessionResponse = serde_json::from_str(&body).map_err(|e| {
            WarehouseErrorHelper::io().message(format!(
                "Failed to parse session response: {} - body: {}",
                e, body
            ))
        })?;

        debug!("Created session: {}", session_response.session_id);

        Ok(SessionInfo {
            session_id: session_response.session_id,
        })
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = format!("{}/sessions/{}", self.base_url(), session_id);

        debug!("Deleting session at {}", url);

        let request = self
            .http_client
            .inner()
            .request(Method::DELETE, &url)
            .build()
            .map_err(|e| {
                WarehouseErrorHelper::io().message(format!("Failed to build request: {}", e))
            })?;

        // Ignore errors on session deletion (best effort cleanup)
        let _ = self.http_client.execute(request).await;

        debug!("Deleted session: {}", session_id);

        Ok(())
    }

    async fn execute_statement(
        &self,
        session_id: &str,
        sql: &str,
        params: &ExecuteParams,
    ) -> Result<ExecuteResponse> {
        let response = self.call_execute_api(session_id, sql, params).await?;
        self.wait_for_completion(response).await
    }

    async fn get_statement_status(&self, statement_id: &str) -> Result<ExecuteResponse> {
        let url = format!("{}/statements/{}", self.base_url(), statement_id);

        debug!("Getting statement status at {}", url);

        let request = self
            .http_client
            .inner()
            .request(Method::GET, &url)
            .build()
            .map_err(|e| {
                WarehouseErrorHelper::io().message(format!("Failed to build request: {}", e))
            })?;

        let response = self.http_client.execute(request).await?;
        let body = response.text().await.map_err(|e| {
            WarehouseErrorHelper::io().message(format!("Failed to read response: {}", e))
        })?;

        let api_response: StatementResponse = serde_json::from_str(&body).map_err(|e| {
            WarehouseErrorHelper::io().message(format!(
                "Failed to parse status response: {} - body: {}",
                e, body
            ))
        })?;

        debug!(
            "Status response: statement_id={}, status={:?}",
            api_response.statement_id, api_response.status.state
        );

        Ok(Self::convert_response(api_response))
    }

    async fn cancel_statement(&self, statement_id: &str) -> Result<()> {
        let url = format!("{}/statements/{}/cancel", self.base_url(), statement_id);

        debug!("Canceling statement at {}", url);

        let request = self
            .http_client
            .inner()
            .request(Method::POST, &url)
            .build()
            .map_err(|e| {
                WarehouseErrorHelper::io().message(format!("Failed to build request: {}", e))
            })?;

        self.http_client.execute(request).await?;

        debug!("Canceled statement: {}", statement_id);

        Ok(())
    }

    async fn close_statement(&self, statement_id: &str) -> Result<()> {
        let url = format!("{}/statements/{}", self.base_url(), statement_id);

        debug!("Closing statement at {}", url);

        let request = self
            .http_client
            .inner()
            .request(Method::DELETE, &url)
            .build()
            .map_err(|e| {
                WarehouseErrorHelper::io().message(format!("Failed to build request: {}", e))
            })?;

        // Ignore errors on statement close (best effort cleanup)
        let _ = self.http_client.execute(request).await;

        debug!("Closed statement: {}", statement_id);

        Ok(())
    }

    async fn list_catalogs(&self, session_id: &str) -> Result<RecordBatch> {
        let sql = SqlCommandBuilder::new().build_show_catalogs();
        self.execute_metadata_query(session_id, &sql).await
    }

    async fn list_schemas(
        &self,
        session_id: &str,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
    ) -> Result<RecordBatch> {
        let sql = SqlCommandBuilder::new()
            .with_catalog(catalog)
            .with_schema_pattern(schema_pattern)
            .build_show_schemas();
        self.execute_metadata_query(session_id, &sql).await
    }

    async fn list_tables(
        &self,
        session_id: &str,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
    ) -> Result<RecordBatch> {
        let sql = SqlCommandBuilder::new()
            .with_catalog(catalog)
            .with_schema_pattern(schema_pattern)
            .with_table_pattern(table_pattern)
            .build_show_tables();
        self.execute_metadata_query(session_id, &sql).await
    }

    async fn list_columns(
        &self,
        session_id: &str,
        catalog: &str,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        column_pattern: Option<&str>,
    ) -> Result<RecordBatch> {
        let sql = SqlCommandBuilder::new()
            .with_catalog(Some(catalog))
            .with_schema_pattern(schema_pattern)
            .with_table_pattern(table_pattern)
            .with_column_pattern(column_pattern)
            .build_show_columns()?;
        self.execute_metadata_query(session_id, &sql).await
    }

    async fn list_primary_keys(
        &self,
        session_id: &str,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> Result<RecordBatch> {
        let sql = SqlCommandBuilder::build_show_primary_keys(catalog, schema, table);
        self.execute_metadata_query(session_id, &sql).await
    }

    async fn list_foreign_keys(
        &self,
        session_id: &str,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> Result<RecordBatch> {
        let sql = SqlCommandBuilder::build_show_foreign_keys(catalog, schema, table);
        self.execute_metadata_query(session_id, &sql).await
    }

    fn list_table_types(&self) -> Vec<String> {
        TABLE_TYPES.iter().map(|s| s.to_string()).collect()
    }
}
