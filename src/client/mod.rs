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

//! Client implementations for communicating with warehouse endpoints.
//!
//! This module provides:
//! - `WarehouseClient` trait: abstract interface for warehouse backends
//! - `WarehouseHttpClient`: low-level HTTP client with retry logic
//! - `RestClient`: implementation using the statement-execution REST API
//!
//! `Connection`, `Statement`, and the metadata provider only ever see the
//! trait, which keeps them testable against mock clients.

pub mod http;
pub mod rest;

use crate::error::Result;
use crate::types::rest::{ExecuteParams, ResultManifest, StatementStatus};
use arrow_array::RecordBatch;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

pub use http::{HttpClientConfig, WarehouseHttpClient};
pub use rest::RestClient;

/// Session information returned from create_session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session_id: String,
}

/// Unified response from statement execution.
///
/// `execute_statement` polls a statement to a terminal state before
/// returning, so the status here is never `Pending` or `Running`.
#[derive(Debug, Clone)]
pub struct ExecuteResponse {
    pub statement_id: String,
    pub status: StatementStatus,
    pub manifest: Option<ResultManifest>,
    pub result: Option<ExecuteResultData>,
}

/// Result data from execution (simplified view for consumers).
#[derive(Debug, Clone, Default)]
pub struct ExecuteResultData {
    /// Row-oriented JSON rows (JSON_ARRAY format); each cell is nullable.
    pub data_array: Option<Vec<Vec<Option<String>>>>,
    /// Inline Arrow IPC bytes, already base64-decoded (ARROW_STREAM format).
    pub inline_arrow_data: Option<Vec<u8>>,
}

/// Tunables for statement polling.
#[derive(Debug, Clone)]
pub struct WarehouseClientConfig {
    /// Give up waiting for a statement after this long.
    pub poll_timeout: Duration,
    /// Delay between status polls.
    pub poll_interval: Duration,
}

impl Default for WarehouseClientConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_secs(600),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Abstract interface for warehouse backends.
///
/// This trait provides the full client abstraction for session management,
/// statement execution, and metadata enumeration. Implementations handle
/// protocol-specific details and must be safe to share behind
/// `Arc<dyn WarehouseClient>`.
#[async_trait]
pub trait WarehouseClient: Send + Sync + std::fmt::Debug {
    // --- Session Management ---

    /// Create a new session with the given catalog/schema context.
    async fn create_session(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        session_config: HashMap<String, String>,
    ) -> Result<SessionInfo>;

    /// Delete/close a session.
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    // --- Statement Execution ---

    /// Execute a SQL statement within a session, waiting for completion.
    async fn execute_statement(
        &self,
        session_id: &str,
        sql: &str,
        params: &ExecuteParams,
    ) -> Result<ExecuteResponse>;

    /// Poll statement status.
    async fn get_statement_status(&self, statement_id: &str) -> Result<ExecuteResponse>;

    /// Cancel a running statement.
    async fn cancel_statement(&self, statement_id: &str) -> Result<()>;

    /// Close/cleanup a statement (release server resources).
    async fn close_statement(&self, statement_id: &str) -> Result<()>;

    // --- Metadata Enumeration ---

    /// Run `SHOW CATALOGS` and return the result rows.
    async fn list_catalogs(&self, session_id: &str) -> Result<RecordBatch>;

    /// Run `SHOW SCHEMAS`, scoped to `catalog` when given, filtered by a
    /// SQL LIKE pattern when given.
    async fn list_schemas(
        &self,
        session_id: &str,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
    ) -> Result<RecordBatch>;

    /// Run `SHOW TABLES` with optional catalog scope and schema/table
    /// LIKE patterns.
    async fn list_tables(
        &self,
        session_id: &str,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
    ) -> Result<RecordBatch>;

    /// Run `SHOW COLUMNS` within one concrete catalog with optional
    /// schema/table/column LIKE patterns.
    async fn list_columns(
        &self,
        session_id: &str,
        catalog: &str,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        column_pattern: Option<&str>,
    ) -> Result<RecordBatch>;

    /// Run `SHOW PRIMARY KEYS` for one fully qualified table.
    async fn list_primary_keys(
        &self,
        session_id: &str,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> Result<RecordBatch>;

    /// Run `SHOW FOREIGN KEYS` for one fully qualified table.
    async fn list_foreign_keys(
        &self,
        session_id: &str,
        catalog: &str,
        schema: &str,
        table: &str,
    ) -> Result<RecordBatch>;

    /// The table types this warehouse can report.
    fn list_table_types(&self) -> Vec<String>;
}
