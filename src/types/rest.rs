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

//! Request/response types for the warehouse statement-execution REST API.
//!
//! These types map directly to the JSON structures exchanged with the
//! warehouse. They are primarily used by `RestClient`.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Response from statement submission or status polling.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementResponse {
    pub statement_id: String,
    pub status: StatementStatus,
    #[serde(default)]
    pub manifest: Option<ResultManifest>,
    #[serde(default)]
    pub result: Option<ResultData>,
}

/// Status of a statement execution.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementStatus {
    pub state: StatementState,
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Possible states of a statement during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    Closed,
}

/// Error payload attached to a failed statement.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Manifest describing the result set structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultManifest {
    pub format: String,
    pub schema: ResultSchema,
    #[serde(default)]
    pub total_row_count: Option<i64>,
    /// Row count reported for DML statements. Absent when the warehouse
    /// cannot attribute a count to the statement.
    #[serde(default)]
    pub affected_rows: Option<i64>,
    #[serde(default)]
    pub truncated: bool,
    /// Compression codec used for result data ("LZ4_FRAME" or absent for none)
    #[serde(default)]
    pub result_compression: Option<String>,
}

/// Schema of the result set.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultSchema {
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

/// A single column in the result schema.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub type_name: String,
    pub position: i32,
    #[serde(default)]
    pub nullable: Option<bool>,
}

/// Result data returned inline with a statement response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultData {
    #[serde(default)]
    pub row_count: Option<i64>,
    /// Inline rows for small results in JSON format. Each cell is nullable.
    #[serde(default)]
    pub data_array: Option<Vec<Vec<Option<String>>>>,
    /// Inline Arrow IPC data (base64-encoded in JSON, decoded by serde).
    #[serde(default, deserialize_with = "deserialize_base64_attachment")]
    pub attachment: Option<Vec<u8>>,
}

/// Deserialize base64-encoded attachment field from JSON.
fn deserialize_base64_attachment<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if !s.is_empty() => STANDARD
            .decode(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Request body for statement submission.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteStatementRequest {
    pub warehouse_id: String,
    pub statement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub disposition: String, // always "INLINE"
    pub format: String,      // "ARROW_STREAM" or "JSON_ARRAY"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_wait_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_limit: Option<i64>,
}

/// Result encoding requested from the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFormat {
    /// Arrow IPC stream delivered as a base64 attachment.
    #[default]
    ArrowStream,
    /// Row-oriented JSON `data_array`, used for metadata queries.
    JsonArray,
}

impl ResultFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ArrowStream => "ARROW_STREAM",
            Self::JsonArray => "JSON_ARRAY",
        }
    }
}

/// Parameters for statement execution (passed to client methods).
#[derive(Debug, Clone, Default)]
pub struct ExecuteParams {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub format: ResultFormat,
    pub wait_timeout: Option<String>,
    pub on_wait_timeout: Option<String>, // "CONTINUE" or "CANCEL"
    pub row_limit: Option<i64>,
}

/// Compression codec for result data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionCodec {
    #[default]
    None,
    Lz4Frame,
}

impl CompressionCodec {
    /// Parse compression codec from manifest field value.
    pub fn from_manifest(value: Option<&str>) -> Self {
        match value {
            Some("LZ4_FRAME") => Self::Lz4Frame,
            _ => Self::None,
        }
    }
}

/// Request body for session creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub warehouse_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub session_config: HashMap<String, String>,
}

/// Response from session creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}
