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

//! Result readers for fetching query results from the warehouse.
//!
//! This module provides:
//! - `reader_for_response`: Creates the appropriate reader for a statement response
//! - `InlineArrowReader`: Handles inline Arrow data embedded in responses
//! - `RowSetReader`: Handles JSON row data embedded in responses
//! - `ResultReaderAdapter`: Bridges `ResultReader` to arrow's `RecordBatchReader`

pub mod inline;

use crate::client::ExecuteResponse;
use crate::error::{Result, WarehouseErrorHelper};
use crate::metadata::results;
use crate::types::rest::{CompressionCodec, ResultManifest, StatementState};
use arrow_array::RecordBatch;
use arrow_schema::{ArrowError, Schema, SchemaRef};
use std::sync::Arc;

pub use inline::InlineArrowReader;

/// Trait for result readers.
pub trait ResultReader: Send {
    /// Get the schema of the result.
    fn schema(&self) -> Result<SchemaRef>;

    /// Get the next record batch, or None if end of results.
    fn next_batch(&mut self) -> Result<Option<RecordBatch>>;
}

/// Create a reader from a statement execution response.
///
/// Selects inline Arrow, JSON rows, or an empty reader based on what the
/// response carries. The response must be in a terminal state.
pub(crate) fn reader_for_response(
    response: &ExecuteResponse,
) -> Result<Box<dyn ResultReader + Send>> {
    if let Some(ref manifest) = response.manifest {
        tracing::debug!(
            "Result manifest: format={}, total_rows={:?}, truncated={}",
            manifest.format,
            manifest.total_row_count,
            manifest.truncated
        );
    }

    let compression = CompressionCodec::from_manifest(
        response
            .manifest
            .as_ref()
            .and_then(|m| m.result_compression.as_deref()),
    );

    if let Some(ref result) = response.result {
        // Priority 1: inline Arrow (ARROW_STREAM format)
        if let Some(ref inline_data) = result.inline_arrow_data {
            if !inline_data.is_empty() {
                tracing::debug!(
                    "Using inline Arrow reader: {} bytes, compression={:?}",
                    inline_data.len(),
                    compression
                );
                return Ok(Box::new(InlineArrowReader::new(inline_data, compression)?));
            }
        }

        // Priority 2: JSON rows (JSON_ARRAY format)
        if let Some(ref rows) = result.data_array {
            let manifest = response
                .manifest
                .as_ref()
                .ok_or_else(|| WarehouseErrorHelper::io().message("No result manifest available"))?;
            tracing::debug!("Using row set reader: {} rows", rows.len());
            return Ok(Box::new(RowSetReader::new(rows, manifest)?));
        }
    }

    // No result data - check if this is a valid empty result or an error state
    match response.status.state {
        StatementState::Succeeded | StatementState::Closed => {
            // Valid empty result set - extract schema from manifest
            // Note: Closed state is valid for inline results where the server delivers
            // the data (or empty result) and immediately closes the statement.
            tracing::debug!(
                "Using empty reader: no result data present for {:?} statement",
                response.status.state
            );
            let schema = schema_for_empty_result(response.manifest.as_ref());
            Ok(Box::new(EmptyReader::new(schema)))
        }
        StatementState::Pending | StatementState::Running => {
            Err(WarehouseErrorHelper::invalid_state()
                .message("Statement is still executing. Poll for completion first."))
        }
        StatementState::Failed => {
            let error_msg = response
                .status
                .error
                .as_ref()
                .and_then(|e| e.message.as_deref())
                .unwrap_or("Unknown error");
            Err(WarehouseErrorHelper::io().message(format!("Statement failed: {}", error_msg)))
        }
        StatementState::Canceled => {
            Err(WarehouseErrorHelper::io().message("Statement was canceled"))
        }
    }
}

/// Schema for an empty result, falling back to an empty schema when the
/// manifest is absent.
fn schema_for_empty_result(manifest: Option<&ResultManifest>) -> SchemaRef {
    match manifest {
        Some(manifest) => results::schema_from_manifest(manifest),
        None => {
            tracing::warn!("No manifest available for empty result set, using empty schema");
            Arc::new(Schema::empty())
        }
    }
}

/// Reader for JSON row data.
///
/// JSON_ARRAY results arrive fully materialized in the response, so the rows
/// are transposed into a single batch upfront and served once.
pub struct RowSetReader {
    schema: SchemaRef,
    batch: Option<RecordBatch>,
}

impl RowSetReader {
    fn new(rows: &[Vec<Option<String>>], manifest: &ResultManifest) -> Result<Self> {
        let schema = results::schema_from_manifest(manifest);
        let batch = results::data_array_to_batch(rows, &schema)?;
        // data_array_to_batch narrows field types while parsing, keep its schema
        let schema = batch.schema();
        Ok(Self {
            schema,
            batch: Some(batch),
        })
    }
}

impl ResultReader for RowSetReader {
    fn schema(&self) -> Result<SchemaRef> {
        Ok(self.schema.clone())
    }

    fn next_batch(&mut self) -> Result<Option<RecordBatch>> {
        Ok(self.batch.take())
    }
}

/// Empty reader for queries with no results.
///
/// Used for valid queries that return zero rows (e.g., `SELECT * WHERE 1=0`).
/// The schema is preserved from the query's manifest.
pub struct EmptyReader {
    schema: SchemaRef,
}

impl EmptyReader {
    fn new(schema: SchemaRef) -> Self {
        Self { schema }
    }
}

impl ResultReader for EmptyReader {
    fn schema(&self) -> Result<SchemaRef> {
        Ok(self.schema.clone())
    }

    fn next_batch(&mut self) -> Result<Option<RecordBatch>> {
        Ok(None)
    }
}

/// Adapter to make ResultReader work as arrow's RecordBatchReader.
pub struct ResultReaderAdapter {
    inner: Box<dyn ResultReader + Send>,
    schema: SchemaRef,
}

impl ResultReaderAdapter {
    /// Create a new adapter wrapping a ResultReader.
    pub fn new(inner: Box<dyn ResultReader + Send>) -> Result<Self> {
        let schema = inner.schema()?;
        Ok(Self { inner, schema })
    }
}

impl arrow_array::RecordBatchReader for ResultReaderAdapter {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }
}

impl Iterator for ResultReaderAdapter {
    type Item = std::result::Result<RecordBatch, ArrowError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next_batch() {
            Ok(Some(batch)) => Some(Ok(batch)),
            Ok(None) => None,
            Err(e) => Some(Err(ArrowError::ExternalError(Box::new(
                std::io::Error::other(e.to_string()),
            )))),
        }
    }
}
