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

//! Conversion of statement-execution responses into Arrow RecordBatches.
//!
//! Metadata queries request the JSON_ARRAY result format, so their rows
//! arrive as nested string arrays in `data_array`. This module builds the
//! Arrow schema from the result manifest and transposes the row-oriented
//! data into columnar batches.

use crate::client::ExecuteResponse;
use crate::error::{Result, WarehouseErrorHelper};
use crate::metadata::type_mapping::warehouse_type_to_arrow;
use crate::types::rest::{CompressionCodec, ResultManifest};
use arrow_array::{ArrayRef, BooleanArray, Int32Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use std::sync::Arc;

/// Build an Arrow schema from the result manifest.
pub fn schema_from_manifest(manifest: &ResultManifest) -> SchemaRef {
    let fields: Vec<Field> = manifest
        .schema
        .columns
        .iter()
        .map(|col| {
            let data_type = warehouse_type_to_arrow(&col.type_name);
            Field::new(&col.name, data_type, col.nullable.unwrap_or(true))
        })
        .collect();

    Arc::new(Schema::new(fields))
}

/// Convert row-oriented JSON data into a columnar RecordBatch.
///
/// All cells arrive as strings. Columns whose manifest type is integer or
/// boolean are re-typed by parsing the strings; all other columns stay
/// Utf8, including types JSON cannot carry faithfully. A non-null cell
/// that does not parse as its column's type is an error, not a NULL.
pub fn data_array_to_batch(
    rows: &[Vec<Option<String>>],
    schema: &SchemaRef,
) -> Result<RecordBatch> {
    fn parse_cell<T: std::str::FromStr>(
        cell: Option<&str>,
        column: &str,
        type_label: &str,
    ) -> Result<Option<T>> {
        match cell {
            None => Ok(None),
            Some(s) => s.parse::<T>().map(Some).map_err(|_| {
                WarehouseErrorHelper::invalid_data().message(format!(
                    "Column '{}' value '{}' is not a valid {}",
                    column, s, type_label
                ))
            }),
        }
    }

    let mut fields: Vec<Field> = Vec::with_capacity(schema.fields().len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for (col_idx, field) in schema.fields().iter().enumerate() {
        let cells = rows
            .iter()
            .map(|row| row.get(col_idx).and_then(|cell| cell.as_deref()));

        let (data_type, array): (DataType, ArrayRef) = match field.data_type() {
            DataType::Int32 => (
                DataType::Int32,
                Arc::new(
                    cells
                        .map(|c| parse_cell::<i32>(c, field.name(), "INT"))
                        .collect::<Result<Int32Array>>()?,
                ),
            ),
            DataType::Int64 => (
                DataType::Int64,
                Arc::new(
                    cells
                        .map(|c| parse_cell::<i64>(c, field.name(), "BIGINT"))
                        .collect::<Result<Int64Array>>()?,
                ),
            ),
            DataType::Boolean => (
                DataType::Boolean,
                Arc::new(
                    cells
                        .map(|c| parse_cell::<bool>(c, field.name(), "BOOLEAN"))
                        .collect::<Result<BooleanArray>>()?,
                ),
            ),
            _ => (DataType::Utf8, Arc::new(cells.collect::<StringArray>())),
        };

        fields.push(Field::new(field.name(), data_type, true));
        arrays.push(array);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).map_err(|e| {
        WarehouseErrorHelper::io().message(format!("Failed to create record batch: {}", e))
    })
}

/// Convert a completed statement response into a single RecordBatch.
///
/// Handles JSON rows (`data_array`), inline Arrow attachments, and empty
/// results. The manifest is required for the schema.
pub fn response_to_batch(response: &ExecuteResponse) -> Result<RecordBatch> {
    let manifest = response
        .manifest
        .as_ref()
        .ok_or_else(|| WarehouseErrorHelper::io().message("No result manifest available"))?;
    let schema = schema_from_manifest(manifest);

    if let Some(ref result) = response.result {
        if let Some(ref rows) = result.data_array {
            return data_array_to_batch(rows, &schema);
        }

        if let Some(ref ipc) = result.inline_arrow_data {
            if !ipc.is_empty() {
                let compression =
                    CompressionCodec::from_manifest(manifest.result_compression.as_deref());
                let batches = crate::reader::inline::parse_ipc_stream(ipc, compression)?;
                let schema = batches.first().map(|b| b.schema()).unwrap_or(schema);
                return arrow_select::concat::concat_batches(&schema, &batches).map_err(|e| {
                    WarehouseErrorHelper::io()
                        .message(format!("Failed to combine result batches: {}", e))
                });
            }
        }
    }

    Ok(RecordBatch::new_empty(schema))
}
