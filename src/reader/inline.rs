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

//! Reader for inline Arrow results.
//!
//! Statement responses with the ARROW_STREAM format carry their result as a
//! base64 attachment holding an Arrow IPC stream, optionally LZ4 compressed.
//! This module parses the attachment upfront and serves the batches from
//! memory.

use crate::error::{Result, WarehouseErrorHelper};
use crate::reader::ResultReader;
use crate::types::rest::CompressionCodec;
use arrow_array::RecordBatch;
use arrow_ipc::reader::StreamReader;
use arrow_schema::SchemaRef;
use lz4_flex::frame::FrameDecoder;
use std::collections::VecDeque;
use std::io::{Cursor, Read};

/// Parse an Arrow IPC stream into RecordBatches.
///
/// The compression codec comes from the result manifest
/// (manifest.result_compression field). A single attachment may contain
/// multiple RecordBatches.
///
/// # Errors
/// - If LZ4 decompression fails
/// - If Arrow IPC parsing fails
pub fn parse_ipc_stream(data: &[u8], compression: CompressionCodec) -> Result<Vec<RecordBatch>> {
    let decompressed: Vec<u8>;
    let bytes: &[u8] = match compression {
        CompressionCodec::Lz4Frame => {
            let mut decoder = FrameDecoder::new(Cursor::new(data));
            let mut buf = Vec::new();
            decoder.read_to_end(&mut buf).map_err(|e| {
                WarehouseErrorHelper::io().message(format!("LZ4 decompression failed: {}", e))
            })?;
            decompressed = buf;
            &decompressed
        }
        CompressionCodec::None => data,
    };

    let cursor = Cursor::new(bytes);
    let reader = StreamReader::try_new(cursor, None).map_err(|e| {
        WarehouseErrorHelper::io().message(format!("Failed to create Arrow IPC reader: {}", e))
    })?;

    let batches: Vec<RecordBatch> = reader
        .into_iter()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| {
            WarehouseErrorHelper::io().message(format!("Failed to read Arrow batches: {}", e))
        })?;

    Ok(batches)
}

/// Reader for inline Arrow attachments.
///
/// The IPC stream is parsed eagerly so that malformed attachments fail at
/// construction rather than mid-iteration.
#[derive(Debug)]
pub struct InlineArrowReader {
    batches: VecDeque<RecordBatch>,
    /// Schema extracted from the first batch
    schema: Option<SchemaRef>,
}

impl InlineArrowReader {
    /// Create a reader from raw attachment bytes (decoded from base64).
    pub fn new(attachment: &[u8], compression: CompressionCodec) -> Result<Self> {
        if attachment.is_empty() {
            tracing::debug!("Empty attachment, creating empty reader");
            return Ok(Self {
                batches: VecDeque::new(),
                schema: None,
            });
        }

        tracing::debug!(
            "Parsing inline Arrow data: {} bytes, compression={:?}",
            attachment.len(),
            compression
        );

        let batches = parse_ipc_stream(attachment, compression).map_err(|e| {
            WarehouseErrorHelper::io().message(format!("Failed to parse inline Arrow data: {}", e))
        })?;

        let schema = batches.first().map(|b| b.schema());

        tracing::debug!(
            "Parsed inline Arrow data: {} batches, {} total rows",
            batches.len(),
            batches.iter().map(|b| b.num_rows()).sum::<usize>()
        );

        Ok(Self {
            batches: VecDeque::from(batches),
            schema,
        })
    }
}

impl ResultReader for InlineArrowReader {
    fn schema(&self) -> Result<SchemaRef> {
        self.schema.clone().ok_or_else(|| {
            WarehouseErrorHelper::invalid_state().message("Schema not available for inline result")
        })
    }

    fn next_batch(&mut self) -> Result<Option<RecordBatch>> {
        Ok(self.batches.pop_front())
    }
}
