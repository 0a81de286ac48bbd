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

//! Statement implementation for the warehouse ADBC driver.

use crate::client::{ExecuteResponse, WarehouseClient};
use crate::error::WarehouseErrorHelper;
use crate::reader::{reader_for_response, ResultReaderAdapter};
use crate::types::rest::ExecuteParams;
use adbc_core::error::Result;
use adbc_core::options::{OptionStatement, OptionValue};
use adbc_core::Optionable;
use arrow_array::RecordBatchReader;
use arrow_schema::Schema;
use std::sync::Arc;
use tokio::runtime::Handle as RuntimeHandle;
use tracing::debug;

/// Represents a SQL statement that can be executed against the warehouse.
///
/// A Statement is created from a Connection and is used to execute SQL
/// queries and retrieve results. Execution blocks the caller until the
/// statement reaches a terminal state; the client handles status polling.
#[derive(Debug)]
pub struct Statement {
    /// The SQL query to execute.
    query: Option<String>,
    /// Warehouse client for executing queries.
    client: Arc<dyn WarehouseClient>,
    /// Session ID for this statement's connection.
    session_id: String,
    /// Tokio runtime handle for async operations.
    runtime_handle: RuntimeHandle,
    /// Current statement ID (set after execution).
    current_statement_id: Option<String>,
}

impl Statement {
    /// Creates a new Statement.
    pub(crate) fn new(
        client: Arc<dyn WarehouseClient>,
        session_id: String,
        runtime_handle: RuntimeHandle,
    ) -> Self {
        Self {
            query: None,
            client,
            session_id,
            runtime_handle,
            current_statement_id: None,
        }
    }

    /// Returns the current SQL query.
    pub fn sql_query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Submit the query and wait for a terminal response.
    fn execute_to_response(&mut self) -> crate::error::Result<ExecuteResponse> {
        let query = self
            .query
            .as_ref()
            .ok_or_else(|| WarehouseErrorHelper::invalid_state().message("No query set"))?;

        debug!("Executing query: {}", query);

        let response = self.runtime_handle.block_on(self.client.execute_statement(
            &self.session_id,
            query,
            &ExecuteParams::default(),
        ))?;

        // Keep the statement ID for cancel and close
        self.current_statement_id = Some(response.statement_id.clone());
        Ok(response)
    }
}

impl Optionable for Statement {
    type Option = OptionStatement;

    fn set_option(&mut self, key: Self::Option, _value: OptionValue) -> Result<()> {
        Err(WarehouseErrorHelper::set_unknown_option(&key).to_adbc())
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_bytes(&self, key: Self::Option) -> Result<Vec<u8>> {
        Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_int(&self, key: Self::Option) -> Result<i64> {
        Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_double(&self, key: Self::Option) -> Result<f64> {
        Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc())
    }
}

impl adbc_core::Statement for Statement {
    fn set_sql_query(&mut self, query: impl AsRef<str>) -> Result<()> {
        self.query = Some(query.as_ref().to_string());
        Ok(())
    }

    fn set_substrait_plan(&mut self, _plan: impl AsRef<[u8]>) -> Result<()> {
        Err(WarehouseErrorHelper::not_implemented()
            .message("Substrait plans")
            .to_adbc())
    }

    fn prepare(&mut self) -> Result<()> {
        Err(WarehouseErrorHelper::not_implemented()
            .message("prepare")
            .to_adbc())
    }

    fn get_parameter_schema(&self) -> Result<Schema> {
        Err(WarehouseErrorHelper::not_implemented()
            .message("get_parameter_schema")
            .to_adbc())
    }

    fn bind(&mut self, _batch: arrow_array::RecordBatch) -> Result<()> {
        Err(WarehouseErrorHelper::not_implemented()
            .message("bind parameters")
            .to_adbc())
    }

    fn bind_stream(&mut self, _stream: Box<dyn RecordBatchReader + Send>) -> Result<()> {
        Err(WarehouseErrorHelper::not_implemented()
            .message("bind_stream")
            .to_adbc())
    }

    fn execute(&mut self) -> Result<impl RecordBatchReader + Send> {
        let response = self.execute_to_response().map_err(|e| e.to_adbc())?;
        let reader = reader_for_response(&response).map_err(|e| e.to_adbc())?;
        ResultReaderAdapter::new(reader).map_err(|e| e.to_adbc())
    }

    fn execute_update(&mut self) -> Result<Option<i64>> {
        let response = self.execute_to_response().map_err(|e| e.to_adbc())?;

        // DML results carry no rows; the manifest reports the affected
        // count when the warehouse knows it, -1 otherwise.
        let affected = response
            .manifest
            .as_ref()
            .and_then(|m| m.affected_rows)
            .unwrap_or(-1);
        Ok(Some(affected))
    }

    fn execute_schema(&mut self) -> Result<Schema> {
        let response = self.execute_to_response().map_err(|e| e.to_adbc())?;
        let reader = reader_for_response(&response).map_err(|e| e.to_adbc())?;
        let schema = reader.schema().map_err(|e| e.to_adbc())?;
        Ok((*schema).clone())
    }

    fn execute_partitions(&mut self) -> Result<adbc_core::PartitionedResult> {
        Err(WarehouseErrorHelper::not_implemented()
            .message("execute_partitions")
            .to_adbc())
    }

    fn cancel(&mut self) -> Result<()> {
        if let Some(ref statement_id) = self.current_statement_id {
            debug!("Canceling statement: {}", statement_id);
            self.runtime_handle
                .block_on(self.client.cancel_statement(statement_id))
                .map_err(|e| e.to_adbc())?;
        }
        Ok(())
    }
}

impl Drop for Statement {
    fn drop(&mut self) {
        // Release server-side statement resources, best effort
        if let Some(ref statement_id) = self.current_statement_id {
            let _ = self
                .runtime_handle
                .block_on(self.client.close_statement(statement_id));
        }
    }
}
