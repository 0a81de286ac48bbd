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

//! Command execution with row-cursor result access.
//!
//! `Command` is the SQL-client face of the driver: a statement bound to
//! a `Connection`, executed with `execute_update` for DML or
//! `execute_reader` for queries. `RowReader` is the forward-only cursor
//! over a query's results with positional, typed column accessors.
//!
//! Lifetimes enforce resource nesting: a `RowReader` borrows its
//! `Command`, which borrows its `Connection`, so a reader can never
//! outlive the session that produced it.

use crate::client::ExecuteResponse;
use crate::connection::Connection;
use crate::error::{Error, Result, WarehouseErrorHelper};
use crate::reader::{reader_for_response, ResultReader};
use crate::types::rest::ExecuteParams;
use arrow_array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int32Array, Int64Array, RecordBatch, StringArray,
};
use arrow_schema::{DataType, SchemaRef};
use tracing::debug;

/// A SQL command bound to a connection.
///
/// Commands execute synchronously on the connection's session. The SQL
/// text passes through to the warehouse verbatim.
#[derive(Debug)]
pub struct Command<'conn> {
    connection: &'conn Connection,
    sql: String,
}

impl<'conn> Command<'conn> {
    pub(crate) fn new(connection: &'conn Connection, sql: impl Into<String>) -> Self {
        Self {
            connection,
            sql: sql.into(),
        }
    }

    /// The SQL text this command executes.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Execute a non-query statement and return the affected-row count.
    ///
    /// Returns `-1` when the warehouse cannot report a count for the
    /// statement; that is a policy value, not an error.
    pub fn execute_update(&self) -> Result<i64> {
        let response = self.execute()?;
        let affected = response
            .manifest
            .as_ref()
            .and_then(|m| m.affected_rows)
            .unwrap_or(-1);

        // Update responses carry no rows; release the statement now.
        let _ = self.connection.runtime().block_on(
            self.connection
                .client()
                .close_statement(&response.statement_id),
        );
        Ok(affected)
    }

    /// Execute a query statement and return a forward-only cursor over
    /// its rows.
    pub fn execute_reader(&self) -> Result<RowReader<'_>> {
        let response = self.execute()?;
        let statement_id = response.statement_id.clone();
        let inner = reader_for_response(&response)?;
        let schema = inner.schema()?;

        Ok(RowReader {
            cleanup: Some((self.connection, statement_id)),
            inner,
            schema,
            batch: None,
            row: 0,
            state: Cursor::BeforeFirst,
        })
    }

    /// Execute a query and collect every result batch, releasing the
    /// statement before returning. The paging layer uses this; it needs
    /// whole batches rather than a row cursor.
    pub(crate) fn fetch_batches(&self) -> Result<(SchemaRef, Vec<RecordBatch>)> {
        let response = self.execute()?;
        let drained: Result<(SchemaRef, Vec<RecordBatch>)> = (|| {
            let mut reader = reader_for_response(&response)?;
            let schema = reader.schema()?;
            let mut batches = Vec::new();
            while let Some(batch) = reader.next_batch()? {
                batches.push(batch);
            }
            Ok((schema, batches))
        })();

        let _ = self.connection.runtime().block_on(
            self.connection
                .client()
                .close_statement(&response.statement_id),
        );
        drained
    }

    fn execute(&self) -> Result<ExecuteResponse> {
        debug!("Executing command: {}", self.sql);
        self.connection
            .runtime()
            .block_on(self.connection.client().execute_statement(
                self.connection.session_id(),
                &self.sql,
                &ExecuteParams::default(),
            ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    BeforeFirst,
    OnRow,
    Done,
}

/// Forward-only, single-pass cursor over a query result.
///
/// `read` advances one row at a time; column accessors address the
/// current row by position. Accessing a column before the first `read`,
/// after the cursor is exhausted, with an invalid index, with the wrong
/// type, or on a NULL value is an error rather than a silent default.
pub struct RowReader<'cmd> {
    /// Statement to close on drop, with the connection that owns it.
    /// `None` for readers over already-materialized batches.
    cleanup: Option<(&'cmd Connection, String)>,
    inner: Box<dyn ResultReader + Send>,
    schema: SchemaRef,
    batch: Option<RecordBatch>,
    row: usize,
    state: Cursor,
}

impl RowReader<'_> {
    /// Cursor over batches already in memory.
    pub(crate) fn over_batches(schema: SchemaRef, batches: Vec<RecordBatch>) -> RowReader<'static> {
        RowReader {
            cleanup: None,
            inner: Box::new(BatchStream {
                schema: schema.clone(),
                batches: batches.into_iter(),
            }),
            schema,
            batch: None,
            row: 0,
            state: Cursor::BeforeFirst,
        }
    }

    /// Schema of the result this cursor traverses.
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Advance to the next row.
    ///
    /// Returns `false` at the natural end of results; reading past the
    /// end keeps returning `false` and is not an error.
    pub fn read(&mut self) -> Result<bool> {
        if self.state == Cursor::Done {
            return Ok(false);
        }

        if let Some(ref batch) = self.batch {
            if self.row + 1 < batch.num_rows() {
                self.row += 1;
                self.state = Cursor::OnRow;
                return Ok(true);
            }
        }

        loop {
            match self.inner.next_batch()? {
                Some(batch) if batch.num_rows() > 0 => {
                    self.batch = Some(batch);
                    self.row = 0;
                    self.state = Cursor::OnRow;
                    return Ok(true);
                }
                Some(_) => continue,
                None => {
                    self.batch = None;
                    self.state = Cursor::Done;
                    return Ok(false);
                }
            }
        }
    }

    /// Whether the current row's value at `index` is NULL.
    pub fn is_null(&self, index: usize) -> Result<bool> {
        let (batch, row) = self.current()?;
        let column = column(batch, index)?;
        Ok(column.is_null(row))
    }

    /// Int32 value of the current row at `index`.
    pub fn get_i32(&self, index: usize) -> Result<i32> {
        let (batch, row) = self.current()?;
        let column = column(batch, index)?;
        let array = column
            .as_any()
            .downcast_ref::<Int32Array>()
            .ok_or_else(|| type_mismatch(index, "Int32", column.data_type()))?;
        check_not_null(array, index, row)?;
        Ok(array.value(row))
    }

    /// Int64 value of the current row at `index`.
    pub fn get_i64(&self, index: usize) -> Result<i64> {
        let (batch, row) = self.current()?;
        let column = column(batch, index)?;
        let array = column
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| type_mismatch(index, "Int64", column.data_type()))?;
        check_not_null(array, index, row)?;
        Ok(array.value(row))
    }

    /// Float64 value of the current row at `index`.
    pub fn get_f64(&self, index: usize) -> Result<f64> {
        let (batch, row) = self.current()?;
        let column = column(batch, index)?;
        let array = column
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| type_mismatch(index, "Float64", column.data_type()))?;
        check_not_null(array, index, row)?;
        Ok(array.value(row))
    }

    /// Boolean value of the current row at `index`.
    pub fn get_bool(&self, index: usize) -> Result<bool> {
        let (batch, row) = self.current()?;
        let column = column(batch, index)?;
        let array = column
            .as_any()
            .downcast_ref::<BooleanArray>()
            .ok_or_else(|| type_mismatch(index, "Boolean", column.data_type()))?;
        check_not_null(array, index, row)?;
        Ok(array.value(row))
    }

    /// String value of the current row at `index`.
    pub fn get_string(&self, index: usize) -> Result<String> {
        let (batch, row) = self.current()?;
        let column = column(batch, index)?;
        let array = column
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| type_mismatch(index, "Utf8", column.data_type()))?;
        check_not_null(array, index, row)?;
        Ok(array.value(row).to_string())
    }

    fn current(&self) -> Result<(&RecordBatch, usize)> {
        match self.state {
            Cursor::BeforeFirst => Err(WarehouseErrorHelper::invalid_state()
                .message("No current row; call read() first")),
            Cursor::Done => Err(WarehouseErrorHelper::invalid_state()
                .message("Cursor is past the end of results")),
            Cursor::OnRow => match self.batch.as_ref() {
                Some(batch) => Ok((batch, self.row)),
                None => Err(WarehouseErrorHelper::invalid_state()
                    .message("Cursor is past the end of results")),
            },
        }
    }
}

impl Drop for RowReader<'_> {
    fn drop(&mut self) {
        // Release the server-side statement, best effort
        if let Some((connection, statement_id)) = self.cleanup.take() {
            let _ = connection
                .runtime()
                .block_on(connection.client().close_statement(&statement_id));
        }
    }
}

fn column(batch: &RecordBatch, index: usize) -> Result<&ArrayRef> {
    batch.columns().get(index).ok_or_else(|| {
        WarehouseErrorHelper::invalid_argument().message(format!(
            "Column index {} out of range (result has {} columns)",
            index,
            batch.num_columns()
        ))
    })
}

fn type_mismatch(index: usize, expected: &str, actual: &DataType) -> Error {
    WarehouseErrorHelper::invalid_data().message(format!(
        "Column {} type mismatch: expected {}, found {:?}",
        index, expected, actual
    ))
}

fn check_not_null(array: &dyn Array, index: usize, row: usize) -> Result<()> {
    if array.is_null(row) {
        Err(WarehouseErrorHelper::invalid_data().message(format!(
            "Column {} is NULL; check is_null before typed access",
            index
        )))
    } else {
        Ok(())
    }
}

/// In-memory batch source backing `RowReader::over_batches`.
struct BatchStream {
    schema: SchemaRef,
    batches: std::vec::IntoIter<RecordBatch>,
}

impl ResultReader for BatchStream {
    fn schema(&self) -> Result<SchemaRef> {
        Ok(self.schema.clone())
    }

    fn next_batch(&mut self) -> Result<Option<RecordBatch>> {
        Ok(self.batches.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ExecuteResultData, SessionInfo, WarehouseClient};
    use crate::types::rest::{
        ColumnDescriptor, ResultManifest, ResultSchema, StatementState, StatementStatus,
    };
    use adbc_core::error::Status;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Mock client returning one canned terminal response per execution.
    #[derive(Debug, Default)]
    struct MockClient {
        columns: Vec<(&'static str, &'static str)>,
        rows: Vec<Vec<Option<String>>>,
        affected_rows: Option<i64>,
        closed: Mutex<Vec<String>>,
    }

    impl MockClient {
        fn response(&self) -> ExecuteResponse {
            let manifest = ResultManifest {
                format: "JSON_ARRAY".to_string(),
                schema: ResultSchema {
                    columns: self
                        .columns
                        .iter()
                        .enumerate()
                        .map(|(i, (name, type_name))| ColumnDescriptor {
                            name: name.to_string(),
                            type_name: type_name.to_string(),
                            position: i as i32,
                            nullable: None,
                        })
                        .collect(),
                },
                total_row_count: Some(self.rows.len() as i64),
                affected_rows: self.affected_rows,
                truncated: false,
                result_compression: None,
            };
            ExecuteResponse {
                statement_id: "stmt-1".to_string(),
                status: StatementStatus {
                    state: StatementState::Succeeded,
                    error: None,
                },
                manifest: Some(manifest),
                result: Some(ExecuteResultData {
                    data_array: Some(self.rows.clone()),
                    inline_arrow_data: None,
                }),
            }
        }
    }

    #[async_trait]
    impl WarehouseClient for MockClient {
        async fn create_session(
            &self,
            _catalog: Option<&str>,
            _schema: Option<&str>,
            _session_config: HashMap<String, String>,
        ) -> Result<SessionInfo> {
            Ok(SessionInfo {
                session_id: "test-session".to_string(),
            })
        }

        async fn delete_session(&self, _session_id: &str) -> Result<()> {
            Ok(())
        }

        async fn execute_statement(
            &self,
            _session_id: &str,
            _sql: &str,
            _params: &ExecuteParams,
        ) -> Result<ExecuteResponse> {
            Ok(self.response())
        }

        async fn get_statement_status(&self, _statement_id: &str) -> Result<ExecuteResponse> {
            Ok(self.response())
        }

        async fn cancel_statement(&self, _statement_id: &str) -> Result<()> {
            Ok(())
        }

        async fn close_statement(&self, statement_id: &str) -> Result<()> {
            self.closed.lock().unwrap().push(statement_id.to_string());
            Ok(())
        }

        async fn list_catalogs(&self, _session_id: &str) -> Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_catalogs call"))
        }

        async fn list_schemas(
            &self,
            _session_id: &str,
            _catalog: Option<&str>,
            _schema_pattern: Option<&str>,
        ) -> Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_schemas call"))
        }

        async fn list_tables(
            &self,
            _session_id: &str,
            _catalog: Option<&str>,
            _schema_pattern: Option<&str>,
            _table_pattern: Option<&str>,
        ) -> Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_tables call"))
        }

        async fn list_columns(
            &self,
            _session_id: &str,
            _catalog: &str,
            _schema_pattern: Option<&str>,
            _table_pattern: Option<&str>,
            _column_pattern: Option<&str>,
        ) -> Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_columns call"))
        }

        async fn list_primary_keys(
            &self,
            _session_id: &str,
            _catalog: &str,
            _schema: &str,
            _table: &str,
        ) -> Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_primary_keys call"))
        }

        async fn list_foreign_keys(
            &self,
            _session_id: &str,
            _catalog: &str,
            _schema: &str,
            _table: &str,
        ) -> Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_foreign_keys call"))
        }

        fn list_table_types(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn test_connection(client: MockClient) -> Connection {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        Connection::new(Arc::new(client), "test-session".to_string(), runtime)
    }

    fn typed_rows_client() -> MockClient {
        MockClient {
            columns: vec![
                ("name", "STRING"),
                ("ordinal", "INT"),
                ("total", "BIGINT"),
                ("active", "BOOLEAN"),
            ],
            rows: vec![
                vec![
                    Some("first".to_string()),
                    Some("1".to_string()),
                    Some("100".to_string()),
                    Some("true".to_string()),
                ],
                vec![
                    None,
                    Some("2".to_string()),
                    Some("200".to_string()),
                    Some("false".to_string()),
                ],
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_execute_update_reports_affected_rows() {
        let conn = test_connection(MockClient {
            affected_rows: Some(3),
            ..Default::default()
        });
        let command = conn.create_command("DELETE FROM t WHERE id < 3");
        assert_eq!(command.execute_update().unwrap(), 3);
    }

    #[test]
    fn test_execute_update_unknown_count_is_minus_one() {
        let conn = test_connection(MockClient::default());
        let command = conn.create_command("UPDATE t SET x = 1");
        assert_eq!(command.execute_update().unwrap(), -1);
    }

    #[test]
    fn test_execute_update_closes_statement() {
        let client = Arc::new(MockClient::default());
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let conn = Connection::new(client.clone(), "test-session".to_string(), runtime);
        let command = conn.create_command("DELETE FROM t");
        command.execute_update().unwrap();

        assert_eq!(client.closed.lock().unwrap().as_slice(), ["stmt-1"]);
    }

    #[test]
    fn test_reader_walks_rows_forward() {
        let conn = test_connection(typed_rows_client());
        let command = conn.create_command("SELECT * FROM t");
        let mut reader = command.execute_reader().unwrap();

        assert!(reader.read().unwrap());
        assert_eq!(reader.get_string(0).unwrap(), "first");
        assert_eq!(reader.get_i32(1).unwrap(), 1);
        assert_eq!(reader.get_i64(2).unwrap(), 100);
        assert!(reader.get_bool(3).unwrap());

        assert!(reader.read().unwrap());
        assert_eq!(reader.get_i32(1).unwrap(), 2);

        assert!(!reader.read().unwrap());
    }

    #[test]
    fn test_reader_read_past_end_stays_false() {
        let conn = test_connection(typed_rows_client());
        let command = conn.create_command("SELECT * FROM t");
        let mut reader = command.execute_reader().unwrap();

        while reader.read().unwrap() {}
        assert!(!reader.read().unwrap());
        assert!(!reader.read().unwrap());
    }

    #[test]
    fn test_reader_empty_result() {
        let conn = test_connection(MockClient {
            columns: vec![("name", "STRING")],
            ..Default::default()
        });
        let command = conn.create_command("SELECT name FROM t WHERE 1 = 0");
        let mut reader = command.execute_reader().unwrap();

        assert!(!reader.read().unwrap());
        assert_eq!(reader.schema().fields().len(), 1);
    }

    #[test]
    fn test_accessor_before_first_read_is_invalid_state() {
        let conn = test_connection(typed_rows_client());
        let command = conn.create_command("SELECT * FROM t");
        let reader = command.execute_reader().unwrap();

        let err = reader.get_string(0).unwrap_err();
        assert_eq!(err.status(), Status::InvalidState);
    }

    #[test]
    fn test_accessor_after_end_is_invalid_state() {
        let conn = test_connection(typed_rows_client());
        let command = conn.create_command("SELECT * FROM t");
        let mut reader = command.execute_reader().unwrap();

        while reader.read().unwrap() {}
        let err = reader.get_string(0).unwrap_err();
        assert_eq!(err.status(), Status::InvalidState);
    }

    #[test]
    fn test_accessor_out_of_range_index() {
        let conn = test_connection(typed_rows_client());
        let command = conn.create_command("SELECT * FROM t");
        let mut reader = command.execute_reader().unwrap();

        reader.read().unwrap();
        let err = reader.get_string(9).unwrap_err();
        assert_eq!(err.status(), Status::InvalidArguments);
        assert!(err.message().contains("out of range"));
    }

    #[test]
    fn test_accessor_type_mismatch() {
        let conn = test_connection(typed_rows_client());
        let command = conn.create_command("SELECT * FROM t");
        let mut reader = command.execute_reader().unwrap();

        reader.read().unwrap();
        let err = reader.get_i32(0).unwrap_err();
        assert_eq!(err.status(), Status::InvalidData);
        assert!(err.message().contains("type mismatch"));
    }

    #[test]
    fn test_null_value_is_invalid_data_and_is_null_sees_it() {
        let conn = test_connection(typed_rows_client());
        let command = conn.create_command("SELECT * FROM t");
        let mut reader = command.execute_reader().unwrap();

        reader.read().unwrap();
        assert!(!reader.is_null(0).unwrap());
        reader.read().unwrap();
        assert!(reader.is_null(0).unwrap());

        let err = reader.get_string(0).unwrap_err();
        assert_eq!(err.status(), Status::InvalidData);
        assert!(err.message().contains("NULL"));
    }

    #[test]
    fn test_reader_drop_closes_statement() {
        let client = Arc::new(typed_rows_client());
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let conn = Connection::new(client.clone(), "test-session".to_string(), runtime);
        {
            let command = conn.create_command("SELECT * FROM t");
            let _reader = command.execute_reader().unwrap();
        }
        assert_eq!(client.closed.lock().unwrap().as_slice(), ["stmt-1"]);
    }

    #[test]
    fn test_over_batches_spans_batch_boundaries() {
        use arrow_schema::{Field, Schema};

        let schema = Arc::new(Schema::new(vec![Field::new(
            "score",
            DataType::Float64,
            true,
        )]));
        let first = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Float64Array::from(vec![1.5, 2.5])) as ArrayRef],
        )
        .unwrap();
        let second = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Float64Array::from(vec![3.5])) as ArrayRef],
        )
        .unwrap();

        let mut reader = RowReader::over_batches(schema.clone(), vec![first, second]);
        let mut values = Vec::new();
        while reader.read().unwrap() {
            values.push(reader.get_f64(0).unwrap());
        }
        assert_eq!(values, [1.5, 2.5, 3.5]);
        assert_eq!(reader.schema(), schema);
    }

    #[test]
    fn test_over_batches_skips_empty_batches() {
        use arrow_schema::{Field, Schema};

        let schema = Arc::new(Schema::new(vec![Field::new(
            "score",
            DataType::Float64,
            true,
        )]));
        let empty = RecordBatch::new_empty(schema.clone());
        let data = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Float64Array::from(vec![7.0])) as ArrayRef],
        )
        .unwrap();

        let mut reader = RowReader::over_batches(schema, vec![empty, data]);
        assert!(reader.read().unwrap());
        assert_eq!(reader.get_f64(0).unwrap(), 7.0);
        assert!(!reader.read().unwrap());
    }
}
