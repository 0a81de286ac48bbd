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

//! Paged fetching of unbounded result sets.
//!
//! The warehouse offers no server-side cursor and no cheap row count, so a
//! result set of unknown size is materialized through repeated bounded
//! queries. Each round asks for one row more than the page size: a full
//! page plus that sentinel row means another page exists, anything shorter
//! is the last page. The extra row is trimmed before accumulation, so the
//! pages splice together with no loss, duplication, or reordering,
//! provided the query's ORDER BY is deterministic.
//!
//! ```ignore
//! let query = PagedQuery::new("SELECT id FROM events ORDER BY id", 1000)?;
//! let result = query.fetch_all(&connection)?;
//! println!("{} rows in {} pages", result.num_rows(), result.num_pages());
//! ```

use crate::command::RowReader;
use crate::connection::Connection;
use crate::error::{Result, WarehouseErrorHelper};
use arrow_array::RecordBatch;
use arrow_schema::SchemaRef;
use tracing::debug;

/// A query fetched in bounded pages through LIMIT/OFFSET rounds.
///
/// The base query must carry a stable, deterministic ordering (an ORDER BY
/// over a key); the page boundaries silently lose or repeat rows otherwise.
/// The query text is not parsed; each round appends its own
/// `LIMIT {n} OFFSET {o}` clause and nothing else.
#[derive(Debug, Clone)]
pub struct PagedQuery {
    base_query: String,
    page_size: usize,
}

impl PagedQuery {
    /// Create a paged query with the given page size (at least 1).
    pub fn new(base_query: impl Into<String>, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(
                WarehouseErrorHelper::invalid_argument().message("page size must be at least 1")
            );
        }
        Ok(Self {
            base_query: base_query.into(),
            page_size,
        })
    }

    /// The query text each round builds on.
    pub fn base_query(&self) -> &str {
        &self.base_query
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch the whole result set, page by page, strictly sequentially.
    ///
    /// Each round requests `page_size + 1` rows; receiving all of them
    /// proves another page exists, so the sentinel row is dropped and the
    /// offset advances. A short round is the last one. Any round's failure
    /// aborts the whole fetch; no partial result is returned.
    pub fn fetch_all(&self, connection: &Connection) -> Result<PagedResult> {
        let page_size = self.page_size;
        let mut offset: usize = 0;
        let mut schema: Option<SchemaRef> = None;
        let mut batches: Vec<RecordBatch> = Vec::new();
        let mut num_rows: usize = 0;
        let mut num_pages: usize = 0;

        loop {
            let sql = format!(
                "{} LIMIT {} OFFSET {}",
                self.base_query,
                page_size + 1,
                offset
            );
            let command = connection.create_command(sql);
            let (round_schema, round_batches) = command.fetch_batches()?;
            if schema.is_none() {
                schema = Some(round_schema);
            }

            let returned: usize = round_batches.iter().map(RecordBatch::num_rows).sum();
            num_pages += 1;

            if returned > page_size {
                // The sentinel row proves another page exists; trim it.
                append_rows(&mut batches, round_batches, page_size);
                num_rows += page_size;
                offset += page_size;
                debug!(
                    "Page {} full ({} rows kept), continuing at offset {}",
                    num_pages, page_size, offset
                );
            } else {
                num_rows += returned;
                batches.extend(round_batches.into_iter().filter(|b| b.num_rows() > 0));
                debug!(
                    "Page {} returned {} rows, fetch complete ({} total)",
                    num_pages, returned, num_rows
                );
                // Option is only None before the first round
                let schema = match schema {
                    Some(schema) => schema,
                    None => {
                        return Err(WarehouseErrorHelper::invalid_state()
                            .message("paged fetch produced no schema"))
                    }
                };
                return Ok(PagedResult {
                    schema,
                    batches,
                    num_rows,
                    num_pages,
                });
            }
        }
    }
}

/// Append the first `limit` rows of `round_batches` to `acc`, slicing the
/// batch that straddles the cut.
fn append_rows(acc: &mut Vec<RecordBatch>, round_batches: Vec<RecordBatch>, limit: usize) {
    let mut remaining = limit;
    for batch in round_batches {
        if remaining == 0 {
            break;
        }
        if batch.num_rows() <= remaining {
            remaining -= batch.num_rows();
            if batch.num_rows() > 0 {
                acc.push(batch);
            }
        } else {
            acc.push(batch.slice(0, remaining));
            remaining = 0;
        }
    }
}

/// The materialized outcome of a paged fetch.
#[derive(Debug)]
pub struct PagedResult {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
    num_rows: usize,
    num_pages: usize,
}

impl PagedResult {
    /// Schema of the fetched rows.
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Total rows fetched across all pages.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of LIMIT/OFFSET rounds issued, including the final short one.
    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// The accumulated batches, in fetch order.
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// A row cursor over the accumulated result.
    pub fn reader(&self) -> RowReader<'static> {
        RowReader::over_batches(self.schema.clone(), self.batches.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{
        ExecuteResponse, ExecuteResultData, SessionInfo, WarehouseClient,
    };
    use crate::types::rest::{
        ColumnDescriptor, ExecuteParams, ResultManifest, ResultSchema, StatementState,
        StatementStatus,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock backend serving a strictly ordered sequence 1..=total through
    /// LIMIT/OFFSET queries, like the warehouse would for
    /// `SELECT n FROM seq ORDER BY n`.
    #[derive(Debug)]
    struct SequenceClient {
        total: usize,
        /// Fail the round with this (1-based) number, if set.
        fail_on_round: Option<usize>,
        rounds: AtomicUsize,
        issued_sql: Mutex<Vec<String>>,
    }

    impl SequenceClient {
        fn new(total: usize) -> Self {
            Self {
                total,
                fail_on_round: None,
                rounds: AtomicUsize::new(0),
                issued_sql: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(total: usize, round: usize) -> Self {
            Self {
                fail_on_round: Some(round),
                ..Self::new(total)
            }
        }

        fn parse_limit_offset(sql: &str) -> (usize, usize) {
            let tokens: Vec<&str> = sql.split_whitespace().collect();
            let limit_at = tokens.iter().position(|t| *t == "LIMIT").unwrap();
            let offset_at = tokens.iter().position(|t| *t == "OFFSET").unwrap();
            (
                tokens[limit_at + 1].parse().unwrap(),
                tokens[offset_at + 1].parse().unwrap(),
            )
        }

        fn manifest() -> ResultManifest {
            ResultManifest {
                format: "JSON_ARRAY".to_string(),
                schema: ResultSchema {
                    columns: vec![ColumnDescriptor {
                        name: "n".to_string(),
                        type_name: "BIGINT".to_string(),
                        position: 0,
                        nullable: Some(false),
                    }],
                },
                total_row_count: None,
                affected_rows: None,
                truncated: false,
                result_compression: None,
            }
        }
    }

    #[async_trait]
    impl WarehouseClient for SequenceClient {
        async fn create_session(
            &self,
            _catalog: Option<&str>,
            _schema: Option<&str>,
            _session_config: HashMap<String, String>,
        ) -> crate::error::Result<SessionInfo> {
            Ok(SessionInfo {
                session_id: "seq-session".to_string(),
            })
        }

        async fn delete_session(&self, _session_id: &str) -> crate::error::Result<()> {
            Ok(())
        }

        async fn execute_statement(
            &self,
            _session_id: &str,
            sql: &str,
            _params: &ExecuteParams,
        ) -> crate::error::Result<ExecuteResponse> {
            let round = self.rounds.fetch_add(1, Ordering::SeqCst) + 1;
            self.issued_sql.lock().unwrap().push(sql.to_string());
            if self.fail_on_round == Some(round) {
                return Err(WarehouseErrorHelper::io().message("warehouse exploded mid-fetch"));
            }

            let (limit, offset) = Self::parse_limit_offset(sql);
            let rows: Vec<Vec<Option<String>>> = (0..limit)
                .map(|i| offset + i + 1)
                .take_while(|n| *n <= self.total)
                .map(|n| vec![Some(n.to_string())])
                .collect();

            Ok(ExecuteResponse {
                statement_id: format!("stmt-{round}"),
                status: StatementStatus {
                    state: StatementState::Succeeded,
                    error: None,
                },
                manifest: Some(Self::manifest()),
                result: Some(ExecuteResultData {
                    data_array: Some(rows),
                    inline_arrow_data: None,
                }),
            })
        }

        async fn get_statement_status(
            &self,
            _statement_id: &str,
        ) -> crate::error::Result<ExecuteResponse> {
            Err(WarehouseErrorHelper::io().message("unexpected get_statement_status call"))
        }

        async fn cancel_statement(&self, _statement_id: &str) -> crate::error::Result<()> {
            Ok(())
        }

        async fn close_statement(&self, _statement_id: &str) -> crate::error::Result<()> {
            Ok(())
        }

        async fn list_catalogs(&self, _session_id: &str) -> crate::error::Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_catalogs call"))
        }

        async fn list_schemas(
            &self,
            _session_id: &str,
            _catalog: Option<&str>,
            _schema_pattern: Option<&str>,
        ) -> crate::error::Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_schemas call"))
        }

        async fn list_tables(
            &self,
            _session_id: &str,
            _catalog: Option<&str>,
            _schema_pattern: Option<&str>,
            _table_pattern: Option<&str>,
        ) -> crate::error::Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_tables call"))
        }

        async fn list_columns(
            &self,
            _session_id: &str,
            _catalog: &str,
            _schema_pattern: Option<&str>,
            _table_pattern: Option<&str>,
            _column_pattern: Option<&str>,
        ) -> crate::error::Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_columns call"))
        }

        async fn list_primary_keys(
            &self,
            _session_id: &str,
            _catalog: &str,
            _schema: &str,
            _table: &str,
        ) -> crate::error::Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_primary_keys call"))
        }

        async fn list_foreign_keys(
            &self,
            _session_id: &str,
            _catalog: &str,
            _schema: &str,
            _table: &str,
        ) -> crate::error::Result<RecordBatch> {
            Err(WarehouseErrorHelper::io().message("unexpected list_foreign_keys call"))
        }

        fn list_table_types(&self) -> Vec<String> {
            vec!["TABLE".to_string()]
        }
    }

    fn connection_over(client: SequenceClient) -> (std::sync::Arc<SequenceClient>, Connection) {
        let client = std::sync::Arc::new(client);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let connection = Connection::new(client.clone(), "seq-session".to_string(), runtime);
        (client, connection)
    }

    fn collect_values(result: &PagedResult) -> Vec<i64> {
        let mut reader = result.reader();
        let mut values = Vec::new();
        while reader.read().unwrap() {
            values.push(reader.get_i64(0).unwrap());
        }
        values
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let result = PagedQuery::new("SELECT n FROM seq ORDER BY n", 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_fetch_exact_sequence_uneven_pages() {
        // 5000 rows, 100 per page: 49 trimmed rounds, then a final round
        // whose 100 rows arrive without the sentinel
        let (_, connection) = connection_over(SequenceClient::new(5000));
        let query = PagedQuery::new("SELECT n FROM seq ORDER BY n", 100).unwrap();
        let result = query.fetch_all(&connection).unwrap();

        assert_eq!(result.num_rows(), 5000);
        let values = collect_values(&result);
        assert_eq!(values.len(), 5000);
        for (i, v) in values.iter().enumerate() {
            assert_eq!(*v, i as i64 + 1);
        }
    }

    #[test]
    fn test_fetch_when_page_size_divides_total() {
        // 10 rows, 5 per page: round 1 returns 6 (trim to 5), round 2
        // returns the last 5 and terminates
        let (_, connection) = connection_over(SequenceClient::new(10));
        let query = PagedQuery::new("SELECT n FROM seq ORDER BY n", 5).unwrap();
        let result = query.fetch_all(&connection).unwrap();

        assert_eq!(result.num_rows(), 10);
        assert_eq!(result.num_pages(), 2);
        assert_eq!(collect_values(&result), (1..=10).collect::<Vec<i64>>());
    }

    #[test]
    fn test_fetch_when_page_size_does_not_divide_total() {
        let (_, connection) = connection_over(SequenceClient::new(10));
        let query = PagedQuery::new("SELECT n FROM seq ORDER BY n", 3).unwrap();
        let result = query.fetch_all(&connection).unwrap();

        assert_eq!(result.num_rows(), 10);
        assert_eq!(result.num_pages(), 4);
        assert_eq!(collect_values(&result), (1..=10).collect::<Vec<i64>>());
    }

    #[test]
    fn test_fetch_single_short_page() {
        let (_, connection) = connection_over(SequenceClient::new(3));
        let query = PagedQuery::new("SELECT n FROM seq ORDER BY n", 100).unwrap();
        let result = query.fetch_all(&connection).unwrap();

        assert_eq!(result.num_rows(), 3);
        assert_eq!(result.num_pages(), 1);
        assert_eq!(collect_values(&result), vec![1, 2, 3]);
    }

    #[test]
    fn test_fetch_empty_result_terminates_after_one_round() {
        let (_, connection) = connection_over(SequenceClient::new(0));
        let query = PagedQuery::new("SELECT n FROM seq ORDER BY n", 100).unwrap();
        let result = query.fetch_all(&connection).unwrap();

        assert_eq!(result.num_rows(), 0);
        assert_eq!(result.num_pages(), 1);
        assert!(collect_values(&result).is_empty());
        // Schema survives even with zero rows
        assert_eq!(result.schema().field(0).name(), "n");
    }

    #[test]
    fn test_page_size_one() {
        let (_, connection) = connection_over(SequenceClient::new(4));
        let query = PagedQuery::new("SELECT n FROM seq ORDER BY n", 1).unwrap();
        let result = query.fetch_all(&connection).unwrap();

        assert_eq!(result.num_rows(), 4);
        assert_eq!(result.num_pages(), 5);
        assert_eq!(collect_values(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_round_queries_request_sentinel_row() {
        let (client, connection) = connection_over(SequenceClient::new(10));
        let query = PagedQuery::new("SELECT n FROM seq ORDER BY n", 5).unwrap();
        query.fetch_all(&connection).unwrap();

        let issued = client.issued_sql.lock().unwrap();
        assert_eq!(
            *issued,
            vec![
                "SELECT n FROM seq ORDER BY n LIMIT 6 OFFSET 0".to_string(),
                "SELECT n FROM seq ORDER BY n LIMIT 6 OFFSET 5".to_string(),
            ]
        );
    }

    #[test]
    fn test_round_failure_aborts_whole_fetch() {
        let (_, connection) = connection_over(SequenceClient::failing_on(100, 2));
        let query = PagedQuery::new("SELECT n FROM seq ORDER BY n", 10).unwrap();
        let err = query.fetch_all(&connection).err().unwrap();
        assert!(err.message().contains("warehouse exploded"));
    }

    #[test]
    fn test_first_round_failure_aborts() {
        let (_, connection) = connection_over(SequenceClient::failing_on(100, 1));
        let query = PagedQuery::new("SELECT n FROM seq ORDER BY n", 10).unwrap();
        assert!(query.fetch_all(&connection).is_err());
    }
}
