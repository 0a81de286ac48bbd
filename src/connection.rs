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

//! Connection implementation for the warehouse ADBC driver.

use crate::client::WarehouseClient;
use crate::command::Command;
use crate::error::WarehouseErrorHelper;
use crate::metadata::parse::{
    parse_catalogs, parse_columns, parse_columns_as_fields, parse_foreign_keys, parse_primary_keys,
    parse_schemas, parse_tables,
};
use crate::metadata::provider::filter_by_pattern;
use crate::metadata::{
    CollectionProvider, ColumnInfo, ForeignKeyInfo, GetObjectsBuilder, PrimaryKeyInfo, TableInfo,
};
use crate::statement::Statement;
use adbc_core::error::Result;
use adbc_core::options::{InfoCode, ObjectDepth, OptionConnection, OptionValue};
use adbc_core::schemas::{GET_INFO_SCHEMA, GET_TABLE_TYPES_SCHEMA};
use adbc_core::Optionable;
use arrow_array::{
    new_empty_array, ArrayRef, RecordBatch, RecordBatchIterator, RecordBatchReader, StringArray,
    UInt32Array, UnionArray,
};
use arrow_buffer::ScalarBuffer;
use arrow_schema::{ArrowError, DataType, Schema, UnionMode};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Configuration passed from Database to Connection.
pub struct ConnectionConfig {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub include_table_constraints: bool,
    pub client: Arc<dyn WarehouseClient>,
}

/// An active connection to a warehouse SQL endpoint.
///
/// A Connection is created from a Database, holds the server-side session,
/// and is the root of the resource hierarchy: Statements and Commands are
/// created from it and readers borrow it, so nothing can outlive the
/// session. Dropping the Connection deletes the session.
#[derive(Debug)]
pub struct Connection {
    // Warehouse client (trait object for backend flexibility)
    client: Arc<dyn WarehouseClient>,

    // Session ID (created on connection initialization)
    session_id: String,

    // Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    // Whether get_objects enumerates primary/foreign key constraints
    include_table_constraints: bool,
}

/// Type alias for our empty reader used in stub implementations.
type EmptyReader =
    RecordBatchIterator<std::vec::IntoIter<std::result::Result<RecordBatch, ArrowError>>>;

impl Connection {
    /// Called by Database::new_connection().
    ///
    /// Creates the server-side session using the client provided by
    /// Database, then takes ownership of the runtime for all later
    /// blocking bridges.
    pub(crate) fn new_with_runtime(
        config: ConnectionConfig,
        runtime: tokio::runtime::Runtime,
    ) -> crate::error::Result<Self> {
        let session_info = runtime.block_on(config.client.create_session(
            config.catalog.as_deref(),
            config.schema.as_deref(),
            HashMap::new(),
        ))?;

        debug!("Created session: {}", session_info.session_id);

        let mut connection = Self::new(config.client, session_info.session_id, runtime);
        connection.include_table_constraints = config.include_table_constraints;
        Ok(connection)
    }

    /// Wrap an already-established session.
    pub(crate) fn new(
        client: Arc<dyn WarehouseClient>,
        session_id: String,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        Self {
            client,
            session_id,
            runtime,
            include_table_constraints: true,
        }
    }

    pub(crate) fn client(&self) -> &Arc<dyn WarehouseClient> {
        &self.client
    }

    pub(crate) fn runtime(&self) -> &tokio::runtime::Runtime {
        &self.runtime
    }

    /// Returns the session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Create a SQL command bound to this connection.
    pub fn create_command(&self, sql: impl Into<String>) -> Command<'_> {
        Command::new(self, sql)
    }

    /// Serve a flat metadata collection.
    ///
    /// `collection` names one of the seven collections (case sensitive);
    /// `restrictions` are positional LIKE patterns. See
    /// [`crate::metadata::SchemaCollection`] for the collection schemas.
    pub fn get_schema(
        &self,
        collection: &str,
        restrictions: &[Option<&str>],
    ) -> crate::error::Result<RecordBatch> {
        let provider = CollectionProvider::new(self.client.clone(), self.session_id.clone());
        self.runtime
            .block_on(provider.get_schema(collection, restrictions))
    }

    fn fetch_tables(
        &self,
        catalog: Option<&str>,
        db_schema: Option<&str>,
        table_name: Option<&str>,
        table_type: Option<&[&str]>,
    ) -> Result<Vec<TableInfo>> {
        let batch = self
            .runtime
            .block_on(
                self.client
                    .list_tables(&self.session_id, catalog, db_schema, table_name),
            )
            .map_err(|e| e.to_adbc())?;
        let mut tables = parse_tables(&batch).map_err(|e| e.to_adbc())?;

        // Client-side table_type filtering (SHOW TABLES has no type clause)
        if let Some(types) = table_type {
            tables.retain(|t| types.iter().any(|tt| t.table_type.eq_ignore_ascii_case(tt)));
        }
        Ok(tables)
    }

    /// Fan out SHOW COLUMNS per catalog (parallel tasks, one per catalog).
    fn fetch_columns(
        &self,
        catalogs: &[String],
        db_schema: Option<&str>,
        table_name: Option<&str>,
        column_name: Option<&str>,
    ) -> Result<Vec<ColumnInfo>> {
        self.runtime
            .block_on(async {
                let mut handles = Vec::new();
                for cat in catalogs {
                    let client = self.client.clone();
                    let session_id = self.session_id.clone();
                    let cat = cat.clone();
                    let schema_pattern = db_schema.map(|s| s.to_string());
                    let table_pattern = table_name.map(|s| s.to_string());
                    let col_pattern = column_name.map(|s| s.to_string());

                    handles.push(tokio::spawn(async move {
                        let batch = client
                            .list_columns(
                                &session_id,
                                &cat,
                                schema_pattern.as_deref(),
                                table_pattern.as_deref(),
                                col_pattern.as_deref(),
                            )
                            .await?;
                        parse_columns(&batch)
                    }));
                }

                let mut all_columns = Vec::new();
                for handle in handles {
                    let cols = handle.await.map_err(|e| {
                        WarehouseErrorHelper::io()
                            .message(format!("Column fetch task failed: {}", e))
                    })?;
                    all_columns.extend(cols?);
                }
                Ok::<_, crate::error::Error>(all_columns)
            })
            .map_err(|e| e.to_adbc())
    }

    /// Fetch primary and foreign keys for each table (parallel tasks, one
    /// per table).
    fn fetch_constraints(
        &self,
        tables: &[TableInfo],
    ) -> Result<Vec<(TableInfo, Vec<PrimaryKeyInfo>, Vec<ForeignKeyInfo>)>> {
        self.runtime
            .block_on(async {
                let mut handles = Vec::new();
                for table in tables {
                    let client = self.client.clone();
                    let session_id = self.session_id.clone();
                    let table = table.clone();

                    handles.push(tokio::spawn(async move {
                        let pk_batch = client
                            .list_primary_keys(
                                &session_id,
                                &table.catalog_name,
                                &table.schema_name,
                                &table.table_name,
                            )
                            .await?;
                        let fk_batch = client
                            .list_foreign_keys(
                                &session_id,
                                &table.catalog_name,
                                &table.schema_name,
                                &table.table_name,
                            )
                            .await?;
                        let pks = parse_primary_keys(&pk_batch)?;
                        let fks = parse_foreign_keys(&fk_batch)?;
                        Ok::<_, crate::error::Error>((table, pks, fks))
                    }));
                }

                let mut results = Vec::new();
                for handle in handles {
                    let entry = handle.await.map_err(|e| {
                        WarehouseErrorHelper::io()
                            .message(format!("Constraint fetch task failed: {}", e))
                    })?;
                    results.push(entry?);
                }
                Ok::<_, crate::error::Error>(results)
            })
            .map_err(|e| e.to_adbc())
    }
}

/// Build the get_info batch: info codes plus a dense union carrying the
/// string values, in the layout `GET_INFO_SCHEMA` prescribes.
fn build_info_batch(entries: &[(u32, &str)]) -> crate::error::Result<RecordBatch> {
    let schema = GET_INFO_SCHEMA.clone();
    let DataType::Union(union_fields, UnionMode::Dense) = schema.field(1).data_type() else {
        return Err(WarehouseErrorHelper::invalid_state()
            .message("get_info value field is not a dense union"));
    };

    let string_type_id = union_fields
        .iter()
        .find(|(_, field)| field.name() == "string_value")
        .map(|(type_id, _)| type_id)
        .ok_or_else(|| {
            WarehouseErrorHelper::invalid_state()
                .message("get_info value union has no string_value member")
        })?;

    let type_ids = ScalarBuffer::from(vec![string_type_id; entries.len()]);
    let offsets = ScalarBuffer::from((0..entries.len() as i32).collect::<Vec<_>>());
    let strings = StringArray::from(entries.iter().map(|(_, v)| *v).collect::<Vec<_>>());

    let children: Vec<ArrayRef> = union_fields
        .iter()
        .map(|(type_id, field)| {
            if type_id == string_type_id {
                Arc::new(strings.clone()) as ArrayRef
            } else {
                new_empty_array(field.data_type())
            }
        })
        .collect();

    let values = UnionArray::try_new(union_fields.clone(), type_ids, Some(offsets), children)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))?;
    let names = UInt32Array::from(entries.iter().map(|(code, _)| *code).collect::<Vec<_>>());

    RecordBatch::try_new(schema, vec![Arc::new(names), Arc::new(values)])
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

impl Optionable for Connection {
    type Option = OptionConnection;

    fn set_option(&mut self, key: Self::Option, value: OptionValue) -> Result<()> {
        match key {
            OptionConnection::AutoCommit => {
                // The warehouse has no transactions; accept and ignore
                Ok(())
            }
            OptionConnection::Other(ref s) => match s.as_str() {
                "warehouse.include_table_constraints" => match &value {
                    OptionValue::String(v) => match v.to_lowercase().as_str() {
                        "true" | "1" | "yes" => {
                            self.include_table_constraints = true;
                            Ok(())
                        }
                        "false" | "0" | "no" => {
                            self.include_table_constraints = false;
                            Ok(())
                        }
                        _ => Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc()),
                    },
                    _ => Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc()),
                },
                _ => Err(WarehouseErrorHelper::set_unknown_option(&key).to_adbc()),
            },
            _ => Err(WarehouseErrorHelper::set_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        match key {
            OptionConnection::Other(ref s) if s == "warehouse.include_table_constraints" => {
                Ok(self.include_table_constraints.to_string())
            }
            _ => Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc()),
        }
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

impl adbc_core::Connection for Connection {
    type StatementType = Statement;

    fn new_statement(&mut self) -> Result<Self::StatementType> {
        Ok(Statement::new(
            self.client.clone(),
            self.session_id.clone(),
            self.runtime.handle().clone(),
        ))
    }

    fn cancel(&mut self) -> Result<()> {
        // TODO: Implement connection-level cancellation
        Ok(())
    }

    fn get_info(&self, codes: Option<HashSet<InfoCode>>) -> Result<impl RecordBatchReader + Send> {
        // Filter by requested codes or return all if none specified
        let return_all = codes.is_none();
        let codes = codes.unwrap_or_default();

        let mut entries: Vec<(u32, &str)> = Vec::new();
        if return_all || codes.contains(&InfoCode::DriverName) {
            entries.push((InfoCode::DriverName as u32, "Warehouse ADBC Driver"));
        }
        if return_all || codes.contains(&InfoCode::DriverVersion) {
            entries.push((InfoCode::DriverVersion as u32, env!("CARGO_PKG_VERSION")));
        }
        if return_all || codes.contains(&InfoCode::VendorName) {
            entries.push((InfoCode::VendorName as u32, "Warehouse"));
        }

        let batch = build_info_batch(&entries).map_err(|e| e.to_adbc())?;
        let schema = batch.schema();
        Ok(RecordBatchIterator::new(vec![Ok(batch)], schema))
    }

    fn get_objects(
        &self,
        depth: ObjectDepth,
        catalog: Option<&str>,
        db_schema: Option<&str>,
        table_name: Option<&str>,
        table_type: Option<Vec<&str>>,
        column_name: Option<&str>,
    ) -> Result<impl RecordBatchReader + Send> {
        // GetObjectsBuilder::build returns an opaque `impl RecordBatchReader`;
        // collect its batches and re-wrap in a single concrete type.
        fn collect_reader(reader: impl RecordBatchReader + Send) -> Result<EmptyReader> {
            let schema = reader.schema();
            let batches: std::result::Result<Vec<RecordBatch>, ArrowError> = reader.collect();
            let batches = batches.map_err(|e| {
                WarehouseErrorHelper::io()
                    .message(format!("Failed reading get_objects batch: {}", e))
                    .to_adbc()
            })?;
            let ok_batches: Vec<std::result::Result<RecordBatch, ArrowError>> =
                batches.into_iter().map(Ok).collect();
            Ok(RecordBatchIterator::new(ok_batches.into_iter(), schema))
        }

        let mut builder = GetObjectsBuilder::new();

        match depth {
            ObjectDepth::Catalogs => {
                let batch = self
                    .runtime
                    .block_on(self.client.list_catalogs(&self.session_id))
                    .map_err(|e| e.to_adbc())?;
                let catalogs = parse_catalogs(&batch).map_err(|e| e.to_adbc())?;

                // Client-side filter by catalog pattern (SHOW CATALOGS has no LIKE clause)
                let catalogs = filter_by_pattern(catalogs, catalog, |c| &c.catalog_name);
                for cat in &catalogs {
                    builder.add_catalog(&cat.catalog_name);
                }
            }

            ObjectDepth::Schemas => {
                let batch = self
                    .runtime
                    .block_on(
                        self.client
                            .list_schemas(&self.session_id, catalog, db_schema),
                    )
                    .map_err(|e| e.to_adbc())?;
                let schemas = parse_schemas(&batch).map_err(|e| e.to_adbc())?;
                for schema in &schemas {
                    builder.add_schema(&schema.catalog_name, &schema.schema_name);
                }
            }

            ObjectDepth::Tables => {
                let tables =
                    self.fetch_tables(catalog, db_schema, table_name, table_type.as_deref())?;
                for table in &tables {
                    builder.add_table(&table.catalog_name, &table.schema_name, table);
                }
            }

            ObjectDepth::All | ObjectDepth::Columns => {
                // Step 1: SHOW TABLES to get table_type (not available from SHOW COLUMNS)
                let tables =
                    self.fetch_tables(catalog, db_schema, table_name, table_type.as_deref())?;

                // Step 2: distinct catalogs from the tables result bound the fan-out
                let distinct_catalogs: Vec<String> = {
                    let mut seen = HashSet::new();
                    tables
                        .iter()
                        .filter_map(|t| {
                            if seen.insert(t.catalog_name.clone()) {
                                Some(t.catalog_name.clone())
                            } else {
                                None
                            }
                        })
                        .collect()
                };

                // Step 3: SHOW COLUMNS IN CATALOG <cat> per catalog
                let columns =
                    self.fetch_columns(&distinct_catalogs, db_schema, table_name, column_name)?;

                for table in &tables {
                    builder.add_table(&table.catalog_name, &table.schema_name, table);
                }
                for col in &columns {
                    builder.add_column(&col.catalog_name, &col.schema_name, &col.table_name, col);
                }

                // Step 4: constraint enumeration, gated by the connection option
                if self.include_table_constraints {
                    for (table, pks, fks) in self.fetch_constraints(&tables)? {
                        builder.add_constraints(
                            &table.catalog_name,
                            &table.schema_name,
                            &table.table_name,
                            &pks,
                            &fks,
                        );
                    }
                }
            }

            // `ObjectDepth` is #[non_exhaustive]; no other variants exist today.
            _ => {
                return Err(WarehouseErrorHelper::not_implemented()
                    .message("Unsupported get_objects depth")
                    .to_adbc())
            }
        }

        collect_reader(builder.build().map_err(|e| e.to_adbc())?)
    }

    fn get_table_schema(
        &self,
        catalog: Option<&str>,
        db_schema: Option<&str>,
        table_name: &str,
    ) -> Result<Schema> {
        // SHOW COLUMNS IN CATALOG `{cat}` requires a catalog.
        // If catalog is not provided, discover it via list_tables first.
        let catalog = match catalog {
            Some(c) => c.to_string(),
            None => {
                let batch = self
                    .runtime
                    .block_on(self.client.list_tables(
                        &self.session_id,
                        None,
                        db_schema,
                        Some(table_name),
                    ))
                    .map_err(|e| e.to_adbc())?;
                let tables = parse_tables(&batch).map_err(|e| e.to_adbc())?;
                tables
                    .first()
                    .map(|t| t.catalog_name.clone())
                    .ok_or_else(|| {
                        WarehouseErrorHelper::not_found()
                            .message(format!("Table not found: {}", table_name))
                            .to_adbc()
                    })?
            }
        };

        let batch = self
            .runtime
            .block_on(self.client.list_columns(
                &self.session_id,
                &catalog,
                db_schema,
                Some(table_name),
                None, // all columns
            ))
            .map_err(|e| e.to_adbc())?;
        let fields = parse_columns_as_fields(&batch).map_err(|e| e.to_adbc())?;

        if fields.is_empty() {
            return Err(WarehouseErrorHelper::not_found()
                .message(format!("Table not found: {}", table_name))
                .to_adbc());
        }

        Ok(Schema::new(fields))
    }

    fn get_table_types(&self) -> Result<impl RecordBatchReader + Send> {
        let table_types = self.client.list_table_types();
        let array = StringArray::from(table_types);
        let batch = RecordBatch::try_new(GET_TABLE_TYPES_SCHEMA.clone(), vec![Arc::new(array)])
            .map_err(|e| {
                WarehouseErrorHelper::io()
                    .message(format!("Failed to build get_table_types result: {}", e))
                    .to_adbc()
            })?;

        Ok(RecordBatchIterator::new(
            vec![Ok(batch)],
            GET_TABLE_TYPES_SCHEMA.clone(),
        ))
    }

    fn read_partition(
        &self,
        _partition: impl AsRef<[u8]>,
    ) -> Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            WarehouseErrorHelper::not_implemented()
                .message("read_partition")
                .to_adbc(),
        )
    }

    fn commit(&mut self) -> Result<()> {
        // The warehouse is auto-commit only
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        Err(WarehouseErrorHelper::not_implemented()
            .message("rollback - the warehouse is auto-commit only")
            .to_adbc())
    }

    fn get_statistic_names(&self) -> Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            WarehouseErrorHelper::not_implemented()
                .message("get_statistic_names")
                .to_adbc(),
        )
    }

    fn get_statistics(
        &self,
        _catalog: Option<&str>,
        _db_schema: Option<&str>,
        _table_name: Option<&str>,
        _approximate: bool,
    ) -> Result<impl RecordBatchReader + Send> {
        Err::<EmptyReader, _>(
            WarehouseErrorHelper::not_implemented()
                .message("get_statistics")
                .to_adbc(),
        )
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // Clean up session on connection close
        debug!("Closing session: {}", self.session_id);
        let _ = self
            .runtime
            .block_on(self.client.delete_session(&self.session_id));
    }
}
