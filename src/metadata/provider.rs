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

//! Flat metadata schema provider.
//!
//! `CollectionProvider` answers `get_schema` requests: it dispatches a
//! collection name plus positional restrictions to the warehouse client
//! and shapes the results into the fixed collection batches defined in
//! `collections`. Catalog restrictions are resolved client side against
//! `SHOW CATALOGS`, so a restriction naming nothing yields an empty
//! batch instead of a backend error.

use std::collections::HashSet;
use std::sync::Arc;

use arrow_array::RecordBatch;

use crate::client::WarehouseClient;
use crate::error::{Result, WarehouseErrorHelper};
use crate::metadata::collections::{
    catalogs_batch, columns_batch, meta_data_collections_batch, restrictions_batch, schemas_batch,
    table_types_batch, tables_batch, SchemaCollection,
};
use crate::metadata::parse::{parse_catalogs, parse_columns, parse_schemas, parse_tables};

/// Serves the flat metadata collections for one connection's session.
#[derive(Debug, Clone)]
pub struct CollectionProvider {
    client: Arc<dyn WarehouseClient>,
    session_id: String,
}

impl CollectionProvider {
    pub fn new(client: Arc<dyn WarehouseClient>, session_id: impl Into<String>) -> Self {
        Self {
            client,
            session_id: session_id.into(),
        }
    }

    /// Return the requested collection as a single batch.
    ///
    /// Collection names are case sensitive; an unknown name is a
    /// `NotFound` error. A restrictions slice longer than the collection
    /// accepts yields an empty batch with the collection's schema.
    /// Restriction values naming a nonexistent catalog, schema or table
    /// yield zero rows, never an error.
    pub async fn get_schema(
        &self,
        collection: &str,
        restrictions: &[Option<&str>],
    ) -> Result<RecordBatch> {
        let collection = SchemaCollection::from_name(collection)?;
        if restrictions.len() > collection.restriction_count() {
            return Ok(collection.empty_batch());
        }

        match collection {
            SchemaCollection::MetaDataCollections => meta_data_collections_batch(),
            SchemaCollection::Restrictions => restrictions_batch(),
            SchemaCollection::TableTypes => table_types_batch(&self.client.list_table_types()),
            SchemaCollection::Catalogs => self.catalogs(restriction(restrictions, 0)).await,
            SchemaCollection::Schemas => {
                self.schemas(restriction(restrictions, 0), restriction(restrictions, 1))
                    .await
            }
            SchemaCollection::Tables => {
                self.tables(
                    restriction(restrictions, 0),
                    restriction(restrictions, 1),
                    restriction(restrictions, 2),
                    restriction(restrictions, 3),
                )
                .await
            }
            SchemaCollection::Columns => {
                self.columns(
                    restriction(restrictions, 0),
                    restriction(restrictions, 1),
                    restriction(restrictions, 2),
                    restriction(restrictions, 3),
                )
                .await
            }
        }
    }

    async fn catalogs(&self, pattern: Option<&str>) -> Result<RecordBatch> {
        // SHOW CATALOGS takes no LIKE clause; filter client side.
        let batch = self.client.list_catalogs(&self.session_id).await?;
        let mut catalogs = parse_catalogs(&batch)?;
        if !is_unrestricted(pattern) {
            catalogs = filter_by_pattern(catalogs, pattern, |c| &c.catalog_name);
        }
        catalogs_batch(&catalogs)
    }

    async fn schemas(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
    ) -> Result<RecordBatch> {
        match self.resolve_catalogs(catalog).await? {
            None => {
                let batch = self
                    .client
                    .list_schemas(&self.session_id, None, schema_pattern)
                    .await?;
                schemas_batch(&parse_schemas(&batch)?)
            }
            Some(catalogs) => {
                let mut schemas = Vec::new();
                for cat in &catalogs {
                    let batch = self
                        .client
                        .list_schemas(&self.session_id, Some(cat), schema_pattern)
                        .await?;
                    schemas.extend(parse_schemas(&batch)?);
                }
                schemas_batch(&schemas)
            }
        }
    }

    async fn tables(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        type_pattern: Option<&str>,
    ) -> Result<RecordBatch> {
        let mut tables = match self.resolve_catalogs(catalog).await? {
            None => {
                let batch = self
                    .client
                    .list_tables(&self.session_id, None, schema_pattern, table_pattern)
                    .await?;
                parse_tables(&batch)?
            }
            Some(catalogs) => {
                let mut tables = Vec::new();
                for cat in &catalogs {
                    let batch = self
                        .client
                        .list_tables(&self.session_id, Some(cat), schema_pattern, table_pattern)
                        .await?;
                    tables.extend(parse_tables(&batch)?);
                }
                tables
            }
        };

        // SHOW TABLES has no type clause; the type restriction is a LIKE
        // pattern matched client side, case insensitively.
        if let Some(p) = type_pattern {
            if !p.is_empty() && p != "%" {
                let pattern = p.to_uppercase();
                tables.retain(|t| like_match(&pattern, &t.table_type.to_uppercase()));
            }
        }
        tables_batch(&tables)
    }

    async fn columns(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        column_pattern: Option<&str>,
    ) -> Result<RecordBatch> {
        // SHOW COLUMNS requires a concrete catalog. Under a wildcard
        // restriction, narrow the fan-out to catalogs that actually
        // contain matching tables.
        let distinct_catalogs: Vec<String> = match self.resolve_catalogs(catalog).await? {
            Some(catalogs) => catalogs,
            None => {
                let batch = self
                    .client
                    .list_tables(&self.session_id, None, schema_pattern, table_pattern)
                    .await?;
                let tables = parse_tables(&batch)?;
                let mut seen = HashSet::new();
                tables
                    .into_iter()
                    .filter_map(|t| {
                        if seen.insert(t.catalog_name.clone()) {
                            Some(t.catalog_name)
                        } else {
                            None
                        }
                    })
                    .collect()
            }
        };

        let mut handles = Vec::new();
        for cat in &distinct_catalogs {
            let client = Arc::clone(&self.client);
            let session_id = self.session_id.clone();
            let cat = cat.clone();
            let schema_pattern = schema_pattern.map(|s| s.to_string());
            let table_pattern = table_pattern.map(|s| s.to_string());
            let column_pattern = column_pattern.map(|s| s.to_string());

            handles.push(tokio::spawn(async move {
                let batch = client
                    .list_columns(
                        &session_id,
                        &cat,
                        schema_pattern.as_deref(),
                        table_pattern.as_deref(),
                        column_pattern.as_deref(),
                    )
                    .await?;
                parse_columns(&batch)
            }));
        }

        let mut columns = Vec::new();
        for handle in handles {
            let cols = handle.await.map_err(|e| {
                WarehouseErrorHelper::io().message(format!("Column fetch task failed: {}", e))
            })?;
            columns.extend(cols?);
        }

        // Task completion order is nondeterministic; impose the
        // catalog/schema/table/ordinal order callers rely on.
        columns.sort_by(|a, b| {
            (
                &a.catalog_name,
                &a.schema_name,
                &a.table_name,
                a.ordinal_position,
            )
                .cmp(&(
                    &b.catalog_name,
                    &b.schema_name,
                    &b.table_name,
                    b.ordinal_position,
                ))
        });
        columns_batch(&columns)
    }

    /// Resolve a catalog restriction to concrete catalog names.
    ///
    /// Returns `None` when the restriction is absent or a wildcard, in
    /// which case callers use the backend's ALL CATALOGS form. Otherwise
    /// lists catalogs and filters them by the restriction as a LIKE
    /// pattern; a restriction matching nothing resolves to an empty list,
    /// so downstream queries never name a nonexistent catalog.
    async fn resolve_catalogs(&self, pattern: Option<&str>) -> Result<Option<Vec<String>>> {
        if is_unrestricted(pattern) {
            return Ok(None);
        }
        let batch = self.client.list_catalogs(&self.session_id).await?;
        let catalogs = filter_by_pattern(parse_catalogs(&batch)?, pattern, |c| &c.catalog_name);
        Ok(Some(
            catalogs.into_iter().map(|c| c.catalog_name).collect(),
        ))
    }
}

/// Restriction value at `index`, if present and non-null.
fn restriction<'a>(restrictions: &[Option<&'a str>], index: usize) -> Option<&'a str> {
    restrictions.get(index).copied().flatten()
}

/// Returns `true` if the pattern is `None`, empty, or a wildcard (`%` or `*`).
fn is_unrestricted(pattern: Option<&str>) -> bool {
    matches!(pattern, None | Some("") | Some("%") | Some("*"))
}

/// Filter items by a SQL LIKE pattern.
///
/// Patterns use `%` as multi-character wildcard and `_` as single-character wildcard.
/// If `pattern` is None, empty, or `%`, all items are returned (no filtering).
pub(crate) fn filter_by_pattern<T, F>(items: Vec<T>, pattern: Option<&str>, get_field: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    match pattern {
        None => items,
        Some(p) if p.is_empty() || p == "%" => items,
        Some(p) => items
            .into_iter()
            .filter(|item| like_match(p, get_field(item)))
            .collect(),
    }
}

/// Match a string against a SQL LIKE pattern.
///
/// `%` matches any sequence of characters (including empty).
/// `_` matches exactly one character.
pub(crate) fn like_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    like_match_recursive(&pattern, &text, 0, 0)
}

fn like_match_recursive(pattern: &[char], text: &[char], pi: usize, ti: usize) -> bool {
    if pi == pattern.len() {
        return ti == text.len();
    }

    match pattern[pi] {
        '%' => {
            // Skip consecutive % characters
            let mut pi = pi;
            while pi < pattern.len() && pattern[pi] == '%' {
                pi += 1;
            }
            // Try matching the rest of the pattern starting at each position
            for ti in ti..=text.len() {
                if like_match_recursive(pattern, text, pi, ti) {
                    return true;
                }
            }
            false
        }
        '_' => {
            if ti < text.len() {
                like_match_recursive(pattern, text, pi + 1, ti + 1)
            } else {
                false
            }
        }
        ch => {
            if ti < text.len() && text[ti] == ch {
                like_match_recursive(pattern, text, pi + 1, ti + 1)
            } else {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ExecuteResponse, SessionInfo};
    use crate::types::rest::ExecuteParams;
    use adbc_core::error::Status;
    use arrow_array::cast::AsArray;
    use arrow_array::types::Int32Type;
    use arrow_array::{ArrayRef, Int64Array, StringArray};
    use arrow_schema::{DataType, Field, Schema};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// In-memory warehouse with a fixed namespace tree.
    ///
    /// List calls scope and filter the way the backend would, and asking
    /// for a concrete catalog that does not exist fails like the real
    /// server does.
    #[derive(Debug, Default)]
    struct MockClient {
        catalogs: Vec<&'static str>,
        schemas: Vec<(&'static str, &'static str)>,
        tables: Vec<(&'static str, &'static str, &'static str, &'static str)>,
        columns: Vec<(
            &'static str,
            &'static str,
            &'static str,
            &'static str,
            i64,
            &'static str,
        )>,
    }

    impl MockClient {
        fn sample() -> Self {
            Self {
                catalogs: vec!["main", "samples", "sys"],
                schemas: vec![
                    ("main", "default"),
                    ("main", "sales"),
                    ("samples", "tpch"),
                    ("sys", "information_schema"),
                ],
                tables: vec![
                    ("main", "default", "users", "TABLE"),
                    ("main", "default", "user_view", "VIEW"),
                    ("main", "sales", "orders", "TABLE"),
                    ("samples", "tpch", "lineitem", "TABLE"),
                ],
                columns: vec![
                    ("main", "default", "users", "id", 1, "INT"),
                    ("main", "default", "users", "name", 2, "STRING"),
                    ("main", "sales", "orders", "order_id", 1, "BIGINT"),
                    ("samples", "tpch", "lineitem", "l_orderkey", 1, "BIGINT"),
                ],
            }
        }

        fn matches(pattern: Option<&str>, text: &str) -> bool {
            match pattern {
                None => true,
                Some(p) if p.is_empty() || p == "%" => true,
                Some(p) => like_match(p, text),
            }
        }

        fn check_catalog(&self, catalog: &str) -> Result<()> {
            if self.catalogs.contains(&catalog) {
                Ok(())
            } else {
                Err(WarehouseErrorHelper::io()
                    .message(format!("Catalog '{}' does not exist", catalog)))
            }
        }
    }

    fn catalogs_result(names: &[&str]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "catalog",
            DataType::Utf8,
            false,
        )]));
        RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(names.to_vec())) as ArrayRef],
        )
        .unwrap()
    }

    fn schemas_result(rows: &[(&str, &str)]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("catalog", DataType::Utf8, false),
            Field::new("database_name", DataType::Utf8, false),
        ]));
        let catalogs: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let names: Vec<&str> = rows.iter().map(|r| r.1).collect();
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(catalogs)) as ArrayRef,
                Arc::new(StringArray::from(names)) as ArrayRef,
            ],
        )
        .unwrap()
    }

    fn tables_result(rows: &[(&str, &str, &str, &str)]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("catalog_name", DataType::Utf8, false),
            Field::new("namespace", DataType::Utf8, false),
            Field::new("table_name", DataType::Utf8, false),
            Field::new("table_type", DataType::Utf8, false),
        ]));
        let catalogs: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let namespaces: Vec<&str> = rows.iter().map(|r| r.1).collect();
        let names: Vec<&str> = rows.iter().map(|r| r.2).collect();
        let types: Vec<&str> = rows.iter().map(|r| r.3).collect();
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(catalogs)) as ArrayRef,
                Arc::new(StringArray::from(namespaces)) as ArrayRef,
                Arc::new(StringArray::from(names)) as ArrayRef,
                Arc::new(StringArray::from(types)) as ArrayRef,
            ],
        )
        .unwrap()
    }

    fn columns_result(rows: &[(&str, &str, &str, &str, i64, &str)]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("catalog_name", DataType::Utf8, false),
            Field::new("namespace", DataType::Utf8, false),
            Field::new("table_name", DataType::Utf8, false),
            Field::new("col_name", DataType::Utf8, false),
            Field::new("ordinal_position", DataType::Int64, false),
            Field::new("column_type", DataType::Utf8, false),
        ]));
        let catalogs: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let namespaces: Vec<&str> = rows.iter().map(|r| r.1).collect();
        let tables: Vec<&str> = rows.iter().map(|r| r.2).collect();
        let names: Vec<&str> = rows.iter().map(|r| r.3).collect();
        let ordinals: Vec<i64> = rows.iter().map(|r| r.4).collect();
        let types: Vec<&str> = rows.iter().map(|r| r.5).collect();
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(catalogs)) as ArrayRef,
                Arc::new(StringArray::from(namespaces)) as ArrayRef,
                Arc::new(StringArray::from(tables)) as ArrayRef,
                Arc::new(StringArray::from(names)) as ArrayRef,
                Arc::new(Int64Array::from(ordinals)) as ArrayRef,
                Arc::new(StringArray::from(types)) as ArrayRef,
            ],
        )
        .unwrap()
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
            Err(WarehouseErrorHelper::io().message("unexpected execute_statement call"))
        }

        async fn get_statement_status(&self, _statement_id: &str) -> Result<ExecuteResponse> {
            Err(WarehouseErrorHelper::io().message("unexpected get_statement_status call"))
        }

        async fn cancel_statement(&self, _statement_id: &str) -> Result<()> {
            Ok(())
        }

        async fn close_statement(&self, _statement_id: &str) -> Result<()> {
            Ok(())
        }

        async fn list_catalogs(&self, _session_id: &str) -> Result<RecordBatch> {
            Ok(catalogs_result(&self.catalogs))
        }

        async fn list_schemas(
            &self,
            _session_id: &str,
            catalog: Option<&str>,
            schema_pattern: Option<&str>,
        ) -> Result<RecordBatch> {
            if let Some(cat) = catalog {
                self.check_catalog(cat)?;
            }
            let rows: Vec<(&str, &str)> = self
                .schemas
                .iter()
                .copied()
                .filter(|&(cat, name)| {
                    catalog.map_or(true, |c| cat == c) && Self::matches(schema_pattern, name)
                })
                .collect();
            Ok(schemas_result(&rows))
        }

        async fn list_tables(
            &self,
            _session_id: &str,
            catalog: Option<&str>,
            schema_pattern: Option<&str>,
            table_pattern: Option<&str>,
        ) -> Result<RecordBatch> {
            if let Some(cat) = catalog {
                self.check_catalog(cat)?;
            }
            let rows: Vec<(&str, &str, &str, &str)> = self
                .tables
                .iter()
                .copied()
                .filter(|&(cat, schema, table, _)| {
                    catalog.map_or(true, |c| cat == c)
                        && Self::matches(schema_pattern, schema)
                        && Self::matches(table_pattern, table)
                })
                .collect();
            Ok(tables_result(&rows))
        }

        async fn list_columns(
            &self,
            _session_id: &str,
            catalog: &str,
            schema_pattern: Option<&str>,
            table_pattern: Option<&str>,
            column_pattern: Option<&str>,
        ) -> Result<RecordBatch> {
            self.check_catalog(catalog)?;
            let rows: Vec<(&str, &str, &str, &str, i64, &str)> = self
                .columns
                .iter()
                .copied()
                .filter(|&(cat, schema, table, column, _, _)| {
                    cat == catalog
                        && Self::matches(schema_pattern, schema)
                        && Self::matches(table_pattern, table)
                        && Self::matches(column_pattern, column)
                })
                .collect();
            Ok(columns_result(&rows))
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
            vec![
                "TABLE".to_string(),
                "VIEW".to_string(),
                "SYSTEM TABLE".to_string(),
                "MATERIALIZED VIEW".to_string(),
            ]
        }
    }

    fn provider() -> CollectionProvider {
        CollectionProvider::new(Arc::new(MockClient::sample()), "test-session")
    }

    #[tokio::test]
    async fn test_meta_data_collections_listing() {
        let batch = provider()
            .get_schema("MetaDataCollections", &[])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 7);
    }

    #[tokio::test]
    async fn test_restrictions_listing() {
        let batch = provider().get_schema("Restrictions", &[]).await.unwrap();
        assert_eq!(batch.num_rows(), 11);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_not_found() {
        let err = provider().get_schema("Indexes", &[]).await.unwrap_err();
        assert_eq!(err.status(), Status::NotFound);
    }

    #[tokio::test]
    async fn test_collection_names_are_case_sensitive() {
        let err = provider().get_schema("tables", &[]).await.unwrap_err();
        assert_eq!(err.status(), Status::NotFound);
    }

    #[tokio::test]
    async fn test_too_many_restrictions_yield_empty_batch() {
        let provider = provider();

        let batch = provider
            .get_schema("MetaDataCollections", &[Some("x")])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(
            batch.schema(),
            SchemaCollection::MetaDataCollections.schema()
        );

        let batch = provider
            .get_schema("Catalogs", &[Some("main"), Some("extra")])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.schema(), SchemaCollection::Catalogs.schema());
    }

    #[tokio::test]
    async fn test_table_types_collection() {
        let batch = provider().get_schema("TableTypes", &[]).await.unwrap();
        assert_eq!(batch.num_rows(), 4);
        let types = batch.column(0).as_string::<i32>();
        assert_eq!(types.value(0), "TABLE");
    }

    #[tokio::test]
    async fn test_catalogs_unrestricted() {
        let batch = provider().get_schema("Catalogs", &[]).await.unwrap();
        assert_eq!(batch.num_rows(), 3);
    }

    #[tokio::test]
    async fn test_catalogs_like_pattern() {
        let batch = provider()
            .get_schema("Catalogs", &[Some("s%")])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 2);
        let names = batch.column(0).as_string::<i32>();
        assert_eq!(names.value(0), "samples");
        assert_eq!(names.value(1), "sys");
    }

    #[tokio::test]
    async fn test_schemas_wildcard_catalog_spans_all() {
        let batch = provider()
            .get_schema("Schemas", &[None, None])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 4);
    }

    #[tokio::test]
    async fn test_schemas_concrete_catalog() {
        let batch = provider()
            .get_schema("Schemas", &[Some("main"), None])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 2);
        let catalogs = batch.column(0).as_string::<i32>();
        assert_eq!(catalogs.value(0), "main");
        assert_eq!(catalogs.value(1), "main");
    }

    #[tokio::test]
    async fn test_schemas_catalog_pattern_fans_out() {
        let batch = provider()
            .get_schema("Schemas", &[Some("s%"), None])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 2);
        let names = batch.column(1).as_string::<i32>();
        assert_eq!(names.value(0), "tpch");
        assert_eq!(names.value(1), "information_schema");
    }

    #[tokio::test]
    async fn test_schemas_nonexistent_catalog_yields_zero_rows() {
        // The mock errors on unknown concrete catalogs, so reaching the
        // backend here would fail the test.
        let batch = provider()
            .get_schema("Schemas", &[Some("no_such"), None])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.schema(), SchemaCollection::Schemas.schema());
    }

    #[tokio::test]
    async fn test_schemas_schema_pattern() {
        let batch = provider()
            .get_schema("Schemas", &[Some("main"), Some("sa%")])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.column(1).as_string::<i32>().value(0), "sales");
    }

    #[tokio::test]
    async fn test_tables_unrestricted() {
        let batch = provider().get_schema("Tables", &[]).await.unwrap();
        assert_eq!(batch.num_rows(), 4);
        assert_eq!(batch.num_columns(), 4);
    }

    #[tokio::test]
    async fn test_tables_type_filter_is_case_insensitive() {
        let batch = provider()
            .get_schema("Tables", &[None, None, None, Some("view")])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.column(2).as_string::<i32>().value(0), "user_view");
    }

    #[tokio::test]
    async fn test_tables_type_wildcard_is_unfiltered() {
        let batch = provider()
            .get_schema("Tables", &[None, None, None, Some("%")])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 4);
    }

    #[tokio::test]
    async fn test_tables_name_pattern() {
        let batch = provider()
            .get_schema("Tables", &[None, None, Some("user%"), None])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 2);
    }

    #[tokio::test]
    async fn test_columns_ordered_across_catalogs() {
        let batch = provider().get_schema("Columns", &[]).await.unwrap();
        assert_eq!(batch.num_rows(), 4);
        assert_eq!(batch.num_columns(), 16);

        let catalogs = batch.column(0).as_string::<i32>();
        let names = batch.column(3).as_string::<i32>();
        let ordinals = batch.column(4).as_primitive::<Int32Type>();
        assert_eq!(catalogs.value(0), "main");
        assert_eq!(names.value(0), "id");
        assert_eq!(ordinals.value(0), 1);
        assert_eq!(names.value(1), "name");
        assert_eq!(ordinals.value(1), 2);
        assert_eq!(catalogs.value(3), "samples");
        assert_eq!(names.value(3), "l_orderkey");
    }

    #[tokio::test]
    async fn test_columns_nonexistent_table_yields_zero_rows() {
        let batch = provider()
            .get_schema("Columns", &[None, None, Some("no_such"), None])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.schema(), SchemaCollection::Columns.schema());
    }

    #[tokio::test]
    async fn test_columns_concrete_catalog_and_column_pattern() {
        let batch = provider()
            .get_schema("Columns", &[Some("main"), None, Some("users"), Some("id")])
            .await
            .unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.column(3).as_string::<i32>().value(0), "id");
    }

    #[test]
    fn test_like_match() {
        assert!(like_match("%", "anything"));
        assert!(like_match("ma%", "main"));
        assert!(like_match("m_in", "main"));
        assert!(like_match("%%es", "samples"));
        assert!(!like_match("ma%", "samples"));
        assert!(!like_match("m_n", "main"));
        assert!(like_match("", ""));
        assert!(!like_match("", "x"));
    }

    #[test]
    fn test_filter_by_pattern_wildcards_pass_through() {
        let items = vec!["alpha".to_string(), "beta".to_string()];
        assert_eq!(filter_by_pattern(items.clone(), None, |s| s).len(), 2);
        assert_eq!(filter_by_pattern(items.clone(), Some(""), |s| s).len(), 2);
        assert_eq!(filter_by_pattern(items.clone(), Some("%"), |s| s).len(), 2);
        assert_eq!(filter_by_pattern(items, Some("alpha"), |s| s).len(), 1);
    }
}
