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

//! Integration tests for Connection metadata methods.
//!
//! These tests run against a real warehouse endpoint and verify the
//! `get_schema()` collection contract alongside `get_objects()`,
//! `get_table_schema()`, and `get_table_types()`.
//!
//! ## Setup Requirements
//!
//! These tests require the following environment variables to be set:
//! - `WAREHOUSE_URI`: the warehouse base URL (e.g., "https://warehouse.example.com")
//! - `WAREHOUSE_ID`: the SQL warehouse ID
//! - `WAREHOUSE_TOKEN`: a valid access token
//!
//! Optionally, you can specify a test catalog and schema:
//! - `WAREHOUSE_TEST_CATALOG`: the catalog to use for tests (default: "main")
//! - `WAREHOUSE_TEST_SCHEMA`: the schema to use for tests (default: "default")
//!
//! ## Running Tests
//!
//! These tests are marked with `#[ignore]` to prevent them from running in
//! CI without credentials. To run them locally:
//!
//! ```bash
//! export WAREHOUSE_URI="https://your-warehouse.example.com"
//! export WAREHOUSE_ID="your-warehouse-id"
//! export WAREHOUSE_TOKEN="your-token"
//! cargo test --test integration metadata_tests -- --ignored --nocapture
//! ```

use adbc_core::options::{ObjectDepth, OptionDatabase, OptionValue};
use adbc_core::Connection as _;
use adbc_core::Database as _;
use adbc_core::Driver as _;
use adbc_core::Optionable;
use arrow_array::{Array, RecordBatchReader, StringArray};
use arrow_schema::DataType;
use std::env;
use warehouse_adbc::Driver;

/// Helper struct for test configuration.
struct TestConfig {
    uri: String,
    warehouse_id: String,
    token: String,
    catalog: String,
    schema: String,
}

impl TestConfig {
    /// Creates a TestConfig from environment variables.
    ///
    /// Panics if required environment variables are not set.
    fn from_env() -> Self {
        Self {
            uri: env::var("WAREHOUSE_URI").expect("WAREHOUSE_URI not set"),
            warehouse_id: env::var("WAREHOUSE_ID").expect("WAREHOUSE_ID not set"),
            token: env::var("WAREHOUSE_TOKEN").expect("WAREHOUSE_TOKEN not set"),
            catalog: env::var("WAREHOUSE_TEST_CATALOG").unwrap_or_else(|_| "main".to_string()),
            schema: env::var("WAREHOUSE_TEST_SCHEMA").unwrap_or_else(|_| "default".to_string()),
        }
    }
}

/// Creates a connected database and connection for testing.
fn create_test_connection() -> warehouse_adbc::Connection {
    let config = TestConfig::from_env();

    let mut driver = Driver::new();
    let mut database = driver.new_database().expect("Failed to create database");

    database
        .set_option(OptionDatabase::Uri, OptionValue::String(config.uri))
        .expect("Failed to set uri");
    database
        .set_option(
            OptionDatabase::Other("warehouse.warehouse_id".into()),
            OptionValue::String(config.warehouse_id),
        )
        .expect("Failed to set warehouse_id");
    database
        .set_option(
            OptionDatabase::Other("warehouse.access_token".into()),
            OptionValue::String(config.token),
        )
        .expect("Failed to set access_token");

    database.new_connection().expect("Failed to connect")
}

/// A catalog name guaranteed to exist in no warehouse.
fn nonexistent_name() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("no_such_catalog_{}_{}", std::process::id(), nanos)
}

// =============================================================================
// get_schema Collection Tests
// =============================================================================

/// The two static collections have fixed, data-independent shapes.
#[test]
#[ignore]
fn test_get_schema_static_collections() {
    let connection = create_test_connection();

    let batch = connection
        .get_schema("MetaDataCollections", &[])
        .expect("MetaDataCollections should succeed");
    assert_eq!(batch.num_columns(), 2);
    assert_eq!(batch.num_rows(), 7);

    let batch = connection
        .get_schema("Restrictions", &[])
        .expect("Restrictions should succeed");
    assert_eq!(batch.num_columns(), 3);
    assert_eq!(batch.num_rows(), 11);
}

/// Unknown collection names are an error, not an empty result.
#[test]
#[ignore]
fn test_get_schema_unknown_collection_errors() {
    let connection = create_test_connection();

    assert!(connection.get_schema("Bogus", &[]).is_err());
    // Collection matching is case sensitive
    assert!(connection.get_schema("catalogs", &[]).is_err());
}

/// Over-length restriction lists yield zero rows, never an error.
#[test]
#[ignore]
fn test_get_schema_over_length_restrictions_yield_empty() {
    let connection = create_test_connection();

    let batch = connection
        .get_schema("Catalogs", &[Some("main"), Some("extra")])
        .expect("over-length restrictions should not error");
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 1);

    // Static collections accept no restrictions at all
    let batch = connection
        .get_schema("TableTypes", &[Some("TABLE")])
        .expect("over-length restrictions should not error");
    assert_eq!(batch.num_rows(), 0);
}

/// Catalogs returns one fixed column; a nonexistent restriction yields
/// zero rows.
#[test]
#[ignore]
fn test_get_schema_catalogs() {
    let connection = create_test_connection();

    let batch = connection
        .get_schema("Catalogs", &[])
        .expect("Catalogs should succeed");
    assert_eq!(batch.num_columns(), 1);
    assert_eq!(batch.schema().field(0).name(), "catalog_name");
    assert!(batch.num_rows() > 0, "Should have at least one catalog");

    let missing = nonexistent_name();
    let batch = connection
        .get_schema("Catalogs", &[Some(&missing)])
        .expect("miss should not error");
    assert_eq!(batch.num_rows(), 0);
}

/// Schemas scoped to a present catalog returns its schemas; scoped to an
/// absent one returns zero rows.
#[test]
#[ignore]
fn test_get_schema_schemas_catalog_scoping() {
    let config = TestConfig::from_env();
    let connection = create_test_connection();

    let batch = connection
        .get_schema("Schemas", &[Some(&config.catalog)])
        .expect("Schemas should succeed");
    assert_eq!(batch.num_columns(), 2);
    assert!(batch.num_rows() > 0, "Test catalog should have schemas");
    let catalogs = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("catalog_name should be StringArray");
    for i in 0..catalogs.len() {
        assert_eq!(catalogs.value(i), config.catalog);
    }

    let missing = nonexistent_name();
    let batch = connection
        .get_schema("Schemas", &[Some(&missing)])
        .expect("miss should not error");
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 2, "Shape is invariant over misses");
}

/// Tables returns exactly 4 columns; an unmatched trailing restriction
/// empties the result no matter how much the earlier ones matched.
#[test]
#[ignore]
fn test_get_schema_tables_restrictions() {
    let config = TestConfig::from_env();
    let connection = create_test_connection();

    let batch = connection
        .get_schema("Tables", &[Some(&config.catalog), Some(&config.schema)])
        .expect("Tables should succeed");
    assert_eq!(batch.num_columns(), 4);
    let with_two_restrictions = batch.num_rows();
    println!(
        "{} tables in {}.{}",
        with_two_restrictions, config.catalog, config.schema
    );

    let missing = nonexistent_name();
    let batch = connection
        .get_schema(
            "Tables",
            &[Some(&config.catalog), Some(&config.schema), Some(&missing)],
        )
        .expect("miss should not error");
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 4);
}

/// Columns always reports exactly 16 columns.
#[test]
#[ignore]
fn test_get_schema_columns_shape() {
    let config = TestConfig::from_env();
    let connection = create_test_connection();

    let batch = connection
        .get_schema("Columns", &[Some(&config.catalog), Some(&config.schema)])
        .expect("Columns should succeed");
    assert_eq!(batch.num_columns(), 16);
    assert_eq!(batch.schema().field(0).name(), "table_catalog");
    assert_eq!(batch.schema().field(3).name(), "column_name");
    assert_eq!(batch.schema().field(4).name(), "ordinal_position");

    let missing = nonexistent_name();
    let batch = connection
        .get_schema("Columns", &[Some(&missing)])
        .expect("miss should not error");
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 16);
}

// =============================================================================
// get_objects Tests at Various Depths
// =============================================================================

/// Test get_objects at Catalogs depth.
///
/// Verifies that:
/// - The result has the correct Arrow schema
/// - At least one catalog is returned
#[test]
#[ignore]
fn test_get_objects_catalogs_depth() {
    let connection = create_test_connection();

    let mut reader = connection
        .get_objects(
            ObjectDepth::Catalogs,
            None, // all catalogs
            None,
            None,
            None,
            None,
        )
        .expect("get_objects should succeed");

    // Verify schema
    let schema = reader.schema();
    assert_eq!(schema.fields().len(), 2, "Should have 2 top-level fields");
    assert_eq!(schema.field(0).name(), "catalog_name");
    assert_eq!(schema.field(1).name(), "catalog_db_schemas");

    // Read results
    let batch = reader.next().expect("Should have one batch").unwrap();
    assert!(batch.num_rows() > 0, "Should have at least one catalog");

    let catalog_names = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("catalog_name should be StringArray");

    println!("Found {} catalogs:", catalog_names.len());
    for i in 0..catalog_names.len() {
        println!("  - {}", catalog_names.value(i));
    }
}

/// Test get_objects at Schemas depth.
#[test]
#[ignore]
fn test_get_objects_schemas_depth() {
    let config = TestConfig::from_env();
    let connection = create_test_connection();

    // Scope to a specific catalog to reduce result size
    let mut reader = connection
        .get_objects(
            ObjectDepth::Schemas,
            Some(&config.catalog),
            None,
            None,
            None,
            None,
        )
        .expect("get_objects should succeed");

    let batch = reader.next().expect("Should have one batch").unwrap();
    assert!(batch.num_rows() > 0, "Should have at least one catalog");

    let db_schemas_col = batch.column(1);
    assert!(
        matches!(db_schemas_col.data_type(), DataType::List(_)),
        "catalog_db_schemas should be a List"
    );

    println!(
        "Found {} catalog rows with schemas at Schemas depth",
        batch.num_rows()
    );
}

/// Test get_objects at Tables depth.
#[test]
#[ignore]
fn test_get_objects_tables_depth() {
    let config = TestConfig::from_env();
    let connection = create_test_connection();

    let mut reader = connection
        .get_objects(
            ObjectDepth::Tables,
            Some(&config.catalog),
            Some(&config.schema),
            None,
            None,
            None,
        )
        .expect("get_objects should succeed");

    let batch = reader.next().expect("Should have one batch").unwrap();
    println!(
        "Found {} catalog rows with tables at Tables depth",
        batch.num_rows()
    );

    let schema = reader.schema();
    assert_eq!(schema.field(0).name(), "catalog_name");
    assert_eq!(schema.field(1).name(), "catalog_db_schemas");
}

/// Test get_objects at Columns depth (full depth).
#[test]
#[ignore]
fn test_get_objects_columns_depth() {
    let config = TestConfig::from_env();
    let connection = create_test_connection();

    let mut reader = connection
        .get_objects(
            ObjectDepth::Columns,
            Some(&config.catalog),
            Some(&config.schema),
            None,
            None,
            None,
        )
        .expect("get_objects should succeed");

    let batch = reader.next().expect("Should have one batch").unwrap();
    println!(
        "Found {} catalog rows at Columns depth",
        batch.num_rows()
    );
    assert!(batch.num_rows() > 0, "Should have at least one catalog");
}

// =============================================================================
// get_table_schema and get_table_types Tests
// =============================================================================

/// Looking up the schema of a table that does not exist is an error.
#[test]
#[ignore]
fn test_get_table_schema_missing_table() {
    let config = TestConfig::from_env();
    let connection = create_test_connection();

    let missing = nonexistent_name();
    let result =
        connection.get_table_schema(Some(&config.catalog), Some(&config.schema), &missing);
    assert!(result.is_err());
}

/// get_table_types returns the driver's fixed type list.
#[test]
#[ignore]
fn test_get_table_types() {
    let connection = create_test_connection();

    let mut reader = connection
        .get_table_types()
        .expect("get_table_types should succeed");

    let batch = reader.next().expect("Should have one batch").unwrap();
    let types = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("table_type should be StringArray");

    let mut found: Vec<&str> = (0..types.len()).map(|i| types.value(i)).collect();
    found.sort_unstable();
    assert!(found.contains(&"TABLE"));
    assert!(found.contains(&"VIEW"));
    println!("Table types: {found:?}");
}
