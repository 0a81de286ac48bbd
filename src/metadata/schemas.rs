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

//! Arrow schema definitions for the ADBC get_objects() result.
//!
//! The get_objects() result is a nested hierarchy:
//!
//! - catalog (catalog_name, catalog_db_schemas)
//!   - db_schema (db_schema_name, db_schema_tables)
//!     - table (table_name, table_type, table_columns, table_constraints)
//!       - column (column_name, ordinal_position, remarks, xdbc_* fields)
//!       - constraint (constraint_name, constraint_type, constraint_column_names,
//!         constraint_column_usage)
//!         - usage (fk_catalog, fk_db_schema, fk_table, fk_column_name)
//!
//! The `*_fields()` functions return the struct fields at each level; the
//! `*_item_field()` helpers return the list item wrappers the builder uses
//! when assembling the nested arrays.

use arrow_schema::{DataType, Field, FieldRef, Fields, Schema};
use std::sync::Arc;

/// Schema of the top-level get_objects() result.
///
/// - `catalog_name`: Utf8 (nullable)
/// - `catalog_db_schemas`: List of db_schema structs (nullable)
pub fn get_objects_schema() -> Schema {
    Schema::new(vec![
        Field::new("catalog_name", DataType::Utf8, true),
        Field::new(
            "catalog_db_schemas",
            DataType::List(db_schema_item_field()),
            true,
        ),
    ])
}

/// List item wrapper for db_schema structs.
pub(crate) fn db_schema_item_field() -> FieldRef {
    Arc::new(Field::new(
        "item",
        DataType::Struct(db_schema_fields()),
        true,
    ))
}

/// Struct fields for a database schema entry.
///
/// - `db_schema_name`: Utf8 (nullable)
/// - `db_schema_tables`: List of table structs (nullable)
pub fn db_schema_fields() -> Fields {
    Fields::from(vec![
        Field::new("db_schema_name", DataType::Utf8, true),
        Field::new("db_schema_tables", DataType::List(table_item_field()), true),
    ])
}

/// List item wrapper for table structs.
pub(crate) fn table_item_field() -> FieldRef {
    Arc::new(Field::new("item", DataType::Struct(table_fields()), true))
}

/// Struct fields for a table entry.
///
/// - `table_name`: Utf8 NOT NULL
/// - `table_type`: Utf8 NOT NULL
/// - `table_columns`: List of column structs (nullable)
/// - `table_constraints`: List of constraint structs (nullable)
pub fn table_fields() -> Fields {
    Fields::from(vec![
        Field::new("table_name", DataType::Utf8, false),
        Field::new("table_type", DataType::Utf8, false),
        Field::new("table_columns", DataType::List(column_item_field()), true),
        Field::new(
            "table_constraints",
            DataType::List(constraint_item_field()),
            true,
        ),
    ])
}

/// List item wrapper for column structs.
pub(crate) fn column_item_field() -> FieldRef {
    Arc::new(Field::new("item", DataType::Struct(column_fields()), true))
}

/// Struct fields for a column entry.
///
/// `column_name` is required; the rest are the XDBC descriptor fields from the
/// ADBC specification (type codes, size/precision, nullability, defaults, and
/// the REF-type scope fields, which this driver always leaves null).
pub fn column_fields() -> Fields {
    Fields::from(vec![
        Field::new("column_name", DataType::Utf8, false),
        Field::new("ordinal_position", DataType::Int32, true),
        Field::new("remarks", DataType::Utf8, true),
        Field::new("xdbc_data_type", DataType::Int16, true),
        Field::new("xdbc_type_name", DataType::Utf8, true),
        Field::new("xdbc_column_size", DataType::Int32, true),
        Field::new("xdbc_decimal_digits", DataType::Int16, true),
        Field::new("xdbc_num_prec_radix", DataType::Int16, true),
        Field::new("xdbc_nullable", DataType::Int16, true),
        Field::new("xdbc_column_def", DataType::Utf8, true),
        Field::new("xdbc_sql_data_type", DataType::Int16, true),
        Field::new("xdbc_datetime_sub", DataType::Int16, true),
        Field::new("xdbc_char_octet_length", DataType::Int32, true),
        Field::new("xdbc_is_nullable", DataType::Utf8, true),
        Field::new("xdbc_scope_catalog", DataType::Utf8, true),
        Field::new("xdbc_scope_schema", DataType::Utf8, true),
        Field::new("xdbc_scope_table", DataType::Utf8, true),
        Field::new("xdbc_is_autoincrement", DataType::Boolean, true),
        Field::new("xdbc_is_generatedcolumn", DataType::Boolean, true),
    ])
}

/// List item wrapper for constraint structs.
pub(crate) fn constraint_item_field() -> FieldRef {
    Arc::new(Field::new(
        "item",
        DataType::Struct(constraint_fields()),
        true,
    ))
}

/// Struct fields for a constraint entry.
///
/// - `constraint_name`: Utf8 (nullable)
/// - `constraint_type`: Utf8 NOT NULL ("PRIMARY KEY", "FOREIGN KEY", "UNIQUE")
/// - `constraint_column_names`: List of Utf8 NOT NULL
/// - `constraint_column_usage`: List of usage structs (nullable, foreign keys)
pub fn constraint_fields() -> Fields {
    Fields::from(vec![
        Field::new("constraint_name", DataType::Utf8, true),
        Field::new("constraint_type", DataType::Utf8, false),
        Field::new(
            "constraint_column_names",
            DataType::List(constraint_column_name_item_field()),
            false,
        ),
        Field::new(
            "constraint_column_usage",
            DataType::List(usage_item_field()),
            true,
        ),
    ])
}

/// List item wrapper for constraint column names.
pub(crate) fn constraint_column_name_item_field() -> FieldRef {
    Arc::new(Field::new("item", DataType::Utf8, false))
}

/// List item wrapper for constraint usage structs.
pub(crate) fn usage_item_field() -> FieldRef {
    Arc::new(Field::new("item", DataType::Struct(usage_fields()), true))
}

/// Struct fields for a constraint usage entry (foreign key references).
///
/// - `fk_catalog`: Utf8 (nullable)
/// - `fk_db_schema`: Utf8 (nullable)
/// - `fk_table`: Utf8 NOT NULL
/// - `fk_column_name`: Utf8 NOT NULL
pub fn usage_fields() -> Fields {
    Fields::from(vec![
        Field::new("fk_catalog", DataType::Utf8, true),
        Field::new("fk_db_schema", DataType::Utf8, true),
        Field::new("fk_table", DataType::Utf8, false),
        Field::new("fk_column_name", DataType::Utf8, false),
    ])
}
