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

//! Result parsing for metadata queries.
//!
//! Parses `SHOW ...` result batches into the intermediate structs consumed
//! by the schema provider and the `get_objects` builder. Column names match
//! the warehouse result schemas for each SHOW command.

use crate::error::{Result, WarehouseErrorHelper};
use crate::metadata::type_mapping::warehouse_type_to_arrow;
use crate::metadata::types::{
    CatalogInfo, ColumnInfo, ForeignKeyInfo, PrimaryKeyInfo, SchemaInfo, TableInfo,
};
use arrow_array::cast::AsArray;
use arrow_array::RecordBatch;
use arrow_schema::{DataType, Field};

/// Get the index of a column by name, or return an error.
fn column_index(batch: &RecordBatch, name: &str) -> Result<usize> {
    batch.schema().index_of(name).map_err(|_| {
        WarehouseErrorHelper::invalid_state()
            .message(format!("Expected column '{}' in metadata result", name))
    })
}

/// Get a string value from a column at a given row, returning error if not string type.
fn get_string_value(batch: &RecordBatch, col_idx: usize, row: usize) -> Result<String> {
    let array = batch.column(col_idx);
    if array.is_null(row) {
        return Ok(String::new());
    }
    match array.data_type() {
        DataType::Utf8 => Ok(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(array.as_string::<i64>().value(row).to_string()),
        dt => Err(WarehouseErrorHelper::invalid_state()
            .message(format!("Expected string column, got {:?}", dt))),
    }
}

/// Get an optional string value from a column at a given row.
fn get_optional_string_value(
    batch: &RecordBatch,
    col_idx: usize,
    row: usize,
) -> Result<Option<String>> {
    let array = batch.column(col_idx);
    if array.is_null(row) {
        return Ok(None);
    }
    Ok(Some(get_string_value(batch, col_idx, row)?))
}

/// Get an optional i32 value from a column at a given row.
fn get_optional_int32_value(
    batch: &RecordBatch,
    col_idx: usize,
    row: usize,
) -> Result<Option<i32>> {
    let array = batch.column(col_idx);
    if array.is_null(row) {
        return Ok(None);
    }
    match array.data_type() {
        DataType::Int32 => Ok(Some(
            array
                .as_any()
                .downcast_ref::<arrow_array::Int32Array>()
                .unwrap()
                .value(row),
        )),
        DataType::Int64 => Ok(Some(
            array
                .as_any()
                .downcast_ref::<arrow_array::Int64Array>()
                .unwrap()
                .value(row) as i32,
        )),
        dt => Err(WarehouseErrorHelper::invalid_state()
            .message(format!("Expected int column, got {:?}", dt))),
    }
}

/// Base type name with any parameter list stripped, e.g. "DECIMAL(10,2)" -> "DECIMAL".
fn base_type_name(type_text: &str) -> String {
    type_text
        .split('(')
        .next()
        .unwrap_or(type_text)
        .trim()
        .to_string()
}

/// Map an `is_nullable` result value to the JDBC-style flag and YES/NO text.
fn nullability(value: Option<&str>) -> (i16, String) {
    match value {
        Some(v) if v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("no") => {
            (0, "NO".to_string())
        }
        _ => (1, "YES".to_string()),
    }
}

/// Map a true/false or YES/NO result value to a bool flag.
fn bool_flag(value: Option<&str>) -> Option<bool> {
    value.map(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
}

/// Parse catalogs from a SHOW CATALOGS result.
/// Result columns: `catalog: Utf8`
pub fn parse_catalogs(batch: &RecordBatch) -> Result<Vec<CatalogInfo>> {
    let cat_idx = column_index(batch, "catalog")?;
    let mut catalogs = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        catalogs.push(CatalogInfo {
            catalog_name: get_string_value(batch, cat_idx, row)?,
        });
    }
    Ok(catalogs)
}

/// Parse schemas from a SHOW SCHEMAS result.
/// Result columns: `database_name: Utf8`, `catalog: Utf8`
pub fn parse_schemas(batch: &RecordBatch) -> Result<Vec<SchemaInfo>> {
    let cat_idx = column_index(batch, "catalog")?;
    let db_idx = column_index(batch, "database_name")?;
    let mut schemas = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        schemas.push(SchemaInfo {
            catalog_name: get_string_value(batch, cat_idx, row)?,
            schema_name: get_string_value(batch, db_idx, row)?,
        });
    }
    Ok(schemas)
}

/// Parse tables from a SHOW TABLES result.
/// Result columns: `catalog_name: Utf8`, `namespace: Utf8`, `table_name: Utf8`,
///                 `table_type: Utf8`, `remarks: Utf8?`
pub fn parse_tables(batch: &RecordBatch) -> Result<Vec<TableInfo>> {
    let cat_idx = column_index(batch, "catalog_name")?;
    let ns_idx = column_index(batch, "namespace")?;
    let name_idx = column_index(batch, "table_name")?;
    let type_idx = column_index(batch, "table_type")?;
    let remarks_idx = batch.schema().index_of("remarks").ok();

    let mut tables = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let remarks = if let Some(idx) = remarks_idx {
            get_optional_string_value(batch, idx, row)?
        } else {
            None
        };
        tables.push(TableInfo {
            catalog_name: get_string_value(batch, cat_idx, row)?,
            schema_name: get_string_value(batch, ns_idx, row)?,
            table_name: get_string_value(batch, name_idx, row)?,
            table_type: get_string_value(batch, type_idx, row)?,
            remarks,
        });
    }
    Ok(tables)
}

/// Parse columns from a SHOW COLUMNS result.
/// Result columns: `col_name: Utf8`, `catalog_name: Utf8?`, `namespace: Utf8`,
///                 `table_name: Utf8`, `column_type: Utf8`, `column_size: Int32?`,
///                 `decimal_digits: Int32?`, `radix: Int32?`, `is_nullable: Utf8?`,
///                 `remarks: Utf8?`, `column_default: Utf8?`, `ordinal_position: Int32?`,
///                 `is_auto_increment: Utf8?`, `is_generated: Utf8?`
pub fn parse_columns(batch: &RecordBatch) -> Result<Vec<ColumnInfo>> {
    let name_idx = column_index(batch, "col_name")?;
    let cat_idx = column_index(batch, "catalog_name")?;
    let ns_idx = column_index(batch, "namespace")?;
    let tbl_idx = column_index(batch, "table_name")?;
    let type_idx = column_index(batch, "column_type")?;

    // Optional columns, use index_of().ok() to handle their absence
    let size_idx = batch.schema().index_of("column_size").ok();
    let digits_idx = batch.schema().index_of("decimal_digits").ok();
    let radix_idx = batch.schema().index_of("radix").ok();
    let nullable_idx = batch.schema().index_of("is_nullable").ok();
    let remarks_idx = batch.schema().index_of("remarks").ok();
    let default_idx = batch.schema().index_of("column_default").ok();
    let ordinal_idx = batch.schema().index_of("ordinal_position").ok();
    let auto_inc_idx = batch.schema().index_of("is_auto_increment").ok();
    let generated_idx = batch.schema().index_of("is_generated").ok();

    let mut columns = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let type_text = get_string_value(batch, type_idx, row)?;
        let nullable_text = nullable_idx
            .and_then(|i| get_optional_string_value(batch, i, row).ok())
            .flatten();
        let (nullable, is_nullable) = nullability(nullable_text.as_deref());

        columns.push(ColumnInfo {
            catalog_name: get_string_value(batch, cat_idx, row).unwrap_or_default(),
            schema_name: get_string_value(batch, ns_idx, row)?,
            table_name: get_string_value(batch, tbl_idx, row)?,
            column_name: get_string_value(batch, name_idx, row)?,
            ordinal_position: ordinal_idx
                .and_then(|i| get_optional_int32_value(batch, i, row).ok())
                .flatten()
                .unwrap_or(0),
            data_type: base_type_name(&type_text),
            type_name: type_text,
            column_size: size_idx
                .and_then(|i| get_optional_int32_value(batch, i, row).ok())
                .flatten(),
            decimal_digits: digits_idx
                .and_then(|i| get_optional_int32_value(batch, i, row).ok())
                .flatten()
                .map(|v| v as i16),
            num_prec_radix: radix_idx
                .and_then(|i| get_optional_int32_value(batch, i, row).ok())
                .flatten()
                .map(|v| v as i16),
            nullable,
            remarks: remarks_idx
                .and_then(|i| get_optional_string_value(batch, i, row).ok())
                .flatten(),
            column_def: default_idx
                .and_then(|i| get_optional_string_value(batch, i, row).ok())
                .flatten(),
            is_nullable,
            is_autoincrement: bool_flag(
                auto_inc_idx
                    .and_then(|i| get_optional_string_value(batch, i, row).ok())
                    .flatten()
                    .as_deref(),
            ),
            is_generatedcolumn: bool_flag(
                generated_idx
                    .and_then(|i| get_optional_string_value(batch, i, row).ok())
                    .flatten()
                    .as_deref(),
            ),
        });
    }
    Ok(columns)
}

/// Parse columns directly into Arrow Fields for `get_table_schema`.
/// Uses `col_name`, `column_type`, and `is_nullable` to build the schema.
pub fn parse_columns_as_fields(batch: &RecordBatch) -> Result<Vec<Field>> {
    let name_idx = column_index(batch, "col_name")?;
    let type_idx = column_index(batch, "column_type")?;
    let nullable_idx = batch.schema().index_of("is_nullable").ok();

    let mut fields = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let col_name = get_string_value(batch, name_idx, row)?;
        let col_type = get_string_value(batch, type_idx, row)?;
        let arrow_type = warehouse_type_to_arrow(&col_type);

        let nullable = nullable_idx
            .and_then(|i| get_optional_string_value(batch, i, row).ok())
            .flatten()
            .map(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
            .unwrap_or(true);

        fields.push(Field::new(&col_name, arrow_type, nullable));
    }
    Ok(fields)
}

/// Parse primary keys from a SHOW PRIMARY KEYS result.
/// Result columns: `catalog_name: Utf8`, `namespace: Utf8`, `table_name: Utf8`,
///                 `column_name: Utf8`, `key_seq: Int32?`, `constraint_name: Utf8?`
pub fn parse_primary_keys(batch: &RecordBatch) -> Result<Vec<PrimaryKeyInfo>> {
    let cat_idx = column_index(batch, "catalog_name")?;
    let ns_idx = column_index(batch, "namespace")?;
    let tbl_idx = column_index(batch, "table_name")?;
    let col_idx = column_index(batch, "column_name")?;
    let seq_idx = batch.schema().index_of("key_seq").ok();
    let name_idx = batch.schema().index_of("constraint_name").ok();

    let mut keys = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        keys.push(PrimaryKeyInfo {
            catalog_name: get_string_value(batch, cat_idx, row)?,
            schema_name: get_string_value(batch, ns_idx, row)?,
            table_name: get_string_value(batch, tbl_idx, row)?,
            column_name: get_string_value(batch, col_idx, row)?,
            key_seq: seq_idx
                .and_then(|i| get_optional_int32_value(batch, i, row).ok())
                .flatten()
                .unwrap_or(1) as i16,
            pk_name: name_idx
                .and_then(|i| get_optional_string_value(batch, i, row).ok())
                .flatten(),
        });
    }
    Ok(keys)
}

/// Parse foreign keys from a SHOW FOREIGN KEYS result.
/// Result columns: `pk_catalog_name`, `pk_namespace`, `pk_table_name`, `pk_column_name`,
///                 `fk_catalog_name`, `fk_namespace`, `fk_table_name`, `fk_column_name`
///                 (all Utf8), `key_seq: Int32?`, `fk_constraint_name: Utf8?`,
///                 `pk_constraint_name: Utf8?`
pub fn parse_foreign_keys(batch: &RecordBatch) -> Result<Vec<ForeignKeyInfo>> {
    let pk_cat_idx = column_index(batch, "pk_catalog_name")?;
    let pk_ns_idx = column_index(batch, "pk_namespace")?;
    let pk_tbl_idx = column_index(batch, "pk_table_name")?;
    let pk_col_idx = column_index(batch, "pk_column_name")?;
    let fk_cat_idx = column_index(batch, "fk_catalog_name")?;
    let fk_ns_idx = column_index(batch, "fk_namespace")?;
    let fk_tbl_idx = column_index(batch, "fk_table_name")?;
    let fk_col_idx = column_index(batch, "fk_column_name")?;
    let seq_idx = batch.schema().index_of("key_seq").ok();
    let fk_name_idx = batch.schema().index_of("fk_constraint_name").ok();
    let pk_name_idx = batch.schema().index_of("pk_constraint_name").ok();

    let mut keys = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        keys.push(ForeignKeyInfo {
            pk_catalog: get_string_value(batch, pk_cat_idx, row)?,
            pk_schema: get_string_value(batch, pk_ns_idx, row)?,
            pk_table: get_string_value(batch, pk_tbl_idx, row)?,
            pk_column: get_string_value(batch, pk_col_idx, row)?,
            fk_catalog: get_string_value(batch, fk_cat_idx, row)?,
            fk_schema: get_string_value(batch, fk_ns_idx, row)?,
            fk_table: get_string_value(batch, fk_tbl_idx, row)?,
            fk_column: get_string_value(batch, fk_col_idx, row)?,
            key_seq: seq_idx
                .and_then(|i| get_optional_int32_value(batch, i, row).ok())
                .flatten()
                .unwrap_or(1) as i16,
            fk_name: fk_name_idx
                .and_then(|i| get_optional_string_value(batch, i, row).ok())
                .flatten(),
            pk_name: pk_name_idx
                .and_then(|i| get_optional_string_value(batch, i, row).ok())
                .flatten(),
        });
    }
    Ok(keys)
}
