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

//! Builder for constructing the nested Arrow structure for get_objects().
//!
//! The `GetObjectsBuilder` accumulates catalog, schema, table, column, and
//! constraint metadata and then constructs the nested Arrow structure required
//! by the ADBC specification.
//!
//! # Example
//!
//! ```ignore
//! use warehouse_adbc::metadata::builder::GetObjectsBuilder;
//! use warehouse_adbc::metadata::types::{TableInfo, ColumnInfo};
//!
//! let mut builder = GetObjectsBuilder::new();
//!
//! builder.add_catalog("main");
//! builder.add_schema("main", "default");
//! builder.add_table("main", "default", &TableInfo { ... });
//! builder.add_column("main", "default", "users", &ColumnInfo { ... });
//!
//! let reader = builder.build()?;
//! ```

use crate::error::{Result, WarehouseErrorHelper};
use crate::metadata::schemas::{
    column_fields, column_item_field, constraint_column_name_item_field, constraint_fields,
    constraint_item_field, db_schema_fields, db_schema_item_field, get_objects_schema,
    table_fields, table_item_field, usage_fields, usage_item_field,
};
use crate::metadata::type_mapping::warehouse_type_to_xdbc;
use crate::metadata::types::{ColumnInfo, ForeignKeyInfo, PrimaryKeyInfo, TableInfo};

use arrow_array::{
    Array, ArrayRef, BooleanArray, Int16Array, Int32Array, ListArray, RecordBatch,
    RecordBatchIterator, RecordBatchReader, StringArray, StructArray,
};
use arrow_buffer::{OffsetBuffer, ScalarBuffer};
use arrow_schema::FieldRef;
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for constructing a get_objects() result as a nested Arrow structure.
///
/// Metadata is accumulated level by level (catalogs, schemas, tables, columns,
/// constraints) and `build()` produces a single nested RecordBatch.
pub struct GetObjectsBuilder {
    /// Map from catalog name to catalog entry.
    catalogs: HashMap<String, CatalogEntry>,
    /// Ordered list of catalog names (to preserve insertion order).
    catalog_order: Vec<String>,
}

#[derive(Default)]
struct CatalogEntry {
    /// Map from schema name to schema entry.
    schemas: HashMap<String, SchemaEntry>,
    /// Ordered list of schema names.
    schema_order: Vec<String>,
}

#[derive(Default)]
struct SchemaEntry {
    /// Map from table name to table entry.
    tables: HashMap<String, TableEntry>,
    /// Ordered list of table names.
    table_order: Vec<String>,
}

struct TableEntry {
    info: TableInfo,
    columns: Vec<ColumnInfo>,
    constraints: Vec<ConstraintEntry>,
}

struct ConstraintEntry {
    /// Name of the constraint (may be None).
    name: Option<String>,
    /// Type of constraint: "PRIMARY KEY", "FOREIGN KEY", "UNIQUE".
    constraint_type: String,
    /// Column names involved in the constraint.
    column_names: Vec<String>,
    /// Foreign key usage info (only for FOREIGN KEY constraints).
    usage: Vec<UsageEntry>,
}

/// Referenced-side entry of a foreign key.
struct UsageEntry {
    fk_catalog: Option<String>,
    fk_db_schema: Option<String>,
    fk_table: String,
    fk_column_name: String,
}

impl GetObjectsBuilder {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self {
            catalogs: HashMap::new(),
            catalog_order: Vec::new(),
        }
    }

    /// Adds a catalog to the builder.
    ///
    /// If the catalog already exists, this is a no-op.
    pub fn add_catalog(&mut self, catalog_name: &str) {
        if !self.catalogs.contains_key(catalog_name) {
            self.catalogs
                .insert(catalog_name.to_string(), CatalogEntry::default());
            self.catalog_order.push(catalog_name.to_string());
        }
    }

    /// Adds a schema to a catalog, creating the catalog if needed.
    ///
    /// If the schema already exists, this is a no-op.
    pub fn add_schema(&mut self, catalog_name: &str, schema_name: &str) {
        self.add_catalog(catalog_name);

        if let Some(catalog) = self.catalogs.get_mut(catalog_name) {
            if !catalog.schemas.contains_key(schema_name) {
                catalog
                    .schemas
                    .insert(schema_name.to_string(), SchemaEntry::default());
                catalog.schema_order.push(schema_name.to_string());
            }
        }
    }

    /// Adds a table to a schema, creating the catalog and schema if needed.
    ///
    /// If the table already exists, this is a no-op.
    pub fn add_table(&mut self, catalog_name: &str, schema_name: &str, table_info: &TableInfo) {
        self.add_schema(catalog_name, schema_name);

        if let Some(catalog) = self.catalogs.get_mut(catalog_name) {
            if let Some(schema) = catalog.schemas.get_mut(schema_name) {
                if !schema.tables.contains_key(&table_info.table_name) {
                    schema.tables.insert(
                        table_info.table_name.clone(),
                        TableEntry {
                            info: table_info.clone(),
                            columns: Vec::new(),
                            constraints: Vec::new(),
                        },
                    );
                    schema.table_order.push(table_info.table_name.clone());
                }
            }
        }
    }

    /// Adds a column to a table.
    ///
    /// The catalog, schema, and table must already exist; columns addressed at
    /// an unknown table are dropped.
    pub fn add_column(
        &mut self,
        catalog_name: &str,
        schema_name: &str,
        table_name: &str,
        column_info: &ColumnInfo,
    ) {
        if let Some(catalog) = self.catalogs.get_mut(catalog_name) {
            if let Some(schema) = catalog.schemas.get_mut(schema_name) {
                if let Some(table) = schema.tables.get_mut(table_name) {
                    table.columns.push(column_info.clone());
                }
            }
        }
    }

    /// Adds constraints (primary keys and foreign keys) to a table.
    ///
    /// Keys are grouped by constraint name and ordered by key sequence, so a
    /// multi-column key becomes a single constraint entry.
    pub fn add_constraints(
        &mut self,
        catalog_name: &str,
        schema_name: &str,
        table_name: &str,
        primary_keys: &[PrimaryKeyInfo],
        foreign_keys: &[ForeignKeyInfo],
    ) {
        let Some(table) = self
            .catalogs
            .get_mut(catalog_name)
            .and_then(|c| c.schemas.get_mut(schema_name))
            .and_then(|s| s.tables.get_mut(table_name))
        else {
            return;
        };

        let mut pk_groups: HashMap<Option<String>, Vec<&PrimaryKeyInfo>> = HashMap::new();
        for pk in primary_keys {
            pk_groups.entry(pk.pk_name.clone()).or_default().push(pk);
        }

        for (pk_name, mut pks) in pk_groups {
            pks.sort_by_key(|pk| pk.key_seq);
            let column_names: Vec<String> = pks.iter().map(|pk| pk.column_name.clone()).collect();

            table.constraints.push(ConstraintEntry {
                name: pk_name,
                constraint_type: "PRIMARY KEY".to_string(),
                column_names,
                usage: Vec::new(),
            });
        }

        let mut fk_groups: HashMap<Option<String>, Vec<&ForeignKeyInfo>> = HashMap::new();
        for fk in foreign_keys {
            fk_groups.entry(fk.fk_name.clone()).or_default().push(fk);
        }

        for (fk_name, mut fks) in fk_groups {
            fks.sort_by_key(|fk| fk.key_seq);
            let column_names: Vec<String> = fks.iter().map(|fk| fk.fk_column.clone()).collect();

            let usage: Vec<UsageEntry> = fks
                .iter()
                .map(|fk| UsageEntry {
                    fk_catalog: Some(fk.pk_catalog.clone()),
                    fk_db_schema: Some(fk.pk_schema.clone()),
                    fk_table: fk.pk_table.clone(),
                    fk_column_name: fk.pk_column.clone(),
                })
                .collect();

            table.constraints.push(ConstraintEntry {
                name: fk_name,
                constraint_type: "FOREIGN KEY".to_string(),
                column_names,
                usage,
            });
        }
    }

    /// Builds a RecordBatchReader that yields a single RecordBatch with the
    /// complete nested get_objects() result.
    pub fn build(self) -> Result<impl RecordBatchReader + Send> {
        let schema = Arc::new(get_objects_schema());
        let batch = self.build_record_batch()?;

        Ok(RecordBatchIterator::new(
            vec![Ok(batch)].into_iter(),
            schema,
        ))
    }

    fn build_record_batch(&self) -> Result<RecordBatch> {
        let catalog_names: Vec<Option<&str>> = self
            .catalog_order
            .iter()
            .map(|s| Some(s.as_str()))
            .collect();
        let catalog_name_array = Arc::new(StringArray::from(catalog_names)) as ArrayRef;

        let db_schemas_array = self.build_db_schemas_array()?;

        RecordBatch::try_new(
            Arc::new(get_objects_schema()),
            vec![catalog_name_array, db_schemas_array],
        )
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
    }

    /// Builds the catalog_db_schemas List array.
    fn build_db_schemas_array(&self) -> Result<ArrayRef> {
        let mut parts: Vec<ArrayRef> = Vec::new();
        let mut offsets: Vec<i32> = vec![0];
        let mut current_offset: i32 = 0;

        for catalog_name in &self.catalog_order {
            let catalog = self.catalogs.get(catalog_name).unwrap();
            let num_schemas = catalog.schema_order.len() as i32;

            if num_schemas > 0 {
                let schemas_struct = self.build_schemas_struct(catalog)?;
                parts.push(Arc::new(schemas_struct) as ArrayRef);
            }

            current_offset += num_schemas;
            offsets.push(current_offset);
        }

        wrap_list(db_schema_item_field(), offsets, parts, empty_db_schema_struct)
    }

    /// Builds a StructArray for all schemas in a catalog.
    fn build_schemas_struct(&self, catalog: &CatalogEntry) -> Result<StructArray> {
        let schema_names: Vec<Option<&str>> = catalog
            .schema_order
            .iter()
            .map(|s| Some(s.as_str()))
            .collect();
        let schema_name_array = Arc::new(StringArray::from(schema_names)) as ArrayRef;

        let tables_array = self.build_tables_list_array(catalog)?;

        StructArray::try_new(
            db_schema_fields(),
            vec![schema_name_array, tables_array],
            None,
        )
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
    }

    /// Builds the db_schema_tables List array for a catalog.
    fn build_tables_list_array(&self, catalog: &CatalogEntry) -> Result<ArrayRef> {
        let mut parts: Vec<ArrayRef> = Vec::new();
        let mut offsets: Vec<i32> = vec![0];
        let mut current_offset: i32 = 0;

        for schema_name in &catalog.schema_order {
            let schema_entry = catalog.schemas.get(schema_name).unwrap();
            let num_tables = schema_entry.table_order.len() as i32;

            if num_tables > 0 {
                let tables_struct = self.build_tables_struct(schema_entry)?;
                parts.push(Arc::new(tables_struct) as ArrayRef);
            }

            current_offset += num_tables;
            offsets.push(current_offset);
        }

        wrap_list(table_item_field(), offsets, parts, empty_table_struct)
    }

    /// Builds a StructArray for all tables in a schema.
    fn build_tables_struct(&self, schema_entry: &SchemaEntry) -> Result<StructArray> {
        let mut table_names: Vec<&str> = Vec::new();
        let mut table_types: Vec<&str> = Vec::new();

        for table_name in &schema_entry.table_order {
            let table_entry = schema_entry.tables.get(table_name).unwrap();
            table_names.push(&table_entry.info.table_name);
            table_types.push(&table_entry.info.table_type);
        }

        let table_name_array = Arc::new(StringArray::from(table_names)) as ArrayRef;
        let table_type_array = Arc::new(StringArray::from(table_types)) as ArrayRef;

        let columns_array = self.build_columns_list_array(schema_entry)?;
        let constraints_array = self.build_constraints_list_array(schema_entry)?;

        StructArray::try_new(
            table_fields(),
            vec![
                table_name_array,
                table_type_array,
                columns_array,
                constraints_array,
            ],
            None,
        )
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
    }

    /// Builds the table_columns List array for a schema.
    fn build_columns_list_array(&self, schema_entry: &SchemaEntry) -> Result<ArrayRef> {
        let mut parts: Vec<ArrayRef> = Vec::new();
        let mut offsets: Vec<i32> = vec![0];
        let mut current_offset: i32 = 0;

        for table_name in &schema_entry.table_order {
            let table_entry = schema_entry.tables.get(table_name).unwrap();
            let num_columns = table_entry.columns.len() as i32;

            if num_columns > 0 {
                let columns_struct = build_columns_struct(&table_entry.columns)?;
                parts.push(Arc::new(columns_struct) as ArrayRef);
            }

            current_offset += num_columns;
            offsets.push(current_offset);
        }

        wrap_list(column_item_field(), offsets, parts, empty_column_struct)
    }

    /// Builds the table_constraints List array for a schema.
    fn build_constraints_list_array(&self, schema_entry: &SchemaEntry) -> Result<ArrayRef> {
        let mut parts: Vec<ArrayRef> = Vec::new();
        let mut offsets: Vec<i32> = vec![0];
        let mut current_offset: i32 = 0;

        for table_name in &schema_entry.table_order {
            let table_entry = schema_entry.tables.get(table_name).unwrap();
            let num_constraints = table_entry.constraints.len() as i32;

            if num_constraints > 0 {
                let constraints_struct = build_constraints_struct(&table_entry.constraints)?;
                parts.push(Arc::new(constraints_struct) as ArrayRef);
            }

            current_offset += num_constraints;
            offsets.push(current_offset);
        }

        wrap_list(
            constraint_item_field(),
            offsets,
            parts,
            empty_constraint_struct,
        )
    }
}

impl Default for GetObjectsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps accumulated struct parts into a ListArray, concatenating the parts or
/// falling back to an empty values array.
fn wrap_list(
    item_field: FieldRef,
    offsets: Vec<i32>,
    parts: Vec<ArrayRef>,
    empty: impl FnOnce() -> Result<StructArray>,
) -> Result<ArrayRef> {
    let values = if parts.is_empty() {
        empty()?
    } else {
        concat_struct_arrays(&parts)?
    };

    let list_array = ListArray::new(
        item_field,
        OffsetBuffer::new(ScalarBuffer::from(offsets)),
        Arc::new(values),
        None,
    );

    Ok(Arc::new(list_array) as ArrayRef)
}

/// Concatenates multiple StructArrays field by field into one.
fn concat_struct_arrays(arrays: &[ArrayRef]) -> Result<StructArray> {
    if arrays.is_empty() {
        return Err(WarehouseErrorHelper::io().message("Cannot concat empty array list"));
    }

    let first = arrays[0]
        .as_any()
        .downcast_ref::<StructArray>()
        .expect("Expected StructArray");
    let fields = first.fields().clone();
    let num_fields = fields.len();

    let mut concatenated_fields: Vec<ArrayRef> = Vec::new();
    for i in 0..num_fields {
        let field_arrays: Vec<&dyn Array> = arrays
            .iter()
            .map(|a| {
                let struct_arr = a.as_any().downcast_ref::<StructArray>().unwrap();
                struct_arr.column(i).as_ref()
            })
            .collect();

        let concatenated = arrow_select::concat::concat(&field_arrays)
            .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))?;
        concatenated_fields.push(concatenated);
    }

    StructArray::try_new(fields, concatenated_fields, None)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

fn empty_db_schema_struct() -> Result<StructArray> {
    let schema_names = Arc::new(StringArray::from(Vec::<Option<&str>>::new())) as ArrayRef;

    // Empty list, create with one offset then slice to zero length
    let tables_list = Arc::new(ListArray::new(
        table_item_field(),
        OffsetBuffer::new(ScalarBuffer::from(vec![0i32])),
        Arc::new(empty_table_struct()?),
        None,
    )) as ArrayRef;
    let empty_tables = tables_list.slice(0, 0);

    StructArray::try_new(db_schema_fields(), vec![schema_names, empty_tables], None)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

fn empty_table_struct() -> Result<StructArray> {
    let table_names = Arc::new(StringArray::from(Vec::<&str>::new())) as ArrayRef;
    let table_types = Arc::new(StringArray::from(Vec::<&str>::new())) as ArrayRef;

    let columns_list = Arc::new(ListArray::new(
        column_item_field(),
        OffsetBuffer::new(ScalarBuffer::from(vec![0i32])),
        Arc::new(empty_column_struct()?),
        None,
    )) as ArrayRef;
    let empty_columns = columns_list.slice(0, 0);

    let constraints_list = Arc::new(ListArray::new(
        constraint_item_field(),
        OffsetBuffer::new(ScalarBuffer::from(vec![0i32])),
        Arc::new(empty_constraint_struct()?),
        None,
    )) as ArrayRef;
    let empty_constraints = constraints_list.slice(0, 0);

    StructArray::try_new(
        table_fields(),
        vec![table_names, table_types, empty_columns, empty_constraints],
        None,
    )
    .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

fn empty_column_struct() -> Result<StructArray> {
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(Vec::<&str>::new())), // column_name
        Arc::new(Int32Array::from(Vec::<i32>::new())),   // ordinal_position
        Arc::new(StringArray::from(Vec::<Option<&str>>::new())), // remarks
        Arc::new(Int16Array::from(Vec::<i16>::new())),   // xdbc_data_type
        Arc::new(StringArray::from(Vec::<&str>::new())), // xdbc_type_name
        Arc::new(Int32Array::from(Vec::<Option<i32>>::new())), // xdbc_column_size
        Arc::new(Int16Array::from(Vec::<Option<i16>>::new())), // xdbc_decimal_digits
        Arc::new(Int16Array::from(Vec::<Option<i16>>::new())), // xdbc_num_prec_radix
        Arc::new(Int16Array::from(Vec::<i16>::new())),   // xdbc_nullable
        Arc::new(StringArray::from(Vec::<Option<&str>>::new())), // xdbc_column_def
        Arc::new(Int16Array::from(Vec::<i16>::new())),   // xdbc_sql_data_type
        Arc::new(Int16Array::from(Vec::<Option<i16>>::new())), // xdbc_datetime_sub
        Arc::new(Int32Array::from(Vec::<Option<i32>>::new())), // xdbc_char_octet_length
        Arc::new(StringArray::from(Vec::<&str>::new())), // xdbc_is_nullable
        Arc::new(StringArray::from(Vec::<Option<&str>>::new())), // xdbc_scope_catalog
        Arc::new(StringArray::from(Vec::<Option<&str>>::new())), // xdbc_scope_schema
        Arc::new(StringArray::from(Vec::<Option<&str>>::new())), // xdbc_scope_table
        Arc::new(BooleanArray::from(Vec::<Option<bool>>::new())), // xdbc_is_autoincrement
        Arc::new(BooleanArray::from(Vec::<Option<bool>>::new())), // xdbc_is_generatedcolumn
    ];

    StructArray::try_new(column_fields(), arrays, None)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

fn empty_constraint_struct() -> Result<StructArray> {
    let column_names_list = Arc::new(ListArray::new(
        constraint_column_name_item_field(),
        OffsetBuffer::new(ScalarBuffer::from(vec![0i32])),
        Arc::new(StringArray::from(Vec::<&str>::new())),
        None,
    )) as ArrayRef;
    let empty_column_names = column_names_list.slice(0, 0);

    let usage_list = Arc::new(ListArray::new(
        usage_item_field(),
        OffsetBuffer::new(ScalarBuffer::from(vec![0i32])),
        Arc::new(empty_usage_struct()?),
        None,
    )) as ArrayRef;
    let empty_usage = usage_list.slice(0, 0);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(Vec::<Option<&str>>::new())), // constraint_name
        Arc::new(StringArray::from(Vec::<&str>::new())),         // constraint_type
        empty_column_names,
        empty_usage,
    ];

    StructArray::try_new(constraint_fields(), arrays, None)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

fn empty_usage_struct() -> Result<StructArray> {
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(Vec::<Option<&str>>::new())), // fk_catalog
        Arc::new(StringArray::from(Vec::<Option<&str>>::new())), // fk_db_schema
        Arc::new(StringArray::from(Vec::<&str>::new())),         // fk_table
        Arc::new(StringArray::from(Vec::<&str>::new())),         // fk_column_name
    ];

    StructArray::try_new(usage_fields(), arrays, None)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

/// Builds a StructArray for columns, deriving the XDBC descriptor fields.
fn build_columns_struct(columns: &[ColumnInfo]) -> Result<StructArray> {
    let mut column_names: Vec<&str> = Vec::new();
    let mut ordinal_positions: Vec<i32> = Vec::new();
    let mut remarks: Vec<Option<&str>> = Vec::new();
    let mut xdbc_data_types: Vec<i16> = Vec::new();
    let mut xdbc_type_names: Vec<&str> = Vec::new();
    let mut xdbc_column_sizes: Vec<Option<i32>> = Vec::new();
    let mut xdbc_decimal_digits: Vec<Option<i16>> = Vec::new();
    let mut xdbc_num_prec_radix: Vec<Option<i16>> = Vec::new();
    let mut xdbc_nullables: Vec<i16> = Vec::new();
    let mut xdbc_column_defs: Vec<Option<&str>> = Vec::new();
    let mut xdbc_sql_data_types: Vec<i16> = Vec::new();
    let mut xdbc_datetime_subs: Vec<Option<i16>> = Vec::new();
    let mut xdbc_char_octet_lengths: Vec<Option<i32>> = Vec::new();
    let mut xdbc_is_nullables: Vec<&str> = Vec::new();
    let mut xdbc_scope_catalogs: Vec<Option<&str>> = Vec::new();
    let mut xdbc_scope_schemas: Vec<Option<&str>> = Vec::new();
    let mut xdbc_scope_tables: Vec<Option<&str>> = Vec::new();
    let mut xdbc_is_autoincrements: Vec<Option<bool>> = Vec::new();
    let mut xdbc_is_generatedcolumns: Vec<Option<bool>> = Vec::new();

    for col in columns {
        column_names.push(&col.column_name);
        ordinal_positions.push(col.ordinal_position);
        remarks.push(col.remarks.as_deref());

        let xdbc_type_code = warehouse_type_to_xdbc(&col.data_type);
        xdbc_data_types.push(xdbc_type_code);
        xdbc_type_names.push(&col.type_name);
        xdbc_column_sizes.push(col.column_size);
        xdbc_decimal_digits.push(col.decimal_digits);
        xdbc_num_prec_radix.push(col.num_prec_radix);
        xdbc_nullables.push(col.nullable);
        xdbc_column_defs.push(col.column_def.as_deref());
        xdbc_sql_data_types.push(xdbc_type_code);
        xdbc_datetime_subs.push(None);
        xdbc_char_octet_lengths.push(col.column_size.map(|s| s * 4));
        xdbc_is_nullables.push(&col.is_nullable);
        xdbc_scope_catalogs.push(None);
        xdbc_scope_schemas.push(None);
        xdbc_scope_tables.push(None);
        xdbc_is_autoincrements.push(col.is_autoincrement);
        xdbc_is_generatedcolumns.push(col.is_generatedcolumn);
    }

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(column_names)),
        Arc::new(Int32Array::from(ordinal_positions)),
        Arc::new(StringArray::from(remarks)),
        Arc::new(Int16Array::from(xdbc_data_types)),
        Arc::new(StringArray::from(xdbc_type_names)),
        Arc::new(Int32Array::from(xdbc_column_sizes)),
        Arc::new(Int16Array::from(xdbc_decimal_digits)),
        Arc::new(Int16Array::from(xdbc_num_prec_radix)),
        Arc::new(Int16Array::from(xdbc_nullables)),
        Arc::new(StringArray::from(xdbc_column_defs)),
        Arc::new(Int16Array::from(xdbc_sql_data_types)),
        Arc::new(Int16Array::from(xdbc_datetime_subs)),
        Arc::new(Int32Array::from(xdbc_char_octet_lengths)),
        Arc::new(StringArray::from(xdbc_is_nullables)),
        Arc::new(StringArray::from(xdbc_scope_catalogs)),
        Arc::new(StringArray::from(xdbc_scope_schemas)),
        Arc::new(StringArray::from(xdbc_scope_tables)),
        Arc::new(BooleanArray::from(xdbc_is_autoincrements)),
        Arc::new(BooleanArray::from(xdbc_is_generatedcolumns)),
    ];

    StructArray::try_new(column_fields(), arrays, None)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

/// Builds a StructArray for constraints together with their nested
/// column-name and usage lists.
fn build_constraints_struct(constraints: &[ConstraintEntry]) -> Result<StructArray> {
    let mut constraint_names: Vec<Option<&str>> = Vec::new();
    let mut constraint_types: Vec<&str> = Vec::new();

    let mut column_names_offsets: Vec<i32> = vec![0];
    let mut all_column_names: Vec<&str> = Vec::new();

    let mut usage_offsets: Vec<i32> = vec![0];
    let mut all_usage: Vec<&UsageEntry> = Vec::new();

    for constraint in constraints {
        constraint_names.push(constraint.name.as_deref());
        constraint_types.push(&constraint.constraint_type);

        for col_name in &constraint.column_names {
            all_column_names.push(col_name);
        }
        column_names_offsets.push(all_column_names.len() as i32);

        for usage in &constraint.usage {
            all_usage.push(usage);
        }
        usage_offsets.push(all_usage.len() as i32);
    }

    let column_names_values = Arc::new(StringArray::from(all_column_names)) as ArrayRef;
    let column_names_list = ListArray::new(
        constraint_column_name_item_field(),
        OffsetBuffer::new(ScalarBuffer::from(column_names_offsets)),
        column_names_values,
        None,
    );

    let usage_struct = build_usage_struct(&all_usage)?;
    let usage_list = ListArray::new(
        usage_item_field(),
        OffsetBuffer::new(ScalarBuffer::from(usage_offsets)),
        Arc::new(usage_struct),
        None,
    );

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(constraint_names)),
        Arc::new(StringArray::from(constraint_types)),
        Arc::new(column_names_list),
        Arc::new(usage_list),
    ];

    StructArray::try_new(constraint_fields(), arrays, None)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

fn build_usage_struct(usage_entries: &[&UsageEntry]) -> Result<StructArray> {
    if usage_entries.is_empty() {
        return empty_usage_struct();
    }

    let mut fk_catalogs: Vec<Option<&str>> = Vec::new();
    let mut fk_db_schemas: Vec<Option<&str>> = Vec::new();
    let mut fk_tables: Vec<&str> = Vec::new();
    let mut fk_column_names: Vec<&str> = Vec::new();

    for entry in usage_entries {
        fk_catalogs.push(entry.fk_catalog.as_deref());
        fk_db_schemas.push(entry.fk_db_schema.as_deref());
        fk_tables.push(&entry.fk_table);
        fk_column_names.push(&entry.fk_column_name);
    }

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(fk_catalogs)),
        Arc::new(StringArray::from(fk_db_schemas)),
        Arc::new(StringArray::from(fk_tables)),
        Arc::new(StringArray::from(fk_column_names)),
    ];

    StructArray::try_new(usage_fields(), arrays, None)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}
