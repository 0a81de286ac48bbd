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

//! Flat metadata collections served by `Connection::get_schema`.
//!
//! Each collection is a single-batch tabular result with a fixed Arrow
//! schema. `MetaDataCollections` and `Restrictions` are self-describing
//! and built entirely from the definitions in this module; the remaining
//! collections are populated from warehouse results by the provider.

use std::sync::{Arc, LazyLock};

use arrow_array::{ArrayRef, Int16Array, Int32Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};

use crate::error::{Result, WarehouseErrorHelper};
use crate::metadata::type_mapping::warehouse_type_to_xdbc;
use crate::metadata::types::{CatalogInfo, ColumnInfo, SchemaInfo, TableInfo};

static META_DATA_COLLECTIONS_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new("collection_name", DataType::Utf8, false),
        Field::new("number_of_restrictions", DataType::Int32, false),
    ]))
});

static RESTRICTIONS_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new("collection_name", DataType::Utf8, false),
        Field::new("restriction_name", DataType::Utf8, false),
        Field::new("restriction_number", DataType::Int32, false),
    ]))
});

static CATALOGS_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![Field::new(
        "catalog_name",
        DataType::Utf8,
        false,
    )]))
});

static SCHEMAS_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new("catalog_name", DataType::Utf8, false),
        Field::new("db_schema_name", DataType::Utf8, false),
    ]))
});

static TABLE_TYPES_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![Field::new(
        "table_type",
        DataType::Utf8,
        false,
    )]))
});

static TABLES_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new("table_catalog", DataType::Utf8, false),
        Field::new("table_schema", DataType::Utf8, false),
        Field::new("table_name", DataType::Utf8, false),
        Field::new("table_type", DataType::Utf8, false),
    ]))
});

static COLUMNS_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new("table_catalog", DataType::Utf8, false),
        Field::new("table_schema", DataType::Utf8, false),
        Field::new("table_name", DataType::Utf8, false),
        Field::new("column_name", DataType::Utf8, false),
        Field::new("ordinal_position", DataType::Int32, false),
        Field::new("remarks", DataType::Utf8, true),
        Field::new("xdbc_data_type", DataType::Int16, false),
        Field::new("xdbc_type_name", DataType::Utf8, false),
        Field::new("xdbc_column_size", DataType::Int32, true),
        Field::new("xdbc_decimal_digits", DataType::Int16, true),
        Field::new("xdbc_num_prec_radix", DataType::Int16, true),
        Field::new("xdbc_nullable", DataType::Int16, false),
        Field::new("xdbc_column_def", DataType::Utf8, true),
        Field::new("xdbc_is_nullable", DataType::Utf8, false),
        Field::new("xdbc_is_autoincrement", DataType::Utf8, true),
        Field::new("xdbc_is_generatedcolumn", DataType::Utf8, true),
    ]))
});

/// The closed set of metadata collections this driver serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaCollection {
    MetaDataCollections,
    Restrictions,
    Catalogs,
    Schemas,
    TableTypes,
    Tables,
    Columns,
}

impl SchemaCollection {
    /// All collections, in the order they are listed in `MetaDataCollections`.
    pub const ALL: [SchemaCollection; 7] = [
        SchemaCollection::MetaDataCollections,
        SchemaCollection::Restrictions,
        SchemaCollection::Catalogs,
        SchemaCollection::Schemas,
        SchemaCollection::TableTypes,
        SchemaCollection::Tables,
        SchemaCollection::Columns,
    ];

    /// Resolve a collection from its case-sensitive name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "MetaDataCollections" => Ok(Self::MetaDataCollections),
            "Restrictions" => Ok(Self::Restrictions),
            "Catalogs" => Ok(Self::Catalogs),
            "Schemas" => Ok(Self::Schemas),
            "TableTypes" => Ok(Self::TableTypes),
            "Tables" => Ok(Self::Tables),
            "Columns" => Ok(Self::Columns),
            _ => Err(WarehouseErrorHelper::not_found()
                .message(format!("Unsupported metadata collection: {}", name))),
        }
    }

    /// Collection name as it appears in `MetaDataCollections`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MetaDataCollections => "MetaDataCollections",
            Self::Restrictions => "Restrictions",
            Self::Catalogs => "Catalogs",
            Self::Schemas => "Schemas",
            Self::TableTypes => "TableTypes",
            Self::Tables => "Tables",
            Self::Columns => "Columns",
        }
    }

    /// Restriction names accepted by this collection, in positional order.
    pub fn restriction_names(&self) -> &'static [&'static str] {
        match self {
            Self::Catalogs => &["Catalog_Name"],
            Self::Schemas => &["Catalog_Name", "Schema_Name"],
            Self::Tables => &["Catalog_Name", "Schema_Name", "Table_Name", "Table_Type"],
            Self::Columns => &["Catalog_Name", "Schema_Name", "Table_Name", "Column_Name"],
            _ => &[],
        }
    }

    /// Number of positional restrictions this collection accepts.
    pub fn restriction_count(&self) -> usize {
        self.restriction_names().len()
    }

    /// Fixed Arrow schema of the collection's result.
    pub fn schema(&self) -> SchemaRef {
        match self {
            Self::MetaDataCollections => META_DATA_COLLECTIONS_SCHEMA.clone(),
            Self::Restrictions => RESTRICTIONS_SCHEMA.clone(),
            Self::Catalogs => CATALOGS_SCHEMA.clone(),
            Self::Schemas => SCHEMAS_SCHEMA.clone(),
            Self::TableTypes => TABLE_TYPES_SCHEMA.clone(),
            Self::Tables => TABLES_SCHEMA.clone(),
            Self::Columns => COLUMNS_SCHEMA.clone(),
        }
    }

    /// Zero-row batch carrying the collection's schema.
    pub fn empty_batch(&self) -> RecordBatch {
        RecordBatch::new_empty(self.schema())
    }
}

/// Build the `MetaDataCollections` batch: one row per collection.
pub fn meta_data_collections_batch() -> Result<RecordBatch> {
    let names: Vec<&str> = SchemaCollection::ALL.iter().map(|c| c.name()).collect();
    let counts: Vec<i32> = SchemaCollection::ALL
        .iter()
        .map(|c| c.restriction_count() as i32)
        .collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(names)),
        Arc::new(Int32Array::from(counts)),
    ];
    RecordBatch::try_new(SchemaCollection::MetaDataCollections.schema(), columns)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

/// Build the `Restrictions` batch: one row per restriction of every collection.
pub fn restrictions_batch() -> Result<RecordBatch> {
    let mut collection_names: Vec<&str> = Vec::new();
    let mut restriction_names: Vec<&str> = Vec::new();
    let mut restriction_numbers: Vec<i32> = Vec::new();
    for collection in SchemaCollection::ALL {
        for (position, name) in collection.restriction_names().iter().enumerate() {
            collection_names.push(collection.name());
            restriction_names.push(name);
            restriction_numbers.push(position as i32 + 1);
        }
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(collection_names)),
        Arc::new(StringArray::from(restriction_names)),
        Arc::new(Int32Array::from(restriction_numbers)),
    ];
    RecordBatch::try_new(SchemaCollection::Restrictions.schema(), columns)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

/// Build the `TableTypes` batch from the driver's supported type list.
pub fn table_types_batch(table_types: &[String]) -> Result<RecordBatch> {
    let values: Vec<&str> = table_types.iter().map(|s| s.as_str()).collect();
    RecordBatch::try_new(
        SchemaCollection::TableTypes.schema(),
        vec![Arc::new(StringArray::from(values))],
    )
    .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

/// Build the `Catalogs` batch from listed catalogs.
pub fn catalogs_batch(catalogs: &[CatalogInfo]) -> Result<RecordBatch> {
    let names: Vec<&str> = catalogs.iter().map(|c| c.catalog_name.as_str()).collect();
    RecordBatch::try_new(
        SchemaCollection::Catalogs.schema(),
        vec![Arc::new(StringArray::from(names))],
    )
    .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

/// Build the `Schemas` batch from listed schemas.
pub fn schemas_batch(schemas: &[SchemaInfo]) -> Result<RecordBatch> {
    let catalog_names: Vec<&str> = schemas.iter().map(|s| s.catalog_name.as_str()).collect();
    let schema_names: Vec<&str> = schemas.iter().map(|s| s.schema_name.as_str()).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(catalog_names)),
        Arc::new(StringArray::from(schema_names)),
    ];
    RecordBatch::try_new(SchemaCollection::Schemas.schema(), columns)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

/// Build the `Tables` batch from listed tables.
pub fn tables_batch(tables: &[TableInfo]) -> Result<RecordBatch> {
    let catalogs: Vec<&str> = tables.iter().map(|t| t.catalog_name.as_str()).collect();
    let schemas: Vec<&str> = tables.iter().map(|t| t.schema_name.as_str()).collect();
    let names: Vec<&str> = tables.iter().map(|t| t.table_name.as_str()).collect();
    let types: Vec<&str> = tables.iter().map(|t| t.table_type.as_str()).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(catalogs)),
        Arc::new(StringArray::from(schemas)),
        Arc::new(StringArray::from(names)),
        Arc::new(StringArray::from(types)),
    ];
    RecordBatch::try_new(SchemaCollection::Tables.schema(), columns)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

/// Build the `Columns` batch from listed columns.
///
/// XDBC type codes are derived from the warehouse type name. The
/// three-state autoincrement and generated flags render as YES, NO
/// or null.
pub fn columns_batch(columns: &[ColumnInfo]) -> Result<RecordBatch> {
    let mut table_catalogs: Vec<&str> = Vec::with_capacity(columns.len());
    let mut table_schemas: Vec<&str> = Vec::with_capacity(columns.len());
    let mut table_names: Vec<&str> = Vec::with_capacity(columns.len());
    let mut column_names: Vec<&str> = Vec::with_capacity(columns.len());
    let mut ordinal_positions: Vec<i32> = Vec::with_capacity(columns.len());
    let mut remarks: Vec<Option<&str>> = Vec::with_capacity(columns.len());
    let mut data_types: Vec<i16> = Vec::with_capacity(columns.len());
    let mut type_names: Vec<&str> = Vec::with_capacity(columns.len());
    let mut column_sizes: Vec<Option<i32>> = Vec::with_capacity(columns.len());
    let mut decimal_digits: Vec<Option<i16>> = Vec::with_capacity(columns.len());
    let mut num_prec_radix: Vec<Option<i16>> = Vec::with_capacity(columns.len());
    let mut nullables: Vec<i16> = Vec::with_capacity(columns.len());
    let mut column_defs: Vec<Option<&str>> = Vec::with_capacity(columns.len());
    let mut is_nullables: Vec<&str> = Vec::with_capacity(columns.len());
    let mut is_autoincrements: Vec<Option<&str>> = Vec::with_capacity(columns.len());
    let mut is_generatedcolumns: Vec<Option<&str>> = Vec::with_capacity(columns.len());

    for col in columns {
        table_catalogs.push(col.catalog_name.as_str());
        table_schemas.push(col.schema_name.as_str());
        table_names.push(col.table_name.as_str());
        column_names.push(col.column_name.as_str());
        ordinal_positions.push(col.ordinal_position);
        remarks.push(col.remarks.as_deref());
        data_types.push(warehouse_type_to_xdbc(&col.data_type));
        type_names.push(col.type_name.as_str());
        column_sizes.push(col.column_size);
        decimal_digits.push(col.decimal_digits);
        num_prec_radix.push(col.num_prec_radix);
        nullables.push(col.nullable);
        column_defs.push(col.column_def.as_deref());
        is_nullables.push(col.is_nullable.as_str());
        is_autoincrements.push(col.is_autoincrement.map(yes_no));
        is_generatedcolumns.push(col.is_generatedcolumn.map(yes_no));
    }

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(table_catalogs)),
        Arc::new(StringArray::from(table_schemas)),
        Arc::new(StringArray::from(table_names)),
        Arc::new(StringArray::from(column_names)),
        Arc::new(Int32Array::from(ordinal_positions)),
        Arc::new(StringArray::from(remarks)),
        Arc::new(Int16Array::from(data_types)),
        Arc::new(StringArray::from(type_names)),
        Arc::new(Int32Array::from(column_sizes)),
        Arc::new(Int16Array::from(decimal_digits)),
        Arc::new(Int16Array::from(num_prec_radix)),
        Arc::new(Int16Array::from(nullables)),
        Arc::new(StringArray::from(column_defs)),
        Arc::new(StringArray::from(is_nullables)),
        Arc::new(StringArray::from(is_autoincrements)),
        Arc::new(StringArray::from(is_generatedcolumns)),
    ];
    RecordBatch::try_new(SchemaCollection::Columns.schema(), arrays)
        .map_err(|e| WarehouseErrorHelper::io().message(format!("Arrow error: {}", e)))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "YES"
    } else {
        "NO"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adbc_core::error::Status;
    use arrow_array::cast::AsArray;
    use arrow_array::Array;
    use arrow_array::types::{Int16Type, Int32Type};

    #[test]
    fn test_from_name_resolves_all_collections() {
        for collection in SchemaCollection::ALL {
            let resolved = SchemaCollection::from_name(collection.name()).unwrap();
            assert_eq!(resolved, collection);
        }
    }

    #[test]
    fn test_from_name_is_case_sensitive() {
        let err = SchemaCollection::from_name("catalogs").unwrap_err();
        assert_eq!(err.status(), Status::NotFound);
        assert!(err.message().contains("catalogs"));
    }

    #[test]
    fn test_from_name_rejects_unknown_collection() {
        let err = SchemaCollection::from_name("Indexes").unwrap_err();
        assert_eq!(err.status(), Status::NotFound);
        assert!(err.message().contains("Unsupported metadata collection"));
    }

    #[test]
    fn test_restriction_counts() {
        assert_eq!(SchemaCollection::MetaDataCollections.restriction_count(), 0);
        assert_eq!(SchemaCollection::Restrictions.restriction_count(), 0);
        assert_eq!(SchemaCollection::Catalogs.restriction_count(), 1);
        assert_eq!(SchemaCollection::Schemas.restriction_count(), 2);
        assert_eq!(SchemaCollection::TableTypes.restriction_count(), 0);
        assert_eq!(SchemaCollection::Tables.restriction_count(), 4);
        assert_eq!(SchemaCollection::Columns.restriction_count(), 4);
    }

    #[test]
    fn test_meta_data_collections_batch() {
        let batch = meta_data_collections_batch().unwrap();
        assert_eq!(batch.num_rows(), 7);
        assert_eq!(batch.num_columns(), 2);

        let names = batch.column(0).as_string::<i32>();
        let counts = batch.column(1).as_primitive::<Int32Type>();
        assert_eq!(names.value(0), "MetaDataCollections");
        assert_eq!(counts.value(0), 0);
        assert_eq!(names.value(6), "Columns");
        assert_eq!(counts.value(6), 4);
    }

    #[test]
    fn test_restrictions_batch() {
        let batch = restrictions_batch().unwrap();
        // 1 (Catalogs) + 2 (Schemas) + 4 (Tables) + 4 (Columns)
        assert_eq!(batch.num_rows(), 11);

        let collections = batch.column(0).as_string::<i32>();
        let names = batch.column(1).as_string::<i32>();
        let numbers = batch.column(2).as_primitive::<Int32Type>();
        assert_eq!(collections.value(0), "Catalogs");
        assert_eq!(names.value(0), "Catalog_Name");
        assert_eq!(numbers.value(0), 1);
        assert_eq!(collections.value(2), "Schemas");
        assert_eq!(names.value(2), "Schema_Name");
        assert_eq!(numbers.value(2), 2);
        assert_eq!(collections.value(6), "Tables");
        assert_eq!(names.value(6), "Table_Type");
        assert_eq!(numbers.value(6), 4);
        assert_eq!(collections.value(10), "Columns");
        assert_eq!(names.value(10), "Column_Name");
        assert_eq!(numbers.value(10), 4);
    }

    #[test]
    fn test_table_types_batch() {
        let types = vec![
            "TABLE".to_string(),
            "VIEW".to_string(),
            "SYSTEM TABLE".to_string(),
            "MATERIALIZED VIEW".to_string(),
        ];
        let batch = table_types_batch(&types).unwrap();
        assert_eq!(batch.num_rows(), 4);
        let values = batch.column(0).as_string::<i32>();
        assert_eq!(values.value(0), "TABLE");
        assert_eq!(values.value(3), "MATERIALIZED VIEW");
    }

    #[test]
    fn test_catalogs_batch() {
        let catalogs = vec![
            CatalogInfo {
                catalog_name: "main".to_string(),
            },
            CatalogInfo {
                catalog_name: "samples".to_string(),
            },
        ];
        let batch = catalogs_batch(&catalogs).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.column(0).as_string::<i32>().value(1), "samples");
    }

    #[test]
    fn test_schemas_batch() {
        let schemas = vec![SchemaInfo {
            catalog_name: "main".to_string(),
            schema_name: "default".to_string(),
        }];
        let batch = schemas_batch(&schemas).unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.column(0).as_string::<i32>().value(0), "main");
        assert_eq!(batch.column(1).as_string::<i32>().value(0), "default");
    }

    #[test]
    fn test_tables_batch() {
        let tables = vec![TableInfo {
            catalog_name: "main".to_string(),
            schema_name: "default".to_string(),
            table_name: "users".to_string(),
            table_type: "TABLE".to_string(),
            remarks: None,
        }];
        let batch = tables_batch(&tables).unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), 4);
        assert_eq!(batch.column(2).as_string::<i32>().value(0), "users");
        assert_eq!(batch.column(3).as_string::<i32>().value(0), "TABLE");
    }

    #[test]
    fn test_columns_batch() {
        let columns = vec![
            ColumnInfo {
                catalog_name: "main".to_string(),
                schema_name: "default".to_string(),
                table_name: "users".to_string(),
                column_name: "id".to_string(),
                ordinal_position: 1,
                data_type: "INT".to_string(),
                type_name: "INT".to_string(),
                column_size: Some(10),
                decimal_digits: Some(0),
                num_prec_radix: Some(10),
                nullable: 0,
                remarks: None,
                column_def: None,
                is_nullable: "NO".to_string(),
                is_autoincrement: Some(true),
                is_generatedcolumn: Some(false),
            },
            ColumnInfo {
                catalog_name: "main".to_string(),
                schema_name: "default".to_string(),
                table_name: "users".to_string(),
                column_name: "name".to_string(),
                ordinal_position: 2,
                data_type: "STRING".to_string(),
                type_name: "STRING".to_string(),
                column_size: None,
                decimal_digits: None,
                num_prec_radix: None,
                nullable: 1,
                remarks: Some("display name".to_string()),
                column_def: None,
                is_nullable: "YES".to_string(),
                is_autoincrement: None,
                is_generatedcolumn: None,
            },
        ];
        let batch = columns_batch(&columns).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 16);

        let data_types = batch.column(6).as_primitive::<Int16Type>();
        assert_eq!(data_types.value(0), 4); // INTEGER
        assert_eq!(data_types.value(1), -1); // LONGVARCHAR

        let autoincrement = batch.column(14).as_string::<i32>();
        assert_eq!(autoincrement.value(0), "YES");
        assert!(autoincrement.is_null(1));

        let generated = batch.column(15).as_string::<i32>();
        assert_eq!(generated.value(0), "NO");

        let remarks = batch.column(5).as_string::<i32>();
        assert!(remarks.is_null(0));
        assert_eq!(remarks.value(1), "display name");
    }

    #[test]
    fn test_empty_batch_matches_schema() {
        for collection in SchemaCollection::ALL {
            let batch = collection.empty_batch();
            assert_eq!(batch.num_rows(), 0);
            assert_eq!(batch.schema(), collection.schema());
        }
    }
}
