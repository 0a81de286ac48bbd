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

//! Data structures for metadata query results.
//!
//! These types represent the results of metadata queries executed via
//! SQL commands like `SHOW CATALOGS`, `SHOW SCHEMAS`, `SHOW TABLES`, etc.
//! They flow from `parse` into the schema provider and the `get_objects`
//! builder when serving ADBC Connection interface methods.

/// Catalog information from `SHOW CATALOGS`.
#[derive(Debug, Clone)]
pub struct CatalogInfo {
    /// The name of the catalog.
    pub catalog_name: String,
}

/// Schema information from `SHOW SCHEMAS`.
#[derive(Debug, Clone)]
pub struct SchemaInfo {
    /// The name of the catalog containing this schema.
    pub catalog_name: String,
    /// The name of the schema.
    pub schema_name: String,
}

/// Table information from `SHOW TABLES`.
#[derive(Debug, Clone)]
pub struct TableInfo {
    /// The name of the catalog containing this table.
    pub catalog_name: String,
    /// The name of the schema containing this table.
    pub schema_name: String,
    /// The name of the table.
    pub table_name: String,
    /// The type of the table (e.g., "TABLE", "VIEW").
    pub table_type: String,
    /// Optional comment/remarks about the table.
    pub remarks: Option<String>,
}

/// Column information from `SHOW COLUMNS`.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    /// The name of the catalog containing this column's table.
    pub catalog_name: String,
    /// The name of the schema containing this column's table.
    pub schema_name: String,
    /// The name of the table containing this column.
    pub table_name: String,
    /// The name of the column.
    pub column_name: String,
    /// The ordinal position of the column (1-based).
    pub ordinal_position: i32,
    /// The warehouse data type of the column (e.g., "INT", "STRING").
    pub data_type: String,
    /// The full type name including parameters (e.g., "DECIMAL(10,2)").
    pub type_name: String,
    /// The column size (precision for numeric types, length for strings).
    pub column_size: Option<i32>,
    /// The number of decimal digits (scale) for numeric types.
    pub decimal_digits: Option<i16>,
    /// The radix for numeric precision (typically 10 or 2).
    pub num_prec_radix: Option<i16>,
    /// Nullability indicator (0 = no nulls, 1 = nullable, 2 = unknown).
    pub nullable: i16,
    /// Optional comment/remarks about the column.
    pub remarks: Option<String>,
    /// The default value of the column, if any.
    pub column_def: Option<String>,
    /// "YES" if the column is nullable, "NO" otherwise.
    pub is_nullable: String,
    /// Whether the column is auto-incrementing.
    pub is_autoincrement: Option<bool>,
    /// Whether the column is a generated column.
    pub is_generatedcolumn: Option<bool>,
}

/// Primary key information from `SHOW KEYS`.
#[derive(Debug, Clone)]
pub struct PrimaryKeyInfo {
    /// The name of the catalog containing the table.
    pub catalog_name: String,
    /// The name of the schema containing the table.
    pub schema_name: String,
    /// The name of the table.
    pub table_name: String,
    /// The name of the column in the primary key.
    pub column_name: String,
    /// The sequence number of the column within the key (1-based).
    pub key_seq: i16,
    /// The name of the primary key constraint.
    pub pk_name: Option<String>,
}

/// Foreign key information from `SHOW FOREIGN KEYS`.
#[derive(Debug, Clone)]
pub struct ForeignKeyInfo {
    /// The catalog of the referenced (primary key) table.
    pub pk_catalog: String,
    /// The schema of the referenced (primary key) table.
    pub pk_schema: String,
    /// The name of the referenced (primary key) table.
    pub pk_table: String,
    /// The referenced column in the primary key table.
    pub pk_column: String,
    /// The catalog of the referencing (foreign key) table.
    pub fk_catalog: String,
    /// The schema of the referencing (foreign key) table.
    pub fk_schema: String,
    /// The name of the referencing (foreign key) table.
    pub fk_table: String,
    /// The referencing column in the foreign key table.
    pub fk_column: String,
    /// The sequence number of the column within the key (1-based).
    pub key_seq: i16,
    /// The name of the foreign key constraint.
    pub fk_name: Option<String>,
    /// The name of the referenced primary key constraint.
    pub pk_name: Option<String>,
}
