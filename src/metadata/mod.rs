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

//! Metadata support for the ADBC Connection interface methods.
//!
//! This module answers catalog/schema/table/column questions by running
//! SHOW commands through the warehouse client and shaping the results
//! into Arrow batches.
//!
//! ## Module Structure
//!
//! - `types`: Data structures for metadata query results
//! - `sql`: SQL command builder for metadata queries
//! - `parse`: Decoding of SHOW command result batches
//! - `results`: Conversion of raw statement responses into batches
//! - `schemas`: Arrow schema of the hierarchical `get_objects` result
//! - `builder`: Assembly of the hierarchical `get_objects` batch
//! - `collections`: Flat collection definitions served by `get_schema`
//! - `provider`: Dispatch of `get_schema` collection requests
//! - `type_mapping`: Warehouse type name to Arrow/XDBC type mapping

pub mod builder;
pub mod collections;
pub mod parse;
pub mod provider;
pub mod results;
pub mod schemas;
pub mod sql;
pub mod type_mapping;
pub mod types;

// Re-export commonly used types
pub use builder::GetObjectsBuilder;
pub use collections::SchemaCollection;
pub use provider::CollectionProvider;
pub use sql::SqlCommandBuilder;
pub use types::{CatalogInfo, ColumnInfo, ForeignKeyInfo, PrimaryKeyInfo, SchemaInfo, TableInfo};
