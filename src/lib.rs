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

//! ADBC driver and SQL client layer for columnar warehouses speaking a
//! REST statement-execution API.
//!
//! ## Overview
//!
//! The crate implements the standard ADBC traits from `adbc_core`:
//! - [`Driver`] - Entry point for creating database configurations
//! - [`Database`] - Holds connection configuration
//! - [`Connection`] - Active session against a warehouse
//! - [`Statement`] - SQL statement execution
//!
//! On top of the ADBC surface it carries an ADO.NET-style client layer:
//! - [`Command`] / [`RowReader`] - statement execution with a forward-only,
//!   typed row cursor
//! - [`Connection::get_schema`] - flat metadata collections (Catalogs,
//!   Schemas, TableTypes, Tables, Columns and the two static collections)
//!   with positional LIKE restrictions
//! - [`PagedQuery`] - offset/limit paging over result sets of unknown size
//!
//! ## Example
//!
//! ```ignore
//! use warehouse_adbc::Driver;
//! use adbc_core::driver::Driver as _;
//! use adbc_core::options::{OptionDatabase, OptionValue};
//! use adbc_core::{Database as _, Optionable};
//!
//! let mut driver = Driver::new();
//! let mut database = driver.new_database()?;
//! database.set_option(OptionDatabase::Uri, OptionValue::String("https://warehouse.example.com".into()))?;
//! database.set_option(OptionDatabase::Other("warehouse.warehouse_id".into()), OptionValue::String("abc123".into()))?;
//! database.set_option(OptionDatabase::Other("warehouse.access_token".into()), OptionValue::String("token".into()))?;
//!
//! let connection = database.new_connection()?;
//! let command = connection.create_command("SELECT id, name FROM users ORDER BY id");
//! let mut reader = command.execute_reader()?;
//! while reader.read()? {
//!     println!("{} {}", reader.get_i64(0)?, reader.get_string(1)?);
//! }
//! ```
//!
//! A connection string configures the same surface in one step:
//!
//! ```ignore
//! use warehouse_adbc::Database;
//! use adbc_core::Database as _;
//!
//! let database = Database::from_connection_string(
//!     "uri=https://warehouse.example.com;warehouse_id=abc123;access_token=token",
//! )?;
//! let connection = database.new_connection()?;
//! ```
//!
//! ## Configuration Options
//!
//! | Option | Description |
//! |--------|-------------|
//! | `uri` | Warehouse base URL, optionally with a `/sql/warehouses/{id}` path |
//! | `warehouse.warehouse_id` | Warehouse ID directly |
//! | `warehouse.access_token` | Bearer access token |
//! | `warehouse.catalog` | Default catalog |
//! | `warehouse.schema` | Default schema |
//! | `warehouse.include_table_constraints` | Enumerate constraints in `get_objects` (default true) |
//! | `warehouse.log_level` | Log level: off, error, warn, info, debug, trace |
//! | `warehouse.log_file` | Log file path (stderr when unset) |
//! | `warehouse.http.connect_timeout_seconds` | HTTP connect timeout |
//! | `warehouse.http.read_timeout_seconds` | HTTP read timeout |
//! | `warehouse.http.max_retries` | HTTP retry attempts for transient failures |
//! | `warehouse.poll_timeout_seconds` | Give up polling a statement after this long |
//! | `warehouse.poll_interval_ms` | Delay between statement status polls |

pub mod auth;
pub mod client;
pub mod command;
pub mod connection;
pub mod database;
pub mod driver;
pub mod error;
mod logging;
pub mod metadata;
pub mod paging;
pub mod reader;
pub mod statement;
pub mod types;

// Re-export main types
pub use command::{Command, RowReader};
pub use connection::Connection;
pub use database::Database;
pub use driver::Driver;
pub use error::{Error, Result, WarehouseErrorHelper};
pub use paging::{PagedQuery, PagedResult};
pub use statement::Statement;

// Re-export client and metadata types for advanced users
pub use client::{HttpClientConfig, RestClient, WarehouseClient, WarehouseHttpClient};
pub use metadata::SchemaCollection;
