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

//! Database implementation for the warehouse ADBC driver.
//!
//! A Database holds connection configuration and nothing else; no network
//! activity happens until `new_connection`. Configuration arrives through
//! one of two equivalent forms:
//!
//! - ADBC options (`set_option` with `uri` and `warehouse.*` keys), or
//! - a semicolon-delimited connection string
//!   (`Database::from_connection_string`).
//!
//! The connection string parser feeds the same `set_option` path, so code
//! past this module never knows which form configured the instance.

use crate::auth::StaticToken;
use crate::client::{HttpClientConfig, RestClient, WarehouseClient, WarehouseClientConfig};
use crate::connection::{Connection, ConnectionConfig};
use crate::error::WarehouseErrorHelper;
use crate::logging::{init_logging, LogConfig};
use adbc_core::error::Result;
use adbc_core::options::{OptionConnection, OptionDatabase, OptionValue};
use adbc_core::Optionable;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Option keys recognized in connection strings, without their
/// `warehouse.` prefix. `uri` is handled separately.
const CONNECTION_STRING_KEYS: [&str; 12] = [
    "warehouse_id",
    "access_token",
    "catalog",
    "schema",
    "include_table_constraints",
    "log_level",
    "log_file",
    "http.connect_timeout_seconds",
    "http.read_timeout_seconds",
    "http.max_retries",
    "poll_timeout_seconds",
    "poll_interval_ms",
];

/// Connection configuration for a warehouse endpoint.
///
/// Created from a [`crate::Driver`], configured, then used to establish
/// [`Connection`]s.
#[derive(Debug)]
pub struct Database {
    // Core configuration
    uri: Option<String>,
    warehouse_id: Option<String>,
    access_token: Option<String>,
    catalog: Option<String>,
    schema: Option<String>,

    // Whether get_objects enumerates primary/foreign key constraints
    include_table_constraints: bool,

    // HTTP client configuration
    http_config: HttpClientConfig,

    // Statement polling configuration
    client_config: WarehouseClientConfig,

    // Logging configuration
    log_config: LogConfig,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            uri: None,
            warehouse_id: None,
            access_token: None,
            catalog: None,
            schema: None,
            include_table_constraints: true,
            http_config: HttpClientConfig::default(),
            client_config: WarehouseClientConfig::default(),
            log_config: LogConfig::default(),
        }
    }
}

impl Database {
    /// Creates a new, unconfigured Database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a Database from a semicolon-delimited connection string.
    ///
    /// Keys are case-insensitive: `uri` plus the `warehouse.*` option keys
    /// without their prefix, e.g.
    /// `uri=https://host;warehouse_id=abc;access_token=tok;catalog=main`.
    /// A key given twice with conflicting values is an error; a repeated
    /// identical pair is accepted.
    pub fn from_connection_string(connection_string: &str) -> crate::error::Result<Self> {
        let mut db = Self::new();
        let mut seen: std::collections::HashMap<String, String> = std::collections::HashMap::new();

        for pair in connection_string.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                WarehouseErrorHelper::invalid_argument()
                    .message(format!("connection string entry '{pair}' is not key=value"))
            })?;
            let key = key.trim().to_lowercase();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                return Err(WarehouseErrorHelper::invalid_argument()
                    .message(format!("connection string entry '{pair}' has an empty side")));
            }

            if let Some(previous) = seen.get(&key) {
                if previous != value {
                    return Err(WarehouseErrorHelper::invalid_argument().message(format!(
                        "connection string sets '{key}' to both '{previous}' and '{value}'"
                    )));
                }
                continue;
            }
            seen.insert(key.clone(), value.to_string());

            let option = if key == "uri" {
                OptionDatabase::Uri
            } else if CONNECTION_STRING_KEYS.contains(&key.as_str()) {
                OptionDatabase::Other(format!("warehouse.{key}"))
            } else {
                return Err(WarehouseErrorHelper::invalid_argument()
                    .message(format!("unknown connection string key '{key}'")));
            };
            db.set_option(option, OptionValue::String(value.to_string()))
                .map_err(|e| WarehouseErrorHelper::invalid_argument().message(e.message))?;
        }

        Ok(db)
    }

    /// Returns the configured URI.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Returns the configured warehouse ID.
    pub fn warehouse_id(&self) -> Option<&str> {
        self.warehouse_id.as_deref()
    }

    /// Returns the configured catalog.
    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// Returns the configured schema.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Split a `/sql/warehouses/{id}` suffix off a URI.
    ///
    /// Returns the bare host URI and the warehouse ID when the suffix is
    /// present.
    fn split_warehouse_path(uri: &str) -> Option<(String, String)> {
        let (host, id) = uri.split_once("/sql/warehouses/")?;
        let id = id.trim_end_matches('/');
        if host.is_empty() || id.is_empty() {
            return None;
        }
        Some((host.to_string(), id.to_string()))
    }

    /// Parse a boolean option value.
    fn parse_bool_option(value: &OptionValue) -> Option<bool> {
        match value {
            OptionValue::String(s) => match s.to_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Parse an integer option value.
    fn parse_int_option(value: &OptionValue) -> Option<i64> {
        match value {
            OptionValue::String(s) => s.parse().ok(),
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn string_option(value: OptionValue) -> Option<String> {
        match value {
            OptionValue::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

impl Optionable for Database {
    type Option = OptionDatabase;

    fn set_option(&mut self, key: Self::Option, value: OptionValue) -> Result<()> {
        match key {
            OptionDatabase::Uri => {
                if let Some(s) = Self::string_option(value.clone()) {
                    // A warehouse path baked into the URI configures both
                    // fields at once.
                    if let Some((host, id)) = Self::split_warehouse_path(&s) {
                        self.uri = Some(host);
                        self.warehouse_id = Some(id);
                    } else {
                        self.uri = Some(s);
                    }
                    Ok(())
                } else {
                    Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                }
            }
            OptionDatabase::Other(ref s) => match s.as_str() {
                "warehouse.warehouse_id" => {
                    if let Some(v) = Self::string_option(value.clone()) {
                        self.warehouse_id = Some(v);
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }
                "warehouse.access_token" => {
                    if let Some(v) = Self::string_option(value.clone()) {
                        self.access_token = Some(v);
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }
                "warehouse.catalog" => {
                    if let Some(v) = Self::string_option(value.clone()) {
                        self.catalog = Some(v);
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }
                "warehouse.schema" => {
                    if let Some(v) = Self::string_option(value.clone()) {
                        self.schema = Some(v);
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }
                "warehouse.include_table_constraints" => {
                    if let Some(v) = Self::parse_bool_option(&value) {
                        self.include_table_constraints = v;
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }

                // Logging options
                "warehouse.log_level" => {
                    if let Some(v) = Self::string_option(value.clone()) {
                        self.log_config.level = Some(v);
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }
                "warehouse.log_file" => {
                    if let Some(v) = Self::string_option(value.clone()) {
                        self.log_config.file = Some(v);
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }

                // HTTP client options
                "warehouse.http.connect_timeout_seconds" => {
                    if let Some(v) = Self::parse_int_option(&value).filter(|v| *v > 0) {
                        self.http_config.connect_timeout = Duration::from_secs(v as u64);
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }
                "warehouse.http.read_timeout_seconds" => {
                    if let Some(v) = Self::parse_int_option(&value).filter(|v| *v > 0) {
                        self.http_config.read_timeout = Duration::from_secs(v as u64);
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }
                "warehouse.http.max_retries" => {
                    if let Some(v) = Self::parse_int_option(&value).filter(|v| *v >= 0) {
                        self.http_config.max_retries = v as u32;
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }

                // Statement polling options
                "warehouse.poll_timeout_seconds" => {
                    if let Some(v) = Self::parse_int_option(&value).filter(|v| *v > 0) {
                        self.client_config.poll_timeout = Duration::from_secs(v as u64);
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }
                "warehouse.poll_interval_ms" => {
                    if let Some(v) = Self::parse_int_option(&value).filter(|v| *v > 0) {
                        self.client_config.poll_interval = Duration::from_millis(v as u64);
                        Ok(())
                    } else {
                        Err(WarehouseErrorHelper::set_invalid_option(&key, &value).to_adbc())
                    }
                }

                _ => Err(WarehouseErrorHelper::set_unknown_option(&key).to_adbc()),
            },
            _ => Err(WarehouseErrorHelper::set_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        match key {
            OptionDatabase::Uri => self.uri.clone().ok_or_else(|| {
                WarehouseErrorHelper::invalid_state()
                    .message("option 'uri' is not set")
                    .to_adbc()
            }),
            OptionDatabase::Other(ref s) => match s.as_str() {
                "warehouse.warehouse_id" => self.warehouse_id.clone().ok_or_else(|| {
                    WarehouseErrorHelper::invalid_state()
                        .message("option 'warehouse.warehouse_id' is not set")
                        .to_adbc()
                }),
                "warehouse.catalog" => self.catalog.clone().ok_or_else(|| {
                    WarehouseErrorHelper::invalid_state()
                        .message("option 'warehouse.catalog' is not set")
                        .to_adbc()
                }),
                "warehouse.schema" => self.schema.clone().ok_or_else(|| {
                    WarehouseErrorHelper::invalid_state()
                        .message("option 'warehouse.schema' is not set")
                        .to_adbc()
                }),
                "warehouse.include_table_constraints" => {
                    Ok(self.include_table_constraints.to_string())
                }
                _ => Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc()),
            },
            _ => Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_bytes(&self, key: Self::Option) -> Result<Vec<u8>> {
        Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_int(&self, key: Self::Option) -> Result<i64> {
        match key {
            OptionDatabase::Other(ref s) => match s.as_str() {
                "warehouse.http.max_retries" => Ok(self.http_config.max_retries as i64),
                "warehouse.poll_timeout_seconds" => {
                    Ok(self.client_config.poll_timeout.as_secs() as i64)
                }
                "warehouse.poll_interval_ms" => {
                    Ok(self.client_config.poll_interval.as_millis() as i64)
                }
                _ => Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc()),
            },
            _ => Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_double(&self, key: Self::Option) -> Result<f64> {
        Err(WarehouseErrorHelper::get_unknown_option(&key).to_adbc())
    }
}

impl adbc_core::Database for Database {
    type ConnectionType = Connection;

    fn new_connection(&mut self) -> Result<Self::ConnectionType> {
        init_logging(&self.log_config);

        // Validate required options before any network activity
        let host = self.uri.as_ref().ok_or_else(|| {
            WarehouseErrorHelper::invalid_argument()
                .message("uri not set")
                .to_adbc()
        })?;
        let warehouse_id = self.warehouse_id.as_ref().ok_or_else(|| {
            WarehouseErrorHelper::invalid_argument()
                .message("warehouse_id not set (set warehouse.warehouse_id or a uri with a /sql/warehouses/{id} path)")
                .to_adbc()
        })?;
        let access_token = self.access_token.as_ref().ok_or_else(|| {
            WarehouseErrorHelper::invalid_argument()
                .message("access_token not set")
                .to_adbc()
        })?;

        debug!(
            "Creating connection to {} with warehouse {}",
            host, warehouse_id
        );

        let token_provider = Arc::new(StaticToken::new(access_token.clone()));
        let http_client = Arc::new(
            crate::client::WarehouseHttpClient::new(self.http_config.clone(), token_provider)
                .map_err(|e| e.to_adbc())?,
        );
        let client: Arc<dyn WarehouseClient> = Arc::new(RestClient::new(
            http_client,
            host,
            warehouse_id,
            self.client_config.clone(),
        ));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                WarehouseErrorHelper::io()
                    .message(format!("failed to start runtime: {e}"))
                    .to_adbc()
            })?;

        // Opening the session authenticates against the warehouse
        Connection::new_with_runtime(
            ConnectionConfig {
                catalog: self.catalog.clone(),
                schema: self.schema.clone(),
                include_table_constraints: self.include_table_constraints,
                client,
            },
            runtime,
        )
        .map_err(|e| e.to_adbc())
    }

    fn new_connection_with_opts(
        &mut self,
        opts: impl IntoIterator<Item = (OptionConnection, OptionValue)>,
    ) -> Result<Self::ConnectionType> {
        let mut connection = self.new_connection()?;
        for (key, value) in opts {
            connection.set_option(key, value)?;
        }
        Ok(connection)
    }
}
