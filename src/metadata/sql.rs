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

//! SQL command builder for metadata queries.
//!
//! Builds SHOW SQL commands (SHOW CATALOGS, SHOW SCHEMAS, SHOW TABLES,
//! SHOW COLUMNS, SHOW KEYS, SHOW FOREIGN KEYS) with optional pattern
//! filters and identifier escaping.

use crate::error::{Result, WarehouseErrorHelper};

/// Builds SQL commands for metadata queries.
///
/// Uses the builder pattern to construct SHOW SQL commands with optional
/// catalog, schema, table, and column pattern filters.
///
/// # Examples
///
/// ```ignore
/// let sql = SqlCommandBuilder::new()
///     .with_catalog(Some("my_catalog"))
///     .with_schema_pattern(Some("my_schema%"))
///     .build_show_tables();
/// assert_eq!(sql, "SHOW TABLES IN CATALOG `my_catalog` SCHEMA LIKE 'my_schema%'");
/// ```
pub struct SqlCommandBuilder {
    catalog: Option<String>,
    schema_pattern: Option<String>,
    table_pattern: Option<String>,
    column_pattern: Option<String>,
}

impl SqlCommandBuilder {
    /// Create a new builder with no filters set.
    pub fn new() -> Self {
        Self {
            catalog: None,
            schema_pattern: None,
            table_pattern: None,
            column_pattern: None,
        }
    }

    /// Set the catalog name for the query.
    pub fn with_catalog(mut self, catalog: Option<&str>) -> Self {
        self.catalog = catalog.map(|s| s.to_string());
        self
    }

    /// Set the schema pattern filter (SQL LIKE syntax with `%` and `_`).
    pub fn with_schema_pattern(mut self, pattern: Option<&str>) -> Self {
        self.schema_pattern = pattern.map(Self::escape_pattern);
        self
    }

    /// Set the table pattern filter (SQL LIKE syntax with `%` and `_`).
    pub fn with_table_pattern(mut self, pattern: Option<&str>) -> Self {
        self.table_pattern = pattern.map(Self::escape_pattern);
        self
    }

    /// Set the column pattern filter (SQL LIKE syntax with `%` and `_`).
    pub fn with_column_pattern(mut self, pattern: Option<&str>) -> Self {
        self.column_pattern = pattern.map(Self::escape_pattern);
        self
    }

    /// Build `SHOW CATALOGS` command. No filters are applied.
    ///
    /// Catalog pattern filtering is done client-side against the rows this
    /// command returns, since `SHOW CATALOGS` takes no LIKE clause.
    pub fn build_show_catalogs(&self) -> String {
        "SHOW CATALOGS".to_string()
    }

    /// Build `SHOW SCHEMAS` command.
    ///
    /// When catalog is `None` or a wildcard (`%`, `*`, empty), uses
    /// `SHOW SCHEMAS IN ALL CATALOGS`. Otherwise uses `SHOW SCHEMAS IN \`{catalog}\``.
    /// Appends `LIKE '{pattern}'` if a schema pattern is set.
    pub fn build_show_schemas(&self) -> String {
        let mut sql = if Self::is_null_or_wildcard(&self.catalog) {
            "SHOW SCHEMAS IN ALL CATALOGS".to_string()
        } else {
            format!(
                "SHOW SCHEMAS IN {}",
                Self::escape_identifier(self.catalog.as_ref().unwrap())
            )
        };

        if let Some(ref pattern) = self.schema_pattern {
            sql.push_str(&format!(" LIKE '{}'", pattern));
        }

        sql
    }

    /// Build `SHOW TABLES` command.
    ///
    /// When catalog is `None` or a wildcard, uses `SHOW TABLES IN ALL CATALOGS`.
    /// Otherwise uses `SHOW TABLES IN CATALOG \`{catalog}\``.
    /// Appends `SCHEMA LIKE` and `LIKE` filters if set.
    pub fn build_show_tables(&self) -> String {
        let mut sql = if Self::is_null_or_wildcard(&self.catalog) {
            "SHOW TABLES IN ALL CATALOGS".to_string()
        } else {
            format!(
                "SHOW TABLES IN CATALOG {}",
                Self::escape_identifier(self.catalog.as_ref().unwrap())
            )
        };

        if let Some(ref pattern) = self.schema_pattern {
            sql.push_str(&format!(" SCHEMA LIKE '{}'", pattern));
        }

        if let Some(ref pattern) = self.table_pattern {
            sql.push_str(&format!(" LIKE '{}'", pattern));
        }

        sql
    }

    /// Build `SHOW COLUMNS` command.
    ///
    /// Requires a catalog — `SHOW COLUMNS IN ALL CATALOGS` is not available
    /// server-side, so callers fan out per catalog. Returns an error if
    /// catalog is `None`.
    /// Appends `SCHEMA LIKE`, `TABLE LIKE`, and `LIKE` filters if set.
    pub fn build_show_columns(&self) -> Result<String> {
        let catalog = self.catalog.as_ref().ok_or_else(|| {
            WarehouseErrorHelper::invalid_argument()
                .message("catalog is required for SHOW COLUMNS (ALL CATALOGS not supported)")
        })?;

        let mut sql = format!(
            "SHOW COLUMNS IN CATALOG {}",
            Self::escape_identifier(catalog)
        );

        if let Some(ref pattern) = self.schema_pattern {
            sql.push_str(&format!(" SCHEMA LIKE '{}'", pattern));
        }

        if let Some(ref pattern) = self.table_pattern {
            sql.push_str(&format!(" TABLE LIKE '{}'", pattern));
        }

        if let Some(ref pattern) = self.column_pattern {
            sql.push_str(&format!(" LIKE '{}'", pattern));
        }

        Ok(sql)
    }

    /// Build `SHOW KEYS` command for primary keys.
    ///
    /// This is a static method since primary key queries require all three
    /// identifiers (catalog, schema, table) and no patterns.
    pub fn build_show_primary_keys(catalog: &str, schema: &str, table: &str) -> String {
        format!(
            "SHOW KEYS IN CATALOG {} IN SCHEMA {} IN TABLE {}",
            Self::escape_identifier(catalog),
            Self::escape_identifier(schema),
            Self::escape_identifier(table)
        )
    }

    /// Build `SHOW FOREIGN KEYS` command.
    ///
    /// This is a static method since foreign key queries require all three
    /// identifiers (catalog, schema, table) and no patterns.
    pub fn build_show_foreign_keys(catalog: &str, schema: &str, table: &str) -> String {
        format!(
            "SHOW FOREIGN KEYS IN CATALOG {} IN SCHEMA {} IN TABLE {}",
            Self::escape_identifier(catalog),
            Self::escape_identifier(schema),
            Self::escape_identifier(table)
        )
    }

    /// Returns `true` if the value is `None`, empty, or a wildcard (`%` or `*`).
    fn is_null_or_wildcard(value: &Option<String>) -> bool {
        match value {
            None => true,
            Some(v) => v.is_empty() || v == "%" || v == "*",
        }
    }

    /// Escape an identifier for use in SQL by wrapping in backticks.
    ///
    /// Any backticks within the identifier are doubled (`` ` `` → `` `` ``).
    fn escape_identifier(name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    /// Escape a LIKE pattern for embedding in a SHOW command.
    ///
    /// `%` and `_` wildcards pass through unchanged. Single quotes are
    /// doubled so the pattern stays inside its `'...'` literal; a quoted
    /// restriction then just matches nothing instead of breaking the
    /// command. Backticks are doubled as well.
    fn escape_pattern(pattern: &str) -> String {
        pattern.replace('\'', "''").replace('`', "``")
    }
}

impl Default for SqlCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}
