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

//! Warehouse type → Arrow/XDBC type mapping.
//!
//! Maps warehouse SQL type names (from `SHOW COLUMNS` results and result
//! manifests) to Arrow `DataType` and XDBC type codes.

use arrow_schema::{DataType, IntervalUnit, TimeUnit};

/// Map a warehouse SQL type name to an Arrow DataType.
pub fn warehouse_type_to_arrow(type_name: &str) -> DataType {
    let type_upper = type_name.to_uppercase();
    let base_type = type_upper.split('(').next().unwrap_or(&type_upper).trim();

    match base_type {
        "BOOLEAN" | "BOOL" => DataType::Boolean,
        "TINYINT" | "BYTE" => DataType::Int8,
        "SMALLINT" | "SHORT" => DataType::Int16,
        "INT" | "INTEGER" => DataType::Int32,
        "BIGINT" | "LONG" => DataType::Int64,
        "FLOAT" | "REAL" => DataType::Float32,
        "DOUBLE" => DataType::Float64,
        "DECIMAL" | "DEC" | "NUMERIC" => {
            let (precision, scale) = parse_decimal_params(type_name);
            DataType::Decimal128(precision, scale)
        }
        "STRING" | "VARCHAR" | "CHAR" | "TEXT" => DataType::Utf8,
        "BINARY" | "VARBINARY" => DataType::Binary,
        "DATE" => DataType::Date32,
        "TIMESTAMP" | "TIMESTAMP_NTZ" => DataType::Timestamp(TimeUnit::Microsecond, None),
        "TIMESTAMP_LTZ" => DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
        "INTERVAL" => DataType::Interval(IntervalUnit::DayTime),
        "ARRAY" => DataType::Utf8,  // Represented as JSON string
        "MAP" => DataType::Utf8,    // Represented as JSON string
        "STRUCT" => DataType::Utf8, // Represented as JSON string
        "VOID" | "NULL" => DataType::Null,
        _ => DataType::Utf8, // Default fallback
    }
}

/// Map a warehouse type name to an XDBC type code.
pub fn warehouse_type_to_xdbc(type_name: &str) -> i16 {
    let type_upper = type_name.to_uppercase();
    let base_type = type_upper.split('(').next().unwrap_or(&type_upper).trim();

    match base_type {
        "BOOLEAN" | "BOOL" => -7,                              // XDBC BIT
        "TINYINT" | "BYTE" => -6,                              // XDBC TINYINT
        "SMALLINT" | "SHORT" => 5,                             // XDBC SMALLINT
        "INT" | "INTEGER" => 4,                                // XDBC INTEGER
        "BIGINT" | "LONG" => -5,                               // XDBC BIGINT
        "FLOAT" | "REAL" => 6,                                 // XDBC FLOAT
        "DOUBLE" => 8,                                         // XDBC DOUBLE
        "DECIMAL" | "DEC" | "NUMERIC" => 3,                    // XDBC DECIMAL
        "STRING" | "TEXT" => -1,                               // XDBC LONGVARCHAR
        "VARCHAR" => 12,                                       // XDBC VARCHAR
        "CHAR" => 1,                                           // XDBC CHAR
        "BINARY" | "VARBINARY" => -3,                          // XDBC VARBINARY
        "DATE" => 91,                                          // XDBC DATE
        "TIMESTAMP" | "TIMESTAMP_NTZ" | "TIMESTAMP_LTZ" => 93, // XDBC TIMESTAMP
        "ARRAY" => 2003,                                       // XDBC ARRAY
        "MAP" => 2000,                                         // XDBC JAVA_OBJECT
        "STRUCT" => 2002,                                      // XDBC STRUCT
        _ => 12,                                               // Default to VARCHAR
    }
}

/// Parse precision and scale from a DECIMAL(p,s) type string.
/// Defaults to DECIMAL(38,0) if not specified.
fn parse_decimal_params(type_name: &str) -> (u8, i8) {
    let default_precision = 38u8;
    let default_scale = 0i8;

    let Some(start) = type_name.find('(') else {
        return (default_precision, default_scale);
    };
    let Some(end) = type_name.find(')') else {
        return (default_precision, default_scale);
    };

    let params = &type_name[start + 1..end];
    let parts: Vec<&str> = params.split(',').map(|s| s.trim()).collect();

    let precision = parts
        .first()
        .and_then(|p| p.parse::<u8>().ok())
        .unwrap_or(default_precision);
    let scale = parts
        .get(1)
        .and_then(|s| s.parse::<i8>().ok())
        .unwrap_or(default_scale);

    (precision, scale)
}
