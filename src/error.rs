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

//! Error types for the warehouse ADBC driver.
//!
//! All fallible operations in this crate return [`Result`]. Errors carry an
//! ADBC [`Status`] plus a message and convert losslessly into
//! [`adbc_core::error::Error`] at the trait boundary via [`Error::to_adbc`].
//!
//! Errors are constructed through [`WarehouseErrorHelper`]:
//!
//! ```ignore
//! return Err(WarehouseErrorHelper::io().message("connection reset"));
//! ```

use adbc_core::error::Status;
use std::fmt;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised by this driver.
///
/// Wraps an ADBC status code and a human-readable message. Use
/// [`WarehouseErrorHelper`] to construct one.
#[derive(Debug, Clone)]
pub struct Error {
    status: Status,
    message: String,
}

impl Error {
    /// The ADBC status classifying this error.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Convert into an [`adbc_core::error::Error`] for returning across the
    /// ADBC trait boundary.
    pub fn to_adbc(self) -> adbc_core::error::Error {
        adbc_core::error::Error::with_message_and_status(self.message, self.status)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.status, self.message)
    }
}

impl std::error::Error for Error {}

impl From<Error> for adbc_core::error::Error {
    fn from(err: Error) -> Self {
        err.to_adbc()
    }
}

/// Builder returned by the [`WarehouseErrorHelper`] constructors.
#[derive(Debug)]
pub struct ErrorBuilder {
    status: Status,
}

impl ErrorBuilder {
    /// Attach a message and produce the final [`Error`].
    pub fn message(self, message: impl Into<String>) -> Error {
        Error {
            status: self.status,
            message: message.into(),
        }
    }
}

/// Constructors for the error statuses this driver raises.
///
/// Each method returns an [`ErrorBuilder`]; chain `.message(...)` to finish.
pub struct WarehouseErrorHelper;

impl WarehouseErrorHelper {
    /// Invalid or missing arguments/configuration supplied by the caller.
    pub fn invalid_argument() -> ErrorBuilder {
        ErrorBuilder {
            status: Status::InvalidArguments,
        }
    }

    /// Operation invoked in a state that cannot service it.
    pub fn invalid_state() -> ErrorBuilder {
        ErrorBuilder {
            status: Status::InvalidState,
        }
    }

    /// Data did not match the requested or expected shape.
    pub fn invalid_data() -> ErrorBuilder {
        ErrorBuilder {
            status: Status::InvalidData,
        }
    }

    /// Named entity (table, metadata collection, ...) does not exist.
    pub fn not_found() -> ErrorBuilder {
        ErrorBuilder {
            status: Status::NotFound,
        }
    }

    /// Feature intentionally not supported by this driver.
    pub fn not_implemented() -> ErrorBuilder {
        ErrorBuilder {
            status: Status::NotImplemented,
        }
    }

    /// Network, serialization, or backend execution failure.
    pub fn io() -> ErrorBuilder {
        ErrorBuilder { status: Status::IO }
    }

    /// Authentication with the warehouse failed.
    pub fn unauthenticated() -> ErrorBuilder {
        ErrorBuilder {
            status: Status::Unauthenticated,
        }
    }

    /// Error for an option key this driver does not recognize.
    pub fn set_unknown_option<K: fmt::Debug>(key: &K) -> Error {
        Self::invalid_argument().message(format!("Unknown option: {key:?}"))
    }

    /// Error for a recognized option key given an unusable value.
    pub fn set_invalid_option<K: fmt::Debug, V: fmt::Debug>(key: &K, value: &V) -> Error {
        Self::invalid_argument().message(format!("Invalid value for option {key:?}: {value:?}"))
    }

    /// Error for reading an option key this driver does not expose.
    pub fn get_unknown_option<K: fmt::Debug>(key: &K) -> Error {
        Self::not_found().message(format!("Unknown option: {key:?}"))
    }
}
