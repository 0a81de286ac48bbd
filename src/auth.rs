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

//! Authentication providers for warehouse API requests.

use crate::error::{Result, WarehouseErrorHelper};

/// Source of the `Authorization` header attached to every API request.
///
/// The HTTP client calls [`auth_header`](TokenProvider::auth_header) per
/// request, so providers backed by refreshable credentials can rotate tokens
/// without rebuilding the client.
pub trait TokenProvider: Send + Sync + std::fmt::Debug {
    /// Produce the full `Authorization` header value.
    fn auth_header(&self) -> Result<String>;
}

/// A fixed bearer access token.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log token material
        f.debug_struct("StaticToken").field("token", &"***").finish()
    }
}

impl TokenProvider for StaticToken {
    fn auth_header(&self) -> Result<String> {
        if self.token.is_empty() {
            return Err(WarehouseErrorHelper::invalid_argument().message("access token is empty"));
        }
        Ok(format!("Bearer {}", self.token))
    }
}
