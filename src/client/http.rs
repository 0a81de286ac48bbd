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

//! HTTP client implementation for the warehouse REST API.
//!
//! This module provides a low-level HTTP client with:
//! - Connection pooling
//! - Automatic retry with exponential backoff
//! - Bearer token authentication
//! - Configurable timeouts

use crate::auth::TokenProvider;
use crate::error::{Result, WarehouseErrorHelper};
use reqwest::{Client, Request, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Read timeout duration.
    pub read_timeout: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Base delay between retry attempts (doubles each retry).
    pub retry_delay: Duration,
    /// Maximum number of idle connections per host.
    pub max_connections_per_host: usize,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(60),
            max_retries: 5,
            retry_delay: Duration::from_millis(1500),
            max_connections_per_host: 100,
            user_agent: format!("warehouse-adbc/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client for communicating with warehouse endpoints.
///
/// This client handles:
/// - Connection pooling (via reqwest)
/// - Automatic retry with exponential backoff for transient failures
/// - Bearer token authentication
/// - User-Agent header injection
#[derive(Debug)]
pub struct WarehouseHttpClient {
    client: Client,
    config: HttpClientConfig,
    token_provider: Arc<dyn TokenProvider>,
}

impl WarehouseHttpClient {
    /// Creates a new HTTP client with the given configuration and token provider.
    pub fn new(config: HttpClientConfig, token_provider: Arc<dyn TokenProvider>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .pool_max_idle_per_host(config.max_connections_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                WarehouseErrorHelper::io().message(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            config,
            token_provider,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Returns the underlying reqwest client for building requests.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the authorization header value.
    pub fn auth_header(&self) -> Result<String> {
        self.token_provider.auth_header()
    }

    /// Execute an HTTP request with automatic retry logic and authentication.
    ///
    /// Retries are performed for:
    /// - Network errors
    /// - 429 Too Many Requests
    /// - 502 Bad Gateway
    /// - 503 Service Unavailable
    /// - 504 Gateway Timeout
    ///
    /// Non-retryable errors are returned immediately. 401/403 responses are
    /// surfaced as authentication failures.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let mut attempts = 0;
        let mut last_error: Option<String> = None;

        // Clone the request parts we need for retries
        let method = request.method().clone();
        let url = request.url().clone();
        let headers = request.headers().clone();
        let body_bytes = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(|b| b.to_vec());

        loop {
            attempts += 1;

            // Build a fresh request for this attempt
            let mut req_builder = self.client.request(method.clone(), url.clone());

            // Add headers
            for (name, value) in headers.iter() {
                req_builder = req_builder.header(name, value);
            }

            // The token is fetched per attempt so rotating providers stay current
            let auth_header = self.auth_header()?;
            req_builder = req_builder.header("Authorization", auth_header);

            // Add body if present
            if let Some(ref body) = body_bytes {
                req_builder = req_builder.body(body.clone());
            }

            let request = req_builder.build().map_err(|e| {
                WarehouseErrorHelper::io().message(format!("Failed to build request: {}", e))
            })?;

            debug!(
                "Executing {} {} (attempt {}/{})",
                method,
                url,
                attempts,
                self.config.max_retries + 1
            );

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    // Check if this is a retryable error
                    if Self::is_retryable_status(status) && attempts <= self.config.max_retries {
                        last_error = Some(format!("HTTP {}", status.as_u16()));
                        warn!(
                            "Request failed with {} (attempt {}/{}), retrying...",
                            status,
                            attempts,
                            self.config.max_retries + 1
                        );
                        self.wait_for_retry(attempts).await;
                        continue;
                    }

                    // Non-retryable HTTP error or max retries exceeded
                    let error_body = response.text().await.unwrap_or_default();
                    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                        return Err(WarehouseErrorHelper::unauthenticated().message(format!(
                            "HTTP {} - {}",
                            status.as_u16(),
                            error_body
                        )));
                    }
                    return Err(WarehouseErrorHelper::io().message(format!(
                        "HTTP {} - {}",
                        status.as_u16(),
                        error_body
                    )));
                }
                Err(e) => {
                    // Network or other error
                    if Self::is_retryable_error(&e) && attempts <= self.config.max_retries {
                        last_error = Some(e.to_string());
                        warn!(
                            "Request failed with error (attempt {}/{}): {}, retrying...",
                            attempts,
                            self.config.max_retries + 1,
                            e
                        );
                        self.wait_for_retry(attempts).await;
                        continue;
                    }

                    return Err(WarehouseErrorHelper::io().message(format!(
                        "HTTP request failed after {} attempts: {}",
                        attempts,
                        last_error.unwrap_or_else(|| e.to_string())
                    )));
                }
            }
        }
    }

    /// Check if the HTTP status code indicates a retryable error.
    fn is_retryable_status(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
                | StatusCode::BAD_GATEWAY
        )
    }

    /// Check if the request error is retryable.
    fn is_retryable_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect() || error.is_request()
    }

    /// Wait with exponential backoff before retry.
    async fn wait_for_retry(&self, attempt: u32) {
        let delay = self.config.retry_delay * 2u32.saturating_pow(attempt.saturating_sub(1));
        debug!("Waiting {:?} before retry", delay);
        sleep(delay).await;
    }
}
