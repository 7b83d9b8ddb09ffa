//! GraphQL transport shared by the Shopify and contributor clients.
//!
//! Operations implement [`graphql_client::GraphQLQuery`]; [`GraphQLTransport`]
//! posts them with `reqwest` and turns transport failures, GraphQL errors and
//! empty payloads into [`ApiError`].

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur when talking to a GraphQL API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload parsed but holds a value we can't use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

impl ApiError {
    /// A single-message GraphQL error, for failures we detect ourselves.
    pub(crate) fn message(message: impl Into<String>) -> Self {
        Self::GraphQL(vec![GraphQLError {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }])
    }
}

/// A GraphQL error returned by the API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(e: graphql_client::Error) -> Self {
        Self {
            message: e.message,
            locations: e.locations.map_or_else(Vec::new, |locs| {
                locs.into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: e.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// GraphQLTransport
// =============================================================================

/// HTTP transport for one GraphQL endpoint.
///
/// Cheaply cloneable; clones share the underlying connection pool.
#[derive(Clone)]
pub struct GraphQLTransport {
    inner: Arc<GraphQLTransportInner>,
}

struct GraphQLTransportInner {
    client: reqwest::Client,
    endpoint: String,
    auth_header: Option<(&'static str, SecretString)>,
}

impl GraphQLTransport {
    /// Create a transport posting to `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(GraphQLTransportInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                auth_header: None,
            }),
        }
    }

    /// Create a transport that sends `token` in the `header` on every request.
    #[must_use]
    pub fn with_token(endpoint: impl Into<String>, header: &'static str, token: SecretString) -> Self {
        Self {
            inner: Arc::new(GraphQLTransportInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                auth_header: Some((header, token)),
            }),
        }
    }

    /// The endpoint requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, rate
    /// limiting, unparseable bodies, GraphQL errors, or a missing `data` field.
    pub async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ApiError> {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("Content-Type", "application/json");

        if let Some((header, token)) = &self.inner.auth_header {
            request = request.header(*header, token.expose_secret());
        }

        let response = request.json(&request_body).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %response_text.chars().take(500).collect::<String>(),
                "GraphQL endpoint returned non-success status"
            );
            return Err(ApiError::message(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            )));
        }

        parse_response::<Q::ResponseData>(request_body.operation_name, &response_text)
    }
}

/// Decode a GraphQL response body into its `data` payload.
fn parse_response<T: serde::de::DeserializeOwned>(
    operation: &str,
    body: &str,
) -> Result<T, ApiError> {
    let response: Response<T> = serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            operation,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse GraphQL response"
        );
        ApiError::Parse(e)
    })?;

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        tracing::debug!(errors = ?errors, operation, "GraphQL errors in response");
        return Err(ApiError::GraphQL(
            errors.into_iter().map(GraphQLError::from).collect(),
        ));
    }

    response.data.ok_or_else(|| {
        tracing::error!(operation, "GraphQL response has no data and no errors");
        ApiError::message("No data in response")
    })
}
