//! GraphQL transport shared by the Storefront and Admin clients.

use std::time::Duration;

use graphql_client::{QueryBody, Response};
use serde::{Serialize, de::DeserializeOwned};

use super::{GraphQLError, GraphQLErrorLocation, ShopifyError};

/// Upper bound on a single Shopify round-trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One GraphQL endpoint plus the header that authenticates against it.
pub(super) struct GraphQLEndpoint {
    client: reqwest::Client,
    url: String,
    token_header: &'static str,
    token: String,
}

impl GraphQLEndpoint {
    pub(super) fn new(
        url: String,
        token_header: &'static str,
        token: String,
    ) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("wzzptom-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url,
            token_header,
            token,
        })
    }

    /// POST a query and unwrap the `data` member.
    ///
    /// A non-empty top-level `errors` array wins over any partial `data`.
    pub(super) async fn execute<V, T>(
        &self,
        operation_name: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<T, ShopifyError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = QueryBody {
            variables,
            query,
            operation_name,
        };

        let response = self
            .client
            .post(&self.url)
            .header(self.token_header, &self.token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = operation_name,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Status(status));
        }

        let response: Response<T> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                operation = operation_name,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse Shopify GraphQL response"
            );
            ShopifyError::Parse(e)
        })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, operation = operation_name, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_error).collect(),
            ));
        }

        response
            .data
            .ok_or_else(|| ShopifyError::graphql("No data in response"))
    }
}

fn convert_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}
