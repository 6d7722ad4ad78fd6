//! Shopify Admin API client for the admin metrics panel.
//!
//! Only built when `SHOPIFY_ADMIN_TOKEN` is configured. The token is
//! server-side only; customers flagged as admins see the numbers, never the
//! token.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ShopifyError;
use super::graphql::GraphQLEndpoint;
use crate::config::ShopifyConfig;

const ORDERS_COUNT: &str = r"
    query ordersCount {
        ordersCount {
            count
        }
    }
";

const TOTAL_SALES: &str = r#"
    query totalSales {
        shopifyqlQuery(query: "FROM orders SHOW total_sales SINCE -30d UNTIL today") {
            __typename
            ... on TableResponse {
                tableData {
                    rowData
                }
            }
        }
    }
"#;

#[derive(Serialize)]
struct NoVariables {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrdersCountData {
    orders_count: Option<Count>,
}

#[derive(Deserialize)]
struct Count {
    count: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalSalesData {
    shopifyql_query: Option<ShopifyqlResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShopifyqlResponse {
    table_data: Option<TableData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableData {
    #[serde(default)]
    row_data: Vec<Vec<serde_json::Value>>,
}

/// Store-wide numbers shown to admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminMetrics {
    /// Lifetime order count.
    pub orders_count: i64,
    /// Gross sales over the last 30 days.
    pub total_sales: Decimal,
}

/// Client for the Shopify Admin GraphQL API.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<GraphQLEndpoint>,
}

impl AdminClient {
    /// Create a client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig, admin_token: &SecretString) -> Result<Self, ShopifyError> {
        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            config.store, config.api_version
        );
        Self::with_endpoint(endpoint, admin_token.expose_secret())
    }

    /// Create a client against an explicit GraphQL URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, ShopifyError> {
        Ok(Self {
            inner: Arc::new(GraphQLEndpoint::new(
                endpoint.into(),
                "X-Shopify-Access-Token",
                access_token.into(),
            )?),
        })
    }

    /// Total number of orders in the store (0 when Shopify returns none).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn orders_count(&self) -> Result<i64, ShopifyError> {
        let data: OrdersCountData = self
            .inner
            .execute("ordersCount", ORDERS_COUNT, NoVariables {})
            .await?;
        Ok(data.orders_count.map_or(0, |c| c.count))
    }

    /// Gross sales over the last 30 days, from ShopifyQL.
    ///
    /// The first cell of the result table is parsed as a decimal; anything
    /// missing or unparseable counts as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn total_sales(&self) -> Result<Decimal, ShopifyError> {
        let data: TotalSalesData = self
            .inner
            .execute("totalSales", TOTAL_SALES, NoVariables {})
            .await?;

        let cell = data
            .shopifyql_query
            .and_then(|q| q.table_data)
            .and_then(|t| t.row_data.into_iter().next())
            .and_then(|row| row.into_iter().next());

        Ok(cell.as_ref().map_or(Decimal::ZERO, parse_cell))
    }

    /// Fetch both metrics concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first error from either query.
    pub async fn metrics(&self) -> Result<AdminMetrics, ShopifyError> {
        let (orders_count, total_sales) = tokio::try_join!(self.orders_count(), self.total_sales())?;
        Ok(AdminMetrics {
            orders_count,
            total_sales,
        })
    }
}

fn parse_cell(value: &serde_json::Value) -> Decimal {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return Decimal::ZERO,
    };
    Decimal::from_str(text.trim())
        .or_else(|_| Decimal::from_scientific(text.trim()))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    const PATH: &str = "/admin/api/2024-01/graphql.json";

    fn client(server: &MockServer) -> AdminClient {
        AdminClient::with_endpoint(server.url(PATH), "shpat_admin").unwrap()
    }

    #[test]
    fn test_parse_cell_variants() {
        assert_eq!(parse_cell(&json!("1234.50")), Decimal::new(123_450, 2));
        assert_eq!(parse_cell(&json!(99)), Decimal::new(99, 0));
        assert_eq!(parse_cell(&json!("n/a")), Decimal::ZERO);
        assert_eq!(parse_cell(&json!(null)), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_metrics_reads_both_queries() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path(PATH)
                .header("X-Shopify-Access-Token", "shpat_admin")
                .body_includes("ordersCount");
            then.status(200)
                .json_body(json!({ "data": { "ordersCount": { "count": 42 } } }));
        });
        server.mock(|when, then| {
            when.method(POST).path(PATH).body_includes("shopifyqlQuery");
            then.status(200).json_body(json!({ "data": { "shopifyqlQuery": {
                "__typename": "TableResponse",
                "tableData": { "rowData": [["1999.90"]] }
            } } }));
        });

        let metrics = client(&server).metrics().await.unwrap();
        assert_eq!(metrics.orders_count, 42);
        assert_eq!(metrics.total_sales, Decimal::new(199_990, 2));
    }

    #[tokio::test]
    async fn test_total_sales_defaults_to_zero() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(json!({ "data": { "shopifyqlQuery": {
                "__typename": "ParseErrors"
            } } }));
        });

        assert_eq!(client(&server).total_sales().await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_orders_count_missing_is_zero() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(json!({ "data": { "ordersCount": null } }));
        });

        assert_eq!(client(&server).orders_count().await.unwrap(), 0);
    }
}
