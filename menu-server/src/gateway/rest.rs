//! PostgREST-style gateway over HTTPS
//!
//! `GET /rest/v1/{table}?col=eq.value&order=col.asc&limit=n`, `POST` and
//! `PATCH` with `Prefer: return=representation`, and the `submit_order`
//! stored procedure under `/rest/v1/rpc/`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Value, json};
use shared::models::{NewOrder, Order};

use super::{DataGateway, GatewayError, GatewayResult, Query, Table, decode_row};

/// Error body returned by the store
#[derive(serde::Deserialize)]
struct StoreErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RestGatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RestGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestGateway {
    pub fn new(config: RestGatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.as_str())
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn rows(&self, response: Response) -> GatewayResult<Vec<Value>> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let message = match serde_json::from_str::<StoreErrorBody>(&text) {
                Ok(body) => {
                    tracing::debug!(code = ?body.code, "Store rejected request");
                    body.message
                }
                Err(_) => text,
            };
            return Err(GatewayError::Rejected {
                status: normalize_status(status.as_u16(), &message),
                message,
            });
        }
        match response.json::<Value>().await? {
            Value::Array(rows) => Ok(rows),
            other => Ok(vec![other]),
        }
    }
}

/// Unique violations come back as 409 from PostgREST, but some proxies
/// flatten them to 400 with the Postgres message intact.
fn normalize_status(status: u16, message: &str) -> u16 {
    if status == 400 && message.contains("duplicate key") {
        409
    } else {
        status
    }
}

fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Query-string pairs for a select or update
pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = query
        .filters
        .iter()
        .map(|(column, value)| match value {
            Value::Null => (column.clone(), "is.null".to_string()),
            v => (column.clone(), format!("eq.{}", filter_value(v))),
        })
        .collect();
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

#[async_trait]
impl DataGateway for RestGateway {
    async fn select(&self, query: &Query) -> GatewayResult<Vec<Value>> {
        let req = self
            .client
            .get(self.table_url(query.table))
            .query(&query_params(query));
        let response = self.authorize(req).send().await?;
        self.rows(response).await
    }

    async fn insert(&self, table: Table, row: Value) -> GatewayResult<Value> {
        let req = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self.authorize(req).send().await?;
        self.rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(GatewayError::Cardinality { table, count: 0 })
    }

    async fn update(&self, query: &Query, patch: Value) -> GatewayResult<Vec<Value>> {
        let req = self
            .client
            .patch(self.table_url(query.table))
            .query(&query_params(query))
            .header("Prefer", "return=representation")
            .json(&patch);
        let response = self.authorize(req).send().await?;
        self.rows(response).await
    }

    async fn submit_order(&self, order: &NewOrder) -> GatewayResult<Order> {
        let url = format!("{}/rest/v1/rpc/submit_order", self.base_url);
        let req = self.client.post(url).json(&json!({ "order": order }));
        let response = self.authorize(req).send().await?;
        let row = self
            .rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(GatewayError::Cardinality {
                table: Table::Orders,
                count: 0,
            })?;
        decode_row(Table::Orders, row)
    }
}
