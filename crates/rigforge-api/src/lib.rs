//! Blocking clients for the shop backend: the product listing that feeds the
//! catalog and the order endpoint that checkout submits to.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use rigforge_core::{CatalogError, OrderRequest, PartSource, RawPart, parse_rows};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Reply to a successful order submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(deserialize_with = "order_id")]
    pub order_id: u64,
}

// Insert ids come back as a string from some backends.
fn order_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid order id {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid order id {s:?}"))),
        other => Err(serde::de::Error::custom(format!("invalid order id {other}"))),
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull the backend's `{"message"}` out of an error body, or fall back to
/// the raw text.
fn error_message(response: Response) -> String {
    let text = response.text().unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text)
}

pub struct ShopClient {
    api_base_url: String,
    client: Client,
}

impl ShopClient {
    pub fn new(api_base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.api_base_url, endpoint)
    }

    /// Every catalog row the product endpoint lists.
    pub fn list_products(&self) -> Result<Vec<RawPart>> {
        let url = self.url("products.php");
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch products from {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Product listing failed ({}): {}", status, error_message(response));
        }

        let rows: Vec<Value> = response
            .json()
            .context("Failed to parse product listing")?;
        Ok(parse_rows(rows))
    }

    /// One catalog row, or `None` when the backend has no such id.
    pub fn get_product(&self, id: u64) -> Result<Option<RawPart>> {
        let url = self.url("products.php");
        let response = self
            .client
            .get(&url)
            .query(&[("id", id)])
            .send()
            .with_context(|| format!("Failed to fetch product {id}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Product lookup failed ({}): {}", status, error_message(response));
        }

        // A missing row is encoded as `false` or `null`.
        let body: Value = response
            .json()
            .context("Failed to parse product response")?;
        match body {
            Value::Object(_) => Ok(Some(
                serde_json::from_value(body).context("Failed to parse product record")?,
            )),
            _ => Ok(None),
        }
    }

    pub fn submit_order(&self, order: &OrderRequest) -> Result<OrderReceipt> {
        let url = self.url("orders.php");
        let response = self
            .client
            .post(&url)
            .json(order)
            .send()
            .context("Failed to send order request")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Order failed ({}): {}", status, error_message(response));
        }

        let receipt: OrderReceipt = response
            .json()
            .context("Failed to parse order response")?;
        log::info!(
            "Order {} placed: {} items, total {}",
            receipt.order_id,
            order.items.len(),
            order.total
        );
        Ok(receipt)
    }
}

impl PartSource for ShopClient {
    fn fetch(&self) -> Result<Vec<RawPart>, CatalogError> {
        self.list_products()
            .map_err(|e| CatalogError::Unavailable(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_accepts_numeric_and_string_ids() {
        let numeric: OrderReceipt =
            serde_json::from_str(r#"{"message": "Order created.", "order_id": 42}"#).unwrap();
        let text: OrderReceipt =
            serde_json::from_str(r#"{"message": "Order created.", "order_id": "42"}"#).unwrap();
        assert_eq!(numeric, text);
        assert_eq!(numeric.order_id, 42);

        assert!(serde_json::from_str::<OrderReceipt>(r#"{"order_id": "abc"}"#).is_err());
        assert!(serde_json::from_str::<OrderReceipt>(r#"{"order_id": -1}"#).is_err());
    }

    #[test]
    fn base_url_is_normalised() {
        let client = ShopClient::new("http://shop.local/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.api_base_url(), "http://shop.local");
        assert_eq!(client.url("orders.php"), "http://shop.local/api/orders.php");
    }
}
