//! Client for the upstream payment service ("pilvytis") order resource.
//!
//! Every call is a single signed round trip: no caching and no retries. Timeouts are
//! left to the underlying `reqwest::Client`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::OrderError;
use crate::models::{Identity, Order, OrderCreateRequest, OrderId};
use crate::services::signer::IdentitySigner;

/// Order resource path relative to the upstream base URL.
pub const ORDER_ENDPOINT: &str = "payment/orders";

/// The three order operations, parameterized by the identity acting on them.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(
        &self,
        identity: &Identity,
        request: OrderCreateRequest,
    ) -> Result<Order, OrderError>;

    async fn get_order(&self, identity: &Identity, id: OrderId) -> Result<Order, OrderError>;

    /// Orders are returned in upstream order.
    async fn list_orders(&self, identity: &Identity) -> Result<Vec<Order>, OrderError>;
}

#[derive(Clone)]
pub struct PilvytisClient {
    client: Client,
    base_url: String,
    signer: Arc<dyn IdentitySigner>,
}

impl PilvytisClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        signer: Arc<dyn IdentitySigner>,
    ) -> Result<Self, OrderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OrderError::UpstreamRequest(format!("http client: {}", e)))?;
        Ok(Self::with_client(client, base_url, signer))
    }

    pub fn with_client(client: Client, base_url: &str, signer: Arc<dyn IdentitySigner>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn signed_request(
        &self,
        method: Method,
        identity: &Identity,
        endpoint: &str,
        body: Vec<u8>,
    ) -> Result<RequestBuilder, OrderError> {
        let message = signing_message(&method, endpoint, &body);
        let signature = self
            .signer
            .sign(identity, &message)
            .map_err(|e| OrderError::UpstreamRequest(e.to_string()))?;

        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(method = %method, url = %url, identity = %identity, "Upstream request");

        let mut request = self
            .client
            .request(method, &url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Signature {}", signature));
        if !body.is_empty() {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }
        Ok(request)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, OrderError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(OrderError::UpstreamResponse(format!(
                "{}: {}",
                status,
                upstream_message(&body)
            )));
        }

        serde_json::from_slice(&body).map_err(|e| {
            OrderError::UpstreamResponse(format!("could not decode response: {}", e))
        })
    }
}

#[async_trait]
impl OrderApi for PilvytisClient {
    async fn create_order(
        &self,
        identity: &Identity,
        request: OrderCreateRequest,
    ) -> Result<Order, OrderError> {
        request.validate()?;

        info!(
            identity = %identity,
            price_amount = %request.price_amount,
            price_currency = %request.price_currency,
            receive_currency = %request.receive_currency,
            lightning = request.lightning_network,
            "Creating payment order"
        );

        let body = serde_json::to_vec(&request)
            .map_err(|e| OrderError::UpstreamRequest(format!("encode order: {}", e)))?;
        let req = self.signed_request(Method::POST, identity, ORDER_ENDPOINT, body)?;
        let order: Order = self.execute(req).await?;
        ensure_owner(identity, &order)?;

        info!(identity = %identity, order_id = %order.id, status = %order.status, "Payment order created");
        Ok(order)
    }

    async fn get_order(&self, identity: &Identity, id: OrderId) -> Result<Order, OrderError> {
        let endpoint = format!("{}/{}", ORDER_ENDPOINT, id);
        let req = self.signed_request(Method::GET, identity, &endpoint, Vec::new())?;
        let order: Order = self.execute(req).await?;
        ensure_owner(identity, &order)?;
        Ok(order)
    }

    async fn list_orders(&self, identity: &Identity) -> Result<Vec<Order>, OrderError> {
        let req = self.signed_request(Method::GET, identity, ORDER_ENDPOINT, Vec::new())?;
        let orders: Option<Vec<Order>> = self.execute(req).await?;
        let orders = orders.unwrap_or_default();
        for order in &orders {
            ensure_owner(identity, order)?;
        }
        debug!(identity = %identity, count = orders.len(), "Fetched payment orders");
        Ok(orders)
    }
}

/// Bytes covered by the request signature: method, endpoint path and body.
pub fn signing_message(method: &Method, endpoint: &str, body: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(method.as_str().len() + endpoint.len() + body.len() + 2);
    message.extend_from_slice(method.as_str().as_bytes());
    message.push(b'\n');
    message.extend_from_slice(endpoint.as_bytes());
    message.push(b'\n');
    message.extend_from_slice(body);
    message
}

fn ensure_owner(identity: &Identity, order: &Order) -> Result<(), OrderError> {
    if order.identity.matches(identity) {
        Ok(())
    } else {
        Err(OrderError::IdentityMismatch {
            order_id: order.id.get(),
            expected: identity.to_string(),
            actual: order.identity.to_string(),
        })
    }
}

/// Pulls the human readable message out of an upstream error body.
fn upstream_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        "empty response body".to_string()
    } else {
        text
    }
}
