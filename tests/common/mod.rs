#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    Router,
};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use payment_order_gateway::{
    error::OrderError,
    models::{Identity, Order, OrderCreateRequest, OrderId},
    services::upstream::OrderApi,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

pub const IDENTITY: &str = "0x000000000000000000000000000000000000000b";

/// Anvil development account #0.
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Fully resolved order, mirroring what upstream returns for a pending order.
pub fn mock_order(
    id: u64,
    identity: &str,
    price_currency: &str,
    receive_currency: &str,
    price_amount: Decimal,
) -> Order {
    Order {
        id: OrderId::new(id).expect("non-zero id"),
        status: "pending".to_string(),
        identity: Identity::from(identity),
        price_amount: Some(price_amount),
        price_currency: price_currency.to_string(),
        pay_amount: Some(dec!(1)),
        pay_currency: Some("test".to_string()),
        payment_address: "0x00".to_string(),
        receive_amount: Some(dec!(1)),
        receive_currency: receive_currency.to_string(),
        expires_at: Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap(),
        created_at: Utc.with_ymd_and_hms(2026, 10, 17, 11, 0, 0).unwrap(),
    }
}

/// Order API stub that only answers for one identity and counts calls.
pub struct MockOrderApi {
    pub identity: Identity,
    pub orders: Vec<Order>,
    pub calls: AtomicUsize,
    pub last_create: Mutex<Option<OrderCreateRequest>>,
}

impl MockOrderApi {
    pub fn new(identity: &str, orders: Vec<Order>) -> Self {
        Self {
            identity: Identity::from(identity),
            orders,
            calls: AtomicUsize::new(0),
            last_create: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, identity: &Identity) -> Result<(), OrderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if identity.matches(&self.identity) {
            Ok(())
        } else {
            Err(OrderError::UpstreamResponse("wrong identity".to_string()))
        }
    }

    fn first(&self) -> Result<Order, OrderError> {
        self.orders
            .first()
            .cloned()
            .ok_or_else(|| OrderError::UpstreamResponse("404 Not Found: order not found".into()))
    }
}

#[async_trait]
impl OrderApi for MockOrderApi {
    async fn create_order(
        &self,
        identity: &Identity,
        request: OrderCreateRequest,
    ) -> Result<Order, OrderError> {
        self.check(identity)?;
        *self.last_create.lock() = Some(request);
        self.first()
    }

    async fn get_order(&self, identity: &Identity, id: OrderId) -> Result<Order, OrderError> {
        self.check(identity)?;
        let mut order = self.first()?;
        order.id = id;
        Ok(order)
    }

    async fn list_orders(&self, identity: &Identity) -> Result<Vec<Order>, OrderError> {
        self.check(identity)?;
        Ok(self.orders.clone())
    }
}

/// Sends a request through the router and returns status and parsed JSON body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Bytes,
}

/// Canned upstream payment service. Unknown routes answer 404.
#[derive(Clone, Default)]
pub struct MockUpstream {
    responses: Arc<Mutex<HashMap<(Method, String), (StatusCode, String)>>>,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockUpstream {
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.responses
            .lock()
            .insert((method, path.to_string()), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().clone()
    }

    /// Serves the mock on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(capture).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/v1", addr)
    }
}

async fn capture(
    State(mock): State<MockUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    mock.requests.lock().push(CapturedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    mock.responses
        .lock()
        .get(&(method, path))
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, r#"{"message":"not found"}"#.to_string()))
}

/// Upstream JSON for an order in the given state.
pub fn upstream_order_json(id: u64, identity: &str, status: &str) -> Value {
    serde_json::json!({
        "id": id,
        "status": status,
        "identity": identity,
        "price_amount": 1,
        "price_currency": "BTC",
        "payment_address": "",
        "receive_amount": null,
        "receive_currency": "BTC",
        "expire_at": "2026-10-17T12:00:00Z",
        "created_at": "2026-10-17T11:00:00Z"
    })
}
