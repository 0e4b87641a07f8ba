use axum::http::StatusCode;
use std::fmt;
use thiserror::Error;

/// Failure of a single order operation. Nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Malformed input caught before any upstream call.
    #[error("invalid order request: {0}")]
    Validation(String),

    /// The outbound request could not be built or signed.
    #[error("could not build signed request: {0}")]
    UpstreamRequest(String),

    /// Transport failure, non-success status or undecodable body.
    #[error("upstream request failed: {0}")]
    UpstreamResponse(String),

    #[error("order {order_id} belongs to identity {actual}, not {expected}")]
    IdentityMismatch {
        order_id: u64,
        expected: String,
        actual: String,
    },
}

impl OrderError {
    /// Every upstream failure category collapses to 500; only local validation is 400.
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::Validation(_) => StatusCode::BAD_REQUEST,
            OrderError::UpstreamRequest(_)
            | OrderError::UpstreamResponse(_)
            | OrderError::IdentityMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for OrderError {
    fn from(err: reqwest::Error) -> Self {
        OrderError::UpstreamResponse(err.to_string())
    }
}

/// The order operation being served, used to give errors context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    List,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create an order",
            Operation::Get => "get an order",
            Operation::List => "get orders",
        };
        f.write_str(name)
    }
}

impl Operation {
    pub fn wrap(self, err: &OrderError) -> String {
        format!("could not {}: {}", self, err)
    }
}
