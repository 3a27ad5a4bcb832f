use crate::domain::ports::{Api, ApiResponse, Fields, Params};
use crate::domain::transaction::TransactionId;
use crate::error::{EpayError, Result};
use async_trait::async_trait;
use chrono::Local;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Gateway code reported when a transaction id is unknown.
const UNKNOWN_TRANSACTION: &str = "-1008";

/// A request received by [`InMemoryApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub endpoint: String,
    pub action: String,
    pub params: Params,
}

#[derive(Default)]
struct GatewayState {
    transactions: HashMap<TransactionId, Fields>,
    declined: HashSet<String>,
    calls: Vec<ApiCall>,
}

/// A thread-safe in-memory stand-in for the payment gateway.
///
/// Holds transaction records keyed by id, answers `gettransaction`, `capture`,
/// `credit` and `delete` the way the gateway does, and records every request it
/// receives. Clones share the same state, so a test can keep a handle while the
/// gateway owns another.
#[derive(Default, Clone)]
pub struct InMemoryApi {
    state: Arc<RwLock<GatewayState>>,
}

impl InMemoryApi {
    /// Creates a new gateway with no transactions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the raw record of a transaction.
    pub async fn insert(&self, id: TransactionId, fields: Fields) {
        let mut state = self.state.write().await;
        state.transactions.insert(id, fields);
    }

    /// Makes every subsequent `action` request come back unsuccessful.
    pub async fn decline(&self, action: &str) {
        let mut state = self.state.write().await;
        state.declined.insert(action.to_string());
    }

    /// Every request received so far, oldest first.
    pub async fn calls(&self) -> Vec<ApiCall> {
        let state = self.state.read().await;
        state.calls.clone()
    }
}

fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn transaction_id(params: &Params) -> Result<TransactionId> {
    param(params, "transactionid")
        .and_then(|raw| raw.parse().ok())
        .map(TransactionId)
        .ok_or_else(|| EpayError::ValidationError("Missing or invalid transactionid".to_string()))
}

fn minor_amount(params: &Params) -> Result<i64> {
    param(params, "amount")
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| EpayError::ValidationError("Missing or invalid amount".to_string()))
}

fn now() -> String {
    Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn add_minor(record: &mut Fields, field: &str, amount: i64) {
    let current: i64 = record
        .get(field)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default();
    record.insert(field.to_string(), (current + amount).to_string());
}

#[async_trait]
impl Api for InMemoryApi {
    async fn request(&self, endpoint: &str, action: &str, params: Params) -> Result<ApiResponse> {
        let mut state = self.state.write().await;
        state.calls.push(ApiCall {
            endpoint: endpoint.to_string(),
            action: action.to_string(),
            params: params.clone(),
        });

        let declined = state.declined.contains(action);
        let id = transaction_id(&params)?;
        let result = format!("{action}Result");
        let response = ApiResponse::new(action, Fields::new());

        let Some(record) = state.transactions.get_mut(&id) else {
            return Ok(response
                .with_field(result, "false")
                .with_field("epayresponse", UNKNOWN_TRANSACTION));
        };
        if declined {
            return Ok(response.with_field(result, "false"));
        }

        match action {
            "gettransaction" => {
                let fields = record.clone();
                Ok(ApiResponse::new(action, fields).with_field(result, "true"))
            }
            "capture" => {
                let amount = minor_amount(&params)?;
                add_minor(record, "capturedamount", amount);
                record.insert("captureddate".to_string(), now());
                Ok(response.with_field(result, "true"))
            }
            "credit" => {
                let amount = minor_amount(&params)?;
                add_minor(record, "creditedamount", amount);
                record.insert("crediteddate".to_string(), now());
                Ok(response.with_field(result, "true"))
            }
            "delete" => {
                record.insert("deleteddate".to_string(), now());
                Ok(response.with_field(result, "true"))
            }
            other => Err(EpayError::UnsupportedAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_unsuccessful() {
        let api = InMemoryApi::new();
        let response = api
            .request("url", "gettransaction", params(&[("transactionid", "9")]))
            .await
            .unwrap();

        assert!(!response.success());
        assert_eq!(response.epay_response(), Some(-1008));
    }

    #[tokio::test]
    async fn test_capture_updates_record() {
        let api = InMemoryApi::new();
        api.insert(TransactionId(1), Fields::new()).await;

        let response = api
            .request(
                "url",
                "capture",
                params(&[("transactionid", "1"), ("amount", "1000")]),
            )
            .await
            .unwrap();
        assert!(response.success());

        let record = api
            .request("url", "gettransaction", params(&[("transactionid", "1")]))
            .await
            .unwrap();
        assert_eq!(record.field("capturedamount"), Some("1000"));
        assert!(record.field("captureddate").is_some());
    }

    #[tokio::test]
    async fn test_declined_action_leaves_record() {
        let api = InMemoryApi::new();
        api.insert(TransactionId(1), Fields::new()).await;
        api.decline("delete").await;

        let response = api
            .request("url", "delete", params(&[("transactionid", "1")]))
            .await
            .unwrap();
        assert!(!response.success());

        let record = api
            .request("url", "gettransaction", params(&[("transactionid", "1")]))
            .await
            .unwrap();
        assert_eq!(record.field("deleteddate"), None);
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let api = InMemoryApi::new();
        let _ = api
            .request("url", "gettransaction", params(&[("transactionid", "1")]))
            .await;

        let calls = api.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].endpoint, "url");
        assert_eq!(calls[0].action, "gettransaction");
    }

    #[tokio::test]
    async fn test_unsupported_action() {
        let api = InMemoryApi::new();
        api.insert(TransactionId(1), Fields::new()).await;

        let result = api
            .request("url", "split", params(&[("transactionid", "1")]))
            .await;
        assert!(matches!(result, Err(EpayError::UnsupportedAction(_))));
    }
}
