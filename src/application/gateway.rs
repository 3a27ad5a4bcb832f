use crate::domain::money::to_minor_units;
use crate::domain::ports::{ApiBox, Params};
use crate::domain::transaction::{Transaction, TransactionData, TransactionId};
use crate::error::{EpayError, Result};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Payment SOAP service shared by lookups and transaction actions.
pub const PAYMENT_SOAP_URL: &str = "https://ssl.ditonlinebetalingssystem.dk/remote/payment.asmx";

/// Entry point for looking up and acting on gateway transactions.
///
/// `TransactionGateway` owns the `Api` used to reach the gateway. Every mutating
/// action follows the same contract: a declined action returns `Ok(false)` and
/// leaves the transaction untouched, an accepted one reloads the transaction and
/// returns `Ok(true)`.
pub struct TransactionGateway {
    api: ApiBox,
    endpoint: String,
}

impl TransactionGateway {
    /// Creates a gateway talking to [`PAYMENT_SOAP_URL`].
    pub fn new(api: ApiBox) -> Self {
        Self::with_endpoint(api, PAYMENT_SOAP_URL)
    }

    /// Creates a gateway talking to a custom payment endpoint.
    ///
    /// # Arguments
    ///
    /// * `api` - The transport used for every request.
    /// * `endpoint` - The payment SOAP URL.
    pub fn with_endpoint(api: ApiBox, endpoint: impl Into<String>) -> Self {
        Self {
            api,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Looks up a transaction and returns it with its record already fetched.
    ///
    /// Fails with [`EpayError::TransactionNotFound`] when the gateway has no
    /// transaction with this id. The error keeps the gateway's `epayresponse`
    /// code, which also tells a rejected login apart from a missing transaction.
    pub async fn find(&self, id: TransactionId) -> Result<Transaction> {
        let mut transaction = Transaction::new(id);
        self.reload(&mut transaction).await?;
        Ok(transaction)
    }

    /// Fetches the transaction record and replaces the local one wholesale.
    pub async fn reload(&self, transaction: &mut Transaction) -> Result<()> {
        let id = transaction.id();
        debug!(transaction_id = %id, "reloading transaction");

        let response = self
            .api
            .request(&self.endpoint, "gettransaction", vec![transaction_param(id)])
            .await?;

        if !response.success() {
            let epay_response = response.epay_response();
            debug!(transaction_id = %id, ?epay_response, "gettransaction was unsuccessful");
            return Err(EpayError::TransactionNotFound { id, epay_response });
        }

        let data = TransactionData::from_fields(response.fields())?;
        transaction.replace_data(data);
        Ok(())
    }

    /// Captures the full authorized amount of the transaction.
    pub async fn capture(&self, transaction: &mut Transaction) -> Result<bool> {
        let amount = to_minor_units(transaction.amount())?;
        let params = vec![
            transaction_param(transaction.id()),
            ("amount".to_string(), amount.to_string()),
        ];
        self.perform(transaction, "capture", params).await
    }

    /// Credits (refunds) part or all of a captured amount.
    pub async fn credit(&self, transaction: &mut Transaction, amount: Decimal) -> Result<bool> {
        if amount <= Decimal::ZERO {
            return Err(EpayError::ValidationError(
                "Credit amount must be positive".to_string(),
            ));
        }
        let amount = to_minor_units(amount)?;
        let params = vec![
            transaction_param(transaction.id()),
            ("amount".to_string(), amount.to_string()),
        ];
        self.perform(transaction, "credit", params).await
    }

    /// Deletes an authorized, not yet captured transaction.
    pub async fn delete(&self, transaction: &mut Transaction) -> Result<bool> {
        let params = vec![transaction_param(transaction.id())];
        self.perform(transaction, "delete", params).await
    }

    async fn perform(
        &self,
        transaction: &mut Transaction,
        action: &str,
        params: Params,
    ) -> Result<bool> {
        let id = transaction.id();
        let response = self.api.request(&self.endpoint, action, params).await?;

        if !response.success() {
            warn!(
                transaction_id = %id,
                action,
                epay_response = ?response.epay_response(),
                "gateway declined action"
            );
            return Ok(false);
        }

        self.reload(transaction).await?;
        info!(transaction_id = %id, action, "gateway action completed");
        Ok(true)
    }
}

fn transaction_param(id: TransactionId) -> (String, String) {
    ("transactionid".to_string(), id.to_string())
}
