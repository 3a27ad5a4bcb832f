use crate::domain::card::CardKind;
use crate::domain::money::Currency;
use crate::domain::transaction::Transaction;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Flat, serializable snapshot of a transaction for CSV and JSON output.
#[derive(Debug, Serialize, PartialEq)]
pub struct TransactionRecord {
    pub id: u64,
    pub order_no: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub captured_amount: Decimal,
    pub credited_amount: Decimal,
    pub card_number: String,
    pub card_kind: CardKind,
    pub card_expiry: String,
    pub cardholder: String,
    pub acquirer: String,
    pub group: String,
    pub mode: String,
    pub created_at: NaiveDateTime,
    pub captured_at: Option<NaiveDateTime>,
    pub credited_at: Option<NaiveDateTime>,
    pub deleted_at: Option<NaiveDateTime>,
    pub failed: bool,
    pub error: Option<String>,
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        let card = tx.card();
        Self {
            id: tx.id().0,
            order_no: tx.order_no().to_string(),
            description: tx.description().to_string(),
            amount: tx.amount(),
            currency: tx.currency(),
            captured_amount: tx.captured_amount(),
            credited_amount: tx.credited_amount(),
            card_expiry: format!("{:02}/{:02}", card.exp_month, card.exp_year),
            card_number: card.number,
            card_kind: card.kind,
            cardholder: tx.cardholder().to_string(),
            acquirer: tx.acquirer().to_string(),
            group: tx.group().to_string(),
            mode: tx.mode().to_string(),
            created_at: tx.created_at(),
            captured_at: tx.captured_at(),
            credited_at: tx.credited_at(),
            deleted_at: tx.deleted_at(),
            failed: tx.failed(),
            error: tx.error().map(str::to_string),
        }
    }
}
