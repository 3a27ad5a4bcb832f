use super::card::{Card, CardKind};
use super::money::{Currency, from_minor_units};
use super::ports::Fields;
use crate::error::{EpayError, Result};
use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::value::{self, MapDeserializer};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gateway-assigned transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TransactionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Processing environment reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Epay,
    Test,
    Production,
    Other(String),
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Other(String::new())
    }
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Epay => "MODE_EPAY",
            Mode::Test => "MODE_TEST",
            Mode::Production => "MODE_PRODUCTION",
            Mode::Other(tag) => tag,
        }
    }
}

impl From<&str> for Mode {
    fn from(tag: &str) -> Self {
        match tag {
            "MODE_EPAY" => Mode::Epay,
            "MODE_TEST" => Mode::Test,
            "MODE_PRODUCTION" => Mode::Production,
            other => Mode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view of the gateway's `transactionInformation` record.
///
/// Deserialized in one go from a `gettransaction` response, either from the
/// flattened [`Fields`] or straight from the XML element. Empty text elements
/// are treated the same as missing ones; only `authdate` is required.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TransactionData {
    #[serde(default, deserialize_with = "text")]
    pub description: String,
    #[serde(rename = "authamount", default, deserialize_with = "minor_units")]
    pub amount: Decimal,
    #[serde(rename = "capturedamount", default, deserialize_with = "minor_units")]
    pub captured_amount: Decimal,
    #[serde(rename = "creditedamount", default, deserialize_with = "minor_units")]
    pub credited_amount: Decimal,
    #[serde(default, deserialize_with = "parsed")]
    pub currency: Currency,
    #[serde(default, deserialize_with = "text")]
    pub group: String,
    #[serde(default, deserialize_with = "text")]
    pub cardholder: String,
    #[serde(default, deserialize_with = "text")]
    pub acquirer: String,
    #[serde(rename = "orderid", default, deserialize_with = "text")]
    pub order_no: String,
    #[serde(rename = "authdate", deserialize_with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "captureddate", default, deserialize_with = "optional_timestamp")]
    pub captured_at: Option<NaiveDateTime>,
    #[serde(rename = "crediteddate", default, deserialize_with = "optional_timestamp")]
    pub credited_at: Option<NaiveDateTime>,
    #[serde(rename = "deleteddate", default, deserialize_with = "optional_timestamp")]
    pub deleted_at: Option<NaiveDateTime>,
    #[serde(rename = "tcardno", default, deserialize_with = "text")]
    pub card_number: String,
    #[serde(rename = "cardtypeid", default, deserialize_with = "parsed")]
    pub card_type_id: u32,
    #[serde(rename = "expmonth", default, deserialize_with = "parsed")]
    pub exp_month: u8,
    #[serde(rename = "expyear", default, deserialize_with = "two_digit_year")]
    pub exp_year: u8,
    #[serde(default, deserialize_with = "mode")]
    pub mode: Mode,
    #[serde(default, deserialize_with = "optional_text")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub failed: bool,
}

impl TransactionData {
    /// Decodes the record from flattened response fields.
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let entries = fields.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        Self::deserialize(MapDeserializer::<_, value::Error>::new(entries))
            .map_err(|e| EpayError::InvalidResponse(e.to_string()))
    }
}

// Every gateway value arrives as element text, so each field reads a string
// first and converts it afterwards.

fn optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

fn text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer).map(Option::unwrap_or_default)
}

fn parsed<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    match optional_text(deserializer)? {
        Some(raw) => raw
            .parse()
            .map_err(|e| de::Error::custom(format!("invalid value {raw:?}: {e}"))),
        None => Ok(T::default()),
    }
}

fn minor_units<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    parsed::<D, i64>(deserializer).map(from_minor_units)
}

fn two_digit_year<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    parsed::<D, u16>(deserializer).map(|year| (year % 100) as u8)
}

fn mode<'de, D>(deserializer: D) -> std::result::Result<Mode, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?
        .map(|tag| Mode::from(tag.as_str()))
        .unwrap_or_default())
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(optional_text(deserializer)?.as_deref(), Some("true" | "1")))
}

fn timestamp<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(raw.trim()).map_err(de::Error::custom)
}

// The gateway reports unset dates as 0001-01-01T00:00:00.
fn optional_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match optional_text(deserializer)? {
        Some(raw) if !raw.starts_with("0001-01-01") => {
            parse_timestamp(&raw).map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

fn parse_timestamp(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_local()))
        .map_err(|_| format!("invalid timestamp {raw:?}"))
}

/// A payment transaction as known to the gateway.
///
/// Accessors project from the last fetched record; only
/// [`TransactionGateway`](crate::application::gateway::TransactionGateway)
/// talks to the gateway and replaces that record.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    data: TransactionData,
}

impl Transaction {
    /// Creates a transaction handle with an empty record. Use
    /// `TransactionGateway::find` to get one that is already fetched.
    pub fn new(id: TransactionId) -> Self {
        Self::with_data(id, TransactionData::default())
    }

    pub fn with_data(id: TransactionId, data: TransactionData) -> Self {
        Self { id, data }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn data(&self) -> &TransactionData {
        &self.data
    }

    /// Replaces the whole record; fields are never merged.
    pub(crate) fn replace_data(&mut self, data: TransactionData) {
        self.data = data;
    }

    pub fn description(&self) -> &str {
        &self.data.description
    }

    pub fn amount(&self) -> Decimal {
        self.data.amount
    }

    pub fn captured_amount(&self) -> Decimal {
        self.data.captured_amount
    }

    pub fn credited_amount(&self) -> Decimal {
        self.data.credited_amount
    }

    pub fn card(&self) -> Card {
        Card::new(
            self.data.card_number.clone(),
            self.data.exp_year,
            self.data.exp_month,
            CardKind::from_type_id(self.data.card_type_id),
        )
    }

    pub fn group(&self) -> &str {
        &self.data.group
    }

    pub fn cardholder(&self) -> &str {
        &self.data.cardholder
    }

    pub fn acquirer(&self) -> &str {
        &self.data.acquirer
    }

    pub fn currency(&self) -> Currency {
        self.data.currency
    }

    pub fn order_no(&self) -> &str {
        &self.data.order_no
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.data.created_at
    }

    pub fn captured_at(&self) -> Option<NaiveDateTime> {
        self.data.captured_at
    }

    pub fn credited_at(&self) -> Option<NaiveDateTime> {
        self.data.credited_at
    }

    pub fn deleted_at(&self) -> Option<NaiveDateTime> {
        self.data.deleted_at
    }

    /// Raw gateway error code, if one was reported.
    pub fn error(&self) -> Option<&str> {
        self.data.error.as_deref()
    }

    pub fn mode(&self) -> &Mode {
        &self.data.mode
    }

    pub fn failed(&self) -> bool {
        self.data.failed
    }

    pub fn is_test(&self) -> bool {
        matches!(self.data.mode, Mode::Epay | Mode::Test)
    }

    pub fn is_production(&self) -> bool {
        !self.is_test()
    }

    pub fn is_captured(&self) -> bool {
        self.captured_at().is_some()
    }

    pub fn is_credited(&self) -> bool {
        self.credited_at().is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    pub fn is_failed(&self) -> bool {
        self.data.failed
    }

    pub fn is_success(&self) -> bool {
        !self.is_failed()
    }
}
