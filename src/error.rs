use crate::domain::transaction::TransactionId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpayError>;

#[derive(Error, Debug)]
pub enum EpayError {
    /// `gettransaction` was unsuccessful; `epay_response` is the gateway's code,
    /// e.g. -1008 for an unknown id or -1019 for a bad password.
    #[error("Transaction not found: {id}{}", response_code(.epay_response))]
    TransactionNotFound {
        id: TransactionId,
        epay_response: Option<i32>,
    },
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),
    #[error("SOAP fault: {0}")]
    SoapFault(String),
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn response_code(code: &Option<i32>) -> String {
    code.map(|code| format!(" (epayresponse {code})")).unwrap_or_default()
}
