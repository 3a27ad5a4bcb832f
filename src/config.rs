use crate::application::gateway::PAYMENT_SOAP_URL;
use crate::error::{EpayError, Result};
use crate::infrastructure::soap::Credentials;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub merchant_number: String,
    pub password: Option<String>,
    pub soap_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Reads the configuration from the environment, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// Recognised keys: `EPAY_MERCHANT_NUMBER` (required), `EPAY_PASSWORD`,
    /// `EPAY_SOAP_URL` and `EPAY_TIMEOUT_SECS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let merchant_number = value("EPAY_MERCHANT_NUMBER")
            .ok_or_else(|| EpayError::ConfigError("EPAY_MERCHANT_NUMBER is not set".to_string()))?;

        let timeout_secs = match value("EPAY_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                EpayError::ConfigError(format!("EPAY_TIMEOUT_SECS must be a number, got {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            merchant_number,
            password: value("EPAY_PASSWORD"),
            soap_url: value("EPAY_SOAP_URL").unwrap_or_else(|| PAYMENT_SOAP_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            merchant_number: self.merchant_number.clone(),
            password: self.password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("EPAY_MERCHANT_NUMBER", "8888888")])).unwrap();

        assert_eq!(config.merchant_number, "8888888");
        assert_eq!(config.password, None);
        assert_eq!(config.soap_url, PAYMENT_SOAP_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("EPAY_MERCHANT_NUMBER", "8888888"),
            ("EPAY_PASSWORD", "secret"),
            ("EPAY_SOAP_URL", "http://localhost:8080/payment.asmx"),
            ("EPAY_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.soap_url, "http://localhost:8080/payment.asmx");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.credentials().merchant_number, "8888888");
    }

    #[test]
    fn test_missing_merchant_number() {
        let result = Config::from_lookup(lookup(&[("EPAY_MERCHANT_NUMBER", "  ")]));
        assert!(matches!(result, Err(EpayError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_timeout() {
        let result = Config::from_lookup(lookup(&[
            ("EPAY_MERCHANT_NUMBER", "8888888"),
            ("EPAY_TIMEOUT_SECS", "soon"),
        ]));
        assert!(matches!(result, Err(EpayError::ConfigError(_))));
    }
}
