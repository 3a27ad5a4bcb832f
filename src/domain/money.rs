use crate::error::{EpayError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Converts a major-unit amount (e.g. `79.00`) into the gateway's integer minor units (`7900`).
///
/// Sub-cent remainders are rounded half away from zero.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    let overflow =
        || EpayError::ValidationError(format!("Amount {amount} does not fit in minor units"));

    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(overflow)
}

/// Converts gateway minor units into a major-unit amount with two decimal places.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// ISO 4217 currencies accepted by the payment gateway.
///
/// The gateway reports currencies by their numeric code; anything outside the
/// known set is kept as `Other` rather than failing the reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    DKK,
    EUR,
    USD,
    GBP,
    SEK,
    NOK,
    ISK,
    CHF,
    CAD,
    AUD,
    JPY,
    Other(u16),
}

impl Currency {
    pub fn numeric_code(&self) -> u16 {
        match self {
            Currency::DKK => 208,
            Currency::EUR => 978,
            Currency::USD => 840,
            Currency::GBP => 826,
            Currency::SEK => 752,
            Currency::NOK => 578,
            Currency::ISK => 352,
            Currency::CHF => 756,
            Currency::CAD => 124,
            Currency::AUD => 36,
            Currency::JPY => 392,
            Currency::Other(code) => *code,
        }
    }

    pub fn from_numeric_code(code: u16) -> Self {
        match code {
            208 => Currency::DKK,
            978 => Currency::EUR,
            840 => Currency::USD,
            826 => Currency::GBP,
            752 => Currency::SEK,
            578 => Currency::NOK,
            352 => Currency::ISK,
            756 => Currency::CHF,
            124 => Currency::CAD,
            36 => Currency::AUD,
            392 => Currency::JPY,
            other => Currency::Other(other),
        }
    }
}

impl FromStr for Currency {
    type Err = EpayError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u16>() {
            return Ok(Self::from_numeric_code(code));
        }
        match s.to_ascii_uppercase().as_str() {
            "DKK" => Ok(Currency::DKK),
            "EUR" => Ok(Currency::EUR),
            "USD" => Ok(Currency::USD),
            "GBP" => Ok(Currency::GBP),
            "SEK" => Ok(Currency::SEK),
            "NOK" => Ok(Currency::NOK),
            "ISK" => Ok(Currency::ISK),
            "CHF" => Ok(Currency::CHF),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            "JPY" => Ok(Currency::JPY),
            _ => Err(EpayError::InvalidResponse(format!("Unknown currency: {s}"))),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Other(code) => write!(f, "{code:03}"),
            known => write!(f, "{known:?}"),
        }
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(dec!(10)).unwrap(), 1000);
        assert_eq!(to_minor_units(dec!(79.0)).unwrap(), 7900);
        assert_eq!(to_minor_units(dec!(0.01)).unwrap(), 1);
    }

    #[test]
    fn test_to_minor_units_rounds_half_away_from_zero() {
        assert_eq!(to_minor_units(dec!(1.005)).unwrap(), 101);
        assert_eq!(to_minor_units(dec!(1.004)).unwrap(), 100);
    }

    #[test]
    fn test_to_minor_units_overflow() {
        assert!(matches!(
            to_minor_units(Decimal::MAX),
            Err(EpayError::ValidationError(_))
        ));
        assert!(matches!(
            to_minor_units(Decimal::MIN),
            Err(EpayError::ValidationError(_))
        ));
        // Fits in a Decimal after scaling, but not in an i64.
        assert!(matches!(
            to_minor_units(Decimal::from(i64::MAX)),
            Err(EpayError::ValidationError(_))
        ));
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(7900), dec!(79.0));
        assert_eq!(from_minor_units(7900).to_string(), "79.00");
        assert_eq!(from_minor_units(0), Decimal::ZERO);
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("208".parse::<Currency>().unwrap(), Currency::DKK);
        assert_eq!("dkk".parse::<Currency>().unwrap(), Currency::DKK);
        assert_eq!("036".parse::<Currency>().unwrap(), Currency::AUD);
        assert_eq!("999".parse::<Currency>().unwrap(), Currency::Other(999));
        assert!(matches!(
            "XYZ".parse::<Currency>(),
            Err(EpayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::DKK.to_string(), "DKK");
        assert_eq!(Currency::Other(999).to_string(), "999");
        assert_eq!(Currency::EUR.numeric_code(), 978);
    }
}
