use serde::{Serialize, Serializer};
use std::fmt;

/// Card brand as reported by the gateway's numeric card type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardKind {
    Dankort,
    EDankort,
    VisaElectron,
    Mastercard,
    Visa,
    Jcb,
    Maestro,
    Diners,
    AmericanExpress,
    #[default]
    Unknown,
}

impl CardKind {
    pub fn from_type_id(id: u32) -> Self {
        match id {
            1 => CardKind::Dankort,
            2 => CardKind::EDankort,
            3 => CardKind::VisaElectron,
            4 => CardKind::Mastercard,
            5 => CardKind::Visa,
            6 => CardKind::Jcb,
            7 => CardKind::Maestro,
            8 => CardKind::Diners,
            9 => CardKind::AmericanExpress,
            _ => CardKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Dankort => "dankort",
            CardKind::EDankort => "edankort",
            CardKind::VisaElectron => "visa_electron",
            CardKind::Mastercard => "mastercard",
            CardKind::Visa => "visa",
            CardKind::Jcb => "jcb",
            CardKind::Maestro => "maestro",
            CardKind::Diners => "diners",
            CardKind::AmericanExpress => "american_express",
            CardKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CardKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// The payment card used for a transaction, with its number masked by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub number: String,
    pub exp_year: u8,
    pub exp_month: u8,
    pub kind: CardKind,
}

impl Card {
    pub fn new(number: impl Into<String>, exp_year: u8, exp_month: u8, kind: CardKind) -> Self {
        Self {
            number: number.into(),
            exp_year,
            exp_month,
            kind,
        }
    }
}
