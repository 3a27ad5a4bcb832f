#![allow(dead_code)]

use epay::domain::ports::Fields;
use std::path::PathBuf;

pub const EXISTING_TRANSACTION_ID: u64 = 8089260;
pub const NON_EXISTING_TRANSACTION_ID: u64 = 1;

pub const PAYMENT_PATH: &str = "/remote/payment.asmx";

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

/// The `transactionInformation` record of the existing transaction fixture.
pub fn existing_record() -> Fields {
    [
        ("group", "Group"),
        ("authamount", "7900"),
        ("currency", "208"),
        ("cardtypeid", "5"),
        ("capturedamount", "0"),
        ("creditedamount", "0"),
        ("orderid", "MY-ORDER-ID"),
        ("description", "Description of transaction"),
        ("authdate", "2012-02-10T11:30:00"),
        ("captureddate", "0001-01-01T00:00:00"),
        ("deleteddate", "0001-01-01T00:00:00"),
        ("crediteddate", "0001-01-01T00:00:00"),
        ("cardholder", "John Doe"),
        ("mode", "MODE_EPAY"),
        ("acquirer", "EUROLINE"),
        ("tcardno", "333333XXXXXX3000"),
        ("expmonth", "10"),
        ("expyear", "12"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
