use crate::domain::transaction::Transaction;
use crate::error::Result;
use crate::interfaces::record::TransactionRecord;
use std::io::Write;

/// Writes transactions as CSV rows, header first.
pub struct TransactionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TransactionWriter<W> {
    /// Creates a new `TransactionWriter` over any `Write` sink (e.g. Stdout, a file).
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new().has_headers(true).from_writer(sink);
        Self { writer }
    }

    pub fn write_transaction(&mut self, transaction: &Transaction) -> Result<()> {
        self.writer.serialize(TransactionRecord::from(transaction))?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Fields;
    use crate::domain::transaction::{TransactionData, TransactionId};

    fn transaction() -> Transaction {
        let fields: Fields = [
            ("description", "Description of transaction"),
            ("authamount", "7900"),
            ("currency", "208"),
            ("orderid", "MY-ORDER-ID"),
            ("authdate", "2012-02-10T11:30:00"),
            ("tcardno", "333333XXXXXX3000"),
            ("cardtypeid", "5"),
            ("expmonth", "10"),
            ("expyear", "12"),
            ("mode", "MODE_EPAY"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Transaction::with_data(
            TransactionId(42),
            TransactionData::from_fields(&fields).unwrap(),
        )
    }

    #[test]
    fn test_writes_header_and_row() {
        let mut buffer = Vec::new();
        {
            let mut writer = TransactionWriter::new(&mut buffer);
            writer.write_transaction(&transaction()).unwrap();
        }
        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,order_no,description,amount,currency,captured_amount,credited_amount,\
             card_number,card_kind,card_expiry,cardholder,acquirer,group,mode,created_at,\
             captured_at,credited_at,deleted_at,failed,error"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("42,MY-ORDER-ID,Description of transaction,79.00,DKK,0.00,0.00,"));
        assert!(row.contains("333333XXXXXX3000,visa,10/12"));
        assert!(row.contains("MODE_EPAY,2012-02-10T11:30:00,,,,false,"));
    }
}
