/// One decoded input row, sent from the reader to the processor.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    /// A transaction to add. `kind` is passed through raw; the ledger validates it.
    Record {
        kind: String,
        category: String,
        amount: f64,
        description: String,
        date: Option<String>,
    },
    Budget { category: String, amount: f64 },
}
