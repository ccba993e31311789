use std::io::Write;

use chrono::SecondsFormat;

use crate::domain::{budget::BudgetReport, transaction::Transaction};

#[derive(serde::Serialize)]
/// Internal CSV output row for a transaction statement.
///
/// Headers written (in this order): `id,type,category,amount,description,date`.
struct StatementRow<'a> {
    id: u32,
    #[serde(rename = "type")]
    kind: &'static str,
    category: &'a str,
    amount: String,
    description: &'a str,
    date: String,
}

#[derive(serde::Serialize)]
/// Internal CSV output row for one budget report.
struct BudgetRow<'a> {
    category: &'a str,
    budget: String,
    spent: String,
    remaining: String,
    percentage: i64,
}

/// Writes transactions to a CSV writer in the order given.
///
/// Amounts are formatted with exactly 2 decimal places and dates as RFC 3339 UTC.
///
/// # Errors
///
/// Returns a `csv::Error` if writing/serializing any row fails.
///
/// # Examples
///
/// ```
/// use finance_tracker::domain::ledger::Ledger;
/// use finance_tracker::io::writer::write_transactions;
///
/// let mut ledger = Ledger::new();
/// ledger.add_dated("expense", 12.5, "Food", "lunch", Some("2026-10-02T12:00:00Z")).unwrap();
///
/// let mut out = Vec::new();
/// write_transactions(&mut out, &ledger.list_all()).unwrap();
///
/// let s = String::from_utf8(out).unwrap();
/// assert_eq!(s, "id,type,category,amount,description,date\n1,expense,Food,12.50,lunch,2026-10-02T12:00:00Z\n");
/// ```
pub fn write_transactions<W: Write>(writer: W, records: &[Transaction]) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for tx in records {
        let row = StatementRow {
            id: tx.id(),
            kind: tx.kind().as_str(),
            category: tx.category(),
            amount: tx.amount().to_string_2dp(),
            description: tx.description(),
            date: tx.date().to_rfc3339_opts(SecondsFormat::AutoSi, true),
        };
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes budget reports as `category,budget,spent,remaining,percentage`.
pub fn write_budget_reports<W: Write>(
    writer: W,
    reports: &[BudgetReport],
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for report in reports {
        let status = &report.status;
        wtr.serialize(BudgetRow {
            category: &report.category,
            budget: status.budget.to_string_2dp(),
            spent: status.spent.to_string_2dp(),
            remaining: status.remaining.to_string_2dp(),
            percentage: status.percentage,
        })?;
    }

    wtr.flush()?;
    Ok(())
}
