use crate::common::event::LedgerEvent;
use std::io::Read;

#[derive(serde::Deserialize)]
/// Internal CSV row representation matching the input headers. Only `type`,
/// `category` and `amount` are mandatory.
struct CsvRow {
    #[serde(rename = "type")]
    kind: String,
    category: String,
    amount: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

/// Reads ledger rows from a CSV reader.
///
/// Supported headers: `type,category,amount,description,date`.
/// The `type` field is lowercased; `budget` rows set a monthly budget and
/// every other type becomes a transaction whose kind the ledger validates.
/// `amount` must be present and numeric; errors include type/category context.
///
/// # Examples
///
/// ```
/// use finance_tracker::io::reader::read_events;
/// use finance_tracker::common::event::LedgerEvent;
/// use csv::ReaderBuilder;
///
/// let data = "type,category,amount,description,date\n\
/// income,Salary,5000,october,2026-10-01\n\
/// budget,Food,500,,\n";
/// let mut rdr = ReaderBuilder::new().from_reader(data.as_bytes());
/// let events: Vec<_> = read_events(&mut rdr).collect();
///
/// assert!(matches!(&events[0], Ok(LedgerEvent::Record { kind, .. }) if kind == "income"));
/// assert!(matches!(&events[1], Ok(LedgerEvent::Budget { category, .. }) if category == "Food"));
/// ```
pub fn read_events<R: Read>(
    rdr: &mut csv::Reader<R>,
) -> impl Iterator<Item = Result<LedgerEvent, String>> + '_ {
    rdr.deserialize::<CsvRow>().map(|res| {
        let row = res.map_err(|e| e.to_string())?;
        let kind = row.kind.trim().to_ascii_lowercase();
        let category = row.category.trim().to_string();

        let amount = match row.amount.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<f64>().map_err(|_| {
                format!("invalid amount {raw:?} for {kind} row in category {category}")
            })?,
            _ => return Err(format!("{kind} row missing amount for category {category}")),
        };

        if kind == "budget" {
            return Ok(LedgerEvent::Budget { category, amount });
        }

        Ok(LedgerEvent::Record {
            kind,
            category,
            amount,
            description: row.description.unwrap_or_default().trim().to_string(),
            date: row
                .date
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    })
}
