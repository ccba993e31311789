use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::common::{
    clock::{parse_timestamp, Clock},
    error::LedgerError,
    money::{Money, MAX_AMOUNT},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

impl FromStr for TxKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(LedgerError::Validation(format!(
                "transaction type must be income or expense, got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single income or expense event. Immutable once built; the ledger only
/// ever adds or removes whole records.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: u32,
    kind: TxKind,
    amount: Money,
    category: String,
    description: String,
    date: DateTime<Utc>,
}

impl Transaction {
    /// Validates raw inputs and builds a record.
    ///
    /// `kind` must be exactly `income` or `expense` and `amount` a finite
    /// number above zero. A missing or unparseable `date` is not an error:
    /// the record is stamped with `clock.now()` instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use finance_tracker::common::clock::SystemClock;
    /// use finance_tracker::domain::transaction::{Transaction, TxKind};
    ///
    /// let tx = Transaction::new(1, "expense", 12.5, "Food", "lunch", None, &SystemClock).unwrap();
    /// assert_eq!(tx.kind(), TxKind::Expense);
    /// assert_eq!(tx.to_string(), "#1 [expense] 12.50 Food (lunch)");
    ///
    /// assert!(Transaction::new(2, "transfer", 10.0, "x", "y", None, &SystemClock).is_err());
    /// ```
    pub fn new(
        id: u32,
        kind: &str,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: Option<&str>,
        clock: &dyn Clock,
    ) -> Result<Self, LedgerError> {
        let kind = TxKind::from_str(kind)?;
        let amount = positive_amount(amount)?;

        let date = match date.and_then(parse_timestamp) {
            Some(d) => d,
            None => {
                if let Some(raw) = date {
                    tracing::debug!(id, raw, "unparseable transaction date, using current time");
                }
                clock.now()
            }
        };

        Ok(Self {
            id,
            kind,
            amount,
            category: category.into(),
            description: description.into(),
            date,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> TxKind {
        self.kind
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn is_income(&self) -> bool {
        self.kind == TxKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TxKind::Expense
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] {} {} ({})",
            self.id,
            self.kind,
            self.amount.to_string_2dp(),
            self.category,
            self.description
        )
    }
}

/// Shared by transaction construction and budget setting. Accepts
/// `(0, MAX_AMOUNT]` after rounding to four decimals.
pub(crate) fn positive_amount(raw: f64) -> Result<Money, LedgerError> {
    let amount = Money::from_f64(raw)
        .filter(Money::is_positive)
        .ok_or_else(|| LedgerError::Validation(format!("amount must be a positive number, got {raw}")))?;
    if amount > MAX_AMOUNT {
        return Err(LedgerError::Validation(format!(
            "amount must not exceed {MAX_AMOUNT}, got {raw}"
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::common::clock::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap())
    }

    #[test]
    fn builds_record_with_all_fields() {
        let tx = Transaction::new(
            7,
            "income",
            5000.0,
            "Salary",
            "october pay",
            Some("2026-10-01T09:00:00Z"),
            &clock(),
        )
        .unwrap();

        assert_eq!(tx.id(), 7);
        assert_eq!(tx.kind(), TxKind::Income);
        assert!(tx.is_income());
        assert_eq!(tx.amount(), Money::from_f64(5000.0).unwrap());
        assert_eq!(tx.category(), "Salary");
        assert_eq!(tx.description(), "october pay");
        assert_eq!(tx.date(), Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn rejects_unknown_kind() {
        for kind in ["transfer", "", "Income", "EXPENSE", " income"] {
            let err = Transaction::new(1, kind, 10.0, "x", "y", None, &clock()).unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "kind {kind:?}");
        }
    }

    #[test]
    fn rejects_non_positive_or_non_finite_amount() {
        for amount in [-5.0, 0.0, -0.0, 0.00001, f64::NAN, f64::INFINITY] {
            let err = Transaction::new(1, "expense", amount, "x", "y", None, &clock()).unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "amount {amount}");
        }
    }

    #[test]
    fn rejects_amount_above_the_cap() {
        for amount in [1_000_000_000.0001, 5e14, 9e14] {
            let err = Transaction::new(1, "expense", amount, "x", "y", None, &clock()).unwrap_err();
            assert!(err.to_string().contains("must not exceed"), "{err}");
        }
        let at_cap = Transaction::new(1, "expense", 1_000_000_000.0, "x", "y", None, &clock()).unwrap();
        assert_eq!(at_cap.amount(), MAX_AMOUNT);
    }

    #[test]
    fn missing_or_bad_date_falls_back_to_clock() {
        let c = clock();
        let missing = Transaction::new(1, "expense", 1.0, "x", "y", None, &c).unwrap();
        assert_eq!(missing.date(), c.now());

        let bad = Transaction::new(2, "expense", 1.0, "x", "y", Some("not a date"), &c).unwrap();
        assert_eq!(bad.date(), c.now());

        let empty = Transaction::new(3, "expense", 1.0, "x", "y", Some(""), &c).unwrap();
        assert_eq!(empty.date(), c.now());
    }

    #[test]
    fn renders_id_kind_amount_category_and_description() {
        let tx = Transaction::new(3, "expense", 150.0, "Transport", "metro card", None, &clock())
            .unwrap();
        assert_eq!(tx.to_string(), "#3 [expense] 150.00 Transport (metro card)");

        let tx = Transaction::new(12, "income", 0.5, "Gift", "", None, &clock()).unwrap();
        assert_eq!(tx.to_string(), "#12 [income] 0.50 Gift ()");
    }

    #[test]
    fn kind_round_trips_through_text() {
        assert_eq!("income".parse::<TxKind>().unwrap(), TxKind::Income);
        assert_eq!(TxKind::Expense.to_string(), "expense");
    }
}
