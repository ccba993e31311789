use chrono::{DateTime, Utc};

use crate::{
    common::{
        clock::{parse_timestamp, Clock, SystemClock},
        error::LedgerError,
        money::Money,
    },
    domain::{
        budget::Budgets,
        transaction::{Transaction, TxKind},
    },
    io::json,
};

/// In-memory owner of every transaction, the id counter and the budgets.
///
/// Queries hand out owned copies, so the ledger stays the only mutator of
/// its records.
#[derive(Debug)]
pub struct Ledger {
    pub(crate) records: Vec<Transaction>,
    pub(crate) next_id: u32,
    pub(crate) budgets: Budgets,
    pub(crate) clock: Box<dyn Clock>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            budgets: Budgets::default(),
            clock: Box::new(clock),
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Id the next successful `add` will receive.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Adds a transaction dated now.
    pub fn add(
        &mut self,
        kind: &str,
        amount: f64,
        category: &str,
        description: &str,
    ) -> Result<Transaction, LedgerError> {
        self.add_dated(kind, amount, category, description, None)
    }

    /// Adds a transaction with an explicit date. Nothing changes if validation fails.
    ///
    /// `u32::MAX` is never handed out as an id. Once the counter reaches it,
    /// further adds fail with `Validation`.
    pub fn add_dated(
        &mut self,
        kind: &str,
        amount: f64,
        category: &str,
        description: &str,
        date: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let following = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| LedgerError::Validation("transaction ids exhausted".into()))?;
        let tx = Transaction::new(
            self.next_id,
            kind,
            amount,
            category,
            description,
            date,
            self.clock.as_ref(),
        )?;
        self.next_id = following;
        self.records.push(tx.clone());
        tracing::debug!(id = tx.id(), kind = %tx.kind(), amount = %tx.amount(), category, "transaction added");
        Ok(tx)
    }

    pub fn list_all(&self) -> Vec<Transaction> {
        self.records.clone()
    }

    /// Removes the record with `id`. Returns false when there is none.
    pub fn delete_by_id(&mut self, id: u32) -> bool {
        match self.records.iter().position(|t| t.id() == id) {
            Some(idx) => {
                self.records.remove(idx);
                tracing::debug!(id, "transaction deleted");
                true
            }
            None => false,
        }
    }

    pub fn total_income(&self) -> Money {
        self.sum_of(TxKind::Income)
    }

    pub fn total_expense(&self) -> Money {
        self.sum_of(TxKind::Expense)
    }

    pub fn balance(&self) -> Money {
        self.total_income() - self.total_expense()
    }

    fn sum_of(&self, kind: TxKind) -> Money {
        self.records
            .iter()
            .filter(|t| t.kind() == kind)
            .map(Transaction::amount)
            .sum()
    }

    /// Case-sensitive category match, insertion order.
    pub fn by_category(&self, category: &str) -> Vec<Transaction> {
        self.filtered(|t| t.category() == category)
    }

    pub fn by_type(&self, kind: TxKind) -> Vec<Transaction> {
        self.filtered(|t| t.kind() == kind)
    }

    /// Expense totals per category, ordered by each category's first expense.
    pub fn expense_by_category(&self) -> Vec<(String, Money)> {
        let mut totals: Vec<(String, Money)> = Vec::new();
        for tx in self.records.iter().filter(|t| t.is_expense()) {
            match totals.iter_mut().find(|(c, _)| c == tx.category()) {
                Some((_, sum)) => *sum += tx.amount(),
                None => totals.push((tx.category().to_string(), tx.amount())),
            }
        }
        totals
    }

    /// Records dated within `[start, end]`, both bounds given as text.
    pub fn by_date_range(&self, start: &str, end: &str) -> Result<Vec<Transaction>, LedgerError> {
        let start = parse_bound(start)?;
        let end = parse_bound(end)?;
        Ok(self.between(start, end))
    }

    /// Records dated within `[start, end]`, inclusive.
    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Transaction> {
        self.filtered(|t| t.date() >= start && t.date() <= end)
    }

    fn filtered(&self, pred: impl Fn(&Transaction) -> bool) -> Vec<Transaction> {
        self.records.iter().filter(|t| pred(t)).cloned().collect()
    }

    /// Serializes every record, in insertion order, as pretty-printed JSON.
    pub fn export(&self) -> Result<String, LedgerError> {
        json::encode(&self.records)
    }

    /// Replaces all records with those decoded from `text`.
    ///
    /// Every entry is validated before anything is replaced, so on error the
    /// ledger is exactly as it was. Budgets are kept.
    pub fn import(&mut self, text: &str) -> Result<(), LedgerError> {
        let records = json::decode(text, self.clock.as_ref())?;
        let next_id = match records.iter().map(Transaction::id).max() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| LedgerError::Import(format!("id {max} leaves no room for new ids")))?,
        };

        tracing::info!(count = records.len(), next_id, "ledger imported");
        self.records = records;
        self.next_id = next_id;
        Ok(())
    }
}

fn parse_bound(raw: &str) -> Result<DateTime<Utc>, LedgerError> {
    parse_timestamp(raw).ok_or_else(|| LedgerError::Validation(format!("invalid date: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::common::clock::FixedClock;

    fn money(v: f64) -> Money {
        Money::from_f64(v).unwrap()
    }

    fn ledger() -> Ledger {
        Ledger::with_clock(FixedClock(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()))
    }

    fn sample() -> Ledger {
        let mut l = ledger();
        l.add("income", 5000.0, "Salary", "monthly pay").unwrap();
        l.add("income", 500.0, "Bonus", "quarterly").unwrap();
        l.add("expense", 300.0, "Food", "groceries").unwrap();
        l.add("expense", 150.0, "Transport", "metro").unwrap();
        l.add("expense", 200.0, "Entertainment", "cinema").unwrap();
        l.add("expense", 100.0, "Food", "takeaway").unwrap();
        l
    }

    #[test]
    fn totals_and_balance_for_sample_ledger() {
        let l = sample();
        assert_eq!(l.total_income(), money(5500.0));
        assert_eq!(l.total_expense(), money(750.0));
        assert_eq!(l.balance(), money(4750.0));
    }

    #[test]
    fn empty_ledger_has_zero_totals() {
        let l = ledger();
        assert!(l.is_empty());
        assert_eq!(l.total_income(), Money::zero());
        assert_eq!(l.total_expense(), Money::zero());
        assert_eq!(l.balance(), Money::zero());
        assert!(l.expense_by_category().is_empty());
    }

    #[test]
    fn by_category_is_exact_and_ordered() {
        let l = sample();
        let food = l.by_category("Food");
        assert_eq!(food.len(), 2);
        assert_eq!(food[0].description(), "groceries");
        assert_eq!(food[1].description(), "takeaway");
        assert_eq!(food.iter().map(Transaction::amount).sum::<Money>(), money(400.0));

        assert!(l.by_category("food").is_empty());
        assert!(l.by_category("Rent").is_empty());
    }

    #[test]
    fn by_type_splits_income_and_expense() {
        let l = sample();
        let income: Vec<u32> = l.by_type(TxKind::Income).iter().map(Transaction::id).collect();
        let expense: Vec<u32> = l.by_type(TxKind::Expense).iter().map(Transaction::id).collect();
        assert_eq!(income, vec![1, 2]);
        assert_eq!(expense, vec![3, 4, 5, 6]);
    }

    #[test]
    fn expense_by_category_keeps_first_seen_order_and_sums_to_total() {
        let l = sample();
        let by_cat = l.expense_by_category();
        assert_eq!(
            by_cat,
            vec![
                ("Food".to_string(), money(400.0)),
                ("Transport".to_string(), money(150.0)),
                ("Entertainment".to_string(), money(200.0)),
            ]
        );
        let sum: Money = by_cat.iter().map(|(_, m)| *m).sum();
        assert_eq!(sum, l.total_expense());
        assert!(!by_cat.iter().any(|(c, _)| c == "Salary"));
    }

    #[test]
    fn ids_increase_and_are_never_reused() {
        let mut l = ledger();
        let a = l.add("income", 1.0, "a", "").unwrap();
        let b = l.add("income", 1.0, "b", "").unwrap();
        assert!(l.delete_by_id(b.id()));
        let c = l.add("income", 1.0, "c", "").unwrap();
        assert_eq!((a.id(), b.id(), c.id()), (1, 2, 3));
        assert_eq!(l.next_id(), 4);
    }

    #[test]
    fn failed_add_changes_nothing() {
        let mut l = ledger();
        l.add("income", 10.0, "a", "").unwrap();

        assert!(matches!(l.add("transfer", 10.0, "x", "y"), Err(LedgerError::Validation(_))));
        assert!(matches!(l.add("expense", -5.0, "x", "y"), Err(LedgerError::Validation(_))));

        assert_eq!(l.len(), 1);
        assert_eq!(l.next_id(), 2);
        assert_eq!(l.add("expense", 5.0, "x", "y").unwrap().id(), 2);
    }

    #[test]
    fn amounts_above_the_cap_cannot_overflow_totals() {
        let mut l = ledger();
        for _ in 0..2 {
            assert!(matches!(l.add("expense", 5e14, "a", ""), Err(LedgerError::Validation(_))));
        }
        assert!(l.is_empty());

        for _ in 0..3 {
            l.add("expense", 1_000_000_000.0, "a", "").unwrap();
        }
        l.add("income", 1_000_000_000.0, "b", "").unwrap();
        assert_eq!(l.total_expense(), money(3_000_000_000.0));
        assert_eq!(l.balance(), money(-2_000_000_000.0));
    }

    #[test]
    fn add_stops_cleanly_when_ids_run_out() {
        let mut l = ledger();
        l.next_id = u32::MAX - 1;

        assert_eq!(l.add("income", 1.0, "a", "").unwrap().id(), u32::MAX - 1);
        assert_eq!(l.next_id(), u32::MAX);

        let err = l.add("income", 1.0, "b", "").unwrap_err();
        assert_eq!(err, LedgerError::Validation("transaction ids exhausted".into()));
        assert_eq!(l.len(), 1);
        assert_eq!(l.next_id(), u32::MAX);
    }

    #[test]
    fn delete_removes_once_and_keeps_other_ids() {
        let mut l = sample();
        assert!(l.delete_by_id(1));
        assert!(!l.delete_by_id(1));
        assert!(!l.delete_by_id(99));

        let ids: Vec<u32> = l.list_all().iter().map(Transaction::id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6]);
        assert_eq!(l.balance(), money(-250.0));
    }

    #[test]
    fn list_all_is_a_snapshot() {
        let mut l = sample();
        let mut snapshot = l.list_all();
        snapshot.clear();
        assert_eq!(l.len(), 6);

        let before = l.list_all();
        l.add("expense", 1.0, "Food", "").unwrap();
        assert_eq!(before.len(), 6);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let mut l = ledger();
        l.add_dated("expense", 1.0, "a", "", Some("2026-09-30T23:59:59Z")).unwrap();
        l.add_dated("expense", 2.0, "b", "", Some("2026-10-01")).unwrap();
        l.add_dated("expense", 3.0, "c", "", Some("2026-10-15T12:00:00Z")).unwrap();
        l.add_dated("expense", 4.0, "d", "", Some("2026-10-31")).unwrap();
        l.add_dated("expense", 5.0, "e", "", Some("2026-10-31T00:00:01Z")).unwrap();

        let hits = l.by_date_range("2026-10-01", "2026-10-31").unwrap();
        let cats: Vec<&str> = hits.iter().map(Transaction::category).collect();
        assert_eq!(cats, vec!["b", "c", "d"]);

        assert!(l.by_date_range("2026-11-01", "2026-10-01").unwrap().is_empty());
    }

    #[test]
    fn date_range_rejects_unparseable_bounds() {
        let l = sample();
        assert!(matches!(l.by_date_range("soon", "2026-10-31"), Err(LedgerError::Validation(_))));
        assert!(matches!(l.by_date_range("2026-10-01", ""), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn undated_records_take_the_clock_time() {
        let mut l = ledger();
        let tx = l.add("income", 1.0, "a", "").unwrap();
        assert_eq!(tx.date(), l.clock().now());
    }
}
