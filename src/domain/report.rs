use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::{
    common::money::Money,
    domain::{ledger::Ledger, transaction::TxKind},
};

/// Returned by [`Ledger::expense_chart`] when nothing has been spent.
pub const NO_EXPENSES: &str = "No expenses recorded.";

const BAR_GLYPH: &str = "█";
/// Percentage points per bar glyph.
const PCT_PER_GLYPH: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthTotals {
    pub income: Money,
    pub expense: Money,
}

impl Ledger {
    /// Text bar chart of expenses per category.
    ///
    /// One line per category with spending, in `expense_by_category` order.
    /// Each glyph stands for five percent of total expense; percentages are
    /// rounded independently and need not add up to 100.
    pub fn expense_chart(&self) -> String {
        let total = self.total_expense();
        if !total.is_positive() {
            return NO_EXPENSES.to_string();
        }

        self.expense_by_category()
            .iter()
            .map(|(category, amount)| {
                let pct = amount.percent_of(total);
                let bar = BAR_GLYPH.repeat((pct / PCT_PER_GLYPH).max(0) as usize);
                format!("{category:<12} {bar} {pct}%")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Income and expense per `YYYY-MM` for the last `months_back` months,
    /// the current month included.
    ///
    /// Every month in the window is present even with no activity. Records
    /// outside the window are ignored. A non-positive `months_back` yields
    /// an empty map, and a window longer than the calendar allows is cut at
    /// `0000-01`.
    pub fn monthly_trend(&self, months_back: i32) -> BTreeMap<String, MonthTotals> {
        let mut trend = BTreeMap::new();
        if months_back <= 0 {
            return trend;
        }

        let today = self.clock.today();
        let current = today.year() * 12 + today.month0() as i32;
        // The window never reaches back past January of year 0.
        let months = months_back.min(current.saturating_add(1));
        for offset in 0..months {
            let idx = current - offset;
            let (year, month) = (idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1);
            if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
                trend.insert(first.format("%Y-%m").to_string(), MonthTotals::default());
            }
        }

        for tx in &self.records {
            let key = tx.date().format("%Y-%m").to_string();
            if let Some(bucket) = trend.get_mut(&key) {
                match tx.kind() {
                    TxKind::Income => bucket.income += tx.amount(),
                    TxKind::Expense => bucket.expense += tx.amount(),
                }
            }
        }
        trend
    }
}
