use crate::{
    common::{error::LedgerError, money::Money},
    domain::{ledger::Ledger, transaction::positive_amount},
};

/// Monthly budget per category, kept in the order categories were first set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Budgets {
    entries: Vec<(String, Money)>,
}

impl Budgets {
    /// Sets or overwrites a budget. Overwriting keeps the category's position.
    pub fn set(&mut self, category: &str, amount: Money) {
        match self.entries.iter_mut().find(|(c, _)| c == category) {
            Some((_, existing)) => *existing = amount,
            None => self.entries.push((category.to_string(), amount)),
        }
    }

    pub fn get(&self, category: &str) -> Option<Money> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> + '_ {
        self.entries.iter().map(|(c, amount)| (c.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetStatus {
    /// Zero when no budget is configured.
    pub budget: Money,
    pub spent: Money,
    /// Negative once overspent.
    pub remaining: Money,
    /// `spent / budget * 100` rounded half up, or 0 without a budget.
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetReport {
    pub category: String,
    pub status: BudgetStatus,
}

impl Ledger {
    pub fn set_budget(&mut self, category: &str, amount: f64) -> Result<(), LedgerError> {
        let amount = positive_amount(amount)?;
        self.budgets.set(category, amount);
        tracing::debug!(category, amount = %amount, "budget set");
        Ok(())
    }

    pub fn budgets(&self) -> &Budgets {
        &self.budgets
    }

    pub fn check_budget(&self, category: &str) -> BudgetStatus {
        let budget = self.budgets.get(category).unwrap_or_default();
        let spent: Money = self
            .records
            .iter()
            .filter(|t| t.is_expense() && t.category() == category)
            .map(|t| t.amount())
            .sum();

        BudgetStatus {
            budget,
            spent,
            remaining: budget - spent,
            percentage: spent.percent_of(budget),
        }
    }

    pub fn all_budget_reports(&self) -> Vec<BudgetReport> {
        self.budgets
            .iter()
            .map(|(category, _)| BudgetReport {
                category: category.to_string(),
                status: self.check_budget(category),
            })
            .collect()
    }
}
