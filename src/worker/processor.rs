use crate::{
    common::{error::AppError, event::LedgerEvent},
    domain::ledger::Ledger,
};

/// Applies decoded input rows to a ledger and counts what it applied.
#[derive(Debug, Default)]
pub struct Processor {
    records: usize,
    budgets: usize,
}
impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, ledger: &mut Ledger, event: LedgerEvent) -> Result<(), AppError> {
        match event {
            LedgerEvent::Record {
                kind,
                category,
                amount,
                description,
                date,
            } => {
                ledger.add_dated(&kind, amount, &category, &description, date.as_deref())?;
                self.records += 1;
            }
            LedgerEvent::Budget { category, amount } => {
                ledger.set_budget(&category, amount)?;
                self.budgets += 1;
            }
        }
        Ok(())
    }

    pub fn records_applied(&self) -> usize {
        self.records
    }

    pub fn budgets_applied(&self) -> usize {
        self.budgets
    }
}
